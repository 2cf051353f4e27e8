//! Gaussian return simulation.
//!
//! Each active asset gets its own sample set of `n` independent draws from
//! `Normal(mean, std_dev)`. Assets are simulated independently; there is no
//! covariance between them.

use std::num::NonZeroUsize;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::error::{ParameterError, RiskError};
use crate::models::AssetParameter;

/// Validated number of draws per asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleCount(NonZeroUsize);

impl SampleCount {
    /// Validate a requested count against the configured ceiling.
    pub fn new(requested: i64, max: usize) -> Result<Self, RiskError> {
        usize::try_from(requested)
            .ok()
            .filter(|n| *n <= max)
            .and_then(NonZeroUsize::new)
            .map(Self)
            .ok_or(RiskError::InvalidSampleSize { requested, max })
    }

    /// Number of draws.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

/// Numeric parameters of one active asset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetParams {
    /// Index of the asset in the request sequences.
    pub index: usize,
    /// Mean return.
    pub mean: f64,
    /// Standard deviation of returns.
    pub std_dev: f64,
}

impl AssetParams {
    /// Convert the raw parameters of asset `index`.
    pub fn resolve(
        index: usize,
        mean: &AssetParameter,
        std_dev: &AssetParameter,
    ) -> Result<Self, RiskError> {
        let fail = |source| RiskError::Simulation { index, source };

        let mean = mean.to_f64("mean").map_err(fail)?;
        let std_dev = std_dev.to_f64("std_dev").map_err(fail)?;
        if std_dev < 0.0 {
            return Err(fail(ParameterError::NegativeStdDev {
                value: std_dev.to_string(),
            }));
        }

        Ok(Self {
            index,
            mean,
            std_dev,
        })
    }
}

/// Simulated returns of one asset. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet(Vec<f64>);

impl SampleSet {
    /// Wrap precomputed samples; `None` if empty.
    #[must_use]
    pub fn from_values(values: Vec<f64>) -> Option<Self> {
        (!values.is_empty()).then_some(Self(values))
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Samples in draw order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Take the samples.
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

/// Draw `count` samples for one asset.
///
/// A zero standard deviation yields `count` copies of the mean exactly.
pub fn simulate<R: Rng + ?Sized>(
    params: &AssetParams,
    count: SampleCount,
    rng: &mut R,
) -> Result<SampleSet, RiskError> {
    let n = count.get();

    if params.std_dev == 0.0 {
        return Ok(SampleSet(vec![params.mean; n]));
    }

    let normal = Normal::new(params.mean, params.std_dev).map_err(|e| RiskError::Simulation {
        index: params.index,
        source: ParameterError::Distribution {
            reason: e.to_string(),
        },
    })?;

    Ok(SampleSet((0..n).map(|_| normal.sample(rng)).collect()))
}

/// Where per-asset random streams come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleSource {
    /// Fresh entropy on every request (thread-local generator).
    #[default]
    Entropy,
    /// Streams derived from a fixed seed and the asset index.
    Seeded(u64),
}

impl SampleSource {
    /// Build from an optional configured seed.
    #[must_use]
    pub const fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::Seeded(seed),
            None => Self::Entropy,
        }
    }

    /// Simulate one asset with a stream from this source.
    pub fn simulate(&self, params: &AssetParams, count: SampleCount) -> Result<SampleSet, RiskError> {
        match self {
            Self::Entropy => simulate(params, count, &mut rand::rng()),
            Self::Seeded(seed) => {
                let mut rng = StdRng::seed_from_u64(derive_stream_seed(*seed, params.index));
                simulate(params, count, &mut rng)
            }
        }
    }
}

/// Mix the asset index into the seed so assets get distinct streams.
const fn derive_stream_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

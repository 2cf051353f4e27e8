//! Monte Carlo VaR engine.
//!
//! One request flows strictly in order through:
//!
//! 1. [`decoder`](crate::codec::decoder) - payload to [`RiskRequest`]
//! 2. [`selector`] - transaction type to signal vector
//! 3. [`simulation`] - `d` Gaussian draws per active asset
//! 4. [`quantile`] - nearest-rank VaR95 / VaR99
//! 5. [`encoder`](crate::codec::encoder) - result or single error
//!
//! The engine holds no per-request state. Active assets are independent, so
//! above a configured threshold they are simulated on a rayon pool and
//! gathered back in active-asset order.

pub mod quantile;
pub mod selector;
pub mod simulation;

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, error, info, warn};

use crate::codec::{self, RiskResponse};
use crate::config::EngineConfig;
use crate::error::{ErrorClass, RiskError};
use crate::models::{RiskRequest, RiskResult, VarThresholds};
use crate::observability;

use simulation::{AssetParams, SampleCount, SampleSource};

/// Error building the simulation worker pool.
#[derive(Debug, thiserror::Error)]
#[error("failed to build simulation thread pool: {0}")]
pub struct EnginePoolError(#[from] rayon::ThreadPoolBuildError);

/// Monte Carlo VaR engine.
#[derive(Debug, Clone)]
pub struct VarEngine {
    config: EngineConfig,
    source: SampleSource,
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl VarEngine {
    /// Create an engine.
    ///
    /// A dedicated pool is built when `max_threads > 0`; otherwise the rayon
    /// global pool is used.
    pub fn new(config: EngineConfig) -> Result<Self, EnginePoolError> {
        let pool = if config.max_threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.max_threads)
                .thread_name(|i| format!("var-sim-{i}"))
                .build()?;
            Some(Arc::new(pool))
        } else {
            None
        };

        Ok(Self {
            source: SampleSource::from_seed(config.seed),
            config,
            pool,
        })
    }

    /// Decode, run and encode one raw request.
    #[must_use]
    pub fn handle(&self, payload: &[u8]) -> RiskResponse {
        let request_id = uuid::Uuid::new_v4();
        let started = Instant::now();

        let outcome = codec::decode_request(payload).and_then(|request| self.run(&request));

        match &outcome {
            Ok(result) => info!(
                %request_id,
                assets = result.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "VaR computed"
            ),
            Err(e) if e.class() == ErrorClass::Processing => error!(
                %request_id,
                code = %e.code(),
                error = %e,
                "VaR request failed"
            ),
            Err(e) => warn!(
                %request_id,
                code = %e.code(),
                error = %e,
                "VaR request rejected"
            ),
        }

        let response = codec::encode(outcome);
        observability::record_request(response.outcome(), started.elapsed().as_secs_f64());
        response
    }

    /// Compute VaR thresholds for every active asset of a decoded request.
    ///
    /// The sample size is checked first, then every active asset's
    /// parameters. Sampling starts only once all of them pass, and any
    /// failure discards the whole request.
    pub fn run(&self, request: &RiskRequest) -> Result<RiskResult, RiskError> {
        let signals = selector::select_signals(request);
        let count = SampleCount::new(request.simulation_count(), self.config.max_simulation_count)?;

        let (means, std_devs) = (request.means(), request.std_devs());
        let assets = selector::active_indices(signals)
            .into_iter()
            .map(|i| AssetParams::resolve(i, &means[i], &std_devs[i]))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            transaction_type = %request.transaction_type(),
            assets = assets.len(),
            simulation_count = count.get(),
            parallel = assets.len() >= self.config.min_parallel_assets,
            "Simulating active assets"
        );
        observability::record_active_assets(assets.len());

        let thresholds = if assets.len() >= self.config.min_parallel_assets {
            self.run_parallel(&assets, count)?
        } else {
            self.run_sequential(&assets, count)?
        };

        observability::record_samples_drawn(draws_made(&assets, count));
        Ok(thresholds.into_iter().collect())
    }

    fn run_sequential(
        &self,
        assets: &[AssetParams],
        count: SampleCount,
    ) -> Result<Vec<VarThresholds>, RiskError> {
        assets
            .iter()
            .map(|asset| self.simulate_asset(asset, count))
            .collect()
    }

    fn run_parallel(
        &self,
        assets: &[AssetParams],
        count: SampleCount,
    ) -> Result<Vec<VarThresholds>, RiskError> {
        let work = || -> Result<Vec<VarThresholds>, RiskError> {
            assets
                .par_iter()
                .map(|asset| self.simulate_asset(asset, count))
                .collect()
        };

        match &self.pool {
            Some(pool) => pool.install(work),
            None => work(),
        }
    }

    fn simulate_asset(
        &self,
        asset: &AssetParams,
        count: SampleCount,
    ) -> Result<VarThresholds, RiskError> {
        let samples = self.source.simulate(asset, count)?;
        Ok(quantile::extract(samples))
    }
}

/// Gaussian draws actually made; zero-volatility assets are filled with
/// their mean without sampling.
fn draws_made(assets: &[AssetParams], count: SampleCount) -> u64 {
    let sampled = assets.iter().filter(|a| a.std_dev > 0.0).count();
    (sampled * count.get()) as u64
}

//! Nearest-rank quantile extraction.
//!
//! Samples are ordered from the best return to the worst, and the thresholds
//! are read at ranks `floor(n * 0.05)` and `floor(n * 0.01)` with no
//! interpolation. For `n < 20` the 95% rank is 0, so VaR95 is the largest
//! simulated return; likewise VaR99 for `n < 100`.

use crate::models::VarThresholds;

use super::simulation::SampleSet;

/// Tail percentage read for VaR95.
pub const VAR95_TAIL_PERCENT: usize = 5;

/// Tail percentage read for VaR99.
pub const VAR99_TAIL_PERCENT: usize = 1;

/// 0-based rank into the descending order, `floor(n * percent / 100)`.
///
/// Always `< n` for `n >= 1`.
#[must_use]
pub const fn nearest_rank(n: usize, tail_percent: usize) -> usize {
    n * tail_percent / 100
}

/// Sort samples from the largest return to the smallest.
pub fn sort_descending(samples: &mut [f64]) {
    samples.sort_unstable_by(|a, b| b.total_cmp(a));
}

/// Extract both thresholds from one sample set.
#[must_use]
pub fn extract(samples: SampleSet) -> VarThresholds {
    let mut sorted = samples.into_inner();
    sort_descending(&mut sorted);

    let n = sorted.len();
    VarThresholds {
        var95: sorted[nearest_rank(n, VAR95_TAIL_PERCENT)],
        var99: sorted[nearest_rank(n, VAR99_TAIL_PERCENT)],
    }
}

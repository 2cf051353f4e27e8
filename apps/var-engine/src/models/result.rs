//! VaR results.

use serde::{Deserialize, Serialize};

/// VaR thresholds extracted from one asset's sample set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VarThresholds {
    /// 95% VaR (sample at rank `floor(0.05 n)` of the descending order).
    pub var95: f64,
    /// 99% VaR (sample at rank `floor(0.01 n)` of the descending order).
    pub var99: f64,
}

/// Result of a successful request, one entry per active asset in
/// active-asset order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    /// 95% thresholds.
    #[serde(rename = "var95_list")]
    pub var95: Vec<f64>,
    /// 99% thresholds.
    #[serde(rename = "var99_list")]
    pub var99: Vec<f64>,
}

impl RiskResult {
    /// Number of assets in the result.
    #[must_use]
    pub fn len(&self) -> usize {
        self.var95.len()
    }

    /// Whether no asset was active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.var95.is_empty()
    }
}

impl FromIterator<VarThresholds> for RiskResult {
    fn from_iter<I: IntoIterator<Item = VarThresholds>>(iter: I) -> Self {
        let (var95, var99) = iter.into_iter().map(|t| (t.var95, t.var99)).unzip();
        Self { var95, var99 }
    }
}

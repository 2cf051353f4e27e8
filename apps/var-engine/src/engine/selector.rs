//! Signal selection.
//!
//! The transaction type itself is recognized when the request is decoded
//! ([`TransactionType::from_json`]), ahead of any other shape check, so by
//! the time a request reaches the engine it names `buy` or `sell`.

use crate::models::{RiskRequest, Signal, TransactionType};

/// Pick the signal vector named by the request's transaction type.
#[must_use]
pub fn select_signals(request: &RiskRequest) -> &[Signal] {
    match request.transaction_type() {
        TransactionType::Buy => request.buy_signals(),
        TransactionType::Sell => request.sell_signals(),
    }
}

/// Indices of active signals, in ascending order.
#[must_use]
pub fn active_indices(signals: &[Signal]) -> Vec<usize> {
    signals
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.is_active().then_some(i))
        .collect()
}

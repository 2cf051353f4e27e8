//! Request and result models shared by the codec and the engine.
//!
//! Nothing here outlives a single request.

mod request;
mod result;

pub use request::{AssetParameter, RiskRequest, Signal, TransactionType};
pub use result::{RiskResult, VarThresholds};

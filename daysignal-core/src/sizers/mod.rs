//! Position sizers: turn a stop distance and a risk budget into a trade plan.
//!
//! Sizers are signal-agnostic: they never decide whether to enter, only how
//! large the position is and where the R-multiple targets sit.

pub mod risk_budget;

pub use risk_budget::{RiskBudgetSizer, SizingRejection};

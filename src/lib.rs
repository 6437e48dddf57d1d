//! # split-engine
//!
//! Balance computation and debt settlement for groups that share expenses.
//!
//! Given a group's members, expenses and confirmed settlements, the engine
//! computes each member's net balance, then proposes a short list of
//! payments that brings every balance back to zero.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: members, expenses, splits, settlements, ledger, group state
//! - **graph** — Direct pairwise debts, before optimization
//! - **optimization** — Balance engine, settlement optimizer, settlement plan
//! - **simulation** — Random group generation

pub mod core;
pub mod graph;
pub mod optimization;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::error::SplitError;
    pub use crate::core::expense::Expense;
    pub use crate::core::group::Group;
    pub use crate::core::member::{Member, MemberId};
    pub use crate::core::settlement::{Settlement, SettlementStatus, Transaction};
    pub use crate::core::split::{equal_splits, Split};
    pub use crate::graph::debt_graph::DebtGraph;
    pub use crate::optimization::balances::{compute_balances, Balance};
    pub use crate::optimization::optimizer::optimize_settlements;
    pub use crate::optimization::plan::SettlementPlan;
}

pub mod balances;
pub mod optimizer;
pub mod plan;

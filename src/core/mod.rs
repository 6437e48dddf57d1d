pub mod error;
pub mod expense;
pub mod group;
pub mod ledger;
pub mod member;
pub mod money;
pub mod settlement;
pub mod split;

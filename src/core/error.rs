use crate::core::member::MemberId;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while validating group data or computing balances.
///
/// Every failure is local to the call that detected it. Nothing is
/// retried and no partially computed balances are ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    #[error("invalid amount {amount} for {context}: must be positive")]
    InvalidAmount { context: String, amount: Decimal },

    #[error("could not parse amount '{input}'")]
    UnparseableAmount { input: String },

    #[error("splits of expense {expense} sum to {split_total}, expected {amount}")]
    SplitSumMismatch {
        expense: Uuid,
        amount: Decimal,
        split_total: Decimal,
    },

    #[error("{context} references unknown member '{member}'")]
    UnknownMember { context: String, member: MemberId },

    #[error("member '{0}' appears more than once in the group")]
    DuplicateMember(MemberId),

    #[error("amounts in {context} are too large to add up")]
    AmountOverflow { context: String },

    #[error("cannot split an expense between zero members")]
    NoParticipants,

    #[error("no expense with id {0}")]
    UnknownExpense(Uuid),

    #[error("no settlement with id {0}")]
    UnknownSettlement(Uuid),
}

use crate::core::error::SplitError;
use crate::core::member::MemberId;
use crate::core::money::{ensure_positive, round_cents};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The portion of one expense attributed to one member.
///
/// A split marked `paid` has already been handed to the payer outside the
/// app and no longer counts toward the member's debt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub member_id: MemberId,
    pub amount: Decimal,
    #[serde(default)]
    pub paid: bool,
}

impl Split {
    pub fn new(member_id: MemberId, amount: Decimal) -> Self {
        Self {
            member_id,
            amount,
            paid: false,
        }
    }

    /// Mark this share as already paid back.
    pub fn paid(mut self) -> Self {
        self.paid = true;
        self
    }

    /// The amount still owed for this share.
    pub fn outstanding(&self) -> Decimal {
        if self.paid {
            Decimal::ZERO
        } else {
            self.amount
        }
    }
}

/// Divide `total` evenly between `members`.
///
/// Each share is rounded to the cent and whatever the rounding leaves over
/// goes to the first member, so the shares always sum to `total` exactly.
///
/// # Examples
///
/// ```
/// use split_engine::core::member::MemberId;
/// use split_engine::core::split::equal_splits;
/// use rust_decimal_macros::dec;
///
/// let members = [MemberId::new("a"), MemberId::new("b"), MemberId::new("c")];
/// let splits = equal_splits(dec!(100), &members).unwrap();
/// assert_eq!(splits[0].amount, dec!(33.34));
/// assert_eq!(splits[1].amount, dec!(33.33));
/// ```
pub fn equal_splits(total: Decimal, members: &[MemberId]) -> Result<Vec<Split>, SplitError> {
    ensure_positive(total, "equal split")?;
    if members.is_empty() {
        return Err(SplitError::NoParticipants);
    }

    let share = round_cents(total / Decimal::from(members.len()));
    let mut splits: Vec<Split> = members
        .iter()
        .map(|m| Split::new(m.clone(), share))
        .collect();

    let first_share = share
        .checked_mul(Decimal::from(members.len()))
        .and_then(|shared| total.checked_sub(shared))
        .and_then(|remainder| share.checked_add(remainder))
        .ok_or_else(|| SplitError::AmountOverflow {
            context: "equal split".to_string(),
        })?;
    splits[0].amount = first_share;
    Ok(splits)
}

use crate::core::error::SplitError;
use crate::core::expense::Expense;
use crate::core::ledger::Ledger;
use crate::core::member::{Member, MemberId};
use crate::core::money::{is_settled, round_cents, EPSILON};
use crate::core::settlement::Settlement;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A member's net position in the group.
///
/// Positive means the group owes the member; negative means the member
/// owes the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub member_id: MemberId,
    pub name: String,
    pub amount: Decimal,
}

/// Creditor, debtor and settled use the same cut-off as the optimizer: a
/// member is only a creditor or debtor if a transfer would be proposed for
/// them.
impl Balance {
    pub fn is_creditor(&self) -> bool {
        self.amount > EPSILON
    }

    pub fn is_debtor(&self) -> bool {
        self.amount < -EPSILON
    }

    pub fn is_settled(&self) -> bool {
        is_settled(self.amount)
    }
}

/// Compute one net balance per member.
///
/// # Algorithm
///
/// 1. Open a zero position for every member, in member order.
/// 2. For each expense, credit the payer with the full amount and debit each
///    member's unpaid share. A share already marked paid is not owed by its
///    member any more; it is taken off the payer's credit instead, so the
///    balances still sum to zero. Simply skipping a paid share would leave
///    the payer credited for money they already got back, and the group
///    total would drift by the paid amount.
/// 3. For each confirmed settlement, credit the payer and debit the receiver.
///    Pending settlements are ignored.
/// 4. Round every position to the cent.
///
/// Unknown member references, non-positive amounts and splits that do not
/// add up to their expense are rejected, never skipped. Totals too large for
/// a `Decimal` fail with [`SplitError::AmountOverflow`].
///
/// The output has exactly one entry per member, in input order, including
/// members whose balance is zero.
pub fn compute_balances(
    members: &[Member],
    expenses: &[Expense],
    settlements: &[Settlement],
) -> Result<Vec<Balance>, SplitError> {
    let mut ledger = Ledger::for_members(members)?;

    for expense in expenses {
        ledger.apply_expense(expense)?;
    }

    let mut applied = 0usize;
    for settlement in settlements {
        if ledger.apply_settlement(settlement)? {
            applied += 1;
        }
    }

    log::debug!(
        "computed balances for {} members from {} expenses and {} confirmed settlements ({} pending ignored)",
        members.len(),
        expenses.len(),
        applied,
        settlements.len() - applied
    );

    Ok(members
        .iter()
        .zip(ledger.positions())
        .map(|(member, (_, amount))| Balance {
            member_id: member.id.clone(),
            name: member.name.clone(),
            amount: round_cents(*amount),
        })
        .collect())
}

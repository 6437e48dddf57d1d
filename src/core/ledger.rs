use crate::core::error::SplitError;
use crate::core::expense::Expense;
use crate::core::member::{Member, MemberId};
use crate::core::money::{checked_sum, ensure_positive, is_settled, EPSILON};
use crate::core::settlement::Settlement;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Running net totals for every member of a group, in member order.
///
/// A positive position means the member is owed money.
/// A negative position means the member owes money.
///
/// Every entry is validated in full before any position moves, so a
/// rejected expense or settlement leaves the ledger untouched.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    positions: Vec<(MemberId, Decimal)>,
    index: HashMap<MemberId, usize>,
}

impl Ledger {
    /// Open a ledger with a zero position for each member.
    pub fn for_members(members: &[Member]) -> Result<Self, SplitError> {
        let mut ledger = Self::default();
        for member in members {
            if ledger.index.contains_key(&member.id) {
                return Err(SplitError::DuplicateMember(member.id.clone()));
            }
            ledger.index.insert(member.id.clone(), ledger.positions.len());
            ledger.positions.push((member.id.clone(), Decimal::ZERO));
        }
        Ok(ledger)
    }

    /// Credit the payer with the full amount and debit every share: unpaid
    /// shares from their member, paid shares from the payer.
    pub fn apply_expense(&mut self, expense: &Expense) -> Result<(), SplitError> {
        self.validate_expense(expense)?;

        let payer = self.slot(expense.paid_by(), "payer")?;
        let mut deltas = Vec::with_capacity(expense.splits().len() + 1);
        deltas.push((payer, expense.amount()));

        // A paid share was already handed back to the payer, so it comes off
        // the payer's credit instead of the member's debt.
        for split in expense.splits() {
            let slot = if split.paid {
                payer
            } else {
                self.slot(&split.member_id, "split")?
            };
            deltas.push((slot, -split.amount));
        }
        self.apply_deltas(&deltas, &format!("expense {}", expense.id()))
    }

    /// Apply a confirmed settlement: the payer's debt shrinks and so does the
    /// receiver's credit. Pending settlements are skipped and return `false`.
    pub fn apply_settlement(&mut self, settlement: &Settlement) -> Result<bool, SplitError> {
        if !settlement.is_confirmed() {
            return Ok(false);
        }
        ensure_positive(
            settlement.amount(),
            format!("settlement {}", settlement.id()),
        )?;
        let from = self.slot(settlement.from(), "settlement payer")?;
        let to = self.slot(settlement.to(), "settlement receiver")?;

        self.apply_deltas(
            &[(from, settlement.amount()), (to, -settlement.amount())],
            &format!("settlement {}", settlement.id()),
        )?;
        Ok(true)
    }

    /// Move several positions together. Deltas for the same member are netted
    /// first, and nothing changes unless every new position fits in a
    /// `Decimal`.
    fn apply_deltas(&mut self, deltas: &[(usize, Decimal)], context: &str) -> Result<(), SplitError> {
        let overflow = || SplitError::AmountOverflow {
            context: context.to_string(),
        };

        let mut net: Vec<(usize, Decimal)> = Vec::with_capacity(deltas.len());
        for &(slot, delta) in deltas {
            match net.iter().position(|(s, _)| *s == slot) {
                Some(i) => net[i].1 = net[i].1.checked_add(delta).ok_or_else(overflow)?,
                None => net.push((slot, delta)),
            }
        }

        let mut updated = Vec::with_capacity(net.len());
        for (slot, delta) in net {
            let next = self.positions[slot]
                .1
                .checked_add(delta)
                .ok_or_else(overflow)?;
            updated.push((slot, next));
        }

        for (slot, next) in updated {
            self.positions[slot].1 = next;
        }
        Ok(())
    }

    fn validate_expense(&self, expense: &Expense) -> Result<(), SplitError> {
        ensure_positive(expense.amount(), format!("expense {}", expense.id()))?;
        self.slot(expense.paid_by(), "payer")?;

        for split in expense.splits() {
            if split.amount < Decimal::ZERO {
                return Err(SplitError::InvalidAmount {
                    context: format!("split of {} in expense {}", split.member_id, expense.id()),
                    amount: split.amount,
                });
            }
            self.slot(&split.member_id, "split")?;
        }

        let split_total = expense.split_total()?;
        if (split_total - expense.amount()).abs() >= EPSILON {
            return Err(SplitError::SplitSumMismatch {
                expense: expense.id(),
                amount: expense.amount(),
                split_total,
            });
        }
        Ok(())
    }

    fn slot(&self, member: &MemberId, context: &str) -> Result<usize, SplitError> {
        self.index
            .get(member)
            .copied()
            .ok_or_else(|| SplitError::UnknownMember {
                context: context.to_string(),
                member: member.clone(),
            })
    }

    /// Net position of a member, if they belong to the ledger.
    pub fn position(&self, member: &MemberId) -> Option<Decimal> {
        self.index.get(member).map(|&i| self.positions[i].1)
    }

    /// All positions in member order.
    pub fn positions(&self) -> &[(MemberId, Decimal)] {
        &self.positions
    }

    /// Sum of every position. Zero for any consistent set of entries.
    pub fn net_sum(&self) -> Result<Decimal, SplitError> {
        checked_sum(self.positions.iter().map(|(_, amount)| *amount), "net sum")
    }

    /// Whether positions sum to zero, to within a cent.
    pub fn is_balanced(&self) -> bool {
        self.net_sum().map(is_settled).unwrap_or(false)
    }

    /// Total still owed to creditors (sum of positive positions).
    pub fn total_outstanding(&self) -> Result<Decimal, SplitError> {
        checked_sum(
            self.positions
                .iter()
                .map(|(_, amount)| *amount)
                .filter(|amount| *amount > Decimal::ZERO),
            "total outstanding",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::split::Split;
    use rust_decimal_macros::dec;

    fn members() -> Vec<Member> {
        vec![Member::new("a", "Alice"), Member::new("b", "Bob")]
    }

    fn half_and_half(amount: Decimal) -> Expense {
        Expense::new(
            MemberId::new("a"),
            amount,
            vec![
                Split::new(MemberId::new("a"), amount / dec!(2)),
                Split::new(MemberId::new("b"), amount / dec!(2)),
            ],
        )
    }

    #[test]
    fn test_ledger_basic() {
        let mut ledger = Ledger::for_members(&members()).unwrap();
        ledger.apply_expense(&half_and_half(dec!(100))).unwrap();

        assert_eq!(ledger.position(&MemberId::new("a")), Some(dec!(50)));
        assert_eq!(ledger.position(&MemberId::new("b")), Some(dec!(-50)));
        assert!(ledger.is_balanced());
        assert_eq!(ledger.total_outstanding(), Ok(dec!(50)));
    }

    #[test]
    fn test_duplicate_member() {
        let mut list = members();
        list.push(Member::new("a", "Another Alice"));
        assert_eq!(
            Ledger::for_members(&list).unwrap_err(),
            SplitError::DuplicateMember(MemberId::new("a"))
        );
    }

    #[test]
    fn test_paid_split_is_not_debited() {
        let mut ledger = Ledger::for_members(&members()).unwrap();
        let mut expense = half_and_half(dec!(100));
        expense.mark_split_paid(&MemberId::new("b"));
        ledger.apply_expense(&expense).unwrap();

        assert_eq!(ledger.position(&MemberId::new("b")), Some(Decimal::ZERO));
        assert_eq!(ledger.position(&MemberId::new("a")), Some(Decimal::ZERO));
        assert!(ledger.is_balanced());
    }

    #[test]
    fn test_confirmed_settlement_moves_balances() {
        let mut ledger = Ledger::for_members(&members()).unwrap();
        ledger.apply_expense(&half_and_half(dec!(100))).unwrap();

        let pending = Settlement::new(MemberId::new("b"), MemberId::new("a"), dec!(20));
        assert!(!ledger.apply_settlement(&pending).unwrap());
        assert_eq!(ledger.position(&MemberId::new("b")), Some(dec!(-50)));

        let confirmed = Settlement::confirmed(MemberId::new("b"), MemberId::new("a"), dec!(20));
        assert!(ledger.apply_settlement(&confirmed).unwrap());
        assert_eq!(ledger.position(&MemberId::new("b")), Some(dec!(-30)));
        assert_eq!(ledger.position(&MemberId::new("a")), Some(dec!(30)));
    }

    #[test]
    fn test_rejected_expense_leaves_ledger_untouched() {
        let mut ledger = Ledger::for_members(&members()).unwrap();
        let expense = Expense::new(
            MemberId::new("a"),
            dec!(100),
            vec![
                Split::new(MemberId::new("a"), dec!(50)),
                Split::new(MemberId::new("ghost"), dec!(50)),
            ],
        );
        let err = ledger.apply_expense(&expense).unwrap_err();
        assert!(matches!(err, SplitError::UnknownMember { .. }));
        assert_eq!(ledger.position(&MemberId::new("a")), Some(Decimal::ZERO));
    }

    #[test]
    fn test_split_sum_mismatch() {
        let mut ledger = Ledger::for_members(&members()).unwrap();
        let expense = Expense::new(
            MemberId::new("a"),
            dec!(100),
            vec![Split::new(MemberId::new("b"), dec!(60))],
        );
        assert!(matches!(
            ledger.apply_expense(&expense),
            Err(SplitError::SplitSumMismatch { .. })
        ));
    }

    fn owed_by_b(amount: Decimal) -> Expense {
        Expense::new(
            MemberId::new("a"),
            amount,
            vec![Split::new(MemberId::new("b"), amount)],
        )
    }

    #[test]
    fn test_overflow_is_an_error() {
        let mut ledger = Ledger::for_members(&members()).unwrap();
        let huge = Decimal::MAX - dec!(10);
        ledger.apply_expense(&owed_by_b(huge)).unwrap();

        let err = ledger.apply_expense(&owed_by_b(huge)).unwrap_err();
        assert!(matches!(err, SplitError::AmountOverflow { .. }));
        assert_eq!(ledger.position(&MemberId::new("a")), Some(huge));
        assert_eq!(ledger.position(&MemberId::new("b")), Some(-huge));

        let settlement = Settlement::confirmed(MemberId::new("a"), MemberId::new("b"), dec!(20));
        assert!(matches!(
            ledger.apply_settlement(&settlement),
            Err(SplitError::AmountOverflow { .. })
        ));
        assert_eq!(ledger.position(&MemberId::new("a")), Some(huge));
    }

    #[test]
    fn test_own_share_nets_before_overflow_check() {
        let mut ledger = Ledger::for_members(&members()).unwrap();
        let huge = Decimal::MAX - dec!(10);
        ledger.apply_expense(&owed_by_b(huge)).unwrap();

        // +100 and -100 on the same member never touch the limit.
        let own = Expense::new(
            MemberId::new("a"),
            dec!(100),
            vec![Split::new(MemberId::new("a"), dec!(100))],
        );
        ledger.apply_expense(&own).unwrap();
        assert_eq!(ledger.position(&MemberId::new("a")), Some(huge));
    }

    #[test]
    fn test_negative_split_rejected() {
        let mut ledger = Ledger::for_members(&members()).unwrap();
        let expense = Expense::new(
            MemberId::new("a"),
            dec!(10),
            vec![
                Split::new(MemberId::new("a"), dec!(20)),
                Split::new(MemberId::new("b"), dec!(-10)),
            ],
        );
        assert!(matches!(
            ledger.apply_expense(&expense),
            Err(SplitError::InvalidAmount { .. })
        ));
    }
}

use crate::core::error::SplitError;
use crate::core::expense::Expense;
use crate::core::member::{Member, MemberId};
use crate::core::settlement::{Settlement, Transaction};
use crate::optimization::balances::{compute_balances, Balance};
use crate::optimization::optimizer::optimize_settlements;
use crate::optimization::plan::SettlementPlan;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The state a group of members shares: who is in it, what was spent and
/// what has been paid back.
///
/// A `Group` is built explicitly and handed to whatever needs it. Balances
/// and proposed transfers are never stored here; every query recomputes them
/// from the current collections.
///
/// # Examples
///
/// ```
/// use split_engine::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let mut group = Group::new("Flat 3B");
/// group.add_member(Member::new("a", "Alice")).unwrap();
/// group.add_member(Member::new("b", "Bob")).unwrap();
///
/// let ids = vec![MemberId::new("a"), MemberId::new("b")];
/// group
///     .add_expense(Expense::new(MemberId::new("a"), dec!(100), equal_splits(dec!(100), &ids).unwrap()))
///     .unwrap();
///
/// let txs = group.suggested_transactions().unwrap();
/// assert_eq!(txs.len(), 1);
/// assert_eq!(txs[0].from, MemberId::new("b"));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    members: Vec<Member>,
    expenses: Vec<Expense>,
    settlements: Vec<Settlement>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Build a group from existing collections, checking member ids are unique.
    pub fn from_parts(
        name: impl Into<String>,
        members: Vec<Member>,
        expenses: Vec<Expense>,
        settlements: Vec<Settlement>,
    ) -> Result<Self, SplitError> {
        let mut group = Self::new(name);
        for member in members {
            group.add_member(member)?;
        }
        group.expenses = expenses;
        group.settlements = settlements;
        Ok(group)
    }

    pub fn add_member(&mut self, member: Member) -> Result<(), SplitError> {
        if self.member(&member.id).is_some() {
            return Err(SplitError::DuplicateMember(member.id));
        }
        self.members.push(member);
        Ok(())
    }

    pub fn member(&self, id: &MemberId) -> Option<&Member> {
        self.members.iter().find(|m| &m.id == id)
    }

    /// Record an expense after checking every member it names belongs to the
    /// group. Returns the expense id.
    pub fn add_expense(&mut self, expense: Expense) -> Result<Uuid, SplitError> {
        self.require_member(expense.paid_by(), "payer")?;
        for split in expense.splits() {
            self.require_member(&split.member_id, "split")?;
        }
        let id = expense.id();
        self.expenses.push(expense);
        Ok(id)
    }

    pub fn delete_expense(&mut self, id: Uuid) -> Result<Expense, SplitError> {
        let pos = self
            .expenses
            .iter()
            .position(|e| e.id() == id)
            .ok_or(SplitError::UnknownExpense(id))?;
        Ok(self.expenses.remove(pos))
    }

    /// Mark one member's share of an expense as paid back.
    pub fn mark_split_paid(&mut self, expense_id: Uuid, member: &MemberId) -> Result<bool, SplitError> {
        let expense = self
            .expenses
            .iter_mut()
            .find(|e| e.id() == expense_id)
            .ok_or(SplitError::UnknownExpense(expense_id))?;
        Ok(expense.mark_split_paid(member))
    }

    pub fn add_settlement(&mut self, settlement: Settlement) -> Result<Uuid, SplitError> {
        self.require_member(settlement.from(), "settlement payer")?;
        self.require_member(settlement.to(), "settlement receiver")?;
        let id = settlement.id();
        self.settlements.push(settlement);
        Ok(id)
    }

    /// Record a proposed transfer as a pending settlement.
    pub fn record_transaction(&mut self, tx: &Transaction) -> Result<Uuid, SplitError> {
        self.add_settlement(Settlement::from_transaction(tx))
    }

    pub fn confirm_settlement(&mut self, id: Uuid) -> Result<(), SplitError> {
        let settlement = self
            .settlements
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or(SplitError::UnknownSettlement(id))?;
        settlement.confirm();
        log::debug!("confirmed settlement {}", id);
        Ok(())
    }

    fn require_member(&self, id: &MemberId, context: &str) -> Result<(), SplitError> {
        match self.member(id) {
            Some(_) => Ok(()),
            None => Err(SplitError::UnknownMember {
                context: context.to_string(),
                member: id.clone(),
            }),
        }
    }

    // --- Accessors ---

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn settlements(&self) -> &[Settlement] {
        &self.settlements
    }

    // --- Derived views ---

    pub fn balances(&self) -> Result<Vec<Balance>, SplitError> {
        compute_balances(&self.members, &self.expenses, &self.settlements)
    }

    pub fn suggested_transactions(&self) -> Result<Vec<Transaction>, SplitError> {
        Ok(optimize_settlements(&self.balances()?))
    }

    pub fn settlement_plan(&self) -> Result<SettlementPlan, SplitError> {
        SettlementPlan::build(&self.members, &self.expenses, &self.settlements)
    }
}

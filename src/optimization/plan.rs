use crate::core::error::SplitError;
use crate::core::expense::Expense;
use crate::core::member::Member;
use crate::core::money::{checked_sum, is_settled};
use crate::core::settlement::{Settlement, Transaction};
use crate::graph::debt_graph::DebtGraph;
use crate::optimization::balances::{compute_balances, Balance};
use crate::optimization::optimizer::optimize_settlements;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Balances, proposed transfers and summary figures for one group.
///
/// This is what a caller renders after any change to the group: run it
/// again from scratch, nothing here is updated incrementally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementPlan {
    balances: Vec<Balance>,
    transactions: Vec<Transaction>,
    /// Sum of every expense amount.
    total_spending: Decimal,
    /// Sum of positive balances (equal to sum of |negative| balances).
    total_outstanding: Decimal,
    /// Transfers needed if every pair settled directly.
    direct_transfer_count: usize,
}

impl SettlementPlan {
    /// Run the balance engine and the optimizer over a group's data.
    pub fn build(
        members: &[Member],
        expenses: &[Expense],
        settlements: &[Settlement],
    ) -> Result<Self, SplitError> {
        let balances = compute_balances(members, expenses, settlements)?;
        let transactions = optimize_settlements(&balances);
        let graph = DebtGraph::build(members, expenses, settlements)?;

        let total_spending = checked_sum(expenses.iter().map(|e| e.amount()), "total spending")?;
        let total_outstanding = checked_sum(
            balances
                .iter()
                .filter(|b| b.amount > Decimal::ZERO)
                .map(|b| b.amount),
            "total outstanding",
        )?;

        Ok(Self {
            balances,
            transactions,
            total_spending,
            total_outstanding,
            direct_transfer_count: graph.direct_transfers().len(),
        })
    }

    pub fn balances(&self) -> &[Balance] {
        &self.balances
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn total_spending(&self) -> Decimal {
        self.total_spending
    }

    pub fn total_outstanding(&self) -> Decimal {
        self.total_outstanding
    }

    pub fn direct_transfer_count(&self) -> usize {
        self.direct_transfer_count
    }

    /// Payments avoided by using the optimized plan.
    pub fn transfers_saved(&self) -> usize {
        self.direct_transfer_count
            .saturating_sub(self.transactions.len())
    }

    /// Share of direct transfers avoided, 0.0 to 1.0.
    pub fn savings_ratio(&self) -> f64 {
        if self.direct_transfer_count == 0 {
            return 0.0;
        }
        self.transfers_saved() as f64 / self.direct_transfer_count as f64
    }

    /// Nothing left to pay.
    pub fn is_settled(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Balances sum to zero, to within a cent.
    pub fn is_valid(&self) -> bool {
        checked_sum(self.balances.iter().map(|b| b.amount), "balance sum")
            .map(is_settled)
            .unwrap_or(false)
    }
}

impl std::fmt::Display for SettlementPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Settlement Plan ===")?;
        writeln!(f, "Total Spending:   {}", self.total_spending)?;
        writeln!(f, "Outstanding:      {}", self.total_outstanding)?;
        writeln!(f, "Direct Transfers: {}", self.direct_transfer_count)?;
        writeln!(f, "Optimized:        {}", self.transactions.len())?;
        writeln!(f, "Saved:            {:.1}%", self.savings_ratio() * 100.0)?;

        writeln!(f, "\nBalances:")?;
        for balance in &self.balances {
            let status = if balance.is_creditor() {
                "is owed"
            } else if balance.is_debtor() {
                "owes"
            } else {
                "settled"
            };
            writeln!(
                f,
                "  {:<15} {:>12}  [{}]",
                balance.name, balance.amount, status
            )?;
        }

        writeln!(f, "\nTransfers:")?;
        if self.transactions.is_empty() {
            writeln!(f, "  All settled up.")?;
        }
        for tx in &self.transactions {
            writeln!(f, "  {}", tx)?;
        }
        Ok(())
    }
}

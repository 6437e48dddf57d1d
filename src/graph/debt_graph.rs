use crate::core::error::SplitError;
use crate::core::expense::Expense;
use crate::core::ledger::Ledger;
use crate::core::member::{Member, MemberId};
use crate::core::money::{checked_sum, EPSILON};
use crate::core::settlement::Settlement;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// Direct "who owes whom" debts, before any optimization.
///
/// Every unpaid share of an expense becomes an edge from the member to the
/// payer. A confirmed settlement from X to Y becomes an edge from Y to X,
/// which offsets X's debt to Y. Shares a payer owes themselves are left out.
///
/// Settling edge by edge is what a group would do without the optimizer;
/// [`DebtGraph::direct_transfers`] counts those payments after pairwise
/// netting.
///
/// # Examples
///
/// ```
/// use split_engine::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let members = vec![Member::new("a", "Alice"), Member::new("b", "Bob")];
/// let dinner = Expense::new(
///     MemberId::new("a"),
///     dec!(100),
///     vec![
///         Split::new(MemberId::new("a"), dec!(50)),
///         Split::new(MemberId::new("b"), dec!(50)),
///     ],
/// );
///
/// let graph = DebtGraph::build(&members, &[dinner], &[]).unwrap();
/// assert_eq!(graph.edge_amount(&MemberId::new("b"), &MemberId::new("a")), dec!(50));
/// assert_eq!(graph.direct_transfers().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DebtGraph {
    members: Vec<MemberId>,
    /// Aggregated edges: (debtor, creditor) -> total amount
    edges: HashMap<(MemberId, MemberId), Decimal>,
}

impl DebtGraph {
    /// Build the graph from the same inputs the balance engine takes.
    ///
    /// Entries are validated by a [`Ledger`] first, so the graph accepts and
    /// rejects exactly what [`compute_balances`](crate::optimization::balances::compute_balances)
    /// does.
    pub fn build(
        members: &[Member],
        expenses: &[Expense],
        settlements: &[Settlement],
    ) -> Result<Self, SplitError> {
        let mut ledger = Ledger::for_members(members)?;
        let mut graph = Self {
            members: members.iter().map(|m| m.id.clone()).collect(),
            edges: HashMap::new(),
        };

        for expense in expenses {
            ledger.apply_expense(expense)?;
            for split in expense.splits() {
                if split.paid || &split.member_id == expense.paid_by() {
                    continue;
                }
                graph.add_edge(&split.member_id, expense.paid_by(), split.amount)?;
            }
        }

        for settlement in settlements {
            if ledger.apply_settlement(settlement)? {
                graph.add_edge(settlement.to(), settlement.from(), settlement.amount())?;
            }
        }

        Ok(graph)
    }

    fn add_edge(&mut self, debtor: &MemberId, creditor: &MemberId, amount: Decimal) -> Result<(), SplitError> {
        if debtor == creditor || amount == Decimal::ZERO {
            return Ok(());
        }
        let edge = self
            .edges
            .entry((debtor.clone(), creditor.clone()))
            .or_insert(Decimal::ZERO);
        *edge = edge
            .checked_add(amount)
            .ok_or_else(|| SplitError::AmountOverflow {
                context: format!("debt from {} to {}", debtor, creditor),
            })?;
        Ok(())
    }

    /// Number of members in the graph.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Number of distinct directed edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Gross amount `debtor` owes `creditor` directly.
    pub fn edge_amount(&self, debtor: &MemberId, creditor: &MemberId) -> Decimal {
        self.edges
            .get(&(debtor.clone(), creditor.clone()))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Gross total of all direct debts.
    pub fn gross_total(&self) -> Result<Decimal, SplitError> {
        checked_sum(self.edges.values().copied(), "gross debt total")
    }

    /// Net amount between two members: positive means `a` owes `b`.
    pub fn bilateral_net(&self, a: &MemberId, b: &MemberId) -> Decimal {
        self.edge_amount(a, b) - self.edge_amount(b, a)
    }

    /// Payments needed if every pair settles directly after offsetting
    /// what they owe each other. Pairs within a cent are dropped.
    ///
    /// Ordered by debtor, then creditor.
    pub fn direct_transfers(&self) -> Vec<(MemberId, MemberId, Decimal)> {
        let mut pairs: BTreeMap<(MemberId, MemberId), Decimal> = BTreeMap::new();
        for ((debtor, creditor), amount) in &self.edges {
            let key = if debtor < creditor {
                (debtor.clone(), creditor.clone())
            } else {
                (creditor.clone(), debtor.clone())
            };
            let signed = if debtor < creditor { *amount } else { -*amount };
            *pairs.entry(key).or_insert(Decimal::ZERO) += signed;
        }

        let mut transfers: Vec<(MemberId, MemberId, Decimal)> = pairs
            .into_iter()
            .filter(|(_, net)| net.abs() >= EPSILON)
            .map(|((a, b), net)| {
                if net > Decimal::ZERO {
                    (a, b, net)
                } else {
                    (b, a, -net)
                }
            })
            .collect();
        transfers.sort_by(|x, y| (&x.0, &x.1).cmp(&(&y.0, &y.1)));
        transfers
    }

    /// Net position per member implied by the edges, in member order.
    pub fn net_positions(&self) -> Result<Vec<(MemberId, Decimal)>, SplitError> {
        self.members
            .iter()
            .map(|m| {
                let owed = checked_sum(
                    self.edges
                        .iter()
                        .filter(|((_, creditor), _)| creditor == m)
                        .map(|(_, amount)| *amount),
                    "net position",
                )?;
                let owing = checked_sum(
                    self.edges
                        .iter()
                        .filter(|((debtor, _), _)| debtor == m)
                        .map(|(_, amount)| *amount),
                    "net position",
                )?;
                Ok((m.clone(), owed - owing))
            })
            .collect()
    }
}

use crate::core::error::SplitError;
use crate::core::member::MemberId;
use crate::core::money::checked_sum;
use crate::core::split::Split;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A shared expense: one member paid `amount`, and `splits` say how much of
/// it each member is responsible for.
///
/// The splits are expected to sum to `amount`. Construction does not check
/// this; the balance engine does, before the expense touches any balance.
///
/// # Examples
///
/// ```
/// use split_engine::core::expense::Expense;
/// use split_engine::core::member::MemberId;
/// use split_engine::core::split::Split;
/// use rust_decimal_macros::dec;
///
/// let dinner = Expense::new(
///     MemberId::new("alice"),
///     dec!(100),
///     vec![
///         Split::new(MemberId::new("alice"), dec!(50)),
///         Split::new(MemberId::new("bob"), dec!(50)),
///     ],
/// )
/// .with_title("Dinner");
///
/// assert_eq!(dinner.split_total().unwrap(), dec!(100));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    id: Uuid,
    title: String,
    category: Option<String>,
    amount: Decimal,
    paid_by: MemberId,
    splits: Vec<Split>,
    date: Option<NaiveDate>,
    receipt: Option<String>,
    created_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(paid_by: MemberId, amount: Decimal, splits: Vec<Split>) -> Self {
        Self::with_id(Uuid::new_v4(), paid_by, amount, splits)
    }

    /// Create an expense with a specific ID (useful for testing / determinism).
    pub fn with_id(id: Uuid, paid_by: MemberId, amount: Decimal, splits: Vec<Split>) -> Self {
        Self {
            id,
            title: String::new(),
            category: None,
            amount,
            paid_by,
            splits,
            date: None,
            receipt: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Attach a receipt reference (a path or URL, never interpreted).
    pub fn with_receipt(mut self, receipt: impl Into<String>) -> Self {
        self.receipt = Some(receipt.into());
        self
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn paid_by(&self) -> &MemberId {
        &self.paid_by
    }

    pub fn splits(&self) -> &[Split] {
        &self.splits
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn receipt(&self) -> Option<&str> {
        self.receipt.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Sum of all split amounts, paid or not.
    pub fn split_total(&self) -> Result<Decimal, SplitError> {
        checked_sum(self.splits.iter().map(|s| s.amount), "split total")
    }

    /// Sum of the shares that have not been paid back yet.
    pub fn outstanding_total(&self) -> Result<Decimal, SplitError> {
        checked_sum(self.splits.iter().map(Split::outstanding), "outstanding total")
    }

    /// Mark the given member's share as paid. Returns false if the member
    /// has no unpaid share in this expense.
    pub fn mark_split_paid(&mut self, member: &MemberId) -> bool {
        match self
            .splits
            .iter_mut()
            .find(|s| &s.member_id == member && !s.paid)
        {
            Some(split) => {
                split.paid = true;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn groceries() -> Expense {
        Expense::new(
            MemberId::new("bob"),
            dec!(85.50),
            vec![
                Split::new(MemberId::new("alice"), dec!(28.50)),
                Split::new(MemberId::new("bob"), dec!(28.50)),
                Split::new(MemberId::new("charlie"), dec!(28.50)),
            ],
        )
        .with_title("Groceries")
        .with_category("Groceries")
    }

    #[test]
    fn test_expense_creation() {
        let ex = groceries();
        assert_eq!(ex.paid_by().as_str(), "bob");
        assert_eq!(ex.amount(), dec!(85.50));
        assert_eq!(ex.title(), "Groceries");
        assert_eq!(ex.category(), Some("Groceries"));
        assert_eq!(ex.splits().len(), 3);
    }

    #[test]
    fn test_split_totals() {
        let mut ex = groceries();
        assert_eq!(ex.split_total(), Ok(dec!(85.50)));
        assert!(ex.mark_split_paid(&MemberId::new("alice")));
        assert_eq!(ex.split_total(), Ok(dec!(85.50)));
        assert_eq!(ex.outstanding_total(), Ok(dec!(57.00)));
    }

    #[test]
    fn test_split_total_overflow() {
        let ex = Expense::new(
            MemberId::new("a"),
            Decimal::MAX,
            vec![
                Split::new(MemberId::new("a"), Decimal::MAX),
                Split::new(MemberId::new("b"), Decimal::MAX),
            ],
        );
        assert!(matches!(
            ex.split_total(),
            Err(SplitError::AmountOverflow { .. })
        ));
    }

    #[test]
    fn test_mark_split_paid_unknown_member() {
        let mut ex = groceries();
        assert!(!ex.mark_split_paid(&MemberId::new("diana")));
    }

    #[test]
    fn test_with_id_is_deterministic() {
        let id = Uuid::nil();
        let ex = Expense::with_id(id, MemberId::new("a"), dec!(1), vec![]);
        assert_eq!(ex.id(), id);
    }
}

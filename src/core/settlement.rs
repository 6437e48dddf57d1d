use crate::core::member::MemberId;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Whether a recorded payment has been acknowledged by both sides.
///
/// Only confirmed settlements move balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    #[default]
    Pending,
    Confirmed,
}

/// A payment of `amount` from `from` to `to`, recorded by the group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    id: Uuid,
    from: MemberId,
    to: MemberId,
    amount: Decimal,
    status: SettlementStatus,
    date: Option<NaiveDate>,
    proof: Option<String>,
    created_at: DateTime<Utc>,
}

impl Settlement {
    /// Record a new, pending settlement.
    pub fn new(from: MemberId, to: MemberId, amount: Decimal) -> Self {
        Self::with_id(Uuid::new_v4(), from, to, amount)
    }

    pub fn with_id(id: Uuid, from: MemberId, to: MemberId, amount: Decimal) -> Self {
        Self {
            id,
            from,
            to,
            amount,
            status: SettlementStatus::Pending,
            date: None,
            proof: None,
            created_at: Utc::now(),
        }
    }

    /// Record a settlement that both sides already agree on.
    pub fn confirmed(from: MemberId, to: MemberId, amount: Decimal) -> Self {
        let mut s = Self::new(from, to, amount);
        s.confirm();
        s
    }

    /// Turn a proposed transfer into a pending settlement.
    pub fn from_transaction(tx: &Transaction) -> Self {
        Self::new(tx.from.clone(), tx.to.clone(), tx.amount)
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_proof(mut self, proof: impl Into<String>) -> Self {
        self.proof = Some(proof.into());
        self
    }

    pub fn confirm(&mut self) {
        self.status = SettlementStatus::Confirmed;
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn from(&self) -> &MemberId {
        &self.from
    }

    pub fn to(&self) -> &MemberId {
        &self.to
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn status(&self) -> SettlementStatus {
        self.status
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == SettlementStatus::Confirmed
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn proof(&self) -> Option<&str> {
        self.proof.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A payment proposed by the optimizer. Not part of any ledger until the
/// group records it as a [`Settlement`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Decimal,
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.from, self.to, self.amount)
    }
}

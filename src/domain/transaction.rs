use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{round_cents, MonthKey};

/// Direction of money flow for a recorded entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Expense,
    Income,
}

impl EntryKind {
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::Expense => "expense",
            EntryKind::Income => "income",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: EntryKind,
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_id: Option<Uuid>,
}

impl Transaction {
    pub fn new(
        kind: EntryKind,
        amount: f64,
        category: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            amount: round_cents(amount),
            category: category.into(),
            description: description.into(),
            date,
            recurring_id: None,
        }
    }

    pub fn expense(
        amount: f64,
        category: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self::new(EntryKind::Expense, amount, category, description, date)
    }

    pub fn income(
        amount: f64,
        category: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self::new(EntryKind::Income, amount, category, description, date)
    }

    pub fn from_recurring(mut self, recurring_id: Uuid) -> Self {
        self.recurring_id = Some(recurring_id);
        self
    }

    pub fn is_expense(&self) -> bool {
        self.kind == EntryKind::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == EntryKind::Income
    }

    pub fn in_month(&self, month: MonthKey) -> bool {
        month.contains(self.date)
    }

    /// Amount with sign applied: income positive, expenses negative.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            EntryKind::Income => self.amount,
            EntryKind::Expense => -self.amount,
        }
    }
}

/// Sums the amounts of entries of the given kind falling in `month`.
pub fn total_for_month<'a, I>(transactions: I, kind: EntryKind, month: MonthKey) -> f64
where
    I: IntoIterator<Item = &'a Transaction>,
{
    round_cents(
        transactions
            .into_iter()
            .filter(|txn| txn.kind == kind && txn.in_month(month))
            .map(|txn| txn.amount)
            .sum(),
    )
}

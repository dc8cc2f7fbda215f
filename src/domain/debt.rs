use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{from_cents, to_cents, MonthKey};

/// Who owes whom.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DebtDirection {
    /// Money borrowed from the counterparty.
    Payable,
    /// Money lent to the counterparty.
    Receivable,
}

impl DebtDirection {
    pub fn label(&self) -> &'static str {
        match self {
            DebtDirection::Payable => "I owe",
            DebtDirection::Receivable => "owed to me",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Installment {
    pub index: usize,
    pub due_date: NaiveDate,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_on: Option<NaiveDate>,
}

impl Installment {
    pub fn is_paid(&self) -> bool {
        self.paid_on.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Debt {
    pub id: Uuid,
    pub counterparty: String,
    pub direction: DebtDirection,
    pub principal: f64,
    pub created_on: NaiveDate,
    #[serde(default)]
    pub installments: Vec<Installment>,
}

impl Debt {
    pub fn new(
        counterparty: impl Into<String>,
        direction: DebtDirection,
        principal: f64,
        created_on: NaiveDate,
        installments: Vec<Installment>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            counterparty: counterparty.into(),
            direction,
            principal,
            created_on,
            installments,
        }
    }

    /// Sum of unpaid installments.
    pub fn outstanding(&self) -> f64 {
        from_cents(self.outstanding_cents())
    }

    pub(crate) fn outstanding_cents(&self) -> i64 {
        self.installments
            .iter()
            .filter(|item| !item.is_paid())
            .map(|item| to_cents(item.amount))
            .sum()
    }

    pub fn paid_total(&self) -> f64 {
        from_cents(
            self.installments
                .iter()
                .filter(|item| item.is_paid())
                .map(|item| to_cents(item.amount))
                .sum(),
        )
    }

    pub fn next_unpaid(&self) -> Option<&Installment> {
        self.installments.iter().find(|item| !item.is_paid())
    }

    pub fn is_settled(&self) -> bool {
        self.installments.iter().all(Installment::is_paid)
    }

    /// Unpaid installments falling due within `month`.
    pub fn due_in(&self, month: MonthKey) -> impl Iterator<Item = &Installment> {
        self.installments
            .iter()
            .filter(move |item| !item.is_paid() && month.contains(item.due_date))
    }
}

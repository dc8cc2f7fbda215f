use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    common::{round_cents, shift_month},
    transaction::{EntryKind, Transaction},
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "day" | "daily" => Some(Frequency::Daily),
            "week" | "weekly" => Some(Frequency::Weekly),
            "month" | "monthly" => Some(Frequency::Monthly),
            "year" | "yearly" | "annual" | "annually" => Some(Frequency::Yearly),
            _ => None,
        }
    }

    pub fn next_date(&self, from: NaiveDate) -> NaiveDate {
        let next = match self {
            Frequency::Daily => from.checked_add_signed(Duration::days(1)),
            Frequency::Weekly => from.checked_add_signed(Duration::weeks(1)),
            Frequency::Monthly => shift_month(from, 1),
            Frequency::Yearly => shift_month(from, 12),
        };
        next.unwrap_or(NaiveDate::MAX)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }
}

/// A charge or income that repeats on a fixed schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurringCharge {
    pub id: Uuid,
    pub description: String,
    pub amount: f64,
    pub kind: EntryKind,
    pub category: String,
    pub frequency: Frequency,
    /// Original schedule anchor; month-end days are re-derived from it.
    pub anchor: NaiveDate,
    pub next_due: NaiveDate,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl RecurringCharge {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        kind: EntryKind,
        category: impl Into<String>,
        frequency: Frequency,
        first_due: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            amount: round_cents(amount),
            kind,
            category: category.into(),
            frequency,
            anchor: first_due,
            next_due: first_due,
            active: true,
        }
    }

    /// Moves `next_due` one period forward and returns the date that was due.
    pub fn advance(&mut self) -> NaiveDate {
        let due = self.next_due;
        self.next_due = self.following(due);
        due
    }

    fn following(&self, due: NaiveDate) -> NaiveDate {
        match self.frequency {
            Frequency::Monthly | Frequency::Yearly => {
                // Step from the anchor so a 31st does not drift to the 28th forever.
                let step = if self.frequency == Frequency::Monthly { 1 } else { 12 };
                let mut candidate = self.anchor;
                while candidate <= due {
                    let months = months_between(self.anchor, candidate) + step;
                    let Some(next) = shift_month(self.anchor, months) else {
                        return NaiveDate::MAX;
                    };
                    candidate = next;
                }
                candidate
            }
            _ => self.frequency.next_date(due),
        }
    }

    /// Due dates in `start..=end`, starting from `next_due`.
    pub fn occurrences_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        if !self.active {
            return dates;
        }
        let mut due = self.next_due;
        while due <= end {
            if due >= start {
                dates.push(due);
            }
            let next = self.following(due);
            if next <= due {
                break;
            }
            due = next;
        }
        dates
    }

    pub fn to_transaction(&self, date: NaiveDate) -> Transaction {
        Transaction::new(
            self.kind,
            self.amount,
            self.category.clone(),
            self.description.clone(),
            date,
        )
        .from_recurring(self.id)
    }
}

fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    use chrono::Datelike;
    (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32
}

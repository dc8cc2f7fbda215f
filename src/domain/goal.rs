use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::round_cents;

/// A savings target the user contributes towards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    pub id: Uuid,
    pub name: String,
    pub target: f64,
    #[serde(default)]
    pub saved: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub contributions: Vec<Contribution>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contribution {
    pub amount: f64,
    pub date: NaiveDate,
}

impl Goal {
    pub fn new(name: impl Into<String>, target: f64, deadline: Option<NaiveDate>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            target: round_cents(target),
            saved: 0.0,
            deadline,
            contributions: Vec::new(),
        }
    }

    pub fn contribute(&mut self, amount: f64, date: NaiveDate) {
        let amount = round_cents(amount);
        self.saved = round_cents(self.saved + amount);
        self.contributions.push(Contribution { amount, date });
    }

    /// Fraction of the target reached, clamped to `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.target <= 0.0 {
            return 1.0;
        }
        (self.saved / self.target).clamp(0.0, 1.0)
    }

    pub fn remaining(&self) -> f64 {
        round_cents((self.target - self.saved).max(0.0))
    }

    pub fn is_complete(&self) -> bool {
        self.saved + 0.005 >= self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contributions_accumulate_and_clamp_progress() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut goal = Goal::new("Vacation", 1000.0, None);
        goal.contribute(250.0, date);
        assert_eq!(goal.progress(), 0.25);
        assert_eq!(goal.remaining(), 750.0);
        goal.contribute(900.0, date);
        assert_eq!(goal.progress(), 1.0);
        assert_eq!(goal.remaining(), 0.0);
        assert!(goal.is_complete());
        assert_eq!(goal.contributions.len(), 2);
    }
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::round_cents;

/// A spending guardrail for a specific category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub id: Uuid,
    pub category: String,
    pub limit: f64,
    #[serde(default)]
    pub period: BudgetPeriod,
}

impl Budget {
    pub fn new(category: impl Into<String>, limit: f64, period: BudgetPeriod) -> Self {
        Self {
            id: Uuid::new_v4(),
            category: category.into(),
            limit: round_cents(limit),
            period,
        }
    }

    /// Limit normalized to a calendar month.
    pub fn monthly_limit(&self) -> f64 {
        round_cents(self.limit * self.period.monthly_factor())
    }

    pub fn matches(&self, category: &str) -> bool {
        self.category.eq_ignore_ascii_case(category)
    }
}

/// Enumeration of budgeting periods.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPeriod {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl BudgetPeriod {
    pub fn monthly_factor(&self) -> f64 {
        match self {
            BudgetPeriod::Weekly => 52.0 / 12.0,
            BudgetPeriod::Monthly => 1.0,
            BudgetPeriod::Yearly => 1.0 / 12.0,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "weekly" | "week" => Some(BudgetPeriod::Weekly),
            "monthly" | "month" => Some(BudgetPeriod::Monthly),
            "yearly" | "year" | "annual" | "annually" => Some(BudgetPeriod::Yearly),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BudgetPeriod::Weekly => "weekly",
            BudgetPeriod::Monthly => "monthly",
            BudgetPeriod::Yearly => "yearly",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monthly_limit_normalizes_periods() {
        assert_eq!(
            Budget::new("Dining", 100.0, BudgetPeriod::Weekly).monthly_limit(),
            433.33
        );
        assert_eq!(
            Budget::new("Travel", 1200.0, BudgetPeriod::Yearly).monthly_limit(),
            100.0
        );
    }
}

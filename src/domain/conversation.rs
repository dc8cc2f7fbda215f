use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    budget::Budget,
    common::MonthKey,
    debt::Debt,
    goal::Goal,
    recurring::RecurringCharge,
    rule::BudgetRule,
    transaction::Transaction,
};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// An isolated, named dataset: one household budget, one what-if plan, etc.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conversation {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Conversation::schema_version_default")]
    pub schema_version: u8,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub debts: Vec<Debt>,
    #[serde(default)]
    pub recurring: Vec<RecurringCharge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<BudgetRule>,
}

impl Conversation {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
            transactions: Vec::new(),
            budgets: Vec::new(),
            goals: Vec::new(),
            debts: Vec::new(),
            recurring: Vec::new(),
            rule: None,
        }
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> Uuid {
        let id = transaction.id;
        self.transactions.push(transaction);
        self.touch();
        id
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn remove_transaction(&mut self, id: Uuid) -> Option<Transaction> {
        let index = self.transactions.iter().position(|txn| txn.id == id)?;
        let removed = self.transactions.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn transactions_in(&self, month: MonthKey) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(move |txn| txn.in_month(month))
    }

    pub fn budget_for(&self, category: &str) -> Option<&Budget> {
        self.budgets.iter().find(|budget| budget.matches(category))
    }

    pub fn budget_for_mut(&mut self, category: &str) -> Option<&mut Budget> {
        self.budgets
            .iter_mut()
            .find(|budget| budget.matches(category))
    }

    pub fn goal(&self, id: Uuid) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id)
    }

    pub fn goal_mut(&mut self, id: Uuid) -> Option<&mut Goal> {
        self.goals.iter_mut().find(|goal| goal.id == id)
    }

    pub fn goal_by_name(&self, name: &str) -> Option<&Goal> {
        self.goals
            .iter()
            .find(|goal| goal.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn debt_mut(&mut self, id: Uuid) -> Option<&mut Debt> {
        self.debts.iter_mut().find(|debt| debt.id == id)
    }

    pub fn recurring_mut(&mut self, id: Uuid) -> Option<&mut RecurringCharge> {
        self.recurring.iter_mut().find(|charge| charge.id == id)
    }

    /// Distinct months that have at least one recorded entry, oldest first.
    pub fn tracked_months(&self) -> Vec<MonthKey> {
        let mut months: Vec<MonthKey> = self
            .transactions
            .iter()
            .map(|txn| MonthKey::of(txn.date))
            .collect();
        months.sort();
        months.dedup();
        months
    }

    pub fn goal_savings(&self) -> f64 {
        self.goals.iter().map(|goal| goal.saved).sum()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn tracked_months_are_sorted_and_unique() {
        let mut conversation = Conversation::new("Home");
        for (month, day) in [(3, 1), (1, 5), (3, 9)] {
            let date = NaiveDate::from_ymd_opt(2024, month, day).unwrap();
            conversation.add_transaction(Transaction::expense(1.0, "Other", "x", date));
        }
        assert_eq!(
            conversation.tracked_months(),
            vec![
                MonthKey::new(2024, 1).unwrap(),
                MonthKey::new(2024, 3).unwrap()
            ]
        );
    }

    #[test]
    fn remove_transaction_returns_entry() {
        let mut conversation = Conversation::new("Home");
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let id = conversation.add_transaction(Transaction::expense(4.0, "Dining", "tea", date));
        let removed = conversation.remove_transaction(id).expect("removed");
        assert_eq!(removed.id, id);
        assert!(conversation.transaction(id).is_none());
    }
}

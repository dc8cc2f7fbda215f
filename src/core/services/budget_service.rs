use crate::domain::{
    common::{from_cents, round_cents, to_cents},
    Budget, BudgetPeriod, Conversation, MonthKey,
};

use super::{ensure_positive, ServiceError, ServiceResult};

pub struct BudgetService;

impl BudgetService {
    /// Creates or replaces the budget for `category`. Returns `true` when one was replaced.
    pub fn set(
        conversation: &mut Conversation,
        category: &str,
        limit: f64,
        period: BudgetPeriod,
    ) -> ServiceResult<bool> {
        ensure_positive(limit, "budget limit")?;
        let category = category.trim();
        if category.is_empty() {
            return Err(ServiceError::Invalid("budget needs a category".into()));
        }
        let replaced = match conversation.budget_for_mut(category) {
            Some(budget) => {
                budget.limit = round_cents(limit);
                budget.period = period;
                true
            }
            None => {
                conversation
                    .budgets
                    .push(Budget::new(category, limit, period));
                false
            }
        };
        conversation.touch();
        Ok(replaced)
    }

    pub fn remove(conversation: &mut Conversation, category: &str) -> ServiceResult<Budget> {
        let index = conversation
            .budgets
            .iter()
            .position(|budget| budget.matches(category))
            .ok_or_else(|| ServiceError::NotFound(format!("No budget for `{}`", category)))?;
        let removed = conversation.budgets.remove(index);
        conversation.touch();
        Ok(removed)
    }

    /// Expenses booked against `category` during `month`.
    pub fn spent_in_month(conversation: &Conversation, category: &str, month: MonthKey) -> f64 {
        from_cents(
            conversation
                .transactions_in(month)
                .filter(|txn| txn.is_expense() && txn.category.eq_ignore_ascii_case(category))
                .map(|txn| to_cents(txn.amount))
                .sum(),
        )
    }
}

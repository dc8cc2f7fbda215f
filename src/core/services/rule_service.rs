use crate::domain::{transaction::total_for_month, BudgetRule, Conversation, EntryKind, MonthKey};
use crate::finance::rules::{allocate, compare, BucketStatus, RuleAllocation};

use super::{ensure_positive, ServiceResult};

pub struct RuleService;

impl RuleService {
    /// Sets the conversation's rule, returning the one it replaced.
    pub fn set(conversation: &mut Conversation, rule: BudgetRule) -> Option<BudgetRule> {
        let previous = conversation.rule.replace(rule);
        conversation.touch();
        previous
    }

    /// The conversation's own rule, or `fallback` when it has none.
    pub fn effective(conversation: &Conversation, fallback: &BudgetRule) -> BudgetRule {
        conversation.rule.clone().unwrap_or_else(|| fallback.clone())
    }

    /// Allocates `income`, or the month's recorded income when none is given,
    /// and compares it with the month's spending.
    pub fn allocation(
        conversation: &Conversation,
        month: MonthKey,
        fallback: &BudgetRule,
        income: Option<f64>,
    ) -> ServiceResult<(RuleAllocation, Vec<BucketStatus>)> {
        let income = match income {
            Some(amount) => {
                ensure_positive(amount, "income")?;
                amount
            }
            None => total_for_month(&conversation.transactions, EntryKind::Income, month),
        };
        let allocation = allocate(income, &Self::effective(conversation, fallback));
        let statuses = compare(&allocation, conversation.transactions_in(month));
        Ok((allocation, statuses))
    }
}

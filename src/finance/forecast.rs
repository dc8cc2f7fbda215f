//! Month-end projection and goal completion estimates.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{
    common::{from_cents, round_cents, shift_month, to_cents},
    Conversation, DebtDirection, EntryKind, Goal, MonthKey,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub month: MonthKey,
    pub spent_to_date: f64,
    /// Average of one-off (non-recurring) spending per elapsed day.
    pub daily_average: f64,
    pub projected_spending: f64,
    pub scheduled_recurring: f64,
    pub scheduled_installments: f64,
    pub expected_income: f64,
    pub projected_net: f64,
}

/// Projects where the month containing `today` will end up.
pub fn month_end_forecast(conversation: &Conversation, today: NaiveDate) -> Forecast {
    let month = MonthKey::of(today);
    let month_end = month.last_day();
    let elapsed = i64::from(today.day());
    let remaining_days = i64::from(month.days()) - elapsed;

    let to_date = conversation
        .transactions_in(month)
        .filter(|txn| txn.date <= today);
    let (mut spent, mut one_off, mut earned) = (0i64, 0i64, 0i64);
    for txn in to_date {
        let cents = to_cents(txn.amount);
        match txn.kind {
            EntryKind::Expense => {
                spent += cents;
                if txn.recurring_id.is_none() {
                    one_off += cents;
                }
            }
            EntryKind::Income => earned += cents,
        }
    }
    let daily_average = from_cents(one_off) / elapsed as f64;
    let projected_spending =
        round_cents(from_cents(spent) + daily_average * remaining_days as f64);

    let tomorrow = today + Duration::days(1);
    let (mut recurring_out, mut recurring_in) = (0i64, 0i64);
    for charge in &conversation.recurring {
        let hits = charge.occurrences_between(tomorrow, month_end).len() as i64;
        match charge.kind {
            EntryKind::Expense => recurring_out += hits * to_cents(charge.amount),
            EntryKind::Income => recurring_in += hits * to_cents(charge.amount),
        }
    }
    let installments: i64 = conversation
        .debts
        .iter()
        .filter(|debt| debt.direction == DebtDirection::Payable)
        .flat_map(|debt| debt.due_in(month))
        .filter(|item| item.due_date >= tomorrow)
        .map(|item| to_cents(item.amount))
        .sum();

    let expected_income = from_cents(earned + recurring_in);
    let scheduled_recurring = from_cents(recurring_out);
    let scheduled_installments = from_cents(installments);
    Forecast {
        month,
        spent_to_date: from_cents(spent),
        daily_average: round_cents(daily_average),
        projected_spending,
        scheduled_recurring,
        scheduled_installments,
        expected_income,
        projected_net: round_cents(
            expected_income - projected_spending - scheduled_recurring - scheduled_installments,
        ),
    }
}

/// Estimated completion date from the goal's average monthly contribution.
///
/// `None` when nothing has been contributed yet, or when the pace puts the
/// date beyond the calendar.
pub fn goal_eta(goal: &Goal, today: NaiveDate) -> Option<NaiveDate> {
    if goal.is_complete() {
        return goal.contributions.last().map(|entry| entry.date).or(Some(today));
    }
    let first = goal.contributions.iter().map(|entry| entry.date).min()?;
    let start = MonthKey::of(first);
    let now = MonthKey::of(today);
    let span = (now.year - start.year) * 12 + now.month as i32 - start.month as i32 + 1;
    let total: i64 = goal
        .contributions
        .iter()
        .map(|entry| to_cents(entry.amount))
        .sum();
    if total <= 0 {
        return None;
    }
    let per_month = total as f64 / f64::from(span.max(1));
    let months = (to_cents(goal.remaining()) as f64 / per_month).ceil();
    if !months.is_finite() || months > f64::from(i32::MAX) {
        return None;
    }
    shift_month(today, months as i32)
}

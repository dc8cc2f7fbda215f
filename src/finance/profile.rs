//! Financial profile scoring.
//!
//! Three components are scored from 0 to 100 and blended into an overall
//! score:
//!
//! * **discipline**: staying inside budgets and saving part of income,
//! * **stability**: regular income, manageable debt, and a goal cushion,
//! * **maturity**: how much of the toolkit (budgets, goals, a rule, history)
//!   is actually in use.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    common::{from_cents, to_cents},
    transaction::total_for_month,
    Conversation, EntryKind, MonthKey,
};

use super::debt::monthly_obligation;

const TARGET_SAVINGS_RATE: f64 = 0.20;
const DTI_CEILING: f64 = 0.5;
const CUSHION_MONTHS: f64 = 3.0;
const MATURITY_HISTORY_MONTHS: f64 = 6.0;
const WEAK_COMPONENT: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfileTier {
    Beginner,
    Developing,
    Established,
    Advanced,
}

impl ProfileTier {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=39 => ProfileTier::Beginner,
            40..=59 => ProfileTier::Developing,
            60..=79 => ProfileTier::Established,
            _ => ProfileTier::Advanced,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProfileTier::Beginner => "Beginner",
            ProfileTier::Developing => "Developing",
            ProfileTier::Established => "Established",
            ProfileTier::Advanced => "Advanced",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialProfile {
    pub month: MonthKey,
    pub discipline: u8,
    pub stability: u8,
    pub maturity: u8,
    pub overall: u8,
    pub tier: ProfileTier,
    pub insights: Vec<String>,
}

/// Scores `conversation` as of the month containing `today`.
pub fn financial_profile(conversation: &Conversation, today: NaiveDate) -> FinancialProfile {
    let month = MonthKey::of(today);
    let income = total_for_month(&conversation.transactions, EntryKind::Income, month);
    let expenses = total_for_month(&conversation.transactions, EntryKind::Expense, month);

    let adherence = budget_adherence(conversation, month);
    let savings_rate = if income > 0.0 {
        ((income - expenses) / income).max(0.0)
    } else {
        0.0
    };
    let discipline = 0.6 * adherence + 0.4 * (savings_rate / TARGET_SAVINGS_RATE).min(1.0);

    let regularity = income_regularity(conversation, month);
    let obligations = monthly_obligation(&conversation.debts, month);
    let debt_health = if income > 0.0 {
        1.0 - (obligations / income / DTI_CEILING).min(1.0)
    } else if obligations > 0.0 {
        0.0
    } else {
        1.0
    };
    let goal_savings = conversation.goal_savings();
    let cushion = if expenses > 0.0 {
        (goal_savings / (CUSHION_MONTHS * expenses)).min(1.0)
    } else if goal_savings > 0.0 {
        1.0
    } else {
        0.0
    };
    let stability = 0.40 * regularity + 0.35 * debt_health + 0.25 * cushion;

    let tracked = conversation.tracked_months().len() as f64;
    let mean_progress = if conversation.goals.is_empty() {
        0.0
    } else {
        conversation.goals.iter().map(|goal| goal.progress()).sum::<f64>()
            / conversation.goals.len() as f64
    };
    let maturity = 0.2
        * (flag(!conversation.budgets.is_empty())
            + flag(!conversation.goals.is_empty())
            + flag(conversation.rule.is_some())
            + (tracked / MATURITY_HISTORY_MONTHS).min(1.0)
            + mean_progress);

    let discipline = score(discipline);
    let stability = score(stability);
    let maturity = score(maturity);
    let overall = (0.40 * f64::from(discipline)
        + 0.35 * f64::from(stability)
        + 0.25 * f64::from(maturity))
    .round()
    .clamp(0.0, 100.0) as u8;

    let mut insights = Vec::new();
    if discipline < WEAK_COMPONENT {
        insights.push(if conversation.budgets.is_empty() {
            "Set budgets for your biggest spending categories to track discipline.".to_string()
        } else {
            format!(
                "Discipline is low: {:.0}% of budgets held this month and you saved {:.0}% of income.",
                adherence * 100.0,
                savings_rate * 100.0
            )
        });
    }
    if stability < WEAK_COMPONENT {
        insights.push(format!(
            "Stability is low: {:.2} of debt installments due against {:.2} income; build savings towards {:.0} months of expenses.",
            obligations, income, CUSHION_MONTHS
        ));
    }
    if maturity < WEAK_COMPONENT {
        let mut missing = Vec::new();
        if conversation.budgets.is_empty() {
            missing.push("budgets");
        }
        if conversation.goals.is_empty() {
            missing.push("goals");
        }
        if conversation.rule.is_none() {
            missing.push("a budgeting rule");
        }
        insights.push(if missing.is_empty() {
            "Keep tracking: maturity grows with history and goal progress.".to_string()
        } else {
            format!("Add {} to round out your plan.", missing.join(" and "))
        });
    }

    FinancialProfile {
        month,
        discipline,
        stability,
        maturity,
        overall,
        tier: ProfileTier::from_score(overall),
        insights,
    }
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

fn score(fraction: f64) -> u8 {
    (fraction * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Share of budgeted categories whose spending in `month` stayed within the limit.
fn budget_adherence(conversation: &Conversation, month: MonthKey) -> f64 {
    if conversation.budgets.is_empty() {
        return 0.5;
    }
    let held = conversation
        .budgets
        .iter()
        .filter(|budget| {
            let spent: i64 = conversation
                .transactions_in(month)
                .filter(|txn| txn.is_expense() && budget.matches(&txn.category))
                .map(|txn| to_cents(txn.amount))
                .sum();
            from_cents(spent) <= budget.monthly_limit() + 0.005
        })
        .count();
    held as f64 / conversation.budgets.len() as f64
}

/// Share of the three months ending with `month` that recorded any income.
fn income_regularity(conversation: &Conversation, month: MonthKey) -> f64 {
    let mut cursor = month;
    let mut with_income = 0;
    for _ in 0..3 {
        if total_for_month(&conversation.transactions, EntryKind::Income, cursor) > 0.0 {
            with_income += 1;
        }
        cursor = cursor.previous();
    }
    with_income as f64 / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Budget, BudgetPeriod, BudgetRule, Debt, DebtDirection, Goal, Transaction};
    use crate::finance::debt::schedule;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_conversation_is_a_beginner() {
        let profile = financial_profile(&Conversation::new("Empty"), date(2024, 5, 10));
        // adherence defaults to 0.5 with no budgets: 0.6 * 0.5 = 30.
        assert_eq!(profile.discipline, 30);
        // no income and no debt: only the debt-health term counts.
        assert_eq!(profile.stability, 35);
        assert_eq!(profile.maturity, 0);
        assert_eq!(profile.overall, 24);
        assert_eq!(profile.tier, ProfileTier::Beginner);
        assert_eq!(profile.insights.len(), 3);
    }

    #[test]
    fn healthy_household_scores_advanced() {
        let mut conversation = Conversation::new("Home");
        for month in 1..=6 {
            conversation.add_transaction(Transaction::income(
                4000.0,
                "Salary",
                "pay",
                date(2024, month, 1),
            ));
            conversation.add_transaction(Transaction::expense(
                1000.0,
                "Housing",
                "rent",
                date(2024, month, 2),
            ));
        }
        conversation
            .budgets
            .push(Budget::new("Housing", 1200.0, BudgetPeriod::Monthly));
        let mut goal = Goal::new("Emergency", 3000.0, None);
        goal.contribute(3000.0, date(2024, 6, 3));
        conversation.goals.push(goal);
        conversation.rule = Some(BudgetRule::default());

        let profile = financial_profile(&conversation, date(2024, 6, 20));
        assert_eq!(profile.discipline, 100);
        assert_eq!(profile.stability, 100);
        assert_eq!(profile.maturity, 100);
        assert_eq!(profile.overall, 100);
        assert_eq!(profile.tier, ProfileTier::Advanced);
        assert!(profile.insights.is_empty());
    }

    #[test]
    fn heavy_debt_lowers_stability() {
        let mut conversation = Conversation::new("Debt");
        conversation.add_transaction(Transaction::income(1000.0, "Salary", "pay", date(2024, 6, 1)));
        let plan = schedule(600.0, 1, date(2024, 6, 15)).unwrap();
        conversation.debts.push(Debt::new(
            "Bank",
            DebtDirection::Payable,
            600.0,
            date(2024, 6, 1),
            plan,
        ));
        let profile = financial_profile(&conversation, date(2024, 6, 20));
        // regularity 1/3, dti 0.6 caps the debt term at 0, no cushion.
        assert_eq!(profile.stability, 13);
        assert!(profile.insights.iter().any(|line| line.contains("Stability")));
    }

    #[test]
    fn tiers_follow_thresholds() {
        assert_eq!(ProfileTier::from_score(39), ProfileTier::Beginner);
        assert_eq!(ProfileTier::from_score(40), ProfileTier::Developing);
        assert_eq!(ProfileTier::from_score(79), ProfileTier::Established);
        assert_eq!(ProfileTier::from_score(80), ProfileTier::Advanced);
    }
}

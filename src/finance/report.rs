//! Monthly report aggregation and narration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ai::{prompts, AiProvider};
use crate::domain::{
    common::{from_cents, round_cents, to_cents},
    transaction::total_for_month,
    Conversation, EntryKind, MonthKey,
};

/// Spending is flagged as near the limit at this percentage of the planned amount.
const NEAR_LIMIT_PERCENT: i64 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStatus {
    Over,
    NearLimit,
    Under,
    Unplanned,
}

impl LineStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LineStatus::Over => "over",
            LineStatus::NearLimit => "near limit",
            LineStatus::Under => "under",
            LineStatus::Unplanned => "unplanned",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryLine {
    pub category: String,
    pub planned: Option<f64>,
    pub actual: f64,
    pub variance: Option<f64>,
    pub status: LineStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub period: MonthKey,
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
    /// Net over income, `0.0` when there was no income.
    pub savings_rate: f64,
    pub lines: Vec<CategoryLine>,
    pub goal_contributions: f64,
    pub top_category: Option<String>,
}

impl MonthlyReport {
    pub fn over_budget(&self) -> impl Iterator<Item = &CategoryLine> {
        self.lines
            .iter()
            .filter(|line| line.status == LineStatus::Over)
    }
}

pub fn monthly_report(conversation: &Conversation, period: MonthKey) -> MonthlyReport {
    let income = total_for_month(&conversation.transactions, EntryKind::Income, period);
    let expenses = total_for_month(&conversation.transactions, EntryKind::Expense, period);

    // Keyed by lowercase name so "dining" and "Dining" share a line.
    let mut spent: BTreeMap<String, (String, i64)> = BTreeMap::new();
    for txn in conversation
        .transactions_in(period)
        .filter(|txn| txn.is_expense())
    {
        let entry = spent
            .entry(txn.category.to_lowercase())
            .or_insert_with(|| (txn.category.clone(), 0));
        entry.1 += to_cents(txn.amount);
    }
    for budget in &conversation.budgets {
        spent
            .entry(budget.category.to_lowercase())
            .or_insert_with(|| (budget.category.clone(), 0));
    }

    let mut lines: Vec<CategoryLine> = spent
        .into_values()
        .map(|(category, cents)| {
            let actual = from_cents(cents);
            let planned = conversation
                .budget_for(&category)
                .map(|budget| round_cents(budget.monthly_limit()));
            let status = classify(planned, actual);
            CategoryLine {
                variance: planned.map(|planned| round_cents(planned - actual)),
                category,
                planned,
                actual,
                status,
            }
        })
        .collect();
    lines.sort_by(|a, b| {
        b.actual
            .total_cmp(&a.actual)
            .then_with(|| a.category.cmp(&b.category))
    });

    let goal_contributions = round_cents(
        conversation
            .goals
            .iter()
            .flat_map(|goal| goal.contributions.iter())
            .filter(|contribution| period.contains(contribution.date))
            .map(|contribution| contribution.amount)
            .sum(),
    );
    let top_category = lines
        .first()
        .filter(|line| line.actual > 0.0)
        .map(|line| line.category.clone());
    let net = round_cents(income - expenses);
    let savings_rate = if income > 0.0 { net / income } else { 0.0 };

    MonthlyReport {
        period,
        income,
        expenses,
        net,
        savings_rate,
        lines,
        goal_contributions,
        top_category,
    }
}

fn classify(planned: Option<f64>, actual: f64) -> LineStatus {
    let Some(planned) = planned else {
        return LineStatus::Unplanned;
    };
    let (planned, actual) = (to_cents(planned), to_cents(actual));
    if actual > planned {
        LineStatus::Over
    } else if planned > 0 && actual * 100 >= planned * NEAR_LIMIT_PERCENT {
        LineStatus::NearLimit
    } else {
        LineStatus::Under
    }
}

/// Narrates `report`, preferring the AI and falling back to a fixed summary.
pub fn narrate(report: &MonthlyReport, provider: Option<&dyn AiProvider>) -> String {
    if let Some(provider) = provider {
        match serde_json::to_string(report) {
            Ok(json) => match provider.complete(&prompts::narration_prompt(&json)) {
                Ok(text) if !text.trim().is_empty() => return text.trim().to_string(),
                Ok(_) => warn!("AI narration was empty; using summary"),
                Err(err) => warn!(error = %err, "AI narration failed; using summary"),
            },
            Err(err) => warn!(error = %err, "could not serialise report for narration"),
        }
    }
    summary(report)
}

/// Deterministic plain-text summary of a report.
pub fn summary(report: &MonthlyReport) -> String {
    let mut text = format!(
        "In {} you earned {:.2} and spent {:.2}, ",
        report.period, report.income, report.expenses
    );
    if report.net >= 0.0 {
        text.push_str(&format!(
            "saving {:.2} ({:.0}% of income).",
            report.net,
            report.savings_rate * 100.0
        ));
    } else {
        text.push_str(&format!("overspending by {:.2}.", -report.net));
    }
    if let Some(top) = &report.top_category {
        text.push_str(&format!(" Your biggest category was {}.", top));
    }
    let over: Vec<&str> = report
        .over_budget()
        .map(|line| line.category.as_str())
        .collect();
    if over.is_empty() {
        text.push_str(" Every budget held.");
    } else {
        text.push_str(&format!(" Over budget: {}.", over.join(", ")));
    }
    text
}

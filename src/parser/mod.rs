//! Command-bar parser: free text in, one structured [`FinanceAction`] out.
//!
//! Input is matched against an ordered cascade of regular-expression
//! grammars (see [`grammar`]); the first grammar that matches wins. Text no
//! grammar understands can be handed to an [`AiProvider`], whose JSON answer
//! must satisfy the schema in [`ai_schema`].

pub mod ai_schema;
pub mod amount;
mod grammar;

use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::ai::{extract_json, prompts, AiError, AiProvider};
use crate::categorize;
use crate::domain::{BudgetPeriod, BudgetRule, DebtDirection, EntryKind, Frequency};

pub use amount::parse_amount;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Nothing to parse")]
    Empty,
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Could not understand `{0}`")]
    Unrecognized(String),
    #[error(transparent)]
    Ai(#[from] AiError),
    #[error("AI answer did not match the command schema: {0}")]
    Schema(String),
}

/// A structured financial operation produced from command-bar text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FinanceAction {
    Expense {
        amount: f64,
        category: String,
        description: String,
    },
    Income {
        amount: f64,
        category: String,
        description: String,
    },
    SetBudget {
        category: String,
        limit: f64,
        period: BudgetPeriod,
    },
    CreateGoal {
        name: String,
        target: f64,
        deadline: Option<NaiveDate>,
    },
    Contribute {
        goal: String,
        amount: f64,
    },
    AddDebt {
        counterparty: String,
        direction: DebtDirection,
        amount: f64,
        months: u32,
    },
    PayDebt {
        counterparty: String,
        direction: Option<DebtDirection>,
        amount: f64,
    },
    AddRecurring {
        description: String,
        amount: f64,
        kind: EntryKind,
        category: String,
        frequency: Frequency,
    },
    SetRule {
        rule: BudgetRule,
    },
}

impl FinanceAction {
    pub fn name(&self) -> &'static str {
        match self {
            FinanceAction::Expense { .. } => "expense",
            FinanceAction::Income { .. } => "income",
            FinanceAction::SetBudget { .. } => "budget",
            FinanceAction::CreateGoal { .. } => "goal",
            FinanceAction::Contribute { .. } => "contribute",
            FinanceAction::AddDebt { .. } => "debt",
            FinanceAction::PayDebt { .. } => "debt_payment",
            FinanceAction::AddRecurring { .. } => "recurring",
            FinanceAction::SetRule { .. } => "rule",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseSource {
    Grammar,
    Ai,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCommand {
    pub action: FinanceAction,
    pub source: ParseSource,
    pub date: NaiveDate,
}

static DATE_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s+(?:(?P<rel>yesterday|today)|on\s+(?P<date>\d{4}-\d{2}-\d{2}))$")
        .expect("date suffix pattern")
});

/// Parses command-bar text with the grammar cascade only.
pub fn parse(input: &str, today: NaiveDate) -> Result<ParsedCommand, ParseError> {
    let normalized = normalize(input);
    if normalized.is_empty() {
        return Err(ParseError::Empty);
    }
    let (body, date) = split_date(&normalized, today)?;
    let action = grammar::match_cascade(&body)?
        .ok_or_else(|| ParseError::Unrecognized(normalized.clone()))?;
    Ok(ParsedCommand {
        action,
        source: ParseSource::Grammar,
        date,
    })
}

/// Parses with the grammar cascade, asking `provider` when no grammar matches.
pub fn parse_with_fallback(
    input: &str,
    today: NaiveDate,
    provider: Option<&dyn AiProvider>,
) -> Result<ParsedCommand, ParseError> {
    match parse(input, today) {
        Err(ParseError::Unrecognized(text)) => {
            let Some(provider) = provider else {
                return Err(ParseError::Unrecognized(text));
            };
            info!(input = %text, "no grammar matched; asking AI");
            let prompt =
                prompts::command_prompt(&text, today, &categorize::expense_categories());
            let reply = provider.complete(&prompt)?;
            let value = extract_json(&reply)?;
            let command: ai_schema::AiCommand = serde_json::from_value(value)
                .map_err(|err| ParseError::Schema(err.to_string()))?;
            command.into_parsed(today)
        }
        other => other,
    }
}

fn normalize(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn split_date(text: &str, today: NaiveDate) -> Result<(String, NaiveDate), ParseError> {
    let Some(caps) = DATE_SUFFIX.captures(text) else {
        return Ok((text.to_string(), today));
    };
    let date = if let Some(rel) = caps.name("rel") {
        if rel.as_str().eq_ignore_ascii_case("yesterday") {
            today - Duration::days(1)
        } else {
            today
        }
    } else {
        let raw = caps.name("date").map(|m| m.as_str()).unwrap_or_default();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| ParseError::Unrecognized(format!("invalid date `{}`", raw)))?
    };
    let start = caps.get(0).map(|m| m.start()).unwrap_or(text.len());
    debug!(%date, "command carries explicit date");
    Ok((text[..start].to_string(), date))
}

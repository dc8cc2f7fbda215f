//! The fixed JSON schema the AI fallback must answer with.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::categorize::{self, OTHER, OTHER_INCOME};
use crate::domain::{round_cents, BudgetPeriod, BudgetRule, DebtDirection, EntryKind, Frequency};

use super::grammar::title_case;
use super::{FinanceAction, ParseError, ParseSource, ParsedCommand};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AiCommand {
    pub action: String,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub months: Option<u32>,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub rule: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
}

fn schema(message: impl Into<String>) -> ParseError {
    ParseError::Schema(message.into())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

impl AiCommand {
    fn amount(&self) -> Result<f64, ParseError> {
        match self.amount {
            Some(value) if value.is_finite() && value > 0.0 => Ok(round_cents(value)),
            Some(value) => Err(ParseError::InvalidAmount(value.to_string())),
            None => Err(schema(format!("`{}` requires an amount", self.action))),
        }
    }

    fn required<'a>(&self, field: &'a Option<String>, label: &str) -> Result<&'a str, ParseError> {
        non_empty(field).ok_or_else(|| schema(format!("`{}` requires `{}`", self.action, label)))
    }

    fn category_for(&self, kind: EntryKind) -> String {
        if let Some(category) = non_empty(&self.category) {
            return title_case(category);
        }
        let described = non_empty(&self.description)
            .and_then(|description| categorize::categorize(description, kind));
        let fallback = match kind {
            EntryKind::Expense => OTHER,
            EntryKind::Income => OTHER_INCOME,
        };
        described.unwrap_or(fallback).to_string()
    }

    /// Validates the answer and converts it into a [`ParsedCommand`].
    pub fn into_parsed(self, today: NaiveDate) -> Result<ParsedCommand, ParseError> {
        let date = parse_date(&self.date)?.unwrap_or(today);
        let action = match self.action.trim().to_ascii_lowercase().as_str() {
            "expense" => FinanceAction::Expense {
                amount: self.amount()?,
                category: self.category_for(EntryKind::Expense),
                description: non_empty(&self.description).unwrap_or("expense").to_string(),
            },
            "income" => FinanceAction::Income {
                amount: self.amount()?,
                category: self.category_for(EntryKind::Income),
                description: non_empty(&self.description).unwrap_or("income").to_string(),
            },
            "budget" => FinanceAction::SetBudget {
                category: title_case(self.required(&self.category, "category")?),
                limit: self.amount()?,
                period: non_empty(&self.frequency)
                    .and_then(BudgetPeriod::parse)
                    .unwrap_or_default(),
            },
            "goal" => FinanceAction::CreateGoal {
                name: title_case(self.required(&self.name, "name")?),
                target: self.amount()?,
                deadline: parse_date(&self.deadline)?,
            },
            "contribute" => FinanceAction::Contribute {
                goal: self.required(&self.name, "name")?.to_string(),
                amount: self.amount()?,
            },
            "debt" => FinanceAction::AddDebt {
                counterparty: title_case(self.required(&self.name, "name")?),
                direction: parse_direction(non_empty(&self.direction))?
                    .unwrap_or(DebtDirection::Payable),
                amount: self.amount()?,
                months: self.months.filter(|months| *months > 0).unwrap_or(1),
            },
            "debt_payment" => FinanceAction::PayDebt {
                counterparty: title_case(self.required(&self.name, "name")?),
                direction: parse_direction(non_empty(&self.direction))?,
                amount: self.amount()?,
            },
            "recurring" => {
                let frequency = non_empty(&self.frequency)
                    .and_then(Frequency::parse)
                    .ok_or_else(|| schema("`recurring` requires a valid `frequency`"))?;
                let description = self.required(&self.description, "description")?;
                FinanceAction::AddRecurring {
                    description: title_case(description),
                    amount: self.amount()?,
                    kind: EntryKind::Expense,
                    category: self.category_for(EntryKind::Expense),
                    frequency,
                }
            }
            "rule" => {
                let raw = self.required(&self.rule, "rule")?;
                FinanceAction::SetRule {
                    rule: BudgetRule::parse(raw).map_err(ParseError::Schema)?,
                }
            }
            other => return Err(schema(format!("unknown action `{}`", other))),
        };
        Ok(ParsedCommand {
            action,
            source: ParseSource::Ai,
            date,
        })
    }
}

fn parse_date(raw: &Option<String>) -> Result<Option<NaiveDate>, ParseError> {
    non_empty(raw)
        .map(|value| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map_err(|_| schema(format!("invalid date `{}`", value)))
        })
        .transpose()
}

fn parse_direction(raw: Option<&str>) -> Result<Option<DebtDirection>, ParseError> {
    match raw.map(str::to_ascii_lowercase).as_deref() {
        None => Ok(None),
        Some("payable") | Some("i_owe") => Ok(Some(DebtDirection::Payable)),
        Some("receivable") | Some("owed_to_me") => Ok(Some(DebtDirection::Receivable)),
        Some(other) => Err(schema(format!("unknown debt direction `{}`", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn debt_answer_defaults_direction_and_months() {
        let command = AiCommand {
            action: "debt".into(),
            amount: Some(300.0),
            name: Some("aunt may".into()),
            ..AiCommand::default()
        };
        let parsed = command.into_parsed(today()).unwrap();
        assert_eq!(
            parsed.action,
            FinanceAction::AddDebt {
                counterparty: "Aunt May".into(),
                direction: DebtDirection::Payable,
                amount: 300.0,
                months: 1,
            }
        );
    }

    #[test]
    fn missing_required_fields_are_schema_errors() {
        let command = AiCommand {
            action: "goal".into(),
            amount: Some(10.0),
            ..AiCommand::default()
        };
        assert!(matches!(
            command.into_parsed(today()),
            Err(ParseError::Schema(message)) if message.contains("name")
        ));
        let command = AiCommand {
            action: "expense".into(),
            amount: Some(-4.0),
            ..AiCommand::default()
        };
        assert!(matches!(
            command.into_parsed(today()),
            Err(ParseError::InvalidAmount(_))
        ));
    }

    #[test]
    fn goal_answer_keeps_its_deadline() {
        let command: AiCommand = serde_json::from_str(
            r#"{"action":"goal","name":"new car","amount":8000,"deadline":"2025-03-01"}"#,
        )
        .unwrap();
        let parsed = command.into_parsed(today()).unwrap();
        assert_eq!(
            parsed.action,
            FinanceAction::CreateGoal {
                name: "New Car".into(),
                target: 8000.0,
                deadline: NaiveDate::from_ymd_opt(2025, 3, 1),
            }
        );

        let command = AiCommand {
            action: "goal".into(),
            name: Some("trip".into()),
            amount: Some(900.0),
            deadline: Some("next spring".into()),
            ..AiCommand::default()
        };
        assert!(matches!(
            command.into_parsed(today()),
            Err(ParseError::Schema(message)) if message.contains("next spring")
        ));
    }

    #[test]
    fn explicit_date_is_honoured() {
        let command = AiCommand {
            action: "income".into(),
            amount: Some(50.0),
            description: Some("sold old bike".into()),
            date: Some("2024-06-01".into()),
            ..AiCommand::default()
        };
        let parsed = command.into_parsed(today()).unwrap();
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert!(matches!(
            parsed.action,
            FinanceAction::Income { ref category, .. } if category == OTHER_INCOME
        ));
    }
}

//! The ordered grammar cascade behind [`super::parse`].

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

use crate::categorize::{self, OTHER, OTHER_INCOME, SALARY};
use crate::domain::{BudgetPeriod, BudgetRule, DebtDirection, EntryKind, Frequency};

use super::amount::{parse_amount, AMOUNT};
use super::{FinanceAction, ParseError};

/// `Ok(None)` lets the cascade keep looking; `Err` stops it.
type Builder = fn(&Captures) -> Result<Option<FinanceAction>, ParseError>;

struct Grammar {
    name: &'static str,
    pattern: Regex,
    build: Builder,
}

impl Grammar {
    fn new(name: &'static str, pattern: &str, build: Builder) -> Self {
        let full = format!("(?i)^{}$", pattern.replace("AMT", AMOUNT));
        Self {
            name,
            pattern: Regex::new(&full).expect("grammar pattern"),
            build,
        }
    }
}

const MONTHS: &str = r"(?:\s+(?:over|in|for)\s+(?P<months>\d+)\s+(?:months?|installments?|payments?))?";

static GRAMMARS: Lazy<Vec<Grammar>> = Lazy::new(|| {
    vec![
        Grammar::new(
            "debt_payment",
            r"(?:(?:pay|paid)(?:\s+(?P<marker>debt|back))?|(?P<repaid>repaid|repay))(?:\s+to)?\s+(?P<name>.+?)\s+(?P<amount>AMT)",
            build_payable_payment,
        ),
        Grammar::new(
            "debt_collection",
            r"(?P<name>.+?)\s+(?:paid|repaid|paid\s+back)\s+me(?:\s+back)?\s+(?P<amount>AMT)",
            build_receivable_payment,
        ),
        Grammar::new(
            "debt",
            &format!(
                r"debt\s+(?P<dir>from|to)\s+(?P<name>.+?)\s+(?P<amount>AMT){}",
                MONTHS
            ),
            build_debt,
        ),
        Grammar::new(
            "lent",
            &format!(r"(?:lent|loaned)\s+(?P<name>.+?)\s+(?P<amount>AMT){}", MONTHS),
            build_lent,
        ),
        Grammar::new(
            "borrowed",
            &format!(r"borrowed\s+(?P<amount>AMT)\s+from\s+(?P<name>.+?){}", MONTHS),
            build_borrowed,
        ),
        Grammar::new(
            "contribute",
            r"(?:save|saved|add|put)\s+(?P<amount>AMT)\s+(?:for|to|towards|into)\s+(?:the\s+|my\s+)?(?P<goal>.+?)(?:\s+goal)?",
            build_contribution,
        ),
        Grammar::new(
            "goal",
            r"(?:new\s+)?goal\s+(?P<name>.+?)\s+(?P<amount>AMT)(?:\s+by\s+(?P<deadline>\d{4}-\d{2}-\d{2}))?",
            build_goal,
        ),
        Grammar::new(
            "budget",
            r"(?:set\s+)?budget\s+(?:for\s+)?(?P<category>.+?)\s+(?:to\s+)?(?P<amount>AMT)(?:\s+(?:per\s+|a\s+)?(?P<period>weekly|monthly|yearly|week|month|year))?",
            build_budget,
        ),
        Grammar::new(
            "recurring_every",
            r"every\s+(?P<freq>day|week|month|year)\s+(?P<amount>AMT)\s+(?:for\s+|on\s+)?(?P<desc>.+)",
            build_recurring,
        ),
        Grammar::new(
            "recurring_adverb",
            r"(?P<freq>daily|weekly|monthly|yearly)\s+(?P<amount>AMT)\s+(?:for\s+|on\s+)?(?P<desc>.+)",
            build_recurring,
        ),
        Grammar::new(
            "recurring_suffix",
            r"(?P<desc>.+?)\s+(?P<amount>AMT)\s+(?:every|per|a)\s+(?P<freq>day|week|month|year)",
            build_recurring,
        ),
        Grammar::new(
            "rule",
            r"(?:use\s+)?(?:the\s+)?(?:rule\s+)?(?P<rule>\d{1,3}/\d{1,3}(?:/\d{1,3})?)(?:\s+rule)?",
            build_rule,
        ),
        Grammar::new(
            "income",
            r"(?P<keyword>income|salary|earned|received|got\s+paid|bonus)\s+(?P<amount>AMT)(?:\s+(?:from|for)\s+(?P<source>.+))?",
            build_income,
        ),
        Grammar::new(
            "income_suffix",
            r"\+?(?P<amount>AMT)\s+(?P<source>(?:salary|income|paycheck|bonus|freelance|dividends?)\b.*)",
            build_income,
        ),
        Grammar::new(
            "income_plus",
            r"\+(?P<amount>AMT)(?:\s+(?P<source>.+))?",
            build_income,
        ),
        Grammar::new(
            "expense_amount_first",
            r"(?:(?:spent|spend|paid|bought)\s+)?(?P<amount>AMT)\s+(?:(?:on|for|at)\s+)?(?P<desc>.+)",
            build_expense,
        ),
        Grammar::new(
            "expense_amount_last",
            r"(?:(?:spent|spend|paid|bought)\s+)?(?P<desc>.+?)\s+(?:for\s+)?(?P<amount>AMT)",
            build_expense,
        ),
    ]
});

/// Runs the cascade; `Ok(None)` when no grammar accepts the text.
pub(super) fn match_cascade(text: &str) -> Result<Option<FinanceAction>, ParseError> {
    for grammar in GRAMMARS.iter() {
        let Some(caps) = grammar.pattern.captures(text) else {
            continue;
        };
        if let Some(action) = (grammar.build)(&caps)? {
            debug!(grammar = grammar.name, action = action.name(), "grammar matched");
            return Ok(Some(action));
        }
    }
    Ok(None)
}

fn text<'t>(caps: &Captures<'t>, name: &str) -> Option<&'t str> {
    caps.name(name)
        .map(|m| m.as_str().trim())
        .filter(|value| !value.is_empty())
}

fn amount(caps: &Captures) -> Result<f64, ParseError> {
    parse_amount(text(caps, "amount").unwrap_or_default())
}

fn months(caps: &Captures) -> u32 {
    text(caps, "months")
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|months| *months > 0)
        .unwrap_or(1)
}

fn has_letters(value: &str) -> bool {
    value.chars().any(char::is_alphabetic)
}

/// Capitalizes each word: `emergency fund` becomes `Emergency Fund`.
pub(crate) fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Canonical category for a user-typed category name.
fn canonical_category(raw: &str, kind: EntryKind) -> String {
    categorize::categorize(raw, kind)
        .map(str::to_string)
        .unwrap_or_else(|| title_case(raw))
}

/// Bare `paid <name> <amount>` is a debt payment unless `<name>` reads as a
/// spending category, so `paid rent 1200` stays an expense.
fn build_payable_payment(caps: &Captures) -> Result<Option<FinanceAction>, ParseError> {
    let Some(name) = text(caps, "name").filter(|name| has_letters(name)) else {
        return Ok(None);
    };
    let bare = caps.name("marker").is_none() && caps.name("repaid").is_none();
    if bare && categorize::categorize(name, EntryKind::Expense).is_some() {
        return Ok(None);
    }
    Ok(Some(FinanceAction::PayDebt {
        counterparty: title_case(name),
        direction: Some(DebtDirection::Payable),
        amount: amount(caps)?,
    }))
}

fn build_receivable_payment(caps: &Captures) -> Result<Option<FinanceAction>, ParseError> {
    let Some(name) = text(caps, "name").filter(|name| has_letters(name)) else {
        return Ok(None);
    };
    Ok(Some(FinanceAction::PayDebt {
        counterparty: title_case(name),
        direction: Some(DebtDirection::Receivable),
        amount: amount(caps)?,
    }))
}

fn debt_action(
    caps: &Captures,
    direction: DebtDirection,
) -> Result<Option<FinanceAction>, ParseError> {
    let Some(name) = text(caps, "name").filter(|name| has_letters(name)) else {
        return Ok(None);
    };
    Ok(Some(FinanceAction::AddDebt {
        counterparty: title_case(name),
        direction,
        amount: amount(caps)?,
        months: months(caps),
    }))
}

fn build_debt(caps: &Captures) -> Result<Option<FinanceAction>, ParseError> {
    let direction = match text(caps, "dir").map(str::to_ascii_lowercase).as_deref() {
        Some("to") => DebtDirection::Receivable,
        _ => DebtDirection::Payable,
    };
    debt_action(caps, direction)
}

fn build_lent(caps: &Captures) -> Result<Option<FinanceAction>, ParseError> {
    debt_action(caps, DebtDirection::Receivable)
}

fn build_borrowed(caps: &Captures) -> Result<Option<FinanceAction>, ParseError> {
    debt_action(caps, DebtDirection::Payable)
}

fn build_contribution(caps: &Captures) -> Result<Option<FinanceAction>, ParseError> {
    let Some(goal) = text(caps, "goal").filter(|goal| has_letters(goal)) else {
        return Ok(None);
    };
    Ok(Some(FinanceAction::Contribute {
        goal: goal.to_string(),
        amount: amount(caps)?,
    }))
}

fn build_goal(caps: &Captures) -> Result<Option<FinanceAction>, ParseError> {
    let Some(name) = text(caps, "name").filter(|name| has_letters(name)) else {
        return Ok(None);
    };
    let deadline = match text(caps, "deadline") {
        Some(raw) => Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| ParseError::Unrecognized(format!("invalid deadline `{}`", raw)))?,
        ),
        None => None,
    };
    Ok(Some(FinanceAction::CreateGoal {
        name: title_case(name),
        target: amount(caps)?,
        deadline,
    }))
}

fn build_budget(caps: &Captures) -> Result<Option<FinanceAction>, ParseError> {
    let Some(category) = text(caps, "category").filter(|value| has_letters(value)) else {
        return Ok(None);
    };
    let period = text(caps, "period")
        .and_then(BudgetPeriod::parse)
        .unwrap_or_default();
    Ok(Some(FinanceAction::SetBudget {
        category: canonical_category(category, EntryKind::Expense),
        limit: amount(caps)?,
        period,
    }))
}

fn build_recurring(caps: &Captures) -> Result<Option<FinanceAction>, ParseError> {
    let Some(description) = text(caps, "desc").filter(|value| has_letters(value)) else {
        return Ok(None);
    };
    let Some(frequency) = text(caps, "freq").and_then(Frequency::parse) else {
        return Ok(None);
    };
    let (kind, category) = match categorize::categorize(description, EntryKind::Income) {
        Some(category) => (EntryKind::Income, category.to_string()),
        None => (
            EntryKind::Expense,
            categorize::categorize(description, EntryKind::Expense)
                .unwrap_or(OTHER)
                .to_string(),
        ),
    };
    Ok(Some(FinanceAction::AddRecurring {
        description: title_case(description),
        amount: amount(caps)?,
        kind,
        category,
        frequency,
    }))
}

fn build_rule(caps: &Captures) -> Result<Option<FinanceAction>, ParseError> {
    let raw = text(caps, "rule").unwrap_or_default();
    let rule = BudgetRule::parse(raw).map_err(ParseError::Unrecognized)?;
    Ok(Some(FinanceAction::SetRule { rule }))
}

fn build_income(caps: &Captures) -> Result<Option<FinanceAction>, ParseError> {
    let keyword = text(caps, "keyword").map(str::to_ascii_lowercase);
    let source = text(caps, "source");
    let description = source
        .map(str::to_string)
        .or_else(|| keyword.clone())
        .unwrap_or_else(|| "income".to_string());
    let category = source
        .and_then(|value| categorize::categorize(value, EntryKind::Income))
        .or_else(|| match keyword.as_deref() {
            Some("salary") | Some("got paid") => Some(SALARY),
            _ => None,
        })
        .unwrap_or(OTHER_INCOME);
    Ok(Some(FinanceAction::Income {
        amount: amount(caps)?,
        category: category.to_string(),
        description,
    }))
}

fn build_expense(caps: &Captures) -> Result<Option<FinanceAction>, ParseError> {
    let Some(description) = text(caps, "desc").filter(|value| has_letters(value)) else {
        return Ok(None);
    };
    let category = categorize::categorize(description, EntryKind::Expense).unwrap_or(OTHER);
    Ok(Some(FinanceAction::Expense {
        amount: amount(caps)?,
        category: category.to_string(),
        description: description.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(input: &str) -> FinanceAction {
        match_cascade(input)
            .expect("no hard error")
            .unwrap_or_else(|| panic!("no grammar matched `{input}`"))
    }

    #[test]
    fn title_case_capitalizes_words() {
        assert_eq!(title_case("emergency  fund"), "Emergency Fund");
    }

    #[test]
    fn earlier_grammars_take_priority() {
        assert!(matches!(
            action("debt from Bank 50"),
            FinanceAction::AddDebt { .. }
        ));
        assert!(matches!(
            action("save 100 for Vacation"),
            FinanceAction::Contribute { .. }
        ));
        assert!(matches!(
            action("every month 15 Netflix"),
            FinanceAction::AddRecurring { .. }
        ));
    }

    #[test]
    fn descriptions_without_letters_fall_through() {
        assert_eq!(match_cascade("50 60").unwrap(), None);
    }
}

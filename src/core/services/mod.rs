pub mod budget_service;
pub mod debt_service;
pub mod forecast_service;
pub mod goal_service;
pub mod profile_service;
pub mod recurring_service;
pub mod report_service;
pub mod rule_service;
pub mod transaction_service;

pub use budget_service::BudgetService;
pub use debt_service::{DebtService, PaymentOutcome};
pub use forecast_service::ForecastService;
pub use goal_service::{ContributionOutcome, GoalService};
pub use profile_service::ProfileService;
pub use recurring_service::RecurringService;
pub use report_service::ReportService;
pub use rule_service::RuleService;
pub use transaction_service::TransactionService;

use strsim::normalized_levenshtein;

use crate::errors::FinanceError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Finance(#[from] FinanceError),
    #[error("{0}")]
    Invalid(String),
    #[error("{0}")]
    NotFound(String),
}

/// Names closer than this are treated as the same entity.
const FUZZY_THRESHOLD: f64 = 0.7;

/// Index of the entry whose name best matches `query`.
///
/// Exact (case-insensitive) matches win, then prefix or substring matches,
/// then the closest name by normalized Levenshtein similarity.
pub(crate) fn fuzzy_position<'a, I>(names: I, query: &str) -> Option<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }
    let names: Vec<String> = names.into_iter().map(str::to_lowercase).collect();
    if let Some(index) = names.iter().position(|name| *name == query) {
        return Some(index);
    }
    if let Some(index) = names
        .iter()
        .position(|name| name.starts_with(&query) || name.contains(&query))
    {
        return Some(index);
    }
    names
        .iter()
        .enumerate()
        .map(|(index, name)| (index, normalized_levenshtein(name, &query)))
        .filter(|(_, score)| *score >= FUZZY_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}

pub(crate) fn ensure_positive(amount: f64, what: &str) -> ServiceResult<()> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(ServiceError::Invalid(format!(
            "{} must be a positive amount",
            what
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuzzy_position_prefers_exact_then_substring_then_similar() {
        let names = ["Emergency Fund", "Car", "Vacation"];
        assert_eq!(fuzzy_position(names, "car"), Some(1));
        assert_eq!(fuzzy_position(names, "emergency"), Some(0));
        assert_eq!(fuzzy_position(names, "vacaton"), Some(2));
        assert_eq!(fuzzy_position(names, "house"), None);
        assert_eq!(fuzzy_position(names, "  "), None);
    }
}

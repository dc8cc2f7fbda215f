use chrono::NaiveDate;

use crate::domain::Conversation;
use crate::finance::forecast::{goal_eta, month_end_forecast, Forecast};

pub struct ForecastService;

impl ForecastService {
    pub fn month_end(conversation: &Conversation, today: NaiveDate) -> Forecast {
        month_end_forecast(conversation, today)
    }

    /// Estimated completion per unfinished goal, in creation order.
    pub fn goal_etas(conversation: &Conversation, today: NaiveDate) -> Vec<(String, Option<NaiveDate>)> {
        conversation
            .goals
            .iter()
            .filter(|goal| !goal.is_complete())
            .map(|goal| (goal.name.clone(), goal_eta(goal, today)))
            .collect()
    }
}

use chrono::NaiveDate;

use crate::domain::Conversation;
use crate::finance::profile::{financial_profile, FinancialProfile};

pub struct ProfileService;

impl ProfileService {
    pub fn profile(conversation: &Conversation, today: NaiveDate) -> FinancialProfile {
        financial_profile(conversation, today)
    }
}

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{Conversation, Goal};

use super::{ensure_positive, fuzzy_position, ServiceError, ServiceResult};

#[derive(Debug, Clone, PartialEq)]
pub struct ContributionOutcome {
    pub goal: String,
    pub saved: f64,
    pub target: f64,
    pub completed: bool,
}

pub struct GoalService;

impl GoalService {
    pub fn create(
        conversation: &mut Conversation,
        name: &str,
        target: f64,
        deadline: Option<NaiveDate>,
    ) -> ServiceResult<Uuid> {
        ensure_positive(target, "goal target")?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::Invalid("goal needs a name".into()));
        }
        if conversation.goal_by_name(name).is_some() {
            return Err(ServiceError::Invalid(format!(
                "Goal `{}` already exists",
                name
            )));
        }
        let goal = Goal::new(name, target, deadline);
        let id = goal.id;
        conversation.goals.push(goal);
        conversation.touch();
        Ok(id)
    }

    /// Finds a goal by approximate name.
    pub fn find<'a>(conversation: &'a Conversation, name: &str) -> ServiceResult<&'a Goal> {
        fuzzy_position(conversation.goals.iter().map(|goal| goal.name.as_str()), name)
            .map(|index| &conversation.goals[index])
            .ok_or_else(|| ServiceError::NotFound(format!("No goal matches `{}`", name.trim())))
    }

    pub fn contribute(
        conversation: &mut Conversation,
        name: &str,
        amount: f64,
        date: NaiveDate,
    ) -> ServiceResult<ContributionOutcome> {
        ensure_positive(amount, "contribution")?;
        let id = Self::find(conversation, name)?.id;
        let goal = conversation
            .goal_mut(id)
            .ok_or_else(|| ServiceError::NotFound("Goal vanished".into()))?;
        goal.contribute(amount, date);
        let outcome = ContributionOutcome {
            goal: goal.name.clone(),
            saved: goal.saved,
            target: goal.target,
            completed: goal.is_complete(),
        };
        conversation.touch();
        Ok(outcome)
    }

    pub fn list(conversation: &Conversation) -> Vec<&Goal> {
        conversation.goals.iter().collect()
    }
}

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{Conversation, EntryKind, Frequency, RecurringCharge};

use super::{ensure_positive, fuzzy_position, ServiceError, ServiceResult};

pub struct RecurringService;

impl RecurringService {
    pub fn add(
        conversation: &mut Conversation,
        description: &str,
        amount: f64,
        kind: EntryKind,
        category: &str,
        frequency: Frequency,
        first_due: NaiveDate,
    ) -> ServiceResult<Uuid> {
        ensure_positive(amount, "recurring amount")?;
        if description.trim().is_empty() {
            return Err(ServiceError::Invalid("recurring entry needs a description".into()));
        }
        let charge = RecurringCharge::new(
            description.trim(),
            amount,
            kind,
            category,
            frequency,
            first_due,
        );
        let id = charge.id;
        conversation.recurring.push(charge);
        conversation.touch();
        Ok(id)
    }

    /// Books every active charge due on or before `up_to` as a transaction.
    ///
    /// Returns how many transactions were posted.
    pub fn post_due(conversation: &mut Conversation, up_to: NaiveDate) -> usize {
        let mut posted = Vec::new();
        for charge in conversation
            .recurring
            .iter_mut()
            .filter(|charge| charge.active)
        {
            while charge.next_due <= up_to {
                let due = charge.advance();
                posted.push(charge.to_transaction(due));
            }
        }
        let count = posted.len();
        for transaction in posted {
            conversation.add_transaction(transaction);
        }
        if count > 0 {
            debug!(count, %up_to, "posted recurring entries");
        }
        count
    }

    /// Stops a charge from posting again. Returns its description.
    pub fn deactivate(conversation: &mut Conversation, description: &str) -> ServiceResult<String> {
        let index = fuzzy_position(
            conversation
                .recurring
                .iter()
                .filter(|charge| charge.active)
                .map(|charge| charge.description.as_str()),
            description,
        )
        .and_then(|position| {
            conversation
                .recurring
                .iter()
                .enumerate()
                .filter(|(_, charge)| charge.active)
                .nth(position)
                .map(|(index, _)| index)
        })
        .ok_or_else(|| {
            ServiceError::NotFound(format!("No active recurring entry matches `{}`", description))
        })?;
        let charge = &mut conversation.recurring[index];
        charge.active = false;
        let name = charge.description.clone();
        conversation.touch();
        Ok(name)
    }

    pub fn active(conversation: &Conversation) -> Vec<&RecurringCharge> {
        conversation
            .recurring
            .iter()
            .filter(|charge| charge.active)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn post_due_catches_up_missed_periods() {
        let mut conversation = Conversation::new("Recurring");
        RecurringService::add(
            &mut conversation,
            "Netflix",
            15.0,
            EntryKind::Expense,
            "Subscriptions",
            Frequency::Monthly,
            date(1, 31),
        )
        .unwrap();
        assert_eq!(RecurringService::post_due(&mut conversation, date(3, 31)), 3);
        let dates: Vec<NaiveDate> = conversation.transactions.iter().map(|txn| txn.date).collect();
        assert_eq!(dates, vec![date(1, 31), date(2, 29), date(3, 31)]);
        assert!(conversation.transactions.iter().all(|txn| txn.recurring_id.is_some()));
        assert_eq!(RecurringService::post_due(&mut conversation, date(3, 31)), 0);
    }

    #[test]
    fn deactivated_charges_stop_posting() {
        let mut conversation = Conversation::new("Recurring");
        RecurringService::add(
            &mut conversation,
            "Gym",
            30.0,
            EntryKind::Expense,
            "Health",
            Frequency::Weekly,
            date(1, 1),
        )
        .unwrap();
        assert_eq!(RecurringService::deactivate(&mut conversation, "gym").unwrap(), "Gym");
        assert_eq!(RecurringService::post_due(&mut conversation, date(2, 1)), 0);
        assert!(RecurringService::deactivate(&mut conversation, "gym").is_err());
        assert!(RecurringService::active(&conversation).is_empty());
    }
}

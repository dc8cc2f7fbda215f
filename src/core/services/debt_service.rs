use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{shift_month, Conversation, Debt, DebtDirection};
use crate::finance::debt as scheduler;

use super::{ensure_positive, fuzzy_position, ServiceError, ServiceResult};

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentOutcome {
    pub counterparty: String,
    pub direction: DebtDirection,
    /// Zero-based index of the installment that was settled.
    pub installment: usize,
    pub outstanding: f64,
    pub settled: bool,
}

pub struct DebtService;

impl DebtService {
    /// Records a debt and schedules its installments, the first one a month after `created_on`.
    pub fn add(
        conversation: &mut Conversation,
        counterparty: &str,
        direction: DebtDirection,
        principal: f64,
        months: u32,
        created_on: NaiveDate,
    ) -> ServiceResult<Uuid> {
        ensure_positive(principal, "debt amount")?;
        let counterparty = counterparty.trim();
        if counterparty.is_empty() {
            return Err(ServiceError::Invalid("debt needs a counterparty".into()));
        }
        let first_due = shift_month(created_on, 1)
            .ok_or_else(|| ServiceError::Invalid("debt start date out of range".into()))?;
        let installments = scheduler::schedule(principal, months, first_due)?;
        let debt = Debt::new(counterparty, direction, principal, created_on, installments);
        let id = debt.id;
        conversation.debts.push(debt);
        conversation.touch();
        Ok(id)
    }

    /// Finds an open debt by approximate counterparty name, optionally filtered by direction.
    pub fn find_open<'a>(
        conversation: &'a Conversation,
        counterparty: &str,
        direction: Option<DebtDirection>,
    ) -> ServiceResult<&'a Debt> {
        let candidates: Vec<&Debt> = conversation
            .debts
            .iter()
            .filter(|debt| !debt.is_settled())
            .filter(|debt| direction.map_or(true, |wanted| debt.direction == wanted))
            .collect();
        fuzzy_position(
            candidates.iter().map(|debt| debt.counterparty.as_str()),
            counterparty,
        )
        .map(|index| candidates[index])
        .ok_or_else(|| {
            ServiceError::NotFound(format!("No open debt with `{}`", counterparty.trim()))
        })
    }

    pub fn pay(
        conversation: &mut Conversation,
        counterparty: &str,
        direction: Option<DebtDirection>,
        amount: f64,
        date: NaiveDate,
    ) -> ServiceResult<PaymentOutcome> {
        ensure_positive(amount, "payment")?;
        let id = Self::find_open(conversation, counterparty, direction)?.id;
        let debt = Self::debt_mut(conversation, id)?;
        let installment = scheduler::record_payment(debt, amount, date)?;
        let outcome = PaymentOutcome {
            counterparty: debt.counterparty.clone(),
            direction: debt.direction,
            installment,
            outstanding: debt.outstanding(),
            settled: debt.is_settled(),
        };
        conversation.touch();
        Ok(outcome)
    }

    /// Edits one installment (`number` is one-based, as shown to users).
    pub fn edit_installment<'a>(
        conversation: &'a mut Conversation,
        counterparty: &str,
        number: usize,
        amount: f64,
    ) -> ServiceResult<&'a Debt> {
        if number == 0 {
            return Err(ServiceError::Invalid("installments are numbered from 1".into()));
        }
        let id = Self::find_open(conversation, counterparty, None)?.id;
        let debt = Self::debt_mut(conversation, id)?;
        scheduler::edit_installment(debt, number - 1, amount)?;
        conversation.touch();
        conversation
            .debts
            .iter()
            .find(|debt| debt.id == id)
            .ok_or_else(|| ServiceError::NotFound("Debt vanished".into()))
    }

    pub fn outstanding(conversation: &Conversation) -> Vec<&Debt> {
        conversation
            .debts
            .iter()
            .filter(|debt| !debt.is_settled())
            .collect()
    }

    fn debt_mut(conversation: &mut Conversation, id: Uuid) -> ServiceResult<&mut Debt> {
        conversation
            .debt_mut(id)
            .ok_or_else(|| ServiceError::NotFound("Debt vanished".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn add_schedules_from_next_month() {
        let mut conversation = Conversation::new("Debts");
        DebtService::add(&mut conversation, "Bank", DebtDirection::Payable, 900.0, 3, date(1, 31))
            .unwrap();
        let debt = &conversation.debts[0];
        assert_eq!(debt.installments.len(), 3);
        assert_eq!(debt.installments[0].due_date, date(2, 29));
        assert!(DebtService::add(&mut conversation, "Bank", DebtDirection::Payable, 10.0, 0, date(1, 1)).is_err());
    }

    #[test]
    fn pay_uses_direction_to_disambiguate() {
        let mut conversation = Conversation::new("Debts");
        DebtService::add(&mut conversation, "Sam", DebtDirection::Payable, 100.0, 2, date(1, 1)).unwrap();
        DebtService::add(&mut conversation, "Sam", DebtDirection::Receivable, 40.0, 1, date(1, 1)).unwrap();

        let outcome = DebtService::pay(
            &mut conversation,
            "sam",
            Some(DebtDirection::Receivable),
            40.0,
            date(1, 20),
        )
        .unwrap();
        assert!(outcome.settled);
        assert_eq!(outcome.direction, DebtDirection::Receivable);

        let outcome = DebtService::pay(&mut conversation, "Sam", None, 70.0, date(2, 1)).unwrap();
        assert_eq!(outcome.direction, DebtDirection::Payable);
        assert_eq!(outcome.outstanding, 30.0);
        assert_eq!(DebtService::outstanding(&conversation).len(), 1);
    }

    #[test]
    fn edit_installment_is_one_based() {
        let mut conversation = Conversation::new("Debts");
        DebtService::add(&mut conversation, "Bank", DebtDirection::Payable, 300.0, 3, date(1, 1)).unwrap();
        let debt = DebtService::edit_installment(&mut conversation, "bank", 1, 150.0).unwrap();
        let amounts: Vec<f64> = debt.installments.iter().map(|item| item.amount).collect();
        assert_eq!(amounts, vec![150.0, 75.0, 75.0]);
        assert!(DebtService::edit_installment(&mut conversation, "bank", 0, 1.0).is_err());
        assert!(DebtService::edit_installment(&mut conversation, "nobody", 1, 1.0).is_err());
    }
}

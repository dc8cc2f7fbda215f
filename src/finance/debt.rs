//! Debt installment scheduling and redistribution.

use chrono::NaiveDate;

use crate::domain::{
    common::{from_cents, shift_month, to_cents},
    Debt, Installment, MonthKey,
};
use crate::errors::FinanceError;

fn invalid(message: impl Into<String>) -> FinanceError {
    FinanceError::Validation(message.into())
}

/// Splits `cents` into `parts` even shares, the remainder added to the last one.
fn even_split(cents: i64, parts: usize) -> Vec<i64> {
    if parts == 0 {
        return Vec::new();
    }
    let base = cents / parts as i64;
    let mut shares = vec![base; parts];
    if let Some(last) = shares.last_mut() {
        *last += cents - base * parts as i64;
    }
    shares
}

/// Longest plan accepted: fifty years of monthly installments.
pub const MAX_INSTALLMENTS: u32 = 600;

/// Builds a monthly installment plan for `principal` over `months`.
///
/// Every installment carries at least one cent, so `months` may not exceed
/// the principal in cents.
pub fn schedule(
    principal: f64,
    months: u32,
    first_due: NaiveDate,
) -> Result<Vec<Installment>, FinanceError> {
    if months == 0 {
        return Err(invalid("a debt needs at least one installment"));
    }
    if months > MAX_INSTALLMENTS {
        return Err(invalid(format!(
            "a debt can have at most {} installments",
            MAX_INSTALLMENTS
        )));
    }
    let cents = to_cents(principal);
    if cents <= 0 {
        return Err(invalid("debt principal must be positive"));
    }
    if i64::from(months) > cents {
        return Err(invalid(format!(
            "{:.2} cannot be split into {} installments",
            principal, months
        )));
    }
    even_split(cents, months as usize)
        .into_iter()
        .enumerate()
        .map(|(index, share)| {
            Ok(Installment {
                index,
                due_date: due_after(first_due, index as i32)?,
                amount: from_cents(share),
                paid_on: None,
            })
        })
        .collect()
}

fn due_after(date: NaiveDate, months: i32) -> Result<NaiveDate, FinanceError> {
    shift_month(date, months).ok_or_else(|| invalid("installment date out of range"))
}

/// Changes one unpaid installment and spreads the difference over the later unpaid ones.
pub fn edit_installment(debt: &mut Debt, index: usize, new_amount: f64) -> Result<(), FinanceError> {
    let position = debt
        .installments
        .iter()
        .position(|item| item.index == index)
        .ok_or_else(|| invalid(format!("installment {} does not exist", index + 1)))?;
    if debt.installments[position].is_paid() {
        return Err(invalid(format!(
            "installment {} is already paid",
            index + 1
        )));
    }
    let new_cents = to_cents(new_amount);
    if new_cents <= 0 {
        return Err(invalid("installment amount must be positive"));
    }

    // Unpaid installments at or before the edited one stay as they are.
    let fixed_before: i64 = debt.installments[..position]
        .iter()
        .filter(|item| !item.is_paid())
        .map(|item| to_cents(item.amount))
        .sum();
    let available = debt.outstanding_cents() - fixed_before;
    if new_cents > available {
        return Err(invalid(format!(
            "installment of {:.2} exceeds the {:.2} left to schedule",
            from_cents(new_cents),
            from_cents(available)
        )));
    }

    let later: Vec<usize> = (position + 1..debt.installments.len())
        .filter(|idx| !debt.installments[*idx].is_paid())
        .collect();
    let leftover = available - new_cents;
    if later.is_empty() && leftover != 0 {
        return Err(invalid(format!(
            "the last installment must cover the remaining {:.2}",
            from_cents(available)
        )));
    }

    debt.installments[position].amount = from_cents(new_cents);
    let shares = even_split(leftover, later.len());
    for (idx, share) in later.into_iter().zip(shares) {
        debt.installments[idx].amount = from_cents(share);
    }
    // Later installments zeroed out by a large payment are dropped from the plan.
    debt.installments
        .retain(|item| item.is_paid() || to_cents(item.amount) > 0);
    for (index, item) in debt.installments.iter_mut().enumerate() {
        item.index = index;
    }
    Ok(())
}

/// Pays the next unpaid installment with `amount`, redistributing any difference.
///
/// Returns the index of the installment that was marked paid.
pub fn record_payment(debt: &mut Debt, amount: f64, date: NaiveDate) -> Result<usize, FinanceError> {
    let cents = to_cents(amount);
    if cents <= 0 {
        return Err(invalid("payment must be positive"));
    }
    let outstanding = debt.outstanding_cents();
    if outstanding == 0 {
        return Err(invalid(format!("{} is already settled", debt.counterparty)));
    }
    if cents > outstanding {
        return Err(invalid(format!(
            "payment of {:.2} exceeds the outstanding {:.2}",
            amount,
            from_cents(outstanding)
        )));
    }
    let next = debt
        .next_unpaid()
        .map(|item| (item.index, to_cents(item.amount)))
        .ok_or_else(|| invalid("no unpaid installment left"))?;
    let (index, expected) = next;
    if cents != expected {
        let has_later = debt
            .installments
            .iter()
            .any(|item| item.index > index && !item.is_paid());
        if !has_later && cents < expected {
            // Partial payment on the final installment: split it.
            split_final(debt, index, cents)?;
        } else {
            edit_installment(debt, index, from_cents(cents))?;
        }
    }
    let item = debt
        .installments
        .iter_mut()
        .find(|item| item.index == index)
        .ok_or_else(|| invalid("installment vanished while paying"))?;
    item.paid_on = Some(date);
    Ok(index)
}

fn split_final(debt: &mut Debt, index: usize, paid_cents: i64) -> Result<(), FinanceError> {
    let Some(position) = debt.installments.iter().position(|item| item.index == index) else {
        return Ok(());
    };
    let current = &debt.installments[position];
    let rest = to_cents(current.amount) - paid_cents;
    let due_date = due_after(current.due_date, 1)?;
    debt.installments[position].amount = from_cents(paid_cents);
    debt.installments.push(Installment {
        index: debt.installments.len(),
        due_date,
        amount: from_cents(rest),
        paid_on: None,
    });
    Ok(())
}

/// Total of payable installments still due within `month`.
pub fn monthly_obligation<'a, I>(debts: I, month: MonthKey) -> f64
where
    I: IntoIterator<Item = &'a Debt>,
{
    from_cents(
        debts
            .into_iter()
            .filter(|debt| debt.direction == crate::domain::DebtDirection::Payable)
            .flat_map(|debt| debt.installments.iter())
            .filter(|item| month.contains(item.due_date))
            .map(|item| to_cents(item.amount))
            .sum(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DebtDirection;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn debt(principal: f64, months: u32) -> Debt {
        let plan = schedule(principal, months, date(2024, 1, 31)).unwrap();
        Debt::new("Bank", DebtDirection::Payable, principal, date(2024, 1, 1), plan)
    }

    fn amounts(debt: &Debt) -> Vec<f64> {
        debt.installments.iter().map(|item| item.amount).collect()
    }

    #[test]
    fn schedule_puts_remainder_on_last_installment() {
        let plan = schedule(100.0, 3, date(2024, 1, 31)).unwrap();
        let values: Vec<f64> = plan.iter().map(|item| item.amount).collect();
        assert_eq!(values, vec![33.33, 33.33, 33.34]);
        assert_eq!(plan[1].due_date, date(2024, 2, 29));
        assert_eq!(plan[2].due_date, date(2024, 3, 31));
    }

    #[test]
    fn schedule_rejects_zero_months() {
        assert!(schedule(100.0, 0, date(2024, 1, 1)).is_err());
        assert!(schedule(0.0, 2, date(2024, 1, 1)).is_err());
    }

    #[test]
    fn schedule_never_creates_empty_installments() {
        let plan = schedule(0.05, 5, date(2024, 1, 1)).unwrap();
        assert!(plan.iter().all(|item| item.amount == 0.01));
        let err = schedule(0.05, 10, date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, FinanceError::Validation(ref message) if message.contains("0.05")));
    }

    #[test]
    fn schedule_caps_the_number_of_installments() {
        assert_eq!(schedule(1_000_000.0, MAX_INSTALLMENTS, date(2024, 1, 1)).unwrap().len(), 600);
        assert!(schedule(1_000_000.0, 100_000_000, date(2024, 1, 1)).is_err());
        assert!(schedule(100.0, 2, NaiveDate::MAX).is_err());
    }

    #[test]
    fn editing_redistributes_to_future_installments() {
        let mut debt = debt(1200.0, 4);
        edit_installment(&mut debt, 1, 500.0).unwrap();
        assert_eq!(amounts(&debt), vec![300.0, 500.0, 200.0, 200.0]);
        assert_eq!(debt.outstanding(), 1200.0);
    }

    #[test]
    fn editing_uneven_remainder_lands_on_last() {
        let mut debt = debt(100.0, 4);
        edit_installment(&mut debt, 0, 10.0).unwrap();
        assert_eq!(amounts(&debt), vec![10.0, 30.0, 30.0, 30.0]);
        edit_installment(&mut debt, 1, 20.0).unwrap();
        assert_eq!(amounts(&debt), vec![10.0, 20.0, 35.0, 35.0]);
        edit_installment(&mut debt, 1, 20.01).unwrap();
        assert_eq!(amounts(&debt), vec![10.0, 20.01, 34.99, 35.0]);
    }

    #[test]
    fn editing_rejects_paid_and_oversized_installments() {
        let mut debt = debt(300.0, 3);
        record_payment(&mut debt, 100.0, date(2024, 1, 31)).unwrap();
        assert!(edit_installment(&mut debt, 0, 50.0).is_err());
        assert!(edit_installment(&mut debt, 1, 250.0).is_err());
        assert!(edit_installment(&mut debt, 2, 50.0).is_err());
        assert!(edit_installment(&mut debt, 9, 50.0).is_err());
    }

    #[test]
    fn large_edit_drops_emptied_installments() {
        let mut debt = debt(300.0, 3);
        edit_installment(&mut debt, 0, 300.0).unwrap();
        assert_eq!(amounts(&debt), vec![300.0]);
    }

    #[test]
    fn payments_mark_installments_in_order() {
        let mut debt = debt(300.0, 3);
        assert_eq!(record_payment(&mut debt, 100.0, date(2024, 1, 30)).unwrap(), 0);
        assert_eq!(record_payment(&mut debt, 150.0, date(2024, 2, 28)).unwrap(), 1);
        assert_eq!(amounts(&debt), vec![100.0, 150.0, 50.0]);
        assert_eq!(debt.outstanding(), 50.0);
        assert!(record_payment(&mut debt, 60.0, date(2024, 3, 1)).is_err());
        record_payment(&mut debt, 50.0, date(2024, 3, 30)).unwrap();
        assert!(debt.is_settled());
        assert!(record_payment(&mut debt, 1.0, date(2024, 4, 1)).is_err());
    }

    #[test]
    fn partial_final_payment_splits_installment() {
        let mut debt = debt(100.0, 1);
        record_payment(&mut debt, 40.0, date(2024, 1, 31)).unwrap();
        assert_eq!(amounts(&debt), vec![40.0, 60.0]);
        assert_eq!(debt.installments[1].due_date, date(2024, 2, 29));
        assert_eq!(debt.outstanding(), 60.0);
    }

    #[test]
    fn monthly_obligation_counts_payables_only() {
        let payable = debt(300.0, 3);
        let mut receivable = debt(90.0, 1);
        receivable.direction = DebtDirection::Receivable;
        let february = MonthKey::new(2024, 2).unwrap();
        assert_eq!(monthly_obligation([&payable, &receivable], february), 100.0);
    }
}

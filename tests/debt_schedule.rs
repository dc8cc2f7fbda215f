mod common;

use common::{date, setup_manager};
use finbar_core::core::services::DebtService;
use finbar_core::domain::MonthKey;
use finbar_core::finance::debt::monthly_obligation;
use finbar_core::parser::parse;

fn amounts(manager: &finbar_core::core::FinanceManager) -> Vec<f64> {
    manager.active().debts[0]
        .installments
        .iter()
        .map(|item| item.amount)
        .collect()
}

#[test]
fn payments_and_edits_redistribute_the_remainder() {
    let (mut manager, _) = setup_manager();
    let created = date(2024, 1, 10);
    manager
        .apply(parse("debt from bank 1200 over 12 months", created).unwrap(), None)
        .unwrap();
    let debt = &manager.active().debts[0];
    assert_eq!(debt.installments.len(), 12);
    assert_eq!(debt.installments[0].due_date, date(2024, 2, 10));
    assert_eq!(debt.installments[11].due_date, date(2025, 1, 10));

    manager
        .apply(parse("paid back bank 100", date(2024, 2, 10)).unwrap(), None)
        .unwrap();
    assert_eq!(manager.active().debts[0].outstanding(), 1100.0);

    manager
        .update(|conversation| {
            DebtService::edit_installment(conversation, "bank", 2, 300.0).map(|_| ())
        })
        .unwrap();
    let schedule = amounts(&manager);
    assert_eq!(schedule[1], 300.0);
    assert!(schedule[2..].iter().all(|amount| *amount == 80.0));

    // Paying less than the planned installment moves the shortfall forward.
    manager
        .apply(parse("paid back bank 300", date(2024, 3, 10)).unwrap(), None)
        .unwrap();
    manager
        .apply(parse("paid back bank 50", date(2024, 4, 10)).unwrap(), None)
        .unwrap();
    let schedule = amounts(&manager);
    assert_eq!(schedule[2], 50.0);
    assert_eq!(schedule[3], 83.33);
    assert_eq!(schedule[11], 83.36);
    assert_eq!(manager.active().debts[0].outstanding(), 750.0);
}

#[test]
fn overpaying_an_installment_shrinks_the_rest() {
    let (mut manager, _) = setup_manager();
    manager
        .apply(parse("borrowed 300 from dad over 3 months", date(2024, 1, 1)).unwrap(), None)
        .unwrap();
    manager
        .apply(parse("paid back dad 250", date(2024, 2, 1)).unwrap(), None)
        .unwrap();
    assert_eq!(amounts(&manager), vec![250.0, 25.0, 25.0]);

    manager
        .apply(parse("paid back dad 49.99", date(2024, 3, 1)).unwrap(), None)
        .unwrap();
    assert_eq!(amounts(&manager), vec![250.0, 49.99, 0.01]);

    let err = manager
        .apply(parse("paid back dad 80", date(2024, 4, 1)).unwrap(), None)
        .unwrap_err();
    assert!(err.to_string().contains("exceeds"), "unexpected: {err}");
}

#[test]
fn obligations_count_only_what_i_owe() {
    let (mut manager, _) = setup_manager();
    let day = date(2024, 5, 2);
    for line in [
        "debt from bank 600 over 6 months",
        "lent maria 200 over 2 months",
    ] {
        manager.apply(parse(line, day).unwrap(), None).unwrap();
    }
    let june = MonthKey::new(2024, 6).unwrap();
    assert_eq!(monthly_obligation(&manager.active().debts, june), 100.0);
    assert_eq!(DebtService::outstanding(manager.active()).len(), 2);

    manager
        .apply(parse("maria paid me 100", date(2024, 6, 2)).unwrap(), None)
        .unwrap();
    manager
        .apply(parse("maria paid me 100", date(2024, 7, 2)).unwrap(), None)
        .unwrap();
    assert_eq!(DebtService::outstanding(manager.active()).len(), 1);
}

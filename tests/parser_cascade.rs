use chrono::NaiveDate;
use finbar_core::domain::{BudgetPeriod, DebtDirection, EntryKind, Frequency};
use finbar_core::parser::{parse, FinanceAction, ParseError, ParseSource};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
}

fn action(input: &str) -> FinanceAction {
    parse(input, today())
        .unwrap_or_else(|err| panic!("`{input}` failed: {err}"))
        .action
}

#[test]
fn expenses_in_both_word_orders() {
    match action("spent 12.50 on lunch") {
        FinanceAction::Expense {
            amount,
            category,
            description,
        } => {
            assert_eq!(amount, 12.5);
            assert_eq!(category, "Dining");
            assert_eq!(description, "lunch");
        }
        other => panic!("unexpected {other:?}"),
    }
    match action("uber 23") {
        FinanceAction::Expense {
            amount, category, ..
        } => {
            assert_eq!(amount, 23.0);
            assert_eq!(category, "Transport");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(
        action("bought something odd 5"),
        FinanceAction::Expense { ref category, .. } if category == "Other"
    ));
}

#[test]
fn income_phrasings() {
    assert!(matches!(
        action("salary 3,200"),
        FinanceAction::Income { amount, ref category, .. } if amount == 3200.0 && category == "Salary"
    ));
    assert!(matches!(
        action("+150 freelance logo"),
        FinanceAction::Income { ref category, .. } if category == "Freelance"
    ));
    assert!(matches!(
        action("received 40 from grandma"),
        FinanceAction::Income { ref category, .. } if category == "Other Income"
    ));
}

#[test]
fn budgets_goals_and_rules() {
    assert_eq!(
        action("budget food 400 weekly"),
        FinanceAction::SetBudget {
            category: "Groceries".into(),
            limit: 400.0,
            period: BudgetPeriod::Weekly,
        }
    );
    assert_eq!(
        action("goal emergency fund 5k by 2024-12-31"),
        FinanceAction::CreateGoal {
            name: "Emergency Fund".into(),
            target: 5000.0,
            deadline: NaiveDate::from_ymd_opt(2024, 12, 31),
        }
    );
    assert_eq!(
        action("save 200 towards my emergency fund"),
        FinanceAction::Contribute {
            goal: "emergency fund".into(),
            amount: 200.0,
        }
    );
    match action("use 70/20/10") {
        FinanceAction::SetRule { rule } => {
            assert_eq!((rule.needs, rule.wants, rule.savings), (70, 20, 10));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(
        parse("use 70/20/20", today()),
        Err(ParseError::Unrecognized(_))
    ));
}

#[test]
fn debts_take_direction_from_the_phrase() {
    assert_eq!(
        action("debt from bank 1200 over 12 months"),
        FinanceAction::AddDebt {
            counterparty: "Bank".into(),
            direction: DebtDirection::Payable,
            amount: 1200.0,
            months: 12,
        }
    );
    assert!(matches!(
        action("debt to john 300"),
        FinanceAction::AddDebt { direction: DebtDirection::Receivable, months: 1, .. }
    ));
    assert!(matches!(
        action("lent maria 90 in 3 payments"),
        FinanceAction::AddDebt { direction: DebtDirection::Receivable, months: 3, .. }
    ));
    assert!(matches!(
        action("borrowed 500 from dad"),
        FinanceAction::AddDebt { direction: DebtDirection::Payable, .. }
    ));
    assert!(matches!(
        action("paid back bank 100"),
        FinanceAction::PayDebt { direction: Some(DebtDirection::Payable), .. }
    ));
    assert!(matches!(
        action("maria paid me 30"),
        FinanceAction::PayDebt { direction: Some(DebtDirection::Receivable), .. }
    ));
}

#[test]
fn recurring_entries() {
    assert_eq!(
        action("netflix 15.99 every month"),
        FinanceAction::AddRecurring {
            description: "Netflix".into(),
            amount: 15.99,
            kind: EntryKind::Expense,
            category: "Subscriptions".into(),
            frequency: Frequency::Monthly,
        }
    );
    assert!(matches!(
        action("monthly 2500 salary"),
        FinanceAction::AddRecurring { kind: EntryKind::Income, .. }
    ));
}

#[test]
fn date_suffixes_and_sources() {
    let parsed = parse("spent 8 on coffee yesterday", today()).unwrap();
    assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2024, 3, 19).unwrap());
    assert_eq!(parsed.source, ParseSource::Grammar);

    let parsed = parse("spent 8 on coffee on 2024-02-29", today()).unwrap();
    assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

    assert!(matches!(parse("", today()), Err(ParseError::Empty)));
    assert!(matches!(
        parse("hello there", today()),
        Err(ParseError::Unrecognized(_))
    ));
}

#[test]
fn debt_payment_phrasings() {
    assert_eq!(
        action("pay debt bank 50"),
        FinanceAction::PayDebt {
            counterparty: "Bank".into(),
            direction: Some(DebtDirection::Payable),
            amount: 50.0,
        }
    );
    assert_eq!(
        action("paid john 50"),
        FinanceAction::PayDebt {
            counterparty: "John".into(),
            direction: Some(DebtDirection::Payable),
            amount: 50.0,
        }
    );
    assert!(matches!(
        action("repaid aunt may 20"),
        FinanceAction::PayDebt { ref counterparty, .. } if counterparty == "Aunt May"
    ));
    // A category keyword after `paid` reads as spending, not as a counterparty.
    assert!(matches!(
        action("paid rent 1200"),
        FinanceAction::Expense { amount, ref category, .. } if amount == 1200.0 && category == "Housing"
    ));
}

#[test]
fn every_frequency_word_makes_a_recurring_entry() {
    for (word, frequency) in [
        ("day", Frequency::Daily),
        ("week", Frequency::Weekly),
        ("month", Frequency::Monthly),
        ("year", Frequency::Yearly),
    ] {
        let parsed = action(&format!("every {word} 20 gym"));
        assert_eq!(
            parsed,
            FinanceAction::AddRecurring {
                description: "Gym".into(),
                amount: 20.0,
                kind: EntryKind::Expense,
                category: "Health".into(),
                frequency,
            }
        );
    }
}

#[test]
fn amount_before_income_keyword() {
    assert_eq!(
        action("2500 salary"),
        FinanceAction::Income {
            amount: 2500.0,
            category: "Salary".into(),
            description: "salary".into(),
        }
    );
}

#[test]
fn rule_keyword_sets_the_budgeting_rule() {
    match action("rule 50/30/20") {
        FinanceAction::SetRule { rule } => {
            assert_eq!((rule.needs, rule.wants, rule.savings), (50, 30, 20));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn zero_and_negative_amounts_are_rejected() {
    for input in [
        "coffee -5",
        "spent -5 on coffee",
        "salary -100",
        "spent 0 on coffee",
        "lunch 0",
        "budget food 0",
    ] {
        assert!(
            matches!(parse(input, today()), Err(ParseError::InvalidAmount(_))),
            "`{input}` should be an invalid amount"
        );
    }
}

#[test]
fn first_matching_grammar_wins() {
    // Each of these also reads as `<description> <amount>` spending.
    assert!(matches!(action("budget food 400"), FinanceAction::SetBudget { .. }));
    assert!(matches!(action("debt from bank 50"), FinanceAction::AddDebt { .. }));
    assert!(matches!(action("paid back bank 100"), FinanceAction::PayDebt { .. }));
    assert!(matches!(action("salary 100"), FinanceAction::Income { .. }));
}

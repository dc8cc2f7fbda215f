use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use finbar_core::domain::{Conversation, Debt, DebtDirection, MonthKey, Transaction};
use finbar_core::finance::{edit_installment, monthly_report, schedule};
use finbar_core::parser::parse;

const INPUTS: &[&str] = &[
    "spent 12.50 on lunch",
    "salary 3000",
    "budget food 400 monthly",
    "goal Vacation 2000 by 2025-06-01",
    "save 150 for vacation",
    "debt from bank 1200 over 12 months",
    "paid back bank 100",
    "every month 15.99 netflix",
    "use 50/30/20 rule",
    "coffee 4.20 yesterday",
];

fn bench_parse_cascade(c: &mut Criterion) {
    let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    c.bench_function("parse_command_bar_mix", |b| {
        b.iter(|| {
            for input in INPUTS {
                let parsed = parse(black_box(input), today).expect("parse");
                black_box(parsed);
            }
        })
    });
}

fn bench_report(c: &mut Criterion) {
    let mut conversation = Conversation::new("Benchmark");
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let categories = ["Groceries", "Dining", "Transport", "Housing", "Shopping"];
    for idx in 0..10_000 {
        let date = start + chrono::Duration::days((idx % 365) as i64);
        conversation.add_transaction(Transaction::expense(
            5.0 + (idx % 90) as f64,
            categories[idx % categories.len()],
            "bench",
            date,
        ));
    }
    let month = MonthKey::new(2024, 6).unwrap();
    c.bench_function("monthly_report_10k", |b| {
        b.iter(|| black_box(monthly_report(&conversation, month)))
    });
}

fn bench_debt_edit(c: &mut Criterion) {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let plan = schedule(36_000.0, 360, start).expect("schedule");
    let debt = Debt::new("Mortgage", DebtDirection::Payable, 36_000.0, start, plan);
    c.bench_function("debt_edit_360", |b| {
        b.iter(|| {
            let mut copy = debt.clone();
            edit_installment(&mut copy, black_box(0), 250.0).expect("edit");
            black_box(copy);
        })
    });
}

criterion_group!(benches, bench_parse_cascade, bench_report, bench_debt_edit);
criterion_main!(benches);

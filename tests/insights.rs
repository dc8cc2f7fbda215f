mod common;

use common::{date, setup_manager};
use finbar_core::core::services::{ForecastService, ProfileService, ReportService, RuleService};
use finbar_core::core::FinanceManager;
use finbar_core::domain::{Bucket, BudgetRule, MonthKey};
use finbar_core::finance::LineStatus;
use finbar_core::parser::parse;

fn household() -> FinanceManager {
    let (mut manager, _) = setup_manager();
    for (line, day) in [
        ("salary 4000", 1),
        ("spent 1200 on rent", 1),
        ("budget dining 100", 2),
        ("spent 30 on lunch", 5),
        ("use 70/20/10 rule", 6),
        ("goal Car 1000", 8),
        ("save 200 for car", 10),
    ] {
        let parsed = parse(line, date(2024, 6, day)).unwrap();
        manager.apply(parsed, None).unwrap();
    }
    manager
}

#[test]
fn monthly_report_compares_plan_and_actuals() {
    let manager = household();
    let report = ReportService::monthly(manager.active(), MonthKey::new(2024, 6).unwrap());
    assert_eq!(report.income, 4000.0);
    assert_eq!(report.expenses, 1230.0);
    assert_eq!(report.net, 2770.0);
    assert_eq!(report.goal_contributions, 200.0);
    assert_eq!(report.top_category.as_deref(), Some("Housing"));

    let housing = &report.lines[0];
    assert_eq!(housing.status, LineStatus::Unplanned);
    assert!(housing.planned.is_none());
    let dining = report
        .lines
        .iter()
        .find(|line| line.category == "Dining")
        .unwrap();
    assert_eq!(dining.status, LineStatus::Under);
    assert_eq!(dining.variance, Some(70.0));
}

#[test]
fn rule_allocation_uses_the_conversation_rule() {
    let manager = household();
    let month = MonthKey::new(2024, 6).unwrap();
    let (allocation, statuses) =
        RuleService::allocation(manager.active(), month, &BudgetRule::default(), None).unwrap();
    assert_eq!(allocation.rule.name, "70/20/10");
    assert_eq!(allocation.bucket(Bucket::Needs).unwrap().amount, 2800.0);
    assert_eq!(allocation.bucket(Bucket::Wants).unwrap().amount, 800.0);
    assert_eq!(allocation.bucket(Bucket::Savings).unwrap().amount, 400.0);
    assert!(statuses.iter().all(|status| !status.over));

    // A stray cent lands on savings.
    let (odd, _) =
        RuleService::allocation(manager.active(), month, &BudgetRule::default(), Some(1000.01))
            .unwrap();
    assert_eq!(odd.bucket(Bucket::Needs).unwrap().amount, 700.0);
    assert_eq!(odd.bucket(Bucket::Savings).unwrap().amount, 100.01);
}

#[test]
fn forecast_projects_spending_and_goal_dates() {
    let manager = household();
    let today = date(2024, 6, 15);
    let forecast = ForecastService::month_end(manager.active(), today);
    assert_eq!(forecast.spent_to_date, 1230.0);
    assert_eq!(forecast.daily_average, 82.0);
    assert_eq!(forecast.projected_spending, 2460.0);
    assert_eq!(forecast.expected_income, 4000.0);
    assert_eq!(forecast.projected_net, 1540.0);

    let etas = ForecastService::goal_etas(manager.active(), today);
    assert_eq!(etas, vec![("Car".to_string(), Some(date(2024, 10, 15)))]);
}

#[test]
fn profile_rewards_a_complete_plan() {
    let manager = household();
    let profile = ProfileService::profile(manager.active(), date(2024, 6, 15));
    assert_eq!(profile.discipline, 100);
    assert!(profile.maturity >= 50, "maturity {}", profile.maturity);
    assert!(profile
        .insights
        .iter()
        .all(|insight| !insight.starts_with("Add ")));

    let (empty, _) = setup_manager();
    let bare = ProfileService::profile(empty.active(), date(2024, 6, 15));
    assert_eq!(bare.maturity, 0);
    assert!(bare
        .insights
        .iter()
        .any(|insight| insight == "Add budgets and goals and a budgeting rule to round out your plan."));
}

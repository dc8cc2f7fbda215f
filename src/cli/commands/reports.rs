use crate::cli::core::{parse_amount_arg, parse_month, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::services::{ForecastService, ProfileService, ReportService, RuleService};
use crate::domain::MonthKey;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "report",
            "Monthly report: planned vs actual per category, with a summary",
            "report [yyyy-mm]",
            cmd_report,
        ),
        CommandEntry::new(
            "allocate",
            "Split income by the budgeting rule and compare with spending",
            "allocate [income]",
            cmd_allocate,
        ),
        CommandEntry::new(
            "profile",
            "Score discipline, stability and maturity",
            "profile",
            cmd_profile,
        ),
        CommandEntry::new(
            "forecast",
            "Project month-end spending and goal completion dates",
            "forecast",
            cmd_forecast,
        ),
    ]
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let month = parse_month(args.first(), context.today())?;
    let money = context.money();
    let (report, narration) =
        ReportService::narrated(context.manager.active(), month, context.provider());

    output::section(format!("Report for {}", report.period));
    output::info(format!("  Income   : {}", money.format(report.income)));
    output::info(format!("  Expenses : {}", money.format(report.expenses)));
    output::info(format!(
        "  Net      : {} ({:.0}% saved)",
        money.format(report.net),
        report.savings_rate * 100.0
    ));
    if report.goal_contributions > 0.0 {
        output::info(format!(
            "  To goals : {}",
            money.format(report.goal_contributions)
        ));
    }
    let rows: Vec<Vec<String>> = report
        .lines
        .iter()
        .map(|line| {
            vec![
                line.category.clone(),
                line.planned.map(|value| money.format(value)).unwrap_or_else(|| "-".into()),
                money.format(line.actual),
                line.variance.map(|value| money.format(value)).unwrap_or_else(|| "-".into()),
                line.status.label().to_string(),
            ]
        })
        .collect();
    output::table(&["Category", "Planned", "Actual", "Variance", "Status"], &rows);
    println!();
    output::info(narration);
    Ok(())
}

fn cmd_allocate(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let income = args.first().map(|raw| parse_amount_arg(raw)).transpose()?;
    let month = MonthKey::of(context.today());
    let money = context.money();
    let (allocation, statuses) = RuleService::allocation(
        context.manager.active(),
        month,
        &context.config.default_rule,
        income,
    )?;

    output::section(format!(
        "{} rule on {}",
        allocation.rule.name,
        money.format(allocation.income)
    ));
    let mut rows = Vec::new();
    for bucket in &allocation.buckets {
        let status = statuses.iter().find(|status| status.bucket == bucket.bucket);
        rows.push(vec![
            bucket.bucket.label().to_string(),
            format!("{}%", bucket.percent),
            money.format(bucket.amount),
            status.map(|s| money.format(s.actual)).unwrap_or_default(),
            status
                .map(|s| {
                    if s.over {
                        format!("over by {}", money.format(-s.remaining))
                    } else {
                        format!("{} left", money.format(s.remaining))
                    }
                })
                .unwrap_or_default(),
        ]);
        for sub in &bucket.subcategories {
            rows.push(vec![
                format!("  {}", sub.name),
                format!("{}%", sub.percent),
                money.format(sub.amount),
                String::new(),
                String::new(),
            ]);
        }
    }
    output::table(&["Bucket", "Share", "Allocated", "Spent", "Status"], &rows);
    Ok(())
}

fn cmd_profile(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let profile = ProfileService::profile(context.manager.active(), context.today());
    output::section(format!("Financial profile ({})", profile.month));
    output::info(format!("  Discipline : {:>3}", profile.discipline));
    output::info(format!("  Stability  : {:>3}", profile.stability));
    output::info(format!("  Maturity   : {:>3}", profile.maturity));
    output::info(format!(
        "  Overall    : {:>3} ({})",
        profile.overall,
        profile.tier.label()
    ));
    for insight in &profile.insights {
        output::hint(insight);
    }
    Ok(())
}

fn cmd_forecast(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let today = context.today();
    let money = context.money();
    let conversation = context.manager.active();
    let forecast = ForecastService::month_end(conversation, today);
    output::section(format!("Forecast for {}", forecast.month));
    output::info(format!("  Spent so far        : {}", money.format(forecast.spent_to_date)));
    output::info(format!("  Daily average       : {}", money.format(forecast.daily_average)));
    output::info(format!(
        "  Scheduled recurring : {}",
        money.format(forecast.scheduled_recurring)
    ));
    output::info(format!(
        "  Installments due    : {}",
        money.format(forecast.scheduled_installments)
    ));
    output::info(format!(
        "  Projected spending  : {}",
        money.format(forecast.projected_spending)
    ));
    output::info(format!(
        "  Expected income     : {}",
        money.format(forecast.expected_income)
    ));
    output::info(format!("  Projected net       : {}", money.format(forecast.projected_net)));

    let etas = ForecastService::goal_etas(conversation, today);
    if !etas.is_empty() {
        output::section("Goal completion");
        for (name, eta) in etas {
            match eta {
                Some(date) => output::info(format!("  {:<20} {}", name, date)),
                None => output::info(format!("  {:<20} no contributions yet", name)),
            }
        }
    }
    Ok(())
}

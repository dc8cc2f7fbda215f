use crate::cli::core::{parse_amount_arg, parse_month, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::services::{
    BudgetService, DebtService, ForecastService, GoalService, RecurringService,
    TransactionService,
};
use crate::domain::{Debt, MonthKey};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "transactions",
            "List the month's income and expenses",
            "transactions [yyyy-mm]",
            cmd_transactions,
        ),
        CommandEntry::new(
            "budgets",
            "Show category budgets against this month's spending",
            "budgets",
            cmd_budgets,
        ),
        CommandEntry::new(
            "debts",
            "List open debts, or one debt's installment schedule",
            "debts [counterparty]",
            cmd_debts,
        ),
        CommandEntry::new(
            "debt-edit",
            "Change one installment; the difference moves to later installments",
            "debt-edit <counterparty> <installment #> <amount>",
            cmd_debt_edit,
        ),
        CommandEntry::new(
            "goals",
            "Show savings goals with progress and estimated completion",
            "goals",
            cmd_goals,
        ),
        CommandEntry::new(
            "recurring",
            "List recurring entries or stop one",
            "recurring [stop <description>]",
            cmd_recurring,
        ),
        CommandEntry::new(
            "post-recurring",
            "Post recurring entries that are due up to today",
            "post-recurring",
            cmd_post_recurring,
        ),
    ]
}

fn cmd_transactions(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let month = parse_month(args.first(), context.today())?;
    let money = context.money();
    let entries = TransactionService::list_for_month(context.manager.active(), month);
    if entries.is_empty() {
        output::info(format!("No entries in {}.", month));
        return Ok(());
    }
    output::section(format!("Entries for {}", month));
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|txn| {
            vec![
                txn.date.to_string(),
                txn.kind.label().to_string(),
                money.format(txn.signed_amount()),
                txn.category.clone(),
                txn.description.clone(),
            ]
        })
        .collect();
    output::table(&["Date", "Kind", "Amount", "Category", "Description"], &rows);
    Ok(())
}

fn cmd_budgets(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let month = MonthKey::of(context.today());
    let money = context.money();
    let conversation = context.manager.active();
    if conversation.budgets.is_empty() {
        output::info("No budgets yet. Try `budget food 400`.");
        return Ok(());
    }
    output::section(format!("Budgets for {}", month));
    let rows: Vec<Vec<String>> = conversation
        .budgets
        .iter()
        .map(|budget| {
            let spent = BudgetService::spent_in_month(conversation, &budget.category, month);
            vec![
                budget.category.clone(),
                format!("{} {}", money.format(budget.limit), budget.period.label()),
                money.format(budget.monthly_limit()),
                money.format(spent),
            ]
        })
        .collect();
    output::table(&["Category", "Limit", "Monthly", "Spent"], &rows);
    Ok(())
}

fn cmd_debts(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let money = context.money();
    if !args.is_empty() {
        let name = args.join(" ");
        let debt = DebtService::find_open(context.manager.active(), &name, None)?;
        print_schedule(debt, &money);
        return Ok(());
    }
    let debts = DebtService::outstanding(context.manager.active());
    if debts.is_empty() {
        output::info("No open debts.");
        return Ok(());
    }
    output::section("Open debts");
    let rows: Vec<Vec<String>> = debts
        .iter()
        .map(|debt| {
            let next = debt
                .next_unpaid()
                .map(|item| format!("{} on {}", money.format(item.amount), item.due_date))
                .unwrap_or_default();
            vec![
                debt.counterparty.clone(),
                debt.direction.label().to_string(),
                money.format(debt.principal),
                money.format(debt.outstanding()),
                next,
            ]
        })
        .collect();
    output::table(
        &["Counterparty", "Direction", "Principal", "Outstanding", "Next"],
        &rows,
    );
    Ok(())
}

fn print_schedule(debt: &Debt, money: &crate::currency::MoneyFormat) {
    output::section(format!(
        "{} ({}): {} outstanding",
        debt.counterparty,
        debt.direction.label(),
        money.format(debt.outstanding())
    ));
    let rows: Vec<Vec<String>> = debt
        .installments
        .iter()
        .map(|item| {
            vec![
                (item.index + 1).to_string(),
                item.due_date.to_string(),
                money.format(item.amount),
                item.paid_on
                    .map(|date| format!("paid {}", date))
                    .unwrap_or_else(|| "open".into()),
            ]
        })
        .collect();
    output::table(&["#", "Due", "Amount", "Status"], &rows);
}

fn cmd_debt_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [name @ .., number, amount] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: debt-edit <counterparty> <installment #> <amount>".into(),
        ));
    };
    if name.is_empty() {
        return Err(CommandError::InvalidArguments(
            "usage: debt-edit <counterparty> <installment #> <amount>".into(),
        ));
    }
    let counterparty = name.join(" ");
    let number: usize = number.parse().map_err(|_| {
        CommandError::InvalidArguments(format!("invalid installment number `{}`", number))
    })?;
    let amount = parse_amount_arg(amount)?;
    let money = context.money();
    let debt = context.manager.update(|conversation| {
        DebtService::edit_installment(conversation, &counterparty, number, amount).cloned()
    })?;
    output::success(format!("Installment {} set to {}.", number, money.format(amount)));
    print_schedule(&debt, &money);
    Ok(())
}

fn cmd_goals(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let money = context.money();
    let today = context.today();
    let conversation = context.manager.active();
    let goals = GoalService::list(conversation);
    if goals.is_empty() {
        output::info("No goals yet. Try `goal Vacation 2000`.");
        return Ok(());
    }
    let etas = ForecastService::goal_etas(conversation, today);
    output::section("Goals");
    let rows: Vec<Vec<String>> = goals
        .iter()
        .map(|goal| {
            let eta = if goal.is_complete() {
                "done".to_string()
            } else {
                etas.iter()
                    .find(|(name, _)| name == &goal.name)
                    .and_then(|(_, eta)| *eta)
                    .map(|date| date.to_string())
                    .unwrap_or_else(|| "-".into())
            };
            vec![
                goal.name.clone(),
                format!("{} / {}", money.format(goal.saved), money.format(goal.target)),
                format!("{:.0}%", goal.progress() * 100.0),
                goal.deadline.map(|date| date.to_string()).unwrap_or_default(),
                eta,
            ]
        })
        .collect();
    output::table(&["Goal", "Saved", "Progress", "Deadline", "ETA"], &rows);
    Ok(())
}

fn cmd_recurring(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            let money = context.money();
            let active = RecurringService::active(context.manager.active());
            if active.is_empty() {
                output::info("No recurring entries.");
                return Ok(());
            }
            output::section("Recurring entries");
            let rows: Vec<Vec<String>> = active
                .iter()
                .map(|charge| {
                    vec![
                        charge.description.clone(),
                        charge.kind.label().to_string(),
                        money.format(charge.amount),
                        charge.frequency.label().to_string(),
                        charge.category.clone(),
                        charge.next_due.to_string(),
                    ]
                })
                .collect();
            output::table(
                &["Description", "Kind", "Amount", "Every", "Category", "Next due"],
                &rows,
            );
            Ok(())
        }
        [action, rest @ ..] if action.eq_ignore_ascii_case("stop") && !rest.is_empty() => {
            let description = rest.join(" ");
            let stopped = context
                .manager
                .update(|conversation| RecurringService::deactivate(conversation, &description))?;
            output::success(format!("Stopped `{}`.", stopped));
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(
            "usage: recurring [stop <description>]".into(),
        )),
    }
}

fn cmd_post_recurring(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let today = context.today();
    let posted = context
        .manager
        .update(|conversation| Ok(RecurringService::post_due(conversation, today)))?;
    if posted == 0 {
        output::info("Nothing due.");
    } else {
        let noun = if posted == 1 { "entry" } else { "entries" };
        output::success(format!("Posted {} recurring {}.", posted, noun));
    }
    Ok(())
}

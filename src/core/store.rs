//! In-memory home of every conversation plus the what-if simulation shadow.
//!
//! The store owns committed conversations and, while a simulation runs, a
//! deep copy of the active one. Reads and writes through [`FinanceStore::active`]
//! and [`FinanceStore::active_mut`] see the shadow copy; persistence only ever
//! sees committed data through [`FinanceStore::conversations`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::ai::AiProvider;
use crate::categorize::{self, OTHER, OTHER_INCOME};
use crate::core::services::{
    BudgetService, DebtService, GoalService, RecurringService, RuleService, ServiceResult,
    TransactionService,
};
use crate::domain::{
    common::{from_cents, to_cents},
    transaction::total_for_month,
    Conversation, DebtDirection, EntryKind, MonthKey, Transaction,
};
use crate::errors::FinanceError;
use crate::parser::{FinanceAction, ParseSource, ParsedCommand};
use crate::utils::fs::canonical_name;

pub const DEFAULT_CONVERSATION: &str = "Default";

#[derive(Debug, Clone)]
struct Simulation {
    base_id: Uuid,
    shadow: Conversation,
    started_at: DateTime<Utc>,
}

/// Headline figures compared between the committed and simulated data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Snapshot {
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
    pub goal_savings: f64,
    pub outstanding_debt: f64,
}

impl Snapshot {
    fn of(conversation: &Conversation, month: MonthKey) -> Self {
        let income = total_for_month(&conversation.transactions, EntryKind::Income, month);
        let expenses = total_for_month(&conversation.transactions, EntryKind::Expense, month);
        let outstanding: i64 = conversation
            .debts
            .iter()
            .filter(|debt| debt.direction == DebtDirection::Payable)
            .map(|debt| debt.outstanding_cents())
            .sum();
        Self {
            income,
            expenses,
            net: from_cents(to_cents(income) - to_cents(expenses)),
            goal_savings: conversation.goal_savings(),
            outstanding_debt: from_cents(outstanding),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationImpact {
    pub month: MonthKey,
    pub base: Snapshot,
    pub simulated: Snapshot,
}

impl SimulationImpact {
    pub fn net_delta(&self) -> f64 {
        from_cents(to_cents(self.simulated.net) - to_cents(self.base.net))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationStatus {
    pub conversation: String,
    pub started_at: DateTime<Utc>,
}

/// What applying one command did, phrased for the user.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyOutcome {
    pub action: &'static str,
    pub message: String,
    pub source: ParseSource,
    pub simulated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSummary {
    pub name: String,
    pub active: bool,
    pub entries: usize,
}

pub struct FinanceStore {
    conversations: Vec<Conversation>,
    active: Uuid,
    simulation: Option<Simulation>,
}

impl FinanceStore {
    /// Builds a store from loaded conversations; an empty list yields one default conversation.
    pub fn new(mut conversations: Vec<Conversation>, active_name: Option<&str>) -> Self {
        if conversations.is_empty() {
            conversations.push(Conversation::new(DEFAULT_CONVERSATION));
        }
        let active = active_name
            .and_then(|name| {
                conversations
                    .iter()
                    .find(|conversation| conversation.name.eq_ignore_ascii_case(name))
            })
            .unwrap_or(&conversations[0])
            .id;
        Self {
            conversations,
            active,
            simulation: None,
        }
    }

    /// Committed conversations (never the simulation shadow).
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn list(&self) -> Vec<ConversationSummary> {
        self.conversations
            .iter()
            .map(|conversation| ConversationSummary {
                name: conversation.name.clone(),
                active: conversation.id == self.active,
                entries: conversation.transactions.len(),
            })
            .collect()
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.conversations
            .iter()
            .position(|conversation| conversation.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Conversations whose names map to the same file name collide on disk.
    fn index_of_file(&self, name: &str) -> Option<usize> {
        let slug = canonical_name(name);
        self.conversations
            .iter()
            .position(|conversation| canonical_name(&conversation.name) == slug)
    }

    fn active_index(&self) -> usize {
        self.conversations
            .iter()
            .position(|conversation| conversation.id == self.active)
            .unwrap_or(0)
    }

    /// The committed active conversation, ignoring any simulation.
    pub fn committed(&self) -> &Conversation {
        &self.conversations[self.active_index()]
    }

    /// The active conversation as the user currently sees it.
    pub fn active(&self) -> &Conversation {
        match &self.simulation {
            Some(simulation) => &simulation.shadow,
            None => self.committed(),
        }
    }

    pub fn active_mut(&mut self) -> &mut Conversation {
        let index = self.active_index();
        match self.simulation.as_mut() {
            Some(simulation) => &mut simulation.shadow,
            None => &mut self.conversations[index],
        }
    }

    fn ensure_not_simulating(&self) -> Result<(), FinanceError> {
        if self.simulation.is_some() {
            Err(FinanceError::SimulationActive)
        } else {
            Ok(())
        }
    }

    pub fn create_conversation(&mut self, name: &str) -> Result<&Conversation, FinanceError> {
        self.ensure_not_simulating()?;
        let name = name.trim();
        if name.is_empty() {
            return Err(FinanceError::Validation("conversation name is empty".into()));
        }
        if let Some(existing) = self.index_of_file(name) {
            return Err(FinanceError::Validation(format!(
                "conversation `{}` already exists as `{}`",
                name, self.conversations[existing].name
            )));
        }
        let conversation = Conversation::new(name);
        self.active = conversation.id;
        self.conversations.push(conversation);
        info!(conversation = name, "conversation created");
        Ok(self.committed())
    }

    pub fn switch(&mut self, name: &str) -> Result<&Conversation, FinanceError> {
        self.ensure_not_simulating()?;
        let index = self
            .index_of(name)
            .ok_or_else(|| FinanceError::InvalidRef(format!("conversation `{}`", name.trim())))?;
        self.active = self.conversations[index].id;
        Ok(&self.conversations[index])
    }

    /// Renames a conversation, returning its previous name.
    pub fn rename(&mut self, name: &str, new_name: &str) -> Result<String, FinanceError> {
        self.ensure_not_simulating()?;
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(FinanceError::Validation("conversation name is empty".into()));
        }
        let index = self
            .index_of(name)
            .ok_or_else(|| FinanceError::InvalidRef(format!("conversation `{}`", name.trim())))?;
        if let Some(other) = self.index_of_file(new_name) {
            if other != index {
                return Err(FinanceError::Validation(format!(
                    "conversation `{}` already exists as `{}`",
                    new_name, self.conversations[other].name
                )));
            }
        }
        let conversation = &mut self.conversations[index];
        let previous = std::mem::replace(&mut conversation.name, new_name.to_string());
        conversation.touch();
        Ok(previous)
    }

    /// Deletes a conversation; the last remaining one cannot be deleted.
    pub fn delete(&mut self, name: &str) -> Result<Conversation, FinanceError> {
        self.ensure_not_simulating()?;
        let index = self
            .index_of(name)
            .ok_or_else(|| FinanceError::InvalidRef(format!("conversation `{}`", name.trim())))?;
        if self.conversations.len() == 1 {
            return Err(FinanceError::Validation(
                "cannot delete the only conversation".into(),
            ));
        }
        let removed = self.conversations.remove(index);
        if removed.id == self.active {
            self.active = self.conversations[0].id;
        }
        info!(conversation = %removed.name, "conversation deleted");
        Ok(removed)
    }

    /// Replaces the committed conversation sharing `conversation`'s name, e.g. after a restore.
    pub fn replace(&mut self, conversation: Conversation) -> Result<(), FinanceError> {
        self.ensure_not_simulating()?;
        let index = self
            .index_of(&conversation.name)
            .ok_or_else(|| FinanceError::InvalidRef(format!("conversation `{}`", conversation.name)))?;
        if self.conversations[index].id == self.active {
            self.active = conversation.id;
        }
        self.conversations[index] = conversation;
        Ok(())
    }

    pub fn is_simulating(&self) -> bool {
        self.simulation.is_some()
    }

    pub fn simulation_status(&self) -> Option<SimulationStatus> {
        self.simulation.as_ref().map(|simulation| SimulationStatus {
            conversation: simulation.shadow.name.clone(),
            started_at: simulation.started_at,
        })
    }

    pub fn begin_simulation(&mut self) -> Result<(), FinanceError> {
        self.ensure_not_simulating()?;
        let base = self.committed();
        self.simulation = Some(Simulation {
            base_id: base.id,
            shadow: base.clone(),
            started_at: Utc::now(),
        });
        debug!("simulation started");
        Ok(())
    }

    pub fn simulation_impact(&self, month: MonthKey) -> Result<SimulationImpact, FinanceError> {
        let simulation = self.simulation.as_ref().ok_or(FinanceError::NoSimulation)?;
        Ok(SimulationImpact {
            month,
            base: Snapshot::of(self.committed(), month),
            simulated: Snapshot::of(&simulation.shadow, month),
        })
    }

    /// Replaces the committed conversation with the simulated copy.
    pub fn commit_simulation(&mut self) -> Result<&Conversation, FinanceError> {
        let simulation = self.simulation.take().ok_or(FinanceError::NoSimulation)?;
        let index = self
            .conversations
            .iter()
            .position(|conversation| conversation.id == simulation.base_id)
            .ok_or_else(|| FinanceError::InvalidRef("simulated conversation is gone".into()))?;
        let mut shadow = simulation.shadow;
        shadow.touch();
        self.conversations[index] = shadow;
        info!("simulation committed");
        Ok(&self.conversations[index])
    }

    pub fn discard_simulation(&mut self) -> Result<(), FinanceError> {
        self.simulation.take().ok_or(FinanceError::NoSimulation)?;
        info!("simulation discarded");
        Ok(())
    }

    /// Applies a parsed command to the active (possibly simulated) conversation.
    pub fn apply(
        &mut self,
        command: ParsedCommand,
        provider: Option<&dyn AiProvider>,
    ) -> ServiceResult<ApplyOutcome> {
        let simulated = self.is_simulating();
        let ParsedCommand {
            action,
            source,
            date,
        } = command;
        let name = action.name();
        let message = apply_action(self.active_mut(), action, date, provider)?;
        debug!(action = name, ?source, simulated, "command applied");
        Ok(ApplyOutcome {
            action: name,
            message,
            source,
            simulated,
        })
    }
}

fn refine_category(
    category: String,
    description: &str,
    kind: EntryKind,
    provider: Option<&dyn AiProvider>,
) -> String {
    let generic = match kind {
        EntryKind::Expense => OTHER,
        EntryKind::Income => OTHER_INCOME,
    };
    if provider.is_some() && category == generic {
        categorize::categorize_with_fallback(description, kind, provider)
    } else {
        category
    }
}

fn apply_action(
    conversation: &mut Conversation,
    action: FinanceAction,
    date: NaiveDate,
    provider: Option<&dyn AiProvider>,
) -> ServiceResult<String> {
    let message = match action {
        FinanceAction::Expense {
            amount,
            category,
            description,
        } => {
            let category = refine_category(category, &description, EntryKind::Expense, provider);
            let txn = Transaction::expense(amount, category.clone(), description.clone(), date);
            TransactionService::add(conversation, txn)?;
            format!("Expense {:.2} [{}] {} on {}", amount, category, description, date)
        }
        FinanceAction::Income {
            amount,
            category,
            description,
        } => {
            let category = refine_category(category, &description, EntryKind::Income, provider);
            let txn = Transaction::income(amount, category.clone(), description.clone(), date);
            TransactionService::add(conversation, txn)?;
            format!("Income {:.2} [{}] {} on {}", amount, category, description, date)
        }
        FinanceAction::SetBudget {
            category,
            limit,
            period,
        } => {
            let replaced = BudgetService::set(conversation, &category, limit, period)?;
            format!(
                "Budget {} {} {:.2} ({})",
                if replaced { "updated:" } else { "set:" },
                category,
                limit,
                period.label()
            )
        }
        FinanceAction::CreateGoal {
            name,
            target,
            deadline,
        } => {
            GoalService::create(conversation, &name, target, deadline)?;
            match deadline {
                Some(deadline) => format!("Goal {} created: {:.2} by {}", name, target, deadline),
                None => format!("Goal {} created: {:.2}", name, target),
            }
        }
        FinanceAction::Contribute { goal, amount } => {
            let outcome = GoalService::contribute(conversation, &goal, amount, date)?;
            let mut message = format!(
                "Saved {:.2} towards {} ({:.2} of {:.2})",
                amount, outcome.goal, outcome.saved, outcome.target
            );
            if outcome.completed {
                message.push_str(", goal reached!");
            }
            message
        }
        FinanceAction::AddDebt {
            counterparty,
            direction,
            amount,
            months,
        } => {
            DebtService::add(conversation, &counterparty, direction, amount, months, date)?;
            let per = from_cents(to_cents(amount) / i64::from(months.max(1)));
            format!(
                "Debt with {} ({}) {:.2} over {} month{} (about {:.2} each)",
                counterparty,
                direction.label(),
                amount,
                months,
                if months == 1 { "" } else { "s" },
                per
            )
        }
        FinanceAction::PayDebt {
            counterparty,
            direction,
            amount,
        } => {
            let outcome = DebtService::pay(conversation, &counterparty, direction, amount, date)?;
            if outcome.settled {
                format!("Paid {:.2} to settle the debt with {}", amount, outcome.counterparty)
            } else {
                format!(
                    "Paid {:.2} on installment {} with {}; {:.2} outstanding",
                    amount,
                    outcome.installment + 1,
                    outcome.counterparty,
                    outcome.outstanding
                )
            }
        }
        FinanceAction::AddRecurring {
            description,
            amount,
            kind,
            category,
            frequency,
        } => {
            let category = refine_category(category, &description, kind, provider);
            RecurringService::add(
                conversation,
                &description,
                amount,
                kind,
                &category,
                frequency,
                date,
            )?;
            format!(
                "Recurring {} {:.2} {} [{}] starting {}",
                kind.label(),
                amount,
                frequency.label(),
                category,
                date
            )
        }
        FinanceAction::SetRule { rule } => {
            let name = rule.name.clone();
            RuleService::set(conversation, rule);
            format!("Budgeting rule set to {}", name)
        }
    };
    Ok(message)
}

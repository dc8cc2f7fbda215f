//! Business logic helpers for recording income and expenses.

use uuid::Uuid;

use crate::core::services::{ensure_positive, ServiceError, ServiceResult};
use crate::domain::{MonthKey, Conversation, Transaction};

/// Provides validated CRUD helpers for conversation transactions.
pub struct TransactionService;

impl TransactionService {
    /// Adds a new transaction and returns its identifier.
    pub fn add(conversation: &mut Conversation, transaction: Transaction) -> ServiceResult<Uuid> {
        ensure_positive(transaction.amount, "transaction amount")?;
        if transaction.category.trim().is_empty() {
            return Err(ServiceError::Invalid("transaction needs a category".into()));
        }
        Ok(conversation.add_transaction(transaction))
    }

    /// Removes the transaction identified by `id`, returning the removed instance.
    pub fn remove(conversation: &mut Conversation, id: Uuid) -> ServiceResult<Transaction> {
        conversation
            .remove_transaction(id)
            .ok_or_else(|| ServiceError::NotFound("Transaction not found".into()))
    }

    /// Entries dated within `month`, oldest first.
    pub fn list_for_month(conversation: &Conversation, month: MonthKey) -> Vec<&Transaction> {
        let mut entries: Vec<&Transaction> = conversation.transactions_in(month).collect();
        entries.sort_by_key(|txn| txn.date);
        entries
    }
}

//! Main ledger facade coordinating users, accounts, and transfers

use std::collections::HashMap;
use uuid::Uuid;

use crate::ledger::{AccountManager, TransferEngine, UserManager};
use crate::traits::*;
use crate::types::*;

/// Main ledger system orchestrating all operations.
///
/// Generic over a storage backend implementing the three storage traits;
/// clones of the backend share state, so each manager gets its own handle.
pub struct Ledger<S> {
    users: UserManager<S>,
    accounts: AccountManager<S>,
    transfers: TransferEngine<S>,
}

impl<S> Ledger<S>
where
    S: LedgerStore + AccountDirectory + UserDirectory + Clone,
{
    /// Create a new ledger over the given storage backend
    pub fn new(storage: S) -> Self {
        Self {
            users: UserManager::new(storage.clone()),
            accounts: AccountManager::new(storage.clone()),
            transfers: TransferEngine::new(storage),
        }
    }

    // User operations

    /// Register a new user
    pub async fn register_user(&self, email: &str) -> LedgerResult<User> {
        self.users.register_user(email).await
    }

    /// Get a user by ID
    pub async fn user(&self, id: Uuid) -> LedgerResult<Option<User>> {
        self.users.user(id).await
    }

    /// Get a user by email
    pub async fn user_by_email(&self, email: &str) -> LedgerResult<Option<User>> {
        self.users.user_by_email(email).await
    }

    // Account operations

    /// Open a new account for an existing user
    pub async fn open_account(&self, user_id: Uuid) -> LedgerResult<Account> {
        self.accounts.open_account(user_id).await
    }

    /// Get an account by ID
    pub async fn account(&self, id: Uuid) -> LedgerResult<Option<Account>> {
        self.accounts.account(id).await
    }

    /// List all accounts belonging to a user
    pub async fn user_accounts(&self, user_id: Uuid) -> LedgerResult<Vec<Account>> {
        self.accounts.user_accounts(user_id).await
    }

    /// Batch-resolve active accounts by account number
    pub async fn resolve_numbers(
        &self,
        numbers: &[String],
    ) -> LedgerResult<HashMap<String, Account>> {
        self.accounts.resolve_numbers(numbers).await
    }

    /// Soft-disable an account
    pub async fn disable_account(&self, id: Uuid) -> LedgerResult<Account> {
        self.accounts.disable_account(id).await
    }

    // Transfer and query operations

    /// Create a transaction from a transfer request
    pub async fn create_transaction(&self, request: TransferRequest) -> LedgerResult<Transaction> {
        self.transfers.create_transaction(request).await
    }

    /// Derived balance for an account
    pub async fn balance(&self, account_id: Uuid) -> LedgerResult<i64> {
        self.transfers.balance(account_id).await
    }

    /// Get a transaction by ID, with its lines
    pub async fn transaction(&self, id: Uuid) -> LedgerResult<Option<Transaction>> {
        self.transfers.transaction(id).await
    }

    /// Get an account's transaction history, newest first
    pub async fn account_transactions(&self, account_id: Uuid) -> LedgerResult<Vec<Transaction>> {
        self.transfers.account_transactions(account_id).await
    }
}

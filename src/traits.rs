//! Traits for storage abstraction and the atomic-commit contract
//!
//! The ledger core is database-agnostic: any backend that can provide
//! point/range reads and atomic multi-row writes can back it by
//! implementing these traits.

use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

use crate::types::*;

/// Fields required to register a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
}

/// Fields required to open a new account
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Account number to issue. Uniqueness is enforced by the store.
    pub account_number: String,
    /// Owning user. `None` only when seeding the root account.
    pub user_id: Option<Uuid>,
}

/// Fields required to create a single transaction line
#[derive(Debug, Clone)]
pub struct NewTransactionLine {
    pub account_id: Uuid,
    pub purpose: TransactionPurpose,
    pub amount: u64,
}

impl NewTransactionLine {
    /// Create a credit line
    pub fn credit(account_id: Uuid, amount: u64) -> Self {
        Self {
            account_id,
            purpose: TransactionPurpose::Credit,
            amount,
        }
    }

    /// Create a debit line
    pub fn debit(account_id: Uuid, amount: u64) -> Self {
        Self {
            account_id,
            purpose: TransactionPurpose::Debit,
            amount,
        }
    }
}

/// Storage operations for the user registry
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Insert a new user. Fails with [`LedgerError::DuplicateEmail`] if the
    /// email is already registered.
    async fn insert_user(&self, new: NewUser) -> LedgerResult<User>;

    /// Get a user by ID
    async fn user_by_id(&self, id: Uuid) -> LedgerResult<Option<User>>;

    /// Get a user by email
    async fn user_by_email(&self, email: &str) -> LedgerResult<Option<User>>;
}

/// Storage operations for account records and their lifecycle state
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Insert a new account. Fails with
    /// [`LedgerError::DuplicateAccountNumber`] on a unique-key conflict,
    /// which callers use as the arbiter in their number-generation retry
    /// loop.
    async fn insert_account(&self, new: NewAccount) -> LedgerResult<Account>;

    /// Get an account by ID, regardless of lifecycle state
    async fn account_by_id(&self, id: Uuid) -> LedgerResult<Option<Account>>;

    /// Batch-resolve active accounts by account number.
    ///
    /// Returns a map keyed by account number containing only the numbers
    /// that resolved to an active account; absent keys did not resolve.
    /// Implementations must always resolve [`ROOT_ACCOUNT_NUMBER`].
    async fn accounts_by_numbers(
        &self,
        numbers: &[String],
    ) -> LedgerResult<HashMap<String, Account>>;

    /// List all accounts belonging to a user, active or disabled
    async fn accounts_by_user(&self, user_id: Uuid) -> LedgerResult<Vec<Account>>;

    /// Soft-disable an account. Fails with [`LedgerError::AccountNotFound`]
    /// if the account does not exist and [`LedgerError::AlreadyDisabled`]
    /// if it is already disabled. Never deletes the row.
    async fn disable_account(&self, id: Uuid) -> LedgerResult<Account>;
}

/// Storage operations for the append-only transaction ledger
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// The scoped atomic unit this store hands out
    type Session: StoreSession;

    /// Begin an atomic unit. All writes staged through the session become
    /// visible only on commit.
    async fn begin(&self) -> LedgerResult<Self::Session>;

    /// Read a transaction by ID, with its lines
    async fn transaction_by_id(&self, id: Uuid) -> LedgerResult<Option<Transaction>>;

    /// Read all transactions an account participates in, newest first,
    /// each with its full line set. Transactions keep the order of their
    /// first appearance in the underlying joined read.
    async fn transactions_by_account(&self, account_id: Uuid) -> LedgerResult<Vec<Transaction>>;

    /// Derived balance for an account: credits minus debits over all its
    /// lines. Zero for an account with no lines.
    async fn balance(&self, account_id: Uuid) -> LedgerResult<i64>;
}

/// A scoped atomic unit against the ledger store.
///
/// The balance read and the line inserts for a transfer must happen inside
/// one session so that two concurrent transfers from the same account
/// cannot both observe a stale pre-debit balance. Implementations must
/// guarantee that a session dropped without [`commit`](Self::commit)
/// discards all staged rows, exactly as [`rollback`](Self::rollback) does;
/// callers rely on this for every early-return path.
#[async_trait]
pub trait StoreSession: Send {
    /// Insert a transaction header. Fails with
    /// [`LedgerError::DuplicateReference`] if the reference already exists
    /// in the ledger. Returns the header with its assigned identity and
    /// timestamp and no lines yet.
    async fn insert_transaction(&mut self, reference: &str) -> LedgerResult<Transaction>;

    /// Bulk-insert lines for a transaction created in this session
    async fn insert_lines(
        &mut self,
        transaction_id: Uuid,
        lines: &[NewTransactionLine],
    ) -> LedgerResult<Vec<TransactionLine>>;

    /// Derived balance for an account, consistent with this session's
    /// isolation. Includes rows staged in this session.
    async fn balance(&mut self, account_id: Uuid) -> LedgerResult<i64>;

    /// Make all staged rows visible atomically
    async fn commit(self) -> LedgerResult<()>;

    /// Discard all staged rows
    async fn rollback(self) -> LedgerResult<()>;
}

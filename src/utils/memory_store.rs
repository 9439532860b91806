//! In-memory store implementation for testing and development
//!
//! Tables mirror the relational schema the ledger targets: users,
//! accounts, transactions, and transaction_lines, with insertion order
//! standing in for commit order. A [`StoreSession`] holds the store's
//! single async mutex for its whole lifetime, so atomic units execute
//! fully serialized - the strongest form of the isolation the funds check
//! requires.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::traits::*;
use crate::types::*;
use crate::utils::grouping::group_joined_rows;

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
    transaction_lines: Vec<TransactionLine>,
}

impl Tables {
    fn reference_exists(&self, reference: &str) -> bool {
        self.transactions.iter().any(|tx| tx.reference == reference)
    }

    fn lines_of(&self, transaction_id: Uuid) -> Vec<TransactionLine> {
        self.transaction_lines
            .iter()
            .filter(|line| line.transaction_id == transaction_id)
            .cloned()
            .collect()
    }
}

/// In-memory storage backend implementing all ledger storage traits.
///
/// Cloning is cheap and clones share the same tables. The root account is
/// seeded at construction so [`ROOT_ACCOUNT_NUMBER`] always resolves.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    root_account_id: Uuid,
}

impl MemoryStore {
    /// Create a new store with an empty ledger and a seeded root account
    pub fn new() -> Self {
        let now = chrono::Utc::now().naive_utc();
        let root = Account {
            id: Uuid::new_v4(),
            account_number: ROOT_ACCOUNT_NUMBER.to_string(),
            user_id: None,
            status: AccountStatus::Active,
            created_at: now,
            updated_at: now,
            disabled_at: None,
        };
        let root_account_id = root.id;

        let tables = Tables {
            accounts: vec![root],
            ..Tables::default()
        };

        Self {
            tables: Arc::new(Mutex::new(tables)),
            root_account_id,
        }
    }

    /// ID of the seeded root account
    pub fn root_account_id(&self) -> Uuid {
        self.root_account_id
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn insert_user(&self, new: NewUser) -> LedgerResult<User> {
        let mut tables = self.tables.lock().await;

        if tables.users.iter().any(|user| user.email == new.email) {
            return Err(LedgerError::DuplicateEmail(new.email));
        }

        let now = chrono::Utc::now().naive_utc();
        let user = User {
            id: Uuid::new_v4(),
            email: new.email,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn user_by_id(&self, id: Uuid) -> LedgerResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|user| user.id == id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> LedgerResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|user| user.email == email).cloned())
    }
}

#[async_trait]
impl AccountDirectory for MemoryStore {
    async fn insert_account(&self, new: NewAccount) -> LedgerResult<Account> {
        let mut tables = self.tables.lock().await;

        // unique account_number, regardless of lifecycle state
        if tables
            .accounts
            .iter()
            .any(|account| account.account_number == new.account_number)
        {
            return Err(LedgerError::DuplicateAccountNumber(new.account_number));
        }

        // owning user must exist
        if let Some(user_id) = new.user_id {
            if !tables.users.iter().any(|user| user.id == user_id) {
                return Err(LedgerError::UserNotFound(user_id));
            }
        }

        let now = chrono::Utc::now().naive_utc();
        let account = Account {
            id: Uuid::new_v4(),
            account_number: new.account_number,
            user_id: new.user_id,
            status: AccountStatus::Active,
            created_at: now,
            updated_at: now,
            disabled_at: None,
        };
        tables.accounts.push(account.clone());
        Ok(account)
    }

    async fn account_by_id(&self, id: Uuid) -> LedgerResult<Option<Account>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .accounts
            .iter()
            .find(|account| account.id == id)
            .cloned())
    }

    async fn accounts_by_numbers(
        &self,
        numbers: &[String],
    ) -> LedgerResult<HashMap<String, Account>> {
        let tables = self.tables.lock().await;
        let resolved = tables
            .accounts
            .iter()
            .filter(|account| {
                account.is_active() && numbers.contains(&account.account_number)
            })
            .map(|account| (account.account_number.clone(), account.clone()))
            .collect();
        Ok(resolved)
    }

    async fn accounts_by_user(&self, user_id: Uuid) -> LedgerResult<Vec<Account>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .accounts
            .iter()
            .filter(|account| account.user_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn disable_account(&self, id: Uuid) -> LedgerResult<Account> {
        let mut tables = self.tables.lock().await;

        let account = tables
            .accounts
            .iter_mut()
            .find(|account| account.id == id)
            .ok_or_else(|| LedgerError::AccountNotFound(id.to_string()))?;

        if !account.is_active() {
            return Err(LedgerError::AlreadyDisabled(id));
        }

        account.disable();
        Ok(account.clone())
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    type Session = MemorySession;

    async fn begin(&self) -> LedgerResult<Self::Session> {
        let guard = self.tables.clone().lock_owned().await;
        Ok(MemorySession {
            tables: guard,
            staged_transactions: Vec::new(),
            staged_lines: Vec::new(),
        })
    }

    async fn transaction_by_id(&self, id: Uuid) -> LedgerResult<Option<Transaction>> {
        let tables = self.tables.lock().await;
        let Some(header) = tables.transactions.iter().find(|tx| tx.id == id) else {
            return Ok(None);
        };

        let mut transaction = header.clone();
        transaction.lines = tables.lines_of(id);
        Ok(Some(transaction))
    }

    async fn transactions_by_account(&self, account_id: Uuid) -> LedgerResult<Vec<Transaction>> {
        let tables = self.tables.lock().await;

        // emulate the joined read: newest transaction first, one row per
        // line, full line set for every transaction the account touches
        let mut rows = Vec::new();
        for header in tables.transactions.iter().rev() {
            let lines = tables.lines_of(header.id);
            if lines.iter().any(|line| line.account_id == account_id) {
                for line in lines {
                    rows.push((header.clone(), line));
                }
            }
        }

        Ok(group_joined_rows(rows))
    }

    async fn balance(&self, account_id: Uuid) -> LedgerResult<i64> {
        let tables = self.tables.lock().await;
        Ok(net_balance(
            tables
                .transaction_lines
                .iter()
                .filter(|line| line.account_id == account_id),
        ))
    }
}

/// An atomic unit against a [`MemoryStore`].
///
/// Holds the store lock for its lifetime; inserts are staged locally and
/// only merged into the tables on [`commit`](StoreSession::commit).
/// Dropping the session discards all staged rows.
pub struct MemorySession {
    tables: OwnedMutexGuard<Tables>,
    staged_transactions: Vec<Transaction>,
    staged_lines: Vec<TransactionLine>,
}

#[async_trait]
impl StoreSession for MemorySession {
    async fn insert_transaction(&mut self, reference: &str) -> LedgerResult<Transaction> {
        if self.tables.reference_exists(reference)
            || self
                .staged_transactions
                .iter()
                .any(|tx| tx.reference == reference)
        {
            return Err(LedgerError::DuplicateReference(reference.to_string()));
        }

        let transaction = Transaction {
            id: Uuid::new_v4(),
            reference: reference.to_string(),
            lines: Vec::new(),
            created_at: chrono::Utc::now().naive_utc(),
        };
        self.staged_transactions.push(transaction.clone());
        Ok(transaction)
    }

    async fn insert_lines(
        &mut self,
        transaction_id: Uuid,
        lines: &[NewTransactionLine],
    ) -> LedgerResult<Vec<TransactionLine>> {
        if !self
            .staged_transactions
            .iter()
            .any(|tx| tx.id == transaction_id)
        {
            return Err(LedgerError::TransactionNotFound(transaction_id));
        }

        let now = chrono::Utc::now().naive_utc();
        let mut inserted = Vec::with_capacity(lines.len());

        for new in lines {
            // referenced account must exist
            if !self
                .tables
                .accounts
                .iter()
                .any(|account| account.id == new.account_id)
            {
                return Err(LedgerError::AccountNotFound(new.account_id.to_string()));
            }

            // unique (account_id, transaction_id)
            let duplicate = self
                .staged_lines
                .iter()
                .chain(inserted.iter())
                .any(|line: &TransactionLine| {
                    line.transaction_id == transaction_id && line.account_id == new.account_id
                });
            if duplicate {
                return Err(LedgerError::InvalidTransaction(format!(
                    "account {} appears more than once in transaction {}",
                    new.account_id, transaction_id
                )));
            }

            inserted.push(TransactionLine {
                id: Uuid::new_v4(),
                account_id: new.account_id,
                transaction_id,
                purpose: new.purpose,
                amount: new.amount,
                created_at: now,
            });
        }

        self.staged_lines.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn balance(&mut self, account_id: Uuid) -> LedgerResult<i64> {
        Ok(net_balance(
            self.tables
                .transaction_lines
                .iter()
                .chain(self.staged_lines.iter())
                .filter(|line| line.account_id == account_id),
        ))
    }

    async fn commit(mut self) -> LedgerResult<()> {
        self.tables
            .transactions
            .append(&mut self.staged_transactions);
        self.tables.transaction_lines.append(&mut self.staged_lines);
        Ok(())
    }

    async fn rollback(self) -> LedgerResult<()> {
        // staged rows die with the session
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn account_for(store: &MemoryStore, email: &str) -> Account {
        let user = store
            .insert_user(NewUser {
                email: email.to_string(),
            })
            .await
            .unwrap();
        store
            .insert_account(NewAccount {
                account_number: crate::utils::account_number::generate(ACCOUNT_NUMBER_LENGTH),
                user_id: Some(user.id),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn root_account_is_seeded_and_resolvable() {
        let store = MemoryStore::new();
        let resolved = store
            .accounts_by_numbers(&[ROOT_ACCOUNT_NUMBER.to_string()])
            .await
            .unwrap();

        let root = &resolved[ROOT_ACCOUNT_NUMBER];
        assert_eq!(root.id, store.root_account_id());
        assert!(root.is_root());
        assert_eq!(root.user_id, None);
    }

    #[tokio::test]
    async fn duplicate_reference_is_rejected_inside_session() {
        let store = MemoryStore::new();

        let mut session = store.begin().await.unwrap();
        session.insert_transaction("ref-1").await.unwrap();
        let err = session.insert_transaction("ref-1").await.unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateReference(_)));
    }

    #[tokio::test]
    async fn dropped_session_leaves_no_rows() {
        let store = MemoryStore::new();
        let account = account_for(&store, "drop@example.com").await;

        {
            let mut session = store.begin().await.unwrap();
            let tx = session.insert_transaction("ref-drop").await.unwrap();
            session
                .insert_lines(
                    tx.id,
                    &[
                        NewTransactionLine::credit(account.id, 100),
                        NewTransactionLine::debit(store.root_account_id(), 100),
                    ],
                )
                .await
                .unwrap();
            // session dropped without commit
        }

        assert_eq!(store.balance(account.id).await.unwrap(), 0);
        assert!(store
            .transactions_by_account(account.id)
            .await
            .unwrap()
            .is_empty());

        // the reference is free again after the rollback
        let mut session = store.begin().await.unwrap();
        assert!(session.insert_transaction("ref-drop").await.is_ok());
    }

    #[tokio::test]
    async fn session_balance_sees_staged_lines() {
        let store = MemoryStore::new();
        let account = account_for(&store, "staged@example.com").await;

        let mut session = store.begin().await.unwrap();
        let tx = session.insert_transaction("ref-staged").await.unwrap();
        session
            .insert_lines(
                tx.id,
                &[
                    NewTransactionLine::credit(account.id, 250),
                    NewTransactionLine::debit(store.root_account_id(), 250),
                ],
            )
            .await
            .unwrap();

        assert_eq!(session.balance(account.id).await.unwrap(), 250);
        // not visible outside until commit
        session.commit().await.unwrap();
        assert_eq!(store.balance(account.id).await.unwrap(), 250);
    }

    #[tokio::test]
    async fn history_is_newest_first_with_full_line_sets() {
        let store = MemoryStore::new();
        let a = account_for(&store, "a@example.com").await;
        let b = account_for(&store, "b@example.com").await;

        for (reference, amount) in [("ref-1", 100u64), ("ref-2", 200)] {
            let mut session = store.begin().await.unwrap();
            let tx = session.insert_transaction(reference).await.unwrap();
            session
                .insert_lines(
                    tx.id,
                    &[
                        NewTransactionLine::debit(a.id, amount),
                        NewTransactionLine::credit(b.id, amount),
                    ],
                )
                .await
                .unwrap();
            session.commit().await.unwrap();
        }

        let history = store.transactions_by_account(a.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].reference, "ref-2");
        assert_eq!(history[1].reference, "ref-1");
        // full line sets, including the counterparty's lines
        assert!(history.iter().all(|tx| tx.lines.len() == 2));
        assert!(history.iter().all(|tx| tx.is_balanced()));
    }

    #[tokio::test]
    async fn disable_account_transitions_once() {
        let store = MemoryStore::new();
        let account = account_for(&store, "disable@example.com").await;

        let disabled = store.disable_account(account.id).await.unwrap();
        assert_eq!(disabled.status, AccountStatus::Disabled);
        assert!(disabled.disabled_at.is_some());

        let err = store.disable_account(account.id).await.unwrap_err();
        assert!(matches!(err, LedgerError::AlreadyDisabled(_)));

        // disabled accounts no longer resolve by number
        let resolved = store
            .accounts_by_numbers(&[account.account_number.clone()])
            .await
            .unwrap();
        assert!(resolved.is_empty());
    }

    #[tokio::test]
    async fn duplicate_account_number_is_rejected() {
        let store = MemoryStore::new();
        let user = store
            .insert_user(NewUser {
                email: "dup@example.com".to_string(),
            })
            .await
            .unwrap();

        store
            .insert_account(NewAccount {
                account_number: "1111111111".to_string(),
                user_id: Some(user.id),
            })
            .await
            .unwrap();

        let err = store
            .insert_account(NewAccount {
                account_number: "1111111111".to_string(),
                user_id: Some(user.id),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateAccountNumber(_)));
    }
}

//! Core types and data structures for the ledger system

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account number of the distinguished root account.
///
/// The root account models money entering and leaving the ledger from the
/// outside world. It is exempt from the sufficient-funds check and its
/// balance goes negative as deposits flow into the system.
pub const ROOT_ACCOUNT_NUMBER: &str = "0000000000";

/// Length of generated account numbers, in decimal digits.
pub const ACCOUNT_NUMBER_LENGTH: usize = 10;

/// Purpose of a transaction line in double-entry bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionPurpose {
    /// Credit entry - increases the account's derived balance
    Credit,
    /// Debit entry - decreases the account's derived balance
    Debit,
}

/// Lifecycle state of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Account may participate in new transactions
    Active,
    /// Account is soft-disabled and may not participate in new transactions
    Disabled,
}

/// A registered user of the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,
    /// Unique email address
    pub email: String,
    /// When the user was created
    pub created_at: NaiveDateTime,
    /// When the user was last updated
    pub updated_at: NaiveDateTime,
}

/// A ledger account owned by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for the account
    pub id: Uuid,
    /// Human-facing account number, unique and immutable once issued
    pub account_number: String,
    /// Owning user. `None` only for the root account.
    pub user_id: Option<Uuid>,
    /// Lifecycle state
    pub status: AccountStatus,
    /// When the account was created
    pub created_at: NaiveDateTime,
    /// When the account was last updated
    pub updated_at: NaiveDateTime,
    /// When the account was disabled, if it has been
    pub disabled_at: Option<NaiveDateTime>,
}

impl Account {
    /// Whether the account may participate in new transactions
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// Whether this is the distinguished root account
    pub fn is_root(&self) -> bool {
        self.account_number == ROOT_ACCOUNT_NUMBER
    }

    /// Mark the account as disabled. The account row is never deleted.
    pub fn disable(&mut self) {
        let now = chrono::Utc::now().naive_utc();
        self.status = AccountStatus::Disabled;
        self.disabled_at = Some(now);
        self.updated_at = now;
    }
}

/// A single ledger entry within a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLine {
    /// Unique identifier for the line
    pub id: Uuid,
    /// Account affected by this line
    pub account_id: Uuid,
    /// Owning transaction
    pub transaction_id: Uuid,
    /// Credit or debit
    pub purpose: TransactionPurpose,
    /// Amount in minor units. Always positive.
    pub amount: u64,
    /// When the line was created
    pub created_at: NaiveDateTime,
}

/// An immutable, balanced set of transaction lines committed as one unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier for the transaction
    pub id: Uuid,
    /// Caller-supplied unique reference, used for idempotency and audit
    pub reference: String,
    /// The lines that make up this transaction, two or more
    pub lines: Vec<TransactionLine>,
    /// When the transaction was committed
    pub created_at: NaiveDateTime,
}

impl Transaction {
    /// Sum of all credit line amounts
    pub fn total_credits(&self) -> u128 {
        self.lines
            .iter()
            .filter(|line| line.purpose == TransactionPurpose::Credit)
            .map(|line| line.amount as u128)
            .sum()
    }

    /// Sum of all debit line amounts
    pub fn total_debits(&self) -> u128 {
        self.lines
            .iter()
            .filter(|line| line.purpose == TransactionPurpose::Debit)
            .map(|line| line.amount as u128)
            .sum()
    }

    /// Whether credits equal debits across all lines
    pub fn is_balanced(&self) -> bool {
        self.total_credits() == self.total_debits()
    }
}

/// Compute an account's derived balance from its lines: credits minus debits.
///
/// The ledger never caches balances as mutable state; this is the single
/// definition of what a balance is. The result is negative only for the
/// root account in a consistent ledger.
pub fn net_balance<'a, I>(lines: I) -> i64
where
    I: IntoIterator<Item = &'a TransactionLine>,
{
    let mut credits: i128 = 0;
    let mut debits: i128 = 0;
    for line in lines {
        match line.purpose {
            TransactionPurpose::Credit => credits += line.amount as i128,
            TransactionPurpose::Debit => debits += line.amount as i128,
        }
    }
    (credits - debits) as i64
}

/// The two kinds of transfer the engine distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    /// Money entering the ledger from outside: credit recipient, debit root.
    /// No funds check applies.
    SystemDeposit,
    /// Transfer between two regular accounts: debit sender, credit
    /// recipient, subject to the sender's available balance.
    PeerTransfer,
}

impl TransferKind {
    /// Classify a transfer by its sender account number. Resolved once at
    /// the start of transaction creation.
    pub fn resolve(sender_number: &str) -> Self {
        if sender_number == ROOT_ACCOUNT_NUMBER {
            TransferKind::SystemDeposit
        } else {
            TransferKind::PeerTransfer
        }
    }
}

/// A requested transfer, as received from the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Unique reference for the resulting transaction
    pub reference: String,
    /// Sender account number
    pub sender: String,
    /// Recipient account number
    pub recipient: String,
    /// Amount in minor units
    pub amount: u64,
}

/// Errors that can occur in the ledger system
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("account not found: {0}")]
    AccountNotFound(String),
    #[error("account is disabled: {0}")]
    AccountDisabled(String),
    #[error("account is already disabled: {0}")]
    AlreadyDisabled(Uuid),
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: u64, available: i64 },
    #[error("duplicate transaction reference: {0}")]
    DuplicateReference(String),
    #[error("duplicate account number: {0}")]
    DuplicateAccountNumber(String),
    #[error("duplicate email: {0}")]
    DuplicateEmail(String),
    #[error("user not found: {0}")]
    UserNotFound(Uuid),
    #[error("transaction not found: {0}")]
    TransactionNotFound(Uuid),
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn line(purpose: TransactionPurpose, amount: u64) -> TransactionLine {
        TransactionLine {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            transaction_id: Uuid::new_v4(),
            purpose,
            amount,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    #[test]
    fn transfer_kind_resolution() {
        assert_eq!(
            TransferKind::resolve(ROOT_ACCOUNT_NUMBER),
            TransferKind::SystemDeposit
        );
        assert_eq!(
            TransferKind::resolve("1234567890"),
            TransferKind::PeerTransfer
        );
    }

    #[test]
    fn net_balance_is_credits_minus_debits() {
        let lines = vec![
            line(TransactionPurpose::Credit, 1000),
            line(TransactionPurpose::Debit, 400),
            line(TransactionPurpose::Credit, 50),
        ];
        assert_eq!(net_balance(&lines), 650);
    }

    #[test]
    fn net_balance_goes_negative_for_net_outflow() {
        let lines = vec![line(TransactionPurpose::Debit, 1000)];
        assert_eq!(net_balance(&lines), -1000);
    }

    #[test]
    fn net_balance_of_empty_ledger_is_zero() {
        assert_eq!(net_balance(&[]), 0);
    }

    #[test]
    fn transaction_balance_law() {
        let mut tx = Transaction {
            id: Uuid::new_v4(),
            reference: "ref-1".to_string(),
            lines: vec![
                line(TransactionPurpose::Debit, 500),
                line(TransactionPurpose::Credit, 500),
            ],
            created_at: chrono::Utc::now().naive_utc(),
        };
        assert!(tx.is_balanced());

        tx.lines.push(line(TransactionPurpose::Credit, 1));
        assert!(!tx.is_balanced());
    }

    #[test]
    fn purpose_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TransactionPurpose::Credit).unwrap(),
            "\"credit\""
        );
        assert_eq!(
            serde_json::to_string(&TransactionPurpose::Debit).unwrap(),
            "\"debit\""
        );
    }

    #[test]
    fn disable_marks_account_without_deleting() {
        let now = chrono::Utc::now().naive_utc();
        let mut account = Account {
            id: Uuid::new_v4(),
            account_number: "1234567890".to_string(),
            user_id: Some(Uuid::new_v4()),
            status: AccountStatus::Active,
            created_at: now,
            updated_at: now,
            disabled_at: None,
        };
        assert!(account.is_active());

        account.disable();
        assert_eq!(account.status, AccountStatus::Disabled);
        assert!(account.disabled_at.is_some());
        assert!(!account.is_active());
    }
}

//! The transfer engine: turns transfer requests into balanced, atomically
//! committed ledger transactions

use uuid::Uuid;

use crate::traits::*;
use crate::types::*;
use crate::utils::validation;

/// Builds and commits double-entry transactions from transfer requests.
///
/// All writes go through a [`StoreSession`]; any early return between
/// `begin` and `commit` drops the session and rolls the unit back, so no
/// failure path leaves partial rows behind.
pub struct TransferEngine<S> {
    storage: S,
}

impl<S: LedgerStore + AccountDirectory> TransferEngine<S> {
    /// Create a new transfer engine over the given storage backend
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Create a transaction from a transfer request.
    ///
    /// A request whose sender is the root account number is a system
    /// deposit: the recipient is credited, the root account is debited,
    /// and no funds check applies. Any other request is a peer transfer:
    /// the sender is debited and the recipient credited, subject to the
    /// sender's derived balance at commit time.
    pub async fn create_transaction(&self, request: TransferRequest) -> LedgerResult<Transaction> {
        validation::validate_reference(&request.reference)?;
        validation::validate_amount(request.amount)?;

        let kind = TransferKind::resolve(&request.sender);
        tracing::debug!(
            reference = %request.reference,
            sender = %request.sender,
            recipient = %request.recipient,
            amount = request.amount,
            ?kind,
            "processing transfer request"
        );

        // one batch lookup for both participants
        let mut numbers = vec![request.sender.clone()];
        if request.recipient != request.sender {
            numbers.push(request.recipient.clone());
        }
        let accounts = self.storage.accounts_by_numbers(&numbers).await?;

        let sender = accounts
            .get(&request.sender)
            .ok_or_else(|| LedgerError::AccountNotFound(request.sender.clone()))?;
        let recipient = accounts
            .get(&request.recipient)
            .ok_or_else(|| LedgerError::AccountNotFound(request.recipient.clone()))?;

        let lines = match kind {
            TransferKind::SystemDeposit => vec![
                NewTransactionLine::credit(recipient.id, request.amount),
                NewTransactionLine::debit(sender.id, request.amount),
            ],
            TransferKind::PeerTransfer => vec![
                NewTransactionLine::debit(sender.id, request.amount),
                NewTransactionLine::credit(recipient.id, request.amount),
            ],
        };
        // also rejects sender == recipient via the unique-account rule
        validation::validate_lines(&lines)?;

        let mut session = self.storage.begin().await?;

        if kind == TransferKind::PeerTransfer {
            let available = session.balance(sender.id).await?;
            if available < 0 || request.amount > available as u64 {
                tracing::warn!(
                    reference = %request.reference,
                    sender = %request.sender,
                    requested = request.amount,
                    available,
                    "insufficient funds"
                );
                return Err(LedgerError::InsufficientFunds {
                    requested: request.amount,
                    available,
                });
            }
        }

        let header = session.insert_transaction(&request.reference).await?;
        let lines = session.insert_lines(header.id, &lines).await?;
        session.commit().await?;

        tracing::info!(
            transaction_id = %header.id,
            reference = %header.reference,
            "transaction committed"
        );

        Ok(Transaction { lines, ..header })
    }

    /// Derived balance for an account
    pub async fn balance(&self, account_id: Uuid) -> LedgerResult<i64> {
        self.storage.balance(account_id).await
    }

    /// Read a transaction by ID, with its lines
    pub async fn transaction(&self, id: Uuid) -> LedgerResult<Option<Transaction>> {
        self.storage.transaction_by_id(id).await
    }

    /// Read an account's transaction history, newest first
    pub async fn account_transactions(&self, account_id: Uuid) -> LedgerResult<Vec<Transaction>> {
        self.storage.transactions_by_account(account_id).await
    }
}

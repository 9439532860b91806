//! Account management: opening, lookup, and soft disabling

use uuid::Uuid;

use crate::traits::*;
use crate::types::*;
use crate::utils::account_number;

/// Attempts at issuing a unique account number before giving up. The
/// store's uniqueness constraint is the arbiter; regeneration on conflict
/// makes collisions in the 10-digit space a retry, not a failure.
const MAX_OPEN_ATTEMPTS: usize = 5;

/// Account manager handling directory operations
pub struct AccountManager<S> {
    storage: S,
}

impl<S: AccountDirectory + UserDirectory> AccountManager<S> {
    /// Create a new account manager
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Open a new account for an existing user.
    ///
    /// Issues a random fixed-length numeric account number and retries on
    /// a uniqueness conflict, up to [`MAX_OPEN_ATTEMPTS`] times.
    pub async fn open_account(&self, user_id: Uuid) -> LedgerResult<Account> {
        self.storage
            .user_by_id(user_id)
            .await?
            .ok_or(LedgerError::UserNotFound(user_id))?;

        for attempt in 1..=MAX_OPEN_ATTEMPTS {
            let number = account_number::generate(ACCOUNT_NUMBER_LENGTH);
            match self
                .storage
                .insert_account(NewAccount {
                    account_number: number,
                    user_id: Some(user_id),
                })
                .await
            {
                Ok(account) => {
                    tracing::debug!(
                        account_id = %account.id,
                        account_number = %account.account_number,
                        %user_id,
                        "account opened"
                    );
                    return Ok(account);
                }
                Err(LedgerError::DuplicateAccountNumber(number)) => {
                    tracing::debug!(%number, attempt, "account number collision, regenerating");
                }
                Err(err) => return Err(err),
            }
        }

        Err(LedgerError::Storage(format!(
            "failed to issue a unique account number after {MAX_OPEN_ATTEMPTS} attempts"
        )))
    }

    /// Get an account by ID, regardless of lifecycle state
    pub async fn account(&self, id: Uuid) -> LedgerResult<Option<Account>> {
        self.storage.account_by_id(id).await
    }

    /// List all accounts belonging to a user
    pub async fn user_accounts(&self, user_id: Uuid) -> LedgerResult<Vec<Account>> {
        self.storage.accounts_by_user(user_id).await
    }

    /// Batch-resolve active accounts by account number
    pub async fn resolve_numbers(
        &self,
        numbers: &[String],
    ) -> LedgerResult<std::collections::HashMap<String, Account>> {
        self.storage.accounts_by_numbers(numbers).await
    }

    /// Soft-disable an account. The root account cannot be disabled.
    pub async fn disable_account(&self, id: Uuid) -> LedgerResult<Account> {
        if let Some(account) = self.storage.account_by_id(id).await? {
            if account.is_root() {
                return Err(LedgerError::Validation(
                    "the root account cannot be disabled".to_string(),
                ));
            }
        }

        let account = self.storage.disable_account(id).await?;
        tracing::info!(account_id = %account.id, "account disabled");
        Ok(account)
    }
}

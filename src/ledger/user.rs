//! User registry

use uuid::Uuid;

use crate::traits::*;
use crate::types::*;

/// User manager handling registration and lookup
pub struct UserManager<S> {
    storage: S,
}

impl<S: UserDirectory> UserManager<S> {
    /// Create a new user manager
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Register a new user by email. Emails are unique across the system.
    pub async fn register_user(&self, email: &str) -> LedgerResult<User> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(LedgerError::Validation(format!(
                "invalid email address: {email:?}"
            )));
        }

        let user = self
            .storage
            .insert_user(NewUser {
                email: email.to_string(),
            })
            .await?;
        tracing::debug!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Get a user by ID
    pub async fn user(&self, id: Uuid) -> LedgerResult<Option<User>> {
        self.storage.user_by_id(id).await
    }

    /// Get a user by email
    pub async fn user_by_email(&self, email: &str) -> LedgerResult<Option<User>> {
        self.storage.user_by_email(email).await
    }
}

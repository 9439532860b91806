//! # Ledger Core
//!
//! A double-entry banking ledger library: users own accounts, money moves
//! as balanced credit/debit line pairs committed atomically, and balances
//! are always derived from the ledger lines.
//!
//! ## Features
//!
//! - **Double-entry transactions**: every transaction carries two or more
//!   lines whose credits and debits balance exactly
//! - **Derived balances**: `balance = Σcredits − Σdebits`, recomputed from
//!   the ledger, never cached as mutable state
//! - **Root account deposits**: a distinguished account models money
//!   entering the system and is exempt from the funds check
//! - **Atomic commits**: the funds check and line inserts share one
//!   isolated storage session, so concurrent transfers cannot double-spend
//! - **Storage abstraction**: trait-based design with an in-memory
//!   reference backend for tests and development
//!
//! ## Quick Start
//!
//! ```rust
//! use ledger_core::utils::MemoryStore;
//! use ledger_core::{Ledger, TransferRequest, ROOT_ACCOUNT_NUMBER};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), ledger_core::LedgerError> {
//! let ledger = Ledger::new(MemoryStore::new());
//!
//! let user = ledger.register_user("ama@example.com").await?;
//! let account = ledger.open_account(user.id).await?;
//!
//! // deposit from the outside world
//! ledger
//!     .create_transaction(TransferRequest {
//!         reference: "dep-1".to_string(),
//!         sender: ROOT_ACCOUNT_NUMBER.to_string(),
//!         recipient: account.account_number.clone(),
//!         amount: 10_000,
//!     })
//!     .await?;
//!
//! assert_eq!(ledger.balance(account.id).await?, 10_000);
//! # Ok(())
//! # }
//! ```

pub mod ledger;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use ledger::*;
pub use traits::*;
pub use types::*;

//! Ledger module containing the transfer engine and account management

pub mod account;
pub mod core;
pub mod engine;
pub mod user;

pub use account::*;
pub use core::*;
pub use engine::*;
pub use user::*;

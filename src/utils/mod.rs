//! Utility modules

pub mod account_number;
pub mod grouping;
pub mod memory_store;
pub mod validation;

pub use grouping::*;
pub use memory_store::*;
pub use validation::*;

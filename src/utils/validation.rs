//! Validation of transfer inputs and ledger line sets

use std::collections::HashSet;

use crate::traits::NewTransactionLine;
use crate::types::*;

/// Largest amount a single line may carry, in minor units. Keeps derived
/// balances representable as `i64`.
pub const MAX_LINE_AMOUNT: u64 = i64::MAX as u64;

/// Validate a transaction reference
pub fn validate_reference(reference: &str) -> LedgerResult<()> {
    if reference.trim().is_empty() {
        return Err(LedgerError::Validation(
            "transaction reference cannot be empty".to_string(),
        ));
    }

    if reference.len() > 255 {
        return Err(LedgerError::Validation(
            "transaction reference cannot exceed 255 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate a transfer amount: strictly positive and within range
pub fn validate_amount(amount: u64) -> LedgerResult<()> {
    if amount == 0 {
        return Err(LedgerError::InvalidAmount(
            "amount must be positive".to_string(),
        ));
    }

    if amount > MAX_LINE_AMOUNT {
        return Err(LedgerError::InvalidAmount(format!(
            "amount exceeds maximum of {MAX_LINE_AMOUNT}"
        )));
    }

    Ok(())
}

/// Validate a line set against the double-entry rules before it is staged:
/// at least two lines, all amounts positive, credits equal to debits, and
/// no account appearing more than once.
pub fn validate_lines(lines: &[NewTransactionLine]) -> LedgerResult<()> {
    if lines.len() < 2 {
        return Err(LedgerError::InvalidTransaction(
            "a transaction requires at least two lines".to_string(),
        ));
    }

    let mut credits: u128 = 0;
    let mut debits: u128 = 0;
    let mut accounts = HashSet::new();

    for line in lines {
        validate_amount(line.amount)?;

        match line.purpose {
            TransactionPurpose::Credit => credits += line.amount as u128,
            TransactionPurpose::Debit => debits += line.amount as u128,
        }

        // unique (account, transaction) pairs
        if !accounts.insert(line.account_id) {
            return Err(LedgerError::InvalidTransaction(format!(
                "account {} appears more than once in the transaction",
                line.account_id
            )));
        }
    }

    if credits != debits {
        return Err(LedgerError::InvalidTransaction(format!(
            "transaction is not balanced: credits = {credits}, debits = {debits}"
        )));
    }

    Ok(())
}

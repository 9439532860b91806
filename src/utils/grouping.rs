//! Ordered grouping of joined (transaction, line) rows
//!
//! Relational reads of transaction history come back as one row per
//! (transaction, line) pair. This module reassembles those rows into
//! nested transactions with an explicit tie-break: transactions keep the
//! order of their first appearance in the row stream, and each
//! transaction's lines keep row order.

use std::collections::HashMap;
use uuid::Uuid;

use crate::types::{Transaction, TransactionLine};

/// Reassemble joined rows into transactions.
///
/// Each input row pairs a transaction header (lines ignored) with one of
/// its lines. No transaction is duplicated in the output, regardless of
/// how many rows it spans.
pub fn group_joined_rows(rows: Vec<(Transaction, TransactionLine)>) -> Vec<Transaction> {
    let mut first_seen: Vec<Uuid> = Vec::new();
    let mut grouped: HashMap<Uuid, Transaction> = HashMap::new();

    for (header, line) in rows {
        let transaction = grouped.entry(header.id).or_insert_with(|| {
            first_seen.push(header.id);
            Transaction {
                lines: Vec::new(),
                ..header
            }
        });
        transaction.lines.push(line);
    }

    first_seen
        .into_iter()
        .filter_map(|id| grouped.remove(&id))
        .collect()
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Failures surfaced by the ledger core.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("At most {max} accounts may be active at the same time")]
    ActiveAccountLimit { max: usize },
    #[error("Account {account_id} has {count} linked transaction(s) and cannot be deleted")]
    AccountHasTransactions { account_id: i64, count: usize },
    #[error("Account {account_id} is used by {count} recurring template(s) and cannot be deleted")]
    AccountHasRecurrences { account_id: i64, count: usize },
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LedgerError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        LedgerError::NotFound { entity, id }
    }
}

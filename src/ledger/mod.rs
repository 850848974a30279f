// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Ledger core: everything that derives figures from, or writes to, the
//! transaction log through a [`crate::store::LedgerStore`].

pub mod accounts;
pub mod aggregate;
pub mod amortization;
pub mod bilan;
pub mod recurrence;
pub mod statement;

pub use accounts::AccountBook;
pub use aggregate::{LedgerAggregator, MonthlyResult, PeriodResult};
pub use bilan::{BilanEngine, BilanSnapshot};
pub use recurrence::{GenerationReport, RecurrenceEngine};
pub use statement::{ImportReport, StatementImporter};

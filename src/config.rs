// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde::{Deserialize, Serialize};

pub const DEFAULT_CURRENCY: &str = "EUR";

pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Ventes",
    "Prestations",
    "Loyer",
    "Salaires",
    "Fournitures",
    "Telecom",
    "Transport",
    "Assurance",
    "Impots",
    "Divers",
];

/// Runtime knobs handed to the recurrence engine and the statement importer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Category assigned to imported rows that carry none.
    pub default_category: String,
    /// Label used for bank rows with a blank description.
    pub placeholder_label: String,
    /// Account reference used when a fixed-format row has no account column.
    pub default_account_ref: String,
    /// How many months past `today` recurring occurrences are generated.
    pub horizon_months: u32,
    /// Maximum number of error messages printed after a batch operation.
    pub error_sample: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_category: "Uncategorized".into(),
            placeholder_label: "Imported transaction".into(),
            default_account_ref: "1".into(),
            horizon_months: 1,
            error_sample: 10,
        }
    }
}

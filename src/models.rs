// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Maximum number of accounts that may be active at the same time.
pub const MAX_ACTIVE_ACCOUNTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountKind {
    Bank,
    Cash,
    Other,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Bank => "BANK",
            AccountKind::Cash => "CASH",
            AccountKind::Other => "OTHER",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BANK" => Ok(AccountKind::Bank),
            "CASH" => Ok(AccountKind::Cash),
            "OTHER" => Ok(AccountKind::Other),
            other => Err(LedgerError::Validation(format!(
                "Invalid account type '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Canonical meaning of a signed amount: non-negative is income,
    /// negative is expense.
    pub fn from_signed_amount(amount: Decimal) -> Self {
        if amount.is_sign_negative() && !amount.is_zero() {
            TransactionKind::Expense
        } else {
            TransactionKind::Income
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "INCOME",
            TransactionKind::Expense => "EXPENSE",
        }
    }

    /// Applies the kind's sign to a positive magnitude.
    pub fn signed(&self, magnitude: Decimal) -> Decimal {
        match self {
            TransactionKind::Income => magnitude,
            TransactionKind::Expense => -magnitude,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INCOME" => Ok(TransactionKind::Income),
            "EXPENSE" => Ok(TransactionKind::Expense),
            other => Err(LedgerError::Validation(format!(
                "Invalid transaction type '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    Monthly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Monthly => "MONTHLY",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MONTHLY" => Ok(Frequency::Monthly),
            other => Err(LedgerError::Validation(format!(
                "Invalid frequency '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub kind: AccountKind,
    pub initial_balance: Decimal,
    pub active: bool,
}

impl Account {
    pub fn new(name: impl Into<String>, kind: AccountKind, initial_balance: Decimal) -> Self {
        Self {
            id: 0,
            name: name.into(),
            kind,
            initial_balance,
            active: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub label: String,
    pub note: String,
    /// Always a positive magnitude; the sign lives in `kind`.
    pub amount: Decimal,
    pub category: String,
    pub account_id: i64,
    pub recurrence_id: Option<i64>,
    pub is_modified: bool,
}

impl Transaction {
    pub fn new(
        kind: TransactionKind,
        date: NaiveDate,
        label: impl Into<String>,
        amount: Decimal,
        category: impl Into<String>,
        account_id: i64,
    ) -> Self {
        Self {
            id: 0,
            kind,
            date,
            label: label.into(),
            note: String::new(),
            amount: amount.abs(),
            category: category.into(),
            account_id,
            recurrence_id: None,
            is_modified: false,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn signed_amount(&self) -> Decimal {
        self.kind.signed(self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceTemplate {
    pub id: i64,
    pub label: String,
    pub note: String,
    /// Signed: the sign selects the kind of the generated transactions.
    pub amount: Decimal,
    pub category: String,
    pub account_id: i64,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub active: bool,
}

impl RecurrenceTemplate {
    pub fn monthly(
        label: impl Into<String>,
        amount: Decimal,
        category: impl Into<String>,
        account_id: i64,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: 0,
            label: label.into(),
            note: String::new(),
            amount,
            category: category.into(),
            account_id,
            frequency: Frequency::Monthly,
            start_date,
            end_date: None,
            active: true,
        }
    }

    pub fn kind(&self) -> TransactionKind {
        TransactionKind::from_signed_amount(self.amount)
    }

    /// Concrete transaction for one occurrence date.
    pub fn occurrence(&self, date: NaiveDate) -> Transaction {
        Transaction {
            id: 0,
            kind: self.kind(),
            date,
            label: self.label.clone(),
            note: self.note.clone(),
            amount: self.amount.abs(),
            category: self.category.clone(),
            account_id: self.account_id,
            recurrence_id: Some(self.id),
            is_modified: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: i64,
    pub name: String,
    pub purchase_date: NaiveDate,
    pub unit_cost: Decimal,
    pub quantity: u32,
    pub duration_years: u32,
}

impl Asset {
    pub fn new(
        name: impl Into<String>,
        purchase_date: NaiveDate,
        unit_cost: Decimal,
        duration_years: u32,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            purchase_date,
            unit_cost,
            quantity: 1,
            duration_years,
        }
    }

    pub fn total_cost(&self) -> Decimal {
        self.unit_cost * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountBalance {
    pub account: Account,
    pub balance: Decimal,
}

/// Inclusive day range used by every ledger query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, LedgerError> {
        if end < start {
            return Err(LedgerError::Validation(format!(
                "Invalid range: {} is after {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn year(year: i32) -> Result<Self, LedgerError> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| LedgerError::Validation(format!("Invalid year {}", year)))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| LedgerError::Validation(format!("Invalid year {}", year)))?;
        Ok(Self { start, end })
    }

    pub fn month(year: i32, month: u32) -> Result<Self, LedgerError> {
        let invalid = || LedgerError::Validation(format!("Invalid month {}-{:02}", year, month));
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let end = start
            .checked_add_months(chrono::Months::new(1))
            .and_then(|d| d.pred_opt())
            .ok_or_else(invalid)?;
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn sign_mapping_treats_zero_as_income() {
        assert_eq!(
            TransactionKind::from_signed_amount(Decimal::ZERO),
            TransactionKind::Income
        );
        assert_eq!(
            TransactionKind::from_signed_amount(Decimal::from_str("-0.01").unwrap()),
            TransactionKind::Expense
        );
    }

    #[test]
    fn enums_round_trip_through_stored_names() {
        for kind in [AccountKind::Bank, AccountKind::Cash, AccountKind::Other] {
            assert_eq!(AccountKind::from_str(kind.as_str()).unwrap(), kind);
        }
        assert_eq!(
            TransactionKind::from_str("expense").unwrap(),
            TransactionKind::Expense
        );
        assert!(Frequency::from_str("WEEKLY").is_err());
        assert_eq!(
            serde_json::to_string(&TransactionKind::Income).unwrap(),
            "\"INCOME\""
        );
    }

    #[test]
    fn month_range_ends_on_last_day() {
        let feb = DateRange::month(2024, 2).unwrap();
        assert_eq!(feb.end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(DateRange::month(2024, 13).is_err());
    }
}

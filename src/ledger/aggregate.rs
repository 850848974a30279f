// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only ledger figures: balances, period results and breakdowns.
//!
//! Every figure is a fold over transactions. The `fold_*`/`balance_from`
//! helpers work on rows already fetched, so a caller that needs several
//! figures from one consistent view fetches once and folds many times.

use std::collections::BTreeMap;

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::Result;
use crate::models::{Account, AccountBalance, DateRange, Transaction, TransactionKind};
use crate::store::{LedgerStore, TransactionFilter};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PeriodResult {
    pub income: Decimal,
    pub expense: Decimal,
    pub result: Decimal,
}

impl PeriodResult {
    pub fn new(income: Decimal, expense: Decimal) -> Self {
        Self {
            income,
            expense,
            result: income - expense,
        }
    }

    /// Result as a percentage of income; zero when there is no income.
    pub fn margin_percent(&self) -> Decimal {
        if self.income <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        (self.result / self.income * Decimal::from(100)).round_dp(2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyResult {
    pub month: u32,
    pub label: String,
    pub result: PeriodResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountTotals {
    pub account_id: i64,
    pub result: PeriodResult,
}

pub fn fold_period<'t>(txs: impl IntoIterator<Item = &'t Transaction>) -> PeriodResult {
    let (income, expense) =
        txs.into_iter()
            .fold((Decimal::ZERO, Decimal::ZERO), |(inc, exp), tx| match tx.kind {
                TransactionKind::Income => (inc + tx.amount, exp),
                TransactionKind::Expense => (inc, exp + tx.amount),
            });
    PeriodResult::new(income, expense)
}

/// `initial_balance + income - expense` over the rows that belong to `account`.
pub fn balance_from<'t>(
    account: &Account,
    txs: impl IntoIterator<Item = &'t Transaction>,
) -> Decimal {
    let totals = fold_period(txs.into_iter().filter(|tx| tx.account_id == account.id));
    account.initial_balance + totals.result
}

pub fn fold_by_category<'t>(
    txs: impl IntoIterator<Item = &'t Transaction>,
) -> BTreeMap<String, PeriodResult> {
    let mut grouped: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();
    for tx in txs {
        grouped.entry(tx.category.clone()).or_default().push(tx);
    }
    grouped
        .into_iter()
        .map(|(category, rows)| (category, fold_period(rows)))
        .collect()
}

fn month_label(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| chrono::Month::try_from(m).ok())
        .map(|m| m.name()[..3].to_string())
        .unwrap_or_default()
}

pub struct LedgerAggregator<'a, S> {
    store: &'a S,
}

impl<'a, S: LedgerStore> LedgerAggregator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn account_balance(&self, account: &Account) -> Result<Decimal> {
        let base = TransactionFilter::all().for_account(account.id);
        let income = self
            .store
            .sum_amounts(&base.clone().of_kind(TransactionKind::Income))
            .await?;
        let expense = self
            .store
            .sum_amounts(&base.of_kind(TransactionKind::Expense))
            .await?;
        Ok(account.initial_balance + income - expense)
    }

    /// Balances from a single fetch of the transaction log.
    pub async fn account_balances(&self, active_only: bool) -> Result<Vec<AccountBalance>> {
        let accounts = self.store.accounts().await?;
        let txs = self.store.transactions(&TransactionFilter::all()).await?;
        Ok(accounts
            .into_iter()
            .filter(|a| a.active || !active_only)
            .map(|account| {
                let balance = balance_from(&account, &txs);
                AccountBalance { account, balance }
            })
            .collect())
    }

    pub async fn period_result(&self, range: DateRange) -> Result<PeriodResult> {
        let base = TransactionFilter::all().in_range(range);
        let income = self
            .store
            .sum_amounts(&base.clone().of_kind(TransactionKind::Income))
            .await?;
        let expense = self
            .store
            .sum_amounts(&base.of_kind(TransactionKind::Expense))
            .await?;
        Ok(PeriodResult::new(income, expense))
    }

    /// Result of each of the twelve months of `year`.
    pub async fn monthly_results(&self, year: i32) -> Result<Vec<MonthlyResult>> {
        let txs = self
            .store
            .transactions(&TransactionFilter::all().in_range(DateRange::year(year)?))
            .await?;
        Ok((1..=12)
            .map(|month| MonthlyResult {
                month,
                label: month_label(month),
                result: fold_period(txs.iter().filter(|tx| tx.date.month() == month)),
            })
            .collect())
    }

    pub async fn totals_by_category(
        &self,
        range: DateRange,
        kind: Option<TransactionKind>,
    ) -> Result<BTreeMap<String, PeriodResult>> {
        let mut filter = TransactionFilter::all().in_range(range);
        filter.kind = kind;
        let txs = self.store.transactions(&filter).await?;
        Ok(fold_by_category(&txs))
    }

    pub async fn totals_by_account(&self, range: DateRange) -> Result<Vec<AccountTotals>> {
        let txs = self
            .store
            .transactions(&TransactionFilter::all().in_range(range))
            .await?;
        let mut grouped: BTreeMap<i64, Vec<&Transaction>> = BTreeMap::new();
        for tx in &txs {
            grouped.entry(tx.account_id).or_default().push(tx);
        }
        Ok(grouped
            .into_iter()
            .map(|(account_id, rows)| AccountTotals {
                account_id,
                result: fold_period(rows),
            })
            .collect())
    }

    pub async fn transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        self.store.transactions(filter).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Transaction>> {
        self.store.search(query).await
    }

    pub async fn recent_for_account(&self, account_id: i64, limit: usize) -> Result<Vec<Transaction>> {
        let mut txs = self
            .store
            .transactions(&TransactionFilter::all().for_account(account_id))
            .await?;
        txs.truncate(limit);
        Ok(txs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn margin_is_zero_without_income() {
        let r = PeriodResult::new(Decimal::ZERO, Decimal::from(50));
        assert_eq!(r.result, Decimal::from(-50));
        assert_eq!(r.margin_percent(), Decimal::ZERO);
        let r = PeriodResult::new(Decimal::from(200), Decimal::from(150));
        assert_eq!(r.margin_percent(), Decimal::from(25));
    }

    #[test]
    fn balance_ignores_other_accounts() {
        let mut account = Account::new("Main", crate::models::AccountKind::Bank, Decimal::from(10));
        account.id = 1;
        let d = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let txs = vec![
            Transaction::new(TransactionKind::Income, d, "Sale", Decimal::from(5), "Ventes", 1),
            Transaction::new(TransactionKind::Expense, d, "Rent", Decimal::from(3), "Loyer", 1),
            Transaction::new(TransactionKind::Income, d, "Other", Decimal::from(99), "Ventes", 2),
        ];
        assert_eq!(balance_from(&account, &txs), Decimal::from(12));
        assert_eq!(month_label(2), "Feb");
    }
}

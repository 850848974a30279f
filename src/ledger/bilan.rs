// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Balance sheet: assets against equity plus the year's result.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::ledger::aggregate::{balance_from, fold_period};
use crate::ledger::amortization::net_book_value;
use crate::models::{AccountBalance, Asset, DateRange};
use crate::store::{LedgerStore, SettingsStore, TransactionFilter};

/// Absolute tolerance absorbing rounding drift between the two sides.
pub fn equilibrium_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

pub fn is_balanced(total_asset: Decimal, total_liability_and_equity: Decimal) -> bool {
    (total_asset - total_liability_and_equity).abs() < equilibrium_tolerance()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BilanSnapshot {
    pub as_of: NaiveDate,
    pub treasury: Decimal,
    pub net_asset_value: Decimal,
    pub total_asset: Decimal,
    pub equity: Decimal,
    pub period_result: Decimal,
    pub total_liability_and_equity: Decimal,
    pub is_balanced: bool,
}

impl BilanSnapshot {
    pub fn gap(&self) -> Decimal {
        self.total_asset - self.total_liability_and_equity
    }
}

/// Builds the snapshot from figures already at hand. Only active accounts
/// count toward treasury.
pub fn compute_bilan(
    balances: &[AccountBalance],
    assets: &[Asset],
    equity: Decimal,
    period_result: Decimal,
    as_of: NaiveDate,
) -> Result<BilanSnapshot> {
    let treasury: Decimal = balances
        .iter()
        .filter(|b| b.account.active)
        .map(|b| b.balance)
        .sum();
    let mut net_asset_value = Decimal::ZERO;
    for asset in assets {
        net_asset_value += net_book_value(asset, as_of)?;
    }
    let total_asset = treasury + net_asset_value;
    let total_liability_and_equity = equity + period_result;
    Ok(BilanSnapshot {
        as_of,
        treasury,
        net_asset_value,
        total_asset,
        equity,
        period_result,
        total_liability_and_equity,
        is_balanced: is_balanced(total_asset, total_liability_and_equity),
    })
}

pub struct BilanEngine<'a, S> {
    store: &'a S,
}

impl<'a, S: LedgerStore + SettingsStore> BilanEngine<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Snapshot as of `as_of`; the result side covers Jan 1 - Dec 31 of
    /// that year. All figures come from one read of each table.
    pub async fn snapshot(&self, as_of: NaiveDate) -> Result<BilanSnapshot> {
        let accounts = self.store.accounts().await?;
        let txs = self.store.transactions(&TransactionFilter::all()).await?;
        let assets = self.store.assets().await?;
        let equity = self.store.equity().await?;

        let balances: Vec<AccountBalance> = accounts
            .into_iter()
            .map(|account| {
                let balance = balance_from(&account, &txs);
                AccountBalance { account, balance }
            })
            .collect();
        let year = DateRange::year(as_of.year())?;
        let period = fold_period(txs.iter().filter(|tx| year.contains(tx.date)));

        let snapshot = compute_bilan(&balances, &assets, equity, period.result, as_of)?;
        debug!(
            total_asset = %snapshot.total_asset,
            total_liability_and_equity = %snapshot.total_liability_and_equity,
            balanced = snapshot.is_balanced,
            "bilan computed"
        );
        Ok(snapshot)
    }

    /// Stores the new equity amount and recomputes.
    pub async fn set_equity(&self, amount: Decimal, as_of: NaiveDate) -> Result<BilanSnapshot> {
        self.store.set_equity(amount).await?;
        info!(equity = %amount, "equity updated");
        self.snapshot(as_of).await
    }
}

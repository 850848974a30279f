// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Months, NaiveDate};
use ledgerkeep::ledger::amortization::{
    annual_amortization, monthly_amortization, net_book_value, schedule,
};
use ledgerkeep::ledger::bilan::{compute_bilan, is_balanced};
use ledgerkeep::ledger::{AccountBook, BilanEngine};
use ledgerkeep::models::{Account, AccountBalance, AccountKind, Asset, Transaction, TransactionKind};
use ledgerkeep::store::{LedgerStore, SettingsStore, SqliteLedger};
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn net_book_value_after_whole_years() {
    let laptop = Asset::new("Laptop", date(2024, 1, 1), dec!(3000), 3);
    assert_eq!(net_book_value(&laptop, date(2025, 6, 15)).unwrap(), dec!(2000));

    let van = Asset::new("Van", date(2019, 1, 1), dec!(5000), 3);
    assert_eq!(net_book_value(&van, date(2024, 1, 1)).unwrap(), dec!(0));

    let mut machine = Asset::new("Machine", date(2023, 3, 1), dec!(10000), 5);
    machine.quantity = 2;
    assert_eq!(annual_amortization(&machine).unwrap(), dec!(4000));
    assert_eq!(net_book_value(&machine, date(2025, 3, 1)).unwrap(), dec!(12000));
    assert_eq!(net_book_value(&machine, date(2023, 3, 2)).unwrap(), dec!(20000));

    let desk = Asset::new("Desk", date(2025, 1, 1), dec!(12000), 5);
    assert_eq!(monthly_amortization(&desk).unwrap(), dec!(200));
}

#[test]
fn net_book_value_never_increases() {
    let asset = Asset::new("Press", date(2022, 7, 31), dec!(7000), 4);
    let total = asset.total_cost();
    let mut previous = total;
    for n in 0..80 {
        let as_of = date(2022, 1, 31) + Months::new(n);
        let nbv = net_book_value(&asset, as_of).unwrap();
        assert!(nbv <= previous, "{} rose at {}", nbv, as_of);
        assert!(nbv >= dec!(0) && nbv <= total);
        previous = nbv;
    }
    assert_eq!(previous, dec!(0));

    let rows = schedule(&asset).unwrap();
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|r| r.amortization == dec!(1750)));
}

#[test]
fn equilibrium_tolerance_is_exclusive() {
    assert!(is_balanced(dec!(100), dec!(100)));
    assert!(is_balanced(dec!(100), dec!(100.0099)));
    assert!(!is_balanced(dec!(100), dec!(100.01)));
    assert!(!is_balanced(dec!(100.01), dec!(100)));
}

#[test]
fn unbalanced_sheet_from_figures() {
    let mut a = Account::new("A", AccountKind::Bank, dec!(0));
    a.id = 1;
    let mut b = Account::new("B", AccountKind::Bank, dec!(0));
    b.id = 2;
    let balances = vec![
        AccountBalance { account: a, balance: dec!(1000) },
        AccountBalance { account: b, balance: dec!(-200.01) },
    ];
    let snapshot = compute_bilan(&balances, &[], dec!(750), dec!(47.99), date(2025, 6, 30)).unwrap();
    assert_eq!(snapshot.total_asset, dec!(799.99));
    assert_eq!(snapshot.total_liability_and_equity, dec!(797.99));
    assert_eq!(snapshot.gap(), dec!(2.00));
    assert!(!snapshot.is_balanced);
}

async fn ledger_for_bilan() -> SqliteLedger {
    let ledger = SqliteLedger::open_in_memory().unwrap();
    let book = AccountBook::new(&ledger);
    book.create(&Account::new("Bank", AccountKind::Bank, dec!(952.01)))
        .await
        .unwrap();
    book.create(&Account::new("Card", AccountKind::Bank, dec!(-200.01)))
        .await
        .unwrap();
    let mut closed = Account::new("Closed", AccountKind::Cash, dec!(500));
    closed.active = false;
    book.create(&closed).await.unwrap();
    ledger
        .insert_transaction(&Transaction::new(
            TransactionKind::Income,
            date(2025, 3, 1),
            "Invoice",
            dec!(47.99),
            "Ventes",
            1,
        ))
        .await
        .unwrap();
    // Last year's entry moves the balance but not this year's result.
    ledger
        .insert_transaction(&Transaction::new(
            TransactionKind::Expense,
            date(2024, 12, 31),
            "Fees",
            dec!(10),
            "Divers",
            1,
        ))
        .await
        .unwrap();
    ledger
}

#[tokio::test]
async fn snapshot_reads_ledger_and_settings() {
    let ledger = ledger_for_bilan().await;
    ledger.set_equity(dec!(750)).await.unwrap();
    let engine = BilanEngine::new(&ledger);
    let s = engine.snapshot(date(2025, 6, 30)).await.unwrap();
    assert_eq!(s.treasury, dec!(789.99));
    assert_eq!(s.net_asset_value, dec!(0));
    assert_eq!(s.period_result, dec!(47.99));
    assert_eq!(s.total_liability_and_equity, dec!(797.99));
    assert!(!s.is_balanced);
}

#[tokio::test]
async fn set_equity_persists_and_rebalances() {
    let ledger = ledger_for_bilan().await;
    ledger
        .insert_asset(&Asset::new("Laptop", date(2024, 1, 1), dec!(3000), 3))
        .await
        .unwrap();
    let engine = BilanEngine::new(&ledger);
    let as_of = date(2025, 6, 15);

    let before = engine.snapshot(as_of).await.unwrap();
    assert_eq!(before.equity, dec!(0));
    assert_eq!(before.net_asset_value, dec!(2000));
    assert_eq!(before.total_asset, dec!(2789.99));

    let after = engine.set_equity(dec!(2742), as_of).await.unwrap();
    assert_eq!(ledger.equity().await.unwrap(), dec!(2742));
    assert_eq!(after.total_liability_and_equity, dec!(2789.99));
    assert!(after.is_balanced);
    assert_eq!(after.total_asset, before.total_asset);
}

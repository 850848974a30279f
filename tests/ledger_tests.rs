// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use ledgerkeep::ledger::{AccountBook, LedgerAggregator};
use ledgerkeep::models::{
    Account, AccountKind, DateRange, RecurrenceTemplate, Transaction, TransactionKind,
};
use ledgerkeep::store::{LedgerStore, SqliteLedger, TransactionFilter};
use ledgerkeep::LedgerError;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn seeded() -> SqliteLedger {
    let ledger = SqliteLedger::open_in_memory().unwrap();
    let book = AccountBook::new(&ledger);
    book.create(&Account::new("Bank", AccountKind::Bank, dec!(1000)))
        .await
        .unwrap();
    book.create(&Account::new("Till", AccountKind::Cash, dec!(50)))
        .await
        .unwrap();
    let rows = [
        (TransactionKind::Income, date(2025, 1, 10), "Invoice 12", dec!(1200), "Ventes", 1),
        (TransactionKind::Expense, date(2025, 1, 31), "Rent January", dec!(800), "Loyer", 1),
        (TransactionKind::Expense, date(2025, 2, 3), "Paper", dec!(45.50), "Fournitures", 2),
        (TransactionKind::Income, date(2025, 2, 28), "Counter sales", dec!(300), "Ventes", 2),
        (TransactionKind::Income, date(2024, 12, 31), "Old invoice", dec!(99.99), "Ventes", 1),
    ];
    for (kind, d, label, amount, category, account_id) in rows {
        ledger
            .insert_transaction(&Transaction::new(kind, d, label, amount, category, account_id))
            .await
            .unwrap();
    }
    ledger
}

#[tokio::test]
async fn balance_is_opening_plus_income_minus_expense() {
    let ledger = seeded().await;
    let agg = LedgerAggregator::new(&ledger);
    let bank = ledger.account(1).await.unwrap().unwrap();
    let till = ledger.account(2).await.unwrap().unwrap();
    assert_eq!(agg.account_balance(&bank).await.unwrap(), dec!(1499.99));
    assert_eq!(agg.account_balance(&till).await.unwrap(), dec!(304.50));

    let balances = agg.account_balances(false).await.unwrap();
    let total: rust_decimal::Decimal = balances.iter().map(|b| b.balance).sum();
    assert_eq!(total, dec!(1804.49));
}

#[tokio::test]
async fn period_result_uses_inclusive_bounds() {
    let ledger = seeded().await;
    let agg = LedgerAggregator::new(&ledger);
    let jan = agg
        .period_result(DateRange::new(date(2025, 1, 10), date(2025, 1, 31)).unwrap())
        .await
        .unwrap();
    assert_eq!(jan.income, dec!(1200));
    assert_eq!(jan.expense, dec!(800));
    assert_eq!(jan.result, dec!(400));

    let year = agg.period_result(DateRange::year(2025).unwrap()).await.unwrap();
    assert_eq!(year.result, dec!(654.50));
    assert_eq!(year.margin_percent(), dec!(43.63));
}

#[tokio::test]
async fn filters_combine_range_account_and_category() {
    let ledger = seeded().await;
    let agg = LedgerAggregator::new(&ledger);
    let year = DateRange::year(2025).unwrap();

    let all = agg.transactions(&TransactionFilter::all()).await.unwrap();
    assert_eq!(all.len(), 5);
    assert_eq!(all[0].date, date(2025, 2, 28));

    let ventes_bank = agg
        .transactions(
            &TransactionFilter::all()
                .in_range(year)
                .for_account(1)
                .in_category("Ventes"),
        )
        .await
        .unwrap();
    assert_eq!(ventes_bank.len(), 1);
    assert_eq!(ventes_bank[0].label, "Invoice 12");

    let till = agg
        .transactions(&TransactionFilter::all().for_account(2))
        .await
        .unwrap();
    assert_eq!(till.len(), 2);

    let found = agg.search("RENT").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].category, "Loyer");

    let recent = agg.recent_for_account(1, 2).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].label, "Rent January");
}

#[tokio::test]
async fn monthly_and_breakdowns() {
    let ledger = seeded().await;
    let agg = LedgerAggregator::new(&ledger);
    let months = agg.monthly_results(2025).await.unwrap();
    assert_eq!(months.len(), 12);
    assert_eq!(months[0].label, "Jan");
    assert_eq!(months[0].result.result, dec!(400));
    assert_eq!(months[1].result.result, dec!(254.50));
    assert!(months[2..].iter().all(|m| m.result.result.is_zero()));

    let year = DateRange::year(2025).unwrap();
    let by_category = agg.totals_by_category(year, None).await.unwrap();
    assert_eq!(by_category["Ventes"].income, dec!(1500));
    assert_eq!(by_category["Loyer"].expense, dec!(800));
    let expenses = agg
        .totals_by_category(year, Some(TransactionKind::Expense))
        .await
        .unwrap();
    assert!(!expenses.contains_key("Ventes"));

    let by_account = agg.totals_by_account(year).await.unwrap();
    assert_eq!(by_account.len(), 2);
    assert_eq!(by_account[0].account_id, 1);
    assert_eq!(by_account[0].result.result, dec!(400));
}

#[tokio::test]
async fn active_account_cap_applies_on_create_and_reactivation() {
    let ledger = SqliteLedger::open_in_memory().unwrap();
    let book = AccountBook::new(&ledger);
    for i in 1..=5 {
        book.create(&Account::new(format!("A{}", i), AccountKind::Bank, dec!(0)))
            .await
            .unwrap();
    }
    let err = book
        .create(&Account::new("A6", AccountKind::Bank, dec!(0)))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::ActiveAccountLimit { max: 5 }));

    let mut dormant = Account::new("Dormant", AccountKind::Other, dec!(0));
    dormant.active = false;
    let dormant = book.create(&dormant).await.unwrap();
    assert!(matches!(
        book.set_active(dormant.id, true).await,
        Err(LedgerError::ActiveAccountLimit { .. })
    ));

    book.set_active(1, false).await.unwrap();
    assert!(book.set_active(dormant.id, true).await.unwrap().active);
    assert_eq!(ledger.count_active_accounts().await.unwrap(), 5);
}

#[tokio::test]
async fn account_with_transactions_cannot_be_deleted() {
    let ledger = seeded().await;
    let book = AccountBook::new(&ledger);
    let err = book.delete(2).await.unwrap_err();
    assert!(matches!(
        err,
        LedgerError::AccountHasTransactions {
            account_id: 2,
            count: 2
        }
    ));

    let empty = book
        .create(&Account::new("Empty", AccountKind::Cash, dec!(0)))
        .await
        .unwrap();
    book.delete(empty.id).await.unwrap();
    assert!(ledger.account(empty.id).await.unwrap().is_none());
    assert!(matches!(
        book.delete(empty.id).await,
        Err(LedgerError::NotFound { .. })
    ));
}

#[tokio::test]
async fn account_with_recurring_template_cannot_be_deleted() {
    let ledger = SqliteLedger::open_in_memory().unwrap();
    let book = AccountBook::new(&ledger);
    let account = book
        .create(&Account::new("Savings", AccountKind::Bank, dec!(0)))
        .await
        .unwrap();
    ledger
        .insert_recurrence(&RecurrenceTemplate::monthly(
            "Transfer",
            dec!(-100),
            "Divers",
            account.id,
            date(2030, 1, 1),
        ))
        .await
        .unwrap();

    let err = book.delete(account.id).await.unwrap_err();
    assert!(matches!(
        err,
        LedgerError::AccountHasRecurrences { count: 1, .. }
    ));
    assert!(ledger.account(account.id).await.unwrap().is_some());
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use ledgerkeep::commands::exporter;
use ledgerkeep::config::LedgerConfig;
use ledgerkeep::ledger::{AccountBook, StatementImporter};
use ledgerkeep::models::{Account, AccountKind, Transaction, TransactionKind};
use ledgerkeep::store::{LedgerStore, SqliteLedger, TransactionFilter};
use rust_decimal_macros::dec;
use std::fs;
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn ledger_with_account() -> SqliteLedger {
    let ledger = SqliteLedger::open_in_memory().unwrap();
    AccountBook::new(&ledger)
        .create(&Account::new("Main", AccountKind::Bank, dec!(0)))
        .await
        .unwrap();
    ledger
}

#[tokio::test]
async fn french_decimal_row_is_imported_as_expense() {
    let ledger = ledger_with_account().await;
    let config = LedgerConfig::default();
    let report = StatementImporter::new(&ledger, &config)
        .import("15/02/2024,DEPENSE,Fournitures,Papier,45,50,Fournitures,1\n")
        .await
        .unwrap();

    assert_eq!(report.error_count, 0, "{:?}", report.errors);
    assert_eq!(report.imported.len(), 1);
    let tx = &report.imported[0];
    assert_eq!(tx.amount, dec!(45.50));
    assert_eq!(tx.kind, TransactionKind::Expense);
    assert_eq!(tx.label, "Fournitures");
    assert_eq!(tx.note, "Papier");
    assert_eq!(tx.date, date(2024, 2, 15));
    assert_eq!(tx.account_id, 1);
    assert!(ledger.transaction(tx.id).await.unwrap().is_some());
}

#[tokio::test]
async fn existing_rows_are_counted_as_duplicates() {
    let ledger = ledger_with_account().await;
    ledger
        .insert_transaction(&Transaction::new(
            TransactionKind::Income,
            date(2024, 2, 10),
            "Vente client",
            dec!(1250),
            "Ventes",
            1,
        ))
        .await
        .unwrap();
    let config = LedgerConfig::default();
    let text = "date,type,libelle,objet,montant,categorie,accountId\n\
                10/02/2024,RECETTE,Vente client,Produit A,1250.00,Ventes,1\n\
                05/02/2024,DEPENSE,Frais transport,Client,35.20,Transport,1\n\
                05/02/2024,DEPENSE,Frais transport,Client,35.20,Transport,1\n";
    let report = StatementImporter::new(&ledger, &config)
        .import(text)
        .await
        .unwrap();

    assert_eq!(report.imported.len(), 1);
    assert_eq!(report.duplicates, 2);
    assert_eq!(report.error_count, 0);
    assert_eq!(
        report.errors,
        vec!["2 transaction(s) skipped as duplicates".to_string()]
    );
    assert_eq!(
        ledger
            .count_transactions(&TransactionFilter::all())
            .await
            .unwrap(),
        2
    );
}

#[tokio::test]
async fn bank_export_gets_placeholder_account() {
    let ledger = ledger_with_account().await;
    let config = LedgerConfig::default();
    let text = "Booking Date;Wording;Amount;Sens;Account;Category\r\n\
                01/03/2024;Client payment;1 200,00;Credit;FR76-001;Ventes\r\n\
                02/03/2024;Card payment;-35,20;;FR76-001;\r\n\
                03/03/2024;Bad row;abc;;FR76-001;\r\n";
    let importer = StatementImporter::new(&ledger, &config);
    let report = importer.import(text).await.unwrap();

    assert_eq!(report.imported.len(), 2);
    assert_eq!(report.error_count, 1);
    assert!(report.errors[0].starts_with("Line 4:"), "{:?}", report.errors);

    let accounts = ledger.accounts().await.unwrap();
    let placeholder = accounts
        .iter()
        .find(|a| a.name == "Imported account FR76-001")
        .unwrap();
    assert_eq!(placeholder.kind, AccountKind::Bank);
    assert_eq!(placeholder.initial_balance, dec!(0));
    assert!(placeholder.active);
    assert!(report.imported.iter().all(|t| t.account_id == placeholder.id));
    assert_eq!(report.imported[0].kind, TransactionKind::Income);
    assert_eq!(report.imported[1].kind, TransactionKind::Expense);
    assert_eq!(report.imported[1].category, "Uncategorized");

    // Same statement again: same placeholder, everything is a duplicate.
    let again = importer.import(text).await.unwrap();
    assert_eq!(again.imported.len(), 0);
    assert_eq!(again.duplicates, 2);
    assert_eq!(ledger.accounts().await.unwrap().len(), 2);
}

#[tokio::test]
async fn placeholder_blocked_by_active_cap_fails_its_rows() {
    let ledger = ledger_with_account().await;
    let book = AccountBook::new(&ledger);
    for i in 2..=5 {
        book.create(&Account::new(format!("A{}", i), AccountKind::Cash, dec!(0)))
            .await
            .unwrap();
    }
    let config = LedgerConfig::default();
    let text = "date,type,libelle,objet,montant,categorie,accountId\n\
                01/02/2024,RECETTE,Known,,10,Ventes,2\n\
                02/02/2024,RECETTE,Foreign,,20,Ventes,77\n\
                03/02/2024,RECETTE,Foreign again,,30,Ventes,77\n";
    let report = StatementImporter::new(&ledger, &config)
        .import(text)
        .await
        .unwrap();

    assert_eq!(report.imported.len(), 1);
    assert_eq!(report.imported[0].account_id, 2);
    assert_eq!(report.error_count, 2);
    assert!(report.errors.iter().all(|e| e.contains("'77'")));
    assert_eq!(ledger.accounts().await.unwrap().len(), 5);
}

#[tokio::test]
async fn unreadable_file_yields_single_error() {
    let ledger = ledger_with_account().await;
    let config = LedgerConfig::default();
    let dir = tempdir().unwrap();
    let report = StatementImporter::new(&ledger, &config)
        .import_file(&dir.path().join("missing.csv"))
        .await
        .unwrap();
    assert!(report.imported.is_empty());
    assert_eq!(report.error_count, 1);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("missing.csv"));
}

#[tokio::test]
async fn error_sample_is_bounded_but_count_exact() {
    let ledger = ledger_with_account().await;
    let config = LedgerConfig::default();
    let mut text = String::from("date,type,libelle,objet,montant,categorie,accountId\n");
    for i in 0..25 {
        text.push_str(&format!("2024-01-{:02},TRANSFER,Bad,,10,Divers,1\n", (i % 28) + 1));
    }
    let report = StatementImporter::new(&ledger, &config)
        .import(&text)
        .await
        .unwrap();
    assert_eq!(report.error_count, 25);
    assert_eq!(report.error_sample(config.error_sample).len(), 10);
}

#[tokio::test]
async fn export_reimports_as_duplicates() {
    let ledger = ledger_with_account().await;
    for (d, kind, label, amount) in [
        (date(2024, 2, 15), TransactionKind::Expense, "Achat, fournitures", dec!(45.50)),
        (date(2024, 2, 10), TransactionKind::Income, "Vente client", dec!(1250)),
    ] {
        ledger
            .insert_transaction(
                &Transaction::new(kind, d, label, amount, "Divers", 1).with_note("n"),
            )
            .await
            .unwrap();
    }
    let dir = tempdir().unwrap();
    let path = dir.path().join("export.csv");
    let txs = ledger
        .transactions(&TransactionFilter::all())
        .await
        .unwrap();
    exporter::write_csv(fs::File::create(&path).unwrap(), &txs).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("date,type,libelle,objet,montant,categorie,accountId"));
    assert!(written.contains("15/02/2024,DEPENSE,\"Achat, fournitures\",n,\"45,50\",Divers,1"));

    let config = LedgerConfig::default();
    let report = StatementImporter::new(&ledger, &config)
        .import_file(&path)
        .await
        .unwrap();
    assert_eq!(report.error_count, 0, "{:?}", report.errors);
    assert_eq!(report.duplicates, 2);
    assert!(report.imported.is_empty());
}

// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::period_from_args;
use crate::models::{Transaction, TransactionKind};
use crate::store::{LedgerStore, SqliteLedger, TransactionFilter};
use anyhow::Result;
use serde_json::json;
use std::io::Write;

/// Header of the fixed CSV layout, read back by the statement importer.
pub const CSV_HEADER: [&str; 7] = [
    "date", "type", "libelle", "objet", "montant", "categorie", "accountId",
];

pub async fn handle(ledger: &SqliteLedger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(ledger, sub).await,
        _ => Ok(()),
    }
}

fn type_word(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => "RECETTE",
        TransactionKind::Expense => "DEPENSE",
    }
}

/// Writes rows in the fixed layout: `dd/mm/yyyy` dates and a decimal comma.
pub fn write_csv<W: Write>(out: W, txs: &[Transaction]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(CSV_HEADER)?;
    for t in txs {
        wtr.write_record([
            t.date.format("%d/%m/%Y").to_string(),
            type_word(t.kind).to_string(),
            t.label.clone(),
            t.note.clone(),
            format!("{:.2}", t.amount).replace('.', ","),
            t.category.clone(),
            t.account_id.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(mut out: W, txs: &[Transaction]) -> Result<()> {
    let items: Vec<_> = txs
        .iter()
        .map(|t| {
            json!({
                "id": t.id, "date": t.date, "type": t.kind, "label": t.label, "note": t.note,
                "amount": t.amount, "category": t.category, "account_id": t.account_id,
                "recurrence_id": t.recurrence_id, "is_modified": t.is_modified
            })
        })
        .collect();
    out.write_all(serde_json::to_string_pretty(&items)?.as_bytes())?;
    Ok(())
}

async fn export_transactions(ledger: &SqliteLedger, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut filter = TransactionFilter::all();
    if let Some(range) = period_from_args(sub)? {
        filter = filter.in_range(range);
    }
    let mut txs = ledger.transactions(&filter).await?;
    txs.reverse();

    match fmt.as_str() {
        "csv" => write_csv(std::fs::File::create(out)?, &txs)?,
        "json" => write_json(std::fs::File::create(out)?, &txs)?,
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported {} transaction(s) to {}", txs.len(), out);
    Ok(())
}

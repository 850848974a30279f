// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::period_from_args;
use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::ledger::{LedgerAggregator, RecurrenceEngine};
use crate::models::{Transaction, TransactionKind};
use crate::store::{LedgerStore, SqliteLedger, TransactionFilter};
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{Context, Result};

pub async fn handle(
    ledger: &SqliteLedger,
    config: &LedgerConfig,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ledger, sub).await?,
        Some(("list", sub)) => list(ledger, sub).await?,
        Some(("search", sub)) => search(ledger, sub).await?,
        Some(("edit", sub)) => edit(ledger, config, sub).await?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            ledger.delete_transaction(id).await?;
            println!("Removed transaction #{}", id);
        }
        _ => {}
    }
    Ok(())
}

async fn add(ledger: &SqliteLedger, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let kind: TransactionKind = sub.get_one::<String>("type").unwrap().parse()?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let label = sub.get_one::<String>("label").unwrap().trim();
    let category = sub.get_one::<String>("category").unwrap().trim();
    let account_id = *sub.get_one::<i64>("account").unwrap();
    if label.is_empty() {
        return Err(LedgerError::Validation("Label cannot be empty".into()).into());
    }
    if amount.is_zero() {
        return Err(LedgerError::Validation("Amount must be non-zero".into()).into());
    }
    ledger
        .account(account_id)
        .await?
        .ok_or_else(|| LedgerError::not_found("Account", account_id))?;

    let mut tx = Transaction::new(kind, date, label, amount, category, account_id);
    if let Some(note) = sub.get_one::<String>("note") {
        tx = tx.with_note(note.trim());
    }
    let id = ledger.insert_transaction(&tx).await?;
    println!(
        "Recorded #{} {} {} on {} '{}' (account #{})",
        id, tx.kind, tx.amount, tx.date, tx.label, account_id
    );
    Ok(())
}

pub fn filter_from_args(sub: &clap::ArgMatches) -> Result<TransactionFilter> {
    let mut filter = TransactionFilter::all();
    if let Some(range) = period_from_args(sub)? {
        filter = filter.in_range(range);
    }
    if let Some(account_id) = sub.get_one::<i64>("account") {
        filter = filter.for_account(*account_id);
    }
    if let Some(category) = sub.get_one::<String>("category") {
        filter = filter.in_category(category.trim());
    }
    if let Some(kind) = sub.get_one::<String>("type") {
        filter = filter.of_kind(kind.parse()?);
    }
    Ok(filter)
}

pub async fn query_rows(ledger: &SqliteLedger, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let filter = filter_from_args(sub)?;
    let mut rows = LedgerAggregator::new(ledger).transactions(&filter).await?;
    if let Some(limit) = sub.get_one::<usize>("limit") {
        rows.truncate(*limit);
    }
    Ok(rows)
}

fn print_rows(rows: &[Transaction]) {
    let data = rows
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.date.to_string(),
                t.kind.to_string(),
                format!("{:.2}", t.signed_amount()),
                t.label.clone(),
                t.category.clone(),
                t.account_id.to_string(),
                t.recurrence_id
                    .map(|r| {
                        if t.is_modified {
                            format!("#{}*", r)
                        } else {
                            format!("#{}", r)
                        }
                    })
                    .unwrap_or_default(),
                t.note.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "Type", "Amount", "Label", "Category", "Account", "Recur", "Note"],
            data,
        )
    );
}

async fn list(ledger: &SqliteLedger, sub: &clap::ArgMatches) -> Result<()> {
    let rows = query_rows(ledger, sub).await?;
    if !maybe_print_json(sub.get_flag("json"), &rows)? {
        print_rows(&rows);
    }
    Ok(())
}

async fn search(ledger: &SqliteLedger, sub: &clap::ArgMatches) -> Result<()> {
    let query = sub.get_one::<String>("query").unwrap();
    let rows = LedgerAggregator::new(ledger).search(query).await?;
    if !maybe_print_json(sub.get_flag("json"), &rows)? {
        print_rows(&rows);
    }
    Ok(())
}

/// Edits one row and flags it as user-modified. For occurrences of a
/// recurrence the flag keeps later series rewrites away from them.
async fn edit(ledger: &SqliteLedger, config: &LedgerConfig, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let mut tx = ledger
        .transaction(id)
        .await?
        .with_context(|| format!("Transaction #{} not found", id))?;
    if let Some(date) = sub.get_one::<String>("date") {
        tx.date = parse_date(date)?;
    }
    if let Some(kind) = sub.get_one::<String>("type") {
        tx.kind = kind.parse()?;
    }
    if let Some(amount) = sub.get_one::<String>("amount") {
        tx.amount = parse_decimal(amount)?.abs();
    }
    if let Some(label) = sub.get_one::<String>("label") {
        tx.label = label.trim().to_string();
    }
    if let Some(note) = sub.get_one::<String>("note") {
        tx.note = note.trim().to_string();
    }
    if let Some(category) = sub.get_one::<String>("category") {
        tx.category = category.trim().to_string();
    }
    if tx.recurrence_id.is_some() {
        RecurrenceEngine::new(ledger, config)
            .modify_occurrence(&tx)
            .await?;
    } else {
        tx.is_modified = true;
        ledger.update_transaction(&tx).await?;
    }
    println!("Updated transaction #{}", id);
    Ok(())
}

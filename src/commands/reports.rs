// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::period_or_current_year;
use crate::ledger::LedgerAggregator;
use crate::models::TransactionKind;
use crate::store::{LedgerStore, SettingsStore, SqliteLedger};
use crate::utils::{fmt_money, maybe_print_json, parse_year, pretty_table};
use anyhow::Result;
use chrono::Datelike;
use serde_json::json;

pub async fn handle(ledger: &SqliteLedger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("result", sub)) => result(ledger, sub).await?,
        Some(("monthly", sub)) => monthly(ledger, sub).await?,
        Some(("by-category", sub)) => by_category(ledger, sub).await?,
        Some(("by-account", sub)) => by_account(ledger, sub).await?,
        _ => {}
    }
    Ok(())
}

async fn result(ledger: &SqliteLedger, sub: &clap::ArgMatches) -> Result<()> {
    let range = period_or_current_year(sub)?;
    let r = LedgerAggregator::new(ledger).period_result(range).await?;
    let payload = json!({
        "start": range.start,
        "end": range.end,
        "income": r.income,
        "expense": r.expense,
        "result": r.result,
        "margin_percent": r.margin_percent(),
    });
    if !maybe_print_json(sub.get_flag("json"), &payload)? {
        let ccy = ledger.currency().await?;
        println!("{} .. {}", range.start, range.end);
        println!(
            "{}",
            pretty_table(
                &["Income", "Expense", "Result", "Margin %"],
                vec![vec![
                    fmt_money(&r.income, &ccy),
                    fmt_money(&r.expense, &ccy),
                    fmt_money(&r.result, &ccy),
                    format!("{:.2}", r.margin_percent()),
                ]],
            )
        );
    }
    Ok(())
}

async fn monthly(ledger: &SqliteLedger, sub: &clap::ArgMatches) -> Result<()> {
    let year = match sub.get_one::<String>("year") {
        Some(y) => parse_year(y)?,
        None => chrono::Local::now().year(),
    };
    let months = LedgerAggregator::new(ledger).monthly_results(year).await?;
    if !maybe_print_json(sub.get_flag("json"), &months)? {
        let data = months
            .iter()
            .map(|m| {
                vec![
                    format!("{} {}", m.label, year),
                    format!("{:.2}", m.result.income),
                    format!("{:.2}", m.result.expense),
                    format!("{:.2}", m.result.result),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Result"], data)
        );
    }
    Ok(())
}

async fn by_category(ledger: &SqliteLedger, sub: &clap::ArgMatches) -> Result<()> {
    let range = period_or_current_year(sub)?;
    let kind = sub
        .get_one::<String>("type")
        .map(|k| k.parse::<TransactionKind>())
        .transpose()?;
    let totals = LedgerAggregator::new(ledger)
        .totals_by_category(range, kind)
        .await?;
    if !maybe_print_json(sub.get_flag("json"), &totals)? {
        let data = totals
            .iter()
            .map(|(category, r)| {
                vec![
                    category.clone(),
                    format!("{:.2}", r.income),
                    format!("{:.2}", r.expense),
                    format!("{:.2}", r.result),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Income", "Expense", "Result"], data)
        );
    }
    Ok(())
}

async fn by_account(ledger: &SqliteLedger, sub: &clap::ArgMatches) -> Result<()> {
    let range = period_or_current_year(sub)?;
    let totals = LedgerAggregator::new(ledger).totals_by_account(range).await?;
    if !maybe_print_json(sub.get_flag("json"), &totals)? {
        let names: std::collections::HashMap<i64, String> = ledger
            .accounts()
            .await?
            .into_iter()
            .map(|a| (a.id, a.name))
            .collect();
        let data = totals
            .iter()
            .map(|t| {
                vec![
                    names
                        .get(&t.account_id)
                        .cloned()
                        .unwrap_or_else(|| format!("#{}", t.account_id)),
                    format!("{:.2}", t.result.income),
                    format!("{:.2}", t.result.expense),
                    format!("{:.2}", t.result.result),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Account", "Income", "Expense", "Result"], data)
        );
    }
    Ok(())
}

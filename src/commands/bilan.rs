// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::date_or_today;
use crate::ledger::{BilanEngine, BilanSnapshot};
use crate::store::{SettingsStore, SqliteLedger};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;

pub async fn handle(ledger: &SqliteLedger, m: &clap::ArgMatches) -> Result<()> {
    let engine = BilanEngine::new(ledger);
    match m.subcommand() {
        Some(("show", sub)) => {
            let snapshot = engine.snapshot(date_or_today(sub, "as-of")?).await?;
            if !maybe_print_json(sub.get_flag("json"), &snapshot)? {
                print_snapshot(&snapshot, &ledger.currency().await?);
            }
        }
        Some(("set-equity", sub)) => {
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            let snapshot = engine
                .set_equity(amount, date_or_today(sub, "as-of")?)
                .await?;
            println!("Equity set to {}", amount);
            print_snapshot(&snapshot, &ledger.currency().await?);
        }
        _ => {}
    }
    Ok(())
}

fn print_snapshot(s: &BilanSnapshot, ccy: &str) {
    let rows = vec![
        vec!["Treasury".to_string(), fmt_money(&s.treasury, ccy)],
        vec!["Fixed assets (net)".to_string(), fmt_money(&s.net_asset_value, ccy)],
        vec!["Total assets".to_string(), fmt_money(&s.total_asset, ccy)],
        vec!["Equity".to_string(), fmt_money(&s.equity, ccy)],
        vec!["Result of the year".to_string(), fmt_money(&s.period_result, ccy)],
        vec![
            "Total liabilities and equity".to_string(),
            fmt_money(&s.total_liability_and_equity, ccy),
        ],
    ];
    println!("Balance sheet as of {}", s.as_of);
    println!("{}", pretty_table(&["Line", "Amount"], rows));
    if s.is_balanced {
        println!("Balanced");
    } else {
        println!("Not balanced (gap {})", fmt_money(&s.gap(), ccy));
    }
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{AccountBook, LedgerAggregator};
use crate::models::{Account, AccountKind};
use crate::store::{SettingsStore, SqliteLedger};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;

pub async fn handle(ledger: &SqliteLedger, m: &clap::ArgMatches) -> Result<()> {
    let book = AccountBook::new(ledger);
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let kind: AccountKind = sub.get_one::<String>("type").unwrap().parse()?;
            let balance = parse_decimal(sub.get_one::<String>("balance").unwrap())?;
            let mut account = Account::new(name.trim(), kind, balance);
            account.active = !sub.get_flag("inactive");
            let created = book.create(&account).await?;
            println!(
                "Added account #{} '{}' ({}, opening {})",
                created.id, created.name, created.kind, created.initial_balance
            );
        }
        Some(("list", sub)) => list(ledger, sub).await?,
        Some(("activate", sub)) => {
            let account = book.set_active(*sub.get_one::<i64>("id").unwrap(), true).await?;
            println!("Activated account #{} '{}'", account.id, account.name);
        }
        Some(("deactivate", sub)) => {
            let account = book
                .set_active(*sub.get_one::<i64>("id").unwrap(), false)
                .await?;
            println!("Deactivated account #{} '{}'", account.id, account.name);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            book.delete(id).await?;
            println!("Removed account #{}", id);
        }
        _ => {}
    }
    Ok(())
}

async fn list(ledger: &SqliteLedger, sub: &clap::ArgMatches) -> Result<()> {
    let balances = LedgerAggregator::new(ledger)
        .account_balances(sub.get_flag("active"))
        .await?;
    if maybe_print_json(sub.get_flag("json"), &balances)? {
        return Ok(());
    }
    let ccy = ledger.currency().await?;
    let rows = balances
        .iter()
        .map(|b| {
            vec![
                b.account.id.to_string(),
                b.account.name.clone(),
                b.account.kind.to_string(),
                if b.account.active { "yes" } else { "no" }.to_string(),
                fmt_money(&b.account.initial_balance, &ccy),
                fmt_money(&b.balance, &ccy),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Name", "Type", "Active", "Opening", "Balance"], rows)
    );
    Ok(())
}

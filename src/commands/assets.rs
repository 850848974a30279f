// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::date_or_today;
use crate::ledger::amortization::{
    annual_amortization, monthly_amortization, net_book_value, schedule, validate_asset,
};
use crate::models::Asset;
use crate::store::{LedgerStore, SettingsStore, SqliteLedger};
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Serialize)]
struct AssetRow {
    #[serde(flatten)]
    asset: Asset,
    total_cost: Decimal,
    annual_amortization: Decimal,
    monthly_amortization: Decimal,
    net_book_value: Decimal,
}

pub async fn handle(ledger: &SqliteLedger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let mut asset = Asset::new(
                sub.get_one::<String>("name").unwrap().trim(),
                parse_date(sub.get_one::<String>("date").unwrap())?,
                parse_decimal(sub.get_one::<String>("cost").unwrap())?,
                *sub.get_one::<u32>("years").unwrap(),
            );
            asset.quantity = *sub.get_one::<u32>("quantity").unwrap();
            validate_asset(&asset)?;
            let id = ledger.insert_asset(&asset).await?;
            println!(
                "Added asset #{} '{}' ({} over {} year(s))",
                id,
                asset.name,
                asset.total_cost(),
                asset.duration_years
            );
        }
        Some(("list", sub)) => {
            let as_of = date_or_today(sub, "as-of")?;
            let mut data = Vec::new();
            for asset in ledger.assets().await? {
                data.push(AssetRow {
                    total_cost: asset.total_cost(),
                    annual_amortization: annual_amortization(&asset)?,
                    monthly_amortization: monthly_amortization(&asset)?.round_dp(2),
                    net_book_value: net_book_value(&asset, as_of)?,
                    asset,
                });
            }
            if !maybe_print_json(sub.get_flag("json"), &data)? {
                let ccy = ledger.currency().await?;
                let rows = data
                    .iter()
                    .map(|r| {
                        vec![
                            r.asset.id.to_string(),
                            r.asset.name.clone(),
                            r.asset.purchase_date.to_string(),
                            r.asset.quantity.to_string(),
                            fmt_money(&r.total_cost, &ccy),
                            r.asset.duration_years.to_string(),
                            fmt_money(&r.annual_amortization, &ccy),
                            fmt_money(&r.net_book_value, &ccy),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &["ID", "Name", "Purchased", "Qty", "Cost", "Years", "Per year", "Book value"],
                        rows,
                    )
                );
            }
        }
        Some(("schedule", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let asset = ledger
                .asset(id)
                .await?
                .with_context(|| format!("Asset #{} not found", id))?;
            let rows = schedule(&asset)?;
            if !maybe_print_json(sub.get_flag("json"), &rows)? {
                let data = rows
                    .iter()
                    .map(|r| {
                        vec![
                            r.year.to_string(),
                            r.anniversary.to_string(),
                            format!("{:.2}", r.amortization),
                            format!("{:.2}", r.cumulative),
                            format!("{:.2}", r.net_book_value),
                        ]
                    })
                    .collect();
                println!("{} ({})", asset.name, asset.total_cost());
                println!(
                    "{}",
                    pretty_table(
                        &["Year", "Anniversary", "Amortization", "Cumulative", "Book value"],
                        data,
                    )
                );
            }
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            ledger.delete_asset(id).await?;
            println!("Removed asset #{}", id);
        }
        _ => {}
    }
    Ok(())
}

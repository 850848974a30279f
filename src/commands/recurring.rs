// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::date_or_today;
use crate::config::LedgerConfig;
use crate::ledger::RecurrenceEngine;
use crate::models::RecurrenceTemplate;
use crate::store::{LedgerStore, SqliteLedger};
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{Context, Result};

pub async fn handle(
    ledger: &SqliteLedger,
    config: &LedgerConfig,
    m: &clap::ArgMatches,
) -> Result<()> {
    let engine = RecurrenceEngine::new(ledger, config);
    match m.subcommand() {
        Some(("add", sub)) => {
            let today = date_or_today(sub, "today")?;
            let mut template = RecurrenceTemplate::monthly(
                sub.get_one::<String>("label").unwrap().trim(),
                parse_decimal(sub.get_one::<String>("amount").unwrap())?,
                sub.get_one::<String>("category").unwrap().trim(),
                *sub.get_one::<i64>("account").unwrap(),
                parse_date(sub.get_one::<String>("start").unwrap())?,
            );
            if let Some(end) = sub.get_one::<String>("end") {
                template.end_date = Some(parse_date(end)?);
            }
            if let Some(note) = sub.get_one::<String>("note") {
                template.note = note.trim().to_string();
            }
            ledger
                .account(template.account_id)
                .await?
                .with_context(|| format!("Account #{} not found", template.account_id))?;
            let (stored, generated) = engine.create_template(&template, today).await?;
            println!(
                "Added recurrence #{} '{}' ({} {}), {} occurrence(s) generated",
                stored.id,
                stored.label,
                stored.kind(),
                stored.amount.abs(),
                generated
            );
        }
        Some(("list", sub)) => {
            let templates = ledger.recurrences(!sub.get_flag("all")).await?;
            if !maybe_print_json(sub.get_flag("json"), &templates)? {
                let rows = templates
                    .iter()
                    .map(|t| {
                        vec![
                            t.id.to_string(),
                            t.label.clone(),
                            t.kind().to_string(),
                            format!("{:.2}", t.amount.abs()),
                            t.category.clone(),
                            t.account_id.to_string(),
                            t.frequency.to_string(),
                            t.start_date.to_string(),
                            t.end_date.map(|d| d.to_string()).unwrap_or_default(),
                            if t.active { "yes" } else { "no" }.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &[
                            "ID", "Label", "Type", "Amount", "Category", "Account", "Frequency",
                            "Start", "End", "Active",
                        ],
                        rows,
                    )
                );
            }
        }
        Some(("generate", sub)) => {
            let today = date_or_today(sub, "today")?;
            let report = engine.generate_pending(today).await?;
            if !maybe_print_json(sub.get_flag("json"), &report)? {
                println!(
                    "Generated {} transaction(s) from {} template(s), {} failed",
                    report.generated,
                    report.templates,
                    report.failures.len()
                );
                for failure in report.failure_sample(config.error_sample) {
                    println!("  template #{}: {}", failure.template_id, failure.message);
                }
                if report.failures.len() > config.error_sample {
                    println!("  ... and {} more", report.failures.len() - config.error_sample);
                }
            }
        }
        Some(("edit", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let today = date_or_today(sub, "today")?;
            let mut template = ledger
                .recurrence(id)
                .await?
                .with_context(|| format!("Recurrence #{} not found", id))?;
            if let Some(label) = sub.get_one::<String>("label") {
                template.label = label.trim().to_string();
            }
            if let Some(amount) = sub.get_one::<String>("amount") {
                template.amount = parse_decimal(amount)?;
            }
            if let Some(category) = sub.get_one::<String>("category") {
                template.category = category.trim().to_string();
            }
            if let Some(note) = sub.get_one::<String>("note") {
                template.note = note.trim().to_string();
            }
            if let Some(end) = sub.get_one::<String>("end") {
                template.end_date = Some(parse_date(end)?);
            }
            if sub.get_flag("deactivate") {
                template.active = false;
            }
            let generated = match sub.get_one::<String>("from") {
                Some(from) => {
                    let from = parse_date(from)?;
                    engine
                        .modify_future_occurrences(&template, from, today)
                        .await?
                }
                None => engine.modify_series(&template, today).await?,
            };
            println!(
                "Updated recurrence #{}, {} occurrence(s) regenerated",
                id, generated
            );
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let template = ledger
                .recurrence(id)
                .await?
                .with_context(|| format!("Recurrence #{} not found", id))?;
            let removed = engine.delete_series(&template).await?;
            println!(
                "Removed recurrence #{} and {} transaction(s)",
                id, removed
            );
        }
        _ => {}
    }
    Ok(())
}

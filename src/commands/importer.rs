// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::LedgerConfig;
use crate::ledger::{ImportReport, StatementImporter};
use crate::store::SqliteLedger;
use crate::utils::maybe_print_json;
use anyhow::Result;
use std::path::Path;

pub async fn handle(
    ledger: &SqliteLedger,
    config: &LedgerConfig,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("statement", sub)) => import_statement(ledger, config, sub).await,
        _ => Ok(()),
    }
}

async fn import_statement(
    ledger: &SqliteLedger,
    config: &LedgerConfig,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let report = StatementImporter::new(ledger, config)
        .import_file(Path::new(path))
        .await?;
    if !maybe_print_json(sub.get_flag("json"), &report)? {
        print_summary(path, &report, config.error_sample);
    }
    Ok(())
}

pub fn print_summary(path: &str, report: &ImportReport, sample: usize) {
    println!(
        "Imported {} transaction(s) from {} ({} duplicate(s), {} error(s))",
        report.imported.len(),
        path,
        report.duplicates,
        report.error_count
    );
    for msg in report.error_sample(sample) {
        println!("  {}", msg);
    }
    if report.errors.len() > sample {
        println!("  ... and {} more", report.errors.len() - sample);
    }
}

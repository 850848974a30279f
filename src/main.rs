// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use ledgerkeep::config::LedgerConfig;
use ledgerkeep::ledger::RecurrenceEngine;
use ledgerkeep::store::SqliteLedger;
use ledgerkeep::{cli, commands, db, utils};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    utils::init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let config = LedgerConfig::default();
    let ledger = SqliteLedger::new(db::open_or_init()?)?;

    // Recurring entries are expanded on every start; `recur` commands pick
    // their own reference date.
    if !matches!(matches.subcommand_name(), Some("recur")) {
        let today = chrono::Local::now().date_naive();
        RecurrenceEngine::new(&ledger, &config)
            .generate_pending(today)
            .await?;
    }

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("account", sub)) => commands::accounts::handle(&ledger, sub).await?,
        Some(("tx", sub)) => commands::transactions::handle(&ledger, &config, sub).await?,
        Some(("recur", sub)) => commands::recurring::handle(&ledger, &config, sub).await?,
        Some(("asset", sub)) => commands::assets::handle(&ledger, sub).await?,
        Some(("report", sub)) => commands::reports::handle(&ledger, sub).await?,
        Some(("bilan", sub)) => commands::bilan::handle(&ledger, sub).await?,
        Some(("import", sub)) => commands::importer::handle(&ledger, &config, sub).await?,
        Some(("export", sub)) => commands::exporter::handle(&ledger, sub).await?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod assets;
pub mod bilan;
pub mod exporter;
pub mod importer;
pub mod recurring;
pub mod reports;
pub mod transactions;

use anyhow::Result;
use chrono::NaiveDate;

use crate::models::DateRange;
use crate::utils::{parse_date, parse_month, parse_year};

/// `--today`/`--as-of` style argument, else the local date.
pub fn date_or_today(sub: &clap::ArgMatches, name: &str) -> Result<NaiveDate> {
    match sub.get_one::<String>(name) {
        Some(raw) => parse_date(raw),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Period selected by `--year`, `--month` or `--from/--to`; `None` when no
/// bound was given.
pub fn period_from_args(sub: &clap::ArgMatches) -> Result<Option<DateRange>> {
    if let Some(year) = sub.get_one::<String>("year") {
        return Ok(Some(DateRange::year(parse_year(year)?)?));
    }
    if let Some(month) = sub.get_one::<String>("month") {
        let (y, m) = parse_month(month)?;
        return Ok(Some(DateRange::month(y, m)?));
    }
    let from = sub.get_one::<String>("from").map(|s| parse_date(s)).transpose()?;
    let to = sub.get_one::<String>("to").map(|s| parse_date(s)).transpose()?;
    match (from, to) {
        (None, None) => Ok(None),
        (Some(start), Some(end)) => Ok(Some(DateRange::new(start, end)?)),
        (Some(start), None) => Ok(Some(DateRange::new(start, NaiveDate::MAX)?)),
        (None, Some(end)) => Ok(Some(DateRange::new(NaiveDate::MIN, end)?)),
    }
}

/// Explicit period, else the current calendar year.
pub fn period_or_current_year(sub: &clap::ArgMatches) -> Result<DateRange> {
    match period_from_args(sub)? {
        Some(range) => Ok(range),
        None => {
            use chrono::Datelike;
            Ok(DateRange::year(chrono::Local::now().year())?)
        }
    }
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Straight-line amortization of fixed assets.

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{LedgerError, Result};
use crate::models::Asset;

pub fn validate_asset(asset: &Asset) -> Result<()> {
    if asset.name.trim().is_empty() {
        return Err(LedgerError::Validation("Asset name cannot be empty".into()));
    }
    if asset.duration_years == 0 {
        return Err(LedgerError::Validation(format!(
            "Amortization duration of '{}' must be at least one year",
            asset.name
        )));
    }
    if asset.quantity == 0 {
        return Err(LedgerError::Validation(format!(
            "Quantity of '{}' must be positive",
            asset.name
        )));
    }
    if asset.unit_cost <= Decimal::ZERO {
        return Err(LedgerError::Validation(format!(
            "Unit cost of '{}' must be positive",
            asset.name
        )));
    }
    Ok(())
}

pub fn annual_amortization(asset: &Asset) -> Result<Decimal> {
    if asset.duration_years == 0 {
        return Err(LedgerError::Validation(format!(
            "Amortization duration of '{}' must be at least one year",
            asset.name
        )));
    }
    Ok(asset.total_cost() / Decimal::from(asset.duration_years))
}

pub fn monthly_amortization(asset: &Asset) -> Result<Decimal> {
    Ok(annual_amortization(asset)? / Decimal::from(12))
}

/// Whole years between the purchase date and `as_of`; a year counts once its
/// anniversary is reached. Future purchases count zero.
pub fn years_elapsed(purchase: NaiveDate, as_of: NaiveDate) -> u32 {
    if as_of <= purchase {
        return 0;
    }
    let mut years = as_of.year() - purchase.year();
    if (as_of.month(), as_of.day()) < (purchase.month(), purchase.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

/// Amortization booked up to `as_of`, capped at the total cost.
pub fn cumulative_amortization(asset: &Asset, as_of: NaiveDate) -> Result<Decimal> {
    let annual = annual_amortization(asset)?;
    let total = asset.total_cost();
    let years = years_elapsed(asset.purchase_date, as_of);
    if years >= asset.duration_years {
        return Ok(total);
    }
    Ok((annual * Decimal::from(years)).min(total))
}

/// Net book value at `as_of`, within `[0, total_cost]`.
pub fn net_book_value(asset: &Asset, as_of: NaiveDate) -> Result<Decimal> {
    let total = asset.total_cost();
    let cumulative = cumulative_amortization(asset, as_of)?;
    Ok((total - cumulative).max(Decimal::ZERO))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleRow {
    pub year: u32,
    pub anniversary: NaiveDate,
    pub amortization: Decimal,
    pub cumulative: Decimal,
    pub net_book_value: Decimal,
}

/// One row per amortization year, ending at a zero net book value.
pub fn schedule(asset: &Asset) -> Result<Vec<ScheduleRow>> {
    validate_asset(asset)?;
    let mut rows = Vec::with_capacity(asset.duration_years as usize);
    let mut previous = Decimal::ZERO;
    for year in 1..=asset.duration_years {
        let anniversary = asset
            .purchase_date
            .checked_add_months(Months::new(12 * year))
            .ok_or_else(|| {
                LedgerError::Validation(format!("Schedule of '{}' overflows the calendar", asset.name))
            })?;
        let cumulative = cumulative_amortization(asset, anniversary)?;
        rows.push(ScheduleRow {
            year,
            anniversary,
            amortization: cumulative - previous,
            cumulative,
            net_book_value: asset.total_cost() - cumulative,
        });
        previous = cumulative;
    }
    Ok(rows)
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Expansion of recurrence templates into concrete transactions.
//!
//! Generated rows carry `is_modified = false` and are regeneratable. Rows the
//! user edited carry `is_modified = true` and are never touched by series
//! operations. Expansion is keyed on `(recurrence_id, date)`, so running it
//! again over the same window inserts nothing.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};
use crate::models::{Frequency, RecurrenceTemplate, Transaction};
use crate::store::LedgerStore;

/// Occurrence dates of `template` from its start up to
/// `min(end_date, today + horizon_months)`, both bounds inclusive.
///
/// Each date is `start + n months` computed from the start date, so a
/// template starting on the 31st lands on each month's last day without
/// drifting.
pub fn occurrence_dates(
    template: &RecurrenceTemplate,
    today: NaiveDate,
    horizon_months: u32,
) -> Vec<NaiveDate> {
    let horizon = today
        .checked_add_months(Months::new(horizon_months))
        .unwrap_or(NaiveDate::MAX);
    let limit = match template.end_date {
        Some(end) => end.min(horizon),
        None => horizon,
    };
    let mut dates = Vec::new();
    let mut n = 0u32;
    loop {
        let step = match template.frequency {
            Frequency::Monthly => Months::new(n),
        };
        match template.start_date.checked_add_months(step) {
            Some(date) if date <= limit => dates.push(date),
            _ => break,
        }
        n += 1;
    }
    dates
}

pub fn validate_template(template: &RecurrenceTemplate) -> Result<()> {
    if template.label.trim().is_empty() {
        return Err(LedgerError::Validation("Recurrence label cannot be empty".into()));
    }
    if template.amount == Decimal::ZERO {
        return Err(LedgerError::Validation(format!(
            "Recurrence '{}' needs a non-zero amount",
            template.label
        )));
    }
    if let Some(end) = template.end_date {
        if end < template.start_date {
            return Err(LedgerError::Validation(format!(
                "Recurrence '{}' ends ({}) before it starts ({})",
                template.label, end, template.start_date
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TemplateFailure {
    pub template_id: i64,
    pub message: String,
}

/// Outcome of one expansion pass over every active template.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerationReport {
    pub templates: usize,
    pub generated: usize,
    pub failures: Vec<TemplateFailure>,
}

impl GenerationReport {
    pub fn failure_sample(&self, limit: usize) -> &[TemplateFailure] {
        &self.failures[..self.failures.len().min(limit)]
    }
}

pub struct RecurrenceEngine<'a, S> {
    store: &'a S,
    horizon_months: u32,
}

impl<'a, S: LedgerStore> RecurrenceEngine<'a, S> {
    pub fn new(store: &'a S, config: &LedgerConfig) -> Self {
        Self {
            store,
            horizon_months: config.horizon_months,
        }
    }

    /// Expands every active template up to the horizon. A failing template
    /// is recorded in the report and the pass moves on to the next one.
    pub async fn generate_pending(&self, today: NaiveDate) -> Result<GenerationReport> {
        let templates = self.store.recurrences(true).await?;
        let mut report = GenerationReport::default();
        for template in &templates {
            report.templates += 1;
            match self.generate_for_template(template, today).await {
                Ok(n) => report.generated += n,
                Err(e) => {
                    warn!(template_id = template.id, error = %e, "recurrence expansion failed");
                    report.failures.push(TemplateFailure {
                        template_id: template.id,
                        message: e.to_string(),
                    });
                }
            }
        }
        info!(
            templates = report.templates,
            generated = report.generated,
            failed = report.failures.len(),
            "recurring transactions generated"
        );
        Ok(report)
    }

    /// Inserts the missing occurrences of one template; returns how many.
    /// The active flag is not consulted here: series edits re-expand a
    /// paused template so its history survives, and only
    /// [`Self::generate_pending`] skips inactive templates.
    pub async fn generate_for_template(
        &self,
        template: &RecurrenceTemplate,
        today: NaiveDate,
    ) -> Result<usize> {
        let mut inserted = 0;
        for date in occurrence_dates(template, today, self.horizon_months) {
            if self
                .store
                .count_by_recurrence_and_date(template.id, date)
                .await?
                > 0
            {
                continue;
            }
            self.store
                .insert_transaction(&template.occurrence(date))
                .await?;
            inserted += 1;
        }
        debug!(template_id = template.id, inserted, "template expanded");
        Ok(inserted)
    }

    /// Stores a new template and expands it right away.
    pub async fn create_template(
        &self,
        template: &RecurrenceTemplate,
        today: NaiveDate,
    ) -> Result<(RecurrenceTemplate, usize)> {
        validate_template(template)?;
        let id = self.store.insert_recurrence(template).await?;
        let stored = RecurrenceTemplate {
            id,
            ..template.clone()
        };
        let generated = self.generate_for_template(&stored, today).await?;
        info!(template_id = id, generated, "recurrence created");
        Ok((stored, generated))
    }

    /// Saves a user edit of a single occurrence and freezes it.
    pub async fn modify_occurrence(&self, tx: &Transaction) -> Result<()> {
        let edited = Transaction {
            is_modified: true,
            ..tx.clone()
        };
        self.store.update_transaction(&edited).await
    }

    /// Replaces the unmodified occurrences dated on or after `from` with a
    /// fresh expansion of the edited template. Returns the rows generated.
    pub async fn modify_future_occurrences(
        &self,
        template: &RecurrenceTemplate,
        from: NaiveDate,
        today: NaiveDate,
    ) -> Result<usize> {
        validate_template(template)?;
        self.store.update_recurrence(template).await?;
        let removed = self
            .store
            .delete_unmodified_by_recurrence(template.id, Some(from))
            .await?;
        let generated = self.generate_for_template(template, today).await?;
        info!(template_id = template.id, %from, removed, generated, "future occurrences rewritten");
        Ok(generated)
    }

    /// Same as [`Self::modify_future_occurrences`] over the whole series.
    pub async fn modify_series(
        &self,
        template: &RecurrenceTemplate,
        today: NaiveDate,
    ) -> Result<usize> {
        validate_template(template)?;
        self.store.update_recurrence(template).await?;
        let removed = self
            .store
            .delete_unmodified_by_recurrence(template.id, None)
            .await?;
        let generated = self.generate_for_template(template, today).await?;
        info!(template_id = template.id, removed, generated, "series rewritten");
        Ok(generated)
    }

    pub async fn delete_occurrence(&self, tx: &Transaction) -> Result<()> {
        self.store.delete_transaction(tx.id).await
    }

    /// Removes the template and every row it spawned, edited or not.
    pub async fn delete_series(&self, template: &RecurrenceTemplate) -> Result<usize> {
        let removed = self.store.delete_all_by_recurrence(template.id).await?;
        self.store.delete_recurrence(template.id).await?;
        info!(template_id = template.id, removed, "series deleted");
        Ok(removed)
    }
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Persistence seam of the ledger.
//!
//! Every operation is `async` so callers await each step in sequence; the
//! SQLite implementation runs the statement inline on its single connection,
//! which makes it the one writer of the ledger.

use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::types::{Type, Value};
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use rust_decimal::Decimal;

use crate::config::{DEFAULT_CATEGORIES, DEFAULT_CURRENCY};
use crate::db::init_schema;
use crate::error::{LedgerError, Result};
use crate::models::{
    Account, AccountKind, Asset, DateRange, Frequency, RecurrenceTemplate, Transaction,
    TransactionKind,
};
use crate::utils::{epoch_day, from_epoch_day};

/// Predicate over the transaction log. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub range: Option<DateRange>,
    pub account_id: Option<i64>,
    pub category: Option<String>,
    pub kind: Option<TransactionKind>,
    pub recurrence_id: Option<i64>,
}

impl TransactionFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn in_range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn for_account(mut self, account_id: i64) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn of_kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn for_recurrence(mut self, recurrence_id: i64) -> Self {
        self.recurrence_id = Some(recurrence_id);
        self
    }

    fn where_clause(&self) -> (String, Vec<Value>) {
        let mut sql = String::from(" WHERE 1=1");
        let mut values = Vec::new();
        if let Some(range) = self.range {
            sql.push_str(" AND date_epoch BETWEEN ? AND ?");
            values.push(Value::Integer(epoch_day(range.start)));
            values.push(Value::Integer(epoch_day(range.end)));
        }
        if let Some(account_id) = self.account_id {
            sql.push_str(" AND account_id = ?");
            values.push(Value::Integer(account_id));
        }
        if let Some(category) = &self.category {
            sql.push_str(" AND category = ?");
            values.push(Value::Text(category.clone()));
        }
        if let Some(kind) = self.kind {
            sql.push_str(" AND type = ?");
            values.push(Value::Text(kind.as_str().to_string()));
        }
        if let Some(recurrence_id) = self.recurrence_id {
            sql.push_str(" AND recurrence_id = ?");
            values.push(Value::Integer(recurrence_id));
        }
        (sql, values)
    }
}

#[allow(async_fn_in_trait)]
pub trait LedgerStore {
    async fn insert_account(&self, account: &Account) -> Result<i64>;
    async fn update_account(&self, account: &Account) -> Result<()>;
    async fn delete_account(&self, id: i64) -> Result<()>;
    async fn account(&self, id: i64) -> Result<Option<Account>>;
    async fn accounts(&self) -> Result<Vec<Account>>;
    async fn count_active_accounts(&self) -> Result<usize>;

    async fn insert_transaction(&self, tx: &Transaction) -> Result<i64>;
    async fn update_transaction(&self, tx: &Transaction) -> Result<()>;
    async fn delete_transaction(&self, id: i64) -> Result<()>;
    async fn transaction(&self, id: i64) -> Result<Option<Transaction>>;
    /// Matching rows, newest first.
    async fn transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>>;
    /// Case-insensitive substring match on label and note.
    async fn search(&self, query: &str) -> Result<Vec<Transaction>>;
    /// Sum of the (positive) amounts of the matching rows.
    async fn sum_amounts(&self, filter: &TransactionFilter) -> Result<Decimal>;
    async fn count_transactions(&self, filter: &TransactionFilter) -> Result<usize>;
    async fn count_by_recurrence_and_date(&self, recurrence_id: i64, date: NaiveDate)
    -> Result<usize>;
    /// Deletes rows of the recurrence with `is_modified = false`, optionally
    /// only those dated on or after `from`.
    async fn delete_unmodified_by_recurrence(
        &self,
        recurrence_id: i64,
        from: Option<NaiveDate>,
    ) -> Result<usize>;
    async fn delete_all_by_recurrence(&self, recurrence_id: i64) -> Result<usize>;

    async fn insert_recurrence(&self, template: &RecurrenceTemplate) -> Result<i64>;
    async fn update_recurrence(&self, template: &RecurrenceTemplate) -> Result<()>;
    async fn delete_recurrence(&self, id: i64) -> Result<()>;
    async fn recurrence(&self, id: i64) -> Result<Option<RecurrenceTemplate>>;
    async fn recurrences(&self, active_only: bool) -> Result<Vec<RecurrenceTemplate>>;

    async fn insert_asset(&self, asset: &Asset) -> Result<i64>;
    async fn update_asset(&self, asset: &Asset) -> Result<()>;
    async fn delete_asset(&self, id: i64) -> Result<()>;
    async fn asset(&self, id: i64) -> Result<Option<Asset>>;
    async fn assets(&self) -> Result<Vec<Asset>>;
}

/// User settings the core reads: equity amount, currency, category vocabulary.
#[allow(async_fn_in_trait)]
pub trait SettingsStore {
    async fn equity(&self) -> Result<Decimal>;
    async fn set_equity(&self, amount: Decimal) -> Result<()>;
    async fn currency(&self) -> Result<String>;
    async fn set_currency(&self, currency: &str) -> Result<()>;
    async fn categories(&self) -> Result<Vec<String>>;
    async fn set_categories(&self, categories: &[String]) -> Result<()>;
}

const ACCOUNT_COLUMNS: &str = "id, name, type, initial_balance, active";
const TRANSACTION_COLUMNS: &str =
    "id, type, date_epoch, label, note, amount, category, account_id, recurrence_id, is_modified";
const RECURRENCE_COLUMNS: &str =
    "id, label, note, amount, category, account_id, frequency, start_epoch, end_epoch, active";
const ASSET_COLUMNS: &str = "id, name, purchase_epoch, unit_cost, quantity, duration_years";

fn conversion_error(idx: usize, ty: Type, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, ty, msg.into())
}

fn decimal_col(r: &Row, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = r.get(idx)?;
    raw.parse::<Decimal>()
        .map_err(|e| conversion_error(idx, Type::Text, format!("Invalid decimal '{}': {}", raw, e)))
}

fn date_col(r: &Row, idx: usize) -> rusqlite::Result<NaiveDate> {
    let days: i64 = r.get(idx)?;
    from_epoch_day(days)
        .ok_or_else(|| conversion_error(idx, Type::Integer, format!("Invalid day {}", days)))
}

fn opt_date_col(r: &Row, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    match r.get::<_, Option<i64>>(idx)? {
        Some(_) => date_col(r, idx).map(Some),
        None => Ok(None),
    }
}

fn parsed_col<T>(r: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = LedgerError>,
{
    let raw: String = r.get(idx)?;
    raw.parse::<T>()
        .map_err(|e| conversion_error(idx, Type::Text, e.to_string()))
}

fn account_from_row(r: &Row) -> rusqlite::Result<Account> {
    Ok(Account {
        id: r.get(0)?,
        name: r.get(1)?,
        kind: parsed_col::<AccountKind>(r, 2)?,
        initial_balance: decimal_col(r, 3)?,
        active: r.get(4)?,
    })
}

fn transaction_from_row(r: &Row) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: r.get(0)?,
        kind: parsed_col::<TransactionKind>(r, 1)?,
        date: date_col(r, 2)?,
        label: r.get(3)?,
        note: r.get(4)?,
        amount: decimal_col(r, 5)?,
        category: r.get(6)?,
        account_id: r.get(7)?,
        recurrence_id: r.get(8)?,
        is_modified: r.get(9)?,
    })
}

fn recurrence_from_row(r: &Row) -> rusqlite::Result<RecurrenceTemplate> {
    Ok(RecurrenceTemplate {
        id: r.get(0)?,
        label: r.get(1)?,
        note: r.get(2)?,
        amount: decimal_col(r, 3)?,
        category: r.get(4)?,
        account_id: r.get(5)?,
        frequency: parsed_col::<Frequency>(r, 6)?,
        start_date: date_col(r, 7)?,
        end_date: opt_date_col(r, 8)?,
        active: r.get(9)?,
    })
}

fn asset_from_row(r: &Row) -> rusqlite::Result<Asset> {
    Ok(Asset {
        id: r.get(0)?,
        name: r.get(1)?,
        purchase_date: date_col(r, 2)?,
        unit_cost: decimal_col(r, 3)?,
        quantity: r.get(4)?,
        duration_years: r.get(5)?,
    })
}

fn expect_changed(changed: usize, entity: &'static str, id: i64) -> Result<()> {
    if changed == 0 {
        return Err(LedgerError::not_found(entity, id));
    }
    Ok(())
}

/// SQLite-backed ledger: one connection, one writer.
pub struct SqliteLedger {
    conn: Connection,
}

impl SqliteLedger {
    pub fn new(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn query_transactions(&self, sql: &str, values: Vec<Value>) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params_from_iter(values), transaction_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn setting(&self, key: &str) -> Result<Option<String>> {
        let v = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key=?1",
                params![key],
                |r| r.get(0),
            )
            .optional()?;
        Ok(v)
    }

    fn put_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

impl LedgerStore for SqliteLedger {
    async fn insert_account(&self, account: &Account) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO accounts(name, type, initial_balance, active) VALUES (?1, ?2, ?3, ?4)",
            params![
                account.name,
                account.kind.as_str(),
                account.initial_balance.to_string(),
                account.active
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    async fn update_account(&self, account: &Account) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE accounts SET name=?1, type=?2, initial_balance=?3, active=?4 WHERE id=?5",
            params![
                account.name,
                account.kind.as_str(),
                account.initial_balance.to_string(),
                account.active,
                account.id
            ],
        )?;
        expect_changed(changed, "Account", account.id)
    }

    async fn delete_account(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM accounts WHERE id=?1", params![id])?;
        expect_changed(changed, "Account", id)
    }

    async fn account(&self, id: i64) -> Result<Option<Account>> {
        let sql = format!("SELECT {} FROM accounts WHERE id=?1", ACCOUNT_COLUMNS);
        let account = self
            .conn
            .query_row(&sql, params![id], account_from_row)
            .optional()?;
        Ok(account)
    }

    async fn accounts(&self) -> Result<Vec<Account>> {
        let sql = format!("SELECT {} FROM accounts ORDER BY name, id", ACCOUNT_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], account_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    async fn count_active_accounts(&self) -> Result<usize> {
        let n: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM accounts WHERE active=1", [], |r| {
                    r.get(0)
                })?;
        Ok(n as usize)
    }

    async fn insert_transaction(&self, tx: &Transaction) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO transactions(type, date_epoch, label, note, amount, category, account_id, recurrence_id, is_modified) \
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
            params![
                tx.kind.as_str(),
                epoch_day(tx.date),
                tx.label,
                tx.note,
                tx.amount.abs().to_string(),
                tx.category,
                tx.account_id,
                tx.recurrence_id,
                tx.is_modified
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    async fn update_transaction(&self, tx: &Transaction) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE transactions SET type=?1, date_epoch=?2, label=?3, note=?4, amount=?5, category=?6, \
             account_id=?7, recurrence_id=?8, is_modified=?9 WHERE id=?10",
            params![
                tx.kind.as_str(),
                epoch_day(tx.date),
                tx.label,
                tx.note,
                tx.amount.abs().to_string(),
                tx.category,
                tx.account_id,
                tx.recurrence_id,
                tx.is_modified,
                tx.id
            ],
        )?;
        expect_changed(changed, "Transaction", tx.id)
    }

    async fn delete_transaction(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM transactions WHERE id=?1", params![id])?;
        expect_changed(changed, "Transaction", id)
    }

    async fn transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let sql = format!("SELECT {} FROM transactions WHERE id=?1", TRANSACTION_COLUMNS);
        let tx = self
            .conn
            .query_row(&sql, params![id], transaction_from_row)
            .optional()?;
        Ok(tx)
    }

    async fn transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let (clause, values) = filter.where_clause();
        let sql = format!(
            "SELECT {} FROM transactions{} ORDER BY date_epoch DESC, id DESC",
            TRANSACTION_COLUMNS, clause
        );
        self.query_transactions(&sql, values)
    }

    async fn search(&self, query: &str) -> Result<Vec<Transaction>> {
        let needle = query.trim().to_lowercase();
        let sql = format!(
            "SELECT {} FROM transactions ORDER BY date_epoch DESC, id DESC",
            TRANSACTION_COLUMNS
        );
        let all = self.query_transactions(&sql, Vec::new())?;
        Ok(all
            .into_iter()
            .filter(|tx| {
                tx.label.to_lowercase().contains(&needle)
                    || tx.note.to_lowercase().contains(&needle)
            })
            .collect())
    }

    async fn sum_amounts(&self, filter: &TransactionFilter) -> Result<Decimal> {
        let (clause, values) = filter.where_clause();
        let sql = format!("SELECT amount FROM transactions{}", clause);
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(values))?;
        let mut total = Decimal::ZERO;
        while let Some(r) = rows.next()? {
            total += decimal_col(r, 0)?;
        }
        Ok(total)
    }

    async fn count_transactions(&self, filter: &TransactionFilter) -> Result<usize> {
        let (clause, values) = filter.where_clause();
        let sql = format!("SELECT COUNT(*) FROM transactions{}", clause);
        let n: i64 = self
            .conn
            .query_row(&sql, params_from_iter(values), |r| r.get(0))?;
        Ok(n as usize)
    }

    async fn count_by_recurrence_and_date(
        &self,
        recurrence_id: i64,
        date: NaiveDate,
    ) -> Result<usize> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE recurrence_id=?1 AND date_epoch=?2",
            params![recurrence_id, epoch_day(date)],
            |r| r.get(0),
        )?;
        Ok(n as usize)
    }

    async fn delete_unmodified_by_recurrence(
        &self,
        recurrence_id: i64,
        from: Option<NaiveDate>,
    ) -> Result<usize> {
        let changed = match from {
            Some(from) => self.conn.execute(
                "DELETE FROM transactions WHERE recurrence_id=?1 AND is_modified=0 AND date_epoch>=?2",
                params![recurrence_id, epoch_day(from)],
            )?,
            None => self.conn.execute(
                "DELETE FROM transactions WHERE recurrence_id=?1 AND is_modified=0",
                params![recurrence_id],
            )?,
        };
        Ok(changed)
    }

    async fn delete_all_by_recurrence(&self, recurrence_id: i64) -> Result<usize> {
        let changed = self.conn.execute(
            "DELETE FROM transactions WHERE recurrence_id=?1",
            params![recurrence_id],
        )?;
        Ok(changed)
    }

    async fn insert_recurrence(&self, template: &RecurrenceTemplate) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO recurrence_templates(label, note, amount, category, account_id, frequency, start_epoch, end_epoch, active) \
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
            params![
                template.label,
                template.note,
                template.amount.to_string(),
                template.category,
                template.account_id,
                template.frequency.as_str(),
                epoch_day(template.start_date),
                template.end_date.map(epoch_day),
                template.active
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    async fn update_recurrence(&self, template: &RecurrenceTemplate) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE recurrence_templates SET label=?1, note=?2, amount=?3, category=?4, account_id=?5, \
             frequency=?6, start_epoch=?7, end_epoch=?8, active=?9 WHERE id=?10",
            params![
                template.label,
                template.note,
                template.amount.to_string(),
                template.category,
                template.account_id,
                template.frequency.as_str(),
                epoch_day(template.start_date),
                template.end_date.map(epoch_day),
                template.active,
                template.id
            ],
        )?;
        expect_changed(changed, "Recurrence", template.id)
    }

    async fn delete_recurrence(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM recurrence_templates WHERE id=?1", params![id])?;
        expect_changed(changed, "Recurrence", id)
    }

    async fn recurrence(&self, id: i64) -> Result<Option<RecurrenceTemplate>> {
        let sql = format!(
            "SELECT {} FROM recurrence_templates WHERE id=?1",
            RECURRENCE_COLUMNS
        );
        let template = self
            .conn
            .query_row(&sql, params![id], recurrence_from_row)
            .optional()?;
        Ok(template)
    }

    async fn recurrences(&self, active_only: bool) -> Result<Vec<RecurrenceTemplate>> {
        let sql = if active_only {
            format!(
                "SELECT {} FROM recurrence_templates WHERE active=1 ORDER BY id",
                RECURRENCE_COLUMNS
            )
        } else {
            format!(
                "SELECT {} FROM recurrence_templates ORDER BY id",
                RECURRENCE_COLUMNS
            )
        };
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], recurrence_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    async fn insert_asset(&self, asset: &Asset) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO assets(name, purchase_epoch, unit_cost, quantity, duration_years) VALUES (?1,?2,?3,?4,?5)",
            params![
                asset.name,
                epoch_day(asset.purchase_date),
                asset.unit_cost.to_string(),
                asset.quantity,
                asset.duration_years
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    async fn update_asset(&self, asset: &Asset) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE assets SET name=?1, purchase_epoch=?2, unit_cost=?3, quantity=?4, duration_years=?5 WHERE id=?6",
            params![
                asset.name,
                epoch_day(asset.purchase_date),
                asset.unit_cost.to_string(),
                asset.quantity,
                asset.duration_years,
                asset.id
            ],
        )?;
        expect_changed(changed, "Asset", asset.id)
    }

    async fn delete_asset(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM assets WHERE id=?1", params![id])?;
        expect_changed(changed, "Asset", id)
    }

    async fn asset(&self, id: i64) -> Result<Option<Asset>> {
        let sql = format!("SELECT {} FROM assets WHERE id=?1", ASSET_COLUMNS);
        let asset = self
            .conn
            .query_row(&sql, params![id], asset_from_row)
            .optional()?;
        Ok(asset)
    }

    async fn assets(&self) -> Result<Vec<Asset>> {
        let sql = format!(
            "SELECT {} FROM assets ORDER BY purchase_epoch, id",
            ASSET_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], asset_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

impl SettingsStore for SqliteLedger {
    async fn equity(&self) -> Result<Decimal> {
        match self.setting("equity_amount")? {
            Some(raw) => raw.parse::<Decimal>().map_err(|e| {
                LedgerError::CorruptRecord(format!("equity_amount '{}': {}", raw, e))
            }),
            None => Ok(Decimal::ZERO),
        }
    }

    async fn set_equity(&self, amount: Decimal) -> Result<()> {
        self.put_setting("equity_amount", &amount.to_string())
    }

    async fn currency(&self) -> Result<String> {
        Ok(self
            .setting("currency")?
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()))
    }

    async fn set_currency(&self, currency: &str) -> Result<()> {
        let ccy = currency.trim().to_uppercase();
        if ccy.is_empty() {
            return Err(LedgerError::Validation("Currency cannot be empty".into()));
        }
        self.put_setting("currency", &ccy)
    }

    async fn categories(&self) -> Result<Vec<String>> {
        match self.setting("categories")? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| LedgerError::CorruptRecord(format!("categories: {}", e))),
            None => Ok(DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()),
        }
    }

    async fn set_categories(&self, categories: &[String]) -> Result<()> {
        let raw = serde_json::to_string(categories)
            .map_err(|e| LedgerError::Validation(format!("categories: {}", e)))?;
        self.put_setting("categories", &raw)
    }
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Bank and CSV statement ingestion.
//!
//! Two layouts are understood. A bank export is recognised from its header
//! (a date, an amount and a description column, in any order). Anything
//! else is read as the fixed layout
//! `date,type,label,note,amount,category[,account_id]`, which is also what
//! `export transactions` writes.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::LedgerConfig;
use crate::error::Result;
use crate::ledger::accounts::AccountBook;
use crate::models::{Account, AccountKind, Transaction, TransactionKind};
use crate::store::{LedgerStore, TransactionFilter};

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%d/%m/%Y", "%-d/%-m/%Y", "%d.%m.%Y", "%m/%d/%Y", "%d-%m-%Y",
];

const DATE_TOKENS: &[&str] = &[
    "date",
    "bookingdate",
    "valuedate",
    "transactiondate",
    "dateoperation",
    "datevaleur",
];
const AMOUNT_TOKENS: &[&str] = &["amount", "montant", "value"];
const CREDIT_DEBIT_TOKENS: &[&str] = &[
    "creditdebit",
    "debitcredit",
    "credit/debit",
    "debit/credit",
    "dc",
    "sens",
];
// "libelle" alone is left out: it heads the fixed layout.
const DESCRIPTION_TOKENS: &[&str] = &[
    "description",
    "label",
    "details",
    "narrative",
    "payee",
    "libelleoperation",
    "wording",
];
const KIND_TOKENS: &[&str] = &["type", "typeoperation", "kind"];
const CATEGORY_TOKENS: &[&str] = &["category", "categorie"];
const ACCOUNT_TOKENS: &[&str] = &["account", "accountid", "compte"];
const NOTE_TOKENS: &[&str] = &["note", "memo", "reference"];

const FIXED_HEADER_WORDS: &[&str] = &["date", "type", "libelle", "label", "montant", "amount"];

static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+$").expect("static regex"));
static CENTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,2}$").expect("static regex"));

/// Column positions of a recognised bank export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankColumns {
    pub date: usize,
    pub amount: usize,
    pub description: usize,
    pub credit_debit: Option<usize>,
    pub kind: Option<usize>,
    pub category: Option<usize>,
    pub account: Option<usize>,
    pub note: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementLayout {
    Bank(BankColumns),
    Fixed,
}

/// One parsed row, before account resolution and deduplication.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementRow {
    pub line: usize,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub label: String,
    pub note: String,
    pub amount: Decimal,
    pub category: String,
    /// Account reference as written in the source; may be a foreign id.
    pub account_ref: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStatement {
    pub layout: StatementLayout,
    pub delimiter: u8,
    pub rows: Vec<StatementRow>,
    pub errors: Vec<String>,
}

/// Result of an import.
///
/// `errors` holds one message per rejected row, followed by the duplicate
/// summary line when duplicates were skipped. `error_count` counts rejected
/// rows only.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    pub imported: Vec<Transaction>,
    pub duplicates: usize,
    pub errors: Vec<String>,
    pub error_count: usize,
}

impl ImportReport {
    fn failed(message: String) -> Self {
        Self {
            errors: vec![message],
            error_count: 1,
            ..Self::default()
        }
    }

    pub fn error_sample(&self, limit: usize) -> &[String] {
        &self.errors[..self.errors.len().min(limit)]
    }
}

fn first_line(text: &str) -> &str {
    text.split(['\r', '\n'])
        .find(|l| !l.trim().is_empty())
        .unwrap_or("")
}

fn field_count(line: &str, delimiter: u8) -> usize {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(line.as_bytes());
    rdr.records()
        .next()
        .and_then(|r| r.ok())
        .map(|r| r.len())
        .unwrap_or(0)
}

/// `;` wins only with strictly more fields than `,` and more than three.
pub fn detect_delimiter(text: &str) -> u8 {
    let line = first_line(text);
    let commas = field_count(line, b',');
    let semicolons = field_count(line, b';');
    if semicolons > commas && semicolons > 3 {
        b';'
    } else {
        b','
    }
}

/// Lowercases a header token and drops spaces, `_`, `-` and French accents.
pub fn normalize_header(token: &str) -> String {
    token
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .map(|c| match c {
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'à' | 'â' => 'a',
            'ç' => 'c',
            'ô' => 'o',
            'î' | 'ï' => 'i',
            'û' | 'ù' => 'u',
            other => other,
        })
        .collect()
}

fn find_column(tokens: &[String], names: &[&str]) -> Option<usize> {
    tokens.iter().position(|t| names.contains(&t.as_str()))
}

pub fn detect_layout(header: &StringRecord) -> StatementLayout {
    let tokens: Vec<String> = header.iter().map(normalize_header).collect();
    let date = find_column(&tokens, DATE_TOKENS);
    let amount = find_column(&tokens, AMOUNT_TOKENS);
    let description = find_column(&tokens, DESCRIPTION_TOKENS);
    match (date, amount, description) {
        (Some(date), Some(amount), Some(description)) => StatementLayout::Bank(BankColumns {
            date,
            amount,
            description,
            credit_debit: find_column(&tokens, CREDIT_DEBIT_TOKENS),
            kind: find_column(&tokens, KIND_TOKENS),
            category: find_column(&tokens, CATEGORY_TOKENS),
            account: find_column(&tokens, ACCOUNT_TOKENS),
            note: find_column(&tokens, NOTE_TOKENS),
        }),
        _ => StatementLayout::Fixed,
    }
}

/// First matching format wins.
pub fn parse_date_flexible(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Accepts `1 234,56`, `1234.56`, `-45,5` and non-breaking spaces.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}' && *c != '\u{202f}')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<Decimal>().ok()
}

fn fixed_kind(raw: &str) -> Option<TransactionKind> {
    match raw.trim().to_uppercase().as_str() {
        "RECETTE" | "REVENU" | "INCOME" | "R" => Some(TransactionKind::Income),
        "DEPENSE" | "DÉPENSE" | "EXPENSE" | "D" | "CHARGE" => Some(TransactionKind::Expense),
        _ => None,
    }
}

fn credit_debit_kind(raw: &str) -> Option<TransactionKind> {
    let upper = raw.trim().to_uppercase();
    if upper.is_empty() {
        return None;
    }
    if upper.contains("CREDIT") || upper == "C" || upper == "CR" {
        Some(TransactionKind::Income)
    } else {
        Some(TransactionKind::Expense)
    }
}

fn looks_like_fixed_header(fields: &[String]) -> bool {
    let Some(first) = fields.first() else {
        return false;
    };
    if parse_date_flexible(first).is_some() {
        return false;
    }
    let line = fields.join(",").to_lowercase();
    FIXED_HEADER_WORDS.iter().any(|w| line.contains(w))
}

/// Rejoins an unquoted French decimal (`45,50`) that the comma delimiter split
/// in two.
fn rejoin_split_decimal(fields: &mut Vec<String>) {
    let split_suspected = match fields.len() {
        8 => true,
        7 => !INTEGER.is_match(&fields[6]),
        _ => false,
    };
    if split_suspected && INTEGER.is_match(&fields[4]) && CENTS.is_match(&fields[5]) {
        let cents = fields.remove(5);
        fields[4] = format!("{},{}", fields[4], cents);
    }
}

fn or_default(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.trim().to_string()
    }
}

fn parse_fixed_row(
    mut fields: Vec<String>,
    delimiter: u8,
    config: &LedgerConfig,
) -> std::result::Result<StatementRow, String> {
    if delimiter == b',' {
        rejoin_split_decimal(&mut fields);
    }
    if fields.len() < 6 {
        return Err(format!(
            "expected at least 6 columns (date, type, label, note, amount, category), found {}",
            fields.len()
        ));
    }
    let date = parse_date_flexible(&fields[0])
        .ok_or_else(|| format!("invalid date '{}'", fields[0]))?;
    let kind = fixed_kind(&fields[1])
        .ok_or_else(|| format!("invalid type '{}' (use RECETTE or DEPENSE)", fields[1]))?;
    let amount = parse_amount(&fields[4])
        .ok_or_else(|| format!("invalid amount '{}'", fields[4]))?
        .abs();
    if amount.is_zero() {
        return Err("amount must be non-zero".into());
    }
    if fields[2].trim().is_empty() {
        return Err("label cannot be empty".into());
    }
    let account_ref = fields
        .get(6)
        .map(|s| s.trim())
        .filter(|s| s.parse::<i64>().is_ok())
        .map(str::to_string)
        .unwrap_or_else(|| config.default_account_ref.clone());
    Ok(StatementRow {
        line: 0,
        date,
        kind,
        label: fields[2].trim().to_string(),
        note: fields[3].trim().to_string(),
        amount,
        category: or_default(&fields[5], &config.default_category),
        account_ref,
    })
}

fn parse_bank_row(
    fields: &[String],
    cols: &BankColumns,
    config: &LedgerConfig,
) -> std::result::Result<StatementRow, String> {
    let get = |idx: Option<usize>| idx.and_then(|i| fields.get(i)).map(String::as_str);
    let raw_date = get(Some(cols.date)).unwrap_or("");
    let date = parse_date_flexible(raw_date).ok_or_else(|| format!("invalid date '{}'", raw_date))?;
    let raw_amount = get(Some(cols.amount)).unwrap_or("");
    let signed =
        parse_amount(raw_amount).ok_or_else(|| format!("invalid amount '{}'", raw_amount))?;
    let amount = signed.abs();
    if amount.is_zero() {
        return Err("amount must be non-zero".into());
    }
    // An explicit RECETTE/DEPENSE type beats the credit/debit column and the sign.
    let kind = get(cols.kind)
        .and_then(fixed_kind)
        .or_else(|| get(cols.credit_debit).and_then(credit_debit_kind))
        .unwrap_or_else(|| TransactionKind::from_signed_amount(signed));
    Ok(StatementRow {
        line: 0,
        date,
        kind,
        label: or_default(get(Some(cols.description)).unwrap_or(""), &config.placeholder_label),
        note: get(cols.note).unwrap_or("").trim().to_string(),
        amount,
        category: or_default(get(cols.category).unwrap_or(""), &config.default_category),
        account_ref: or_default(get(cols.account).unwrap_or(""), &config.default_account_ref),
    })
}

/// Parses a statement without touching the ledger. Bad rows become
/// `"Line N: ..."` messages; parsing always runs to the end.
pub fn parse_statement(text: &str, config: &LedgerConfig) -> ParsedStatement {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let delimiter = detect_delimiter(text);
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut layout = None;
    let mut rows = Vec::new();
    let mut errors = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                errors.push(format!("Line {}: {}", idx + 1, e));
                continue;
            }
        };
        let line = record.position().map(|p| p.line() as usize).unwrap_or(idx + 1);
        let fields: Vec<String> = record.iter().map(str::to_string).collect();
        if fields.iter().all(|f| f.is_empty()) {
            continue;
        }
        let current = match layout {
            Some(l) => l,
            None => {
                let detected = detect_layout(&record);
                layout = Some(detected);
                match detected {
                    StatementLayout::Bank(_) => continue,
                    StatementLayout::Fixed if looks_like_fixed_header(&fields) => continue,
                    StatementLayout::Fixed => detected,
                }
            }
        };
        let parsed = match &current {
            StatementLayout::Bank(cols) => parse_bank_row(&fields, cols, config),
            StatementLayout::Fixed => parse_fixed_row(fields, delimiter, config),
        };
        match parsed {
            Ok(row) => rows.push(StatementRow { line, ..row }),
            Err(msg) => errors.push(format!("Line {}: {}", line, msg)),
        }
    }
    let layout = layout.unwrap_or(StatementLayout::Fixed);
    debug!(?layout, rows = rows.len(), errors = errors.len(), "statement parsed");
    ParsedStatement {
        layout,
        delimiter,
        rows,
        errors,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DedupKey {
    date: NaiveDate,
    amount: Decimal,
    label: String,
    account_id: i64,
}

impl DedupKey {
    fn of(tx: &Transaction) -> Self {
        Self {
            date: tx.date,
            amount: tx.amount.normalize(),
            label: tx.label.clone(),
            account_id: tx.account_id,
        }
    }
}

pub fn placeholder_account_name(reference: &str) -> String {
    format!("Imported account {}", reference)
}

pub struct StatementImporter<'a, S> {
    store: &'a S,
    config: &'a LedgerConfig,
}

impl<'a, S: LedgerStore> StatementImporter<'a, S> {
    pub fn new(store: &'a S, config: &'a LedgerConfig) -> Self {
        Self { store, config }
    }

    /// Reads and imports a file. A read failure yields an empty report with
    /// a single error entry.
    pub async fn import_file(&self, path: &Path) -> Result<ImportReport> {
        match std::fs::read(path) {
            Ok(bytes) => self.import(&String::from_utf8_lossy(&bytes)).await,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "statement unreadable");
                Ok(ImportReport::failed(format!(
                    "Could not read {}: {}",
                    path.display(),
                    e
                )))
            }
        }
    }

    /// Parses `text`, skips rows already in the ledger (or earlier in the same
    /// batch) and inserts the rest.
    pub async fn import(&self, text: &str) -> Result<ImportReport> {
        let parsed = parse_statement(text, self.config);
        let mut report = ImportReport {
            errors: parsed.errors,
            ..ImportReport::default()
        };

        let existing = self.store.transactions(&TransactionFilter::all()).await?;
        let mut seen: HashSet<DedupKey> = existing.iter().map(DedupKey::of).collect();
        let mut accounts: HashMap<String, std::result::Result<i64, String>> = HashMap::new();

        for row in parsed.rows {
            let account_id = match accounts.get(&row.account_ref) {
                Some(resolved) => resolved.clone(),
                None => {
                    let resolved = self.resolve_account(&row.account_ref).await?;
                    accounts.insert(row.account_ref.clone(), resolved.clone());
                    resolved
                }
            };
            let account_id = match account_id {
                Ok(id) => id,
                Err(msg) => {
                    report.errors.push(format!("Line {}: {}", row.line, msg));
                    continue;
                }
            };

            let tx = Transaction::new(
                row.kind,
                row.date,
                row.label,
                row.amount,
                row.category,
                account_id,
            )
            .with_note(row.note);
            let key = DedupKey::of(&tx);
            if seen.contains(&key) {
                report.duplicates += 1;
                continue;
            }
            match self.store.insert_transaction(&tx).await {
                Ok(id) => {
                    seen.insert(key);
                    report.imported.push(Transaction { id, ..tx });
                }
                Err(e) => report.errors.push(format!("Line {}: {}", row.line, e)),
            }
        }

        report.error_count = report.errors.len();
        if report.duplicates > 0 {
            report.errors.push(format!(
                "{} transaction(s) skipped as duplicates",
                report.duplicates
            ));
        }
        info!(
            imported = report.imported.len(),
            duplicates = report.duplicates,
            errors = report.error_count,
            "statement imported"
        );
        Ok(report)
    }

    /// Maps a source reference to a local account id. Unknown references get
    /// a placeholder account, reused on later imports. The inner `Err` carries
    /// the reason rows of that reference are rejected.
    async fn resolve_account(&self, reference: &str) -> Result<std::result::Result<i64, String>> {
        if let Ok(id) = reference.parse::<i64>() {
            if self.store.account(id).await?.is_some() {
                return Ok(Ok(id));
            }
        }
        let name = placeholder_account_name(reference);
        if let Some(existing) = self
            .store
            .accounts()
            .await?
            .into_iter()
            .find(|a| a.name == name)
        {
            return Ok(Ok(existing.id));
        }
        let placeholder = Account::new(name, AccountKind::Bank, Decimal::ZERO);
        match AccountBook::new(self.store).create(&placeholder).await {
            Ok(created) => {
                info!(account_id = created.id, reference, "placeholder account created");
                Ok(Ok(created.id))
            }
            Err(e) => {
                warn!(reference, error = %e, "placeholder account not created");
                Ok(Err(format!("account '{}' unavailable: {}", reference, e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn semicolon_needs_strictly_more_than_three_fields() {
        assert_eq!(detect_delimiter("a;b;c;d\n1;2;3;4"), b';');
        assert_eq!(detect_delimiter("a;b;c\n"), b',');
        assert_eq!(detect_delimiter("a,b,c,d;e;f"), b',');
    }

    #[test]
    fn dates_try_formats_in_order() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        assert_eq!(parse_date_flexible("2024-02-15"), Some(expected));
        assert_eq!(parse_date_flexible("15/02/2024"), Some(expected));
        assert_eq!(parse_date_flexible("15.02.2024"), Some(expected));
        assert_eq!(parse_date_flexible("02/15/2024"), Some(expected));
        assert_eq!(parse_date_flexible("15-02-2024"), Some(expected));
        assert_eq!(
            parse_date_flexible("03/04/2024"),
            NaiveDate::from_ymd_opt(2024, 4, 3)
        );
        assert_eq!(parse_date_flexible("2024/02/15"), None);
    }

    #[test]
    fn amounts_accept_french_notation() {
        assert_eq!(parse_amount("1 234,56"), Some(d("1234.56")));
        assert_eq!(parse_amount("1\u{a0}000,5"), Some(d("1000.5")));
        assert_eq!(parse_amount("-45.50"), Some(d("-45.50")));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(" "), None);
    }

    #[test]
    fn own_export_header_reads_as_fixed_layout() {
        let header = StringRecord::from(vec![
            "date", "type", "libelle", "objet", "montant", "categorie", "accountId",
        ]);
        assert_eq!(detect_layout(&header), StatementLayout::Fixed);
        let bank = StringRecord::from(vec!["Booking Date", "Libellé Opération", "Montant", "Sens"]);
        match detect_layout(&bank) {
            StatementLayout::Bank(cols) => {
                assert_eq!(cols.date, 0);
                assert_eq!(cols.description, 1);
                assert_eq!(cols.amount, 2);
                assert_eq!(cols.credit_debit, Some(3));
            }
            other => panic!("unexpected layout {:?}", other),
        }
    }

    #[test]
    fn split_french_decimal_is_rejoined() {
        let config = LedgerConfig::default();
        let parsed = parse_statement(
            "15/02/2024,DEPENSE,Fournitures,Papier,45,50,Fournitures,1",
            &config,
        );
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        let row = &parsed.rows[0];
        assert_eq!(row.amount, d("45.50"));
        assert_eq!(row.kind, TransactionKind::Expense);
        assert_eq!(row.label, "Fournitures");
        assert_eq!(row.account_ref, "1");

        let parsed = parse_statement("15/02/2024,RECETTE,Vente,,12,5,Ventes", &config);
        assert_eq!(parsed.rows[0].amount, d("12.5"));
        assert_eq!(parsed.rows[0].account_ref, "1");
    }

    #[test]
    fn bad_rows_are_reported_not_fatal() {
        let config = LedgerConfig::default();
        let text = "date,type,libelle,objet,montant,categorie,accountId\r\n\
                    2024-13-01,DEPENSE,X,,10,Divers,1\r\n\
                    2024-02-01,VIREMENT,X,,10,Divers,1\r\n\
                    2024-02-01,DEPENSE,,,10,Divers,1\r\n\
                    2024-02-01,DEPENSE,X,,0,Divers,1\r\n\
                    2024-02-01,DEPENSE,X\r\n\
                    2024-02-02,RECETTE,Ok,,10.00,,\r\n";
        let parsed = parse_statement(text, &config);
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.errors.len(), 5);
        assert!(parsed.errors[0].starts_with("Line 2:"));
        assert_eq!(parsed.rows[0].category, "Uncategorized");
        assert_eq!(parsed.rows[0].line, 7);
    }

    #[test]
    fn bank_rows_use_credit_debit_then_sign() {
        let config = LedgerConfig::default();
        let text = "Date;Description;Amount;Credit/Debit;Account\n\
                    01/03/2024;Client payment;1 200,00;CREDIT;FR76-001\n\
                    02/03/2024;Card;-35,20;;FR76-001\n\
                    03/03/2024;;10,00;DEBIT;FR76-001\n";
        let parsed = parse_statement(text, &config);
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        assert_eq!(parsed.delimiter, b';');
        assert_eq!(parsed.rows[0].kind, TransactionKind::Income);
        assert_eq!(parsed.rows[0].amount, d("1200.00"));
        assert_eq!(parsed.rows[1].kind, TransactionKind::Expense);
        assert_eq!(parsed.rows[1].amount, d("35.20"));
        assert_eq!(parsed.rows[2].label, "Imported transaction");
        assert_eq!(parsed.rows[2].kind, TransactionKind::Expense);
        assert_eq!(parsed.rows[2].account_ref, "FR76-001");
    }

    #[test]
    fn english_header_with_type_column_keeps_expense_sign() {
        let config = LedgerConfig::default();
        let text = "date,type,label,note,amount,category,account_id\n\
                    15/02/2024,DEPENSE,Paper,,45.50,Fournitures,1\n\
                    16/02/2024,RECETTE,Invoice,,-10,Ventes,1\n\
                    17/02/2024,CARTE,Card,,-3.20,,1\n";
        let parsed = parse_statement(text, &config);
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        match &parsed.layout {
            StatementLayout::Bank(cols) => assert_eq!(cols.kind, Some(1)),
            other => panic!("unexpected layout {:?}", other),
        }
        assert_eq!(parsed.rows[0].kind, TransactionKind::Expense);
        assert_eq!(parsed.rows[0].amount, d("45.50"));
        assert_eq!(parsed.rows[0].note, "");
        assert_eq!(parsed.rows[0].account_ref, "1");
        assert_eq!(parsed.rows[1].kind, TransactionKind::Income);
        assert_eq!(parsed.rows[1].amount, d("10"));
        // Unknown type values fall back to the sign.
        assert_eq!(parsed.rows[2].kind, TransactionKind::Expense);
    }
}

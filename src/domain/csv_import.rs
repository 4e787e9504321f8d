//! CSV trade ingestion: column-name resolution and row normalization.
//!
//! Import is best-effort by contract: the column mapping is resolved once per
//! document, then each data row either normalizes into a [`TradeInput`] or is
//! dropped. A bad row never fails the batch.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;

use super::error::JournalError;
use super::trade::{Direction, TradeInput};

/// Canonical trade fields that source columns are resolved onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Symbol,
    EntryTime,
    ExitTime,
    EntryPrice,
    ExitPrice,
    Size,
    Fees,
    Strategy,
    Notes,
    Direction,
}

const FIELD_COUNT: usize = 10;

/// Accepted source column names per canonical field, in priority order.
/// Resolution scans aliases exact-case first, then case-insensitively; the
/// first listed alias that matches wins. New aliases are additive here.
const COLUMN_ALIASES: &[(Field, &[&str])] = &[
    (Field::Symbol, &["symbol", "ticker", "instrument"]),
    (
        Field::EntryTime,
        &["entry_time", "open_time", "entry_date", "time_in"],
    ),
    (
        Field::ExitTime,
        &["exit_time", "close_time", "exit_date", "time_out"],
    ),
    (
        Field::EntryPrice,
        &["entry_price", "open_price", "buy_price", "price_in"],
    ),
    (
        Field::ExitPrice,
        &["exit_price", "close_price", "sell_price", "price_out"],
    ),
    (Field::Size, &["size", "quantity", "qty", "volume"]),
    (Field::Fees, &["fees", "commission"]),
    (Field::Strategy, &["strategy", "tag"]),
    (Field::Notes, &["notes", "comment"]),
    (Field::Direction, &["direction", "side", "type", "order_side"]),
];

/// Canonical field -> source column index, valid for one parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ColumnMapping([Option<usize>; FIELD_COUNT]);

impl ColumnMapping {
    fn get(&self, field: Field) -> Option<usize> {
        self.0[field as usize]
    }
}

fn resolve_columns(headers: &StringRecord) -> ColumnMapping {
    let mut mapping = [None; FIELD_COUNT];
    for (field, aliases) in COLUMN_ALIASES {
        mapping[*field as usize] = find_column(headers, aliases);
    }
    ColumnMapping(mapping)
}

fn find_column(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    for alias in aliases {
        if let Some(idx) = headers.iter().position(|h| h == *alias) {
            return Some(idx);
        }
    }
    for alias in aliases {
        if let Some(idx) = headers.iter().position(|h| h.eq_ignore_ascii_case(alias)) {
            return Some(idx);
        }
    }
    None
}

/// Why a single row was dropped. Not surfaced to callers today; the import
/// contract returns only the rows that normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowSkip {
    MissingPrice,
    BadNumber,
    BadTimestamp,
}

/// Parse a CSV document (first row = headers) into trade inputs.
///
/// Rows that fail normalization are dropped without diagnostics; the result
/// preserves the relative order of the surviving rows and may be empty.
/// Only a malformed document as a whole (unreadable header, broken quoting)
/// is an error.
pub fn parse_trades(content: &[u8]) -> Result<Vec<TradeInput>, JournalError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(content);
    let headers = rdr
        .headers()
        .map_err(|e| JournalError::CsvParse {
            reason: e.to_string(),
        })?
        .clone();
    let mapping = resolve_columns(&headers);

    let mut trades = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| JournalError::CsvParse {
            reason: e.to_string(),
        })?;
        if let Ok(trade) = normalize_row(&record, &mapping) {
            trades.push(trade);
        }
    }

    Ok(trades)
}

fn normalize_row(record: &StringRecord, mapping: &ColumnMapping) -> Result<TradeInput, RowSkip> {
    let entry_price = required_f64(record, mapping.get(Field::EntryPrice))?;
    let exit_price = required_f64(record, mapping.get(Field::ExitPrice))?;
    let size = optional_f64(record, mapping.get(Field::Size))?.unwrap_or(1.0);
    let fees = optional_f64(record, mapping.get(Field::Fees))?.unwrap_or(0.0);

    let symbol = cell(record, mapping.get(Field::Symbol))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "UNKNOWN".to_string());
    let strategy = optional_string(record, mapping.get(Field::Strategy));
    let notes = optional_string(record, mapping.get(Field::Notes));

    let entry_time = optional_timestamp(record, mapping.get(Field::EntryTime))?;
    let exit_time = optional_timestamp(record, mapping.get(Field::ExitTime))?;

    let direction = match cell(record, mapping.get(Field::Direction)) {
        Some(value) => Direction::from_cell(value),
        None => Direction::Buy,
    };

    Ok(TradeInput {
        symbol,
        entry_price,
        exit_price,
        size,
        direction,
        fees,
        strategy,
        notes,
        entry_time,
        exit_time,
    })
}

/// The cell for a mapped column, if the column resolved and the row is long
/// enough to contain it.
fn cell<'r>(record: &'r StringRecord, idx: Option<usize>) -> Option<&'r str> {
    idx.and_then(|i| record.get(i))
}

fn required_f64(record: &StringRecord, idx: Option<usize>) -> Result<f64, RowSkip> {
    let value = cell(record, idx).ok_or(RowSkip::MissingPrice)?;
    value.trim().parse().map_err(|_| RowSkip::BadNumber)
}

fn optional_f64(record: &StringRecord, idx: Option<usize>) -> Result<Option<f64>, RowSkip> {
    match cell(record, idx) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| RowSkip::BadNumber),
        None => Ok(None),
    }
}

fn optional_string(record: &StringRecord, idx: Option<usize>) -> Option<String> {
    cell(record, idx)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn optional_timestamp(
    record: &StringRecord,
    idx: Option<usize>,
) -> Result<Option<NaiveDateTime>, RowSkip> {
    match cell(record, idx).map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => parse_timestamp(value).map(Some).ok_or(RowSkip::BadTimestamp),
        None => Ok(None),
    }
}

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Accepts the common textual timestamp forms seen in broker exports.
/// Date-only values become midnight.
fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date.and_hms_opt(0, 0, 0).unwrap());
        }
    }
    None
}

//! Broker export parsing. Exports arrive as comma- or tab-delimited text
//! with an arbitrary preamble above the real header row; parsing is
//! row-partial — a bad row is logged and skipped, never aborting the
//! batch.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{symbol, ImportError};
use crate::analytics::metrics;
use crate::models::{CreateTradeInput, OptionType};

/// Column names that identify the header row.
const HEADER_MARKERS: [&str; 3] = ["Symbol", "Basis/Share", "Proceeds/Share"];

/// Minimum column count for a data row to be considered at all.
const MIN_COLUMNS: usize = 8;

const SYMBOL_COL: usize = 0;
const BASIS_COL: usize = 1;
const PROCEEDS_COL: usize = 2;
const QUANTITY_COL: usize = 7;

/// A parsed trade awaiting upload. Execution times are synthesized on
/// the caller-selected trade date because the export does not carry fill
/// times in a usable column.
// TODO: read actual fill times once the broker export includes them per row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeCandidate {
    pub id: String,
    pub ticker: String,
    pub option_type: OptionType,
    pub quantity: i32,
    pub strike_price: f64,
    pub entry_price: f64,
    pub exit_price: f64,
    pub entry_time: NaiveDateTime,
    pub exit_time: NaiveDateTime,
    pub expiration_date: NaiveDate,
    pub trade_date: NaiveDate,
    pub pnl: f64,
}

impl TradeCandidate {
    pub fn to_create_input(&self) -> CreateTradeInput {
        CreateTradeInput {
            ticker: self.ticker.clone(),
            option_type: self.option_type,
            quantity: self.quantity,
            strike_price: self.strike_price,
            entry_price: self.entry_price,
            exit_price: Some(self.exit_price),
            entry_time: self.entry_time,
            exit_time: Some(self.exit_time),
            expiration_date: self.expiration_date,
            trade_date: self.trade_date,
            pnl: Some(self.pnl),
            entry_reason: "Imported from broker export".to_string(),
            exit_reason: String::new(),
            playbook_id: None,
        }
    }
}

/// Result of parsing one export: candidates in file order plus what fell out.
#[derive(Debug, Default)]
pub struct ImportBatch {
    pub candidates: Vec<TradeCandidate>,
    /// Non-option and under-width rows, skipped silently.
    pub skipped: usize,
    /// Option rows that failed to parse, one message per row.
    pub row_errors: Vec<String>,
}

/// Parse the full text of a broker export. Every candidate is assigned
/// the given trade date; the header row is located by its marker column
/// names and everything above it is ignored.
pub fn parse_trades_export(
    content: &str,
    trade_date: NaiveDate,
) -> Result<ImportBatch, ImportError> {
    let lines: Vec<&str> = content.lines().collect();

    let header_idx = lines
        .iter()
        .position(|line| HEADER_MARKERS.iter().all(|marker| line.contains(marker)))
        .ok_or(ImportError::HeaderNotFound)?;

    let delimiter = if lines[header_idx].contains('\t') {
        b'\t'
    } else {
        b','
    };

    let body = lines[header_idx + 1..].join("\n");
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut batch = ImportBatch::default();

    for (row_num, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                log::warn!("skipping unreadable row {}: {}", row_num + 1, e);
                batch.row_errors.push(format!("row {}: {}", row_num + 1, e));
                continue;
            }
        };

        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let first = record.get(SYMBOL_COL).unwrap_or("").trim();
        if first.starts_with("TOTALS") {
            continue;
        }

        if record.len() < MIN_COLUMNS {
            batch.skipped += 1;
            continue;
        }

        if !symbol::is_option_symbol(first) {
            batch.skipped += 1;
            continue;
        }

        match parse_row(first, &record, trade_date) {
            Ok(candidate) => batch.candidates.push(candidate),
            Err(e) => {
                log::warn!("skipping row {}: {}", row_num + 1, e);
                batch.row_errors.push(format!("row {}: {}", row_num + 1, e));
            }
        }
    }

    log::info!(
        "parsed export: {} candidates, {} skipped, {} row errors",
        batch.candidates.len(),
        batch.skipped,
        batch.row_errors.len()
    );

    Ok(batch)
}

/// Read an export file from disk and parse it.
pub fn parse_trades_export_file(
    path: impl AsRef<Path>,
    trade_date: NaiveDate,
) -> Result<ImportBatch, ImportError> {
    let content = std::fs::read_to_string(path)?;
    parse_trades_export(&content, trade_date)
}

fn parse_row(
    raw_symbol: &str,
    record: &csv::StringRecord,
    trade_date: NaiveDate,
) -> Result<TradeCandidate, ImportError> {
    let parsed = symbol::parse_option_symbol(raw_symbol)?;

    let entry_price = parse_money(record.get(BASIS_COL).unwrap_or(""))?;
    let exit_price = parse_money(record.get(PROCEEDS_COL).unwrap_or(""))?;
    let quantity = parse_money(record.get(QUANTITY_COL).unwrap_or(""))?.round() as i32;

    let pnl = metrics::options_pnl(entry_price, exit_price, quantity, 0.0);

    // Placeholder fill times on the selected trade date (see type docs).
    let entry_time = trade_date.and_hms_opt(9, 30, 0).unwrap();
    let exit_time = trade_date.and_hms_opt(10, 0, 0).unwrap();

    let suffix = uuid::Uuid::new_v4()
        .to_string()
        .split('-')
        .next()
        .unwrap_or_default()
        .to_string();

    Ok(TradeCandidate {
        id: format!("IMPORT-{}-{}", Utc::now().timestamp_millis(), suffix),
        ticker: parsed.ticker,
        option_type: parsed.option_type,
        quantity,
        strike_price: parsed.strike_price,
        entry_price,
        exit_price,
        entry_time,
        exit_time,
        expiration_date: parsed.expiration_date,
        trade_date,
        pnl,
    })
}

/// Parse a currency-ish field: `$`, thousands separators and surrounding
/// quotes are dropped, `(12.34)` reads as negative.
fn parse_money(field: &str) -> Result<f64, ImportError> {
    let trimmed = field.trim().trim_matches('"').trim();
    let (negative, inner) = match trimmed.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, trimmed),
    };

    let cleaned: String = inner
        .chars()
        .filter(|c| !matches!(c, '$' | ','))
        .collect();

    let value: f64 = cleaned
        .trim()
        .parse()
        .map_err(|_| ImportError::Row(format!("invalid numeric field: {:?}", field)))?;

    Ok(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
Account Statement for ****1234
Options Trades

Symbol,Basis/Share,Proceeds/Share,Cost Basis,Proceeds,Gain/Loss,Term,Qty
-SPY250703C618,2.50,3.00,500.00,600.00,100.00,Short,2
-QQQ250711P480,\"1,200.00\",\"1,150.00\",1200.00,1150.00,(50.00),Short,1
CASH,0.00,0.00,0.00,0.00,0.00,Short,0
-SPY250703C618,abc,3.00,0.00,0.00,0.00,Short,1
short,row
TOTALS,,,1700.00,1750.00,50.00,,
";

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 3).unwrap()
    }

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn parses_valid_rows_and_skips_the_rest() {
        init_logs();
        let batch = parse_trades_export(SAMPLE, date()).unwrap();

        assert_eq!(batch.candidates.len(), 2);
        // CASH (non-option) + short row
        assert_eq!(batch.skipped, 2);
        // the abc basis row
        assert_eq!(batch.row_errors.len(), 1);

        let spy = &batch.candidates[0];
        assert_eq!(spy.ticker, "SPY");
        assert_eq!(spy.quantity, 2);
        assert_eq!(spy.pnl, 100.0);
        assert_eq!(spy.trade_date, date());
        assert_eq!(spy.entry_time, date().and_hms_opt(9, 30, 0).unwrap());
        assert_eq!(spy.exit_time, date().and_hms_opt(10, 0, 0).unwrap());

        // quoted thousands separators
        let qqq = &batch.candidates[1];
        assert_eq!(qqq.entry_price, 1200.0);
        assert_eq!(qqq.exit_price, 1150.0);
        assert_eq!(qqq.pnl, -5000.0);
    }

    #[test]
    fn one_bad_row_never_sinks_the_batch() {
        init_logs();
        let content = "\
Symbol,Basis/Share,Proceeds/Share,a,b,c,d,Qty
-SPY250703C618,2.50,3.00,,,,,1
-SPY259999C618,2.50,3.00,,,,,1
-QQQ250711P480,1.00,1.20,,,,,1
";
        let batch = parse_trades_export(content, date()).unwrap();
        assert_eq!(batch.candidates.len(), 2);
        assert_eq!(batch.row_errors.len(), 1);
    }

    #[test]
    fn missing_header_is_an_error() {
        let err = parse_trades_export("just,some,random,text\n1,2,3,4\n", date()).unwrap_err();
        assert!(matches!(err, ImportError::HeaderNotFound));
    }

    #[test]
    fn tab_delimited_exports_parse_too() {
        let content =
            "Symbol\tBasis/Share\tProceeds/Share\ta\tb\tc\td\tQty\n-SPY250703C618\t2.50\t3.00\t\t\t\t\t2\n";
        let batch = parse_trades_export(content, date()).unwrap();
        assert_eq!(batch.candidates.len(), 1);
        assert_eq!(batch.candidates[0].pnl, 100.0);
    }

    #[test]
    fn money_parsing_conventions() {
        assert_eq!(parse_money("$1,234.50").unwrap(), 1234.5);
        assert_eq!(parse_money("(50.00)").unwrap(), -50.0);
        assert_eq!(parse_money(" 2 ").unwrap(), 2.0);
        assert!(parse_money("n/a").is_err());
    }

    #[test]
    fn reads_export_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let batch = parse_trades_export_file(file.path(), date()).unwrap();
        assert_eq!(batch.candidates.len(), 2);
    }

    #[test]
    fn candidate_converts_to_create_input() {
        let batch = parse_trades_export(SAMPLE, date()).unwrap();
        let input = batch.candidates[0].to_create_input();
        assert_eq!(input.ticker, "SPY");
        assert_eq!(input.pnl, Some(100.0));
        assert_eq!(input.exit_time, Some(date().and_hms_opt(10, 0, 0).unwrap()));
    }
}

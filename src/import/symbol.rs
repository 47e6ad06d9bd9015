//! Broker option-symbol decoding.
//!
//! Export rows carry tickers like `-SPY250703C618`: an optional leading
//! sign marker, the underlying, a 6-digit YYMMDD expiration, `C`/`P`,
//! and the strike digits. Full OCC-style symbols pad the strike to eight
//! digits in thousandths (`SPY250703C00618000`); shorter exports print
//! whole dollars.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use super::ImportError;
use crate::models::OptionType;

/// Strike field width that marks the OCC thousandths encoding.
const OCC_STRIKE_DIGITS: usize = 8;

fn symbol_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Z]+)(\d{6})([CP])(\d+)$").expect("hardcoded symbol pattern")
    })
}

/// Structured fields decoded from a broker option symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSymbol {
    pub ticker: String,
    pub option_type: OptionType,
    pub strike_price: f64,
    /// Date-only value; no timezone adjustment is applied.
    pub expiration_date: NaiveDate,
}

/// Whether a raw field looks like an option ticker at all. Rows failing
/// this shape check are equity or cash lines and are skipped silently.
pub fn is_option_symbol(raw: &str) -> bool {
    symbol_re().is_match(strip_marker(raw))
}

fn strip_marker(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed.strip_prefix('-').unwrap_or(trimmed)
}

/// Decode a broker option symbol into its structured fields.
pub fn parse_option_symbol(raw: &str) -> Result<ParsedSymbol, ImportError> {
    let symbol = strip_marker(raw);
    let caps = symbol_re()
        .captures(symbol)
        .ok_or_else(|| ImportError::Format {
            symbol: raw.trim().to_string(),
        })?;

    let ticker = caps[1].to_string();
    let date_digits = &caps[2];
    let option_type = if &caps[3] == "C" {
        OptionType::Calls
    } else {
        OptionType::Puts
    };
    let strike_digits = &caps[4];

    // YYMMDD with a 2000-based year; the regex guarantees six digits.
    let year = 2000 + digits(&date_digits[0..2], raw)? as i32;
    let month = digits(&date_digits[2..4], raw)?;
    let day = digits(&date_digits[4..6], raw)?;
    let expiration_date =
        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| ImportError::Format {
            symbol: raw.trim().to_string(),
        })?;

    let strike_value: f64 = strike_digits.parse().map_err(|_| ImportError::Format {
        symbol: raw.trim().to_string(),
    })?;
    let strike_price = if strike_digits.len() == OCC_STRIKE_DIGITS {
        strike_value / 1000.0
    } else {
        strike_value
    };

    Ok(ParsedSymbol {
        ticker,
        option_type,
        strike_price,
        expiration_date,
    })
}

fn digits(slice: &str, raw: &str) -> Result<u32, ImportError> {
    slice.parse().map_err(|_| ImportError::Format {
        symbol: raw.trim().to_string(),
    })
}

pub mod importer;
pub mod symbol;
pub mod upload;

pub use importer::{parse_trades_export, parse_trades_export_file, ImportBatch, TradeCandidate};
pub use symbol::{is_option_symbol, parse_option_symbol, ParsedSymbol};
pub use upload::{upload_candidates, UploadProgress, UploadReport};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Unrecognized option symbol: {symbol}")]
    Format { symbol: String },

    #[error("No header row containing Symbol, Basis/Share and Proceeds/Share columns")]
    HeaderNotFound,

    #[error("Malformed row: {0}")]
    Row(String),

    #[error("Failed to read export file: {0}")]
    Io(#[from] std::io::Error),
}

//! Analytics core for a single-user options-trading journal.
//!
//! The backend owns persistence and routing; this crate covers the parts
//! with actual logic: decoding broker option symbols, row-partial CSV
//! import with sequential batch upload, pure trade metrics (P&L,
//! drawdown, Sharpe, streaks, session classification), the dashboard
//! view-model aggregator, an endpoint-keyed query cache, and debounced
//! auto-save for premarket notes.

pub mod analytics;
pub mod api;
pub mod import;
pub mod models;
pub mod notes;

pub use analytics::{build_dashboard, DashboardAnalytics};
pub use api::{ApiError, CachedJournal, HttpJournalClient, JournalApi, QueryCache};
pub use import::{
    parse_option_symbol, parse_trades_export, upload_candidates, ImportBatch, ImportError,
    TradeCandidate, UploadReport,
};
pub use models::{OptionType, TimeOfDay, Trade};
pub use notes::{NoteAutoSaver, NoteSink, PremarketNoteSink};

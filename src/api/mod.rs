pub mod cache;
pub mod client;
pub mod error;

pub use cache::{CachedJournal, QueryCache};
pub use client::{HttpJournalClient, JournalApi};
pub use error::ApiError;

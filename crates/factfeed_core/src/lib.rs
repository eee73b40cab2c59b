//! Core engine of the fact feed.
//! Keeps the client-visible fact view consistent with the persisted store
//! under filtering, submission and voting.

pub mod config;
pub mod db;
pub mod feed;
pub mod gateway;
pub mod logging;
pub mod model;

pub use config::{ConfigError, FeedConfig};
pub use feed::controller::{
    FeedController, FeedError, FeedState, FetchOutcome, FetchTicket, SubmitTicket, VoteOutcome,
    VoteTicket,
};
pub use feed::observer::{FeedEvent, FeedNotice, FeedObserver, NoticeKind, SubscriptionId};
pub use feed::store::FactStore;
pub use gateway::sqlite::SqliteFactGateway;
pub use gateway::{FactGateway, FactQuery, StoreError, StoreResult, FEED_PAGE_SIZE};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::category::{
    find_category, is_valid_category, list_categories, Category, CategoryFilter, ALL_CATEGORIES,
};
pub use model::fact::{Fact, FactId, NewFact, VoteField};
pub use model::submission::{
    is_valid_http_url, remaining_chars, FactDraft, FactValidationError, MAX_TEXT_CHARS,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

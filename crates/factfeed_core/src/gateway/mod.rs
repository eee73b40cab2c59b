//! Persistence gateway contract.
//!
//! # Responsibility
//! - Define the three store operations the feed consumes.
//! - Keep transport and storage details behind one trait.
//!
//! # Invariants
//! - Gateways are stateless request/response; they never cache facts.
//! - `increment_vote` writes `current_value + 1` without compare-and-swap,
//!   so concurrent voters on the same field can lose an increment.

use crate::db::DbError;
use crate::model::category::CategoryFilter;
use crate::model::fact::{Fact, FactId, NewFact, VoteField};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod sqlite;

/// Fixed page size of the feed.
pub const FEED_PAGE_SIZE: u32 = 50;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by a persistence gateway.
#[derive(Debug)]
pub enum StoreError {
    /// Local database failure.
    Db(DbError),
    /// Update target does not exist in the store.
    NotFound(FactId),
    /// Persisted or returned data violates the fact model.
    InvalidData(String),
    /// Remote store unreachable or refused the request.
    Unavailable(String),
}

impl StoreError {
    /// Stable short code for logs and notices.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Db(_) => "store_db_error",
            Self::NotFound(_) => "store_not_found",
            Self::InvalidData(_) => "store_invalid_data",
            Self::Unavailable(_) => "store_unavailable",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "fact not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid fact data: {message}"),
            Self::Unavailable(message) => write!(f, "store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Filtered page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactQuery {
    /// Exact category constraint; `None` means every category.
    pub category: Option<String>,
    pub limit: u32,
    /// Order by `created_at` descending when set.
    pub newest_first: bool,
}

impl FactQuery {
    /// Builds the feed page query for `filter`: newest first, fixed page
    /// size.
    pub fn page(filter: CategoryFilter) -> Self {
        Self {
            category: filter.category_name().map(str::to_string),
            limit: FEED_PAGE_SIZE,
            newest_first: true,
        }
    }
}

/// Store operations consumed by the feed controller.
pub trait FactGateway {
    /// Returns up to `query.limit` facts matching the query.
    fn fetch_facts(&self, query: &FactQuery) -> StoreResult<Vec<Fact>>;
    /// Persists a new fact; the store assigns id, timestamp and zero votes.
    fn insert_fact(&self, fact: &NewFact) -> StoreResult<Fact>;
    /// Sets `field` to `current_value + 1` and returns the updated record.
    fn increment_vote(
        &self,
        fact_id: FactId,
        field: VoteField,
        current_value: u32,
    ) -> StoreResult<Fact>;
}

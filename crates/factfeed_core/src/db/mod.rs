//! SQLite storage bootstrap for the fact gateway.
//!
//! # Responsibility
//! - Open and configure SQLite connections backing `SqliteFactGateway`.
//! - Bring the `facts` table up to `migrations::FACTS_SCHEMA_VERSION`.
//!
//! # Invariants
//! - The facts schema version lives in `PRAGMA user_version`.
//! - No fact is read or written before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or migrating the facts database.
#[derive(Debug)]
pub enum DbError {
    /// Driver-level failure.
    Sqlite(rusqlite::Error),
    /// The file was written by a build with a newer facts schema
    /// (`found` > `supported`); opening it could drop vote columns.
    SchemaTooNew { found: u32, supported: u32 },
}

impl DbError {
    /// Stable short code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "db_sqlite_error",
            Self::SchemaTooNew { .. } => "db_schema_too_new",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "facts database is at schema v{found}; this build reads up to v{supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

//! SQLite bootstrap for the multi-user document store.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections for itinerary storage.
//! - Apply schema migrations before any itinerary row is touched.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - A database written by a newer binary is refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure opening or migrating the itinerary database.
///
/// Repositories wrap this in `RepoError::Db`; callers see it as a storage failure.
#[derive(Debug)]
pub enum DbError {
    /// Driver error from connect, pragma setup, a migration batch or a row query.
    Sqlite(rusqlite::Error),
    /// The file was migrated by a newer build; its itinerary rows are left untouched.
    UnsupportedSchemaVersion {
        /// `PRAGMA user_version` found in the file.
        db_version: u32,
        /// Newest migration bundled with this build.
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "itinerary database error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "itinerary database schema {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

//! Itinerary persistence contract shared by every storage backend.
//!
//! # Responsibility
//! - Define the `list/get/put/delete` contract consumed by services.
//! - Define the storage error taxonomy (quota, access, corruption, not-found).
//!
//! # Invariants
//! - `put` validates the record before any write.
//! - Every call is an independent request; nothing spans calls.
//! - `NotFound` is reported separately from transport or corruption failures.

use crate::codec::CodecError;
use crate::db::DbError;
use crate::model::itinerary::Itinerary;
use crate::validation::ValidationErrors;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type RepoResult<T> = Result<T, RepoError>;

/// Identifier of the user a record belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerKey(String);

impl OwnerKey {
    /// Owner used by single-user deployments.
    pub const LOCAL: &'static str = "local";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn local() -> Self {
        Self::new(Self::LOCAL)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for OwnerKey {
    fn default() -> Self {
        Self::local()
    }
}

impl Display for OwnerKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage failure for itinerary persistence.
#[derive(Debug)]
pub enum RepoError {
    /// Record rejected by business rules before writing.
    Validation(ValidationErrors),
    /// Id is unknown or owned by someone else.
    NotFound(String),
    /// Write would exceed the store's total size ceiling.
    QuotaExceeded { size: u64, limit: u64 },
    /// Backing file cannot be read or written with current permissions.
    AccessDenied(PathBuf),
    /// Stored data was unreadable and has been discarded.
    Corrupted(String),
    /// Persisted row failed to decode.
    InvalidData(String),
    Io { path: PathBuf, source: std::io::Error },
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "itinerary not found: {id}"),
            Self::QuotaExceeded { size, limit } => write!(
                f,
                "storage limit exceeded: {size} bytes (max {limit} bytes); delete old itineraries"
            ),
            Self::AccessDenied(path) => {
                write!(f, "storage access denied: `{}`", path.display())
            }
            Self::Corrupted(message) => {
                write!(f, "stored itineraries were corrupted and have been cleared: {message}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted itinerary: {message}"),
            Self::Io { path, source } => {
                write!(f, "storage I/O failed for `{}`: {source}", path.display())
            }
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for RepoError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<CodecError> for RepoError {
    fn from(value: CodecError) -> Self {
        Self::InvalidData(value.to_string())
    }
}

/// Persistence adapter for itinerary records.
///
/// All calls are synchronous; every backend reports through `RepoResult`.
pub trait ItineraryRepository {
    /// Lists the owner's itineraries in creation order.
    fn list(&self, owner: &OwnerKey) -> RepoResult<Vec<Itinerary>>;
    /// Gets one itinerary; `None` when absent or owned by someone else.
    fn get(&self, id: &str, owner: &OwnerKey) -> RepoResult<Option<Itinerary>>;
    /// Inserts or replaces an itinerary by id.
    fn put(&self, itinerary: &Itinerary, owner: &OwnerKey) -> RepoResult<()>;
    /// Deletes an itinerary; `NotFound` when absent or owned by someone else.
    fn delete(&self, id: &str, owner: &OwnerKey) -> RepoResult<()>;
}

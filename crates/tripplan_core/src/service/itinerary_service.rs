//! Itinerary use-case service.
//!
//! # Responsibility
//! - Orchestrate validation, persistence and derived views for callers.
//! - Own record lifecycle rules (fresh ids, timestamps, import collisions).
//!
//! # Invariants
//! - Nothing reaches the repository without passing validation.
//! - A failed call leaves stored state unchanged.
//! - The service stays storage-agnostic.

use crate::codec::{
    decode_document, encode_document, export_file_name, import_bytes, read_import_file,
    write_export_file, CodecError,
};
use crate::model::ids::new_itinerary_id;
use crate::model::itinerary::{Itinerary, ItineraryDraft};
use crate::repo::itinerary_repo::{ItineraryRepository, OwnerKey, RepoError};
use crate::validation::{DateRange, ValidationErrors};
use crate::view::timeline::ItinerarySummary;
use chrono::{DateTime, NaiveDate, Utc};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure surfaced by [`ItineraryService`].
#[derive(Debug)]
pub enum ServiceError {
    /// Input broke one or more business rules.
    Validation(ValidationErrors),
    /// Import/export document or file was rejected.
    Format(CodecError),
    /// Backend failed to read or write.
    Storage(RepoError),
    /// Id is unknown for this owner.
    NotFound(String),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(errors) => write!(f, "{errors}"),
            Self::Format(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "itinerary not found: {id}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::Format(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl From<CodecError> for ServiceError {
    fn from(value: CodecError) -> Self {
        Self::Format(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(errors) => Self::Validation(errors),
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Storage(other),
        }
    }
}

/// Export payload handed to a download or save dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub file_name: String,
    pub contents: String,
}

/// Use-case service over any itinerary repository.
pub struct ItineraryService<R: ItineraryRepository> {
    repo: R,
    clock: fn() -> DateTime<Utc>,
}

impl<R: ItineraryRepository> ItineraryService<R> {
    /// Creates a service stamping records with the system clock.
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, Utc::now)
    }

    /// Creates a service with an explicit clock.
    pub fn with_clock(repo: R, clock: fn() -> DateTime<Utc>) -> Self {
        Self { repo, clock }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Validates a draft and persists it as a new record.
    pub fn create(&self, draft: ItineraryDraft, owner: &OwnerKey) -> ServiceResult<Itinerary> {
        let range = validate_logged(&draft)?;
        let itinerary = Itinerary::create(draft, range, (self.clock)());
        self.repo.put(&itinerary, owner)?;
        info!(
            "event=itinerary_create module=service status=ok items={}",
            itinerary.items.len()
        );
        Ok(itinerary)
    }

    /// Replaces editable fields of an existing record.
    ///
    /// # Contract
    /// - `id` and `created_at` are preserved.
    /// - `updated_at` is refreshed.
    pub fn update(
        &self,
        id: &str,
        draft: ItineraryDraft,
        owner: &OwnerKey,
    ) -> ServiceResult<Itinerary> {
        let mut itinerary = self.get(id, owner)?;
        let range = validate_logged(&draft)?;
        itinerary.apply_draft(draft, range, (self.clock)());
        self.repo.put(&itinerary, owner)?;
        info!(
            "event=itinerary_update module=service status=ok items={}",
            itinerary.items.len()
        );
        Ok(itinerary)
    }

    pub fn delete(&self, id: &str, owner: &OwnerKey) -> ServiceResult<()> {
        self.repo.delete(id, owner)?;
        info!("event=itinerary_delete module=service status=ok");
        Ok(())
    }

    /// Gets one record; `NotFound` when absent for this owner.
    pub fn get(&self, id: &str, owner: &OwnerKey) -> ServiceResult<Itinerary> {
        self.repo
            .get(id, owner)?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    pub fn list(&self, owner: &OwnerKey) -> ServiceResult<Vec<Itinerary>> {
        Ok(self.repo.list(owner)?)
    }

    /// List-card projections in storage order.
    pub fn summaries(&self, owner: &OwnerKey) -> ServiceResult<Vec<ItinerarySummary>> {
        Ok(self.list(owner)?.iter().map(ItinerarySummary::of).collect())
    }

    /// Renders the export document and its file name for `today`.
    pub fn export(
        &self,
        id: &str,
        today: NaiveDate,
        owner: &OwnerKey,
    ) -> ServiceResult<ExportedDocument> {
        let itinerary = self.get(id, owner)?;
        Ok(ExportedDocument {
            file_name: export_file_name(&itinerary.title, today),
            contents: encode_document(&itinerary)?,
        })
    }

    /// Writes the export document into `dir`; returns the written path.
    pub fn export_to_dir(
        &self,
        id: &str,
        dir: &Path,
        today: NaiveDate,
        owner: &OwnerKey,
    ) -> ServiceResult<PathBuf> {
        let itinerary = self.get(id, owner)?;
        Ok(write_export_file(&itinerary, dir, today)?)
    }

    /// Imports a document from text.
    pub fn import_str(&self, text: &str, owner: &OwnerKey) -> ServiceResult<Itinerary> {
        let itinerary = decode_document(text)?;
        self.store_imported(itinerary, owner)
    }

    /// Imports uploaded file contents, applying file constraints first.
    pub fn import_bytes(
        &self,
        file_name: &str,
        bytes: &[u8],
        owner: &OwnerKey,
    ) -> ServiceResult<Itinerary> {
        let itinerary = import_bytes(file_name, bytes)?;
        self.store_imported(itinerary, owner)
    }

    /// Imports a document file from disk, applying file constraints first.
    pub fn import_file(&self, path: &Path, owner: &OwnerKey) -> ServiceResult<Itinerary> {
        let itinerary = read_import_file(path)?;
        self.store_imported(itinerary, owner)
    }

    // Colliding ids get a fresh id so an import never overwrites an existing record.
    fn store_imported(
        &self,
        mut itinerary: Itinerary,
        owner: &OwnerKey,
    ) -> ServiceResult<Itinerary> {
        if self.repo.get(&itinerary.id, owner)?.is_some() {
            itinerary.id = new_itinerary_id();
            info!("event=itinerary_import module=service status=reassigned_id");
        }
        match self.repo.put(&itinerary, owner) {
            // Id is held by another owner.
            Err(RepoError::NotFound(_)) => {
                itinerary.id = new_itinerary_id();
                self.repo.put(&itinerary, owner)?;
            }
            other => other?,
        }
        info!(
            "event=itinerary_import module=service status=ok items={}",
            itinerary.items.len()
        );
        Ok(itinerary)
    }
}

fn validate_logged(draft: &ItineraryDraft) -> Result<DateRange, ValidationErrors> {
    draft.validate().inspect_err(|errors| {
        info!(
            "event=itinerary_validate module=service status=rejected fields={}",
            errors.fields().join(",")
        );
    })
}

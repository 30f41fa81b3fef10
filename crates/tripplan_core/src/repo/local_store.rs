//! Single-file JSON itinerary store for local, single-user deployments.
//!
//! # Responsibility
//! - Keep every itinerary document in one JSON array file.
//! - Enforce a total serialized size ceiling on writes.
//!
//! # Invariants
//! - The owner key is not enforced; the file belongs to one user.
//! - Unreadable contents are removed and reported as `Corrupted`, never kept.
//!   A record that parses but breaks a business rule is kept and listed.
//! - Writes go to a sibling temp file first and are renamed into place.

use crate::codec::decode_stored_value;
use crate::model::itinerary::Itinerary;
use crate::repo::itinerary_repo::{ItineraryRepository, OwnerKey, RepoError, RepoResult};
use log::{debug, info, warn};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Default ceiling for the serialized store: 4 MiB.
pub const DEFAULT_LOCAL_QUOTA_BYTES: u64 = 4 * 1024 * 1024;

/// JSON-file-backed itinerary store.
#[derive(Debug, Clone)]
pub struct LocalJsonStore {
    path: PathBuf,
    quota_bytes: u64,
}

impl LocalJsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_quota(path, DEFAULT_LOCAL_QUOTA_BYTES)
    }

    pub fn with_quota(path: impl Into<PathBuf>, quota_bytes: u64) -> Self {
        Self {
            path: path.into(),
            quota_bytes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn quota_bytes(&self) -> u64 {
        self.quota_bytes
    }

    /// Removes the backing file. Missing files are not an error.
    pub fn clear(&self) -> RepoResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error(err)),
        }
    }

    fn load(&self) -> RepoResult<Vec<Itinerary>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(self.io_error(err)),
        };

        let Ok(text) = String::from_utf8(bytes) else {
            return Err(self.discard("stored data is not UTF-8 text"));
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let entries = match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(entries)) => entries,
            Ok(_) => return Err(self.discard("stored data is not a list")),
            Err(err) => return Err(self.discard(&format!("stored data is not valid JSON: {err}"))),
        };

        let mut itineraries = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            match decode_stored_value(entry) {
                Ok(itinerary) => itineraries.push(itinerary),
                Err(err) => return Err(self.discard(&format!("record {index}: {err}"))),
            }
        }
        Ok(itineraries)
    }

    fn save(&self, itineraries: &[Itinerary]) -> RepoResult<()> {
        let data = serde_json::to_string(itineraries)
            .map_err(|err| RepoError::InvalidData(format!("failed to encode store: {err}")))?;
        let size = data.len() as u64;
        if size > self.quota_bytes {
            warn!(
                "event=local_store_save module=repo status=quota_exceeded size={size} limit={}",
                self.quota_bytes
            );
            return Err(RepoError::QuotaExceeded {
                size,
                limit: self.quota_bytes,
            });
        }

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }
        let staging = self.path.with_extension("json.tmp");
        std::fs::write(&staging, data.as_bytes()).map_err(|err| self.io_error(err))?;
        std::fs::rename(&staging, &self.path).map_err(|err| self.io_error(err))?;

        debug!(
            "event=local_store_save module=repo status=ok records={} size={size}",
            itineraries.len()
        );
        Ok(())
    }

    fn discard(&self, reason: &str) -> RepoError {
        warn!("event=local_store_corrupted module=repo status=discarded");
        if let Err(err) = std::fs::remove_file(&self.path) {
            warn!("event=local_store_corrupted module=repo status=discard_failed error={err}");
        }
        RepoError::Corrupted(reason.to_string())
    }

    fn io_error(&self, source: std::io::Error) -> RepoError {
        if source.kind() == ErrorKind::PermissionDenied {
            return RepoError::AccessDenied(self.path.clone());
        }
        RepoError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ItineraryRepository for LocalJsonStore {
    fn list(&self, _owner: &OwnerKey) -> RepoResult<Vec<Itinerary>> {
        self.load()
    }

    fn get(&self, id: &str, _owner: &OwnerKey) -> RepoResult<Option<Itinerary>> {
        Ok(self.load()?.into_iter().find(|itinerary| itinerary.id == id))
    }

    fn put(&self, itinerary: &Itinerary, _owner: &OwnerKey) -> RepoResult<()> {
        itinerary.validate()?;

        let mut itineraries = self.load()?;
        match itineraries.iter_mut().find(|stored| stored.id == itinerary.id) {
            Some(stored) => *stored = itinerary.clone(),
            None => itineraries.push(itinerary.clone()),
        }
        self.save(&itineraries)?;
        info!(
            "event=itinerary_put module=repo backend=local status=ok items={}",
            itinerary.items.len()
        );
        Ok(())
    }

    fn delete(&self, id: &str, _owner: &OwnerKey) -> RepoResult<()> {
        let mut itineraries = self.load()?;
        let Some(index) = itineraries.iter().position(|stored| stored.id == id) else {
            return Err(RepoError::NotFound(id.to_string()));
        };
        itineraries.remove(index);
        self.save(&itineraries)?;
        info!("event=itinerary_delete module=repo backend=local status=ok");
        Ok(())
    }
}

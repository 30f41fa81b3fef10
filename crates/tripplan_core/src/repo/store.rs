//! Backend selection behind one repository type.

use crate::config::StorageConfig;
use crate::model::itinerary::Itinerary;
use crate::repo::itinerary_repo::{ItineraryRepository, OwnerKey, RepoResult};
use crate::repo::local_store::LocalJsonStore;
use crate::repo::sqlite_store::SqliteItineraryRepository;
use log::info;

/// Repository chosen from [`StorageConfig`] at startup.
pub enum ItineraryStore {
    Local(LocalJsonStore),
    Sqlite(SqliteItineraryRepository),
}

impl ItineraryStore {
    /// Opens the configured backend. SQLite databases are created and migrated on open.
    pub fn open(config: &StorageConfig) -> RepoResult<Self> {
        let store = match config {
            StorageConfig::Local { path, quota_bytes } => {
                Self::Local(LocalJsonStore::with_quota(path.clone(), *quota_bytes))
            }
            StorageConfig::Sqlite { path } => Self::Sqlite(SqliteItineraryRepository::open(path)?),
        };
        info!(
            "event=store_open module=repo status=ok backend={}",
            store.backend_name()
        );
        Ok(store)
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Local(_) => "local",
            Self::Sqlite(_) => "sqlite",
        }
    }

    fn backend(&self) -> &dyn ItineraryRepository {
        match self {
            Self::Local(store) => store,
            Self::Sqlite(store) => store,
        }
    }
}

impl ItineraryRepository for ItineraryStore {
    fn list(&self, owner: &OwnerKey) -> RepoResult<Vec<Itinerary>> {
        self.backend().list(owner)
    }

    fn get(&self, id: &str, owner: &OwnerKey) -> RepoResult<Option<Itinerary>> {
        self.backend().get(id, owner)
    }

    fn put(&self, itinerary: &Itinerary, owner: &OwnerKey) -> RepoResult<()> {
        self.backend().put(itinerary, owner)
    }

    fn delete(&self, id: &str, owner: &OwnerKey) -> RepoResult<()> {
        self.backend().delete(id, owner)
    }
}

#[cfg(test)]
mod tests {
    use super::ItineraryStore;
    use crate::config::StorageConfig;
    use crate::repo::itinerary_repo::{ItineraryRepository, OwnerKey};

    #[test]
    fn opens_each_configured_backend() {
        let dir = tempfile::tempdir().unwrap();

        let local = ItineraryStore::open(&StorageConfig::Local {
            path: dir.path().join("trips.json"),
            quota_bytes: 1024,
        })
        .unwrap();
        assert_eq!(local.backend_name(), "local");
        assert!(local.list(&OwnerKey::local()).unwrap().is_empty());

        let sqlite = ItineraryStore::open(&StorageConfig::Sqlite {
            path: dir.path().join("trips.sqlite3"),
        })
        .unwrap();
        assert_eq!(sqlite.backend_name(), "sqlite");
        assert!(sqlite.list(&OwnerKey::new("alice")).unwrap().is_empty());
        assert!(dir.path().join("trips.sqlite3").exists());
    }
}

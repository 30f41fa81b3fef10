//! SQLite document store for multi-user deployments.
//!
//! # Responsibility
//! - Persist one JSON document per itinerary together with its owner key.
//! - Scope every read and write to the requesting owner.
//!
//! # Invariants
//! - Rows owned by another key are invisible: `get` returns `None`, `put` and
//!   `delete` report `NotFound`.
//! - Read paths reject undecodable documents instead of masking them; business
//!   rules are enforced on write only.
//! - Lists are ordered by `created_at ASC, id ASC`.

use crate::codec::{decode_stored_value, encode_compact};
use crate::db::{open_db, open_db_in_memory};
use crate::model::itinerary::{Itinerary, DATE_FORMAT};
use crate::repo::itinerary_repo::{ItineraryRepository, OwnerKey, RepoError, RepoResult};
use chrono::{DateTime, SecondsFormat, Utc};
use log::info;
use rusqlite::{params, Connection};
use std::path::Path;

/// SQLite-backed itinerary repository owning its connection.
pub struct SqliteItineraryRepository {
    conn: Connection,
}

impl SqliteItineraryRepository {
    /// Wraps a connection returned by [`crate::db::open_db`].
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> RepoResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl ItineraryRepository for SqliteItineraryRepository {
    fn list(&self, owner: &OwnerKey) -> RepoResult<Vec<Itinerary>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, document
             FROM itineraries
             WHERE owner_key = ?1
             ORDER BY created_at ASC, id ASC;",
        )?;
        let mut rows = stmt.query(params![owner.as_str()])?;
        let mut itineraries = Vec::new();
        while let Some(row) = rows.next()? {
            let id: String = row.get("id")?;
            let document: String = row.get("document")?;
            itineraries.push(parse_document(&id, &document)?);
        }
        Ok(itineraries)
    }

    fn get(&self, id: &str, owner: &OwnerKey) -> RepoResult<Option<Itinerary>> {
        let mut stmt = self.conn.prepare(
            "SELECT document
             FROM itineraries
             WHERE id = ?1
               AND owner_key = ?2;",
        )?;
        let mut rows = stmt.query(params![id, owner.as_str()])?;
        match rows.next()? {
            Some(row) => {
                let document: String = row.get("document")?;
                Ok(Some(parse_document(id, &document)?))
            }
            None => Ok(None),
        }
    }

    fn put(&self, itinerary: &Itinerary, owner: &OwnerKey) -> RepoResult<()> {
        itinerary.validate()?;
        let document = encode_compact(itinerary)?;

        let changed = self.conn.execute(
            "INSERT INTO itineraries (
                id,
                owner_key,
                title,
                start_date,
                end_date,
                document,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                start_date = excluded.start_date,
                end_date = excluded.end_date,
                document = excluded.document,
                updated_at = excluded.updated_at
            WHERE itineraries.owner_key = excluded.owner_key;",
            params![
                itinerary.id.as_str(),
                owner.as_str(),
                itinerary.title.as_str(),
                itinerary.start_date.format(DATE_FORMAT).to_string(),
                itinerary.end_date.format(DATE_FORMAT).to_string(),
                document,
                timestamp_column(&itinerary.created_at),
                timestamp_column(&itinerary.updated_at),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(itinerary.id.clone()));
        }
        info!(
            "event=itinerary_put module=repo backend=sqlite status=ok items={}",
            itinerary.items.len()
        );
        Ok(())
    }

    fn delete(&self, id: &str, owner: &OwnerKey) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM itineraries WHERE id = ?1 AND owner_key = ?2;",
            params![id, owner.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        info!("event=itinerary_delete module=repo backend=sqlite status=ok");
        Ok(())
    }
}

fn parse_document(id: &str, document: &str) -> RepoResult<Itinerary> {
    serde_json::from_str(document)
        .map_err(|err| err.to_string())
        .and_then(|value| decode_stored_value(value).map_err(|err| err.to_string()))
        .map_err(|message| RepoError::InvalidData(format!("itinerary `{id}`: {message}")))
}

// Fixed-width so the column sorts the same way the timestamps do.
fn timestamp_column(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

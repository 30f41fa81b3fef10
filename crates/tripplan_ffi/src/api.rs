//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level itinerary functions to Dart via FRB.
//! - Translate core errors into flat response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Documents cross the boundary as JSON text in the export layout.
//! - Every call opens the configured store; nothing is cached between calls.

use chrono::Local;
use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use tripplan_core::codec::encode_document;
use tripplan_core::model::itinerary::{Itinerary, DATE_FORMAT};
use tripplan_core::repo::local_store::DEFAULT_LOCAL_QUOTA_BYTES;
use tripplan_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CoreConfig, ItineraryDraft, ItineraryService, ItineraryStore, ItinerarySummary, OwnerKey,
    ServiceError, StorageConfig,
};

const CONFIG_ENV_VAR: &str = "TRIPPLAN_CONFIG";
const FALLBACK_STORE_FILE_NAME: &str = "tripplan_itineraries.json";

static CONFIGURED_STORE: Mutex<Option<StorageConfig>> = Mutex::new(None);
static ENV_STORE: OnceLock<Result<StorageConfig, String>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Selects the storage backend from a TOML config document.
///
/// Only the `[storage]` table is used; logging is configured by [`init_logging`].
///
/// # FFI contract
/// - Opens the store once to surface path or migration problems early.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_store(config_toml: String) -> String {
    let config = match CoreConfig::from_toml_str(&config_toml) {
        Ok(config) => config,
        Err(err) => return err.to_string(),
    };
    if let Err(err) = ItineraryStore::open(&config.storage) {
        return format!("configure_store failed: {err}");
    }
    match CONFIGURED_STORE.lock() {
        Ok(mut slot) => {
            *slot = Some(config.storage);
            String::new()
        }
        Err(_) => "configure_store failed: store config lock poisoned".to_string(),
    }
}

/// List-card projection for one itinerary.
#[derive(Debug, Clone, PartialEq)]
pub struct ItineraryListItem {
    pub id: String,
    pub title: String,
    /// `YYYY-MM-DD`.
    pub start_date: String,
    /// `YYYY-MM-DD`.
    pub end_date: String,
    /// Inclusive trip length.
    pub days: i64,
    pub item_count: u32,
    pub total_amount: f64,
}

/// Response envelope for [`itinerary_list`].
#[derive(Debug, Clone, PartialEq)]
pub struct ItineraryListResponse {
    pub ok: bool,
    pub items: Vec<ItineraryListItem>,
    pub message: String,
}

/// One rejected field, keyed the same way the edit form is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItineraryFieldError {
    pub field: String,
    pub message: String,
}

/// Generic action response envelope for itinerary commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItineraryActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Affected itinerary ID on success.
    pub itinerary_id: Option<String>,
    /// Stored document (export layout) on success, when the call returns one.
    pub document: Option<String>,
    /// Field-keyed rule violations; empty unless validation failed.
    pub field_errors: Vec<ItineraryFieldError>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ItineraryActionResponse {
    fn success(message: impl Into<String>, itinerary_id: String, document: Option<String>) -> Self {
        Self {
            ok: true,
            itinerary_id: Some(itinerary_id),
            document,
            field_errors: Vec::new(),
            message: message.into(),
        }
    }

    fn failure(operation: &str, err: ServiceError) -> Self {
        warn!("event=ffi_call module=ffi op={operation} status=error");
        let field_errors = match &err {
            ServiceError::Validation(errors) => errors
                .iter()
                .map(|error| ItineraryFieldError {
                    field: error.field.clone(),
                    message: error.message.clone(),
                })
                .collect(),
            _ => Vec::new(),
        };
        Self {
            ok: false,
            itinerary_id: None,
            document: None,
            field_errors,
            message: format!("{operation} failed: {err}"),
        }
    }

    fn setup_failure(operation: &str, message: String) -> Self {
        warn!("event=ffi_call module=ffi op={operation} status=setup_error");
        Self {
            ok: false,
            itinerary_id: None,
            document: None,
            field_errors: Vec::new(),
            message: format!("{operation} failed: {message}"),
        }
    }
}

/// Response envelope for [`itinerary_export`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItineraryExportResponse {
    pub ok: bool,
    /// Suggested download name, `<title>_<YYYYMMDD>.json`.
    pub file_name: String,
    pub contents: String,
    pub message: String,
}

/// Lists the owner's itineraries as list cards.
///
/// `owner_key = None` selects the single-user owner.
#[flutter_rust_bridge::frb(sync)]
pub fn itinerary_list(owner_key: Option<String>) -> ItineraryListResponse {
    let owner = resolve_owner(owner_key);
    match with_service(|service| service.summaries(&owner)) {
        Ok(Ok(summaries)) => {
            let items = summaries
                .into_iter()
                .map(to_list_item)
                .collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No itineraries.".to_string()
            } else {
                format!("Found {} itinerary(ies).", items.len())
            };
            ItineraryListResponse {
                ok: true,
                items,
                message,
            }
        }
        Ok(Err(err)) => list_failure(err.to_string()),
        Err(message) => list_failure(message),
    }
}

/// Returns one stored document.
#[flutter_rust_bridge::frb(sync)]
pub fn itinerary_get(id: String, owner_key: Option<String>) -> ItineraryActionResponse {
    let owner = resolve_owner(owner_key);
    run_action("itinerary_get", |service| {
        let itinerary = service.get(id.trim(), &owner)?;
        let document = encode(&itinerary)?;
        Ok(ItineraryActionResponse::success(
            "Itinerary loaded.",
            itinerary.id,
            Some(document),
        ))
    })
}

/// Creates (`id = None`) or updates an itinerary from a draft JSON object.
///
/// Draft shape: `{ title, startDate, endDate, items, coverImage? }` with dates as
/// raw form strings.
///
/// # FFI contract
/// - Validation failures come back with `field_errors` populated.
/// - Returns the stored document on success.
#[flutter_rust_bridge::frb(sync)]
pub fn itinerary_save(
    id: Option<String>,
    draft_json: String,
    owner_key: Option<String>,
) -> ItineraryActionResponse {
    let draft = match serde_json::from_str::<ItineraryDraft>(&draft_json) {
        Ok(draft) => draft,
        Err(err) => {
            return ItineraryActionResponse::setup_failure(
                "itinerary_save",
                format!("invalid draft: {err}"),
            )
        }
    };
    let owner = resolve_owner(owner_key);
    let id = id.map(|value| value.trim().to_string()).filter(|value| !value.is_empty());
    run_action("itinerary_save", |service| {
        let (itinerary, message) = match id.as_deref() {
            Some(id) => (service.update(id, draft, &owner)?, "Itinerary updated."),
            None => (service.create(draft, &owner)?, "Itinerary saved."),
        };
        let document = encode(&itinerary)?;
        Ok(ItineraryActionResponse::success(
            message,
            itinerary.id,
            Some(document),
        ))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn itinerary_delete(id: String, owner_key: Option<String>) -> ItineraryActionResponse {
    let owner = resolve_owner(owner_key);
    let id = id.trim().to_string();
    run_action("itinerary_delete", |service| {
        service.delete(&id, &owner)?;
        Ok(ItineraryActionResponse::success(
            "Itinerary deleted.",
            id.clone(),
            None,
        ))
    })
}

/// Renders the export document using today's local date for the file name.
#[flutter_rust_bridge::frb(sync)]
pub fn itinerary_export(id: String, owner_key: Option<String>) -> ItineraryExportResponse {
    let owner = resolve_owner(owner_key);
    let today = Local::now().date_naive();
    let result = with_service(|service| service.export(id.trim(), today, &owner));
    let failure = |message: String| {
        warn!("event=ffi_call module=ffi op=itinerary_export status=error");
        ItineraryExportResponse {
            ok: false,
            file_name: String::new(),
            contents: String::new(),
            message: format!("itinerary_export failed: {message}"),
        }
    };
    match result {
        Ok(Ok(exported)) => ItineraryExportResponse {
            ok: true,
            file_name: exported.file_name,
            contents: exported.contents,
            message: "Exported.".to_string(),
        },
        Ok(Err(err)) => failure(err.to_string()),
        Err(message) => failure(message),
    }
}

/// Imports an uploaded file. File constraints apply before decoding.
#[flutter_rust_bridge::frb(sync)]
pub fn itinerary_import(
    file_name: String,
    contents: Vec<u8>,
    owner_key: Option<String>,
) -> ItineraryActionResponse {
    let owner = resolve_owner(owner_key);
    run_action("itinerary_import", |service| {
        let itinerary = service.import_bytes(&file_name, &contents, &owner)?;
        let document = encode(&itinerary)?;
        Ok(ItineraryActionResponse::success(
            "Imported.",
            itinerary.id,
            Some(document),
        ))
    })
}

type Service = ItineraryService<ItineraryStore>;

fn run_action(
    operation: &str,
    f: impl FnOnce(&Service) -> Result<ItineraryActionResponse, ServiceError>,
) -> ItineraryActionResponse {
    match with_service(f) {
        Ok(Ok(response)) => response,
        Ok(Err(err)) => ItineraryActionResponse::failure(operation, err),
        Err(message) => ItineraryActionResponse::setup_failure(operation, message),
    }
}

fn with_service<T>(f: impl FnOnce(&Service) -> T) -> Result<T, String> {
    let storage = resolve_storage_config()?;
    let store =
        ItineraryStore::open(&storage).map_err(|err| format!("store open failed: {err}"))?;
    Ok(f(&ItineraryService::new(store)))
}

fn resolve_storage_config() -> Result<StorageConfig, String> {
    if let Some(configured) = CONFIGURED_STORE
        .lock()
        .map_err(|_| "store config lock poisoned".to_string())?
        .clone()
    {
        return Ok(configured);
    }
    ENV_STORE.get_or_init(load_env_storage_config).clone()
}

fn load_env_storage_config() -> Result<StorageConfig, String> {
    if let Ok(raw) = std::env::var(CONFIG_ENV_VAR) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return CoreConfig::load(&PathBuf::from(trimmed))
                .map(|config| config.storage)
                .map_err(|err| err.to_string());
        }
    }
    Ok(StorageConfig::Local {
        path: std::env::temp_dir().join(FALLBACK_STORE_FILE_NAME),
        quota_bytes: DEFAULT_LOCAL_QUOTA_BYTES,
    })
}

fn resolve_owner(owner_key: Option<String>) -> OwnerKey {
    owner_key
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(OwnerKey::new)
        .unwrap_or_default()
}

fn encode(itinerary: &Itinerary) -> Result<String, ServiceError> {
    Ok(encode_document(itinerary)?)
}

fn to_list_item(summary: ItinerarySummary) -> ItineraryListItem {
    ItineraryListItem {
        id: summary.id,
        title: summary.title,
        start_date: summary.start_date.format(DATE_FORMAT).to_string(),
        end_date: summary.end_date.format(DATE_FORMAT).to_string(),
        days: summary.days,
        item_count: u32::try_from(summary.item_count).unwrap_or(u32::MAX),
        total_amount: summary.total_amount,
    }
}

fn list_failure(message: String) -> ItineraryListResponse {
    warn!("event=ffi_call module=ffi op=itinerary_list status=error");
    ItineraryListResponse {
        ok: false,
        items: Vec::new(),
        message: format!("itinerary_list failed: {message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        configure_store, core_version, init_logging, itinerary_delete, itinerary_export,
        itinerary_get, itinerary_import, itinerary_list, itinerary_save, ping,
    };
    use std::sync::OnceLock;
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEST_STORE_DIR: OnceLock<tempfile::TempDir> = OnceLock::new();

    fn use_test_store() {
        let dir = TEST_STORE_DIR.get_or_init(|| tempfile::tempdir().expect("temp dir"));
        let config = format!(
            "[storage]\nbackend = \"sqlite\"\npath = {:?}\n",
            dir.path().join("ffi.sqlite3").to_string_lossy()
        );
        let error = configure_store(config);
        assert!(error.is_empty(), "{error}");
    }

    fn unique_owner(prefix: &str) -> Option<String> {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        Some(format!("{prefix}-{nanos}"))
    }

    const KYOTO_DRAFT: &str = r#"{
        "title": "Kyoto",
        "startDate": "2024-05-01",
        "endDate": "2024-05-02",
        "items": [
            {"id": "a", "date": "2024-05-01", "time": "", "content": "", "amount": 1000, "note": ""},
            {"id": "b", "date": "2024-05-02", "time": "", "content": "", "amount": 2500, "note": ""}
        ]
    }"#;

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn configure_store_rejects_unknown_backend() {
        let error = configure_store("[storage]\nbackend = \"cloud\"\npath = \"x\"\n".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn save_list_export_delete_flow() {
        use_test_store();
        let owner = unique_owner("flow");

        let saved = itinerary_save(None, KYOTO_DRAFT.to_string(), owner.clone());
        assert!(saved.ok, "{}", saved.message);
        let id = saved.itinerary_id.clone().expect("saved id");

        let listed = itinerary_list(owner.clone());
        assert!(listed.ok, "{}", listed.message);
        assert_eq!(listed.items.len(), 1);
        assert_eq!(listed.items[0].total_amount, 3500.0);
        assert_eq!(listed.items[0].days, 2);

        let exported = itinerary_export(id.clone(), owner.clone());
        assert!(exported.ok, "{}", exported.message);
        assert!(exported.file_name.starts_with("Kyoto_"));

        let imported = itinerary_import(
            exported.file_name.clone(),
            exported.contents.into_bytes(),
            owner.clone(),
        );
        assert!(imported.ok, "{}", imported.message);
        assert_ne!(imported.itinerary_id.as_deref(), Some(id.as_str()));

        let deleted = itinerary_delete(id.clone(), owner.clone());
        assert!(deleted.ok, "{}", deleted.message);
        assert!(!itinerary_get(id, owner).ok);
    }

    #[test]
    fn save_reports_field_errors() {
        use_test_store();
        let draft = r#"{"title": " ", "startDate": "2024-05-10", "endDate": "2024-05-01"}"#;
        let response = itinerary_save(None, draft.to_string(), unique_owner("invalid"));
        assert!(!response.ok);
        let fields: Vec<&str> = response
            .field_errors
            .iter()
            .map(|error| error.field.as_str())
            .collect();
        assert_eq!(fields, vec!["title", "dates"]);
    }

    #[test]
    fn import_rejects_non_json_file_name() {
        use_test_store();
        let response = itinerary_import(
            "trip.csv".to_string(),
            b"{}".to_vec(),
            unique_owner("import"),
        );
        assert!(!response.ok);
        assert!(response.message.contains(".json"));
    }

    #[test]
    fn save_treats_missing_item_amount_as_zero() {
        use_test_store();
        let owner = unique_owner("no-amount");
        let draft = r#"{
            "title": "Nara",
            "startDate": "2024-06-01",
            "endDate": "2024-06-01",
            "items": [{"id": "a", "date": "2024-06-01", "time": "", "content": "Deer park", "note": ""}]
        }"#;
        let saved = itinerary_save(None, draft.to_string(), owner.clone());
        assert!(saved.ok, "{}", saved.message);

        let listed = itinerary_list(owner);
        assert_eq!(listed.items.len(), 1);
        assert_eq!(listed.items[0].total_amount, 0.0);
    }
}

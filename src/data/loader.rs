use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::{Context, Result};
use serde_json::Value as JsonValue;

use super::model::HeritageRecord;
use super::validate::validate_records;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and validate heritage records from a JSON file.
///
/// Expected schema (an array of objects):
///
/// ```json
/// [
///   {
///     "id": "Q1234",
///     "name": "Golconda Fort",
///     "locations": ["Hyderabad, Telangana"],
///     "details": { "Type": "Fort", "Founded": "1143", "Coordinates": "17°23′N 78°24′E" },
///     "images": ["https://..."],
///     "last_edited": "2024-05-01T10:00:00Z"
///   },
///   ...
/// ]
/// ```
///
/// Invalid entries are dropped silently; only unreadable or non-array input
/// is an error.
pub fn load_file(path: &Path) -> Result<Vec<HeritageRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let candidates = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let records = validate_records(candidates);
    log::info!(
        "loaded {} of {} records from {}",
        records.len(),
        candidates.len(),
        path.display()
    );
    Ok(records)
}

// ---------------------------------------------------------------------------
// Cached store
// ---------------------------------------------------------------------------

/// Result of a [`RecordStore::load`]: always a (possibly empty) collection,
/// plus a message for the UI when the file could not be used.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub records: Arc<[HeritageRecord]>,
    pub warning: Option<String>,
}

struct CachedLoad {
    modified: Option<SystemTime>,
    records: Arc<[HeritageRecord]>,
}

/// Process-wide record cache for one data file.
///
/// The file is re-read only when its modification time changes or the cache
/// is invalidated. Failed loads are never cached. Single writer: the UI
/// thread owns the store.
pub struct RecordStore {
    path: PathBuf,
    cached: Option<CachedLoad>,
    /// Last reported failure, so a persistent error is logged once.
    last_error: Option<String>,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: None,
            last_error: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Switch to another data file, dropping the cache.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = path.into();
        self.invalidate();
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
        self.last_error = None;
    }

    #[cfg(test)]
    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }

    pub fn load(&mut self) -> LoadReport {
        let modified = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.modified().ok(),
            Err(e) => {
                self.cached = None;
                let err = anyhow::Error::new(e).context(format!("reading {}", self.path.display()));
                return self.failed(err);
            }
        };

        if let Some(cached) = &self.cached {
            if modified.is_some() && cached.modified == modified {
                return LoadReport {
                    records: Arc::clone(&cached.records),
                    warning: None,
                };
            }
        }

        match load_file(&self.path) {
            Ok(records) => {
                self.last_error = None;
                let records: Arc<[HeritageRecord]> = records.into();
                self.cached = Some(CachedLoad {
                    modified,
                    records: Arc::clone(&records),
                });
                LoadReport {
                    records,
                    warning: None,
                }
            }
            Err(e) => {
                self.cached = None;
                self.failed(e)
            }
        }
    }

    fn failed(&mut self, e: anyhow::Error) -> LoadReport {
        let message = format!("Error loading fort data: {e:#}");
        if self.last_error.as_deref() != Some(message.as_str()) {
            log::error!("{message}");
            self.last_error = Some(message.clone());
        }
        LoadReport {
            records: Arc::from(Vec::new()),
            warning: Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::time::Duration;
    use tempfile::TempDir;

    const ONE_VALID_ONE_INVALID: &str = r#"[
        {"id": 1, "name": "Amber Fort", "locations": ["Somewhere, Rajasthan"],
         "details": {"Type": "Hill fort"}},
        {"id": 2, "locations": ["Somewhere, Rajasthan"], "details": {"Type": "Fort"}}
    ]"#;

    fn write(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).expect("write fixture");
        path
    }

    #[test]
    fn loads_only_valid_records() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "forts.json", ONE_VALID_ONE_INVALID);
        let records = load_file(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].region, "Rajasthan");
        assert_eq!(records[0].name, "Amber Fort");
    }

    #[test]
    fn rejects_non_array_root() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "forts.json", r#"{"id": 1}"#);
        let err = load_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("top-level JSON array"));
    }

    #[test]
    fn missing_file_yields_empty_collection_and_warning() {
        let dir = TempDir::new().unwrap();
        let mut store = RecordStore::new(dir.path().join("absent.json"));
        let report = store.load();
        assert!(report.records.is_empty());
        assert!(report.warning.is_some());
        assert!(!store.is_cached());
    }

    #[test]
    fn malformed_file_yields_empty_collection_and_warning() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "forts.json", "[{not json");
        let mut store = RecordStore::new(path);
        let report = store.load();
        assert!(report.records.is_empty());
        assert!(report.warning.unwrap().contains("parsing JSON"));
    }

    #[test]
    fn repeated_loads_share_the_cached_collection() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "forts.json", ONE_VALID_ONE_INVALID);
        let mut store = RecordStore::new(path);
        let first = store.load();
        let second = store.load();
        assert!(Arc::ptr_eq(&first.records, &second.records));
    }

    #[test]
    fn modification_time_change_reloads() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "forts.json", ONE_VALID_ONE_INVALID);
        let mut store = RecordStore::new(&path);
        assert_eq!(store.load().records.len(), 1);

        fs::write(&path, "[]").unwrap();
        let later = SystemTime::now() + Duration::from_secs(60);
        File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(later)
            .unwrap();

        assert!(store.load().records.is_empty());
    }

    #[test]
    fn set_path_invalidates() {
        let dir = TempDir::new().unwrap();
        let first = write(&dir, "a.json", ONE_VALID_ONE_INVALID);
        let second = write(&dir, "b.json", "[]");
        let mut store = RecordStore::new(first);
        store.load();
        assert!(store.is_cached());
        store.set_path(second);
        assert!(!store.is_cached());
        assert!(store.load().records.is_empty());
    }
}

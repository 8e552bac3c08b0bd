//! File-backed persistence under the data directory (`~/.cgo/` by default).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::quota::{QuotaState, QuotaStore};
use crate::session::SessionSnapshot;

const SESSION_FILE: &str = "session.json";
const QUOTA_FILE: &str = "quota.json";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("io: {0}")]
    Io(#[from] io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Resolve the default data directory (~/.cgo/).
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cgo")
}

/// Write `data` to `dir/file_name` through a temp file and a rename, so a
/// reader never sees a truncated file.
pub fn write_atomic(dir: &Path, file_name: &str, data: &str) -> Result<(), StorageError> {
    fs::create_dir_all(dir)?;
    let tmp = dir.join(format!(".{file_name}.tmp"));
    fs::write(&tmp, data)?;
    fs::rename(&tmp, dir.join(file_name))?;
    Ok(())
}

fn read_optional(path: &Path) -> Result<Option<String>, io::Error> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

fn remove_if_exists(path: &Path) -> Result<(), StorageError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// The persisted session snapshot.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    /// Load the saved session. Legacy snapshots are upgraded and written
    /// back; a snapshot that cannot be parsed is deleted and treated as
    /// absent.
    pub fn load(&self) -> Option<SessionSnapshot> {
        let raw = match read_optional(&self.path()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, path = %self.path().display(), "failed to read session");
                return None;
            }
        };

        match SessionSnapshot::parse(&raw) {
            Ok((snapshot, upgraded)) => {
                if upgraded {
                    info!("upgraded legacy session snapshot");
                    if let Err(e) = self.save(&snapshot) {
                        warn!(error = %e, "failed to rewrite upgraded session");
                    }
                }
                Some(snapshot)
            }
            Err(e) => {
                warn!(error = %e, "discarding unreadable session snapshot");
                if let Err(e) = self.clear() {
                    warn!(error = %e, "failed to remove unreadable session");
                }
                None
            }
        }
    }

    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(snapshot)?;
        write_atomic(&self.dir, SESSION_FILE, &json)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        remove_if_exists(&self.path())
    }
}

/// Quota counter kept next to the session file.
#[derive(Debug, Clone)]
pub struct FileQuotaStore {
    dir: PathBuf,
}

impl FileQuotaStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl QuotaStore for FileQuotaStore {
    fn load(&self) -> Option<QuotaState> {
        let raw = read_optional(&self.dir.join(QUOTA_FILE)).ok()??;
        serde_json::from_str(&raw).ok()
    }

    fn save(&mut self, state: &QuotaState) -> Result<(), StorageError> {
        let json = serde_json::to_string(state)?;
        write_atomic(&self.dir, QUOTA_FILE, &json)
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        remove_if_exists(&self.dir.join(QUOTA_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Buckets, Locale};

    #[test]
    fn session_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        assert!(store.load().is_none());

        let snapshot = SessionSnapshot {
            buckets: Buckets {
                core: vec!["ship".to_string()],
                growth: vec![],
                optional: vec![],
            },
            daily_focus: vec![],
            input_text: "ship".to_string(),
            language: Locale::En,
            has_organized: true,
        };
        store.save(&snapshot).unwrap();
        assert_eq!(store.load(), Some(snapshot));

        store.clear().unwrap();
        assert!(store.load().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn unreadable_session_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SESSION_FILE), "{not json").unwrap();
        let store = SessionStore::new(dir.path());
        assert!(store.load().is_none());
        assert!(!dir.path().join(SESSION_FILE).exists());
    }

    #[test]
    fn legacy_session_is_rewritten_as_plain_strings() {
        let dir = tempfile::tempdir().unwrap();
        let legacy = r#"{"buckets":{"core":[{"text":"a","id":"x1"}],"growth":[],"optional":[]},
            "dailyFocus":[],"inputText":"a","language":"ko","hasOrganized":true}"#;
        fs::write(dir.path().join(SESSION_FILE), legacy).unwrap();

        let store = SessionStore::new(dir.path());
        let loaded = store.load().unwrap();
        assert_eq!(loaded.buckets.core, vec!["a"]);

        let rewritten = fs::read_to_string(dir.path().join(SESSION_FILE)).unwrap();
        assert!(!rewritten.contains("\"text\""));
    }

    #[test]
    fn quota_store_persists_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileQuotaStore::new(dir.path());
        assert!(store.load().is_none());
        let day = chrono::NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let state = QuotaState {
            count: 2,
            window_start: day,
            last_request_at: None,
        };
        store.save(&state).unwrap();
        assert_eq!(store.load(), Some(state));
        store.clear().unwrap();
        assert!(store.load().is_none());
    }
}

//! Storage backends for persisted stores
//!
//! Each store owns one key in a key-value backend. The file backend keeps
//! one JSON text file per key; the in-memory backend covers non-interactive
//! contexts and tests.

use crate::config::app::NAME;
use crate::error::{Result, StoreError};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key-value persistence capability used by every store.
///
/// Chosen at construction by the composition root: a [`FileBackend`] in an
/// interactive session, a [`MemoryBackend`] anywhere durable storage is
/// unavailable. Stores hold backends behind `Rc<dyn StorageBackend>`.
pub trait StorageBackend {
    /// Read the raw text stored under `key`, `None` if absent
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Write raw text under `key`, replacing any previous value
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the entry under `key` (no-op if absent)
    fn remove(&self, key: &str) -> Result<()>;
}

/// Get the default storage directory path
///
/// Uses the system config directory:
/// - Linux: `~/.config/recipeflow/`
/// - macOS: `~/Library/Application Support/recipeflow/`
/// - Windows: `C:\Users\<User>\AppData\Roaming\recipeflow\`
pub fn default_dir() -> Result<PathBuf> {
    dirs::config_dir().map(|p| p.join(NAME)).ok_or_else(|| {
        StoreError::Storage(
            "Could not determine config directory. HOME environment variable may not be set."
                .to_string(),
        )
    })
}

// =============================================================================
// FileBackend - one JSON text file per key
// =============================================================================

/// File-based backend: the entry for `key` lives at `<dir>/<key>.json`
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Create a backend rooted at the default storage directory
    pub fn new() -> Result<Self> {
        Ok(Self { dir: default_dir()? })
    }

    /// Create a backend rooted at a custom directory (for testing)
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                return match e.kind() {
                    ErrorKind::NotFound => Ok(None),
                    ErrorKind::PermissionDenied => Err(StoreError::Storage(format!(
                        "Permission denied: cannot read {:?}",
                        path
                    ))),
                    _ => Err(StoreError::Storage(format!(
                        "Failed to read {:?}: {}",
                        path, e
                    ))),
                }
            }
        };

        // An empty entry is treated as absent
        if content.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(content))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        create_dir_if_needed(&self.dir)?;

        let path = self.entry_path(key);
        match fs::write(&path, value) {
            Ok(()) => Ok(()),
            Err(e) => {
                let msg = match e.kind() {
                    ErrorKind::PermissionDenied => {
                        format!("Permission denied: cannot write to {:?}", path)
                    }
                    ErrorKind::ReadOnlyFilesystem => {
                        format!("Cannot write to {:?}: filesystem is read-only", path)
                    }
                    _ => format!("Failed to write to {:?}: {}", path, e),
                };
                Err(StoreError::Storage(msg))
            }
        }
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.entry_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) => match e.kind() {
                ErrorKind::NotFound => Ok(()), // Already gone, that's fine
                ErrorKind::PermissionDenied => Err(StoreError::Storage(format!(
                    "Permission denied: cannot delete {:?}",
                    path
                ))),
                _ => Err(StoreError::Storage(format!(
                    "Failed to delete {:?}: {}",
                    path, e
                ))),
            },
        }
    }
}

/// Create a directory if it doesn't exist, with proper error handling
fn create_dir_if_needed(path: &Path) -> Result<()> {
    match fs::create_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) => {
            let msg = match e.kind() {
                ErrorKind::PermissionDenied => {
                    format!("Permission denied: cannot create directory {:?}", path)
                }
                _ => format!("Failed to create directory {:?}: {}", path, e),
            };
            Err(StoreError::Storage(msg))
        }
    }
}

// =============================================================================
// MemoryBackend - volatile storage for headless contexts and tests
// =============================================================================

/// In-memory backend; nothing survives the process
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate an entry (test fixture helper)
    pub fn seed(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    /// Raw stored text under `key`, if any
    pub fn stored(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.seed(key, value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

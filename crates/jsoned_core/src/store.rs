use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;

use crate::core_api::{CoreError, CoreErrorCode};

pub const DOCUMENT_EXTENSION: &str = ".json";
pub const BACKUP_SUFFIX: &str = ".backup";

static STAGING_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Where documents come from and go back to.
pub trait DocumentSource {
    fn list_candidates(&self) -> Result<Vec<String>, CoreError>;

    fn load(&self, name: &str) -> Result<Value, CoreError>;

    fn save(&self, name: &str, document: &Value) -> Result<(), CoreError>;
}

/// JSON documents stored as files in one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDirectory {
    root: PathBuf,
    backup: bool,
}

impl DataDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            backup: false,
        }
    }

    /// Copy the previous file to `<name>.backup` before every save.
    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn backup_path_of(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}{BACKUP_SUFFIX}"))
    }
}

impl DocumentSource for DataDirectory {
    fn list_candidates(&self) -> Result<Vec<String>, CoreError> {
        let entries = fs::read_dir(&self.root)
            .map_err(|e| CoreError::from_io(format!("listing {}", self.root.display()), &e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| CoreError::from_io(format!("listing {}", self.root.display()), &e))?;
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if is_file && name.ends_with(DOCUMENT_EXTENSION) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    fn load(&self, name: &str) -> Result<Value, CoreError> {
        load_document(&self.path_of(name))
    }

    fn save(&self, name: &str, document: &Value) -> Result<(), CoreError> {
        let target = self.path_of(name);
        let rendered = serialize_document(document)?;

        if self.backup && target.exists() {
            let backup = self.backup_path_of(name);
            fs::copy(&target, &backup).map_err(|e| {
                CoreError::from_io(format!("creating backup {}", backup.display()), &e)
            })?;
        }

        write_atomically(&target, rendered.as_bytes())
    }
}

pub fn load_document(path: &Path) -> Result<Value, CoreError> {
    let bytes =
        fs::read(path).map_err(|e| CoreError::from_io(format!("reading {}", path.display()), &e))?;
    serde_json::from_slice(&bytes).map_err(|e| {
        CoreError::new(
            CoreErrorCode::Parse,
            format!("failed to parse {}: {e}", path.display()),
        )
    })
}

/// Writes `document` to an arbitrary path, e.g. a copy next to the original.
pub fn save_copy(path: &Path, document: &Value) -> Result<(), CoreError> {
    let rendered = serialize_document(document)?;
    write_atomically(path, rendered.as_bytes())
}

/// Persisted form: two-space indentation, non-ASCII characters written as-is,
/// no trailing newline.
pub fn serialize_document(document: &Value) -> Result<String, CoreError> {
    serde_json::to_string_pretty(document).map_err(|e| {
        CoreError::new(
            CoreErrorCode::Io,
            format!("failed to serialize document: {e}"),
        )
    })
}

// The target is only replaced once the full document is on disk.
fn write_atomically(target: &Path, bytes: &[u8]) -> Result<(), CoreError> {
    let file_name = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("invalid document path {}", target.display()),
            )
        })?;
    let staging = staging_path(target, file_name);

    fs::write(&staging, bytes)
        .map_err(|e| CoreError::from_io(format!("writing {}", staging.display()), &e))?;
    fs::rename(&staging, target).map_err(|e| {
        let _ = fs::remove_file(&staging);
        CoreError::from_io(format!("replacing {}", target.display()), &e)
    })
}

// Unique per save, even for concurrent saves to one target from one process.
fn staging_path(target: &Path, file_name: &str) -> PathBuf {
    let serial = STAGING_COUNTER.fetch_add(1, Ordering::Relaxed);
    target.with_file_name(format!(".{file_name}.{}.{serial}.tmp", std::process::id()))
}

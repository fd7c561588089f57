//! Self-repairing JSON reads and atomic writes for the settings document.
//!
//! Reads recover from a missing file (empty document, directory created) and
//! from unparseable content (file reset to the empty string). Writes go to a
//! temporary sibling file which is then renamed over the target, so readers
//! never see a partially-written document.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{Result, StoreError, DIR_MODE, FILE_MODE};

/// The settings document: a JSON object.
pub type Document = Map<String, Value>;

/// Attempts at picking an unused temporary file name before giving up.
const MAX_TMP_ATTEMPTS: u32 = 16;

/// Read the document at `path`.
///
/// - Missing file: the parent directory is created and an empty document is
///   returned. The file itself is not created.
/// - Empty or whitespace-only content: empty document.
/// - Content that does not parse as JSON: the file is reset to the empty
///   string and an empty document is returned.
/// - Valid JSON that is not an object: `StoreError::NotAnObject`, the file
///   is left as it is.
/// - Permission problems and other I/O failures are returned as errors.
pub fn read(path: &Path) -> Result<Document> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            if let Some(parent) = path.parent() {
                ensure_dir(parent)?;
            }
            return Ok(Document::new());
        }
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            // Not UTF-8, so it cannot be JSON either.
            reset(path, &e)?;
            return Ok(Document::new());
        }
        Err(e) => return Err(StoreError::from_io("read", path, e)),
    };

    if content.trim().is_empty() {
        return Ok(Document::new());
    }

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(document)) => Ok(document),
        Ok(other) => Err(StoreError::NotAnObject {
            path: path.to_path_buf(),
            found: kind_of(&other),
        }),
        Err(e) => {
            reset(path, &e)?;
            Ok(Document::new())
        }
    }
}

/// Write `document` to `path` atomically, creating the parent directory if it
/// has gone missing.
pub fn write(path: &Path, document: &Document) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let json = to_tab_json(document)?;
    write_atomic(path, json.as_bytes())?;

    tracing::debug!(path = %path.display(), keys = document.len(), "wrote settings");
    Ok(())
}

/// Serialize as tab-indented JSON. No trailing newline.
pub fn to_tab_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    // serde_json only emits valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Create `dir` and any missing ancestors with owner-only permissions.
/// An existing directory is fine.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }

    match builder.create(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(e) => Err(StoreError::from_io("create directory", dir, e)),
    }
}

/// Replace the contents of `path` with `bytes` in one rename.
///
/// The bytes go to a fresh sibling temp file (mode 0600), are synced, then
/// the temp file is renamed over `path`. On failure the temp file is removed
/// and `path` is left untouched.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let (tmp_path, mut file) = create_tmp_file(path)?;

    let result = write_and_sync(&mut file, bytes)
        .map_err(|e| StoreError::from_io("write", &tmp_path, e))
        .and_then(|()| {
            drop(file);
            fs::rename(&tmp_path, path).map_err(|e| StoreError::from_io("replace", path, e))
        });

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_and_sync(file: &mut File, bytes: &[u8]) -> io::Result<()> {
    file.write_all(bytes)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // The open mode is filtered by the umask; pin it.
        file.set_permissions(fs::Permissions::from_mode(FILE_MODE))?;
    }
    file.sync_all()
}

/// Create a new temp file next to `path`, named `<name>.<hash>`.
fn create_tmp_file(path: &Path) -> Result<(PathBuf, File)> {
    let mut last_err = None;
    for attempt in 0..MAX_TMP_ATTEMPTS {
        let tmp_path = tmp_path_for(path, attempt);
        match open_new_file(&tmp_path) {
            Ok(file) => return Ok((tmp_path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => last_err = Some(e),
            Err(e) => return Err(StoreError::from_io("create temp file", &tmp_path, e)),
        }
    }

    let e = last_err
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::AlreadyExists, "no free temp file name"));
    Err(StoreError::from_io("create temp file", path, e))
}

/// Temp file name derived from the target path, process, thread, time, and
/// attempt number.
fn tmp_path_for(path: &Path, attempt: u32) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();

    let mut hasher = blake3::Hasher::new();
    hasher.update(path.as_os_str().as_encoded_bytes());
    hasher.update(&std::process::id().to_le_bytes());
    hasher.update(format!("{:?}", std::thread::current().id()).as_bytes());
    hasher.update(&nanos.to_le_bytes());
    hasher.update(&attempt.to_le_bytes());
    let hash = hasher.finalize().to_hex();

    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(&hash.as_str()[..8]);
    path.with_file_name(name)
}

fn open_new_file(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }
    options.open(path)
}

fn reset(path: &Path, reason: &dyn std::fmt::Display) -> Result<()> {
    tracing::warn!(path = %path.display(), %reason, "settings file is corrupt, resetting it");
    write_atomic(path, b"")
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

//! The `SiteConfig` handle.
//!
//! The file location is fixed at construction. Nothing is cached: every
//! call reads the document from disk, and every mutation writes the whole
//! document back. There is no locking, so two processes doing
//! read-modify-write on the same file can lose one another's changes.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::store::{self, Document};
use crate::{dot_path, resolve, Result, StoreOptions};

/// Per-project settings backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    dir: PathBuf,
    path: PathBuf,
}

impl SiteConfig {
    /// Locate the settings file for `dir` and merge `defaults` into it.
    ///
    /// Values already on disk win over `defaults` (top-level keys only).
    /// The merged document is always written, so the file exists once this
    /// returns.
    pub fn new(dir: impl Into<PathBuf>, defaults: Document, opts: StoreOptions) -> Result<Self> {
        let dir = dir.into();
        let path = resolve::resolve_path(&dir, &opts);
        tracing::debug!(dir = %dir.display(), path = %path.display(), "resolved settings file");

        let config = Self { dir, path };
        let mut merged = defaults;
        merged.extend(config.read()?);
        config.write(&merged)?;
        Ok(config)
    }

    /// `new` with no defaults and default options.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::new(dir, Document::new(), StoreOptions::default())
    }

    /// The directory the search started from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The whole document, freshly read.
    pub fn read(&self) -> Result<Document> {
        store::read(&self.path)
    }

    /// Replace the whole document.
    pub fn write(&self, document: &Document) -> Result<()> {
        store::write(&self.path, document)
    }

    /// Number of top-level keys.
    pub fn size(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    /// Value at a dotted path, `None` if it does not resolve.
    pub fn get(&self, path: &str) -> Result<Option<Value>> {
        let document = self.read()?;
        Ok(dot_path::get(&document, path).cloned())
    }

    /// Like `get`, deserialized into `T`. A value of the wrong shape reads as
    /// `None`.
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        Ok(self
            .get(path)?
            .and_then(|value| serde_json::from_value(value).ok()))
    }

    pub fn set(&self, path: &str, value: impl Into<Value>) -> Result<()> {
        let mut document = self.read()?;
        dot_path::set(&mut document, path, value.into());
        self.write(&document)
    }

    /// Apply every entry of `entries` as a dotted-path assignment, in order,
    /// then write once.
    pub fn set_many(&self, entries: Document) -> Result<()> {
        let mut document = self.read()?;
        for (path, value) in entries {
            dot_path::set(&mut document, &path, value);
        }
        self.write(&document)
    }

    /// Whether the dotted path resolves. Keys holding `null` are present.
    pub fn has(&self, path: &str) -> Result<bool> {
        let document = self.read()?;
        Ok(dot_path::has(&document, path))
    }

    /// Remove the value at a dotted path. Returns whether anything was
    /// removed; the document is written either way.
    pub fn delete(&self, path: &str) -> Result<bool> {
        let mut document = self.read()?;
        let removed = dot_path::delete(&mut document, path);
        self.write(&document)?;
        Ok(removed)
    }

    /// Replace the document with an empty object.
    pub fn clear(&self) -> Result<()> {
        self.write(&Document::new())
    }
}

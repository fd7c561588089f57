//! Construction options for `SiteConfig`.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::{DEFAULT_FILE_NAME, DEFAULT_ROOT_INDICATORS, SITE_CONFIG_DIR_ENV};

/// Where the settings file lives and how to find it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// File name of the settings file.
    pub name: String,
    /// Names marking a project root, checked after `name` in each directory.
    pub root_indicators: Vec<String>,
    /// Explicit directory for the settings file. Skips the upward search.
    pub path: Option<PathBuf>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_FILE_NAME.to_string(),
            root_indicators: DEFAULT_ROOT_INDICATORS
                .iter()
                .map(ToString::to_string)
                .collect(),
            path: None,
        }
    }
}

impl StoreOptions {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_root_indicators<I, S>(mut self, indicators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.root_indicators = indicators.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.path = Some(dir.into());
        self
    }

    /// Use `SITE_CONFIG_DIR` as the override directory when no explicit
    /// `path` is set.
    pub fn with_env_override(self) -> Self {
        let value = std::env::var_os(SITE_CONFIG_DIR_ENV);
        self.with_dir_override(value)
    }

    fn with_dir_override(mut self, value: Option<OsString>) -> Self {
        if self.path.is_none() {
            if let Some(dir) = value.filter(|v| !v.is_empty()) {
                self.path = Some(PathBuf::from(dir));
            }
        }
        self
    }

    /// Candidate names for one directory during the upward search.
    pub(crate) fn candidates(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.root_indicators.iter().map(String::as_str))
    }
}

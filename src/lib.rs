//! `site_config` — Per-project settings stored in a single JSON file.
//!
//! Provides:
//! - `resolve` — Locate the settings file by walking up to the project root
//! - `store` — Self-repairing JSON reads and atomic, permission-restricted writes
//! - `dot_path` — Dotted-path (`"a.b.c"`) navigation over a JSON object
//! - `site_config` — The `SiteConfig` handle tying the pieces together
//!
//! ```no_run
//! use site_config::{SiteConfig, StoreOptions};
//! use serde_json::{json, Map};
//!
//! # fn main() -> site_config::Result<()> {
//! let config = SiteConfig::new(".", Map::new(), StoreOptions::default())?;
//! config.set("siteId", json!("abc123"))?;
//! assert_eq!(config.get("siteId")?, Some(json!("abc123")));
//! # Ok(())
//! # }
//! ```

pub mod dot_path;
pub mod error;
pub mod options;
pub mod resolve;
pub mod site_config;
pub mod store;

pub use error::{Result, StoreError};
pub use options::StoreOptions;
pub use site_config::SiteConfig;

/// Default settings file name.
pub const DEFAULT_FILE_NAME: &str = ".netlify.json";

/// Names whose presence marks a directory as the project root.
pub const DEFAULT_ROOT_INDICATORS: &[&str] = &["netlify.toml", ".git"];

/// Environment variable to override the directory holding the settings file.
pub const SITE_CONFIG_DIR_ENV: &str = "SITE_CONFIG_DIR";

/// Appended to permission errors.
pub const PERMISSION_HINT: &str = "You don't have access to this file.";

/// Mode for directories created by the store (owner-only rwx).
pub const DIR_MODE: u32 = 0o700;

/// Mode for files written by the store (owner-only rw).
pub const FILE_MODE: u32 = 0o600;

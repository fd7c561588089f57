//! Error taxonomy for settings file access.
//!
//! Missing files and unparseable content are recovered inside `store` and
//! never show up here. What remains is what the caller has to deal with.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::PERMISSION_HINT;

/// Errors surfaced by the settings store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The process lacks access to the settings file or its directory.
    #[error("{source}: {}\n{hint}\n", .path.display(), hint = PERMISSION_HINT)]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Any other filesystem failure, passed through as-is.
    #[error("Failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file holds valid JSON that is not an object. Left untouched.
    #[error("Settings file {} holds {found}, expected a JSON object", .path.display())]
    NotAnObject { path: PathBuf, found: &'static str },

    /// The document could not be encoded as JSON.
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    /// Classify an I/O failure. Permission problems get the access hint.
    pub fn from_io(action: &'static str, path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        if source.kind() == io::ErrorKind::PermissionDenied {
            Self::PermissionDenied { path, source }
        } else {
            Self::Io {
                action,
                path,
                source,
            }
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }

    /// The file or directory the failure relates to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::PermissionDenied { path, .. }
            | Self::Io { path, .. }
            | Self::NotAnObject { path, .. } => Some(path),
            Self::Serialize(_) => None,
        }
    }
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_message_has_hint() {
        let err = StoreError::from_io(
            "read",
            Path::new("/tmp/.netlify.json"),
            io::Error::new(io::ErrorKind::PermissionDenied, "EACCES: permission denied"),
        );
        assert!(err.is_permission_denied());
        assert_eq!(
            err.to_string(),
            "EACCES: permission denied: /tmp/.netlify.json\nYou don't have access to this file.\n"
        );
        assert_eq!(err.path(), Some(Path::new("/tmp/.netlify.json")));
    }

    #[test]
    fn test_not_an_object_names_the_file() {
        let err = StoreError::NotAnObject {
            path: PathBuf::from("/srv/site/.netlify.json"),
            found: "an array",
        };
        assert_eq!(
            err.to_string(),
            "Settings file /srv/site/.netlify.json holds an array, expected a JSON object"
        );
        assert_eq!(err.path(), Some(Path::new("/srv/site/.netlify.json")));
        assert!(!err.is_permission_denied());
    }

    #[test]
    fn test_other_io_errors_keep_source() {
        let err = StoreError::from_io(
            "write",
            Path::new("/tmp/x.json"),
            io::Error::new(io::ErrorKind::Other, "disk on fire"),
        );
        assert!(!err.is_permission_denied());
        assert!(!err.to_string().contains(PERMISSION_HINT));

        let StoreError::Io { action, source, .. } = err else {
            panic!("expected Io variant");
        };
        assert_eq!(action, "write");
        assert_eq!(source.kind(), io::ErrorKind::Other);
        assert_eq!(source.to_string(), "disk on fire");
    }
}

// reeltag (video catalog builder and viewer)
// Copyright (C) 2025 Andrew Nissen

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Folder configuration not found: {}", path.display())]
    ConfigurationMissing { path: PathBuf },

    #[error("Folder configuration {} is malformed: {reason}", path.display())]
    ConfigurationMalformed { path: PathBuf, reason: String },

    #[error("Root folder does not exist: {}", path.display())]
    RootNotFound { path: PathBuf },

    #[error("Could not probe duration of {}: {reason}", path.display())]
    ProbeFailed { path: PathBuf, reason: String },

    #[error("Skipping {}: {reason}", path.display())]
    UnsupportedFile { path: PathBuf, reason: String },

    #[error("Unable to write catalog {}: {source}", path.display())]
    CatalogWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Catalog unavailable at {location}: {reason}")]
    CatalogUnavailable { location: String, reason: String },

    #[error("Settings error: {0}")]
    Settings(#[from] confy::ConfyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    /// Per-item conditions are absorbed by the surrounding loop; only these
    /// may end a builder run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConfigurationMissing { .. }
                | Self::ConfigurationMalformed { .. }
                | Self::CatalogWriteFailed { .. }
                | Self::Settings(_)
                | Self::Io(_)
        )
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigurationMissing { .. } => "CONFIGURATION_MISSING",
            Self::ConfigurationMalformed { .. } => "CONFIGURATION_MALFORMED",
            Self::RootNotFound { .. } => "ROOT_NOT_FOUND",
            Self::ProbeFailed { .. } => "PROBE_FAILED",
            Self::UnsupportedFile { .. } => "UNSUPPORTED_FILE",
            Self::CatalogWriteFailed { .. } => "CATALOG_WRITE_FAILED",
            Self::CatalogUnavailable { .. } => "CATALOG_UNAVAILABLE",
            Self::Settings(_) => "SETTINGS_ERROR",
            Self::Io(_) => "IO_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        let missing = CatalogError::ConfigurationMissing {
            path: PathBuf::from("/tmp/folder_path.json"),
        };
        assert!(missing.is_fatal());
        assert_eq!(missing.code(), "CONFIGURATION_MISSING");

        let root = CatalogError::RootNotFound {
            path: PathBuf::from("/nope"),
        };
        assert!(!root.is_fatal());

        let probe = CatalogError::ProbeFailed {
            path: PathBuf::from("a-b.mp4"),
            reason: "exit status 1".to_string(),
        };
        assert!(!probe.is_fatal());
        assert!(probe.to_string().contains("a-b.mp4"));
    }
}

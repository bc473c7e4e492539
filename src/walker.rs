// reeltag (video catalog builder and viewer)
// Copyright (C) 2025 Andrew Nissen

use crate::error::CatalogError;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Every regular file under `root`, at any depth, in listing order.
pub fn walk_root(root: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    if !root.is_dir() {
        return Err(CatalogError::RootNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                // Unreadable subtree: skip it, keep the rest of the root.
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        if entry.file_type().is_dir() {
            if entry.depth() > 0 {
                info!("Processing folder: {}", entry.path().display());
            }
        } else if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

// reeltag (video catalog builder and viewer)
// Copyright (C) 2025 Andrew Nissen

use crate::catalog::{self, CatalogEntry};
use crate::config::{FolderConfig, ReeltagConfig};
use crate::error::CatalogError;
use crate::names::{self, VideoMatcher};
use crate::probe::{self, DurationProbe};
use crate::walker;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Everything a builder run needs, resolved once up front.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub folder_config_path: PathBuf,
    pub catalog_path: PathBuf,
    pub pacing: Duration,
}

impl BuildContext {
    pub fn from_config(cfg: &ReeltagConfig) -> Self {
        Self {
            folder_config_path: PathBuf::from(&cfg.folder_config_path),
            catalog_path: PathBuf::from(&cfg.catalog_path),
            pacing: cfg.pacing(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub files_discovered: usize,
    pub entries_written: usize,
    pub roots_skipped: usize,
    pub files_skipped: usize,
    pub probe_failures: usize,
}

pub struct CatalogBuilder {
    ctx: BuildContext,
    probe: Box<dyn DurationProbe>,
    matcher: VideoMatcher,
}

impl CatalogBuilder {
    pub fn new(ctx: BuildContext, probe: Box<dyn DurationProbe>) -> Result<Self, CatalogError> {
        let matcher = VideoMatcher::new().map_err(|e| CatalogError::ConfigurationMalformed {
            path: ctx.folder_config_path.clone(),
            reason: format!("video extension patterns: {}", e),
        })?;
        Ok(Self {
            ctx,
            probe,
            matcher,
        })
    }

    /// Truncate, scan, write. Only configuration and catalog-write failures
    /// come back as errors.
    pub fn run(&self) -> Result<BuildReport, CatalogError> {
        let folders = FolderConfig::load(&self.ctx.folder_config_path)?;

        catalog::truncate_catalog(&self.ctx.catalog_path)?;

        let (entries, report) = self.scan(&folders);

        catalog::write_catalog(&self.ctx.catalog_path, &entries)?;
        info!(
            "File data has been written to {}",
            self.ctx.catalog_path.display()
        );

        Ok(report)
    }

    /// Loads the folder configuration and builds the entries without touching
    /// the catalog file.
    pub fn preview(&self) -> Result<(Vec<CatalogEntry>, BuildReport), CatalogError> {
        let folders = FolderConfig::load(&self.ctx.folder_config_path)?;
        Ok(self.scan(&folders))
    }

    pub fn scan(&self, folders: &FolderConfig) -> (Vec<CatalogEntry>, BuildReport) {
        let mut report = BuildReport::default();
        let files = self.collect_files(folders, &mut report);
        report.files_discovered = files.len();
        info!("Total files found: {}", files.len());

        let entries = self.catalog_files(&files, &mut report);
        report.entries_written = entries.len();
        (entries, report)
    }

    fn collect_files(&self, folders: &FolderConfig, report: &mut BuildReport) -> Vec<PathBuf> {
        let mut all_files = Vec::new();

        for (i, group) in folders.groups.iter().enumerate() {
            if i > 0 && !self.ctx.pacing.is_zero() {
                std::thread::sleep(self.ctx.pacing);
            }
            info!("Scanning group {} ({} roots)", group.name, group.roots.len());

            for root in &group.roots {
                match walker::walk_root(&root.path) {
                    Ok(files) => {
                        info!(
                            "Processing folder: {} [{}] ({} files)",
                            root.path.display(),
                            root.label,
                            files.len()
                        );
                        all_files.extend(files);
                    }
                    Err(e) => {
                        warn!("{}", e);
                        report.roots_skipped += 1;
                    }
                }
            }
        }

        all_files
    }

    fn catalog_files(&self, files: &[PathBuf], report: &mut BuildReport) -> Vec<CatalogEntry> {
        let mut entries = Vec::with_capacity(files.len());

        for file_path in files {
            if let Err(e) = self.matcher.screen(file_path) {
                info!("{}", e);
                report.files_skipped += 1;
                continue;
            }

            match self.entry_for(file_path) {
                Ok((entry, probed)) => {
                    if !probed {
                        report.probe_failures += 1;
                    }
                    info!(
                        "Processed file: {}, Size: {}, Length: {}",
                        entry.name, entry.size_mb, entry.video_length
                    );
                    entries.push(entry);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", file_path.display(), e);
                    report.files_skipped += 1;
                }
            }
        }

        entries
    }

    fn entry_for(&self, file_path: &Path) -> Result<(CatalogEntry, bool), CatalogError> {
        let size = fs::metadata(file_path)?.len();
        let (video_length, probed) = probe::video_length(self.probe.as_ref(), file_path);

        let name = names::display_name(&names::file_name_of(file_path));
        let tags = names::derive_tags(&name);

        let entry = CatalogEntry {
            path: file_path.to_string_lossy().to_string(),
            name,
            size_mb: catalog::format_size(size),
            video_length,
            tags,
        };
        Ok((entry, probed))
    }
}

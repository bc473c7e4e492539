// reeltag (video catalog builder and viewer)
// Copyright (C) 2025 Andrew Nissen

use crate::catalog::{self, CatalogEntry, CatalogStats};
use crate::error::CatalogError;
use crate::filter::{self, CatalogFilter};
use crate::storage::CatalogStore;
use std::error::Error;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub const PATH_DISPLAY_LIMIT: usize = 80;
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Long paths keep their tail, which is the part that identifies the file.
pub fn abbreviate_path(path: &str) -> String {
    let len = path.chars().count();
    if len <= PATH_DISPLAY_LIMIT {
        return path.to_string();
    }
    let tail: String = path.chars().skip(len - (PATH_DISPLAY_LIMIT - 3)).collect();
    format!("...{}", tail)
}

/// One rendered unit per visible entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub badge: String,
    pub name: String,
    pub size: String,
    pub duration: String,
    pub short_path: String,
    pub full_path: String,
    pub tags: Vec<String>,
}

impl Card {
    /// `position` is zero-based within the displayed sequence.
    pub fn from_entry(position: usize, entry: &CatalogEntry) -> Self {
        Self {
            badge: format!("#{}", position + 1),
            name: entry.name.clone(),
            size: entry.size_mb.clone(),
            duration: entry.video_length.clone(),
            short_path: abbreviate_path(&entry.path),
            full_path: entry.path.clone(),
            tags: entry.tags.clone(),
        }
    }
}

pub fn cards_for(entries: &[&CatalogEntry]) -> Vec<Card> {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| Card::from_entry(i, e))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Unavailable { location: String, reason: String },
    Empty,
    Loaded,
}

/// The viewer's model: the full catalog, its tag vocabulary and the active
/// filters. Never mutates the catalog source.
pub struct CatalogView {
    store: Box<dyn CatalogStore>,
    entries: Vec<CatalogEntry>,
    vocabulary: Vec<String>,
    pub filter: CatalogFilter,
    pub state: ViewState,
}

impl CatalogView {
    pub fn new(store: Box<dyn CatalogStore>) -> Self {
        Self {
            store,
            entries: Vec::new(),
            vocabulary: Vec::new(),
            filter: CatalogFilter::default(),
            state: ViewState::Loading,
        }
    }

    pub fn location(&self) -> String {
        self.store.location()
    }

    /// Loads through the backend and recomputes the vocabulary. Load failures
    /// become a view state; they are returned only for callers that want to
    /// report them.
    pub fn reload(&mut self) -> Result<(), CatalogError> {
        self.state = ViewState::Loading;
        match self.store.load() {
            Ok(entries) => {
                info!(
                    "Loaded {} catalog entries from {}",
                    entries.len(),
                    self.store.location()
                );
                self.vocabulary = filter::tag_vocabulary(&entries);
                self.state = if entries.is_empty() {
                    ViewState::Empty
                } else {
                    ViewState::Loaded
                };
                self.entries = entries;
                Ok(())
            }
            Err(e) => {
                warn!("{}", e);
                self.entries.clear();
                self.vocabulary.clear();
                self.state = match &e {
                    CatalogError::CatalogUnavailable { location, reason } => {
                        ViewState::Unavailable {
                            location: location.clone(),
                            reason: reason.clone(),
                        }
                    }
                    other => ViewState::Unavailable {
                        location: self.store.location(),
                        reason: other.to_string(),
                    },
                };
                Err(e)
            }
        }
    }

    /// Reload and drop both filters.
    pub fn refresh(&mut self) -> Result<(), CatalogError> {
        self.filter = CatalogFilter::default();
        self.reload()
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn visible(&self) -> Vec<&CatalogEntry> {
        self.filter.apply(&self.entries)
    }

    pub fn cards(&self) -> Vec<Card> {
        cards_for(&self.visible())
    }

    pub fn stats(&self) -> CatalogStats {
        catalog::stats(&self.entries)
    }

    pub fn summary_line(&self) -> String {
        if self.filter.is_active() {
            format!(
                "Filtered Files: {}{}",
                self.visible().len(),
                self.filter.describe()
            )
        } else {
            let stats = self.stats();
            format!(
                "Total Files: {} | Total Tags: {}",
                stats.total_files, stats.total_tags
            )
        }
    }
}

/// Holds back re-filtering until input has been quiet for `delay`.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending_since: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending_since: None,
        }
    }

    pub fn touch(&mut self, now: Instant) {
        self.pending_since = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// True once per burst of input, after the quiet period.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.pending_since {
            Some(since) if now.duration_since(since) >= self.delay => {
                self.pending_since = None;
                true
            }
            _ => false,
        }
    }

    pub fn time_left(&self, now: Instant) -> Option<Duration> {
        self.pending_since
            .map(|since| self.delay.saturating_sub(now.duration_since(since)))
    }
}

pub fn copy_text_to_clipboard(text: &str) -> Result<(), Box<dyn Error>> {
    use clipboard_rs::{Clipboard, ClipboardContext};

    let ctx = ClipboardContext::new()
        .map_err(|e| format!("Failed to create clipboard context: {}", e))?;

    ctx.set_text(text.to_string())
        .map_err(|e| format!("Failed to set text in clipboard: {}", e))?;

    Ok(())
}

/// Shows the file in the platform file manager. Fire-and-forget.
pub fn reveal_in_file_manager(path: &Path) -> Result<(), Box<dyn Error>> {
    #[cfg(windows)]
    {
        std::process::Command::new("explorer")
            .arg(format!("/select,{}", path.display()))
            .spawn()?;
        Ok(())
    }

    #[cfg(not(windows))]
    {
        let folder = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| format!("No containing folder for {}", path.display()))?;
        open::that_detached(folder)?;
        Ok(())
    }
}

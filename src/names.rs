// reeltag (video catalog builder and viewer)
// Copyright (C) 2025 Andrew Nissen

use crate::error::CatalogError;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;

pub const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".mkv", ".avi", ".mov", ".wmv", ".flv", ".webm"];

/// Appended to every export by the Clipchamp editor.
pub const CLIPCHAMP_MARKER: &str = " - Made with Clipchamp";

pub const TAG_SEPARATOR: char = '-';

/// Decides which discovered files make it into the catalog.
pub struct VideoMatcher {
    set: GlobSet,
}

impl VideoMatcher {
    pub fn new() -> Result<Self, globset::Error> {
        let mut builder = GlobSetBuilder::new();
        for ext in VIDEO_EXTENSIONS {
            builder.add(Glob::new(&format!("*{}", ext))?);
        }
        Ok(Self {
            set: builder.build()?,
        })
    }

    pub fn screen(&self, path: &Path) -> Result<(), CatalogError> {
        let file_name = file_name_of(path);

        if !file_name.contains(TAG_SEPARATOR) {
            return Err(CatalogError::UnsupportedFile {
                path: path.to_path_buf(),
                reason: format!("no '{}' in file name '{}'", TAG_SEPARATOR, file_name),
            });
        }

        if !self.set.is_match(&file_name) {
            return Err(CatalogError::UnsupportedFile {
                path: path.to_path_buf(),
                reason: format!("unsupported file extension in '{}'", file_name),
            });
        }

        Ok(())
    }
}

pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// Probing is only attempted for these; the comparison ignores case.
pub fn is_video_extension(path: &Path) -> bool {
    let Some(ext) = path.extension() else {
        return false;
    };
    let dotted = format!(".{}", ext.to_string_lossy().to_lowercase());
    VIDEO_EXTENSIONS.contains(&dotted.as_str())
}

/// Catalog display name: marker removed, trailing video extension removed.
pub fn display_name(file_name: &str) -> String {
    let name = file_name.replacen(CLIPCHAMP_MARKER, "", 1);

    VIDEO_EXTENSIONS
        .iter()
        .find_map(|ext| name.strip_suffix(ext))
        .map(str::to_string)
        .unwrap_or(name)
}

/// Hyphens are taken verbatim as tag boundaries, empty segments included.
pub fn derive_tags(name: &str) -> Vec<String> {
    name.split(TAG_SEPARATOR).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_display_name_strips_marker_and_extension() {
        assert_eq!(display_name("anime-op-2024.mp4"), "anime-op-2024");
        assert_eq!(
            display_name("travel-kyoto - Made with Clipchamp.mp4"),
            "travel-kyoto"
        );
        assert_eq!(display_name("game-boss.webm"), "game-boss");
        // Only the trailing extension goes.
        assert_eq!(display_name("a.mp4-b.mkv"), "a.mp4-b");
    }

    #[test]
    fn test_derive_tags_keeps_order_and_empty_segments() {
        assert_eq!(derive_tags("A-1"), vec!["A", "1"]);
        assert_eq!(derive_tags("doujin-game-bf"), vec!["doujin", "game", "bf"]);
        assert_eq!(derive_tags("x--y"), vec!["x", "", "y"]);
        assert_eq!(derive_tags("Jean-Luc-interview"), vec!["Jean", "Luc", "interview"]);
    }

    #[test]
    fn test_screen_requires_hyphen_and_known_extension() {
        let matcher = VideoMatcher::new().unwrap();

        assert!(matcher.screen(&PathBuf::from("/v/tag-one.mp4")).is_ok());
        assert!(matcher.screen(&PathBuf::from("/v/tag-one.mkv")).is_ok());

        let no_hyphen = matcher.screen(&PathBuf::from("/v/holiday.mp4"));
        assert!(matches!(no_hyphen, Err(CatalogError::UnsupportedFile { .. })));

        let bad_ext = matcher.screen(&PathBuf::from("/v/notes-draft.txt"));
        assert!(matches!(bad_ext, Err(CatalogError::UnsupportedFile { .. })));

        // Hyphen in a parent folder does not count.
        let parent_only = matcher.screen(&PathBuf::from("/my-videos/holiday.mp4"));
        assert!(parent_only.is_err());
    }

    #[test]
    fn test_is_video_extension_ignores_case() {
        assert!(is_video_extension(Path::new("clip-a.MP4")));
        assert!(is_video_extension(Path::new("clip-a.mov")));
        assert!(!is_video_extension(Path::new("clip-a.txt")));
        assert!(!is_video_extension(Path::new("clip-a")));
    }
}

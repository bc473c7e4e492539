// reeltag (video catalog builder and viewer)
// Copyright (C) 2025 Andrew Nissen

use crate::catalog::CatalogEntry;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Tag and free-text filters; both active means both must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub tag: Option<String>,
    pub search: Option<String>,
}

impl CatalogFilter {
    pub fn new(tag: Option<String>, search: Option<String>) -> Self {
        Self {
            tag: tag.filter(|t| !t.is_empty()),
            search: search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.tag.is_some() || self.search.is_some()
    }

    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        if let Some(tag) = &self.tag
            && !entry.tags.iter().any(|t| t == tag)
        {
            return false;
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = entry.name.to_lowercase().contains(&needle)
                || entry.path.to_lowercase().contains(&needle)
                || entry.tags.iter().any(|t| t.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        true
    }

    /// Re-derived from the full catalog every time; order is kept.
    pub fn apply<'a>(&self, entries: &'a [CatalogEntry]) -> Vec<&'a CatalogEntry> {
        entries.iter().filter(|e| self.matches(e)).collect()
    }

    pub fn describe(&self) -> String {
        match (&self.tag, &self.search) {
            (Some(tag), Some(search)) => format!(" (Tag: {}, Search: \"{}\")", tag, search),
            (Some(tag), None) => format!(" (Tag: {})", tag),
            (None, Some(search)) => format!(" (Search: \"{}\")", search),
            (None, None) => String::new(),
        }
    }
}

fn chunk_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d+|\D+").expect("static pattern"))
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a_trimmed = a.trim_start_matches('0');
    let b_trimmed = b.trim_start_matches('0');
    a_trimmed
        .len()
        .cmp(&b_trimmed.len())
        .then_with(|| a_trimmed.cmp(b_trimmed))
        .then_with(|| a.len().cmp(&b.len()))
}

/// Collation for tag lists: digit runs compare by value, everything else
/// compares case-insensitively, and the raw string breaks ties.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let pattern = chunk_pattern();
    let mut left = pattern.find_iter(a).map(|m| m.as_str());
    let mut right = pattern.find_iter(b).map(|m| m.as_str());

    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let x_digits = x.starts_with(|c: char| c.is_ascii_digit());
                let y_digits = y.starts_with(|c: char| c.is_ascii_digit());
                let ord = match (x_digits, y_digits) {
                    (true, true) => compare_digit_runs(x, y),
                    _ => x.to_lowercase().cmp(&y.to_lowercase()),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

/// Every distinct tag exactly as stored, in natural order. Blank tags are
/// left out.
pub fn tag_vocabulary(entries: &[CatalogEntry]) -> Vec<String> {
    let distinct: BTreeSet<&str> = entries
        .iter()
        .flat_map(|e| e.tags.iter())
        .map(String::as_str)
        .filter(|t| !t.trim().is_empty())
        .collect();

    let mut tags: Vec<String> = distinct.into_iter().map(str::to_string).collect();
    tags.sort_by(|a, b| natural_cmp(a, b));
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::entry;

    fn sample() -> Vec<CatalogEntry> {
        vec![entry("A-1", "/v/A-1.mp4"), entry("B-2", "/v/B-2.mp4")]
    }

    #[test]
    fn test_combined_filter_is_conjunctive() {
        let catalog = sample();

        let tag_only = CatalogFilter::new(Some("A".into()), None);
        let hits = tag_only.apply(&catalog);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "A-1");

        let both = CatalogFilter::new(Some("A".into()), Some("2".into()));
        assert!(both.apply(&catalog).is_empty());
    }

    #[test]
    fn test_tag_filter_is_exact_and_idempotent() {
        let catalog = vec![
            entry("anime-op", "/v/1.mp4"),
            entry("Anime-ed", "/v/2.mp4"),
            entry("animes-op", "/v/3.mp4"),
        ];
        let filter = CatalogFilter::new(Some("anime".into()), None);
        let first: Vec<_> = filter.apply(&catalog).into_iter().cloned().collect();
        let second: Vec<_> = filter.apply(&catalog).into_iter().cloned().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].path, "/v/1.mp4");
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let catalog = vec![
            entry("Travel-Kyoto", "/videos/2024/Travel-Kyoto.mp4"),
            entry("game-boss", "/archive/GAME-boss.mkv"),
        ];

        let by_name = CatalogFilter::new(None, Some("kyoto".into()));
        assert_eq!(by_name.apply(&catalog).len(), 1);

        let by_path = CatalogFilter::new(None, Some("ARCHIVE".into()));
        assert_eq!(by_path.apply(&catalog)[0].name, "game-boss");

        let by_tag = CatalogFilter::new(None, Some("Bos".into()));
        assert_eq!(by_tag.apply(&catalog).len(), 1);
    }

    #[test]
    fn test_no_filter_returns_everything_in_order() {
        let catalog = sample();
        let filter = CatalogFilter::new(Some(String::new()), Some("   ".into()));
        assert!(!filter.is_active());
        let all = filter.apply(&catalog);
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].name, "B-2");
    }

    #[test]
    fn test_vocabulary_natural_order() {
        let catalog = vec![
            entry("tag10-beta", "/a"),
            entry("tag2-Alpha", "/b"),
            entry("tag1-alpha- ", "/c"),
        ];
        assert_eq!(
            tag_vocabulary(&catalog),
            vec!["Alpha", "alpha", "beta", "tag1", "tag2", "tag10"]
        );
    }

    #[test]
    fn test_every_vocabulary_tag_selects_an_entry() {
        let name = crate::names::display_name("Jean Luc - interview.mp4");
        let catalog = vec![
            entry(&name, "/v/Jean Luc - interview.mp4"),
            entry("tag1-alpha- ", "/v/tag1-alpha- .mp4"),
        ];
        let vocabulary = tag_vocabulary(&catalog);
        assert!(vocabulary.contains(&" interview".to_string()));
        assert!(vocabulary.contains(&"Jean Luc ".to_string()));
        assert!(!vocabulary.iter().any(|t| t.trim().is_empty()));

        for tag in vocabulary {
            let hits = CatalogFilter::new(Some(tag.clone()), None).apply(&catalog);
            assert!(!hits.is_empty(), "tag {:?} selects nothing", tag);
        }
    }

    #[test]
    fn test_natural_cmp() {
        assert_eq!(natural_cmp("tag2", "tag10"), Ordering::Less);
        assert_eq!(natural_cmp("ep09", "ep9"), Ordering::Greater);
        assert_eq!(natural_cmp("b", "A"), Ordering::Greater);
        assert_eq!(natural_cmp("2", "a"), Ordering::Less);
        assert_eq!(natural_cmp("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_describe() {
        assert_eq!(CatalogFilter::default().describe(), "");
        assert_eq!(
            CatalogFilter::new(Some("A".into()), Some("x".into())).describe(),
            " (Tag: A, Search: \"x\")"
        );
    }
}

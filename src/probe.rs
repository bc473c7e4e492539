// reeltag (video catalog builder and viewer)
// Copyright (C) 2025 Andrew Nissen

use crate::error::CatalogError;
use crate::names;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::warn;

/// Placeholder stored when the duration is unknown.
pub const UNKNOWN_LENGTH: &str = "-";

pub trait DurationProbe {
    /// Container duration in seconds.
    fn duration_seconds(&self, video_path: &Path) -> Result<f64, CatalogError>;
}

pub struct FfprobeProbe {
    ffprobe_path: PathBuf,
}

impl FfprobeProbe {
    pub fn new(ffprobe_path: PathBuf) -> Self {
        Self { ffprobe_path }
    }
}

impl DurationProbe for FfprobeProbe {
    fn duration_seconds(&self, video_path: &Path) -> Result<f64, CatalogError> {
        let failed = |reason: String| CatalogError::ProbeFailed {
            path: video_path.to_path_buf(),
            reason,
        };

        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "quiet", "-show_entries", "format=duration", "-of", "csv=p=0"])
            .arg(video_path)
            .output()
            .map_err(|e| failed(format!("failed to execute ffprobe: {}", e)))?;

        if !output.status.success() {
            let error_output = String::from_utf8_lossy(&output.stderr);
            return Err(failed(format!(
                "ffprobe exited with {}: {}",
                output.status,
                error_output.trim()
            )));
        }

        parse_duration(&String::from_utf8_lossy(&output.stdout)).map_err(failed)
    }
}

pub fn parse_duration(raw: &str) -> Result<f64, String> {
    let trimmed = raw.trim();
    let duration: f64 = trimmed
        .parse()
        .map_err(|_| format!("non-numeric duration '{}'", trimmed))?;

    if !duration.is_finite() || duration < 0.0 {
        return Err(format!("invalid duration '{}'", trimmed));
    }
    Ok(duration)
}

pub fn format_duration(duration: f64) -> String {
    let total = duration as u64;

    if total >= 3600 {
        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        if minutes > 0 {
            format!("{} hours {} minutes", hours, minutes)
        } else {
            format!("{} hours", hours)
        }
    } else if total >= 60 {
        let minutes = total / 60;
        let seconds = total % 60;
        if seconds > 0 {
            format!("{} minutes {} seconds", minutes, seconds)
        } else {
            format!("{} minutes", minutes)
        }
    } else {
        format!("{} seconds", total)
    }
}

/// Best-effort `video_length` value. Never fails: anything short of a clean
/// probe yields the placeholder. The flag is false only when a probe was
/// attempted and failed.
pub fn video_length(probe: &dyn DurationProbe, video_path: &Path) -> (String, bool) {
    if !names::is_video_extension(video_path) {
        return (UNKNOWN_LENGTH.to_string(), true);
    }

    match probe.duration_seconds(video_path) {
        Ok(duration) => (format_duration(duration), true),
        Err(e) => {
            warn!("{}", e);
            (UNKNOWN_LENGTH.to_string(), false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FixedProbe(Result<f64, ()>);

    impl DurationProbe for FixedProbe {
        fn duration_seconds(&self, video_path: &Path) -> Result<f64, CatalogError> {
            self.0.map_err(|_| CatalogError::ProbeFailed {
                path: video_path.to_path_buf(),
                reason: "stub".to_string(),
            })
        }
    }

    struct CountingProbe(Cell<usize>);

    impl DurationProbe for CountingProbe {
        fn duration_seconds(&self, _video_path: &Path) -> Result<f64, CatalogError> {
            self.0.set(self.0.get() + 1);
            Ok(1.0)
        }
    }

    #[test]
    fn test_format_duration_bands() {
        assert_eq!(format_duration(45.0), "45 seconds");
        assert_eq!(format_duration(90.0), "1 minutes 30 seconds");
        assert_eq!(format_duration(120.0), "2 minutes");
        assert_eq!(format_duration(3600.0), "1 hours");
        assert_eq!(format_duration(5400.0), "1 hours 30 minutes");
        assert_eq!(format_duration(3599.9), "59 minutes 59 seconds");
        assert_eq!(format_duration(59.99), "59 seconds");
        assert_eq!(format_duration(0.4), "0 seconds");
        assert_eq!(format_duration(7230.0), "2 hours");
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("12.500000\n"), Ok(12.5));
        assert!(parse_duration("N/A").is_err());
        assert!(parse_duration("").is_err());
        assert!(parse_duration("-3").is_err());
        assert!(parse_duration("inf").is_err());
    }

    #[test]
    fn test_video_length_falls_back_on_probe_failure() {
        let failing = FixedProbe(Err(()));
        let (length, ok) = video_length(&failing, Path::new("/v/a-b.mp4"));
        assert_eq!(length, UNKNOWN_LENGTH);
        assert!(!ok);

        let working = FixedProbe(Ok(5400.0));
        let (length, ok) = video_length(&working, Path::new("/v/a-b.mkv"));
        assert_eq!(length, "1 hours 30 minutes");
        assert!(ok);
    }

    #[test]
    fn test_non_video_skips_probe() {
        let probe = CountingProbe(Cell::new(0));
        let (length, _) = video_length(&probe, Path::new("/v/a-b.txt"));
        assert_eq!(length, UNKNOWN_LENGTH);
        assert_eq!(probe.0.get(), 0);
    }

    #[test]
    fn test_missing_ffprobe_binary_is_probe_failure() {
        let probe = FfprobeProbe::new(PathBuf::from("/definitely/not/ffprobe"));
        let result = probe.duration_seconds(Path::new("/v/a-b.mp4"));
        assert!(matches!(result, Err(CatalogError::ProbeFailed { .. })));
    }
}

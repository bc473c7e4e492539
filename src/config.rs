// reeltag (video catalog builder and viewer)
// Copyright (C) 2025 Andrew Nissen

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_NAME: &str = "reeltag";

fn data_root() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

fn default_folder_config_path() -> String {
    data_root()
        .join("json")
        .join("folder_path.json")
        .to_string_lossy()
        .to_string()
}

fn default_catalog_path() -> String {
    data_root()
        .join("json")
        .join("files_data.json")
        .to_string_lossy()
        .to_string()
}

fn default_log_dir() -> String {
    data_root().join("log").to_string_lossy().to_string()
}

fn default_pacing_ms() -> u64 {
    1000
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReeltagConfig {
    #[serde(default = "default_folder_config_path")]
    pub folder_config_path: String,
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,
    #[serde(default)]
    pub catalog_url: String,
    #[serde(default)]
    pub ffprobe_path: String,
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

impl Default for ReeltagConfig {
    fn default() -> Self {
        Self {
            folder_config_path: default_folder_config_path(),
            catalog_path: default_catalog_path(),
            catalog_url: String::new(),
            ffprobe_path: String::new(),
            pacing_ms: default_pacing_ms(),
            log_dir: default_log_dir(),
        }
    }
}

impl ReeltagConfig {
    /// Falls back to whatever `ffprobe` is on PATH, then to the bare name so
    /// the spawn error surfaces as a probe failure.
    pub fn resolve_ffprobe(&self) -> PathBuf {
        if !self.ffprobe_path.trim().is_empty() {
            return PathBuf::from(&self.ffprobe_path);
        }
        which::which("ffprobe").unwrap_or_else(|_| PathBuf::from("ffprobe"))
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }
}

pub fn load_config() -> Result<ReeltagConfig, CatalogError> {
    let cfg = if let Ok(config_path) = std::env::var("REELTAG_CONFIG_PATH") {
        confy::load_path(&config_path)?
    } else {
        confy::load(APP_NAME, "config")?
    };
    Ok(cfg)
}

pub fn store_config(config: &ReeltagConfig) -> Result<(), CatalogError> {
    if let Ok(config_path) = std::env::var("REELTAG_CONFIG_PATH") {
        confy::store_path(&config_path, config)?;
    } else {
        confy::store(APP_NAME, "config", config)?;
    }
    Ok(())
}

pub fn get_config_path() -> Result<PathBuf, CatalogError> {
    if let Ok(config_path) = std::env::var("REELTAG_CONFIG_PATH") {
        Ok(PathBuf::from(config_path))
    } else {
        Ok(confy::get_configuration_file_path(APP_NAME, "config")?)
    }
}

pub fn is_valid_config_field(field: &str) -> bool {
    matches!(
        field,
        "folder_config_path" | "catalog_path" | "catalog_url" | "ffprobe_path" | "pacing_ms" | "log_dir"
    )
}

pub fn set_config_field(cfg: &mut ReeltagConfig, field: &str, value: &str) -> Result<(), String> {
    match field {
        "folder_config_path" => cfg.folder_config_path = value.to_string(),
        "catalog_path" => cfg.catalog_path = value.to_string(),
        "catalog_url" => cfg.catalog_url = value.to_string(),
        "ffprobe_path" => cfg.ffprobe_path = value.to_string(),
        "log_dir" => cfg.log_dir = value.to_string(),
        "pacing_ms" => {
            cfg.pacing_ms = value
                .parse::<u64>()
                .map_err(|_| format!("Invalid number value for pacing_ms: {}", value))?;
        }
        _ => return Err(format!("Unknown field: {}", field)),
    }
    Ok(())
}

pub fn unset_config_field(cfg: &mut ReeltagConfig, field: &str) -> Result<(), String> {
    match field {
        "folder_config_path" => cfg.folder_config_path = default_folder_config_path(),
        "catalog_path" => cfg.catalog_path = default_catalog_path(),
        "catalog_url" => cfg.catalog_url = String::new(),
        "ffprobe_path" => cfg.ffprobe_path = String::new(),
        "pacing_ms" => cfg.pacing_ms = default_pacing_ms(),
        "log_dir" => cfg.log_dir = default_log_dir(),
        _ => return Err(format!("Unknown field: {}", field)),
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct FolderRoot {
    pub label: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DriveGroup {
    pub name: String,
    pub roots: Vec<FolderRoot>,
}

/// The `folder_path.json` document: groups and labels keep file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FolderConfig {
    pub groups: Vec<DriveGroup>,
}

impl FolderConfig {
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CatalogError::ConfigurationMissing {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => return Err(CatalogError::Io(e)),
        };

        Self::parse(&text).map_err(|reason| CatalogError::ConfigurationMalformed {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn parse(text: &str) -> Result<Self, String> {
        let value: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
        let Value::Object(groups) = value else {
            return Err("expected a JSON object keyed by group name".to_string());
        };

        let mut parsed = Vec::with_capacity(groups.len());
        for (name, group) in groups {
            let folders = group
                .get("folders")
                .and_then(Value::as_object)
                .ok_or_else(|| format!("group '{}' has no \"folders\" object", name))?;

            let mut roots = Vec::with_capacity(folders.len());
            for (label, path) in folders {
                let path = path.as_str().ok_or_else(|| {
                    format!("folder '{}' in group '{}' is not a path string", label, name)
                })?;
                roots.push(FolderRoot {
                    label: label.clone(),
                    path: PathBuf::from(path),
                });
            }

            parsed.push(DriveGroup { name, roots });
        }

        Ok(Self { groups: parsed })
    }

    pub fn add_folder(&mut self, group: &str, label: &str, path: &Path) {
        let root = FolderRoot {
            label: label.to_string(),
            path: path.to_path_buf(),
        };

        match self.groups.iter_mut().find(|g| g.name == group) {
            Some(existing) => match existing.roots.iter_mut().find(|r| r.label == label) {
                Some(slot) => *slot = root,
                None => existing.roots.push(root),
            },
            None => self.groups.push(DriveGroup {
                name: group.to_string(),
                roots: vec![root],
            }),
        }
    }

    pub fn root_count(&self) -> usize {
        self.groups.iter().map(|g| g.roots.len()).sum()
    }

    pub fn to_value(&self) -> Value {
        let mut groups = Map::new();
        for group in &self.groups {
            let mut folders = Map::new();
            for root in &group.roots {
                folders.insert(
                    root.label.clone(),
                    Value::String(root.path.to_string_lossy().to_string()),
                );
            }
            let mut body = Map::new();
            body.insert("folders".to_string(), Value::Object(folders));
            groups.insert(group.name.clone(), Value::Object(body));
        }
        Value::Object(groups)
    }

    pub fn store(&self, path: &Path) -> Result<(), CatalogError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.to_value())
            .map_err(|e| CatalogError::Io(e.into()))?;
        fs::write(path, json)?;
        Ok(())
    }
}

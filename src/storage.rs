// reeltag (video catalog builder and viewer)
// Copyright (C) 2025 Andrew Nissen

use crate::catalog::{self, CatalogEntry};
use crate::config::ReeltagConfig;
use crate::error::CatalogError;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Where a hosted catalog lives relative to the host root.
pub const CATALOG_RELATIVE_PATH: &str = "json/files_data.json";

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Read-only access to a catalog, wherever it is kept.
pub trait CatalogStore {
    fn location(&self) -> String;
    fn load(&self) -> Result<Vec<CatalogEntry>, CatalogError>;
}

pub struct LocalFileStore {
    path: PathBuf,
}

impl LocalFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl CatalogStore for LocalFileStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        catalog::read_catalog(&self.path)
    }
}

pub struct RemoteStore {
    url: String,
}

impl RemoteStore {
    pub fn new(base_url: &str) -> Self {
        Self {
            url: format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                CATALOG_RELATIVE_PATH
            ),
        }
    }
}

impl CatalogStore for RemoteStore {
    fn location(&self) -> String {
        self.url.clone()
    }

    fn load(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        let unavailable = |reason: String| CatalogError::CatalogUnavailable {
            location: self.url.clone(),
            reason,
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| unavailable(format!("could not build HTTP client: {}", e)))?;

        let response = client
            .get(&self.url)
            .send()
            .map_err(|e| unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(format!("HTTP {}", status)));
        }

        let body = response.text().map_err(|e| unavailable(e.to_string()))?;
        catalog::parse_catalog(&body).map_err(|e| unavailable(format!("invalid catalog JSON: {}", e)))
    }
}

/// Viewer-side settings: which backend to read through.
#[derive(Debug, Clone)]
pub struct ViewerContext {
    pub catalog_path: PathBuf,
    pub remote_url: Option<String>,
}

impl ViewerContext {
    pub fn from_config(cfg: &ReeltagConfig, remote_override: Option<String>) -> Self {
        let remote_url = remote_override
            .or_else(|| Some(cfg.catalog_url.clone()))
            .filter(|url| !url.trim().is_empty());

        Self {
            catalog_path: PathBuf::from(&cfg.catalog_path),
            remote_url,
        }
    }

    /// Picked once; callers never branch on the backend again.
    pub fn open_store(&self) -> Box<dyn CatalogStore> {
        match &self.remote_url {
            Some(url) => {
                info!("Reading catalog over HTTP from {}", url);
                Box::new(RemoteStore::new(url))
            }
            None => {
                info!("Reading catalog from {}", self.catalog_path.display());
                Box::new(LocalFileStore::new(self.catalog_path.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::entry;
    use std::net::{TcpListener, TcpStream};
    use std::path::Path;
    use std::thread;

    /// Hosts `catalog_path` with the catalog server on a free local port and
    /// returns its base URL once it accepts connections.
    fn serve_catalog(catalog_path: &Path) -> String {
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let figment = rocket::Config::figment()
            .merge(("address", "127.0.0.1"))
            .merge(("port", port))
            .merge(("log_level", "off"))
            .merge(("shutdown.ctrlc", false));
        let catalog_path = catalog_path.to_path_buf();

        thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let _ = rt.block_on(crate::web::build_rocket(figment, catalog_path).launch());
        });

        for _ in 0..100 {
            if TcpStream::connect(("127.0.0.1", port)).is_ok() {
                break;
            }
            thread::sleep(Duration::from_millis(50));
        }
        format!("http://127.0.0.1:{}", port)
    }

    #[test]
    fn test_remote_store_loads_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("files_data.json");
        let entries = vec![entry("A-1", "/v/A-1.mp4"), entry("B-2", "/v/B-2.mp4")];
        catalog::write_catalog(&path, &entries).unwrap();
        let base = serve_catalog(&path);

        let store = RemoteStore::new(&format!("{}/", base));
        assert!(store.location().ends_with("/json/files_data.json"));
        assert_eq!(store.load().unwrap(), entries);
    }

    #[test]
    fn test_remote_store_blank_catalog_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("files_data.json");
        std::fs::write(&path, "").unwrap();
        let base = serve_catalog(&path);

        assert!(RemoteStore::new(&base).load().unwrap().is_empty());
    }

    #[test]
    fn test_remote_store_non_success_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let base = serve_catalog(&dir.path().join("files_data.json"));
        let err = RemoteStore::new(&base).load().unwrap_err();
        match err {
            CatalogError::CatalogUnavailable { reason, .. } => assert!(reason.contains("404")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_remote_store_connection_refused_is_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = RemoteStore::new(&format!("http://{}", addr)).load().unwrap_err();
        assert!(matches!(err, CatalogError::CatalogUnavailable { .. }));
    }

    #[test]
    fn test_context_selects_backend() {
        let mut cfg = ReeltagConfig::default();
        let local = ViewerContext::from_config(&cfg, None);
        assert!(local.remote_url.is_none());

        cfg.catalog_url = "http://nas.local:8000".to_string();
        let remote = ViewerContext::from_config(&cfg, None);
        assert_eq!(remote.remote_url.as_deref(), Some("http://nas.local:8000"));
        assert!(remote.open_store().location().starts_with("http://nas.local:8000/"));

        let overridden = ViewerContext::from_config(&cfg, Some("http://other:1".to_string()));
        assert_eq!(overridden.remote_url.as_deref(), Some("http://other:1"));
    }

    #[test]
    fn test_local_store_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path().join("files_data.json"));
        assert!(matches!(
            store.load(),
            Err(CatalogError::CatalogUnavailable { .. })
        ));
    }
}

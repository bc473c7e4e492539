// reeltag (video catalog builder and viewer)
// Copyright (C) 2025 Andrew Nissen

use crate::catalog::{self, CatalogEntry};
use crate::filter::{self, CatalogFilter};
use rocket::http::ContentType;
use rocket::response::status::NotFound;
use rocket::serde::Serialize;
use rocket::serde::json::Json;
use rocket::{Build, Request, Rocket, State, catch, catchers, get, routes};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// The file being hosted; read on every request so a rebuild shows up
/// without restarting the server.
pub struct HostedCatalog {
    pub path: PathBuf,
}

impl HostedCatalog {
    async fn read_raw(&self) -> Result<String, String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| format!("{}: {}", self.path.display(), e))
    }

    async fn entries(&self) -> Result<Vec<CatalogEntry>, String> {
        let raw = self.read_raw().await?;
        catalog::parse_catalog(&raw).map_err(|e| format!("invalid catalog JSON: {}", e))
    }
}

#[get("/api/health")]
fn health() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::success("OK"))
}

#[get("/json/files_data.json")]
async fn files_data(
    hosted: &State<HostedCatalog>,
) -> Result<(ContentType, String), NotFound<String>> {
    match hosted.read_raw().await {
        Ok(raw) => Ok((ContentType::JSON, raw)),
        Err(e) => {
            warn!("Catalog requested but not readable: {}", e);
            Err(NotFound("catalog not found".to_string()))
        }
    }
}

#[get("/api/catalog?<tag>&<search>")]
async fn web_get_catalog(
    hosted: &State<HostedCatalog>,
    tag: Option<String>,
    search: Option<String>,
) -> Json<ApiResponse<Vec<CatalogEntry>>> {
    match hosted.entries().await {
        Ok(entries) => {
            let filter = CatalogFilter::new(tag, search);
            let visible = filter.apply(&entries).into_iter().cloned().collect();
            Json(ApiResponse::success(visible))
        }
        Err(e) => Json(ApiResponse::error(e)),
    }
}

#[get("/api/tags")]
async fn web_get_tags(hosted: &State<HostedCatalog>) -> Json<ApiResponse<Vec<String>>> {
    match hosted.entries().await {
        Ok(entries) => Json(ApiResponse::success(filter::tag_vocabulary(&entries))),
        Err(e) => Json(ApiResponse::error(e)),
    }
}

#[catch(404)]
fn not_found(req: &Request) -> Json<ApiResponse<()>> {
    Json(ApiResponse::error(format!("{} not found", req.uri().path())))
}

pub fn build_rocket(figment: rocket::figment::Figment, catalog_path: PathBuf) -> Rocket<Build> {
    rocket::custom(figment)
        .manage(HostedCatalog { path: catalog_path })
        .mount(
            "/",
            routes![health, files_data, web_get_catalog, web_get_tags],
        )
        .register("/", catchers![not_found])
}

pub async fn launch_server(host: &str, port: u16, catalog_path: PathBuf) -> Result<(), rocket::Error> {
    // Rocket's own logger would fight the tracing subscriber.
    let figment = rocket::Config::figment()
        .merge(("address", host))
        .merge(("port", port))
        .merge(("log_level", "off"));

    info!(
        "Serving {} at http://{}:{}/json/files_data.json",
        catalog_path.display(),
        host,
        port
    );

    build_rocket(figment, catalog_path).launch().await?;

    Ok(())
}

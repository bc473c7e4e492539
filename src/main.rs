// reeltag (video catalog builder and viewer)
// Copyright (C) 2025 Andrew Nissen

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use crate::builder::{BuildContext, CatalogBuilder};
use crate::cards::CatalogView;
use crate::config::{FolderConfig, ReeltagConfig};
use crate::error::CatalogError;
use crate::filter::CatalogFilter;
use crate::probe::FfprobeProbe;
use crate::storage::ViewerContext;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::error;

mod builder;
mod cards;
mod catalog;
mod config;
mod error;
mod filter;
mod logging;
mod names;
mod probe;
mod storage;
mod tui;
mod walker;
mod web;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Scan the configured folders and rewrite the catalog")]
    Build {
        #[arg(long, help = "Folder configuration to read instead of the configured one")]
        folders: Option<PathBuf>,
        #[arg(long, help = "Catalog file to write instead of the configured one")]
        output: Option<PathBuf>,
        #[arg(long, help = "Print the catalog to stdout without writing it")]
        dry_run: bool,
    },
    #[command(about = "Browse the catalog in an interactive terminal viewer")]
    View {
        #[arg(long, help = "Base URL of a hosted catalog to read instead of the local file")]
        remote: Option<String>,
    },
    #[command(about = "Print catalog entries as JSON, optionally filtered")]
    List {
        #[arg(short, long, help = "Only entries carrying exactly this tag")]
        tag: Option<String>,
        #[arg(short, long, help = "Case-insensitive text to match in names, paths and tags")]
        search: Option<String>,
        #[arg(long, help = "Base URL of a hosted catalog to read instead of the local file")]
        remote: Option<String>,
    },
    #[command(about = "Print every distinct tag in the catalog")]
    Tags {
        #[arg(long, help = "Base URL of a hosted catalog to read instead of the local file")]
        remote: Option<String>,
    },
    #[command(about = "Host the catalog file over HTTP")]
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value = "8000")]
        port: u16,
    },
    #[command(about = "Display or change configuration settings")]
    Config {
        #[command(subcommand)]
        config_command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    #[command(about = "Display current configuration settings")]
    Show,
    #[command(about = "Display path to configuration file")]
    Path,
    #[command(about = "Set a configuration field")]
    Set {
        #[arg(help = "Field name to set")]
        field: String,
        #[arg(help = "Value to set")]
        value: String,
    },
    #[command(about = "Unset/clear a configuration field")]
    Unset {
        #[arg(help = "Field name to unset")]
        field: String,
    },
    #[command(about = "Add a root folder to a group in the folder configuration")]
    AddFolder {
        #[arg(help = "Group name, e.g. D-Drive")]
        group: String,
        #[arg(help = "Folder to scan")]
        path: PathBuf,
        #[arg(long, help = "Label for the folder (defaults to the path)")]
        label: Option<String>,
    },
}

const VALID_FIELDS: &str =
    "folder_config_path, catalog_path, catalog_url, ffprobe_path, pacing_ms, log_dir";

fn run_build(
    cfg: &ReeltagConfig,
    folders: Option<PathBuf>,
    output: Option<PathBuf>,
    dry_run: bool,
) -> Result<(), CatalogError> {
    let mut ctx = BuildContext::from_config(cfg);
    if let Some(folders) = folders {
        ctx.folder_config_path = folders;
    }
    if let Some(output) = output {
        ctx.catalog_path = output;
    }

    let probe = FfprobeProbe::new(cfg.resolve_ffprobe());
    let builder = CatalogBuilder::new(ctx, Box::new(probe))?;

    if dry_run {
        let (entries, _) = builder.preview()?;
        let json = catalog::to_pretty_json(&entries).map_err(|e| CatalogError::Io(e.into()))?;
        println!("{}", json);
    } else {
        let report = builder.run()?;
        let json = serde_json::to_string_pretty(&report).map_err(|e| CatalogError::Io(e.into()))?;
        println!("{}", json);
    }

    Ok(())
}

fn load_view(cfg: &ReeltagConfig, remote: Option<String>) -> CatalogView {
    let ctx = ViewerContext::from_config(cfg, remote);
    CatalogView::new(ctx.open_store())
}

fn add_folder(
    cfg: &ReeltagConfig,
    group: &str,
    path: &Path,
    label: Option<String>,
) -> Result<FolderConfig, CatalogError> {
    let config_path = PathBuf::from(&cfg.folder_config_path);
    let mut folders = match FolderConfig::load(&config_path) {
        Ok(folders) => folders,
        Err(CatalogError::ConfigurationMissing { .. }) => FolderConfig::default(),
        Err(e) => return Err(e),
    };

    let label = label.unwrap_or_else(|| path.to_string_lossy().to_string());
    folders.add_folder(group, &label, path);
    folders.store(&config_path)?;
    Ok(folders)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let cfg = match config::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    };

    match args.command {
        Some(Commands::Build {
            folders,
            output,
            dry_run,
        }) => {
            let _guard = logging::init_logging(true, Some(Path::new(&cfg.log_dir)))?;
            if let Err(e) = run_build(&cfg, folders, output, dry_run) {
                error!(code = e.code(), fatal = e.is_fatal(), "{}", e);
                eprintln!("Error building catalog: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::View { remote }) => {
            // The terminal belongs to the viewer, so logs only go to file.
            let _guard = logging::init_logging(false, Some(Path::new(&cfg.log_dir)))?;
            let view = load_view(&cfg, remote);
            if let Err(e) = tui::run(view) {
                eprintln!("Error running TUI: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::List {
            tag,
            search,
            remote,
        }) => {
            let _guard = logging::init_logging(true, None)?;
            let mut view = load_view(&cfg, remote);
            if let Err(e) = view.reload() {
                eprintln!("Error loading catalog: {}", e);
                std::process::exit(1);
            }
            view.filter = CatalogFilter::new(tag, search);
            let json_output = serde_json::to_string_pretty(&view.visible())?;
            println!("{}", json_output);
        }
        Some(Commands::Tags { remote }) => {
            let _guard = logging::init_logging(true, None)?;
            let mut view = load_view(&cfg, remote);
            if let Err(e) = view.reload() {
                eprintln!("Error loading catalog: {}", e);
                std::process::exit(1);
            }
            for tag in view.vocabulary() {
                println!("{}", tag);
            }
        }
        Some(Commands::Serve { host, port }) => {
            let _guard = logging::init_logging(true, Some(Path::new(&cfg.log_dir)))?;
            println!(
                "Serving catalog on \x1b]8;;http://{}:{}/json/files_data.json\x1b\\http://{}:{}/json/files_data.json\x1b]8;;\x1b\\",
                host, port, host, port
            );

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(async {
                if let Err(e) =
                    web::launch_server(&host, port, PathBuf::from(&cfg.catalog_path)).await
                {
                    eprintln!("Error starting web server: {}", e);
                    std::process::exit(1);
                }
            });
        }
        Some(Commands::Config { config_command }) => match config_command {
            Some(ConfigCommands::Show) | None => {
                let json_output = serde_json::to_string_pretty(&cfg)?;
                println!("{}", json_output);
            }
            Some(ConfigCommands::Path) => {
                let config_path = config::get_config_path()?;
                println!("{}", config_path.display());
            }
            Some(ConfigCommands::Set { field, value }) => {
                if !config::is_valid_config_field(&field) {
                    eprintln!(
                        "Error: Unknown field '{}'. Valid fields are: {}",
                        field, VALID_FIELDS
                    );
                    std::process::exit(1);
                }

                let mut cfg = cfg;
                if let Err(e) = config::set_config_field(&mut cfg, &field, &value) {
                    eprintln!("Error setting field: {}", e);
                    std::process::exit(1);
                }

                config::store_config(&cfg)?;
                println!("Set {} = {}", field, value);
            }
            Some(ConfigCommands::Unset { field }) => {
                if !config::is_valid_config_field(&field) {
                    eprintln!(
                        "Error: Unknown field '{}'. Valid fields are: {}",
                        field, VALID_FIELDS
                    );
                    std::process::exit(1);
                }

                let mut cfg = cfg;
                if let Err(e) = config::unset_config_field(&mut cfg, &field) {
                    eprintln!("Error unsetting field: {}", e);
                    std::process::exit(1);
                }

                config::store_config(&cfg)?;
                println!("Unset {}", field);
            }
            Some(ConfigCommands::AddFolder { group, path, label }) => {
                match add_folder(&cfg, &group, &path, label) {
                    Ok(folders) => println!(
                        "Added {} to {} ({} roots configured)",
                        path.display(),
                        group,
                        folders.root_count()
                    ),
                    Err(e) => {
                        eprintln!("Error updating folder configuration: {}", e);
                        std::process::exit(1);
                    }
                }
            }
        },
        None => {}
    }

    Ok(())
}

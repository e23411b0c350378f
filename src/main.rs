// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! FOLIO - Portfolio showcase
//!
//! A desktop viewer for a portfolio of projects grouped by year, with
//! hover and click previews, inline editing behind a local admin password,
//! and the small REST API the viewer reads from and writes to.

mod admin;
mod app;
mod config;
mod controller;
mod error;
mod io;
mod models;
mod roadmap;
mod server;
mod store;
mod ui;
mod util;

use anyhow::{Context, Result};
use app::FolioApp;
use clap::{Parser, Subcommand};
use config::AppConfig;
use std::path::PathBuf;
use std::sync::Arc;
use store::{MemoryStore, ProjectStore};

#[derive(Parser)]
#[command(name = "folio", version, about = "Portfolio showcase viewer and API")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the viewer window (default)
    View {
        /// Use an existing API instead of the embedded server
        #[arg(long)]
        api_url: Option<String>,
        /// Open the admin password prompt on start
        #[arg(long)]
        admin: bool,
    },
    /// Run only the REST API
    Serve {
        #[arg(long)]
        bind: Option<String>,
        /// YAML or JSON project list to start from
        #[arg(long)]
        seed: Option<PathBuf>,
    },
    /// Write the seed project list to a YAML or JSON file
    Export {
        path: PathBuf,
        #[arg(long)]
        seed: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::View {
        api_url: None,
        admin: false,
    }) {
        Command::View { api_url, admin } => {
            match api_url {
                Some(url) => config.api_url = url,
                None if config.embedded_server => {
                    spawn_embedded_server(&config)?;
                    config.api_url = format!("http://{}", config.bind_addr);
                }
                None => {}
            }
            run_viewer(config, admin)
        }
        Command::Serve { bind, seed } => {
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            if seed.is_some() {
                config.seed_file = seed;
            }
            run_server(&config)
        }
        Command::Export { path, seed } => {
            if seed.is_some() {
                config.seed_file = seed;
            }
            let store = build_store(&config)?;
            io::serialization::export_projects(&store.list(), &path)?;
            log::info!("Exported projects to {}", path.display());
            Ok(())
        }
    }
}

/// Seed the in-memory store from the configured file, or the samples.
fn build_store(config: &AppConfig) -> Result<MemoryStore> {
    match config.seed_file {
        Some(ref path) => {
            let projects = io::serialization::import_projects(path)?;
            log::info!("Seeded {} projects from {}", projects.len(), path.display());
            Ok(MemoryStore::from_projects(projects))
        }
        None => Ok(MemoryStore::with_seed()),
    }
}

fn run_server(config: &AppConfig) -> Result<()> {
    let store: Arc<dyn ProjectStore> = Arc::new(build_store(config)?);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(server::serve(&config.bind_addr, store))
}

/// Run the API on its own thread for the life of the viewer.
fn spawn_embedded_server(config: &AppConfig) -> Result<()> {
    let store: Arc<dyn ProjectStore> = Arc::new(build_store(config)?);
    let bind_addr = config.bind_addr.clone();
    std::thread::Builder::new()
        .name("folio-api".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(e) => {
                    log::error!("Failed to start embedded server runtime: {}", e);
                    return;
                }
            };
            if let Err(e) = runtime.block_on(server::serve(&bind_addr, store)) {
                log::error!("Embedded server stopped: {:#}", e);
            }
        })
        .context("failed to spawn embedded server thread")?;
    Ok(())
}

fn run_viewer(config: AppConfig, open_admin: bool) -> Result<()> {
    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([360.0, 480.0])
            .with_title("Folio - Portfolio Showcase"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Folio",
        options,
        Box::new(move |cc| Ok(Box::new(FolioApp::new(cc, config, open_admin)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}

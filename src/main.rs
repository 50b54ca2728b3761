/*
 * Copyright 2026 Docmock Team
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use actix_web::web;
use anyhow::Context;
use clap::Parser;
use docmock::catalog::MockAdmin;
use docmock::config::ConfigLoader;
use docmock::server::{run_server, AppState};
use docmock::telemetry::{init_telemetry, shutdown_telemetry};
use docmock::utils::shutdown_signal;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config/docmock.yaml")]
    config: PathBuf,

    /// Overrides `server.port` from the config file.
    #[arg(short, long)]
    port: Option<u16>,

    #[arg(long, default_value = "false")]
    hot_reload: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ConfigLoader::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;

    if let Some(port) = args.port {
        config.server.port = port;
        ConfigLoader::validate(&config)?;
    }

    init_telemetry(&config.telemetry).await?;

    let state = web::Data::new(AppState::from_config(config)?);

    // Dropping the watcher stops the reloads.
    let _watcher = if args.hot_reload {
        start_hot_reload(&args.config, state.catalog.admin.clone())?
    } else {
        None
    };

    let server = run_server(state).await?;

    info!("Docmock server is running");
    info!("Press Ctrl+C to shutdown");

    let server_handle = server.handle();
    tokio::select! {
        _ = server => {
            info!("Server stopped");
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
            server_handle.stop(true).await;
            info!("Server shutdown complete");
        }
    }

    shutdown_telemetry().await;

    Ok(())
}

#[cfg(feature = "hot-reload")]
type ReloadWatcher = notify::RecommendedWatcher;

#[cfg(not(feature = "hot-reload"))]
type ReloadWatcher = ();

/// Re-seeds the store whenever the config file changes. Server and telemetry
/// settings need a restart.
#[cfg(feature = "hot-reload")]
fn start_hot_reload(config_path: &Path, admin: MockAdmin) -> anyhow::Result<Option<ReloadWatcher>> {
    use notify::{Event, EventKind, RecursiveMode, Watcher};

    let watched = config_path.to_path_buf();
    let file_name = watched.file_name().map(|name| name.to_os_string());

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        let event = match res {
            Ok(event) => event,
            Err(e) => {
                tracing::error!("Config watcher error: {}", e);
                return;
            }
        };

        if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
            return;
        }
        if !event
            .paths
            .iter()
            .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name)
        {
            return;
        }

        info!("Configuration file modified, reloading documents...");
        let reloaded = ConfigLoader::from_file(&watched).and_then(|config| {
            admin.seed(config.documents, config.mock.active_document.as_deref())
        });
        match reloaded {
            Ok(()) => info!("Documents reloaded successfully"),
            Err(e) => tracing::error!("Failed to reload configuration: {:#}", e),
        }
    })
    .context("Failed to create config watcher")?;

    // Editors often replace the file, so watch its directory.
    let dir = match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    watcher
        .watch(dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("Failed to watch {:?}", dir))?;

    info!("Hot reload enabled for {:?}", config_path);
    Ok(Some(watcher))
}

#[cfg(not(feature = "hot-reload"))]
fn start_hot_reload(_config_path: &Path, _admin: MockAdmin) -> anyhow::Result<Option<ReloadWatcher>> {
    info!("Hot reload feature is not enabled");
    Ok(None)
}

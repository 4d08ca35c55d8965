// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Headless cube capture client.
//! Streams camera frames to the vision service, lets the user fix the detected
//! colors in a text editor and prints the finished cube for the player.

mod app;
mod camera;
mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use cube_app_core::config::ConfigService;
use cube_app_core::config_port::ConfigPort;
use cube_app_core::prefs::ClientPrefs;
use cube_config_fs::FsConfigStore;
use cube_session_proto::{default_server_url, SERVER_URL_ENV};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::App;

#[derive(Parser, Debug)]
#[command(author, version, about = "Cube capture client (camera -> vision service -> editor -> play)")]
struct Args {
    /// Vision service websocket URL (overrides $CUBE_VISION_URL and saved prefs)
    #[arg(long)]
    server: Option<String>,
    /// Start a session for this cube size right away
    #[arg(long)]
    size: Option<u32>,
    /// Directory of png/jpeg frames used as the camera feed
    #[arg(long)]
    frames: Option<PathBuf>,
    /// Width in pixels of the capture and editor surfaces
    #[arg(long)]
    surface_width: Option<u32>,
    /// Delay between streamed frames in milliseconds
    #[arg(long)]
    frame_interval_ms: Option<u64>,
    /// Persist the effective settings as the new defaults
    #[arg(long)]
    save_prefs: bool,
    /// Read and write prefs here instead of the platform config dir
    #[arg(long)]
    config_dir: Option<PathBuf>,
}

impl Args {
    /// Layer flags and environment over saved prefs.
    fn apply(&self, mut prefs: ClientPrefs) -> ClientPrefs {
        if let Some(url) = self
            .server
            .clone()
            .or_else(|| std::env::var(SERVER_URL_ENV).ok())
        {
            prefs.server_url = url;
        }
        if let Some(size) = self.size {
            prefs.default_size = Some(size);
        }
        if let Some(dir) = &self.frames {
            prefs.frames_dir = Some(dir.clone());
        }
        if let Some(width) = self.surface_width.filter(|w| *w > 0) {
            prefs.surface_width = width;
        }
        if let Some(ms) = self.frame_interval_ms.filter(|ms| *ms > 0) {
            prefs.frame_interval_ms = ms;
        }
        prefs
    }
}

fn open_config(dir: Option<&PathBuf>) -> Option<ConfigService<FsConfigStore>> {
    match dir.map_or_else(FsConfigStore::new, FsConfigStore::with_base) {
        Ok(store) => Some(ConfigService::new(store)),
        Err(err) => {
            warn!(%err, "config store unavailable; using defaults");
            None
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = open_config(args.config_dir.as_ref());
    let saved = config
        .as_ref()
        .and_then(ConfigPort::load_prefs)
        .unwrap_or_else(|| ClientPrefs {
            server_url: default_server_url(),
            ..ClientPrefs::default()
        });
    let prefs = args.apply(saved);
    if args.save_prefs {
        if let Some(config) = &config {
            config.save_prefs(&prefs);
            info!("prefs saved");
        }
    }
    info!(server = %prefs.server_url, width = prefs.surface_width, interval_ms = prefs.frame_interval_ms, "starting");

    let app = App::connect(&prefs, std::io::stdout()).await;
    app.run(prefs.default_size).await
}

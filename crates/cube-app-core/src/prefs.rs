// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Saved preferences for the capture client.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Config key the client prefs are stored under.
pub const CLIENT_PREFS_KEY: &str = "client_prefs";

/// Saved preferences for one client installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientPrefs {
    /// Websocket URL of the vision service.
    pub server_url: String,
    /// Width in pixels of the capture and editor surfaces.
    pub surface_width: u32,
    /// Delay between streamed frames, in milliseconds.
    pub frame_interval_ms: u64,
    /// Cube size to start with automatically, if any.
    pub default_size: Option<u32>,
    /// Directory of still images used as the camera feed.
    pub frames_dir: Option<PathBuf>,
}

impl Default for ClientPrefs {
    fn default() -> Self {
        Self {
            server_url: String::from("ws://localhost:8080"),
            surface_width: 480,
            frame_interval_ms: 100,
            default_size: None,
            frames_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let prefs: ClientPrefs = serde_json::from_str(r#"{"surface_width": 640}"#).unwrap();
        assert_eq!(prefs.surface_width, 640);
        assert_eq!(prefs.frame_interval_ms, 100);
        assert_eq!(prefs.server_url, "ws://localhost:8080");
    }
}

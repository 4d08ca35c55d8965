// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Session wire schema for the cube vision service.
//!
//! Every message is a JSON object with a `type` discriminator. The client
//! opens a session with `init`, streams `frame`s while the camera is live and
//! asks for a final read with `finish`; the service answers with `cv_finish`.

use serde::{Deserialize, Serialize};

pub mod wire;

/// Environment variable consulted by [`default_server_url`].
pub const SERVER_URL_ENV: &str = "CUBE_VISION_URL";

/// Default websocket URL of the vision service.
///
/// Prefers `CUBE_VISION_URL` and falls back to the service's stock listener
/// on `localhost:8080`.
pub fn default_server_url() -> String {
    std::env::var(SERVER_URL_ENV).unwrap_or_else(|_| String::from("ws://localhost:8080"))
}

/// Requests sent from the client to the vision service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Start a session for an N×N×N cube (type = "init").
    Init {
        /// Cube side length, always ≥ 1.
        size: u32,
    },
    /// One captured image (type = "frame").
    Frame {
        /// Base64-encoded image bytes.
        data: String,
    },
    /// Ask the service to produce its final read (type = "finish").
    Finish,
}

impl ClientMessage {
    /// Wire discriminator for this message variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            ClientMessage::Init { .. } => "init",
            ClientMessage::Frame { .. } => "frame",
            ClientMessage::Finish => "finish",
        }
    }
}

/// Messages sent from the vision service to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Final capture result (type = "cv_finish").
    CvFinish {
        /// Flat color-state string of length 6·N².
        cube: String,
    },
    /// Any type this client does not understand. Ignored on receipt.
    #[serde(other)]
    Unknown,
}

impl ServerMessage {
    /// Wire discriminator for this message variant (`"unknown"` for unrecognised types).
    pub fn type_name(&self) -> &'static str {
        match self {
            ServerMessage::CvFinish { .. } => "cv_finish",
            ServerMessage::Unknown => "unknown",
        }
    }
}

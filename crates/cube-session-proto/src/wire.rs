// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! JSON framing helpers for the vision service envelopes.
//!
//! One websocket text message carries exactly one envelope. Both directions
//! are provided so tools and tests can stand in for either peer.

use thiserror::Error;

use crate::{ClientMessage, ServerMessage};

/// Errors raised while encoding or decoding an envelope.
#[derive(Debug, Error)]
pub enum WireError {
    /// The payload is not valid JSON or does not match the schema.
    #[error("malformed envelope: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The envelope is valid JSON but lacks a string `type` field.
    #[error("envelope has no `type` discriminator")]
    MissingType,
}

/// Encode a client request into its JSON text form.
pub fn encode_client(msg: &ClientMessage) -> Result<String, WireError> {
    Ok(serde_json::to_string(msg)?)
}

/// Decode a client request (service side).
pub fn decode_client(text: &str) -> Result<ClientMessage, WireError> {
    Ok(serde_json::from_str(text)?)
}

/// Encode a service response (service side).
pub fn encode_server(msg: &ServerMessage) -> Result<String, WireError> {
    Ok(serde_json::to_string(msg)?)
}

/// Decode a service response.
///
/// Unknown `type` values decode to [`ServerMessage::Unknown`]; an envelope
/// without a `type` string is rejected.
pub fn decode_server(text: &str) -> Result<ServerMessage, WireError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if !value.get("type").is_some_and(serde_json::Value::is_string) {
        return Err(WireError::MissingType);
    }
    Ok(serde_json::from_value(value)?)
}

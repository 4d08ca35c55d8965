// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Failure taxonomy of the session core. Nothing here is fatal.

use cube_app_core::toast::ToastKind;
use cube_model::{CubeSize, ModelError};
use thiserror::Error;

/// Rejected user action or channel event. The stage is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Cube size input was outside `1..=CubeSize::MAX`.
    #[error("cube size must be an integer from 1 to {max} (got {0})", max = CubeSize::MAX)]
    InvalidInput(i64),
    /// A send was attempted without a live vision channel.
    #[error("vision service unavailable: {0}")]
    ChannelUnavailable(String),
    /// Preconditions for the action are not met.
    #[error("not ready: {0}")]
    NotReady(String),
    /// Editing was finalized with facelets that do not decode to a color.
    #[error("cube is incomplete: {missing} facelet(s) still empty")]
    IncompleteState {
        /// Number of facelets without a canonical color.
        missing: usize,
    },
    /// A capture result or edit did not fit the cube model.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl SessionError {
    /// Severity used when the error is surfaced as a notification.
    pub fn toast_kind(&self) -> ToastKind {
        match self {
            SessionError::ChannelUnavailable(_) | SessionError::Model(_) => ToastKind::Error,
            SessionError::InvalidInput(_)
            | SessionError::NotReady(_)
            | SessionError::IncompleteState { .. } => ToastKind::Warn,
        }
    }
}

/// Camera acquisition or snapshot failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// No camera source exists on this platform/configuration.
    #[error("camera unsupported: {0}")]
    Unsupported(String),
    /// A camera exists but access was refused.
    #[error("camera access denied: {0}")]
    Denied(String),
    /// The live source failed to produce a frame.
    #[error("snapshot failed: {0}")]
    Snapshot(String),
}

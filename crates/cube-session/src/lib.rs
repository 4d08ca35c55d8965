// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Session core of the cube capture client.
//!
//! [`SessionMachine`] owns the active stage and sequences the capture
//! session, the vision channel and the facelet editor. All work happens on
//! one thread in response to events; the only asynchronous edges are camera
//! acquisition (completed via [`SessionEvent::CameraReady`]) and the frame
//! cadence (driven via [`SessionEvent::FrameDue`]).

pub mod capture;
pub mod error;
pub mod machine;
pub mod surface;
pub mod vision;

pub use capture::{AcquireOutcome, AcquireTicket, CaptureSession, MediaSource};
pub use error::{CaptureError, SessionError};
pub use machine::{SessionEffect, SessionEvent, SessionMachine, Stage};
pub use surface::{EditSurface, FaceletCell, RenderPort};
pub use vision::VisionChannel;

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Camera ownership and frame cadence for the VideoStream stage.
//!
//! Acquisition is asynchronous: [`CaptureSession::acquire`] hands out a
//! ticket, the runtime resolves it, and [`CaptureSession::complete_acquire`]
//! attaches the source only if that ticket is still current. Every
//! [`CaptureSession::release`] invalidates outstanding tickets, so a camera
//! that shows up after the user navigated away is stopped on arrival.
//!
//! Streaming is a deadline, not a timer callback: the runtime sleeps until
//! [`CaptureSession::next_frame_due`] and then asks for the frame. Stopping
//! clears the deadline in the same call, so no frame is produced after stop.

use std::time::{Duration, Instant};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

use crate::error::{CaptureError, SessionError};

/// A live camera feed attached to the capture surface.
pub trait MediaSource {
    /// Draw the current frame into a surface `width` pixels wide (height
    /// follows the feed's aspect ratio) and export it as an encoded image.
    fn capture_frame(&mut self, width: u32) -> Result<Vec<u8>, CaptureError>;
    /// Stop every media track. Must be idempotent.
    fn stop(&mut self);
}

/// Handle for one outstanding camera acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquireTicket {
    epoch: u64,
}

/// Result of resolving an acquisition ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// The source is now attached.
    Attached,
    /// The ticket was superseded or the stage changed; the source was stopped.
    Stale,
    /// Acquisition failed; the session stays usable but cannot stream.
    Failed(CaptureError),
}

#[derive(Debug, Clone, Copy)]
struct Cadence {
    next_due: Instant,
}

/// Owns at most one camera source and one streaming cadence.
pub struct CaptureSession {
    source: Option<Box<dyn MediaSource>>,
    pending: Option<AcquireTicket>,
    epoch: u64,
    cadence: Option<Cadence>,
    interval: Duration,
    surface_width: u32,
}

impl CaptureSession {
    /// New, idle capture session.
    pub fn new(surface_width: u32, interval: Duration) -> Self {
        Self {
            source: None,
            pending: None,
            epoch: 0,
            cadence: None,
            interval,
            surface_width,
        }
    }

    /// Request a camera. Returns `None` when a source is already attached or
    /// an acquisition is already in flight.
    pub fn acquire(&mut self) -> Option<AcquireTicket> {
        if self.source.is_some() || self.pending.is_some() {
            return None;
        }
        let ticket = AcquireTicket { epoch: self.epoch };
        self.pending = Some(ticket);
        Some(ticket)
    }

    /// Resolve an acquisition. `in_video` must say whether the session is
    /// still in the VideoStream stage right now.
    pub fn complete_acquire(
        &mut self,
        ticket: AcquireTicket,
        result: Result<Box<dyn MediaSource>, CaptureError>,
        in_video: bool,
    ) -> AcquireOutcome {
        let current = self.pending == Some(ticket);
        if current {
            self.pending = None;
        }
        match result {
            Ok(mut source) => {
                if current && in_video && self.source.is_none() {
                    self.source = Some(source);
                    AcquireOutcome::Attached
                } else {
                    source.stop();
                    AcquireOutcome::Stale
                }
            }
            Err(err) if current => AcquireOutcome::Failed(err),
            Err(_) => AcquireOutcome::Stale,
        }
    }

    /// Begin streaming. The first frame is due immediately.
    pub fn start_streaming(&mut self, connected: bool, now: Instant) -> Result<(), SessionError> {
        if self.source.is_none() {
            return Err(SessionError::NotReady("camera is not attached".into()));
        }
        if !connected {
            return Err(SessionError::NotReady(
                "vision service is not connected".into(),
            ));
        }
        if self.cadence.is_some() {
            return Err(SessionError::NotReady("already streaming".into()));
        }
        self.cadence = Some(Cadence { next_due: now });
        debug!(interval_ms = self.interval.as_millis() as u64, "streaming started");
        Ok(())
    }

    /// Stop streaming. Returns whether streaming was active; safe to call anytime.
    pub fn stop_streaming(&mut self) -> bool {
        self.cadence.take().is_some()
    }

    /// Deadline of the next frame, or `None` when not streaming.
    pub fn next_frame_due(&self) -> Option<Instant> {
        self.cadence.map(|c| c.next_due)
    }

    /// Capture the frame due at `now`, base64-encoded.
    ///
    /// Returns `None` when not streaming or the deadline has not passed. The
    /// next deadline is one interval after `now`.
    pub fn capture_due_frame(&mut self, now: Instant) -> Option<Result<String, CaptureError>> {
        let cadence = self.cadence.as_mut()?;
        if now < cadence.next_due {
            return None;
        }
        cadence.next_due = now + self.interval;
        let Some(source) = self.source.as_mut() else {
            self.cadence = None;
            return None;
        };
        Some(
            source
                .capture_frame(self.surface_width)
                .map(|bytes| STANDARD.encode(bytes)),
        )
    }

    /// Stop every track, clear the cadence and invalidate pending tickets.
    pub fn release(&mut self) {
        self.cadence = None;
        self.pending = None;
        self.epoch += 1;
        if let Some(mut source) = self.source.take() {
            source.stop();
        }
    }

    /// Update the capture surface width.
    pub fn set_surface_width(&mut self, width: u32) {
        self.surface_width = width;
    }

    /// Whether a source is attached.
    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Whether an acquisition is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether the streaming flag is set.
    pub fn is_streaming(&self) -> bool {
        self.cadence.is_some()
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.release();
    }
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Stage transitions for one capture session.
//!
//! Exactly one [`Stage`] is active. Every transition exits the current stage
//! (releasing what it holds) before running the single entry effect of the
//! next one, so camera, cadence and editor never outlive their stage.
//! Work the runtime has to do on the machine's behalf comes back as
//! [`SessionEffect`]s.

use std::fmt;
use std::time::{Duration, Instant};

use cube_app_core::toast::NotifyPort;
use cube_model::{ColorLabel, CubeSize, CubeState, GridLayout};
use cube_session_client::tool::VisionPort;
use cube_session_proto::ServerMessage;
use tracing::{debug, info, warn};

use crate::capture::{AcquireOutcome, AcquireTicket, CaptureSession, MediaSource};
use crate::error::{CaptureError, SessionError};
use crate::surface::EditSurface;
use crate::vision::VisionChannel;

/// Active stage of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stage {
    /// Nothing live; waiting for a cube size.
    #[default]
    Home,
    /// Camera feed shown, frames streamed to the vision service on request.
    VideoStream,
    /// Facelet editor shown.
    CubeEdit,
    /// Finished state handed to the visualizer.
    CubePlay,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Home => "home",
            Stage::VideoStream => "video-stream",
            Stage::CubeEdit => "cube-edit",
            Stage::CubePlay => "cube-play",
        };
        f.write_str(name)
    }
}

/// Inputs to the session: user actions and runtime completions.
pub enum SessionEvent {
    /// Begin a new session with the raw size the user entered.
    Start {
        /// Requested side length.
        size: i64,
    },
    /// Switch to the camera view.
    OpenCapture,
    /// Switch to the facelet editor.
    OpenEditor,
    /// Return to the start screen.
    GoHome,
    /// Start shipping frames to the vision service.
    StartStreaming,
    /// Stop streaming and move on to editing.
    FinishCapture,
    /// A camera acquisition resolved.
    CameraReady {
        /// Ticket from the matching [`SessionEffect::AcquireCamera`].
        ticket: AcquireTicket,
        /// The acquired source, or why none is available.
        result: Result<Box<dyn MediaSource>, CaptureError>,
    },
    /// The frame deadline passed.
    FrameDue,
    /// Message from the vision service.
    Inbound(ServerMessage),
    /// Choose the color applied by [`SessionEvent::Click`].
    SelectPaint(ColorLabel),
    /// Paint one facelet by index.
    Paint {
        /// Flat facelet index.
        facelet: usize,
        /// New color.
        color: ColorLabel,
    },
    /// Click on the editor surface with the selected paint.
    Click {
        /// Surface x.
        x: u32,
        /// Surface y.
        y: u32,
    },
    /// Validate the edit and hand the cube off.
    FinishEditing,
    /// The drawing surface changed width.
    Resize {
        /// New width in pixels.
        surface_width: u32,
    },
}

impl SessionEvent {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::Start { .. } => "start",
            SessionEvent::OpenCapture => "open_capture",
            SessionEvent::OpenEditor => "open_editor",
            SessionEvent::GoHome => "go_home",
            SessionEvent::StartStreaming => "start_streaming",
            SessionEvent::FinishCapture => "finish_capture",
            SessionEvent::CameraReady { .. } => "camera_ready",
            SessionEvent::FrameDue => "frame_due",
            SessionEvent::Inbound(_) => "inbound",
            SessionEvent::SelectPaint(_) => "select_paint",
            SessionEvent::Paint { .. } => "paint",
            SessionEvent::Click { .. } => "click",
            SessionEvent::FinishEditing => "finish_editing",
            SessionEvent::Resize { .. } => "resize",
        }
    }
}

impl fmt::Debug for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Work requested from the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    /// Acquire a camera and answer with [`SessionEvent::CameraReady`].
    AcquireCamera(AcquireTicket),
    /// The editor surface changed and should be drawn.
    Redraw,
    /// Pass the externally oriented label string to the visualizer.
    Handoff {
        /// Output of [`CubeState::to_external_orientation`].
        external: String,
    },
}

/// Owned session controller.
pub struct SessionMachine<V, N> {
    stage: Stage,
    size: Option<CubeSize>,
    cube: Option<CubeState>,
    editor: Option<EditSurface>,
    paint: Option<ColorLabel>,
    surface_width: u32,
    // set once streaming starts; cleared only when `finish` is delivered or
    // the capture is abandoned
    finish_owed: bool,
    capture: CaptureSession,
    vision: VisionChannel<V>,
    notifier: N,
}

impl<V: VisionPort, N: NotifyPort> SessionMachine<V, N> {
    /// New machine in [`Stage::Home`].
    pub fn new(port: V, notifier: N, surface_width: u32, frame_interval: Duration) -> Self {
        Self {
            stage: Stage::Home,
            size: None,
            cube: None,
            editor: None,
            paint: None,
            surface_width,
            finish_owed: false,
            capture: CaptureSession::new(surface_width, frame_interval),
            vision: VisionChannel::new(port),
            notifier,
        }
    }

    /// Handle an event, reporting failures to the notifier.
    pub fn dispatch(&mut self, ev: SessionEvent, now: Instant) -> Vec<SessionEffect> {
        let name = ev.name();
        match self.handle(ev, now) {
            Ok(fx) => fx,
            Err(err) => {
                warn!(event = name, stage = %self.stage, %err, "event rejected");
                self.notifier.notify(err.toast_kind(), &err.to_string());
                Vec::new()
            }
        }
    }

    /// Handle an event. On error the session is left as it was.
    pub fn handle(
        &mut self,
        ev: SessionEvent,
        now: Instant,
    ) -> Result<Vec<SessionEffect>, SessionError> {
        match ev {
            SessionEvent::Start { size } => {
                if self.stage != Stage::Home {
                    return Err(SessionError::NotReady(format!(
                        "a session is active ({}); go home first",
                        self.stage
                    )));
                }
                let size = CubeSize::new(size).map_err(|_| SessionError::InvalidInput(size))?;
                self.vision.send_init(size)?;
                info!(%size, "session started");
                self.size = Some(size);
                self.cube = None;
                self.paint = None;
                Ok(self.enter(Stage::VideoStream, true))
            }
            SessionEvent::OpenCapture => {
                self.require_session()?;
                Ok(self.enter(Stage::VideoStream, true))
            }
            SessionEvent::OpenEditor => {
                self.require_session()?;
                Ok(self.enter(Stage::CubeEdit, true))
            }
            SessionEvent::GoHome => Ok(self.enter(Stage::Home, true)),
            SessionEvent::StartStreaming => {
                self.require_stage(Stage::VideoStream)?;
                self.capture
                    .start_streaming(self.vision.is_connected(), now)?;
                self.finish_owed = true;
                Ok(Vec::new())
            }
            SessionEvent::FinishCapture => {
                self.require_stage(Stage::VideoStream)?;
                self.capture.stop_streaming();
                if self.finish_owed {
                    self.vision.send_finish()?;
                    self.finish_owed = false;
                }
                Ok(self.enter(Stage::CubeEdit, false))
            }
            SessionEvent::CameraReady { ticket, result } => {
                let in_video = self.stage == Stage::VideoStream;
                match self.capture.complete_acquire(ticket, result, in_video) {
                    AcquireOutcome::Attached => info!("camera attached"),
                    AcquireOutcome::Stale => debug!("late camera released"),
                    AcquireOutcome::Failed(err) => warn!(%err, "camera unavailable"),
                }
                Ok(Vec::new())
            }
            SessionEvent::FrameDue => {
                match self.capture.capture_due_frame(now) {
                    None => {}
                    Some(Ok(data)) => {
                        debug!(bytes = data.len(), "frame");
                        if let Err(err) = self.vision.send_frame(data) {
                            self.capture.stop_streaming();
                            return Err(err);
                        }
                    }
                    Some(Err(err)) => warn!(%err, "frame skipped"),
                }
                Ok(Vec::new())
            }
            SessionEvent::Inbound(msg) => {
                let Some(labels) = self.vision.react(msg) else {
                    return Ok(Vec::new());
                };
                self.accept_result(&labels)
            }
            SessionEvent::SelectPaint(color) => {
                self.paint = Some(color);
                Ok(Vec::new())
            }
            SessionEvent::Paint { facelet, color } => self.paint_facelet(facelet, color),
            SessionEvent::Click { x, y } => {
                self.require_stage(Stage::CubeEdit)?;
                let color = self
                    .paint
                    .ok_or_else(|| SessionError::NotReady("no paint color selected".into()))?;
                let hit = self.editor.as_ref().and_then(|e| e.hit_test(x, y));
                hit.map_or_else(|| Ok(Vec::new()), |facelet| self.paint_facelet(facelet, color))
            }
            SessionEvent::FinishEditing => {
                self.require_stage(Stage::CubeEdit)?;
                let Some(editor) = self.editor.as_ref() else {
                    return Err(SessionError::NotReady("editor is not built".into()));
                };
                self.cube = Some(editor.to_state()?);
                Ok(self.enter(Stage::CubePlay, true))
            }
            SessionEvent::Resize { surface_width } => {
                self.surface_width = surface_width;
                self.capture.set_surface_width(surface_width);
                if self.stage == Stage::CubeEdit {
                    self.build_editor();
                    return Ok(vec![SessionEffect::Redraw]);
                }
                Ok(Vec::new())
            }
        }
    }

    /// Active stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Cube size of the current session.
    pub fn size(&self) -> Option<CubeSize> {
        self.size
    }

    /// Current color state, once one exists.
    pub fn cube(&self) -> Option<&CubeState> {
        self.cube.as_ref()
    }

    /// Editor surface while in [`Stage::CubeEdit`].
    pub fn editor(&self) -> Option<&EditSurface> {
        self.editor.as_ref()
    }

    /// Paint color used by clicks.
    pub fn paint(&self) -> Option<ColorLabel> {
        self.paint
    }

    /// Camera and cadence state.
    pub fn capture(&self) -> &CaptureSession {
        &self.capture
    }

    /// Vision transport.
    pub fn vision_port(&self) -> &V {
        self.vision.port()
    }

    /// Vision transport, mutably.
    pub fn vision_port_mut(&mut self) -> &mut V {
        self.vision.port_mut()
    }

    /// Notification sink.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Notification sink, mutably.
    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Install a fresh transport, dropping the old one.
    ///
    /// The service keeps session state per connection, so an existing
    /// session is announced again with `init`. Streaming stops and any owed
    /// `finish` is forgotten since it belonged to the old connection. If the
    /// new transport cannot take the `init`, the session is abandoned and the
    /// machine returns to [`Stage::Home`].
    pub fn reconnect(&mut self, port: V) -> Result<(), SessionError> {
        self.capture.stop_streaming();
        self.finish_owed = false;
        self.vision.replace_port(port);
        let Some(size) = self.size else {
            return Ok(());
        };
        if let Err(err) = self.vision.send_init(size) {
            warn!(%size, "session dropped after reconnect");
            self.enter(Stage::Home, false);
            self.size = None;
            self.cube = None;
            self.paint = None;
            return Err(err);
        }
        info!(%size, stage = %self.stage, "session announced on new connection");
        Ok(())
    }

    fn require_session(&self) -> Result<CubeSize, SessionError> {
        self.size
            .ok_or_else(|| SessionError::NotReady("no session; start one first".into()))
    }

    fn require_stage(&self, stage: Stage) -> Result<(), SessionError> {
        if self.stage == stage {
            Ok(())
        } else {
            Err(SessionError::NotReady(format!(
                "only available in {stage} (now {})",
                self.stage
            )))
        }
    }

    fn accept_result(&mut self, labels: &str) -> Result<Vec<SessionEffect>, SessionError> {
        match self.stage {
            Stage::VideoStream | Stage::CubeEdit => {
                let size = self.require_session()?;
                let cube = CubeState::from_labels(size, labels)?;
                info!(stage = %self.stage, "capture result received");
                self.cube = Some(cube);
                Ok(self.enter(Stage::CubeEdit, false))
            }
            Stage::Home | Stage::CubePlay => {
                debug!(stage = %self.stage, "capture result ignored");
                Ok(Vec::new())
            }
        }
    }

    fn paint_facelet(
        &mut self,
        facelet: usize,
        color: ColorLabel,
    ) -> Result<Vec<SessionEffect>, SessionError> {
        self.require_stage(Stage::CubeEdit)?;
        let (Some(cube), Some(editor)) = (self.cube.as_mut(), self.editor.as_mut()) else {
            return Err(SessionError::NotReady("editor is not built".into()));
        };
        cube.set(facelet, color)?;
        editor.update(facelet, color)?;
        Ok(vec![SessionEffect::Redraw])
    }

    fn build_editor(&mut self) {
        let Some(size) = self.size else { return };
        let cube = self.cube.get_or_insert_with(|| CubeState::empty(size));
        self.editor = Some(EditSurface::build(
            GridLayout::new(size, self.surface_width),
            cube,
        ));
    }

    /// Exit the current stage, then run the entry effect of `next`.
    ///
    /// `send_finish` is false when the service already ended the capture.
    fn enter(&mut self, next: Stage, send_finish: bool) -> Vec<SessionEffect> {
        let prev = self.stage;
        match prev {
            Stage::VideoStream => {
                self.capture.stop_streaming();
                if std::mem::take(&mut self.finish_owed) && send_finish {
                    if let Err(err) = self.vision.send_finish() {
                        warn!(%err, "finish not delivered on exit");
                    }
                }
                self.capture.release();
            }
            Stage::CubeEdit => self.editor = None,
            Stage::Home | Stage::CubePlay => {}
        }
        self.stage = next;
        info!(from = %prev, to = %next, "stage");

        let mut fx = Vec::new();
        match next {
            Stage::Home => {}
            Stage::VideoStream => {
                fx.extend(self.capture.acquire().map(SessionEffect::AcquireCamera));
            }
            Stage::CubeEdit => {
                self.build_editor();
                fx.push(SessionEffect::Redraw);
            }
            Stage::CubePlay => {
                if let Some(cube) = self.cube.as_ref() {
                    fx.push(SessionEffect::Handoff {
                        external: cube.to_external_orientation(),
                    });
                }
            }
        }
        fx
    }
}

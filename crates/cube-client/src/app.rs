// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Single-threaded event loop around the session machine.
//!
//! One `select!` multiplexes stdin commands, vision service messages,
//! pending camera acquisitions and the next frame deadline. Every input
//! becomes a [`SessionEvent`]; the returned effects are carried out here.

// Runs on a current-thread runtime; camera sources are not `Send`.
#![allow(clippy::future_not_send)]

use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use cube_app_core::prefs::ClientPrefs;
use cube_app_core::toast::{NotifyPort, ToastId, ToastKind, ToastService};
use cube_session::{
    AcquireTicket, CaptureError, MediaSource, RenderPort, SessionEffect, SessionEvent,
    SessionMachine,
};
use cube_session_client::{connect_channels, tool::ChannelSession};
use futures_util::future::{FutureExt, LocalBoxFuture};
use futures_util::stream::{FuturesUnordered, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use crate::camera;
use crate::commands::{self, Command, HELP};
use crate::render::TextRenderer;

type Acquisition = LocalBoxFuture<'static, (AcquireTicket, Result<Box<dyn MediaSource>, CaptureError>)>;

const MAX_TOASTS: usize = 8;

enum Input {
    Line(String),
    Event(SessionEvent),
}

/// Connect to the vision service, falling back to a disconnected session.
async fn connect(url: &str) -> ChannelSession {
    match connect_channels(url).await {
        Ok(session) => session,
        Err(err) => {
            warn!(url, error = %format!("{err:#}"), "vision service unreachable; sends will fail until `connect`");
            ChannelSession::new()
        }
    }
}

async fn frame_deadline(due: Option<Instant>) {
    if let Some(due) = due {
        tokio::time::sleep_until(tokio::time::Instant::from_std(due)).await;
    } else {
        std::future::pending::<()>().await;
    }
}

/// Client state owned by the loop.
pub struct App<W: Write> {
    machine: SessionMachine<ChannelSession, ToastService>,
    renderer: TextRenderer<W>,
    acquisitions: FuturesUnordered<Acquisition>,
    frames_dir: Option<PathBuf>,
    server_url: String,
    toasts_seen: ToastId,
}

impl<W: Write> App<W> {
    /// Build the client from effective preferences, connecting to the service.
    pub async fn connect(prefs: &ClientPrefs, out: W) -> Self {
        let port = connect(&prefs.server_url).await;
        let machine = SessionMachine::new(
            port,
            ToastService::new(MAX_TOASTS),
            prefs.surface_width,
            Duration::from_millis(prefs.frame_interval_ms),
        );
        Self {
            machine,
            renderer: TextRenderer::new(out),
            acquisitions: FuturesUnordered::new(),
            frames_dir: prefs.frames_dir.clone(),
            server_url: prefs.server_url.clone(),
            toasts_seen: 0,
        }
    }

    /// Run until `quit` or end of input.
    pub async fn run(mut self, auto_start: Option<u32>) -> Result<()> {
        if let Some(size) = auto_start {
            self.apply(SessionEvent::Start {
                size: i64::from(size),
            });
        }
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            let due = self.machine.capture().next_frame_due();
            let pending = !self.acquisitions.is_empty();
            let input = tokio::select! {
                line = lines.next_line() => match line? {
                    Some(line) => Input::Line(line),
                    None => break,
                },
                msg = self.machine.vision_port_mut().recv() => match msg {
                    Some(msg) => Input::Event(SessionEvent::Inbound(msg)),
                    None => {
                        warn!("vision service disconnected");
                        self.machine
                            .notifier_mut()
                            .notify(ToastKind::Error, "vision service disconnected");
                        self.flush_toasts();
                        continue;
                    }
                },
                Some((ticket, result)) = self.acquisitions.next(), if pending => {
                    Input::Event(SessionEvent::CameraReady { ticket, result })
                }
                () = frame_deadline(due) => Input::Event(SessionEvent::FrameDue),
            };

            match input {
                Input::Event(ev) => self.apply(ev),
                Input::Line(line) => {
                    if !self.command(commands::parse(&line)).await {
                        break;
                    }
                }
            }
        }

        // leaving releases the camera and ends an active stream
        self.apply(SessionEvent::GoHome);
        info!("bye");
        Ok(())
    }

    /// Handle one parsed command. Returns false when the loop should end.
    async fn command(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Quit => return false,
            Command::Empty => {}
            Command::Help => self.renderer.line(HELP),
            Command::Show => {
                if let Some(editor) = self.machine.editor() {
                    self.renderer.draw(editor);
                } else {
                    let stage = self.machine.stage();
                    self.renderer.line(&format!("stage: {stage}"));
                }
            }
            Command::Connect => {
                self.machine.vision_port_mut().disconnect();
                let session = connect(&self.server_url).await;
                if let Err(err) = self.machine.reconnect(session) {
                    self.machine
                        .notifier_mut()
                        .notify(err.toast_kind(), &err.to_string());
                }
            }
            Command::Unknown { input } => {
                self.machine
                    .notifier_mut()
                    .notify(ToastKind::Warn, &format!("unknown command {input:?}; try `help`"));
            }
            Command::InvalidArgs { command, error } => {
                self.machine
                    .notifier_mut()
                    .notify(ToastKind::Warn, &format!("{command}: {error}"));
            }
            other => {
                if let Some(ev) = other.into_event() {
                    self.apply(ev);
                }
            }
        }
        self.flush_toasts();
        true
    }

    /// Feed an event to the session and carry out its effects.
    fn apply(&mut self, ev: SessionEvent) {
        for effect in self.machine.dispatch(ev, Instant::now()) {
            match effect {
                SessionEffect::AcquireCamera(ticket) => {
                    let dir = self.frames_dir.clone();
                    self.acquisitions
                        .push(async move { (ticket, camera::acquire(dir).await) }.boxed_local());
                }
                SessionEffect::Redraw => {
                    if let Some(editor) = self.machine.editor() {
                        self.renderer.draw(editor);
                    }
                }
                SessionEffect::Handoff { external } => self.renderer.handoff(&external),
            }
        }
        self.flush_toasts();
    }

    /// Log toasts raised since the last flush and drop expired ones.
    fn flush_toasts(&mut self) {
        let now = Instant::now();
        let notifier = self.machine.notifier_mut();
        for toast in notifier.visible(now) {
            if toast.id <= self.toasts_seen {
                continue;
            }
            self.toasts_seen = toast.id;
            match toast.kind {
                ToastKind::Info => info!(toast = %toast.message),
                ToastKind::Warn => warn!(toast = %toast.message),
                ToastKind::Error => error!(toast = %toast.message),
            }
        }
        notifier.retain_visible(now);
    }
}

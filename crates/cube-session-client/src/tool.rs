// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Tool-facing session adapter: channels + port trait.
//!
//! `VisionPort` is what the session core talks to; `ChannelSession` is the
//! channel-backed implementation returned by [`crate::connect_channels`].
//! Tools can depend on this API without knowing about the socket framing.

use anyhow::{anyhow, Result};
use cube_session_proto::{ClientMessage, ServerMessage};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Abstract port for sending requests to the vision service.
pub trait VisionPort {
    /// Queue one request. Fails when no live channel exists.
    fn send(&mut self, msg: ClientMessage) -> Result<()>;
    /// Whether a live channel exists right now.
    fn is_connected(&self) -> bool;
}

/// Simple channel-backed session adapter for tools.
#[derive(Default)]
pub struct ChannelSession {
    out_tx: Option<UnboundedSender<ClientMessage>>,
    in_rx: Option<UnboundedReceiver<ServerMessage>>,
}

impl ChannelSession {
    /// Construct a disconnected adapter; every send fails until channels are installed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct an adapter over existing channels.
    pub fn with_channels(
        out_tx: UnboundedSender<ClientMessage>,
        in_rx: UnboundedReceiver<ServerMessage>,
    ) -> Self {
        Self {
            out_tx: Some(out_tx),
            in_rx: Some(in_rx),
        }
    }

    /// Wait for the next inbound message.
    ///
    /// Returns `None` once when the service side goes away; afterwards (and
    /// when never connected) the future stays pending, so it can sit in a
    /// `select!` arm without spinning.
    pub async fn recv(&mut self) -> Option<ServerMessage> {
        let Some(rx) = self.in_rx.as_mut() else {
            return std::future::pending().await;
        };
        let msg = rx.recv().await;
        if msg.is_none() {
            self.in_rx = None;
            self.out_tx = None;
        }
        msg
    }

    /// Drop both channels (closes the socket once the bridge notices).
    pub fn disconnect(&mut self) {
        self.out_tx = None;
        self.in_rx = None;
    }
}

impl VisionPort for ChannelSession {
    fn send(&mut self, msg: ClientMessage) -> Result<()> {
        let tx = self
            .out_tx
            .as_ref()
            .ok_or_else(|| anyhow!("vision service not connected"))?;
        tx.send(msg)
            .map_err(|err| anyhow!("vision channel closed; dropped {}", err.0.type_name()))
    }

    fn is_connected(&self) -> bool {
        self.out_tx.as_ref().is_some_and(|tx| !tx.is_closed())
    }
}

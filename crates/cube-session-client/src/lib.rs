// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Client helper for talking to the cube vision service over a websocket
//! (one JSON envelope per text message), plus tool-facing adapters
//! (channels + ports).

use anyhow::{Context, Result};
use cube_session_proto::{
    wire::{decode_server, encode_client},
    ClientMessage, ServerMessage,
};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

pub mod tool;

use tool::ChannelSession;

/// Websocket stream type used by [`VisionClient`].
pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Minimal async client over a websocket.
pub struct VisionClient {
    stream: WsStream,
}

impl VisionClient {
    /// Connect to the vision service at `url` (e.g. `ws://localhost:8080`).
    pub async fn connect(url: &str) -> Result<Self> {
        let (stream, _) = connect_async(url)
            .await
            .with_context(|| format!("connect to vision service at {url}"))?;
        Ok(Self { stream })
    }

    /// Send one request envelope.
    pub async fn send(&mut self, msg: &ClientMessage) -> Result<()> {
        let text = encode_client(msg)?;
        self.stream.send(Message::Text(text.into())).await?;
        Ok(())
    }

    /// Wait for the next service envelope. Returns `Ok(None)` once the socket closes.
    ///
    /// Non-text frames are skipped; malformed envelopes are logged and skipped.
    pub async fn poll_message(&mut self) -> Result<Option<ServerMessage>> {
        while let Some(frame) = self.stream.next().await {
            match frame? {
                Message::Text(text) => match decode_server(text.as_str()) {
                    Ok(msg) => return Ok(Some(msg)),
                    Err(err) => warn!(%err, "dropping malformed envelope from vision service"),
                },
                Message::Close(_) => return Ok(None),
                _ => {}
            }
        }
        Ok(None)
    }

    fn into_inner(self) -> WsStream {
        self.stream
    }
}

/// Connect and bridge the socket onto channels serviced by a background task.
///
/// The connect happens inline so callers can surface the failure in their UI.
/// After that, outbound requests queued on the returned session are written in
/// order and decoded inbound envelopes are delivered to it. When either side
/// closes, the session reports itself disconnected.
///
/// Must be called from within a tokio runtime.
pub async fn connect_channels(url: &str) -> Result<ChannelSession> {
    let client = VisionClient::connect(url).await?;
    info!(url, "connected to vision service");
    let (mut write, mut read) = client.into_inner().split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ClientMessage>();
    let (in_tx, in_rx) = mpsc::unbounded_channel::<ServerMessage>();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                outbound = out_rx.recv() => {
                    let Some(msg) = outbound else {
                        let _ = write.send(Message::Close(None)).await;
                        break;
                    };
                    let text = match encode_client(&msg) {
                        Ok(text) => text,
                        Err(err) => {
                            warn!(%err, kind = msg.type_name(), "failed to encode request");
                            continue;
                        }
                    };
                    if let Err(err) = write.send(Message::Text(text.into())).await {
                        warn!(%err, "vision socket write failed");
                        break;
                    }
                }
                inbound = read.next() => match inbound {
                    Some(Ok(Message::Text(text))) => match decode_server(text.as_str()) {
                        Ok(msg) => {
                            debug!(kind = msg.type_name(), "vision message received");
                            if in_tx.send(msg).is_err() {
                                break;
                            }
                        }
                        Err(err) => warn!(%err, "dropping malformed envelope from vision service"),
                    },
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!(%err, "vision socket read failed");
                        break;
                    }
                },
            }
        }
        info!("vision service connection closed");
    });

    Ok(ChannelSession::with_channels(out_tx, in_rx))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::tool::VisionPort;
    use cube_session_proto::wire::{decode_client, encode_server};
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    async fn spawn_service() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(tcp).await.unwrap();
            let mut frames = 0usize;
            while let Some(Ok(msg)) = ws.next().await {
                let Message::Text(text) = msg else { continue };
                match decode_client(text.as_str()).unwrap() {
                    ClientMessage::Init { size } => assert_eq!(size, 1),
                    ClientMessage::Frame { .. } => frames += 1,
                    ClientMessage::Finish => {
                        ws.send(Message::Text(r#"{"type":"progress"}"#.into()))
                            .await
                            .unwrap();
                        let done = encode_server(&ServerMessage::CvFinish {
                            cube: "g".repeat(frames.max(1)),
                        })
                        .unwrap();
                        ws.send(Message::Text(done.into())).await.unwrap();
                    }
                }
            }
        });
        format!("ws://{addr}")
    }

    #[tokio::test]
    async fn client_surfaces_unknown_then_result() {
        let url = spawn_service().await;
        let mut client = VisionClient::connect(&url).await.unwrap();
        client.send(&ClientMessage::Init { size: 1 }).await.unwrap();
        client.send(&ClientMessage::Finish).await.unwrap();
        assert_eq!(
            client.poll_message().await.unwrap(),
            Some(ServerMessage::Unknown)
        );
        assert_eq!(
            client.poll_message().await.unwrap(),
            Some(ServerMessage::CvFinish { cube: "g".into() })
        );
    }

    #[tokio::test]
    async fn channel_bridge_delivers_in_order() {
        let url = spawn_service().await;
        let mut session = connect_channels(&url).await.unwrap();
        assert!(session.is_connected());
        session.send(ClientMessage::Init { size: 1 }).unwrap();
        for _ in 0..3 {
            session
                .send(ClientMessage::Frame {
                    data: "AAAA".into(),
                })
                .unwrap();
        }
        session.send(ClientMessage::Finish).unwrap();
        assert_eq!(session.recv().await, Some(ServerMessage::Unknown));
        assert_eq!(
            session.recv().await,
            Some(ServerMessage::CvFinish { cube: "ggg".into() })
        );
    }

    #[tokio::test]
    async fn connect_failure_is_reported() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        assert!(connect_channels(&format!("ws://{addr}")).await.is_err());
    }
}

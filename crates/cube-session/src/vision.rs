// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Request encoding and result reconciliation on top of a [`VisionPort`].

use cube_model::CubeSize;
use cube_session_client::tool::VisionPort;
use cube_session_proto::{ClientMessage, ServerMessage};
use tracing::{debug, info, warn};

use crate::error::SessionError;

/// Typed sender/receiver for the vision service protocol.
pub struct VisionChannel<P> {
    port: P,
    frames_sent: u64,
}

impl<P: VisionPort> VisionChannel<P> {
    /// Wrap a transport.
    pub fn new(port: P) -> Self {
        Self {
            port,
            frames_sent: 0,
        }
    }

    /// Underlying transport.
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Underlying transport, mutably (the runtime polls it for inbound messages).
    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Swap in a new transport. The frame counter restarts with the next `init`.
    pub fn replace_port(&mut self, port: P) -> P {
        std::mem::replace(&mut self.port, port)
    }

    /// Whether the transport currently has a live channel.
    pub fn is_connected(&self) -> bool {
        self.port.is_connected()
    }

    /// Frames delivered since the last `init`.
    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    /// Announce a new session of the given size.
    pub fn send_init(&mut self, size: CubeSize) -> Result<(), SessionError> {
        self.send(ClientMessage::Init { size: size.get() })?;
        self.frames_sent = 0;
        Ok(())
    }

    /// Ship one base64-encoded frame.
    pub fn send_frame(&mut self, data: String) -> Result<(), SessionError> {
        self.send(ClientMessage::Frame { data })?;
        self.frames_sent += 1;
        Ok(())
    }

    /// Tell the service the capture is over.
    pub fn send_finish(&mut self) -> Result<(), SessionError> {
        self.send(ClientMessage::Finish)
    }

    /// Interpret an inbound message. Returns the capture result, if any.
    pub fn react(&self, msg: ServerMessage) -> Option<String> {
        match msg {
            ServerMessage::CvFinish { cube } => {
                info!(frames = self.frames_sent, facelets = cube.len(), "vision result");
                Some(cube)
            }
            ServerMessage::Unknown => {
                debug!("ignoring unknown message from vision service");
                None
            }
        }
    }

    fn send(&mut self, msg: ClientMessage) -> Result<(), SessionError> {
        let kind = msg.type_name();
        self.port.send(msg).map_err(|err| {
            let reason = format!("{err:#}");
            warn!(kind, %reason, "vision send failed");
            SessionError::ChannelUnavailable(reason)
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[derive(Default)]
    struct Recorder {
        sent: Vec<ClientMessage>,
        down: bool,
    }

    impl VisionPort for Recorder {
        fn send(&mut self, msg: ClientMessage) -> anyhow::Result<()> {
            if self.down {
                anyhow::bail!("socket closed");
            }
            self.sent.push(msg);
            Ok(())
        }

        fn is_connected(&self) -> bool {
            !self.down
        }
    }

    #[test]
    fn encodes_each_request_kind() {
        let mut ch = VisionChannel::new(Recorder::default());
        ch.send_init(CubeSize::new(3).unwrap()).unwrap();
        ch.send_frame("aGk=".into()).unwrap();
        ch.send_finish().unwrap();
        assert_eq!(ch.frames_sent(), 1);
        assert_eq!(
            ch.port().sent,
            vec![
                ClientMessage::Init { size: 3 },
                ClientMessage::Frame {
                    data: "aGk=".into()
                },
                ClientMessage::Finish,
            ]
        );
    }

    #[test]
    fn send_failure_is_channel_unavailable() {
        let mut ch = VisionChannel::new(Recorder {
            down: true,
            ..Recorder::default()
        });
        assert!(!ch.is_connected());
        let err = ch.send_finish().unwrap_err();
        assert_eq!(err, SessionError::ChannelUnavailable("socket closed".into()));
    }

    #[test]
    fn replace_port_hands_back_the_old_transport() {
        let mut ch = VisionChannel::new(Recorder::default());
        ch.send_finish().unwrap();
        let old = ch.replace_port(Recorder::default());
        assert_eq!(old.sent, vec![ClientMessage::Finish]);
        assert!(ch.port().sent.is_empty());
    }

    #[test]
    fn react_extracts_result_and_ignores_unknown() {
        let ch = VisionChannel::new(Recorder::default());
        assert_eq!(
            ch.react(ServerMessage::CvFinish { cube: "yyyy".into() }),
            Some("yyyy".into())
        );
        assert_eq!(ch.react(ServerMessage::Unknown), None);
    }
}

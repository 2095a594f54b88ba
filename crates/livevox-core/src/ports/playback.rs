//! Playback surface port — turns audio bytes into sound.

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::controller::ControllerMsg;
use crate::error::SpeechError;

/// Lifecycle notification from an active playback.
#[derive(Debug, Clone)]
pub enum PlaybackEvent {
    /// Audio is about to come out of the speakers.
    Started,

    /// Playback drained naturally.
    Ended,

    /// The playback surface failed.
    Error(String),
}

/// Capability that constructs a playback from raw audio bytes.
pub trait PlaybackPort: Send + Sync {
    /// Begin playing `audio`, reporting lifecycle events through `sink`.
    ///
    /// The returned handle is the disposable resource for this playback;
    /// dropping it releases whatever transient object backs the audio.
    fn begin(&self, audio: Bytes, sink: PlaybackSink)
    -> Result<Box<dyn PlaybackHandle>, SpeechError>;
}

/// Handle to one active playback.
pub trait PlaybackHandle: Send {
    /// Pause and rewind to the start. Called on manual stop; the handle is
    /// dropped (released) immediately afterwards.
    fn halt(&mut self);
}

/// Event sender handed to a [`PlaybackPort`] adapter.
///
/// Routes lifecycle events back into the controller's event loop, tagged
/// with the session token that was live when playback began — events from
/// a torn-down session are discarded at dispatch.
#[derive(Clone)]
pub struct PlaybackSink {
    tx: mpsc::UnboundedSender<ControllerMsg>,
    token: CancellationToken,
}

impl PlaybackSink {
    pub(crate) fn new(tx: mpsc::UnboundedSender<ControllerMsg>, token: CancellationToken) -> Self {
        Self { tx, token }
    }

    /// Report that audio started playing.
    pub fn started(&self) {
        self.send(PlaybackEvent::Started);
    }

    /// Report that playback finished naturally.
    pub fn ended(&self) {
        self.send(PlaybackEvent::Ended);
    }

    /// Report a playback failure.
    pub fn error(&self, message: impl Into<String>) {
        self.send(PlaybackEvent::Error(message.into()));
    }

    fn send(&self, event: PlaybackEvent) {
        // Best-effort: the controller may already be shut down.
        let _ = self.tx.send(ControllerMsg::Playback {
            token: self.token.clone(),
            event,
        });
    }
}

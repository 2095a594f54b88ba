//! `SpeechService` — the event-loop task that owns the controller.
//!
//! The controller itself is single-owner state; this module gives it the
//! "one event-loop turn at a time" execution model the design relies on.
//! Clicks, stop requests, status queries, and the controller's own async
//! completions all funnel through one mpsc channel and are processed
//! strictly in order by the owning task, so no two completions can race to
//! mutate the session.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::controller::{
    ControllerMsg, SpeechConfig, SpeechController, SpeechEvent, SpeechStatus,
};
use crate::ports::{PlaybackPort, SynthesisPort, TriggerId, TriggerSurface};

/// Clone-able handle to a running [`SpeechService`].
///
/// Command methods are fire-and-forget, matching their click-handler
/// origin: a click on a dead page does nothing.
#[derive(Clone)]
pub struct SpeechHandle {
    tx: mpsc::UnboundedSender<ControllerMsg>,
}

impl SpeechHandle {
    /// Activate a trigger (the delegated click path).
    pub fn activate(&self, id: TriggerId) {
        let _ = self.tx.send(ControllerMsg::Activate(id));
    }

    /// Stop whatever is in flight or playing.
    pub fn stop(&self) {
        let _ = self.tx.send(ControllerMsg::Stop);
    }

    /// Snapshot the controller state.
    ///
    /// Returns `None` if the service has shut down.
    pub async fn status(&self) -> Option<SpeechStatus> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx.send(ControllerMsg::Status(reply_tx)).ok()?;
        reply_rx.await.ok()
    }

    /// Tear down the active session and exit the event loop.
    pub fn shutdown(&self) {
        let _ = self.tx.send(ControllerMsg::Shutdown);
    }
}

/// Spawns and represents the controller's event loop.
pub struct SpeechService {
    join: JoinHandle<()>,
}

impl SpeechService {
    /// Spawn the service on the current tokio runtime.
    ///
    /// Returns the service, the command handle, and the receiver for
    /// [`SpeechEvent`]s.
    #[must_use]
    pub fn spawn(
        synthesis: Arc<dyn SynthesisPort>,
        playback: Arc<dyn PlaybackPort>,
        surface: Arc<dyn TriggerSurface>,
        config: SpeechConfig,
    ) -> (Self, SpeechHandle, mpsc::UnboundedReceiver<SpeechEvent>) {
        let (msg_tx, mut msg_rx) = mpsc::unbounded_channel();
        let (mut controller, event_rx) =
            SpeechController::new(synthesis, playback, surface, config, msg_tx.clone());

        let join = tokio::spawn(async move {
            tracing::debug!("speech service started");
            while let Some(msg) = msg_rx.recv().await {
                let shutdown = matches!(msg, ControllerMsg::Shutdown);
                controller.dispatch(msg);
                if shutdown {
                    break;
                }
            }
            tracing::debug!("speech service stopped");
        });

        (Self { join }, SpeechHandle { tx: msg_tx }, event_rx)
    }

    /// Wait for the event loop to exit (after [`SpeechHandle::shutdown`]).
    pub async fn join(self) {
        if let Err(e) = self.join.await {
            tracing::warn!(error = %e, "speech service task panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use bytes::Bytes;
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::controller::SpeechState;
    use crate::error::SpeechError;
    use crate::page::PageSurface;
    use crate::ports::{PlaybackHandle, PlaybackSink};

    struct NeverResolves;

    #[async_trait]
    impl SynthesisPort for NeverResolves {
        async fn synthesize(
            &self,
            _text: &str,
            cancel: &CancellationToken,
        ) -> Result<Bytes, SpeechError> {
            cancel.cancelled().await;
            Err(SpeechError::Cancelled)
        }
    }

    struct NoopPlayback;

    impl PlaybackPort for NoopPlayback {
        fn begin(
            &self,
            _audio: Bytes,
            _sink: PlaybackSink,
        ) -> Result<Box<dyn PlaybackHandle>, SpeechError> {
            Err(SpeechError::Playback("unused".into()))
        }
    }

    #[tokio::test]
    async fn status_reports_idle_after_spawn() {
        let (_service, handle, _events) = SpeechService::spawn(
            Arc::new(NeverResolves),
            Arc::new(NoopPlayback),
            Arc::new(PageSurface::new()),
            SpeechConfig::default(),
        );

        let status = handle.status().await.expect("service alive");
        assert_eq!(status.state, SpeechState::Idle);
        assert!(status.active_trigger.is_none());
    }

    #[tokio::test]
    async fn shutdown_ends_the_loop() {
        let (service, handle, _events) = SpeechService::spawn(
            Arc::new(NeverResolves),
            Arc::new(NoopPlayback),
            Arc::new(PageSurface::new()),
            SpeechConfig::default(),
        );

        handle.shutdown();
        service.join().await;
        assert!(handle.status().await.is_none());
    }
}

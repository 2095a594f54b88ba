//! Speech controller — the single-flight TTS playback state machine.
//!
//! The controller owns at most one active synthesis request and at most one
//! active playback, page-wide:
//!
//! ```text
//!   Idle → Requesting → Playing → Idle
//!            │             │
//!            └─ cancel ────┴─ cancel / error → Idle
//! ```
//!
//! All mutation happens on the event-loop task that owns the controller
//! (see [`crate::service`]). Clicks and async completions alike arrive as
//! [`ControllerMsg`] values; completions carry the session token that was
//! live when the work was issued, and every resume checks that token before
//! touching shared state. That ordering rule — check signal, then mutate —
//! is what makes a cancelled-but-already-resolved request unable to clobber
//! a newer session.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::error::SpeechError;
use crate::label::{self, LabelState};
use crate::ports::{
    PlaybackEvent, PlaybackHandle, PlaybackPort, PlaybackSink, SynthesisPort, TriggerId,
    TriggerSurface,
};

// ── Speech state machine ───────────────────────────────────────────

/// Current state of the speech session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpeechState {
    /// No session — every trigger shows its neutral label.
    Idle,

    /// A synthesis request is in flight.
    Requesting,

    /// Audio is playing.
    Playing,
}

// ── Events emitted by the controller ───────────────────────────────

/// Events emitted by the controller to the embedding layer.
#[derive(Debug, Clone)]
pub enum SpeechEvent {
    /// Session state changed.
    StateChanged(SpeechState),

    /// Audio playback started.
    PlaybackStarted,

    /// Audio playback finished (naturally or after a playback error).
    PlaybackFinished,

    /// A synthesis request failed (the `Error` label flash is showing).
    Error(String),
}

// ── Configuration ──────────────────────────────────────────────────

/// Controller configuration.
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    /// How long the `Error` label stays on a trigger after a synthesis
    /// failure before reverting to the original label.
    pub error_display: Duration,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            error_display: Duration::from_millis(2000),
        }
    }
}

// ── Status DTO ─────────────────────────────────────────────────────

/// Snapshot of the controller state, for status queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechStatus {
    /// Current session state.
    pub state: SpeechState,

    /// The trigger owning the active session, if any.
    pub active_trigger: Option<TriggerId>,
}

// ── Messages ───────────────────────────────────────────────────────

/// A message dispatched on the controller's event loop.
///
/// Commands come from the embedder (via [`crate::service::SpeechHandle`]);
/// the remaining variants are async completions sent by tasks the
/// controller itself spawned.
pub(crate) enum ControllerMsg {
    /// A trigger was activated (clicked).
    Activate(TriggerId),

    /// Explicit stop of whatever is in flight or playing.
    Stop,

    /// Snapshot request.
    Status(oneshot::Sender<SpeechStatus>),

    /// Tear down the session and exit the event loop.
    Shutdown,

    /// The synthesis request for `token`'s session resolved.
    Synthesized {
        token: CancellationToken,
        trigger: TriggerId,
        result: Result<Bytes, SpeechError>,
    },

    /// A playback lifecycle event for `token`'s session.
    Playback {
        token: CancellationToken,
        event: PlaybackEvent,
    },

    /// The error-display interval for a failed request elapsed.
    ErrorElapsed {
        trigger: TriggerId,
        original_label: String,
        token: CancellationToken,
    },
}

// ── Session ────────────────────────────────────────────────────────

/// The singleton record of the in-flight or playing operation.
///
/// The token lives for the whole session — request and playback phase —
/// and is cancelled exactly once, at teardown. Any completion tagged with
/// a cancelled token is stale by definition and ignored.
struct ActiveSession {
    trigger: TriggerId,
    /// Neutral label text captured when the session started; the only text
    /// ever restored to the trigger.
    original_label: String,
    token: CancellationToken,
    playback: Option<Box<dyn PlaybackHandle>>,
}

// ── Controller ─────────────────────────────────────────────────────

/// The single-flight speech controller.
///
/// Construct via [`new`](Self::new) and drive by feeding messages to
/// [`dispatch`] from one task; [`crate::service::SpeechService`] does both.
pub struct SpeechController {
    synthesis: Arc<dyn SynthesisPort>,
    playback: Arc<dyn PlaybackPort>,
    surface: Arc<dyn TriggerSurface>,
    config: SpeechConfig,

    /// Loops completions back into the owning event loop.
    msg_tx: mpsc::UnboundedSender<ControllerMsg>,

    /// Outbound event channel.
    event_tx: mpsc::UnboundedSender<SpeechEvent>,

    state: SpeechState,
    session: Option<ActiveSession>,

    /// Pending error-flash revert per trigger; superseded by a newer flash
    /// on the same trigger.
    pending_reverts: BTreeMap<TriggerId, CancellationToken>,
}

impl SpeechController {
    /// Create a controller.
    ///
    /// `msg_tx` must be the sender side of the channel whose receiver the
    /// owning task drains into [`dispatch`](Self::dispatch). Returns the
    /// controller and the receiver for [`SpeechEvent`]s.
    pub(crate) fn new(
        synthesis: Arc<dyn SynthesisPort>,
        playback: Arc<dyn PlaybackPort>,
        surface: Arc<dyn TriggerSurface>,
        config: SpeechConfig,
        msg_tx: mpsc::UnboundedSender<ControllerMsg>,
    ) -> (Self, mpsc::UnboundedReceiver<SpeechEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let controller = Self {
            synthesis,
            playback,
            surface,
            config,
            msg_tx,
            event_tx,
            state: SpeechState::Idle,
            session: None,
            pending_reverts: BTreeMap::new(),
        };

        (controller, event_rx)
    }

    /// Get the current state.
    #[must_use]
    pub const fn state(&self) -> SpeechState {
        self.state
    }

    /// Snapshot for status queries.
    #[must_use]
    pub fn status(&self) -> SpeechStatus {
        SpeechStatus {
            state: self.state,
            active_trigger: self.session.as_ref().map(|s| s.trigger),
        }
    }

    /// Dispatch one message. Failures are absorbed here — logged and turned
    /// into label transitions, never propagated to the embedder.
    pub(crate) fn dispatch(&mut self, msg: ControllerMsg) {
        match msg {
            ControllerMsg::Activate(id) => {
                if let Err(e) = self.on_activate(id) {
                    tracing::warn!(trigger = %id, error = %e, "trigger activation ignored");
                }
            }
            ControllerMsg::Stop | ControllerMsg::Shutdown => self.stop_current(),
            ControllerMsg::Status(reply) => {
                let _ = reply.send(self.status());
            }
            ControllerMsg::Synthesized {
                token,
                trigger,
                result,
            } => self.on_synthesized(&token, trigger, result),
            ControllerMsg::Playback { token, event } => self.on_playback(&token, event),
            ControllerMsg::ErrorElapsed {
                trigger,
                original_label,
                token,
            } => self.on_error_elapsed(trigger, &original_label, &token),
        }
    }

    // ── Transitions ────────────────────────────────────────────────

    /// Idle → Requesting (or busy re-click → teardown).
    fn on_activate(&mut self, id: TriggerId) -> Result<(), SpeechError> {
        let current_label = self
            .surface
            .label(id)
            .ok_or(SpeechError::UnknownTrigger(id))?;

        // A Loading/Playing trigger means "stop" — same trigger cancels,
        // and the defensive sweep covers any drifted siblings.
        if LabelState::classify(&current_label).is_busy() {
            self.stop_current();
            return Ok(());
        }

        let text = self
            .surface
            .payload(id)
            .ok_or(SpeechError::UnknownTrigger(id))?;
        let text = text.trim().to_owned();
        if text.is_empty() {
            tracing::debug!(trigger = %id, "empty payload, ignoring activation");
            return Ok(());
        }

        // The newest activation always wins: tear down any live session
        // before issuing our own async work. This also sweeps a lingering
        // Error flash off this trigger, so the label captured below is the
        // genuine neutral text.
        self.stop_current();

        let original_label = self
            .surface
            .label(id)
            .ok_or(SpeechError::UnknownTrigger(id))?;
        self.surface.set_label(id, label::LOADING);

        let token = CancellationToken::new();
        self.session = Some(ActiveSession {
            trigger: id,
            original_label,
            token: token.clone(),
            playback: None,
        });
        self.set_state(SpeechState::Requesting);

        tracing::debug!(trigger = %id, chars = text.len(), "issuing synthesis request");

        let synthesis = Arc::clone(&self.synthesis);
        let msg_tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let result = synthesis.synthesize(&text, &token).await;
            let _ = msg_tx.send(ControllerMsg::Synthesized {
                token,
                trigger: id,
                result,
            });
        });

        Ok(())
    }

    /// Requesting → Playing / Error / silently dropped.
    fn on_synthesized(
        &mut self,
        token: &CancellationToken,
        trigger: TriggerId,
        result: Result<Bytes, SpeechError>,
    ) {
        // Hard correctness requirement: a cancelled-but-already-resolved
        // request performs no further action — no label change, no playback.
        if token.is_cancelled() {
            tracing::debug!(trigger = %trigger, "dropping resolution of cancelled request");
            return;
        }

        match result {
            Ok(audio) => self.start_playback(audio),
            Err(err) if err.is_cancelled() => {
                // Gateway aborted on its own; treat like a normal end.
                tracing::debug!(trigger = %trigger, "gateway reported cancellation");
                self.finish_session();
            }
            Err(err) => self.fail_session(trigger, &err),
        }
    }

    /// Wrap the returned bytes into a playback. The `Playing` label waits
    /// for the playback surface's start event.
    fn start_playback(&mut self, audio: Bytes) {
        let Some(session) = self.session.as_mut() else {
            // Token not cancelled but no session — cannot happen while
            // teardown cancels before clearing; log and move on.
            tracing::warn!("synthesis resolved with no active session");
            return;
        };

        let sink = PlaybackSink::new(self.msg_tx.clone(), session.token.clone());
        match self.playback.begin(audio, sink) {
            Ok(handle) => {
                session.playback = Some(handle);
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to start audio playback");
                self.finish_session();
            }
        }
    }

    /// Playback lifecycle events, guarded by the session token.
    fn on_playback(&mut self, token: &CancellationToken, event: PlaybackEvent) {
        if token.is_cancelled() {
            tracing::debug!("dropping playback event from torn-down session");
            return;
        }

        match event {
            PlaybackEvent::Started => {
                if let Some(session) = &self.session {
                    self.surface.set_label(session.trigger, label::PLAYING);
                }
                self.set_state(SpeechState::Playing);
                self.emit(SpeechEvent::PlaybackStarted);
            }
            PlaybackEvent::Ended => {
                self.emit(SpeechEvent::PlaybackFinished);
                self.finish_session();
            }
            PlaybackEvent::Error(message) => {
                // Treated the same as a normal end from the user's point of
                // view: logged, neutral label restored, no Error flash.
                tracing::warn!(error = %message, "audio playback failed");
                self.emit(SpeechEvent::PlaybackFinished);
                self.finish_session();
            }
        }
    }

    /// Requesting → Error → (after the display interval) Idle label.
    ///
    /// The session is cleared immediately — a new request can start while
    /// the Error flash is still showing.
    fn fail_session(&mut self, trigger: TriggerId, err: &SpeechError) {
        tracing::warn!(trigger = %trigger, error = %err, "speech synthesis failed");

        let Some(session) = self.session.take() else {
            return;
        };
        session.token.cancel();

        self.surface.set_label(trigger, label::ERROR);
        self.emit(SpeechEvent::Error(err.to_string()));
        self.set_state(SpeechState::Idle);

        // Each flash gets its own revert token; a newer flash on the same
        // trigger supersedes the pending one, so the full display interval
        // holds even under rapid retries.
        let revert_token = CancellationToken::new();
        if let Some(stale) = self
            .pending_reverts
            .insert(trigger, revert_token.clone())
        {
            stale.cancel();
        }

        let delay = self.config.error_display;
        let original_label = session.original_label;
        let msg_tx = self.msg_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = msg_tx.send(ControllerMsg::ErrorElapsed {
                trigger,
                original_label,
                token: revert_token,
            });
        });
    }

    /// Revert the Error flash — but only if this timer wasn't superseded by
    /// a newer flash and the flash is still showing, so neither a rapid
    /// retry nor a newer session on the same trigger is clobbered.
    fn on_error_elapsed(
        &mut self,
        trigger: TriggerId,
        original_label: &str,
        token: &CancellationToken,
    ) {
        if token.is_cancelled() {
            return;
        }
        self.pending_reverts.remove(&trigger);
        if self.surface.label(trigger).as_deref() == Some(label::ERROR) {
            self.surface.set_label(trigger, original_label);
        }
    }

    /// Playing → Idle (natural end, playback error, or gateway self-abort).
    fn finish_session(&mut self) {
        if let Some(session) = self.session.take() {
            // Marks the session dead so a duplicate lifecycle event from
            // the ended playback cannot touch a later session.
            session.token.cancel();
            self.surface
                .set_label(session.trigger, &session.original_label);
            // Dropping the handle releases the transient audio resource.
            drop(session.playback);
        }
        self.set_state(SpeechState::Idle);
    }

    /// Any state → Idle (manual stop / teardown before a new activation).
    fn stop_current(&mut self) {
        if let Some(mut session) = self.session.take() {
            tracing::debug!(trigger = %session.trigger, "stopping active session");
            session.token.cancel();
            if let Some(mut playback) = session.playback.take() {
                playback.halt();
            }
            self.surface
                .set_label(session.trigger, &session.original_label);
        }

        // Defensive sweep: a trigger may have been replaced on the page
        // between activation and cleanup, leaving a stale transient label
        // behind. Reset anything non-neutral to its neutral label.
        for id in self.surface.trigger_ids() {
            let stale = self
                .surface
                .label(id)
                .is_some_and(|l| LabelState::classify(&l).needs_sweep_reset());
            if stale {
                if let Some(neutral) = self.surface.neutral_label(id) {
                    self.surface.set_label(id, &neutral);
                }
            }
        }

        self.set_state(SpeechState::Idle);
    }

    // ── Internal helpers ───────────────────────────────────────────

    /// Transition to a new state and emit a state-change event.
    fn set_state(&mut self, new_state: SpeechState) {
        if self.state != new_state {
            tracing::debug!(old = ?self.state, new = ?new_state, "speech state transition");
            self.state = new_state;
            self.emit(SpeechEvent::StateChanged(new_state));
        }
    }

    /// Emit an event (best-effort — if the receiver is dropped, log and move on).
    fn emit(&self, event: SpeechEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::warn!("speech event receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::page::PageSurface;

    struct NoopSynthesis;

    #[async_trait]
    impl SynthesisPort for NoopSynthesis {
        async fn synthesize(
            &self,
            _text: &str,
            _cancel: &CancellationToken,
        ) -> Result<Bytes, SpeechError> {
            Ok(Bytes::new())
        }
    }

    struct NoopPlayback;

    impl PlaybackPort for NoopPlayback {
        fn begin(
            &self,
            _audio: Bytes,
            _sink: PlaybackSink,
        ) -> Result<Box<dyn PlaybackHandle>, SpeechError> {
            Err(SpeechError::Playback("no audio device".into()))
        }
    }

    fn test_controller() -> (SpeechController, mpsc::UnboundedReceiver<SpeechEvent>) {
        let (msg_tx, _msg_rx) = mpsc::unbounded_channel();
        SpeechController::new(
            Arc::new(NoopSynthesis),
            Arc::new(NoopPlayback),
            Arc::new(PageSurface::new()),
            SpeechConfig::default(),
            msg_tx,
        )
    }

    #[test]
    fn controller_starts_idle() {
        let (controller, _rx) = test_controller();
        assert_eq!(controller.state(), SpeechState::Idle);
        assert!(controller.status().active_trigger.is_none());
    }

    #[test]
    fn default_error_display_is_two_seconds() {
        let config = SpeechConfig::default();
        assert_eq!(config.error_display, Duration::from_millis(2000));
    }

    #[test]
    fn status_serializes_camel_case() {
        let status = SpeechStatus {
            state: SpeechState::Requesting,
            active_trigger: Some(TriggerId(3)),
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["state"], "requesting");
        assert_eq!(json["activeTrigger"], 3);
    }

    #[test]
    fn activate_unknown_trigger_is_absorbed() {
        tokio_test::block_on(async {
            let (mut controller, _rx) = test_controller();
            controller.dispatch(ControllerMsg::Activate(TriggerId(42)));
            assert_eq!(controller.state(), SpeechState::Idle);
        });
    }
}

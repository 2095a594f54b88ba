//! livevox-core — client-side state for a live-rendered chat page.
//!
//! The one genuinely stateful piece is the speech controller: a
//! single-flight text-to-speech state machine with cooperative
//! cancellation (`Idle → Requesting → Playing → Idle`, cancel at any
//! point, exactly one live operation page-wide). The network gateway,
//! audio runtime, and trigger elements are all behind ports so embedders
//! and tests supply their own.
//!
//! Everything else — chat scroll tracking, the navigation progress bar,
//! dev log streaming, and socket bootstrap — is thin page glue under
//! [`hooks`] and [`bootstrap`].

pub mod bootstrap;
pub mod controller;
pub mod error;
pub mod hooks;
pub mod label;
pub mod page;
pub mod ports;
pub mod service;

// Re-export key types for convenience
pub use controller::{SpeechConfig, SpeechEvent, SpeechState, SpeechStatus};
pub use error::SpeechError;
pub use page::PageSurface;
pub use ports::{
    PlaybackEvent, PlaybackHandle, PlaybackPort, PlaybackSink, SynthesisPort, TriggerId,
    TriggerSurface,
};
pub use service::{SpeechHandle, SpeechService};

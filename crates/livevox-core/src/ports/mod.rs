//! Ports — trait seams to the out-of-scope collaborators.
//!
//! The controller only ever talks to the network, the audio runtime, and the
//! page through these traits, so each can be swapped for a mock in tests or
//! for a real adapter in an embedder.

mod playback;
mod surface;
mod synthesis;

pub use playback::{PlaybackEvent, PlaybackHandle, PlaybackPort, PlaybackSink};
pub use surface::{TriggerId, TriggerSurface};
pub use synthesis::SynthesisPort;

//! UI surface port — the set of trigger elements on the page.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identity of a trigger element.
///
/// Ordered so surfaces can keep triggers in stable page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TriggerId(pub u64);

impl fmt::Display for TriggerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The trigger elements the controller can see and relabel.
///
/// Each trigger carries a text payload (the text to synthesize), a label
/// (its visible state, see [`crate::label`]), and a neutral label used by
/// the defensive sweep. `label`/`payload` return `None` for triggers that
/// have disappeared from the page.
pub trait TriggerSurface: Send + Sync {
    /// All triggers currently on the page, for the defensive sweep.
    fn trigger_ids(&self) -> Vec<TriggerId>;

    /// The text payload associated with a trigger.
    fn payload(&self, id: TriggerId) -> Option<String>;

    /// The current label text of a trigger.
    fn label(&self, id: TriggerId) -> Option<String>;

    /// Replace a trigger's label text. A missing trigger is a no-op.
    fn set_label(&self, id: TriggerId, text: &str);

    /// The trigger's neutral (idle) label, restored by the sweep.
    fn neutral_label(&self, id: TriggerId) -> Option<String>;
}

//! In-memory trigger surface.
//!
//! The DOM itself is out of scope; [`PageSurface`] is the Rust-side mirror
//! of the page's trigger elements. An embedder keeps it in sync with the
//! rendered page (add/remove on patches) and applies `set_label` changes
//! back to the real elements. It is also the surface the tests drive.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::ports::{TriggerId, TriggerSurface};

#[derive(Debug, Clone)]
struct TriggerEntry {
    payload: String,
    label: String,
    neutral_label: String,
}

/// Thread-safe registry of the triggers currently on the page.
#[derive(Debug, Default)]
pub struct PageSurface {
    triggers: Mutex<BTreeMap<TriggerId, TriggerEntry>>,
    next_id: AtomicU64,
}

impl PageSurface {
    /// Create an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a trigger with the given payload and neutral label.
    ///
    /// The current label starts out as the neutral label.
    pub fn add_trigger(&self, payload: impl Into<String>, label: impl Into<String>) -> TriggerId {
        let id = TriggerId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let label = label.into();
        self.lock().insert(
            id,
            TriggerEntry {
                payload: payload.into(),
                neutral_label: label.clone(),
                label,
            },
        );
        id
    }

    /// Remove a trigger (element left the page).
    pub fn remove_trigger(&self, id: TriggerId) {
        self.lock().remove(&id);
    }

    /// Number of triggers currently registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the surface has no triggers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<TriggerId, TriggerEntry>> {
        self.triggers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl TriggerSurface for PageSurface {
    fn trigger_ids(&self) -> Vec<TriggerId> {
        self.lock().keys().copied().collect()
    }

    fn payload(&self, id: TriggerId) -> Option<String> {
        self.lock().get(&id).map(|t| t.payload.clone())
    }

    fn label(&self, id: TriggerId) -> Option<String> {
        self.lock().get(&id).map(|t| t.label.clone())
    }

    fn set_label(&self, id: TriggerId, text: &str) {
        if let Some(entry) = self.lock().get_mut(&id) {
            entry.label = text.to_owned();
        }
    }

    fn neutral_label(&self, id: TriggerId) -> Option<String> {
        self.lock().get(&id).map(|t| t.neutral_label.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_read_back() {
        let surface = PageSurface::new();
        let id = surface.add_trigger("hello world", "Speak");

        assert_eq!(surface.payload(id).as_deref(), Some("hello world"));
        assert_eq!(surface.label(id).as_deref(), Some("Speak"));
        assert_eq!(surface.neutral_label(id).as_deref(), Some("Speak"));
    }

    #[test]
    fn set_label_keeps_neutral() {
        let surface = PageSurface::new();
        let id = surface.add_trigger("text", "Speak");

        surface.set_label(id, crate::label::LOADING);
        assert_eq!(surface.label(id).as_deref(), Some(crate::label::LOADING));
        assert_eq!(surface.neutral_label(id).as_deref(), Some("Speak"));
    }

    #[test]
    fn removed_trigger_reads_none() {
        let surface = PageSurface::new();
        let id = surface.add_trigger("text", "Speak");
        surface.remove_trigger(id);

        assert!(surface.label(id).is_none());
        assert!(surface.payload(id).is_none());
        // set_label on a missing trigger is a no-op, not a panic.
        surface.set_label(id, "whatever");
    }

    #[test]
    fn ids_are_unique() {
        let surface = PageSurface::new();
        let a = surface.add_trigger("a", "Speak");
        let b = surface.add_trigger("b", "Speak");
        assert_ne!(a, b);
        assert_eq!(surface.trigger_ids(), vec![a, b]);
    }

    #[test]
    fn ids_enumerate_in_registration_order() {
        let surface = PageSurface::new();
        let ids: Vec<_> = (0..4)
            .map(|i| surface.add_trigger(format!("payload {i}"), "Speak"))
            .collect();

        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(surface.trigger_ids(), ids);
    }
}

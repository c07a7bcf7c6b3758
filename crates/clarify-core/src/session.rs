//! The active selection context.

use clarify_dom::{MutatedRegion, Range};

/// A captured selection: the range it covered and its trimmed text.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSnapshot {
    pub range: Range,
    pub text: String,
}

/// State shared by the tracker, the orchestrator and the mutation engine for
/// one selection.
///
/// Exactly one session is active. Every qualifying selection replaces it
/// with a fresh one under a new generation, which is how late service
/// responses are recognised as stale.
#[derive(Debug, Clone, Default)]
pub struct Session {
    generation: u64,
    snapshot: Option<SelectionSnapshot>,
    region: Option<MutatedRegion>,
    last_text: Option<String>,
}

impl Session {
    /// Start the session that follows `self`.
    pub fn next(&self, snapshot: SelectionSnapshot) -> Session {
        Session {
            generation: self.generation + 1,
            snapshot: Some(snapshot),
            region: None,
            last_text: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> Option<&SelectionSnapshot> {
        self.snapshot.as_ref()
    }

    /// Text captured with the selection, if any.
    pub fn selected_text(&self) -> Option<&str> {
        self.snapshot
            .as_ref()
            .map(|s| s.text.as_str())
            .filter(|t| !t.is_empty())
    }

    /// Point the snapshot at a new range covering the same content.
    pub fn relocate(&mut self, range: Range) {
        if let Some(snapshot) = self.snapshot.as_mut() {
            snapshot.range = range;
        }
    }

    /// The snapshot's range no longer describes anything useful.
    pub fn consume_snapshot(&mut self) -> Option<SelectionSnapshot> {
        self.snapshot.take()
    }

    pub fn region(&self) -> Option<MutatedRegion> {
        self.region
    }

    pub fn set_region(&mut self, region: Option<MutatedRegion>) {
        self.region = region;
    }

    /// Most recent text returned by the service.
    pub fn last_text(&self) -> Option<&str> {
        self.last_text.as_deref()
    }

    pub fn set_last_text(&mut self, text: String) {
        self.last_text = Some(text);
    }
}

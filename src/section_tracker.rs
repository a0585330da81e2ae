use std::collections::HashSet;

use crate::viewport::{Band, TargetBounds, ViewportObserver};

/// Detection band for TOC highlighting: a couple of rows below the top
/// of the content viewport (fixed header allowance) down to 80% of the
/// viewport height.
const ACTIVE_BAND: Band = Band {
    top_inset: 2,
    bottom_inset_percent: 20,
};

/// A section counts as revealed once a tenth of it has been visible.
const REVEAL_THRESHOLD: f32 = 0.1;

/// Tracks which section is "active" for TOC highlighting and which
/// sections have been revealed at least once, from the same underlying
/// viewport-intersection scans.
pub struct SectionTracker {
    active_observer: ViewportObserver,
    reveal_observer: ViewportObserver,
    active_section: Option<String>,
    revealed: HashSet<String>,
}

impl Default for SectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionTracker {
    pub fn new() -> Self {
        Self {
            active_observer: ViewportObserver::new(ACTIVE_BAND, 0.0),
            reveal_observer: ViewportObserver::new(Band::full(), REVEAL_THRESHOLD),
            active_section: None,
            revealed: HashSet::new(),
        }
    }

    /// Register the sections' rendered line bounds. Called at startup
    /// and again after any re-wrap; the revealed set survives re-layout
    /// since reveal is one-shot per section.
    pub fn set_layout(&mut self, targets: Vec<TargetBounds>) {
        self.active_observer.set_targets(targets.clone());
        self.reveal_observer.set_targets(targets);
    }

    /// Process one observation tick. Entries within a scan are applied
    /// in arrival order, so the last intersecting section wins the
    /// active slot for that tick (deliberate simplification; a strict
    /// nearest-to-top rule would be a behavior change).
    ///
    /// Returns the ids revealed for the first time by this tick.
    pub fn update(&mut self, scroll_offset: usize, viewport_height: u16) -> Vec<String> {
        for entry in self.active_observer.scan(scroll_offset, viewport_height) {
            if entry.is_intersecting {
                self.active_section = Some(entry.id);
            }
        }

        let mut newly_revealed = Vec::new();
        for entry in self.reveal_observer.scan(scroll_offset, viewport_height) {
            if entry.is_intersecting && self.revealed.insert(entry.id.clone()) {
                newly_revealed.push(entry.id);
            }
        }
        newly_revealed
    }

    pub fn active_section(&self) -> Option<&str> {
        self.active_section.as_deref()
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.revealed.contains(id)
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }
}

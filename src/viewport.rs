use std::collections::HashMap;

/// Horizontal slice of the content viewport against which section
/// intersection is tested. `top_inset` rows are excluded at the top
/// (fixed header allowance) and `bottom_inset_percent` of the viewport
/// height is excluded at the bottom.
#[derive(Debug, Clone, Copy)]
pub struct Band {
    pub top_inset: u16,
    pub bottom_inset_percent: u16,
}

impl Band {
    /// Full viewport, no insets.
    pub fn full() -> Self {
        Self {
            top_inset: 0,
            bottom_inset_percent: 0,
        }
    }
}

/// Line bounds of an observed section in rendered-line coordinates,
/// half-open `[start_line, end_line)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetBounds {
    pub id: String,
    pub start_line: usize,
    pub end_line: usize,
}

/// One observation delta: a target entered or left the band.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry {
    pub id: String,
    pub is_intersecting: bool,
    /// Fraction of the target's lines inside the band at scan time.
    pub ratio: f32,
}

/// Scroll-driven stand-in for a platform intersection observer: scans
/// registered line ranges against the band and reports enter/leave
/// changes only, in target registration (document) order.
pub struct ViewportObserver {
    band: Band,
    threshold: f32,
    targets: Vec<TargetBounds>,
    intersecting: HashMap<String, bool>,
}

impl ViewportObserver {
    pub fn new(band: Band, threshold: f32) -> Self {
        Self {
            band,
            threshold,
            targets: Vec::new(),
            intersecting: HashMap::new(),
        }
    }

    /// Replace the observed targets (e.g. after a re-wrap). Previous
    /// intersection state is discarded so the next scan re-reports.
    pub fn set_targets(&mut self, targets: Vec<TargetBounds>) {
        self.targets = targets;
        self.intersecting.clear();
    }

    /// Scan against the current scroll position. Returns one entry per
    /// target whose intersecting state changed since the last scan.
    pub fn scan(&mut self, scroll_offset: usize, viewport_height: u16) -> Vec<IntersectionEntry> {
        let height = viewport_height as usize;
        let band_top = scroll_offset + self.band.top_inset as usize;
        let excluded_bottom = height * self.band.bottom_inset_percent as usize / 100;
        let band_bottom = scroll_offset + height.saturating_sub(excluded_bottom);

        let mut entries = Vec::new();
        for target in &self.targets {
            let overlap_start = target.start_line.max(band_top);
            let overlap_end = target.end_line.min(band_bottom);
            let overlap = overlap_end.saturating_sub(overlap_start);

            let total = target.end_line.saturating_sub(target.start_line);
            let ratio = if total == 0 {
                0.0
            } else {
                overlap as f32 / total as f32
            };
            let now_intersecting = overlap > 0 && ratio >= self.threshold;

            let was_intersecting = self
                .intersecting
                .get(&target.id)
                .copied()
                .unwrap_or(false);
            if now_intersecting != was_intersecting {
                self.intersecting
                    .insert(target.id.clone(), now_intersecting);
                entries.push(IntersectionEntry {
                    id: target.id.clone(),
                    is_intersecting: now_intersecting,
                    ratio,
                });
            }
        }
        entries
    }
}

/// Smooth-scroll animation state: eases the scroll offset toward a
/// target over successive event-loop ticks instead of jumping.
#[derive(Debug, Default)]
pub struct SmoothScroll {
    target: Option<usize>,
}

impl SmoothScroll {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, target: usize) {
        self.target = Some(target);
    }

    pub fn cancel(&mut self) {
        self.target = None;
    }

    pub fn is_animating(&self) -> bool {
        self.target.is_some()
    }

    /// Advance one tick from `current`. Returns the next offset while
    /// animating, `None` once idle. Covers a quarter of the remaining
    /// distance per tick, with a floor of one row, so the approach
    /// decelerates near the target.
    pub fn step(&mut self, current: usize) -> Option<usize> {
        let target = self.target?;
        if current == target {
            self.target = None;
            return None;
        }

        let remaining = current.abs_diff(target);
        let step = (remaining / 4).max(1);
        let next = if target > current {
            current + step
        } else {
            current - step
        };
        if next == target {
            self.target = None;
        }
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_completion(scroll: &mut SmoothScroll, mut offset: usize) -> (usize, usize) {
        let mut ticks = 0;
        while let Some(next) = scroll.step(offset) {
            offset = next;
            ticks += 1;
            assert!(ticks < 1000, "animation did not converge");
        }
        (offset, ticks)
    }

    #[test]
    fn test_converges_on_target_downward() {
        let mut scroll = SmoothScroll::new();
        scroll.start(100);
        let (offset, ticks) = run_to_completion(&mut scroll, 0);
        assert_eq!(offset, 100);
        assert!(ticks > 1, "should animate over multiple ticks");
        assert!(!scroll.is_animating());
    }

    #[test]
    fn test_converges_on_target_upward() {
        let mut scroll = SmoothScroll::new();
        scroll.start(0);
        let (offset, _) = run_to_completion(&mut scroll, 250);
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_idle_when_already_at_target() {
        let mut scroll = SmoothScroll::new();
        scroll.start(5);
        assert_eq!(scroll.step(5), None);
        assert!(!scroll.is_animating());
    }

    #[test]
    fn test_cancel_stops_animation() {
        let mut scroll = SmoothScroll::new();
        scroll.start(100);
        assert!(scroll.step(0).is_some());
        scroll.cancel();
        assert_eq!(scroll.step(25), None);
    }

    #[test]
    fn test_retarget_mid_animation() {
        let mut scroll = SmoothScroll::new();
        scroll.start(100);
        let offset = scroll.step(0).unwrap();
        scroll.start(0);
        let (final_offset, _) = run_to_completion(&mut scroll, offset);
        assert_eq!(final_offset, 0);
    }
}

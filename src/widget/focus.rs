/// Focus containment for modal panels: Tab/Shift+Tab cycle through the
/// panel's focusable slots, wrapping from last to first and first to
/// last, so focus never escapes while the panel is open.
#[derive(Debug, Clone)]
pub struct FocusRing {
    len: usize,
    current: usize,
}

impl FocusRing {
    pub fn new(len: usize) -> Self {
        Self { len, current: 0 }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn set(&mut self, index: usize) {
        if index < self.len {
            self.current = index;
        }
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }

    pub fn next(&mut self) -> usize {
        if self.len > 0 {
            self.current = (self.current + 1) % self.len;
        }
        self.current
    }

    pub fn prev(&mut self) -> usize {
        if self.len > 0 {
            self.current = (self.current + self.len - 1) % self.len;
        }
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_wraps_last_to_first() {
        let mut ring = FocusRing::new(3);
        assert_eq!(ring.next(), 1);
        assert_eq!(ring.next(), 2);
        assert_eq!(ring.next(), 0);
    }

    #[test]
    fn test_shift_tab_wraps_first_to_last() {
        let mut ring = FocusRing::new(3);
        assert_eq!(ring.prev(), 2);
        assert_eq!(ring.prev(), 1);
    }

    #[test]
    fn test_single_slot_ring_stays_put() {
        let mut ring = FocusRing::new(1);
        assert_eq!(ring.next(), 0);
        assert_eq!(ring.prev(), 0);
    }

    #[test]
    fn test_set_ignores_out_of_range() {
        let mut ring = FocusRing::new(2);
        ring.set(1);
        assert_eq!(ring.current(), 1);
        ring.set(7);
        assert_eq!(ring.current(), 1);
    }
}

use std::time::{Duration, Instant};

/// Cancelable deadline timer polled from the event loop.
///
/// `schedule` restarts the quiet period, so only the last scheduling
/// before the delay elapses ever fires. `cancel` is idempotent and safe
/// to call after the timer has already fired.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Start (or restart) the quiet period from now.
    pub fn schedule(&mut self) {
        self.deadline = Some(Instant::now() + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once when the deadline has passed; the timer is
    /// disarmed on firing.
    pub fn fire_if_ready(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_fires_once_after_delay() {
        let mut debouncer = Debouncer::new(Duration::from_millis(5));
        assert!(!debouncer.fire_if_ready());

        debouncer.schedule();
        assert!(debouncer.is_pending());
        sleep(Duration::from_millis(10));

        assert!(debouncer.fire_if_ready());
        assert!(!debouncer.fire_if_ready());
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_reschedule_restarts_quiet_period() {
        let mut debouncer = Debouncer::new(Duration::from_millis(30));
        debouncer.schedule();
        sleep(Duration::from_millis(10));
        debouncer.schedule();
        // Only 10ms since the restart: not ready yet
        sleep(Duration::from_millis(10));
        assert!(!debouncer.fire_if_ready());
        sleep(Duration::from_millis(30));
        assert!(debouncer.fire_if_ready());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut debouncer = Debouncer::new(Duration::from_millis(1));
        debouncer.schedule();
        debouncer.cancel();
        debouncer.cancel();
        sleep(Duration::from_millis(5));
        assert!(!debouncer.fire_if_ready());

        // Cancel after firing is also fine
        debouncer.schedule();
        sleep(Duration::from_millis(5));
        assert!(debouncer.fire_if_ready());
        debouncer.cancel();
        assert!(!debouncer.is_pending());
    }
}

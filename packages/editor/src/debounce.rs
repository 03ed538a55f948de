//! # Debouncer
//!
//! Coalesces a burst of updates into one, released after the input has been
//! quiet for a fixed window. Time is supplied by the caller, so the queue is
//! deterministic and owns no timers.
//!
//! ```text
//! push(a, t0)  push(b, t0+100ms)            poll(t0+600ms) -> Some(b)
//!   |------------|-----------------window-----|
//! ```

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Queue `value`, replacing anything pending and restarting the window
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.window));
    }

    /// Release the pending value if its window has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = matches!(&self.pending, Some((_, deadline)) if *deadline <= now);
        if due {
            self.flush()
        } else {
            None
        }
    }

    /// Release the pending value immediately
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_releases_after_quiet_window() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(500));

        debouncer.push("a", start);
        debouncer.push("b", start + Duration::from_millis(100));

        assert_eq!(debouncer.poll(start + Duration::from_millis(500)), None);
        assert_eq!(debouncer.poll(start + Duration::from_millis(600)), Some("b"));
        assert_eq!(debouncer.poll(start + Duration::from_millis(700)), None);
    }

    #[test]
    fn test_flush_ignores_window() {
        let mut debouncer = Debouncer::new(Duration::from_secs(10));
        debouncer.push(1, Instant::now());

        assert_eq!(debouncer.flush(), Some(1));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_zero_window_releases_immediately() {
        let now = Instant::now();
        let mut debouncer = Debouncer::new(Duration::ZERO);
        debouncer.push((), now);

        assert_eq!(debouncer.poll(now), Some(()));
    }
}

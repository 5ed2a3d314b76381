//! Construction-time configuration for a [`Brain`](crate::brain::Brain).

use std::time::Duration;

use crate::activation::Activation;

/// Configuration surface of the engine.
///
/// There is no file format; embedders build this programmatically (a
/// binary typically maps CLI flags onto it).
#[derive(Debug)]
pub struct BrainConfig {
    /// How long the loop may sit on an empty queue before stopping with
    /// [`RunOutcome::TimedOut`](crate::brain::RunOutcome::TimedOut).
    /// `None` disables the idle timeout entirely.
    pub idle_timeout: Option<Duration>,

    /// Sleep between empty-queue checks while idle-waiting.
    pub idle_poll: Duration,

    /// Queue capacity bound. Clamped to at least 1.
    pub capacity: usize,

    /// Strict name resolution: a lookup miss is an error instead of a
    /// warning plus a retry against the `"<name>/0"` default name.
    pub strict: bool,

    /// Optional activation seeded into the queue at construction.
    pub start_signal: Option<Activation>,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Some(Duration::from_secs(60)),
            idle_poll: Duration::from_millis(500),
            capacity: 100,
            strict: false,
            start_signal: None,
        }
    }
}

impl BrainConfig {
    /// Default configuration: 60 s idle timeout, capacity 100, lenient
    /// lookup, no start signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the idle timeout.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }

    /// Disable the idle timeout; the loop then waits indefinitely for
    /// new activations.
    pub fn no_idle_timeout(mut self) -> Self {
        self.idle_timeout = None;
        self
    }

    /// Set the idle polling interval.
    pub fn idle_poll(mut self, poll: Duration) -> Self {
        self.idle_poll = poll;
        self
    }

    /// Set the queue capacity bound.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Enable strict name resolution.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Seed the queue with a start activation at construction.
    pub fn start_signal(mut self, activation: Activation) -> Self {
        self.start_signal = Some(activation);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = BrainConfig::default();
        assert_eq!(cfg.idle_timeout, Some(Duration::from_secs(60)));
        assert_eq!(cfg.idle_poll, Duration::from_millis(500));
        assert_eq!(cfg.capacity, 100);
        assert!(!cfg.strict);
        assert!(cfg.start_signal.is_none());
    }

    #[test]
    fn fluent_setters() {
        let cfg = BrainConfig::new()
            .idle_timeout(Duration::from_millis(10))
            .idle_poll(Duration::from_millis(1))
            .capacity(4)
            .strict()
            .start_signal(Activation::new("print").with_priority(0));

        assert_eq!(cfg.idle_timeout, Some(Duration::from_millis(10)));
        assert_eq!(cfg.capacity, 4);
        assert!(cfg.strict);
        assert_eq!(cfg.start_signal.unwrap().cell, "print");
    }
}

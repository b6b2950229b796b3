use super::protocol::INPUT_UPDATE_INTERVAL;

/// Rate limiter for outbound input updates.
///
/// Timestamps are seconds since some caller-chosen epoch, the same clock the
/// frame loop already runs on. They are plain `f64`s rather than `Instant`s
/// so the clock can sit before the epoch: arming sets `last_send` to
/// `-interval`, which makes the very next eligible tick fire no matter what
/// `now` is.
#[derive(Debug)]
pub struct SendClock {
    last_send: f64,
    interval: f64,
}

impl SendClock {
    pub fn new(interval: f64) -> Self {
        Self {
            // Far enough in the past that the first eligible tick fires.
            last_send: -100.0,
            interval,
        }
    }

    /// True when enough time has passed since the last recorded send.
    pub fn is_due(&self, now: f64) -> bool {
        now - self.last_send > self.interval
    }

    /// Record a completed send. Call only after the transport took the data.
    pub fn mark(&mut self, now: f64) {
        self.last_send = now;
    }

    /// Force the next eligible tick to send immediately.
    pub fn arm(&mut self) {
        self.last_send = -self.interval;
    }
}

impl Default for SendClock {
    fn default() -> Self {
        Self::new(INPUT_UPDATE_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttles_between_sends() {
        let mut clock = SendClock::new(0.05);

        assert!(clock.is_due(10.0));
        clock.mark(10.0);

        assert!(!clock.is_due(10.0));
        assert!(!clock.is_due(10.04));
        assert!(clock.is_due(10.06));
    }

    #[test]
    fn test_arm_fires_at_any_timestamp() {
        let mut clock = SendClock::new(0.05);
        clock.mark(1000.0);
        assert!(!clock.is_due(1000.01));

        clock.arm();
        // Fires for any positive timestamp, even long before the last mark.
        assert!(clock.is_due(0.001));
        assert!(clock.is_due(1000.01));
    }
}

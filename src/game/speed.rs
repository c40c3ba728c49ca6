use std::time::Duration;

/// Shortest allowed delay between ticks, in milliseconds
pub const MIN_DELAY_MS: u64 = 50;
/// Longest allowed delay between ticks, in milliseconds
pub const MAX_DELAY_MS: u64 = 300;
pub const DEFAULT_DELAY_MS: u64 = 200;
/// How much one faster/slower press changes the delay
pub const DELAY_STEP_MS: u64 = 10;

/// Period of the fixed game tick, adjustable at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSpeed {
    delay_ms: u64,
}

impl TickSpeed {
    /// Create a speed from a delay, clamped to the allowed range
    pub fn with_delay(delay_ms: u64) -> Self {
        Self {
            delay_ms: delay_ms.clamp(MIN_DELAY_MS, MAX_DELAY_MS),
        }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Shorten the delay by one step. Returns false if already at the limit.
    pub fn faster(&mut self) -> bool {
        self.set(self.delay_ms.saturating_sub(DELAY_STEP_MS))
    }

    /// Lengthen the delay by one step. Returns false if already at the limit.
    pub fn slower(&mut self) -> bool {
        self.set(self.delay_ms + DELAY_STEP_MS)
    }

    fn set(&mut self, delay_ms: u64) -> bool {
        let clamped = delay_ms.clamp(MIN_DELAY_MS, MAX_DELAY_MS);
        let changed = clamped != self.delay_ms;
        self.delay_ms = clamped;
        changed
    }
}

impl Default for TickSpeed {
    fn default() -> Self {
        Self::with_delay(DEFAULT_DELAY_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_speed() {
        let speed = TickSpeed::default();
        assert_eq!(speed.delay_ms(), 200);
        assert_eq!(speed.interval(), Duration::from_millis(200));
    }

    #[test]
    fn test_with_delay_clamps() {
        assert_eq!(TickSpeed::with_delay(10).delay_ms(), MIN_DELAY_MS);
        assert_eq!(TickSpeed::with_delay(1000).delay_ms(), MAX_DELAY_MS);
        assert_eq!(TickSpeed::with_delay(120).delay_ms(), 120);
    }

    #[test]
    fn test_faster_and_slower() {
        let mut speed = TickSpeed::with_delay(100);

        assert!(speed.faster());
        assert_eq!(speed.delay_ms(), 90);

        assert!(speed.slower());
        assert!(speed.slower());
        assert_eq!(speed.delay_ms(), 110);
    }

    #[test]
    fn test_limits_are_sticky() {
        let mut speed = TickSpeed::with_delay(MIN_DELAY_MS + 5);
        assert!(speed.faster());
        assert_eq!(speed.delay_ms(), MIN_DELAY_MS);
        assert!(!speed.faster());

        let mut speed = TickSpeed::with_delay(MAX_DELAY_MS);
        assert!(!speed.slower());
        assert_eq!(speed.delay_ms(), MAX_DELAY_MS);
    }
}

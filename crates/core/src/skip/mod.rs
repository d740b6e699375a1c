use std::time::{Duration, Instant};

use crate::SkipConfig;

/// Seek request produced by a skip, in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekCommand {
    pub position_secs: u64,
}

/// Accumulates rapid skip presses.
///
/// The player reports its elapsed time with some lag, so a second press right
/// after the first would otherwise skip from a stale position. While the last
/// requested position is fresh it is used as the base instead.
#[derive(Debug, Clone)]
pub struct SkipControl {
    reset_after: Duration,
    last_seek: Option<(f64, Instant)>,
}

impl SkipControl {
    pub fn new(config: &SkipConfig) -> Self {
        Self {
            reset_after: config.reset_after(),
            last_seek: None,
        }
    }

    /// Applies `skip_seconds` (negative to rewind) and returns the seek to
    /// send to the player.
    pub fn skip(
        &mut self,
        now: Instant,
        reported_elapsed: Option<f64>,
        skip_seconds: f64,
    ) -> SeekCommand {
        let base = self
            .pending_position(now)
            .filter(|position| *position != 0.0)
            .or(reported_elapsed)
            .unwrap_or(0.0);
        let position = (base + skip_seconds).max(0.0);
        self.last_seek = Some((position, now));

        tracing::debug!(base, skip_seconds, position, "accumulated skip");
        SeekCommand {
            position_secs: position.round() as u64,
        }
    }

    /// Position requested by the previous skip while it is still fresh.
    pub fn pending_position(&self, now: Instant) -> Option<f64> {
        self.last_seek
            .filter(|(_, at)| now.saturating_duration_since(*at) < self.reset_after)
            .map(|(position, _)| position)
    }

    pub fn reset(&mut self) {
        self.last_seek = None;
    }
}

impl Default for SkipControl {
    fn default() -> Self {
        Self::new(&SkipConfig::default())
    }
}

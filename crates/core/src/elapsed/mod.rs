use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

/// Playback state as reported by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Idle,
    Paused,
    Playing,
}

/// Brings a reported elapsed time up to `now`.
///
/// `elapsed_secs` is the position the player reported at
/// `last_updated_unix_secs` (seconds since the Unix epoch). The position only
/// advances while playing; an unknown state is treated as playing. Clock skew
/// that puts the report in the future never moves the position backwards.
pub fn current_elapsed(
    elapsed_secs: Option<f64>,
    last_updated_unix_secs: Option<f64>,
    state: Option<PlaybackState>,
    now: SystemTime,
) -> Option<f64> {
    let elapsed = elapsed_secs?;
    let Some(last_updated) = last_updated_unix_secs else {
        return Some(elapsed);
    };
    if matches!(state, Some(state) if state != PlaybackState::Playing) {
        return Some(elapsed);
    }

    let now = now
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs_f64();
    Some(elapsed + (now - last_updated).max(0.0))
}

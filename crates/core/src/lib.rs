//! Core helpers for the player front-end.
//!
//! Each module is an independent utility used by the player views:
//! [`sync`] keeps scrolling marquee texts phase-aligned, [`marquee`] drives a
//! single scrolling text against that barrier, [`skip`] accumulates rapid
//! skip presses into one seek position (starting from the position
//! [`elapsed`] extrapolates) and [`search`] ranks search results.

pub mod config;
pub mod elapsed;
pub mod error;
pub mod marquee;
pub mod search;
pub mod skip;
pub mod sync;

pub use config::{AppConfig, MarqueeConfig, SkipConfig};
pub use elapsed::{current_elapsed, PlaybackState};
pub use error::{PlayerUiError, Result};
pub use marquee::{scroll_duration, CyclePlan, MarqueeText};
pub use search::{
    levenshtein_distance, rank, relevance_score, sort_by_relevance, MediaType, SearchItem,
};
pub use skip::{SeekCommand, SkipControl};
pub use sync::{AnimationSync, MarqueeSync, ParticipantId, Release, Rendezvous};

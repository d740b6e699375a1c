use std::{future::Future, time::Duration};

use crate::{AnimationSync, MarqueeConfig, MarqueeSync, Release};

/// Time one full scroll of `overflow_px` takes at the configured speed.
/// Text that fits its box does not scroll at all.
pub fn scroll_duration(overflow_px: f64, config: &MarqueeConfig) -> f64 {
    if overflow_px > 0.0 && config.speed_px_per_sec > 0.0 {
        overflow_px / config.speed_px_per_sec
    } else {
        0.0
    }
}

/// Timing of a single marquee loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CyclePlan {
    pub scroll_secs: f64,
    /// Time spent at the end position so the longest sibling can finish.
    pub hold_secs: f64,
}

impl CyclePlan {
    pub fn total_secs(&self) -> f64 {
        self.scroll_secs + self.hold_secs
    }
}

/// A scrolling text element participating in a shared [`MarqueeSync`].
#[derive(Debug)]
pub struct MarqueeText {
    label: String,
    config: MarqueeConfig,
    duration: f64,
    sync: AnimationSync,
}

impl MarqueeText {
    pub fn new(
        label: impl Into<String>,
        overflow_px: f64,
        sync: &MarqueeSync,
        config: MarqueeConfig,
    ) -> Self {
        let mut text = Self {
            label: label.into(),
            config,
            duration: 0.0,
            sync: sync.register_participant(),
        };
        text.set_overflow(overflow_px);
        text
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Seconds one scroll of this text takes, 0 when it fits.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_scrolling(&self) -> bool {
        self.duration > 0.0
    }

    /// Re-measures the text, e.g. after a resize or a content change.
    pub fn set_overflow(&mut self, overflow_px: f64) {
        self.duration = scroll_duration(overflow_px, &self.config);
        tracing::debug!(
            label = %self.label,
            overflow_px,
            duration = self.duration,
            "marquee measured"
        );
        self.sync.announce_duration(self.duration);
    }

    /// Plans the next loop against the current set of siblings.
    pub fn next_cycle(&self) -> Option<CyclePlan> {
        if !self.is_scrolling() {
            return None;
        }

        let longest = self.sync.max_announced_duration().max(self.duration);
        Some(CyclePlan {
            scroll_secs: self.duration,
            hold_secs: (longest - self.duration + self.config.edge_pause_secs).max(0.0),
        })
    }

    /// Runs one loop: scroll, hold, then wait for the siblings.
    ///
    /// `delay` is the caller's timer. A text that fits returns right away
    /// with [`Release::Withdrawn`].
    pub async fn run_cycle<D, F>(&self, mut delay: D) -> Release
    where
        D: FnMut(Duration) -> F,
        F: Future<Output = ()>,
    {
        let Some(plan) = self.next_cycle() else {
            return Release::Withdrawn;
        };

        delay(seconds(plan.scroll_secs)).await;
        delay(seconds(plan.hold_secs)).await;
        self.sync.wait_for_rendezvous().await
    }
}

fn seconds(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use futures::{
        executor::{block_on, LocalPool},
        future::ready,
        task::LocalSpawnExt,
    };

    use super::*;

    fn config() -> MarqueeConfig {
        MarqueeConfig {
            speed_px_per_sec: 50.0,
            edge_pause_secs: 1.0,
        }
    }

    #[test]
    fn fitting_text_does_not_scroll() {
        assert_eq!(scroll_duration(0.0, &config()), 0.0);
        assert_eq!(scroll_duration(-20.0, &config()), 0.0);
        assert_eq!(scroll_duration(100.0, &config()), 2.0);
    }

    #[test]
    fn shorter_texts_hold_for_the_longest() {
        let sync = MarqueeSync::new();
        let short = MarqueeText::new("short", 50.0, &sync, config());
        let long = MarqueeText::new("long", 200.0, &sync, config());

        let plan = short.next_cycle().unwrap();
        assert_eq!(plan.scroll_secs, 1.0);
        assert_eq!(plan.hold_secs, 4.0);

        let plan = long.next_cycle().unwrap();
        assert_eq!(plan.hold_secs, 1.0);
        assert_eq!(plan.total_secs(), 5.0);
    }

    #[test]
    fn fitting_text_stays_out_of_the_quorum() {
        let sync = MarqueeSync::new();
        let fits = MarqueeText::new("fits", 0.0, &sync, config());
        let scrolls = MarqueeText::new("scrolls", 100.0, &sync, config());

        assert_eq!(sync.participant_count(), 1);
        assert!(fits.next_cycle().is_none());
        assert_eq!(block_on(fits.run_cycle(|_| ready(()))), Release::Withdrawn);
        assert_eq!(block_on(scrolls.run_cycle(|_| ready(()))), Release::Quorum);
    }

    #[test]
    fn resizing_updates_the_announced_duration() {
        let sync = MarqueeSync::new();
        let mut text = MarqueeText::new("title", 100.0, &sync, config());
        text.set_overflow(300.0);
        assert_eq!(text.duration(), 6.0);

        text.set_overflow(0.0);
        assert!(!text.is_scrolling());
        assert_eq!(sync.participant_count(), 0);
    }

    #[test]
    fn siblings_finish_each_round_together() {
        let sync = MarqueeSync::new();
        let finished = Rc::new(RefCell::new(Vec::new()));
        let mut pool = LocalPool::new();

        for (label, overflow) in [("a", 50.0), ("b", 125.0), ("c", 300.0)] {
            let text = MarqueeText::new(label, overflow, &sync, config());
            let finished = Rc::clone(&finished);
            pool.spawner()
                .spawn_local(async move {
                    let mut elapsed = Duration::ZERO;
                    for _ in 0..2 {
                        let release = text
                            .run_cycle(|step| {
                                elapsed += step;
                                ready(())
                            })
                            .await;
                        assert_eq!(release, Release::Quorum);
                    }
                    finished.borrow_mut().push(elapsed);
                })
                .unwrap();
        }
        pool.run();

        let finished = finished.borrow();
        assert_eq!(finished.len(), 3);
        assert!(finished
            .iter()
            .all(|elapsed| *elapsed == Duration::from_secs(14)));
        assert_eq!(sync.participant_count(), 0);
    }
}

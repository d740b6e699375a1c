//! Rendezvous barrier that keeps looping marquee animations phase-aligned.
//!
//! Every scrolling text registers an [`AnimationSync`] with a shared
//! [`MarqueeSync`], announces how long one scroll takes, and awaits
//! [`AnimationSync::wait_for_rendezvous`] at the end of each loop. The barrier
//! releases all waiters together once every duration-bearing participant is
//! waiting, so texts of different lengths restart at the same instant.
//!
//! The quorum is the set of participants with a positive duration on record.
//! A participant that stops animating must unregister (explicitly, via a
//! non-positive duration, or by dropping its handle); a stale registration
//! would otherwise hold every later rendezvous open forever.

use std::{
    collections::HashMap,
    fmt,
    future::Future,
    pin::Pin,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    task::{Context, Poll},
};

use futures::channel::oneshot;

static NEXT_PARTICIPANT: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a registered animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticipantId(u64);

impl ParticipantId {
    fn next() -> Self {
        Self(NEXT_PARTICIPANT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "anim#{}", self.0)
    }
}

/// Why a [`Rendezvous`] completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Every participant in the quorum reached the sync point.
    Quorum,
    /// The participant unregistered while it was waiting.
    Withdrawn,
    /// A newer wait from the same participant replaced this one.
    Superseded,
}

#[derive(Default)]
struct BarrierState {
    durations: HashMap<ParticipantId, f64>,
    /// Arrival ordered, at most one entry per participant.
    pending: Vec<(ParticipantId, oneshot::Sender<Release>)>,
}

impl BarrierState {
    fn take_pending(&mut self, id: ParticipantId) -> Option<oneshot::Sender<Release>> {
        let index = self.pending.iter().position(|(pending, _)| *pending == id)?;
        Some(self.pending.remove(index).1)
    }

    /// Releases every waiter when the whole quorum is waiting. Returns
    /// whether a rendezvous happened.
    fn try_resolve(&mut self) -> bool {
        if self.pending.len() != self.durations.len() || self.pending.is_empty() {
            return false;
        }

        let pending = std::mem::take(&mut self.pending);
        tracing::debug!(
            released = pending.len(),
            quorum = self.durations.len(),
            "marquee rendezvous reached"
        );
        for (_, resolve) in pending {
            // A dropped receiver just means nobody is listening anymore.
            let _ = resolve.send(Release::Quorum);
        }
        true
    }
}

/// Shared coordination point for a group of synchronised animations.
///
/// Cloning is cheap and every clone refers to the same barrier, so it can be
/// handed to each animated element as a plain value.
#[derive(Clone, Default)]
pub struct MarqueeSync {
    state: Arc<Mutex<BarrierState>>,
}

impl MarqueeSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a handle for a new animation. It joins the quorum once it
    /// announces a positive duration.
    pub fn register_participant(&self) -> AnimationSync {
        let id = ParticipantId::next();
        tracing::debug!(participant = %id, "registered marquee participant");
        AnimationSync {
            id,
            sync: self.clone(),
        }
    }

    /// Number of participants with a positive duration on record.
    pub fn participant_count(&self) -> usize {
        self.lock().durations.len()
    }

    /// Number of participants currently waiting at the sync point.
    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }

    // Every critical section leaves the state consistent, so a panic on
    // another thread does not invalidate it.
    fn lock(&self) -> MutexGuard<'_, BarrierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for MarqueeSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("MarqueeSync")
            .field("participants", &state.durations.len())
            .field("pending", &state.pending.len())
            .finish()
    }
}

/// One running animation's view of the barrier.
///
/// Dropping the handle unregisters it.
#[derive(Debug)]
pub struct AnimationSync {
    id: ParticipantId,
    sync: MarqueeSync,
}

impl AnimationSync {
    pub fn id(&self) -> ParticipantId {
        self.id
    }

    /// Records the time one full scroll of this animation takes, in seconds.
    ///
    /// A non-positive (or NaN) duration means the animation stopped and is
    /// handled exactly like [`unregister`](Self::unregister). Announcing never
    /// releases waiters by itself.
    pub fn announce_duration(&self, duration: f64) {
        if duration > 0.0 {
            tracing::trace!(participant = %self.id, duration, "announced scroll duration");
            self.sync.lock().durations.insert(self.id, duration);
        } else {
            self.unregister();
        }
    }

    /// Longest duration currently announced by any participant, 0 if none.
    pub fn max_announced_duration(&self) -> f64 {
        self.sync
            .lock()
            .durations
            .values()
            .copied()
            .fold(0.0, f64::max)
    }

    /// Joins the sync point and returns a future that completes once the
    /// whole quorum is waiting.
    ///
    /// The wait is registered when this is called, not when the future is
    /// first polled. Calling it again before the previous wait completed
    /// replaces that wait, which then resolves with [`Release::Superseded`].
    ///
    /// The arrival that completes the quorum yields once before resuming, so
    /// it wakes after every earlier arrival.
    pub fn wait_for_rendezvous(&self) -> Rendezvous {
        let (resolve, receiver) = oneshot::channel();
        let mut state = self.sync.lock();
        if let Some(previous) = state.take_pending(self.id) {
            tracing::debug!(participant = %self.id, "replaced outstanding rendezvous wait");
            let _ = previous.send(Release::Superseded);
        }
        state.pending.push((self.id, resolve));
        let yield_first = state.try_resolve();
        Rendezvous {
            receiver,
            yield_first,
        }
    }

    /// Leaves the quorum, releases this participant's own wait and lets the
    /// remaining participants proceed if they were only waiting on it.
    ///
    /// Calling it again is a no-op.
    pub fn unregister(&self) {
        let mut state = self.sync.lock();
        let had_duration = state.durations.remove(&self.id).is_some();
        let waiting = state.take_pending(self.id);
        if !had_duration && waiting.is_none() {
            return;
        }

        tracing::debug!(
            participant = %self.id,
            was_waiting = waiting.is_some(),
            "unregistered marquee participant"
        );
        if let Some(resolve) = waiting {
            let _ = resolve.send(Release::Withdrawn);
        }
        state.try_resolve();
    }
}

impl Drop for AnimationSync {
    fn drop(&mut self) {
        self.unregister();
    }
}

/// Future returned by [`AnimationSync::wait_for_rendezvous`].
#[derive(Debug)]
#[must_use = "the rendezvous only helps if it is awaited"]
pub struct Rendezvous {
    receiver: oneshot::Receiver<Release>,
    /// Set for the arrival that completed the quorum.
    yield_first: bool,
}

impl Future for Rendezvous {
    type Output = Release;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.yield_first {
            // The earlier arrivals were woken by the release; queue behind them.
            self.yield_first = false;
            cx.waker().wake_by_ref();
            return Poll::Pending;
        }

        // The sender only disappears without a value when the barrier state
        // itself is gone, which leaves nothing to wait for.
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|released| released.unwrap_or(Release::Withdrawn))
    }
}

//! Deferred visual effects
//!
//! Selecting the active match and scrolling it into view are decoupled from
//! the state transition that asked for them. The selection runs on the next
//! tick, the scroll after a short delay, and both re-read the session when
//! they fire: an effect scheduled against an older generation of matches is
//! dropped instead of selecting a range that no longer means anything.

use crate::{DocumentMutation, DocumentScan, SearchHost, SearchSession, TextRange, ViewEffects};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Default delay between selecting a match and scrolling to it
pub const DEFAULT_SCROLL_DELAY: Duration = Duration::from_millis(100);

/// A visual effect waiting to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DeferredEffect {
    /// Select `range` if the session still has the same matches
    SelectMatch { generation: u64, range: TextRange },
    /// Scroll whatever match is active when this fires into view
    ScrollActiveIntoView,
}

#[derive(Debug, Clone)]
struct Scheduled {
    due: Instant,
    /// Tie-breaker so effects due at the same instant run in schedule order
    seq: u64,
    effect: DeferredEffect,
}

/// Time-ordered queue of [`DeferredEffect`]s
#[derive(Debug, Clone)]
pub struct DeferredQueue {
    pending: Vec<Scheduled>,
    next_seq: u64,
    scroll_delay: Duration,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::with_scroll_delay(DEFAULT_SCROLL_DELAY)
    }

    pub fn with_scroll_delay(scroll_delay: Duration) -> Self {
        Self {
            pending: Vec::new(),
            next_seq: 0,
            scroll_delay,
        }
    }

    pub fn scroll_delay(&self) -> Duration {
        self.scroll_delay
    }

    /// Schedule `effect` to run on the next tick
    pub fn schedule_tick(&mut self, now: Instant, effect: DeferredEffect) {
        self.schedule_after(now, Duration::ZERO, effect);
    }

    /// Schedule `effect` to run once `delay` has elapsed
    pub fn schedule_after(&mut self, now: Instant, delay: Duration, effect: DeferredEffect) {
        let scheduled = Scheduled {
            due: now + delay,
            seq: self.next_seq,
            effect,
        };
        self.next_seq += 1;

        let index = self
            .pending
            .partition_point(|s| (s.due, s.seq) <= (scheduled.due, scheduled.seq));
        self.pending.insert(index, scheduled);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// When the earliest pending effect becomes due
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.first().map(|s| s.due)
    }

    /// Drop everything pending
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Run every effect due at or before `now`, including effects that
    /// running ones schedule for `now`. Returns how many actually took
    /// effect on the host.
    pub fn run_due<H: SearchHost + ?Sized>(
        &mut self,
        now: Instant,
        session: &SearchSession,
        host: &mut H,
    ) -> usize {
        let mut applied = 0;
        while let Some(first) = self.pending.first() {
            if first.due > now {
                break;
            }
            let scheduled = self.pending.remove(0);
            if self.run_one(now, scheduled.effect, session, host) {
                applied += 1;
            }
        }
        applied
    }

    fn run_one<H: SearchHost + ?Sized>(
        &mut self,
        now: Instant,
        effect: DeferredEffect,
        session: &SearchSession,
        host: &mut H,
    ) -> bool {
        match effect {
            DeferredEffect::SelectMatch { generation, range } => {
                if generation != session.generation() {
                    tracing::debug!(generation, current = session.generation(), "stale selection skipped");
                    return false;
                }
                if range.to > host.content_size() {
                    tracing::debug!(?range, "selection outside document skipped");
                    return false;
                }
                if let Err(e) = host.set_selection(range.from, range.to) {
                    tracing::warn!(?range, "failed to select match: {}", e);
                    return false;
                }
                let delay = self.scroll_delay;
                self.schedule_after(now, delay, DeferredEffect::ScrollActiveIntoView);
                true
            }
            DeferredEffect::ScrollActiveIntoView => {
                if !session.is_panel_open() {
                    tracing::debug!("scroll skipped: panel closed");
                    return false;
                }
                match session.active_match() {
                    Some(range) => host.scroll_into_view(range),
                    None => {
                        tracing::debug!("scroll skipped: no active match");
                        false
                    }
                }
            }
        }
    }
}

impl Default for DeferredQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Direction, EditingEngine};
    use doc_model::{DocumentTree, Selection};

    fn engine(text: &str) -> EditingEngine {
        EditingEngine::with_tree(DocumentTree::from_plain_text(text))
    }

    fn open_session_on(engine: &EditingEngine, query: &str) -> SearchSession {
        let mut session = SearchSession::new();
        session.open_panel();
        session.find(query, engine);
        session
    }

    #[test]
    fn test_select_then_scroll_after_delay() {
        let mut host = engine("one two one");
        let mut session = open_session_on(&host, "one");
        let effect = session.navigate(Direction::Forward).unwrap();

        let mut queue = DeferredQueue::new();
        let start = Instant::now();
        queue.schedule_tick(start, effect);

        assert_eq!(queue.run_due(start, &session, &mut host), 1);
        assert_eq!(host.selection(), Selection::new(9, 12));
        assert_eq!(host.take_reveal_request(), None);
        assert_eq!(queue.next_due(), Some(start + DEFAULT_SCROLL_DELAY));

        assert_eq!(queue.run_due(start + Duration::from_millis(50), &session, &mut host), 0);
        assert_eq!(queue.run_due(start + DEFAULT_SCROLL_DELAY, &session, &mut host), 1);
        assert_eq!(host.take_reveal_request(), Some(TextRange::new(9, 12)));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_stale_selection_is_dropped() {
        let mut host = engine("ab ab");
        let mut session = open_session_on(&host, "ab");
        let effect = session.navigate(Direction::Forward).unwrap();

        // A new find before the tick invalidates the pending selection
        session.find("b", &host);

        let mut queue = DeferredQueue::new();
        let now = Instant::now();
        queue.schedule_tick(now, effect);
        assert_eq!(queue.run_due(now, &session, &mut host), 0);
        assert_eq!(host.selection(), Selection::default());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_scroll_skipped_when_panel_closed() {
        let mut host = engine("abc abc");
        let mut session = open_session_on(&host, "abc");
        session.close_panel();

        let mut queue = DeferredQueue::new();
        let now = Instant::now();
        queue.schedule_tick(now, DeferredEffect::ScrollActiveIntoView);
        assert_eq!(queue.run_due(now, &session, &mut host), 0);
        assert_eq!(host.take_reveal_request(), None);
    }

    #[test]
    fn test_scroll_uses_active_match_when_fired() {
        let mut host = engine("x y x");
        let mut session = open_session_on(&host, "x");

        let mut queue = DeferredQueue::with_scroll_delay(Duration::from_millis(10));
        let now = Instant::now();
        queue.schedule_after(now, Duration::from_millis(10), DeferredEffect::ScrollActiveIntoView);
        session.navigate(Direction::Forward);

        queue.run_due(now + Duration::from_millis(10), &session, &mut host);
        assert_eq!(host.take_reveal_request(), Some(TextRange::new(5, 6)));
    }

    #[test]
    fn test_effects_run_in_schedule_order() {
        let mut queue = DeferredQueue::new();
        let now = Instant::now();
        queue.schedule_after(now, Duration::from_millis(5), DeferredEffect::ScrollActiveIntoView);
        queue.schedule_tick(
            now,
            DeferredEffect::SelectMatch {
                generation: 0,
                range: TextRange::new(0, 0),
            },
        );
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.next_due(), Some(now));
    }

    #[test]
    fn test_out_of_bounds_selection_skipped() {
        let mut host = engine("abc");
        let session = open_session_on(&host, "abc");
        let mut queue = DeferredQueue::new();
        let now = Instant::now();
        queue.schedule_tick(
            now,
            DeferredEffect::SelectMatch {
                generation: session.generation(),
                range: TextRange::new(1, host.content_size() + 5),
            },
        );
        assert_eq!(queue.run_due(now, &session, &mut host), 0);
    }
}

//! Lossless, ordered queue of key transitions.
//!
//! [`InputQueue`] buffers key events between the presenter (which pushes
//! on every physical edge transition) and the engine thread (which drains
//! everything once per tick). Unlike the frame slot, nothing here is
//! latest-wins: a tap shorter than one tick still yields a press and a
//! release, in order.
//!
//! # Ordering
//!
//! Every push appends under the queue's mutex, so the queue order is the
//! order in which producers acquired it. A drain swaps the whole backlog
//! out in one critical section: an event pushed concurrently with a drain
//! lands either in the returned batch or in the next one, never in both
//! and never in neither.

use std::sync::atomic::{AtomicU64, Ordering};

use doombridge_core::{EventSink, KeyCode, KeyDirection, KeyEvent};
use parking_lot::Mutex;
use smallvec::SmallVec;

/// Events handed to the engine in one drain. A tick rarely carries more
/// than a handful of transitions, so small batches stay on the stack.
pub type EventBatch = SmallVec<[KeyEvent; 16]>;

/// Unbounded multi-producer, single-consumer key event queue.
pub struct InputQueue {
    events: Mutex<Vec<KeyEvent>>,
    pushed: AtomicU64,
    drained: AtomicU64,
}

// Compile-time assertion: InputQueue must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<InputQueue>();
};

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InputQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            pushed: AtomicU64::new(0),
            drained: AtomicU64::new(0),
        }
    }

    /// Append one event.
    ///
    /// Repeat notifications for a held key must be filtered out before
    /// this call; the queue stores exactly what it is given.
    pub fn push(&self, event: KeyEvent) {
        self.events.lock().push(event);
        self.pushed.fetch_add(1, Ordering::Relaxed);
    }

    /// Append a transition built from its parts.
    pub fn push_key(&self, direction: KeyDirection, code: KeyCode) {
        self.push(KeyEvent { direction, code });
    }

    /// Take every event queued since the last drain, oldest first.
    ///
    /// An empty batch is the normal result for a tick with no input.
    pub fn drain_all(&self) -> EventBatch {
        let batch: EventBatch = self.events.lock().drain(..).collect();
        self.drained.fetch_add(batch.len() as u64, Ordering::Relaxed);
        batch
    }

    /// Drain and deliver every queued event to `sink`, oldest first.
    ///
    /// The queue lock is released before the sink sees any event.
    /// Returns the number of events delivered.
    pub fn drain_into(&self, sink: &mut dyn EventSink) -> usize {
        let batch = self.drain_all();
        let n = batch.len();
        for event in batch {
            sink.post_event(event);
        }
        n
    }

    /// Number of events currently waiting.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Whether no events are waiting.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Total events ever pushed.
    pub fn pushed(&self) -> u64 {
        self.pushed.load(Ordering::Relaxed)
    }

    /// Total events ever drained.
    pub fn drained(&self) -> u64 {
        self.drained.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_drain_is_empty() {
        let q = InputQueue::new();
        assert!(q.is_empty());
        assert!(q.drain_all().is_empty());
        assert_eq!(q.drained(), 0);
    }

    #[test]
    fn press_release_pair_drains_in_order() {
        let q = InputQueue::new();
        q.push(KeyEvent::pressed(0x1D));
        q.push(KeyEvent::released(0x1D));
        assert_eq!(q.len(), 2);

        let batch = q.drain_all();
        assert_eq!(
            batch.as_slice(),
            &[KeyEvent::pressed(0x1D), KeyEvent::released(0x1D)]
        );
        assert!(q.drain_all().is_empty(), "drain is destructive");
        assert_eq!(q.pushed(), 2);
        assert_eq!(q.drained(), 2);
    }

    #[test]
    fn modifier_and_key_keep_relative_order() {
        let q = InputQueue::new();
        q.push_key(KeyDirection::Pressed, doombridge_core::keys::RSHIFT);
        q.push_key(KeyDirection::Pressed, KeyCode(i32::from(b'w')));
        q.push_key(KeyDirection::Released, doombridge_core::keys::RSHIFT);
        let codes: Vec<_> = q.drain_all().iter().map(|e| e.code).collect();
        assert_eq!(
            codes,
            vec![
                doombridge_core::keys::RSHIFT,
                KeyCode(i32::from(b'w')),
                doombridge_core::keys::RSHIFT
            ]
        );
    }

    #[test]
    fn drain_into_delivers_to_sink() {
        let q = InputQueue::new();
        q.push(KeyEvent::pressed(1));
        q.push(KeyEvent::pressed(2));
        let mut sink: Vec<KeyEvent> = Vec::new();
        assert_eq!(q.drain_into(&mut sink), 2);
        assert_eq!(sink, vec![KeyEvent::pressed(1), KeyEvent::pressed(2)]);
        assert_eq!(q.drain_into(&mut sink), 0);
    }

    #[test]
    fn large_batches_spill_to_heap_losslessly() {
        let q = InputQueue::new();
        for i in 0..100 {
            q.push(KeyEvent::pressed(i));
        }
        let batch = q.drain_all();
        assert_eq!(batch.len(), 100);
        assert!(batch.iter().enumerate().all(|(i, e)| e.code == KeyCode(i as i32)));
    }

    // ── proptest ───────────────────────────────────────────────

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Clone, Debug)]
        enum Op {
            Push(KeyEvent),
            Drain,
        }

        fn arb_event() -> impl Strategy<Value = KeyEvent> {
            (any::<bool>(), 0i32..256).prop_map(|(down, code)| {
                if down {
                    KeyEvent::pressed(code)
                } else {
                    KeyEvent::released(code)
                }
            })
        }

        fn arb_op() -> impl Strategy<Value = Op> {
            prop_oneof![
                3 => arb_event().prop_map(Op::Push),
                1 => Just(Op::Drain),
            ]
        }

        proptest! {
            #[test]
            fn concatenated_drains_equal_push_order(
                ops in prop::collection::vec(arb_op(), 0..128),
            ) {
                let q = InputQueue::new();
                let mut pushed = Vec::new();
                let mut drained = Vec::new();
                for op in ops {
                    match op {
                        Op::Push(e) => {
                            q.push(e);
                            pushed.push(e);
                        }
                        Op::Drain => drained.extend(q.drain_all()),
                    }
                }
                drained.extend(q.drain_all());
                prop_assert_eq!(drained, pushed);
                prop_assert!(q.is_empty());
            }
        }
    }
}

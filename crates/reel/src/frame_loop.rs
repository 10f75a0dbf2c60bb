use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

/// One display refresh at 60 Hz.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_nanos(16_666_667);

/// Upper bound on ticks emitted by a single `advance`, so a stalled window
/// does not replay seconds of animation in one frame.
pub const MAX_CATCH_UP_TICKS: u64 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub index: u64,
    /// Logical time of this tick since the loop was created.
    pub at: Duration,
}

type Callback = Rc<RefCell<dyn FnMut(Tick)>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    callbacks: BTreeMap<u64, Callback>,
}

/// Cooperative, single-threaded fixed-rate scheduler.
///
/// Wall time fed through [`FrameLoop::advance`] is converted into whole ticks;
/// every live subscription runs once per tick in subscription order.
pub struct FrameLoop {
    registry: Rc<RefCell<Registry>>,
    tick_interval: Duration,
    accumulated: Duration,
    now: Duration,
    ticks: u64,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}

impl fmt::Debug for FrameLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameLoop")
            .field("tick_interval", &self.tick_interval)
            .field("now", &self.now)
            .field("ticks", &self.ticks)
            .field("subscriptions", &self.active_subscriptions())
            .finish()
    }
}

impl FrameLoop {
    pub fn new(tick_interval: Duration) -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry::default())),
            tick_interval: tick_interval.max(Duration::from_nanos(1)),
            accumulated: Duration::ZERO,
            now: Duration::ZERO,
            ticks: 0,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Logical time of the most recent tick.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn active_subscriptions(&self) -> usize {
        self.registry.borrow().callbacks.len()
    }

    /// Run `callback` once per tick until the returned handle is dropped.
    pub fn subscribe(&self, callback: impl FnMut(Tick) + 'static) -> FrameHandle {
        let callback: Callback = Rc::new(RefCell::new(callback));
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.callbacks.insert(id, callback);
        tracing::trace!(id, "frame subscription added");
        FrameHandle {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Feed elapsed wall time; returns the number of ticks emitted.
    pub fn advance(&mut self, elapsed: Duration) -> u64 {
        self.accumulated += elapsed;
        let interval = self.tick_interval.as_nanos();
        let mut due = (self.accumulated.as_nanos() / interval) as u64;
        let remainder = self.accumulated.as_nanos() % interval;
        self.accumulated = Duration::from_nanos(remainder as u64);

        if due > MAX_CATCH_UP_TICKS {
            tracing::debug!(
                skipped = due - MAX_CATCH_UP_TICKS,
                "frame loop fell behind; dropping ticks"
            );
            due = MAX_CATCH_UP_TICKS;
        }
        for _ in 0..due {
            self.dispatch();
        }
        due
    }

    /// Emit exactly one tick regardless of accumulated time.
    pub fn tick(&mut self) {
        self.dispatch();
    }

    fn dispatch(&mut self) {
        self.now += self.tick_interval;
        let tick = Tick {
            index: self.ticks,
            at: self.now,
        };
        self.ticks += 1;

        let snapshot: Vec<(u64, Callback)> = self
            .registry
            .borrow()
            .callbacks
            .iter()
            .map(|(id, callback)| (*id, Rc::clone(callback)))
            .collect();

        for (id, callback) in snapshot {
            // Cancelled by an earlier callback in this same tick
            if !self.registry.borrow().callbacks.contains_key(&id) {
                continue;
            }
            match callback.try_borrow_mut() {
                Ok(mut callback) => (&mut *callback)(tick),
                Err(_) => tracing::warn!(id, "frame callback re-entered; skipping tick"),
            }
        }
    }
}

/// Registration of a per-tick callback. Dropping it cancels the callback.
pub struct FrameHandle {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl fmt::Debug for FrameHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameHandle")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

impl FrameHandle {
    pub fn is_active(&self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        registry.borrow().callbacks.contains_key(&self.id)
    }

    pub fn cancel(self) {}
}

impl Drop for FrameHandle {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        // Release the borrow before the callback (and whatever it captured) drops
        let removed = registry.borrow_mut().callbacks.remove(&self.id);
        if removed.is_some() {
            tracing::trace!(id = self.id, "frame subscription cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counter(frame_loop: &FrameLoop) -> (Rc<Cell<u32>>, FrameHandle) {
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        let handle = frame_loop.subscribe(move |_| seen.set(seen.get() + 1));
        (count, handle)
    }

    #[test]
    fn test_tick_runs_subscribers() {
        let mut frame_loop = FrameLoop::default();
        let (count, _handle) = counter(&frame_loop);
        frame_loop.tick();
        frame_loop.tick();
        assert_eq!(count.get(), 2);
        assert_eq!(frame_loop.ticks(), 2);
        assert_eq!(frame_loop.now(), DEFAULT_TICK_INTERVAL * 2);
    }

    #[test]
    fn test_dropping_handle_cancels() {
        let mut frame_loop = FrameLoop::default();
        let (count, handle) = counter(&frame_loop);
        frame_loop.tick();
        drop(handle);
        assert_eq!(frame_loop.active_subscriptions(), 0);
        frame_loop.tick();
        frame_loop.advance(Duration::from_secs(1));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_explicit_cancel() {
        let mut frame_loop = FrameLoop::default();
        let (count, handle) = counter(&frame_loop);
        assert!(handle.is_active());
        handle.cancel();
        frame_loop.tick();
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_advance_accumulates_partial_intervals() {
        let mut frame_loop = FrameLoop::new(Duration::from_millis(10));
        let (count, _handle) = counter(&frame_loop);
        assert_eq!(frame_loop.advance(Duration::from_millis(4)), 0);
        assert_eq!(frame_loop.advance(Duration::from_millis(4)), 0);
        assert_eq!(frame_loop.advance(Duration::from_millis(4)), 1);
        assert_eq!(frame_loop.advance(Duration::from_millis(28)), 3);
        assert_eq!(count.get(), 4);
        assert_eq!(frame_loop.now(), Duration::from_millis(40));
    }

    #[test]
    fn test_advance_caps_catch_up() {
        let mut frame_loop = FrameLoop::new(Duration::from_millis(10));
        let (count, _handle) = counter(&frame_loop);
        assert_eq!(frame_loop.advance(Duration::from_secs(5)), MAX_CATCH_UP_TICKS);
        assert_eq!(count.get() as u64, MAX_CATCH_UP_TICKS);
        // The backlog is discarded rather than replayed next frame
        assert_eq!(frame_loop.advance(Duration::ZERO), 0);
    }

    #[test]
    fn test_cancel_other_subscription_during_dispatch() {
        let mut frame_loop = FrameLoop::default();
        let victim_runs = Rc::new(Cell::new(0));

        let slot: Rc<RefCell<Option<FrameHandle>>> = Rc::new(RefCell::new(None));
        let killer_slot = Rc::clone(&slot);
        let _killer = frame_loop.subscribe(move |_| {
            killer_slot.borrow_mut().take();
        });

        let runs = Rc::clone(&victim_runs);
        let victim = frame_loop.subscribe(move |_| runs.set(runs.get() + 1));
        *slot.borrow_mut() = Some(victim);

        frame_loop.tick();
        frame_loop.tick();
        assert_eq!(victim_runs.get(), 0);
        assert_eq!(frame_loop.active_subscriptions(), 1);
    }

    #[test]
    fn test_self_cancel_during_dispatch() {
        let mut frame_loop = FrameLoop::default();
        let runs = Rc::new(Cell::new(0));
        let slot: Rc<RefCell<Option<FrameHandle>>> = Rc::new(RefCell::new(None));

        let own_slot = Rc::clone(&slot);
        let seen = Rc::clone(&runs);
        let handle = frame_loop.subscribe(move |_| {
            seen.set(seen.get() + 1);
            own_slot.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(handle);

        frame_loop.tick();
        frame_loop.tick();
        assert_eq!(runs.get(), 1);
        assert_eq!(frame_loop.active_subscriptions(), 0);
    }

    #[test]
    fn test_handle_outliving_loop_is_inert() {
        let frame_loop = FrameLoop::default();
        let (_count, handle) = counter(&frame_loop);
        drop(frame_loop);
        assert!(!handle.is_active());
        drop(handle);
    }
}

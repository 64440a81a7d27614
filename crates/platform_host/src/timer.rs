//! Timer service contracts and a deterministic virtual-clock adapter.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    rc::{Rc, Weak},
};

/// One-shot timer callback.
pub type TimeoutCallback = Box<dyn FnOnce()>;
/// Repeating timer callback.
pub type IntervalCallback = Rc<dyn Fn()>;

/// Host service for deferred and periodic callbacks on the single UI event loop.
pub trait TimerService {
    /// Schedules `callback` to run once after `delay_ms`.
    fn set_timeout(&self, delay_ms: u32, callback: TimeoutCallback) -> TimerHandle;

    /// Schedules `callback` to run every `period_ms` until the returned handle is cancelled.
    fn set_interval(&self, period_ms: u32, callback: IntervalCallback) -> TimerHandle;
}

#[derive(Clone)]
/// Cancellation handle for a scheduled timer.
///
/// Cancelling is idempotent: only the first call reaches the host.
pub struct TimerHandle {
    cancel: Rc<dyn Fn()>,
    cancelled: Rc<Cell<bool>>,
}

impl TimerHandle {
    /// Creates a handle from a host-specific cancel routine.
    pub fn new(cancel: Rc<dyn Fn()>) -> Self {
        Self {
            cancel,
            cancelled: Rc::new(Cell::new(false)),
        }
    }

    /// Creates a handle that owns no host timer.
    pub fn noop() -> Self {
        Self::new(Rc::new(|| {}))
    }

    /// Cancels the timer. Calling this more than once has no further effect.
    pub fn cancel(&self) {
        if self.cancelled.replace(true) {
            return;
        }
        (self.cancel)();
    }

    /// Returns whether [`TimerHandle::cancel`] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

impl std::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerHandle")
            .field("cancelled", &self.cancelled.get())
            .finish()
    }
}

enum ScheduledCallback {
    Once(TimeoutCallback),
    Every(IntervalCallback),
}

struct ScheduledTimer {
    due_ms: u64,
    period_ms: Option<u64>,
    callback: ScheduledCallback,
}

#[derive(Default)]
struct ManualClock {
    now_ms: u64,
    next_id: u64,
    timers: BTreeMap<u64, ScheduledTimer>,
}

#[derive(Clone, Default)]
/// Virtual-clock timer service driven explicitly with [`ManualTimerService::advance`].
///
/// Timers fire in due-time order (ties in scheduling order). Callbacks run with no internal
/// borrow held, so they may schedule or cancel other timers.
pub struct ManualTimerService {
    clock: Rc<RefCell<ManualClock>>,
}

impl ManualTimerService {
    /// Creates an empty scheduler at virtual time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.clock.borrow().now_ms
    }

    /// Number of timers still scheduled.
    pub fn pending(&self) -> usize {
        self.clock.borrow().timers.len()
    }

    /// Advances virtual time by `ms`, firing every timer that falls due on the way.
    pub fn advance(&self, ms: u64) {
        let target = self.clock.borrow().now_ms.saturating_add(ms);
        while let Some(callback) = self.pop_due(target) {
            match callback {
                ScheduledCallback::Once(callback) => callback(),
                ScheduledCallback::Every(callback) => callback(),
            }
        }
        self.clock.borrow_mut().now_ms = target;
    }

    fn pop_due(&self, target: u64) -> Option<ScheduledCallback> {
        let mut clock = self.clock.borrow_mut();
        let (id, due_ms) = clock
            .timers
            .iter()
            .filter(|(_, timer)| timer.due_ms <= target)
            .min_by_key(|(id, timer)| (timer.due_ms, **id))
            .map(|(id, timer)| (*id, timer.due_ms))?;
        clock.now_ms = due_ms;

        let timer = clock.timers.remove(&id)?;
        match (timer.period_ms, timer.callback) {
            (Some(period_ms), ScheduledCallback::Every(callback)) => {
                clock.timers.insert(
                    id,
                    ScheduledTimer {
                        due_ms: due_ms + period_ms,
                        period_ms: Some(period_ms),
                        callback: ScheduledCallback::Every(callback.clone()),
                    },
                );
                Some(ScheduledCallback::Every(callback))
            }
            (_, callback) => Some(callback),
        }
    }

    fn schedule(
        &self,
        delay_ms: u64,
        period_ms: Option<u64>,
        callback: ScheduledCallback,
    ) -> TimerHandle {
        let id = {
            let mut clock = self.clock.borrow_mut();
            let id = clock.next_id;
            clock.next_id += 1;
            let due_ms = clock.now_ms + delay_ms;
            clock.timers.insert(
                id,
                ScheduledTimer {
                    due_ms,
                    period_ms,
                    callback,
                },
            );
            id
        };

        let clock: Weak<RefCell<ManualClock>> = Rc::downgrade(&self.clock);
        TimerHandle::new(Rc::new(move || {
            if let Some(clock) = clock.upgrade() {
                clock.borrow_mut().timers.remove(&id);
            }
        }))
    }
}

impl TimerService for ManualTimerService {
    fn set_timeout(&self, delay_ms: u32, callback: TimeoutCallback) -> TimerHandle {
        self.schedule(u64::from(delay_ms), None, ScheduledCallback::Once(callback))
    }

    fn set_interval(&self, period_ms: u32, callback: IntervalCallback) -> TimerHandle {
        let period_ms = u64::from(period_ms.max(1));
        self.schedule(period_ms, Some(period_ms), ScheduledCallback::Every(callback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_fires_once_when_due() {
        let timers = ManualTimerService::new();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        timers.set_timeout(1_000, Box::new(move || counter.set(counter.get() + 1)));

        timers.advance(999);
        assert_eq!(hits.get(), 0);
        timers.advance(1);
        assert_eq!(hits.get(), 1);
        timers.advance(5_000);
        assert_eq!(hits.get(), 1);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn interval_repeats_until_cancelled() {
        let timers = ManualTimerService::new();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let handle = timers.set_interval(100, Rc::new(move || counter.set(counter.get() + 1)));

        timers.advance(350);
        assert_eq!(hits.get(), 3);

        handle.cancel();
        handle.cancel();
        assert!(handle.is_cancelled());
        timers.advance(1_000);
        assert_eq!(hits.get(), 3);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn callbacks_may_schedule_follow_up_timers() {
        let timers = ManualTimerService::new();
        let hits = Rc::new(Cell::new(0));
        let inner_timers = timers.clone();
        let counter = hits.clone();
        timers.set_timeout(
            10,
            Box::new(move || {
                let counter = counter.clone();
                inner_timers.set_timeout(10, Box::new(move || counter.set(counter.get() + 1)));
            }),
        );

        timers.advance(25);
        assert_eq!(hits.get(), 1);
        assert_eq!(timers.now_ms(), 25);
    }
}

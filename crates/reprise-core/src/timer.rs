use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use slotmap::{SlotMap, new_key_type};
use web_time::{Duration, Instant};

new_key_type! {
    pub struct TimerKey;
}

struct TimerEntry {
    period: Duration,
    deadline: Instant,
    callback: Rc<dyn Fn()>,
}

/// Repeating timers with explicit pumping.
///
/// The host decides when time passes: it asks for [`next_deadline`], sleeps
/// or steps its clock, then calls [`fire_due`]. A due timer fires once and
/// re-arms one period later; a timer that has fallen several periods behind
/// fires once per [`fire_due`] round until it catches up, so no period is
/// skipped and no callback runs twice for the same deadline.
///
/// [`next_deadline`]: TimerRegistry::next_deadline
/// [`fire_due`]: TimerRegistry::fire_due
#[derive(Default)]
pub struct TimerRegistry {
    entries: RefCell<SlotMap<TimerKey, TimerEntry>>,
    scheduled_total: Cell<u64>,
    cancelled_total: Cell<u64>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `callback` to fire every `period`, first at `now + period`.
    /// The returned handle is the only way to cancel.
    pub fn schedule_repeating(
        self: &Rc<Self>,
        period: Duration,
        now: Instant,
        callback: impl Fn() + 'static,
    ) -> TimerHandle {
        let period = if period.is_zero() {
            log::warn!("schedule_repeating: zero period clamped to 1ms");
            Duration::from_millis(1)
        } else {
            period
        };

        let key = self.entries.borrow_mut().insert(TimerEntry {
            period,
            deadline: now + period,
            callback: Rc::new(callback),
        });
        self.scheduled_total.set(self.scheduled_total.get() + 1);

        TimerHandle {
            key,
            registry: Rc::downgrade(self),
        }
    }

    /// Removes a timer. Returns whether it was still alive.
    pub fn cancel(&self, key: TimerKey) -> bool {
        let removed = self.entries.borrow_mut().remove(key).is_some();
        if removed {
            self.cancelled_total.set(self.cancelled_total.get() + 1);
        }
        removed
    }

    /// Earliest pending deadline, if any timer is armed.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.borrow().values().map(|e| e.deadline).min()
    }

    /// Fires every timer whose deadline is at or before `now`, once each,
    /// then re-arms it one period later. Returns how many fired; callers
    /// loop until this returns 0 to drain a backlog period by period.
    ///
    /// Callbacks run with no registry borrow held, so they may schedule or
    /// cancel timers (including their own).
    pub fn fire_due(&self, now: Instant) -> usize {
        let due: Vec<(TimerKey, Rc<dyn Fn()>)> = self
            .entries
            .borrow()
            .iter()
            .filter(|(_, e)| e.deadline <= now)
            .map(|(k, e)| (k, e.callback.clone()))
            .collect();

        let mut fired = 0;
        for (key, callback) in &due {
            // A callback earlier in this round may have cancelled this one.
            if !self.entries.borrow().contains_key(*key) {
                continue;
            }
            callback();
            fired += 1;
            // The callback may have cancelled its own timer; only re-arm
            // survivors.
            if let Some(e) = self.entries.borrow_mut().get_mut(*key) {
                e.deadline += e.period;
            }
        }

        fired
    }

    /// Timers currently armed.
    pub fn active(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Timers ever scheduled on this registry.
    pub fn scheduled_total(&self) -> u64 {
        self.scheduled_total.get()
    }

    /// Timers explicitly cancelled. `scheduled_total - cancelled_total -
    /// active` should stay 0 for code that cleans up after itself.
    pub fn cancelled_total(&self) -> u64 {
        self.cancelled_total.get()
    }
}

/// Owner handle for a scheduled timer. Consumed by `cancel`, so a timer
/// cannot be cancelled twice through it.
pub struct TimerHandle {
    key: TimerKey,
    registry: Weak<TimerRegistry>,
}

impl TimerHandle {
    /// Cancels the timer. Returns whether it was still alive; false means
    /// the registry itself is already gone.
    pub fn cancel(self) -> bool {
        match self.registry.upgrade() {
            Some(reg) => reg.cancel(self.key),
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|reg| reg.entries.borrow().contains_key(self.key))
    }
}

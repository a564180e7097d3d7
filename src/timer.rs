use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Slot {
    id: TimerId,
    interval: Duration,
    pending: Duration,
}

type Slots = Rc<RefCell<Vec<Slot>>>;

/// Repeating timers driven by elapsed time reported from the event loop
#[derive(Debug, Default)]
pub struct Scheduler {
    slots: Slots,
    next_id: u64,
}

/// Registration returned by [`Scheduler::every`]; dropping it cancels the timer
#[derive(Debug)]
pub struct TimerHandle {
    id: TimerId,
    slots: Weak<RefCell<Vec<Slot>>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a timer firing once per `interval`. A zero interval is
    /// clamped to one millisecond.
    pub fn every(&mut self, interval: Duration) -> TimerHandle {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.slots.borrow_mut().push(Slot {
            id,
            interval: interval.max(Duration::from_millis(1)),
            pending: Duration::ZERO,
        });
        debug!(?id, ?interval, "timer registered");
        TimerHandle {
            id,
            slots: Rc::downgrade(&self.slots),
        }
    }

    /// Let `elapsed` pass and return one id per due firing, ordered by
    /// registration.
    pub fn advance(&self, elapsed: Duration) -> Vec<TimerId> {
        let mut fired = Vec::new();
        for slot in self.slots.borrow_mut().iter_mut() {
            slot.pending += elapsed;
            while slot.pending >= slot.interval {
                slot.pending -= slot.interval;
                fired.push(slot.id);
            }
        }
        fired
    }

    #[cfg(test)]
    fn is_active(&self, id: TimerId) -> bool {
        self.slots.borrow().iter().any(|s| s.id == id)
    }

    pub fn active_count(&self) -> usize {
        self.slots.borrow().len()
    }
}

impl TimerHandle {
    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn cancel(self) {
        // Drop does the work
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        if let Some(slots) = self.slots.upgrade() {
            slots.borrow_mut().retain(|s| s.id != self.id);
            debug!(id = ?self.id, "timer cancelled");
        }
    }
}

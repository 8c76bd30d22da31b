//! Periodic timer capability
//!
//! The beat engine never touches a clock directly. It asks a [`BeatScheduler`]
//! to run a task every `interval`, and keeps the returned [`TimerHandle`] to
//! cancel it. Production code plugs in a threaded clock; tests use
//! [`VirtualScheduler`], which only moves when told to.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Task run on every timer tick
pub type PeriodicTask = Box<dyn FnMut() + Send>;

/// Something that can run a task periodically.
///
/// Timers are interval based: the first call happens one `interval` after
/// scheduling, not immediately.
pub trait BeatScheduler: Send + Sync {
    fn schedule_periodic(&self, interval: Duration, task: PeriodicTask) -> TimerHandle;
}

/// Cancellation handle for a periodic task.
///
/// Cancelling (or dropping) the handle guarantees the task is not invoked
/// again once any in-flight call has returned.
pub struct TimerHandle {
    cancelled: Arc<AtomicBool>,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl TimerHandle {
    /// `cancelled` is the flag the scheduler checks before each call;
    /// `release` lets the scheduler free the task eagerly.
    pub fn new(cancelled: Arc<AtomicBool>, release: Option<Box<dyn FnOnce() + Send>>) -> Self {
        Self { cancelled, release }
    }

    pub fn cancel(mut self) {
        self.cancel_inner();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    fn cancel_inner(&mut self) {
        self.cancelled.store(true, Ordering::Release);
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel_inner();
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

struct VirtualTask {
    id: u64,
    interval: Duration,
    due: Duration,
    cancelled: Arc<AtomicBool>,
    task: PeriodicTask,
}

#[derive(Default)]
struct VirtualClock {
    now: Duration,
    next_id: u64,
    tasks: Vec<VirtualTask>,
}

/// Deterministic scheduler driven by explicit [`advance_by`](Self::advance_by)
/// calls.
///
/// Tasks due at the same instant run in the order they were scheduled. Tasks
/// run on the caller's thread with the clock unlocked, so a task may schedule
/// or cancel other timers.
#[derive(Clone, Default)]
pub struct VirtualScheduler {
    clock: Arc<Mutex<VirtualClock>>,
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VirtualClock> {
        // A panicking task never holds the lock, so poisoning carries no torn state
        self.clock.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Current virtual time since the scheduler was created
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Number of timers that have not been cancelled
    pub fn active_timers(&self) -> usize {
        let clock = self.lock();
        clock
            .tasks
            .iter()
            .filter(|t| !t.cancelled.load(Ordering::Acquire))
            .count()
    }

    pub fn advance_by(&self, delta: Duration) {
        let target = self.now() + delta;
        self.advance_to(target);
    }

    /// Run every task due up to and including `target`, then park the clock
    /// at `target`. Moving backwards is a no-op.
    pub fn advance_to(&self, target: Duration) {
        loop {
            let mut clock = self.lock();
            clock.tasks.retain(|t| !t.cancelled.load(Ordering::Acquire));

            let next = clock
                .tasks
                .iter()
                .enumerate()
                .filter(|(_, t)| t.due <= target)
                .min_by_key(|(_, t)| (t.due, t.id))
                .map(|(i, _)| i);

            let Some(index) = next else {
                if clock.now < target {
                    clock.now = target;
                }
                return;
            };

            let mut entry = clock.tasks.swap_remove(index);
            clock.now = entry.due;
            drop(clock);

            (entry.task)();

            entry.due += entry.interval;
            if !entry.cancelled.load(Ordering::Acquire) {
                self.lock().tasks.push(entry);
            }
        }
    }
}

impl BeatScheduler for VirtualScheduler {
    fn schedule_periodic(&self, interval: Duration, task: PeriodicTask) -> TimerHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut clock = self.lock();
        let id = clock.next_id;
        clock.next_id += 1;
        let due = clock.now + interval;
        clock.tasks.push(VirtualTask {
            id,
            // A zero interval would spin forever inside a single advance
            interval: interval.max(Duration::from_nanos(1)),
            due,
            cancelled: cancelled.clone(),
            task,
        });
        TimerHandle::new(cancelled, None)
    }
}

impl fmt::Debug for VirtualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clock = self.lock();
        f.debug_struct("VirtualScheduler")
            .field("now", &clock.now)
            .field("tasks", &clock.tasks.len())
            .finish()
    }
}

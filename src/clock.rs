//! Threaded beat scheduler
//!
//! Runs every periodic timer on one dedicated thread. The thread sleeps on
//! its command channel until the earliest timer is due, so scheduling and
//! cancelling wake it immediately while idle periods cost nothing.

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use log::debug;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tactus_core::{BeatScheduler, PeriodicTask, TimerHandle};

const CLOCK_THREAD_NAME: &str = "tactus-clock";

/// Commands that can be sent to the clock thread
enum ClockCommand {
    Schedule {
        id: u64,
        interval: Duration,
        cancelled: Arc<AtomicBool>,
        task: PeriodicTask,
    },
    Cancel(u64),
    Shutdown,
}

/// Production [`BeatScheduler`] backed by a timer thread
pub struct ClockScheduler {
    command_tx: Sender<ClockCommand>,
    next_id: AtomicU64,
    /// Clock thread handle, taken on drop
    thread: Option<JoinHandle<()>>,
}

impl ClockScheduler {
    /// Start the clock thread
    pub fn new() -> io::Result<Self> {
        let (command_tx, command_rx) = unbounded();
        let thread = thread::Builder::new()
            .name(CLOCK_THREAD_NAME.to_string())
            .spawn(move || ClockThread::new(command_rx).run())?;

        Ok(ClockScheduler {
            command_tx,
            next_id: AtomicU64::new(0),
            thread: Some(thread),
        })
    }
}

impl BeatScheduler for ClockScheduler {
    fn schedule_periodic(&self, interval: Duration, task: PeriodicTask) -> TimerHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let cancelled = Arc::new(AtomicBool::new(false));

        let _ = self.command_tx.send(ClockCommand::Schedule {
            id,
            interval,
            cancelled: cancelled.clone(),
            task,
        });

        let command_tx = self.command_tx.clone();
        TimerHandle::new(
            cancelled,
            Some(Box::new(move || {
                let _ = command_tx.send(ClockCommand::Cancel(id));
            })),
        )
    }
}

impl Drop for ClockScheduler {
    fn drop(&mut self) {
        let _ = self.command_tx.send(ClockCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

struct Timer {
    id: u64,
    interval: Duration,
    due: Instant,
    cancelled: Arc<AtomicBool>,
    task: PeriodicTask,
}

/// Internal clock thread state
struct ClockThread {
    command_rx: Receiver<ClockCommand>,
    timers: Vec<Timer>,
}

impl ClockThread {
    fn new(command_rx: Receiver<ClockCommand>) -> Self {
        Self {
            command_rx,
            timers: Vec::new(),
        }
    }

    fn run(&mut self) {
        loop {
            // Block until the next deadline, or indefinitely when idle
            let command = match self.timers.iter().map(|t| t.due).min() {
                Some(deadline) => match self.command_rx.recv_deadline(deadline) {
                    Ok(cmd) => Some(cmd),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                },
                None => match self.command_rx.recv() {
                    Ok(cmd) => Some(cmd),
                    Err(_) => break, // Channel closed
                },
            };

            if let Some(cmd) = command {
                if self.handle_command(cmd) {
                    break;
                }
            }

            self.fire_due(Instant::now());
        }
        debug!("clock thread exiting");
    }

    /// Returns true when the thread should exit
    fn handle_command(&mut self, cmd: ClockCommand) -> bool {
        match cmd {
            ClockCommand::Schedule {
                id,
                interval,
                cancelled,
                task,
            } => {
                self.timers.push(Timer {
                    id,
                    // Guard against a zero interval spinning the thread
                    interval: interval.max(Duration::from_micros(100)),
                    due: Instant::now() + interval,
                    cancelled,
                    task,
                });
            }
            ClockCommand::Cancel(id) => {
                self.timers.retain(|t| t.id != id);
            }
            ClockCommand::Shutdown => {
                self.timers.clear();
                return true;
            }
        }
        false
    }

    fn fire_due(&mut self, now: Instant) {
        self.timers.retain(|t| !t.cancelled.load(Ordering::Acquire));
        for timer in self.timers.iter_mut().filter(|t| t.due <= now) {
            if timer.cancelled.load(Ordering::Acquire) {
                continue;
            }
            (timer.task)();
            // Interval based: the next tick is one interval after the due
            // time, skipping ticks that a stall already missed
            timer.due += timer.interval;
            while timer.due <= now {
                timer.due += timer.interval;
            }
        }
    }
}

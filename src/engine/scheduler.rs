//! Continuous playback scheduler.
//!
//! Runs a tick closure once per beat on its own thread until cancelled. The
//! closure does the work (render and play a kick); the scheduler only owns
//! timing and the running flag:
//!
//! ```text
//!   start ──► [running?] ──yes──► tick() ──► sleep(interval) ──┐
//!                 ▲   │                                        │
//!                 │   └──no──► exit                            │
//!                 └────────────────────────────────────────────┘
//! ```
//!
//! The flag is checked before every tick and between sleep slices, so
//! `stop()` takes effect within one slice even at very slow tempos.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use tracing::{debug, warn};

/// Longest uninterrupted sleep between flag checks.
const SLEEP_SLICE: Duration = Duration::from_millis(10);

/// `60000 / bpm` milliseconds. `None` for zero, negative or non-finite tempos,
/// and for tempos so slow the interval does not fit a `Duration`.
pub fn interval_for_bpm(bpm: f32) -> Option<Duration> {
    if !bpm.is_finite() || bpm <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(60.0 / bpm as f64).ok()
}

pub struct Scheduler;

impl Scheduler {
    /// Call `tick` every `interval`, starting immediately.
    pub fn start<F>(interval: Duration, mut tick: F) -> SchedulerHandle
    where
        F: FnMut() + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();

        let thread = thread::spawn(move || {
            let mut next = Instant::now();
            let mut ticks = 0u64;
            while flag.load(Ordering::Acquire) {
                tick();
                ticks += 1;

                next += interval;
                while flag.load(Ordering::Acquire) {
                    let now = Instant::now();
                    if now >= next {
                        break;
                    }
                    thread::sleep((next - now).min(SLEEP_SLICE));
                }
            }
            debug!(ticks, "scheduler stopped");
        });

        SchedulerHandle {
            running,
            thread: Some(thread),
        }
    }

    /// Like [`Scheduler::start`] with the interval taken from a tempo.
    /// Returns `None` if the tempo is unusable.
    pub fn start_bpm<F>(bpm: f32, tick: F) -> Option<SchedulerHandle>
    where
        F: FnMut() + Send + 'static,
    {
        interval_for_bpm(bpm).map(|interval| Self::start(interval, tick))
    }
}

/// Owner of a running schedule. Dropping it stops the schedule.
pub struct SchedulerHandle {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Ask the loop to stop. It finishes any tick in progress first.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop and wait for the loop thread to exit.
    pub fn join(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("scheduler tick panicked; loop thread ended early");
            }
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn interval_from_tempo() {
        assert_eq!(interval_for_bpm(60.0), Some(Duration::from_secs(1)));
        assert_eq!(interval_for_bpm(120.0), Some(Duration::from_millis(500)));
        assert_eq!(interval_for_bpm(0.0), None);
        assert_eq!(interval_for_bpm(-10.0), None);
        assert_eq!(interval_for_bpm(f32::NAN), None);
        // Positive but too slow for a Duration
        assert_eq!(interval_for_bpm(1e-30), None);
        assert_eq!(interval_for_bpm(f32::MIN_POSITIVE), None);
        assert!(Scheduler::start_bpm(1e-30, || {}).is_none());
    }

    #[test]
    fn ticks_until_stopped() {
        let count = Arc::new(AtomicUsize::new(0));
        let handle = Scheduler::start(Duration::from_millis(5), {
            let count = count.clone();
            move || {
                count.fetch_add(1, Ordering::SeqCst);
            }
        });

        thread::sleep(Duration::from_millis(60));
        assert!(handle.is_running());
        handle.join();

        let after_stop = count.load(Ordering::SeqCst);
        assert!(after_stop >= 2, "expected several ticks, got {after_stop}");
        thread::sleep(Duration::from_millis(30));
        assert_eq!(count.load(Ordering::SeqCst), after_stop);
    }

    #[test]
    fn stop_interrupts_a_long_wait() {
        let count = Arc::new(AtomicUsize::new(0));
        // One beat per minute: without sliced sleeps this would block for 60s.
        let handle = Scheduler::start_bpm(1.0, {
            let count = count.clone();
            move || {
                count.fetch_add(1, Ordering::SeqCst);
            }
        })
        .unwrap();

        thread::sleep(Duration::from_millis(20));
        let started = Instant::now();
        handle.join();
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panicking_tick_does_not_poison_join() {
        let handle = Scheduler::start(Duration::from_millis(5), || panic!("tick failed"));
        thread::sleep(Duration::from_millis(20));
        // The panic is logged, not re-raised here
        handle.join();
    }
}

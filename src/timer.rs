//! Session countdown.
//!
//! [`TimerState`] is the pure countdown; [`Countdown`] drives it from a
//! tokio task and forwards [`TimerEvent`]s to the session's event loop.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, info};

/// Time limit used when none is configured.
pub const DEFAULT_DURATION_SECS: u64 = 600;

/// Real-time length of one countdown step.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// One second passed; `remaining` is always at least 1.
    Tick { remaining: u64 },
    /// The deadline was reached. Fired at most once.
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    remaining_seconds: u64,
    running: bool,
}

impl TimerState {
    /// A countdown of `total_seconds` steps. Zero expires on the first tick.
    pub fn new(total_seconds: u64) -> Self {
        Self {
            remaining_seconds: total_seconds,
            running: true,
        }
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance one step. Returns `None` once stopped or expired.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if !self.running {
            return None;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.running = false;
            Some(TimerEvent::Expired)
        } else {
            Some(TimerEvent::Tick {
                remaining: self.remaining_seconds,
            })
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }
}

/// Handle to a running countdown task. Dropping it cancels the task.
pub struct Countdown {
    handle: JoinHandle<()>,
}

impl Countdown {
    /// Spawn a countdown of `total_seconds` steps, one every `period`.
    pub fn start(
        total_seconds: u64,
        period: Duration,
        events: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        info!(total_seconds, "starting countdown");
        let handle = tokio::spawn(run_countdown(TimerState::new(total_seconds), period, events));
        Self { handle }
    }

    /// Cancel the countdown. No further events are sent.
    pub fn stop(&self) {
        if !self.handle.is_finished() {
            debug!("stopping countdown");
        }
        self.handle.abort();
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run_countdown(
    mut state: TimerState,
    period: Duration,
    events: mpsc::UnboundedSender<TimerEvent>,
) {
    let mut interval = time::interval_at(Instant::now() + period, period);

    while state.is_running() {
        interval.tick().await;
        let Some(event) = state.tick() else {
            break;
        };

        if event == TimerEvent::Expired {
            info!("countdown expired");
        }
        if events.send(event).is_err() {
            debug!("countdown receiver dropped");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_state_expires_once() {
        let mut timer = TimerState::new(3);

        assert_eq!(timer.tick(), Some(TimerEvent::Tick { remaining: 2 }));
        assert_eq!(timer.tick(), Some(TimerEvent::Tick { remaining: 1 }));
        assert_eq!(timer.tick(), Some(TimerEvent::Expired));
        assert!(!timer.is_running());
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.remaining_seconds(), 0);
    }

    #[test]
    fn test_timer_state_stop() {
        let mut timer = TimerState::new(10);
        let _ = timer.tick();
        timer.stop();

        assert_eq!(timer.tick(), None);
        assert_eq!(timer.remaining_seconds(), 9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_sends_ticks_then_expires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let started = Instant::now();
        let _countdown = Countdown::start(3, TICK_PERIOD, tx);

        assert_eq!(rx.recv().await, Some(TimerEvent::Tick { remaining: 2 }));
        assert_eq!(rx.recv().await, Some(TimerEvent::Tick { remaining: 1 }));
        assert_eq!(rx.recv().await, Some(TimerEvent::Expired));
        assert_eq!(started.elapsed(), Duration::from_secs(3));

        // The task ends after expiring and drops its sender.
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn test_zero_length_timer_expires_on_first_tick() {
        let mut timer = TimerState::new(0);

        assert!(timer.is_running());
        assert_eq!(timer.tick(), Some(TimerEvent::Expired));
        assert_eq!(timer.tick(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_length_countdown_still_expires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _countdown = Countdown::start(0, TICK_PERIOD, tx);

        assert_eq!(rx.recv().await, Some(TimerEvent::Expired));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_countdown_sends_nothing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let countdown = Countdown::start(5, TICK_PERIOD, tx);

        assert_eq!(rx.recv().await, Some(TimerEvent::Tick { remaining: 4 }));
        countdown.stop();

        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_countdown_is_cancelled() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        drop(Countdown::start(2, TICK_PERIOD, tx));

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(rx.recv().await, None);
    }
}

//! Periodic safeguard saves.
//!
//! Every mutation is saved immediately; this timer adds a full save on a
//! fixed period in case some write path was missed. It runs in the same
//! task as the engine, so a save can never interleave with a reset.
//! Resetting postpones the next tick by a full period.

use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Shortest period the timer accepts.
pub const MIN_PERIOD: Duration = Duration::from_secs(1);

/// A periodic save schedule.
#[derive(Debug)]
pub struct AutosaveTimer {
    interval: Interval,
    period: Duration,
}

impl AutosaveTimer {
    /// A timer whose first tick is one full `period` from now.
    ///
    /// Periods below [`MIN_PERIOD`] are raised to it.
    pub fn new(period: Duration) -> Self {
        let period = period.max(MIN_PERIOD);
        let start = Instant::now().checked_add(period).unwrap_or_else(Instant::now);
        let mut interval = tokio::time::interval_at(start, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval, period }
    }

    /// The configured period.
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Wait for the next scheduled save.
    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }

    /// Push the next save a full period into the future.
    pub fn postpone(&mut self) {
        self.interval.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn period_has_a_floor() {
        assert_eq!(AutosaveTimer::new(Duration::ZERO).period(), MIN_PERIOD);
        let timer = AutosaveTimer::new(Duration::from_secs(30));
        assert_eq!(timer.period(), Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_a_full_period() {
        let mut timer = AutosaveTimer::new(Duration::from_secs(30));
        let started = Instant::now();
        timer.tick().await;
        assert!(started.elapsed() >= Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn postpone_pushes_next_tick_back() {
        let mut timer = AutosaveTimer::new(Duration::from_secs(10));
        tokio::time::advance(Duration::from_secs(8)).await;
        timer.postpone();
        let postponed_at = Instant::now();
        timer.tick().await;
        assert!(postponed_at.elapsed() >= Duration::from_secs(10));
    }
}

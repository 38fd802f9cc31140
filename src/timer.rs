// src/timer.rs

use crate::models::ad::Advertisement;
use std::time::Duration;

/// Countdown gate for a timed advertisement.
///
/// Starts at the ad's fixed display duration and counts down in one-second
/// ticks. The continue affordance stays disabled while any time remains and
/// becomes (and stays) enabled exactly when the countdown reaches zero.
/// Further ticks at zero are no-ops.
#[derive(Debug, Clone)]
pub struct AdTimer {
    remaining: u32,
}

impl AdTimer {
    pub fn new(ad: &Advertisement) -> Self {
        Self {
            remaining: ad.display_seconds,
        }
    }

    /// Advances the countdown by one second, returning the remaining time.
    pub fn tick(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    /// Whether the host may offer the continue/close affordance.
    pub fn can_continue(&self) -> bool {
        self.is_complete()
    }

    /// Re-arms the countdown for a new advertisement.
    pub fn restart(&mut self, ad: &Advertisement) {
        self.remaining = ad.display_seconds;
    }
}

/// Drives the timer with real one-second ticks, invoking `on_tick` with the
/// remaining seconds after each one. Returns when the countdown completes.
/// Dropping the future cancels the ticking; there is no duplicate interval.
pub async fn run_countdown<F>(timer: &mut AdTimer, mut on_tick: F)
where
    F: FnMut(u32),
{
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    // The first interval tick fires immediately; consume it so each
    // subsequent tick marks one elapsed second.
    interval.tick().await;
    while !timer.is_complete() {
        interval.tick().await;
        on_tick(timer.tick());
    }
}

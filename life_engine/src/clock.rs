// clock.rs - Start/stop state machine that paces generation advances

use std::time::Duration;

use tokio::time::Instant;

use crate::error::{EngineError, Result};

/// Longest accepted delay between generations.
pub const MAX_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Stopped,
    /// At most one advance is ever pending.
    Running { next_advance: Instant },
}

/// What an interval change did to a running clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalChange {
    /// The clock was stopped; only the stored interval changed.
    Stored,
    /// The clock was running and has been restarted. An advance is owed now.
    Restarted,
}

/// Paces a self-rescheduling chain of advances.
///
/// The clock never touches the board. Its owner asks [`SimulationClock::is_due`],
/// performs the advance, then reports back through [`SimulationClock::advanced`],
/// which schedules the single next advance `interval` after that point. Cadence is
/// therefore `interval` plus however long the advance itself took.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    state: ClockState,
    interval: Duration,
}

impl SimulationClock {
    pub fn new(interval: Duration) -> Result<Self> {
        validate_interval(interval)?;
        Ok(Self { state: ClockState::Stopped, interval })
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ClockState::Running { .. })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns `true` when the clock was stopped: the first advance is owed
    /// immediately. Starting a running clock changes nothing.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = ClockState::Running { next_advance: now };
        true
    }

    /// Drops the pending advance. Returns whether the clock was running.
    pub fn stop(&mut self) -> bool {
        let was_running = self.is_running();
        self.state = ClockState::Stopped;
        was_running
    }

    /// A running clock is stopped and started again, so even an unchanged
    /// value costs one immediate extra advance.
    pub fn set_interval(&mut self, interval: Duration, now: Instant) -> Result<IntervalChange> {
        validate_interval(interval)?;
        self.interval = interval;
        if self.stop() {
            self.start(now);
            Ok(IntervalChange::Restarted)
        } else {
            Ok(IntervalChange::Stored)
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            ClockState::Running { next_advance } => Some(next_advance),
            ClockState::Stopped => None,
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline().is_some_and(|deadline| deadline <= now)
    }

    /// Called once an advance has completed and been published.
    pub fn advanced(&mut self, now: Instant) {
        if self.is_running() {
            // Intervals are capped, but a deadline past the clock's range still must not panic.
            let next_advance = now.checked_add(self.interval).unwrap_or(now + MAX_INTERVAL);
            self.state = ClockState::Running { next_advance };
        }
    }
}

pub(crate) fn validate_interval(interval: Duration) -> Result<()> {
    if interval.is_zero() || interval > MAX_INTERVAL {
        return Err(EngineError::InvalidInterval(format!("{} ms", interval.as_millis())));
    }
    Ok(())
}

/// Parses the text of a speed input as whole milliseconds, up to [`MAX_INTERVAL`].
pub fn parse_interval(text: &str) -> Result<Duration> {
    let invalid = || EngineError::InvalidInterval(text.to_string());
    let ms: i64 = text.trim().parse().map_err(|_| invalid())?;
    if ms <= 0 {
        return Err(invalid());
    }
    let interval = Duration::from_millis(ms as u64);
    validate_interval(interval).map_err(|_| invalid())?;
    Ok(interval)
}

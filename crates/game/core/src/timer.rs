//! Countdown timer used for cooldowns, status durations and bullet lifetimes.

use core::fmt;

use crate::error::{ErrorSeverity, GameError};

/// Errors raised when constructing or resizing a [`CountdownTimer`].
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum TimerError {
    #[error("timer maximum must be a finite, non-negative number of seconds (got {0})")]
    InvalidMax(f64),
}

impl GameError for TimerError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidMax(_) => "TIMER_INVALID_MAX",
        }
    }
}

/// Counts down from `max` to zero.
///
/// `0 <= value <= max` holds at all observable times. [`CountdownTimer::tick`] is the
/// only operation that advances time and is *level*-triggered: once the timer sits at
/// zero every further tick reports completion again. Callers that need to react to
/// the completing tick only must remember the previous state themselves.
///
/// A maximum of zero is accepted and describes a timer that is always complete.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CountdownTimer {
    value: f64,
    max: f64,
    paused: bool,
}

impl CountdownTimer {
    /// Creates a running timer starting at `max`.
    pub fn new(max: f64) -> Result<Self, TimerError> {
        validate_max(max)?;
        Ok(Self {
            value: max,
            max,
            paused: false,
        })
    }

    /// Creates a timer that starts out completed.
    pub fn completed(max: f64) -> Result<Self, TimerError> {
        let mut timer = Self::new(max)?;
        timer.complete();
        Ok(timer)
    }

    /// Remaining time, counting down from `max` to zero.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Elapsed time, counting up from zero to `max`.
    pub fn mirror_value(&self) -> f64 {
        self.max - self.value
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Fraction of time remaining in `[0, 1]`; zero for a zero-length timer.
    pub fn percentage(&self) -> f64 {
        if self.max > 0.0 {
            self.value / self.max
        } else {
            0.0
        }
    }

    /// Fraction of time elapsed in `[0, 1]`.
    pub fn mirror_percentage(&self) -> f64 {
        1.0 - self.percentage()
    }

    /// Advances the timer by `dt` seconds unless paused.
    ///
    /// Returns `true` when the value is zero after the tick, including every tick
    /// after the first completion. The value never drops below zero.
    ///
    /// `dt` must be non-negative; a negative delta is a caller contract violation
    /// and is not corrected here.
    pub fn tick(&mut self, dt: f64) -> bool {
        debug_assert!(dt >= 0.0, "negative timer delta: {dt}");
        if !self.paused {
            self.value -= dt.min(self.value);
        }
        self.is_completed()
    }

    pub fn is_completed(&self) -> bool {
        self.value <= 0.0
    }

    /// Restores the value to `max`.
    pub fn reset(&mut self) {
        self.value = self.max;
    }

    /// Forces the value to zero.
    pub fn complete(&mut self) {
        self.value = 0.0;
    }

    /// Changes `max` while preserving the remaining percentage.
    pub fn adjust_max(&mut self, new_max: f64) -> Result<(), TimerError> {
        validate_max(new_max)?;
        let percentage = self.percentage();
        self.max = new_max;
        self.value = new_max * percentage;
        Ok(())
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }
}

fn validate_max(max: f64) -> Result<(), TimerError> {
    if max.is_finite() && max >= 0.0 {
        Ok(())
    } else {
        Err(TimerError::InvalidMax(max))
    }
}

impl fmt::Display for CountdownTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.value, self.max)
    }
}

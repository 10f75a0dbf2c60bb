use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::easing::Easing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => f.write_str("forward"),
            Self::Backward => f.write_str("backward"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" | "next" => Ok(Self::Forward),
            "backward" | "prev" => Ok(Self::Backward),
            _ => Err(format!(
                "Invalid direction: {s}. Must be 'forward' or 'backward'."
            )),
        }
    }
}

/// A single eased movement between two unwrapped offsets.
///
/// Offsets are kept unwrapped so a step across the loop seam interpolates
/// through the seam instead of sweeping back across the whole strip; callers
/// wrap the sampled value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepTransition {
    from: f64,
    to: f64,
    started_at: Duration,
    duration: Duration,
    easing: Easing,
}

impl StepTransition {
    pub fn new(
        from: f64,
        to: f64,
        started_at: Duration,
        duration: Duration,
        easing: Easing,
    ) -> Self {
        Self {
            from,
            to,
            started_at,
            duration,
            easing,
        }
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    pub fn is_done(&self, now: Duration) -> bool {
        now.saturating_sub(self.started_at) >= self.duration
    }

    /// Unwrapped offset at `now`. Returns the exact target once done.
    pub fn sample(&self, now: Duration) -> f64 {
        if self.is_done(now) {
            return self.to;
        }
        let elapsed = now.saturating_sub(self.started_at);
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from + (self.to - self.from) * self.easing.apply(t)
    }
}

//! Scale domains, tick cadence, and tick label formatting.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Upper bound on the number of values a single tick request may produce.
pub const MAX_TICKS: usize = 100_000;

/// Relative tolerance (in units of the step) for treating a generated value
/// as having reached `max`.
const END_TOLERANCE: f64 = 1e-9;

/// Tick spacing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickMode {
    /// Arithmetic spacing: steps are added.
    Linear,
    /// Geometric spacing: steps are multiplicative factors.
    Log,
}

/// Value domain of one scale and the cadence of its graduations.
///
/// `min <= max` holds at all times; the setters clamp rather than reorder.
/// A step of `0` (linear) or `<= 1` (log) disables that tick level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSet {
    min: f64,
    max: f64,
    major_step: f64,
    minor_step: f64,
    mode: TickMode,
}

impl TickSet {
    /// Create a tick set. A reversed range is collapsed onto `min`.
    pub fn new(min: f64, max: f64, major_step: f64, minor_step: f64, mode: TickMode) -> Self {
        Self {
            min,
            max: max.max(min),
            major_step: major_step.max(0.0),
            minor_step: minor_step.max(0.0),
            mode,
        }
    }

    /// Create a linear tick set.
    pub fn linear(min: f64, max: f64, major_step: f64, minor_step: f64) -> Self {
        Self::new(min, max, major_step, minor_step, TickMode::Linear)
    }

    /// Create a logarithmic tick set; steps are multiplicative factors.
    pub fn log(min: f64, max: f64, major_factor: f64, minor_factor: f64) -> Self {
        Self::new(min, max, major_factor, minor_factor, TickMode::Log)
    }

    /// Lower bound of the domain.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound of the domain.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Major step (or factor, in log mode).
    pub fn major_step(&self) -> f64 {
        self.major_step
    }

    /// Minor step (or factor, in log mode).
    pub fn minor_step(&self) -> f64 {
        self.minor_step
    }

    /// Spacing mode.
    pub fn mode(&self) -> TickMode {
        self.mode
    }

    /// Whether the ticks are spaced logarithmically.
    pub fn is_log(&self) -> bool {
        self.mode == TickMode::Log
    }

    /// Width of the domain.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Check whether a value lies inside the domain.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Set the lower bound, clamped to `<= max`.
    pub fn set_min(&mut self, min: f64) {
        self.min = min.min(self.max);
    }

    /// Set the upper bound, clamped to `>= min`.
    pub fn set_max(&mut self, max: f64) {
        self.max = max.max(self.min);
    }

    /// Replace both bounds, swapping them if given in reverse.
    pub fn set_range(&mut self, mut min: f64, mut max: f64) {
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        self.min = min;
        self.max = max;
    }

    /// Set the major step; negative values disable major ticks.
    pub fn set_major_step(&mut self, step: f64) {
        self.major_step = step.max(0.0);
    }

    /// Set the minor step; negative values disable minor ticks.
    pub fn set_minor_step(&mut self, step: f64) {
        self.minor_step = step.max(0.0);
    }

    /// Major tick values, always ending exactly at `max`.
    pub fn major_ticks(&self) -> Vec<f64> {
        self.generate(self.major_step, &[])
    }

    /// Minor tick values, skipping any value that coincides with one in
    /// `excluding`.
    pub fn minor_ticks(&self, excluding: &[f64]) -> Vec<f64> {
        self.generate(self.minor_step, excluding)
    }

    /// Major ticks paired with the minor ticks that do not collide with them.
    pub fn all_ticks(&self) -> (Vec<f64>, Vec<f64>) {
        let major = self.major_ticks();
        let minor = self.minor_ticks(&major);
        (major, minor)
    }

    fn step_enabled(&self, step: f64) -> bool {
        if !step.is_finite() || !self.min.is_finite() || !self.max.is_finite() {
            return false;
        }
        match self.mode {
            TickMode::Linear => step > 0.0,
            TickMode::Log => step > 1.0 && self.min > 0.0,
        }
    }

    fn generate(&self, step: f64, excluding: &[f64]) -> Vec<f64> {
        if !self.step_enabled(step) {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut previous: Option<f64> = None;
        let mut push = |value: f64, out: &mut Vec<f64>| {
            // steps below the precision of `min` repeat the same value
            if previous.is_some_and(|p| value <= p) {
                return;
            }
            previous = Some(value);
            if !excluding.iter().any(|&ex| coincides(ex, value, step)) {
                out.push(value);
            }
        };

        for i in 0..MAX_TICKS {
            let value = match self.mode {
                TickMode::Linear => self.min + step * i as f64,
                TickMode::Log => self.min * step.powi(i as i32),
            };
            if self.reached_end(value, step) {
                break;
            }
            push(value, &mut out);
            if i + 1 == MAX_TICKS {
                tracing::warn!(step, min = self.min, max = self.max, "tick generation capped");
            }
        }
        push(self.max, &mut out);
        out
    }

    fn reached_end(&self, value: f64, step: f64) -> bool {
        let tolerance = match self.mode {
            TickMode::Linear => step * END_TOLERANCE,
            TickMode::Log => self.max * (step - 1.0) * END_TOLERANCE,
        };
        value >= self.max - tolerance
    }
}

impl Default for TickSet {
    fn default() -> Self {
        Self::linear(0.0, 1.0, 0.1, 0.05)
    }
}

fn coincides(a: f64, b: f64, step: f64) -> bool {
    a == b || (a - b).abs() <= step.abs() * END_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

/// Formatter for tick labels.
#[derive(Clone)]
pub enum TickFormatter {
    /// Fixed number of decimal places.
    Fixed(usize),
    /// Custom formatter callback.
    Custom(Arc<dyn Fn(f64) -> String + Send + Sync>),
}

impl TickFormatter {
    /// Format a tick value for display.
    pub fn format(&self, value: f64) -> String {
        match self {
            Self::Fixed(precision) => format!("{:.*}", *precision, value),
            Self::Custom(formatter) => formatter(value),
        }
    }
}

impl Default for TickFormatter {
    fn default() -> Self {
        Self::Fixed(2)
    }
}

impl std::fmt::Debug for TickFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(precision) => write!(f, "TickFormatter::Fixed({precision})"),
            Self::Custom(_) => write!(f, "TickFormatter::Custom(..)"),
        }
    }
}

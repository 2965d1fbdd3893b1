//! Mapping of normalized control readings into parameter ranges.

use crate::channel::Controls;

// The logarithmic curve starting at zero or below sweeps 60 dB.
const LOG_SWEEP: f32 = 1000.0;

/// Response curve applied to the reading before it is scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Curve {
    #[default]
    Linear,
    /// More resolution on the bottom of the range, useful for volume.
    Logarithmic,
    Exponential,
    Cube,
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParameterMap {
    channel: usize,
    range: (f32, f32),
    curve: Curve,
    value: f32,
}

impl ParameterMap {
    #[must_use]
    pub fn new(channel: usize, range: (f32, f32), curve: Curve) -> Self {
        Self {
            channel,
            range,
            curve,
            value: range.0,
        }
    }

    /// Recalculate the value from the current reading of the bound channel.
    pub fn process(&mut self, controls: &Controls) -> f32 {
        self.value = self.map(controls.read(self.channel));
        self.value
    }

    /// The result of the last `process`, the minimum if it never ran.
    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[must_use]
    pub fn channel(&self) -> usize {
        self.channel
    }

    #[must_use]
    pub fn range(&self) -> (f32, f32) {
        self.range
    }

    #[must_use]
    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// Map a reading from [0.0, 1.0] into the range.
    #[must_use]
    pub fn map(&self, reading: f32) -> f32 {
        let v = reading.max(0.0).min(1.0);
        let (min, max) = self.range;
        let mapped = match self.curve {
            Curve::Linear => min + v * (max - min),
            Curve::Exponential => min + v * v * (max - min),
            Curve::Cube => min + v * v * v * (max - min),
            Curve::Logarithmic if min > 0.0 => {
                let log_min = libm::logf(min);
                let log_max = libm::logf(max);
                libm::expf(log_min + v * (log_max - log_min))
            }
            Curve::Logarithmic => {
                let k = libm::logf(LOG_SWEEP);
                min + (max - min) * (libm::expf(k * v) - 1.0) / (LOG_SWEEP - 1.0)
            }
        };
        mapped.max(min).min(max)
    }
}

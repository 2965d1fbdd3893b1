//! Free-running sine oscillator, used as the modulation LFO.

use core::f32::consts::PI;

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Oscillator {
    sample_rate: f32,
    frequency: f32,
    amplitude: f32,
    phase: f32,
    value: f32,
}

impl Oscillator {
    #[must_use]
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            frequency: 1.0,
            amplitude: 1.0,
            phase: 0.0,
            value: 0.0,
        }
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency.max(0.0);
    }

    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = amplitude;
    }

    #[must_use]
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Produce the next sample in range of ±amplitude.
    pub fn pop(&mut self) -> f32 {
        self.value = libm::sinf(self.phase * 2.0 * PI) * self.amplitude;
        self.phase += self.frequency / self.sample_rate;
        if self.phase >= 1.0 {
            self.phase -= libm::floorf(self.phase);
        }
        self.value
    }

    /// The last sample produced by `pop`.
    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_spans_in_expected_range() {
        const SAMPLE_RATE: f32 = 100.0;
        let mut oscillator = Oscillator::new(SAMPLE_RATE);
        oscillator.set_amplitude(0.5);

        let (mut min, mut max) = (0.0_f32, 0.0_f32);
        for _ in 0..SAMPLE_RATE as usize {
            let x = oscillator.pop();
            min = min.min(x);
            max = max.max(x);
        }

        assert_relative_eq!(min, -0.5, epsilon = 0.0001);
        assert_relative_eq!(max, 0.5, epsilon = 0.0001);
    }

    #[test]
    fn it_starts_at_zero_and_cycles_in_expected_interval() {
        const SAMPLE_RATE: f32 = 100.0;
        let mut oscillator = Oscillator::new(SAMPLE_RATE);
        oscillator.set_frequency(2.0);

        assert_relative_eq!(oscillator.pop(), 0.0);
        for _ in 0..49 {
            oscillator.pop();
        }
        assert_relative_eq!(oscillator.pop(), 0.0, epsilon = 0.0001);
    }

    #[test]
    fn value_is_kept_between_pops() {
        let mut oscillator = Oscillator::new(8.0);
        let x = oscillator.pop();
        let y = oscillator.pop();
        assert_relative_eq!(oscillator.value(), y);
        assert!(x < y);
    }

    #[test]
    fn phase_stays_bounded_with_extreme_frequency() {
        let mut oscillator = Oscillator::new(48_000.0);
        oscillator.set_frequency(1.0e7);
        for _ in 0..1000 {
            assert!(oscillator.pop().abs() <= 1.0);
        }
    }
}

//! Pot abstraction filtering raw readings of the ADC.

#[allow(unused_imports)]
use micromath::F32Ext;

use super::buffer::Buffer;

// Movements smaller than this are considered noise.
const NOISE_THRESHOLD: f32 = 0.002;

const SNAP_BOTTOM: f32 = 0.0001;
const SNAP_TOP: f32 = 0.9999;

/// Abstraction of a potentiometer.
///
/// Use it to smoothen the value received from pots before it is published
/// to the audio task. The output changes only when the pot travels further
/// than the noise threshold, with exception of its ends, where it snaps
/// to 0.0 and 1.0.
#[derive(Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pot {
    buffer: Buffer<32>,
    value: f32,
}

impl Pot {
    /// Start with the history filled with the given reading, skipping the
    /// initial ramp from zero.
    #[cfg(test)]
    fn with_initial(value: f32) -> Self {
        let mut buffer = Buffer::new();
        buffer.fill(value);
        Self { buffer, value }
    }

    pub fn update(&mut self, value: f32) {
        self.buffer.write(value);

        let average = self.buffer.read();
        if (self.value - average).abs() > NOISE_THRESHOLD {
            self.value = average;
        } else if average < SNAP_BOTTOM {
            self.value = 0.0;
        } else if average > SNAP_TOP {
            self.value = 1.0;
        }
    }

    /// Filtered value with the noise gate applied.
    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Moving average of the recent readings, without the noise gate.
    #[cfg(test)]
    fn average(&self) -> f32 {
        self.buffer.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_some_is_being_written_its_average_should_eventually_reach_it() {
        let mut pot = Pot::default();

        let mut value = pot.average();
        for _ in 0..32 {
            pot.update(1.0);
            let new_value = pot.average();
            assert!(new_value > value);
            value = new_value;
            if relative_eq!(value, 1.0) {
                return;
            }
        }

        panic!("Pot have not reached the target {}", value);
    }

    #[test]
    fn when_pot_jitters_the_value_stays() {
        let mut pot = Pot::with_initial(0.5);

        for i in 0..100 {
            pot.update(if i % 2 == 0 { 0.501 } else { 0.499 });
            assert_relative_eq!(pot.value(), 0.5);
        }
    }

    #[test]
    fn when_pot_moves_the_value_follows() {
        let mut pot = Pot::with_initial(0.2);

        for _ in 0..32 {
            pot.update(0.6);
        }

        assert_relative_eq!(pot.value(), 0.6, epsilon = NOISE_THRESHOLD);
    }

    #[test]
    fn when_pot_moves_near_zero_it_snaps_to_it_despite_not_traveling_enough_distance() {
        let mut pot = Pot::default();

        for _ in 0..32 {
            pot.update(0.004);
        }
        for _ in 0..32 {
            pot.update(0.008);
        }
        for _ in 0..32 {
            pot.update(0.0);
        }

        assert_relative_eq!(pot.value(), 0.0);
    }

    #[test]
    fn when_pot_moves_near_full_it_snaps_to_it_despite_not_traveling_enough_distance() {
        let mut pot = Pot::default();

        for _ in 0..32 {
            pot.update(0.999);
        }
        for _ in 0..32 {
            pot.update(1.0);
        }

        assert_relative_eq!(pot.value(), 1.0);
    }
}

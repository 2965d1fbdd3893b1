//! Delay line with feedback and a smoothly gliding delay time.
//!
//! ```text
//! IN ---(+)---> [ ring buffer ] ---+---> OUT
//!        ^                         |
//!        +------- feedback --------+
//! ```
//!
//! The delay time is never set directly. Instead a target is set, and the
//! time approaches it exponentially sample by sample. This way, modulating
//! the target on the control rate does not cause clicks or zipper noise.

use crate::memory_manager::{Error, MemoryManager};
use crate::ring_buffer::RingBuffer;

/// Portion of the distance to the target covered on each sample.
pub const DEFAULT_SMOOTHING: f32 = 0.0002;

// Reading at age 0 returns the sample written in the previous tick, so one
// sample is the shortest possible delay.
const MIN_DELAY: f32 = 1.0;

/// Highest magnitude stored in the buffer. A loop with feedback above 1.0
/// saturates here instead of overflowing.
pub const HEADROOM: f32 = 4.0;

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Delay {
    buffer: RingBuffer,
    capacity: f32,
    target: f32,
    // Distance of the current delay time from the target. Kept relative so
    // the approach does not stall once the step drops below the resolution
    // of the absolute delay time.
    offset: f32,
    smoothing: f32,
    feedback: f32,
}

impl Delay {
    /// Allocate a delay line able to hold `capacity` samples.
    ///
    /// # Errors
    ///
    /// Fails if the memory manager does not have enough space left for the
    /// buffer.
    pub fn new(
        memory_manager: &mut MemoryManager,
        capacity: usize,
        smoothing: f32,
    ) -> Result<Self, Error> {
        let capacity = capacity.max(MIN_DELAY as usize);
        Ok(Self {
            buffer: RingBuffer::allocate(memory_manager, capacity + 1)?,
            capacity: capacity as f32,
            target: MIN_DELAY,
            offset: 0.0,
            smoothing: smoothing.clamp(0.0, 1.0),
            feedback: 0.0,
        })
    }

    /// Set the delay time in samples the current time should glide to.
    ///
    /// The value is clamped within the capacity of the buffer, and NaN is
    /// treated as the shortest delay.
    pub fn set_target(&mut self, samples: f32) {
        let target = self.clamp_time(samples);
        self.offset += self.target - target;
        self.target = target;
    }

    /// Jump straight to the given delay time, skipping the glide.
    pub fn reset_time(&mut self, samples: f32) {
        self.target = self.clamp_time(samples);
        self.offset = 0.0;
    }

    /// Gain of the signal fed back to the input. It is not limited, gains
    /// of 1.0 and above make the loop grow on its own until it saturates
    /// at [`HEADROOM`].
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback;
    }

    #[must_use]
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    #[must_use]
    pub fn target(&self) -> f32 {
        self.target
    }

    #[must_use]
    pub fn current(&self) -> f32 {
        self.clamp_time(self.target + self.offset)
    }

    /// Remaining distance between the current delay time and its target.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.offset.abs()
    }

    #[must_use]
    pub fn capacity(&self) -> f32 {
        self.capacity
    }

    #[must_use]
    pub fn buffer(&self) -> &RingBuffer {
        &self.buffer
    }

    pub fn process(&mut self, x: f32) -> f32 {
        self.offset -= self.offset * self.smoothing;
        let read = self.buffer.peek_interpolated(self.current() - MIN_DELAY);
        self.buffer.write(saturate(self.feedback * read + x));
        read
    }

    fn clamp_time(&self, samples: f32) -> f32 {
        samples.max(MIN_DELAY).min(self.capacity)
    }
}

// Hard clip into the headroom. NaN would otherwise stay in the loop forever.
fn saturate(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(-HEADROOM, HEADROOM)
    }
}

/// Delay time modulated around its base by an LFO sample and depth.
#[must_use]
pub fn modulated_time(base: f32, lfo: f32, depth: f32) -> f32 {
    base * (1.0 + lfo * depth)
}

#[cfg(test)]
mod tests {
    use core::mem::MaybeUninit;

    use proptest::prelude::*;

    use super::*;

    fn delay(capacity: usize, smoothing: f32) -> Delay {
        let size = (capacity + 1).next_power_of_two();
        let mut memory_manager = MemoryManager::from(vec![MaybeUninit::uninit(); size].leak());
        Delay::new(&mut memory_manager, capacity, smoothing).unwrap()
    }

    #[test]
    fn when_memory_is_insufficient_it_fails() {
        let mut memory_manager = MemoryManager::from(vec![MaybeUninit::uninit(); 64].leak());
        assert!(Delay::new(&mut memory_manager, 1000, DEFAULT_SMOOTHING).is_err());
    }

    #[test]
    fn impulse_is_delayed_by_given_time() {
        let mut delay = delay(100, DEFAULT_SMOOTHING);
        delay.reset_time(10.0);

        let output: Vec<f32> = (0..30)
            .map(|i| delay.process(if i == 0 { 1.0 } else { 0.0 }))
            .collect();

        for (i, x) in output.iter().enumerate() {
            if i == 10 {
                assert_relative_eq!(*x, 1.0);
            } else {
                assert_relative_eq!(*x, 0.0);
            }
        }
    }

    #[test]
    fn feedback_repeats_attenuated_copies() {
        let mut delay = delay(100, DEFAULT_SMOOTHING);
        delay.reset_time(10.0);
        delay.set_feedback(0.5);

        let output: Vec<f32> = (0..41)
            .map(|i| delay.process(if i == 0 { 1.0 } else { 0.0 }))
            .collect();

        assert_relative_eq!(output[10], 1.0);
        assert_relative_eq!(output[20], 0.5);
        assert_relative_eq!(output[30], 0.25);
        assert_relative_eq!(output[40], 0.125);
        assert_relative_eq!(output[15], 0.0);
    }

    #[test]
    fn fractional_time_interpolates_between_samples() {
        let mut delay = delay(100, DEFAULT_SMOOTHING);
        delay.reset_time(2.5);

        let output: Vec<f32> = (0..5)
            .map(|i| delay.process(if i == 0 { 1.0 } else { 0.0 }))
            .collect();

        assert_relative_eq!(output[2], 0.5);
        assert_relative_eq!(output[3], 0.5);
    }

    #[test]
    fn target_is_clamped_within_capacity() {
        let mut delay = delay(100, DEFAULT_SMOOTHING);

        delay.set_target(1000.0);
        assert_relative_eq!(delay.target(), 100.0);

        delay.set_target(-5.0);
        assert_relative_eq!(delay.target(), 1.0);

        delay.set_target(f32::NAN);
        assert_relative_eq!(delay.target(), 1.0);
    }

    #[test]
    fn current_time_glides_instead_of_jumping() {
        let mut delay = delay(1000, 0.01);
        delay.reset_time(500.0);
        delay.set_target(600.0);

        assert_relative_eq!(delay.current(), 500.0);
        delay.process(0.0);
        assert_relative_eq!(delay.current(), 501.0, epsilon = 0.001);
        delay.process(0.0);
        assert_relative_eq!(delay.current(), 501.99, epsilon = 0.001);
    }

    #[test]
    fn smoothing_converges_within_derived_number_of_steps() {
        const EPSILON: f32 = 0.001;
        let mut delay = delay(48_000, DEFAULT_SMOOTHING);
        delay.reset_time(12_000.0);
        delay.set_target(11_400.0);

        let initial = delay.distance();
        let steps = libm::ceilf(
            libm::logf(EPSILON / initial) / libm::logf(1.0 - DEFAULT_SMOOTHING),
        ) as usize;

        let mut previous = initial;
        for _ in 0..steps {
            delay.process(0.0);
            let distance = delay.distance();
            assert!(distance < previous);
            previous = distance;
        }

        assert!(delay.distance() < EPSILON * 1.01);
    }

    #[test]
    fn runaway_feedback_is_not_limited() {
        let mut delay = delay(16, DEFAULT_SMOOTHING);
        delay.reset_time(4.0);
        delay.set_feedback(1.2);
        assert_relative_eq!(delay.feedback(), 1.2);

        delay.process(1.0);
        let mut peak = 0.0_f32;
        for _ in 0..64 {
            peak = peak.max(delay.process(0.0).abs());
        }
        assert!(peak > 1.0);
    }

    #[test]
    fn runaway_feedback_saturates_instead_of_overflowing() {
        let mut delay = delay(16, DEFAULT_SMOOTHING);
        delay.reset_time(4.0);
        delay.set_feedback(1.2);

        delay.process(1.0);
        let mut peak = 0.0_f32;
        for _ in 0..100_000 {
            let y = delay.process(0.0);
            assert!(y.is_finite());
            peak = peak.max(y.abs());
        }
        assert_relative_eq!(peak, HEADROOM);
    }

    #[test]
    fn non_finite_input_does_not_poison_the_loop() {
        let mut delay = delay(16, DEFAULT_SMOOTHING);
        delay.reset_time(4.0);
        delay.set_feedback(0.5);

        delay.process(f32::NAN);
        delay.process(f32::INFINITY);
        for _ in 0..64 {
            assert!(delay.process(0.0).is_finite());
        }
    }

    #[test]
    fn modulated_time_swings_around_base() {
        assert_relative_eq!(modulated_time(1000.0, 0.0, 0.05), 1000.0);
        assert_relative_eq!(modulated_time(1000.0, 1.0, 0.05), 1050.0);
        assert_relative_eq!(modulated_time(1000.0, -1.0, 0.05), 950.0);
        assert_relative_eq!(modulated_time(1000.0, -1.0, 0.0), 1000.0);
    }

    proptest! {
        #[test]
        fn cursor_stays_in_buffer_for_any_targets_and_gain(
            targets in prop::collection::vec(-1.0e6f32..1.0e6, 1..20),
            feedback in 0.0f32..4.0,
        ) {
            let mut delay = delay(480, 0.5);
            delay.set_feedback(feedback);
            for target in targets {
                delay.set_target(target);
                for _ in 0..50 {
                    delay.process(1.0);
                    prop_assert!(delay.current() >= 1.0);
                    prop_assert!(delay.current() <= delay.capacity());
                    prop_assert!(delay.buffer().write_index() < delay.buffer().len());
                }
            }
        }
    }
}

//! Single voice chorus.
//!
//! The input is delayed by a short time swinging around its base, driven by
//! its own sine LFO. Only the wet signal is returned, mixing with the dry
//! signal is up to the caller.

use crate::graph::ChorusUnit;
use crate::memory_manager::{Error, MemoryManager};
use crate::oscillator::Oscillator;
use crate::ring_buffer::RingBuffer;

const BASE_DELAY: f32 = 0.015;
const MAX_MODULATION: f32 = 0.005;
const DEFAULT_FEEDBACK: f32 = 0.4;

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Chorus {
    buffer: RingBuffer,
    lfo: Oscillator,
    base: f32,
    max_modulation: f32,
    depth: f32,
    feedback: f32,
}

impl Chorus {
    /// # Errors
    ///
    /// Fails if the memory manager cannot fit the delay buffer.
    pub fn new(sample_rate: f32, memory_manager: &mut MemoryManager) -> Result<Self, Error> {
        let base = BASE_DELAY * sample_rate;
        let max_modulation = MAX_MODULATION * sample_rate;
        let buffer = RingBuffer::allocate(memory_manager, (base + max_modulation) as usize + 2)?;
        Ok(Self {
            buffer,
            lfo: Oscillator::new(sample_rate),
            base,
            max_modulation,
            depth: 0.0,
            feedback: DEFAULT_FEEDBACK,
        })
    }

    #[cfg(test)]
    fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback;
    }

    #[must_use]
    pub fn depth(&self) -> f32 {
        self.depth
    }

    #[must_use]
    pub fn frequency(&self) -> f32 {
        self.lfo.frequency()
    }

    /// Delay in samples, the same as the base when depth is zero.
    #[must_use]
    pub fn base_delay(&self) -> f32 {
        self.base
    }
}

impl ChorusUnit for Chorus {
    fn set_depth(&mut self, depth: f32) {
        self.depth = depth.max(0.0).min(1.0);
    }

    fn set_frequency(&mut self, frequency: f32) {
        self.lfo.set_frequency(frequency);
    }

    fn process(&mut self, x: f32) -> f32 {
        let delay = self.base + self.lfo.pop() * self.depth * self.max_modulation;
        let read = self.buffer.peek_interpolated(delay - 1.0);
        self.buffer.write(x + read * self.feedback);
        read
    }
}

#[cfg(test)]
mod tests {
    use core::mem::MaybeUninit;

    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn chorus() -> Chorus {
        let mut memory_manager = MemoryManager::from(vec![MaybeUninit::uninit(); 1024].leak());
        Chorus::new(SAMPLE_RATE, &mut memory_manager).unwrap()
    }

    #[test]
    fn without_depth_it_is_a_plain_delay() {
        let mut chorus = chorus();
        chorus.set_feedback(0.0);
        chorus.set_depth(0.0);
        chorus.set_frequency(1.0);

        let base = libm::roundf(chorus.base_delay()) as usize;
        let output: Vec<f32> = (0..base + 10)
            .map(|i| chorus.process(if i == 0 { 1.0 } else { 0.0 }))
            .collect();

        assert_relative_eq!(output[base], 1.0, epsilon = 0.0001);
        assert_relative_eq!(output[base - 1], 0.0, epsilon = 0.0001);
        assert_relative_eq!(output[base + 1], 0.0, epsilon = 0.0001);
    }

    #[test]
    fn feedback_repeats_the_input() {
        let mut chorus = chorus();
        chorus.set_depth(0.0);

        let base = libm::roundf(chorus.base_delay()) as usize;
        let output: Vec<f32> = (0..=base * 2)
            .map(|i| chorus.process(if i == 0 { 1.0 } else { 0.0 }))
            .collect();

        assert_relative_eq!(output[base * 2], DEFAULT_FEEDBACK, epsilon = 0.0001);
    }

    #[test]
    fn modulation_moves_the_echo() {
        let mut chorus = chorus();
        chorus.set_feedback(0.0);
        chorus.set_depth(1.0);
        chorus.set_frequency(10.0);

        // Let the LFO travel near its peak before sending the impulse.
        for _ in 0..(SAMPLE_RATE / 40.0) as usize {
            chorus.process(0.0);
        }

        let base = libm::roundf(chorus.base_delay()) as usize;
        let output: Vec<f32> = (0..base * 2)
            .map(|i| chorus.process(if i == 0 { 1.0 } else { 0.0 }))
            .collect();
        let peak = output
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();

        assert_ne!(peak, base);
    }

    #[test]
    fn depth_is_clamped() {
        let mut chorus = chorus();
        chorus.set_depth(2.0);
        assert_relative_eq!(chorus.depth(), 1.0);
        chorus.set_depth(-2.0);
        assert_relative_eq!(chorus.depth(), 0.0);
    }
}

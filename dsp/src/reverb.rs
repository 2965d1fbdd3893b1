//! Reverberation through a small feedback delay network.
//!
//! Four delay lines of mutually prime lengths are cross-coupled through a
//! Hadamard matrix. Each loop is damped by a low-pass filter, so high
//! frequencies die out sooner than the low ones.

use crate::graph::ReverbUnit;
use crate::memory_manager::{Error, MemoryManager};
use crate::one_pole_filter::OnePoleFilter;
use crate::ring_buffer::RingBuffer;

const LINE_LENGTHS_MS: [f32; 4] = [29.7, 37.1, 41.1, 43.7];

const DAMPING_CUTOFF: f32 = 10_000.0;

// The matrix is orthogonal and the damping filter never amplifies, so any
// feedback below one keeps the network stable.
const FEEDBACK_RANGE: (f32, f32) = (0.0, 0.9999);

const OUTPUT_GAIN: f32 = 0.25;

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reverb {
    lines: [RingBuffer; 4],
    lengths: [usize; 4],
    damping: [OnePoleFilter; 4],
    feedback: f32,
}

impl Reverb {
    /// # Errors
    ///
    /// Fails if the memory manager cannot fit all four delay lines.
    pub fn new(sample_rate: f32, memory_manager: &mut MemoryManager) -> Result<Self, Error> {
        let lengths = LINE_LENGTHS_MS.map(|ms| ((ms / 1000.0 * sample_rate) as usize).max(1));
        let lines = [
            RingBuffer::allocate(memory_manager, lengths[0])?,
            RingBuffer::allocate(memory_manager, lengths[1])?,
            RingBuffer::allocate(memory_manager, lengths[2])?,
            RingBuffer::allocate(memory_manager, lengths[3])?,
        ];
        Ok(Self {
            lines,
            lengths,
            damping: [OnePoleFilter::new(sample_rate, DAMPING_CUTOFF); 4],
            feedback: FEEDBACK_RANGE.0,
        })
    }

    #[must_use]
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    #[cfg(test)]
    fn lengths(&self) -> [usize; 4] {
        self.lengths
    }
}

impl ReverbUnit for Reverb {
    fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.max(FEEDBACK_RANGE.0).min(FEEDBACK_RANGE.1);
    }

    fn process(&mut self, x: f32) -> f32 {
        let mut delayed = [0.0; 4];
        for (i, sample) in delayed.iter_mut().enumerate() {
            *sample = self.lines[i].peek(self.lengths[i] - 1);
        }

        let mixed = hadamard(delayed);
        for (i, line) in self.lines.iter_mut().enumerate() {
            let fed_back = self.damping[i].tick(mixed[i]) * self.feedback;
            line.write(x + fed_back);
        }

        delayed.iter().sum::<f32>() * OUTPUT_GAIN
    }
}

fn hadamard([a, b, c, d]: [f32; 4]) -> [f32; 4] {
    [
        (a + b + c + d) * 0.5,
        (a - b + c - d) * 0.5,
        (a + b - c - d) * 0.5,
        (a - b - c + d) * 0.5,
    ]
}

//! Moving average over the most recent readings.

/// Buffer meant for smoothening of noisy readings.
///
/// This is not optimized for large buffers, but is fine for smoothening
/// of pot readings over up to 32 samples.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) struct Buffer<const N: usize> {
    buffer: [f32; N],
    pointer: usize,
}

impl<const N: usize> Default for Buffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Buffer<N> {
    pub fn new() -> Self {
        Self {
            buffer: [0.0; N],
            pointer: 0,
        }
    }

    pub fn write(&mut self, value: f32) {
        self.buffer[self.pointer] = value;
        self.pointer = (self.pointer + 1) % N;
    }

    pub fn read(&self) -> f32 {
        let sum: f32 = self.buffer.iter().sum();
        sum / N as f32
    }

    /// Fill the whole history with the given value.
    #[cfg(test)]
    pub fn fill(&mut self, value: f32) {
        self.buffer = [value; N];
    }
}

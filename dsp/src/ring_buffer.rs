//! Write to and read from a ring buffer, keeping data in a static slice.
//!
//! The slice length is always a power of two and every access goes through
//! a bit mask, so no offset, however large, can address outside the slice.

use core::fmt;

use crate::memory_manager::{Error, MemoryManager};

pub struct RingBuffer {
    buffer: &'static mut [f32],
    mask: usize,
    write_index: usize,
}

impl fmt::Debug for RingBuffer {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(
            fmt,
            "RingBuffer(len: {}, write_index: {})",
            self.buffer.len(),
            self.write_index
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RingBuffer {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "RingBuffer(len: {}, write_index: {})",
            self.buffer.len(),
            self.write_index
        );
    }
}

impl RingBuffer {
    /// Allocate a buffer holding at least `minimum_len` samples.
    ///
    /// # Errors
    ///
    /// Fails if the memory manager cannot fit the buffer rounded up to the
    /// next power of two.
    pub fn allocate(memory_manager: &mut MemoryManager, minimum_len: usize) -> Result<Self, Error> {
        let buffer = memory_manager.allocate_power_of_two(minimum_len)?;
        let mask = buffer.len() - 1;
        Ok(Self {
            buffer,
            mask,
            write_index: 0,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[must_use]
    pub fn write_index(&self) -> usize {
        self.write_index
    }

    /// Store a new sample. The cursor moves backwards so that the most
    /// recent sample is always at age 0.
    pub fn write(&mut self, value: f32) {
        self.write_index = self.write_index.wrapping_sub(1) & self.mask;
        self.buffer[self.write_index] = value;
    }

    /// Read the sample written `age` writes ago. Age 0 is the newest one.
    #[must_use]
    pub fn peek(&self, age: usize) -> f32 {
        self.buffer[self.index(age)]
    }

    /// Read between two samples, linearly interpolating by the fractional
    /// part of the age. Negative ages read the newest sample.
    #[must_use]
    pub fn peek_interpolated(&self, age: f32) -> f32 {
        let age = age.max(0.0);
        let whole = age as usize;
        let fraction = age - whole as f32;
        let a = self.peek(whole);
        let b = self.peek(whole.wrapping_add(1));
        a + (b - a) * fraction
    }

    #[must_use]
    pub fn index(&self, age: usize) -> usize {
        self.write_index.wrapping_add(age) & self.mask
    }
}

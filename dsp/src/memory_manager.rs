//! Bump allocator handing out sample buffers from a static memory region.
//!
//! On the hardware, the region is the external SDRAM. Buffers are requested
//! once during initialization and are never freed.

use core::fmt;
use core::mem::MaybeUninit;

pub struct MemoryManager {
    memory: &'static mut [MaybeUninit<u32>],
    allocated: usize,
}

impl fmt::Debug for MemoryManager {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(
            fmt,
            "MemoryManager(allocated: {}, remaining: {})",
            self.allocated,
            self.memory.len()
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for MemoryManager {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "MemoryManager(allocated: {}, remaining: {})",
            self.allocated,
            self.memory.len()
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    NotEnoughMemory,
}

impl MemoryManager {
    /// Allocate zeroed f32 slice of requested size in memory.
    ///
    /// Allocated memory never gets freed.
    ///
    /// # Errors
    ///
    /// If there is not enough memory left to allocate requested size, the
    /// function returns `Error::NotEnoughMemory`.
    pub fn allocate(&mut self, size: usize) -> Result<&'static mut [f32], Error> {
        if size > self.remaining() {
            return Err(Error::NotEnoughMemory);
        }

        let (slice_u32, rest) = core::mem::take(&mut self.memory).split_at_mut(size);
        self.memory = rest;
        self.allocated += size;

        // Safety: Both types are slices with items of identical size and
        // alignment.
        let maybe_slice_f32 =
            unsafe { &mut *(slice_u32 as *mut [MaybeUninit<u32>] as *mut [MaybeUninit<f32>]) };

        for elem in maybe_slice_f32.iter_mut() {
            elem.write(0.0);
        }

        // Safety: All the items were initialized above.
        let slice_f32 = unsafe { &mut *(maybe_slice_f32 as *mut [MaybeUninit<f32>] as *mut [f32]) };

        Ok(slice_f32)
    }

    /// Allocate a slice with length rounded up to the nearest power of two.
    ///
    /// Such slices can be indexed through a bit mask, which keeps every
    /// access within bounds no matter what offset is requested.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotEnoughMemory` if the rounded size does not fit.
    pub fn allocate_power_of_two(
        &mut self,
        minimum_size: usize,
    ) -> Result<&'static mut [f32], Error> {
        self.allocate(minimum_size.max(1).next_power_of_two())
    }

    /// Number of f32 items that can still be allocated.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.memory.len()
    }
}

impl From<&'static mut [MaybeUninit<u32>]> for MemoryManager {
    fn from(memory: &'static mut [MaybeUninit<u32>]) -> Self {
        Self {
            memory,
            allocated: 0,
        }
    }
}

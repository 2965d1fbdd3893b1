//! Round-robin distribution of control work across audio blocks.
//!
//! Recalculating every parameter on each block would be wasteful, since
//! controls move slowly compared to the audio rate. Instead, each block
//! handles a single slot: one of the bound controls, or the derived state
//! combining several of them.

/// Work to be done on the current block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Slot {
    /// Recalculate the parameter bound on the given index.
    Control(usize),
    /// Recalculate state depending on multiple parameters.
    Derived,
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlScheduler {
    counter: usize,
    controls: usize,
}

impl ControlScheduler {
    #[must_use]
    pub fn new(controls: usize) -> Self {
        Self {
            counter: 0,
            controls,
        }
    }

    /// Number of slots in a single round, bound controls plus the derived one.
    #[must_use]
    pub fn slots(&self) -> usize {
        self.controls + 1
    }

    /// Return the slot to handle on this block and move to the next one.
    pub fn advance(&mut self) -> Slot {
        if self.counter > self.controls {
            self.counter = 0;
        }

        let slot = if self.counter == self.controls {
            Slot::Derived
        } else {
            Slot::Control(self.counter)
        };

        self.counter = (self.counter + 1) % self.slots();

        slot
    }

    #[cfg(test)]
    fn set_counter(&mut self, counter: usize) {
        self.counter = counter;
    }
}

//! Control layer of the pedals, passing user input to the signal graph.
//!
//! It is meant to run in a firmware with two loops running in different
//! frequencies. The slow one samples pots and publishes their readings,
//! the audio one consumes them at its own pace:
//!
//! ```text
//!   [Pots] --> [ Pot filter ] --> {Controls}
//!                                     |
//!                                     V
//!   [Codec] <--(block)--> [ Pedal {Scheduler, Parameters, SignalGraph} ]
//! ```
//!
//! Only one parameter is recalculated per audio block, so the cost of the
//! control work stays constant no matter how many controls are bound.

#![cfg_attr(not(test), no_std)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

#[cfg(test)]
#[macro_use]
extern crate approx;

mod log;

pub mod channel;
pub mod input;
pub mod parameter;
pub mod pedal;
pub mod scheduler;
pub mod variant;

pub use channel::{ControlChannel, Controls, MAX_CHANNELS};
pub use pedal::Pedal;
pub use variant::{Config, Variant};

use gaze_dsp::memory_manager;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Buffers of the signal graph do not fit into the given memory.
    NotEnoughMemory,
    /// More controls are bound than there are channels.
    TooManyBindings,
    /// Binding refers to a channel that does not exist.
    ChannelOutOfRange(usize),
    /// Single target is bound to multiple controls.
    DuplicateTarget,
}

impl From<memory_manager::Error> for Error {
    fn from(error: memory_manager::Error) -> Self {
        match error {
            memory_manager::Error::NotEnoughMemory => Self::NotEnoughMemory,
        }
    }
}

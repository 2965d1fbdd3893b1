//! Digital signal processing components that must run in real-time.
//!
//! Everything here is allocated once during initialization, using slices
//! carved out of a [`memory_manager::MemoryManager`]. Nothing allocates or
//! panics while processing audio.

#![cfg_attr(not(test), no_std)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

#[cfg(test)]
#[macro_use]
extern crate approx;

pub mod chorus;
pub mod crossfade;
pub mod delay;
pub mod graph;
pub mod memory_manager;
pub mod oscillator;
pub mod reverb;
pub mod ring_buffer;

mod one_pole_filter;

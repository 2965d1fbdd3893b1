//! Filtering of raw hardware readings before they reach the controls.

mod buffer;
mod pot;

pub use pot::Pot;

//! Lock-free hand-off of control readings between tasks.
//!
//! The sampling task publishes filtered pot readings while the audio task
//! reads them. Each reading is stored as raw bits of an `f32` inside an
//! atomic cell, so neither side ever waits for the other.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Maximum number of analog controls a pedal may bind.
pub const MAX_CHANNELS: usize = 6;

/// Single normalized control reading, always within [0.0, 1.0].
#[derive(Debug)]
pub struct ControlChannel {
    bits: AtomicU32,
}

impl Default for ControlChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlChannel {
    #[must_use]
    pub const fn new() -> Self {
        // Bit pattern of 0.0_f32.
        Self {
            bits: AtomicU32::new(0),
        }
    }

    /// Publish a new reading. It gets clamped to [0.0, 1.0], NaN turns to 0.0.
    pub fn write(&self, value: f32) {
        let value = value.max(0.0).min(1.0);
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }

    #[must_use]
    pub fn read(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

/// All the inputs of a pedal, shared between the sampling and audio tasks.
#[derive(Debug)]
pub struct Controls {
    channels: [ControlChannel; MAX_CHANNELS],
    switch: AtomicBool,
}

impl Default for Controls {
    fn default() -> Self {
        Self::new()
    }
}

impl Controls {
    #[must_use]
    pub const fn new() -> Self {
        const CHANNEL: ControlChannel = ControlChannel::new();
        Self {
            channels: [CHANNEL; MAX_CHANNELS],
            switch: AtomicBool::new(false),
        }
    }

    /// Publish reading of the given channel. Unknown channels are ignored.
    pub fn write(&self, channel: usize, value: f32) {
        if let Some(channel) = self.channels.get(channel) {
            channel.write(value);
        }
    }

    /// Reading of the given channel, 0.0 for unknown channels.
    #[must_use]
    pub fn read(&self, channel: usize) -> f32 {
        self.channels.get(channel).map_or(0.0, ControlChannel::read)
    }

    pub fn set_switch(&self, on: bool) {
        self.switch.store(on, Ordering::Relaxed);
    }

    #[must_use]
    pub fn switch(&self) -> bool {
        self.switch.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_starts_at_zero() {
        let controls = Controls::new();
        for i in 0..MAX_CHANNELS {
            assert_relative_eq!(controls.read(i), 0.0);
        }
        assert!(!controls.switch());
    }

    #[test]
    fn written_value_is_read_back() {
        let controls = Controls::new();
        controls.write(3, 0.42);
        assert_relative_eq!(controls.read(3), 0.42);
        assert_relative_eq!(controls.read(2), 0.0);
    }

    #[test]
    fn written_value_is_clamped() {
        let channel = ControlChannel::new();
        channel.write(1.5);
        assert_relative_eq!(channel.read(), 1.0);
        channel.write(-0.5);
        assert_relative_eq!(channel.read(), 0.0);
        channel.write(f32::NAN);
        assert_relative_eq!(channel.read(), 0.0);
    }

    #[test]
    fn unknown_channel_is_ignored() {
        let controls = Controls::new();
        controls.write(MAX_CHANNELS, 1.0);
        assert_relative_eq!(controls.read(MAX_CHANNELS), 0.0);
    }

    #[test]
    fn switch_is_shared() {
        let controls = Controls::new();
        controls.set_switch(true);
        assert!(controls.switch());
    }
}

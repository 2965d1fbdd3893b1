//! Blend two signals by a position between them.
//!
//! Gains are calculated when the position changes, which happens on the
//! control rate. Processing a sample is then only two multiplications.

use core::f32::consts::FRAC_PI_2;

/// Shape of the gain curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Curve {
    /// Gains follow a quarter of cosine and sine, keeping the power of
    /// uncorrelated signals constant: `a² + b² = 1`.
    #[default]
    ConstantPower,
    /// Gains sum up to one: `a + b = 1`.
    Linear,
    /// Gain of the second input rises slowly at first, `b = p²`.
    Exponential,
    /// Gain of the second input follows a 140 dB exponential sweep.
    Logarithmic,
}

// Floor of the logarithmic curve, -140 dB.
const LOG_MIN: f32 = -16.118_095;

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CrossFade {
    curve: Curve,
    position: f32,
    gain_a: f32,
    gain_b: f32,
}

impl CrossFade {
    /// Start in the middle, the same as an untouched pot would.
    #[must_use]
    pub fn new(curve: Curve) -> Self {
        let mut crossfade = Self {
            curve,
            position: 0.0,
            gain_a: 1.0,
            gain_b: 0.0,
        };
        crossfade.set_position(0.5);
        crossfade
    }

    /// Set the position, 0.0 passes only the first signal, 1.0 passes only
    /// the second. Values outside of the range get clamped.
    pub fn set_position(&mut self, position: f32) {
        // NaN is mapped to zero by `max`.
        self.position = position.max(0.0).min(1.0);
        let (gain_a, gain_b) = gains(self.curve, self.position);
        self.gain_a = gain_a;
        self.gain_b = gain_b;
    }

    #[must_use]
    pub fn position(&self) -> f32 {
        self.position
    }

    #[must_use]
    pub fn curve(&self) -> Curve {
        self.curve
    }

    #[must_use]
    pub fn gains(&self) -> (f32, f32) {
        (self.gain_a, self.gain_b)
    }

    #[must_use]
    pub fn process(&self, a: f32, b: f32) -> f32 {
        a * self.gain_a + b * self.gain_b
    }
}

fn gains(curve: Curve, position: f32) -> (f32, f32) {
    // Ends pass a single input exactly, regardless of the rounding of the curve.
    if position <= 0.0 {
        return (1.0, 0.0);
    } else if position >= 1.0 {
        return (0.0, 1.0);
    }

    match curve {
        Curve::ConstantPower => {
            let angle = position * FRAC_PI_2;
            (libm::cosf(angle), libm::sinf(angle))
        }
        Curve::Linear => (1.0 - position, position),
        Curve::Exponential => {
            let b = position * position;
            (1.0 - b, b)
        }
        Curve::Logarithmic => {
            let b = libm::expf(position * -LOG_MIN + LOG_MIN);
            (1.0 - b, b)
        }
    }
}

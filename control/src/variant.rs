//! Configuration of the pedals sharing this firmware.
//!
//! All the pedals run the same signal graph. They differ in which of its
//! branches are populated, which parameters are exposed on pots, and how
//! far the delay feedback may go.

use gaze_dsp::delay::DEFAULT_SMOOTHING;
use gaze_dsp::graph::Modulation;

use crate::parameter::Curve;

const FEEDBACK_RANGE: (f32, f32) = (0.75, 0.999);
const DEPTH_RANGE: (f32, f32) = (0.0, 1.0);
const BLEND_RANGE: (f32, f32) = (0.0, 1.0);
const VOLUME_RANGE: (f32, f32) = (0.0, 3.0);
const MODULATION_FREQUENCY_RANGE: (f32, f32) = (0.001, 1.0);
const MODULATION_BLEND_RANGE: (f32, f32) = (0.0, 0.75);

/// Attribute of the signal graph a control may be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Target {
    /// Reverb feedback, scaled into the delay feedback.
    Feedback,
    /// Chorus depth, scaled into the delay modulation depth.
    Depth,
    /// Final dry/wet crossfade.
    Blend,
    Volume,
    /// Frequency of both chorus and delay LFOs.
    ModulationFrequency,
    /// Crossfade between plain reverb and the modulation branch.
    ModulationBlend,
}

impl Target {
    pub const ALL: [Self; 6] = [
        Self::Feedback,
        Self::Depth,
        Self::Blend,
        Self::Volume,
        Self::ModulationFrequency,
        Self::ModulationBlend,
    ];
}

/// Assignment of an analog channel to a target.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Binding {
    pub target: Target,
    pub channel: usize,
    pub range: (f32, f32),
    pub curve: Curve,
}

impl Binding {
    const fn new(target: Target, channel: usize, range: (f32, f32), curve: Curve) -> Self {
        Self {
            target,
            channel,
            range,
            curve,
        }
    }
}

/// Values used for targets that are not bound to any control.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Defaults {
    pub feedback: f32,
    pub depth: f32,
    pub blend: f32,
    pub volume: f32,
    pub modulation_frequency: f32,
    pub modulation_blend: f32,
    pub branch_position: f32,
}

impl Defaults {
    #[must_use]
    pub fn get(&self, target: Target) -> f32 {
        match target {
            Target::Feedback => self.feedback,
            Target::Depth => self.depth,
            Target::Blend => self.blend,
            Target::Volume => self.volume,
            Target::ModulationFrequency => self.modulation_frequency,
            Target::ModulationBlend => self.modulation_blend,
        }
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            feedback: FEEDBACK_RANGE.0,
            depth: 0.0,
            blend: 0.5,
            volume: 1.0,
            modulation_frequency: 0.5,
            modulation_blend: 0.5,
            branch_position: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub bindings: &'static [Binding],
    pub modulation: Modulation,
    /// Number of frames passed to each audio callback.
    pub block_length: usize,
    /// Delay time without modulation, in seconds.
    pub delay_base_time: f32,
    /// Longest possible delay, in seconds.
    pub delay_capacity: f32,
    /// Depth of the delay modulation when the depth control is at its maximum.
    pub delay_max_depth: f32,
    pub delay_smoothing: f32,
    /// Delay feedback is the feedback parameter multiplied by this.
    pub delay_feedback_scale: f32,
    /// When disabled, the delay feedback may climb above 1.0 and run away.
    pub limit_delay_feedback: bool,
    /// Whether the switch selects between chorus and delay.
    pub switched_branch: bool,
    pub defaults: Defaults,
}

impl Config {
    #[must_use]
    pub fn binding(&self, target: Target) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.target == target)
    }
}

impl Default for Config {
    fn default() -> Self {
        Variant::Gaze.config()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Variant {
    /// Reverb feeding both chorus and delay.
    Gaze,
    /// Reverb with chorus.
    Drift,
    /// Reverb with delay.
    Echo,
    /// Reverb feeding chorus or delay, with the delay allowed to self-oscillate.
    Runaway,
}

const GAZE_BINDINGS: [Binding; 6] = [
    Binding::new(Target::Feedback, 0, FEEDBACK_RANGE, Curve::Linear),
    Binding::new(Target::Depth, 1, DEPTH_RANGE, Curve::Linear),
    Binding::new(Target::Blend, 2, BLEND_RANGE, Curve::Linear),
    Binding::new(Target::Volume, 3, VOLUME_RANGE, Curve::Linear),
    Binding::new(
        Target::ModulationFrequency,
        4,
        MODULATION_FREQUENCY_RANGE,
        Curve::Linear,
    ),
    Binding::new(
        Target::ModulationBlend,
        5,
        MODULATION_BLEND_RANGE,
        Curve::Linear,
    ),
];

const DRIFT_BINDINGS: [Binding; 5] = [
    Binding::new(Target::Feedback, 0, FEEDBACK_RANGE, Curve::Linear),
    Binding::new(Target::Depth, 1, DEPTH_RANGE, Curve::Linear),
    Binding::new(Target::Blend, 2, BLEND_RANGE, Curve::Linear),
    Binding::new(Target::Volume, 3, VOLUME_RANGE, Curve::Logarithmic),
    Binding::new(
        Target::ModulationBlend,
        4,
        MODULATION_BLEND_RANGE,
        Curve::Linear,
    ),
];

const ECHO_BINDINGS: [Binding; 4] = [
    Binding::new(Target::Feedback, 0, FEEDBACK_RANGE, Curve::Linear),
    Binding::new(Target::Depth, 1, DEPTH_RANGE, Curve::Linear),
    Binding::new(Target::Blend, 2, BLEND_RANGE, Curve::Linear),
    Binding::new(Target::Volume, 3, VOLUME_RANGE, Curve::Linear),
];

impl Variant {
    #[must_use]
    pub fn config(self) -> Config {
        let base = Config {
            bindings: &GAZE_BINDINGS,
            modulation: Modulation::Blend,
            block_length: 1,
            delay_base_time: 0.25,
            delay_capacity: 1.0,
            delay_max_depth: 0.05,
            delay_smoothing: DEFAULT_SMOOTHING,
            delay_feedback_scale: 0.8,
            limit_delay_feedback: true,
            switched_branch: false,
            defaults: Defaults::default(),
        };

        match self {
            Self::Gaze => base,
            Self::Drift => Config {
                bindings: &DRIFT_BINDINGS,
                modulation: Modulation::Chorus,
                block_length: 4,
                defaults: Defaults {
                    modulation_frequency: 0.3,
                    ..Defaults::default()
                },
                ..base
            },
            Self::Echo => Config {
                bindings: &ECHO_BINDINGS,
                modulation: Modulation::Delay,
                block_length: 4,
                defaults: Defaults {
                    modulation_blend: MODULATION_BLEND_RANGE.1,
                    ..Defaults::default()
                },
                ..base
            },
            Self::Runaway => Config {
                delay_feedback_scale: 1.2,
                limit_delay_feedback: false,
                switched_branch: true,
                ..base
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_binds_feedback_and_volume() {
        for variant in [
            Variant::Gaze,
            Variant::Drift,
            Variant::Echo,
            Variant::Runaway,
        ] {
            let config = variant.config();
            assert!(config.binding(Target::Feedback).is_some());
            assert!(config.binding(Target::Volume).is_some());
        }
    }

    #[test]
    fn drift_has_logarithmic_volume_and_no_delay() {
        let config = Variant::Drift.config();
        assert_eq!(config.bindings.len(), 5);
        assert_eq!(config.modulation, Modulation::Chorus);
        assert_eq!(
            config.binding(Target::Volume).unwrap().curve,
            Curve::Logarithmic
        );
        assert!(config.binding(Target::ModulationFrequency).is_none());
    }

    #[test]
    fn echo_exposes_four_controls() {
        let config = Variant::Echo.config();
        assert_eq!(config.bindings.len(), 4);
        assert_eq!(config.modulation, Modulation::Delay);
        assert_eq!(config.block_length, 4);
    }

    #[test]
    fn only_runaway_lets_the_feedback_run_away() {
        assert!(Variant::Gaze.config().limit_delay_feedback);
        assert!(Variant::Drift.config().limit_delay_feedback);
        assert!(Variant::Echo.config().limit_delay_feedback);

        let runaway = Variant::Runaway.config();
        assert!(!runaway.limit_delay_feedback);
        assert!(runaway.switched_branch);
        assert!(runaway.delay_feedback_scale * FEEDBACK_RANGE.1 > 1.0);
    }

    #[test]
    fn unbound_targets_fall_back_to_defaults() {
        let defaults = Variant::Echo.config().defaults;
        assert_relative_eq!(
            defaults.get(Target::ModulationBlend),
            MODULATION_BLEND_RANGE.1
        );
        assert_relative_eq!(defaults.get(Target::Volume), 1.0);
    }
}

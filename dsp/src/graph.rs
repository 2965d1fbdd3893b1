//! Fixed signal path shared by all the pedals.
//!
//! ```text
//!  DRY --+--> [ reverb ] --+--> [ chorus ] --+
//!        |                 |                 (branch) --+
//!        |                 +--> [ delay ] ---+          |
//!        |                 |                            |
//!        |                 +---------------------(modulation)--+
//!        |                                                     |
//!        +------------------------------------------------(output) * volume --> OUT
//! ```
//!
//! The graph is assembled once and its shape never changes. Its attributes
//! are updated from the control loop through setters, one at a time, while
//! `tick` only ever reads the cached values.

use crate::chorus::Chorus;
use crate::crossfade::{CrossFade, Curve};
use crate::delay::{self, Delay};
use crate::memory_manager::{Error, MemoryManager};
use crate::oscillator::Oscillator;
use crate::reverb::Reverb;

/// Contract of a reverb unit placed at the head of the graph.
pub trait ReverbUnit {
    fn set_feedback(&mut self, feedback: f32);
    fn process(&mut self, x: f32) -> f32;
}

/// Contract of a chorus unit placed on the modulation branch.
pub trait ChorusUnit {
    fn set_depth(&mut self, depth: f32);
    fn set_frequency(&mut self, frequency: f32);
    fn process(&mut self, x: f32) -> f32;
}

/// Unit passing its input through untouched.
#[derive(Debug, Default, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bypass;

impl ReverbUnit for Bypass {
    fn set_feedback(&mut self, _feedback: f32) {}

    fn process(&mut self, x: f32) -> f32 {
        x
    }
}

impl ChorusUnit for Bypass {
    fn set_depth(&mut self, _depth: f32) {}

    fn set_frequency(&mut self, _frequency: f32) {}

    fn process(&mut self, x: f32) -> f32 {
        x
    }
}

/// Optional unit, passing its input through while it is absent.
impl<C: ChorusUnit> ChorusUnit for Option<C> {
    fn set_depth(&mut self, depth: f32) {
        if let Some(chorus) = self {
            chorus.set_depth(depth);
        }
    }

    fn set_frequency(&mut self, frequency: f32) {
        if let Some(chorus) = self {
            chorus.set_frequency(frequency);
        }
    }

    fn process(&mut self, x: f32) -> f32 {
        self.as_mut().map_or(x, |chorus| chorus.process(x))
    }
}

/// Which effects populate the modulation branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Modulation {
    /// Only chorus, the delay is not allocated at all.
    Chorus,
    /// Only the modulated delay.
    Delay,
    /// Both, blended through the branch crossfade.
    Blend,
}

impl Modulation {
    #[must_use]
    pub fn has_chorus(self) -> bool {
        matches!(self, Self::Chorus | Self::Blend)
    }

    #[must_use]
    pub fn has_delay(self) -> bool {
        matches!(self, Self::Delay | Self::Blend)
    }
}

/// Dimensions of the modulated delay, all times given in samples.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DelayConfig {
    pub capacity: usize,
    pub base_time: f32,
    pub smoothing: f32,
}

#[derive(Debug)]
pub struct SignalGraph<R, C> {
    modulation: Modulation,
    reverb: R,
    chorus: C,
    delay: Option<Delay>,
    delay_base_time: f32,
    delay_depth: f32,
    lfo: Oscillator,
    branch: CrossFade,
    modulation_mix: CrossFade,
    output: CrossFade,
}

impl SignalGraph<Reverb, Option<Chorus>> {
    /// Assemble the graph with the bundled reverb and chorus. The chorus is
    /// allocated only if the modulation branch uses it.
    ///
    /// # Errors
    ///
    /// Fails if the memory manager cannot fit all the buffers.
    pub fn with_default_units(
        sample_rate: f32,
        modulation: Modulation,
        delay_config: DelayConfig,
        memory_manager: &mut MemoryManager,
    ) -> Result<Self, Error> {
        let reverb = Reverb::new(sample_rate, memory_manager)?;
        let chorus = if modulation.has_chorus() {
            Some(Chorus::new(sample_rate, memory_manager)?)
        } else {
            None
        };
        Self::new(
            sample_rate,
            modulation,
            reverb,
            chorus,
            delay_config,
            memory_manager,
        )
    }
}

impl<R: ReverbUnit, C: ChorusUnit> SignalGraph<R, C> {
    /// # Errors
    ///
    /// Fails if the memory manager cannot fit the delay buffer.
    pub fn new(
        sample_rate: f32,
        modulation: Modulation,
        reverb: R,
        chorus: C,
        delay_config: DelayConfig,
        memory_manager: &mut MemoryManager,
    ) -> Result<Self, Error> {
        let delay = if modulation.has_delay() {
            let mut delay = Delay::new(
                memory_manager,
                delay_config.capacity,
                delay_config.smoothing,
            )?;
            delay.reset_time(delay_config.base_time);
            Some(delay)
        } else {
            None
        };

        let mut lfo = Oscillator::new(sample_rate);
        lfo.set_frequency(1.0);
        lfo.set_amplitude(1.0);

        Ok(Self {
            modulation,
            reverb,
            chorus,
            delay,
            delay_base_time: delay_config.base_time,
            delay_depth: 0.0,
            lfo,
            branch: CrossFade::new(Curve::ConstantPower),
            modulation_mix: CrossFade::new(Curve::ConstantPower),
            output: CrossFade::new(Curve::ConstantPower),
        })
    }

    /// Process a single dry sample, returning the output before it is sent
    /// to the codec.
    pub fn tick(&mut self, dry: f32, volume: f32) -> f32 {
        self.lfo.pop();

        let wet_reverb = self.reverb.process(dry);

        let wet_chorus = if self.modulation.has_chorus() {
            self.chorus.process(wet_reverb)
        } else {
            0.0
        };
        let wet_delay = self
            .delay
            .as_mut()
            .map_or(0.0, |delay| delay.process(wet_reverb));
        let branch = match self.modulation {
            Modulation::Chorus => wet_chorus,
            Modulation::Delay => wet_delay,
            Modulation::Blend => self.branch.process(wet_chorus, wet_delay),
        };

        let mix = self.modulation_mix.process(wet_reverb, branch);
        self.output.process(dry, mix) * volume
    }

    pub fn set_reverb_feedback(&mut self, feedback: f32) {
        self.reverb.set_feedback(feedback);
    }

    pub fn set_delay_feedback(&mut self, feedback: f32) {
        if let Some(delay) = self.delay.as_mut() {
            delay.set_feedback(feedback);
        }
    }

    pub fn set_chorus_depth(&mut self, depth: f32) {
        self.chorus.set_depth(depth);
    }

    /// Portion of the base delay time the LFO swings the delay by.
    pub fn set_delay_depth(&mut self, depth: f32) {
        self.delay_depth = depth;
    }

    /// Set frequency of both the chorus LFO and the delay LFO.
    pub fn set_modulation_frequency(&mut self, frequency: f32) {
        self.chorus.set_frequency(frequency);
        self.lfo.set_frequency(frequency);
    }

    /// Blend between the dry input (0.0) and the fully processed signal (1.0).
    pub fn set_blend(&mut self, position: f32) {
        self.output.set_position(position);
    }

    /// Blend between the plain reverb (0.0) and the modulation branch (1.0).
    pub fn set_modulation_blend(&mut self, position: f32) {
        self.modulation_mix.set_position(position);
    }

    /// Blend between the chorus (0.0) and the delay (1.0).
    pub fn set_branch_position(&mut self, position: f32) {
        self.branch.set_position(position);
    }

    /// Retarget the delay time based on the current LFO sample and depth.
    pub fn update_delay_target(&mut self) {
        let time = delay::modulated_time(self.delay_base_time, self.lfo.value(), self.delay_depth);
        if let Some(delay) = self.delay.as_mut() {
            delay.set_target(time);
        }
    }

    #[must_use]
    pub fn modulation(&self) -> Modulation {
        self.modulation
    }

    #[must_use]
    pub fn delay(&self) -> Option<&Delay> {
        self.delay.as_ref()
    }

    #[must_use]
    pub fn delay_depth(&self) -> f32 {
        self.delay_depth
    }

    #[must_use]
    pub fn lfo(&self) -> &Oscillator {
        &self.lfo
    }

    #[must_use]
    pub fn reverb(&self) -> &R {
        &self.reverb
    }

    #[must_use]
    pub fn chorus(&self) -> &C {
        &self.chorus
    }

    #[must_use]
    pub fn blend(&self) -> f32 {
        self.output.position()
    }

    #[must_use]
    pub fn modulation_blend(&self) -> f32 {
        self.modulation_mix.position()
    }

    #[must_use]
    pub fn branch_position(&self) -> f32 {
        self.branch.position()
    }
}

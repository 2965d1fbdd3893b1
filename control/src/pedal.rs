//! The context owning all the state of a running pedal.
//!
//! ```text
//!  [ adc task ] --(Controls)--> [ Pedal ] <--(block)--> [ dsp task ]
//!                                   |
//!                   [ scheduler ] --+-- [ parameters ]
//!                                   |
//!                            [ signal graph ]
//! ```

use heapless::Vec;

use gaze_dsp::chorus::Chorus;
use gaze_dsp::graph::{ChorusUnit, DelayConfig, ReverbUnit, SignalGraph};
use gaze_dsp::memory_manager::MemoryManager;
use gaze_dsp::reverb::Reverb;

use crate::channel::{Controls, MAX_CHANNELS};
use crate::log::{info, warning};
use crate::parameter::ParameterMap;
use crate::scheduler::{ControlScheduler, Slot};
use crate::variant::{Config, Target};
use crate::Error;

// Keeps the delay from self-oscillating unless the pedal asks for it.
const DELAY_FEEDBACK_LIMIT: f32 = 0.99;

#[derive(Debug)]
pub struct Pedal<R, C> {
    config: Config,
    parameters: Parameters,
    scheduler: ControlScheduler,
    graph: SignalGraph<R, C>,
    volume: f32,
}

impl Pedal<Reverb, Option<Chorus>> {
    /// Build the pedal with the bundled reverb and chorus. Pedals without
    /// chorus on their modulation branch do not allocate one.
    ///
    /// # Errors
    ///
    /// See [`Pedal::new`].
    pub fn with_default_units(
        sample_rate: f32,
        config: Config,
        memory_manager: &mut MemoryManager,
    ) -> Result<Self, Error> {
        let reverb = Reverb::new(sample_rate, memory_manager)?;
        let chorus = if config.modulation.has_chorus() {
            Some(Chorus::new(sample_rate, memory_manager)?)
        } else {
            None
        };
        Self::new(sample_rate, config, reverb, chorus, memory_manager)
    }
}

impl<R: ReverbUnit, C: ChorusUnit> Pedal<R, C> {
    /// Bind controls and assemble the signal graph.
    ///
    /// Targets that are not bound to any control are set to their defaults
    /// right away, bound ones start on the minimum of their range.
    ///
    /// # Errors
    ///
    /// Fails when the bindings are invalid or when buffers do not fit into
    /// the given memory.
    pub fn new(
        sample_rate: f32,
        config: Config,
        reverb: R,
        chorus: C,
        memory_manager: &mut MemoryManager,
    ) -> Result<Self, Error> {
        let parameters = bind_parameters(&config)?;

        let graph = SignalGraph::new(
            sample_rate,
            config.modulation,
            reverb,
            chorus,
            DelayConfig {
                capacity: (config.delay_capacity * sample_rate) as usize,
                base_time: config.delay_base_time * sample_rate,
                smoothing: config.delay_smoothing,
            },
            memory_manager,
        )?;

        info!(
            "Assembled signal graph with {} bound controls, {} words of memory left",
            parameters.len(),
            memory_manager.remaining()
        );
        if !config.limit_delay_feedback {
            warning!("Delay feedback is not limited");
        }

        let mut pedal = Self {
            scheduler: ControlScheduler::new(parameters.len()),
            parameters,
            graph,
            volume: config.defaults.volume,
            config,
        };

        for target in Target::ALL {
            let value = pedal
                .parameters
                .iter()
                .find(|(t, _)| *t == target)
                .map_or(pedal.config.defaults.get(target), |(_, p)| p.value());
            pedal.apply_target(target, value);
        }
        pedal
            .graph
            .set_branch_position(pedal.config.defaults.branch_position);

        Ok(pedal)
    }

    /// Run every slot once, so all parameters reflect the current controls.
    pub fn refresh(&mut self, controls: &Controls) {
        for _ in 0..self.scheduler.slots() {
            let slot = self.scheduler.advance();
            self.apply(slot, controls);
        }
    }

    /// Process a block of interleaved frames in place.
    ///
    /// A single control slot is handled first, then each frame goes through
    /// the signal graph. Only the left channel is read and written.
    pub fn process(&mut self, block: &mut [(f32, f32)], controls: &Controls) {
        let slot = self.scheduler.advance();
        self.apply(slot, controls);

        for (left, _right) in block.iter_mut() {
            *left = self.graph.tick(*left, self.volume);
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn graph(&self) -> &SignalGraph<R, C> {
        &self.graph
    }

    #[must_use]
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Cached value of the parameter bound to the given target.
    #[must_use]
    pub fn parameter(&self, target: Target) -> Option<f32> {
        self.parameters
            .iter()
            .find(|(t, _)| *t == target)
            .map(|(_, p)| p.value())
    }

    fn apply(&mut self, slot: Slot, controls: &Controls) {
        match slot {
            Slot::Control(index) => {
                if let Some((target, parameter)) = self.parameters.get_mut(index) {
                    let target = *target;
                    let value = parameter.process(controls);
                    self.apply_target(target, value);
                }
            }
            Slot::Derived => {
                self.graph.update_delay_target();
                if self.config.switched_branch {
                    let position = if controls.switch() { 1.0 } else { 0.0 };
                    self.graph.set_branch_position(position);
                }
            }
        }
    }

    fn apply_target(&mut self, target: Target, value: f32) {
        match target {
            Target::Feedback => {
                self.graph.set_reverb_feedback(value);
                let feedback = value * self.config.delay_feedback_scale;
                if self.config.limit_delay_feedback {
                    self.graph
                        .set_delay_feedback(feedback.min(DELAY_FEEDBACK_LIMIT));
                } else {
                    self.graph.set_delay_feedback(feedback);
                }
            }
            Target::Depth => {
                self.graph.set_chorus_depth(value);
                self.graph
                    .set_delay_depth(value * self.config.delay_max_depth);
            }
            Target::Blend => self.graph.set_blend(value),
            Target::Volume => self.volume = value,
            Target::ModulationFrequency => self.graph.set_modulation_frequency(value),
            Target::ModulationBlend => self.graph.set_modulation_blend(value),
        }
    }
}

type Parameters = Vec<(Target, ParameterMap), MAX_CHANNELS>;

fn bind_parameters(config: &Config) -> Result<Parameters, Error> {
    if config.bindings.len() > MAX_CHANNELS {
        return Err(Error::TooManyBindings);
    }

    let mut parameters = Parameters::new();
    for binding in config.bindings {
        if binding.channel >= MAX_CHANNELS {
            return Err(Error::ChannelOutOfRange(binding.channel));
        }
        if parameters.iter().any(|(t, _)| *t == binding.target) {
            return Err(Error::DuplicateTarget);
        }
        parameters
            .push((
                binding.target,
                ParameterMap::new(binding.channel, binding.range, binding.curve),
            ))
            .map_err(|_| Error::TooManyBindings)?;
    }
    Ok(parameters)
}

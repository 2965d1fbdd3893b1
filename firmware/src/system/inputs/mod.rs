//! Abstraction of all inputs except for audio.
//!
//! Audio input is kept outside of this abstraction, since it runs on a
//! different frequency and is triggered through interrupts.

mod debounced;
pub mod pots;
pub mod switch;

use gaze_control::Controls;

use crate::system::hal::adc::{Adc, Enabled};
use crate::system::hal::pac::{ADC1, ADC2};

use pots::{Pins as PotsPins, Pots};
use switch::{Pin as SwitchPin, Switch};

pub struct Inputs {
    pub pots: Pots,
    pub switch: Switch,
    adc_1: Adc<ADC1, Enabled>,
    adc_2: Adc<ADC2, Enabled>,
}

pub struct Config {
    pub pots: PotsPins,
    pub switch: SwitchPin,
    pub adc_1: Adc<ADC1, Enabled>,
    pub adc_2: Adc<ADC2, Enabled>,
}

impl Inputs {
    pub fn new(config: Config) -> Self {
        Self {
            pots: Pots::new(config.pots),
            switch: Switch::new(config.switch),
            adc_1: config.adc_1,
            adc_2: config.adc_2,
        }
    }

    pub fn sample(&mut self) {
        self.pots.sample(&mut self.adc_1, &mut self.adc_2);
        self.switch.sample();
    }

    /// Pass filtered readings to the audio task.
    pub fn publish(&self, controls: &Controls) {
        for (i, pot) in self.pots.pots.iter().enumerate() {
            controls.write(i, pot.value());
        }
        controls.set_switch(self.switch.active);
    }
}

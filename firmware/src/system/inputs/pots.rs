use nb::block;

use gaze_control::input::Pot;
use gaze_control::MAX_CHANNELS;

use crate::system::hal::adc::{Adc, Enabled};
use crate::system::hal::gpio;
use crate::system::hal::pac::{ADC1, ADC2};

/// Pots ordered by the control channel they publish to.
#[derive(defmt::Format)]
pub struct Pots {
    pub pots: [Pot; MAX_CHANNELS],
    pub pins: Pins,
}

#[derive(defmt::Format)]
pub struct Pins {
    pub channel_0: Channel0Pin,
    pub channel_1: Channel1Pin,
    pub channel_2: Channel2Pin,
    pub channel_3: Channel3Pin,
    pub channel_4: Channel4Pin,
    pub channel_5: Channel5Pin,
}

pub type Channel0Pin = gpio::gpioc::PC4<gpio::Analog>;
pub type Channel1Pin = gpio::gpioa::PA5<gpio::Analog>;
pub type Channel2Pin = gpio::gpioa::PA3<gpio::Analog>;
pub type Channel3Pin = gpio::gpioc::PC0<gpio::Analog>;
pub type Channel4Pin = gpio::gpiob::PB1<gpio::Analog>;
pub type Channel5Pin = gpio::gpioa::PA7<gpio::Analog>;

impl Pots {
    pub(crate) fn new(pins: Pins) -> Self {
        Self {
            pots: Default::default(),
            pins,
        }
    }

    pub fn sample(&mut self, adc_1: &mut Adc<ADC1, Enabled>, adc_2: &mut Adc<ADC2, Enabled>) {
        adc_1.start_conversion(&mut self.pins.channel_0);
        adc_2.start_conversion(&mut self.pins.channel_1);
        let sample_0: u32 = block!(adc_1.read_sample()).unwrap_or_default();
        let sample_1: u32 = block!(adc_2.read_sample()).unwrap_or_default();

        adc_1.start_conversion(&mut self.pins.channel_2);
        adc_2.start_conversion(&mut self.pins.channel_3);
        let sample_2: u32 = block!(adc_1.read_sample()).unwrap_or_default();
        let sample_3: u32 = block!(adc_2.read_sample()).unwrap_or_default();

        adc_1.start_conversion(&mut self.pins.channel_4);
        adc_2.start_conversion(&mut self.pins.channel_5);
        let sample_4: u32 = block!(adc_1.read_sample()).unwrap_or_default();
        let sample_5: u32 = block!(adc_2.read_sample()).unwrap_or_default();

        let slope_1 = adc_1.slope();
        let slope_2 = adc_2.slope();
        let readings = [
            transpose_adc(sample_0, slope_1),
            transpose_adc(sample_1, slope_2),
            transpose_adc(sample_2, slope_1),
            transpose_adc(sample_3, slope_2),
            transpose_adc(sample_4, slope_1),
            transpose_adc(sample_5, slope_2),
        ];
        for (pot, reading) in self.pots.iter_mut().zip(readings) {
            pot.update(reading);
        }
    }
}

fn transpose_adc(sample: u32, slope: u32) -> f32 {
    // NOTE: Pots span the whole 0 to 3.3 V range of the ADC.
    (sample as f32 / slope as f32).clamp(0.0, 1.0)
}

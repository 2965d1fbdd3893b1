pub mod audio;
pub mod inputs;

pub use daisy::hal;

use daisy::led::LedUser;
use daisy::sdram::SDRAM;
use hal::adc::{AdcSampleTime, Resolution};
use hal::delay::DelayFromCountDownTimer;
use hal::pac::CorePeripherals;
use hal::pac::Peripherals as DevicePeripherals;
use hal::prelude::*;
use systick_monotonic::Systick;

use audio::Audio;
use inputs::pots::Pins as PotsPins;
use inputs::{Config as InputsConfig, Inputs};

pub struct System {
    pub mono: Systick<1000>,
    pub status_led: LedUser,
    pub sdram: SDRAM,
    pub audio: Audio,
    pub inputs: Inputs,
}

impl System {
    /// Initialize system abstraction
    ///
    /// # Panics
    ///
    /// The system can be initialized only once. It panics otherwise.
    #[must_use]
    pub fn init(mut cp: CorePeripherals, dp: DevicePeripherals) -> Self {
        enable_cache(&mut cp);

        let board = daisy::Board::take().unwrap();
        let ccdr = daisy::board_freeze_clocks!(board, dp);
        let pins = daisy::board_split_gpios!(board, ccdr, dp);
        let sdram = daisy::board_split_sdram!(cp, dp, ccdr, pins);
        let audio = Audio::init(daisy::board_split_audio!(ccdr, pins));

        let mut delay = DelayFromCountDownTimer::new(dp.TIM2.timer(
            100.Hz(),
            ccdr.peripheral.TIM2,
            &ccdr.clocks,
        ));

        let (adc_1, adc_2) = {
            let (mut adc_1, mut adc_2) = hal::adc::adc12(
                dp.ADC1,
                dp.ADC2,
                &mut delay,
                ccdr.peripheral.ADC12,
                &ccdr.clocks,
            );
            adc_1.set_resolution(Resolution::SIXTEENBIT);
            adc_1.set_sample_time(AdcSampleTime::T_16);
            adc_2.set_resolution(Resolution::SIXTEENBIT);
            adc_2.set_sample_time(AdcSampleTime::T_16);
            (adc_1.enable(), adc_2.enable())
        };

        let mono = Systick::new(cp.SYST, 480_000_000);
        let status_led = daisy::board_split_leds!(pins).USER;
        let inputs = Inputs::new(InputsConfig {
            pots: PotsPins {
                channel_0: pins.GPIO.PIN_21.into_analog(),
                channel_1: pins.GPIO.PIN_22.into_analog(),
                channel_2: pins.GPIO.PIN_16.into_analog(),
                channel_3: pins.GPIO.PIN_15.into_analog(),
                channel_4: pins.GPIO.PIN_17.into_analog(),
                channel_5: pins.GPIO.PIN_18.into_analog(),
            },
            switch: pins.GPIO.PIN_10.into_pull_up_input(),
            adc_1,
            adc_2,
        });

        Self {
            mono,
            status_led,
            sdram,
            audio,
            inputs,
        }
    }
}

/// AN5212: Improve application performance when fetching instruction and
/// data, from both internal and external memories.
fn enable_cache(cp: &mut CorePeripherals) {
    cp.SCB.enable_icache();
    // NOTE: This requires cache management around all use of DMA.
    cp.SCB.enable_dcache(&mut cp.CPUID);
}

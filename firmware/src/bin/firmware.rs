#![no_main]
#![no_std]

use gaze_control::Controls;
use gaze_firmware as _; // global logger + panicking-behavior

// Published by the sampling task, read by the audio task.
static CONTROLS: Controls = Controls::new();

#[rtic::app(device = stm32h7xx_hal::pac, peripherals = true, dispatchers = [EXTI0, EXTI1, EXTI2])]
mod app {
    use core::mem::MaybeUninit;

    use daisy::led::{Led, LedUser};
    use fugit::ExtU64;
    use systick_monotonic::Systick;

    use gaze_control::{Pedal, Variant};
    use gaze_dsp::chorus::Chorus;
    use gaze_dsp::memory_manager::MemoryManager;
    use gaze_dsp::reverb::Reverb;
    use gaze_firmware::system::audio::{Audio, SAMPLE_RATE};
    use gaze_firmware::system::inputs::Inputs;
    use gaze_firmware::system::System;

    use crate::CONTROLS;

    const VARIANT: Variant = Variant::Gaze;

    const BLINKS: u8 = 1;

    // Number of pot readings taken before the audio starts, enough to fill
    // the smoothing buffer.
    const WARM_UP_READINGS: usize = 32;

    #[monotonic(binds = SysTick, default = true)]
    type Mono = Systick<1000>; // 1 kHz / 1 ms granularity

    #[shared]
    struct Shared {}

    #[local]
    struct Local {
        status_led: LedUser,
        pedal: Pedal<Reverb, Option<Chorus>>,
        audio: Audio,
        inputs: Inputs,
    }

    #[init]
    fn init(cx: init::Context) -> (Shared, Local, init::Monotonics) {
        defmt::info!("INIT");

        let system = System::init(cx.core, cx.device);
        let mono = system.mono;
        let status_led = system.status_led;
        let sdram = system.sdram;
        let mut audio = system.audio;
        let mut inputs = system.inputs;

        let config = VARIANT.config();
        defmt::info!("Starting variant {}", VARIANT);

        #[allow(clippy::cast_precision_loss)]
        let mut pedal = {
            let mut memory_manager = {
                let ram_slice = unsafe {
                    let ram_items = sdram.size() / core::mem::size_of::<MaybeUninit<u32>>();
                    let ram_ptr = sdram.base_address.cast::<core::mem::MaybeUninit<u32>>();
                    core::slice::from_raw_parts_mut(ram_ptr, ram_items)
                };
                MemoryManager::from(ram_slice)
            };
            Pedal::with_default_units(SAMPLE_RATE as f32, config, &mut memory_manager)
                .unwrap_or_else(|error| defmt::panic!("Failed to build the pedal: {}", error))
        };

        for _ in 0..WARM_UP_READINGS {
            inputs.sample();
        }
        inputs.publish(&CONTROLS);
        pedal.refresh(&CONTROLS);

        audio.spawn();
        adc::spawn().unwrap();
        blink::spawn(true, BLINKS).unwrap();

        (
            Shared {},
            Local {
                status_led,
                pedal,
                audio,
                inputs,
            },
            init::Monotonics(mono),
        )
    }

    #[task(local = [inputs], priority = 2)]
    fn adc(cx: adc::Context) {
        adc::spawn_after(1.millis()).unwrap();

        let inputs = cx.local.inputs;
        inputs.sample();
        inputs.publish(&CONTROLS);
    }

    #[task(binds = DMA1_STR1, local = [pedal, audio], priority = 4)]
    fn dsp(cx: dsp::Context) {
        let pedal = cx.local.pedal;
        let audio = cx.local.audio;
        let block_length = pedal.config().block_length;

        audio.update_buffer(block_length, |block| {
            pedal.process(block, &CONTROLS);
        });
    }

    #[task(local = [status_led])]
    fn blink(cx: blink::Context, on: bool, blinks: u8) {
        let time_on = 200.millis();
        let time_off_short = 200.millis();
        let time_off_long = 2.secs();

        if on {
            cx.local.status_led.on();
            blink::spawn_after(time_on, false, blinks).unwrap();
        } else {
            cx.local.status_led.off();
            if blinks > 1 {
                blink::spawn_after(time_off_short, true, blinks - 1).unwrap();
            } else {
                blink::spawn_after(time_off_long, true, BLINKS).unwrap();
            }
        }
    }
}

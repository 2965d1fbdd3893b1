//! Board support of the pedals, shared by the firmware binary and the
//! on-device tests.

#![no_main]
#![no_std]
#![allow(clippy::cast_precision_loss)]

use defmt_rtt as _;
use panic_probe as _;
use stm32h7xx_hal as _;

pub mod system;
pub mod testlib;

// Panics are reported through `defmt::panic!`, printing them again from
// `panic-probe` would only duplicate the message.
#[defmt::panic_handler]
fn panic() -> ! {
    cortex_m::asm::udf()
}

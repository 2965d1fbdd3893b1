use super::debounced::Debounced;
use crate::system::hal::gpio;

/// Toggle selecting between chorus and delay on pedals wired for it.
#[derive(defmt::Format)]
pub struct Switch {
    pin: Pin,
    debounced: Debounced<4>,
    pub active: bool,
}

pub type Pin = gpio::gpiob::PB5<gpio::Input>;

impl Switch {
    pub fn new(pin: Pin) -> Self {
        Self {
            pin,
            debounced: Debounced::new(),
            active: false,
        }
    }

    pub fn sample(&mut self) {
        self.active = self.debounced.update(self.pin.is_low());
    }
}

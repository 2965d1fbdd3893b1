use crate::system::inputs::Inputs;

/// Keep sampling inputs until the switch changes its position.
pub fn sample_until_switch_is_flipped(inputs: &mut Inputs) {
    let initial = inputs.switch.active;
    loop {
        inputs.sample();
        if inputs.switch.active != initial {
            break;
        }
        cortex_m::asm::delay(480_000_000 / 1000);
    }
}

/// Boolean input filtered by majority of its recent readings.
#[derive(Debug, Eq, PartialEq, defmt::Format)]
pub struct Debounced<const N: usize> {
    buffer: [bool; N],
    pointer: usize,
    active: bool,
}

impl<const N: usize> Debounced<N> {
    pub fn new() -> Self {
        Self {
            buffer: [false; N],
            pointer: 0,
            active: false,
        }
    }

    pub fn update(&mut self, value: bool) -> bool {
        self.buffer[self.pointer] = value;
        self.pointer = (self.pointer + 1) % N;
        let up = self.buffer.iter().filter(|i| **i).count();
        self.active = up > N / 2;
        self.active
    }
}

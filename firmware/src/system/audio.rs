use daisy::audio::{self, Interface};

pub const SAMPLE_RATE: u32 = audio::FS.to_Hz();

pub struct Audio {
    interface: Option<Interface>,
}

impl Audio {
    #[must_use]
    pub fn init(interface: Interface) -> Self {
        Self {
            interface: Some(interface),
        }
    }

    /// Start the audio transport.
    ///
    /// # Panics
    ///
    /// Audio processing can be spawned only once. It panics otherwise.
    pub fn spawn(&mut self) {
        self.interface = Some(self.interface.take().unwrap().spawn().unwrap());
    }

    /// Process the DMA buffer in sub-blocks of the given length.
    ///
    /// The DMA block is split so the callback, and with it the control
    /// scheduler, runs once per `block_length` frames.
    ///
    /// # Panics
    ///
    /// This can panic if executed outside of `DMA1_STR1` interrupt or if it
    /// took too long to process.
    pub fn update_buffer(&mut self, block_length: usize, mut callback: impl FnMut(&mut [(f32, f32)])) {
        self.interface
            .as_mut()
            .unwrap()
            .handle_interrupt_dma1_str1(|buffer| {
                for block in buffer.chunks_mut(block_length.max(1)) {
                    callback(block);
                }
            })
            .unwrap();
    }
}

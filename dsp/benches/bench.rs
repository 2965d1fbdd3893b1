use core::mem::MaybeUninit;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;

use gaze_dsp::delay::DEFAULT_SMOOTHING;
use gaze_dsp::graph::{DelayConfig, Modulation, SignalGraph};
use gaze_dsp::memory_manager::MemoryManager;

fn criterion_benchmark(c: &mut Criterion) {
    const FS: usize = 48000;
    let memory = vec![MaybeUninit::uninit(); FS * 4].leak();
    let mut memory_manager = MemoryManager::from(memory);
    let mut rng = rand::thread_rng();

    #[allow(clippy::cast_precision_loss)]
    let mut graph = SignalGraph::with_default_units(
        FS as f32,
        Modulation::Blend,
        DelayConfig {
            capacity: FS,
            base_time: FS as f32 * 0.25,
            smoothing: DEFAULT_SMOOTHING,
        },
        &mut memory_manager,
    )
    .unwrap();

    graph.set_reverb_feedback(0.8);
    graph.set_delay_feedback(0.5);
    graph.set_chorus_depth(0.7);
    graph.set_delay_depth(0.05);
    graph.set_modulation_frequency(1.5);
    graph.set_blend(0.5);
    graph.set_modulation_blend(0.5);
    graph.set_branch_position(0.5);

    let mut buffer = [(0.0, 0.0); 32];

    c.bench_function("Bench", |b| {
        b.iter(|| {
            graph.update_delay_target();
            buffer
                .iter_mut()
                .for_each(|(x, _y)| *x = rng.gen::<f32>() * 2.0 - 1.0);
            for (x, _) in black_box(&mut buffer).iter_mut() {
                *x = graph.tick(*x, 1.0);
            }
        });
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

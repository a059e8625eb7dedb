//! Benchmarks for the complete voice.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use minisynth::{
    io::{MasterGain, OutputStage},
    voice, SynthConfig, Waveform,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_voice(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voice");

    for &size in BLOCK_SIZES {
        // Stereo interleaved, as most devices hand it out
        let mut buffer = vec![0.0f32; size * 2];

        for waveform in Waveform::ALL {
            let (mut handle, mut renderer) = voice(SAMPLE_RATE, SynthConfig::default());
            handle.set_waveform(waveform);
            handle.note_on(110.0);

            group.bench_with_input(BenchmarkId::new(waveform.name(), size), &size, |b, _| {
                b.iter(|| renderer.render_interleaved(black_box(&mut buffer), 2))
            });
        }

        // Render followed by the master gain stage, as the terminal host runs it
        let (mut handle, mut renderer) = voice(SAMPLE_RATE, SynthConfig::default());
        let mut master = MasterGain::default();
        handle.note_on(110.0);
        group.bench_with_input(BenchmarkId::new("with_master", size), &size, |b, _| {
            b.iter(|| {
                renderer.render_interleaved(black_box(&mut buffer), 2);
                master.configure(&renderer.output_settings());
                master.process(&mut buffer);
            })
        });

        // Idle voice: must cost the same as a sounding one
        let (_handle, mut renderer) = voice(SAMPLE_RATE, SynthConfig::default());
        group.bench_with_input(BenchmarkId::new("idle", size), &size, |b, _| {
            b.iter(|| renderer.render_interleaved(black_box(&mut buffer), 2))
        });
    }

    group.finish();
}

pub fn bench_param_updates(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/params");
    let size = 256;
    let mut buffer = vec![0.0f32; size * 2];

    // A fresh snapshot every batch, as when a slider is being dragged
    let (mut handle, mut renderer) = voice(SAMPLE_RATE, SynthConfig::default());
    handle.note_on(220.0);
    let mut cutoff = 100.0f32;
    group.bench_function("publish_and_render", |b| {
        b.iter(|| {
            cutoff = if cutoff > 5_000.0 { 100.0 } else { cutoff + 10.0 };
            handle.set_filter_cutoff(cutoff);
            renderer.render_interleaved(black_box(&mut buffer), 2);
        })
    });

    group.finish();
}

//! Benchmarks for the ADSR envelope generator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use minisynth::dsp::{EnvelopeGenerator, EnvelopeParams, SampleClock};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn render(env: &mut EnvelopeGenerator, clock: &mut SampleClock, buffer: &mut [f32]) {
    for sample in buffer.iter_mut() {
        *sample = env.evaluate(clock.advance());
    }
}

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Held note: a long attack keeps most iterations in the first branch
        let mut clock = SampleClock::new(SAMPLE_RATE);
        let mut env = EnvelopeGenerator::new(EnvelopeParams::new(1_000.0, 0.1, 0.7, 0.3));
        env.on_note_on(clock.elapsed_seconds());
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| render(&mut env, &mut clock, black_box(&mut buffer)))
        });

        // Sustain phase (holding steady)
        let mut clock = SampleClock::new(SAMPLE_RATE);
        let mut env = EnvelopeGenerator::new(EnvelopeParams::new(0.001, 0.001, 0.7, 0.3));
        env.on_note_on(clock.elapsed_seconds());
        for _ in 0..200 {
            env.evaluate(clock.advance());
        }
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            b.iter(|| render(&mut env, &mut clock, black_box(&mut buffer)))
        });

        // Release phase (ramping down, then silent)
        let mut clock = SampleClock::new(SAMPLE_RATE);
        let mut env = EnvelopeGenerator::new(EnvelopeParams::new(0.001, 0.001, 0.7, 0.1));
        env.on_note_on(clock.elapsed_seconds());
        for _ in 0..200 {
            env.evaluate(clock.advance());
        }
        env.on_note_off(clock.elapsed_seconds());
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter(|| render(&mut env, &mut clock, black_box(&mut buffer)))
        });
    }

    group.finish();
}

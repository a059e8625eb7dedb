//! Render a short phrase without an audio device and print the envelope.
//!
//! Run with: cargo run --example offline_render

use minisynth::{
    io::{note_frequency, MasterGain, NoteName, OutputStage},
    voice, SynthConfig, Waveform,
};

const SAMPLE_RATE: f64 = 48_000.0;
const BLOCK: usize = 480; // 10ms

fn main() {
    let (mut handle, mut renderer) = voice(SAMPLE_RATE, SynthConfig::default());
    let mut master = MasterGain::default();
    handle.set_waveform(Waveform::Sawtooth);

    // (start block, note) - None releases the voice
    let phrase = [
        (0, Some((NoteName::A, 3))),
        (40, Some((NoteName::C, 4))),
        (80, Some((NoteName::E, 4))),
        (120, None),
    ];

    let mut buffer = vec![0.0f32; BLOCK];
    let mut rendered = Vec::new();

    for block in 0..240 {
        for &(at, note) in &phrase {
            if at == block {
                match note {
                    Some((name, octave)) => handle.note_on(note_frequency(name, octave)),
                    None => handle.note_off(),
                }
            }
        }

        renderer.render_interleaved(&mut buffer, 1);
        master.configure(&renderer.output_settings());
        master.process(&mut buffer);
        rendered.extend_from_slice(&buffer);

        if block % 20 == 0 {
            let engine = renderer.engine();
            let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
            println!(
                "{:>6.2}s  {:>8.2} Hz  {:<8?} gain {:.3}  peak {:.3}",
                engine.elapsed_seconds(),
                engine.frequency_hz(),
                engine.envelope().stage(),
                engine.envelope_gain(),
                peak,
            );
        }
    }

    let peak = rendered.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
    println!("Rendered {} samples, peak {:.3}", rendered.len(), peak);
}

mod audio;
mod band_magnitudes;
mod equalizer;
mod filter_design;
mod settings;
mod visualizer;

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, Sink};
use std::env;
use std::error::Error;
use std::path::Path;

/// Octave-spaced band centers shared by the equalizer and the analyzer.
pub const CENTER_FREQUENCIES: [f32; 10] = [
    32.0, 64.0, 128.0, 256.0, 512.0, 1000.0, 2000.0, 4000.0, 8000.0, 16000.0,
];

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();
    let input_path = match args.get(1) {
        Some(path) => path.clone(),
        None => {
            eprintln!("usage: octaveq <input-audio> [output-wav]");
            std::process::exit(1);
        }
    };
    let output_path = args
        .get(2)
        .cloned()
        .unwrap_or_else(|| "equalized.wav".to_string());

    let eq_settings = match settings::load_settings() {
        Some(s) => s,
        None => {
            let defaults = settings::EqSettings::default();
            settings::save_settings(&defaults);
            defaults
        }
    };
    eq_settings.validate()?;

    let (samples, sample_rate) = audio::load_audio(Path::new(&input_path))?;
    println!("Loaded {} samples at {} Hz", samples.len(), sample_rate);

    let equalized = equalizer::equalize(
        &samples,
        sample_rate,
        &eq_settings.gains,
        &CENTER_FREQUENCIES,
        eq_settings.filter_length,
    );
    audio::save_wav(Path::new(&output_path), &equalized, sample_rate)?;
    println!("Wrote equalized audio to {}", output_path);

    // Play the result while feeding the live band meter.
    let (_stream, handle) = OutputStream::try_default()?;
    let sink = Sink::try_new(&handle)?;
    sink.append(SamplesBuffer::new(1, sample_rate, equalized.clone()));

    let mut pacer = visualizer::WallClockPacer::start();
    visualizer::run(
        &equalized,
        sample_rate,
        eq_settings.frame_rate,
        &CENTER_FREQUENCIES,
        &mut pacer,
        print_band_meter,
    );
    sink.sleep_until_end();
    Ok(())
}

/// Terminal stand-in for a chart renderer: one column per band.
fn print_band_meter(magnitudes: &[f32]) {
    const LEVELS: &[u8] = b" .:-=+*#%@";
    let bars: String = magnitudes
        .iter()
        .map(|&m| {
            let level = ((m * 16.0) as usize).min(LEVELS.len() - 1);
            LEVELS[level] as char
        })
        .collect();
    println!("[{}]", bars);
}

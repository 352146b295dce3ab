//! Ten-band graphic equalizer: one FIR bandpass per band, per-band slider
//! gain, summation, and clip-safe peak normalization.

use crate::filter_design::create_bandpass_filter;

/// Bandwidth handed to the filter designer for every band, in hertz.
///
/// This reads like a relative bandwidth but is passed straight through as
/// absolute hertz, so the low bands get extremely narrow ideal passbands
/// whose realized shape is dominated by the window mainlobe. Kept as-is for
/// compatibility with existing renders.
pub const BAND_BANDWIDTH_HZ: f32 = 0.2;

/// Converts a slider gain in dB to a linear amplitude factor.
fn db_to_amplitude(gain_db: i32) -> f32 {
    10.0f32.powf(gain_db as f32 / 20.0)
}

/// "Same"-mode convolution: the output has the signal's length, with the
/// kernel centered on it.
fn convolve_same(signal: &[f32], kernel: &[f32]) -> Vec<f32> {
    if signal.is_empty() {
        return Vec::new();
    }
    let offset = (kernel.len() - 1) / 2;
    let mut out = vec![0.0f32; signal.len()];
    for (i, sample) in out.iter_mut().enumerate() {
        let j = i + offset;
        let k_start = (j + 1).saturating_sub(signal.len());
        let k_end = kernel.len().min(j + 1);
        let mut acc = 0.0f32;
        for k in k_start..k_end {
            acc += kernel[k] * signal[j - k];
        }
        *sample = acc;
    }
    out
}

/// Equalizes a mono buffer: every band is bandpass-filtered, scaled by its
/// slider gain, and the bands are summed. The sum is divided by its peak
/// only when that peak exceeds 1.0, so in-range signals keep their loudness.
///
/// `gains` is index-aligned with `center_frequencies` (dB, one per band).
/// An empty input produces an empty output.
pub fn equalize(
    samples: &[f32],
    sample_rate: u32,
    gains: &[i32],
    center_frequencies: &[f32],
    filter_length: usize,
) -> Vec<f32> {
    let mut equalized = vec![0.0f32; samples.len()];
    for (&center_freq, &gain_db) in center_frequencies.iter().zip(gains.iter()) {
        let kernel =
            create_bandpass_filter(center_freq, BAND_BANDWIDTH_HZ, sample_rate, filter_length);
        let filtered = convolve_same(samples, &kernel);
        let amplitude = db_to_amplitude(gain_db);
        for (out, sample) in equalized.iter_mut().zip(filtered.iter()) {
            *out += sample * amplitude;
        }
    }

    // Peak-normalize only when the sum would clip.
    let peak = equalized.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
    if peak > 1.0 {
        for sample in equalized.iter_mut() {
            *sample /= peak;
        }
    }
    equalized
}

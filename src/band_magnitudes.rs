//! Per-band RMS energy analysis for visualization ticks.
//!
//! Each band is measured through a 2nd-order Butterworth bandpass, a
//! deliberately different filter family from the equalizer's linear-phase
//! FIR kernels: short-chunk analysis only needs cheap causal filtering,
//! not phase fidelity.

use num_complex::Complex64;
use std::f64::consts::PI;

/// Numerator/denominator coefficients of the discretized bandpass.
type IirCoeffs = ([f64; 5], [f64; 5]);

/// Expands prod (x - r_i) into descending-power coefficients.
fn polynomial(roots: &[Complex64]) -> Vec<Complex64> {
    let mut coeffs = vec![Complex64::new(1.0, 0.0)];
    for root in roots {
        let mut next = vec![Complex64::new(0.0, 0.0); coeffs.len() + 1];
        for (i, c) in coeffs.iter().enumerate() {
            next[i] += c;
            next[i + 1] -= c * root;
        }
        coeffs = next;
    }
    coeffs
}

/// Designs a 2nd-order Butterworth bandpass for normalized cutoffs in the
/// open (0, 1) range, where 1 is the Nyquist frequency. Classic design
/// chain: analog prototype poles, lowpass-to-bandpass transform, bilinear
/// transform. The denominator comes out monic.
fn butterworth_bandpass(low: f64, high: f64) -> IirCoeffs {
    // Order-2 prototype: poles at +/-135 degrees on the unit circle.
    let prototype = [
        Complex64::from_polar(1.0, 3.0 * PI / 4.0),
        Complex64::from_polar(1.0, -3.0 * PI / 4.0),
    ];

    // Pre-warp the cutoffs for the bilinear transform (virtual fs = 2).
    let warped_low = 4.0 * (PI * low / 2.0).tan();
    let warped_high = 4.0 * (PI * high / 2.0).tan();
    let bw = warped_high - warped_low;
    let wo = (warped_low * warped_high).sqrt();

    // Lowpass-to-bandpass: every prototype pole splits into a pair; the two
    // transfer-function zeros sit at s = 0.
    let mut analog_poles = Vec::with_capacity(4);
    for p in prototype {
        let shifted = p * (bw / 2.0);
        let offset = (shifted * shifted - Complex64::new(wo * wo, 0.0)).sqrt();
        analog_poles.push(shifted + offset);
        analog_poles.push(shifted - offset);
    }
    let analog_gain = bw * bw;

    // Bilinear transform into the z-plane. The s = 0 zeros land on z = 1 and
    // the two fill-in zeros on z = -1, so the numerator is k (z^2 - 1)^2.
    let fs2 = Complex64::new(4.0, 0.0);
    let mut pole_product = Complex64::new(1.0, 0.0);
    let digital_poles: Vec<Complex64> = analog_poles
        .iter()
        .map(|&p| {
            pole_product *= fs2 - p;
            (fs2 + p) / (fs2 - p)
        })
        .collect();
    let zero_product = fs2.powi(2); // prod(fs2 - 0) over both analog zeros
    let k = analog_gain * (zero_product / pole_product).re;

    let b = [k, 0.0, -2.0 * k, 0.0, k];
    let mut a = [0.0f64; 5];
    for (i, c) in polynomial(&digital_poles).iter().enumerate() {
        a[i] = c.re;
    }
    (b, a)
}

/// Runs the chunk through the filter causally with zero initial state
/// (direct form II transposed).
fn apply_filter(coeffs: &IirCoeffs, chunk: &[f32]) -> Vec<f64> {
    let (b, a) = coeffs;
    let mut state = [0.0f64; 4];
    chunk
        .iter()
        .map(|&sample| {
            let x = sample as f64;
            let y = b[0] * x + state[0];
            state[0] = b[1] * x - a[1] * y + state[1];
            state[1] = b[2] * x - a[2] * y + state[2];
            state[2] = b[3] * x - a[3] * y + state[3];
            state[3] = b[4] * x - a[4] * y;
            y
        })
        .collect()
}

/// Per-band RMS energy of `chunk`, index-aligned with `center_frequencies`.
///
/// Every band spans half its center frequency on each side. A band whose
/// normalized cutoffs leave the open (0, 1) range after clamping is reported
/// as exactly 0 rather than filtered; at common sample rates that is the
/// fate of the top band.
pub fn band_magnitudes(chunk: &[f32], sample_rate: u32, center_frequencies: &[f32]) -> Vec<f32> {
    if chunk.is_empty() {
        return vec![0.0; center_frequencies.len()];
    }
    let nyquist = 0.5 * sample_rate as f64;
    let mut magnitudes = Vec::with_capacity(center_frequencies.len());
    for &center_freq in center_frequencies {
        let center = center_freq as f64;
        let bandwidth = 0.5 * center;
        let low = ((center - bandwidth) / nyquist).max(0.0);
        let high = ((center + bandwidth) / nyquist).min(1.0);
        if high <= low || low <= 0.0 || high >= 1.0 {
            magnitudes.push(0.0);
            continue;
        }
        let coeffs = butterworth_bandpass(low, high);
        let filtered = apply_filter(&coeffs, chunk);
        let mean_square =
            filtered.iter().map(|y| y * y).sum::<f64>() / filtered.len() as f64;
        magnitudes.push(mean_square.sqrt() as f32);
    }
    magnitudes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CENTER_FREQUENCIES;
    use std::f64::consts::PI;

    fn sine(freq: f64, amplitude: f64, sample_rate: u32, count: usize) -> Vec<f32> {
        (0..count)
            .map(|i| (amplitude * (2.0 * PI * freq * i as f64 / sample_rate as f64).sin()) as f32)
            .collect()
    }

    #[test]
    fn test_silence_gives_all_zero_magnitudes() {
        let chunk = vec![0.0f32; 4410];
        let magnitudes = band_magnitudes(&chunk, 44100, &CENTER_FREQUENCIES);
        assert_eq!(magnitudes, vec![0.0; 10]);
    }

    #[test]
    fn test_empty_chunk_gives_all_zero_magnitudes() {
        let magnitudes = band_magnitudes(&[], 44100, &CENTER_FREQUENCIES);
        assert_eq!(magnitudes, vec![0.0; 10]);
    }

    #[test]
    fn test_top_band_is_degenerate_at_44100() {
        // 16 kHz * 1.5 = 24 kHz is past the 22.05 kHz Nyquist, so the top
        // band is reported as zero by policy.
        let chunk = sine(15000.0, 0.5, 44100, 44100);
        let magnitudes = band_magnitudes(&chunk, 44100, &CENTER_FREQUENCIES);
        assert_eq!(magnitudes[9], 0.0);
    }

    #[test]
    fn test_high_bands_degenerate_at_low_sample_rate() {
        let chunk = sine(440.0, 0.5, 8000, 8000);
        let magnitudes = band_magnitudes(&chunk, 8000, &CENTER_FREQUENCIES);
        // Bands at 4, 8 and 16 kHz all push their upper cutoff to or past
        // the 4 kHz Nyquist.
        assert_eq!(magnitudes[7], 0.0);
        assert_eq!(magnitudes[8], 0.0);
        assert_eq!(magnitudes[9], 0.0);
    }

    #[test]
    fn test_sine_lands_in_its_own_band() {
        let chunk = sine(1000.0, 0.5, 44100, 44100);
        let magnitudes = band_magnitudes(&chunk, 44100, &CENTER_FREQUENCIES);
        let loudest = magnitudes
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(loudest, 5, "magnitudes: {:?}", magnitudes);

        // Well inside the 500-1500 Hz passband the filter is transparent,
        // so the RMS approaches amplitude / sqrt(2).
        let expected = 0.5 / 2.0f32.sqrt();
        assert!(
            (magnitudes[5] - expected).abs() < 0.03,
            "band RMS {} vs expected {}",
            magnitudes[5],
            expected
        );
    }

    #[test]
    fn test_out_of_band_energy_is_attenuated() {
        let chunk = sine(1000.0, 0.5, 44100, 44100);
        let magnitudes = band_magnitudes(&chunk, 44100, &CENTER_FREQUENCIES);
        // 32 Hz band spans 16-48 Hz; a 1 kHz tone barely registers there.
        assert!(magnitudes[0] < 0.01, "leakage {}", magnitudes[0]);
    }

    #[test]
    fn test_butterworth_denominator_is_monic() {
        let (_, a) = butterworth_bandpass(500.0 / 22050.0, 1500.0 / 22050.0);
        assert!((a[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_butterworth_passband_gain_is_unity() {
        // Evaluate |H| on the unit circle at the geometric band center.
        let low = 500.0 / 22050.0;
        let high = 1500.0 / 22050.0;
        let (b, a) = butterworth_bandpass(low, high);
        // The design centers the band where the warped axis puts it; probe a
        // small grid and take the maximum response.
        let mut max_gain = 0.0f64;
        for i in 0..200 {
            let w = PI * (low + (high - low) * i as f64 / 199.0);
            let z = Complex64::from_polar(1.0, w);
            let num: Complex64 = b
                .iter()
                .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * z.powi(-1) + c);
            let den: Complex64 = a
                .iter()
                .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * z.powi(-1) + c);
            max_gain = max_gain.max((num / den).norm());
        }
        assert!((max_gain - 1.0).abs() < 1e-3, "max gain {}", max_gain);
    }
}

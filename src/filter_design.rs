//! Windowed-sinc FIR bandpass design for the equalizer bands.

use std::f64::consts::PI;

/// Normalized sinc: sin(pi x) / (pi x), with sinc(0) = 1.
fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        let px = PI * x;
        px.sin() / px
    }
}

/// Hamming window of `len` points. A single point degenerates to 1.0.
fn hamming(len: usize) -> Vec<f64> {
    if len == 1 {
        return vec![1.0];
    }
    let m = (len - 1) as f64;
    (0..len)
        .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / m).cos())
        .collect()
}

/// Designs a DC-normalized windowed-sinc bandpass kernel of `length + 1` taps.
///
/// `bandwidth` is in hertz; the cutoffs are `center_freq -/+ bandwidth / 2`
/// over the Nyquist frequency. The caller must keep both cutoffs inside the
/// open (0, 1) range: out-of-range cutoffs give a degenerate response, and a
/// near-zero coefficient sum makes the final normalization blow up. Neither
/// case is guarded here.
pub fn create_bandpass_filter(
    center_freq: f32,
    bandwidth: f32,
    sample_rate: u32,
    length: usize,
) -> Vec<f32> {
    let nyquist = 0.5 * sample_rate as f64;
    let f_low = (center_freq as f64 - bandwidth as f64 / 2.0) / nyquist;
    let f_high = (center_freq as f64 + bandwidth as f64 / 2.0) / nyquist;

    // Tap indices run floor(-M/2) ..= M/2: always M + 1 taps, but asymmetric
    // around zero when M is odd. The asymmetry is part of the kernel's
    // contract; keep it.
    let m = length as i64;
    let lo = (-m).div_euclid(2);
    let hi = m / 2;

    let mut kernel: Vec<f64> = (lo..=hi)
        .map(|n| sinc(2.0 * f_high * n as f64) - sinc(2.0 * f_low * n as f64))
        .collect();
    for (h, w) in kernel.iter_mut().zip(hamming(length + 1)) {
        *h *= w;
    }

    // Normalize so the coefficients sum to one (unity DC gain).
    let sum: f64 = kernel.iter().sum();
    kernel.into_iter().map(|h| (h / sum) as f32).collect()
}

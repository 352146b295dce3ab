//! Chunked, wall-clock-paced band magnitude feed for live charts.

use crate::band_magnitudes::band_magnitudes;
use std::thread;
use std::time::{Duration, Instant};

/// Clock used to pace chunk emission. Production code uses
/// [`WallClockPacer`]; tests substitute a deterministic clock.
pub trait Pacer {
    /// Time elapsed since visualization start.
    fn elapsed(&self) -> Duration;
    /// Suspends the caller for `duration`.
    fn sleep(&mut self, duration: Duration);
}

/// Real-time pacer backed by [`Instant`] and [`thread::sleep`].
pub struct WallClockPacer {
    start: Instant,
}

impl WallClockPacer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Pacer for WallClockPacer {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Replays `samples` in `sample_rate / frame_rate`-sized chunks, analyzing
/// each chunk and handing the per-band magnitudes to `emit` in order. The
/// last chunk may be shorter; the loop ends when the buffer is exhausted.
///
/// Two sleeps pace every chunk: a correction sleep that waits until the
/// chunk's own timestamp whenever the loop runs ahead of schedule, and a
/// fixed `1 / frame_rate` sleep after emission. The fixed sleep stacks on
/// top of the schedule, so the effective frame rate lands below the
/// configured one; kept that way to match the feel of the existing
/// renderers. A slow caller is never asked to catch up by dropping chunks.
pub fn run<P, F>(
    samples: &[f32],
    sample_rate: u32,
    frame_rate: u32,
    center_frequencies: &[f32],
    pacer: &mut P,
    mut emit: F,
) where
    P: Pacer,
    F: FnMut(&[f32]),
{
    let chunk_size = (sample_rate / frame_rate) as usize;
    if chunk_size == 0 {
        return;
    }
    let frame_delay = Duration::from_secs_f64(1.0 / frame_rate as f64);

    let mut offset = 0;
    while offset < samples.len() {
        let expected = Duration::from_secs_f64(offset as f64 / sample_rate as f64);
        let elapsed = pacer.elapsed();
        if elapsed < expected {
            pacer.sleep(expected - elapsed);
        }

        let end = (offset + chunk_size).min(samples.len());
        let magnitudes = band_magnitudes(&samples[offset..end], sample_rate, center_frequencies);
        emit(&magnitudes);

        pacer.sleep(frame_delay);
        offset = end;
    }
}

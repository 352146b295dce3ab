use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;
use symphonia::core::audio::AudioBufferRef;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::probe::Hint;

// Custom error type for audio loading/saving errors
#[derive(Debug)]
pub enum AudioError {
    Io(io::Error),
    UnsupportedFormat,
    DecodingError(String),
    EncodingError(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AudioError::Io(err) => write!(f, "IO error: {}", err),
            AudioError::UnsupportedFormat => write!(f, "Unsupported audio format"),
            AudioError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
            AudioError::EncodingError(msg) => write!(f, "Encoding error: {}", msg),
        }
    }
}

impl std::error::Error for AudioError {}

impl From<io::Error> for AudioError {
    fn from(err: io::Error) -> Self {
        AudioError::Io(err)
    }
}

/// Decodes an audio file into a mono sample buffer and its sample rate.
/// Multi-channel sources are downmixed by averaging the channel planes,
/// since the equalizer core operates on a single channel.
pub fn load_audio(path: &Path) -> Result<(Vec<f32>, u32), AudioError> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    hint.with_extension(path.extension().and_then(|s| s.to_str()).unwrap_or(""));

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &Default::default(), &Default::default())
        .map_err(|e| AudioError::DecodingError(e.to_string()))?;

    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| AudioError::DecodingError("No default track found".to_string()))?;
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &Default::default())
        .map_err(|e| AudioError::DecodingError(e.to_string()))?;

    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| AudioError::DecodingError("No sample rate found".to_string()))?;
    let mut samples = Vec::new();

    while let Ok(packet) = format.next_packet() {
        let buffer = decoder
            .decode(&packet)
            .map_err(|e| AudioError::DecodingError(e.to_string()))?;
        match buffer {
            AudioBufferRef::F32(buf) => {
                let planes_binding = buf.planes();
                let planes = planes_binding.planes();
                for i in 0..planes[0].len() {
                    let mut frame = 0.0f32;
                    for plane in planes.iter() {
                        frame += plane[i];
                    }
                    samples.push(frame / planes.len() as f32);
                }
            }
            AudioBufferRef::S32(buf) => {
                let planes_binding = buf.planes();
                let planes = planes_binding.planes();
                for i in 0..planes[0].len() {
                    let mut frame = 0.0f32;
                    for plane in planes.iter() {
                        frame += plane[i] as f32 / i32::MAX as f32;
                    }
                    samples.push(frame / planes.len() as f32);
                }
            }
            AudioBufferRef::S16(buf) => {
                let planes_binding = buf.planes();
                let planes = planes_binding.planes();
                for i in 0..planes[0].len() {
                    let mut frame = 0.0f32;
                    for plane in planes.iter() {
                        frame += plane[i] as f32 / i16::MAX as f32;
                    }
                    samples.push(frame / planes.len() as f32);
                }
            }
            AudioBufferRef::U8(buf) => {
                let planes_binding = buf.planes();
                let planes = planes_binding.planes();
                for i in 0..planes[0].len() {
                    let mut frame = 0.0f32;
                    for plane in planes.iter() {
                        frame += (plane[i] as f32 - 128.0) / 128.0;
                    }
                    samples.push(frame / planes.len() as f32);
                }
            }
            _ => {
                return Err(AudioError::UnsupportedFormat);
            }
        }
    }

    Ok((samples, sample_rate))
}

/// Saves a mono buffer of f32 samples to a 16-bit WAV file.
pub fn save_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<(), AudioError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| AudioError::EncodingError(e.to_string()))?;
    let amplitude = i16::MAX as f32;
    for sample in samples {
        let s = (sample * amplitude) as i16;
        writer
            .write_sample(s)
            .map_err(|e| AudioError::EncodingError(e.to_string()))?;
    }
    writer
        .finalize()
        .map_err(|e| AudioError::EncodingError(e.to_string()))?;
    Ok(())
}

// Decoded asset types

use super::AssetError;
use std::io::Cursor;
use std::sync::Arc;

/// Decoded RGBA image
pub struct ImageAsset {
    pub pixels: image::RgbaImage,
}

impl ImageAsset {
    /// Decode a PNG or JPEG image
    pub fn from_bytes(bytes: &[u8], label: &str) -> Result<Self, AssetError> {
        let img = image::load_from_memory(bytes).map_err(|e| AssetError::Decode {
            path: label.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            pixels: img.to_rgba8(),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Decoded sound as interleaved f32 samples in [-1, 1]
///
/// Samples are shared with the audio thread, so they sit behind an `Arc`.
pub struct SoundAsset {
    pub samples: Arc<[f32]>,
    pub channels: u16,
    pub sample_rate: u32,
}

impl SoundAsset {
    /// Decode a WAV file
    pub fn from_bytes(bytes: &[u8], label: &str) -> Result<Self, AssetError> {
        let decode_err = |e: hound::Error| AssetError::Decode {
            path: label.to_string(),
            reason: e.to_string(),
        };

        let reader = hound::WavReader::new(Cursor::new(bytes)).map_err(decode_err)?;
        let spec = reader.spec();

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(decode_err)?,
            hound::SampleFormat::Int => {
                let full_scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / full_scale))
                    .collect::<Result<_, _>>()
                    .map_err(decode_err)?
            }
        };

        Ok(Self {
            samples: samples.into(),
            channels: spec.channels.max(1),
            sample_rate: spec.sample_rate,
        })
    }

    /// Number of sample frames (one sample per channel)
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f32 / self.sample_rate as f32
    }
}

/// Font loaded for one pixel size
pub struct FontAsset {
    pub font: fontdue::Font,
    pub size: f32,
}

impl FontAsset {
    /// Parse a TrueType or OpenType font for rendering at `size` pixels
    pub fn from_bytes(bytes: &[u8], size: u32, label: &str) -> Result<Self, AssetError> {
        let size = size.max(1) as f32;
        let settings = fontdue::FontSettings {
            scale: size,
            ..fontdue::FontSettings::default()
        };
        let font = fontdue::Font::from_bytes(bytes, settings).map_err(|e| AssetError::Decode {
            path: label.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { font, size })
    }

    /// Distance from the top of a line to the baseline, in pixels
    pub fn ascent(&self) -> f32 {
        self.font
            .horizontal_line_metrics(self.size)
            .map(|m| m.ascent)
            .unwrap_or(self.size)
    }
}

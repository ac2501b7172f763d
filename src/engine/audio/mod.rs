// Audio playback
//
// A single cpal output stream mixes every active voice. `play` is
// fire-and-forget: repeated calls for the same sound overlap.

use crate::engine::assets::SoundAsset;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::{Arc, Mutex};

/// Audio output errors
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("No audio output device available")]
    NoDevice,

    #[error("Unsupported output sample format: {0}")]
    UnsupportedFormat(String),

    #[error("Audio stream error: {0}")]
    Stream(String),
}

/// One playing instance of a sound
#[derive(Debug, Clone)]
pub struct Voice {
    samples: Arc<[f32]>,
    channels: usize,
    /// Source frames advanced per output frame
    step: f64,
    /// Current source frame
    position: f64,
    looping: bool,
}

impl Voice {
    pub fn new(sound: &SoundAsset, output_rate: u32, looping: bool) -> Self {
        let step = if output_rate == 0 {
            1.0
        } else {
            f64::from(sound.sample_rate) / f64::from(output_rate)
        };
        Self {
            samples: Arc::clone(&sound.samples),
            channels: usize::from(sound.channels.max(1)),
            step,
            position: 0.0,
            looping,
        }
    }

    fn frames(&self) -> usize {
        self.samples.len() / self.channels
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Add this voice into one output frame; returns false once finished
    fn mix_frame(&mut self, out: &mut [f32]) -> bool {
        let frames = self.frames();
        if frames == 0 {
            return false;
        }

        let frame = self.position as usize;
        if frame >= frames {
            return false;
        }

        for (ch, sample) in out.iter_mut().enumerate() {
            // Mono sources feed every output channel
            let src = frame * self.channels + ch % self.channels;
            *sample += self.samples[src];
        }

        self.position += self.step;
        if self.position >= frames as f64 {
            if self.looping {
                self.position %= frames as f64;
            } else {
                return false;
            }
        }
        true
    }
}

/// Mix `voices` into interleaved `out`, dropping voices that finished
pub fn mix_into(voices: &mut Vec<Voice>, out: &mut [f32], channels: u16) {
    let channels = usize::from(channels.max(1));
    out.fill(0.0);

    for frame in out.chunks_mut(channels) {
        voices.retain_mut(|voice| voice.mix_frame(frame));
        if voices.is_empty() {
            break;
        }
    }

    for sample in out.iter_mut() {
        *sample = sample.clamp(-1.0, 1.0);
    }
}

/// Output mixer
///
/// Without a usable output device the mixer is silent: sounds still load
/// and `play` still succeeds, nothing is heard.
pub struct Mixer {
    voices: Arc<Mutex<Vec<Voice>>>,
    stream: Option<cpal::Stream>,
    sample_rate: u32,
    channels: u16,
    plays: u64,
}

impl Mixer {
    /// Open the default output device, falling back to a silent mixer
    pub fn new() -> Self {
        let voices = Arc::new(Mutex::new(Vec::new()));
        match open_output(Arc::clone(&voices)) {
            Ok((stream, sample_rate, channels)) => {
                log::info!("Audio output: {} Hz, {} channel(s)", sample_rate, channels);
                Self {
                    voices,
                    stream: Some(stream),
                    sample_rate,
                    channels,
                    plays: 0,
                }
            }
            Err(e) => {
                log::warn!("{}; sounds will be silent", e);
                Self::silent()
            }
        }
    }

    /// A mixer with no output stream
    pub fn silent() -> Self {
        Self {
            voices: Arc::new(Mutex::new(Vec::new())),
            stream: None,
            sample_rate: 44_100,
            channels: 2,
            plays: 0,
        }
    }

    pub fn is_silent(&self) -> bool {
        self.stream.is_none()
    }

    /// Start a new voice for `sound`
    pub fn play(&mut self, sound: &SoundAsset, looping: bool) {
        self.plays += 1;
        if self.is_silent() {
            return;
        }

        let voice = Voice::new(sound, self.sample_rate, looping);
        match self.voices.lock() {
            Ok(mut voices) => voices.push(voice),
            Err(_) => log::error!("audio mixer lock poisoned, dropping sound"),
        }
    }

    /// Number of voices still playing
    pub fn active_voices(&self) -> usize {
        self.voices.lock().map(|v| v.len()).unwrap_or(0)
    }

    /// Total number of `play` calls this session
    pub fn plays(&self) -> u64 {
        self.plays
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}

fn open_output(voices: Arc<Mutex<Vec<Voice>>>) -> Result<(cpal::Stream, u32, u16), AudioError> {
    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
    if let Ok(name) = device.name() {
        log::debug!("Audio device: {}", name);
    }

    let supported = device
        .default_output_config()
        .map_err(|e| AudioError::Stream(e.to_string()))?;
    let format = supported.sample_format();
    let config = supported.config();

    let stream = match format {
        cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, voices),
        cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, voices),
        cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, voices),
        other => Err(AudioError::UnsupportedFormat(format!("{:?}", other))),
    }?;

    stream
        .play()
        .map_err(|e| AudioError::Stream(e.to_string()))?;

    Ok((stream, config.sample_rate.0, config.channels))
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    voices: Arc<Mutex<Vec<Voice>>>,
) -> Result<cpal::Stream, AudioError>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = config.channels;
    let mut scratch: Vec<f32> = Vec::new();

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                scratch.resize(data.len(), 0.0);
                match voices.lock() {
                    Ok(mut voices) => mix_into(&mut voices, &mut scratch, channels),
                    Err(_) => scratch.fill(0.0),
                }
                for (out, sample) in data.iter_mut().zip(&scratch) {
                    *out = T::from_sample(*sample);
                }
            },
            |err| log::error!("Audio stream error: {}", err),
            None,
        )
        .map_err(|e| AudioError::Stream(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sound(samples: &[f32], channels: u16, sample_rate: u32) -> SoundAsset {
        SoundAsset {
            samples: samples.to_vec().into(),
            channels,
            sample_rate,
        }
    }

    #[test]
    fn test_one_shot_voice_finishes() {
        let beep = sound(&[0.25, 0.5], 1, 100);
        let mut voices = vec![Voice::new(&beep, 100, false)];
        let mut out = [0.0f32; 8];

        mix_into(&mut voices, &mut out, 2);

        // Mono is duplicated onto both channels
        assert_relative_eq!(out[0], 0.25);
        assert_relative_eq!(out[1], 0.25);
        assert_relative_eq!(out[2], 0.5);
        assert_relative_eq!(out[3], 0.5);
        assert_relative_eq!(out[4], 0.0);
        assert!(voices.is_empty());
    }

    #[test]
    fn test_looping_voice_wraps() {
        let tick = sound(&[0.1, 0.2], 1, 100);
        let mut voices = vec![Voice::new(&tick, 100, true)];
        let mut out = [0.0f32; 5];

        mix_into(&mut voices, &mut out, 1);

        assert_relative_eq!(out[2], 0.1);
        assert_relative_eq!(out[3], 0.2);
        assert_eq!(voices.len(), 1);
        assert!(voices[0].is_looping());
    }

    #[test]
    fn test_looping_voice_survives_large_step() {
        // Two frames at 48 kHz played at 8 kHz advance six frames per output frame
        let click = sound(&[0.5, -0.5], 1, 48_000);
        let mut voices = vec![Voice::new(&click, 8_000, true)];
        let mut out = [0.0f32; 4];

        mix_into(&mut voices, &mut out, 1);

        assert_eq!(voices.len(), 1);
        for sample in out {
            assert_relative_eq!(sample, 0.5);
        }
    }

    #[test]
    fn test_overlapping_voices_sum_and_clamp() {
        let loud = sound(&[0.75], 1, 100);
        let mut voices = vec![
            Voice::new(&loud, 100, false),
            Voice::new(&loud, 100, false),
        ];
        let mut out = [0.0f32; 1];

        mix_into(&mut voices, &mut out, 1);
        assert_relative_eq!(out[0], 1.0);
    }

    #[test]
    fn test_resampling_step() {
        let slow = sound(&[0.0; 4], 1, 22_050);
        let voice = Voice::new(&slow, 44_100, false);
        assert_relative_eq!(voice.step, 0.5);
    }

    #[test]
    fn test_silent_mixer_counts_plays() {
        let beep = sound(&[0.5; 16], 1, 8000);
        let mut mixer = Mixer::silent();

        mixer.play(&beep, false);
        mixer.play(&beep, false);

        assert!(mixer.is_silent());
        assert_eq!(mixer.plays(), 2);
        assert_eq!(mixer.active_voices(), 0);
    }
}

//! Microphone capture chunked into fixed-length clips.
//!
//! The cpal callback only appends mono samples to a shared buffer. The UI
//! thread drains that buffer on a short poll and feeds a [`ClipAccumulator`],
//! which cuts a WAV clip every `clip_interval_secs`.

use crate::error::PrompterError;
use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use cpal::Sample;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

const WAV_MIME: &str = "audio/wav";

/// One finalized recording segment, ready for the resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub data_uri: String,
    pub duration_secs: f32,
}

#[derive(Debug)]
pub struct ClipAccumulator {
    sample_rate: u32,
    clip_len: usize,
    buffer: Vec<f32>,
}

impl ClipAccumulator {
    pub fn new(sample_rate: u32, interval_secs: f32) -> Self {
        let interval = if interval_secs.is_finite() && interval_secs > 0.0 {
            interval_secs
        } else {
            2.0
        };
        let clip_len = ((sample_rate.max(1) as f32) * interval).round().max(1.0) as usize;
        Self {
            sample_rate: sample_rate.max(1),
            clip_len,
            buffer: Vec::with_capacity(clip_len),
        }
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Append samples and cut every complete clip.
    pub fn push(&mut self, samples: &[f32]) -> Result<Vec<AudioClip>> {
        self.buffer.extend_from_slice(samples);
        let mut clips = Vec::new();
        while self.buffer.len() >= self.clip_len {
            let rest = self.buffer.split_off(self.clip_len);
            let full = std::mem::replace(&mut self.buffer, rest);
            if let Some(clip) = encode_clip(&full, self.sample_rate)? {
                clips.push(clip);
            }
        }
        Ok(clips)
    }

    /// Throw away the partial clip.
    pub fn discard(&mut self) {
        self.buffer.clear();
    }
}

fn encode_clip(samples: &[f32], sample_rate: u32) -> Result<Option<AudioClip>> {
    if samples.is_empty() {
        return Ok(None);
    }
    let wav = encode_wav(samples, sample_rate)?;
    Ok(Some(AudioClip {
        data_uri: format!("data:{WAV_MIME};base64,{}", STANDARD.encode(wav)),
        duration_secs: samples.len() as f32 / sample_rate as f32,
    }))
}

pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).context("Creating WAV writer")?;
        for sample in samples {
            let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer.write_sample(value).context("Writing WAV sample")?;
        }
        writer.finalize().context("Finalizing WAV clip")?;
    }
    Ok(cursor.into_inner())
}

/// Open microphone stream. Dropping it releases the device.
pub struct SpeechCapture {
    _stream: cpal::Stream,
    samples: Arc<Mutex<Vec<f32>>>,
    accumulator: ClipAccumulator,
    device_name: String,
}

impl SpeechCapture {
    /// Open `device_name` (or the system default for `"default"`) and start
    /// recording. Every failure here is reported as a permission problem.
    pub fn start(device_name: &str, interval_secs: f32) -> Result<Self, PrompterError> {
        let host = cpal::default_host();
        let device = select_device(&host, device_name)?;
        let name = device.name().unwrap_or_else(|_| device_name.to_string());
        let supported = device
            .default_input_config()
            .map_err(|err| PrompterError::PermissionDenied(format!("{name}: {err}")))?;
        let sample_format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();
        let samples = Arc::new(Mutex::new(Vec::new()));

        let stream = match sample_format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, Arc::clone(&samples)),
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, Arc::clone(&samples)),
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, Arc::clone(&samples)),
            other => {
                return Err(PrompterError::PermissionDenied(format!(
                    "{name}: unsupported sample format {other:?}"
                )));
            }
        }
        .map_err(|err| PrompterError::PermissionDenied(format!("{name}: {err}")))?;

        stream
            .play()
            .map_err(|err| PrompterError::PermissionDenied(format!("{name}: {err}")))?;

        info!(
            device = %name,
            sample_rate = config.sample_rate.0,
            channels = config.channels,
            interval_secs,
            "Microphone capture started"
        );
        Ok(Self {
            _stream: stream,
            samples,
            accumulator: ClipAccumulator::new(config.sample_rate.0, interval_secs),
            device_name: name,
        })
    }

    /// Move captured audio into the accumulator and return finished clips.
    pub fn drain(&mut self) -> Vec<AudioClip> {
        let fresh = match self.samples.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(_) => return Vec::new(),
        };
        match self.accumulator.push(&fresh) {
            Ok(clips) => {
                if !clips.is_empty() {
                    debug!(count = clips.len(), "Microphone clips ready");
                }
                clips
            }
            Err(err) => {
                error!(device = %self.device_name, "Failed to encode clip: {err:#}");
                Vec::new()
            }
        }
    }

    pub fn stop(mut self) {
        self.accumulator.discard();
        info!(device = %self.device_name, "Microphone capture stopped");
    }
}

fn select_device(host: &cpal::Host, device_name: &str) -> Result<cpal::Device, PrompterError> {
    let wanted = device_name.trim();
    if wanted.is_empty() || wanted.eq_ignore_ascii_case("default") {
        return host
            .default_input_device()
            .ok_or_else(|| PrompterError::PermissionDenied("no input device available".into()));
    }
    let mut devices = host
        .input_devices()
        .map_err(|err| PrompterError::PermissionDenied(err.to_string()))?;
    devices
        .find(|device| device.name().map(|name| name == wanted).unwrap_or(false))
        .ok_or_else(|| PrompterError::PermissionDenied(format!("input device '{wanted}' not found")))
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    samples: Arc<Mutex<Vec<f32>>>,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: cpal::SizedSample,
    f32: cpal::FromSample<T>,
{
    let channels = config.channels.max(1) as usize;
    device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            let mono = data.chunks(channels).map(|frame| {
                frame.iter().map(|s| s.to_sample::<f32>()).sum::<f32>() / frame.len() as f32
            });
            if let Ok(mut guard) = samples.lock() {
                guard.extend(mono);
            }
        },
        |err| {
            error!("Microphone stream error: {err}");
        },
        None,
    )
}

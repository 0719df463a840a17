//! Microphone capture feeding the spectrum analyser.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample};
use log::{debug, error, info, warn};
use std::fs::File;
use std::io::BufWriter;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};
use std::thread;
use std::time::Duration;
use thiserror::Error;

use super::{AudioFrame, SpectrumAnalyser};
use crate::params::{AnalyserConfig, CaptureConfig, RecordingConfig};

type WavSink = hound::WavWriter<BufWriter<File>>;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio input device not found: {0}")]
    DeviceNotFound(String),

    #[error("invalid audio config: {0}")]
    InvalidConfig(String),

    #[error("failed to query default input config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start input stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("unsupported sample format: {0}")]
    UnsupportedSampleFormat(String),

    #[error("failed to write audio recording: {0}")]
    Wav(#[from] hound::Error),
}

/// Lock a mutex, recovering the data if a panicking thread poisoned it
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Average interleaved frames down to mono and append, keeping at most `cap`
/// samples. Returns how many mono samples were appended.
fn push_mono<T>(buffer: &mut Vec<f32>, data: &[T], channels: usize, cap: usize) -> usize
where
    T: Sample,
    f32: FromSample<T>,
{
    let before = buffer.len();
    buffer.extend(data.chunks(channels.max(1)).map(|frame| {
        frame.iter().map(|&s| s.to_sample::<f32>()).sum::<f32>() / frame.len() as f32
    }));
    let appended = buffer.len() - before;
    let excess = buffer.len().saturating_sub(cap);
    buffer.drain(..excess);
    appended
}

/// Audio system capturing microphone input and publishing spectra
pub struct AudioSystem {
    /// Newest analysed frame (thread-safe)
    latest: Arc<Mutex<Option<AudioFrame>>>,

    /// Input stream; dropped first on teardown
    stream: Option<cpal::Stream>,

    stop: Arc<AtomicBool>,
    analysis_thread: Option<thread::JoinHandle<()>>,

    /// WAV tee, finalised on drop
    wav: Option<Arc<Mutex<Option<WavSink>>>>,
}

impl AudioSystem {
    /// Open the input device and start capture plus analysis
    pub fn new(
        capture: CaptureConfig,
        analyser_config: AnalyserConfig,
        recording: Option<&RecordingConfig>,
    ) -> Result<Self, AudioError> {
        let mut analyser = SpectrumAnalyser::new(analyser_config).map_err(AudioError::InvalidConfig)?;
        let fft_size = analyser.config().fft_size;

        let host = cpal::default_host();
        let device = match &capture.device {
            Some(name) => host
                .input_devices()
                .map_err(|e| AudioError::DeviceNotFound(e.to_string()))?
                .find(|d| d.name().map(|n| n == *name).unwrap_or(false))
                .ok_or_else(|| AudioError::DeviceNotFound(name.clone()))?,
            None => host
                .default_input_device()
                .ok_or_else(|| AudioError::DeviceNotFound("default input".to_string()))?,
        };

        let config = device.default_input_config()?;
        let sample_rate = config.sample_rate().0;
        let channels = config.channels() as usize;
        info!(
            "Audio: {} @ {}Hz, {} channel(s), {:?}",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate,
            channels,
            config.sample_format()
        );

        let wav = match recording {
            Some(rec) => {
                let spec = hound::WavSpec {
                    channels: 1,
                    sample_rate,
                    bits_per_sample: 32,
                    sample_format: hound::SampleFormat::Float,
                };
                let writer = hound::WavWriter::create(rec.audio_path(), spec)?;
                info!("Recording audio to {}", rec.audio_path().display());
                Some(Arc::new(Mutex::new(Some(writer))))
            }
            None => None,
        };

        let samples = Arc::new(Mutex::new(Vec::<f32>::with_capacity(fft_size * 4)));
        let cap = capture.max_buffered_samples.max(fft_size);

        let stream_config: cpal::StreamConfig = config.clone().into();
        let stream = match config.sample_format() {
            SampleFormat::F32 => {
                build_stream::<f32>(&device, &stream_config, channels, cap, &samples, wav.clone())?
            }
            SampleFormat::I16 => {
                build_stream::<i16>(&device, &stream_config, channels, cap, &samples, wav.clone())?
            }
            SampleFormat::U16 => {
                build_stream::<u16>(&device, &stream_config, channels, cap, &samples, wav.clone())?
            }
            other => return Err(AudioError::UnsupportedSampleFormat(format!("{:?}", other))),
        };
        stream.play()?;

        let latest = Arc::new(Mutex::new(None));
        let stop = Arc::new(AtomicBool::new(false));

        // Analysis thread: newest fft_size samples → frame, every interval
        let analysis_thread = {
            let latest = Arc::clone(&latest);
            let stop = Arc::clone(&stop);
            let interval = Duration::from_millis(capture.update_interval_ms.max(1));
            thread::spawn(move || {
                let mut block = Vec::with_capacity(fft_size);
                while !stop.load(Ordering::Relaxed) {
                    thread::sleep(interval);
                    {
                        let buffer = lock(&samples);
                        if buffer.is_empty() {
                            continue;
                        }
                        block.clear();
                        block.extend_from_slice(&buffer[buffer.len().saturating_sub(fft_size)..]);
                    }
                    let frame = analyser.analyse(&block);
                    *lock(&latest) = Some(frame);
                }
                debug!("Analysis thread stopped");
            })
        };

        Ok(Self {
            latest,
            stream: Some(stream),
            stop,
            analysis_thread: Some(analysis_thread),
            wav,
        })
    }

    /// Newest spectrum, without blocking
    ///
    /// Returns `None` before the first analysis and whenever the analysis
    /// thread holds the slot; callers keep their previous snapshot then.
    pub fn latest_frame(&self) -> Option<AudioFrame> {
        match self.latest.try_lock() {
            Ok(slot) => slot.clone(),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().clone(),
            Err(TryLockError::WouldBlock) => None,
        }
    }
}

impl Drop for AudioSystem {
    fn drop(&mut self) {
        // Stop the callback before the thread and the WAV tee go away
        drop(self.stream.take());

        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.analysis_thread.take() {
            if handle.join().is_err() {
                warn!("Analysis thread panicked");
            }
        }

        if let Some(wav) = self.wav.take() {
            if let Some(writer) = lock(&wav).take() {
                match writer.finalize() {
                    Ok(()) => info!("Audio recording finalised"),
                    Err(e) => error!("Failed to finalise audio recording: {}", e),
                }
            }
        }
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    cap: usize,
    samples: &Arc<Mutex<Vec<f32>>>,
    wav: Option<Arc<Mutex<Option<WavSink>>>>,
) -> Result<cpal::Stream, AudioError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let samples = Arc::clone(samples);
    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            let mut buffer = lock(&samples);
            let appended = push_mono(&mut buffer, data, channels, cap);

            if let Some(ref wav) = wav {
                if let Some(writer) = lock(wav).as_mut() {
                    let tail = &buffer[buffer.len() - appended.min(buffer.len())..];
                    for &s in tail {
                        let _ = writer.write_sample(s);
                    }
                }
            }
        },
        |err| error!("Audio stream error: {}", err),
        None,
    )?;
    Ok(stream)
}

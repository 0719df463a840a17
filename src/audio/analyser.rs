//! Spectrum analysis: mono sample block → smoothed byte magnitudes.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

use super::AudioFrame;
use crate::params::{audio_constants::MAX_MAGNITUDE, AnalyserConfig};

/// Windowed FFT with temporal smoothing and decibel scaling
pub struct SpectrumAnalyser {
    config: AnalyserConfig,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    /// Smoothed linear magnitudes from the previous block
    smoothed: Vec<f32>,
}

impl SpectrumAnalyser {
    pub fn new(config: AnalyserConfig) -> Result<Self, String> {
        config
            .validate()
            .map_err(|e| format!("Invalid analyser config: {}", e))?;

        let size = config.fft_size;
        let fft = FftPlanner::new().plan_fft_forward(size);
        let window = (0..size).map(|i| hann_window(i, size)).collect();

        Ok(Self {
            fft,
            window,
            buffer: vec![Complex::new(0.0, 0.0); size],
            smoothed: vec![0.0; config.bin_count()],
            config,
        })
    }

    pub fn config(&self) -> &AnalyserConfig {
        &self.config
    }

    /// Analyse the most recent `fft_size` samples
    ///
    /// Shorter input is zero-padded at the front, so the newest sample
    /// always lands at the end of the window.
    pub fn analyse(&mut self, samples: &[f32]) -> AudioFrame {
        let size = self.config.fft_size;
        let recent = &samples[samples.len().saturating_sub(size)..];
        let pad = size - recent.len();

        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let sample = if i < pad { 0.0 } else { recent[i - pad] };
            *slot = Complex::new(sample * self.config.input_gain * self.window[i], 0.0);
        }
        self.fft.process(&mut self.buffer);

        let tau = self.config.smoothing_time_constant;
        let min_db = self.config.min_decibels;
        let range_db = self.config.max_decibels - min_db;

        let bins = self
            .smoothed
            .iter_mut()
            .zip(&self.buffer)
            .map(|(smoothed, x)| {
                let magnitude = x.norm() / size as f32;
                *smoothed = tau * *smoothed + (1.0 - tau) * magnitude;
                if *smoothed <= 0.0 {
                    return 0;
                }
                let db = 20.0 * smoothed.log10();
                (MAX_MAGNITUDE * (db - min_db) / range_db).clamp(0.0, MAX_MAGNITUDE) as u8
            })
            .collect();

        AudioFrame::new(bins)
    }
}

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

//! Audio capture and spectrum analysis configuration.

/// Spectrum analyser configuration (sample block → magnitude bins)
#[derive(Debug, Clone)]
pub struct AnalyserConfig {
    /// FFT window size (must be power of 2, >= 64)
    /// Produces `fft_size / 2` magnitude bins
    pub fft_size: usize,

    /// Temporal smoothing between consecutive spectra (0.0 = none, <1.0)
    pub smoothing_time_constant: f32,

    /// Level mapped to byte 0 (dBFS)
    pub min_decibels: f32,

    /// Level mapped to byte 255 (dBFS)
    pub max_decibels: f32,

    /// Linear gain applied to samples before analysis
    /// Quiet microphones need the boost
    pub input_gain: f32,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            fft_size: 256,
            smoothing_time_constant: 0.5,
            min_decibels: -100.0,
            max_decibels: -30.0,
            input_gain: 3.0,
        }
    }
}

impl AnalyserConfig {
    /// Number of magnitude bins per frame
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), String> {
        if !self.fft_size.is_power_of_two() || self.fft_size < 64 {
            return Err(format!(
                "FFT size must be a power of 2 >= 64, got {}",
                self.fft_size
            ));
        }
        if !(0.0..1.0).contains(&self.smoothing_time_constant) {
            return Err(format!(
                "Smoothing time constant must be in [0, 1), got {}",
                self.smoothing_time_constant
            ));
        }
        if self.min_decibels >= self.max_decibels {
            return Err(format!(
                "min_decibels ({}) must be below max_decibels ({})",
                self.min_decibels, self.max_decibels
            ));
        }
        Ok(())
    }
}

/// Microphone capture configuration
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Input device name, `None` = host default input
    pub device: Option<String>,

    /// Analysis thread interval (milliseconds)
    /// 16 ms ≈ one analysis per display frame at 60 Hz
    pub update_interval_ms: u64,

    /// Upper bound on buffered mono samples awaiting analysis
    pub max_buffered_samples: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device: None,
            update_interval_ms: 16,
            max_buffered_samples: audio_constants::MAX_BUFFERED_SAMPLES,
        }
    }
}

/// Audio constants
pub mod audio_constants {
    /// Roughly one second of mono audio at 48 kHz
    pub const MAX_BUFFERED_SAMPLES: usize = 48_000;

    /// Largest possible magnitude sample in an audio frame
    pub const MAX_MAGNITUDE: f32 = 255.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_analyser_config_is_valid() {
        let config = AnalyserConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bin_count(), 128);
    }

    #[test]
    fn test_analyser_config_rejects_bad_values() {
        let mut config = AnalyserConfig::default();
        config.fft_size = 300;
        assert!(config.validate().is_err());

        let mut config = AnalyserConfig::default();
        config.smoothing_time_constant = 1.0;
        assert!(config.validate().is_err());

        let mut config = AnalyserConfig::default();
        config.min_decibels = -20.0;
        assert!(config.validate().is_err());
    }
}

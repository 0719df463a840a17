//! Audio input and spectrum analysis.
//!
//! Captures microphone input with cpal and runs windowed FFT analysis on a
//! background thread, publishing byte-magnitude spectra for the visuals.

mod analyser;
mod capture;
mod frame;

// Re-export public types
pub use analyser::{hann_window, SpectrumAnalyser};
pub use capture::{AudioError, AudioSystem};
pub use frame::AudioFrame;

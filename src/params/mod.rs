//! Parameter definitions with units and documented semantics.
//!
//! Every magic number of the visual pipeline is extracted here with:
//! - Units (pixels, seconds, ticks, degrees, etc.)
//! - Documented ranges and meanings
//! - Defaults tuned for the stock look

mod audio;
mod render;
mod scene;

// Re-export all types
pub use audio::{audio_constants, AnalyserConfig, CaptureConfig};
pub use render::{AsciiParams, CompositorParams, RecordingConfig, RenderConfig};
pub use scene::{
    BurstParams, FeatureParams, HuePath, OrbParams, ParticleParams, SessionParams, WaveParams,
};

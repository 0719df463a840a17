//! Glyphwave library - audio-reactive visual synthesizer with ASCII output

pub mod ascii;
pub mod audio;
pub mod bursts;
pub mod cli;
pub mod color;
pub mod compositor;
pub mod features;
pub mod logging;
pub mod orb;
pub mod params;
pub mod particles;
pub mod recording;
pub mod rendering;
pub mod scheduler;
pub mod session;
pub mod surface;
pub mod viewport;
pub mod waves;

//! Glyphwave - audio-reactive visual synthesizer
//!
//! A glowing orb breathes with the room's sound, shedding particles, rings
//! and beat-triggered blooms. The scene is rendered off-screen and shown
//! in the terminal as coloured ASCII.

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use std::time::Instant;

use glyphwave::audio::{AudioFrame, AudioSystem};
use glyphwave::cli::Args;
use glyphwave::logging;
use glyphwave::params::AnalyserConfig;
use glyphwave::recording::FrameRecorder;
use glyphwave::rendering::TerminalRenderer;
use glyphwave::scheduler::FrameScheduler;
use glyphwave::session::{Session, TickOutcome};
use glyphwave::viewport::Viewport;

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.log_file.as_deref()).context("Failed to open log file")?;

    let params = args.session_params();
    let ascii_params = params.ascii.clone();
    let render_config = args.render_config();
    let recording = args.create_recording_config();

    let mut recorder = recording
        .clone()
        .map(FrameRecorder::new)
        .transpose()
        .context("Failed to prepare recording directory")?;

    // Audio is optional: without a device the fallback oscillator takes over
    let audio = if args.no_audio {
        info!("Audio capture disabled");
        None
    } else {
        match AudioSystem::new(args.capture_config(), AnalyserConfig::default(), recording.as_ref()) {
            Ok(audio) => Some(audio),
            Err(e) => {
                warn!("Audio capture unavailable ({}), using fallback", e);
                None
            }
        }
    };

    let mut session = Session::new(params, args.rng())
        .map_err(anyhow::Error::msg)
        .context("Invalid session parameters")?;

    // Declared after the audio system so it is dropped (and the terminal
    // restored) first
    let mut renderer = TerminalRenderer::new().context("Failed to initialise terminal")?;
    let mut scheduler = FrameScheduler::new(render_config.fps);
    let frame_secs = 1.0 / render_config.fps as f64;

    let start = Instant::now();
    let mut frame: Option<AudioFrame> = None;
    let mut viewport_empty = false;

    info!("Glyphwave running at {} fps (q / Esc to quit)", render_config.fps);

    loop {
        if renderer.poll_quit().context("Failed to read terminal input")? {
            info!("Quit requested");
            break;
        }

        let viewport = renderer.viewport(&ascii_params).unwrap_or_else(|e| {
            warn!("Failed to query terminal size: {}", e);
            Viewport::new(0, 0)
        });

        // Keep the previous snapshot when the analysis thread is busy
        if let Some(latest) = audio.as_ref().and_then(AudioSystem::latest_frame) {
            frame = Some(latest);
        }

        // Recording runs on a fixed timestep so every saved frame is one tick apart
        let now = match &recorder {
            Some(rec) => rec.frames_written() as f64 * frame_secs,
            None => start.elapsed().as_secs_f64(),
        };

        match session.advance(now, frame.as_ref(), viewport) {
            TickOutcome::Skipped => {
                if !viewport_empty {
                    debug!("Viewport is empty, pausing the scene");
                    viewport_empty = true;
                }
            }
            TickOutcome::Rendered { ascii } => {
                if viewport_empty {
                    debug!("Viewport restored to {}x{}", viewport.width, viewport.height);
                    viewport_empty = false;
                }
                if ascii {
                    if let Err(e) = renderer.present(session.glyphs()) {
                        warn!("Terminal write failed: {}", e);
                    }
                }
                if let Some(rec) = recorder.as_mut() {
                    rec.record(session.scene(), session.glyphs())
                        .context("Failed to save recorded frame")?;
                    if rec.is_finished() {
                        break;
                    }
                }
            }
        }

        scheduler.wait();
    }

    drop(renderer);
    drop(audio);
    info!("Stopped after {} ticks", session.ticks());
    Ok(())
}

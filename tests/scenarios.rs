//! End-to-end scenarios driven through the public session API.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use glyphwave::ascii::{AsciiTranscoder, GlyphGrid};
use glyphwave::audio::AudioFrame;
use glyphwave::color::Rgb;
use glyphwave::params::{AsciiParams, SessionParams};
use glyphwave::session::{Session, TickOutcome};
use glyphwave::surface::Surface;
use glyphwave::viewport::Viewport;

const TICK: f64 = 1.0 / 60.0;
const VIEWPORT: Viewport = Viewport::new(800, 600);

fn session(params: SessionParams) -> Session {
    Session::new(params, StdRng::seed_from_u64(2024)).unwrap()
}

/// Frame whose mean magnitude is `mean` (halves allowed via alternation)
fn frame_with_mean(mean: f32) -> AudioFrame {
    let low = mean.floor() as u8;
    let high = mean.ceil() as u8;
    AudioFrame::new((0..128).map(|i| if i % 2 == 0 { low } else { high }).collect())
}

#[test]
fn silence_without_fallback_keeps_orb_at_rest() {
    let mut params = SessionParams::default();
    params.features.fallback_enabled = false;
    let mut s = session(params);

    s.advance(0.0, None, VIEWPORT);
    assert_eq!(s.orb().position, Vec2::new(400.0, 300.0));
    assert_eq!(s.orb().target_radius, 100.0);
    assert_eq!(s.orb().current_radius, 100.0);
    assert_eq!(s.features().smoothed_volume, 0.0);
    assert!(s.particles().is_empty());

    for i in 1..120 {
        s.advance(i as f64 * TICK, None, VIEWPORT);
    }
    assert_eq!(s.orb().current_radius, 100.0);
    assert!(s.bursts().is_empty());
}

#[test]
fn fallback_keeps_scene_moving_without_audio() {
    let mut s = session(SessionParams::default());
    for i in 0..60 {
        s.advance(i as f64 * TICK, None, VIEWPORT);
    }
    assert!(!s.features().live);
    assert!(s.features().smoothed_volume > 0.0);
    assert!(s.orb().current_radius > 100.0);
}

#[test]
fn volume_jump_spawns_four_bursts() {
    let mut params = SessionParams::default();
    params.features.smoothing = 1.0;
    let mut s = session(params);

    s.advance(0.0, Some(&frame_with_mean(17.0)), VIEWPORT);
    assert!((s.features().smoothed_volume - 0.2).abs() < 1e-5);
    assert!(s.bursts().is_empty());

    s.advance(TICK, Some(&frame_with_mean(42.5)), VIEWPORT);
    assert!((s.features().smoothed_volume - 0.5).abs() < 1e-5);
    assert_eq!(s.bursts().len(), 4);
    assert!((s.features().beat_cooldown - 0.12).abs() < 1e-6);
}

#[test]
fn cooldown_blocks_immediate_retrigger() {
    let mut params = SessionParams::default();
    params.features.smoothing = 1.0;
    let mut s = session(params);

    s.advance(0.0, Some(&frame_with_mean(17.0)), VIEWPORT);
    s.advance(TICK, Some(&frame_with_mean(42.5)), VIEWPORT);
    assert_eq!(s.bursts().len(), 4);

    // another sharp rise one tick later is still inside the 0.12 s cooldown
    s.advance(2.0 * TICK, Some(&frame_with_mean(68.0)), VIEWPORT);
    assert_eq!(s.bursts().len(), 4);
}

#[test]
fn zero_viewport_mid_session_pauses_then_resumes() {
    let mut s = session(SessionParams::default());
    let loud = frame_with_mean(120.0);

    assert_eq!(s.advance(0.0, Some(&loud), VIEWPORT), TickOutcome::Rendered { ascii: true });
    let particles_before = s.particles().len();
    let glyphs_before = s.glyphs().clone();

    for i in 1..10 {
        let outcome = s.advance(i as f64 * TICK, Some(&loud), Viewport::new(0, 0));
        assert_eq!(outcome, TickOutcome::Skipped);
    }
    // nothing moved while paused
    assert_eq!(s.particles().len(), particles_before);
    assert_eq!(s.glyphs(), &glyphs_before);

    let resumed = s.advance(10.0 * TICK, Some(&loud), Viewport::new(400, 300));
    assert_eq!(resumed, TickOutcome::Rendered { ascii: true });
    assert_eq!((s.glyphs().cols(), s.glyphs().rows()), (80, 30));
    assert_eq!(s.orb().position, Vec2::new(200.0, 150.0));
}

#[test]
fn sustained_loud_input_caps_particles() {
    let mut s = session(SessionParams::default());
    let loud = AudioFrame::new(vec![255; 128]);
    let mut peak = 0;
    for i in 0..300 {
        s.advance(i as f64 * TICK, Some(&loud), VIEWPORT);
        peak = peak.max(s.particles().len());
        assert!(s.particles().len() <= 250);
        assert!(s.particles().iter().all(|p| p.life > 0));
    }
    assert_eq!(peak, 250);
}

#[test]
fn stalled_clock_is_clamped() {
    let mut params = SessionParams::default();
    params.features.smoothing = 1.0;
    let mut s = session(params);

    s.advance(0.0, Some(&frame_with_mean(17.0)), VIEWPORT);
    s.advance(TICK, Some(&frame_with_mean(42.5)), VIEWPORT);
    let ages: Vec<f32> = s.bursts().iter().map(|b| b.life).collect();

    // a ten second stall ages bursts by at most 0.05 s
    s.advance(10.0, Some(&frame_with_mean(42.5)), VIEWPORT);
    for (burst, before) in s.bursts().iter().zip(ages) {
        assert!((burst.life - before - 0.05).abs() < 1e-6);
    }
}

#[test]
fn ascii_extremes() {
    let transcoder = AsciiTranscoder::new(&AsciiParams::default()).unwrap();
    let mut grid = GlyphGrid::default();

    let black = Surface::new(800, 600);
    transcoder.transcode(&black, 1.0, &mut grid).unwrap();
    assert_eq!((grid.cols(), grid.rows()), (160, 60));
    assert_eq!(grid.drawn(), 0);

    let mut white = Surface::new(800, 600);
    white.clear(Rgb::WHITE);
    transcoder.transcode(&white, 1.0, &mut grid).unwrap();
    assert_eq!(grid.drawn(), 160 * 60);
    assert!(grid.to_text().lines().all(|line| line.chars().all(|c| c == '@')));
}

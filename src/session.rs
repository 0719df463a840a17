//! One running visualizer session: owns every piece of scene state and
//! advances it one tick at a time.
//!
//! A tick runs feature extraction, burst spawning, the orb follower,
//! particle emission, compositing and the ASCII pass, in that order. The
//! session never reads a clock itself; callers pass the current time so
//! the whole pipeline can be driven deterministically in tests.

use log::{debug, trace, warn};
use rand::rngs::StdRng;

use crate::ascii::{AsciiTranscoder, GlyphGrid};
use crate::audio::AudioFrame;
use crate::bursts::BurstField;
use crate::compositor::{clamp_dt, Compositor, SceneLayers};
use crate::features::{FeatureExtractor, Features};
use crate::orb::Orb;
use crate::params::{SessionParams, WaveParams};
use crate::particles::ParticleSystem;
use crate::surface::Surface;
use crate::viewport::Viewport;

/// What a call to [`Session::advance`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Zero-area viewport; nothing was simulated or drawn
    Skipped,
    /// Scene composited; `ascii` is false when the glyph pass was skipped
    /// and the previous grid is still current
    Rendered { ascii: bool },
}

pub struct Session {
    features: FeatureExtractor,
    orb: Orb,
    particles: ParticleSystem,
    bursts: BurstField,
    waves: WaveParams,
    compositor: Compositor,
    transcoder: AsciiTranscoder,
    scene: Surface,
    glyphs: GlyphGrid,
    rng: StdRng,
    /// Time of the first tick (seconds, caller's clock)
    origin: Option<f64>,
    /// Time of the previous tick, skipped ticks included
    last: Option<f64>,
    ticks: u64,
}

impl Session {
    pub fn new(params: SessionParams, rng: StdRng) -> Result<Self, String> {
        let transcoder = AsciiTranscoder::new(&params.ascii)?;
        Ok(Self {
            features: FeatureExtractor::new(params.features),
            orb: Orb::new(params.orb),
            particles: ParticleSystem::new(params.particles),
            bursts: BurstField::new(params.bursts),
            waves: params.waves,
            compositor: Compositor::new(params.compositor),
            transcoder,
            scene: Surface::new(0, 0),
            glyphs: GlyphGrid::default(),
            rng,
            origin: None,
            last: None,
            ticks: 0,
        })
    }

    /// Advance the session to `now_s`
    ///
    /// # Arguments
    /// * `now_s` - Monotonic time in seconds; the first call sets the origin
    /// * `frame` - Latest spectrum snapshot, `None` when no feed is available
    /// * `viewport` - Current output size in pixels
    pub fn advance(&mut self, now_s: f64, frame: Option<&AudioFrame>, viewport: Viewport) -> TickOutcome {
        let origin = *self.origin.get_or_insert(now_s);
        let dt = self
            .last
            .map_or(0.0, |last| clamp_dt(self.compositor.params(), now_s - last));
        self.last = Some(now_s);
        self.ticks += 1;

        if viewport.is_empty() {
            trace!("Skipping tick {}: zero-area viewport", self.ticks);
            return TickOutcome::Skipped;
        }

        if self.scene.resize(viewport.width, viewport.height) {
            debug!("Scene surface resized to {}x{}", viewport.width, viewport.height);
        }

        let t = (now_s - origin) as f32;
        let beat = self.features.update(frame, t, dt);
        let features = *self.features.features();

        // bursts take the hue the orb showed before this tick's easing step
        if let Some(beat) = beat {
            debug!(
                "Beat at t={:.2}s (v={:.2}): spawning {} bursts",
                t, features.smoothed_volume, beat.count
            );
            self.bursts.spawn(beat.count, viewport, self.orb.hue, &mut self.rng);
        }

        self.orb.update(&features, viewport);

        self.particles.emit(&self.orb, features.smoothed_volume, &mut self.rng);
        self.particles.step();
        self.bursts.advance(dt);

        let layers = SceneLayers {
            t,
            viewport,
            features: &features,
            orb: &self.orb,
            particles: &self.particles,
            bursts: &self.bursts,
            frame,
            waves: &self.waves,
        };
        self.compositor.draw(&mut self.scene, &layers);
        self.bursts.retire_finished();

        let ascii = match self
            .transcoder
            .transcode(&self.scene, features.smoothed_volume, &mut self.glyphs)
        {
            Ok(()) => {
                trace!("Tick {}: {} glyphs drawn", self.ticks, self.glyphs.drawn());
                true
            }
            Err(e) => {
                warn!("Skipping ASCII pass this tick: {}", e);
                false
            }
        };

        TickOutcome::Rendered { ascii }
    }

    /// Composited scene buffer
    pub fn scene(&self) -> &Surface {
        &self.scene
    }

    /// Latest glyph grid
    pub fn glyphs(&self) -> &GlyphGrid {
        &self.glyphs
    }

    pub fn features(&self) -> &Features {
        self.features.features()
    }

    pub fn orb(&self) -> &Orb {
        &self.orb
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn bursts(&self) -> &BurstField {
        &self.bursts
    }

    /// Ticks advanced so far, skipped ones included
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn session(params: SessionParams) -> Session {
        Session::new(params, StdRng::seed_from_u64(1)).unwrap()
    }

    #[test]
    fn test_first_tick_renders_and_centres_orb() {
        let mut s = session(SessionParams::default());
        let outcome = s.advance(10.0, None, Viewport::new(200, 100));
        assert_eq!(outcome, TickOutcome::Rendered { ascii: true });
        assert_eq!(s.scene().width(), 200);
        assert_eq!((s.glyphs().cols(), s.glyphs().rows()), (40, 10));
        assert_eq!(s.orb().position, glam::Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_zero_viewport_is_skipped() {
        let mut s = session(SessionParams::default());
        assert_eq!(s.advance(0.0, None, Viewport::new(0, 0)), TickOutcome::Skipped);
        assert!(s.scene().is_empty());
        assert_eq!(s.ticks(), 1);
    }

    #[test]
    fn test_unreadable_scene_skips_ascii_for_one_tick() {
        let mut s = session(SessionParams::default());
        let viewport = Viewport::new(200, 100);
        s.advance(0.0, None, viewport);
        let before = s.glyphs().clone();
        assert!(before.drawn() > 0);

        let oversized = Viewport::new(crate::surface::MAX_DIMENSION + 10, 100);
        assert_eq!(
            s.advance(1.0 / 60.0, None, oversized),
            TickOutcome::Rendered { ascii: false }
        );
        assert_eq!(s.glyphs(), &before);

        assert_eq!(
            s.advance(2.0 / 60.0, None, viewport),
            TickOutcome::Rendered { ascii: true }
        );
        assert_eq!((s.glyphs().cols(), s.glyphs().rows()), (40, 10));
    }

    #[test]
    fn test_bursts_take_hue_from_before_orb_update() {
        let mut params = SessionParams::default();
        params.features.smoothing = 1.0;
        params.bursts.hue_jitter_deg = 0.0;
        let mut s = session(params);
        let viewport = Viewport::new(320, 240);
        s.advance(0.0, Some(&AudioFrame::new(vec![0; 128])), viewport);
        let hue_before = s.orb().hue;

        // loud frame peaking high in the spectrum retargets the hue and fires a beat
        let mut bins = vec![200u8; 128];
        bins[100] = 255;
        s.advance(1.0 / 60.0, Some(&AudioFrame::new(bins)), viewport);
        assert!(!s.bursts().is_empty());
        assert_ne!(s.orb().hue, hue_before);
        let first = s.bursts().iter().next().unwrap();
        assert!((first.hue - hue_before).abs() < 1e-4);
    }

    #[test]
    fn test_invalid_ascii_params_rejected() {
        let mut params = SessionParams::default();
        params.ascii.cell_width = 0;
        assert!(Session::new(params, StdRng::seed_from_u64(0)).is_err());
    }

    #[test]
    fn test_features_follow_frame() {
        let mut params = SessionParams::default();
        params.features.smoothing = 1.0;
        let mut s = session(params);
        s.advance(0.0, Some(&AudioFrame::new(vec![17; 128])), Viewport::new(320, 240));
        assert!((s.features().smoothed_volume - 0.2).abs() < 1e-5);
        assert!(s.features().live);
    }

    #[test]
    fn test_same_seed_same_frames() {
        let frame = AudioFrame::new((0..128).map(|i| (i * 2) as u8).collect());
        let run = || {
            let mut s = session(SessionParams::default());
            for i in 0..30 {
                s.advance(i as f64 / 60.0, Some(&frame), Viewport::new(160, 120));
            }
            s.glyphs().clone()
        };
        assert_eq!(run(), run());
    }
}

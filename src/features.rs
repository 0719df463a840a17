//! Audio feature extraction: volume, smoothing, dominant frequency, beats.
//!
//! The extractor consumes the most recent [`AudioFrame`] (or nothing, when
//! no feed is available) once per tick and produces [`Features`] plus an
//! optional [`BeatEvent`]. Without a feed a deterministic oscillator stands
//! in, so the visuals keep breathing on machines without a microphone.

use crate::audio::AudioFrame;
use crate::params::{audio_constants::MAX_MAGNITUDE, FeatureParams};

/// Per-tick perceptual features
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Features {
    /// Instantaneous volume in [0, 1]
    pub volume: f32,
    /// Low-passed volume in [0, 1]
    pub smoothed_volume: f32,
    /// Smoothed volume of the previous tick
    pub previous_smoothed_volume: f32,
    /// Loudest bin index divided by bin count, in [0, 1]
    pub dominant_frequency_ratio: f32,
    /// Seconds until another beat may fire
    pub beat_cooldown: f32,
    /// Whether this tick was driven by a live frame
    pub live: bool,
}

/// A detected onset; `count` bursts should be spawned
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BeatEvent {
    pub count: usize,
}

/// Edge-triggered beat comparator with a refractory cooldown
#[derive(Clone, Debug)]
pub struct BeatDetector {
    threshold: f32,
    min_rise: f32,
    cooldown_s: f32,
    burst_base: usize,
    burst_scale: f32,
    previous: f32,
    cooldown: f32,
}

impl BeatDetector {
    pub fn new(params: &FeatureParams) -> Self {
        Self {
            threshold: params.beat_threshold,
            min_rise: params.beat_min_rise,
            cooldown_s: params.beat_cooldown_s,
            burst_base: params.beat_burst_base,
            burst_scale: params.beat_burst_scale,
            previous: 0.0,
            cooldown: 0.0,
        }
    }

    /// Feed this tick's smoothed volume and the elapsed time (seconds)
    pub fn observe(&mut self, smoothed: f32, dt: f32) -> Option<BeatEvent> {
        self.cooldown = (self.cooldown - dt.max(0.0)).max(0.0);

        let rising = smoothed - self.previous;
        self.previous = smoothed;

        if smoothed > self.threshold && rising > self.min_rise && self.cooldown <= 0.0 {
            self.cooldown = self.cooldown_s;
            let extra = (smoothed * self.burst_scale).floor().max(0.0) as usize;
            return Some(BeatEvent {
                count: self.burst_base + extra,
            });
        }
        None
    }

    /// Remaining refractory time (seconds)
    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }
}

/// Synthetic (volume, dominant frequency ratio) at time `t` seconds
///
/// A pure function of `t`; restarting the clock restarts the pattern.
pub fn fallback_levels(params: &FeatureParams, t: f32) -> (f32, f32) {
    let volume = params.fallback_volume_offset
        + params.fallback_volume_depth * (0.5 + 0.5 * (params.fallback_volume_rate * t).sin());
    let dominant =
        (0.5 + 0.5 * (params.fallback_frequency_rate * t).sin()) * params.fallback_frequency_span;
    (volume.clamp(0.0, 1.0), dominant.clamp(0.0, 1.0))
}

/// Stateful feature extractor, one per session
pub struct FeatureExtractor {
    params: FeatureParams,
    features: Features,
    beat: BeatDetector,
}

impl FeatureExtractor {
    pub fn new(params: FeatureParams) -> Self {
        let beat = BeatDetector::new(&params);
        Self {
            params,
            features: Features::default(),
            beat,
        }
    }

    pub fn features(&self) -> &Features {
        &self.features
    }

    /// Derive this tick's features
    ///
    /// # Arguments
    /// * `frame` - Latest audio snapshot; `None` or empty selects the fallback
    /// * `t` - Seconds since session start (drives the fallback oscillator)
    /// * `dt` - Clamped simulation step (seconds), drives the beat cooldown
    pub fn update(&mut self, frame: Option<&AudioFrame>, t: f32, dt: f32) -> Option<BeatEvent> {
        let live = frame.filter(|f| !f.is_empty());

        let (volume, dominant) = match live {
            Some(frame) => {
                let volume = (frame.mean() / MAX_MAGNITUDE * self.params.volume_gain).clamp(0.0, 1.0);
                let dominant = frame.peak_index() as f32 / frame.len() as f32;
                (volume, dominant)
            }
            None if self.params.fallback_enabled => fallback_levels(&self.params, t),
            None => (0.0, 0.0),
        };

        let previous = self.features.smoothed_volume;
        let smoothed =
            (previous + (volume - previous) * self.params.smoothing).clamp(0.0, 1.0);

        let beat = self.beat.observe(smoothed, dt);

        self.features = Features {
            volume,
            smoothed_volume: smoothed,
            previous_smoothed_volume: previous,
            dominant_frequency_ratio: dominant,
            beat_cooldown: self.beat.cooldown(),
            live: live.is_some(),
        };
        beat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn frame_with_mean(mean: u8) -> AudioFrame {
        AudioFrame::new(vec![mean; 128])
    }

    #[test]
    fn test_volume_gain_and_clamp() {
        let mut extractor = FeatureExtractor::new(FeatureParams::default());
        extractor.update(Some(&frame_with_mean(17)), 0.0, 0.016);
        // 17 / 255 * 3 = 0.2
        assert!((extractor.features().volume - 0.2).abs() < 1e-5);

        extractor.update(Some(&frame_with_mean(200)), 0.0, 0.016);
        assert_eq!(extractor.features().volume, 1.0);
    }

    #[test]
    fn test_smoothing_is_first_order_low_pass() {
        let mut extractor = FeatureExtractor::new(FeatureParams::default());
        let loud = frame_with_mean(255);
        extractor.update(Some(&loud), 0.0, 0.016);
        assert!((extractor.features().smoothed_volume - 0.2).abs() < 1e-5);
        extractor.update(Some(&loud), 0.0, 0.016);
        assert!((extractor.features().smoothed_volume - 0.36).abs() < 1e-5);
        assert!((extractor.features().previous_smoothed_volume - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_dominant_frequency_ratio() {
        let mut bins = vec![0u8; 128];
        bins[32] = 255;
        let mut extractor = FeatureExtractor::new(FeatureParams::default());
        extractor.update(Some(&AudioFrame::new(bins)), 0.0, 0.016);
        assert!((extractor.features().dominant_frequency_ratio - 0.25).abs() < 1e-6);
        assert!(extractor.features().live);
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let params = FeatureParams::default();
        assert_eq!(fallback_levels(&params, 12.5), fallback_levels(&params, 12.5));

        let (volume, dominant) = fallback_levels(&params, 0.0);
        assert!((volume - 0.3).abs() < 1e-6);
        assert!((dominant - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_empty_frame_uses_fallback() {
        let mut extractor = FeatureExtractor::new(FeatureParams::default());
        extractor.update(Some(&AudioFrame::default()), 0.0, 0.016);
        assert!(!extractor.features().live);
        assert!((extractor.features().volume - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_disabled_fallback_is_silent() {
        let params = FeatureParams {
            fallback_enabled: false,
            ..FeatureParams::default()
        };
        let mut extractor = FeatureExtractor::new(params);
        for _ in 0..10 {
            assert!(extractor.update(None, 1.0, 0.016).is_none());
        }
        assert_eq!(extractor.features().smoothed_volume, 0.0);
    }

    #[test]
    fn test_beat_jump_spawns_expected_count() {
        let mut detector = BeatDetector::new(&FeatureParams::default());
        assert!(detector.observe(0.2, 0.016).is_none());
        assert_eq!(detector.observe(0.5, 0.016), Some(BeatEvent { count: 4 }));
        assert!((detector.cooldown() - 0.12).abs() < 1e-6);
    }

    #[test]
    fn test_beat_is_edge_triggered_until_cooldown_elapses() {
        let mut detector = BeatDetector::new(&FeatureParams::default());
        let dt = 0.01;
        let mut level = 0.3;
        let mut fired = Vec::new();
        for tick in 0..12 {
            level += 0.1;
            if detector.observe(level, dt).is_some() {
                fired.push(tick);
            }
        }
        // first tick above threshold fires; the next 11 ticks (0.11 s) are inside the cooldown
        assert_eq!(fired, vec![0]);

        for _ in 0..3 {
            level += 0.1;
            detector.observe(level, dt);
        }
        assert!(detector.cooldown() < 0.12);
    }

    #[test]
    fn test_beat_refires_after_cooldown() {
        let mut detector = BeatDetector::new(&FeatureParams::default());
        assert!(detector.observe(0.2, 0.0).is_none());
        assert!(detector.observe(0.4, 0.0).is_some());
        assert!(detector.observe(0.2, 0.2).is_none());
        assert!(detector.observe(0.4, 0.0).is_some());
    }

    proptest! {
        #[test]
        fn prop_features_stay_in_unit_range(
            bins in proptest::collection::vec(any::<u8>(), 1..256),
            t in 0.0f32..1000.0,
            dt in 0.0f32..0.05,
        ) {
            let mut extractor = FeatureExtractor::new(FeatureParams::default());
            let frame = AudioFrame::new(bins);
            for _ in 0..5 {
                extractor.update(Some(&frame), t, dt);
                let f = extractor.features();
                prop_assert!((0.0..=1.0).contains(&f.volume));
                prop_assert!((0.0..=1.0).contains(&f.smoothed_volume));
                prop_assert!((0.0..=1.0).contains(&f.dominant_frequency_ratio));
                prop_assert!(f.beat_cooldown >= 0.0);
            }
        }
    }
}

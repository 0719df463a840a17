//! Simulation parameters for features, orb, particles, bursts and waves.

/// Feature extraction parameters (volume, smoothing, beat trigger)
#[derive(Debug, Clone)]
pub struct FeatureParams {
    /// Gain applied to mean magnitude before clamping to [0, 1]
    /// Compensates for quiet microphone input
    pub volume_gain: f32,

    /// Exponential smoothing factor for volume (fraction per tick)
    pub smoothing: f32,

    /// Smoothed volume that must be exceeded for a beat
    pub beat_threshold: f32,

    /// Per-tick rise of smoothed volume required for a beat
    pub beat_min_rise: f32,

    /// Refractory period after a beat (seconds)
    pub beat_cooldown_s: f32,

    /// Bursts per beat = base + floor(smoothed_volume * scale)
    pub beat_burst_base: usize,
    pub beat_burst_scale: f32,

    /// Use the synthetic oscillator when no audio feed is available
    /// Disabled = silence
    pub fallback_enabled: bool,

    /// Fallback volume = offset + depth * (0.5 + 0.5 * sin(rate * t))
    pub fallback_volume_offset: f32,
    pub fallback_volume_depth: f32,
    /// Angular rate (rad/s)
    pub fallback_volume_rate: f32,

    /// Fallback dominant frequency = (0.5 + 0.5 * sin(rate * t)) * span
    pub fallback_frequency_span: f32,
    /// Angular rate (rad/s)
    pub fallback_frequency_rate: f32,
}

impl Default for FeatureParams {
    fn default() -> Self {
        Self {
            volume_gain: 3.0,
            smoothing: 0.2,
            beat_threshold: 0.35,
            beat_min_rise: 0.08,
            beat_cooldown_s: 0.12,
            beat_burst_base: 2,
            beat_burst_scale: 5.0,
            fallback_enabled: true,
            fallback_volume_offset: 0.2,
            fallback_volume_depth: 0.2,
            fallback_volume_rate: 1.5,
            fallback_frequency_span: 0.8,
            fallback_frequency_rate: 0.3,
        }
    }
}

/// How the orb hue approaches its target across the 0/360 seam
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HuePath {
    /// Plain linear interpolation; may travel the long way round
    #[default]
    Linear,
    /// Interpolate along the shorter arc of the hue circle
    Shortest,
}

/// Central orb parameters
#[derive(Debug, Clone)]
pub struct OrbParams {
    /// Resting radius (pixels)
    pub base_radius: f32,

    /// Extra radius at full smoothed volume (pixels)
    pub volume_radius: f32,

    /// Fraction of the remaining distance covered per tick
    pub easing: f32,

    /// Hue at session start (degrees)
    pub initial_hue: f32,

    pub hue_path: HuePath,
}

impl Default for OrbParams {
    fn default() -> Self {
        Self {
            base_radius: 100.0,
            volume_radius: 140.0,
            easing: 0.1,
            initial_hue: 200.0,
            hue_path: HuePath::Linear,
        }
    }
}

/// Particle system parameters
#[derive(Debug, Clone)]
pub struct ParticleParams {
    /// Maximum live particles (oldest evicted first)
    pub capacity: usize,

    /// Smoothed volume above which particles are emitted
    pub emit_threshold: f32,

    /// Particles per tick = floor(smoothed_volume * emit_scale)
    pub emit_scale: f32,

    /// Launch speed = min + random * spread (pixels per tick)
    pub speed_min: f32,
    pub speed_spread: f32,

    /// Lifetime (ticks)
    pub life_ticks: u32,

    /// Size = min + random * spread (pixels)
    pub size_min: f32,
    pub size_spread: f32,

    /// Glow halo width (pixels)
    pub glow_px: f32,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            capacity: 250,
            emit_threshold: 0.04,
            emit_scale: 6.0,
            speed_min: 2.0,
            speed_spread: 4.0,
            life_ticks: 60,
            size_min: 2.0,
            size_spread: 3.0,
            glow_px: 8.0,
        }
    }
}

/// Beat burst parameters
#[derive(Debug, Clone)]
pub struct BurstParams {
    /// Maximum live bursts (oldest evicted first)
    pub capacity: usize,

    /// Spawn distance from centre as fraction of the shorter viewport side
    pub min_distance_frac: f32,
    pub max_distance_frac: f32,

    /// Random hue offset range (± degrees)
    pub hue_jitter_deg: f32,

    /// Hue stagger between bursts of one beat (degrees)
    pub hue_stagger_deg: f32,

    /// Lifetime = min + random * spread (seconds)
    pub life_min_s: f32,
    pub life_spread_s: f32,

    /// Final radius as fraction of the viewport diagonal
    pub radius_min_frac: f32,
    pub radius_spread_frac: f32,

    /// Share of the orb hue mixed into the gradient hue
    pub orb_hue_mix: f32,
}

impl Default for BurstParams {
    fn default() -> Self {
        Self {
            capacity: 40,
            min_distance_frac: 0.15,
            max_distance_frac: 0.45,
            hue_jitter_deg: 60.0,
            hue_stagger_deg: 15.0,
            life_min_s: 0.8,
            life_spread_s: 0.5,
            radius_min_frac: 0.25,
            radius_spread_frac: 0.3,
            orb_hue_mix: 0.05,
        }
    }
}

/// Analytic wave field parameters
#[derive(Debug, Clone)]
pub struct WaveParams {
    /// Rings = base + floor(v * extra)
    pub ring_base_count: usize,
    pub ring_extra_count: f32,
    /// Innermost ring radius (pixels)
    pub ring_min_radius: f32,
    /// Ring travel as fraction of the viewport diagonal
    pub ring_travel_frac: f32,
    /// Hue offset per ring (degrees)
    pub ring_hue_step_deg: f32,

    /// Horizontal band count (baselines at height * (j+1) / (count+1))
    pub horizontal_bands: usize,
    /// Vertical band count
    pub vertical_bands: usize,

    /// Sample spacing along a band (pixels)
    pub band_step_px: f32,
    /// Bands extend past the viewport edge by this much (pixels)
    pub band_overscan_px: f32,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            ring_base_count: 5,
            ring_extra_count: 5.0,
            ring_min_radius: 40.0,
            ring_travel_frac: 0.55,
            ring_hue_step_deg: 24.0,
            horizontal_bands: 6,
            vertical_bands: 3,
            band_step_px: 14.0,
            band_overscan_px: 40.0,
        }
    }
}

/// Everything a session needs to simulate and composite
#[derive(Debug, Clone, Default)]
pub struct SessionParams {
    pub features: FeatureParams,
    pub orb: OrbParams,
    pub particles: ParticleParams,
    pub bursts: BurstParams,
    pub waves: WaveParams,
    pub compositor: super::CompositorParams,
    pub ascii: super::AsciiParams,
}

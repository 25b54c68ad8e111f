//! Data-driven game balance
//!
//! Every gameplay constant lives here so balance can be adjusted from JSON
//! without touching the simulation. Defaults reproduce the canonical arcade
//! feel; every section is `#[serde(default)]` so a partial override such as
//! `{"spawn": {"danger_chance": 0.2}}` only changes what it names.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};
use crate::sim::EntityKind;

/// Complete balance sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Play area width in pixels
    pub area_width: f32,
    /// Play area height in pixels
    pub area_height: f32,
    pub spawn: SpawnTuning,
    pub difficulty: DifficultyTuning,
    pub scoring: ScoringTuning,
    pub particles: ParticleTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            area_width: DEFAULT_AREA_WIDTH,
            area_height: DEFAULT_AREA_HEIGHT,
            spawn: SpawnTuning::default(),
            difficulty: DifficultyTuning::default(),
            scoring: ScoringTuning::default(),
            particles: ParticleTuning::default(),
        }
    }
}

/// Spawning, placement, and motion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Target diameter in pixels
    pub entity_size: f32,
    /// Extra clearance required between spawn points
    pub overlap_buffer: f32,
    /// Placement retries before accepting an overlapping candidate
    pub max_attempts: u32,
    /// How far past an edge a target may travel before wrapping
    pub wrap_margin: f32,
    /// Spawns are dropped once the live count exceeds this
    pub max_entities: usize,
    /// Probability a spawn is a bonus target
    pub bonus_chance: f32,
    /// Probability a spawn is a danger target
    pub danger_chance: f32,
    /// Total spread (radians) of the heading around the center direction
    pub aim_jitter: f32,
    /// Chance per reference frame that a danger target sheds trail particles
    pub danger_trail_chance: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            entity_size: 70.0,
            overlap_buffer: 25.0,
            max_attempts: 50,
            wrap_margin: 80.0,
            max_entities: 30,
            bonus_chance: 0.12,
            danger_chance: 0.30,
            aim_jitter: 0.8,
            danger_trail_chance: 0.25,
        }
    }
}

/// Level-driven pacing. Speeds are pixels per second, durations milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTuning {
    pub base_speed: f32,
    /// Added to base speed on every level-up
    pub speed_increment: f32,
    /// Added per level on top of the kind-scaled speed
    pub level_speed_bonus: f32,
    pub regular_speed_factor: f32,
    pub bonus_speed_factor: f32,
    pub danger_speed_factor: f32,

    pub target_lifetime_ms: u32,
    pub lifetime_decrement_ms: u32,
    pub lifetime_floor_ms: u32,
    /// Bonus targets vanish this much sooner than regular ones
    pub bonus_lifetime_offset_ms: u32,
    /// Danger targets vanish this much sooner than regular ones
    pub danger_lifetime_offset_ms: u32,
    /// Per-level reduction applied to every countdown
    pub lifetime_level_step_ms: u32,
    /// No countdown is ever shorter than this
    pub min_countdown_ms: u32,

    /// Spawn interval before the first level-up
    pub initial_spawn_interval_ms: u32,
    pub base_spawn_interval_ms: u32,
    pub spawn_interval_step_ms: u32,
    pub spawn_interval_floor_ms: u32,
}

impl Default for DifficultyTuning {
    fn default() -> Self {
        // 1.2 px/frame base, +0.15 per level, at 60 Hz
        Self {
            base_speed: 1.2 * REFERENCE_FPS,
            speed_increment: 0.15 * REFERENCE_FPS,
            level_speed_bonus: 0.15 * REFERENCE_FPS,
            regular_speed_factor: 1.0,
            bonus_speed_factor: 1.3,
            danger_speed_factor: 1.8,

            target_lifetime_ms: 3500,
            lifetime_decrement_ms: 180,
            lifetime_floor_ms: 2000,
            bonus_lifetime_offset_ms: 200,
            danger_lifetime_offset_ms: 400,
            lifetime_level_step_ms: 60,
            min_countdown_ms: 1500,

            initial_spawn_interval_ms: 1600,
            base_spawn_interval_ms: 1600,
            spawn_interval_step_ms: 50,
            spawn_interval_floor_ms: 900,
        }
    }
}

impl DifficultyTuning {
    /// Speed multiplier for a target kind
    pub fn speed_factor(&self, kind: EntityKind) -> f32 {
        match kind {
            EntityKind::Regular => self.regular_speed_factor,
            EntityKind::Bonus => self.bonus_speed_factor,
            EntityKind::Danger => self.danger_speed_factor,
        }
    }

    /// How much sooner than a regular target this kind expires
    pub fn lifetime_offset_ms(&self, kind: EntityKind) -> u32 {
        match kind {
            EntityKind::Regular => 0,
            EntityKind::Bonus => self.bonus_lifetime_offset_ms,
            EntityKind::Danger => self.danger_lifetime_offset_ms,
        }
    }
}

/// One step of the combo multiplier table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComboTier {
    /// Minimum combo (inclusive) for this tier
    pub min_combo: u32,
    pub multiplier: f32,
}

/// Points, combo, and lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTuning {
    pub start_lives: u32,
    pub regular_points: u32,
    pub bonus_points: u32,
    pub regular_combo_gain: u32,
    pub bonus_combo_gain: u32,
    /// Sorted by `min_combo` descending; first match wins
    pub combo_tiers: Vec<ComboTier>,
    pub points_per_level: u64,
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            start_lives: START_LIVES,
            regular_points: 1,
            bonus_points: 5,
            regular_combo_gain: 1,
            bonus_combo_gain: 2,
            combo_tiers: vec![
                ComboTier { min_combo: 15, multiplier: 3.0 },
                ComboTier { min_combo: 8, multiplier: 2.0 },
                ComboTier { min_combo: 3, multiplier: 1.5 },
            ],
            points_per_level: POINTS_PER_LEVEL,
        }
    }
}

impl ScoringTuning {
    /// Multiplier for the combo at the moment of interaction
    pub fn multiplier(&self, combo: u32) -> f32 {
        self.combo_tiers
            .iter()
            .find(|tier| combo >= tier.min_combo)
            .map(|tier| tier.multiplier)
            .unwrap_or(1.0)
    }
}

/// Burst physics. Per-second rates derived from 60 Hz per-frame values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTuning {
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Life lost per second
    pub life_decay: f32,
    /// Size multiplier applied once per reference frame
    pub shrink_per_frame: f32,
    /// Slowest burst speed (px/s) before size scaling
    pub min_speed: f32,
    /// Random extra speed on top of `min_speed`
    pub speed_spread: f32,
    pub initial_life: f32,
    pub min_size: f32,
    pub size_spread: f32,
    /// Particles this far below the area are pruned
    pub bottom_margin: f32,
    pub max_particles: usize,
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            gravity: 0.1 * REFERENCE_FPS * REFERENCE_FPS,
            life_decay: 0.015 * REFERENCE_FPS,
            shrink_per_frame: 0.96,
            min_speed: 2.0 * REFERENCE_FPS,
            speed_spread: 3.0 * REFERENCE_FPS,
            initial_life: 0.8,
            min_size: 6.0,
            size_spread: 6.0,
            bottom_margin: 50.0,
            max_particles: 2000,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON balance sheet and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let mut tuning: Tuning = serde_json::from_str(json)?;
        tuning.normalize();
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Sort the combo table so lookups can take the first match
    pub fn normalize(&mut self) {
        self.scoring
            .combo_tiers
            .sort_by(|a, b| b.min_combo.cmp(&a.min_combo));
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.area_width <= 0.0 || self.area_height <= 0.0 {
            return Err(Error::config("play area must have positive dimensions"));
        }
        let spawn = &self.spawn;
        if spawn.entity_size <= 0.0 || spawn.entity_size >= self.area_width.min(self.area_height) {
            return Err(Error::config("entity size must fit inside the play area"));
        }
        if spawn.wrap_margin < spawn.entity_size {
            return Err(Error::config("wrap margin must be at least the entity size"));
        }
        if spawn.max_attempts == 0 {
            return Err(Error::config("placement needs at least one attempt"));
        }
        for (name, chance) in [
            ("bonus_chance", spawn.bonus_chance),
            ("danger_chance", spawn.danger_chance),
            ("danger_trail_chance", spawn.danger_trail_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(Error::config(format!("{name} must be within [0, 1]")));
            }
        }
        if spawn.bonus_chance + spawn.danger_chance > 1.0 {
            return Err(Error::config("bonus and danger chances exceed 1"));
        }

        let diff = &self.difficulty;
        if diff.base_speed < 0.0 || diff.speed_increment < 0.0 || diff.level_speed_bonus < 0.0 {
            return Err(Error::config("speeds must be non-negative"));
        }
        if diff.lifetime_floor_ms > diff.target_lifetime_ms {
            return Err(Error::config("lifetime floor exceeds starting lifetime"));
        }
        if diff.min_countdown_ms == 0 {
            return Err(Error::config("minimum countdown must be positive"));
        }
        if diff.spawn_interval_floor_ms == 0
            || diff.spawn_interval_floor_ms > diff.base_spawn_interval_ms
            || diff.initial_spawn_interval_ms == 0
        {
            return Err(Error::config("spawn intervals must be positive and above their floor"));
        }

        let scoring = &self.scoring;
        if scoring.start_lives == 0 {
            return Err(Error::config("a session needs at least one life"));
        }
        if scoring.points_per_level == 0 {
            return Err(Error::config("points_per_level must be positive"));
        }
        if scoring.combo_tiers.iter().any(|t| t.multiplier < 1.0) {
            return Err(Error::config("combo multipliers must be at least 1"));
        }
        if scoring
            .combo_tiers
            .windows(2)
            .any(|w| w[0].min_combo < w[1].min_combo)
        {
            return Err(Error::config("combo tiers must be sorted by threshold, highest first"));
        }

        let particles = &self.particles;
        if particles.initial_life <= 0.0 || particles.initial_life > 1.0 {
            return Err(Error::config("particle life must be within (0, 1]"));
        }
        if particles.life_decay <= 0.0 {
            return Err(Error::config("particle life must decay"));
        }
        if !(0.0..=1.0).contains(&particles.shrink_per_frame) {
            return Err(Error::config("shrink_per_frame must be within [0, 1]"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        Tuning::default().validate().unwrap();
    }

    #[test]
    fn test_default_multiplier_table() {
        let scoring = ScoringTuning::default();
        assert_eq!(scoring.multiplier(0), 1.0);
        assert_eq!(scoring.multiplier(2), 1.0);
        assert_eq!(scoring.multiplier(3), 1.5);
        assert_eq!(scoring.multiplier(7), 1.5);
        assert_eq!(scoring.multiplier(8), 2.0);
        assert_eq!(scoring.multiplier(14), 2.0);
        assert_eq!(scoring.multiplier(15), 3.0);
        assert_eq!(scoring.multiplier(100), 3.0);
    }

    #[test]
    fn test_partial_json_override() {
        let tuning = Tuning::from_json(r#"{"spawn": {"danger_chance": 0.1}}"#).unwrap();
        assert_eq!(tuning.spawn.danger_chance, 0.1);
        assert_eq!(tuning.spawn.bonus_chance, SpawnTuning::default().bonus_chance);
        assert_eq!(tuning.difficulty, DifficultyTuning::default());
    }

    #[test]
    fn test_json_tiers_are_sorted() {
        let json = r#"{"scoring": {"combo_tiers": [
            {"min_combo": 2, "multiplier": 1.25},
            {"min_combo": 10, "multiplier": 4.0}
        ]}}"#;
        let tuning = Tuning::from_json(json).unwrap();
        assert_eq!(tuning.scoring.combo_tiers[0].min_combo, 10);
        assert_eq!(tuning.scoring.multiplier(12), 4.0);
        assert_eq!(tuning.scoring.multiplier(5), 1.25);
        assert_eq!(tuning.scoring.multiplier(1), 1.0);
    }

    #[test]
    fn test_rejects_bad_chances() {
        let err = Tuning::from_json(r#"{"spawn": {"bonus_chance": 0.6, "danger_chance": 0.6}}"#);
        assert!(matches!(err, Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(Tuning::from_json("{"), Err(Error::Serialization(_))));
    }

    #[test]
    fn test_json_roundtrip_preserves_defaults() {
        let json = Tuning::default().to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), Tuning::default());
    }
}

//! Session state and core simulation types
//!
//! Everything the presentation layer reads between ticks lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::audio::{MusicCue, SoundEffect};
use crate::consts::START_LEVEL;
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first start
    #[default]
    Idle,
    /// Cadences active, accepting interactions
    Running,
    /// Everything frozen, deadlines suspended
    Paused,
    /// Lives exhausted; only `start` leaves this phase
    Ended,
}

/// Target kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Regular,
    /// Worth more, moves faster, expires sooner
    Bonus,
    /// Costs a life when clicked or when allowed to escape
    Danger,
}

impl EntityKind {
    /// Burst color used when this kind is clicked
    pub fn burst_color(&self) -> u32 {
        match self {
            EntityKind::Regular => 0xff7b7b,
            EntityKind::Bonus => 0xffd700,
            EntityKind::Danger => 0xff0000,
        }
    }
}

/// Stable entity identifier, unique within a session
pub type EntityId = u32;

/// Play area edge a target entered from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];
}

/// Why a target left the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemoveReason {
    Clicked,
    Expired,
}

/// A live target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Top-left corner in play-area pixels
    pub pos: Vec2,
    /// Pixels per second
    pub vel: Vec2,
    /// Diameter in pixels
    pub size: f32,
    /// Registry clock (ms) at spawn
    pub spawned_at_ms: f64,
    /// Registry clock (ms) at which the target escapes
    pub deadline_ms: f64,
}

impl Entity {
    /// Center point (origin for bursts)
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Packed 0xRRGGBB
    pub color: u32,
    /// 0-1, decreases over time
    pub life: f32,
    pub size: f32,
}

/// Draw-ready particle data for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParticleSnapshot {
    pub pos: Vec2,
    pub color: u32,
    /// Opacity; equals remaining life
    pub alpha: f32,
    /// Fill radius
    pub radius: f32,
    /// Shadow blur radius, proportional to size
    pub glow: f32,
}

/// Difficulty label shown next to the level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyTag {
    Normal,
    Medium,
    Hard,
}

impl DifficultyTag {
    pub fn for_level(level: u32) -> Self {
        if level >= 5 {
            DifficultyTag::Hard
        } else if level >= 3 {
            DifficultyTag::Medium
        } else {
            DifficultyTag::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTag::Normal => "NORMAL",
            DifficultyTag::Medium => "MEDIUM",
            DifficultyTag::Hard => "HARD",
        }
    }
}

/// Challenge-line messages for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum StatusMessage {
    Hit { points: u64, multiplier: f32 },
    Bonus { points: u64 },
    DangerHit,
    DangerEscaped,
    Missed,
    LevelUp(u32),
}

impl std::fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusMessage::Hit { points, multiplier } => write!(f, "+{points} ({multiplier}x)"),
            StatusMessage::Bonus { points } => write!(f, "BONUS! +{points}"),
            StatusMessage::DangerHit => write!(f, "DANGER! -1 LIFE"),
            StatusMessage::DangerEscaped => write!(f, "DANGER ESCAPED! -1 LIFE"),
            StatusMessage::Missed => write!(f, "Missed..."),
            StatusMessage::LevelUp(level) => write!(f, "LEVEL {level}!"),
        }
    }
}

/// Final numbers published when a session ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverStats {
    pub score: u64,
    pub level: u32,
    pub max_combo: u32,
    pub elapsed_seconds: u32,
    /// Whether this run replaced the stored best score
    pub new_best: bool,
}

/// Everything the engine reports to the outside world, in emission order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    ScoreChanged(u64),
    LivesChanged(u32),
    ComboChanged(u32),
    LevelChanged(u32),
    /// Elapsed whole seconds
    Tick(u32),
    GameOver(GameOverStats),
    Sound(SoundEffect),
    Music(MusicCue),
    Status(StatusMessage),
}

/// Per-session mutable numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub elapsed_seconds: u32,
    /// Pixels per second before kind and level adjustments
    pub base_speed: f32,
    pub spawn_interval_ms: u32,
    pub target_lifetime_ms: u32,
    pub phase: GamePhase,
}

impl SessionState {
    /// Fresh state for a new run
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            lives: tuning.scoring.start_lives,
            level: START_LEVEL,
            combo: 0,
            max_combo: 0,
            elapsed_seconds: 0,
            base_speed: tuning.difficulty.base_speed,
            spawn_interval_ms: tuning.difficulty.initial_spawn_interval_ms,
            target_lifetime_ms: tuning.difficulty.target_lifetime_ms,
            phase: GamePhase::Idle,
        }
    }

    /// Points earned toward the next level (0..points_per_level)
    pub fn level_progress(&self, points_per_level: u64) -> u64 {
        self.score % points_per_level
    }

    /// Combo meter fill, saturating at a combo of 20
    pub fn combo_meter(&self) -> f32 {
        (self.combo as f32 / 20.0).min(1.0)
    }

    /// Combo high enough for the "hot" HUD styling
    pub fn combo_is_hot(&self) -> bool {
        self.combo >= 10
    }

    pub fn difficulty_tag(&self) -> DifficultyTag {
        DifficultyTag::for_level(self.level)
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }
}

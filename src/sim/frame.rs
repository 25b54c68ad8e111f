//! Per-frame render surface
//!
//! Everything the presentation layer needs to draw one frame, by value.

use glam::Vec2;
use serde::Serialize;

use super::state::{DifficultyTag, Entity, EntityId, EntityKind, GamePhase, ParticleSnapshot};

/// One target as the renderer sees it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
}

impl From<&Entity> for EntitySnapshot {
    fn from(e: &Entity) -> Self {
        Self {
            id: e.id,
            kind: e.kind,
            pos: e.pos,
            size: e.size,
        }
    }
}

/// Heads-up display values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub phase: GamePhase,
    pub score: u64,
    pub best_score: u64,
    pub lives: u32,
    pub level: u32,
    pub difficulty: DifficultyTag,
    pub combo: u32,
    pub max_combo: u32,
    /// 0-1 fill of the combo meter
    pub combo_meter: f32,
    pub combo_hot: bool,
    /// Points toward the next level
    pub level_progress: u64,
    pub points_per_level: u64,
    /// `mm:ss`
    pub elapsed: String,
    pub live_targets: usize,
    /// Current regular-target lifetime in seconds
    pub target_lifetime_secs: f32,
    pub muted: bool,
}

/// Complete draw list for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub entities: Vec<EntitySnapshot>,
    pub particles: Vec<ParticleSnapshot>,
    pub hud: Hud,
}

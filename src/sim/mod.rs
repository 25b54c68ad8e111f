//! Simulation module
//!
//! All gameplay logic lives here. Nothing in this module renders or touches
//! the platform:
//! - Time only moves through `GameSession::tick`
//! - Randomness comes from the session's seeded RNG
//! - Targets iterate in registration (id) order
//! - Side effects leave as `GameEvent`s

pub mod cadence;
pub mod difficulty;
pub mod frame;
pub mod particles;
pub mod placement;
pub mod registry;
pub mod scoring;
pub mod session;
pub mod state;
pub mod tick;

pub use cadence::Cadence;
pub use difficulty::DifficultyController;
pub use frame::{EntitySnapshot, Hud, RenderFrame};
pub use particles::ParticleSystem;
pub use placement::{Placement, PlacementPlanner};
pub use registry::EntityRegistry;
pub use scoring::{ScoreOutcome, ScoringEngine};
pub use session::{GameSession, SessionObserver};
pub use state::{
    DifficultyTag, Edge, Entity, EntityId, EntityKind, GameEvent, GameOverStats, GamePhase,
    Particle, ParticleSnapshot, RemoveReason, SessionState, StatusMessage,
};
pub use tick::FixedStep;

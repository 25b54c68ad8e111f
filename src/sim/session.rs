//! Game session state machine
//!
//! `Idle -> Running <-> Paused -> Ended -> Running ...`
//!
//! The session owns the state, the registry, the particles, and the cadences.
//! The host calls [`GameSession::tick`] once per display frame; within a tick
//! the order is motion, expiry, spawn, elapsed time, particles. Commands that
//! make no sense in the current phase are ignored.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::cadence::Cadence;
use super::difficulty::DifficultyController;
use super::frame::{EntitySnapshot, Hud, RenderFrame};
use super::particles::ParticleSystem;
use super::placement::PlacementPlanner;
use super::registry::EntityRegistry;
use super::scoring::{ScoreOutcome, ScoringEngine};
use super::state::{
    Entity, EntityId, EntityKind, GameEvent, GameOverStats, GamePhase, ParticleSnapshot,
    RemoveReason, SessionState, StatusMessage,
};
use crate::audio::{MusicCue, SoundEffect};
use crate::consts::REFERENCE_FPS;
use crate::persistence::{self, BestScoreStore, MemoryStore};
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Trail bursts shed by danger targets while they move
const DANGER_TRAIL_COLOR: u32 = 0x8b0000;
const DANGER_TRAIL_COUNT: u32 = 2;
const DANGER_TRAIL_SCALE: f32 = 0.6;

/// Secondary burst layered over a clicked danger target
const DANGER_EMBER_COLOR: u32 = 0xff8800;

/// Receives session events. Every method defaults to a no-op.
pub trait SessionObserver {
    fn on_start(&mut self) {}
    fn on_pause(&mut self) {}
    fn on_resume(&mut self) {}
    fn on_score_changed(&mut self, _score: u64) {}
    fn on_lives_changed(&mut self, _lives: u32) {}
    fn on_combo_changed(&mut self, _combo: u32) {}
    fn on_level_changed(&mut self, _level: u32) {}
    fn on_tick(&mut self, _elapsed_seconds: u32) {}
    fn on_game_over(&mut self, _stats: GameOverStats) {}
    fn on_sound(&mut self, _effect: SoundEffect) {}
    fn on_music(&mut self, _cue: MusicCue) {}
    fn on_status(&mut self, _message: StatusMessage) {}

    /// Route one event to its callback
    fn on_event(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::Started => self.on_start(),
            GameEvent::Paused => self.on_pause(),
            GameEvent::Resumed => self.on_resume(),
            GameEvent::ScoreChanged(score) => self.on_score_changed(score),
            GameEvent::LivesChanged(lives) => self.on_lives_changed(lives),
            GameEvent::ComboChanged(combo) => self.on_combo_changed(combo),
            GameEvent::LevelChanged(level) => self.on_level_changed(level),
            GameEvent::Tick(seconds) => self.on_tick(seconds),
            GameEvent::GameOver(stats) => self.on_game_over(stats),
            GameEvent::Sound(effect) => self.on_sound(effect),
            GameEvent::Music(cue) => self.on_music(cue),
            GameEvent::Status(message) => self.on_status(message),
        }
    }
}

/// One game, from start to game over (and any number of restarts)
pub struct GameSession {
    tuning: Tuning,
    state: SessionState,
    registry: EntityRegistry,
    particles: ParticleSystem,
    planner: PlacementPlanner,
    scoring: ScoringEngine,
    difficulty: DifficultyController,
    spawn_cadence: Cadence,
    clock_cadence: Cadence,
    rng: Pcg32,
    store: Box<dyn BestScoreStore>,
    best_score: u64,
    muted: bool,
    /// Targets spawned since the last start
    spawned: u32,
    last_game_over: Option<GameOverStats>,
    events: Vec<GameEvent>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("state", &self.state)
            .field("live_targets", &self.registry.len())
            .field("particles", &self.particles.len())
            .field("best_score", &self.best_score)
            .finish_non_exhaustive()
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(Tuning::default(), Box::new(MemoryStore::new()))
    }
}

impl GameSession {
    /// Create an idle session with an entropy-seeded random source
    pub fn new(tuning: Tuning, store: Box<dyn BestScoreStore>) -> Self {
        let rng = Pcg32::from_rng(&mut rand::rng());
        Self::with_rng(tuning, store, rng)
    }

    /// Create an idle session with a reproducible random source
    pub fn with_seed(tuning: Tuning, store: Box<dyn BestScoreStore>, seed: u64) -> Self {
        Self::with_rng(tuning, store, Pcg32::seed_from_u64(seed))
    }

    fn with_rng(tuning: Tuning, store: Box<dyn BestScoreStore>, rng: Pcg32) -> Self {
        let best_score = persistence::load_or_default(&*store);
        log::info!("Session created (best score {})", best_score);
        Self {
            state: SessionState::new(&tuning),
            registry: EntityRegistry::new(&tuning),
            particles: ParticleSystem::new(&tuning),
            planner: PlacementPlanner::from_tuning(&tuning),
            scoring: ScoringEngine::new(&tuning),
            difficulty: DifficultyController::new(&tuning),
            spawn_cadence: Cadence::new(tuning.difficulty.initial_spawn_interval_ms),
            clock_cadence: Cadence::new(1000),
            rng,
            store,
            best_score,
            muted: false,
            spawned: 0,
            last_game_over: None,
            events: Vec::new(),
            tuning,
        }
    }

    // === Commands ===

    /// Begin a fresh run. Ignored while a run is in progress.
    pub fn start(&mut self) {
        if matches!(self.state.phase, GamePhase::Running | GamePhase::Paused) {
            log::debug!("start ignored: session already {:?}", self.state.phase);
            return;
        }

        self.state = SessionState::new(&self.tuning);
        self.state.phase = GamePhase::Running;
        self.registry.clear();
        self.particles.clear();
        self.scoring.reset();
        self.spawn_cadence = Cadence::new(self.state.spawn_interval_ms);
        self.clock_cadence = Cadence::new(1000);
        self.spawned = 0;

        log::info!("Game started");
        self.emit(GameEvent::Started);
        self.emit(GameEvent::ScoreChanged(self.state.score));
        self.emit(GameEvent::LivesChanged(self.state.lives));
        self.emit(GameEvent::ComboChanged(self.state.combo));
        self.emit(GameEvent::LevelChanged(self.state.level));
        self.emit(GameEvent::Tick(self.state.elapsed_seconds));
        if !self.muted {
            self.emit(GameEvent::Music(MusicCue::Start));
        }
    }

    /// Freeze the run. Ignored unless running.
    pub fn pause(&mut self) {
        if self.state.phase != GamePhase::Running {
            log::debug!("pause ignored in {:?}", self.state.phase);
            return;
        }
        self.state.phase = GamePhase::Paused;
        log::info!("Paused at {}s", self.state.elapsed_seconds);
        self.emit(GameEvent::Paused);
        self.emit(GameEvent::Music(MusicCue::Pause));
    }

    /// Continue a paused run. Countdowns resume from where they stopped;
    /// the spawn cadence starts a fresh interval for the current level.
    pub fn resume(&mut self) {
        if self.state.phase != GamePhase::Paused {
            log::debug!("resume ignored in {:?}", self.state.phase);
            return;
        }
        self.state.phase = GamePhase::Running;
        self.state.spawn_interval_ms = self.difficulty.spawn_interval_ms(self.state.level);
        self.spawn_cadence.reschedule(self.state.spawn_interval_ms);
        self.clock_cadence.reschedule(1000);
        log::info!("Resumed");
        self.emit(GameEvent::Resumed);
        if !self.muted {
            self.emit(GameEvent::Music(MusicCue::Resume));
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.state.phase {
            GamePhase::Running => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => {}
        }
    }

    /// End the run from outside (e.g. the player quits)
    pub fn stop(&mut self) {
        self.finish();
    }

    /// Player clicked/tapped target `id`. Unknown or already-removed ids are ignored.
    pub fn interact(&mut self, id: EntityId) {
        if !self.state.is_running() {
            return;
        }
        let Some(entity) = self.registry.remove(id, RemoveReason::Clicked) else {
            log::debug!("interact ignored: no live target {}", id);
            return;
        };

        let outcome = self.scoring.on_interact(&mut self.state, entity.kind);
        self.burst_for_click(&entity);
        match entity.kind {
            EntityKind::Danger => {
                self.emit_sound(SoundEffect::Danger);
                self.emit(GameEvent::Status(StatusMessage::DangerHit));
            }
            EntityKind::Regular => {
                self.emit_sound(SoundEffect::Click);
                self.emit(GameEvent::Status(StatusMessage::Hit {
                    points: outcome.points,
                    multiplier: outcome.multiplier,
                }));
            }
            EntityKind::Bonus => {
                self.emit_sound(SoundEffect::Click);
                self.emit(GameEvent::Status(StatusMessage::Bonus {
                    points: outcome.points,
                }));
            }
        }
        self.apply_outcome(outcome);
    }

    /// Suppress or restore sound triggers
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Apply player preferences (mute and particle budget)
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_muted(settings.muted);
        self.particles
            .set_max_particles(settings.max_particles().min(self.tuning.particles.max_particles));
    }

    /// Spawn a target of a specific kind through the normal placement path.
    /// Ignored unless running.
    pub fn spawn(&mut self, kind: EntityKind) -> Option<EntityId> {
        if !self.state.is_running() {
            return None;
        }
        let placement = self.planner.plan(self.registry.all(), &mut self.rng);
        let speed = self.difficulty.speed_for(&self.state, kind);
        let center = Vec2::new(self.tuning.area_width, self.tuning.area_height) / 2.0;
        let vel = self
            .difficulty
            .launch_velocity(placement.pos, center, speed, &mut self.rng);
        let lifetime = self.difficulty.countdown_ms(&self.state, kind);

        let id = self.registry.spawn(kind, placement.pos, vel, lifetime)?;
        self.spawned += 1;
        log::trace!(
            "Spawned {:?} {} from {:?} ({} tries), {}ms",
            kind,
            id,
            placement.edge,
            placement.attempts,
            lifetime
        );
        Some(id)
    }

    // === Simulation ===

    /// Advance the simulation by `dt` seconds. Does nothing unless running.
    pub fn tick(&mut self, dt: f32) {
        if !self.state.is_running() || dt <= 0.0 {
            return;
        }
        let dt_ms = f64::from(dt) * 1000.0;

        // Motion
        self.registry.advance(dt);
        self.shed_danger_trails(dt);

        // Expiry
        for entity in self.registry.take_expired() {
            if !self.state.is_running() {
                break;
            }
            self.handle_expired(&entity);
        }
        if !self.state.is_running() {
            return;
        }

        // Spawning
        let due = self.spawn_cadence.advance(dt_ms);
        for _ in 0..due {
            let kind = self.difficulty.roll_kind(&mut self.rng);
            self.spawn(kind);
        }

        // Elapsed time
        let seconds = self.clock_cadence.advance(dt_ms);
        for _ in 0..seconds {
            self.state.elapsed_seconds += 1;
            self.emit(GameEvent::Tick(self.state.elapsed_seconds));
        }

        self.particles.update(dt);
    }

    fn handle_expired(&mut self, entity: &Entity) {
        let outcome = self.scoring.on_expire(&mut self.state, entity.kind);
        if entity.kind == EntityKind::Danger {
            self.emit_sound(SoundEffect::Miss);
            self.emit(GameEvent::Status(StatusMessage::DangerEscaped));
        } else {
            self.emit(GameEvent::Status(StatusMessage::Missed));
        }
        self.apply_outcome(outcome);
    }

    /// Publish what a scoring event changed and react to level-up / game over
    fn apply_outcome(&mut self, outcome: ScoreOutcome) {
        if outcome.score_changed() {
            self.emit(GameEvent::ScoreChanged(self.state.score));
        }
        if outcome.combo_changed {
            self.emit(GameEvent::ComboChanged(self.state.combo));
        }
        if outcome.life_lost {
            self.emit(GameEvent::LivesChanged(self.state.lives));
        }
        if let Some(level) = outcome.leveled_up {
            let interval = self.difficulty.level_up(&mut self.state, level);
            self.spawn_cadence.reschedule(interval);
            self.emit(GameEvent::LevelChanged(level));
            self.emit(GameEvent::Status(StatusMessage::LevelUp(level)));
        }
        if outcome.session_ended {
            self.finish();
        }
    }

    /// Transition to `Ended`. Runs at most once per run.
    fn finish(&mut self) {
        if !matches!(self.state.phase, GamePhase::Running | GamePhase::Paused) {
            return;
        }
        // Phase change first: the cadences stop being fed before anything is cleared
        self.state.phase = GamePhase::Ended;
        self.registry.clear();

        let new_best = self.state.score > self.best_score;
        if new_best {
            self.best_score = self.state.score;
            if let Err(e) = self.store.save(self.state.score) {
                log::warn!("Failed to save best score: {}", e);
            }
        }

        let stats = GameOverStats {
            score: self.state.score,
            level: self.state.level,
            max_combo: self.state.max_combo,
            elapsed_seconds: self.state.elapsed_seconds,
            new_best,
        };
        log::info!(
            "Game over: score {}, level {}, max combo {}, time {}{}",
            stats.score,
            stats.level,
            stats.max_combo,
            crate::format_elapsed(stats.elapsed_seconds),
            if new_best { " (new best)" } else { "" }
        );
        self.last_game_over = Some(stats);
        self.emit(GameEvent::Music(MusicCue::Stop));
        self.emit(GameEvent::GameOver(stats));
    }

    fn burst_for_click(&mut self, entity: &Entity) {
        let origin = entity.center();
        let color = entity.kind.burst_color();
        match entity.kind {
            EntityKind::Regular => self.particles.create_explosion(origin, color, 8, 1.0, &mut self.rng),
            EntityKind::Bonus => self.particles.create_explosion(origin, color, 16, 1.2, &mut self.rng),
            EntityKind::Danger => {
                self.particles.create_explosion(origin, color, 24, 1.2, &mut self.rng);
                self.particles
                    .create_explosion(origin, DANGER_EMBER_COLOR, 12, 0.8, &mut self.rng);
            }
        }
    }

    /// Danger targets occasionally leave a short smoke trail
    fn shed_danger_trails(&mut self, dt: f32) {
        let chance = (self.tuning.spawn.danger_trail_chance * dt * REFERENCE_FPS).min(1.0);
        if chance <= 0.0 {
            return;
        }
        for entity in self.registry.all() {
            if entity.kind == EntityKind::Danger && self.rng.random::<f32>() < chance {
                self.particles.create_explosion(
                    entity.center(),
                    DANGER_TRAIL_COLOR,
                    DANGER_TRAIL_COUNT,
                    DANGER_TRAIL_SCALE,
                    &mut self.rng,
                );
            }
        }
    }

    fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    fn emit_sound(&mut self, effect: SoundEffect) {
        if !self.muted {
            self.emit(GameEvent::Sound(effect));
        }
    }

    // === Outputs ===

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Deliver queued events to `observer` in emission order
    pub fn dispatch(&mut self, observer: &mut dyn SessionObserver) {
        for event in self.drain_events() {
            observer.on_event(&event);
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Live targets in registration order
    pub fn entities(&self) -> &[Entity] {
        self.registry.all()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.registry.get(id)
    }

    /// Active milliseconds before target `id` escapes
    pub fn remaining_ms(&self, id: EntityId) -> Option<f64> {
        self.registry.remaining_ms(id)
    }

    pub fn particles(&self) -> Vec<ParticleSnapshot> {
        self.particles.snapshot()
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    pub fn store(&self) -> &dyn BestScoreStore {
        &*self.store
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    pub fn spawn_interval_ms(&self) -> u32 {
        self.spawn_cadence.interval_ms()
    }

    /// Stats of the most recent finished run
    pub fn last_game_over(&self) -> Option<GameOverStats> {
        self.last_game_over
    }

    pub fn hud(&self) -> Hud {
        let s = &self.state;
        let per_level = self.tuning.scoring.points_per_level;
        Hud {
            phase: s.phase,
            score: s.score,
            best_score: self.best_score,
            lives: s.lives,
            level: s.level,
            difficulty: s.difficulty_tag(),
            combo: s.combo,
            max_combo: s.max_combo,
            combo_meter: s.combo_meter(),
            combo_hot: s.combo_is_hot(),
            level_progress: s.level_progress(per_level),
            points_per_level: per_level,
            elapsed: crate::format_elapsed(s.elapsed_seconds),
            live_targets: self.registry.len(),
            target_lifetime_secs: s.target_lifetime_ms as f32 / 1000.0,
            muted: self.muted,
        }
    }

    /// Everything needed to draw the current frame
    pub fn render_frame(&self) -> RenderFrame {
        RenderFrame {
            entities: self.registry.all().iter().map(EntitySnapshot::from).collect(),
            particles: self.particles.snapshot(),
            hud: self.hud(),
        }
    }
}

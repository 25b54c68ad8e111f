//! Level-driven pacing
//!
//! Speeds, countdowns, and the spawn interval all tighten as the level rises.
//! Countdowns are clamped so high levels stay playable.

use glam::Vec2;
use rand::Rng;

use super::state::{EntityKind, SessionState};
use crate::tuning::{DifficultyTuning, Tuning};

/// Recomputes pacing values on level-up and derives per-target parameters
#[derive(Debug, Clone)]
pub struct DifficultyController {
    tuning: DifficultyTuning,
    bonus_chance: f32,
    danger_chance: f32,
    aim_jitter: f32,
}

impl DifficultyController {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            tuning: tuning.difficulty.clone(),
            bonus_chance: tuning.spawn.bonus_chance,
            danger_chance: tuning.spawn.danger_chance,
            aim_jitter: tuning.spawn.aim_jitter,
        }
    }

    /// Apply the pacing changes for reaching `new_level`.
    ///
    /// Returns the new spawn interval; the caller reschedules its spawn cadence.
    pub fn level_up(&self, state: &mut SessionState, new_level: u32) -> u32 {
        let t = &self.tuning;
        state.level = new_level;
        state.base_speed += t.speed_increment;
        state.target_lifetime_ms = state
            .target_lifetime_ms
            .saturating_sub(t.lifetime_decrement_ms)
            .max(t.lifetime_floor_ms);
        state.spawn_interval_ms = self.spawn_interval_ms(new_level);
        log::info!(
            "Level {}: speed {:.1}px/s, lifetime {}ms, spawn every {}ms",
            new_level,
            state.base_speed,
            state.target_lifetime_ms,
            state.spawn_interval_ms
        );
        state.spawn_interval_ms
    }

    /// Spawn interval for a level, floored
    pub fn spawn_interval_ms(&self, level: u32) -> u32 {
        let t = &self.tuning;
        t.base_spawn_interval_ms
            .saturating_sub(level.saturating_mul(t.spawn_interval_step_ms))
            .max(t.spawn_interval_floor_ms)
    }

    /// Travel speed (px/s) for a target of `kind` at the current level
    pub fn speed_for(&self, state: &SessionState, kind: EntityKind) -> f32 {
        state.base_speed * self.tuning.speed_factor(kind)
            + state.level as f32 * self.tuning.level_speed_bonus
    }

    /// Countdown for a new target of `kind`: shorter for bonus and danger,
    /// reduced per level, never below the minimum
    pub fn countdown_ms(&self, state: &SessionState, kind: EntityKind) -> u32 {
        let t = &self.tuning;
        state
            .target_lifetime_ms
            .saturating_sub(t.lifetime_offset_ms(kind))
            .saturating_sub(state.level.saturating_mul(t.lifetime_level_step_ms))
            .max(t.min_countdown_ms)
    }

    /// Weighted roll: bonus below `bonus_chance`, danger in the top `danger_chance`
    pub fn roll_kind<R: Rng + ?Sized>(&self, rng: &mut R) -> EntityKind {
        let roll = rng.random::<f32>();
        if roll < self.bonus_chance {
            EntityKind::Bonus
        } else if roll > 1.0 - self.danger_chance {
            EntityKind::Danger
        } else {
            EntityKind::Regular
        }
    }

    /// Velocity aimed at the area center from `from`, with random jitter
    pub fn launch_velocity<R: Rng + ?Sized>(
        &self,
        from: Vec2,
        center: Vec2,
        speed: f32,
        rng: &mut R,
    ) -> Vec2 {
        let to_center = center - from;
        let heading = to_center.y.atan2(to_center.x) + (rng.random::<f32>() - 0.5) * self.aim_jitter;
        Vec2::new(heading.cos(), heading.sin()) * speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup() -> (DifficultyController, SessionState) {
        let tuning = Tuning::default();
        (DifficultyController::new(&tuning), SessionState::new(&tuning))
    }

    #[test]
    fn test_level_up_tightens_pacing() {
        let (diff, mut state) = setup();
        let speed = state.base_speed;
        let interval = diff.level_up(&mut state, 2);
        assert_eq!(state.level, 2);
        assert_eq!(interval, 1500);
        assert_eq!(state.spawn_interval_ms, 1500);
        assert_eq!(state.target_lifetime_ms, 3320);
        assert!((state.base_speed - (speed + 9.0)).abs() < 1e-4);
    }

    #[test]
    fn test_lifetime_and_interval_floors() {
        let (diff, mut state) = setup();
        for level in 2..40 {
            diff.level_up(&mut state, level);
        }
        assert_eq!(state.target_lifetime_ms, 2000);
        assert_eq!(state.spawn_interval_ms, 900);
        assert_eq!(diff.spawn_interval_ms(u32::MAX), 900);
    }

    #[test]
    fn test_danger_is_fastest() {
        let (diff, state) = setup();
        let regular = diff.speed_for(&state, EntityKind::Regular);
        let bonus = diff.speed_for(&state, EntityKind::Bonus);
        let danger = diff.speed_for(&state, EntityKind::Danger);
        assert!(danger > bonus && bonus > regular);
        // 1.2 px/frame * 60 + level 1 * 9
        assert!((regular - 81.0).abs() < 1e-3);
    }

    #[test]
    fn test_countdowns_by_kind() {
        let (diff, state) = setup();
        assert_eq!(diff.countdown_ms(&state, EntityKind::Regular), 3440);
        assert_eq!(diff.countdown_ms(&state, EntityKind::Bonus), 3240);
        assert_eq!(diff.countdown_ms(&state, EntityKind::Danger), 3040);
    }

    #[test]
    fn test_countdown_minimum() {
        let (diff, mut state) = setup();
        state.level = 50;
        state.target_lifetime_ms = 2000;
        assert_eq!(diff.countdown_ms(&state, EntityKind::Danger), 1500);
        assert_eq!(diff.countdown_ms(&state, EntityKind::Regular), 1500);
    }

    #[test]
    fn test_kind_weights() {
        let (diff, _) = setup();
        let mut rng = Pcg32::seed_from_u64(42);
        let mut counts = [0u32; 3];
        for _ in 0..10_000 {
            match diff.roll_kind(&mut rng) {
                EntityKind::Regular => counts[0] += 1,
                EntityKind::Bonus => counts[1] += 1,
                EntityKind::Danger => counts[2] += 1,
            }
        }
        assert!((1000..1400).contains(&counts[1]), "bonus {}", counts[1]);
        assert!((2700..3300).contains(&counts[2]), "danger {}", counts[2]);
    }

    #[test]
    fn test_launch_velocity_heads_inward() {
        let (diff, _) = setup();
        let mut rng = Pcg32::seed_from_u64(9);
        let center = Vec2::new(400.0, 300.0);
        for from in [Vec2::new(-70.0, 300.0), Vec2::new(800.0, 100.0), Vec2::new(200.0, -70.0)] {
            let vel = diff.launch_velocity(from, center, 100.0, &mut rng);
            assert!((vel.length() - 100.0).abs() < 1e-3);
            // Jitter is at most 0.4 rad either side, so still moving toward center
            assert!(vel.dot(center - from) > 0.0);
        }
    }
}

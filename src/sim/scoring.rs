//! Scoring, combo, and lives rules
//!
//! Two event kinds drive the rules: a player interaction with a target and a
//! target escaping. The engine mutates the session's numbers and reports what
//! changed so the session can publish events and react (level-up, game over).

use super::state::{EntityKind, SessionState};
use crate::tuning::{ScoringTuning, Tuning};

/// What a single scoring event changed
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreOutcome {
    /// Points awarded (0 for danger and misses)
    pub points: u64,
    /// Multiplier in effect when the points were computed
    pub multiplier: f32,
    pub combo_changed: bool,
    pub life_lost: bool,
    /// Level reached if this event crossed a threshold; the caller applies it
    pub leveled_up: Option<u32>,
    /// Set on the one event that exhausted the last life
    pub session_ended: bool,
}

impl ScoreOutcome {
    pub fn score_changed(&self) -> bool {
        self.points > 0
    }
}

/// Applies scoring and penalty rules to a [`SessionState`]
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    tuning: ScoringTuning,
    /// Latched once the end has been reported for this session
    end_signaled: bool,
}

impl ScoringEngine {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            tuning: tuning.scoring.clone(),
            end_signaled: false,
        }
    }

    /// Re-arm the end signal for a fresh session
    pub fn reset(&mut self) {
        self.end_signaled = false;
    }

    /// Score multiplier for the given combo
    pub fn multiplier(&self, combo: u32) -> f32 {
        self.tuning.multiplier(combo)
    }

    /// The player clicked a target of `kind`
    pub fn on_interact(&mut self, state: &mut SessionState, kind: EntityKind) -> ScoreOutcome {
        if self.end_signaled {
            return ScoreOutcome::default();
        }
        let (base, gain) = match kind {
            EntityKind::Regular => (self.tuning.regular_points, self.tuning.regular_combo_gain),
            EntityKind::Bonus => (self.tuning.bonus_points, self.tuning.bonus_combo_gain),
            EntityKind::Danger => return self.penalize(state),
        };

        let multiplier = self.multiplier(state.combo);
        let points = (base as f32 * multiplier).floor() as u64;
        state.score += points;
        state.combo += gain;
        state.max_combo = state.max_combo.max(state.combo);

        let leveled_up = if points > 0 {
            self.check_level_up(state)
        } else {
            None
        };

        ScoreOutcome {
            points,
            multiplier,
            combo_changed: gain > 0,
            leveled_up,
            ..ScoreOutcome::default()
        }
    }

    /// A target of `kind` ran out its countdown
    pub fn on_expire(&mut self, state: &mut SessionState, kind: EntityKind) -> ScoreOutcome {
        if self.end_signaled {
            return ScoreOutcome::default();
        }
        match kind {
            EntityKind::Danger => self.penalize(state),
            // A missed opportunity, not a failure
            EntityKind::Regular | EntityKind::Bonus => ScoreOutcome::default(),
        }
    }

    /// Lose a life and break the combo
    fn penalize(&mut self, state: &mut SessionState) -> ScoreOutcome {
        let combo_changed = state.combo != 0;
        state.combo = 0;
        state.lives = state.lives.saturating_sub(1);

        let session_ended = state.lives == 0;
        if session_ended {
            self.end_signaled = true;
        }
        ScoreOutcome {
            multiplier: 1.0,
            combo_changed,
            life_lost: true,
            session_ended,
            ..ScoreOutcome::default()
        }
    }

    /// At most one level per score change. Reports the crossing only;
    /// `DifficultyController::level_up` moves the level.
    fn check_level_up(&self, state: &SessionState) -> Option<u32> {
        let per_level = self.tuning.points_per_level;
        if state.score > 0
            && state.score.is_multiple_of(per_level)
            && state.score / per_level >= u64::from(state.level)
        {
            Some(state.level + 1)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn setup() -> (ScoringEngine, SessionState) {
        let tuning = Tuning::default();
        (ScoringEngine::new(&tuning), SessionState::new(&tuning))
    }

    #[test]
    fn test_regular_hit_at_combo_8() {
        let (mut engine, mut state) = setup();
        state.combo = 8;
        let out = engine.on_interact(&mut state, EntityKind::Regular);
        assert_eq!(out.points, 2);
        assert_eq!(out.multiplier, 2.0);
        assert_eq!(state.score, 2);
        assert_eq!(state.combo, 9);
    }

    #[test]
    fn test_bonus_hit_at_combo_20() {
        let (mut engine, mut state) = setup();
        state.combo = 20;
        let out = engine.on_interact(&mut state, EntityKind::Bonus);
        assert_eq!(out.points, 15);
        assert_eq!(state.combo, 22);
        assert!(state.max_combo >= 22);
    }

    #[test]
    fn test_fractional_points_round_down() {
        let (mut engine, mut state) = setup();
        state.combo = 3;
        assert_eq!(engine.on_interact(&mut state, EntityKind::Regular).points, 1);
        state.combo = 3;
        assert_eq!(engine.on_interact(&mut state, EntityKind::Bonus).points, 7);
    }

    #[test]
    fn test_danger_hit_costs_life_and_combo() {
        let (mut engine, mut state) = setup();
        state.combo = 12;
        state.max_combo = 12;
        let out = engine.on_interact(&mut state, EntityKind::Danger);
        assert!(out.life_lost);
        assert!(out.combo_changed);
        assert_eq!(out.points, 0);
        assert_eq!(state.lives, 2);
        assert_eq!(state.combo, 0);
        assert_eq!(state.max_combo, 12);
    }

    #[test]
    fn test_only_danger_expiry_is_penalized() {
        let (mut engine, mut state) = setup();
        state.combo = 5;
        let out = engine.on_expire(&mut state, EntityKind::Regular);
        assert_eq!(out, ScoreOutcome::default());
        engine.on_expire(&mut state, EntityKind::Bonus);
        assert_eq!(state.combo, 5);
        assert_eq!(state.lives, 3);

        let out = engine.on_expire(&mut state, EntityKind::Danger);
        assert!(out.life_lost);
        assert_eq!(state.combo, 0);
        assert_eq!(state.lives, 2);
    }

    #[test]
    fn test_session_end_signaled_once() {
        let (mut engine, mut state) = setup();
        assert!(!engine.on_interact(&mut state, EntityKind::Danger).session_ended);
        assert!(!engine.on_expire(&mut state, EntityKind::Danger).session_ended);
        assert!(engine.on_expire(&mut state, EntityKind::Danger).session_ended);
        assert_eq!(state.lives, 0);

        // Late events after the end are ignored entirely
        let late = engine.on_interact(&mut state, EntityKind::Danger);
        assert!(!late.session_ended);
        assert!(!late.life_lost);
        assert_eq!(engine.on_interact(&mut state, EntityKind::Bonus).points, 0);
        assert_eq!(state.lives, 0);
        assert_eq!(state.score, 0);

        engine.reset();
        let mut fresh = SessionState::new(&Tuning::default());
        assert_eq!(engine.on_interact(&mut fresh, EntityKind::Regular).points, 1);
    }

    #[test]
    fn test_level_up_on_multiple_of_ten() {
        let (mut engine, mut state) = setup();
        state.score = 5;
        let out = engine.on_interact(&mut state, EntityKind::Bonus);
        assert_eq!(state.score, 10);
        assert_eq!(out.leveled_up, Some(2));
        // The level itself is applied by the difficulty controller
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_level_up_once_per_crossing() {
        let (mut engine, mut state) = setup();
        // Score jumps to 30 in one event while still on level 1: only +1
        state.score = 15;
        state.combo = 20;
        let out = engine.on_interact(&mut state, EntityKind::Bonus);
        assert_eq!(state.score, 30);
        assert_eq!(out.leveled_up, Some(2));
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_no_level_up_off_multiple() {
        let (mut engine, mut state) = setup();
        state.score = 8;
        state.combo = 3;
        let out = engine.on_interact(&mut state, EntityKind::Bonus);
        assert_eq!(state.score, 15);
        assert_eq!(out.leveled_up, None);
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_no_repeat_level_up_at_same_score() {
        let (engine, mut state) = setup();
        state.score = 10;
        state.level = 2;
        assert_eq!(engine.check_level_up(&state), None);
    }

    fn kind_strategy() -> impl Strategy<Value = EntityKind> {
        prop_oneof![
            Just(EntityKind::Regular),
            Just(EntityKind::Bonus),
            Just(EntityKind::Danger),
        ]
    }

    proptest! {
        #[test]
        fn prop_multiplier_is_step_function(combo in 0u32..1000) {
            let (engine, _) = setup();
            let expected = match combo {
                0..=2 => 1.0,
                3..=7 => 1.5,
                8..=14 => 2.0,
                _ => 3.0,
            };
            prop_assert_eq!(engine.multiplier(combo), expected);
        }

        #[test]
        fn prop_lives_and_combo_invariants(
            events in prop::collection::vec((kind_strategy(), any::<bool>()), 0..200)
        ) {
            let (mut engine, mut state) = setup();
            let mut ended = 0;
            for (kind, clicked) in events {
                let lives_before = state.lives;
                let level_before = state.level;
                let out = if clicked {
                    engine.on_interact(&mut state, kind)
                } else {
                    engine.on_expire(&mut state, kind)
                };
                prop_assert!(state.lives <= lives_before);
                prop_assert_eq!(state.level, level_before);
                if let Some(level) = out.leveled_up {
                    prop_assert_eq!(level, level_before + 1);
                }
                prop_assert!(state.max_combo >= state.combo);
                if kind == EntityKind::Danger && lives_before > 0 {
                    prop_assert_eq!(state.combo, 0);
                }
                if out.session_ended {
                    ended += 1;
                }
            }
            prop_assert!(ended <= 1);
            prop_assert_eq!(ended == 1, state.lives == 0);
        }
    }
}

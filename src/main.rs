//! Moving Circles entry point
//!
//! The browser build is driven from JavaScript through `platform::WebGame`.
//! Natively this runs a headless autopilot session: a simulated player clicks
//! safe targets after a reaction delay until the run ends or time runs out.

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use std::collections::HashMap;
    use std::path::Path;

    use moving_circles::audio::AudioManager;
    use moving_circles::consts::SIM_DT;
    use moving_circles::persistence::FileStore;
    use moving_circles::sim::{
        EntityId, EntityKind, FixedStep, GameOverStats, GameSession, SessionObserver, StatusMessage,
    };
    use moving_circles::{Settings, Tuning};

    const BEST_SCORE_PATH: &str = "best_score.json";
    const SETTINGS_PATH: &str = "settings.json";
    const TUNING_PATH: &str = "tuning.json";

    /// Simulated player
    struct Pilot {
        /// Seconds of sim time before a target is clicked
        reaction: f32,
        /// When each target was first seen
        seen: HashMap<EntityId, f32>,
    }

    impl Pilot {
        fn new(reaction: f32) -> Self {
            Self {
                reaction,
                seen: HashMap::new(),
            }
        }

        /// Pick the targets to click this frame
        fn choose(&mut self, session: &GameSession, now: f32) -> Vec<EntityId> {
            let live: Vec<_> = session.entities().iter().map(|e| (e.id, e.kind)).collect();
            self.seen.retain(|id, _| live.iter().any(|(live_id, _)| live_id == id));

            let mut picks = Vec::new();
            for (id, kind) in live {
                let first_seen = *self.seen.entry(id).or_insert(now);
                if kind != EntityKind::Danger && now - first_seen >= self.reaction {
                    picks.push(id);
                }
            }
            picks
        }
    }

    /// Logs the interesting moments of the run
    struct Commentary {
        audio: AudioManager,
        game_over: Option<GameOverStats>,
    }

    impl SessionObserver for Commentary {
        fn on_level_changed(&mut self, level: u32) {
            log::debug!("HUD level {}", level);
        }

        fn on_status(&mut self, message: StatusMessage) {
            match message {
                StatusMessage::Hit { .. } | StatusMessage::Missed => log::trace!("{}", message),
                _ => log::info!("{}", message),
            }
        }

        fn on_sound(&mut self, effect: moving_circles::audio::SoundEffect) {
            self.audio.on_sound(effect);
        }

        fn on_music(&mut self, cue: moving_circles::audio::MusicCue) {
            self.audio.on_music(cue);
        }

        fn on_game_over(&mut self, stats: GameOverStats) {
            self.game_over = Some(stats);
        }
    }

    fn load_tuning() -> Tuning {
        match std::fs::read_to_string(TUNING_PATH) {
            Ok(json) => match Tuning::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded balance from {}", TUNING_PATH);
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {}", TUNING_PATH, e);
                    Tuning::default()
                }
            },
            Err(_) => Tuning::default(),
        }
    }

    pub fn run(seconds: u32, seed: Option<u64>) {
        let tuning = load_tuning();
        let settings = Settings::load_from(Path::new(SETTINGS_PATH));
        let store = Box::new(FileStore::new(BEST_SCORE_PATH));
        let mut session = match seed {
            Some(seed) => GameSession::with_seed(tuning, store, seed),
            None => GameSession::new(tuning, store),
        };
        session.apply_settings(&settings);

        let mut step = FixedStep::new();
        let mut pilot = Pilot::new(0.9);
        let mut commentary = Commentary {
            audio: AudioManager::from_settings(&settings),
            game_over: None,
        };

        session.start();
        let frames = seconds * 60;
        for frame in 0..frames {
            let now = frame as f32 * SIM_DT;
            for id in pilot.choose(&session, now) {
                session.interact(id);
            }
            step.advance(&mut session, SIM_DT);
            session.dispatch(&mut commentary);
            if commentary.game_over.is_some() {
                break;
            }
        }
        if commentary.game_over.is_none() {
            log::info!("Time limit reached");
            session.stop();
            session.dispatch(&mut commentary);
        }

        if let Some(stats) = commentary.game_over {
            println!(
                "Score {}  Level {}  Max combo {}  Time {}  Best {}{}",
                stats.score,
                stats.level,
                stats.max_combo,
                moving_circles::format_elapsed(stats.elapsed_seconds),
                session.best_score(),
                if stats.new_best { "  (new best!)" } else { "" }
            );
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    moving_circles::platform::init_logging();
    log::info!("Moving Circles (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seconds = args.next().and_then(|s| s.parse().ok()).unwrap_or(120);
    let seed = args.next().and_then(|s| s.parse().ok());
    autopilot::run(seconds, seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::WebGame, this is just to satisfy the compiler
}

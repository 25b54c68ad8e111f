//! Browser bindings
//!
//! The page owns the DOM, the animation loop, and drawing; it calls into
//! `WebGame` for commands and pulls one JSON `RenderFrame` per animation frame.

use wasm_bindgen::prelude::*;

use crate::audio::AudioManager;
use crate::persistence::LocalStorageStore;
use crate::settings::{QualityPreset, Settings};
use crate::sim::{FixedStep, GameEvent, GamePhase, GameSession, SessionObserver};
use crate::tuning::Tuning;

/// Game handle exported to JavaScript
#[wasm_bindgen]
pub struct WebGame {
    session: GameSession,
    step: FixedStep,
    audio: AudioManager,
    settings: Settings,
    /// Events not yet fetched by the page (JSON-serializable)
    pending: Vec<GameEvent>,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game with default balance and stored preferences
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        crate::platform::init_logging();
        Self::build(Tuning::default())
    }

    /// Create a game from a JSON balance sheet
    #[wasm_bindgen(js_name = withTuning)]
    pub fn with_tuning(json: &str) -> Result<WebGame, JsValue> {
        crate::platform::init_logging();
        let tuning = Tuning::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::build(tuning))
    }

    fn build(tuning: Tuning) -> WebGame {
        let settings = Settings::load();
        let mut session = GameSession::new(tuning, Box::new(LocalStorageStore::default()));
        session.apply_settings(&settings);
        log::info!("Moving Circles ready (best score {})", session.best_score());
        WebGame {
            session,
            step: FixedStep::new(),
            audio: AudioManager::from_settings(&settings),
            settings,
            pending: Vec::new(),
        }
    }

    pub fn start(&mut self) {
        self.step.reset();
        self.session.start();
        self.flush();
    }

    pub fn pause(&mut self) {
        self.session.pause();
        self.flush();
    }

    pub fn resume(&mut self) {
        self.step.reset();
        self.session.resume();
        self.flush();
    }

    #[wasm_bindgen(js_name = togglePause)]
    pub fn toggle_pause(&mut self) {
        if self.session.phase() == GamePhase::Paused {
            self.step.reset();
        }
        self.session.toggle_pause();
        self.flush();
    }

    pub fn stop(&mut self) {
        self.session.stop();
        self.flush();
    }

    /// The player clicked target `id`
    pub fn interact(&mut self, id: u32) {
        self.session.interact(id);
        self.flush();
    }

    /// Window lost focus
    #[wasm_bindgen(js_name = onBlur)]
    pub fn on_blur(&mut self) {
        if self.settings.pause_on_blur && self.session.phase() == GamePhase::Running {
            log::info!("Auto-paused (window blur)");
            self.pause();
        }
    }

    #[wasm_bindgen(js_name = setMuted)]
    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
        self.session.set_muted(muted);
        self.audio.set_muted(muted);
        self.settings.save();
    }

    #[wasm_bindgen(js_name = isMuted)]
    pub fn is_muted(&self) -> bool {
        self.session.is_muted()
    }

    /// Switch particle quality ("low", "medium", "high")
    #[wasm_bindgen(js_name = setQuality)]
    pub fn set_quality(&mut self, preset: &str) -> bool {
        let Some(quality) = QualityPreset::parse(preset) else {
            log::warn!("Unknown quality preset '{}'", preset);
            return false;
        };
        self.settings.quality = quality;
        self.session.apply_settings(&self.settings);
        self.settings.save();
        true
    }

    /// Advance by the frame delta (seconds) and return the frame as JSON
    pub fn frame(&mut self, dt: f32) -> Result<String, JsValue> {
        self.step.advance(&mut self.session, dt);
        self.flush();
        serde_json::to_string(&self.session.render_frame())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Events since the last call, as a JSON array
    #[wasm_bindgen(js_name = takeEvents)]
    pub fn take_events(&mut self) -> Result<String, JsValue> {
        let json = serde_json::to_string(&self.pending).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.pending.clear();
        Ok(json)
    }

    #[wasm_bindgen(js_name = bestScore)]
    pub fn best_score(&self) -> f64 {
        self.session.best_score() as f64
    }
}

impl WebGame {
    /// Play queued sound/music cues and keep the events for the page
    fn flush(&mut self) {
        for event in self.session.drain_events() {
            self.audio.on_event(&event);
            self.pending.push(event);
        }
    }
}

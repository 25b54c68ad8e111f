//! Audio cues and playback
//!
//! The engine only emits [`SoundEffect`] and [`MusicCue`] events. On the web
//! they are synthesized procedurally with the Web Audio API (no asset files);
//! natively they are logged.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::SessionObserver;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Regular or bonus target hit
    Click,
    /// Danger target escaped
    Miss,
    /// Danger target clicked
    Danger,
}

impl SoundEffect {
    /// Mix level relative to the SFX bus
    pub fn base_volume(&self) -> f32 {
        match self {
            SoundEffect::Click => 0.5,
            SoundEffect::Miss => 0.6,
            SoundEffect::Danger => 0.8,
        }
    }
}

/// Background loop control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MusicCue {
    Start,
    Pause,
    Resume,
    Stop,
}

/// Background loop volume relative to the music bus
pub const MUSIC_VOLUME: f32 = 0.3;

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(not(target_arch = "wasm32"))]
pub use native::AudioManager;

impl SessionObserver for AudioManager {
    fn on_sound(&mut self, effect: SoundEffect) {
        self.play(effect);
    }

    fn on_music(&mut self, cue: MusicCue) {
        self.music(cue);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::*;

    /// Headless audio sink: records volume state and logs cues
    #[derive(Debug, Clone)]
    pub struct AudioManager {
        master_volume: f32,
        sfx_volume: f32,
        music_volume: f32,
        muted: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            Self {
                master_volume: 0.8,
                sfx_volume: 1.0,
                music_volume: 0.7,
                muted: false,
            }
        }

        pub fn from_settings(settings: &Settings) -> Self {
            let mut audio = Self::new();
            audio.apply_settings(settings);
            audio
        }

        pub fn apply_settings(&mut self, settings: &Settings) {
            self.master_volume = settings.master_volume.clamp(0.0, 1.0);
            self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
            self.music_volume = settings.music_volume.clamp(0.0, 1.0);
            self.muted = settings.muted;
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        pub fn is_muted(&self) -> bool {
            self.muted
        }

        pub fn effective_volume(&self, effect: SoundEffect) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume * effect.base_volume()
            }
        }

        pub fn play(&self, effect: SoundEffect) {
            let vol = self.effective_volume(effect);
            if vol > 0.0 {
                log::debug!("sfx {:?} at {:.2}", effect, vol);
            }
        }

        pub fn music(&self, cue: MusicCue) {
            if !self.muted {
                log::debug!("music {:?} at {:.2}", cue, self.master_volume * self.music_volume * MUSIC_VOLUME);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::*;
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    /// Audio manager for the browser
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
        music_volume: f32,
        muted: bool,
        /// Background drone while music is playing
        music: Option<(OscillatorNode, GainNode)>,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
                sfx_volume: 1.0,
                music_volume: 0.7,
                muted: false,
                music: None,
            }
        }

        pub fn from_settings(settings: &Settings) -> Self {
            let mut audio = Self::new();
            audio.apply_settings(settings);
            audio
        }

        pub fn apply_settings(&mut self, settings: &Settings) {
            self.master_volume = settings.master_volume.clamp(0.0, 1.0);
            self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
            self.music_volume = settings.music_volume.clamp(0.0, 1.0);
            self.set_muted(settings.muted);
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
            let level = self.music_level();
            if let Some((_, gain)) = &self.music {
                gain.gain().set_value(level);
            }
        }

        pub fn is_muted(&self) -> bool {
            self.muted
        }

        pub fn effective_volume(&self, effect: SoundEffect) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume * effect.base_volume()
            }
        }

        fn music_level(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.music_volume * MUSIC_VOLUME * 0.2
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.effective_volume(effect);
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers start the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Click => self.play_click(ctx, vol),
                SoundEffect::Miss => self.play_miss(ctx, vol),
                SoundEffect::Danger => self.play_danger(ctx, vol),
            }
        }

        pub fn music(&mut self, cue: MusicCue) {
            let Some(ctx) = self.ctx.clone() else { return };
            match cue {
                MusicCue::Start => {
                    self.stop_music();
                    if let Some((osc, gain)) = create_osc(&ctx, 110.0, OscillatorType::Triangle) {
                        gain.gain().set_value(self.music_level());
                        osc.start().ok();
                        self.music = Some((osc, gain));
                    }
                }
                MusicCue::Pause => {
                    if let Some((_, gain)) = &self.music {
                        gain.gain().set_value(0.0);
                    }
                }
                MusicCue::Resume => {
                    let level = self.music_level();
                    if let Some((_, gain)) = &self.music {
                        gain.gain().set_value(level);
                    }
                }
                MusicCue::Stop => self.stop_music(),
            }
        }

        fn stop_music(&mut self) {
            if let Some((osc, _)) = self.music.take() {
                osc.stop().ok();
            }
        }

        /// Click - bright blip
        fn play_click(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = create_osc(ctx, 880.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();
            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(1320.0, t + 0.05)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Miss - falling buzz
        fn play_miss(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = create_osc(ctx, 300.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(80.0, t + 0.3)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.35).ok();
        }

        /// Danger - harsh double alarm
        fn play_danger(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [220.0, 160.0].iter().enumerate() {
                let delay = i as f64 * 0.12;
                if let Some((osc, gain)) = create_osc(ctx, *freq, OscillatorType::Sawtooth) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.4, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.25).ok();
                }
            }
        }
    }

    /// Create an oscillator routed through a gain node to the destination
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }
}

//! Audio cues
//!
//! Procedurally generated with the Web Audio API on wasm, no sound files needed.
//! Native builds have no audio device and only trace the cue.
//!
//! Background music is a low two-voice drone with a slow pulse, started on the
//! first user gesture and left running; its level follows the volume settings.

use crate::settings::Settings;
use crate::sim::GameEvent;

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits paddle
    PaddleHit,
    /// Ball hits top or bottom wall
    WallHit,
    /// Ball left the field
    Score,
    /// Serve from the start prompt
    Start,
}

impl SoundEffect {
    /// Cue for a simulation event, if it has one
    pub fn for_event(event: GameEvent) -> Option<Self> {
        match event {
            GameEvent::PaddleHit(_) => Some(SoundEffect::PaddleHit),
            GameEvent::WallHit => Some(SoundEffect::WallHit),
            GameEvent::Scored(_) => Some(SoundEffect::Score),
            GameEvent::Started => Some(SoundEffect::Start),
            GameEvent::Paused | GameEvent::Resumed => None,
        }
    }
}

/// Peak gain of the music bus at full volume; keeps it under the cues
const MUSIC_LEVEL: f32 = 0.12;

/// Live music graph: voices into a pulsing gain into the volume gain
#[cfg(target_arch = "wasm32")]
struct MusicLoop {
    volume: GainNode,
    // Kept so the nodes live as long as the manager
    _voices: Vec<OscillatorNode>,
}

/// Audio manager for the game
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
    #[cfg(target_arch = "wasm32")]
    music: Option<MusicLoop>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    music_playing: bool,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    #[cfg(target_arch = "wasm32")]
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            music: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,
            music_playing: false,
            muted: false,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,
            music_playing: false,
            muted: false,
        }
    }

    /// Manager configured from the player's preferences
    pub fn with_settings(settings: &Settings) -> Self {
        let mut audio = Self::new();
        audio.apply_settings(settings);
        audio
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_music_volume(settings.music_volume);
        self.set_muted(settings.muted);
    }

    /// Resume audio context and start the music (required after user gesture)
    pub fn resume(&mut self) {
        #[cfg(target_arch = "wasm32")]
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
        self.start_music();
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
        self.refresh_music();
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
        self.refresh_music();
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.refresh_music();
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    /// Start the background music once; later calls do nothing
    #[cfg(target_arch = "wasm32")]
    pub fn start_music(&mut self) {
        if self.music_playing {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        match self.build_music(ctx) {
            Some(music) => {
                self.music = Some(music);
                self.music_playing = true;
                self.refresh_music();
                log::debug!("Music started");
            }
            None => log::warn!("Failed to build music graph"),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn start_music(&mut self) {
        if !self.music_playing {
            self.music_playing = true;
            log::debug!("Music started (volume {:.2})", self.effective_music_volume());
        }
    }

    /// Push the current music level to the live graph
    #[cfg(target_arch = "wasm32")]
    fn refresh_music(&self) {
        if let (Some(ctx), Some(music)) = (&self.ctx, &self.music) {
            let level = self.effective_music_volume() * MUSIC_LEVEL;
            // Short glide so mute toggles do not click
            music
                .volume
                .gain()
                .set_target_at_time(level, ctx.current_time(), 0.05)
                .ok();
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn refresh_music(&self) {
        if self.music_playing {
            log::trace!("Music volume {:.2}", self.effective_music_volume() * MUSIC_LEVEL);
        }
    }

    /// Play the cues for a batch of simulation events
    pub fn play_events(&self, events: &[GameEvent]) {
        for effect in events.iter().copied().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }

    /// Play a sound effect
    #[cfg(target_arch = "wasm32")]
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Browsers keep the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::PaddleHit => self.play_paddle_hit(ctx, vol),
            SoundEffect::WallHit => self.play_wall_hit(ctx, vol),
            SoundEffect::Score => self.play_score(ctx, vol),
            SoundEffect::Start => self.play_start(ctx, vol),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn play(&self, effect: SoundEffect) {
        if self.effective_volume() > 0.0 {
            log::trace!("Sound cue: {:?}", effect);
        }
    }
}

// === Sound generators ===
#[cfg(target_arch = "wasm32")]
impl AudioManager {
    /// Bass drone (A1 plus its fifth) through a gain pulsed by a slow LFO
    fn build_music(&self, ctx: &AudioContext) -> Option<MusicLoop> {
        let volume = ctx.create_gain().ok()?;
        volume.gain().set_value(0.0);
        volume.connect_with_audio_node(&ctx.destination()).ok()?;

        let pulse = ctx.create_gain().ok()?;
        pulse.gain().set_value(0.6);
        pulse.connect_with_audio_node(&volume).ok()?;

        let lfo = ctx.create_oscillator().ok()?;
        lfo.set_type(OscillatorType::Sine);
        lfo.frequency().set_value(0.5);
        let depth = ctx.create_gain().ok()?;
        depth.gain().set_value(0.4);
        lfo.connect_with_audio_node(&depth).ok()?;
        depth.connect_with_audio_param(&pulse.gain()).ok()?;

        let mut voices = vec![lfo];
        for (freq, osc_type) in [(55.0, OscillatorType::Triangle), (82.41, OscillatorType::Sine)] {
            let osc = ctx.create_oscillator().ok()?;
            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&pulse).ok()?;
            voices.push(osc);
        }
        for osc in &voices {
            osc.start().ok()?;
        }

        Some(MusicLoop {
            volume,
            _voices: voices,
        })
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
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

    /// Paddle hit - square blip
    fn play_paddle_hit(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 440.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.08)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }

    /// Wall hit - lower blip
    fn play_wall_hit(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.06)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.08).ok();
    }

    /// Point scored - falling tone
    fn play_score(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 490.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.35, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.4)
            .ok();
        osc.frequency().set_value_at_time(490.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(120.0, t + 0.4)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.45).ok();
    }

    /// Serve - two rising notes
    fn play_start(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [330.0, 660.0].iter().enumerate() {
            let delay = i as f64 * 0.08;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.2).ok();
            }
        }
    }
}

//! Pooled sound effect playback
//!
//! The simulation only queues [`SoundEffect`] names each tick. `AudioManager`
//! maps them onto a small pool of voices per effect and hands playback to an
//! [`AudioBackend`]. Backend failures are logged and dropped; they never reach
//! the simulation.

use thiserror::Error;

use crate::sim::SoundEffect;

/// Voices kept per effect, so rapid fire can overlap
pub const VOICES_PER_EFFECT: usize = 5;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio device unavailable: {0}")]
    Unavailable(String),
    #[error("failed to start {effect} on voice {voice}: {reason}")]
    Playback {
        effect: &'static str,
        voice: usize,
        reason: String,
    },
}

/// Something that can actually make noise
pub trait AudioBackend {
    /// Start (or restart from the beginning) `effect` on `voice` at `volume`
    fn start(&mut self, effect: SoundEffect, voice: usize, volume: f32) -> Result<(), AudioError>;
}

/// Backend for headless runs: logs what would have played
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn start(&mut self, effect: SoundEffect, voice: usize, volume: f32) -> Result<(), AudioError> {
        log::trace!("sound {} voice {} volume {:.2}", effect.as_str(), voice, volume);
        Ok(())
    }
}

impl SoundEffect {
    /// Per-effect mix level
    pub fn base_volume(&self) -> f32 {
        match self {
            SoundEffect::Fire => 0.3,
            SoundEffect::Explosion => 0.4,
        }
    }

    /// How long one playback keeps its voice busy
    pub fn duration_ms(&self) -> u64 {
        match self {
            SoundEffect::Fire => 300,
            SoundEffect::Explosion => 900,
        }
    }
}

/// Voices for one effect, tracked by when each finishes
#[derive(Debug, Clone, Default)]
struct VoicePool {
    busy_until: [u64; VOICES_PER_EFFECT],
}

impl VoicePool {
    /// First idle voice, or voice 0 when all are busy (it gets restarted)
    fn claim(&mut self, now_ms: u64, duration_ms: u64) -> usize {
        let voice = self
            .busy_until
            .iter()
            .position(|&until| until <= now_ms)
            .unwrap_or(0);
        self.busy_until[voice] = now_ms + duration_ms;
        voice
    }
}

/// Audio manager for the game
pub struct AudioManager<B: AudioBackend> {
    backend: B,
    fire: VoicePool,
    explosion: VoicePool,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    enabled: bool,
}

impl Default for AudioManager<LogBackend> {
    fn default() -> Self {
        Self::new(LogBackend)
    }
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            fire: VoicePool::default(),
            explosion: VoicePool::default(),
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            enabled: true,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Sound toggle
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play one effect. Silent when sound is off.
    pub fn play(&mut self, effect: SoundEffect, now_ms: u64) {
        if !self.enabled {
            return;
        }
        let vol = self.effective_volume() * effect.base_volume();
        if vol <= 0.0 {
            return;
        }

        let pool = match effect {
            SoundEffect::Fire => &mut self.fire,
            SoundEffect::Explosion => &mut self.explosion,
        };
        let voice = pool.claim(now_ms, effect.duration_ms());

        if let Err(e) = self.backend.start(effect, voice, vol) {
            log::warn!("Sound playback failed: {e}");
        }
    }

    /// Play everything the simulation queued this tick. The simulation stops
    /// queueing at game over, so the final tick's sounds still play.
    pub fn process(&mut self, sounds: &[SoundEffect], now_ms: u64) {
        for &effect in sounds {
            self.play(effect, now_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SessionConfig, WeaponKind};
    use crate::consts::FRAME_MS;
    use crate::sim::{Bullet, GameState, Role, TickInput, tick};

    #[derive(Default)]
    struct Recorder {
        started: Vec<(SoundEffect, usize, f32)>,
    }

    impl AudioBackend for Recorder {
        fn start(&mut self, effect: SoundEffect, voice: usize, volume: f32) -> Result<(), AudioError> {
            self.started.push((effect, voice, volume));
            Ok(())
        }
    }

    struct Broken;

    impl AudioBackend for Broken {
        fn start(&mut self, effect: SoundEffect, voice: usize, _volume: f32) -> Result<(), AudioError> {
            Err(AudioError::Playback {
                effect: effect.as_str(),
                voice,
                reason: "device lost".into(),
            })
        }
    }

    #[test]
    fn test_voices_rotate_then_restart_first() {
        let mut audio = AudioManager::new(Recorder::default());
        for _ in 0..VOICES_PER_EFFECT + 1 {
            audio.play(SoundEffect::Fire, 0);
        }
        let voices: Vec<usize> = audio.backend().started.iter().map(|s| s.1).collect();
        assert_eq!(voices, vec![0, 1, 2, 3, 4, 0]);
    }

    #[test]
    fn test_finished_voice_is_reused() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.play(SoundEffect::Fire, 0);
        audio.play(SoundEffect::Fire, 100);
        audio.play(SoundEffect::Fire, 300);
        let voices: Vec<usize> = audio.backend().started.iter().map(|s| s.1).collect();
        assert_eq!(voices, vec![0, 1, 0]);
    }

    #[test]
    fn test_pools_are_per_effect() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.process(&[SoundEffect::Fire, SoundEffect::Explosion], 0);
        let started = &audio.backend().started;
        assert_eq!(started[0].1, 0);
        assert_eq!(started[1].1, 0);
        assert!((started[0].2 - 0.8 * 0.3).abs() < 1e-6);
        assert!((started[1].2 - 0.8 * 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_silent_when_disabled_or_muted() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.set_enabled(false);
        audio.play(SoundEffect::Explosion, 0);
        audio.set_enabled(true);
        audio.set_muted(true);
        audio.play(SoundEffect::Explosion, 0);
        assert!(audio.backend().started.is_empty());
    }

    #[test]
    fn test_lethal_hit_plays_death_explosion_once() {
        let mut state = GameState::new(SessionConfig::default(), 12345);
        state.player.health = 1.0;
        let weapon = WeaponKind::Standard.stats();
        let pos = state.player.pos;
        state.enemy_bullets.push(Bullet::new(Role::Enemy, pos, 0.0, &weapon));

        let mut audio = AudioManager::new(Recorder::default());
        tick(&mut state, &TickInput::default(), FRAME_MS);
        audio.process(&state.sounds, state.time_ms);

        assert!(state.is_over());
        let effects: Vec<SoundEffect> = audio.backend().started.iter().map(|s| s.0).collect();
        assert_eq!(effects, vec![SoundEffect::Explosion]);
    }

    #[test]
    fn test_backend_errors_are_swallowed() {
        let mut audio = AudioManager::new(Broken);
        audio.process(&[SoundEffect::Fire; 3], 0);
    }
}

//! Sound and haptic feedback
//!
//! Effects are procedurally described as short oscillator tones, so no audio
//! files are needed. Playback is fire-and-forget: the simulation never waits
//! on a backend, and backend failures are logged and otherwise ignored.

use thiserror::Error;

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player fired
    Shoot,
    /// Enemy destroyed
    Explosion,
    /// Player hit
    Damage,
    /// Advanced to the next wave
    NextLevel,
}

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// A single oscillator tone with an exponential fade-out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Start frequency (Hz), ramps down over the duration
    pub freq: f32,
    pub waveform: Waveform,
    /// Seconds
    pub duration: f32,
    /// Peak gain before master volume
    pub volume: f32,
    /// Start offset from the trigger (seconds)
    pub delay: f32,
}

const fn tone(freq: f32, waveform: Waveform, duration: f32, volume: f32, delay: f32) -> Tone {
    Tone {
        freq,
        waveform,
        duration,
        volume,
        delay,
    }
}

const SHOOT: [Tone; 1] = [tone(440.0, Waveform::Triangle, 0.2, 0.1, 0.0)];
const EXPLOSION: [Tone; 1] = [tone(150.0, Waveform::Sawtooth, 0.4, 0.15, 0.0)];
const DAMAGE: [Tone; 1] = [tone(100.0, Waveform::Square, 0.3, 0.2, 0.0)];
// C5 - E5 - G5 arpeggio
const NEXT_LEVEL: [Tone; 3] = [
    tone(523.0, Waveform::Sine, 0.2, 0.1, 0.0),
    tone(659.0, Waveform::Sine, 0.2, 0.1, 0.1),
    tone(783.0, Waveform::Sine, 0.4, 0.1, 0.2),
];

impl SoundEffect {
    /// Tones making up this effect
    pub fn tones(self) -> &'static [Tone] {
        match self {
            SoundEffect::Shoot => &SHOOT,
            SoundEffect::Explosion => &EXPLOSION,
            SoundEffect::Damage => &DAMAGE,
            SoundEffect::NextLevel => &NEXT_LEVEL,
        }
    }

    /// Vibration length for haptic feedback, if the effect has one
    pub fn vibration_ms(self) -> Option<u32> {
        match self {
            SoundEffect::Damage => Some(200),
            SoundEffect::Explosion => Some(40),
            _ => None,
        }
    }

    /// Sound triggered by a simulation event
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Shot => Some(SoundEffect::Shoot),
            GameEvent::EnemyDestroyed { .. } => Some(SoundEffect::Explosion),
            GameEvent::PlayerHit { .. } => Some(SoundEffect::Damage),
            _ => None,
        }
    }
}

/// Backend failures (never surfaced to the simulation)
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio output unavailable")]
    Unavailable,
    #[error("audio backend error: {0}")]
    Backend(String),
}

/// Something that can actually make noise or buzz
pub trait AudioBackend {
    /// Schedule a tone; must return without waiting for playback
    fn play_tone(&mut self, tone: &Tone, gain: f32) -> Result<(), AudioError>;

    /// Vibrate the device, if it can
    fn vibrate(&mut self, _ms: u32) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Backend that only logs what it would play (native/headless)
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play_tone(&mut self, tone: &Tone, gain: f32) -> Result<(), AudioError> {
        log::debug!(
            "tone {:.0}Hz {:?} {:.2}s gain {:.2} (+{:.1}s)",
            tone.freq,
            tone.waveform,
            tone.duration,
            gain,
            tone.delay
        );
        Ok(())
    }

    fn vibrate(&mut self, ms: u32) -> Result<(), AudioError> {
        log::debug!("vibrate {}ms", ms);
        Ok(())
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Option<Box<dyn AudioBackend>>,
    master_volume: f32,
    enabled: bool,
    haptics: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::silent()
    }
}

impl AudioManager {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend: Some(backend),
            master_volume: 0.8,
            enabled: true,
            haptics: true,
        }
    }

    /// Manager with no output at all (e.g. audio init failed)
    pub fn silent() -> Self {
        Self {
            backend: None,
            master_volume: 0.8,
            enabled: true,
            haptics: true,
        }
    }

    /// Global sound toggle
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_haptics(&mut self, haptics: bool) {
        self.haptics = haptics;
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Play a sound effect (and its vibration). Never fails.
    pub fn play(&mut self, effect: SoundEffect) {
        let Some(backend) = self.backend.as_mut() else {
            return;
        };

        if self.haptics {
            if let Some(ms) = effect.vibration_ms() {
                if let Err(e) = backend.vibrate(ms) {
                    log::debug!("Haptics failed for {:?}: {}", effect, e);
                }
            }
        }

        if !self.enabled || self.master_volume <= 0.0 {
            return;
        }
        for tone in effect.tones() {
            if let Err(e) = backend.play_tone(tone, tone.volume * self.master_volume) {
                log::debug!("Dropped {:?}: {}", effect, e);
                return;
            }
        }
    }
}

/// Web Audio + navigator.vibrate backend
#[cfg(target_arch = "wasm32")]
pub mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioBackend, AudioError, Tone, Waveform};

    pub struct WebAudioBackend {
        ctx: AudioContext,
    }

    impl WebAudioBackend {
        /// Fails outside a secure context or without audio permission
        pub fn new() -> Result<Self, AudioError> {
            let ctx = AudioContext::new().map_err(|_| AudioError::Unavailable)?;
            Ok(Self { ctx })
        }

        /// Create an oscillator with gain envelope
        fn create_osc(&self, tone: &Tone) -> Result<(OscillatorNode, GainNode), AudioError> {
            let err = |e| AudioError::Backend(format!("{:?}", e));
            let osc = self.ctx.create_oscillator().map_err(err)?;
            let gain = self.ctx.create_gain().map_err(err)?;

            osc.set_type(match tone.waveform {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Square => OscillatorType::Square,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
                Waveform::Triangle => OscillatorType::Triangle,
            });
            osc.connect_with_audio_node(&gain).map_err(err)?;
            gain.connect_with_audio_node(&self.ctx.destination())
                .map_err(err)?;
            Ok((osc, gain))
        }
    }

    impl AudioBackend for WebAudioBackend {
        fn play_tone(&mut self, tone: &Tone, gain_value: f32) -> Result<(), AudioError> {
            // Resume context if suspended (browsers require user gesture)
            if self.ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = self.ctx.resume();
            }

            let (osc, gain) = self.create_osc(tone)?;
            let t = self.ctx.current_time() + tone.delay as f64;
            let end = t + tone.duration as f64;

            osc.frequency().set_value_at_time(tone.freq, t).ok();
            osc.frequency().exponential_ramp_to_value_at_time(1.0, end).ok();
            gain.gain().set_value_at_time(gain_value, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok();

            osc.start_with_when(t)
                .map_err(|e| AudioError::Backend(format!("{:?}", e)))?;
            osc.stop_with_when(end).ok();
            Ok(())
        }

        fn vibrate(&mut self, ms: u32) -> Result<(), AudioError> {
            let window = web_sys::window().ok_or(AudioError::Unavailable)?;
            window.navigator().vibrate_with_duration(ms);
            Ok(())
        }
    }
}

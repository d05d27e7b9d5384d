//! Session controller
//!
//! Owns the World, the Session and the feedback sinks. Input handlers only
//! touch the shared control set; everything else goes through `Game`.

use crate::audio::{AudioManager, SoundEffect};
use crate::input::{Control, ControlSet, SharedControls};
use crate::settings::Settings;
use crate::sim::{Action, GameEvent, GameStatus, Session, TickInput, Transition, World, tick};
use crate::tuning::Tuning;

/// Draws a frame. The World is read-only to renderers.
pub trait Renderer {
    fn draw(&mut self, world: &World, session: &Session);
}

/// Renderer that draws nothing (headless runs, tests)
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw(&mut self, _world: &World, _session: &Session) {}
}

/// Game instance holding all state
pub struct Game {
    world: World,
    session: Session,
    tuning: Tuning,
    settings: Settings,
    audio: AudioManager,
    controls: SharedControls,
    /// Controls held last frame, for Pause/Restart edge detection
    prev_controls: ControlSet,
}

impl Game {
    pub fn new(settings: Settings, tuning: Tuning, audio: AudioManager) -> Self {
        let seed = settings.resolve_seed();
        log::info!("New game (seed {})", seed);

        let mut world = World::new(seed);
        world.effects = settings.effect_limits();

        let mut session = Session::new();
        session.sound_enabled = settings.sound_enabled;

        let mut audio = audio;
        audio.set_enabled(settings.sound_enabled);
        audio.set_haptics(settings.haptics);
        audio.set_master_volume(settings.master_volume);

        Self {
            world,
            session,
            tuning,
            settings,
            audio,
            controls: SharedControls::new(),
            prev_controls: ControlSet::empty(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn status(&self) -> GameStatus {
        self.session.status
    }

    /// Handle for input handlers (keyboard, touch buttons, autopilot)
    pub fn controls(&self) -> SharedControls {
        self.controls.clone()
    }

    /// Apply a menu/player action. Returns whether it changed anything.
    pub fn apply(&mut self, action: Action) -> bool {
        let Some(t) = self.session.apply(action, &mut self.world, &self.tuning) else {
            return false;
        };
        if t == Transition::NextWave {
            self.audio.play(SoundEffect::NextLevel);
        }
        true
    }

    /// Flip the global sound toggle
    pub fn toggle_sound(&mut self) -> bool {
        let enabled = !self.session.sound_enabled;
        self.session.sound_enabled = enabled;
        self.settings.sound_enabled = enabled;
        self.audio.set_enabled(enabled);
        log::info!("Sound {}", if enabled { "on" } else { "off" });
        enabled
    }

    /// Run one frame: read input, tick, and fire feedback for the events.
    pub fn frame(&mut self, now_ms: u64) -> Vec<GameEvent> {
        let controls = self.controls.snapshot();
        let pressed = controls.pressed_since(self.prev_controls);
        self.prev_controls = controls;

        if pressed.contains(Control::Pause) {
            self.apply(Action::TogglePause);
        }
        if pressed.contains(Control::Restart) {
            self.apply(Action::Restart);
        }

        let input = TickInput { now_ms, controls };
        let events = tick(&mut self.world, &mut self.session, &input, &self.tuning);

        for event in &events {
            if let Some(effect) = SoundEffect::for_event(event) {
                self.audio.play(effect);
            }
        }
        events
    }

    /// Hand the current state to a renderer
    pub fn render(&self, renderer: &mut dyn Renderer) {
        renderer.draw(&self.world, &self.session);
    }
}

//! Session state (score, lives, wave, status) and its transition table

use serde::{Deserialize, Serialize};

use super::state::{GameStatus, World};
use super::wave::generate_wave;
use crate::consts::INITIAL_LIVES;
use crate::tuning::Tuning;

/// Player/menu actions that may change the session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Start button on the title screen
    Start,
    /// Pause key
    TogglePause,
    /// Restart key (title screen or game over)
    Restart,
    /// Advance after clearing a wave
    NextWave,
    /// Back to the title screen
    ReturnToMenu,
}

/// What a valid transition does besides changing status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Reset score/lives/wave and load wave 1
    NewGame,
    /// Bump the wave number and load it
    NextWave,
    /// Status change only
    To(GameStatus),
}

/// The single transition table. `None` means the action is ignored.
pub fn transition(status: GameStatus, action: Action) -> Option<Transition> {
    use GameStatus::*;
    match (status, action) {
        (Start, Action::Start) => Some(Transition::NewGame),
        (Start | GameOver, Action::Restart) => Some(Transition::NewGame),
        (Playing, Action::TogglePause) => Some(Transition::To(Paused)),
        (Paused, Action::TogglePause) => Some(Transition::To(Playing)),
        (LevelComplete, Action::NextWave) => Some(Transition::NextWave),
        (Playing | Paused | GameOver | LevelComplete, Action::ReturnToMenu) => {
            Some(Transition::To(Start))
        }
        _ => None,
    }
}

/// Process-wide session state kept outside the World
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub score: u64,
    pub lives: u8,
    /// Current wave (1-based)
    pub level: u32,
    pub status: GameStatus,
    pub sound_enabled: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            score: 0,
            lives: INITIAL_LIVES,
            level: 1,
            status: GameStatus::Start,
            sound_enabled: true,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a player/menu action. Returns the transition taken, if any.
    pub fn apply(&mut self, action: Action, world: &mut World, tuning: &Tuning) -> Option<Transition> {
        let Some(t) = transition(self.status, action) else {
            log::debug!("Ignoring {:?} while {:?}", action, self.status);
            return None;
        };

        match t {
            Transition::NewGame => {
                self.score = 0;
                self.lives = INITIAL_LIVES;
                self.level = 1;
                generate_wave(world, self.level, tuning);
                self.set_status(GameStatus::Playing);
            }
            Transition::NextWave => {
                self.level += 1;
                generate_wave(world, self.level, tuning);
                self.set_status(GameStatus::Playing);
            }
            Transition::To(status) => self.set_status(status),
        }
        Some(t)
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    /// Credit points for a destroyed enemy
    pub fn add_score(&mut self, points: u32) {
        self.score += points as u64;
    }

    /// Take one life; ends the run at zero. Returns lives left.
    pub fn lose_life(&mut self) -> u8 {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.end_game();
        }
        self.lives
    }

    /// Playing -> GameOver (ignored in any other status)
    pub fn end_game(&mut self) {
        if self.is_playing() {
            self.set_status(GameStatus::GameOver);
        }
    }

    /// Playing -> LevelComplete (ignored in any other status)
    pub fn complete_level(&mut self) {
        if self.is_playing() {
            self.set_status(GameStatus::LevelComplete);
        }
    }

    fn set_status(&mut self, status: GameStatus) {
        if self.status != status {
            log::info!(
                "Status {:?} -> {:?} (wave {}, score {}, lives {})",
                self.status,
                status,
                self.level,
                self.score,
                self.lives
            );
            self.status = status;
        }
    }
}

//! Cell Rider - a fixed-grid invader arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, waves, game state)
//! - `input`: Held-control set shared with input handlers
//! - `audio`: Fire-and-forget sound and haptic feedback
//! - `game`: Session controller gluing simulation, input, audio and rendering
//! - `driver`: Fixed-rate frame loop
//! - `settings`: Player preferences
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod driver;
pub mod game;
pub mod input;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::{Game, Renderer};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Playfield geometry constants (pixels)
pub mod consts {
    /// Playfield dimensions
    pub const GAME_WIDTH: f32 = 800.0;
    pub const GAME_HEIGHT: f32 = 600.0;

    /// Player ship
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    /// Top edge of the player's row
    pub const PLAYER_Y: f32 = GAME_HEIGHT - 50.0;
    /// Spawn height of player bullets
    pub const MUZZLE_Y: f32 = GAME_HEIGHT - 60.0;
    pub const INITIAL_LIVES: u8 = 3;

    /// Bullets (both owners)
    pub const BULLET_WIDTH: f32 = 4.0;
    pub const BULLET_HEIGHT: f32 = 12.0;

    /// Enemy grid
    pub const ENEMY_ROWS: usize = 5;
    pub const ENEMY_COLS: usize = 11;
    pub const ENEMY_WIDTH: f32 = 30.0;
    pub const ENEMY_HEIGHT: f32 = 30.0;
    pub const ENEMY_PADDING: f32 = 15.0;
    pub const ENEMY_GRID_LEFT: f32 = 50.0;
    pub const ENEMY_GRID_TOP: f32 = 80.0;
    /// An active enemy whose bottom edge passes this line ends the game
    pub const BREACH_LINE: f32 = GAME_HEIGHT - 70.0;

    /// Barrier clusters
    pub const BARRIER_COUNT: usize = 4;
    pub const BARRIER_WIDTH: f32 = 60.0;
    pub const BARRIER_HEIGHT: f32 = 40.0;
    pub const BARRIER_BLOCK_SIZE: f32 = 5.0;
    pub const BARRIER_TOP: f32 = GAME_HEIGHT - 120.0;

    /// Decorative background stars
    pub const STAR_COUNT: usize = 50;
}

/// Packed 0xRRGGBB colors used for particles and by renderers
pub mod colors {
    pub const BACKGROUND: u32 = 0x0f172a;
    pub const PLAYER: u32 = 0xffffff;
    pub const ENEMY: [u32; 3] = [0xf472b6, 0xc084fc, 0x818cf8];
    pub const BULLET: u32 = 0xfef08a;
    pub const BARRIER: u32 = 0x10b981;
    pub const TEXT: u32 = 0xffffff;

    /// Color for an enemy type, wrapping out-of-range types
    #[inline]
    pub fn enemy(kind: u8) -> u32 {
        ENEMY[kind as usize % ENEMY.len()]
    }
}

/// Clamp a player x position into the playfield
#[inline]
pub fn clamp_player_x(x: f32) -> f32 {
    x.clamp(0.0, consts::GAME_WIDTH - consts::PLAYER_WIDTH)
}

/// Player x that centers the ship horizontally
#[inline]
pub fn centered_player_x() -> f32 {
    consts::GAME_WIDTH / 2.0 - consts::PLAYER_WIDTH / 2.0
}

/// Point where player bullets spawn for a ship at `player_x`
#[inline]
pub fn muzzle_position(player_x: f32) -> Vec2 {
    Vec2::new(
        player_x + consts::PLAYER_WIDTH / 2.0 - consts::BULLET_WIDTH / 2.0,
        consts::MUZZLE_Y,
    )
}

//! Game state and core simulation types
//!
//! One container per entity kind. The World is owned by the simulation step
//! and only read by renderers.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;
use crate::input::ControlSet;
use crate::{centered_player_x, colors};

/// Session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameStatus {
    /// Title screen, nothing simulated yet
    #[default]
    Start,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended (lives exhausted or formation breached the player line)
    GameOver,
    /// Every enemy of the wave destroyed, waiting for the next wave
    LevelComplete,
}

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// A projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: Vec2,
    pub active: bool,
    pub owner: BulletOwner,
}

impl Bullet {
    pub fn new(pos: Vec2, owner: BulletOwner) -> Self {
        Self {
            pos,
            size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
            active: true,
            owner,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn is_player(&self) -> bool {
        self.owner == BulletOwner::Player
    }
}

/// An enemy in the formation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    pub active: bool,
    /// Visual type 0..=2 (row % 3)
    pub kind: u8,
    /// Score awarded when destroyed
    pub points: u32,
}

impl Enemy {
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    pub fn color(&self) -> u32 {
        colors::enemy(self.kind)
    }
}

/// One destructible block of a barrier cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarrierBlock {
    pub pos: Vec2,
    pub size: Vec2,
    /// Starts at 1; any impact drops it to 0
    pub health: u8,
}

impl BarrierBlock {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::splat(BARRIER_BLOCK_SIZE),
            health: 1,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn is_standing(&self) -> bool {
        self.health > 0
    }

    /// Knock the block out; health never goes below zero
    pub fn destroy(&mut self) {
        self.health = 0;
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Displacement per frame
    pub vel: Vec2,
    /// 1.0 at spawn, removed at or below 0
    pub life: f32,
    /// 0xRRGGBB
    pub color: u32,
}

/// Decorative background star (never collides)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    /// Downward drift per frame
    pub speed: f32,
}

/// Things that happened during a tick, consumed by audio/haptics and HUD
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Player fired
    Shot,
    /// Player bullet destroyed an enemy
    EnemyDestroyed { points: u32, at: Vec2 },
    /// A bullet knocked out a barrier block
    BarrierHit { at: Vec2 },
    /// Enemy bullet hit the player
    PlayerHit { lives_left: u8 },
    /// Enemy formation fired
    EnemyShot,
    /// No active enemies remain
    WaveCleared,
    /// Lives exhausted or formation reached the player line
    GameOver,
}

/// Visual effect limits applied by the effects emitter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectLimits {
    /// Maximum live particles (0 disables particles)
    pub max_particles: usize,
    /// Whether explosions shake the screen
    pub screen_shake: bool,
}

impl Default for EffectLimits {
    fn default() -> Self {
        Self {
            max_particles: MAX_PARTICLES,
            screen_shake: true,
        }
    }
}

/// Default particle cap
pub const MAX_PARTICLES: usize = 500;

/// The mutable simulation aggregate
#[derive(Debug, Clone)]
pub struct World {
    /// Left edge of the player ship
    pub player_x: f32,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub barriers: Vec<BarrierBlock>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Background star field (not gameplay-affecting)
    pub stars: Vec<Star>,
    /// Formation direction, +1 (right) or -1 (left)
    pub direction: f32,
    /// Host time of the last formation move
    pub last_enemy_move_ms: Option<u64>,
    /// Host time of the last player shot
    pub last_shot_ms: Option<u64>,
    /// Controls held during the current tick
    pub controls: ControlSet,
    /// Screen shake magnitude (px)
    pub shake: f32,
    /// Ticks simulated while playing
    pub frame: u64,
    pub effects: EffectLimits,
    pub rng: Pcg32,
}

impl World {
    /// Create an empty world (no wave loaded) with the given seed
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = (0..STAR_COUNT)
            .map(|_| Star {
                pos: Vec2::new(
                    rng.random_range(0.0..GAME_WIDTH),
                    rng.random_range(0.0..GAME_HEIGHT),
                ),
                speed: rng.random_range(0.2..1.2),
            })
            .collect();

        Self {
            player_x: centered_player_x(),
            bullets: Vec::new(),
            enemies: Vec::new(),
            barriers: Vec::new(),
            particles: Vec::new(),
            stars,
            direction: 1.0,
            last_enemy_move_ms: None,
            last_shot_ms: None,
            controls: ControlSet::empty(),
            shake: 0.0,
            frame: 0,
            effects: EffectLimits::default(),
            rng,
        }
    }

    /// The player's hit box (fixed band at the bottom of the playfield)
    pub fn player_rect(&self) -> Rect {
        Rect::new(self.player_x, PLAYER_Y, PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    pub fn active_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.active)
    }

    pub fn active_enemy_count(&self) -> usize {
        self.active_enemies().count()
    }

    pub fn active_bullets(&self) -> impl Iterator<Item = &Bullet> {
        self.bullets.iter().filter(|b| b.active)
    }
}

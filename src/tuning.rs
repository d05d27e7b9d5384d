//! Data-driven game balance
//!
//! Every gameplay constant that affects difficulty lives here so a run can be
//! retuned from JSON without touching simulation code.

use serde::{Deserialize, Serialize};

use crate::consts::{ENEMY_COLS, ENEMY_ROWS};

/// How an enemy's row maps to its point value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PointPolicy {
    /// `(3 - row % 3) * 10`: 30/20/10 repeating from the top row
    #[default]
    RowTier,
    /// `(row + 1) * 20`: lower rows are worth more
    RowLinear,
}

impl PointPolicy {
    pub fn points(&self, row: usize) -> u32 {
        match self {
            PointPolicy::RowTier => (3 - (row % 3) as u32) * 10,
            PointPolicy::RowLinear => (row as u32 + 1) * 20,
        }
    }
}

/// Shape each barrier cluster is tiled into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BarrierLayout {
    /// Every block of the cluster box
    #[default]
    Solid,
    /// Only blocks whose center lies inside the inscribed ellipse
    Ellipse,
}

/// Gameplay balance parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Player horizontal speed (px/frame)
    pub player_speed: f32,
    /// Minimum time between player shots (ms)
    pub fire_cooldown_ms: u64,
    /// Player bullet speed (px/frame, upward)
    pub player_bullet_speed: f32,
    /// Enemy bullet speed on wave 1 (px/frame, downward)
    pub enemy_bullet_speed: f32,
    /// Enemy bullet speed added per wave after the first
    pub enemy_bullet_speed_per_wave: f32,
    /// Enemy bullet speed cap
    pub enemy_bullet_speed_max: f32,

    /// Formation move interval before any reductions (ms)
    pub move_interval_base_ms: u64,
    /// Interval reduction per wave number (ms)
    pub move_interval_per_wave_ms: u64,
    /// Interval reduction per destroyed enemy (ms)
    pub move_interval_per_kill_ms: u64,
    /// Interval never drops below this (ms)
    pub move_interval_floor_ms: u64,
    /// Horizontal formation step (px)
    pub formation_step: f32,
    /// Vertical drop on edge bounce (px)
    pub formation_drop: f32,

    /// Enemy fire roll happens every this many frames
    pub enemy_fire_cadence_frames: u64,
    /// Chance that a fire roll succeeds on wave 0
    pub enemy_fire_base_chance: f64,
    /// Chance added per wave number
    pub enemy_fire_chance_per_wave: f64,

    /// Particles per explosion
    pub explosion_particles: usize,
    /// Particles per destroyed barrier block
    pub debris_particles: usize,
    /// Particle life lost per frame
    pub particle_decay: f32,
    /// Screen shake damping per frame
    pub shake_damping: f32,

    pub point_policy: PointPolicy,
    pub barrier_layout: BarrierLayout,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: 5.0,
            fire_cooldown_ms: 400,
            player_bullet_speed: 7.0,
            enemy_bullet_speed: 7.0,
            enemy_bullet_speed_per_wave: 0.5,
            enemy_bullet_speed_max: 12.0,

            move_interval_base_ms: 1000,
            move_interval_per_wave_ms: 100,
            move_interval_per_kill_ms: 20,
            move_interval_floor_ms: 100,
            formation_step: 10.0,
            formation_drop: 20.0,

            enemy_fire_cadence_frames: 60,
            enemy_fire_base_chance: 0.2,
            enemy_fire_chance_per_wave: 0.05,

            explosion_particles: 8,
            debris_particles: 3,
            particle_decay: 0.02,
            shake_damping: 0.9,

            point_policy: PointPolicy::RowTier,
            barrier_layout: BarrierLayout::Solid,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Milliseconds between formation moves.
    ///
    /// Shrinks with the wave number and with every enemy already destroyed.
    pub fn move_interval_ms(&self, wave: u32, destroyed: usize) -> u64 {
        let reduction = self.move_interval_per_wave_ms * wave as u64
            + self.move_interval_per_kill_ms * destroyed as u64;
        self.move_interval_base_ms
            .saturating_sub(reduction)
            .max(self.move_interval_floor_ms)
    }

    /// Downward speed of enemy bullets on `wave`
    pub fn enemy_bullet_speed(&self, wave: u32) -> f32 {
        let extra = wave.saturating_sub(1) as f32 * self.enemy_bullet_speed_per_wave;
        (self.enemy_bullet_speed + extra).min(self.enemy_bullet_speed_max)
    }

    /// Probability that a fire roll on `wave` produces a shot
    pub fn enemy_fire_chance(&self, wave: u32) -> f64 {
        (self.enemy_fire_base_chance + wave as f64 * self.enemy_fire_chance_per_wave).clamp(0.0, 1.0)
    }

    /// Total enemies in a fresh wave
    pub fn wave_size(&self) -> usize {
        ENEMY_ROWS * ENEMY_COLS
    }
}

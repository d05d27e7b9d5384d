//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Host time is passed in through `TickInput`
//! - Seeded RNG only (owned by the World)
//! - Stable container order
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod effects;
pub mod session;
pub mod state;
pub mod tick;
pub mod wave;

pub use autopilot::autopilot;
pub use collision::{Rect, overlaps};
pub use effects::{Intensity, spawn_explosion};
pub use session::{Action, Session, Transition, transition};
pub use state::{
    BarrierBlock, Bullet, BulletOwner, EffectLimits, Enemy, GameEvent, GameStatus, MAX_PARTICLES,
    Particle, Star, World,
};
pub use tick::{TickInput, tick};
pub use wave::generate_wave;

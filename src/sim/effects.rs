//! Particle bursts and screen shake for destructive events

use glam::Vec2;
use rand::Rng;

use super::state::{Particle, World};

/// How violent an effect is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intensity {
    /// Debris puff, no shake
    Minor,
    /// Enemy destroyed
    Normal,
    /// Player hit
    Major,
}

impl Intensity {
    /// Spread of spawned velocities (px/frame, full width)
    pub fn radius(self) -> f32 {
        match self {
            Intensity::Minor => 2.0,
            Intensity::Normal => 4.0,
            Intensity::Major => 6.0,
        }
    }

    /// Shake magnitude set by the burst (None leaves shake untouched)
    pub fn shake(self) -> Option<f32> {
        match self {
            Intensity::Minor => None,
            Intensity::Normal => Some(4.0),
            Intensity::Major => Some(10.0),
        }
    }
}

/// Spawn `count` particles at `origin` and kick the screen shake.
///
/// Velocity components are uniform in `±radius/2`. The particle cap from
/// `world.effects` is honoured; shake is skipped when disabled.
pub fn spawn_explosion(world: &mut World, origin: Vec2, color: u32, count: usize, intensity: Intensity) {
    let half = intensity.radius() / 2.0;
    let room = world.effects.max_particles.saturating_sub(world.particles.len());

    for _ in 0..count.min(room) {
        let vel = Vec2::new(
            world.rng.random_range(-half..=half),
            world.rng.random_range(-half..=half),
        );
        world.particles.push(Particle {
            pos: origin,
            vel,
            life: 1.0,
            color,
        });
    }

    if world.effects.screen_shake {
        if let Some(shake) = intensity.shake() {
            world.shake = shake;
        }
    }
}

/// Advance particles one frame and drop dead ones
pub fn update_particles(world: &mut World, decay: f32) {
    for particle in world.particles.iter_mut() {
        particle.pos += particle.vel;
        particle.life -= decay;
    }
    world.particles.retain(|p| p.life > 0.0);
}

/// Damp screen shake, snapping tiny values to zero
pub fn decay_shake(world: &mut World, damping: f32) {
    world.shake *= damping;
    if world.shake < 0.01 {
        world.shake = 0.0;
    }
}

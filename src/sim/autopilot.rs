//! Demo-mode controller: picks held controls from the current World
//!
//! Used for attract mode and headless runs. Tracks the lowest active enemy,
//! sidesteps enemy bullets that are about to land, and keeps fire held.

use super::state::{BulletOwner, World};
use crate::consts::*;
use crate::input::{Control, ControlSet};

/// How far above the player an enemy bullet counts as a threat (px)
const DANGER_HEIGHT: f32 = 120.0;
/// Horizontal slack before the ship bothers to move (px)
const DEAD_ZONE: f32 = 4.0;

/// Controls the autopilot would hold this frame
pub fn autopilot(world: &World) -> ControlSet {
    let mut controls = ControlSet::empty().with(Control::Fire);
    let player = world.player_rect();
    let ship_center = player.center().x;

    // Dodge first: move away from the nearest incoming bullet in our lane
    let threat = world
        .bullets
        .iter()
        .filter(|b| b.active && b.owner == BulletOwner::Enemy)
        .filter(|b| b.pos.y + b.size.y > player.pos.y - DANGER_HEIGHT && b.pos.y < player.bottom())
        .filter(|b| b.pos.x + b.size.x > player.pos.x - 4.0 && b.pos.x < player.right() + 4.0)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

    if let Some(bullet) = threat {
        let bullet_center = bullet.pos.x + bullet.size.x / 2.0;
        let go_left = if player.pos.x <= 0.0 {
            false
        } else if player.right() >= GAME_WIDTH {
            true
        } else {
            bullet_center >= ship_center
        };
        controls.insert(if go_left {
            Control::MoveLeft
        } else {
            Control::MoveRight
        });
        return controls;
    }

    // Otherwise line up under the lowest enemy (ties broken by distance)
    let target = world.active_enemies().max_by(|a, b| {
        a.pos
            .y
            .total_cmp(&b.pos.y)
            .then_with(|| (b.center().x - ship_center).abs().total_cmp(&(a.center().x - ship_center).abs()))
    });

    if let Some(enemy) = target {
        let dx = enemy.center().x - ship_center;
        if dx < -DEAD_ZONE {
            controls.insert(Control::MoveLeft);
        } else if dx > DEAD_ZONE {
            controls.insert(Control::MoveRight);
        }
    }
    controls
}

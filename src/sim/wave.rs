//! Wave generation: enemy grid and barrier field

use glam::Vec2;

use super::state::{BarrierBlock, Enemy, World};
use crate::consts::*;
use crate::tuning::{BarrierLayout, Tuning};

/// Populate `world` with a fresh formation and barrier field.
///
/// The layout is the same for every wave; `wave` is only logged. Difficulty
/// scales with `Session::level` through the `Tuning` formulas at tick time.
/// Bullets and particles are cleared, the formation direction resets to +1
/// and the move timer restarts, so calling this twice never leaks entities
/// from the earlier call. Wave numbers are 1-based; 0 is treated as 1.
pub fn generate_wave(world: &mut World, wave: u32, tuning: &Tuning) {
    let wave = wave.max(1);

    world.enemies = build_formation(tuning);
    world.barriers = build_barriers(tuning.barrier_layout);
    world.bullets.clear();
    world.particles.clear();
    world.direction = 1.0;
    world.last_enemy_move_ms = None;
    world.shake = 0.0;

    log::info!(
        "Wave {}: {} enemies, {} barrier blocks ({:?})",
        wave,
        world.enemies.len(),
        world.barriers.len(),
        tuning.barrier_layout
    );
}

fn build_formation(tuning: &Tuning) -> Vec<Enemy> {
    let mut enemies = Vec::with_capacity(ENEMY_ROWS * ENEMY_COLS);
    for row in 0..ENEMY_ROWS {
        for col in 0..ENEMY_COLS {
            enemies.push(Enemy {
                pos: Vec2::new(
                    ENEMY_GRID_LEFT + col as f32 * (ENEMY_WIDTH + ENEMY_PADDING),
                    ENEMY_GRID_TOP + row as f32 * (ENEMY_HEIGHT + ENEMY_PADDING),
                ),
                size: Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT),
                active: true,
                kind: (row % 3) as u8,
                points: tuning.point_policy.points(row),
            });
        }
    }
    enemies
}

/// X of the left edge of each barrier cluster, evenly spaced across the width
pub fn barrier_anchors() -> impl Iterator<Item = f32> {
    let spacing = GAME_WIDTH / (BARRIER_COUNT as f32 + 1.0);
    (0..BARRIER_COUNT).map(move |i| (i as f32 + 1.0) * spacing - BARRIER_WIDTH / 2.0)
}

fn build_barriers(layout: BarrierLayout) -> Vec<BarrierBlock> {
    let cols = (BARRIER_WIDTH / BARRIER_BLOCK_SIZE) as usize;
    let rows = (BARRIER_HEIGHT / BARRIER_BLOCK_SIZE) as usize;

    let mut blocks = Vec::with_capacity(BARRIER_COUNT * cols * rows);
    for left in barrier_anchors() {
        for cx in 0..cols {
            for cy in 0..rows {
                let offset = Vec2::new(cx as f32, cy as f32) * BARRIER_BLOCK_SIZE;
                if layout == BarrierLayout::Ellipse && !inside_cluster_ellipse(offset) {
                    continue;
                }
                blocks.push(BarrierBlock::new(Vec2::new(left, BARRIER_TOP) + offset));
            }
        }
    }
    blocks
}

/// Whether the block at `offset` (relative to the cluster's top-left) has its
/// center inside the ellipse inscribed in the cluster box
fn inside_cluster_ellipse(offset: Vec2) -> bool {
    let radii = Vec2::new(BARRIER_WIDTH, BARRIER_HEIGHT) / 2.0;
    let center = offset + Vec2::splat(BARRIER_BLOCK_SIZE / 2.0);
    let d = (center - radii) / radii;
    d.length_squared() <= 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Bullet, BulletOwner};
    use crate::tuning::PointPolicy;

    #[test]
    fn test_formation_layout() {
        let mut world = World::new(1);
        generate_wave(&mut world, 1, &Tuning::default());

        assert_eq!(world.enemies.len(), 55);
        assert!(world.enemies.iter().all(|e| e.active));

        let first = &world.enemies[0];
        assert_eq!(first.pos, Vec2::new(50.0, 80.0));
        assert_eq!(first.kind, 0);
        assert_eq!(first.points, 30);

        // Row 1, column 1
        let e = &world.enemies[ENEMY_COLS + 1];
        assert_eq!(e.pos, Vec2::new(95.0, 125.0));
        assert_eq!(e.kind, 1);
        assert_eq!(e.points, 20);

        // Row 3 wraps back to type 0
        assert_eq!(world.enemies[3 * ENEMY_COLS].kind, 0);
    }

    #[test]
    fn test_linear_point_policy() {
        let mut world = World::new(1);
        let tuning = Tuning {
            point_policy: PointPolicy::RowLinear,
            ..Default::default()
        };
        generate_wave(&mut world, 1, &tuning);
        assert_eq!(world.enemies[0].points, 20);
        assert_eq!(world.enemies[4 * ENEMY_COLS].points, 100);
    }

    #[test]
    fn test_solid_barriers() {
        let mut world = World::new(1);
        generate_wave(&mut world, 1, &Tuning::default());

        // 4 clusters of 12 x 8 blocks
        assert_eq!(world.barriers.len(), 4 * 12 * 8);
        assert!(world.barriers.iter().all(|b| b.health == 1));
        let lefts: Vec<f32> = barrier_anchors().collect();
        assert_eq!(lefts, vec![130.0, 290.0, 450.0, 610.0]);
        assert_eq!(world.barriers[0].pos, Vec2::new(130.0, 480.0));
    }

    #[test]
    fn test_ellipse_barriers_are_a_subset() {
        let mut world = World::new(1);
        let tuning = Tuning {
            barrier_layout: BarrierLayout::Ellipse,
            ..Default::default()
        };
        generate_wave(&mut world, 1, &tuning);

        let count = world.barriers.len();
        assert!(count > 0 && count < 4 * 12 * 8);
        assert_eq!(count % 4, 0);
        // Corner blocks are cut away
        assert!(
            !world
                .barriers
                .iter()
                .any(|b| b.pos == Vec2::new(130.0, 480.0))
        );
    }

    #[test]
    fn test_regenerate_does_not_leak() {
        let tuning = Tuning::default();
        let mut world = World::new(9);
        generate_wave(&mut world, 1, &tuning);
        world.bullets.push(Bullet::new(Vec2::new(10.0, 10.0), BulletOwner::Enemy));
        world.enemies[0].active = false;
        world.barriers.truncate(10);
        world.direction = -1.0;
        world.last_enemy_move_ms = Some(1234);

        generate_wave(&mut world, 2, &tuning);
        assert_eq!(world.enemies.len(), 55);
        assert!(world.enemies.iter().all(|e| e.active));
        assert_eq!(world.barriers.len(), 384);
        assert!(world.bullets.is_empty());
        assert!(world.particles.is_empty());
        assert_eq!(world.direction, 1.0);
        assert_eq!(world.last_enemy_move_ms, None);
    }
}

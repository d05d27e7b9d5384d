//! Per-frame simulation tick
//!
//! Advances the World by one frame. Passes run in a fixed order because later
//! passes read flags set by earlier ones in the same tick.

use glam::Vec2;
use rand::Rng;
use rand::seq::IteratorRandom;

use super::effects::{Intensity, decay_shake, spawn_explosion, update_particles};
use super::session::Session;
use super::state::{Bullet, BulletOwner, GameEvent, World};
use crate::colors;
use crate::consts::*;
use crate::input::{Control, ControlSet};
use crate::tuning::Tuning;
use crate::{clamp_player_x, muzzle_position};

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Host clock (ms) used by the fire cooldown and formation timer
    pub now_ms: u64,
    /// Level-triggered snapshot of held controls
    pub controls: ControlSet,
}

/// Advance the world by one frame.
///
/// Does nothing unless the session is playing. Returns the events that
/// occurred, in order, for audio/haptics and HUD consumers.
pub fn tick(
    world: &mut World,
    session: &mut Session,
    input: &TickInput,
    tuning: &Tuning,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !session.is_playing() {
        return events;
    }

    world.frame += 1;
    world.controls = input.controls;

    drift_stars(world);
    move_player(world, tuning);
    fire_player(world, input.now_ms, tuning, &mut events);
    update_bullets(world, session, tuning, &mut events);

    if session.is_playing() {
        let cleared = move_formation(world, session, input.now_ms, tuning, &mut events);
        if cleared {
            return events;
        }
    }
    if session.is_playing() {
        enemy_fire(world, session.level, tuning, &mut events);
    }

    update_particles(world, tuning.particle_decay);
    decay_shake(world, tuning.shake_damping);
    events
}

fn drift_stars(world: &mut World) {
    for star in world.stars.iter_mut() {
        star.pos.y += star.speed;
        if star.pos.y > GAME_HEIGHT {
            star.pos.y -= GAME_HEIGHT;
        }
    }
}

fn move_player(world: &mut World, tuning: &Tuning) {
    if world.controls.contains(Control::MoveLeft) {
        world.player_x -= tuning.player_speed;
    }
    if world.controls.contains(Control::MoveRight) {
        world.player_x += tuning.player_speed;
    }
    world.player_x = clamp_player_x(world.player_x);
}

fn fire_player(world: &mut World, now_ms: u64, tuning: &Tuning, events: &mut Vec<GameEvent>) {
    if !world.controls.contains(Control::Fire) {
        return;
    }
    let ready = world
        .last_shot_ms
        .is_none_or(|last| now_ms.saturating_sub(last) >= tuning.fire_cooldown_ms);
    if !ready {
        return;
    }

    world
        .bullets
        .push(Bullet::new(muzzle_position(world.player_x), BulletOwner::Player));
    world.last_shot_ms = Some(now_ms);
    events.push(GameEvent::Shot);
}

/// Move bullets and resolve bullet vs barrier, enemy and player hits
fn update_bullets(world: &mut World, session: &mut Session, tuning: &Tuning, events: &mut Vec<GameEvent>) {
    world.bullets.retain(|b| b.active);

    let enemy_speed = tuning.enemy_bullet_speed(session.level);
    let player_rect = world.player_rect();

    for i in 0..world.bullets.len() {
        {
            let bullet = &mut world.bullets[i];
            bullet.pos.y += match bullet.owner {
                BulletOwner::Player => -tuning.player_bullet_speed,
                BulletOwner::Enemy => enemy_speed,
            };
            if bullet.pos.y < 0.0 || bullet.pos.y > GAME_HEIGHT {
                bullet.active = false;
                continue;
            }
        }

        let rect = world.bullets[i].rect();

        // Barriers stop both owners' bullets
        if let Some(j) = world
            .barriers
            .iter()
            .position(|bar| bar.is_standing() && bar.rect().overlaps(&rect))
        {
            let block = &mut world.barriers[j];
            block.destroy();
            let at = block.rect().center();
            world.bullets[i].active = false;
            spawn_explosion(world, at, colors::BARRIER, tuning.debris_particles, Intensity::Minor);
            events.push(GameEvent::BarrierHit { at });
            continue;
        }

        match world.bullets[i].owner {
            BulletOwner::Player => {
                // An earlier bullet in this pass may have ended the game
                if !session.is_playing() {
                    continue;
                }
                let Some(j) = world
                    .enemies
                    .iter()
                    .position(|e| e.active && e.rect().overlaps(&rect))
                else {
                    continue;
                };
                let enemy = &mut world.enemies[j];
                enemy.active = false;
                let (points, at, color) = (enemy.points, enemy.center(), enemy.color());
                world.bullets[i].active = false;
                session.add_score(points);
                spawn_explosion(world, at, color, tuning.explosion_particles, Intensity::Normal);
                events.push(GameEvent::EnemyDestroyed { points, at });
            }
            BulletOwner::Enemy => {
                if !session.is_playing() || !player_rect.overlaps(&rect) {
                    continue;
                }
                world.bullets[i].active = false;
                let lives_left = session.lose_life();
                let at = Vec2::new(player_rect.center().x, GAME_HEIGHT - 40.0);
                spawn_explosion(world, at, colors::PLAYER, tuning.explosion_particles, Intensity::Major);
                events.push(GameEvent::PlayerHit { lives_left });
                if lives_left == 0 {
                    events.push(GameEvent::GameOver);
                }
            }
        }
    }

    world.barriers.retain(|bar| bar.is_standing());
}

/// Complete the wave if no enemy is left, otherwise step the formation once
/// its timer has elapsed. Returns true when the wave was cleared (the rest of
/// the tick must be skipped).
fn move_formation(
    world: &mut World,
    session: &mut Session,
    now_ms: u64,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) -> bool {
    let active = world.active_enemy_count();
    if active == 0 {
        session.complete_level();
        events.push(GameEvent::WaveCleared);
        return true;
    }

    let destroyed = tuning.wave_size().saturating_sub(active);
    let interval = tuning.move_interval_ms(session.level, destroyed);
    let due = world
        .last_enemy_move_ms
        .is_none_or(|last| now_ms.saturating_sub(last) >= interval);
    if !due {
        return false;
    }

    let direction = world.direction;
    let edge_reached = world.active_enemies().any(|e| {
        if direction > 0.0 {
            e.pos.x + e.size.x + ENEMY_PADDING > GAME_WIDTH
        } else {
            e.pos.x - ENEMY_PADDING < 0.0
        }
    });

    if edge_reached {
        world.direction = -direction;
        for enemy in world.enemies.iter_mut() {
            enemy.pos.y += tuning.formation_drop;
        }
        let breached = world
            .active_enemies()
            .any(|e| e.pos.y + e.size.y > BREACH_LINE);
        if breached {
            log::info!("Formation breached the player line");
            session.end_game();
            events.push(GameEvent::GameOver);
        }
    } else {
        let dx = tuning.formation_step * direction;
        for enemy in world.enemies.iter_mut() {
            enemy.pos.x += dx;
        }
    }

    world.last_enemy_move_ms = Some(now_ms);
    false
}

/// Occasionally let one random active enemy shoot
fn enemy_fire(world: &mut World, wave: u32, tuning: &Tuning, events: &mut Vec<GameEvent>) {
    let cadence = tuning.enemy_fire_cadence_frames.max(1);
    if world.frame % cadence != 0 {
        return;
    }
    if world.active_enemy_count() == 0 {
        return;
    }
    if !world.rng.random_bool(tuning.enemy_fire_chance(wave)) {
        return;
    }

    let Some(shooter) = world
        .enemies
        .iter()
        .filter(|e| e.active)
        .choose(&mut world.rng)
    else {
        return;
    };
    let muzzle = Vec2::new(
        shooter.pos.x + shooter.size.x / 2.0 - BULLET_WIDTH / 2.0,
        shooter.pos.y + shooter.size.y,
    );
    log::trace!("Enemy fires from {:?}", muzzle);
    world.bullets.push(Bullet::new(muzzle, BulletOwner::Enemy));
    events.push(GameEvent::EnemyShot);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::session::Action;
    use crate::sim::state::{BarrierBlock, Enemy, GameStatus};

    fn started(seed: u64) -> (World, Session, Tuning) {
        let tuning = Tuning::default();
        let mut world = World::new(seed);
        let mut session = Session::new();
        session.apply(Action::Start, &mut world, &tuning);
        (world, session, tuning)
    }

    fn held(controls: &[Control], now_ms: u64) -> TickInput {
        TickInput {
            now_ms,
            controls: controls.iter().copied().collect(),
        }
    }

    #[test]
    fn test_tick_noop_when_not_playing() {
        let tuning = Tuning::default();
        let mut world = World::new(1);
        let mut session = Session::new();
        let events = tick(&mut world, &mut session, &held(&[Control::Fire], 0), &tuning);
        assert!(events.is_empty());
        assert_eq!(world.frame, 0);
        assert!(world.bullets.is_empty());

        let (mut world, mut session, tuning) = started(1);
        session.apply(Action::TogglePause, &mut world, &tuning);
        let before = world.player_x;
        tick(&mut world, &mut session, &held(&[Control::MoveLeft], 0), &tuning);
        assert_eq!(world.player_x, before);
        assert_eq!(world.frame, 0);
    }

    #[test]
    fn test_player_moves_and_clamps() {
        let (mut world, mut session, tuning) = started(1);
        tick(&mut world, &mut session, &held(&[Control::MoveLeft], 0), &tuning);
        assert_eq!(world.player_x, 375.0);

        world.player_x = 2.0;
        tick(&mut world, &mut session, &held(&[Control::MoveLeft], 16), &tuning);
        assert_eq!(world.player_x, 0.0);

        world.player_x = GAME_WIDTH - PLAYER_WIDTH - 1.0;
        tick(&mut world, &mut session, &held(&[Control::MoveRight], 32), &tuning);
        assert_eq!(world.player_x, GAME_WIDTH - PLAYER_WIDTH);
    }

    #[test]
    fn test_fire_spawns_bullet_at_muzzle() {
        let (mut world, mut session, tuning) = started(1);
        world.barriers.clear();
        let events = tick(&mut world, &mut session, &held(&[Control::Fire], 1000), &tuning);
        assert!(events.contains(&GameEvent::Shot));

        let bullet = world.bullets.iter().find(|b| b.is_player()).unwrap();
        // Spawned at the muzzle then moved once
        assert_eq!(bullet.pos.x, world.player_x + 18.0);
        assert_eq!(bullet.pos.y, MUZZLE_Y - tuning.player_bullet_speed);
        assert_eq!(world.last_shot_ms, Some(1000));
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let (mut world, mut session, tuning) = started(1);
        world.barriers.clear();
        let fire = |t| held(&[Control::Fire], t);

        tick(&mut world, &mut session, &fire(0), &tuning);
        tick(&mut world, &mut session, &fire(200), &tuning);
        tick(&mut world, &mut session, &fire(399), &tuning);
        let shots = world.bullets.iter().filter(|b| b.is_player()).count();
        assert_eq!(shots, 1);

        tick(&mut world, &mut session, &fire(400), &tuning);
        let shots = world.bullets.iter().filter(|b| b.is_player()).count();
        assert_eq!(shots, 2);
    }

    #[test]
    fn test_player_bullet_destroys_enemy() {
        let (mut world, mut session, tuning) = started(1);
        world.enemies.truncate(2);
        world.enemies[0].pos = Vec2::new(98.0, 95.0);
        world.enemies[1].pos = Vec2::new(600.0, 95.0);
        let points = world.enemies[0].points;
        world.bullets.push(Bullet::new(Vec2::new(100.0, 100.0), BulletOwner::Player));

        let events = tick(&mut world, &mut session, &held(&[], 0), &tuning);

        assert!(!world.enemies[0].active);
        assert!(!world.bullets[0].active);
        assert_eq!(session.score, points as u64);
        assert!(events.contains(&GameEvent::EnemyDestroyed {
            points,
            at: Vec2::new(113.0, 110.0)
        }));
        assert_eq!(world.particles.len(), tuning.explosion_particles);
    }

    #[test]
    fn test_bullet_kills_only_one_enemy() {
        let (mut world, mut session, tuning) = started(1);
        world.enemies.truncate(3);
        world.enemies[0].pos = Vec2::new(98.0, 95.0);
        world.enemies[1].pos = Vec2::new(96.0, 90.0);
        world.enemies[2].pos = Vec2::new(600.0, 95.0);
        world.bullets.push(Bullet::new(Vec2::new(100.0, 100.0), BulletOwner::Player));

        tick(&mut world, &mut session, &held(&[], 0), &tuning);
        assert_eq!(world.enemies.iter().filter(|e| !e.active).count(), 1);
    }

    #[test]
    fn test_enemy_bullet_hits_player() {
        let (mut world, mut session, tuning) = started(1);
        let target = world.player_rect();
        world
            .bullets
            .push(Bullet::new(Vec2::new(target.pos.x + 10.0, PLAYER_Y), BulletOwner::Enemy));

        let events = tick(&mut world, &mut session, &held(&[], 0), &tuning);
        assert_eq!(session.lives, 2);
        assert_eq!(session.status, GameStatus::Playing);
        assert!(events.contains(&GameEvent::PlayerHit { lives_left: 2 }));
        assert_eq!(world.shake, 10.0 * tuning.shake_damping);
    }

    #[test]
    fn test_last_life_ends_game() {
        let (mut world, mut session, tuning) = started(1);
        session.lives = 1;
        let target = world.player_rect();
        world
            .bullets
            .push(Bullet::new(Vec2::new(target.pos.x + 10.0, PLAYER_Y), BulletOwner::Enemy));

        let events = tick(&mut world, &mut session, &held(&[], 0), &tuning);
        assert_eq!(session.lives, 0);
        assert_eq!(session.status, GameStatus::GameOver);
        assert!(events.contains(&GameEvent::GameOver));
        // Formation does not move after the game ended mid-tick
        assert_eq!(world.last_enemy_move_ms, None);
    }

    #[test]
    fn test_barrier_absorbs_bullet() {
        let (mut world, mut session, tuning) = started(1);
        world.barriers = vec![BarrierBlock::new(Vec2::new(200.0, 300.0))];
        world.bullets.push(Bullet::new(Vec2::new(200.0, 305.0), BulletOwner::Player));

        let events = tick(&mut world, &mut session, &held(&[], 0), &tuning);
        assert!(world.barriers.is_empty());
        assert!(!world.bullets[0].active);
        assert!(events.iter().any(|e| matches!(e, GameEvent::BarrierHit { .. })));
        assert_eq!(session.score, 0);

        tick(&mut world, &mut session, &held(&[], 16), &tuning);
        assert!(world.bullets.iter().all(|b| b.active));
    }

    #[test]
    fn test_bullets_leave_playfield() {
        let (mut world, mut session, tuning) = started(1);
        world.bullets.push(Bullet::new(Vec2::new(5.0, 3.0), BulletOwner::Player));
        world.bullets.push(Bullet::new(Vec2::new(5.0, GAME_HEIGHT - 2.0), BulletOwner::Enemy));
        tick(&mut world, &mut session, &held(&[], 0), &tuning);
        assert!(world.bullets.iter().all(|b| !b.active));
        tick(&mut world, &mut session, &held(&[], 16), &tuning);
        assert!(world.bullets.is_empty());
    }

    #[test]
    fn test_formation_shifts_on_timer() {
        let (mut world, mut session, tuning) = started(1);
        let x0 = world.enemies[0].pos.x;

        tick(&mut world, &mut session, &held(&[], 0), &tuning);
        assert_eq!(world.enemies[0].pos.x, x0 + 10.0);
        assert_eq!(world.last_enemy_move_ms, Some(0));

        // Wave 1 with nothing destroyed: 900ms between moves
        tick(&mut world, &mut session, &held(&[], 899), &tuning);
        assert_eq!(world.enemies[0].pos.x, x0 + 10.0);
        tick(&mut world, &mut session, &held(&[], 900), &tuning);
        assert_eq!(world.enemies[0].pos.x, x0 + 20.0);
    }

    #[test]
    fn test_formation_bounces_at_right_edge() {
        let (mut world, mut session, tuning) = started(1);
        let shift = GAME_WIDTH - (world.enemies[ENEMY_COLS - 1].pos.x + ENEMY_WIDTH);
        for e in world.enemies.iter_mut() {
            e.pos.x += shift - 5.0;
        }
        let before: Vec<Vec2> = world.enemies.iter().map(|e| e.pos).collect();

        tick(&mut world, &mut session, &held(&[], 0), &tuning);
        assert_eq!(world.direction, -1.0);
        for (e, p) in world.enemies.iter().zip(&before) {
            assert_eq!(e.pos.x, p.x);
            assert_eq!(e.pos.y, p.y + 20.0);
        }
    }

    #[test]
    fn test_formation_breach_ends_game() {
        let (mut world, mut session, tuning) = started(1);
        world.enemies = vec![Enemy {
            pos: Vec2::new(GAME_WIDTH - 40.0, BREACH_LINE - 40.0),
            size: Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT),
            active: true,
            kind: 0,
            points: 30,
        }];

        let events = tick(&mut world, &mut session, &held(&[], 0), &tuning);
        assert_eq!(session.status, GameStatus::GameOver);
        assert!(events.contains(&GameEvent::GameOver));
    }

    #[test]
    fn test_inactive_enemies_ignored_for_edges() {
        let (mut world, mut session, tuning) = started(1);
        world.enemies.truncate(2);
        world.enemies[0].pos = Vec2::new(GAME_WIDTH - 30.0, 100.0);
        world.enemies[0].active = false;
        world.enemies[1].pos = Vec2::new(300.0, 100.0);

        tick(&mut world, &mut session, &held(&[], 0), &tuning);
        assert_eq!(world.direction, 1.0);
        assert_eq!(world.enemies[1].pos, Vec2::new(310.0, 100.0));
    }

    #[test]
    fn test_last_kill_completes_wave_same_tick() {
        let (mut world, mut session, tuning) = started(1);
        world.enemies.truncate(1);
        world.enemies[0].pos = Vec2::new(98.0, 95.0);
        world.bullets.push(Bullet::new(Vec2::new(100.0, 100.0), BulletOwner::Player));
        world.frame = 59; // next tick would be an enemy fire frame

        let events = tick(&mut world, &mut session, &held(&[], 0), &tuning);
        assert_eq!(session.status, GameStatus::LevelComplete);
        assert_eq!(events.last(), Some(&GameEvent::WaveCleared));
        assert!(!events.contains(&GameEvent::EnemyShot));
        assert_eq!(world.last_enemy_move_ms, None);
    }

    #[test]
    fn test_last_kill_completes_wave_with_timer_pending() {
        let (mut world, mut session, tuning) = started(1);
        // First tick moves the formation and arms the move timer
        tick(&mut world, &mut session, &held(&[], 0), &tuning);
        assert_eq!(world.last_enemy_move_ms, Some(0));

        world.enemies.truncate(1);
        world.enemies[0].pos = Vec2::new(98.0, 95.0);
        world.bullets.push(Bullet::new(Vec2::new(100.0, 100.0), BulletOwner::Player));

        let events = tick(&mut world, &mut session, &held(&[], 16), &tuning);
        assert_eq!(world.active_enemy_count(), 0);
        assert_eq!(session.status, GameStatus::LevelComplete);
        assert_eq!(events.last(), Some(&GameEvent::WaveCleared));
        assert_eq!(world.last_enemy_move_ms, Some(0));
    }

    #[test]
    fn test_no_score_after_game_over_in_same_pass() {
        let (mut world, mut session, tuning) = started(1);
        session.lives = 1;
        world.enemies.truncate(2);
        world.enemies[0].pos = Vec2::new(98.0, 95.0);
        world.enemies[1].pos = Vec2::new(600.0, 95.0);
        let target = world.player_rect();
        world
            .bullets
            .push(Bullet::new(Vec2::new(target.pos.x + 10.0, PLAYER_Y), BulletOwner::Enemy));
        world.bullets.push(Bullet::new(Vec2::new(100.0, 100.0), BulletOwner::Player));

        let events = tick(&mut world, &mut session, &held(&[], 0), &tuning);
        assert_eq!(session.status, GameStatus::GameOver);
        assert_eq!(session.score, 0);
        assert!(world.enemies[0].active);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::EnemyDestroyed { .. })));
    }

    #[test]
    fn test_enemy_fire_on_cadence() {
        let (mut world, mut session, mut tuning) = started(1);
        tuning.enemy_fire_base_chance = 1.0;

        for frame in 1..60u64 {
            let events = tick(&mut world, &mut session, &held(&[], frame * 16), &tuning);
            assert!(!events.contains(&GameEvent::EnemyShot));
        }
        let events = tick(&mut world, &mut session, &held(&[], 60 * 16), &tuning);
        assert!(events.contains(&GameEvent::EnemyShot));
        let shot = world.bullets.iter().find(|b| b.owner == BulletOwner::Enemy).unwrap();
        assert!(world.active_enemies().any(|e| {
            (shot.pos.x - (e.pos.x + 13.0)).abs() < 1e-3 && shot.pos.y == e.pos.y + e.size.y
        }));
    }

    #[test]
    fn test_stars_drift_and_wrap() {
        let (mut world, mut session, tuning) = started(1);
        world.stars[0].pos.y = GAME_HEIGHT - 0.1;
        world.stars[0].speed = 1.0;
        tick(&mut world, &mut session, &held(&[], 0), &tuning);
        assert!((world.stars[0].pos.y - 0.9).abs() < 1e-3);
    }
}

//! Per-frame simulation tick
//!
//! Advances the world by one rendered frame. Work is capped per tick
//! (particles, bullets, enemy AI) so a crowded arena costs the same per frame
//! as a quiet one; entities past the cap simply catch up on later ticks.

use glam::Vec2;

use super::ai::drive_enemy;
use super::bomb::SHOCKWAVE_RINGS;
use super::effects;
use super::events::{GameEvent, SoundEffect};
use super::state::{Bullet, GameState, Role, Tank};
use super::timers::TimerKind;
use crate::consts::*;
use crate::{normalize_angle, rotate_toward};

/// Stick deflection needed to register a discrete key
pub const JOYSTICK_DEADZONE: f32 = 0.3;
/// Analog steering ignores heading errors smaller than this
const ANALOG_TURN_THRESHOLD: f32 = 0.05;
/// Analog drive ignores deflections smaller than this
const ANALOG_MOVE_THRESHOLD: f32 = 0.1;
/// Analog steering turns faster than the arrow keys
const ANALOG_TURN_BOOST: f32 = 1.5;

/// Control intent for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub forward: bool,
    pub backward: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
    /// Fire held
    pub fire: bool,
    /// Bomb requested
    pub bomb: bool,
    /// Analog stick (each axis in -1..1, +y down). Overrides the
    /// movement keys when present.
    pub stick: Option<Vec2>,
}

impl TickInput {
    /// Turn a stick position into discrete keys
    pub fn from_joystick(stick: Vec2, fire: bool, bomb: bool) -> Self {
        Self {
            forward: stick.y < -JOYSTICK_DEADZONE,
            backward: stick.y > JOYSTICK_DEADZONE,
            rotate_left: stick.x < -JOYSTICK_DEADZONE,
            rotate_right: stick.x > JOYSTICK_DEADZONE,
            fire,
            bomb,
            stick: None,
        }
    }

    /// Drive the tank straight from the stick: steer toward it, move by its deflection
    pub fn analog(stick: Vec2, fire: bool, bomb: bool) -> Self {
        Self {
            fire,
            bomb,
            stick: Some(stick.clamp_length_max(1.0)),
            ..Default::default()
        }
    }
}

/// Advance the game state by one frame of `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: u64) {
    // Nothing runs once the session is over
    if !state.is_playing() {
        return;
    }

    state.events.clear();
    state.sounds.clear();
    state.time_ms += dt_ms;

    run_timers(state);

    update_player(state, input);
    update_particles(state);
    update_pickups(state);
    update_bullets(state);

    // An enemy bullet may have ended the game
    if !state.is_playing() {
        return;
    }

    update_enemies(state);
    state.frame_count = (state.frame_count + 1) % FRAME_COUNTER_WRAP;

    if state.time_ms.saturating_sub(state.last_pickup_ms) > HEALTH_PICKUP_INTERVAL_MS
        && state.pickups.len() < MAX_PICKUPS
    {
        state.spawn_health_pickup();
    }
}

fn run_timers(state: &mut GameState) {
    for kind in state.timers.take_due(state.time_ms) {
        match kind {
            TimerKind::EnemySpawn => {
                state.spawn_enemy();
            }
            TimerKind::PickupSpawn => {
                state.spawn_health_pickup();
            }
            TimerKind::BombRecharge => state.recharge_bomb(),
            TimerKind::ClusterBlast {
                pos,
                radius,
                damage,
                color,
            } => state.cluster_blast(pos, radius, damage, color),
            TimerKind::ShockwaveRing { pos, radius, ring } => {
                effects::shockwave_ring(&mut state.particles, pos, radius, ring, SHOCKWAVE_RINGS);
            }
        }
    }
}

fn update_player(state: &mut GameState, input: &TickInput) {
    let now = state.time_ms;
    if !state.player.ready_to_act(now) {
        return;
    }

    let player = &mut state.player;
    match input.stick {
        Some(stick) => steer_analog(player, stick),
        None => {
            if input.forward {
                player.advance(player.speed);
            }
            if input.backward {
                player.advance(-player.speed);
            }
            if input.rotate_left {
                player.rotation -= player.rotation_speed;
            }
            if input.rotate_right {
                player.rotation += player.rotation_speed;
            }
            player.rotation = normalize_angle(player.rotation);
        }
    }
    player.clamp_to_arena();

    let cooldown = state.player.weapon.stats().cooldown_ms;
    if input.fire && state.player.cooldown_elapsed(now, cooldown) {
        let bullet = state.player.fire(now);
        launch(state, bullet);
    }

    if input.bomb {
        state.trigger_bomb();
    }
}

fn steer_analog(player: &mut Tank, stick: Vec2) {
    if stick == Vec2::ZERO {
        return;
    }

    let heading = stick.y.atan2(stick.x);
    if normalize_angle(heading - player.rotation).abs() > ANALOG_TURN_THRESHOLD {
        player.rotation = rotate_toward(player.rotation, heading, player.rotation_speed * ANALOG_TURN_BOOST);
    }

    let magnitude = stick.length();
    if magnitude > ANALOG_MOVE_THRESHOLD {
        player.advance(player.speed * magnitude);
    }
}

/// Put a freshly fired bullet into play with its muzzle flash and sound
fn launch(state: &mut GameState, bullet: Bullet) {
    effects::muzzle_flash(&mut state.particles, &mut state.rng, bullet.pos, bullet.heading, bullet.color);
    state.play(SoundEffect::Fire);
    state.emit(GameEvent::Fired {
        owner: bullet.owner,
        pos: bullet.pos,
        heading: bullet.heading,
    });
    match bullet.owner {
        Role::Player => state.player_bullets.push(bullet),
        Role::Enemy => state.enemy_bullets.push(bullet),
    }
}

/// Newest particles first, at most `MAX_PARTICLE_UPDATES` per tick
fn update_particles(state: &mut GameState) {
    let mut budget = MAX_PARTICLE_UPDATES;
    let mut i = state.particles.len();
    while i > 0 && budget > 0 {
        i -= 1;
        budget -= 1;
        if !state.particles[i].update() {
            state.particles.remove(i);
        }
    }
}

fn update_pickups(state: &mut GameState) {
    let player_pos = state.player.pos;
    let mut i = state.pickups.len();
    while i > 0 {
        i -= 1;
        if state.pickups[i].update(player_pos) {
            let pickup = state.pickups.remove(i);
            state.heal_player(HEALTH_PICKUP_AMOUNT);
            effects::pickup_collect(&mut state.particles, &mut state.rng, pickup.pos);
            state.emit(GameEvent::PickupCollected { pos: pickup.pos });
        }
    }
}

/// Both pools share one budget; player bullets go first
fn update_bullets(state: &mut GameState) {
    let mut budget = MAX_BULLET_UPDATES;

    let mut i = state.player_bullets.len();
    while i > 0 && budget > 0 {
        i -= 1;
        budget -= 1;

        if !state.player_bullets[i].update() {
            state.player_bullets.remove(i);
            continue;
        }

        // Under load only every other enemy is tested
        let stride = if state.enemies.len() > SPARSE_COLLISION_THRESHOLD {
            2
        } else {
            1
        };
        let bullet = &state.player_bullets[i];
        let hit = (0..state.enemies.len())
            .step_by(stride)
            .find(|&j| bullet.check_collision(&state.enemies[j]));

        if let Some(j) = hit {
            let bullet = state.player_bullets.remove(i);
            let damage = bullet.damage * PLAYER_DAMAGE_MULTIPLIER;
            state.emit(GameEvent::Hit {
                target: Role::Enemy,
                pos: bullet.pos,
                damage,
            });
            state.damage_enemy(j, damage);
            impact(state, bullet.pos);
        }
    }

    let mut i = state.enemy_bullets.len();
    while i > 0 && budget > 0 {
        i -= 1;
        budget -= 1;

        if !state.enemy_bullets[i].update() {
            state.enemy_bullets.remove(i);
            continue;
        }

        if state.enemy_bullets[i].check_collision(&state.player) {
            let bullet = state.enemy_bullets.remove(i);
            let damage = bullet.damage * ENEMY_DAMAGE_MULTIPLIER;
            state.emit(GameEvent::Hit {
                target: Role::Player,
                pos: bullet.pos,
                damage,
            });
            state.damage_player(damage);
            impact(state, bullet.pos);

            if !state.is_playing() {
                return;
            }
        }
    }
}

fn impact(state: &mut GameState, pos: Vec2) {
    effects::explosion(&mut state.particles, &mut state.rng, pos, 1.0, None);
    state.play(SoundEffect::Explosion);
    state.emit(GameEvent::Explosion { pos, scale: 1.0 });
}

/// Round-robin AI: at most `MAX_ENEMY_UPDATES` enemies think per tick.
/// Every enemy is still visible every frame, it just reacts a little later.
fn update_enemies(state: &mut GameState) {
    let count = state.enemies.len();
    if count == 0 || state.player.destroyed {
        return;
    }

    let interval = count.div_ceil(MAX_ENEMY_UPDATES) as u64;
    let slot = state.frame_count % interval;
    let now = state.time_ms;
    let target = state.player.pos;

    for i in 0..count {
        if i as u64 % interval != slot {
            continue;
        }

        let enemy_bullets = state.enemy_bullets.len();
        let enemy = &mut state.enemies[i];
        if !enemy.ready_to_act(now) {
            continue;
        }

        if drive_enemy(enemy, target, now, enemy_bullets, &mut state.rng) {
            let bullet = enemy.fire(now);
            launch(state, bullet);
        }
    }
}

fn nearest_to(origin: Vec2, points: impl Iterator<Item = Vec2>) -> Option<Vec2> {
    points.min_by(|a, b| {
        a.distance(origin)
            .partial_cmp(&b.distance(origin))
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

/// Demo driver for headless runs: face the nearest enemy, keep the trigger
/// held, detour for health when hurt and bomb when crowded.
pub fn autopilot(state: &GameState) -> TickInput {
    let player = &state.player;
    let mut input = TickInput {
        fire: true,
        ..Default::default()
    };

    let enemy = nearest_to(player.pos, state.enemies.iter().map(|e| e.pos));
    let pickup = if player.health_fraction() < 0.5 {
        nearest_to(player.pos, state.pickups.iter().map(|p| p.pos))
    } else {
        None
    };

    let (target, hunting) = match (pickup, enemy) {
        (Some(p), _) => (p, false),
        (None, Some(e)) => (e, true),
        (None, None) => return input,
    };

    let to_target = target - player.pos;
    let error = normalize_angle(to_target.y.atan2(to_target.x) - player.rotation);
    if error > ANALOG_TURN_THRESHOLD {
        input.rotate_right = true;
    } else if error < -ANALOG_TURN_THRESHOLD {
        input.rotate_left = true;
    }

    if error.abs() < 0.5 {
        let distance = to_target.length();
        if !hunting || distance > 220.0 {
            input.forward = true;
        } else if distance < 120.0 {
            input.backward = true;
        }
    }

    let crowding = state
        .enemies
        .iter()
        .filter(|e| e.pos.distance(player.pos) < 150.0)
        .count();
    input.bomb = state.bomb_ready && crowding >= 2;

    input
}

//! Game state and core simulation types
//!
//! Every entity collection is owned by [`GameState`]; other modules mutate it
//! only through the operations defined on it (spawn, damage, destroy).

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::bullet_hits_tank;
use super::events::{GameEvent, SoundEffect};
use super::timers::{TimerKind, TimerQueue};
use crate::config::{SessionConfig, TankKind, WeaponKind, WeaponStats};
use crate::consts::*;
use crate::heading_vector;

/// Which side an entity fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Player,
    Enemy,
}

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Player destroyed (terminal)
    GameOver,
    /// Session left before it ended; nothing runs anymore
    Stopped,
}

/// A tank, either the player's or an AI enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tank {
    pub role: Role,
    pub kind: TankKind,
    pub weapon: WeaponKind,
    pub pos: Vec2,
    /// Facing angle (radians)
    pub rotation: f32,
    pub health: f32,
    pub max_health: f32,
    /// Damage multiplier (<1 reduces damage)
    pub armor: f32,
    /// Units per tick
    pub speed: f32,
    /// Radians per tick
    pub rotation_speed: f32,
    pub color: u32,
    pub frozen: bool,
    pub frozen_at_ms: u64,
    pub destroyed: bool,
    pub last_fire_ms: Option<u64>,
    /// Tread animation phase (cosmetic)
    #[serde(default)]
    pub track_offset: f32,
}

impl Tank {
    /// The player's tank, facing up
    pub fn player(kind: TankKind, weapon: WeaponKind, pos: Vec2) -> Self {
        let stats = kind.player_stats();
        Self {
            role: Role::Player,
            kind,
            weapon,
            pos,
            rotation: -std::f32::consts::FRAC_PI_2,
            health: stats.health,
            max_health: stats.health,
            armor: stats.armor,
            speed: stats.speed,
            rotation_speed: PLAYER_ROTATION_SPEED,
            color: stats.body_color,
            frozen: false,
            frozen_at_ms: 0,
            destroyed: false,
            last_fire_ms: None,
            track_offset: 0.0,
        }
    }

    /// An enemy tank, facing down
    pub fn enemy(kind: TankKind, weapon: WeaponKind, color: u32, pos: Vec2) -> Self {
        let stats = kind.enemy_stats();
        Self {
            role: Role::Enemy,
            kind,
            weapon,
            pos,
            rotation: std::f32::consts::FRAC_PI_2,
            health: stats.health,
            max_health: stats.health,
            armor: stats.armor,
            speed: stats.speed,
            rotation_speed: ENEMY_ROTATION_SPEED,
            color,
            frozen: false,
            frozen_at_ms: 0,
            destroyed: false,
            last_fire_ms: None,
            track_offset: 0.0,
        }
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::splat(TANK_SIZE / 2.0)
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            0.0
        } else {
            self.health / self.max_health
        }
    }

    /// Gate at the top of every update: false while destroyed or frozen.
    /// Thaws the tank once the freeze has lasted longer than its duration.
    pub fn ready_to_act(&mut self, now_ms: u64) -> bool {
        if self.destroyed {
            return false;
        }
        if self.frozen {
            if now_ms.saturating_sub(self.frozen_at_ms) > FREEZE_DURATION_MS {
                self.frozen = false;
            } else {
                return false;
            }
        }
        true
    }

    /// Move along the current heading (negative distance reverses)
    pub fn advance(&mut self, distance: f32) {
        self.pos += heading_vector(self.rotation) * distance;
        if distance != 0.0 {
            self.track_offset += 0.4;
            if self.track_offset > 10.0 {
                self.track_offset = 0.0;
            }
        }
    }

    /// Keep the whole footprint inside the arena
    pub fn clamp_to_arena(&mut self) {
        let half = self.half_extents();
        self.pos.x = self.pos.x.clamp(half.x, ARENA_WIDTH - half.x);
        self.pos.y = self.pos.y.clamp(half.y, ARENA_HEIGHT - half.y);
    }

    /// Whether more than `cooldown_ms` has passed since the last shot
    pub fn cooldown_elapsed(&self, now_ms: u64, cooldown_ms: u64) -> bool {
        match self.last_fire_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) > cooldown_ms,
        }
    }

    /// Barrel tip, where new bullets appear
    pub fn muzzle(&self) -> Vec2 {
        self.pos + heading_vector(self.rotation) * (TANK_SIZE / 2.0 + 5.0)
    }

    /// Fire the assigned weapon and record the shot time
    pub fn fire(&mut self, now_ms: u64) -> Bullet {
        self.last_fire_ms = Some(now_ms);
        Bullet::new(self.role, self.muzzle(), self.rotation, &self.weapon.stats())
    }
}

/// A projectile; collides only with tanks of the other role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub owner: Role,
    pub pos: Vec2,
    pub heading: f32,
    pub speed: f32,
    pub damage: f32,
    /// Diameter
    pub size: f32,
    pub color: u32,
    /// Recent positions, oldest first
    pub trail: VecDeque<Vec2>,
}

impl Bullet {
    pub fn new(owner: Role, pos: Vec2, heading: f32, weapon: &WeaponStats) -> Self {
        Self {
            owner,
            pos,
            heading,
            speed: weapon.bullet_speed,
            damage: weapon.damage,
            size: weapon.bullet_size,
            color: weapon.bullet_color,
            trail: VecDeque::with_capacity(BULLET_TRAIL_LENGTH + 1),
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    /// Advance one tick. Returns false once the bullet has left the arena.
    pub fn update(&mut self) -> bool {
        self.trail.push_back(self.pos);
        if self.trail.len() > BULLET_TRAIL_LENGTH {
            self.trail.pop_front();
        }

        self.pos += heading_vector(self.heading) * self.speed;

        self.pos.x >= 0.0 && self.pos.x <= ARENA_WIDTH && self.pos.y >= 0.0 && self.pos.y <= ARENA_HEIGHT
    }

    pub fn check_collision(&self, tank: &Tank) -> bool {
        bullet_hits_tank(self, tank)
    }
}

/// A purely cosmetic particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    pub size: f32,
    pub initial_size: f32,
    /// Remaining lifetime in ticks
    pub life: f32,
    pub initial_life: f32,
    pub alpha: f32,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, color: u32, size: f32, life: f32) -> Self {
        Self {
            pos,
            vel,
            color,
            size,
            initial_size: size,
            life,
            initial_life: life.max(f32::EPSILON),
            alpha: 1.0,
        }
    }

    /// Returns false when the particle has expired
    pub fn update(&mut self) -> bool {
        self.pos += self.vel;
        self.life -= 1.0;
        self.alpha = (self.life / self.initial_life).max(0.0);
        self.size = self.initial_size * self.alpha;
        self.life > 0.0
    }
}

/// A health pack waiting to be collected
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthPickup {
    pub pos: Vec2,
    pub size: f32,
    /// Glow pulse (0..5, cosmetic)
    pub pulse: f32,
    pulse_rising: bool,
    /// Spin angle (cosmetic)
    pub spin: f32,
}

impl HealthPickup {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: PICKUP_SIZE,
            pulse: 0.0,
            pulse_rising: true,
            spin: 0.0,
        }
    }

    /// Animate and test for pickup. Returns true when the player is close
    /// enough to collect it.
    pub fn update(&mut self, player_pos: Vec2) -> bool {
        if self.pulse_rising {
            self.pulse += 0.2;
            if self.pulse >= 5.0 {
                self.pulse_rising = false;
            }
        } else {
            self.pulse -= 0.2;
            if self.pulse <= 0.0 {
                self.pulse_rising = true;
            }
        }

        self.spin += 0.02;
        if self.spin > std::f32::consts::TAU {
            self.spin -= std::f32::consts::TAU;
        }

        self.pos.distance(player_pos) < TANK_SIZE
    }
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub config: SessionConfig,
    pub rng: Pcg32,
    /// Simulation clock
    pub time_ms: u64,
    /// Tick counter used to round-robin enemy updates
    pub frame_count: u64,
    pub score: u64,
    pub phase: GamePhase,
    pub bomb_ready: bool,
    pub player: Tank,
    pub enemies: Vec<Tank>,
    pub player_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub pickups: Vec<HealthPickup>,
    pub last_pickup_ms: u64,
    pub timers: TimerQueue,
    /// Events raised during the latest tick
    pub events: Vec<GameEvent>,
    /// Sounds requested during the latest tick
    pub sounds: Vec<SoundEffect>,
}

impl GameState {
    /// Start a session with the given loadout and seed
    pub fn new(config: SessionConfig, seed: u64) -> Self {
        let mut state = Self {
            seed,
            config,
            rng: Pcg32::seed_from_u64(seed),
            time_ms: 0,
            frame_count: 0,
            score: 0,
            phase: GamePhase::Playing,
            bomb_ready: true,
            player: Tank::player(
                config.tank,
                config.weapon,
                Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT - 100.0),
            ),
            enemies: Vec::new(),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            particles: Vec::new(),
            pickups: Vec::new(),
            last_pickup_ms: 0,
            timers: TimerQueue::default(),
            events: Vec::new(),
            sounds: Vec::new(),
        };

        state.timers.schedule_repeating(
            ENEMY_SPAWN_INTERVAL_MS,
            ENEMY_SPAWN_INTERVAL_MS,
            TimerKind::EnemySpawn,
        );
        state.timers.schedule_repeating(
            HEALTH_PICKUP_INTERVAL_MS,
            HEALTH_PICKUP_INTERVAL_MS,
            TimerKind::PickupSpawn,
        );

        let pos = state.player.pos;
        super::effects::teleport(&mut state.particles, &mut state.rng, pos);

        log::info!(
            "Session start: tank={} weapon={} bomb={} seed={}",
            config.tank.as_str(),
            config.weapon.as_str(),
            config.bomb.as_str(),
            seed
        );

        state
    }

    /// Throw away the current world and start over with the same loadout
    pub fn reset(&mut self) {
        self.timers.clear();
        *self = Self::new(self.config, self.seed);
    }

    /// Leave play mode: cancel everything outstanding and stop ticking
    pub fn end_session(&mut self) {
        self.timers.clear();
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Stopped;
        }
        log::info!("Session ended with score {}", self.score);
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Queue a sound for the host. Dropped once the session has ended.
    pub fn play(&mut self, sound: SoundEffect) {
        if self.phase == GamePhase::Playing {
            self.sounds.push(sound);
        }
    }

    /// Terminal transition: cancel timers and freeze the final score
    pub fn game_over(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.timers.clear();
        self.emit(GameEvent::GameOver { score: self.score });
        log::info!("Game over - final score {}", self.score);
    }
}

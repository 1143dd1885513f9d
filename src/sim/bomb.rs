//! Special bomb: cluster, freeze (EMP) and nuke area effects
//!
//! One bomb charge at a time. Triggering spends it and arms a recharge timer;
//! triggering again before the recharge lands does nothing.

use glam::Vec2;
use rand::Rng;

use super::collision::within_radius;
use super::combat::DamageOutcome;
use super::effects;
use super::events::{GameEvent, SoundEffect};
use super::state::GameState;
use super::timers::TimerKind;
use crate::config::BombEffect;
use crate::consts::BOMB_RECHARGE_MS;
use crate::heading_vector;

/// Secondary blasts spawned by a cluster bomb
pub const CLUSTER_FRAGMENTS: usize = 5;
/// Shockwave rings drawn by a nuke
pub const SHOCKWAVE_RINGS: u32 = 3;
/// Delay between shockwave rings
pub const SHOCKWAVE_STAGGER_MS: u64 = 200;

/// Nuke damage scale at `distance`: 1 at the center, 0 at the edge and beyond
pub fn nuke_falloff(distance: f32, range: f32) -> f32 {
    if range <= 0.0 || distance > range {
        0.0
    } else {
        1.0 - distance / range
    }
}

impl GameState {
    /// Detonate the configured bomb at the player's position.
    /// Returns false (and changes nothing) if the bomb is still recharging.
    pub fn trigger_bomb(&mut self) -> bool {
        if !self.bomb_ready || !self.is_playing() {
            return false;
        }

        let origin = self.player.pos;
        let kind = self.config.bomb;
        let stats = kind.stats();
        let now = self.time_ms;

        self.emit(GameEvent::BombTriggered { pos: origin, kind });
        self.play(SoundEffect::Explosion);
        log::info!("Bomb triggered: {} at ({:.0}, {:.0})", kind.as_str(), origin.x, origin.y);

        match stats.effect {
            BombEffect::Cluster => {
                effects::explosion(&mut self.particles, &mut self.rng, origin, 2.0, Some(stats.color));

                for _ in 0..CLUSTER_FRAGMENTS {
                    let angle = self.rng.random::<f32>() * std::f32::consts::TAU;
                    let distance = 30.0 + self.rng.random::<f32>() * 70.0;
                    let delay = 300 + self.rng.random_range(0..=500u64);
                    self.timers.schedule(
                        now + delay,
                        TimerKind::ClusterBlast {
                            pos: origin + heading_vector(angle) * distance,
                            radius: stats.range / 2.0,
                            damage: stats.damage / 2.0,
                            color: stats.color,
                        },
                    );
                }

                self.apply_blast(origin, stats.range, stats.damage);
            }

            BombEffect::Freeze => {
                effects::emp_ring(&mut self.particles, &mut self.rng, origin, stats.range);

                for i in (0..self.enemies.len()).rev() {
                    if within_radius(self.enemies[i].pos, origin, stats.range)
                        && self.damage_enemy(i, stats.damage) == DamageOutcome::Survived
                    {
                        self.freeze_enemy(i);
                    }
                }
            }

            BombEffect::Nuke => {
                effects::explosion(&mut self.particles, &mut self.rng, origin, 3.0, Some(stats.color));
                for ring in 0..SHOCKWAVE_RINGS {
                    self.timers.schedule(
                        now + ring as u64 * SHOCKWAVE_STAGGER_MS,
                        TimerKind::ShockwaveRing {
                            pos: origin,
                            radius: stats.range,
                            ring,
                        },
                    );
                }

                for i in (0..self.enemies.len()).rev() {
                    let distance = self.enemies[i].pos.distance(origin);
                    if distance <= stats.range {
                        self.damage_enemy(i, stats.damage * nuke_falloff(distance, stats.range));
                    }
                }
            }
        }

        self.bomb_ready = false;
        self.timers.cancel(|k| matches!(k, TimerKind::BombRecharge));
        self.timers.schedule(now + BOMB_RECHARGE_MS, TimerKind::BombRecharge);
        true
    }

    /// Flat damage to every enemy within `radius` of `center`. Returns hits.
    pub fn apply_blast(&mut self, center: Vec2, radius: f32, damage: f32) -> usize {
        let mut hits = 0;
        // Back to front: kills remove entries
        for i in (0..self.enemies.len()).rev() {
            if within_radius(self.enemies[i].pos, center, radius) {
                self.damage_enemy(i, damage);
                hits += 1;
            }
        }
        hits
    }

    /// A delayed cluster fragment going off
    pub fn cluster_blast(&mut self, pos: Vec2, radius: f32, damage: f32, color: u32) {
        if !self.is_playing() {
            return;
        }
        effects::explosion(&mut self.particles, &mut self.rng, pos, 1.0, Some(color));
        self.play(SoundEffect::Explosion);
        self.apply_blast(pos, radius, damage);
    }

    /// Recharge timer landed
    pub fn recharge_bomb(&mut self) {
        if !self.is_playing() || self.bomb_ready {
            return;
        }
        self.bomb_ready = true;
        self.emit(GameEvent::BombReady);
        log::debug!("Bomb recharged");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BombKind, SessionConfig, TankKind, WeaponKind};
    use crate::sim::state::Tank;
    use proptest::prelude::*;

    fn session(bomb: BombKind) -> GameState {
        let config = SessionConfig {
            bomb,
            ..Default::default()
        };
        GameState::new(config, 3)
    }

    fn add_enemy(state: &mut GameState, kind: TankKind, pos: Vec2) {
        state.enemies.push(Tank::enemy(kind, WeaponKind::Standard, 0, pos));
    }

    #[test]
    fn test_falloff_endpoints() {
        assert_eq!(nuke_falloff(0.0, 200.0), 1.0);
        assert_eq!(nuke_falloff(200.0, 200.0), 0.0);
        assert_eq!(nuke_falloff(250.0, 200.0), 0.0);
        assert!((nuke_falloff(50.0, 200.0) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_not_ready_is_noop() {
        let mut state = session(BombKind::Nuke);
        state.bomb_ready = false;
        let timers_before = state.timers.len();
        let particles_before = state.particles.len();

        assert!(!state.trigger_bomb());
        assert!(state.events.is_empty());
        assert_eq!(state.timers.len(), timers_before);
        assert_eq!(state.particles.len(), particles_before);
    }

    #[test]
    fn test_nuke_falloff_damage() {
        let mut state = session(BombKind::Nuke);
        let origin = state.player.pos;
        // Heavy enemy (75 hp, armor 0.8) 100 units away: 75 * 0.5 * 0.8 = 30
        add_enemy(&mut state, TankKind::Heavy, origin + Vec2::new(100.0, 0.0));
        // Out of range
        add_enemy(&mut state, TankKind::Heavy, origin + Vec2::new(0.0, -250.0));

        assert!(state.trigger_bomb());
        assert!(!state.bomb_ready);
        assert!((state.enemies[0].health - 45.0).abs() < 1e-3);
        assert_eq!(state.enemies[1].health, 75.0);
        assert!(state.timers.contains(|k| matches!(k, TimerKind::BombRecharge)));
        assert!(state.timers.contains(|k| matches!(k, TimerKind::ShockwaveRing { ring: 2, .. })));
    }

    #[test]
    fn test_emp_freezes_and_scratches() {
        let mut state = session(BombKind::Emp);
        let origin = state.player.pos;
        add_enemy(&mut state, TankKind::Default, origin + Vec2::new(0.0, -140.0));
        add_enemy(&mut state, TankKind::Default, origin + Vec2::new(0.0, -160.0));

        assert!(state.trigger_bomb());
        assert!(state.enemies[0].frozen);
        assert_eq!(state.enemies[0].health, 40.0);
        assert!(!state.enemies[1].frozen);
        assert_eq!(state.enemies[1].health, 50.0);
    }

    #[test]
    fn test_emp_kill_is_not_frozen() {
        let mut state = session(BombKind::Emp);
        let origin = state.player.pos;
        add_enemy(&mut state, TankKind::Default, origin + Vec2::new(60.0, 0.0));
        state.enemies[0].health = 5.0;

        assert!(state.trigger_bomb());
        assert!(state.enemies.is_empty());
        assert_eq!(state.score, 100);
        assert!(state.events.iter().any(|e| matches!(e, GameEvent::EnemyDestroyed { .. })));
        assert!(!state.events.iter().any(|e| matches!(e, GameEvent::Frozen { .. })));
    }

    #[test]
    fn test_cluster_schedules_fragments() {
        let mut state = session(BombKind::Cluster);
        let origin = state.player.pos;
        add_enemy(&mut state, TankKind::Default, origin + Vec2::new(50.0, 0.0));

        assert!(state.trigger_bomb());
        // Full-strength main blast: 30 * 1.0
        assert_eq!(state.enemies[0].health, 20.0);

        let fragments = state
            .timers
            .take_due(state.time_ms + 800)
            .into_iter()
            .filter(|k| matches!(k, TimerKind::ClusterBlast { .. }))
            .count();
        assert_eq!(fragments, CLUSTER_FRAGMENTS);
    }

    #[test]
    fn test_cluster_fragment_geometry() {
        let mut state = session(BombKind::Cluster);
        let origin = state.player.pos;
        state.trigger_bomb();

        for kind in state.timers.take_due(state.time_ms + 800) {
            if let TimerKind::ClusterBlast { pos, radius, damage, .. } = kind {
                let d = pos.distance(origin);
                assert!((30.0 - 1e-3..=100.0 + 1e-3).contains(&d));
                assert_eq!(radius, 50.0);
                assert_eq!(damage, 15.0);
            }
        }
    }

    #[test]
    fn test_recharge_once() {
        let mut state = session(BombKind::Cluster);
        state.trigger_bomb();
        state.recharge_bomb();
        assert!(state.bomb_ready);
        let ready_events = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::BombReady))
            .count();
        state.recharge_bomb();
        let after = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::BombReady))
            .count();
        assert_eq!(ready_events, 1);
        assert_eq!(after, 1);
    }

    #[test]
    fn test_blast_after_game_over_is_noop() {
        let mut state = session(BombKind::Cluster);
        add_enemy(&mut state, TankKind::Default, Vec2::new(100.0, 100.0));
        state.game_over();
        state.cluster_blast(Vec2::new(100.0, 100.0), 50.0, 15.0, 0);
        assert_eq!(state.enemies[0].health, 50.0);
    }

    proptest! {
        #[test]
        fn falloff_is_monotonic(a in 0.0f32..200.0, b in 0.0f32..200.0) {
            let (near, far) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(nuke_falloff(near, 200.0) >= nuke_falloff(far, 200.0));
        }
    }
}

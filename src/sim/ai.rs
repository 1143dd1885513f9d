//! Enemy tank behaviour
//!
//! Each update an enemy turns toward the player, then closes in or backs off
//! to hold a preferred range, and fires when its gun is lined up.

use glam::Vec2;
use rand::Rng;

use super::state::Tank;
use crate::consts::MAX_ENEMIES;
use crate::{normalize_angle, rotate_toward};

/// Beyond this distance the enemy closes in
pub const AI_TARGET_FAR: f32 = 200.0;
/// Inside this distance the enemy backs away
pub const AI_TARGET_NEAR: f32 = 150.0;
/// Enemies hold fire beyond this distance
pub const AI_FIRE_RANGE: f32 = 300.0;
/// Maximum aim error (radians) for a shot
pub const AI_AIM_TOLERANCE: f32 = 0.2;
/// Chance that a permitted shot is actually taken
pub const AI_FIRE_CHANCE: f64 = 0.7;
/// Cap on enemy bullets alive at once
pub const MAX_ENEMY_BULLETS: usize = MAX_ENEMIES * 2;

/// How an enemy moves this update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Maneuver {
    /// Full speed along the heading
    Advance,
    /// Half speed in reverse
    Retreat,
    Hold,
}

pub fn choose_maneuver(distance: f32) -> Maneuver {
    if distance > AI_TARGET_FAR {
        Maneuver::Advance
    } else if distance < AI_TARGET_NEAR {
        Maneuver::Retreat
    } else {
        Maneuver::Hold
    }
}

/// Enemies shoot half again as slowly as their weapon allows
#[inline]
pub fn enemy_cooldown_ms(weapon_cooldown_ms: u64) -> u64 {
    weapon_cooldown_ms + weapon_cooldown_ms / 2
}

/// Every deterministic condition for an enemy shot. The random roll is separate.
pub fn fire_permitted(tank: &Tank, target: Vec2, now_ms: u64, enemy_bullets: usize) -> bool {
    let to_target = target - tank.pos;
    let aim_error = normalize_angle(to_target.y.atan2(to_target.x) - tank.rotation).abs();

    aim_error < AI_AIM_TOLERANCE
        && tank.cooldown_elapsed(now_ms, enemy_cooldown_ms(tank.weapon.stats().cooldown_ms))
        && to_target.length() <= AI_FIRE_RANGE
        && enemy_bullets < MAX_ENEMY_BULLETS
}

/// Turn, move and decide whether to shoot. Returns true when the enemy
/// should fire this update; the caller spawns the bullet.
pub fn drive_enemy<R: Rng + ?Sized>(
    tank: &mut Tank,
    target: Vec2,
    now_ms: u64,
    enemy_bullets: usize,
    rng: &mut R,
) -> bool {
    let to_target = target - tank.pos;
    let target_angle = to_target.y.atan2(to_target.x);
    tank.rotation = rotate_toward(tank.rotation, target_angle, tank.rotation_speed);

    match choose_maneuver(to_target.length()) {
        Maneuver::Advance => tank.advance(tank.speed),
        Maneuver::Retreat => tank.advance(-tank.speed / 2.0),
        Maneuver::Hold => {}
    }
    tank.clamp_to_arena();

    fire_permitted(tank, target, now_ms, enemy_bullets) && rng.random_bool(AI_FIRE_CHANCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TankKind, WeaponKind};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn enemy_at(x: f32, y: f32) -> Tank {
        Tank::enemy(TankKind::Default, WeaponKind::Standard, 0, Vec2::new(x, y))
    }

    #[test]
    fn test_maneuver_bands() {
        assert_eq!(choose_maneuver(250.0), Maneuver::Advance);
        assert_eq!(choose_maneuver(200.0), Maneuver::Hold);
        assert_eq!(choose_maneuver(150.0), Maneuver::Hold);
        assert_eq!(choose_maneuver(100.0), Maneuver::Retreat);
    }

    #[test]
    fn test_enemy_cooldown_is_stretched() {
        assert_eq!(enemy_cooldown_ms(500), 750);
        assert_eq!(enemy_cooldown_ms(200), 300);
    }

    #[test]
    fn test_advances_after_turning() {
        let mut rng = Pcg32::seed_from_u64(1);
        // Facing down (pi/2), target straight below and far away
        let mut tank = enemy_at(400.0, 100.0);
        drive_enemy(&mut tank, Vec2::new(400.0, 500.0), 0, 0, &mut rng);
        assert!((tank.pos.y - 101.5).abs() < 1e-4);
        assert!((tank.pos.x - 400.0).abs() < 1e-4);
    }

    #[test]
    fn test_retreats_at_half_speed() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut tank = enemy_at(400.0, 300.0);
        drive_enemy(&mut tank, Vec2::new(400.0, 400.0), 0, 0, &mut rng);
        assert!((tank.pos.y - 299.25).abs() < 1e-4);
    }

    #[test]
    fn test_turn_rate_is_limited() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut tank = enemy_at(400.0, 300.0);
        // Target to the right: wants to turn from pi/2 to 0
        drive_enemy(&mut tank, Vec2::new(700.0, 300.0), 0, 0, &mut rng);
        let turned = std::f32::consts::FRAC_PI_2 - tank.rotation;
        assert!((turned - tank.rotation_speed).abs() < 1e-5);
    }

    #[test]
    fn test_fire_gate() {
        let tank = enemy_at(400.0, 300.0);
        let below = Vec2::new(400.0, 500.0);
        assert!(fire_permitted(&tank, below, 0, 0));
        // Out of range
        assert!(!fire_permitted(&tank, Vec2::new(400.0, 650.0), 0, 0));
        // Not lined up
        assert!(!fire_permitted(&tank, Vec2::new(600.0, 300.0), 0, 0));
        // Bullet cap
        assert!(!fire_permitted(&tank, below, 0, MAX_ENEMY_BULLETS));

        let mut cooled = tank.clone();
        cooled.last_fire_ms = Some(1000);
        assert!(!fire_permitted(&cooled, below, 1750, 0));
        assert!(fire_permitted(&cooled, below, 1751, 0));
    }

    #[test]
    fn test_fire_roll_is_a_fraction() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut shots = 0;
        for _ in 0..1000 {
            let mut tank = enemy_at(400.0, 300.0);
            if drive_enemy(&mut tank, Vec2::new(400.0, 475.0), 0, 0, &mut rng) {
                shots += 1;
            }
        }
        assert!(shots > 600 && shots < 800, "shots = {shots}");
    }
}

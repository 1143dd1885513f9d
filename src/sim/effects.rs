//! Cosmetic particle emitters
//!
//! Nothing here touches gameplay state; emitters only append particles.

use glam::Vec2;
use rand::Rng;

use super::state::Particle;
use crate::consts::EXPLOSION_PARTICLES;
use crate::heading_vector;

const WHITE: u32 = 0xFFFFFF;
const HEALTH_GREEN: u32 = 0x2ECC71;
const EMP_BLUE: u32 = 0x3498DB;
const ICE: u32 = 0xA9CCE3;
const SHOCKWAVE_RED: u32 = 0xE74C3C;
const FIRE_PALETTE: [u32; 4] = [0xE74C3C, 0xF39C12, 0xF1C40F, WHITE];
const TELEPORT_PALETTE: [u32; 4] = [0x3498DB, 0x2ECC71, 0x9B59B6, WHITE];

/// Brighten each RGB channel by `percent` of full scale
pub fn lighten_color(color: u32, percent: f32) -> u32 {
    let lift = (2.55 * percent).round() as u32;
    let r = (((color >> 16) & 0xFF) + lift).min(255);
    let g = (((color >> 8) & 0xFF) + lift).min(255);
    let b = ((color & 0xFF) + lift).min(255);
    (r << 16) | (g << 8) | b
}

fn pick<R: Rng + ?Sized>(rng: &mut R, palette: &[u32]) -> u32 {
    palette[rng.random_range(0..palette.len())]
}

fn random_angle<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random::<f32>() * std::f32::consts::TAU
}

/// Radial burst. Thins itself out when many particles are already alive.
pub fn explosion<R: Rng + ?Sized>(
    particles: &mut Vec<Particle>,
    rng: &mut R,
    pos: Vec2,
    scale: f32,
    color: Option<u32>,
) {
    let palette: Vec<u32> = match color {
        Some(c) => vec![c, lighten_color(c, 20.0), WHITE],
        None => FIRE_PALETTE.to_vec(),
    };

    let mut count = (EXPLOSION_PARTICLES as f32 * scale) as usize;
    if particles.len() > 50 {
        count /= 2;
    }
    if particles.len() > 100 {
        count /= 2;
    }

    for _ in 0..count {
        let speed = (0.5 + rng.random::<f32>() * 3.0) * scale;
        let vel = heading_vector(random_angle(rng)) * speed;
        let size = (3.0 + rng.random::<f32>() * 5.0) * scale;
        let life = (20.0 + rng.random::<f32>() * 40.0) * scale;
        let c = pick(rng, &palette);
        particles.push(Particle::new(pos, vel, c, size, life));
    }
}

/// Short cone of sparks at the barrel
pub fn muzzle_flash<R: Rng + ?Sized>(
    particles: &mut Vec<Particle>,
    rng: &mut R,
    pos: Vec2,
    heading: f32,
    color: u32,
) {
    let palette = [WHITE, color, lighten_color(color, 30.0)];
    for _ in 0..10 {
        let angle = heading + (rng.random::<f32>() - 0.5) * 0.5;
        let vel = heading_vector(angle) * (1.0 + rng.random::<f32>() * 3.0);
        let size = 1.0 + rng.random::<f32>() * 3.0;
        let life = 5.0 + rng.random::<f32>() * 10.0;
        let c = pick(rng, &palette);
        particles.push(Particle::new(pos, vel, c, size, life));
    }
}

/// Particles drifting inward to a point (spawn-in shimmer)
#[allow(clippy::too_many_arguments)]
fn implode<R: Rng + ?Sized>(
    particles: &mut Vec<Particle>,
    rng: &mut R,
    center: Vec2,
    count: usize,
    min_dist: f32,
    spread: f32,
    speed: (f32, f32),
    palette: &[u32],
) {
    for _ in 0..count {
        let dist = (min_dist + rng.random::<f32>() * spread).max(0.001);
        let start = center + heading_vector(random_angle(rng)) * dist;
        let s = speed.0 + rng.random::<f32>() * speed.1;
        let vel = (center - start) * s / dist;
        let size = 2.0 + rng.random::<f32>() * 4.0;
        let life = 15.0 + rng.random::<f32>() * 20.0;
        let c = pick(rng, palette);
        particles.push(Particle::new(start, vel, c, size, life));
    }
}

/// Tank warp-in effect
pub fn teleport<R: Rng + ?Sized>(particles: &mut Vec<Particle>, rng: &mut R, pos: Vec2) {
    implode(particles, rng, pos, 20, 0.0, 40.0, (0.3, 0.5), &TELEPORT_PALETTE);
}

/// Health pack materializing
pub fn pickup_spawn<R: Rng + ?Sized>(particles: &mut Vec<Particle>, rng: &mut R, pos: Vec2) {
    implode(particles, rng, pos, 10, 20.0, 10.0, (0.2, 0.0), &[HEALTH_GREEN]);
}

/// Burst when a health pack is collected
pub fn pickup_collect<R: Rng + ?Sized>(particles: &mut Vec<Particle>, rng: &mut R, pos: Vec2) {
    for _ in 0..20 {
        let vel = heading_vector(random_angle(rng)) * (1.0 + rng.random::<f32>() * 2.0);
        let size = 2.0 + rng.random::<f32>() * 4.0;
        let life = 20.0 + rng.random::<f32>() * 20.0;
        particles.push(Particle::new(pos, vel, HEALTH_GREEN, size, life));
    }
}

/// Green sparkle rising off a healed tank
pub fn healing<R: Rng + ?Sized>(particles: &mut Vec<Particle>, rng: &mut R, pos: Vec2) {
    for _ in 0..15 {
        let start = pos + Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * 30.0;
        let vel = Vec2::new((rng.random::<f32>() - 0.5) * 0.5, -1.0 - rng.random::<f32>());
        let size = 2.0 + rng.random::<f32>() * 3.0;
        let life = 30.0 + rng.random::<f32>() * 20.0;
        particles.push(Particle::new(start, vel, HEALTH_GREEN, size, life));
    }
}

/// Ice crystals around a frozen tank
pub fn freeze_crystals<R: Rng + ?Sized>(particles: &mut Vec<Particle>, rng: &mut R, pos: Vec2) {
    for _ in 0..15 {
        let dist = 5.0 + rng.random::<f32>() * 20.0;
        let start = pos + heading_vector(random_angle(rng)) * dist;
        let size = 2.0 + rng.random::<f32>() * 3.0;
        particles.push(Particle::new(start, Vec2::ZERO, ICE, size, 60.0));
    }
}

/// EMP ring expanding from the blast point plus a scatter of sparks inside
pub fn emp_ring<R: Rng + ?Sized>(particles: &mut Vec<Particle>, rng: &mut R, pos: Vec2, range: f32) {
    let ring = 60;
    for i in 0..ring {
        let angle = i as f32 / ring as f32 * std::f32::consts::TAU;
        particles.push(Particle::new(pos, heading_vector(angle) * 2.0, EMP_BLUE, 5.0, 30.0));
    }
    for _ in 0..20 {
        let dist = rng.random::<f32>() * range * 0.8;
        let start = pos + heading_vector(random_angle(rng)) * dist;
        let size = 3.0 + rng.random::<f32>() * 3.0;
        particles.push(Particle::new(start, Vec2::ZERO, WHITE, size, 20.0));
    }
}

/// One ring of the nuke shockwave; ring `n` of `rings` starts at n/rings of the radius
pub fn shockwave_ring(particles: &mut Vec<Particle>, pos: Vec2, radius: f32, ring: u32, rings: u32) {
    let count = 40;
    let start_radius = ring as f32 * (radius / rings.max(1) as f32);
    for i in 0..count {
        let dir = heading_vector(i as f32 / count as f32 * std::f32::consts::TAU);
        particles.push(Particle::new(pos + dir * start_radius, dir * 3.0, SHOCKWAVE_RED, 4.0, 30.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_lighten_color_saturates() {
        assert_eq!(lighten_color(0x000000, 20.0), 0x333333);
        assert_eq!(lighten_color(0xF0F0F0, 20.0), 0xFFFFFF);
    }

    #[test]
    fn test_explosion_thins_out_under_load() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut particles = Vec::new();
        explosion(&mut particles, &mut rng, Vec2::ZERO, 1.0, None);
        assert_eq!(particles.len(), 30);

        // 30 alive: still full strength
        explosion(&mut particles, &mut rng, Vec2::ZERO, 2.0, Some(0xF39C12));
        assert_eq!(particles.len(), 90);

        // >50 alive: halved
        explosion(&mut particles, &mut rng, Vec2::ZERO, 1.0, None);
        assert_eq!(particles.len(), 105);

        // >100 alive: quartered
        explosion(&mut particles, &mut rng, Vec2::ZERO, 1.0, None);
        assert_eq!(particles.len(), 112);
    }

    #[test]
    fn test_shockwave_ring_radius() {
        let mut particles = Vec::new();
        shockwave_ring(&mut particles, Vec2::ZERO, 200.0, 2, 3);
        assert_eq!(particles.len(), 40);
        let r = particles[0].pos.length();
        assert!((r - 400.0 / 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_teleport_particles_are_finite() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut particles = Vec::new();
        teleport(&mut particles, &mut rng, Vec2::new(50.0, 50.0));
        assert_eq!(particles.len(), 20);
        assert!(particles.iter().all(|p| p.vel.is_finite()));
    }
}

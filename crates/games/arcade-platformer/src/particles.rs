use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// RGB color.
pub type Color = [u8; 3];

pub const WHITE: Color = [255, 255, 255];
pub const GOLD: Color = [245, 200, 80];
pub const ACCENT: Color = [230, 70, 80];

/// Purely visual spark. Never takes part in collision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub age: f32,
    pub color: Color,
    pub radius: f32,
}

impl Particle {
    /// Integrate one frame. Returns whether the particle is still alive.
    pub fn update(&mut self, dt: f32, gravity: f32) -> bool {
        self.age += dt;
        self.pos += self.vel * dt;
        self.vel.y += gravity * dt;
        self.age < self.life
    }

    /// Remaining fraction of life in `[0, 1]`, used for fading.
    pub fn alpha(&self) -> f32 {
        if self.life <= 0.0 {
            return 0.0;
        }
        (1.0 - self.age / self.life).clamp(0.0, 1.0)
    }
}

/// Bounded pool of live particles. When full, the oldest particle is dropped
/// to make room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    max: usize,
    gravity: f32,
}

impl ParticleSystem {
    pub fn new(max: usize, gravity: f32) -> Self {
        Self {
            particles: Vec::with_capacity(max.min(1024)),
            max,
            gravity,
        }
    }

    pub fn spawn(&mut self, particle: Particle) {
        if self.max == 0 {
            return;
        }
        if self.particles.len() >= self.max {
            self.particles.remove(0);
        }
        self.particles.push(particle);
    }

    pub fn update(&mut self, dt: f32) {
        let gravity = self.gravity;
        self.particles.retain_mut(|p| p.update(dt, gravity));
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Upward fan of dust at the player's feet when a jump fires.
    pub fn jump_dust(&mut self, rng: &mut impl Rng, at: Vec2) {
        for _ in 0..8 {
            let angle: f32 = rng.random_range(-0.4..=0.4);
            let speed: f32 = rng.random_range(80.0..=160.0);
            self.spawn(Particle {
                pos: at,
                vel: Vec2::new(speed * angle.cos(), -(speed * angle.sin()).abs()),
                life: 0.4,
                age: 0.0,
                color: WHITE,
                radius: 3.0,
            });
        }
    }

    /// Golden sparkle where a coin was collected.
    pub fn coin_sparkle(&mut self, rng: &mut impl Rng, at: Vec2) {
        self.radial_burst(rng, at, 12, 90.0..=180.0, 0.6, GOLD);
    }

    /// Large red burst where the player died.
    pub fn death_burst(&mut self, rng: &mut impl Rng, at: Vec2) {
        self.radial_burst(rng, at, 20, 120.0..=240.0, 0.7, ACCENT);
    }

    fn radial_burst(
        &mut self,
        rng: &mut impl Rng,
        at: Vec2,
        count: usize,
        speed: std::ops::RangeInclusive<f32>,
        life: f32,
        color: Color,
    ) {
        for _ in 0..count {
            let angle: f32 = rng.random_range(0.0..TAU);
            let sp: f32 = rng.random_range(speed.clone());
            self.spawn(Particle {
                pos: at,
                vel: Vec2::new(sp * angle.cos(), sp * angle.sin() - 120.0),
                life,
                age: 0.0,
                color,
                radius: 3.0,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn spark(life: f32) -> Particle {
        Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(10.0, 0.0),
            life,
            age: 0.0,
            color: WHITE,
            radius: 3.0,
        }
    }

    #[test]
    fn gravity_bends_trajectory() {
        let mut p = spark(1.0);
        assert!(p.update(0.1, 500.0));
        assert!((p.pos.x - 1.0).abs() < 1e-5);
        assert_eq!(p.pos.y, 0.0, "position integrates before velocity");
        assert!((p.vel.y - 50.0).abs() < 1e-4);
    }

    #[test]
    fn expires_after_lifetime() {
        let mut p = spark(0.25);
        assert!(p.update(0.1, 0.0));
        assert!(p.update(0.1, 0.0));
        assert!(!p.update(0.1, 0.0));
        assert_eq!(p.alpha(), 0.0);
    }

    #[test]
    fn system_drops_dead_particles() {
        let mut sys = ParticleSystem::new(64, 500.0);
        sys.spawn(spark(0.05));
        sys.spawn(spark(1.0));
        sys.update(0.1);
        assert_eq!(sys.len(), 1);
    }

    #[test]
    fn cap_evicts_oldest() {
        let mut sys = ParticleSystem::new(2, 0.0);
        sys.spawn(spark(1.0));
        sys.spawn(spark(2.0));
        sys.spawn(spark(3.0));
        assert_eq!(sys.len(), 2);
        assert_eq!(sys.as_slice()[0].life, 2.0);
        assert_eq!(ParticleSystem::new(0, 0.0).len(), 0);
    }

    #[test]
    fn bursts_have_expected_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut sys = ParticleSystem::new(256, 500.0);

        sys.jump_dust(&mut rng, Vec2::new(10.0, 20.0));
        assert_eq!(sys.len(), 8);
        assert!(sys.as_slice().iter().all(|p| p.vel.y <= 0.0 && p.vel.x > 0.0));

        sys.clear();
        sys.coin_sparkle(&mut rng, Vec2::ZERO);
        assert_eq!(sys.len(), 12);
        assert!(sys.as_slice().iter().all(|p| p.color == GOLD && p.life == 0.6));

        sys.clear();
        sys.death_burst(&mut rng, Vec2::ZERO);
        assert_eq!(sys.len(), 20);
        assert!(sys.as_slice().iter().all(|p| p.color == ACCENT));
    }
}

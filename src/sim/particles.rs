//! Particle bursts
//!
//! Purely cosmetic: nothing in scoring reads particle state.

use glam::Vec2;
use rand::Rng;

use super::state::{Particle, ParticleSnapshot};
use crate::consts::REFERENCE_FPS;
use crate::tuning::{ParticleTuning, Tuning};

/// Glow radius per unit of particle size
const GLOW_PER_SIZE: f32 = 1.5;

/// Owns the transient particle set
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    tuning: ParticleTuning,
    area_height: f32,
    /// Particle budget; zero disables bursts entirely
    max_particles: usize,
}

impl ParticleSystem {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            particles: Vec::new(),
            tuning: tuning.particles.clone(),
            area_height: tuning.area_height,
            max_particles: tuning.particles.max_particles,
        }
    }

    /// Override the particle budget (player settings can lower or disable it)
    pub fn set_max_particles(&mut self, max: usize) {
        self.max_particles = max;
        self.particles.truncate(max);
    }

    /// Emit `count` particles at equal angular steps around `origin`
    pub fn create_explosion<R: Rng + ?Sized>(
        &mut self,
        origin: Vec2,
        color: u32,
        count: u32,
        size_scale: f32,
        rng: &mut R,
    ) {
        let t = &self.tuning;
        for i in 0..count {
            if self.particles.len() >= self.max_particles {
                break;
            }
            let angle = std::f32::consts::TAU * (i as f32 / count as f32);
            let speed = (t.min_speed + rng.random::<f32>() * t.speed_spread) * size_scale;
            self.particles.push(Particle {
                pos: origin,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                color,
                life: t.initial_life,
                size: (t.min_size + rng.random::<f32>() * t.size_spread) * size_scale,
            });
        }
    }

    /// Integrate motion, apply gravity and decay, prune dead particles
    pub fn update(&mut self, dt: f32) {
        let t = &self.tuning;
        let shrink = t.shrink_per_frame.powf(dt * REFERENCE_FPS);
        for particle in self.particles.iter_mut() {
            particle.pos += particle.vel * dt;
            particle.vel.y += t.gravity * dt;
            particle.life -= t.life_decay * dt;
            particle.size *= shrink;
        }
        let floor = self.area_height + t.bottom_margin;
        self.particles.retain(|p| p.life > 0.0 && p.pos.y <= floor);
    }

    /// Draw-ready view: alpha is remaining life, glow scales with size
    pub fn snapshot(&self) -> Vec<ParticleSnapshot> {
        self.particles
            .iter()
            .map(|p| ParticleSnapshot {
                pos: p.pos,
                color: p.color,
                alpha: p.life.clamp(0.0, 1.0),
                radius: p.size,
                glow: p.size * GLOW_PER_SIZE,
            })
            .collect()
    }

    pub fn particles(&self) -> &[Particle] {
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
}

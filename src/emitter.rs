//! Firework bursts with their own birth/death lifecycle.
//!
//! Each step the [`EmitterPool`] may spawn one [`Burst`] at a random point in
//! the spawn volume (probability `spawn_probability`). A burst is a small,
//! self-contained particle cloud that flies outward from its origin, falls
//! under constant gravity and fades out:
//!
//! | Per step | Rule |
//! |----------|------|
//! | motion | `position += velocity` |
//! | gravity | `velocity.y -= gravity` |
//! | fade | `life = 1 - age * decay_rate`, opacity = life |
//! | death | retired after `ceil(1 / decay_rate)` steps |
//!
//! Bursts never touch the main swarm or each other.
//!
//! # Storage
//!
//! Bursts live in slots. A retired burst frees its slot and the next spawn
//! reuses it, so slot indices stay stable while the pool is iterated and
//! retirement never shifts other bursts around.

use crate::buffer::PointVertex;
use crate::spawn::Sampler;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Spawn schedule and burst physics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Chance per step of spawning a new burst.
    pub spawn_probability: f32,
    /// Particles per burst.
    pub burst_count: usize,
    /// Outward speed range per particle (units per step).
    pub speed_min: f32,
    pub speed_max: f32,
    /// Subtracted from vertical velocity every step.
    pub gravity: f32,
    /// Life lost per step; life starts at 1.0.
    pub decay_rate: f32,
    /// Bursts spawn uniformly inside this box.
    pub spawn_min: Vec3,
    pub spawn_max: Vec3,
    /// Hard cap on concurrently live bursts.
    pub max_active: usize,
    /// Point size for rendering.
    pub point_size: f32,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            spawn_probability: 0.025,
            burst_count: 60,
            speed_min: 0.04,
            speed_max: 0.12,
            gravity: 0.002,
            decay_rate: 0.015,
            spawn_min: Vec3::new(-8.0, 3.0, -8.0),
            spawn_max: Vec3::new(8.0, 9.0, -4.0),
            max_active: 12,
            point_size: 0.06,
        }
    }
}

impl EmitterConfig {
    /// Steps a burst lives: `ceil(1 / decay_rate)`.
    pub fn lifetime_steps(&self) -> u32 {
        (1.0 / self.decay_rate).ceil().max(1.0) as u32
    }
}

/// One live firework.
#[derive(Debug, Clone)]
pub struct Burst {
    origin: Vec3,
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    color: Vec3,
    size: f32,
    age: u32,
    lifetime: u32,
    decay_rate: f32,
}

impl Burst {
    fn new(origin: Vec3, color: Vec3, config: &EmitterConfig, sampler: &mut Sampler) -> Self {
        let velocities: Vec<Vec3> = (0..config.burst_count)
            .map(|_| {
                let speed = sampler.range(config.speed_min, config.speed_max);
                sampler.on_sphere(speed)
            })
            .collect();

        Self {
            origin,
            positions: vec![origin; config.burst_count],
            velocities,
            color,
            size: config.point_size,
            age: 0,
            lifetime: config.lifetime_steps(),
            decay_rate: config.decay_rate,
        }
    }

    /// Advance one step. Returns `false` once the burst has burned out.
    fn step(&mut self, gravity: f32) -> bool {
        for (p, v) in self.positions.iter_mut().zip(self.velocities.iter_mut()) {
            *p += *v;
            v.y -= gravity;
        }
        self.age += 1;
        self.age < self.lifetime
    }

    /// Remaining life in `[0, 1]`.
    pub fn life(&self) -> f32 {
        (1.0 - self.age as f32 * self.decay_rate).max(0.0)
    }

    /// Render opacity; equal to life.
    pub fn opacity(&self) -> f32 {
        self.life()
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Shared color of every particle in the burst.
    pub fn color(&self) -> Vec3 {
        self.color
    }

    /// Shared point size of every particle in the burst.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Steps survived so far.
    pub fn age(&self) -> u32 {
        self.age
    }
}

/// Slot-reusing collection of live bursts.
#[derive(Debug, Clone)]
pub struct EmitterPool {
    config: EmitterConfig,
    slots: Vec<Option<Burst>>,
    free: Vec<usize>,
    active: usize,
    spawned_total: u64,
}

impl EmitterPool {
    pub fn new(config: EmitterConfig) -> Self {
        Self {
            slots: Vec::with_capacity(config.max_active),
            config,
            free: Vec::new(),
            active: 0,
            spawned_total: 0,
        }
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Number of live bursts.
    #[inline]
    pub fn active(&self) -> usize {
        self.active
    }

    /// Bursts spawned since creation.
    pub fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    /// One frame of the lifecycle: advance and retire live bursts, then
    /// maybe spawn a new one.
    pub fn step(&mut self, sampler: &mut Sampler) {
        let gravity = self.config.gravity;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let alive = match slot {
                Some(burst) => burst.step(gravity),
                None => continue,
            };
            if !alive {
                *slot = None;
                self.free.push(index);
                self.active -= 1;
                log::debug!("burst in slot {} retired", index);
            }
        }

        if sampler.chance(self.config.spawn_probability) {
            let origin = sampler.in_box(self.config.spawn_min, self.config.spawn_max);
            self.spawn(origin, sampler);
        }
    }

    /// Spawn a burst at `origin` with a random bright color.
    ///
    /// Returns the slot used, or `None` when the pool is at `max_active`.
    pub fn spawn(&mut self, origin: Vec3, sampler: &mut Sampler) -> Option<usize> {
        if self.active >= self.config.max_active {
            log::debug!("burst skipped: {} bursts already live", self.active);
            return None;
        }

        let color = sampler.random_hue(0.8, 1.0);
        let burst = Burst::new(origin, color, &self.config, sampler);
        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(burst);
                index
            }
            None => {
                self.slots.push(Some(burst));
                self.slots.len() - 1
            }
        };
        self.active += 1;
        self.spawned_total += 1;
        log::debug!("burst spawned in slot {} at {:?}", index, origin);
        Some(index)
    }

    /// Burst in `slot`, if it is live.
    pub fn get(&self, slot: usize) -> Option<&Burst> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Live bursts in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Burst> {
        self.slots.iter().flatten()
    }

    /// Remove every burst.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.active = 0;
    }

    /// Fill `out` with one vertex per burst particle, alpha = burst opacity.
    pub fn write_vertices(&self, out: &mut Vec<PointVertex>) {
        out.clear();
        for burst in self.iter() {
            let alpha = burst.opacity();
            out.extend(
                burst
                    .positions
                    .iter()
                    .map(|p| PointVertex::new(*p, burst.size, burst.color, alpha)),
            );
        }
    }
}

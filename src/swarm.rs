//! The simulation context.
//!
//! [`Swarm`] owns every piece of mutable state: the particle buffer, the
//! spring integrator, the gesture classifier, the mode machine, the burst
//! pool, the scenery, the clock and the random source. Nothing is global.
//!
//! The host drives it from two sides:
//!
//! - the hand tracker calls [`Swarm::on_gesture_sample`] (or
//!   [`Swarm::on_hand_landmarks`]) whenever it has a result. The call only
//!   records the sample; the newest one wins and older unread ones are dropped.
//! - the render loop calls [`Swarm::tick`] once per frame, then reads the
//!   buffers.
//!
//! Per tick: latest sample → classifier → mode machine (entry effects) →
//! fixed steps of { dwell clock, springs, bursts, scenery }.

use crate::buffer::ParticleBuffer;
use crate::config::SwarmConfig;
use crate::emitter::{Burst, EmitterPool};
use crate::error::SwarmError;
use crate::formation;
use crate::gesture::{GestureClassifier, GestureSample};
use crate::integrator::SpringIntegrator;
use crate::mode::{Mode, ModeMachine, Transition};
use crate::palette::Palette;
use crate::scenery::Scenery;
use crate::spawn::Sampler;
use crate::time::SimClock;
use glam::Vec3;

/// Snapshot for status text and logs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwarmStatus {
    pub mode: Mode,
    pub frame: u64,
    pub elapsed: f32,
    pub active_emitters: usize,
    pub explosions: u64,
    pub max_speed: f32,
    pub theme_index: usize,
}

/// Gesture-driven particle swarm.
///
/// # Example
///
/// ```ignore
/// let mut swarm = Swarm::build(SwarmConfig::default().with_seed(1))?;
/// loop {
///     swarm.on_gesture_sample(tracker.latest_distance());
///     swarm.tick(frame_dt)?;
///     renderer.draw(swarm.buffer()?.positions_flat());
/// }
/// ```
#[derive(Debug)]
pub struct Swarm {
    config: SwarmConfig,
    sampler: Sampler,
    clock: SimClock,
    buffer: Option<ParticleBuffer>,
    integrator: SpringIntegrator,
    classifier: GestureClassifier,
    machine: ModeMachine,
    emitters: EmitterPool,
    scenery: Scenery,
    latest: Option<GestureSample>,
    swipe_pending: bool,
    theme_index: usize,
}

impl Swarm {
    /// Create a swarm without a formation. [`tick`](Self::tick) fails with
    /// [`SwarmError::Uninitialized`] until [`generate_formation`](Self::generate_formation) runs.
    pub fn new(config: SwarmConfig) -> Result<Self, SwarmError> {
        config.validate()?;

        let mut sampler = Sampler::new(config.seed);
        let scenery = Scenery::new(config.scenery.clone(), config.formation.apex(), &mut sampler);

        let clock = SimClock::new(config.step_rate, config.max_steps_per_tick);

        Ok(Self {
            buffer: None,
            integrator: SpringIntegrator::new(config.springs.clone(), Vec3::ZERO),
            classifier: GestureClassifier::new(&config.gesture),
            machine: machine_for(&config, &clock),
            clock,
            emitters: EmitterPool::new(config.emitters.clone()),
            scenery,
            latest: None,
            swipe_pending: false,
            theme_index: 0,
            sampler,
            config,
        })
    }

    /// Create a swarm and generate its formation.
    pub fn build(config: SwarmConfig) -> Result<Self, SwarmError> {
        let mut swarm = Self::new(config)?;
        swarm.generate_formation();
        Ok(swarm)
    }

    /// (Re)build the formation and reset the particle buffer to the scattered
    /// start layout. Bursts and mode are left alone.
    pub fn generate_formation(&mut self) {
        let params = &self.config.formation;
        let formation = formation::generate(params, &self.config.palette, &mut self.sampler);

        self.integrator.set_centroid(formation.centroid);
        self.scenery.set_apex(params.apex());
        log::info!(
            "generated formation: {} particles on {} arms, centroid {:?}",
            formation.len(),
            params.arm_count,
            formation.centroid
        );
        self.buffer = Some(ParticleBuffer::from_formation(formation));
    }

    /// Return to the start state: Idle, no bursts, clock at zero, first theme.
    ///
    /// A swarm that had a formation gets a fresh one; the random stream is
    /// not reseeded, so the new layout differs from the first.
    pub fn reset(&mut self) {
        self.clock.reset();
        self.emitters.clear();
        self.scenery.reset();
        self.machine = machine_for(&self.config, &self.clock);
        self.classifier = GestureClassifier::new(&self.config.gesture);
        self.latest = None;
        self.swipe_pending = false;
        self.theme_index = 0;
        if self.buffer.is_some() {
            self.generate_formation();
        }
        log::info!("swarm reset");
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Record the newest landmark distance; `None` means no hand in view.
    ///
    /// Never blocks and never touches the particles. Only the most recent
    /// sample before a tick is classified.
    pub fn on_gesture_sample(&mut self, distance: Option<f32>) {
        self.latest = Some(GestureSample::distance(distance));
    }

    /// Record a full hand skeleton (21 normalized landmarks), or `None` when
    /// no hand was detected. Also watches for sideways swipes, which change
    /// the color theme on the next tick.
    pub fn on_hand_landmarks(&mut self, landmarks: Option<&[Vec3]>) {
        let sample = self.classifier.sample_landmarks(landmarks);
        if sample.swipe {
            self.swipe_pending = true;
        }
        self.latest = Some(sample);
    }

    // =========================================================================
    // Frame
    // =========================================================================

    /// Advance the simulation by one rendered frame of `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> Result<(), SwarmError> {
        let buffer = self.buffer.as_mut().ok_or(SwarmError::Uninitialized)?;

        if let Some(sample) = self.latest.take() {
            let signal = self.classifier.classify(sample.distance);
            if let Some(transition) = self.machine.observe(signal) {
                enter(transition, &self.integrator, buffer, &mut self.sampler);
            }
        }

        if self.swipe_pending {
            self.swipe_pending = false;
            self.theme_index = (self.theme_index + 1) % self.config.palette.len();
            recolor_theme(buffer, &self.config, self.theme_index, &mut self.sampler);
        }

        let steps = self.clock.advance(dt);
        let step = self.clock.step_seconds();
        let start = self.clock.elapsed() - steps as f32 * step;
        for i in 0..steps {
            if let Some(transition) = self.machine.advance() {
                enter(transition, &self.integrator, buffer, &mut self.sampler);
            }
            self.integrator.advance(buffer, self.machine.mode());
            self.emitters.step(&mut self.sampler);
            self.scenery.step(start + (i + 1) as f32 * step);
        }
        Ok(())
    }

    // =========================================================================
    // Palette
    // =========================================================================

    /// Move to the next theme color and recolor a share of the particles.
    pub fn cycle_theme(&mut self) {
        self.theme_index = (self.theme_index + 1) % self.config.palette.len();
        if let Some(buffer) = self.buffer.as_mut() {
            recolor_theme(buffer, &self.config, self.theme_index, &mut self.sampler);
        }
    }

    /// Replace the palette and recolor every particle from it.
    pub fn set_palette(&mut self, palette: Palette) {
        if let Some(buffer) = self.buffer.as_mut() {
            buffer.apply_palette(&palette);
        }
        log::info!("palette replaced ({} colors)", palette.len());
        self.config.palette = palette;
        self.theme_index = 0;
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// The main particle buffer.
    pub fn buffer(&self) -> Result<&ParticleBuffer, SwarmError> {
        self.buffer.as_ref().ok_or(SwarmError::Uninitialized)
    }

    /// Live firework bursts.
    pub fn bursts(&self) -> impl Iterator<Item = &Burst> {
        self.emitters.iter()
    }

    pub fn emitters(&self) -> &EmitterPool {
        &self.emitters
    }

    pub fn scenery(&self) -> &Scenery {
        &self.scenery
    }

    pub fn current_mode(&self) -> Mode {
        self.machine.mode()
    }

    /// Simulated seconds spent in the current mode.
    pub fn mode_elapsed(&self) -> f32 {
        self.machine.time_in_mode()
    }

    pub fn explosions(&self) -> u64 {
        self.machine.explosions()
    }

    pub fn frame(&self) -> u64 {
        self.clock.frame()
    }

    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    pub fn active_emitters(&self) -> usize {
        self.emitters.active()
    }

    pub fn theme_index(&self) -> usize {
        self.theme_index
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// For pausing or slowing the simulation.
    pub fn clock_mut(&mut self) -> &mut SimClock {
        &mut self.clock
    }

    /// Point the swarm collapses onto while gathering.
    pub fn collapse_point(&self) -> Vec3 {
        self.integrator.collapse_point()
    }

    pub fn status(&self) -> SwarmStatus {
        SwarmStatus {
            mode: self.current_mode(),
            frame: self.frame(),
            elapsed: self.elapsed(),
            active_emitters: self.active_emitters(),
            explosions: self.explosions(),
            max_speed: self.buffer.as_ref().map_or(0.0, ParticleBuffer::max_speed),
            theme_index: self.theme_index,
        }
    }
}

/// Apply the entry effects of a mode change.
fn enter(
    transition: Transition,
    integrator: &SpringIntegrator,
    buffer: &mut ParticleBuffer,
    sampler: &mut Sampler,
) {
    log::debug!("mode {} -> {}", transition.from, transition.to);
    if transition.seeds_impulse() {
        integrator.apply_impulse(buffer, sampler);
    }
}

fn machine_for(config: &SwarmConfig, clock: &SimClock) -> ModeMachine {
    ModeMachine::new(
        config.explode_dwell,
        config.gesture.release_on_lost,
        clock.step_seconds(),
    )
}

fn recolor_theme(
    buffer: &mut ParticleBuffer,
    config: &SwarmConfig,
    theme: usize,
    sampler: &mut Sampler,
) {
    let color = config.palette.cyclic(theme);
    let changed = buffer.recolor_share(color, config.theme_recolor_share, sampler);
    log::info!("theme {} applied to {} particles", theme, changed);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> SwarmConfig {
        SwarmConfig::default()
            .with_particle_count(64)
            .with_spawn_probability(0.0)
            .with_seed(17)
    }

    #[test]
    fn test_tick_before_formation_fails() {
        let mut swarm = Swarm::new(small()).unwrap();
        assert!(matches!(swarm.tick(1.0 / 60.0), Err(SwarmError::Uninitialized)));
        assert!(swarm.buffer().is_err());
        swarm.generate_formation();
        assert!(swarm.tick(1.0 / 60.0).is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            Swarm::new(small().with_arm_count(0)),
            Err(SwarmError::Config(_))
        ));
    }

    #[test]
    fn test_latest_sample_wins() {
        let mut swarm = Swarm::build(small()).unwrap();
        // Closed then open before one tick: only "open" is seen, so Idle stays.
        swarm.on_gesture_sample(Some(0.05));
        swarm.on_gesture_sample(Some(0.5));
        swarm.tick(1.0 / 60.0).unwrap();
        assert_eq!(swarm.current_mode(), Mode::Idle);
    }

    #[test]
    fn test_no_new_sample_keeps_mode() {
        let mut swarm = Swarm::build(small()).unwrap();
        swarm.on_gesture_sample(Some(0.05));
        swarm.tick(1.0 / 60.0).unwrap();
        for _ in 0..30 {
            swarm.tick(1.0 / 60.0).unwrap();
        }
        assert_eq!(swarm.current_mode(), Mode::Gather);
    }

    #[test]
    fn test_explode_dwell_returns_to_idle() {
        let mut swarm = Swarm::build(small().with_explode_dwell(0.5)).unwrap();
        swarm.on_gesture_sample(Some(0.05));
        swarm.tick(1.0 / 60.0).unwrap();
        swarm.on_gesture_sample(Some(0.5));
        swarm.tick(1.0 / 60.0).unwrap();
        assert_eq!(swarm.current_mode(), Mode::Explode);
        for _ in 0..40 {
            swarm.tick(1.0 / 60.0).unwrap();
        }
        assert_eq!(swarm.current_mode(), Mode::Idle);
        assert_eq!(swarm.explosions(), 1);
    }

    #[test]
    fn test_swipe_cycles_theme() {
        let mut swarm = Swarm::build(small()).unwrap();
        let mut hand = vec![Vec3::new(0.5, 0.9, 0.0); 21];
        hand[8] = Vec3::new(0.2, 0.4, 0.0);
        swarm.on_hand_landmarks(Some(&hand));
        hand[8].x = 0.7;
        swarm.on_hand_landmarks(Some(&hand));
        swarm.tick(1.0 / 60.0).unwrap();
        assert_eq!(swarm.theme_index(), 1);
        let theme = swarm.config().palette.cyclic(1);
        let recolored = swarm
            .buffer()
            .unwrap()
            .colors()
            .iter()
            .filter(|c| **c == theme)
            .count();
        assert!(recolored > 0);
    }

    #[test]
    fn test_set_palette_recolors_everything() {
        let mut swarm = Swarm::build(small()).unwrap();
        let palette = Palette::from_hex(&[0x000000]);
        swarm.set_palette(palette);
        assert!(swarm
            .buffer()
            .unwrap()
            .colors()
            .iter()
            .all(|c| *c == Vec3::ZERO));
    }

    #[test]
    fn test_reset_returns_to_start() {
        let mut swarm = Swarm::build(small().with_spawn_probability(1.0)).unwrap();
        swarm.on_gesture_sample(Some(0.05));
        swarm.tick(1.0 / 60.0).unwrap();
        swarm.on_gesture_sample(Some(0.5));
        for _ in 0..10 {
            swarm.tick(1.0 / 60.0).unwrap();
        }
        swarm.cycle_theme();
        swarm.clock_mut().pause();
        assert_eq!(swarm.current_mode(), Mode::Explode);
        assert!(swarm.active_emitters() > 0);

        swarm.reset();
        assert_eq!(swarm.current_mode(), Mode::Idle);
        assert_eq!(swarm.mode_elapsed(), 0.0);
        assert_eq!(swarm.active_emitters(), 0);
        assert_eq!(swarm.frame(), 0);
        assert_eq!(swarm.elapsed(), 0.0);
        assert_eq!(swarm.theme_index(), 0);
        assert_eq!(swarm.scenery().spin(), 0.0);
        assert!(!swarm.clock().is_paused());
        assert!(swarm.buffer().unwrap().velocities().iter().all(|v| *v == Vec3::ZERO));

        swarm.tick(1.0 / 60.0).unwrap();
        assert_eq!(swarm.clock().steps(), 1);
    }

    #[test]
    fn test_reset_keeps_uninitialized_swarm_empty() {
        let mut swarm = Swarm::new(small()).unwrap();
        swarm.reset();
        assert!(swarm.buffer().is_err());
    }

    #[test]
    fn test_status_snapshot() {
        let mut swarm = Swarm::build(small()).unwrap();
        swarm.tick(1.0 / 60.0).unwrap();
        let status = swarm.status();
        assert_eq!(status.mode, Mode::Idle);
        assert_eq!(status.frame, 1);
        assert_eq!(status.active_emitters, 0);
    }
}

//! # swarmkit - gesture-driven particle swarm
//!
//! A few thousand particles settle into a spiral cone, collapse into a tight
//! ball while the tracked hand is closed, and blow apart when it opens. Small
//! firework bursts pop around the scene on their own schedule.
//!
//! swarmkit does the simulation only. A hand tracker feeds it a fingertip
//! distance, a renderer reads the buffers back every frame.
//!
//! ## Quick Start
//!
//! ```ignore
//! use swarmkit::prelude::*;
//!
//! fn main() -> Result<(), SwarmError> {
//!     let mut swarm = Swarm::build(
//!         SwarmConfig::default()
//!             .with_particle_count(6000)
//!             .with_arm_count(4),
//!     )?;
//!
//!     loop {
//!         swarm.on_gesture_sample(tracker.wrist_to_index_tip());
//!         swarm.tick(frame_dt)?;
//!
//!         let particles = swarm.buffer()?;
//!         renderer.upload(particles.positions_flat(), particles.colors_flat());
//!     }
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Formation
//!
//! Each particle gets a home position on one of several spiral arms wound
//! around a cone. See [`formation`].
//!
//! ### Modes
//!
//! The swarm is always in one [`Mode`]:
//!
//! | Mode | Pulled toward | Entered when |
//! |------|---------------|--------------|
//! | Idle | own home position | start, explode dwell over, hand lost while gathering |
//! | Gather | shared collapse point | hand closes |
//! | Explode | own home position | hand opens while gathering (one outward kick) |
//!
//! ### Springs
//!
//! Every fixed step each particle runs a damped spring toward its attraction
//! point. Gain and damping come from the current mode. See [`integrator`].
//!
//! ### Timing
//!
//! All rates are per fixed 60 Hz step. [`Swarm::tick`] takes the real frame
//! delta and runs as many steps as it covers, so motion looks the same on a
//! 30 Hz and a 144 Hz display.
//!
//! ## Logging
//!
//! swarmkit logs through the [`log`](https://docs.rs/log) facade. Install any
//! logger (the demo uses `env_logger`) and set `RUST_LOG=swarmkit=debug` to
//! see mode transitions and burst lifecycles.

pub mod buffer;
pub mod config;
pub mod emitter;
pub mod error;
pub mod formation;
pub mod gesture;
pub mod integrator;
pub mod mode;
pub mod palette;
pub mod scenery;
pub mod spawn;
mod swarm;
pub mod time;

pub use buffer::{ParticleBuffer, PointVertex};
pub use bytemuck;
pub use config::SwarmConfig;
pub use emitter::{Burst, EmitterConfig, EmitterPool};
pub use error::{ConfigError, SwarmError};
pub use formation::{Formation, FormationParams};
pub use gesture::{GestureClassifier, GestureConfig, GestureSample, GestureSignal};
pub use glam::{Mat4, Vec3};
pub use integrator::{SpringConfig, SpringIntegrator, SpringProfile};
pub use mode::{Mode, ModeMachine, Transition};
pub use palette::Palette;
pub use scenery::{Scenery, SceneryConfig};
pub use spawn::Sampler;
pub use swarm::{Swarm, SwarmStatus};
pub use time::SimClock;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use swarmkit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::buffer::{ParticleBuffer, PointVertex};
    pub use crate::config::SwarmConfig;
    pub use crate::emitter::{Burst, EmitterConfig};
    pub use crate::error::{ConfigError, SwarmError};
    pub use crate::gesture::{GestureConfig, GestureSignal};
    pub use crate::mode::Mode;
    pub use crate::palette::Palette;
    pub use crate::swarm::{Swarm, SwarmStatus};
    pub use crate::{Mat4, Vec3};
}

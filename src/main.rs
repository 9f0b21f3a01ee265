//! Headless demo: runs a scripted hand through one gather/explode cycle and
//! a theme swipe, printing a status line once per simulated second.
//!
//! ```text
//! swarmkit-demo [config.json]
//! RUST_LOG=swarmkit=debug swarmkit-demo
//! ```

use std::env;
use std::error::Error;
use swarmkit::gesture::INDEX_TIP;
use swarmkit::prelude::*;

const FRAME_DT: f32 = 1.0 / 60.0;
const SECONDS: u32 = 10;

/// Scripted hand for frame `frame`: wrist fixed, index tip moving.
fn hand_at(frame: u32) -> Option<Vec<Vec3>> {
    let t = frame as f32 * FRAME_DT;
    let wrist = Vec3::new(0.5, 0.85, 0.0);
    let tip = match t {
        t if t < 1.0 => return None,
        // open hand, no change
        t if t < 2.0 => Vec3::new(0.5, 0.35, 0.0),
        // fist
        t if t < 4.0 => Vec3::new(0.52, 0.75, 0.0),
        // open: explode
        t if t < 7.0 => Vec3::new(0.5, 0.35, 0.0),
        // swipe right, then hold
        t if t < 8.5 => Vec3::new(0.8, 0.35, 0.0),
        _ => return None,
    };
    let mut landmarks = vec![wrist; 21];
    landmarks[INDEX_TIP] = tip;
    Some(landmarks)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match env::args().nth(1) {
        Some(path) => {
            log::info!("loading config from {}", path);
            SwarmConfig::load(&path)?
        }
        None => SwarmConfig::default(),
    };

    let mut swarm = Swarm::build(config)?;
    let mut vertices = Vec::new();

    for frame in 0..SECONDS * 60 {
        let hand = hand_at(frame);
        swarm.on_hand_landmarks(hand.as_deref());
        swarm.tick(FRAME_DT)?;
        swarm.buffer()?.write_vertices(&mut vertices);

        if (frame + 1) % 60 == 0 {
            let status = swarm.status();
            println!(
                concat!(
                    "t={:>5.2}s mode={:<7} in_mode={:>4.2}s bursts={:>2} ",
                    "explosions={} theme={} max_speed={:.3} vertices={}"
                ),
                status.elapsed,
                status.mode,
                swarm.mode_elapsed(),
                status.active_emitters,
                status.explosions,
                status.theme_index,
                status.max_speed,
                vertices.len(),
            );
        }
    }
    Ok(())
}

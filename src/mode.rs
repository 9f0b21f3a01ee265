//! Behavioral mode state machine.
//!
//! | From | Signal / event | To |
//! |------|----------------|----|
//! | Idle | `Closed` | Gather |
//! | Gather | `Open` | Explode (one impulse) |
//! | Gather | `NoSignal` (if `release_on_lost`) | Idle |
//! | Explode | dwell time elapsed | Idle |
//!
//! Explode can only be entered from Gather, so a hand that stays open never
//! fires a second impulse: the fist has to close again first. While exploding
//! the machine ignores gesture input entirely.

use crate::gesture::GestureSignal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rounding slack when converting the dwell into steps.
const STEP_EPSILON: f32 = 1e-3;

/// The active behavior of the swarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Particles settle gently onto their own formation targets.
    #[default]
    Idle,
    /// Particles are pulled hard toward one shared collapse point.
    Gather,
    /// Particles were kicked outward and are springing back to formation.
    Explode,
}

impl Mode {
    /// Short label for status text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Idle => "idle",
            Mode::Gather => "gather",
            Mode::Explode => "explode",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A mode change reported by [`ModeMachine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Mode,
    pub to: Mode,
}

impl Transition {
    /// Entering Explode seeds the outward impulse.
    #[inline]
    pub fn seeds_impulse(&self) -> bool {
        self.to == Mode::Explode
    }
}

/// Owns the current [`Mode`] and decides transitions.
#[derive(Debug, Clone)]
pub struct ModeMachine {
    mode: Mode,
    steps_in_mode: u32,
    step_seconds: f32,
    dwell_steps: u32,
    release_on_lost: bool,
    explosions: u64,
}

impl ModeMachine {
    /// Start in Idle.
    ///
    /// * `explode_dwell` - seconds spent in Explode before returning to Idle
    /// * `release_on_lost` - whether losing the hand ends Gather
    /// * `step_seconds` - length of one fixed step
    ///
    /// The dwell is counted in whole steps: `ceil(explode_dwell / step_seconds)`.
    pub fn new(explode_dwell: f32, release_on_lost: bool, step_seconds: f32) -> Self {
        let dwell_steps = if step_seconds > 0.0 {
            (explode_dwell / step_seconds - STEP_EPSILON).ceil().max(0.0) as u32
        } else {
            0
        };
        Self {
            mode: Mode::Idle,
            steps_in_mode: 0,
            step_seconds,
            dwell_steps,
            release_on_lost,
            explosions: 0,
        }
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Simulated seconds since the last transition.
    #[inline]
    pub fn time_in_mode(&self) -> f32 {
        self.steps_in_mode as f32 * self.step_seconds
    }

    /// Fixed steps since the last transition.
    #[inline]
    pub fn steps_in_mode(&self) -> u32 {
        self.steps_in_mode
    }

    /// Steps Explode lasts before falling back to Idle.
    #[inline]
    pub fn dwell_steps(&self) -> u32 {
        self.dwell_steps
    }

    /// How many times Explode has been entered.
    #[inline]
    pub fn explosions(&self) -> u64 {
        self.explosions
    }

    /// Feed one classifier signal.
    pub fn observe(&mut self, signal: GestureSignal) -> Option<Transition> {
        let next = match (self.mode, signal) {
            (Mode::Idle, GestureSignal::Closed) => Mode::Gather,
            (Mode::Idle, GestureSignal::Open | GestureSignal::NoSignal) => Mode::Idle,

            (Mode::Gather, GestureSignal::Closed) => Mode::Gather,
            (Mode::Gather, GestureSignal::Open) => Mode::Explode,
            (Mode::Gather, GestureSignal::NoSignal) if self.release_on_lost => Mode::Idle,
            (Mode::Gather, GestureSignal::NoSignal) => Mode::Gather,

            (Mode::Explode, _) => Mode::Explode,
        };
        self.enter(next)
    }

    /// Count one fixed step in the current mode.
    pub fn advance(&mut self) -> Option<Transition> {
        self.steps_in_mode = self.steps_in_mode.saturating_add(1);
        match self.mode {
            Mode::Explode if self.steps_in_mode >= self.dwell_steps => self.enter(Mode::Idle),
            Mode::Idle | Mode::Gather | Mode::Explode => None,
        }
    }

    fn enter(&mut self, next: Mode) -> Option<Transition> {
        if next == self.mode {
            return None;
        }
        let transition = Transition {
            from: self.mode,
            to: next,
        };
        self.mode = next;
        self.steps_in_mode = 0;
        if next == Mode::Explode {
            self.explosions += 1;
        }
        Some(transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use GestureSignal::*;

    const STEP: f32 = 1.0 / 60.0;

    fn machine() -> ModeMachine {
        ModeMachine::new(2.2, true, STEP)
    }

    fn idle_to_gather() -> Transition {
        Transition {
            from: Mode::Idle,
            to: Mode::Gather,
        }
    }

    #[test]
    fn test_starts_idle() {
        assert_eq!(machine().mode(), Mode::Idle);
    }

    #[test]
    fn test_closed_closed_open() {
        let mut m = machine();
        let seen: Vec<_> = [Closed, Closed, Open]
            .into_iter()
            .filter_map(|s| m.observe(s))
            .collect();
        assert_eq!(
            seen,
            vec![
                idle_to_gather(),
                Transition {
                    from: Mode::Gather,
                    to: Mode::Explode,
                },
            ]
        );
        assert_eq!(m.explosions(), 1);
    }

    #[test]
    fn test_open_level_fires_once() {
        let mut m = machine();
        let impulses = [Closed, Open, Open]
            .into_iter()
            .filter_map(|s| m.observe(s))
            .filter(|t| t.seeds_impulse())
            .count();
        assert_eq!(impulses, 1);
        assert_eq!(m.explosions(), 1);
    }

    #[test]
    fn test_open_from_idle_does_nothing() {
        let mut m = machine();
        assert_eq!(m.observe(Open), None);
        assert_eq!(m.mode(), Mode::Idle);
    }

    #[test]
    fn test_dwell_steps_are_exact() {
        assert_eq!(machine().dwell_steps(), 132);
        assert_eq!(ModeMachine::new(0.5, true, STEP).dwell_steps(), 30);
        assert_eq!(ModeMachine::new(0.51, true, STEP).dwell_steps(), 31);
        assert_eq!(ModeMachine::new(1.0, true, 0.25).dwell_steps(), 4);
        assert_eq!(ModeMachine::new(0.0, true, STEP).dwell_steps(), 0);
    }

    #[test]
    fn test_explode_returns_to_idle_after_dwell() {
        let mut m = machine();
        m.observe(Closed);
        m.observe(Open);
        for _ in 0..131 {
            assert_eq!(m.advance(), None);
        }
        // input is ignored while exploding
        assert_eq!(m.observe(Closed), None);
        assert_eq!(m.mode(), Mode::Explode);
        assert_eq!(
            m.advance(),
            Some(Transition {
                from: Mode::Explode,
                to: Mode::Idle,
            })
        );
    }

    #[test]
    fn test_rearm_requires_gather() {
        let mut m = ModeMachine::new(1.0, true, 0.25);
        m.observe(Closed);
        m.observe(Open);
        for _ in 0..4 {
            m.advance();
        }
        assert_eq!(m.mode(), Mode::Idle);
        assert_eq!(m.observe(Open), None);
        m.observe(Closed);
        assert!(m.observe(Open).is_some_and(|t| t.seeds_impulse()));
        assert_eq!(m.explosions(), 2);
    }

    #[test]
    fn test_lost_hand_releases_gather() {
        let mut m = machine();
        m.observe(Closed);
        assert_eq!(
            m.observe(NoSignal),
            Some(Transition {
                from: Mode::Gather,
                to: Mode::Idle,
            })
        );
    }

    #[test]
    fn test_lost_hand_keeps_gather_when_disabled() {
        let mut m = ModeMachine::new(2.2, false, STEP);
        assert_eq!(m.observe(Closed), Some(idle_to_gather()));
        assert_eq!(m.observe(NoSignal), None);
        assert_eq!(m.mode(), Mode::Gather);
    }

    #[test]
    fn test_time_in_mode_resets() {
        let mut m = ModeMachine::new(2.2, true, 0.25);
        m.advance();
        m.advance();
        assert_eq!(m.steps_in_mode(), 2);
        assert!((m.time_in_mode() - 0.5).abs() < 1e-6);
        m.observe(Closed);
        assert_eq!(m.time_in_mode(), 0.0);
    }
}

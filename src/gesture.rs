//! Gesture classification from hand-tracking samples.
//!
//! The upstream detector reports one scalar per frame: the distance between
//! two tracked landmarks (wrist and index fingertip), normalized to 0-1 by
//! image size. A small distance means a fist, a large one an open hand.
//!
//! Classification is plain thresholding. Noise is absorbed downstream: the
//! [`ModeMachine`](crate::ModeMachine) only reacts to edges, not levels.
//!
//! Samples that are missing, negative, NaN or infinite are reported as
//! [`GestureSignal::NoSignal`] rather than propagated.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Landmark index of the wrist in a 21-point hand skeleton.
pub const WRIST: usize = 0;
/// Landmark index of the index fingertip in a 21-point hand skeleton.
pub const INDEX_TIP: usize = 8;

/// Discrete classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureSignal {
    /// Fist: distance below the threshold.
    Closed,
    /// Open hand: distance at or above the threshold.
    Open,
    /// No usable hand this frame.
    NoSignal,
}

/// Classifier tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Distances strictly below this are `Closed`.
    pub closed_threshold: f32,
    /// Horizontal fingertip travel between consecutive samples that counts as a swipe.
    pub swipe_threshold: f32,
    /// Whether losing the hand drops Gather back to Idle.
    pub release_on_lost: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            closed_threshold: 0.16,
            swipe_threshold: 0.15,
            release_on_lost: true,
        }
    }
}

/// One reading from the detector, reduced to what the swarm needs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureSample {
    /// Normalized landmark distance, `None` when no hand was seen.
    pub distance: Option<f32>,
    /// The fingertip swept sideways since the previous sample.
    pub swipe: bool,
}

impl GestureSample {
    pub fn distance(distance: Option<f32>) -> Self {
        Self {
            distance,
            swipe: false,
        }
    }
}

/// Thresholding classifier with swipe tracking.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    closed_threshold: f32,
    swipe_threshold: f32,
    last_tip_x: Option<f32>,
}

impl GestureClassifier {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            closed_threshold: config.closed_threshold,
            swipe_threshold: config.swipe_threshold,
            last_tip_x: None,
        }
    }

    /// Map a distance metric to a signal.
    pub fn classify(&self, distance: Option<f32>) -> GestureSignal {
        match distance {
            Some(d) if d.is_finite() && d >= 0.0 => {
                if d < self.closed_threshold {
                    GestureSignal::Closed
                } else {
                    GestureSignal::Open
                }
            }
            Some(d) => {
                log::trace!("discarding malformed gesture distance {}", d);
                GestureSignal::NoSignal
            }
            None => GestureSignal::NoSignal,
        }
    }

    /// Reduce a full hand skeleton to a [`GestureSample`].
    ///
    /// Uses the image-plane (x, y) distance from wrist to index fingertip.
    /// Skeletons with fewer than 9 points or non-finite coordinates count as
    /// no hand, and reset swipe tracking so a re-entering hand does not swipe.
    pub fn sample_landmarks(&mut self, landmarks: Option<&[Vec3]>) -> GestureSample {
        let points = landmarks.and_then(|lm| Some((*lm.get(WRIST)?, *lm.get(INDEX_TIP)?)));
        let (wrist, tip) = match points {
            Some((w, t)) if w.is_finite() && t.is_finite() => (w, t),
            _ => {
                self.last_tip_x = None;
                return GestureSample::default();
            }
        };

        let distance = (tip.truncate() - wrist.truncate()).length();
        let swipe = self
            .last_tip_x
            .is_some_and(|last| (tip.x - last).abs() > self.swipe_threshold);
        self.last_tip_x = Some(tip.x);

        GestureSample {
            distance: Some(distance),
            swipe,
        }
    }
}

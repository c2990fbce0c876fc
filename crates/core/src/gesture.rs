use crate::GestureThresholds;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    pub fn label(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Horizontal state of a drag at the moment the card is let go.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DragRelease {
    pub offset_x: f64,
    pub velocity_x: f64,
}

impl GestureThresholds {
    /// A release counts as a swipe when either the offset or the velocity
    /// passes its threshold; otherwise the card snaps back.
    pub fn classify(&self, release: DragRelease) -> Option<SwipeDirection> {
        if release.offset_x > self.distance || release.velocity_x > self.velocity {
            Some(SwipeDirection::Right)
        } else if release.offset_x < -self.distance || release.velocity_x < -self.velocity {
            Some(SwipeDirection::Left)
        } else {
            None
        }
    }
}

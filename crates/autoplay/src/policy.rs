use swipematch_core::{DragRelease, RngState, SwipeDirection};

/// Per-mille scale used by `right_ratio`.
pub const RATIO_SCALE: u32 = 1_000;

/// Scripted stand-in for a user: swipes right with a fixed probability.
#[derive(Debug, Clone)]
pub struct SwipePolicy {
    rng: RngState,
    right_ratio: u32,
}

impl SwipePolicy {
    pub fn new(seed: u64, right_ratio: u32) -> Self {
        Self {
            rng: RngState::from_seed(seed),
            right_ratio: right_ratio.min(RATIO_SCALE),
        }
    }

    pub fn decide(&mut self) -> SwipeDirection {
        if self.rng.below(RATIO_SCALE as u64) < self.right_ratio as u64 {
            SwipeDirection::Right
        } else {
            SwipeDirection::Left
        }
    }

    /// A drag in the decided direction. Roughly one in four is too short
    /// and too slow to count.
    pub fn drag(&mut self) -> DragRelease {
        let sign = match self.decide() {
            SwipeDirection::Right => 1.0,
            SwipeDirection::Left => -1.0,
        };
        let weak = self.rng.below(4) == 0;
        let (offset, velocity) = if weak {
            (self.rng.below(90) as f64, self.rng.below(450) as f64)
        } else {
            (
                60.0 + self.rng.below(240) as f64,
                200.0 + self.rng.below(900) as f64,
            )
        };
        DragRelease {
            offset_x: sign * offset,
            velocity_x: sign * velocity,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AutoplayConfig {
    pub seed: u64,
    /// Chance of a right swipe, in thousandths.
    pub right_ratio: u32,
    pub max_swipes: u32,
    /// Drive the session with drag releases instead of direct swipes, so
    /// some attempts snap back.
    pub use_gestures: bool,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            seed: 0xC0FFEE,
            right_ratio: 200,
            max_swipes: 2_000,
            use_gestures: false,
        }
    }
}

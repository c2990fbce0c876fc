use serde::{Deserialize, Serialize};

/// How the engine restocks once the current deck runs dry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EscalationPolicy {
    /// Primary catalog, then the curated pool, then endless global batches.
    #[default]
    Ladder,
    /// Unseen same-program cards, then unseen other-program cards, then
    /// recycled catalog cards.
    Priority,
}

impl EscalationPolicy {
    pub fn label(self) -> &'static str {
        match self {
            Self::Ladder => "ladder",
            Self::Priority => "priority",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ladder" | "fixed" | "a" => Some(Self::Ladder),
            "priority" | "fallback" | "b" => Some(Self::Priority),
            _ => None,
        }
    }
}

/// Whether a swipe that empties the deck restocks it in the same call, or
/// leaves the session in `Refilling` until the driver calls `refill`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RefillMode {
    #[default]
    Immediate,
    Deferred,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GestureThresholds {
    #[serde(default = "default_swipe_distance")]
    pub distance: f64,
    #[serde(default = "default_swipe_velocity")]
    pub velocity: f64,
}

fn default_swipe_distance() -> f64 {
    100.0
}

fn default_swipe_velocity() -> f64 {
    500.0
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            distance: default_swipe_distance(),
            velocity: default_swipe_velocity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    #[serde(default = "default_match_cap")]
    pub match_cap: usize,
    #[serde(default)]
    pub policy: EscalationPolicy,
    #[serde(default = "default_global_batch_size")]
    pub global_batch_size: usize,
    #[serde(default = "default_refill_delay_ms")]
    pub refill_delay_ms: u64,
    #[serde(default)]
    pub refill_mode: RefillMode,
    #[serde(default)]
    pub gesture: GestureThresholds,
}

fn default_match_cap() -> usize {
    5
}

fn default_global_batch_size() -> usize {
    180
}

fn default_refill_delay_ms() -> u64 {
    800
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            match_cap: default_match_cap(),
            policy: EscalationPolicy::default(),
            global_batch_size: default_global_batch_size(),
            refill_delay_ms: default_refill_delay_ms(),
            refill_mode: RefillMode::default(),
            gesture: GestureThresholds::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_policy(policy: EscalationPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.match_cap == 0 {
            return Err("match_cap must be at least 1".to_string());
        }
        if self.global_batch_size == 0 {
            return Err("global_batch_size must be at least 1".to_string());
        }
        let gesture = self.gesture;
        if !(gesture.distance > 0.0 && gesture.velocity > 0.0) {
            return Err("gesture thresholds must be positive".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"policy":"priority"}"#).expect("parse");
        assert_eq!(config.policy, EscalationPolicy::Priority);
        assert_eq!(config.match_cap, 5);
        assert_eq!(config.global_batch_size, 180);
        assert_eq!(config.refill_mode, RefillMode::Immediate);
    }

    #[test]
    fn partial_gesture_keeps_the_other_threshold() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"gesture":{"distance":50}}"#).expect("parse");
        assert_eq!(config.gesture.distance, 50.0);
        assert_eq!(config.gesture.velocity, 500.0);
    }

    #[test]
    fn validate_rejects_degenerate_values() {
        let mut config = EngineConfig::default();
        assert!(config.validate().is_ok());
        config.global_batch_size = 0;
        assert!(config.validate().is_err());
        config.global_batch_size = 1;
        config.match_cap = 0;
        assert!(config.validate().is_err());
        config.match_cap = 5;
        config.gesture.velocity = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn policy_labels_parse() {
        assert_eq!(EscalationPolicy::from_label("Ladder"), Some(EscalationPolicy::Ladder));
        assert_eq!(EscalationPolicy::from_label("priority"), Some(EscalationPolicy::Priority));
        assert_eq!(EscalationPolicy::from_label("random"), None);
    }
}

use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Settings for the external collaborators. Everything is optional: a
/// missing key disables generation, a missing URL disables sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub sheet_url: Option<String>,
    pub generator_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            sheet_url: None,
            generator_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();
        Self {
            api_key: value("SWIPEMATCH_API_KEY"),
            model: value("SWIPEMATCH_MODEL").unwrap_or(defaults.model),
            api_base: value("SWIPEMATCH_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            sheet_url: value("SWIPEMATCH_SHEET_URL"),
            generator_timeout: value("SWIPEMATCH_GENERATOR_TIMEOUT_SECS")
                .and_then(|secs| secs.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.generator_timeout),
        }
    }

    pub fn generation_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

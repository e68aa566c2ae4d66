use serde::Deserialize;

use crate::error::RatingError;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub rating: RatingConfig,
    #[serde(default)]
    pub decay: DecayConfig,
    #[serde(default)]
    pub sentiment: SentimentConfig,
    #[serde(default)]
    pub cooldown: CooldownConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RatingConfig {
    /// Magnitude of a maximal single-event rating delta
    #[serde(default = "default_base_change")]
    pub base_change: f64,
    #[serde(default = "default_min_rating")]
    pub min_rating: f64,
    #[serde(default = "default_max_rating")]
    pub max_rating: f64,
    /// Starting value for unseen users and the target of decay
    #[serde(default = "default_neutral_rating")]
    pub neutral_rating: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DecayConfig {
    /// Run the periodic sweep in the binary
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_half_life_days")]
    pub half_life_days: f64,
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SentimentConfig {
    /// Use a pluggable sentiment model when one is supplied
    #[serde(default)]
    pub advanced: bool,
    /// Characters of comment text handed to the model
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CooldownConfig {
    /// Whole days before the same rater may move the same target again
    #[serde(default = "default_cooldown_days")]
    pub days: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    /// Events kept per user, oldest evicted first
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            base_change: default_base_change(),
            min_rating: default_min_rating(),
            max_rating: default_max_rating(),
            neutral_rating: default_neutral_rating(),
        }
    }
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            half_life_days: default_half_life_days(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            advanced: false,
            max_input_chars: default_max_input_chars(),
        }
    }
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self { days: default_cooldown_days() }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { capacity: default_history_capacity() }
    }
}

// Default value functions
fn default_base_change() -> f64 { 0.06 }
fn default_min_rating() -> f64 { 0.0 }
fn default_max_rating() -> f64 { 5.0 }
fn default_neutral_rating() -> f64 { 2.5 }
fn default_true() -> bool { true }
fn default_half_life_days() -> f64 { 90.0 }
fn default_sweep_interval() -> u64 { 3600 }
fn default_max_input_chars() -> usize { 512 }
fn default_cooldown_days() -> i64 { 7 }
fn default_history_capacity() -> usize { 500 }

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path, e))?;
        let config = Self::from_toml(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config '{}': {}", path, e))?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject bounds and knobs the engine cannot honor
    pub fn validate(&self) -> Result<(), RatingError> {
        let r = &self.rating;
        if !(r.min_rating.is_finite() && r.max_rating.is_finite() && r.neutral_rating.is_finite()) {
            return Err(RatingError::InvalidConfig("rating bounds must be finite".into()));
        }
        if r.min_rating < 0.0 {
            return Err(RatingError::InvalidConfig(format!(
                "min_rating must be >= 0 (got {})",
                r.min_rating
            )));
        }
        if r.max_rating <= r.min_rating {
            return Err(RatingError::InvalidConfig(format!(
                "max_rating ({}) must exceed min_rating ({})",
                r.max_rating, r.min_rating
            )));
        }
        if r.neutral_rating < r.min_rating || r.neutral_rating > r.max_rating {
            return Err(RatingError::InvalidConfig(format!(
                "neutral_rating ({}) must lie within [{}, {}]",
                r.neutral_rating, r.min_rating, r.max_rating
            )));
        }
        if !r.base_change.is_finite() || r.base_change < 0.0 {
            return Err(RatingError::InvalidConfig(format!(
                "base_change must be a non-negative number (got {})",
                r.base_change
            )));
        }
        if self.history.capacity == 0 {
            return Err(RatingError::InvalidConfig("history.capacity must be at least 1".into()));
        }
        if self.cooldown.days < 0 {
            return Err(RatingError::InvalidConfig(format!(
                "cooldown.days must be >= 0 (got {})",
                self.cooldown.days
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.rating.base_change, 0.06);
        assert_eq!(config.rating.max_rating, 5.0);
        assert_eq!(config.rating.neutral_rating, 2.5);
        assert_eq!(config.decay.half_life_days, 90.0);
        assert!(!config.sentiment.advanced);
        assert_eq!(config.sentiment.max_input_chars, 512);
        assert_eq!(config.cooldown.days, 7);
        assert_eq!(config.history.capacity, 500);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = Config::from_toml("[rating]\nmax_rating = 10.0\nneutral_rating = 5.0\n").unwrap();
        assert_eq!(config.rating.max_rating, 10.0);
        assert_eq!(config.rating.min_rating, 0.0);
        assert_eq!(config.cooldown.days, 7);
    }

    #[test]
    fn test_neutral_outside_bounds_rejected() {
        let err = Config::from_toml("[rating]\nneutral_rating = 7.0\n").unwrap_err();
        assert!(err.to_string().contains("neutral_rating"), "got: {}", err);
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let mut config = Config::default();
        config.rating.min_rating = 3.0;
        config.rating.max_rating = 1.0;
        assert!(matches!(config.validate(), Err(RatingError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_history_capacity_rejected() {
        let mut config = Config::default();
        config.history.capacity = 0;
        assert!(config.validate().is_err());
    }
}

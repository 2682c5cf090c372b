// Runtime configuration for the booking workflow

use crate::error::ConfigError;
use config::builder::{ConfigBuilder, DefaultState};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "TRAVEL";

// Longest a booking may stay pending: one day
pub const MAX_COMPLETION_DELAY_SECS: u64 = 86_400;

// Inclusive range of whole numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: u64,
    pub max: u64,
}

impl Bounds {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        rng.gen_range(self.min..=self.max)
    }

    fn check(&self, name: &str) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::Invalid(format!(
                "{} has min {} greater than max {}",
                name, self.min, self.max
            )));
        }
        Ok(())
    }
}

// Which option decides the outcome of a booking once its delay has elapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPolicy {
    #[default]
    BookedOption,
    // Legacy behaviour: inspect the first option of the originating search
    FirstOptionOfSearch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    pub last_minute_window_days: i64,
    pub hotel_options_per_search: usize,
    pub flight_options_per_search: usize,
    pub hotel_price_range: Bounds,
    pub flight_price_range: Bounds,
    pub supplier_latency_ms: Bounds,
    pub supplier_timeout_ms: u64,
    pub completion_delay_secs: Bounds,
    pub max_code_attempts: u32,
    pub resolution_policy: ResolutionPolicy,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            last_minute_window_days: 45,
            hotel_options_per_search: 3,
            flight_options_per_search: 2,
            hotel_price_range: Bounds::new(50, 299),
            flight_price_range: Bounds::new(100, 499),
            supplier_latency_ms: Bounds::new(500, 1499),
            supplier_timeout_ms: 5000,
            completion_delay_secs: Bounds::new(30, 60),
            max_code_attempts: 10,
            resolution_policy: ResolutionPolicy::BookedOption,
        }
    }
}

impl BookingConfig {
    /// Layers the built-in defaults, an optional `config/booking` file and
    /// `TRAVEL__*` environment variables (e.g. `TRAVEL__SUPPLIER_TIMEOUT_MS=2000`,
    /// `TRAVEL__COMPLETION_DELAY_SECS__MAX=90`).
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Self::defaults_builder()?
            .add_source(config::File::with_name("config/booking").required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::from_settings(settings)
    }

    fn defaults_builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(config::Config::builder().add_source(config::Config::try_from(&Self::default())?))
    }

    fn from_settings(settings: config::Config) -> Result<Self, ConfigError> {
        let loaded: BookingConfig = settings.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.last_minute_window_days < 0 {
            return Err(ConfigError::Invalid(
                "last_minute_window_days must not be negative".to_string(),
            ));
        }
        if self.hotel_options_per_search == 0 || self.flight_options_per_search == 0 {
            return Err(ConfigError::Invalid(
                "a search must return at least one option".to_string(),
            ));
        }
        if self.supplier_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "supplier_timeout_ms must be positive".to_string(),
            ));
        }
        if self.max_code_attempts == 0 {
            return Err(ConfigError::Invalid(
                "max_code_attempts must be positive".to_string(),
            ));
        }

        self.hotel_price_range.check("hotel_price_range")?;
        self.flight_price_range.check("flight_price_range")?;
        self.supplier_latency_ms.check("supplier_latency_ms")?;
        self.completion_delay_secs.check("completion_delay_secs")?;
        if self.completion_delay_secs.max > MAX_COMPLETION_DELAY_SECS {
            return Err(ConfigError::Invalid(format!(
                "completion_delay_secs max {} exceeds {} seconds",
                self.completion_delay_secs.max, MAX_COMPLETION_DELAY_SECS
            )));
        }
        Ok(())
    }

    // Configuration used by unit tests: no simulated network latency
    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self {
            supplier_latency_ms: Bounds::new(0, 0),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    #[test]
    fn test_defaults_are_valid() {
        let config = BookingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.last_minute_window_days, 45);
        assert_eq!(config.completion_delay_secs, Bounds::new(30, 60));
        assert_eq!(config.resolution_policy, ResolutionPolicy::BookedOption);
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let config = BookingConfig {
            completion_delay_secs: Bounds::new(60, 30),
            ..BookingConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("completion_delay_secs"));
    }

    #[test]
    fn test_zero_attempts_is_rejected() {
        let config = BookingConfig {
            max_code_attempts: 0,
            ..BookingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bounds_sample_stays_in_range() {
        let bounds = Bounds::new(30, 60);
        let mut rng = thread_rng();
        for _ in 0..1000 {
            assert!(bounds.contains(bounds.sample(&mut rng)));
        }
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let config: BookingConfig = serde_json::from_str(
            r#"{ "resolution_policy": "first_option_of_search", "max_code_attempts": 3 }"#,
        )
        .unwrap();

        assert_eq!(config.resolution_policy, ResolutionPolicy::FirstOptionOfSearch);
        assert_eq!(config.max_code_attempts, 3);
        assert_eq!(config.hotel_options_per_search, 3);
    }

    #[test]
    fn test_defaults_survive_the_config_builder() {
        let settings = BookingConfig::defaults_builder().unwrap().build().unwrap();
        let config = BookingConfig::from_settings(settings).unwrap();
        assert_eq!(config, BookingConfig::default());
    }

    #[test]
    fn test_overrides_are_layered_over_defaults() {
        let settings = BookingConfig::defaults_builder()
            .unwrap()
            .set_override("max_code_attempts", 3)
            .unwrap()
            .set_override("completion_delay_secs.max", 90)
            .unwrap()
            .set_override("resolution_policy", "first_option_of_search")
            .unwrap()
            .build()
            .unwrap();
        let config = BookingConfig::from_settings(settings).unwrap();

        assert_eq!(config.max_code_attempts, 3);
        assert_eq!(config.completion_delay_secs, Bounds::new(30, 90));
        assert_eq!(config.resolution_policy, ResolutionPolicy::FirstOptionOfSearch);
        assert_eq!(config.hotel_options_per_search, 3);
    }

    #[test]
    fn test_invalid_override_is_rejected_on_load() {
        let settings = BookingConfig::defaults_builder()
            .unwrap()
            .set_override("hotel_options_per_search", 0)
            .unwrap()
            .build()
            .unwrap();
        assert!(BookingConfig::from_settings(settings).is_err());
    }

    #[test]
    fn test_completion_delay_is_capped() {
        let at_cap = BookingConfig {
            completion_delay_secs: Bounds::new(30, MAX_COMPLETION_DELAY_SECS),
            ..BookingConfig::default()
        };
        assert!(at_cap.validate().is_ok());

        let over_cap = BookingConfig {
            completion_delay_secs: Bounds::new(30, MAX_COMPLETION_DELAY_SECS + 1),
            ..BookingConfig::default()
        };
        let err = over_cap.validate().unwrap_err();
        assert!(err.to_string().contains("completion_delay_secs"));
    }
}

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::Duration;

use crate::common::money::Money;

const MAX_HISTORY_WINDOW_DAYS: i64 = 36_500;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
    #[error("{0}")]
    OutOfRange(String),
}

/// Terminal and card policy.
///
/// Holds the values the terminal would otherwise hard-code: PIN attempt
/// limit, credit penalty rate, reader fault probability, history window,
/// starting cash and the range used to seed simulated linked accounts.
#[derive(Debug, Clone, PartialEq)]
pub struct AtmConfig {
    pub max_pin_attempts: u32,
    /// Fraction of a negative credit balance charged per penalty pass.
    pub penalty_rate: BigDecimal,
    /// Probability (0.0 - 1.0) that inserting a card fails with a read error.
    pub read_failure_probability: f64,
    pub history_window_days: i64,
    pub initial_cash: Money,
    pub linked_seed_min: Money,
    pub linked_seed_max: Money,
    /// Seed for the terminal's RNG; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for AtmConfig {
    fn default() -> Self {
        Self {
            max_pin_attempts: 3,
            penalty_rate: BigDecimal::from(1i64) / BigDecimal::from(100i64),
            read_failure_probability: 0.03,
            history_window_days: 30,
            initial_cash: Money::new(5_000_000),
            linked_seed_min: Money::new(100_000),
            linked_seed_max: Money::new(1_000_000),
            seed: None,
        }
    }
}

impl AtmConfig {
    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `{prefix}_MAX_PIN_ATTEMPTS`
    /// - `{prefix}_PENALTY_RATE`: decimal fraction, e.g. `0.01`
    /// - `{prefix}_READ_FAILURE_RATE`: probability (0.0 - 1.0)
    /// - `{prefix}_HISTORY_WINDOW_DAYS`
    /// - `{prefix}_INITIAL_CASH`: amount with up to two decimals
    /// - `{prefix}_SEED`: RNG seed
    ///
    /// Missing variables use default values.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable holds an unparseable value or the
    /// resulting configuration fails validation.
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_lookup(prefix, |key| std::env::var(key).ok())
    }

    /// Same as [`AtmConfig::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(prefix: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            max_pin_attempts: parse_var(
                &lookup,
                &format!("{prefix}_MAX_PIN_ATTEMPTS"),
                defaults.max_pin_attempts,
            )?,
            penalty_rate: parse_var(
                &lookup,
                &format!("{prefix}_PENALTY_RATE"),
                defaults.penalty_rate,
            )?,
            read_failure_probability: parse_var(
                &lookup,
                &format!("{prefix}_READ_FAILURE_RATE"),
                defaults.read_failure_probability,
            )?,
            history_window_days: parse_var(
                &lookup,
                &format!("{prefix}_HISTORY_WINDOW_DAYS"),
                defaults.history_window_days,
            )?,
            initial_cash: parse_var(
                &lookup,
                &format!("{prefix}_INITIAL_CASH"),
                defaults.initial_cash,
            )?,
            seed: match lookup(&format!("{prefix}_SEED")) {
                Some(raw) => Some(parse_value(&format!("{prefix}_SEED"), &raw)?),
                None => None,
            },
            ..defaults
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.read_failure_probability) {
            return Err(ConfigError::OutOfRange(format!(
                "read failure probability must be within 0.0..=1.0, got {}",
                self.read_failure_probability
            )));
        }
        if self.max_pin_attempts == 0 {
            return Err(ConfigError::OutOfRange(
                "max PIN attempts must be at least 1".into(),
            ));
        }
        if self.penalty_rate < BigDecimal::from(0i64) {
            return Err(ConfigError::OutOfRange(format!(
                "penalty rate must not be negative, got {}",
                self.penalty_rate
            )));
        }
        if !(1..=MAX_HISTORY_WINDOW_DAYS).contains(&self.history_window_days) {
            return Err(ConfigError::OutOfRange(format!(
                "history window must be within 1..={MAX_HISTORY_WINDOW_DAYS} days, got {}",
                self.history_window_days
            )));
        }
        if self.linked_seed_min > self.linked_seed_max {
            return Err(ConfigError::OutOfRange(format!(
                "linked seed range is inverted: {} > {}",
                self.linked_seed_min, self.linked_seed_max
            )));
        }
        Ok(())
    }

    pub fn history_window(&self) -> Duration {
        Duration::days(self.history_window_days)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

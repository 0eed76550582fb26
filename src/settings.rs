//! Plugin settings
//!
//! A flat string map with typed lookups. The host fills it from its own
//! settings store; the local harness builds it in code or from the
//! environment.

use crate::{
    constants::{SETTING_COINS, SETTING_CURRENCY, SETTING_UPDATE_FREQUENCY},
    error::PluginError,
};
use std::collections::HashMap;
use std::str::FromStr;

/// Environment variables read by [`PluginSettings::from_env`]
const ENV_KEYS: &[(&str, &str)] = &[
    ("COINGECKO_UPDATE_FREQUENCY", SETTING_UPDATE_FREQUENCY),
    ("COINGECKO_CURRENCY", SETTING_CURRENCY),
    ("COINGECKO_COINS", SETTING_COINS),
];

/// Raw key/value settings
#[derive(Debug, Clone, Default)]
pub struct PluginSettings {
    values: HashMap<String, String>,
}

impl PluginSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the known settings from `COINGECKO_*` environment variables
    pub fn from_env() -> Self {
        ENV_KEYS
            .iter()
            .fold(Self::new(), |settings, (var, key)| match std::env::var(var) {
                Ok(value) => settings.with_setting(key, value),
                Err(_) => settings,
            })
    }

    /// Fills in keys missing here from `fallback`
    pub fn with_fallback(mut self, fallback: PluginSettings) -> Self {
        for (key, value) in fallback.values {
            self.values.entry(key).or_insert(value);
        }
        self
    }

    /// Sets a value, replacing any previous one
    pub fn with_setting(mut self, key: &str, value: impl Into<String>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    /// Raw value of a key
    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Parses a required value
    ///
    /// # Errors
    /// `PluginError::Configuration` if the key is missing or does not parse
    pub fn get_value<T>(&self, key: &str) -> Result<T, PluginError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self
            .get_raw(key)
            .ok_or_else(|| PluginError::configuration(format!("Missing setting '{}'", key)))?;
        parse(key, raw)
    }

    /// Parses an optional value, returning `default` when the key is missing
    ///
    /// # Errors
    /// `PluginError::Configuration` if the value is present but does not parse
    pub fn get_value_or<T>(&self, key: &str, default: T) -> Result<T, PluginError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_raw(key) {
            Some(raw) => parse(key, raw),
            None => Ok(default),
        }
    }
}

fn parse<T>(key: &str, raw: &str) -> Result<T, PluginError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e| {
        PluginError::configuration(format!("Invalid value '{}' for setting '{}': {}", raw, key, e))
    })
}

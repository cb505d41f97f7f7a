//! Tournament configuration: serde defaults plus environment overrides.

use crate::error::TournamentError;
use crate::models::TournamentMode;
use serde::{Deserialize, Serialize};

pub const ENV_MAX_LOSSES: &str = "TOURNAMENT_MAX_LOSSES";
pub const ENV_RNG_SEED: &str = "TOURNAMENT_RNG_SEED";
pub const ENV_GRAND_FINALS: &str = "TOURNAMENT_GRAND_FINALS";
pub const ENV_MODE: &str = "TOURNAMENT_MODE";

fn default_max_losses() -> u32 {
    3
}

fn default_grand_finals() -> bool {
    true
}

/// Settings fixed when a tournament is created.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Losses before a player is eliminated in group play.
    #[serde(default = "default_max_losses")]
    pub max_losses: u32,
    /// Play a 1v1 grand final between the two finals winners. When false the
    /// finals winners are co-winners.
    #[serde(default = "default_grand_finals")]
    pub grand_finals: bool,
    /// 2v2 or 1v1. May still be changed while the tournament is in Setup.
    #[serde(default)]
    pub mode: TournamentMode,
    /// Seed for the tournament's random source; `None` draws from OS entropy.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            max_losses: default_max_losses(),
            grand_finals: default_grand_finals(),
            mode: TournamentMode::default(),
            rng_seed: None,
        }
    }
}

impl TournamentConfig {
    /// Defaults overridden by `TOURNAMENT_*` environment variables.
    pub fn from_env() -> Result<Self, TournamentError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TournamentError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = lookup(ENV_MAX_LOSSES) {
            config.max_losses = parse_var(ENV_MAX_LOSSES, &v)?;
        }
        if let Some(v) = lookup(ENV_RNG_SEED) {
            config.rng_seed = Some(parse_var(ENV_RNG_SEED, &v)?);
        }
        if let Some(v) = lookup(ENV_GRAND_FINALS) {
            config.grand_finals = parse_var(ENV_GRAND_FINALS, &v)?;
        }
        if let Some(v) = lookup(ENV_MODE) {
            config.mode = parse_var(ENV_MODE, &v)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TournamentError> {
        if self.max_losses == 0 {
            return Err(TournamentError::InvalidMaxLosses);
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, TournamentError> {
    value
        .trim()
        .parse()
        .map_err(|_| TournamentError::Config(format!("{key}={value:?} is not valid")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let c = TournamentConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(c, TournamentConfig::default());
        assert_eq!(c.max_losses, 3);
        assert!(c.grand_finals);
    }

    #[test]
    fn env_overrides() {
        let c = TournamentConfig::from_lookup(lookup_from(&[
            (ENV_MAX_LOSSES, "5"),
            (ENV_RNG_SEED, "42"),
            (ENV_GRAND_FINALS, "false"),
            (ENV_MODE, "1v1"),
        ]))
        .unwrap();
        assert_eq!(c.mode, TournamentMode::OneVOne);
        assert_eq!(c.max_losses, 5);
        assert_eq!(c.rng_seed, Some(42));
        assert!(!c.grand_finals);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            TournamentConfig::from_lookup(lookup_from(&[(ENV_MAX_LOSSES, "many")])),
            Err(TournamentError::Config(_))
        ));
        assert_eq!(
            TournamentConfig::from_lookup(lookup_from(&[(ENV_MAX_LOSSES, "0")])),
            Err(TournamentError::InvalidMaxLosses)
        );
        assert!(matches!(
            TournamentConfig::from_lookup(lookup_from(&[(ENV_MODE, "3v3")])),
            Err(TournamentError::Config(_))
        ));
    }

    #[test]
    fn serde_defaults_fill_missing_fields() {
        let c: TournamentConfig = serde_json::from_str(r#"{"max_losses": 2}"#).unwrap();
        assert_eq!(c.max_losses, 2);
        assert!(c.grand_finals);
        assert_eq!(c.mode, TournamentMode::TwoVTwo);
        assert_eq!(c.rng_seed, None);
    }
}

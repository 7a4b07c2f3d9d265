use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::determinism::{DEFAULT_SAMPLE_COUNT, DEFAULT_SCENARIO_SEED};
use super::diagnostics::ContractMode;

pub const DEFAULT_CONFIG_PATH: &str = "assets/math_config.ron";

/// Configuration for the game-math core, loaded once at startup.
///
/// None of these values change simulation results: the tables and fast
/// approximators are fixed. They only control diagnostics, the random
/// source seed and the determinism self-check. Peers that draw from
/// [`MathRng`](super::MathRng) for simulation state must agree on `rng_seed`.
#[derive(Resource, Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct MathConfig {
    pub contract_mode: ContractMode,
    pub rng_seed: u64,

    // Determinism self-check
    pub scenario_seed: u64,
    pub scenario_samples: usize,
}

impl Default for MathConfig {
    fn default() -> Self {
        Self {
            contract_mode: ContractMode::default(),
            rng_seed: 0,
            scenario_seed: DEFAULT_SCENARIO_SEED,
            scenario_samples: DEFAULT_SAMPLE_COUNT,
        }
    }
}

impl MathConfig {
    pub fn from_ron(contents: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str::<MathConfig>(contents)
    }

    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Reads `path`, falling back to [`MathConfig::default`] when the file is
    /// missing or malformed.
    pub fn load(path: &str) -> MathConfig {
        match std::fs::read_to_string(path) {
            Ok(contents) => match MathConfig::from_ron(&contents) {
                Ok(config) => {
                    info!("Loaded math config from {}", path);
                    config
                }
                Err(e) => {
                    error!("Failed to parse math config: {}", e);
                    error!("Using default MathConfig");
                    MathConfig::default()
                }
            },
            Err(e) => {
                error!("Failed to read {}: {}", path, e);
                error!("Using default MathConfig");
                MathConfig::default()
            }
        }
    }

    pub fn save(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = MathConfig::from_ron("(rng_seed: 99, contract_mode: Log)").unwrap();
        assert_eq!(config.rng_seed, 99);
        assert_eq!(config.contract_mode, ContractMode::Log);
        assert_eq!(config.scenario_samples, DEFAULT_SAMPLE_COUNT);
        assert_eq!(config.scenario_seed, DEFAULT_SCENARIO_SEED);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        assert!(MathConfig::from_ron("(rng_seed: \"nope\")").is_err());
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let config = MathConfig::load("definitely/not/here/math_config.ron");
        assert_eq!(config, MathConfig::default());
    }

    #[test]
    fn test_pretty_output_parses_back() {
        let config = MathConfig {
            contract_mode: ContractMode::Silent,
            rng_seed: 7,
            scenario_seed: 11,
            scenario_samples: 64,
        };
        let text = config.to_ron().unwrap();
        assert!(text.contains("scenario_samples"));
        assert_eq!(MathConfig::from_ron(&text).unwrap(), config);
    }
}

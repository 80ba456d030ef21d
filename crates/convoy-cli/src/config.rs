use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use convoy_types::ReputationConfig;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "convoy.toml";

/// Parameters of the round-based simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Number of vehicles; ids are "1" through "N".
    #[serde(default = "default_agents")]
    pub agents: usize,

    /// Ids of vehicles that misbehave as providers.
    #[serde(default = "default_malicious")]
    pub malicious: Vec<String>,

    #[serde(default = "default_rounds")]
    pub rounds: usize,

    /// Seed for synthetic trajectories.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Logical seconds between rounds.
    #[serde(default = "default_round_interval")]
    pub round_interval_secs: i64,

    /// Road length used to normalize longitudinal positions.
    #[serde(default = "default_road_length")]
    pub road_length_m: f64,

    /// (positive, negative) events an honest provider earns per interaction.
    #[serde(default = "default_honest_events")]
    pub honest_events: (u32, u32),

    /// (positive, negative) events a malicious provider earns per interaction.
    #[serde(default = "default_malicious_events")]
    pub malicious_events: (u32, u32),
}

fn default_agents() -> usize {
    5
}

fn default_malicious() -> Vec<String> {
    vec!["3".to_string()]
}

fn default_rounds() -> usize {
    20
}

fn default_seed() -> u64 {
    42
}

fn default_round_interval() -> i64 {
    1
}

fn default_road_length() -> f64 {
    352.0
}

fn default_honest_events() -> (u32, u32) {
    (1, 0)
}

fn default_malicious_events() -> (u32, u32) {
    (0, 2)
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            agents: default_agents(),
            malicious: default_malicious(),
            rounds: default_rounds(),
            seed: default_seed(),
            round_interval_secs: default_round_interval(),
            road_length_m: default_road_length(),
            honest_events: default_honest_events(),
            malicious_events: default_malicious_events(),
        }
    }
}

/// Top-level configuration file for the `convoy` binary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub simulation: SimulationSettings,

    #[serde(default)]
    pub reputation: ReputationConfig,
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

impl AppConfig {
    /// Resolve the config path, falling back to [`DEFAULT_CONFIG_FILE`].
    pub fn resolve_path(path: Option<&Path>) -> PathBuf {
        path.map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load config from disk. Returns default if not found. `.json` files are parsed as
    /// JSON, everything else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = if is_json(path) {
            serde_json::from_str(&content).context("Failed to parse JSON config file")?
        } else {
            toml::from_str(&content).context("Failed to parse config file")?
        };
        config
            .reputation
            .validate()
            .context("Invalid reputation parameters")?;
        Ok(config)
    }

    /// Save config to disk.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = if is_json(path) {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        } else {
            toml::to_string_pretty(self).context("Failed to serialize config")?
        };
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }
}

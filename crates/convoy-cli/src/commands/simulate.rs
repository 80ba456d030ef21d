use anyhow::Result;
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::report;
use crate::simulation;

/// Command-line overrides applied on top of the config file.
#[derive(Debug, Default)]
pub struct SimulateArgs {
    pub config: Option<PathBuf>,
    pub agents: Option<usize>,
    pub malicious: Option<Vec<String>>,
    pub rounds: Option<usize>,
    pub seed: Option<u64>,
    pub json: bool,
}

impl SimulateArgs {
    fn apply(self, config: &mut AppConfig) {
        let sim = &mut config.simulation;
        if let Some(agents) = self.agents {
            sim.agents = agents;
        }
        if let Some(malicious) = self.malicious {
            sim.malicious = malicious;
        }
        if let Some(rounds) = self.rounds {
            sim.rounds = rounds;
        }
        if let Some(seed) = self.seed {
            sim.seed = seed;
        }
    }
}

/// Load config, run the simulation and print the report.
pub async fn run(args: SimulateArgs) -> Result<()> {
    let path = AppConfig::resolve_path(args.config.as_deref());
    let mut config = AppConfig::load(&path)?;
    let json = args.json;
    args.apply(&mut config);

    let outcome = simulation::run(&config.simulation, config.reputation.clone()).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", report::render(&outcome));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_only_touch_given_fields() {
        let mut config = AppConfig::default();
        SimulateArgs {
            rounds: Some(3),
            malicious: Some(vec!["1".into()]),
            ..SimulateArgs::default()
        }
        .apply(&mut config);

        assert_eq!(config.simulation.rounds, 3);
        assert_eq!(config.simulation.malicious, vec!["1".to_string()]);
        assert_eq!(config.simulation.agents, 5);
        assert_eq!(config.simulation.seed, 42);
    }
}

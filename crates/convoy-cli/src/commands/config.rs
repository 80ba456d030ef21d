use anyhow::Result;
use std::path::Path;

use crate::cli::ConfigAction;
use crate::config::AppConfig;

/// Handle config subcommands.
pub async fn handle(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init { config } => {
            let path = AppConfig::resolve_path(config.as_deref());
            if path.exists() {
                println!("Config already exists at: {}", path.display());
                println!("Use `convoy config show` to view it.");
                return Ok(());
            }

            let config = AppConfig::default();
            config.save(&path)?;
            println!("Created default config at: {}", path.display());
            println!();
            print_config(&config, &path)?;
        }

        ConfigAction::Show { config } => {
            let path = AppConfig::resolve_path(config.as_deref());
            let config = AppConfig::load(&path)?;
            print_config(&config, &path)?;
        }
    }
    Ok(())
}

fn print_config(config: &AppConfig, path: &Path) -> Result<()> {
    println!("# Configuration ({})", path.display());
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_init_writes_defaults_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("convoy.toml");

        handle(ConfigAction::Init {
            config: Some(path.clone()),
        })
        .await
        .unwrap();
        assert_eq!(AppConfig::load(&path).unwrap(), AppConfig::default());

        std::fs::write(&path, "[simulation]\nagents = 9\n").unwrap();
        handle(ConfigAction::Init {
            config: Some(path.clone()),
        })
        .await
        .unwrap();
        assert_eq!(AppConfig::load(&path).unwrap().simulation.agents, 9);
    }
}

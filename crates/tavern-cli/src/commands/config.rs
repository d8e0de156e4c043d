//! Configuration management commands.

use anyhow::Context;
use clap::Args;
use std::path::{Path, PathBuf};
use tavern_core::{paths, TavernConfig};

/// Config command arguments.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(clap::Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key (dot-separated path)
        key: String,
    },

    /// Set a value in the configuration file
    Set {
        /// Configuration key
        key: String,

        /// Value to set
        value: String,
    },

    /// Show configuration file path
    Path,

    /// Validate configuration
    Validate,
}

/// Run the config command.
pub async fn run(args: ConfigArgs, explicit: Option<&Path>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = crate::load_config(explicit)?;
            println!("{}", config.to_json5()?);
        }

        ConfigCommand::Get { key } => {
            let config = crate::load_config(explicit)?;
            let json = serde_json::to_value(&config)?;

            match lookup(&json, &key) {
                Some(v) => println!("{}", serde_json::to_string_pretty(v)?),
                None => anyhow::bail!("Key not found: {}", key),
            }
        }

        ConfigCommand::Set { key, value } => {
            let path = config_path(explicit)?;

            // Edit the file as written, without environment overrides
            let config = if path.exists() {
                TavernConfig::load(&path)
                    .with_context(|| format!("Failed to load {}", path.display()))?
            } else {
                TavernConfig::default()
            };

            let updated = set_value(&config, &key, &value)?;
            updated.validate()?;
            updated
                .save(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;

            println!("Set {} = {}", key, value);
        }

        ConfigCommand::Path => {
            println!("{}", config_path(explicit)?.display());
        }

        ConfigCommand::Validate => {
            let config = crate::load_config(explicit)?;
            config.validate()?;
            println!("Configuration is valid");
        }
    }

    Ok(())
}

fn config_path(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(paths::config_file()?),
    }
}

/// Walk a dot-separated key path.
fn lookup<'a>(json: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
    key.split('.').try_fold(json, |acc, k| acc.get(k))
}

/// Return a copy of `config` with `key` set to `value`.
///
/// The value is parsed as JSON first (numbers, booleans), falling back to a
/// plain string. Unknown keys are rejected.
fn set_value(config: &TavernConfig, key: &str, value: &str) -> anyhow::Result<TavernConfig> {
    let mut json = serde_json::to_value(config)?;

    let parts: Vec<&str> = key.split('.').collect();
    let (leaf, parents) = parts
        .split_last()
        .ok_or_else(|| anyhow::anyhow!("Empty configuration key"))?;

    let mut current = &mut json;
    for part in parents {
        current = current
            .get_mut(*part)
            .filter(|v| v.is_object())
            .ok_or_else(|| anyhow::anyhow!("Key not found: {}", key))?;
    }

    let section = current
        .as_object_mut()
        .ok_or_else(|| anyhow::anyhow!("Key not found: {}", key))?;
    if !section.contains_key(*leaf) && !is_optional_key(key) {
        anyhow::bail!("Key not found: {}", key);
    }

    let parsed: serde_json::Value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    section.insert(leaf.to_string(), parsed);

    serde_json::from_value(json).map_err(|e| anyhow::anyhow!("Invalid configuration after set: {}", e))
}

/// Keys that are omitted from the serialized config when unset.
fn is_optional_key(key: &str) -> bool {
    key == "npc.context"
}

#[cfg(test)]
mod tests {
    use super::*;
    use tavern_core::DimensionPolicy;
    use tempfile::TempDir;

    #[test]
    fn test_dot_path_get() {
        let json = serde_json::to_value(TavernConfig::default()).unwrap();

        assert_eq!(lookup(&json, "rag.top_k").unwrap().as_u64(), Some(6));
        assert_eq!(
            lookup(&json, "ollama.base_url").unwrap().as_str(),
            Some("http://localhost:11434")
        );
        assert!(lookup(&json, "rag.nope").is_none());
    }

    #[test]
    fn test_set_number_and_string() {
        let config = TavernConfig::default();

        let updated = set_value(&config, "rag.top_k", "3").unwrap();
        assert_eq!(updated.rag.top_k, 3);

        let updated = set_value(&updated, "npc.name", "Greta").unwrap();
        assert_eq!(updated.npc.name, "Greta");
        assert_eq!(updated.rag.top_k, 3);
    }

    #[test]
    fn test_set_enum_and_optional() {
        let config = TavernConfig::default();

        let updated = set_value(&config, "rag.dimension_policy", "reject").unwrap();
        assert_eq!(updated.rag.dimension_policy, DimensionPolicy::Reject);

        let updated = set_value(&updated, "npc.context", "Harvest festival").unwrap();
        assert_eq!(updated.npc.context.as_deref(), Some("Harvest festival"));
    }

    #[test]
    fn test_set_rejects_bad_keys_and_values() {
        let config = TavernConfig::default();
        assert!(set_value(&config, "gateway.port", "9090").is_err());
        assert!(set_value(&config, "npc.favourite_drink", "mead").is_err());
        assert!(set_value(&config, "rag.top_k", "many").is_err());
    }

    #[tokio::test]
    async fn test_set_writes_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tavern.json5");

        let args = ConfigArgs {
            command: ConfigCommand::Set {
                key: "ollama.completion_model".into(),
                value: "mistral".into(),
            },
        };
        run(args, Some(path.as_path())).await.unwrap();

        let saved = TavernConfig::load(&path).unwrap();
        assert_eq!(saved.ollama.completion_model, "mistral");
    }

    #[test]
    fn test_config_path_prefers_explicit() {
        let explicit = PathBuf::from("/tmp/custom.json5");
        assert_eq!(config_path(Some(explicit.as_path())).unwrap(), explicit);
        assert!(config_path(None).unwrap().ends_with("tavern.json5"));
    }
}

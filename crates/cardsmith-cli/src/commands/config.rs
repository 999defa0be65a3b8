//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use cardsmith_generator::GeneratorConfig;
use std::path::Path;

/// Execute the config command.
pub fn execute_config(args: ConfigArgs, config: &Config, config_path: &Path, formatter: &Formatter) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            println!("# {}", config_path.display());
            println!("{}", config.to_toml()?);
        }
        ConfigAction::Init { force, preset } => {
            let generator = GeneratorConfig::preset(&preset).ok_or_else(|| {
                CliError::InvalidInput(format!(
                    "Unknown preset '{}' (expected default, compact or thorough)",
                    preset
                ))
            })?;
            if config_path.exists() && !force {
                return Err(CliError::NotPermitted(format!(
                    "{} already exists (use --force to overwrite)",
                    config_path.display()
                )));
            }

            let config = Config {
                generator,
                ..Config::default()
            };
            config.save_to(config_path)?;
            println!(
                "{}",
                formatter.success(&format!(
                    "Wrote {} configuration to {}",
                    preset.to_ascii_lowercase(),
                    config_path.display()
                ))
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let formatter = Formatter::new(OutputFormat::Table, false);
        let config = Config::default();

        let init = |force| ConfigArgs {
            action: ConfigAction::Init {
                force,
                preset: "default".to_string(),
            },
        };

        execute_config(init(false), &config, &path, &formatter).unwrap();
        assert!(path.exists());

        let again = execute_config(init(false), &config, &path, &formatter);
        assert!(matches!(again, Err(CliError::NotPermitted(_))));

        execute_config(init(true), &config, &path, &formatter).unwrap();
    }

    #[test]
    fn test_init_with_preset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let formatter = Formatter::new(OutputFormat::Table, false);

        let args = ConfigArgs {
            action: ConfigAction::Init {
                force: false,
                preset: "thorough".to_string(),
            },
        };
        execute_config(args, &Config::default(), &path, &formatter).unwrap();

        let written = Config::load_from(&path).unwrap();
        assert_eq!(written.generator, GeneratorConfig::thorough());
    }

    #[test]
    fn test_init_unknown_preset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let formatter = Formatter::new(OutputFormat::Table, false);

        let args = ConfigArgs {
            action: ConfigAction::Init {
                force: false,
                preset: "huge".to_string(),
            },
        };
        let result = execute_config(args, &Config::default(), &path, &formatter);
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
        assert!(!path.exists());
    }
}

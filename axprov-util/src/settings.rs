use std::fmt::Debug;
use std::path::PathBuf;

pub use config::{Config, ConfigError, FileFormat};
use home::home_dir;

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("Failed to load config: {0}")]
    Config(#[from] ConfigError),
    #[error("Error while retrieving configured value for '{field}'")]
    ReadField { field: &'static str, #[source] source: Box<ConfigError> },
    #[error("Failed to parse field '{field}' with value '{value}'")]
    ParseValue { field: &'static str, value: String, #[source] source: Box<dyn std::error::Error + Send + Sync> },
}

#[derive(Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub redacted_config: Config,
    pub config_files_used: Vec<PathBuf>,
    pub config_files_declared: Vec<PathBuf>,
}

impl Debug for LoadedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedConfig")
            .field("config", &self.redacted_config)
            .field("config_files_used", &self.config_files_used)
            .field("config_files_declared", &self.config_files_declared)
            .finish()
    }
}

/// Load configuration from files and environment variables.
///
/// This includes in following order:
/// * A default configuration, provided as a string
/// * A file pointed to by the optional environment variable `AXPROV_{NAME}_CUSTOM_CONFIG_PATH`
/// * A system configuration, read from `/etc/axprov/{name}.toml`
/// * A user configuration, read from `[XDG_CONFIG_HOME|~/.config]/axprov/{name}/config.toml`
/// * Environment variables prefixed with `AXPROV_{NAME}_`
/// * The `overrides` passed as parameter.
///
pub fn load_config(name: &str, defaults: &str, defaults_format: FileFormat, overrides: Config, secret_redacted_overrides: Config) -> Result<LoadedConfig, LoadError> {

    let system_config = format!("/etc/axprov/{name}.toml");
    let user_config = format!("axprov/{name}/config.toml");

    let builder = Config::builder()
        .add_source(config::File::from_str(defaults, defaults_format));

    let mut config_files = Vec::new();

    let name_upper_case = name.to_uppercase();
    let custom_config_path_env_key = format!("AXPROV_{name_upper_case}_CUSTOM_CONFIG_PATH");
    if let Ok(config_path) = std::env::var(custom_config_path_env_key) {
        config_files.push(Some(PathBuf::from(config_path)));
    }

    config_files.push(Some(PathBuf::from(system_config)));

    match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg_config_home) => {
            config_files.push(Some(PathBuf::from(xdg_config_home).join(user_config)));
        }
        Err(_) => {
            config_files.push(home_dir().map(|path| path.join(".config").join(user_config)));
        }
    }

    let (sources_used, sources_declared): (Vec<PathBuf>, Vec<PathBuf>) = config_files.into_iter()
        .fold((Vec::new(), Vec::new()), |(mut used, mut declared), path| {
            if let Some(path) = path {
                declared.push(Clone::clone(&path));
                if path.exists() && path.is_file() {
                    used.push(path);
                }
            }
            (used, declared)
        });

    let builder = sources_used.iter()
        .cloned()
        .fold(builder, |builder, path| {
            builder.add_source(config::File::from(path).required(false))
        });

    let builder = builder.add_source(
        config::Environment::with_prefix(&format!("AXPROV_{name_upper_case}"))
            .separator("_")
            .try_parsing(true)
    );

    let settings = builder.add_source(overrides);
    let secret_redacted_settings = settings.clone()
        .add_source(secret_redacted_overrides);

    Ok(LoadedConfig {
        config: settings.build()?,
        redacted_config: secret_redacted_settings.build()?,
        config_files_used: sources_used,
        config_files_declared: sources_declared,
    })
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[test]
    fn should_layer_overrides_on_top_of_defaults() -> anyhow::Result<()> {
        let defaults = r#"
            [callmanager]
            port = 8443
        "#;
        let overrides = Config::builder()
            .set_override("callmanager.port", 9443)?
            .build()?;

        let loaded = load_config("test", defaults, FileFormat::Toml, overrides, Config::default())?;

        assert_that!(loaded.config.get_int("callmanager.port")?, eq(9443));
        Ok(())
    }

    #[test]
    fn redacted_config_should_mask_secrets() -> anyhow::Result<()> {
        let defaults = r#"
            [callmanager]
            password = "Cisco1234!"
        "#;
        let redaction = Config::builder()
            .set_override("callmanager.password", "redacted")?
            .build()?;

        let loaded = load_config("test", defaults, FileFormat::Toml, Config::default(), redaction)?;

        assert_that!(loaded.config.get_string("callmanager.password")?, eq("Cisco1234!"));
        assert_that!(loaded.redacted_config.get_string("callmanager.password")?, eq("redacted"));
        Ok(())
    }
}

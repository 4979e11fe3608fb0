use std::borrow::Cow;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Directory containing configuration files relative to the application root.
const CONFIGURATION_DIR: &str = "configuration";

/// Environment variable selecting which overlay file is layered on the base.
const APP_ENVIRONMENT_ENV_NAME: &str = "APP_ENVIRONMENT";

/// Overlay file stems accepted through `APP_ENVIRONMENT`.
const KNOWN_ENVIRONMENTS: &[&str] = &["dev", "prod"];

/// Overlay used when `APP_ENVIRONMENT` is not set.
const DEFAULT_ENVIRONMENT: &str = "dev";

/// Supported extensions for base and environment configuration files.
const CONFIG_FILE_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Prefix for environment variable configuration overrides.
const ENV_PREFIX: &str = "APP";

/// Separator between environment variable prefix and key segments.
const ENV_PREFIX_SEPARATOR: &str = "_";

/// Separator for nested configuration keys in environment variables.
const ENV_SEPARATOR: &str = "__";

/// Identifies which configuration file is currently being loaded.
#[derive(Debug, Clone)]
enum ConfigFileKind {
    /// Always-present base configuration.
    Base,
    /// Environment-specific overrides layered on top of the base file.
    Environment(String),
}

impl ConfigFileKind {
    fn stem(&self) -> Cow<'_, str> {
        match self {
            ConfigFileKind::Base => Cow::Borrowed("base"),
            ConfigFileKind::Environment(stem) => Cow::Borrowed(stem),
        }
    }
}

impl fmt::Display for ConfigFileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFileKind::Base => f.write_str("base configuration"),
            ConfigFileKind::Environment(stem) => write!(f, "{stem} environment configuration"),
        }
    }
}

/// Validates an `APP_ENVIRONMENT` value and returns the overlay file stem.
fn parse_environment(value: &str) -> Result<String, LoadConfigError> {
    let stem = value.to_lowercase();

    if KNOWN_ENVIRONMENTS.contains(&stem.as_str()) {
        Ok(stem)
    } else {
        Err(LoadConfigError::UnknownEnvironment {
            name: value.to_string(),
        })
    }
}

/// Resolves the overlay file stem from `APP_ENVIRONMENT`, defaulting to `dev`.
fn environment_stem() -> Result<String, LoadConfigError> {
    match std::env::var(APP_ENVIRONMENT_ENV_NAME) {
        Ok(value) => parse_environment(&value),
        Err(_) => Ok(DEFAULT_ENVIRONMENT.to_string()),
    }
}

/// Errors that can occur while loading configuration files and overrides.
#[derive(Debug, Error)]
pub enum LoadConfigError {
    /// Failed to determine the current working directory.
    #[error("failed to determine the current directory: {0}")]
    CurrentDir(#[source] io::Error),

    /// The `configuration` directory does not exist.
    #[error("configuration directory `{0}` does not exist")]
    MissingConfigurationDirectory(PathBuf),

    /// Could not locate one of the required configuration files.
    #[error("could not locate {kind_description} in `{directory}`; attempted: {attempted}")]
    ConfigurationFileMissing {
        kind_description: String,
        directory: PathBuf,
        attempted: String,
    },

    /// Failed to build the layered configuration.
    #[error("failed to build configuration: {0}")]
    Builder(#[source] config::ConfigError),

    /// The configuration files were parsed but deserialization failed.
    #[error("failed to deserialize configuration: {0}")]
    Deserialization(#[source] config::ConfigError),

    /// `APP_ENVIRONMENT` was set to a value with no matching overlay file.
    #[error("`{name}` is not a supported environment; use one of: dev, prod")]
    UnknownEnvironment { name: String },
}

/// Loads hierarchical configuration from base, environment, and environment-variable sources.
///
/// Loads `configuration/base.(yaml|yml|json)` followed by
/// `configuration/{environment}.(yaml|yml|json)`, then applies overrides from
/// `APP_`-prefixed environment variables. Nested keys use double underscores
/// (e.g. `APP_PG_CONNECTION__HOST`).
pub fn load_config<T>() -> Result<T, LoadConfigError>
where
    T: DeserializeOwned,
{
    let base_path = std::env::current_dir().map_err(LoadConfigError::CurrentDir)?;
    let configuration_directory = base_path.join(CONFIGURATION_DIR);

    if !configuration_directory.is_dir() {
        return Err(LoadConfigError::MissingConfigurationDirectory(
            configuration_directory,
        ));
    }

    let environment = environment_stem()?;

    let base_file = find_configuration_file(&configuration_directory, ConfigFileKind::Base)?;
    let environment_file = find_configuration_file(
        &configuration_directory,
        ConfigFileKind::Environment(environment),
    )?;

    let environment_source = config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_PREFIX_SEPARATOR)
        .separator(ENV_SEPARATOR);

    let settings = config::Config::builder()
        .add_source(config::File::from(base_file))
        .add_source(config::File::from(environment_file))
        .add_source(environment_source)
        .build()
        .map_err(LoadConfigError::Builder)?;

    settings
        .try_deserialize::<T>()
        .map_err(LoadConfigError::Deserialization)
}

/// Finds the configuration file that matches the requested kind and supported extensions.
fn find_configuration_file(
    directory: &Path,
    kind: ConfigFileKind,
) -> Result<PathBuf, LoadConfigError> {
    let stem = kind.stem();
    let mut attempted_paths = Vec::with_capacity(CONFIG_FILE_EXTENSIONS.len());

    for extension in CONFIG_FILE_EXTENSIONS {
        let path = directory.join(format!("{stem}.{extension}"));
        attempted_paths.push(path.clone());

        if path.is_file() {
            return Ok(path);
        }
    }

    let attempted = attempted_paths
        .iter()
        .map(|path| format!("`{}`", path.display()))
        .collect::<Vec<_>>()
        .join(", ");

    Err(LoadConfigError::ConfigurationFileMissing {
        kind_description: kind.to_string(),
        directory: directory.to_path_buf(),
        attempted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_environments_parse_case_insensitively() {
        assert_eq!(parse_environment("dev").unwrap(), "dev");
        assert_eq!(parse_environment("PROD").unwrap(), "prod");
        assert_eq!(parse_environment("Dev").unwrap(), "dev");
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let err = parse_environment("staging").unwrap_err();

        assert!(matches!(
            err,
            LoadConfigError::UnknownEnvironment { ref name } if name == "staging"
        ));
    }
}

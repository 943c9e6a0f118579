//! Configuration loading with layered precedence.
//!
//! This module loads configuration with the precedence order (lowest to
//! highest): application defaults, configuration file, environment variables,
//! command-line arguments.
//!
//! The layers are assembled with `MergeComposer` rather than the derive's
//! `load()` because the `Cli` struct owns subcommand dispatch, and because
//! typed environment variables must fail fast. `OrthoConfig`'s environment
//! layer silently ignores values it cannot parse, so
//! `DOCKERLINK_TLS_VERIFY=maybe` would otherwise fall back to the default.
//!
//! String fields (e.g. `DOCKERLINK_ENGINE_SOCKET`) are always accepted.

use camino::Utf8PathBuf;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use ortho_config::discovery::ConfigDiscovery;
use ortho_config::serde_json::{self, Map, Value};
use ortho_config::{MergeComposer, toml};
use tracing::debug;

use crate::config::{AppConfig, Cli};
use crate::error::{ConfigError, Result};

/// The type of value expected from an environment variable.
#[derive(Clone, Copy)]
enum EnvVarType {
    /// String value (always accepted).
    String,
    /// Boolean value (`true`/`false`). Invalid values return an error.
    Bool,
}

/// Specification for a single environment variable mapping.
struct EnvVarSpec {
    /// The environment variable name (e.g., `DOCKERLINK_ENGINE_SOCKET`).
    env_var: &'static str,
    /// The JSON path segments (e.g., `["tls", "verify"]`).
    path: &'static [&'static str],
    /// The expected value type.
    var_type: EnvVarType,
}

/// Table of all environment variables and their JSON paths.
const ENV_VAR_SPECS: &[EnvVarSpec] = &[
    EnvVarSpec {
        env_var: "DOCKERLINK_ENGINE_SOCKET",
        path: &["engine_socket"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "DOCKERLINK_PROJECT",
        path: &["project"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "DOCKERLINK_HOST_ADDRESS",
        path: &["host_address"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "DOCKERLINK_TLS_VERIFY",
        path: &["tls", "verify"],
        var_type: EnvVarType::Bool,
    },
    EnvVarSpec {
        env_var: "DOCKERLINK_TLS_CERT_PATH",
        path: &["tls", "cert_path"],
        var_type: EnvVarType::String,
    },
];

/// Name of the variable that points at an explicit configuration file.
const CONFIG_PATH_VAR: &str = "DOCKERLINK_CONFIG_PATH";

/// Returns the list of environment variable names recognised by the config
/// loader, including the configuration file path variable.
///
/// Tests use this to clear every `DOCKERLINK_*` variable before loading.
#[must_use]
pub fn env_var_names() -> Vec<&'static str> {
    std::iter::once(CONFIG_PATH_VAR)
        .chain(ENV_VAR_SPECS.iter().map(|spec| spec.env_var))
        .collect()
}

/// Load a configuration file and push it to the composer.
///
/// The parent directory is opened through `cap_std::fs_utf8` and the file is
/// read relative to it.
fn load_config_file(path: &Utf8PathBuf, composer: &mut MergeComposer) -> Result<()> {
    let current_dir = Utf8PathBuf::from(".");
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| current_dir.as_ref());
    let file_name = path.file_name().unwrap_or(path.as_str());

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|e| {
        ConfigError::ParseError {
            message: format!("failed to open directory {parent}: {e}"),
        }
    })?;

    let content = dir
        .read_to_string(file_name)
        .map_err(|e| ConfigError::ParseError {
            message: format!("failed to read {path}: {e}"),
        })?;

    let value =
        toml::from_str::<serde_json::Value>(&content).map_err(|e| ConfigError::ParseError {
            message: format!("failed to parse {path}: {e}"),
        })?;

    debug!(%path, "loaded configuration file");
    composer.push_file(value, Some(path.clone()));
    Ok(())
}

/// Load configuration with full layer precedence from the process
/// environment.
///
/// # Errors
///
/// Returns `ConfigError` if configuration loading fails due to:
/// - Malformed configuration files
/// - Invalid typed environment variable values (e.g., non-boolean for
///   `DOCKERLINK_TLS_VERIFY`)
pub fn load_config(cli: &Cli) -> Result<AppConfig> {
    load_config_with_env(cli, &mockable::DefaultEnv::new())
}

/// Load configuration with full layer precedence using the supplied
/// environment provider.
///
/// Sources, lowest precedence first:
/// 1. Application defaults defined in the struct
/// 2. Configuration file (the `--config` path, `DOCKERLINK_CONFIG_PATH`,
///    `.dockerlink.toml`, then the XDG location)
/// 3. Environment variables prefixed with `DOCKERLINK_`
/// 4. Command-line arguments
///
/// # Errors
///
/// See [`load_config`].
pub fn load_config_with_env<E: mockable::Env>(cli: &Cli, env: &E) -> Result<AppConfig> {
    let mut composer = MergeComposer::new();

    let defaults =
        serde_json::to_value(AppConfig::default()).map_err(|e| ConfigError::ParseError {
            message: format!("failed to serialise defaults: {e}"),
        })?;
    composer.push_defaults(defaults);

    let config_path: Option<Utf8PathBuf> =
        cli.config.clone().filter(|p| p.exists()).or_else(|| {
            let discovery = ConfigDiscovery::builder("dockerlink")
                .env_var(CONFIG_PATH_VAR)
                .config_file_name("config.toml")
                .dotfile_name(".dockerlink.toml")
                .build();
            discovery
                .candidates()
                .into_iter()
                .filter(|p| p.exists())
                .find_map(|p| Utf8PathBuf::try_from(p).ok())
        });

    if let Some(ref path) = config_path {
        load_config_file(path, &mut composer)?;
    }

    let env_values = collect_env_vars(env)?;
    if !env_values.is_null() {
        composer.push_environment(env_values);
    }

    let cli_overrides = build_cli_overrides(cli);
    if !cli_overrides.is_null() {
        composer.push_cli(cli_overrides);
    }

    let mut config =
        AppConfig::merge_from_layers(composer.layers()).map_err(ConfigError::OrthoConfig)?;
    config.clear_blank_fields();

    Ok(config)
}

/// Collect `DOCKERLINK_*` environment variables into a JSON value.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if a typed environment variable has an
/// unparseable value.
fn collect_env_vars<E: mockable::Env>(env: &E) -> Result<Value> {
    let mut root = Map::new();

    for spec in ENV_VAR_SPECS {
        let Some(raw_value) = env.string(spec.env_var) else {
            continue;
        };

        let json_value = match spec.var_type {
            EnvVarType::String => Value::String(raw_value),
            EnvVarType::Bool => match raw_value.parse::<bool>() {
                Ok(b) => Value::Bool(b),
                Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        field: spec.env_var.to_owned(),
                        reason: format!("expected bool (true/false), got '{raw_value}'"),
                    }
                    .into());
                }
            },
        };

        insert_at_path(&mut root, spec.path, json_value);
    }

    if root.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::Object(root))
    }
}

/// Insert a value at a nested path in a JSON map, creating intermediate
/// objects as needed.
fn insert_at_path(root: &mut Map<String, Value>, path: &[&str], value: Value) {
    let Some((&field, parents)) = path.split_last() else {
        return;
    };

    let mut current = root;
    for &segment in parents {
        let entry = current
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(obj) = entry.as_object_mut() else {
            return;
        };
        current = obj;
    }

    current.insert(field.to_owned(), value);
}

/// Build a JSON value containing CLI overrides.
fn build_cli_overrides(cli: &Cli) -> serde_json::Value {
    let overrides: Map<String, Value> = [
        ("engine_socket", cli.engine_socket.as_ref()),
        ("project", cli.project.as_ref()),
        ("host_address", cli.host_address.as_ref()),
    ]
    .into_iter()
    .filter_map(|(key, value)| value.map(|v| (key.to_owned(), Value::String(v.clone()))))
    .collect();

    if overrides.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::Value::Object(overrides)
    }
}

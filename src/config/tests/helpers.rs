//! Shared fixtures and helper functions for config tests.

use std::sync::Arc;

use camino::Utf8PathBuf;
use mockable::MockEnv;
use ortho_config::MergeComposer;
use rstest::fixture;

use crate::config::{AppConfig, Cli, Commands};

/// Fixture providing an `AppConfig` parsed from a full TOML example.
#[fixture]
pub fn app_config_from_full_toml() -> AppConfig {
    let toml = r#"
        engine_socket = "tcp://192.168.99.100:2376"
        project = "myapp"
        host_address = "192.168.99.100"

        [tls]
        verify = true
        cert_path = "/home/user/.docker/certs"
    "#;

    toml::from_str(toml).expect("TOML parsing should succeed")
}

/// Fixture providing an `AppConfig` parsed from a minimal TOML example.
#[fixture]
pub fn app_config_from_partial_toml() -> AppConfig {
    let toml = r#"
        engine_socket = "unix:///tmp/docker.sock"
    "#;

    toml::from_str(toml).expect("TOML parsing should succeed")
}

/// Helper: Creates a `MergeComposer` with defaults layer already pushed.
pub fn create_composer_with_defaults() -> Result<MergeComposer, serde_json::Error> {
    let mut composer = MergeComposer::new();
    let defaults = ortho_config::serde_json::to_value(AppConfig::default())?;
    composer.push_defaults(defaults);
    Ok(composer)
}

/// Helper: Merges layers from a composer into `AppConfig`.
pub fn merge_config(composer: MergeComposer) -> Result<AppConfig, Arc<ortho_config::OrthoError>> {
    AppConfig::merge_from_layers(composer.layers())
}

/// Helper: Asserts that a config has all default values.
pub fn assert_config_has_defaults(config: &AppConfig) {
    assert!(
        config.engine_socket.is_none(),
        "engine_socket should be None"
    );
    assert!(config.project.is_none(), "project should be None");
    assert!(config.host_address.is_none(), "host_address should be None");
    assert!(!config.tls.verify, "tls.verify should be false");
    assert!(config.tls.cert_path.is_none(), "tls.cert_path should be None");
}

/// Helper: Creates a `MergeComposer` with defaults, file, and env layers for
/// testing layer precedence.
pub fn create_composer_with_file_and_env() -> Result<MergeComposer, serde_json::Error> {
    use ortho_config::serde_json::json;

    let mut composer = create_composer_with_defaults()?;

    composer.push_file(
        json!({
            "engine_socket": "unix:///from/file.sock",
            "project": "fileproject"
        }),
        None,
    );

    composer.push_environment(json!({
        "engine_socket": "unix:///from/env.sock"
    }));

    Ok(composer)
}

/// Helper: Builds a `MockEnv` that answers from the given pairs.
pub fn env_with_vars(vars: &[(&str, &str)]) -> MockEnv {
    let owned: Vec<(String, String)> = vars
        .iter()
        .map(|(k, v)| (String::from(*k), String::from(*v)))
        .collect();
    let mut env = MockEnv::new();
    env.expect_string().returning(move |key| {
        owned
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.clone())
    });
    env
}

/// Helper: A CLI invocation pointing at a configuration file that does not
/// exist, so discovery never reads the developer's own files.
pub fn cli_without_sources() -> Cli {
    Cli {
        command: Commands::Services,
        config: Some(Utf8PathBuf::from("/nonexistent/dockerlink/config.toml")),
        engine_socket: None,
        project: None,
        host_address: None,
    }
}

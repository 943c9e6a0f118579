//! Configuration data types for dockerlink.

use camino::Utf8PathBuf;
use ortho_config::{OrthoConfig, OrthoResult, PostMergeContext, PostMergeHook};
use serde::{Deserialize, Serialize};

/// TLS configuration for remote engine endpoints.
///
/// When `verify` is false the `DOCKER_TLS_VERIFY` environment variable can
/// still enable TLS, mirroring the behaviour of the Docker CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Require a TLS connection with client certificates.
    pub verify: bool,

    /// Directory containing `key.pem`, `cert.pem` and `ca.pem`.
    pub cert_path: Option<Utf8PathBuf>,
}

/// Root application configuration.
///
/// This structure is loaded from configuration files, environment variables,
/// and command-line arguments with layered precedence. The precedence order
/// (lowest to highest) is: defaults, configuration file, environment variables,
/// command-line arguments.
///
/// Configuration files are discovered in this order:
/// 1. Path specified via `DOCKERLINK_CONFIG_PATH` environment variable
/// 2. `.dockerlink.toml` in the current working directory
/// 3. `.dockerlink.toml` in the home directory
/// 4. `~/.config/dockerlink/config.toml` (XDG default)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(
    prefix = "DOCKERLINK",
    post_merge_hook,
    discovery(
        app_name = "dockerlink",
        env_var = "DOCKERLINK_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".dockerlink.toml",
        config_cli_long = "config",
        config_cli_visible = true,
    )
)]
pub struct AppConfig {
    /// The container engine socket path or URL.
    pub engine_socket: Option<String>,

    /// Compose project to discover, replacing the name derived from the
    /// working directory.
    pub project: Option<String>,

    /// Address under which published ports are reachable, replacing the
    /// address derived from the engine endpoint.
    pub host_address: Option<String>,

    /// TLS configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub tls: TlsConfig,
}

impl AppConfig {
    /// Treat blank strings from files or the environment as unset.
    pub fn clear_blank_fields(&mut self) {
        for field in [
            &mut self.engine_socket,
            &mut self.project,
            &mut self.host_address,
        ] {
            if field.as_deref().is_some_and(|value| value.trim().is_empty()) {
                *field = None;
            }
        }
    }
}

impl PostMergeHook for AppConfig {
    fn post_merge(&mut self, _ctx: &PostMergeContext) -> OrthoResult<()> {
        self.clear_blank_fields();
        Ok(())
    }
}

//! Library entry points behind the `dockerlink` commands.
//!
//! These functions hold the logic of the `env` and `services` commands so
//! that the binary only parses arguments and prints. They accept
//! library-owned types (not clap types) and never write to stdout or
//! stderr.


use crate::config::AppConfig;
use crate::discovery::{Discovery, ServiceDirectory};
use crate::environment::{EnvSnapshot, MemoryEnv};
use crate::error::Result as DockerlinkResult;
use crate::injector::{Injector, ServiceProjector};

/// Connect, discover the current project's services, and close the session.
///
/// # Errors
///
/// Returns configuration, connection and listing errors.
pub fn discover_services(config: &AppConfig) -> DockerlinkResult<ServiceDirectory> {
    let mut discovery = Discovery::connect(config)?;
    let directory = discovery.discover()?.clone();
    discovery.close();
    Ok(directory)
}

/// Project `directory` into an in-memory environment without touching the
/// process environment.
#[must_use]
pub fn link_environment<P: ServiceProjector>(
    directory: &ServiceDirectory,
    projector: &P,
) -> MemoryEnv {
    let mut env = MemoryEnv::new();
    let mut snapshot = EnvSnapshot::new(&mut env);
    Injector::with_projector(directory, projector).install(&mut snapshot);
    snapshot.commit();
    env
}

/// Render variables as `NAME=value` lines, prefixed with `export ` when
/// `export` is set, in name order.
///
/// Values containing anything other than characters a POSIX shell reads
/// literally are single-quoted, so the output is safe to `eval` or source.
#[must_use]
pub fn render_env(env: &MemoryEnv, export: bool) -> Vec<String> {
    let prefix = if export { "export " } else { "" };
    env.vars()
        .iter()
        .map(|(name, value)| format!("{prefix}{name}={}", shell_quote(value)))
        .collect()
}

fn shell_quote(value: &str) -> String {
    let literal = !value.is_empty()
        && value.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || matches!(c, '_' | '-' | '.' | ':' | '/' | '@' | '%' | '+' | ',')
        });
    if literal {
        String::from(value)
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}

/// Render one line per directory entry:
/// `service:private_port protocol ip_address:public_port`.
#[must_use]
pub fn render_services(directory: &ServiceDirectory) -> Vec<String> {
    directory
        .iter()
        .map(|(key, port)| {
            format!(
                "{key} {} {}:{}",
                port.protocol, port.ip_address, port.public_port
            )
        })
        .collect()
}

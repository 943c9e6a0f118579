//! TLS settings for remote engine endpoints.
//!
//! The ambient variables follow the Docker client convention. TLS is enabled
//! when `DOCKER_CERT_PATH` is non-empty or `DOCKER_TLS_VERIFY` holds any
//! non-empty value (`0` included), and in configuration when `tls.verify` is
//! set or `tls.cert_path` is given. The certificate directory comes from
//! `tls.cert_path`, then `DOCKER_CERT_PATH`, then `~/.docker`, and must
//! contain `key.pem`, `cert.pem` and `ca.pem`.
//!
//! The server certificate is always checked against `ca.pem`: the engine
//! client offers no unverified TLS mode.

use camino::{Utf8Path, Utf8PathBuf};

use super::SocketResolver;
use crate::config::TlsConfig;
use crate::error::{ConfigError, DockerlinkError, FilesystemError};

const TLS_VERIFY_VAR: &str = "DOCKER_TLS_VERIFY";
const CERT_PATH_VAR: &str = "DOCKER_CERT_PATH";
const HOME_VARS: &[&str] = &["HOME", "USERPROFILE"];
const DEFAULT_CERT_DIR: &str = ".docker";

const KEY_FILE: &str = "key.pem";
const CERT_FILE: &str = "cert.pem";
const CA_FILE: &str = "ca.pem";

/// Client certificate material for a TLS-secured engine connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsSettings {
    cert_dir: Utf8PathBuf,
}

impl TlsSettings {
    /// Create settings for a certificate directory without validating it.
    #[must_use]
    pub fn new(cert_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            cert_dir: cert_dir.into(),
        }
    }

    /// Resolve TLS settings from configuration and the ambient environment.
    ///
    /// Returns `Ok(None)` when TLS is not requested.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` when TLS is requested without a
    /// certificate directory and no home directory is known, and `FilesystemError::NotFound` when one of the
    /// PEM files is missing.
    pub fn resolve<E: mockable::Env>(
        config: &TlsConfig,
        resolver: &SocketResolver<'_, E>,
    ) -> Result<Option<Self>, DockerlinkError> {
        let env_verify = resolver.non_empty(TLS_VERIFY_VAR).is_some();
        let configured_dir = config
            .cert_path
            .clone()
            .or_else(|| resolver.non_empty(CERT_PATH_VAR).map(Utf8PathBuf::from));
        if !config.verify && !env_verify && configured_dir.is_none() {
            return Ok(None);
        }

        let cert_dir = configured_dir
            .or_else(|| {
                HOME_VARS
                    .iter()
                    .find_map(|var| resolver.non_empty(var))
                    .map(|home| Utf8PathBuf::from(home).join(DEFAULT_CERT_DIR))
            })
            .ok_or_else(|| ConfigError::MissingRequired {
                field: String::from("tls.cert_path"),
            })?;

        let settings = Self { cert_dir };
        settings.ensure_files_exist()?;
        Ok(Some(settings))
    }

    /// Directory holding the PEM files.
    #[must_use]
    pub fn cert_dir(&self) -> &Utf8Path {
        &self.cert_dir
    }

    /// Path of the client private key.
    #[must_use]
    pub fn key_path(&self) -> Utf8PathBuf {
        self.cert_dir.join(KEY_FILE)
    }

    /// Path of the client certificate.
    #[must_use]
    pub fn cert_path(&self) -> Utf8PathBuf {
        self.cert_dir.join(CERT_FILE)
    }

    /// Path of the certificate authority bundle.
    #[must_use]
    pub fn ca_path(&self) -> Utf8PathBuf {
        self.cert_dir.join(CA_FILE)
    }

    fn ensure_files_exist(&self) -> Result<(), FilesystemError> {
        [self.key_path(), self.cert_path(), self.ca_path()]
            .into_iter()
            .find(|path| !path.exists())
            .map_or(Ok(()), |missing| {
                Err(FilesystemError::NotFound {
                    path: missing.into_std_path_buf(),
                })
            })
    }
}

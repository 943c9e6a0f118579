//! Compose project identification.

use std::fmt;

use camino::Utf8Path;

use crate::error::{DockerlinkError, FilesystemError};

/// Name of the compose project whose containers are discovered.
///
/// `docker-compose` names a project after the directory it was started in,
/// keeping only alphanumeric characters, so tests run from the same
/// directory find the same project.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName(String);

impl ProjectName {
    /// Derive the project name from a directory's base name.
    #[must_use]
    pub fn from_dir_name(dir_name: &str) -> Self {
        Self(
            dir_name
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .collect(),
        )
    }

    /// Derive the project name from a directory path.
    #[must_use]
    pub fn from_dir(dir: &Utf8Path) -> Self {
        Self::from_dir_name(dir.file_name().unwrap_or_default())
    }

    /// Derive the project name from the current working directory.
    ///
    /// # Errors
    ///
    /// Returns `FilesystemError::CurrentDirUnavailable` when the working
    /// directory cannot be read or is not valid UTF-8.
    pub fn from_current_dir() -> Result<Self, DockerlinkError> {
        let cwd = std::env::current_dir().map_err(|e| FilesystemError::CurrentDirUnavailable {
            message: e.to_string(),
        })?;
        let utf8 = camino::Utf8PathBuf::from_path_buf(cwd).map_err(|path| {
            FilesystemError::CurrentDirUnavailable {
                message: format!("path is not valid UTF-8: {}", path.display()),
            }
        })?;
        Ok(Self::from_dir(&utf8))
    }

    /// Use a configured project name verbatim.
    #[must_use]
    pub fn verbatim(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Resolve the project from an optional override, falling back to the
    /// current working directory.
    ///
    /// # Errors
    ///
    /// See [`Self::from_current_dir`].
    pub fn resolve(configured: Option<&str>) -> Result<Self, DockerlinkError> {
        configured
            .filter(|name| !name.trim().is_empty())
            .map_or_else(Self::from_current_dir, |name| Ok(Self::verbatim(name)))
    }

    /// The project name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

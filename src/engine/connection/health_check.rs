//! Health check and connect-and-verify functionality.
//!
//! A Bollard client is created lazily and does not touch the engine, so a
//! ping is the first point at which an unreachable or misconfigured engine
//! surfaces. Discovery treats any failure here as fatal.

use std::time::Duration;

use bollard::Docker;

use super::{EngineConnector, EngineEndpoint, HEALTH_CHECK_TIMEOUT_SECS};
use crate::error::{ContainerError, DockerlinkError};

impl EngineConnector {
    /// Verify the container engine is responsive (async version).
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::HealthCheckFailed` if the engine does not
    /// respond correctly.
    ///
    /// Returns `ContainerError::HealthCheckTimeout` if the check times out.
    pub async fn health_check_async(docker: &Docker) -> Result<(), DockerlinkError> {
        let timeout = Duration::from_secs(HEALTH_CHECK_TIMEOUT_SECS);

        tokio::time::timeout(timeout, docker.ping())
            .await
            .map_err(|_| {
                DockerlinkError::from(ContainerError::HealthCheckTimeout {
                    seconds: HEALTH_CHECK_TIMEOUT_SECS,
                })
            })?
            .map_err(|e| {
                DockerlinkError::from(ContainerError::HealthCheckFailed {
                    message: e.to_string(),
                })
            })?;
        Ok(())
    }

    /// Create a tokio runtime for synchronous operations.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::RuntimeCreationFailed` if the runtime cannot
    /// be built.
    pub fn create_runtime() -> Result<tokio::runtime::Runtime, DockerlinkError> {
        tokio::runtime::Runtime::new().map_err(|e| {
            DockerlinkError::from(ContainerError::RuntimeCreationFailed {
                message: e.to_string(),
            })
        })
    }

    /// Connect to a resolved endpoint and verify the engine responds.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::ConnectionFailed` if the connection fails,
    /// `ContainerError::HealthCheckFailed` if the ping fails, or
    /// `ContainerError::HealthCheckTimeout` if the ping times out.
    pub async fn connect_and_verify_async(
        endpoint: &EngineEndpoint,
    ) -> Result<Docker, DockerlinkError> {
        let docker = Self::connect_endpoint(endpoint)?;
        Self::health_check_async(&docker).await?;
        Ok(docker)
    }
}

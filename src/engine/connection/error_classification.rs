//! Classification of engine connection failures.
//!
//! Bollard reports socket problems as generic errors. Walking the source
//! chain for an `io::Error` lets callers distinguish a missing socket from a
//! permissions problem.

use std::io::ErrorKind;
use std::path::Path;

use crate::error::ContainerError;

/// Strip a `unix://` or `npipe://` scheme to get the socket's filesystem
/// path. Network endpoints have no path.
pub(super) fn extract_socket_path(socket_uri: &str) -> Option<&Path> {
    socket_uri
        .strip_prefix("unix://")
        .or_else(|| socket_uri.strip_prefix("npipe://"))
        .map(Path::new)
}

/// Map a `Bollard` connection error onto a semantic `ContainerError`.
pub(super) fn classify_connection_error(
    error: &bollard::errors::Error,
    socket_uri: &str,
) -> ContainerError {
    let kind = match error {
        bollard::errors::Error::SocketNotFoundError(_) => Some(ErrorKind::NotFound),
        bollard::errors::Error::IOError { err } => {
            Some(io_error_kind_in_chain(err).unwrap_or_else(|| err.kind()))
        }
        _ => io_error_kind_in_chain(error),
    };

    match (kind, extract_socket_path(socket_uri)) {
        (Some(ErrorKind::NotFound), Some(path)) => ContainerError::SocketNotFound {
            path: path.to_path_buf(),
        },
        (Some(ErrorKind::PermissionDenied), Some(path)) => ContainerError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => ContainerError::ConnectionFailed {
            message: error.to_string(),
        },
    }
}

fn io_error_kind_in_chain(error: &dyn std::error::Error) -> Option<ErrorKind> {
    let mut current = error.source();
    while let Some(source) = current {
        if let Some(io_error) = source.downcast_ref::<std::io::Error>() {
            return Some(io_error.kind());
        }
        current = source.source();
    }
    None
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::unix("unix:///var/run/docker.sock", Some("/var/run/docker.sock"))]
    #[case::pipe("npipe:////./pipe/docker_engine", Some("//./pipe/docker_engine"))]
    #[case::tcp("tcp://host:2375", None)]
    fn extract_socket_path_strips_scheme(#[case] uri: &str, #[case] expected: Option<&str>) {
        assert_eq!(extract_socket_path(uri), expected.map(Path::new));
    }

    #[rstest]
    fn missing_socket_is_classified_with_path() {
        let error =
            bollard::errors::Error::SocketNotFoundError(String::from("/var/run/docker.sock"));
        let classified = classify_connection_error(&error, "unix:///var/run/docker.sock");
        assert!(matches!(
            classified,
            ContainerError::SocketNotFound { path } if path == PathBuf::from("/var/run/docker.sock")
        ));
    }

    #[rstest]
    fn permission_denied_io_error_is_classified() {
        let error = bollard::errors::Error::IOError {
            err: std::io::Error::new(ErrorKind::PermissionDenied, "denied"),
        };
        let classified = classify_connection_error(&error, "unix:///var/run/docker.sock");
        assert!(matches!(classified, ContainerError::PermissionDenied { .. }));
    }

    #[rstest]
    fn network_errors_fall_back_to_connection_failed() {
        let error = bollard::errors::Error::IOError {
            err: std::io::Error::new(ErrorKind::PermissionDenied, "denied"),
        };
        let classified = classify_connection_error(&error, "http://host:2375");
        assert!(matches!(classified, ContainerError::ConnectionFailed { .. }));
    }
}

//! Unit tests for client creation across endpoint schemes.
//!
//! Bollard creates HTTP and socket clients without contacting the engine, so
//! these tests succeed without a daemon. If Bollard starts validating
//! endpoints eagerly, the socket cases here will need a running engine.

use rstest::rstest;

use super::super::{EngineConnector, EngineEndpoint};

#[rstest]
#[case::tcp_with_hostname("tcp://host:2375")]
#[case::tcp_with_ip("tcp://192.168.1.100:2376")]
#[case::http_endpoint("http://remotehost:2375")]
#[case::https_endpoint("https://remotehost:2376")]
fn connect_http_compatible_endpoints_creates_client(#[case] endpoint: &str) {
    let result = EngineConnector::connect(endpoint);
    assert!(result.is_ok(), "connect {endpoint} should create client");
}

#[rstest]
fn connect_endpoint_without_tls_uses_plain_connection() {
    let endpoint = EngineEndpoint::new("tcp://localhost:2375", None);
    let result = EngineConnector::connect_endpoint(&endpoint);
    assert!(result.is_ok(), "plain tcp endpoint should create client");
}

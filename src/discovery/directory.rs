//! The service directory built by a discovery pass.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

/// Transport protocol of a published port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Protocol {
    /// Transmission Control Protocol.
    Tcp,
    /// User Datagram Protocol.
    Udp,
}

impl Protocol {
    /// Lowercase name, as used in URL schemes and `_PROTO` values.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
        }
    }

    /// Uppercase name, as used in variable names.
    #[must_use]
    pub const fn upper(self) -> &'static str {
        match self {
            Self::Tcp => "TCP",
            Self::Udp => "UDP",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an engine reports a protocol other than TCP or UDP.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported protocol: {0}")]
pub struct UnsupportedProtocol(pub String);

impl FromStr for Protocol {
    type Err = UnsupportedProtocol;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("tcp") {
            Ok(Self::Tcp)
        } else if value.eq_ignore_ascii_case("udp") {
            Ok(Self::Udp)
        } else {
            Err(UnsupportedProtocol(String::from(value)))
        }
    }
}

/// Identity of a directory entry: the compose service and its private port.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServiceKey {
    /// Compose service name, as found in the service label.
    pub service: String,
    /// Port the service listens on inside its container.
    pub private_port: u16,
}

impl ServiceKey {
    /// Create a key.
    #[must_use]
    pub fn new(service: impl Into<String>, private_port: u16) -> Self {
        Self {
            service: service.into(),
            private_port,
        }
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.service, self.private_port)
    }
}

/// Where a discovered service port can be reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicePort {
    /// Transport protocol.
    pub protocol: Protocol,
    /// Address of the engine host publishing the port.
    pub ip_address: String,
    /// Host port routed to the service.
    pub public_port: u16,
    /// Port the service listens on inside its container.
    pub private_port: u16,
}

/// Published service ports of one compose project, ordered by service name
/// and then private port.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDirectory {
    entries: BTreeMap<ServiceKey, ServicePort>,
}

impl ServiceDirectory {
    /// Create an empty directory.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert an entry. A later entry for the same key replaces the earlier
    /// one, which happens when several containers run the same service.
    ///
    /// Engines report a port bound on both IPv4 and IPv6 twice; the second,
    /// identical report leaves the directory unchanged and is not logged as
    /// a replacement.
    pub fn insert(&mut self, key: ServiceKey, port: ServicePort) {
        match self.entries.get(&key) {
            Some(existing) if *existing == port => {}
            Some(previous) => {
                debug!(%key, ?previous, ?port, "replaced service port with a different mapping");
                self.entries.insert(key, port);
            }
            None => {
                debug!(%key, ?port, "added service port");
                self.entries.insert(key, port);
            }
        }
    }

    /// Look up a service port.
    #[must_use]
    pub fn get(&self, service: &str, private_port: u16) -> Option<&ServicePort> {
        self.entries.get(&ServiceKey::new(service, private_port))
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, ServiceKey, ServicePort> {
        self.entries.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether discovery found nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a ServiceDirectory {
    type Item = (&'a ServiceKey, &'a ServicePort);
    type IntoIter = btree_map::Iter<'a, ServiceKey, ServicePort>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<(ServiceKey, ServicePort)> for ServiceDirectory {
    fn from_iter<I: IntoIterator<Item = (ServiceKey, ServicePort)>>(iter: I) -> Self {
        let mut directory = Self::new();
        for (key, port) in iter {
            directory.insert(key, port);
        }
        directory
    }
}

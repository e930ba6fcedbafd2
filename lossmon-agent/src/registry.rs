//! Host registry: the ordered, fixed list of probe targets

use crate::error::ConfigError;
use std::fmt;

/// Public resolvers followed by the local gateway, in probe order
pub const DEFAULT_HOSTS: &[&str] = &[
    "8.8.8.8", "8.8.4.4",               // Google DNS
    "1.1.1.1", "1.0.0.1",               // Cloudflare DNS
    "208.67.222.222", "208.67.220.220", // OpenDNS
    "9.9.9.9",                          // Quad9
    "4.2.2.2",                          // Level3
    "8.26.56.26",                       // Comodo
    "156.154.70.1",                     // Neustar UltraDNS
    "192.168.5.1",                      // Local router
];

/// A probe target (IPv4 address or hostname), identified by its literal value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Host(String);

impl Host {
    /// Surrounding whitespace is dropped; anything else is left for ping to reject.
    pub fn new(address: impl AsRef<str>) -> Option<Self> {
        let address = address.as_ref().trim();
        if address.is_empty() {
            None
        } else {
            Some(Self(address.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Host {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Ordered host list, never mutated after construction
#[derive(Debug, Clone)]
pub struct HostRegistry {
    hosts: Vec<Host>,
}

impl HostRegistry {
    pub fn new(hosts: Vec<Host>) -> Result<Self, ConfigError> {
        if hosts.is_empty() {
            return Err(ConfigError::NoHosts);
        }
        Ok(Self { hosts })
    }

    /// Build from raw addresses, keeping declaration order
    pub fn from_addresses<I, S>(addresses: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let hosts = addresses
            .into_iter()
            .enumerate()
            .map(|(index, address)| Host::new(address).ok_or(ConfigError::EmptyHost(index)))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(hosts)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Host> {
        self.hosts.iter()
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl Default for HostRegistry {
    fn default() -> Self {
        Self {
            hosts: DEFAULT_HOSTS.iter().filter_map(Host::new).collect(),
        }
    }
}

//! Network address representation for resolved cluster members.

use std::fmt;

/// A single reachable network endpoint, as delivered to a bound channel.
///
/// The address itself is an opaque string (`host:port` or a URI); the
/// optional metadata slot carries channel-defined per-address data and is
/// never interpreted by the resolver. Address sets are ordered and may
/// contain duplicates; both properties are preserved end to end.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    /// The opaque address string handed to the transport.
    pub addr: String,

    /// Optional per-address metadata, opaque to the resolver.
    pub metadata: Option<String>,
}

impl Address {
    /// Creates an address with no metadata.
    #[must_use]
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into(), metadata: None }
    }

    /// Attaches metadata to this address.
    #[must_use]
    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }
}

impl From<String> for Address {
    fn from(addr: String) -> Self {
        Self::new(addr)
    }
}

impl From<&str> for Address {
    fn from(addr: &str) -> Self {
        Self::new(addr)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.addr)
    }
}

//! Target string codec.
//!
//! A target is the string a caller hands to the RPC channel to select
//! this resolution scheme and a cluster:
//! `endpoint://<clientId>/<endpoint>`. The cluster identifier must not
//! contain `/`; the endpoint may, and any further `/` characters belong
//! to the endpoint verbatim. Neither part is escaped.

use std::{fmt, str::FromStr};

use crate::error::{MissingPrefixSnafu, MissingSeparatorSnafu, ResolverError};

/// The fixed URI scheme the endpoint registry serves.
pub const SCHEME: &str = "endpoint";

/// The prefix every target string starts with.
const TARGET_PREFIX: &str = "endpoint://";

/// Returns true iff `target` is in the endpoint resolver's target format.
#[must_use]
pub fn is_target(target: &str) -> bool {
    target.starts_with(TARGET_PREFIX)
}

/// A decoded `endpoint://<clientId>/<endpoint>` target.
///
/// Decode with [`str::parse`], encode with [`fmt::Display`] or
/// [`Target::format`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    client_id: String,
    endpoint: String,
}

impl Target {
    /// Creates a target from its two components.
    #[must_use]
    pub fn new(client_id: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self { client_id: client_id.into(), endpoint: endpoint.into() }
    }

    /// Formats a target string directly from its two components.
    #[must_use]
    pub fn format(client_id: &str, endpoint: &str) -> String {
        format!("{TARGET_PREFIX}{client_id}/{endpoint}")
    }

    /// The cluster identifier (the target's authority).
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The endpoint part, verbatim, including any further `/` characters.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{TARGET_PREFIX}{}/{}", self.client_id, self.endpoint)
    }
}

impl FromStr for Target {
    type Err = ResolverError;

    /// Decodes a target string.
    ///
    /// The remainder after the `endpoint://` prefix is split on the first
    /// `/` only: everything before it is the cluster identifier,
    /// everything after it (possibly empty) is the endpoint.
    fn from_str(target: &str) -> Result<Self, Self::Err> {
        let Some(rest) = target.strip_prefix(TARGET_PREFIX) else {
            return MissingPrefixSnafu { target }.fail();
        };
        let Some((client_id, endpoint)) = rest.split_once('/') else {
            return MissingSeparatorSnafu { target }.fail();
        };
        Ok(Self::new(client_id, endpoint))
    }
}

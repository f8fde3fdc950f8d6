//! Resolver error types.
//!
//! Every error here is a synchronous, local validation failure returned to
//! the immediate caller; resolution never retries and never panics on
//! expected misuse. Unsupported endpoint schemes are deliberately not
//! errors — see [`parse_endpoint`](crate::parse_endpoint).

use snafu::Snafu;

/// Result type alias for resolver operations.
pub type Result<T> = std::result::Result<T, ResolverError>;

/// Errors produced by target decoding and resolver registration.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ResolverError {
    /// A channel was built against a target with an empty authority.
    #[snafu(display(
        "'endpoint' target scheme requires a non-empty authority identifying the cluster"
    ))]
    EmptyAuthority,

    /// An initial endpoint list was empty; at least one endpoint is required.
    #[snafu(display("at least one endpoint is required"))]
    EmptyEndpoints,

    /// A target string does not start with the `endpoint://` prefix.
    #[snafu(display("malformed target '{target}': the endpoint:// prefix is required"))]
    MissingPrefix {
        /// The offending target string.
        target: String,
    },

    /// A target string has the prefix but no `/` separating the cluster
    /// identifier from the endpoint.
    #[snafu(display("malformed target '{target}': expected endpoint://<clientId>/<endpoint>"))]
    MissingSeparator {
        /// The offending target string.
        target: String,
    },
}

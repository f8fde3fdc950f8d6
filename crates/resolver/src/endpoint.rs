//! Endpoint URI parsing.
//!
//! A single endpoint names one cluster member, either as a bare
//! `host:port` pair or as a URI (`http://10.0.0.1:2379`,
//! `unix:///var/run/ledger.sock`). The parser splits it into the
//! transport to dial with, the host (or socket path) to hand to that
//! transport, and the scheme as originally written.

use url::Url;

/// Transport token for endpoints dialed over TCP.
pub const TRANSPORT_TCP: &str = "tcp";

/// Transport token for endpoints dialed over a Unix domain socket.
pub const TRANSPORT_UNIX: &str = "unix";

/// The components of a parsed endpoint URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointParts {
    /// Transport to dial with: `tcp`, `unix`, or empty when the scheme
    /// was parsed but is unsupported.
    pub transport: String,

    /// Host (including port) or socket path; empty when unsupported.
    pub host: String,

    /// The scheme as written on the endpoint; empty for bare `host:port`.
    pub scheme: String,
}

impl EndpointParts {
    /// Returns whether the endpoint can be dialed at all.
    ///
    /// False means the scheme was recognized by the URI parser but is not
    /// one this client supports; rejecting such endpoints is up to the
    /// caller.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        !self.transport.is_empty()
    }

    /// A bare `host:port` endpoint, passed through verbatim over TCP.
    fn passthrough(endpoint: &str) -> Self {
        Self {
            transport: TRANSPORT_TCP.to_string(),
            host: endpoint.to_string(),
            scheme: String::new(),
        }
    }
}

/// Parses a single endpoint into its transport, host and scheme.
///
/// - Anything without a `://` substring, and anything URI parsing cannot
///   handle, is treated as an already-bare `host:port`: the input comes
///   back verbatim as the host, dialed over TCP, with an empty scheme.
/// - `http://` and `https://` endpoints dial TCP against the URI
///   authority (host plus port).
/// - `unix://` and `unixs://` endpoints dial a Unix socket; the socket
///   path is the authority and path components concatenated, so both
///   `unix://ledger.sock` and `unix:///var/run/ledger.sock` work.
/// - Any other scheme yields empty transport and host so the caller can
///   detect and reject it; the scheme is still reported as parsed.
#[must_use]
pub fn parse_endpoint(endpoint: &str) -> EndpointParts {
    if !endpoint.contains("://") {
        return EndpointParts::passthrough(endpoint);
    }
    let Ok(url) = Url::parse(endpoint) else {
        return EndpointParts::passthrough(endpoint);
    };

    let scheme = url.scheme().to_string();
    match url.scheme() {
        "http" | "https" => EndpointParts {
            transport: TRANSPORT_TCP.to_string(),
            host: url.authority().to_string(),
            scheme,
        },
        "unix" | "unixs" => EndpointParts {
            transport: TRANSPORT_UNIX.to_string(),
            host: format!("{}{}", url.authority(), url.path()),
            scheme,
        },
        _ => EndpointParts { transport: String::new(), host: String::new(), scheme },
    }
}

//! Client-side name resolution for the InferaDB Ledger RPC client.
//!
//! Turns an opaque cluster identifier into a live, updatable set of
//! network addresses for an RPC channel to connect to, and keeps that
//! set current as cluster membership changes. Resolution is entirely
//! push-driven: an external membership watcher feeds address updates in,
//! and the resolver fans them out to whichever channel is bound. Nothing
//! here performs network I/O.
//!
//! # Features
//!
//! - **Per-cluster resolvers**: one [`EndpointResolver`] per cluster
//!   identifier, created and reused through a process-wide registry
//! - **Push-based updates**: the full ordered address set is delivered
//!   on every membership change; no polling, no diffing
//! - **Target codec**: `endpoint://<clientId>/<endpoint>` encoding and
//!   decoding
//! - **Endpoint parsing**: transport/host/scheme splitting for `http`,
//!   `https`, `unix` and `unixs` endpoint URIs
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use inferadb_ledger_resolver::{Address, AddressSink, EndpointRegistry, Target};
//!
//! struct Channel;
//!
//! impl AddressSink for Channel {
//!     fn update_addresses(&self, _addresses: Vec<Address>) {
//!         // hand the new set to the dialer
//!     }
//! }
//!
//! # fn main() -> inferadb_ledger_resolver::Result<()> {
//! let registry = EndpointRegistry::new();
//!
//! // Seed addresses before the channel is dialed.
//! let resolver = registry.resolver("cluster-a");
//! resolver.set_initial_endpoints(["10.0.0.1:2379", "10.0.0.2:2379"])?;
//!
//! // The channel machinery decodes the target and builds against it;
//! // the seeded addresses are replayed to the fresh binding.
//! let target: Target = "endpoint://cluster-a/10.0.0.1:2379".parse()?;
//! let bound = registry.build(&target, Arc::new(Channel))?;
//!
//! // Later, the membership watcher pushes each new full set.
//! bound.update_addresses(vec![Address::new("10.0.0.3:2379")]);
//! # Ok(())
//! # }
//! ```
//!
//! # Data Flow
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ caller: Target::format("cluster-a", endpoint)              │
//! ├────────────────────────────────────────────────────────────┤
//! │ channel machinery: SchemeRegistry lookup ("endpoint")      │
//! ├────────────────────────────────────────────────────────────┤
//! │ EndpointRegistry::build: get-or-create, bind, replay       │
//! ├────────────────────────────────────────────────────────────┤
//! │ membership watcher: EndpointResolver::update_addresses     │
//! │         └── full ordered set pushed to the AddressSink     │
//! └────────────────────────────────────────────────────────────┘
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod address;
mod channel;
mod endpoint;
mod error;
mod registry;
mod resolver;
mod target;

pub use address::Address;
pub use channel::{AddressSink, Resolver, ResolverBuilder, SchemeRegistry, scheme_registry};
pub use endpoint::{EndpointParts, TRANSPORT_TCP, TRANSPORT_UNIX, parse_endpoint};
pub use error::{Result, ResolverError};
pub use registry::{EndpointRegistry, process_registry};
pub use resolver::EndpointResolver;
pub use target::{SCHEME, Target, is_target};

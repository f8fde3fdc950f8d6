//! Channel-framework integration contracts.
//!
//! The resolver core never dials anything itself; it plugs into the RPC
//! channel machinery through three seams:
//!
//! - [`AddressSink`], implemented by the channel side: receives the full
//!   ordered address set every time membership changes.
//! - [`Resolver`] and [`ResolverBuilder`], the contracts the channel
//!   machinery drives when a target with a registered scheme is dialed.
//! - [`SchemeRegistry`], the dispatch table mapping scheme tokens to
//!   builders, with one process-global instance.

use std::{
    collections::HashMap,
    sync::{Arc, OnceLock},
};

use parking_lot::RwLock;
use tracing::debug;

use crate::{address::Address, error::Result, target::Target};

/// Channel-side handle that receives address-set pushes.
///
/// Invoked zero or more times over a binding's lifetime, each call
/// carrying the complete ordered address set; there is no diffing. The
/// call is always made outside resolver locks, so an implementation may
/// block or re-enter the resolver — at the cost of stalling only the
/// caller that triggered the push.
pub trait AddressSink: Send + Sync {
    /// Delivers the current complete address set.
    fn update_addresses(&self, addresses: Vec<Address>);
}

/// The resolver contract the channel machinery drives.
pub trait Resolver: Send + Sync {
    /// Asks the resolver to obtain an updated result now. Push-based
    /// resolvers accept this and do nothing.
    fn resolve_now(&self);

    /// Releases the resolver's registration. Idempotent.
    fn close(&self);
}

/// A named resolver factory, registered per URI scheme.
pub trait ResolverBuilder: Send + Sync {
    /// Creates or reuses the resolver for `target`, binding `sink` to it
    /// as the push destination.
    fn build(&self, target: &Target, sink: Arc<dyn AddressSink>) -> Result<Arc<dyn Resolver>>;

    /// The URI scheme token this builder serves.
    fn scheme(&self) -> &'static str;
}

/// Dispatch table from scheme token to resolver builder.
///
/// The channel machinery consults one process-global instance (see
/// [`scheme_registry`]) when dialing; explicit instances are mostly
/// useful in tests.
#[derive(Default)]
pub struct SchemeRegistry {
    builders: RwLock<HashMap<&'static str, Arc<dyn ResolverBuilder>>>,
}

impl SchemeRegistry {
    /// Creates an empty dispatch table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `builder` under its scheme, replacing any previous entry
    /// for that scheme.
    pub fn register(&self, builder: Arc<dyn ResolverBuilder>) {
        let scheme = builder.scheme();
        self.builders.write().insert(scheme, builder);
        debug!(scheme, "registered resolver builder");
    }

    /// Looks up the builder registered for `scheme`.
    #[must_use]
    pub fn lookup(&self, scheme: &str) -> Option<Arc<dyn ResolverBuilder>> {
        self.builders.read().get(scheme).cloned()
    }
}

/// Returns the process-global scheme dispatch table.
pub fn scheme_registry() -> &'static SchemeRegistry {
    static REGISTRY: OnceLock<SchemeRegistry> = OnceLock::new();
    REGISTRY.get_or_init(SchemeRegistry::default)
}

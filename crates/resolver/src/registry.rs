//! Process-wide registry of per-cluster resolvers.

use std::{
    collections::HashMap,
    sync::{Arc, OnceLock, Weak},
};

use parking_lot::RwLock;
use snafu::ensure;
use tracing::debug;

use crate::{
    channel::{self, AddressSink, ResolverBuilder, scheme_registry},
    error::{EmptyAuthoritySnafu, Result},
    resolver::EndpointResolver,
    target::{SCHEME, Target},
};

/// Registry of one [`EndpointResolver`] per cluster identifier.
///
/// The registry is the only code that mutates the identifier→resolver
/// mapping: resolvers are created on first lookup (or explicitly
/// registered) and removed when closed. At most one live resolver per
/// identifier is reachable from the registry at any time.
///
/// Cloning is cheap and clones share state, so one registry can serve
/// channel builds and membership updates from any thread. Lookups take a
/// shared lock and never serialize against each other; only inserts and
/// removals take the exclusive path.
#[derive(Debug, Clone, Default)]
pub struct EndpointRegistry {
    inner: Arc<RegistryInner>,
}

#[derive(Debug, Default)]
pub(crate) struct RegistryInner {
    resolvers: RwLock<HashMap<String, Arc<EndpointResolver>>>,
}

impl RegistryInner {
    /// Removal path shared by `close()` and `unregister()`.
    pub(crate) fn remove(&self, client_id: &str) {
        if self.resolvers.write().remove(client_id).is_some() {
            debug!(client_id, "removed resolver");
        }
    }
}

impl EndpointRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the resolver for `client_id`, creating and inserting an
    /// empty one on first use.
    ///
    /// Get-or-create is atomic: the common lookup path takes the shared
    /// lock only, and the insert path re-checks under the exclusive lock,
    /// so concurrent callers for the same identifier all observe the same
    /// resolver.
    #[must_use]
    pub fn resolver(&self, client_id: &str) -> Arc<EndpointResolver> {
        {
            let resolvers = self.inner.resolvers.read();
            if let Some(resolver) = resolvers.get(client_id) {
                return resolver.clone();
            }
        }

        let mut resolvers = self.inner.resolvers.write();
        // Another thread may have inserted while we waited for the
        // exclusive lock.
        if let Some(resolver) = resolvers.get(client_id) {
            return resolver.clone();
        }
        let resolver = Arc::new(EndpointResolver::new(client_id, Arc::downgrade(&self.inner)));
        resolvers.insert(client_id.to_string(), resolver.clone());
        debug!(client_id, "created resolver");
        resolver
    }

    /// Inserts `resolver` under its cluster identifier, replacing any
    /// existing entry. Used to re-register a resolver that was previously
    /// removed by [`EndpointResolver::close`].
    pub fn register(&self, resolver: Arc<EndpointResolver>) {
        self.inner.resolvers.write().insert(resolver.client_id().to_string(), resolver);
    }

    /// Removes the entry for `resolver`'s cluster identifier, if present.
    pub fn unregister(&self, resolver: &EndpointResolver) {
        self.inner.remove(resolver.client_id());
    }

    /// Returns whether a resolver is currently registered for `client_id`.
    #[must_use]
    pub fn contains(&self, client_id: &str) -> bool {
        self.inner.resolvers.read().contains_key(client_id)
    }

    /// Returns the number of registered resolvers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.resolvers.read().len()
    }

    /// Returns whether the registry has no resolvers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Creates or reuses the resolver for the cluster named by `target`'s
    /// authority and binds `sink` to it as the push destination.
    ///
    /// If the resolver already holds addresses (set before the channel
    /// was dialed), they are pushed to the new binding immediately.
    ///
    /// # Errors
    ///
    /// Fails with [`ResolverError::EmptyAuthority`] when the target's
    /// cluster identifier is empty; no registry entry is created in that
    /// case.
    ///
    /// [`ResolverError::EmptyAuthority`]: crate::ResolverError::EmptyAuthority
    pub fn build(
        &self,
        target: &Target,
        sink: Arc<dyn AddressSink>,
    ) -> Result<Arc<EndpointResolver>> {
        ensure!(!target.client_id().is_empty(), EmptyAuthoritySnafu);
        let resolver = self.resolver(target.client_id());
        resolver.bind(sink);
        Ok(resolver)
    }
}

impl ResolverBuilder for EndpointRegistry {
    fn build(
        &self,
        target: &Target,
        sink: Arc<dyn AddressSink>,
    ) -> Result<Arc<dyn channel::Resolver>> {
        EndpointRegistry::build(self, target, sink)
            .map(|resolver| resolver as Arc<dyn channel::Resolver>)
    }

    fn scheme(&self) -> &'static str {
        SCHEME
    }
}

/// Returns the process-wide endpoint registry.
///
/// On first use the registry is constructed and registered under the
/// `endpoint` scheme with the global dispatch table; both happen exactly
/// once for the life of the process. There is no teardown: the registry
/// lives until the process exits.
pub fn process_registry() -> &'static EndpointRegistry {
    static PROCESS: OnceLock<EndpointRegistry> = OnceLock::new();
    PROCESS.get_or_init(|| {
        let registry = EndpointRegistry::new();
        scheme_registry().register(Arc::new(registry.clone()));
        registry
    })
}

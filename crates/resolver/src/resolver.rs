//! Per-cluster resolver: an address cache that pushes to a bound channel.

use std::{
    fmt,
    sync::{Arc, Weak},
};

use parking_lot::RwLock;
use snafu::ensure;
use tracing::debug;

use crate::{
    address::Address,
    channel::{self, AddressSink},
    error::{EmptyEndpointsSnafu, Result},
    registry::RegistryInner,
    target::Target,
};

/// Resolver for a single cluster, identified by its client id.
///
/// Holds the cluster's current address set and, once a channel has been
/// built against it, the bound [`AddressSink`]. Membership changes are
/// pushed in by an external watcher via
/// [`update_addresses`](Self::update_addresses); the resolver never
/// re-fetches membership on its own.
///
/// Resolvers are created only through an
/// [`EndpointRegistry`](crate::EndpointRegistry) and are shared: every
/// lookup and build for the same cluster identifier returns the same
/// instance until it is closed.
pub struct EndpointResolver {
    client_id: String,
    registry: Weak<RegistryInner>,
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    sink: Option<Arc<dyn AddressSink>>,
    addresses: Option<Vec<Address>>,
}

impl EndpointResolver {
    pub(crate) fn new(client_id: impl Into<String>, registry: Weak<RegistryInner>) -> Self {
        Self { client_id: client_id.into(), registry, state: RwLock::new(State::default()) }
    }

    /// The cluster identifier this resolver serves.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns a snapshot of the stored address set, or `None` when no
    /// addresses have been set yet.
    #[must_use]
    pub fn addresses(&self) -> Option<Vec<Address>> {
        self.state.read().addresses.clone()
    }

    /// Returns whether a channel is currently bound.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.state.read().sink.is_some()
    }

    /// Stores the initial address set for this resolver.
    ///
    /// Intended to be called before the channel is dialed; if a channel
    /// is already bound, the set is pushed to it immediately.
    pub fn set_initial_addresses(&self, addresses: Vec<Address>) {
        self.store_and_push(addresses);
    }

    /// Stores the initial endpoints, using each endpoint string verbatim
    /// as an address (no parsing is applied).
    ///
    /// # Errors
    ///
    /// Fails with [`ResolverError::EmptyEndpoints`] when `endpoints` is
    /// empty; at least one endpoint is required.
    ///
    /// [`ResolverError::EmptyEndpoints`]: crate::ResolverError::EmptyEndpoints
    pub fn set_initial_endpoints<I, S>(&self, endpoints: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let addresses: Vec<Address> = endpoints.into_iter().map(Address::new).collect();
        ensure!(!addresses.is_empty(), EmptyEndpointsSnafu);
        self.set_initial_addresses(addresses);
        Ok(())
    }

    /// Replaces the stored address set and pushes it to the bound
    /// channel, if any.
    ///
    /// This is the sole mechanism by which membership changes reach the
    /// channel: the full ordered set is always delivered, with no
    /// diffing against the previous set. Unbound resolvers just store
    /// the set for replay at bind time.
    pub fn update_addresses(&self, addresses: Vec<Address>) {
        self.store_and_push(addresses);
    }

    /// Accepted and ignored: membership updates always originate from
    /// the external watcher, never from re-resolution.
    pub fn resolve_now(&self) {}

    /// Removes this resolver from its registry.
    ///
    /// Idempotent; closing an already-removed resolver is a no-op. The
    /// bound channel, if any, is neither unbound nor notified.
    pub fn close(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(&self.client_id);
        }
    }

    /// Formats the full target string for `endpoint` under this
    /// resolver's cluster identifier.
    #[must_use]
    pub fn target(&self, endpoint: &str) -> String {
        Target::format(&self.client_id, endpoint)
    }

    /// Binds `sink` as the push destination, replacing any previous
    /// binding, and replays the stored address set to it.
    pub(crate) fn bind(&self, sink: Arc<dyn AddressSink>) {
        let replay = {
            let mut state = self.state.write();
            state.sink = Some(sink.clone());
            state.addresses.clone()
        };
        if let Some(addresses) = replay {
            debug!(
                client_id = %self.client_id,
                count = addresses.len(),
                "replaying addresses to new binding"
            );
            sink.update_addresses(addresses);
        }
    }

    /// Overwrites the stored set, then notifies the bound sink.
    ///
    /// The sink call is made after the state lock is released: a slow or
    /// reentrant sink stalls only the caller that triggered the push,
    /// never other resolver operations.
    fn store_and_push(&self, addresses: Vec<Address>) {
        let sink = {
            let mut state = self.state.write();
            state.addresses = Some(addresses.clone());
            state.sink.clone()
        };
        if let Some(sink) = sink {
            debug!(
                client_id = %self.client_id,
                count = addresses.len(),
                "pushing address update"
            );
            sink.update_addresses(addresses);
        }
    }
}

impl channel::Resolver for EndpointResolver {
    fn resolve_now(&self) {
        EndpointResolver::resolve_now(self);
    }

    fn close(&self) {
        EndpointResolver::close(self);
    }
}

impl fmt::Debug for EndpointResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("EndpointResolver")
            .field("client_id", &self.client_id)
            .field("bound", &state.sink.is_some())
            .field("addresses", &state.addresses)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use parking_lot::Mutex;

    use super::*;
    use crate::{error::ResolverError, registry::EndpointRegistry};

    /// Records every push it receives, in order.
    #[derive(Default)]
    struct RecordingSink {
        pushes: Mutex<Vec<Vec<Address>>>,
    }

    impl RecordingSink {
        fn pushes(&self) -> Vec<Vec<Address>> {
            self.pushes.lock().clone()
        }
    }

    impl AddressSink for RecordingSink {
        fn update_addresses(&self, addresses: Vec<Address>) {
            self.pushes.lock().push(addresses);
        }
    }

    fn addrs(raw: &[&str]) -> Vec<Address> {
        raw.iter().map(|a| Address::new(*a)).collect()
    }

    #[test]
    fn new_resolver_has_no_addresses_and_no_binding() {
        let registry = EndpointRegistry::new();
        let resolver = registry.resolver("cluster1");

        assert_eq!(resolver.client_id(), "cluster1");
        assert!(resolver.addresses().is_none());
        assert!(!resolver.is_bound());
    }

    #[test]
    fn empty_endpoint_list_is_rejected() {
        let registry = EndpointRegistry::new();
        let resolver = registry.resolver("cluster1");

        let err = resolver.set_initial_endpoints(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, ResolverError::EmptyEndpoints));
        assert!(resolver.addresses().is_none());
    }

    #[test]
    fn initial_endpoints_are_stored_verbatim_in_order() {
        let registry = EndpointRegistry::new();
        let resolver = registry.resolver("cluster1");

        resolver.set_initial_endpoints(["a:1", "b:2"]).unwrap();
        assert_eq!(resolver.addresses(), Some(addrs(&["a:1", "b:2"])));
    }

    #[test]
    fn stores_without_pushing_while_unbound() {
        let registry = EndpointRegistry::new();
        let resolver = registry.resolver("cluster1");

        resolver.update_addresses(addrs(&["a:1"]));
        assert_eq!(resolver.addresses(), Some(addrs(&["a:1"])));
    }

    #[test]
    fn set_initial_addresses_pushes_when_already_bound() {
        let registry = EndpointRegistry::new();
        let sink = Arc::new(RecordingSink::default());
        let target: Target = "endpoint://cluster1/ep".parse().unwrap();
        let resolver = registry.build(&target, sink.clone()).unwrap();

        resolver.set_initial_addresses(addrs(&["a:1", "b:2"]));
        assert_eq!(sink.pushes(), vec![addrs(&["a:1", "b:2"])]);
    }

    #[test]
    fn update_overwrites_and_pushes_the_full_set() {
        let registry = EndpointRegistry::new();
        let resolver = registry.resolver("cluster1");
        resolver.set_initial_endpoints(["a:1"]).unwrap();

        let sink = Arc::new(RecordingSink::default());
        let target: Target = "endpoint://cluster1/ep".parse().unwrap();
        registry.build(&target, sink.clone()).unwrap();

        resolver.update_addresses(addrs(&["c:3", "d:4"]));

        // One replay at bind time, then the overwrite.
        assert_eq!(sink.pushes(), vec![addrs(&["a:1"]), addrs(&["c:3", "d:4"])]);
        assert_eq!(resolver.addresses(), Some(addrs(&["c:3", "d:4"])));
    }

    #[test]
    fn duplicate_addresses_are_not_deduplicated() {
        let registry = EndpointRegistry::new();
        let resolver = registry.resolver("cluster1");

        resolver.update_addresses(addrs(&["a:1", "a:1", "b:2"]));
        assert_eq!(resolver.addresses(), Some(addrs(&["a:1", "a:1", "b:2"])));
    }

    #[test]
    fn resolve_now_is_a_no_op() {
        let registry = EndpointRegistry::new();
        let resolver = registry.resolver("cluster1");
        resolver.set_initial_endpoints(["a:1"]).unwrap();

        resolver.resolve_now();
        assert_eq!(resolver.addresses(), Some(addrs(&["a:1"])));
        assert!(!resolver.is_bound());
    }

    #[test]
    fn target_helper_uses_this_resolvers_client_id() {
        let registry = EndpointRegistry::new();
        let resolver = registry.resolver("cluster1");

        assert_eq!(resolver.target("10.0.0.1:2379"), "endpoint://cluster1/10.0.0.1:2379");
    }

    #[test]
    fn close_does_not_unbind_or_notify() {
        let registry = EndpointRegistry::new();
        let sink = Arc::new(RecordingSink::default());
        let target: Target = "endpoint://cluster1/ep".parse().unwrap();
        let resolver = registry.build(&target, sink.clone()).unwrap();

        resolver.close();
        assert!(resolver.is_bound());
        assert!(sink.pushes().is_empty());

        // Closed resolvers still push to their bound channel.
        resolver.update_addresses(addrs(&["a:1"]));
        assert_eq!(sink.pushes(), vec![addrs(&["a:1"])]);
    }

    #[test]
    fn debug_output_reports_binding_state() {
        let registry = EndpointRegistry::new();
        let resolver = registry.resolver("cluster1");

        let rendered = format!("{resolver:?}");
        assert!(rendered.contains("cluster1"));
        assert!(rendered.contains("bound: false"));
    }
}

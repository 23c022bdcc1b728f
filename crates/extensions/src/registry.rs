//! The client extension registry.
//!
//! A [`Plugin`] names a namespace and knows how to build its endpoint
//! functions from a [`ClientContext`]. [`ExtensionsBuilder`] collects plugins
//! and [`ExtensionsBuilder::build`] invokes every factory exactly once, in
//! registration order, producing the immutable [`Extensions`] aggregate.
//!
//! Building performs no network I/O; the endpoint functions only talk to the
//! base client when called.
//!
//! ```ignore
//! let extensions = ExtensionsBuilder::new(base_client, options)
//!     .register(WishlistPlugin)
//!     .register(ReviewsPlugin::default())
//!     .build()?;
//!
//! let wishlists = extensions.require::<WishlistPlugin>()?.list(Default::default(), None).await?;
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::{ClientContext, ClientOptions, RegistryError, StoreClient};

// ---------------------------------------------------------------------------
// Plugin descriptor
// ---------------------------------------------------------------------------

/// A named bundle of endpoint functions.
pub trait Plugin: Send + Sync + 'static {
    /// Namespace key under which the endpoints are exposed. Expected to be
    /// unique among the plugins registered on one builder.
    const NAME: &'static str;

    /// The endpoint namespace produced by [`Plugin::endpoints`].
    type Endpoints: Send + Sync + 'static;

    /// Builds the endpoint namespace. Called exactly once per build.
    fn endpoints(&self, ctx: &ClientContext) -> Self::Endpoints;
}

/// What [`ExtensionsBuilder::build`] does when two plugins share a name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Fail the build with [`RegistryError::DuplicatePlugin`]. No factory is
    /// invoked.
    #[default]
    Reject,
    /// The last registration wins. The name keeps its first position in
    /// [`Extensions::names`].
    Replace,
}

type Namespace = Arc<dyn Any + Send + Sync>;
type Factory = Box<dyn FnOnce(&ClientContext) -> Namespace + Send>;

struct PendingPlugin {
    name: &'static str,
    factory: Factory,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Collects plugins and assembles them into [`Extensions`].
pub struct ExtensionsBuilder {
    ctx: ClientContext,
    pending: Vec<PendingPlugin>,
    policy: DuplicatePolicy,
}

impl ExtensionsBuilder {
    /// Starts a builder over `client` with shared `options`.
    pub fn new(client: impl StoreClient + 'static, options: ClientOptions) -> Self {
        Self::from_context(ClientContext::new(Arc::new(client), options))
    }

    /// Starts a builder over an existing context.
    pub fn from_context(ctx: ClientContext) -> Self {
        Self {
            ctx,
            pending: Vec::new(),
            policy: DuplicatePolicy::default(),
        }
    }

    /// Sets how name collisions are handled.
    #[must_use]
    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Queues `plugin`. Its factory runs during [`ExtensionsBuilder::build`].
    #[must_use]
    pub fn register<P: Plugin>(mut self, plugin: P) -> Self {
        self.pending.push(PendingPlugin {
            name: P::NAME,
            factory: Box::new(move |ctx: &ClientContext| {
                Arc::new(plugin.endpoints(ctx)) as Namespace
            }),
        });
        self
    }

    /// Invokes every queued factory once, in registration order, and returns
    /// the aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicatePlugin`] under
    /// [`DuplicatePolicy::Reject`] when a name is registered twice.
    pub fn build(self) -> Result<Extensions, RegistryError> {
        if self.policy == DuplicatePolicy::Reject {
            let mut seen = Vec::with_capacity(self.pending.len());
            for pending in &self.pending {
                if seen.contains(&pending.name) {
                    return Err(RegistryError::DuplicatePlugin { name: pending.name });
                }
                seen.push(pending.name);
            }
        }

        let mut order = Vec::with_capacity(self.pending.len());
        let mut namespaces = HashMap::with_capacity(self.pending.len());

        for pending in self.pending {
            let namespace = (pending.factory)(&self.ctx);
            if namespaces.insert(pending.name, namespace).is_some() {
                tracing::warn!(
                    plugin = pending.name,
                    "plugin registered twice; replacing earlier endpoints"
                );
            } else {
                order.push(pending.name);
            }
        }

        tracing::debug!(plugins = ?order, "storefront extensions built");

        Ok(Extensions {
            ctx: self.ctx,
            order,
            namespaces,
        })
    }
}

impl std::fmt::Debug for ExtensionsBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionsBuilder")
            .field("plugins", &self.pending.iter().map(|p| p.name).collect::<Vec<_>>())
            .field("policy", &self.policy)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

/// The aggregate of all registered endpoint namespaces.
///
/// Immutable once built. Namespaces are shared, so cloning is cheap.
#[derive(Clone)]
pub struct Extensions {
    ctx: ClientContext,
    order: Vec<&'static str>,
    namespaces: HashMap<&'static str, Namespace>,
}

impl Extensions {
    /// Returns the endpoints registered for plugin `P`.
    ///
    /// `None` if `P::NAME` is absent, or if it was replaced by a plugin whose
    /// endpoints have a different type.
    pub fn get<P: Plugin>(&self) -> Option<&P::Endpoints> {
        self.namespaces.get(P::NAME)?.downcast_ref::<P::Endpoints>()
    }

    /// Like [`Extensions::get`], but reports absence as an error.
    pub fn require<P: Plugin>(&self) -> Result<&P::Endpoints, RegistryError> {
        self.get::<P>().ok_or(RegistryError::NotRegistered { name: P::NAME })
    }

    /// Returns the type-erased namespace registered under `name`.
    pub fn namespace(&self, name: &str) -> Option<&(dyn Any + Send + Sync)> {
        self.namespaces.get(name).map(|ns| ns.as_ref())
    }

    /// Returns `true` if a namespace is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.namespaces.contains_key(name)
    }

    /// Registered names in first-registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }

    /// Number of registered namespaces.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if no plugin was registered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The context every namespace was built from.
    pub fn context(&self) -> &ClientContext {
        &self.ctx
    }
}

impl std::fmt::Debug for Extensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extensions").field("plugins", &self.order).finish()
    }
}

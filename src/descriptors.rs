//! Service descriptors: one registration, one materialization source.

use std::any::Any;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::provider::Injector;

/// Type-erased payload shared by the registry, caches, and overrides.
///
/// Every payload wraps an `Arc<C>` (i.e. it is an `Arc<Arc<C>>`), so sized
/// contracts and trait objects go through one code path.
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

/// Type-erased construction function.
pub(crate) type CtorFn = Arc<dyn for<'a> Fn(&Injector<'a>) -> DiResult<AnyArc> + Send + Sync>;

/// How a descriptor produces its instance. Exactly one variant is active,
/// so a registration can never end up with zero or multiple sources.
#[derive(Clone)]
pub(crate) enum Source {
    /// Pre-built instance, returned as-is on every materialization.
    Instance(AnyArc),
    /// Factory invoked with the current resolution state.
    Factory(CtorFn),
    /// Constructible implementation type, resolved from the registry when
    /// registered there, otherwise constructed by injecting its dependencies.
    ImplType {
        impl_name: &'static str,
        construct: CtorFn,
    },
}

/// A single registration: contract key, lifetime, and materialization source.
///
/// Descriptors are created by the registration methods on
/// [`ServiceCollection`](crate::ServiceCollection), read by the decoration
/// step, and replaced wholesale when a contract is decorated. Cloning is
/// cheap; the payload and construction functions are shared.
#[derive(Clone)]
pub struct ServiceDescriptor {
    pub(crate) key: Key,
    pub(crate) lifetime: Lifetime,
    pub(crate) source: Source,
}

impl ServiceDescriptor {
    /// The contract this descriptor is registered under.
    pub fn contract_name(&self) -> &'static str {
        self.key.name()
    }

    pub(crate) fn key(&self) -> &Key {
        &self.key
    }

    /// The registration's lifetime.
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// Name of the implementation type, when the source is a constructible
    /// type rather than an instance or factory.
    pub fn impl_name(&self) -> Option<&'static str> {
        match &self.source {
            Source::ImplType { impl_name, .. } => Some(impl_name),
            _ => None,
        }
    }

    /// Produces an instance from this descriptor's source.
    ///
    /// This is the single materialization path: the provider's own
    /// resolution and the decoration closure both call it, so a decorated
    /// original behaves exactly like the undecorated original would have.
    pub(crate) fn materialize(&self, injector: &Injector<'_>) -> DiResult<AnyArc> {
        match &self.source {
            Source::Instance(payload) => Ok(payload.clone()),
            Source::Factory(ctor) => ctor(injector),
            Source::ImplType { construct, .. } => construct(injector),
        }
    }

    /// Materializes and downcasts to the contract type.
    ///
    /// A descriptor found under `C`'s key always holds a `C` payload, so a
    /// failed downcast means the descriptor is malformed.
    pub(crate) fn materialize_as<C>(&self, injector: &Injector<'_>) -> DiResult<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let payload = self.materialize(injector)?;
        payload
            .downcast::<Arc<C>>()
            .map(|outer| outer.as_ref().clone())
            .map_err(|_| DiError::InvalidSource(self.key.name()))
    }
}

impl std::fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source = match &self.source {
            Source::Instance(_) => "instance",
            Source::Factory(_) => "factory",
            Source::ImplType { .. } => "impl-type",
        };
        f.debug_struct("ServiceDescriptor")
            .field("contract", &self.key.name())
            .field("lifetime", &self.lifetime)
            .field("source", &source)
            .finish()
    }
}

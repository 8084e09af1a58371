//! Registration surface: the service collection.

use std::any::TypeId;
use std::sync::Arc;

use log::{debug, trace};

use crate::descriptors::{AnyArc, CtorFn, ServiceDescriptor, Source};
use crate::error::DiResult;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::provider::{Injector, ServiceProvider};
use crate::registry::Registry;
use crate::traits::Implementation;

/// Ordered collection of service registrations.
///
/// Registrations append in call order; registering the same contract twice
/// keeps both descriptors, and lookup (including decoration) targets the
/// first one. Call [`build`](Self::build) to obtain a resolving provider.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use interpose::{ServiceCollection, Resolver};
///
/// struct Config { port: u16 }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Arc::new(Config { port: 8080 }));
/// services.add_transient_factory::<String, _>(|injector| {
///     let config = injector.get::<Config>()?;
///     Ok(Arc::new(format!("listening on {}", config.port)))
/// });
///
/// let provider = services.build();
/// assert_eq!(&*provider.get_required::<String>(), "listening on 8080");
/// ```
pub struct ServiceCollection {
    pub(crate) registry: Registry,
}

impl ServiceCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    // ----- Instance source -----

    /// Registers a pre-built instance as a singleton.
    ///
    /// The stored instance is returned as-is on every resolution; it is
    /// never reconstructed, including when the registration is later
    /// decorated. Works for concrete types and trait objects alike:
    /// `add_singleton(Arc::new(ConsoleLogger) as Arc<dyn Logger>)`.
    pub fn add_singleton<C>(&mut self, value: Arc<C>) -> &mut Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let key = Key::of::<C>();
        trace!("registering singleton instance {}", key.name());
        self.registry.insert(ServiceDescriptor {
            key,
            lifetime: Lifetime::Singleton,
            source: Source::Instance(Arc::new(value) as AnyArc),
        });
        self
    }

    // ----- Factory source -----

    /// Registers a singleton factory, invoked once on first resolution.
    pub fn add_singleton_factory<C, F>(&mut self, factory: F) -> &mut Self
    where
        C: ?Sized + Send + Sync + 'static,
        F: for<'a> Fn(&Injector<'a>) -> DiResult<Arc<C>> + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Singleton, factory)
    }

    /// Registers a scoped factory, invoked once per scope.
    pub fn add_scoped_factory<C, F>(&mut self, factory: F) -> &mut Self
    where
        C: ?Sized + Send + Sync + 'static,
        F: for<'a> Fn(&Injector<'a>) -> DiResult<Arc<C>> + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Scoped, factory)
    }

    /// Registers a transient factory, invoked on every resolution.
    pub fn add_transient_factory<C, F>(&mut self, factory: F) -> &mut Self
    where
        C: ?Sized + Send + Sync + 'static,
        F: for<'a> Fn(&Injector<'a>) -> DiResult<Arc<C>> + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Transient, factory)
    }

    fn add_factory<C, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        C: ?Sized + Send + Sync + 'static,
        F: for<'a> Fn(&Injector<'a>) -> DiResult<Arc<C>> + Send + Sync + 'static,
    {
        let key = Key::of::<C>();
        trace!("registering {:?} factory {}", lifetime, key.name());
        let ctor: CtorFn = Arc::new(move |injector: &Injector<'_>| {
            factory(injector).map(|value| Arc::new(value) as AnyArc)
        });
        self.registry.insert(ServiceDescriptor {
            key,
            lifetime,
            source: Source::Factory(ctor),
        });
        self
    }

    // ----- Implementation-type source -----

    /// Registers a constructible implementation for a contract as a
    /// singleton.
    ///
    /// Materialization is resolve-or-construct: if `T` has a registration
    /// of its own in the collection it is resolved from there, otherwise a
    /// fresh `T` is constructed by injecting its declared dependencies.
    /// Registering a type as its own contract (`C == T`) always constructs
    /// directly, since the registration being materialized is `T`'s own.
    pub fn add_singleton_impl<C, T>(&mut self) -> &mut Self
    where
        C: ?Sized + Send + Sync + 'static,
        T: Implementation<C>,
    {
        self.add_impl::<C, T>(Lifetime::Singleton)
    }

    /// Registers a constructible implementation with scoped lifetime.
    pub fn add_scoped_impl<C, T>(&mut self) -> &mut Self
    where
        C: ?Sized + Send + Sync + 'static,
        T: Implementation<C>,
    {
        self.add_impl::<C, T>(Lifetime::Scoped)
    }

    /// Registers a constructible implementation with transient lifetime.
    pub fn add_transient_impl<C, T>(&mut self) -> &mut Self
    where
        C: ?Sized + Send + Sync + 'static,
        T: Implementation<C>,
    {
        self.add_impl::<C, T>(Lifetime::Transient)
    }

    fn add_impl<C, T>(&mut self, lifetime: Lifetime) -> &mut Self
    where
        C: ?Sized + Send + Sync + 'static,
        T: Implementation<C>,
    {
        let key = Key::of::<C>();
        let impl_name = std::any::type_name::<T>();
        trace!("registering {:?} {} -> {}", lifetime, key.name(), impl_name);
        // A type registered as its own contract must construct directly:
        // probing the registry first would re-enter this very descriptor.
        let self_keyed = TypeId::of::<T>() == key.id();
        let construct: CtorFn = Arc::new(move |injector: &Injector<'_>| {
            let concrete = if self_keyed {
                let child = injector.descend()?;
                Arc::new(T::construct(&child)?)
            } else {
                injector.get_or_construct::<T>()?
            };
            let contract = T::into_contract(concrete);
            Ok(Arc::new(contract) as AnyArc)
        });
        self.registry.insert(ServiceDescriptor {
            key,
            lifetime,
            source: Source::ImplType {
                impl_name,
                construct,
            },
        });
        self
    }

    // ----- Introspection -----

    /// Whether the contract has at least one registration.
    pub fn contains<C: ?Sized + 'static>(&self) -> bool {
        self.registry.lookup(&Key::of::<C>()).is_some()
    }

    /// Number of registered descriptors.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ServiceDescriptor> {
        self.registry.iter()
    }

    /// Builds the resolving provider. The registry is frozen from here on.
    pub fn build(self) -> ServiceProvider {
        debug!("building provider with {} registrations", self.registry.len());
        ServiceProvider::new(self.registry)
    }
}

impl Default for ServiceCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ServiceCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.registry.iter()).finish()
    }
}

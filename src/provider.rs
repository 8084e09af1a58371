//! Resolution side of the registry: provider, scopes, and injectors.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use log::trace;
use parking_lot::Mutex;

use crate::descriptors::AnyArc;
use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registry::Registry;
use crate::traits::{Construct, Resolver};

/// Bounds recursive construction so cyclic dependency graphs surface as
/// `DepthExceeded` instead of unbounded recursion.
const MAX_RESOLUTION_DEPTH: usize = 100;

pub(crate) type ScopeCache = Mutex<HashMap<TypeId, AnyArc>>;

/// Explicit values consulted before registry resolution.
///
/// Decoration places the materialized original under the contract's key so
/// the decorator's own dependency on the contract is satisfied with the
/// original instance rather than recursing into the decorated registration.
pub(crate) struct OverrideSet {
    values: HashMap<TypeId, AnyArc>,
}

impl OverrideSet {
    pub(crate) fn single<C>(value: Arc<C>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let mut values = HashMap::new();
        values.insert(TypeId::of::<C>(), Arc::new(value) as AnyArc);
        Self { values }
    }

    fn get(&self, id: &TypeId) -> Option<AnyArc> {
        self.values.get(id).cloned()
    }
}

pub(crate) struct ProviderInner {
    registry: Registry,
    singletons: Mutex<HashMap<TypeId, AnyArc>>,
}

impl ProviderInner {
    /// Core lifetime-aware resolution. Overrides are handled by the caller;
    /// by the time a key reaches here it is resolved from the registry.
    fn resolve_key(&self, key: &Key, injector: &Injector<'_>) -> DiResult<AnyArc> {
        let descriptor = self
            .registry
            .lookup(key)
            .ok_or(DiError::NotFound(key.name()))?;

        match descriptor.lifetime() {
            Lifetime::Transient => descriptor.materialize(&injector.descend()?),
            Lifetime::Singleton => {
                if let Some(hit) = self.singletons.lock().get(&key.id()).cloned() {
                    return Ok(hit);
                }
                trace!("constructing singleton {}", key.name());
                let built = descriptor.materialize(&injector.descend()?)?;
                // First stored instance wins, so concurrent callers all
                // observe the same singleton.
                let mut cache = self.singletons.lock();
                Ok(cache.entry(key.id()).or_insert(built).clone())
            }
            Lifetime::Scoped => {
                let scope = injector
                    .scope
                    .ok_or(DiError::WrongLifetime(key.name()))?;
                if let Some(hit) = scope.lock().get(&key.id()).cloned() {
                    return Ok(hit);
                }
                trace!("constructing scoped {}", key.name());
                let built = descriptor.materialize(&injector.descend()?)?;
                let mut cache = scope.lock();
                Ok(cache.entry(key.id()).or_insert(built).clone())
            }
        }
    }
}

/// Thread-safe root provider built from a
/// [`ServiceCollection`](crate::ServiceCollection).
///
/// Cheap to clone; all clones share the registry and the singleton cache.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use interpose::{ServiceCollection, Resolver};
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Arc::new("postgres://localhost".to_string()));
///
/// let provider = services.build();
/// let url = provider.get_required::<String>();
/// assert_eq!(&*url, "postgres://localhost");
/// ```
#[derive(Clone)]
pub struct ServiceProvider {
    inner: Arc<ProviderInner>,
}

impl ServiceProvider {
    pub(crate) fn new(registry: Registry) -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                registry,
                singletons: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Creates a scope with its own cache for scoped services. Singletons
    /// stay shared with the root.
    pub fn create_scope(&self) -> Scope {
        Scope {
            root: self.clone(),
            scoped: Mutex::new(HashMap::new()),
        }
    }
}

impl Resolver for ServiceProvider {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        let injector = Injector {
            inner: &self.inner,
            scope: None,
            overrides: None,
            depth: 0,
        };
        injector.resolve_any(key)
    }
}

/// A resolution scope. Scoped services are cached per scope; dropping the
/// scope drops its cache.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use interpose::{ServiceCollection, Resolver};
///
/// let mut services = ServiceCollection::new();
/// services.add_scoped_factory::<String, _>(|_| Ok(Arc::new("per-scope".to_string())));
///
/// let provider = services.build();
/// let scope = provider.create_scope();
/// let a = scope.get_required::<String>();
/// let b = scope.get_required::<String>();
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
pub struct Scope {
    root: ServiceProvider,
    scoped: ScopeCache,
}

impl Resolver for Scope {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        let injector = Injector {
            inner: &self.root.inner,
            scope: Some(&self.scoped),
            overrides: None,
            depth: 0,
        };
        injector.resolve_any(key)
    }
}

/// Resolution state handed to factories, constructors, and decorators.
///
/// An injector borrows the provider (and the current scope, when resolving
/// inside one) and carries the depth of the construction chain plus any
/// explicit override values. Overrides apply only to direct `get` calls on
/// this injector; nested construction resolves from the registry normally.
pub struct Injector<'a> {
    inner: &'a ProviderInner,
    scope: Option<&'a ScopeCache>,
    overrides: Option<&'a OverrideSet>,
    depth: usize,
}

impl<'a> Injector<'a> {
    /// Child state for running a descriptor's construction function.
    /// Overrides deliberately do not propagate.
    pub(crate) fn descend(&self) -> DiResult<Injector<'a>> {
        if self.depth >= MAX_RESOLUTION_DEPTH {
            return Err(DiError::DepthExceeded(MAX_RESOLUTION_DEPTH));
        }
        Ok(Injector {
            inner: self.inner,
            scope: self.scope,
            overrides: None,
            depth: self.depth + 1,
        })
    }

    /// The same resolution state with explicit override values attached.
    pub(crate) fn with_overrides<'b>(&'b self, overrides: &'b OverrideSet) -> Injector<'b> {
        Injector {
            inner: self.inner,
            scope: self.scope,
            overrides: Some(overrides),
            depth: self.depth,
        }
    }

    /// Resolves `T` from the registry when it has a registration, otherwise
    /// constructs it by injecting its declared dependencies.
    ///
    /// Construction is a fallback only for types with no registration at
    /// all. A registered `T` that fails to resolve (say, a factory missing
    /// one of its own dependencies) is an error; a fresh instance is never
    /// substituted for a broken registration.
    pub fn get_or_construct<T: Construct>(&self) -> DiResult<Arc<T>> {
        let key = Key::of::<T>();
        if self.inner.registry.lookup(&key).is_some() {
            self.get::<T>()
        } else {
            let child = self.descend()?;
            T::construct(&child).map(Arc::new)
        }
    }
}

impl Resolver for Injector<'_> {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        if let Some(overrides) = self.overrides {
            if let Some(value) = overrides.get(&key.id()) {
                return Ok(value);
            }
        }
        self.inner.resolve_key(key, self)
    }
}

//! Contract decoration: replace a registration with a wrapper around the
//! original implementation.
//!
//! [`ServiceCollection::decorate`] looks up the existing descriptor for a
//! contract, captures it, and registers a replacement whose construction
//! function materializes the original exactly as the registry itself would
//! have, then hands it to the decorator's constructor. Consumers keep
//! resolving the contract as before; they just receive the wrapper.

use std::sync::Arc;

use log::debug;

use crate::collection::ServiceCollection;
use crate::descriptors::{AnyArc, CtorFn, ServiceDescriptor, Source};
use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::provider::{Injector, OverrideSet};

/// A type that wraps a contract's registered implementation.
///
/// `wrap` is the decorator's constructor: `inner` is the original
/// implementation, materialized from the registration that was replaced,
/// and `injector` resolves any further dependencies. Resolving the contract
/// itself through the injector inside `wrap` also yields the original
/// instance, never the decorated registration, so a decorator cannot
/// recurse into itself.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use interpose::{Decorator, DiResult, Injector};
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct LoudGreeter {
///     inner: Arc<dyn Greeter>,
/// }
///
/// impl Greeter for LoudGreeter {
///     fn greet(&self) -> String {
///         self.inner.greet().to_uppercase()
///     }
/// }
///
/// impl Decorator<dyn Greeter> for LoudGreeter {
///     fn wrap(inner: Arc<dyn Greeter>, _: &Injector<'_>) -> DiResult<Arc<dyn Greeter>> {
///         Ok(Arc::new(LoudGreeter { inner }))
///     }
/// }
/// ```
pub trait Decorator<C: ?Sized + Send + Sync + 'static>: Send + Sync + 'static {
    /// Builds the decorator around the original implementation.
    fn wrap(inner: Arc<C>, injector: &Injector<'_>) -> DiResult<Arc<C>>;
}

impl ServiceCollection {
    /// Replaces the registration for contract `C` with decorator `D`.
    ///
    /// The replacement keeps the original's lifetime, so how often the
    /// decorator (and the original inside it) is constructed is governed by
    /// the registry's own caching, unchanged. The original is materialized
    /// lazily, at resolution time, using its registered source: a stored
    /// instance is reused as-is, a factory is invoked, a constructible
    /// implementation type is resolved or constructed.
    ///
    /// Decorating an already-decorated contract wraps the current wrapper:
    /// each call adds one layer.
    ///
    /// # Errors
    ///
    /// [`DiError::NotRegistered`] when `C` has no existing registration;
    /// the collection is left untouched. Errors raised while materializing
    /// the original or constructing the decorator surface later, from the
    /// resolution that triggers them, without translation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use interpose::{Decorator, DiResult, Injector, Resolver, ServiceCollection};
    ///
    /// trait Greeter: Send + Sync {
    ///     fn greet(&self) -> String;
    /// }
    ///
    /// struct PlainGreeter;
    /// impl Greeter for PlainGreeter {
    ///     fn greet(&self) -> String {
    ///         "hello".to_string()
    ///     }
    /// }
    ///
    /// struct LoudGreeter {
    ///     inner: Arc<dyn Greeter>,
    /// }
    /// impl Greeter for LoudGreeter {
    ///     fn greet(&self) -> String {
    ///         self.inner.greet().to_uppercase()
    ///     }
    /// }
    /// impl Decorator<dyn Greeter> for LoudGreeter {
    ///     fn wrap(inner: Arc<dyn Greeter>, _: &Injector<'_>) -> DiResult<Arc<dyn Greeter>> {
    ///         Ok(Arc::new(LoudGreeter { inner }))
    ///     }
    /// }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(Arc::new(PlainGreeter) as Arc<dyn Greeter>);
    /// services.decorate::<dyn Greeter, LoudGreeter>()?;
    ///
    /// let provider = services.build();
    /// assert_eq!(provider.get_required::<dyn Greeter>().greet(), "HELLO");
    /// # Ok::<(), interpose::DiError>(())
    /// ```
    pub fn decorate<C, D>(&mut self) -> DiResult<&mut Self>
    where
        C: ?Sized + Send + Sync + 'static,
        D: Decorator<C>,
    {
        let key = Key::of::<C>();
        let wrapped = self
            .registry
            .lookup(&key)
            .cloned()
            .ok_or(DiError::NotRegistered(key.name()))?;
        let lifetime = wrapped.lifetime();
        debug!(
            "decorating {} with {}",
            key.name(),
            std::any::type_name::<D>()
        );

        let ctor: CtorFn = Arc::new(move |injector: &Injector<'_>| {
            let original = wrapped.materialize_as::<C>(injector)?;
            // The decorator's dependency on its own contract resolves to
            // the original, not back into this registration.
            let overrides = OverrideSet::single::<C>(original.clone());
            let injector = injector.with_overrides(&overrides);
            let decorated = D::wrap(original, &injector)?;
            Ok(Arc::new(decorated) as AnyArc)
        });

        self.registry.replace(ServiceDescriptor {
            key,
            lifetime,
            source: Source::Factory(ctor),
        });
        Ok(self)
    }
}

//! # interpose
//!
//! Contract decoration for dependency injection: replace a contract's
//! registration with a wrapper that transparently intercepts calls to the
//! original implementation, inspired by `IServiceCollection` decoration
//! extensions in Microsoft.Extensions.DependencyInjection.
//!
//! The one interesting operation is [`ServiceCollection::decorate`]: it
//! locates the existing registration for a contract, captures how that
//! registration materializes its instance (stored instance, factory, or
//! constructible implementation type), and swaps in a replacement that
//! lazily builds the original and feeds it to the decorator's constructor.
//! The contract's lifetime is preserved; consumers resolve the contract
//! exactly as before and receive the wrapper.
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use interpose::{
//!     Construct, Decorator, DiResult, Implementation, Injector, Resolver, ServiceCollection,
//! };
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, msg: &str) -> String;
//! }
//!
//! struct ConsoleLogger;
//! impl Logger for ConsoleLogger {
//!     fn log(&self, msg: &str) -> String {
//!         msg.to_string()
//!     }
//! }
//! impl Construct for ConsoleLogger {
//!     fn construct(_: &Injector<'_>) -> DiResult<Self> {
//!         Ok(ConsoleLogger)
//!     }
//! }
//! impl Implementation<dyn Logger> for ConsoleLogger {
//!     fn into_contract(self: Arc<Self>) -> Arc<dyn Logger> {
//!         self
//!     }
//! }
//!
//! struct TimestampLogger {
//!     inner: Arc<dyn Logger>,
//! }
//! impl Logger for TimestampLogger {
//!     fn log(&self, msg: &str) -> String {
//!         format!("[ts] {}", self.inner.log(msg))
//!     }
//! }
//! impl Decorator<dyn Logger> for TimestampLogger {
//!     fn wrap(inner: Arc<dyn Logger>, _: &Injector<'_>) -> DiResult<Arc<dyn Logger>> {
//!         Ok(Arc::new(TimestampLogger { inner }))
//!     }
//! }
//!
//! let mut services = ServiceCollection::new();
//! services.add_singleton_impl::<dyn Logger, ConsoleLogger>();
//! services.decorate::<dyn Logger, TimestampLogger>()?;
//!
//! let provider = services.build();
//! let logger = provider.get_required::<dyn Logger>();
//! assert_eq!(logger.log("hello"), "[ts] hello");
//! # Ok::<(), interpose::DiError>(())
//! ```
//!
//! ## Semantics
//!
//! - **Lifetime preservation**: the replacement descriptor keeps the
//!   original's lifetime, so the host caching decides how often the
//!   decorator runs — a decorated singleton is built once, a decorated
//!   transient on every resolution.
//! - **Materialization parity**: the original is produced through the same
//!   code path the registry itself uses, so the decorator sees exactly the
//!   instance an undecorated resolution would have produced. A stored
//!   instance is reused by reference, never reconstructed.
//! - **Cycle break**: a decorator may depend on the contract it decorates;
//!   that dependency is satisfied with the original instance, not
//!   recursively with the decorated registration.
//! - **Layering**: decorating twice wraps the wrapper. `decorate::<C, D1>`
//!   then `decorate::<C, D2>` resolves to `D2(D1(original))`.

pub mod collection;
pub mod decoration;
pub mod descriptors;
pub mod error;
pub mod key;
pub mod lifetime;
pub mod provider;
pub mod traits;

mod registry;

pub use collection::ServiceCollection;
pub use decoration::Decorator;
pub use descriptors::ServiceDescriptor;
pub use error::{DiError, DiResult};
pub use key::Key;
pub use lifetime::Lifetime;
pub use provider::{Injector, Scope, ServiceProvider};
pub use traits::{Construct, Implementation, Resolver};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn singleton_resolution_is_cached() {
        let mut sc = ServiceCollection::new();
        sc.add_singleton(Arc::new(42usize));

        let sp = sc.build();
        let a = sp.get_required::<usize>();
        let b = sp.get_required::<usize>();

        assert_eq!(*a, 42);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn transient_resolution_constructs_every_time() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();

        let mut sc = ServiceCollection::new();
        sc.add_transient_factory::<String, _>(move |_| {
            let n = counter_clone.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(Arc::new(format!("instance-{}", n)))
        });

        let sp = sc.build();
        assert_eq!(&*sp.get_required::<String>(), "instance-1");
        assert_eq!(&*sp.get_required::<String>(), "instance-2");
    }

    #[test]
    fn decorate_unregistered_contract_fails() {
        trait Anything: Send + Sync {}

        struct Passthrough;
        impl Anything for Passthrough {}
        impl Decorator<dyn Anything> for Passthrough {
            fn wrap(
                inner: Arc<dyn Anything>,
                _: &Injector<'_>,
            ) -> DiResult<Arc<dyn Anything>> {
                Ok(inner)
            }
        }

        let mut sc = ServiceCollection::new();
        let result = sc.decorate::<dyn Anything, Passthrough>();
        assert!(matches!(result, Err(DiError::NotRegistered(_))));
        assert!(sc.is_empty());
    }
}

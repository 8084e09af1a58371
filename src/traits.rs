//! Constructor-injection and resolution traits.

use std::any::Any;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::provider::Injector;

/// A type constructible by injecting its dependencies.
///
/// Rust has no runtime reflection, so constructible types declare their
/// dependency list explicitly: the body of `construct` resolves whatever
/// the type needs from the injector. Errors propagate to the resolution
/// that triggered construction.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use interpose::{Construct, DiResult, Injector, Resolver};
///
/// struct Config { url: String }
///
/// struct Database { config: Arc<Config> }
///
/// impl Construct for Database {
///     fn construct(injector: &Injector<'_>) -> DiResult<Self> {
///         Ok(Database { config: injector.get::<Config>()? })
///     }
/// }
/// ```
pub trait Construct: Sized + Send + Sync + 'static {
    /// Builds an instance, resolving dependencies from the injector.
    fn construct(injector: &Injector<'_>) -> DiResult<Self>;
}

/// Binds a constructible type to the contract it fulfills.
///
/// `into_contract` performs the unsizing step generic code cannot: inside
/// the impl, `Self` is concrete, so `Arc<Self>` coerces to `Arc<dyn C>`.
/// Every `Construct` type implements its own concrete contract via the
/// blanket impl; trait contracts take a one-line impl:
///
/// ```rust
/// use std::sync::Arc;
/// use interpose::{Construct, DiResult, Implementation, Injector};
///
/// trait Logger: Send + Sync {
///     fn log(&self, msg: &str);
/// }
///
/// struct ConsoleLogger;
/// impl Logger for ConsoleLogger {
///     fn log(&self, msg: &str) {
///         println!("{}", msg);
///     }
/// }
///
/// impl Construct for ConsoleLogger {
///     fn construct(_: &Injector<'_>) -> DiResult<Self> {
///         Ok(ConsoleLogger)
///     }
/// }
///
/// impl Implementation<dyn Logger> for ConsoleLogger {
///     fn into_contract(self: Arc<Self>) -> Arc<dyn Logger> {
///         self
///     }
/// }
/// ```
pub trait Implementation<C: ?Sized + Send + Sync + 'static>: Construct {
    /// Upcasts the constructed implementation to its contract.
    fn into_contract(self: Arc<Self>) -> Arc<C>;
}

impl<T: Construct> Implementation<T> for T {
    fn into_contract(self: Arc<Self>) -> Arc<T> {
        self
    }
}

/// Service resolution interface shared by the provider, scopes, and
/// injectors.
///
/// `resolve_any` is the object-level entry point; the generic `get` and
/// `get_required` defaults handle type erasure on top of it.
pub trait Resolver {
    /// Resolves a contract by key, type-erased.
    fn resolve_any(&self, key: &Key) -> DiResult<Arc<dyn Any + Send + Sync>>;

    /// Resolves a contract, returning an error when it is missing or the
    /// stored payload does not match.
    fn get<C>(&self) -> DiResult<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
        Self: Sized,
    {
        let key = Key::of::<C>();
        let payload = self.resolve_any(&key)?;
        payload
            .downcast::<Arc<C>>()
            .map(|outer| outer.as_ref().clone())
            .map_err(|_| DiError::TypeMismatch(key.name()))
    }

    /// Resolves a contract, panicking on failure. Use during wiring where a
    /// missing registration is a programming error.
    fn get_required<C>(&self) -> Arc<C>
    where
        C: ?Sized + Send + Sync + 'static,
        Self: Sized,
    {
        match self.get::<C>() {
            Ok(value) => value,
            Err(e) => panic!("Failed to resolve {}: {}", std::any::type_name::<C>(), e),
        }
    }
}

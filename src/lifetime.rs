//! Service lifetime definitions.

/// Lifetime governing how often a registration's construction function runs.
///
/// Decoration preserves the lifetime of the registration it replaces, so a
/// decorated singleton is still constructed once, a decorated transient on
/// every resolution, and a decorated scoped service once per scope.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use interpose::{ServiceCollection, Lifetime};
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Arc::new(42usize));
/// assert_eq!(services.descriptors().next().unwrap().lifetime(), Lifetime::Singleton);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// Single instance per root provider, cached forever.
    Singleton,
    /// Single instance per scope, cached for the scope's lifetime.
    Scoped,
    /// New instance per resolution, never cached.
    Transient,
}

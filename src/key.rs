//! Contract keys for registry storage and lookup.

use std::any::TypeId;

/// Identity of a contract in the registry.
///
/// A key is built from the contract's `TypeId` and works uniformly for
/// concrete types and trait objects: `Key::of::<Config>()` and
/// `Key::of::<dyn Logger>()` are both valid, since `dyn Trait` has a
/// `TypeId` of its own.
///
/// Equality and hashing use the `TypeId` only; the type name is carried
/// for diagnostics and error messages.
///
/// # Examples
///
/// ```rust
/// use interpose::Key;
///
/// trait Logger: Send + Sync {}
///
/// let a = Key::of::<dyn Logger>();
/// let b = Key::of::<dyn Logger>();
/// assert_eq!(a, b);
/// assert!(a.name().contains("Logger"));
/// assert_ne!(a, Key::of::<String>());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Key {
    id: TypeId,
    name: &'static str,
}

impl Key {
    /// Builds the key for a contract type.
    #[inline]
    pub fn of<C: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<C>(),
            name: std::any::type_name::<C>(),
        }
    }

    /// The contract's `TypeId`.
    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Human-readable contract name for diagnostics.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

// TypeId-only comparison: the name is display metadata.
impl PartialEq for Key {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Key {}

impl std::hash::Hash for Key {
    #[inline]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

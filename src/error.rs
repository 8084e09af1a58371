//! Error types for registration, decoration, and resolution.

use std::fmt;

/// Errors raised by the registry and the decoration step.
///
/// `NotRegistered` and `InvalidSource` are specific to decoration; the
/// remaining variants can surface from any resolution, decorated or not.
/// Decoration adds no translation: an error raised while materializing the
/// original implementation propagates to the caller unchanged.
///
/// # Examples
///
/// ```rust
/// use interpose::{ServiceCollection, DiError, Resolver};
///
/// let provider = ServiceCollection::new().build();
/// match provider.get::<String>() {
///     Err(DiError::NotFound(name)) => assert_eq!(name, "alloc::string::String"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone)]
pub enum DiError {
    /// Contract not registered at resolution time.
    NotFound(&'static str),
    /// Stored payload failed to downcast to the requested contract.
    TypeMismatch(&'static str),
    /// Decoration target has no existing registration. A wiring mistake by
    /// the caller; the registry is left untouched.
    NotRegistered(&'static str),
    /// The captured descriptor's payload could not be materialized as the
    /// contract type. Indicates a malformed descriptor; should not happen.
    InvalidSource(&'static str),
    /// Scoped service resolved outside a scope.
    WrongLifetime(&'static str),
    /// Maximum resolution depth exceeded (bounds cyclic dependency graphs).
    DepthExceeded(usize),
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::NotFound(name) => write!(f, "Service not found: {}", name),
            DiError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
            DiError::NotRegistered(name) => {
                write!(f, "Cannot decorate {}: not registered", name)
            }
            DiError::InvalidSource(name) => {
                write!(f, "No usable implementation source for: {}", name)
            }
            DiError::WrongLifetime(msg) => write!(f, "Lifetime error: {}", msg),
            DiError::DepthExceeded(depth) => write!(f, "Max depth {} exceeded", depth),
        }
    }
}

impl std::error::Error for DiError {}

/// Result type for registry operations.
pub type DiResult<T> = Result<T, DiError>;

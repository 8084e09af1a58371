//! Internal ordered descriptor storage.

use crate::descriptors::ServiceDescriptor;
use crate::key::Key;

/// Ordered collection of service descriptors.
///
/// Registrations append; duplicate contracts are allowed and lookup returns
/// the FIRST match. Decoration therefore only ever touches the first
/// registration for a contract, and resolution uses the same first-match
/// rule so a decorated contract resolves through its decorated descriptor.
pub(crate) struct Registry {
    entries: Vec<ServiceDescriptor>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, descriptor: ServiceDescriptor) {
        self.entries.push(descriptor);
    }

    /// First descriptor registered under `key`, if any.
    pub(crate) fn lookup(&self, key: &Key) -> Option<&ServiceDescriptor> {
        self.entries.iter().find(|d| d.key() == key)
    }

    /// Replaces the first descriptor with the same key, preserving its
    /// position. Returns false when no such descriptor exists.
    pub(crate) fn replace(&mut self, descriptor: ServiceDescriptor) -> bool {
        match self.entries.iter().position(|d| d.key() == descriptor.key()) {
            Some(idx) => {
                self.entries[idx] = descriptor;
                true
            }
            None => false,
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &ServiceDescriptor> {
        self.entries.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

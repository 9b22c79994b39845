//! Entries stored in a table.

use crate::Network;

/// A registered prefix together with its value.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Entry<T> {
    pub(crate) prefix: Network,
    pub(crate) value: T,
}

impl<T> Entry<T> {
    /// The registered prefix, with all host bits cleared.
    pub fn prefix(&self) -> &Network {
        &self.prefix
    }

    /// The value stored for the prefix.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consume the entry and return its value.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Consume the entry and return both the prefix and the value.
    pub fn into_parts(self) -> (Network, T) {
        (self.prefix, self.value)
    }
}

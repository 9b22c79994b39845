//! Errors returned by table modifications.

use thiserror::Error;

use crate::Family;

/// Error returned when a prefix cannot be inserted into or removed from a table. Lookups never
/// fail; an unusable address simply has no match.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The address does not have the byte length of the table's family, e.g., an IPv6 prefix was
    /// given to an IPv4 table. The table is left untouched.
    #[error("address family mismatch: expected a {expected} address, got {found} bytes")]
    FamilyMismatch {
        /// Family the table was created with.
        expected: Family,
        /// Byte length of the rejected address.
        found: usize,
    },

    /// The prefix length exceeds the number of bits in the address.
    #[error("prefix length {len} exceeds the address width of {max} bits")]
    InvalidPrefixLength {
        /// The rejected prefix length.
        len: u8,
        /// Width of the address in bits.
        max: u8,
    },

    /// The text could not be parsed as a prefix in CIDR notation.
    #[error("malformed prefix {0:?}")]
    Malformed(String),
}

//! This crate provides a longest-prefix-match table for IPv4 and IPv6 prefixes, built as a
//! byte-wise radix trie. Any lookup returns the entry of the most specific prefix containing the
//! address. Prefixes can be given as raw bytes, as CIDR text, or as any type implementing
//! [`Prefix`]: [ipnet](https://docs.rs/ipnet) (default feature `ipnet`),
//! [ipnetwork](https://crates.io/crates/ipnetwork) (feature `ipnetwork`),
//! [cidr](https://crates.io/crates/cidr) (feature `cidr`), or any tuple `(R, u8)` where `R` is an
//! unsigned primitive integer.
//!
//! ```
//! # use radix_lpm::*;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut table = LpmTable::new(Family::Ipv4);
//! table.insert_str("192.168.0.0/24", "A")?;
//! table.insert_str("192.168.0.1/32", "B")?;
//! assert_eq!(table.lookup_str("192.168.0.1").map(Entry::value), Some(&"B"));
//! assert_eq!(table.lookup_str("192.168.0.5").map(Entry::value), Some(&"A"));
//! assert_eq!(table.lookup_str("10.0.0.1"), None);
//! # Ok(())
//! # }
//! ```
//!
//! # Description of the Tree
//!
//! Each node of the trie has 256 children, one for every value of the next address byte, and 8
//! entry slots. A prefix of length `L` is stored in the node reached by following its first
//! `ceil(L / 8)` bytes from the root (host bits cleared), in slot `(L + 7) % 8`. Slot 7 holds the
//! prefix ending at the byte boundary, and slot `k < 7` holds the prefix using the upper `k + 1`
//! bits of the last byte. Up to eight prefixes that share the same masked byte path can thus live
//! in a single node. The zero-length prefix is not part of the trie, but stored as the default
//! entry of the table.
//!
//! Nodes are created on demand while inserting. Each node counts its children and entries. When
//! a removal leaves a node with neither, it is freed, and so are all its ancestors that become
//! empty in turn. A table where every prefix was removed again consists of the root alone.
//!
//! # Lookup
//!
//! A lookup descends the trie along the address bytes as far as possible, remembering the parent
//! node at every depth. It then searches the depths from the deepest to the root. At each depth,
//! the address byte is probed with its lowest `0, 1, ..., 7` bits cleared, and in the child
//! selected by each probe only the slots still compatible with the probe are scanned, longest
//! first. The first hit is the longest matching prefix. Without a hit, the default entry is
//! returned.
//!
//! | Operation                          | Complexity |
//! |------------------------------------|------------|
//! | `insert`, `remove`                 | `O(N)`     |
//! | `lookup`                           | `O(8 * N)` |
//! | `get`, `get_mut`, `contains_key`   | `O(N)`     |
//! | `iter`, `group_by_len`             | `O(n)`     |
//! | `len`, `is_empty`                  | `O(1)`     |
//!
//! Here, `N` is the address length in bytes (4 or 16), and `n` the number of nodes in the trie.
//!
//! # Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade: every modification on level
//! `trace`, and the nodes freed by a removal on level `debug`.

#![deny(missing_docs)]

mod error;
mod family;
mod fmt;
mod node;
mod prefix;
#[cfg(feature = "serde")]
mod serde;

pub mod joint;
pub mod table;

#[cfg(test)]
mod fuzzing;

pub use error::Error;
pub use family::Family;
pub use joint::{JointLpmTable, JointPrefix};
pub use prefix::{Address, Network, Octets, Prefix};
pub use table::{Entry, LpmTable};

//! Implementation of the longest-prefix-match table.

use log::{debug, trace};

use crate::family::MAX_ADDR_LEN;
use crate::node::{Nodes, ROOT};
use crate::{Address, Error, Family, Network, Prefix};

mod entry;
mod iter;
mod text;

pub use entry::*;
pub use iter::*;

/// Longest-prefix-match table over a byte-wise 256-way trie.
///
/// A table is created for a single [`Family`]. Prefixes of length zero are kept as the default
/// entry outside of the trie, all other prefixes live in the node reached by the bytes they
/// cover.
#[derive(Clone)]
pub struct LpmTable<T> {
    nodes: Nodes<T>,
    default: Option<Entry<T>>,
    family: Family,
    len: usize,
}

impl<T> LpmTable<T> {
    /// Create an empty table for addresses of the given family.
    pub fn new(family: Family) -> Self {
        Self {
            nodes: Nodes::default(),
            default: None,
            family,
            len: 0,
        }
    }

    /// Create an empty table for IPv4 addresses.
    pub fn ipv4() -> Self {
        Self::new(Family::Ipv4)
    }

    /// Create an empty table for IPv6 addresses.
    pub fn ipv6() -> Self {
        Self::new(Family::Ipv6)
    }

    /// The address family of the table.
    pub fn family(&self) -> Family {
        self.family
    }

    /// Number of entries in the table, including the default entry.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of trie nodes currently in use, including the root. An empty table has exactly one
    /// node.
    ///
    /// ```
    /// # use radix_lpm::*;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut table = LpmTable::ipv4();
    /// table.insert_str("1.1.1.1/32", ())?;
    /// assert_eq!(table.node_count(), 5);
    /// table.remove_str("1.1.1.1/32")?;
    /// assert_eq!(table.node_count(), 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn node_count(&self) -> usize {
        self.nodes.live_nodes()
    }

    /// Remove all entries, keeping the family.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.default = None;
        self.len = 0;
    }

    /// The entry for the zero-length prefix, if any. It matches every address of the family.
    pub fn default_entry(&self) -> Option<&Entry<T>> {
        self.default.as_ref()
    }

    /// Insert a value for a prefix, replacing and returning the previous value stored for the
    /// same prefix. Host bits of the prefix are ignored.
    ///
    /// ```
    /// # use radix_lpm::*;
    /// # use ipnet::{Ipv4Net, Ipv6Net};
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut table = LpmTable::ipv4();
    /// assert_eq!(table.insert("192.168.0.0/24".parse::<Ipv4Net>()?, 1)?, None);
    /// assert_eq!(table.insert("192.168.0.0/24".parse::<Ipv4Net>()?, 2)?, Some(1));
    /// assert_eq!(table.len(), 1);
    /// assert_eq!(
    ///     table.insert("2001:db8::/32".parse::<Ipv6Net>()?, 3),
    ///     Err(Error::FamilyMismatch { expected: Family::Ipv4, found: 16 })
    /// );
    /// # Ok(())
    /// # }
    /// ```
    pub fn insert<P: Prefix>(&mut self, prefix: P, value: T) -> Result<Option<T>, Error> {
        let octets = prefix.to_octets();
        self.insert_octets(octets.as_slice(), prefix.prefix_len(), value)
    }

    /// Insert a value for the prefix given by raw address bytes and a prefix length.
    ///
    /// Fails with [`Error::FamilyMismatch`] if `addr` does not have the table's address length,
    /// and with [`Error::InvalidPrefixLength`] if `len` exceeds the address width. The table is
    /// not modified on error.
    pub fn insert_octets(&mut self, addr: &[u8], len: u8, value: T) -> Result<Option<T>, Error> {
        let prefix = Network::new(self.family, addr, len)?;
        trace!("insert {prefix}");

        let entry = Entry { prefix, value };
        let old = if len == 0 {
            self.default.replace(entry)
        } else {
            let mut idx = ROOT;
            for &byte in prefix.path() {
                idx = self.nodes.child_or_insert(idx, byte);
            }
            self.nodes[idx].set(prefix.slot(), entry)
        };

        if old.is_none() {
            self.len += 1;
        }
        Ok(old.map(Entry::into_value))
    }

    /// Remove the value stored for exactly this prefix and return it. Removing a prefix that is
    /// not in the table is not an error. Nodes left without entries or children are freed.
    ///
    /// ```
    /// # use radix_lpm::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut table = LpmTable::ipv4();
    /// let prefix: Ipv4Net = "10.0.0.0/8".parse()?;
    /// table.insert(prefix, 1)?;
    /// assert_eq!(table.remove(&prefix)?, Some(1));
    /// assert_eq!(table.remove(&prefix)?, None);
    /// assert!(table.is_empty());
    /// # Ok(())
    /// # }
    /// ```
    pub fn remove<P: Prefix>(&mut self, prefix: &P) -> Result<Option<T>, Error> {
        let octets = prefix.to_octets();
        self.remove_octets(octets.as_slice(), prefix.prefix_len())
    }

    /// Remove the value stored for the prefix given by raw address bytes and a prefix length.
    /// Fails under the same conditions as [`LpmTable::insert_octets`].
    pub fn remove_octets(&mut self, addr: &[u8], len: u8) -> Result<Option<T>, Error> {
        let prefix = Network::new(self.family, addr, len)?;
        trace!("remove {prefix}");

        let old = if len == 0 {
            self.default.take()
        } else {
            self.remove_from_trie(&prefix)
        };

        if old.is_some() {
            self.len -= 1;
        }
        Ok(old.map(Entry::into_value))
    }

    /// Find the entry with the longest prefix that contains `addr`, falling back to the default
    /// entry. Addresses of another family never match.
    ///
    /// ```
    /// # use radix_lpm::*;
    /// # use std::net::Ipv4Addr;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut table = LpmTable::ipv4();
    /// table.insert_str("10.0.0.0/8", 'a')?;
    /// table.insert_str("10.10.128.0/17", 'c')?;
    /// let hit = table.lookup(&Ipv4Addr::new(10, 10, 200, 1)).unwrap();
    /// assert_eq!(hit.value(), &'c');
    /// assert_eq!(hit.prefix().to_string(), "10.10.128.0/17");
    /// assert_eq!(table.lookup(&Ipv4Addr::new(10, 20, 0, 1)).map(Entry::value), Some(&'a'));
    /// assert_eq!(table.lookup(&Ipv4Addr::new(8, 8, 8, 8)), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn lookup<A: Address>(&self, addr: &A) -> Option<&Entry<T>> {
        self.lookup_octets(addr.to_octets().as_slice())
    }

    /// Find the entry with the longest prefix that contains the raw address `addr`.
    pub fn lookup_octets(&self, addr: &[u8]) -> Option<&Entry<T>> {
        if addr.len() != self.family.addr_len() {
            return None;
        }

        // parent node at each depth, i.e., before consuming `addr[depth]`
        let mut trail = [ROOT; MAX_ADDR_LEN];
        let mut depth = 0;
        let mut idx = ROOT;
        for &byte in addr {
            trail[depth] = idx;
            depth += 1;
            match self.nodes.child(idx, byte) {
                Some(child) => idx = child,
                None => break,
            }
        }

        (0..depth)
            .rev()
            .find_map(|d| self.nodes.search(trail[d], addr[d]))
            .or(self.default.as_ref())
    }

    /// Get the value stored for exactly this prefix.
    ///
    /// ```
    /// # use radix_lpm::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut table = LpmTable::ipv4();
    /// table.insert("192.168.1.0/24".parse::<Ipv4Net>()?, 1)?;
    /// assert_eq!(table.get(&"192.168.1.0/24".parse::<Ipv4Net>()?), Some(&1));
    /// assert_eq!(table.get(&"192.168.1.0/25".parse::<Ipv4Net>()?), None);
    /// assert_eq!(table.get(&"192.168.0.0/23".parse::<Ipv4Net>()?), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn get<P: Prefix>(&self, prefix: &P) -> Option<&T> {
        let prefix = self.network(prefix)?;
        self.find(&prefix).map(Entry::value)
    }

    /// Get a mutable reference to the value stored for exactly this prefix.
    pub fn get_mut<P: Prefix>(&mut self, prefix: &P) -> Option<&mut T> {
        let prefix = self.network(prefix)?;
        if prefix.prefix_len() == 0 {
            return self.default.as_mut().map(|e| &mut e.value);
        }
        let idx = self.node_of(&prefix)?;
        self.nodes[idx].slots[prefix.slot()]
            .as_mut()
            .map(|e| &mut e.value)
    }

    /// Check if a value is stored for exactly this prefix.
    pub fn contains_key<P: Prefix>(&self, prefix: &P) -> bool {
        self.get(prefix).is_some()
    }
}

/// Private function implementations
impl<T> LpmTable<T> {
    /// Convert a prefix to a network of the table's family, or `None` if it does not fit.
    fn network<P: Prefix>(&self, prefix: &P) -> Option<Network> {
        let octets = prefix.to_octets();
        Network::new(self.family, octets.as_slice(), prefix.prefix_len()).ok()
    }

    /// Walk the path of a non-zero-length prefix without creating nodes.
    fn node_of(&self, prefix: &Network) -> Option<usize> {
        let mut idx = ROOT;
        for &byte in prefix.path() {
            idx = self.nodes.child(idx, byte)?;
        }
        Some(idx)
    }

    fn find(&self, prefix: &Network) -> Option<&Entry<T>> {
        if prefix.prefix_len() == 0 {
            return self.default.as_ref();
        }
        let idx = self.node_of(prefix)?;
        self.nodes[idx].slots[prefix.slot()].as_ref()
    }

    /// Clear the slot of a non-zero-length prefix, then free every node on the path that was
    /// left vacant, from the bottom up.
    fn remove_from_trie(&mut self, prefix: &Network) -> Option<Entry<T>> {
        let path = prefix.path();
        let mut trail = [ROOT; MAX_ADDR_LEN + 1];
        for (depth, &byte) in path.iter().enumerate() {
            trail[depth + 1] = self.nodes.child(trail[depth], byte)?;
        }

        let old = self.nodes[trail[path.len()]].take(prefix.slot())?;

        let mut pruned = 0;
        for depth in (1..=path.len()).rev() {
            if !self.nodes[trail[depth]].is_vacant() {
                break;
            }
            self.nodes.detach(trail[depth - 1], path[depth - 1]);
            pruned += 1;
        }
        if pruned > 0 {
            debug!("pruned {pruned} nodes after removing {prefix}");
        }

        Some(old)
    }
}

impl<T: PartialEq> PartialEq for LpmTable<T> {
    fn eq(&self, other: &Self) -> bool {
        self.family == other.family && self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for LpmTable<T> {}

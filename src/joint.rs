//! A table holding both IPv4 and IPv6 prefixes, backed by one [`LpmTable`] per family.

use std::iter::Chain;
use std::net::IpAddr;

use either::Either;

use crate::table::{Entry, Iter};
use crate::{Address, Error, Family, LpmTable, Network, Prefix};

macro_rules! fork {
    ($self:ident . $func:ident ($prefix:expr $(, $args:expr)*)) => {
        match $prefix.v4_or_v6() {
            Either::Left(p) => $self.v4.$func(p $(, $args)*),
            Either::Right(p) => $self.v6.$func(p $(, $args)*),
        }
    };
}

/// Trait for prefix types that describe either an IPv4 or an IPv6 prefix.
pub trait JointPrefix {
    /// The IPv4 variant.
    type V4: Prefix;
    /// The IPv6 variant.
    type V6: Prefix;

    /// Get either `Left(V4)` or `Right(V6)`, as a reference.
    fn v4_or_v6(&self) -> Either<&Self::V4, &Self::V6>;
}

impl JointPrefix for Network {
    type V4 = Network;
    type V6 = Network;

    fn v4_or_v6(&self) -> Either<&Network, &Network> {
        match self.family() {
            Family::Ipv4 => Either::Left(self),
            Family::Ipv6 => Either::Right(self),
        }
    }
}

#[cfg(feature = "ipnet")]
impl JointPrefix for ipnet::IpNet {
    type V4 = ipnet::Ipv4Net;
    type V6 = ipnet::Ipv6Net;

    fn v4_or_v6(&self) -> Either<&ipnet::Ipv4Net, &ipnet::Ipv6Net> {
        match self {
            ipnet::IpNet::V4(p) => Either::Left(p),
            ipnet::IpNet::V6(p) => Either::Right(p),
        }
    }
}

#[cfg(feature = "ipnetwork")]
impl JointPrefix for ipnetwork::IpNetwork {
    type V4 = ipnetwork::Ipv4Network;
    type V6 = ipnetwork::Ipv6Network;

    fn v4_or_v6(&self) -> Either<&ipnetwork::Ipv4Network, &ipnetwork::Ipv6Network> {
        match self {
            ipnetwork::IpNetwork::V4(p) => Either::Left(p),
            ipnetwork::IpNetwork::V6(p) => Either::Right(p),
        }
    }
}

#[cfg(feature = "cidr")]
impl JointPrefix for cidr::IpCidr {
    type V4 = cidr::Ipv4Cidr;
    type V6 = cidr::Ipv6Cidr;

    fn v4_or_v6(&self) -> Either<&cidr::Ipv4Cidr, &cidr::Ipv6Cidr> {
        match self {
            cidr::IpCidr::V4(p) => Either::Left(p),
            cidr::IpCidr::V6(p) => Either::Right(p),
        }
    }
}

/// Longest-prefix-match table for both address families. Every prefix is stored in the table of
/// its own family, and lookups only consult the table matching the address.
///
/// ```
/// # use radix_lpm::*;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut table = JointLpmTable::new();
/// table.insert_str("0.0.0.0/0", "v4 default")?;
/// table.insert_str("::/0", "v6 default")?;
/// table.insert_str("2001:db8::/32", "doc")?;
/// assert_eq!(table.lookup_str("10.0.0.1").map(Entry::value), Some(&"v4 default"));
/// assert_eq!(table.lookup_str("2001:db8::1").map(Entry::value), Some(&"doc"));
/// assert_eq!(table.lookup_str("fe80::1").map(Entry::value), Some(&"v6 default"));
/// assert_eq!(table.len(), 3);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct JointLpmTable<T> {
    v4: LpmTable<T>,
    v6: LpmTable<T>,
}

impl<T> Default for JointLpmTable<T> {
    fn default() -> Self {
        Self {
            v4: LpmTable::ipv4(),
            v6: LpmTable::ipv6(),
        }
    }
}

impl<T> JointLpmTable<T> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The table holding all prefixes of `family`.
    pub fn table(&self, family: Family) -> &LpmTable<T> {
        match family {
            Family::Ipv4 => &self.v4,
            Family::Ipv6 => &self.v6,
        }
    }

    /// The table holding all prefixes of `family`, as a mutable reference.
    pub fn table_mut(&mut self, family: Family) -> &mut LpmTable<T> {
        match family {
            Family::Ipv4 => &mut self.v4,
            Family::Ipv6 => &mut self.v6,
        }
    }

    /// Number of entries in both tables.
    pub fn len(&self) -> usize {
        self.v4.len() + self.v6.len()
    }

    /// Returns `true` if neither table has entries.
    pub fn is_empty(&self) -> bool {
        self.v4.is_empty() && self.v6.is_empty()
    }

    /// Remove all entries of both families.
    pub fn clear(&mut self) {
        self.v4.clear();
        self.v6.clear();
    }

    /// Insert a value for a prefix into the table of its family, returning the previous value.
    pub fn insert<P: JointPrefix>(&mut self, prefix: P, value: T) -> Result<Option<T>, Error> {
        fork!(self.insert(prefix, value))
    }

    /// Remove the value stored for exactly this prefix.
    pub fn remove<P: JointPrefix>(&mut self, prefix: &P) -> Result<Option<T>, Error> {
        fork!(self.remove(prefix))
    }

    /// Get the value stored for exactly this prefix.
    pub fn get<P: JointPrefix>(&self, prefix: &P) -> Option<&T> {
        fork!(self.get(prefix))
    }

    /// Get a mutable reference to the value stored for exactly this prefix.
    pub fn get_mut<P: JointPrefix>(&mut self, prefix: &P) -> Option<&mut T> {
        fork!(self.get_mut(prefix))
    }

    /// Check if a value is stored for exactly this prefix.
    pub fn contains_key<P: JointPrefix>(&self, prefix: &P) -> bool {
        fork!(self.contains_key(prefix))
    }

    /// Find the longest matching entry in the table of the address' family. Addresses that are
    /// neither 4 nor 16 bytes long have no match.
    pub fn lookup<A: Address>(&self, addr: &A) -> Option<&Entry<T>> {
        let octets = addr.to_octets();
        let family = Family::from_addr_len(octets.len())?;
        self.table(family).lookup_octets(octets.as_slice())
    }

    /// Parse `cidr` and insert `value` into the table of its family.
    pub fn insert_str(&mut self, cidr: &str, value: T) -> Result<Option<T>, Error> {
        let prefix: Network = cidr.parse()?;
        self.insert(prefix, value)
    }

    /// Parse `cidr` and remove the value stored for it.
    pub fn remove_str(&mut self, cidr: &str) -> Result<Option<T>, Error> {
        let prefix: Network = cidr.parse()?;
        self.remove(&prefix)
    }

    /// Parse `addr` and look up its longest matching entry.
    pub fn lookup_str(&self, addr: &str) -> Option<&Entry<T>> {
        let addr: IpAddr = addr.parse().ok()?;
        self.lookup(&addr)
    }

    /// An iterator over all IPv4 entries followed by all IPv6 entries.
    pub fn iter(&self) -> Chain<Iter<'_, T>, Iter<'_, T>> {
        self.v4.iter().chain(self.v6.iter())
    }
}

impl<'a, T> IntoIterator for &'a JointLpmTable<T> {
    type Item = &'a Entry<T>;
    type IntoIter = Chain<Iter<'a, T>, Iter<'a, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn families_are_isolated() {
        let mut table = JointLpmTable::new();
        table.insert_str("0.0.0.0/0", 4).unwrap();
        assert_eq!(table.lookup_str("::1"), None);
        assert_eq!(table.lookup_str("1.2.3.4").map(Entry::value), Some(&4));
        table.insert_str("::/0", 6).unwrap();
        assert_eq!(table.lookup_str("::1").map(Entry::value), Some(&6));
        assert_eq!(table.table(Family::Ipv4).len(), 1);
        assert_eq!(table.table(Family::Ipv6).len(), 1);

        assert_eq!(table.remove_str("0.0.0.0/0"), Ok(Some(4)));
        assert_eq!(table.lookup_str("1.2.3.4"), None);
        assert_eq!(table.lookup(&[0u8; 16]).map(Entry::value), Some(&6));
    }

    #[test]
    fn exact_match_and_iteration_order() {
        let mut table = JointLpmTable::new();
        table.insert_str("2001:db8::/32", 'a').unwrap();
        table.insert_str("10.0.0.0/8", 'b').unwrap();
        table.insert_str("10.1.0.0/16", 'c').unwrap();

        let p: Network = "10.1.0.0/16".parse().unwrap();
        assert!(table.contains_key(&p));
        *table.get_mut(&p).unwrap() = 'd';
        assert_eq!(table.get(&p), Some(&'d'));

        let values: Vec<char> = table.iter().map(|e| *e.value()).collect();
        assert_eq!(values, vec!['b', 'd', 'a']);

        table.clear();
        assert!(table.is_empty());
    }

    #[cfg(feature = "ipnet")]
    #[test]
    fn ipnet_dispatch() {
        let mut table = JointLpmTable::new();
        let v4: ipnet::IpNet = "192.168.0.0/16".parse().unwrap();
        let v6: ipnet::IpNet = "fd00::/8".parse().unwrap();
        table.insert(v4, 1).unwrap();
        table.insert(v6, 2).unwrap();
        assert_eq!(table.get(&v4), Some(&1));
        assert_eq!(table.get(&v6), Some(&2));
        assert_eq!(
            table.lookup(&"fd12::1".parse::<IpAddr>().unwrap()).map(Entry::value),
            Some(&2)
        );
        assert_eq!(table.remove(&v6), Ok(Some(2)));
        assert_eq!(table.len(), 1);
    }
}

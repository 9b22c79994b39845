//! Text front-ends that accept prefixes in CIDR notation and addresses as strings.

use std::net::IpAddr;

use crate::{Error, Network};

use super::{Entry, LpmTable};

impl<T> LpmTable<T> {
    /// Parse `cidr` (e.g., `"10.0.0.0/8"` or `"2001:db8::/32"`) and insert `value` for it.
    ///
    /// ```
    /// # use radix_lpm::*;
    /// let mut table = LpmTable::ipv4();
    /// assert_eq!(table.insert_str("10.0.0.0/8", 1), Ok(None));
    /// assert_eq!(table.insert_str("10.0.0.0/8", 2), Ok(Some(1)));
    /// assert_eq!(
    ///     table.insert_str("3.3.3.3/33", 3),
    ///     Err(Error::InvalidPrefixLength { len: 33, max: 32 })
    /// );
    /// assert_eq!(
    ///     table.insert_str("1234::1::1/128", 4),
    ///     Err(Error::Malformed("1234::1::1/128".to_string()))
    /// );
    /// assert!(table.insert_str("2001:db8::/32", 5).is_err());
    /// ```
    pub fn insert_str(&mut self, cidr: &str, value: T) -> Result<Option<T>, Error> {
        let prefix: Network = cidr.parse()?;
        self.insert(prefix, value)
    }

    /// Parse `cidr` and remove the value stored for it.
    pub fn remove_str(&mut self, cidr: &str) -> Result<Option<T>, Error> {
        let prefix: Network = cidr.parse()?;
        self.remove(&prefix)
    }

    /// Parse `addr` (e.g., `"10.1.2.3"`) and look up its longest matching entry. Text that is not
    /// an address has no match.
    pub fn lookup_str(&self, addr: &str) -> Option<&Entry<T>> {
        let addr: IpAddr = addr.parse().ok()?;
        self.lookup(&addr)
    }
}

//! Address family of a table.

use std::fmt;

/// Longest address (in bytes) any table can hold.
pub(crate) const MAX_ADDR_LEN: usize = 16;

/// The address family a [`crate::LpmTable`] is configured for. Every address inserted into,
/// removed from, or looked up in a table must have exactly [`Family::addr_len`] bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(::serde::Serialize, ::serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Family {
    /// 4-byte addresses, prefix lengths `0..=32`.
    Ipv4,
    /// 16-byte addresses, prefix lengths `0..=128`.
    Ipv6,
}

impl Family {
    /// Pick the family from a flag, `true` selecting IPv6.
    ///
    /// ```
    /// # use radix_lpm::Family;
    /// assert_eq!(Family::from_ipv6(false), Family::Ipv4);
    /// assert_eq!(Family::from_ipv6(true), Family::Ipv6);
    /// ```
    pub fn from_ipv6(is_ipv6: bool) -> Self {
        if is_ipv6 {
            Family::Ipv6
        } else {
            Family::Ipv4
        }
    }

    /// Get the family whose addresses are exactly `len` bytes long.
    ///
    /// ```
    /// # use radix_lpm::Family;
    /// assert_eq!(Family::from_addr_len(4), Some(Family::Ipv4));
    /// assert_eq!(Family::from_addr_len(16), Some(Family::Ipv6));
    /// assert_eq!(Family::from_addr_len(8), None);
    /// ```
    pub fn from_addr_len(len: usize) -> Option<Self> {
        match len {
            4 => Some(Family::Ipv4),
            16 => Some(Family::Ipv6),
            _ => None,
        }
    }

    /// Number of bytes in an address of this family.
    #[inline(always)]
    pub fn addr_len(&self) -> usize {
        match self {
            Family::Ipv4 => 4,
            Family::Ipv6 => MAX_ADDR_LEN,
        }
    }

    /// The longest prefix length of this family, i.e., the address width in bits.
    #[inline(always)]
    pub fn max_prefix_len(&self) -> u8 {
        (self.addr_len() * 8) as u8
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Ipv4 => f.write_str("IPv4"),
            Family::Ipv6 => f.write_str("IPv6"),
        }
    }
}

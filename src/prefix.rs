//! Binary prefixes and addresses, and the traits that convert external types into them.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

#[cfg(feature = "ipnet")]
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
#[cfg(feature = "ipnetwork")]
use ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network};
use num_traits::{PrimInt, ToPrimitive, Unsigned, Zero};

use crate::family::MAX_ADDR_LEN;
use crate::{Error, Family};

/// Raw address bytes in network byte order (most significant byte first), holding at most 16
/// bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Octets {
    buf: [u8; MAX_ADDR_LEN],
    len: u8,
}

impl Octets {
    /// Copy `bytes` into a new buffer. Returns `None` if `bytes` is longer than 16 bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() > MAX_ADDR_LEN {
            return None;
        }
        let mut buf = [0; MAX_ADDR_LEN];
        buf[..bytes.len()].copy_from_slice(bytes);
        Some(Self {
            buf,
            len: bytes.len() as u8,
        })
    }

    /// The address bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len as usize]
    }

    /// Number of address bytes.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Returns `true` if the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl AsRef<[u8]> for Octets {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl From<[u8; 4]> for Octets {
    fn from(bytes: [u8; 4]) -> Self {
        let mut buf = [0; MAX_ADDR_LEN];
        buf[..4].copy_from_slice(&bytes);
        Self { buf, len: 4 }
    }
}

impl From<[u8; 16]> for Octets {
    fn from(buf: [u8; 16]) -> Self {
        Self { buf, len: 16 }
    }
}

impl From<Ipv4Addr> for Octets {
    fn from(addr: Ipv4Addr) -> Self {
        addr.octets().into()
    }
}

impl From<Ipv6Addr> for Octets {
    fn from(addr: Ipv6Addr) -> Self {
        addr.octets().into()
    }
}

impl From<IpAddr> for Octets {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(a) => a.into(),
            IpAddr::V6(a) => a.into(),
        }
    }
}

/// A network prefix as stored in the table: the network address with all host bits cleared, its
/// family, and the prefix length.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Network {
    family: Family,
    buf: [u8; MAX_ADDR_LEN],
    len: u8,
}

impl Network {
    /// Create a new network from raw address bytes and a prefix length. Host bits beyond `len`
    /// are cleared.
    ///
    /// ```
    /// # use radix_lpm::{Family, Network};
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let net = Network::new(Family::Ipv4, &[192, 168, 1, 77], 24)?;
    /// assert_eq!(net.addr(), &[192, 168, 1, 0]);
    /// assert_eq!(net.to_string(), "192.168.1.0/24");
    /// assert!(Network::new(Family::Ipv4, &[0; 16], 24).is_err());
    /// assert!(Network::new(Family::Ipv4, &[0; 4], 33).is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(family: Family, addr: &[u8], len: u8) -> Result<Self, Error> {
        if addr.len() != family.addr_len() {
            return Err(Error::FamilyMismatch {
                expected: family,
                found: addr.len(),
            });
        }
        if len > family.max_prefix_len() {
            return Err(Error::InvalidPrefixLength {
                len,
                max: family.max_prefix_len(),
            });
        }
        let mut buf = [0; MAX_ADDR_LEN];
        for (i, (b, a)) in buf.iter_mut().zip(addr).enumerate() {
            let bits = (len as usize).saturating_sub(i * 8).min(8) as u8;
            *b = a & mask_from_prefix_len::<u8>(bits);
        }
        Ok(Self { family, buf, len })
    }

    /// Create a new network from an IP address and a prefix length. Host bits are cleared.
    pub fn from_ip(addr: IpAddr, len: u8) -> Result<Self, Error> {
        match addr {
            IpAddr::V4(a) => Self::new(Family::Ipv4, &a.octets(), len),
            IpAddr::V6(a) => Self::new(Family::Ipv6, &a.octets(), len),
        }
    }

    /// The network address bytes (host bits are zero).
    pub fn addr(&self) -> &[u8] {
        &self.buf[..self.family.addr_len()]
    }

    /// The network address as IP address.
    pub fn ip(&self) -> IpAddr {
        match self.family {
            Family::Ipv4 => IpAddr::V4(Ipv4Addr::new(
                self.buf[0],
                self.buf[1],
                self.buf[2],
                self.buf[3],
            )),
            Family::Ipv6 => IpAddr::V6(Ipv6Addr::from(self.buf)),
        }
    }

    /// Prefix length in bits.
    pub fn prefix_len(&self) -> u8 {
        self.len
    }

    /// Address family of the network.
    pub fn family(&self) -> Family {
        self.family
    }

    /// Check if `addr` lies within this network. Addresses of another length are never
    /// contained.
    ///
    /// ```
    /// # use radix_lpm::Network;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let net: Network = "10.10.128.0/17".parse()?;
    /// assert!(net.contains(&[10, 10, 200, 1]));
    /// assert!(!net.contains(&[10, 10, 1, 1]));
    /// assert!(!net.contains(&[0; 16]));
    /// # Ok(())
    /// # }
    /// ```
    pub fn contains(&self, addr: &[u8]) -> bool {
        addr.len() == self.family.addr_len()
            && addr.iter().zip(self.addr()).enumerate().all(|(i, (a, n))| {
                let bits = (self.len as usize).saturating_sub(i * 8).min(8) as u8;
                a & mask_from_prefix_len::<u8>(bits) == *n
            })
    }

    /// The bytes consumed while descending from the root to the node that owns this prefix.
    #[inline(always)]
    pub(crate) fn path(&self) -> &[u8] {
        &self.buf[..(self.len as usize + 7) / 8]
    }

    /// The entry slot within the owning node. Slot 7 means the prefix ends on a byte boundary,
    /// slot `k < 7` means it uses `k + 1` bits of the last byte on the path.
    #[inline(always)]
    pub(crate) fn slot(&self) -> usize {
        (self.len as usize + 7) % 8
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.ip(), self.len)
    }
}

impl FromStr for Network {
    type Err = Error;

    /// Parse a prefix in CIDR notation, e.g., `"192.168.0.0/24"` or `"2001:db8::/32"`. Host
    /// bits are cleared.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || Error::Malformed(s.to_string());
        let (addr, len) = s.split_once('/').ok_or_else(malformed)?;
        let addr: IpAddr = addr.parse().map_err(|_| malformed())?;
        let len: u8 = len.parse().map_err(|_| malformed())?;
        Self::from_ip(addr, len)
    }
}

/// Trait for types that describe an IP prefix: an address and a prefix length.
pub trait Prefix {
    /// The address bytes in network byte order. Host bits do not need to be cleared.
    fn to_octets(&self) -> Octets;

    /// Prefix length in bits.
    fn prefix_len(&self) -> u8;
}

/// Trait for types that describe a single address.
pub trait Address {
    /// The address bytes in network byte order.
    fn to_octets(&self) -> Octets;
}

pub(crate) fn mask_from_prefix_len<R>(len: u8) -> R
where
    R: PrimInt + Zero,
{
    if len as u32 == R::zero().count_zeros() {
        !R::zero()
    } else if len == 0 {
        R::zero()
    } else {
        !((!R::zero()) >> len as usize)
    }
}

fn uint_octets<R>(x: R) -> Octets
where
    R: PrimInt + Unsigned,
{
    let width = (R::zero().count_zeros() / 8) as usize;
    let wide = x.to_u128().unwrap_or_default().to_be_bytes();
    let mut buf = [0; MAX_ADDR_LEN];
    buf[..width].copy_from_slice(&wide[MAX_ADDR_LEN - width..]);
    Octets {
        buf,
        len: width as u8,
    }
}

impl Prefix for Network {
    fn to_octets(&self) -> Octets {
        Octets {
            buf: self.buf,
            len: self.family.addr_len() as u8,
        }
    }

    fn prefix_len(&self) -> u8 {
        self.len
    }
}

impl<P: Prefix + ?Sized> Prefix for &P {
    fn to_octets(&self) -> Octets {
        P::to_octets(self)
    }

    fn prefix_len(&self) -> u8 {
        P::prefix_len(self)
    }
}

impl<R> Prefix for (R, u8)
where
    R: Unsigned + PrimInt,
{
    fn to_octets(&self) -> Octets {
        uint_octets(self.0)
    }

    fn prefix_len(&self) -> u8 {
        self.1
    }
}

#[cfg(feature = "ipnet")]
impl Prefix for Ipv4Net {
    fn to_octets(&self) -> Octets {
        self.addr().into()
    }

    fn prefix_len(&self) -> u8 {
        self.prefix_len()
    }
}

#[cfg(feature = "ipnet")]
impl Prefix for Ipv6Net {
    fn to_octets(&self) -> Octets {
        self.addr().into()
    }

    fn prefix_len(&self) -> u8 {
        self.prefix_len()
    }
}

#[cfg(feature = "ipnet")]
impl Prefix for IpNet {
    fn to_octets(&self) -> Octets {
        self.addr().into()
    }

    fn prefix_len(&self) -> u8 {
        self.prefix_len()
    }
}

#[cfg(feature = "ipnetwork")]
impl Prefix for Ipv4Network {
    fn to_octets(&self) -> Octets {
        self.ip().into()
    }

    fn prefix_len(&self) -> u8 {
        self.prefix()
    }
}

#[cfg(feature = "ipnetwork")]
impl Prefix for Ipv6Network {
    fn to_octets(&self) -> Octets {
        self.ip().into()
    }

    fn prefix_len(&self) -> u8 {
        self.prefix()
    }
}

#[cfg(feature = "ipnetwork")]
impl Prefix for IpNetwork {
    fn to_octets(&self) -> Octets {
        self.ip().into()
    }

    fn prefix_len(&self) -> u8 {
        self.prefix()
    }
}

#[cfg(feature = "cidr")]
impl Prefix for cidr::Ipv4Cidr {
    fn to_octets(&self) -> Octets {
        self.first_address().into()
    }

    fn prefix_len(&self) -> u8 {
        self.network_length()
    }
}

#[cfg(feature = "cidr")]
impl Prefix for cidr::Ipv6Cidr {
    fn to_octets(&self) -> Octets {
        self.first_address().into()
    }

    fn prefix_len(&self) -> u8 {
        self.network_length()
    }
}

#[cfg(feature = "cidr")]
impl Prefix for cidr::IpCidr {
    fn to_octets(&self) -> Octets {
        match self {
            cidr::IpCidr::V4(c) => c.first_address().into(),
            cidr::IpCidr::V6(c) => c.first_address().into(),
        }
    }

    fn prefix_len(&self) -> u8 {
        match self {
            cidr::IpCidr::V4(c) => c.network_length(),
            cidr::IpCidr::V6(c) => c.network_length(),
        }
    }
}

impl Address for Octets {
    fn to_octets(&self) -> Octets {
        *self
    }
}

impl Address for Ipv4Addr {
    fn to_octets(&self) -> Octets {
        (*self).into()
    }
}

impl Address for Ipv6Addr {
    fn to_octets(&self) -> Octets {
        (*self).into()
    }
}

impl Address for IpAddr {
    fn to_octets(&self) -> Octets {
        (*self).into()
    }
}

impl Address for [u8; 4] {
    fn to_octets(&self) -> Octets {
        (*self).into()
    }
}

impl Address for [u8; 16] {
    fn to_octets(&self) -> Octets {
        (*self).into()
    }
}

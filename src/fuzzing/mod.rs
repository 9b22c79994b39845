//! Module for testing using fuzzing (quickcheck)

use std::fmt::Debug;

use crate::prefix::mask_from_prefix_len;
use crate::*;
use quickcheck::Arbitrary;

mod basic;

#[derive(Debug, PartialEq, Clone, Copy)]
enum Operation<P, T> {
    Add(P, T),
    Remove(P),
}

#[cfg(miri)]
const DEFAULT_NUM_TESTS: usize = 10;
#[cfg(not(miri))]
const DEFAULT_NUM_TESTS: usize = 2000;
const DEFAULT_GEN_SIZE: usize = 100;

fn proptest_runner<A: Arbitrary + Debug + PartialEq, F: Fn(A) -> bool>(f: F) {
    let num_tests: usize = std::env::var("QUICKCHECK_TESTS")
        .ok()
        .and_then(|x| x.parse::<usize>().ok())
        .unwrap_or(DEFAULT_NUM_TESTS);

    let gen_size: usize = std::env::var("QUICKCHECK_GENERATOR_SIZE")
        .ok()
        .and_then(|x| x.parse::<usize>().ok())
        .unwrap_or(DEFAULT_GEN_SIZE);

    let mut gen = quickcheck::Gen::new(gen_size);

    for _ in 0..num_tests {
        let input = A::arbitrary(&mut gen);
        if !f(input.clone()) {
            shrink_failure(f, input)
        }
    }
}

fn shrink_failure<A: Arbitrary + Debug + PartialEq, F: Fn(A) -> bool>(f: F, input: A) -> ! {
    for i in input.shrink() {
        if !f(i.clone()) {
            shrink_failure(f, i)
        }
    }
    // every shrunken input passes, so `input` is minimal
    panic!(
        "[QUICKCHECK] Test case failed!\n  Minimal input:\n    {:?}",
        input
    );
}

#[allow(missing_docs)]
#[macro_export]
macro_rules! qc {
    ($name:ident, $f:ident) => {
        #[test]
        fn $name() {
            proptest_runner($f)
        }
    };
}

impl<P: Arbitrary, T: Arbitrary> Arbitrary for Operation<P, T> {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let p = P::arbitrary(g);
        if g.choose(&[
            true, true, true, true, true, true, true, false, false, false,
        ])
        .copied()
        .unwrap_or_default()
        {
            let t = T::arbitrary(g);
            Self::Add(p, t)
        } else {
            Self::Remove(p)
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        match self {
            Operation::Add(p, t) => {
                let t = t.clone();
                Box::new(
                    p.clone()
                        .shrink()
                        .map(move |p| Operation::Add(p, t.clone())),
                )
            }
            Operation::Remove(p) => Box::new(p.clone().shrink().map(Operation::Remove)),
        }
    }
}

/// Draw an IPv4 address from a small pool of byte values, such that generated prefixes and
/// addresses overlap often.
fn clustered_addr(g: &mut quickcheck::Gen) -> u32 {
    let mut bytes = [0u8; 4];
    bytes[0] = g.choose(&[0u8, 10, 192, 255]).copied().unwrap_or_default();
    for b in &mut bytes[1..] {
        let any = u8::arbitrary(g);
        *b = g
            .choose(&[0u8, 0, 1, 0x80, 0xc0, 0xff, any])
            .copied()
            .unwrap_or_default();
    }
    u32::from_be_bytes(bytes)
}

/// A masked IPv4 prefix.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
struct TestPrefix(u32, u8);

impl TestPrefix {
    fn new(addr: u32, len: u8) -> Self {
        Self(addr & mask_from_prefix_len::<u32>(len), len)
    }

    fn contains(&self, addr: u32) -> bool {
        addr & mask_from_prefix_len::<u32>(self.1) == self.0
    }
}

impl Debug for TestPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c, d] = self.0.to_be_bytes();
        write!(f, "{a}.{b}.{c}.{d}/{}", self.1)
    }
}

impl Arbitrary for TestPrefix {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let len = u8::arbitrary(g) % 33;
        Self::new(clustered_addr(g), len)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        if self.1 == 0 {
            quickcheck::empty_shrinker()
        } else {
            quickcheck::single_shrinker(Self::new(self.0, self.1 - 1))
        }
    }
}

impl Prefix for TestPrefix {
    fn to_octets(&self) -> Octets {
        (self.0, self.1).to_octets()
    }

    fn prefix_len(&self) -> u8 {
        self.1
    }
}

/// An IPv4 address, drawn like the addresses of [`TestPrefix`].
#[derive(PartialEq, Eq, Clone, Copy)]
struct TestAddr(u32);

impl Debug for TestAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c, d] = self.0.to_be_bytes();
        write!(f, "{a}.{b}.{c}.{d}")
    }
}

impl Arbitrary for TestAddr {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        Self(clustered_addr(g))
    }
}

impl Address for TestAddr {
    fn to_octets(&self) -> Octets {
        self.0.to_be_bytes().into()
    }
}

impl<T: Arbitrary> Arbitrary for LpmTable<T> {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let mut table = LpmTable::ipv4();
        for (p, t) in <Vec<(TestPrefix, T)> as Arbitrary>::arbitrary(g) {
            let _ = table.insert(p, t);
        }
        table
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let elems: Vec<(TestPrefix, T)> = self
            .iter()
            .map(|e| (to_test_prefix(e.prefix()), e.value().clone()))
            .collect();
        Box::new(elems.shrink().map(|elems| {
            let mut table = LpmTable::ipv4();
            for (p, t) in elems {
                let _ = table.insert(p, t);
            }
            table
        }))
    }
}

fn to_test_prefix(net: &Network) -> TestPrefix {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(net.addr());
    TestPrefix(u32::from_be_bytes(bytes), net.prefix_len())
}

//! Iteration over all entries of a table.

use std::collections::BTreeMap;

use crate::node::{Nodes, ROOT};

use super::{Entry, LpmTable};

/// An iterator over all entries of an [`LpmTable`]. The default entry comes first, then the trie
/// is walked depth-first with children in ascending byte order, yielding the entries of each
/// node from the shortest to the longest prefix.
#[derive(Clone)]
pub struct Iter<'a, T> {
    nodes: &'a Nodes<T>,
    default: Option<&'a Entry<T>>,
    stack: Vec<usize>,
    slots: std::slice::Iter<'a, Option<Entry<T>>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a Entry<T>;

    fn next(&mut self) -> Option<&'a Entry<T>> {
        if let Some(entry) = self.default.take() {
            return Some(entry);
        }
        loop {
            if let Some(entry) = self.slots.by_ref().find_map(Option::as_ref) {
                return Some(entry);
            }
            let nodes = self.nodes;
            let node = &nodes[self.stack.pop()?];
            self.stack
                .extend(node.children.iter().rev().flatten().copied());
            self.slots = node.slots.iter();
        }
    }
}

impl<'a, T> IntoIterator for &'a LpmTable<T> {
    type Item = &'a Entry<T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> LpmTable<T> {
    /// An iterator visiting all entries. Entries of equal prefix length are yielded in ascending
    /// address order.
    ///
    /// ```
    /// # use radix_lpm::*;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut table = LpmTable::ipv4();
    /// table.insert_str("192.168.0.0/16", 1)?;
    /// table.insert_str("10.0.0.0/8", 2)?;
    /// table.insert_str("0.0.0.0/0", 3)?;
    /// table.insert_str("10.1.0.0/16", 4)?;
    /// assert_eq!(
    ///     table.iter().map(|e| e.prefix().to_string()).collect::<Vec<_>>(),
    ///     vec!["0.0.0.0/0", "10.0.0.0/8", "10.1.0.0/16", "192.168.0.0/16"],
    /// );
    /// # Ok(())
    /// # }
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        let empty: &[Option<Entry<T>>] = &[];
        Iter {
            nodes: &self.nodes,
            default: self.default.as_ref(),
            stack: vec![ROOT],
            slots: empty.iter(),
        }
    }

    /// Group all entries by their prefix length. Within each length, entries are sorted by
    /// address. Lengths without entries are absent from the map.
    ///
    /// ```
    /// # use radix_lpm::*;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut table = LpmTable::ipv4();
    /// table.insert_str("192.168.1.128/25", "p1")?;
    /// table.insert_str("192.168.1.224/27", "p2")?;
    /// table.insert_str("192.168.1.255/32", "p3")?;
    /// let groups = table.group_by_len();
    /// assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec![25, 27, 32]);
    /// assert_eq!(groups[&27][0].value(), &"p2");
    /// # Ok(())
    /// # }
    /// ```
    pub fn group_by_len(&self) -> BTreeMap<u8, Vec<&Entry<T>>> {
        let mut groups: BTreeMap<u8, Vec<&Entry<T>>> = BTreeMap::new();
        self.walk(ROOT, 0, &mut |len, entry| {
            groups.entry(len).or_default().push(entry)
        });
        if let Some(entry) = self.default.as_ref() {
            groups.entry(0).or_default().push(entry);
        }
        groups
    }

    /// Recursive depth-first walk, passing the length reconstructed from the node depth and the
    /// slot index of every entry.
    fn walk<'a, F>(&'a self, idx: usize, depth: usize, f: &mut F)
    where
        F: FnMut(u8, &'a Entry<T>),
    {
        let node = &self.nodes[idx];
        for (slot, entry) in node.slots.iter().enumerate() {
            if let Some(entry) = entry {
                let len = (depth.saturating_sub(1) * 8 + slot + 1) as u8;
                debug_assert_eq!(len, entry.prefix.prefix_len());
                f(len, entry);
            }
        }
        for child in node.children.iter().flatten() {
            self.walk(*child, depth + 1, f);
        }
    }
}

//! Arena of trie nodes and the per-node masked search.
//!
//! Every node has 256 child references, one per value of the next address byte, and eight entry
//! slots. A prefix of length `L > 0` lives in the node reached by its first `ceil(L / 8)` bytes,
//! in slot `(L + 7) % 8`. Slot 7 holds the prefix ending exactly at the node's byte boundary,
//! slot `k < 7` holds the prefix that uses only the upper `k + 1` bits of the last byte.

use std::ops::{Index, IndexMut};

use crate::prefix::mask_from_prefix_len;
use crate::table::Entry;

/// Number of entry slots per node, one for each bit length of the last byte.
pub(crate) const SLOTS: usize = 8;

/// Index of the root node. The root is never freed.
pub(crate) const ROOT: usize = 0;

#[derive(Clone)]
pub(crate) struct Node<T> {
    pub(crate) children: [Option<usize>; 256],
    pub(crate) slots: [Option<Entry<T>>; SLOTS],
    pub(crate) child_count: u16,
    pub(crate) entry_count: u8,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            children: [None; 256],
            slots: Default::default(),
            child_count: 0,
            entry_count: 0,
        }
    }
}

impl<T> Node<T> {
    /// A node is vacant if it holds neither entries nor children. Vacant nodes other than the
    /// root must not stay in the trie.
    #[inline(always)]
    pub(crate) fn is_vacant(&self) -> bool {
        self.child_count == 0 && self.entry_count == 0
    }

    /// Store `entry` in `slot`, returning the entry that was there before.
    pub(crate) fn set(&mut self, slot: usize, entry: Entry<T>) -> Option<Entry<T>> {
        let old = self.slots[slot].replace(entry);
        if old.is_none() {
            self.entry_count += 1;
        }
        old
    }

    /// Remove the entry in `slot`.
    pub(crate) fn take(&mut self, slot: usize) -> Option<Entry<T>> {
        let old = self.slots[slot].take();
        if old.is_some() {
            self.entry_count -= 1;
        }
        old
    }
}

/// All nodes of a trie, stored in a single vector. Freed nodes are recycled.
#[derive(Clone)]
pub(crate) struct Nodes<T> {
    table: Vec<Node<T>>,
    free: Vec<usize>,
}

impl<T> Default for Nodes<T> {
    fn default() -> Self {
        Self {
            table: vec![Node::default()],
            free: Vec::new(),
        }
    }
}

impl<T> Index<usize> for Nodes<T> {
    type Output = Node<T>;

    #[inline(always)]
    fn index(&self, idx: usize) -> &Node<T> {
        &self.table[idx]
    }
}

impl<T> IndexMut<usize> for Nodes<T> {
    #[inline(always)]
    fn index_mut(&mut self, idx: usize) -> &mut Node<T> {
        &mut self.table[idx]
    }
}

impl<T> Nodes<T> {
    /// Get the child of `idx` along `byte`.
    #[inline(always)]
    pub(crate) fn child(&self, idx: usize, byte: u8) -> Option<usize> {
        self.table[idx].children[byte as usize]
    }

    /// Get the child of `idx` along `byte`, creating it if it does not exist yet.
    pub(crate) fn child_or_insert(&mut self, idx: usize, byte: u8) -> usize {
        if let Some(child) = self.child(idx, byte) {
            return child;
        }
        let child = self.new_node();
        let node = &mut self.table[idx];
        node.children[byte as usize] = Some(child);
        node.child_count += 1;
        child
    }

    /// Unlink the child of `idx` along `byte` and put it back on the free list. The child must be
    /// vacant.
    pub(crate) fn detach(&mut self, idx: usize, byte: u8) {
        let node = &mut self.table[idx];
        if let Some(child) = node.children[byte as usize].take() {
            node.child_count -= 1;
            debug_assert!(self.table[child].is_vacant());
            self.free.push(child);
        }
    }

    /// Number of nodes currently linked into the trie, including the root.
    pub(crate) fn live_nodes(&self) -> usize {
        self.table.len() - self.free.len()
    }

    /// Drop all nodes except an empty root.
    pub(crate) fn clear(&mut self) {
        self.table.clear();
        self.free.clear();
        self.table.push(Node::default());
    }

    /// Find the longest entry stored in any child of `idx` that matches `byte`.
    ///
    /// The probe `byte & (0xff << i)` for `i = 0..8` visits every child whose path could cover
    /// `byte`, from the most to the least specific. In the child selected by the `i`-th probe,
    /// only slots `0..8 - i` can match, since longer entries there would need bits that the probe
    /// cleared. Repeated probes (when `byte` has trailing zeros) are skipped. A ninth probe with
    /// all bits cleared would leave no slot to scan, so there is none.
    pub(crate) fn search(&self, idx: usize, byte: u8) -> Option<&Entry<T>> {
        let node = &self.table[idx];
        let mut last = None;
        for i in 0..SLOTS {
            let probe = byte & mask_from_prefix_len::<u8>((SLOTS - i) as u8);
            if last == Some(probe) {
                continue;
            }
            last = Some(probe);
            let Some(child) = node.children[probe as usize] else {
                continue;
            };
            let found = self.table[child].slots[..SLOTS - i]
                .iter()
                .rev()
                .find_map(Option::as_ref);
            if found.is_some() {
                return found;
            }
        }
        None
    }

    fn new_node(&mut self) -> usize {
        if let Some(idx) = self.free.pop() {
            self.table[idx] = Node::default();
            idx
        } else {
            self.table.push(Node::default());
            self.table.len() - 1
        }
    }
}

//! Formatting implementation for the tables

use std::fmt::{Debug, Formatter, Result};

use crate::table::Entry;
use crate::{JointLpmTable, LpmTable, Network};

impl Debug for Network {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        std::fmt::Display::fmt(self, f)
    }
}

impl<T: Debug> Debug for Entry<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_tuple("Entry")
            .field(&self.prefix)
            .field(&self.value)
            .finish()
    }
}

impl<T: Debug> Debug for LpmTable<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_map()
            .entries(self.iter().map(|e| (&e.prefix, &e.value)))
            .finish()
    }
}

impl<T: Debug> Debug for JointLpmTable<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_map()
            .entries(self.iter().map(|e| (&e.prefix, &e.value)))
            .finish()
    }
}

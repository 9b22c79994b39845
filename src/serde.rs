//! Serialization and Deserialization implementation

use std::collections::BTreeMap;

use ::serde::de::Error as _;
use ::serde::ser::SerializeStruct;
use ::serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Family, LpmTable, Network};

impl Serialize for Network {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Network {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

struct Entries<'a, T>(&'a LpmTable<T>);

impl<T: Serialize> Serialize for Entries<'_, T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.0.iter().map(|e| (e.prefix(), e.value())))
    }
}

impl<T: Serialize> Serialize for LpmTable<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("LpmTable", 2)?;
        state.serialize_field("family", &self.family())?;
        state.serialize_field("entries", &Entries(self))?;
        state.end()
    }
}

#[derive(Deserialize)]
struct Repr<T> {
    family: Family,
    entries: BTreeMap<Network, T>,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for LpmTable<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = Repr::<T>::deserialize(deserializer)?;
        let mut table = LpmTable::new(repr.family);
        for (prefix, value) in repr.entries {
            table.insert(prefix, value).map_err(D::Error::custom)?;
        }
        Ok(table)
    }
}

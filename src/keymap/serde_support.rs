//! Persistence of whole arenas.
//!
//! An arena is written as its slot table plus the handle of the shared empty
//! root. Parent links are handles, so a parent shared by several maps is
//! still shared after a round trip, and every [`MapId`] issued before
//! serialization names the equivalent map afterwards.
//!
//! Deserialization re-validates the parent graph: dangling parent handles,
//! delegation cycles and component mismatches are rejected.

use std::hash::Hash;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::arena::Slot;
use super::{KeyMapArena, MapId};

#[derive(Serialize)]
#[serde(bound(serialize = "K: Serialize + Eq + Hash, V: Serialize"))]
struct ArenaView<'a, K, V> {
    slots: &'a [Slot<K, V>],
    empty_root: Option<MapId>,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "K: Deserialize<'de> + Eq + Hash, V: Deserialize<'de>"))]
struct ArenaData<K, V> {
    slots: Vec<Slot<K, V>>,
    empty_root: Option<MapId>,
}

impl<K, V> Serialize for KeyMapArena<K, V>
where
    K: Serialize + Eq + Hash,
    V: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ArenaView {
            slots: self.slots(),
            empty_root: self.persisted_empty_root(),
        }
        .serialize(serializer)
    }
}

impl<'de, K, V> Deserialize<'de> for KeyMapArena<K, V>
where
    K: Deserialize<'de> + Eq + Hash,
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let data = ArenaData::deserialize(deserializer)?;
        Self::from_parts(data.slots, data.empty_root).map_err(D::Error::custom)
    }
}

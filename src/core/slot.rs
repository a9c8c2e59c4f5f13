//! Slot identification and per-slot data storage.
//!
//! ## SlotId
//!
//! Closed enumeration of the four seats at the table. There is no way to
//! construct a fifth slot, so every slot-indexed operation is total.
//!
//! ## SlotMap
//!
//! Fixed-size per-slot storage backed by `[T; 4]` for O(1) access.
//! Supports iteration and indexing by `SlotId`. Serializes as a map keyed
//! by slot name (`player1` .. `player4`).

use serde::de::{Error as _, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Number of seats at the table.
pub const SLOT_COUNT: usize = 4;

/// One of the four fixed player positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotId {
    Player1,
    Player2,
    Player3,
    Player4,
}

impl SlotId {
    /// All slots in seating order.
    pub const ALL: [SlotId; SLOT_COUNT] = [
        SlotId::Player1,
        SlotId::Player2,
        SlotId::Player3,
        SlotId::Player4,
    ];

    /// Get the slot for a 0-based index, if in range.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(SlotId::Player1),
            1 => Some(SlotId::Player2),
            2 => Some(SlotId::Player3),
            3 => Some(SlotId::Player4),
            _ => None,
        }
    }

    /// Get the raw slot index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            SlotId::Player1 => 0,
            SlotId::Player2 => 1,
            SlotId::Player3 => 2,
            SlotId::Player4 => 3,
        }
    }

    /// Get the seat number shown to players (1-based).
    #[must_use]
    pub const fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    /// Iterate over all slots.
    ///
    /// ```
    /// use commander_tracker::core::SlotId;
    ///
    /// let slots: Vec<_> = SlotId::all().collect();
    /// assert_eq!(slots.len(), 4);
    /// assert_eq!(slots[0], SlotId::Player1);
    /// assert_eq!(slots[3], SlotId::Player4);
    /// ```
    pub fn all() -> impl Iterator<Item = SlotId> {
        Self::ALL.into_iter()
    }

    /// The three other slots, in seating order.
    #[must_use]
    pub fn opponents(self) -> SmallVec<[SlotId; 3]> {
        Self::ALL.into_iter().filter(|&s| s != self).collect()
    }

    /// Order in which a slot's commander damage panel lists the table.
    ///
    /// The panel is laid out relative to where the slot sits, so the order
    /// is seat-specific and includes the slot itself.
    #[must_use]
    pub const fn commander_panel_order(self) -> [SlotId; SLOT_COUNT] {
        use SlotId::{Player1, Player2, Player3, Player4};
        match self {
            Player1 => [Player2, Player4, Player1, Player3],
            Player2 => [Player3, Player1, Player4, Player2],
            Player3 => [Player2, Player4, Player1, Player3],
            Player4 => [Player3, Player1, Player4, Player2],
        }
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// Per-slot data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use commander_tracker::core::{SlotId, SlotMap};
///
/// let mut life: SlotMap<i32> = SlotMap::with_value(40);
/// assert_eq!(life[SlotId::Player1], 40);
///
/// life[SlotId::Player2] = 35;
/// assert_eq!(life[SlotId::Player2], 35);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SlotMap<T> {
    data: [T; SLOT_COUNT],
}

impl<T> SlotMap<T> {
    /// Create a new SlotMap with values from a factory function.
    pub fn new(factory: impl Fn(SlotId) -> T) -> Self {
        Self {
            data: SlotId::ALL.map(factory),
        }
    }

    /// Create a new SlotMap with all entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Get a reference to a slot's data.
    #[must_use]
    pub fn get(&self, slot: SlotId) -> &T {
        &self.data[slot.index()]
    }

    /// Get a mutable reference to a slot's data.
    pub fn get_mut(&mut self, slot: SlotId) -> &mut T {
        &mut self.data[slot.index()]
    }

    /// Iterate over (SlotId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        SlotId::ALL.into_iter().zip(self.data.iter())
    }

    /// Iterate over (SlotId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SlotId, &mut T)> {
        SlotId::ALL.into_iter().zip(self.data.iter_mut())
    }

    /// Iterate over values in seating order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Build a new map by transforming every entry.
    pub fn map<U>(&self, f: impl Fn(SlotId, &T) -> U) -> SlotMap<U> {
        SlotMap::new(|slot| f(slot, self.get(slot)))
    }
}

impl<T> Index<SlotId> for SlotMap<T> {
    type Output = T;

    fn index(&self, slot: SlotId) -> &Self::Output {
        self.get(slot)
    }
}

impl<T> IndexMut<SlotId> for SlotMap<T> {
    fn index_mut(&mut self, slot: SlotId) -> &mut Self::Output {
        self.get_mut(slot)
    }
}

impl<T: Serialize> Serialize for SlotMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(SLOT_COUNT))?;
        for (slot, value) in self.iter() {
            map.serialize_entry(&slot, value)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for SlotMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SlotMapVisitor(PhantomData))
    }
}

struct SlotMapVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for SlotMapVisitor<T> {
    type Value = SlotMap<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map with one entry for each of player1..player4")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries: [Option<T>; SLOT_COUNT] = [None, None, None, None];
        while let Some((slot, value)) = access.next_entry::<SlotId, T>()? {
            if entries[slot.index()].replace(value).is_some() {
                return Err(A::Error::custom(format_args!("duplicate entry for {slot}")));
            }
        }

        let [Some(p1), Some(p2), Some(p3), Some(p4)] = entries else {
            return Err(A::Error::custom("missing entry for one of player1..player4"));
        };
        Ok(SlotMap {
            data: [p1, p2, p3, p4],
        })
    }
}

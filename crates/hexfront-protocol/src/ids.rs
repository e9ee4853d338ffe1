use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitTag;
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CityTag;

/// Generational handle into an entity store, tagged with the component kind it addresses.
///
/// A `UnitId` can never be used to look up a city. A stale handle (the slot was freed and
/// reused) has an outdated generation and resolves to nothing.
pub struct EntityId<T> {
    pub index: u32,
    pub generation: u32,
    _tag: PhantomData<T>,
}

impl<T> EntityId<T> {
    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self {
            index,
            generation,
            _tag: PhantomData,
        }
    }

    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self::new((raw >> 32) as u32, raw as u32)
    }

    #[inline]
    pub const fn to_raw(self) -> u64 {
        ((self.index as u64) << 32) | (self.generation as u64)
    }
}

// No bounds on the tag.
impl<T> Clone for EntityId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for EntityId<T> {}

impl<T> PartialEq for EntityId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.to_raw() == other.to_raw()
    }
}

impl<T> Eq for EntityId<T> {}

impl<T> Hash for EntityId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_raw().hash(state);
    }
}

impl<T> PartialOrd for EntityId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for EntityId<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_raw().cmp(&other.to_raw())
    }
}

impl<T> fmt::Debug for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

impl<T> fmt::Display for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

impl<T> Serialize for EntityId<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.to_raw())
    }
}

impl<'de, T> Deserialize<'de> for EntityId<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Self::from_raw)
    }
}

pub type UnitId = EntityId<UnitTag>;
pub type CityId = EntityId<CityTag>;

/// Player index (max 16 players).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u8);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_encoding_keeps_index_and_generation() {
        let id = UnitId::new(7, 3);
        let back = UnitId::from_raw(id.to_raw());
        assert_eq!(back.index, 7);
        assert_eq!(back.generation, 3);
    }

    /// A tag with no trait impls at all.
    struct Bare;

    fn copy_twice<T>(id: EntityId<T>) -> (EntityId<T>, EntityId<T>) {
        (id, id)
    }

    #[test]
    fn ids_are_copy_and_ordered_for_any_tag() {
        let (a, b) = copy_twice(EntityId::<Bare>::new(2, 1));
        assert_eq!(a, b);
        assert!(EntityId::<Bare>::new(1, 9) < a);
        assert!(EntityId::<Bare>::new(2, 0) < a);
        assert_eq!(serde_json::to_string(&a).unwrap(), ((2_u64 << 32) | 1).to_string());
    }

    #[test]
    fn serializes_as_single_integer() {
        let id = CityId::new(1, 2);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, ((1_u64 << 32) | 2).to_string());
        let back: CityId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}

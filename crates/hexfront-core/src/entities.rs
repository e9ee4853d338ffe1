use std::marker::PhantomData;

use hexfront_protocol::EntityId;

#[derive(Clone, Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Generational arena holding one component kind, addressed by `EntityId<Tag>`.
///
/// - Iteration order is ascending slot index, so two stores built by the same command
///   sequence iterate identically.
/// - Removing an entity bumps its slot generation; old handles stop resolving.
/// - Freed slots are reused lowest-index first.
#[derive(Clone, Debug)]
pub struct EntityStore<T, Tag> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
    _tag: PhantomData<Tag>,
}

impl<T, Tag> Default for EntityStore<T, Tag> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
            _tag: PhantomData,
        }
    }
}

impl<T, Tag> EntityStore<T, Tag> {
    pub fn insert(&mut self, value: T) -> EntityId<Tag> {
        self.len += 1;
        if let Some(index) = self.take_lowest_free() {
            let slot = &mut self.slots[index as usize];
            debug_assert!(slot.value.is_none());
            slot.value = Some(value);
            return EntityId::new(index, slot.generation);
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        EntityId::new(index, 0)
    }

    pub fn get(&self, id: EntityId<Tag>) -> Option<&T> {
        let slot = self.slots.get(id.index as usize)?;
        (slot.generation == id.generation)
            .then_some(slot.value.as_ref())
            .flatten()
    }

    pub fn get_mut(&mut self, id: EntityId<Tag>) -> Option<&mut T> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.value.as_mut()
    }

    pub fn contains(&self, id: EntityId<Tag>) -> bool {
        self.get(id).is_some()
    }

    pub fn remove(&mut self, id: EntityId<Tag>) -> Option<T> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(value)
    }

    /// Mutable access to two distinct live entities at once.
    pub fn get2_mut(
        &mut self,
        a: EntityId<Tag>,
        b: EntityId<Tag>,
    ) -> Option<(&mut T, &mut T)> {
        if a.index == b.index {
            return None;
        }
        let (low, high) = if a.index < b.index { (a, b) } else { (b, a) };
        if high.index as usize >= self.slots.len() {
            return None;
        }

        let (left, right) = self.slots.split_at_mut(high.index as usize);
        let low_slot = &mut left[low.index as usize];
        let high_slot = &mut right[0];
        if low_slot.generation != low.generation || high_slot.generation != high.generation {
            return None;
        }
        let low_val = low_slot.value.as_mut()?;
        let high_val = high_slot.value.as_mut()?;

        if a.index < b.index {
            Some((low_val, high_val))
        } else {
            Some((high_val, low_val))
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter_ordered(&self) -> impl Iterator<Item = (EntityId<Tag>, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let value = slot.value.as_ref()?;
            Some((EntityId::new(index as u32, slot.generation), value))
        })
    }

    pub fn iter_ordered_mut(&mut self) -> impl Iterator<Item = (EntityId<Tag>, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| {
                let value = slot.value.as_mut()?;
                Some((EntityId::new(index as u32, slot.generation), value))
            })
    }

    fn take_lowest_free(&mut self) -> Option<u32> {
        let (pos, _) = self
            .free
            .iter()
            .enumerate()
            .min_by_key(|(_, index)| **index)?;
        Some(self.free.swap_remove(pos))
    }
}

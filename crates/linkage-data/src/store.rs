// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Generational slot storage for one kind of datablock.

use linkage_core::datablock::{Datablock, DatablockId};

/// A flat collection of datablocks of kind `T`.
///
/// The store maintains a dense list of slots. Removed slots are recycled via a
/// free list, and their generation is bumped so old handles stop resolving.
#[derive(Debug, Clone)]
pub struct DatablockStore<T: Datablock> {
    /// Every slot that has ever been created, with the handle currently
    /// valid for it. The payload is `Some` only while the datablock is alive.
    slots: Vec<(DatablockId<T>, Option<T>)>,
    /// Slot indices available for reuse.
    freed: Vec<u32>,
    alive: usize,
}

impl<T: Datablock> Default for DatablockStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Datablock> DatablockStore<T> {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            freed: Vec::new(),
            alive: 0,
        }
    }

    /// Stores `block` in a new or recycled slot and returns its handle.
    pub fn insert(&mut self, block: T) -> DatablockId<T> {
        self.alive += 1;
        if let Some(index) = self.freed.pop() {
            let (id_slot, block_slot) = &mut self.slots[index as usize];
            *id_slot = DatablockId::new(index, id_slot.generation.wrapping_add(1));
            *block_slot = Some(block);
            *id_slot
        } else {
            let id = DatablockId::new(self.slots.len() as u32, 0);
            self.slots.push((id, Some(block)));
            id
        }
    }

    /// Returns the datablock if `id` is still valid.
    pub fn get(&self, id: DatablockId<T>) -> Option<&T> {
        self.slots
            .get(id.index as usize)
            .and_then(|(slot_id, block)| {
                if *slot_id == id {
                    block.as_ref()
                } else {
                    None
                }
            })
    }

    /// Returns the datablock mutably if `id` is still valid.
    pub fn get_mut(&mut self, id: DatablockId<T>) -> Option<&mut T> {
        self.slots
            .get_mut(id.index as usize)
            .and_then(|(slot_id, block)| {
                if *slot_id == id {
                    block.as_mut()
                } else {
                    None
                }
            })
    }

    /// Takes the datablock out of its slot and frees the slot for reuse.
    pub fn remove(&mut self, id: DatablockId<T>) -> Option<T> {
        let (slot_id, block) = self.slots.get_mut(id.index as usize)?;
        if *slot_id != id {
            return None;
        }
        let block = block.take()?;
        self.freed.push(id.index);
        self.alive -= 1;
        Some(block)
    }

    /// Returns the number of live datablocks.
    pub fn len(&self) -> usize {
        self.alive
    }

    /// Returns `true` if no datablock is alive.
    pub fn is_empty(&self) -> bool {
        self.alive == 0
    }

    /// Iterates over live datablocks in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (DatablockId<T>, &T)> + '_ {
        self.slots
            .iter()
            .filter_map(|(id, block)| block.as_ref().map(|b| (*id, b)))
    }

    /// Returns the handles of all live datablocks.
    pub fn ids(&self) -> Vec<DatablockId<T>> {
        self.iter().map(|(id, _)| id).collect()
    }
}

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

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// A non-owning handle to a datablock of kind `T` inside a registry.
///
/// It combines a slot index with a generation count to solve the "ABA problem".
/// When a datablock is removed, its slot can be recycled for a new one, but the
/// generation is incremented so stale handles no longer resolve.
///
/// Holding a `DatablockId` never keeps the datablock alive. Whoever stores one
/// is responsible for the matching increment on the target's `UserCount`.
pub struct DatablockId<T> {
    /// The index of the datablock's slot in its store.
    pub index: u32,
    /// A generation counter that is incremented each time the slot is recycled.
    pub generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> DatablockId<T> {
    /// Creates a handle from its raw parts.
    pub const fn new(index: u32, generation: u32) -> Self {
        Self {
            index,
            generation,
            _marker: PhantomData,
        }
    }
}

// Manual impls: deriving would wrongly require `T` to implement each trait.
impl<T> Clone for DatablockId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for DatablockId<T> {}

impl<T> PartialEq for DatablockId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for DatablockId<T> {}

impl<T> Hash for DatablockId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> fmt::Debug for DatablockId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DatablockId({}v{})", self.index, self.generation)
    }
}

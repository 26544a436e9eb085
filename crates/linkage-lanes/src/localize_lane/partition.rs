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

use linkage_core::{Datablock, DatablockId, OwnerRef, OwnerRegistry};

/// How the owners of a library datablock are spread across scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeMix {
    /// Every owner is local.
    LocalOnly,
    /// No owner is local. This includes the datablock having no owner at all.
    LibraryOnly,
    /// Both local and library owners exist.
    Mixed,
}

/// The owners of one datablock, split by scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPartition<O> {
    /// Owners in the local scope.
    pub local: Vec<O>,
    /// Owners linked from a library.
    pub library: Vec<O>,
}

impl<O> UserPartition<O> {
    /// Splits owner references by their scope tag.
    pub fn from_owners(owners: impl IntoIterator<Item = OwnerRef<O>>) -> Self {
        let mut partition = Self {
            local: Vec::new(),
            library: Vec::new(),
        };
        for owner in owners {
            if owner.is_local() {
                partition.local.push(owner.owner);
            } else {
                partition.library.push(owner.owner);
            }
        }
        partition
    }

    /// Total number of owners.
    pub fn len(&self) -> usize {
        self.local.len() + self.library.len()
    }

    /// Returns `true` if nothing owns the datablock.
    pub fn is_empty(&self) -> bool {
        self.local.is_empty() && self.library.is_empty()
    }

    /// Classifies the partition.
    pub fn mix(&self) -> ScopeMix {
        match (self.local.is_empty(), self.library.is_empty()) {
            (false, true) => ScopeMix::LocalOnly,
            (false, false) => ScopeMix::Mixed,
            (true, _) => ScopeMix::LibraryOnly,
        }
    }
}

/// Scans every owner in `registry` and partitions those pointing at `id`.
pub fn classify<T, R>(registry: &R, id: DatablockId<T>) -> UserPartition<R::Owner>
where
    T: Datablock,
    R: OwnerRegistry<T>,
{
    UserPartition::from_owners(registry.owners_of(id))
}

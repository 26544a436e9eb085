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

//! Contracts a datablock registry exposes to the lifecycle lanes.
//!
//! The lanes never reach for a global database: the registry is always passed
//! in explicitly, and `&mut` access for the whole operation is what guarantees
//! that owner enumeration observes a stable snapshot.

use crate::datablock::{Datablock, DatablockId};
use crate::error::LifecycleError;
use crate::library::LibraryId;
use std::fmt;

/// Storage and identity services for datablocks of kind `T`.
pub trait DatablockRegistry<T: Datablock> {
    /// Registers `block` and returns its handle.
    ///
    /// The registry makes the name unique within the block's scope, assigns a
    /// fresh UUID and resets the user count to zero.
    ///
    /// # Errors
    /// Returns [`LifecycleError::AllocationFailure`] if the registry is full.
    fn allocate(&mut self, block: T) -> Result<DatablockId<T>, LifecycleError>;

    /// Retrieves a datablock, or `None` for a stale handle.
    fn get(&self, id: DatablockId<T>) -> Option<&T>;

    /// Retrieves a datablock mutably, or `None` for a stale handle.
    fn get_mut(&mut self, id: DatablockId<T>) -> Option<&mut T>;

    /// Unregisters a datablock and hands it back. Counts are not touched.
    fn remove(&mut self, id: DatablockId<T>) -> Option<T>;

    /// Returns the handles of every live datablock of kind `T`.
    fn ids(&self) -> Vec<DatablockId<T>>;

    /// Clears the scope tag, making the datablock local, and renames it if
    /// its name collides with an existing local datablock.
    fn clear_library_data(&mut self, id: DatablockId<T>) -> Result<(), LifecycleError>;

    /// Rewrites scope-relative paths inside the datablock so they resolve
    /// outside of `lib`. A no-op for datablocks without paths.
    fn rebase_paths(&mut self, lib: LibraryId, id: DatablockId<T>) -> Result<(), LifecycleError>;

    /// Like [`get`](Self::get), but reports a stale handle as an error.
    fn try_get(&self, id: DatablockId<T>) -> Result<&T, LifecycleError> {
        self.get(id).ok_or(LifecycleError::NotFound {
            kind: T::CODE,
            index: id.index,
        })
    }

    /// Like [`get_mut`](Self::get_mut), but reports a stale handle as an error.
    fn try_get_mut(&mut self, id: DatablockId<T>) -> Result<&mut T, LifecycleError> {
        self.get_mut(id).ok_or(LifecycleError::NotFound {
            kind: T::CODE,
            index: id.index,
        })
    }
}

/// One owner found pointing at a datablock, with the owner's own scope tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerRef<O> {
    /// Handle of the owner.
    pub owner: O,
    /// The owner's scope tag.
    pub lib: Option<LibraryId>,
}

impl<O> OwnerRef<O> {
    /// Returns `true` if the owner belongs to the local scope.
    pub fn is_local(&self) -> bool {
        self.lib.is_none()
    }
}

/// Inverse lookup from a datablock of kind `T` to the owners referencing it.
///
/// Ownership is not inverse-indexed, so implementations scan every owner.
pub trait OwnerRegistry<T: Datablock> {
    /// The handle type of owners.
    type Owner: Copy + Eq + fmt::Debug;

    /// Returns every owner whose data reference equals `target`.
    fn owners_of(&self, target: DatablockId<T>) -> Vec<OwnerRef<Self::Owner>>;

    /// Points `owner`'s data reference at `target`. User counts are left to
    /// the caller.
    fn set_owner_data(
        &mut self,
        owner: Self::Owner,
        target: DatablockId<T>,
    ) -> Result<(), LifecycleError>;
}

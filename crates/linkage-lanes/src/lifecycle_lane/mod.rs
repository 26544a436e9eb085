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

//! Lifecycle strategies: how a kind of datablock is created, duplicated,
//! released and torn down.
//!
//! A datablock never frees itself here. Release only drops the references it
//! holds on other datablocks; reclaiming storage is the registry's job.

mod speaker_lifecycle;

pub use speaker_lifecycle::SpeakerLifecycle;

use linkage_core::{Datablock, DatablockId, DatablockRegistry, LifecycleError};

/// A lifecycle strategy for datablocks of kind `T` stored in registry `R`.
pub trait LifecycleLane<T: Datablock, R: DatablockRegistry<T>> {
    /// A short, human-readable name for this strategy.
    fn strategy_name(&self) -> &'static str;

    /// Registers a new local datablock with default settings.
    fn create(&self, registry: &mut R, name: &str) -> Result<DatablockId<T>, LifecycleError>;

    /// Registers a local copy of `source`.
    ///
    /// The copy's payload equals the source's, every datablock it references
    /// gains one user, and its own user count starts at zero. If `source` is
    /// library-owned, the copy's paths are rebased against that library.
    ///
    /// # Errors
    /// Propagates [`LifecycleError::AllocationFailure`] unchanged. Nothing in
    /// the registry is modified when allocation fails.
    fn duplicate(
        &self,
        registry: &mut R,
        source: DatablockId<T>,
    ) -> Result<DatablockId<T>, LifecycleError>;

    /// Drops every reference the datablock holds on other datablocks.
    ///
    /// Idempotent: a second call finds nothing left to drop.
    fn release(&self, registry: &mut R, id: DatablockId<T>) -> Result<(), LifecycleError>;

    /// Tears down the datablock's contents without unregistering it.
    ///
    /// With `release_users`, references are released first. Extra data
    /// (animation) is always dropped.
    fn free(
        &self,
        registry: &mut R,
        id: DatablockId<T>,
        release_users: bool,
    ) -> Result<(), LifecycleError>;

    /// Frees the datablock and unregisters it.
    ///
    /// Owners are expected to have been re-pointed already.
    fn remove(&self, registry: &mut R, id: DatablockId<T>) -> Result<T, LifecycleError> {
        let users = registry.try_get(id)?.header().users;
        if !users.is_zero() {
            log::warn!("Removing {} {id:?} that still has {users} user(s)", T::CODE);
        }
        self.free(registry, id, true)?;
        registry.remove(id).ok_or(LifecycleError::NotFound {
            kind: T::CODE,
            index: id.index,
        })
    }
}

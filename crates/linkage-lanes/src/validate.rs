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

//! User-count invariant checks.
//!
//! A datablock's recorded user count must equal the number of owners whose
//! data reference points at it.

use linkage_core::{Datablock, DatablockId, DatablockRegistry, LifecycleError, OwnerRegistry};

/// A datablock whose recorded user count disagrees with its owners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserCountMismatch<T> {
    /// The offending datablock.
    pub id: DatablockId<T>,
    /// The count stored in its header.
    pub recorded: u32,
    /// The number of owners actually referencing it.
    pub owners: usize,
}

/// Checks a single datablock.
///
/// # Errors
/// [`LifecycleError::PreconditionViolation`] on a mismatch, or
/// [`LifecycleError::NotFound`] for a stale handle.
pub fn check_user_count<T, R>(registry: &R, id: DatablockId<T>) -> Result<(), LifecycleError>
where
    T: Datablock,
    R: DatablockRegistry<T> + OwnerRegistry<T>,
{
    let recorded = registry.try_get(id)?.header().users.get();
    let owners = registry.owners_of(id).len();
    if recorded as usize != owners {
        return Err(LifecycleError::precondition(format!(
            "{} {id:?} records {recorded} user(s) but {owners} owner(s) reference it",
            T::CODE
        )));
    }
    Ok(())
}

/// Scans every datablock of kind `T` and returns those whose count is off.
pub fn find_user_count_mismatches<T, R>(registry: &R) -> Vec<UserCountMismatch<T>>
where
    T: Datablock,
    R: DatablockRegistry<T> + OwnerRegistry<T>,
{
    registry
        .ids()
        .into_iter()
        .filter_map(|id| {
            let recorded = registry.get(id)?.header().users.get();
            let owners = registry.owners_of(id).len();
            (recorded as usize != owners).then_some(UserCountMismatch {
                id,
                recorded,
                owners,
            })
        })
        .collect()
}

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

//! Conversion of library-owned datablocks into local ones.
//!
//! A datablock linked from a library may be referenced by local owners, by
//! owners from the same or other libraries, or both. Making it local either
//! clears its scope tag in place, leaves it alone, or splits it: local owners
//! move to a fresh local copy while library owners keep the original.

mod partition;

pub use partition::{classify, ScopeMix, UserPartition};

use crate::lifecycle_lane::LifecycleLane;
use crate::validate;
use linkage_core::{
    Datablock, DatablockId, DatablockRegistry, LifecycleConfig, LifecycleError, OwnerRegistry,
};
use std::fmt;

/// What [`LocalizeLane::make_local`] did to a datablock.
pub enum LocalizeOutcome<T> {
    /// The datablock was already local. Nothing changed.
    AlreadyLocal,
    /// It had exactly one user and was made local in place.
    SoleUser,
    /// Every owner was local; the datablock was made local in place.
    AllLocal,
    /// No local owner references it; it stays linked.
    LibraryOnly,
    /// Owners were mixed. Local owners now reference `copy`.
    Duplicated {
        /// The new local datablock.
        copy: DatablockId<T>,
        /// How many local owners were moved to the copy.
        repointed: usize,
    },
}

impl<T> LocalizeOutcome<T> {
    /// Returns `true` if the datablock or a copy of it became local.
    pub fn changed(&self) -> bool {
        !matches!(self, Self::AlreadyLocal | Self::LibraryOnly)
    }
}

impl<T> Clone for LocalizeOutcome<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for LocalizeOutcome<T> {}

impl<T> PartialEq for LocalizeOutcome<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::AlreadyLocal, Self::AlreadyLocal)
            | (Self::SoleUser, Self::SoleUser)
            | (Self::AllLocal, Self::AllLocal)
            | (Self::LibraryOnly, Self::LibraryOnly) => true,
            (
                Self::Duplicated { copy: a, repointed: n },
                Self::Duplicated { copy: b, repointed: m },
            ) => a == b && n == m,
            _ => false,
        }
    }
}

impl<T> Eq for LocalizeOutcome<T> {}

impl<T> fmt::Debug for LocalizeOutcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyLocal => f.write_str("AlreadyLocal"),
            Self::SoleUser => f.write_str("SoleUser"),
            Self::AllLocal => f.write_str("AllLocal"),
            Self::LibraryOnly => f.write_str("LibraryOnly"),
            Self::Duplicated { copy, repointed } => f
                .debug_struct("Duplicated")
                .field("copy", copy)
                .field("repointed", repointed)
                .finish(),
        }
    }
}

/// Makes library datablocks local.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalizeLane {
    check_invariants: bool,
}

impl Default for LocalizeLane {
    fn default() -> Self {
        Self {
            check_invariants: true,
        }
    }
}

impl LocalizeLane {
    /// Creates the lane. With `check_invariants`, user counts are compared to
    /// the owners found before and after any split.
    pub fn new(check_invariants: bool) -> Self {
        Self { check_invariants }
    }

    /// Creates the lane from a lifecycle configuration.
    pub fn from_config(config: &LifecycleConfig) -> Self {
        Self::new(config.check_invariants)
    }

    /// A short, human-readable name for this strategy.
    pub fn strategy_name(&self) -> &'static str {
        "LocalizeLane"
    }

    /// Makes datablock `id` local, duplicating it if it is shared between
    /// local and library owners.
    ///
    /// # Errors
    /// - [`LifecycleError::PreconditionViolation`] if invariant checks are on
    ///   and the recorded user count disagrees with the owners found. The
    ///   registry is untouched in that case.
    /// - [`LifecycleError::AllocationFailure`] if the split copy cannot be
    ///   allocated. The registry is untouched in that case.
    pub fn make_local<T, R, L>(
        &self,
        registry: &mut R,
        lifecycle: &L,
        id: DatablockId<T>,
    ) -> Result<LocalizeOutcome<T>, LifecycleError>
    where
        T: Datablock,
        R: DatablockRegistry<T> + OwnerRegistry<T>,
        L: LifecycleLane<T, R>,
    {
        let header = registry.try_get(id)?.header();
        let (lib, users) = (header.lib, header.users);

        let Some(lib) = lib else {
            return Ok(LocalizeOutcome::AlreadyLocal);
        };

        if users.get() == 1 {
            registry.clear_library_data(id)?;
            log::debug!("{} {id:?} from {lib} had a single user, made local", T::CODE);
            return Ok(LocalizeOutcome::SoleUser);
        }

        let partition = classify(&*registry, id);
        if self.check_invariants && partition.len() != users.get() as usize {
            log::warn!(
                "{} {id:?} records {users} user(s) but {} owner(s) reference it",
                T::CODE,
                partition.len()
            );
            return Err(LifecycleError::precondition(format!(
                "{} {id:?} records {users} user(s) but {} owner(s) reference it",
                T::CODE,
                partition.len()
            )));
        }

        match partition.mix() {
            ScopeMix::LocalOnly => {
                registry.clear_library_data(id)?;
                log::debug!(
                    "{} {id:?} from {lib} only had local owners, made local",
                    T::CODE
                );
                Ok(LocalizeOutcome::AllLocal)
            }
            ScopeMix::LibraryOnly => {
                log::trace!("{} {id:?} has no local owner, left in {lib}", T::CODE);
                Ok(LocalizeOutcome::LibraryOnly)
            }
            ScopeMix::Mixed => self.split(registry, lifecycle, id, &partition.local),
        }
    }

    fn split<T, R, L>(
        &self,
        registry: &mut R,
        lifecycle: &L,
        id: DatablockId<T>,
        local_owners: &[R::Owner],
    ) -> Result<LocalizeOutcome<T>, LifecycleError>
    where
        T: Datablock,
        R: DatablockRegistry<T> + OwnerRegistry<T>,
        L: LifecycleLane<T, R>,
    {
        let copy = lifecycle.duplicate(registry, id)?;
        registry.try_get_mut(copy)?.header_mut().users.set(0);

        for (done, &owner) in local_owners.iter().enumerate() {
            if let Err(err) = registry.set_owner_data(owner, copy) {
                log::error!(
                    "Re-pointing {owner:?} to {copy:?} failed, rolling back split of {id:?}: {err}"
                );
                self.rollback(registry, lifecycle, id, copy, &local_owners[..done]);
                return Err(err);
            }
            registry.try_get_mut(copy)?.header_mut().users.increment();
            registry.try_get_mut(id)?.header_mut().users.decrement();
        }

        let repointed = local_owners.len();
        log::info!(
            "Split {} {id:?}: {repointed} local owner(s) moved to {copy:?}",
            T::CODE
        );

        if self.check_invariants {
            validate::check_user_count(registry, id)?;
            validate::check_user_count(registry, copy)?;
        }

        Ok(LocalizeOutcome::Duplicated { copy, repointed })
    }

    /// Moves `moved` back to `id` and discards `copy`.
    ///
    /// An owner that cannot be restored stays on the copy, which is then kept
    /// alive with a user count matching the owners left on it.
    fn rollback<T, R, L>(
        &self,
        registry: &mut R,
        lifecycle: &L,
        id: DatablockId<T>,
        copy: DatablockId<T>,
        moved: &[R::Owner],
    ) where
        T: Datablock,
        R: DatablockRegistry<T> + OwnerRegistry<T>,
        L: LifecycleLane<T, R>,
    {
        let mut stranded = 0u32;
        for &owner in moved {
            if let Err(err) = registry.set_owner_data(owner, id) {
                log::error!("Could not restore {owner:?} to {id:?}: {err}");
                stranded += 1;
                continue;
            }
            if let Some(block) = registry.get_mut(id) {
                block.header_mut().users.increment();
            }
        }

        if let Some(block) = registry.get_mut(copy) {
            block.header_mut().users.set(stranded);
        }
        if stranded > 0 {
            log::error!(
                "Keeping copy {copy:?} of {id:?}: {stranded} owner(s) could not be restored"
            );
            return;
        }
        if let Err(err) = lifecycle.remove(registry, copy) {
            log::error!("Could not remove abandoned copy {copy:?}: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SpeakerLifecycle;
    use linkage_core::{LibraryId, OwnerRef};
    use linkage_data::{Database, Object, ObjectId, Speaker, SpeakerId};

    struct Scene {
        db: Database,
        lib: LibraryId,
        speaker: SpeakerId,
        local: Vec<ObjectId>,
        linked: Vec<ObjectId>,
    }

    /// A linked speaker with `local` local objects and `linked` library
    /// objects pointing at it.
    fn scene_with(config: LifecycleConfig, local: usize, linked: usize) -> Scene {
        let mut db = Database::with_config(config);
        db.set_filepath("/proj/scene.blend");
        let lib = db.add_library("props", "/proj/libs/props.blend");
        let speaker = db.link(lib, Speaker::new("Speaker")).unwrap();

        let local = (0..local)
            .map(|i| {
                let obj = db.add_object(&format!("Local{i}")).unwrap();
                db.assign_object_data(obj, Some(speaker)).unwrap();
                obj
            })
            .collect();
        let linked = (0..linked)
            .map(|i| {
                let obj = db.link(lib, Object::new(format!("Linked{i}"))).unwrap();
                db.assign_object_data(obj, Some(speaker)).unwrap();
                obj
            })
            .collect();

        Scene {
            db,
            lib,
            speaker,
            local,
            linked,
        }
    }

    fn scene(local: usize, linked: usize) -> Scene {
        scene_with(LifecycleConfig::default(), local, linked)
    }

    #[test]
    fn test_local_speaker_is_untouched() {
        let mut db = Database::new();
        let speaker = SpeakerLifecycle.create(&mut db, "Speaker").unwrap();
        let obj = db.add_object("Obj").unwrap();
        db.assign_object_data(obj, Some(speaker)).unwrap();

        let outcome = LocalizeLane::default()
            .make_local(&mut db, &SpeakerLifecycle, speaker)
            .unwrap();
        assert_eq!(outcome, LocalizeOutcome::AlreadyLocal);
        assert!(!outcome.changed());
        assert_eq!(db.speakers().len(), 1);
        assert_eq!(db.object(obj).unwrap().data, Some(speaker));
        assert_eq!(db.speaker(speaker).unwrap().id.users.get(), 1);
    }

    #[test]
    fn test_sole_user_is_made_local_in_place() {
        let mut s = scene(0, 1);
        let outcome = LocalizeLane::default()
            .make_local(&mut s.db, &SpeakerLifecycle, s.speaker)
            .unwrap();
        assert_eq!(outcome, LocalizeOutcome::SoleUser);
        assert!(s.db.speaker(s.speaker).unwrap().id.is_local());
        assert_eq!(s.db.speakers().len(), 1);
        assert_eq!(s.db.object(s.linked[0]).unwrap().data, Some(s.speaker));
    }

    #[test]
    fn test_all_local_owners_clears_scope() {
        let mut s = scene(3, 0);
        let outcome = LocalizeLane::default()
            .make_local(&mut s.db, &SpeakerLifecycle, s.speaker)
            .unwrap();
        assert_eq!(outcome, LocalizeOutcome::AllLocal);
        let speaker = s.db.speaker(s.speaker).unwrap();
        assert!(speaker.id.is_local());
        assert_eq!(speaker.id.users.get(), 3);
        assert_eq!(s.db.speakers().len(), 1);
        for obj in &s.local {
            assert_eq!(s.db.object(*obj).unwrap().data, Some(s.speaker));
        }
    }

    #[test]
    fn test_library_only_owners_leave_speaker_linked() {
        let mut s = scene(0, 2);
        let outcome = LocalizeLane::default()
            .make_local(&mut s.db, &SpeakerLifecycle, s.speaker)
            .unwrap();
        assert_eq!(outcome, LocalizeOutcome::LibraryOnly);
        assert_eq!(s.db.speaker(s.speaker).unwrap().id.lib, Some(s.lib));
        assert_eq!(s.db.speaker(s.speaker).unwrap().id.users.get(), 2);
    }

    #[test]
    fn test_unused_linked_speaker_stays_linked() {
        let mut s = scene(0, 0);
        let outcome = LocalizeLane::default()
            .make_local(&mut s.db, &SpeakerLifecycle, s.speaker)
            .unwrap();
        assert_eq!(outcome, LocalizeOutcome::LibraryOnly);
        assert!(s.db.speaker(s.speaker).unwrap().id.is_linked());
    }

    #[test]
    fn test_mixed_owners_split_the_speaker() {
        let mut s = scene(2, 1);
        let sound = s.db.add_sound("Hum", "//hum.wav").unwrap();
        s.db.assign_sound(s.speaker, Some(sound)).unwrap();

        let outcome = LocalizeLane::default()
            .make_local(&mut s.db, &SpeakerLifecycle, s.speaker)
            .unwrap();
        let LocalizeOutcome::Duplicated { copy, repointed } = outcome else {
            panic!("expected a split, got {outcome:?}");
        };
        assert_eq!(repointed, 2);
        assert!(outcome.changed());

        let original = s.db.speaker(s.speaker).unwrap();
        let duplicate = s.db.speaker(copy).unwrap();
        assert_eq!(original.id.lib, Some(s.lib));
        assert_eq!(original.id.users.get(), 1);
        assert!(duplicate.id.is_local());
        assert_eq!(duplicate.id.users.get(), 2);
        assert_eq!(duplicate.sound, Some(sound));
        assert_eq!(s.db.sound(sound).unwrap().id.users.get(), 2);
        assert_eq!(s.db.speakers().len(), 2);

        for obj in &s.local {
            assert_eq!(s.db.object(*obj).unwrap().data, Some(copy));
        }
        for obj in &s.linked {
            assert_eq!(s.db.object(*obj).unwrap().data, Some(s.speaker));
        }
    }

    #[test]
    fn test_split_copy_keeps_name_when_no_local_collision() {
        let mut s = scene(1, 1);
        let outcome = LocalizeLane::default()
            .make_local(&mut s.db, &SpeakerLifecycle, s.speaker)
            .unwrap();
        let LocalizeOutcome::Duplicated { copy, .. } = outcome else {
            panic!("expected a split, got {outcome:?}");
        };
        assert_eq!(s.db.speaker(copy).unwrap().id.name, "Speaker");
    }

    #[test]
    fn test_inconsistent_count_is_rejected() {
        let mut s = scene(1, 1);
        s.db.speaker_mut(s.speaker).unwrap().id.users.set(5);

        let err = LocalizeLane::default()
            .make_local(&mut s.db, &SpeakerLifecycle, s.speaker)
            .unwrap_err();
        assert!(matches!(err, LifecycleError::PreconditionViolation { .. }));
        assert_eq!(s.db.speakers().len(), 1);
        assert!(s.db.speaker(s.speaker).unwrap().id.is_linked());
    }

    #[test]
    fn test_unchecked_lane_trusts_recorded_count() {
        let mut s = scene(2, 0);
        s.db.speaker_mut(s.speaker).unwrap().id.users.set(5);

        let outcome = LocalizeLane::new(false)
            .make_local(&mut s.db, &SpeakerLifecycle, s.speaker)
            .unwrap();
        assert_eq!(outcome, LocalizeOutcome::AllLocal);
    }

    #[test]
    fn test_allocation_failure_leaves_scene_untouched() {
        // One speaker and two objects fill the database.
        let config = LifecycleConfig {
            max_datablocks: Some(3),
            ..Default::default()
        };
        let mut s = scene_with(config, 1, 1);

        let err = LocalizeLane::default()
            .make_local(&mut s.db, &SpeakerLifecycle, s.speaker)
            .unwrap_err();
        assert!(matches!(err, LifecycleError::AllocationFailure { capacity: 3, .. }));
        assert_eq!(s.db.speakers().len(), 1);
        let speaker = s.db.speaker(s.speaker).unwrap();
        assert_eq!(speaker.id.users.get(), 2);
        assert_eq!(speaker.id.lib, Some(s.lib));
        assert_eq!(s.db.object(s.local[0]).unwrap().data, Some(s.speaker));
    }

    /// Delegates to a database but refuses owner updates whose call index
    /// falls in `failing`.
    struct FlakyOwners {
        db: Database,
        calls: usize,
        failing: std::ops::Range<usize>,
    }

    impl<T: Datablock> DatablockRegistry<T> for FlakyOwners
    where
        Database: DatablockRegistry<T>,
    {
        fn allocate(&mut self, block: T) -> Result<DatablockId<T>, LifecycleError> {
            <Database as DatablockRegistry<T>>::allocate(&mut self.db, block)
        }
        fn get(&self, id: DatablockId<T>) -> Option<&T> {
            <Database as DatablockRegistry<T>>::get(&self.db, id)
        }
        fn get_mut(&mut self, id: DatablockId<T>) -> Option<&mut T> {
            <Database as DatablockRegistry<T>>::get_mut(&mut self.db, id)
        }
        fn remove(&mut self, id: DatablockId<T>) -> Option<T> {
            <Database as DatablockRegistry<T>>::remove(&mut self.db, id)
        }
        fn ids(&self) -> Vec<DatablockId<T>> {
            <Database as DatablockRegistry<T>>::ids(&self.db)
        }
        fn clear_library_data(&mut self, id: DatablockId<T>) -> Result<(), LifecycleError> {
            <Database as DatablockRegistry<T>>::clear_library_data(&mut self.db, id)
        }
        fn rebase_paths(&mut self, lib: LibraryId, id: DatablockId<T>) -> Result<(), LifecycleError> {
            <Database as DatablockRegistry<T>>::rebase_paths(&mut self.db, lib, id)
        }
    }

    impl OwnerRegistry<Speaker> for FlakyOwners {
        type Owner = ObjectId;

        fn owners_of(&self, target: SpeakerId) -> Vec<OwnerRef<ObjectId>> {
            <Database as OwnerRegistry<Speaker>>::owners_of(&self.db, target)
        }

        fn set_owner_data(&mut self, owner: ObjectId, target: SpeakerId) -> Result<(), LifecycleError> {
            let call = self.calls;
            self.calls += 1;
            if self.failing.contains(&call) {
                return Err(LifecycleError::precondition("owner is read-only"));
            }
            <Database as OwnerRegistry<Speaker>>::set_owner_data(&mut self.db, owner, target)
        }
    }

    #[test]
    fn test_failed_repoint_rolls_back_split() {
        let mut s = scene(3, 1);
        let sound = s.db.add_sound("Hum", "//hum.wav").unwrap();
        s.db.assign_sound(s.speaker, Some(sound)).unwrap();

        let mut flaky = FlakyOwners {
            db: s.db,
            calls: 0,
            failing: 2..3,
        };
        let err = LocalizeLane::default()
            .make_local(&mut flaky, &SpeakerLifecycle, s.speaker)
            .unwrap_err();
        assert!(matches!(err, LifecycleError::PreconditionViolation { .. }));

        assert_eq!(flaky.db.speakers().len(), 1);
        let speaker = flaky.db.speaker(s.speaker).unwrap();
        assert_eq!(speaker.id.lib, Some(s.lib));
        assert_eq!(speaker.id.users.get(), 4);
        assert_eq!(flaky.db.sound(sound).unwrap().id.users.get(), 1);
        for obj in &s.local {
            assert_eq!(flaky.db.object(*obj).unwrap().data, Some(s.speaker));
        }
    }

    #[test]
    fn test_unrestorable_owner_keeps_copy_alive() {
        let mut s = scene(2, 1);
        let sound = s.db.add_sound("Hum", "//hum.wav").unwrap();
        s.db.assign_sound(s.speaker, Some(sound)).unwrap();

        // The first re-point succeeds, every later owner update fails.
        let mut flaky = FlakyOwners {
            db: s.db,
            calls: 0,
            failing: 1..usize::MAX,
        };
        let err = LocalizeLane::default()
            .make_local(&mut flaky, &SpeakerLifecycle, s.speaker)
            .unwrap_err();
        assert!(matches!(err, LifecycleError::PreconditionViolation { .. }));

        let copy = flaky.db.object(s.local[0]).unwrap().data.unwrap();
        assert_ne!(copy, s.speaker);
        let kept = flaky.db.speaker(copy).expect("copy must still resolve");
        assert_eq!(kept.id.users.get(), 1);
        assert_eq!(kept.sound, Some(sound));
        assert_eq!(flaky.db.speakers().len(), 2);

        assert_eq!(flaky.db.object(s.local[1]).unwrap().data, Some(s.speaker));
        assert_eq!(flaky.db.speaker(s.speaker).unwrap().id.users.get(), 2);
        assert_eq!(flaky.db.sound(sound).unwrap().id.users.get(), 2);

        assert!(validate::check_user_count(&flaky, s.speaker).is_ok());
        assert!(validate::check_user_count(&flaky, copy).is_ok());
    }
}

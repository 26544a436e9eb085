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

//! The in-memory database holding every datablock and library.
//!
//! [`Database`] is the concrete registry the lifecycle lanes run against. It
//! owns one [`DatablockStore`] per kind plus the list of linked libraries, and
//! implements [`DatablockRegistry`] for every kind and [`OwnerRegistry`] for
//! the two ownership relations (object to speaker, speaker to sound).

use crate::datablock::{Library, Object, ObjectId, Sound, SoundId, Speaker, SpeakerId};
use crate::names;
use crate::paths::rebase_relative_path;
use crate::store::DatablockStore;
use linkage_core::{
    Datablock, DatablockId, DatablockRegistry, DatablockUUID, LibraryId, LifecycleConfig,
    LifecycleError, OwnerRef, OwnerRegistry, UserCount,
};
use std::path::{Path, PathBuf};

/// Access to the store holding datablocks of kind `T`.
pub trait Storage<T: Datablock> {
    /// Returns the store.
    fn store(&self) -> &DatablockStore<T>;
    /// Returns the store mutably.
    fn store_mut(&mut self) -> &mut DatablockStore<T>;
}

/// A flat, in-memory universe of datablocks.
#[derive(Debug, Clone)]
pub struct Database {
    /// Path of the main file; anchors `//` paths of local datablocks.
    filepath: Option<PathBuf>,
    config: LifecycleConfig,
    libraries: Vec<Library>,
    speakers: DatablockStore<Speaker>,
    sounds: DatablockStore<Sound>,
    objects: DatablockStore<Object>,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    /// Creates an empty database with the default configuration.
    pub fn new() -> Self {
        Self::with_config(LifecycleConfig::default())
    }

    /// Creates an empty database with the given configuration.
    pub fn with_config(config: LifecycleConfig) -> Self {
        Self {
            filepath: None,
            config,
            libraries: Vec::new(),
            speakers: DatablockStore::new(),
            sounds: DatablockStore::new(),
            objects: DatablockStore::new(),
        }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    /// Returns the main file path, if the database has been saved.
    pub fn filepath(&self) -> Option<&Path> {
        self.filepath.as_deref()
    }

    /// Sets the main file path.
    pub fn set_filepath(&mut self, filepath: impl Into<PathBuf>) {
        self.filepath = Some(filepath.into());
    }

    /// Registers an external library and returns its scope tag.
    pub fn add_library(&mut self, name: impl Into<String>, filepath: impl Into<PathBuf>) -> LibraryId {
        let id = LibraryId(self.libraries.len() as u32);
        let library = Library::new(name, filepath);
        log::debug!("Registered library '{}' as {id}", library.name);
        self.libraries.push(library);
        id
    }

    /// Returns a registered library.
    pub fn library(&self, id: LibraryId) -> Option<&Library> {
        self.libraries.get(id.0 as usize)
    }

    /// Iterates over registered libraries.
    pub fn libraries(&self) -> impl Iterator<Item = (LibraryId, &Library)> + '_ {
        self.libraries
            .iter()
            .enumerate()
            .map(|(i, lib)| (LibraryId(i as u32), lib))
    }

    /// Number of live datablocks across all kinds.
    pub fn total_datablocks(&self) -> usize {
        self.speakers.len() + self.sounds.len() + self.objects.len()
    }

    /// Returns the speaker store.
    pub fn speakers(&self) -> &DatablockStore<Speaker> {
        &self.speakers
    }

    /// Returns the sound store.
    pub fn sounds(&self) -> &DatablockStore<Sound> {
        &self.sounds
    }

    /// Returns the object store.
    pub fn objects(&self) -> &DatablockStore<Object> {
        &self.objects
    }

    /// Returns a speaker.
    pub fn speaker(&self, id: SpeakerId) -> Option<&Speaker> {
        self.speakers.get(id)
    }

    /// Returns a speaker mutably.
    pub fn speaker_mut(&mut self, id: SpeakerId) -> Option<&mut Speaker> {
        self.speakers.get_mut(id)
    }

    /// Returns a sound.
    pub fn sound(&self, id: SoundId) -> Option<&Sound> {
        self.sounds.get(id)
    }

    /// Returns an object.
    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id)
    }

    /// Handles of the speakers linked from `lib`.
    pub fn speakers_in(&self, lib: LibraryId) -> Vec<SpeakerId> {
        self.speakers
            .iter()
            .filter(|(_, speaker)| speaker.id.lib == Some(lib))
            .map(|(id, _)| id)
            .collect()
    }

    /// Registers `block` as linked from `lib`.
    pub fn link<T: Datablock>(
        &mut self,
        lib: LibraryId,
        mut block: T,
    ) -> Result<DatablockId<T>, LifecycleError>
    where
        Self: Storage<T>,
    {
        block.header_mut().lib = Some(lib);
        <Self as DatablockRegistry<T>>::allocate(self, block)
    }

    /// Adds a local object with no data.
    pub fn add_object(&mut self, name: &str) -> Result<ObjectId, LifecycleError> {
        <Self as DatablockRegistry<Object>>::allocate(self, Object::new(name))
    }

    /// Adds a local sound.
    pub fn add_sound(&mut self, name: &str, filepath: &str) -> Result<SoundId, LifecycleError> {
        <Self as DatablockRegistry<Sound>>::allocate(self, Sound::new(name, filepath))
    }

    /// Points an object at a speaker (or at nothing), moving one user from
    /// the previous speaker to the new one.
    pub fn assign_object_data(
        &mut self,
        object: ObjectId,
        data: Option<SpeakerId>,
    ) -> Result<(), LifecycleError> {
        let previous = <Self as DatablockRegistry<Object>>::try_get(self, object)?.data;
        if previous == data {
            return Ok(());
        }
        if let Some(new) = data {
            <Self as DatablockRegistry<Speaker>>::try_get_mut(self, new)?
                .id
                .users
                .increment();
        }
        if let Some(old) = previous {
            if let Some(speaker) = self.speakers.get_mut(old) {
                speaker.id.users.decrement();
            }
        }
        if let Some(obj) = self.objects.get_mut(object) {
            obj.data = data;
        }
        Ok(())
    }

    /// Points a speaker at a sound (or at nothing), moving one user from the
    /// previous sound to the new one.
    pub fn assign_sound(
        &mut self,
        speaker: SpeakerId,
        sound: Option<SoundId>,
    ) -> Result<(), LifecycleError> {
        let previous = <Self as DatablockRegistry<Speaker>>::try_get(self, speaker)?.sound;
        if previous == sound {
            return Ok(());
        }
        if let Some(new) = sound {
            <Self as DatablockRegistry<Sound>>::try_get_mut(self, new)?
                .id
                .users
                .increment();
        }
        if let Some(old) = previous {
            if let Some(sound) = self.sounds.get_mut(old) {
                sound.id.users.decrement();
            }
        }
        if let Some(spk) = self.speakers.get_mut(speaker) {
            spk.sound = sound;
        }
        Ok(())
    }

    /// Removes an object, dropping the user it held on its speaker.
    pub fn remove_object(&mut self, object: ObjectId) -> Result<Object, LifecycleError> {
        self.assign_object_data(object, None)?;
        <Self as DatablockRegistry<Object>>::remove(self, object).ok_or(LifecycleError::NotFound {
            kind: Object::CODE,
            index: object.index,
        })
    }

    fn unique_name<T: Datablock>(
        &self,
        wanted: &str,
        lib: Option<LibraryId>,
        exclude: Option<DatablockId<T>>,
    ) -> String
    where
        Self: Storage<T>,
    {
        let store = <Self as Storage<T>>::store(self);
        names::unique_name(wanted, self.config.max_name_len, |candidate| {
            store.iter().any(|(id, block)| {
                Some(id) != exclude
                    && block.header().lib == lib
                    && block.header().name == candidate
            })
        })
    }
}

impl Storage<Speaker> for Database {
    fn store(&self) -> &DatablockStore<Speaker> {
        &self.speakers
    }

    fn store_mut(&mut self) -> &mut DatablockStore<Speaker> {
        &mut self.speakers
    }
}

impl Storage<Sound> for Database {
    fn store(&self) -> &DatablockStore<Sound> {
        &self.sounds
    }

    fn store_mut(&mut self) -> &mut DatablockStore<Sound> {
        &mut self.sounds
    }
}

impl Storage<Object> for Database {
    fn store(&self) -> &DatablockStore<Object> {
        &self.objects
    }

    fn store_mut(&mut self) -> &mut DatablockStore<Object> {
        &mut self.objects
    }
}

impl<T: Datablock> DatablockRegistry<T> for Database
where
    Database: Storage<T>,
{
    fn allocate(&mut self, mut block: T) -> Result<DatablockId<T>, LifecycleError> {
        if let Some(capacity) = self.config.max_datablocks {
            if self.total_datablocks() >= capacity {
                log::warn!(
                    "Refusing to allocate {} '{}': database holds {capacity} datablocks",
                    T::CODE,
                    block.header().name
                );
                return Err(LifecycleError::AllocationFailure {
                    kind: T::CODE,
                    capacity,
                });
            }
        }

        let lib = block.header().lib;
        if let Some(lib) = lib {
            if self.library(lib).is_none() {
                return Err(LifecycleError::UnknownLibrary(lib));
            }
        }

        let name = self.unique_name::<T>(&block.header().name, lib, None);
        let header = block.header_mut();
        header.name = name;
        header.users = UserCount::ZERO;
        header.uuid = DatablockUUID::new();

        let id = <Self as Storage<T>>::store_mut(self).insert(block);
        log::trace!("Allocated {} at {id:?}", T::CODE);
        Ok(id)
    }

    fn get(&self, id: DatablockId<T>) -> Option<&T> {
        <Self as Storage<T>>::store(self).get(id)
    }

    fn get_mut(&mut self, id: DatablockId<T>) -> Option<&mut T> {
        <Self as Storage<T>>::store_mut(self).get_mut(id)
    }

    fn remove(&mut self, id: DatablockId<T>) -> Option<T> {
        <Self as Storage<T>>::store_mut(self).remove(id)
    }

    fn ids(&self) -> Vec<DatablockId<T>> {
        <Self as Storage<T>>::store(self).ids()
    }

    fn clear_library_data(&mut self, id: DatablockId<T>) -> Result<(), LifecycleError> {
        let name = <Self as DatablockRegistry<T>>::try_get(self, id)?
            .header()
            .name
            .clone();
        let unique = self.unique_name::<T>(&name, None, Some(id));
        let header = <Self as DatablockRegistry<T>>::try_get_mut(self, id)?.header_mut();
        if unique != name {
            log::debug!("Local name '{name}' is taken, renaming {} to '{unique}'", T::CODE);
        }
        header.lib = None;
        header.name = unique;
        Ok(())
    }

    fn rebase_paths(&mut self, lib: LibraryId, id: DatablockId<T>) -> Result<(), LifecycleError> {
        let library_file = self
            .library(lib)
            .ok_or(LifecycleError::UnknownLibrary(lib))?
            .filepath
            .clone();
        let main_file = self.filepath.clone();
        let block = <Self as DatablockRegistry<T>>::try_get_mut(self, id)?;

        let mut rewritten = 0usize;
        block.foreach_path_mut(&mut |path| {
            if let Some(rebased) = rebase_relative_path(path, &library_file, main_file.as_deref()) {
                *path = rebased;
                rewritten += 1;
            }
        });
        if rewritten > 0 {
            log::debug!("Rebased {rewritten} path(s) of {} {id:?} from {lib}", T::CODE);
        }
        Ok(())
    }
}

impl OwnerRegistry<Speaker> for Database {
    type Owner = ObjectId;

    fn owners_of(&self, target: SpeakerId) -> Vec<OwnerRef<ObjectId>> {
        self.objects
            .iter()
            .filter(|(_, object)| object.data == Some(target))
            .map(|(id, object)| OwnerRef {
                owner: id,
                lib: object.id.lib,
            })
            .collect()
    }

    fn set_owner_data(&mut self, owner: ObjectId, target: SpeakerId) -> Result<(), LifecycleError> {
        let object = <Self as DatablockRegistry<Object>>::try_get_mut(self, owner)?;
        object.data = Some(target);
        Ok(())
    }
}

impl OwnerRegistry<Sound> for Database {
    type Owner = SpeakerId;

    fn owners_of(&self, target: SoundId) -> Vec<OwnerRef<SpeakerId>> {
        self.speakers
            .iter()
            .filter(|(_, speaker)| speaker.sound == Some(target))
            .map(|(id, speaker)| OwnerRef {
                owner: id,
                lib: speaker.id.lib,
            })
            .collect()
    }

    fn set_owner_data(&mut self, owner: SpeakerId, target: SoundId) -> Result<(), LifecycleError> {
        let speaker = <Self as DatablockRegistry<Speaker>>::try_get_mut(self, owner)?;
        speaker.sound = Some(target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_resets_bookkeeping_and_uniquifies_names() {
        let mut db = Database::new();
        let mut speaker = Speaker::new("Speaker");
        speaker.id.users = UserCount::new(5);
        let stale_uuid = speaker.id.uuid;

        let a = db.allocate(speaker).unwrap();
        let b = db.allocate(Speaker::new("Speaker")).unwrap();

        let a = db.speaker(a).unwrap();
        assert_eq!(a.id.users.get(), 0);
        assert_ne!(a.id.uuid, stale_uuid);
        assert_eq!(a.id.name, "Speaker");
        assert_eq!(db.speaker(b).unwrap().id.name, "Speaker.001");
    }

    #[test]
    fn test_names_are_unique_per_scope_only() {
        let mut db = Database::new();
        let lib = db.add_library("props", "/proj/libs/props.blend");
        let local = db.allocate(Speaker::new("Speaker")).unwrap();
        let linked = db.link(lib, Speaker::new("Speaker")).unwrap();

        assert_eq!(db.speaker(local).unwrap().id.name, "Speaker");
        assert_eq!(db.speaker(linked).unwrap().id.name, "Speaker");
        assert_eq!(db.speaker(linked).unwrap().id.lib, Some(lib));
    }

    #[test]
    fn test_allocation_fails_at_capacity() {
        let config = LifecycleConfig {
            max_datablocks: Some(2),
            ..Default::default()
        };
        let mut db = Database::with_config(config);
        db.add_object("A").unwrap();
        db.add_sound("S", "//s.wav").unwrap();

        let err = db.allocate(Speaker::new("Speaker")).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::AllocationFailure {
                kind: linkage_core::IdCode::Speaker,
                capacity: 2
            }
        );
        assert!(db.speakers().is_empty());
    }

    #[test]
    fn test_link_rejects_unknown_library() {
        let mut db = Database::new();
        let err = db.link(LibraryId(9), Speaker::new("Speaker")).unwrap_err();
        assert_eq!(err, LifecycleError::UnknownLibrary(LibraryId(9)));
    }

    #[test]
    fn test_clear_library_data_renames_on_local_collision() {
        let mut db = Database::new();
        let lib = db.add_library("props", "/proj/libs/props.blend");
        db.allocate(Speaker::new("Speaker")).unwrap();
        let linked = db.link(lib, Speaker::new("Speaker")).unwrap();

        DatablockRegistry::<Speaker>::clear_library_data(&mut db, linked).unwrap();

        let speaker = db.speaker(linked).unwrap();
        assert!(speaker.id.is_local());
        assert_eq!(speaker.id.name, "Speaker.001");
    }

    #[test]
    fn test_assign_object_data_moves_users() {
        let mut db = Database::new();
        let a = db.allocate(Speaker::new("A")).unwrap();
        let b = db.allocate(Speaker::new("B")).unwrap();
        let ob = db.add_object("Object").unwrap();

        db.assign_object_data(ob, Some(a)).unwrap();
        assert_eq!(db.speaker(a).unwrap().id.users.get(), 1);

        db.assign_object_data(ob, Some(b)).unwrap();
        assert_eq!(db.speaker(a).unwrap().id.users.get(), 0);
        assert_eq!(db.speaker(b).unwrap().id.users.get(), 1);

        db.remove_object(ob).unwrap();
        assert_eq!(db.speaker(b).unwrap().id.users.get(), 0);
        assert!(db.objects().is_empty());
    }

    #[test]
    fn test_owners_of_reports_scope() {
        let mut db = Database::new();
        let lib = db.add_library("props", "/proj/libs/props.blend");
        let speaker = db.link(lib, Speaker::new("Speaker")).unwrap();
        let local = db.add_object("Local").unwrap();
        let linked = db.link(lib, Object::new("Linked")).unwrap();
        let unrelated = db.add_object("Empty").unwrap();
        db.assign_object_data(local, Some(speaker)).unwrap();
        db.assign_object_data(linked, Some(speaker)).unwrap();

        let owners = OwnerRegistry::<Speaker>::owners_of(&db, speaker);
        assert_eq!(owners.len(), 2);
        assert!(owners.iter().any(|o| o.owner == local && o.is_local()));
        assert!(owners.iter().any(|o| o.owner == linked && o.lib == Some(lib)));
        assert!(owners.iter().all(|o| o.owner != unrelated));
    }

    #[test]
    fn test_sound_owners_are_speakers() {
        let mut db = Database::new();
        let sound = db.add_sound("Hum", "//hum.wav").unwrap();
        let speaker = db.allocate(Speaker::new("Speaker")).unwrap();
        db.assign_sound(speaker, Some(sound)).unwrap();

        let owners = OwnerRegistry::<Sound>::owners_of(&db, sound);
        assert_eq!(owners.len(), 1);
        assert_eq!(owners[0].owner, speaker);
        assert_eq!(db.sound(sound).unwrap().id.users.get(), 1);
    }

    #[test]
    fn test_rebase_paths_rewrites_sound_filepath() {
        let mut db = Database::new();
        db.set_filepath("/proj/scene.blend");
        let lib = db.add_library("props", "/proj/libs/props.blend");
        let sound = db.link(lib, Sound::new("Hum", "//sounds/hum.wav")).unwrap();

        DatablockRegistry::<Sound>::rebase_paths(&mut db, lib, sound).unwrap();
        assert_eq!(db.sound(sound).unwrap().filepath, "//libs/sounds/hum.wav");
    }

    #[test]
    fn test_rebase_paths_is_noop_for_speakers() {
        let mut db = Database::new();
        let lib = db.add_library("props", "/proj/libs/props.blend");
        let speaker = db.link(lib, Speaker::new("Speaker")).unwrap();
        let before = db.speaker(speaker).unwrap().clone();

        DatablockRegistry::<Speaker>::rebase_paths(&mut db, lib, speaker).unwrap();
        assert_eq!(db.speaker(speaker).unwrap(), &before);
    }

    #[test]
    fn test_config_from_ron_drives_name_limit() {
        let config = LifecycleConfig::from_ron_str("(max_name_len: 6)").unwrap();
        let mut db = Database::with_config(config);
        let id = db.allocate(Speaker::new("Speaker")).unwrap();
        assert_eq!(db.speaker(id).unwrap().id.name, "Speake");

        let copy = db.allocate(Speaker::new("Speaker")).unwrap();
        let name = &db.speaker(copy).unwrap().id.name;
        assert_eq!(name, "Sp.001");
        assert!(name.len() <= 6);
    }
}

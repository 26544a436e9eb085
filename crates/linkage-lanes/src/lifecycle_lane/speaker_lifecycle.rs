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

use super::LifecycleLane;
use linkage_core::{Datablock, DatablockRegistry, LifecycleError};
use linkage_data::{Sound, Speaker, SpeakerId};

/// Lifecycle of [`Speaker`] datablocks and their shared [`Sound`] reference.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpeakerLifecycle;

impl SpeakerLifecycle {
    /// Creates the strategy.
    pub fn new() -> Self {
        Self
    }
}

impl<R> LifecycleLane<Speaker, R> for SpeakerLifecycle
where
    R: DatablockRegistry<Speaker> + DatablockRegistry<Sound>,
{
    fn strategy_name(&self) -> &'static str {
        "SpeakerLifecycle"
    }

    fn create(&self, registry: &mut R, name: &str) -> Result<SpeakerId, LifecycleError> {
        let id = DatablockRegistry::<Speaker>::allocate(registry, Speaker::new(name))?;
        log::debug!("Created speaker {id:?} from name '{name}'");
        Ok(id)
    }

    fn duplicate(&self, registry: &mut R, source: SpeakerId) -> Result<SpeakerId, LifecycleError> {
        let mut copy = DatablockRegistry::<Speaker>::try_get(registry, source)?.clone();
        let source_lib = copy.id.lib.take();
        let sound = copy.sound;

        // Validate before allocating so a failure leaves the registry untouched.
        if let Some(sound) = sound {
            if DatablockRegistry::<Sound>::get(registry, sound).is_none() {
                return Err(LifecycleError::precondition(format!(
                    "speaker {source:?} references missing sound {sound:?}"
                )));
            }
        }

        let copy_id = DatablockRegistry::<Speaker>::allocate(registry, copy)?;

        if let Some(sound) = sound {
            DatablockRegistry::<Sound>::try_get_mut(registry, sound)?
                .id
                .users
                .increment();
        }

        if let Some(lib) = source_lib {
            if let Err(err) = DatablockRegistry::<Speaker>::rebase_paths(registry, lib, copy_id) {
                log::error!("Rebasing paths of {copy_id:?} from {lib} failed: {err}");
                self.release(registry, copy_id)?;
                DatablockRegistry::<Speaker>::remove(registry, copy_id);
                return Err(err);
            }
        }

        log::debug!("Duplicated speaker {source:?} into {copy_id:?}");
        Ok(copy_id)
    }

    fn release(&self, registry: &mut R, id: SpeakerId) -> Result<(), LifecycleError> {
        let speaker = DatablockRegistry::<Speaker>::try_get_mut(registry, id)?;
        let Some(sound) = speaker.sound.take() else {
            return Ok(());
        };
        match DatablockRegistry::<Sound>::get_mut(registry, sound) {
            Some(sound) => {
                sound.id.users.decrement();
            }
            None => log::warn!("Speaker {id:?} held a dangling sound reference {sound:?}"),
        }
        Ok(())
    }

    fn free(&self, registry: &mut R, id: SpeakerId, release_users: bool) -> Result<(), LifecycleError> {
        if release_users {
            self.release(registry, id)?;
        }
        DatablockRegistry::<Speaker>::try_get_mut(registry, id)?.free_extra_data();
        Ok(())
    }
}

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

//! The LibraryAgent owns a datablock database and runs localization over it.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use linkage_core::{LibraryId, LifecycleConfig, LifecycleError, OwnerRegistry};
use linkage_data::{Database, Sound, Speaker, SpeakerId};
use linkage_lanes::validate::find_user_count_mismatches;
use linkage_lanes::{LifecycleLane, LocalizeLane, LocalizeOutcome, SpeakerLifecycle};

use super::LibraryStatus;

/// Drives speaker lifecycle and localization over an owned [`Database`].
#[derive(Debug)]
pub struct LibraryAgent {
    database: Database,
    lifecycle: SpeakerLifecycle,
    localize: LocalizeLane,
    localized: usize,
    duplicated: usize,
}

impl Default for LibraryAgent {
    fn default() -> Self {
        Self::new(LifecycleConfig::default())
    }
}

impl LibraryAgent {
    /// Creates an agent over an empty database.
    pub fn new(config: LifecycleConfig) -> Self {
        let localize = LocalizeLane::from_config(&config);
        let lifecycle = SpeakerLifecycle::new();
        log::debug!(
            "LibraryAgent: using {} and {}",
            LifecycleLane::<Speaker, Database>::strategy_name(&lifecycle),
            localize.strategy_name()
        );
        Self {
            database: Database::with_config(config),
            lifecycle,
            localize,
            localized: 0,
            duplicated: 0,
        }
    }

    /// Creates an agent from a RON configuration string.
    pub fn from_ron_config(text: &str) -> Result<Self> {
        let config =
            LifecycleConfig::from_ron_str(text).context("Failed to parse RON lifecycle config")?;
        Ok(Self::new(config))
    }

    /// Creates an agent from a configuration file, JSON if the extension is
    /// `json` and RON otherwise.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => LifecycleConfig::from_json_str(&text),
            _ => LifecycleConfig::from_ron_str(&text),
        }
        .with_context(|| format!("Invalid lifecycle config in {}", path.display()))?;
        log::debug!("Loaded lifecycle config from {}: {config:?}", path.display());
        Ok(Self::new(config))
    }

    /// Returns the owned database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Returns the owned database mutably.
    pub fn database_mut(&mut self) -> &mut Database {
        &mut self.database
    }

    /// Sets the path of the main file, used to keep rebased paths relative.
    pub fn set_main_file(&mut self, filepath: impl Into<PathBuf>) {
        self.database.set_filepath(filepath);
    }

    /// Registers a library.
    pub fn link_library(
        &mut self,
        name: impl Into<String>,
        filepath: impl Into<PathBuf>,
    ) -> LibraryId {
        let lib = self.database.add_library(name, filepath);
        log::debug!("LibraryAgent: linked library {lib}");
        lib
    }

    /// Links a default speaker from `lib`.
    pub fn link_speaker(&mut self, lib: LibraryId, name: &str) -> Result<SpeakerId> {
        self.database
            .link(lib, Speaker::new(name))
            .with_context(|| format!("Failed to link speaker '{name}' from {lib}"))
    }

    /// Creates a local speaker with default settings.
    pub fn create_speaker(&mut self, name: &str) -> Result<SpeakerId> {
        self.lifecycle
            .create(&mut self.database, name)
            .with_context(|| format!("Failed to create speaker '{name}'"))
    }

    /// Makes a local copy of a speaker.
    pub fn copy_speaker(&mut self, source: SpeakerId) -> Result<SpeakerId> {
        self.lifecycle
            .duplicate(&mut self.database, source)
            .with_context(|| format!("Failed to copy speaker {source:?}"))
    }

    /// Drops the speaker's reference to its sound.
    pub fn release_speaker(&mut self, id: SpeakerId) -> Result<()> {
        self.lifecycle
            .release(&mut self.database, id)
            .with_context(|| format!("Failed to release speaker {id:?}"))
    }

    /// Releases and unregisters a speaker nothing references anymore.
    pub fn remove_speaker(&mut self, id: SpeakerId) -> Result<Speaker> {
        let owners = OwnerRegistry::<Speaker>::owners_of(&self.database, id).len();
        if owners > 0 {
            bail!("Speaker {id:?} is still used by {owners} object(s)");
        }
        self.lifecycle
            .remove(&mut self.database, id)
            .with_context(|| format!("Failed to remove speaker {id:?}"))
    }

    /// Makes one speaker local.
    pub fn make_local(&mut self, id: SpeakerId) -> Result<LocalizeOutcome<Speaker>> {
        let outcome = self
            .localize
            .make_local(&mut self.database, &self.lifecycle, id)
            .with_context(|| format!("Failed to make speaker {id:?} local"))?;
        self.record(outcome);
        Ok(outcome)
    }

    /// Makes every speaker linked from `lib` local.
    ///
    /// Stops at the first failure; speakers handled before it keep their new
    /// state.
    pub fn make_library_local(
        &mut self,
        lib: LibraryId,
    ) -> Result<Vec<(SpeakerId, LocalizeOutcome<Speaker>)>> {
        if self.database.library(lib).is_none() {
            return Err(LifecycleError::UnknownLibrary(lib))
                .context("Cannot localize an unregistered library");
        }

        let speakers = self.database.speakers_in(lib);
        let mut outcomes = Vec::with_capacity(speakers.len());
        for id in speakers {
            let outcome = self
                .make_local(id)
                .with_context(|| format!("Localizing library {lib} stopped"))?;
            outcomes.push((id, outcome));
        }

        let changed = outcomes.iter().filter(|(_, o)| o.changed()).count();
        log::info!(
            "LibraryAgent: localized {lib}, {changed} of {} speaker(s) changed",
            outcomes.len()
        );
        Ok(outcomes)
    }

    /// Checks that every speaker and sound count matches its owners.
    pub fn verify(&self) -> Result<()> {
        let speakers = find_user_count_mismatches::<Speaker, _>(&self.database);
        let sounds = find_user_count_mismatches::<Sound, _>(&self.database);
        if speakers.is_empty() && sounds.is_empty() {
            return Ok(());
        }
        for m in &speakers {
            log::warn!(
                "Speaker {:?} records {} user(s), found {} owner(s)",
                m.id,
                m.recorded,
                m.owners
            );
        }
        for m in &sounds {
            log::warn!(
                "Sound {:?} records {} user(s), found {} owner(s)",
                m.id,
                m.recorded,
                m.owners
            );
        }
        bail!(
            "{} speaker(s) and {} sound(s) have inconsistent user counts",
            speakers.len(),
            sounds.len()
        )
    }

    /// Names of the lifecycle and localization strategies in use.
    pub fn strategies(&self) -> (&'static str, &'static str) {
        (
            LifecycleLane::<Speaker, Database>::strategy_name(&self.lifecycle),
            self.localize.strategy_name(),
        )
    }

    /// Summarizes the database and the localization work done so far.
    pub fn report_status(&self) -> LibraryStatus {
        let speakers = self.database.speakers();
        LibraryStatus {
            libraries: self.database.libraries().count(),
            speakers: speakers.len(),
            linked_speakers: speakers.iter().filter(|(_, s)| s.id.is_linked()).count(),
            sounds: self.database.sounds().len(),
            objects: self.database.objects().len(),
            localized: self.localized,
            duplicated: self.duplicated,
            inconsistent: find_user_count_mismatches::<Speaker, _>(&self.database).len()
                + find_user_count_mismatches::<Sound, _>(&self.database).len(),
        }
    }

    fn record(&mut self, outcome: LocalizeOutcome<Speaker>) {
        match outcome {
            LocalizeOutcome::SoleUser | LocalizeOutcome::AllLocal => self.localized += 1,
            LocalizeOutcome::Duplicated { .. } => self.duplicated += 1,
            LocalizeOutcome::AlreadyLocal | LocalizeOutcome::LibraryOnly => {}
        }
    }
}

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

/// A snapshot of the agent's database and of the work it has done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LibraryStatus {
    /// Registered libraries.
    pub libraries: usize,
    /// Live speakers, local and linked.
    pub speakers: usize,
    /// Speakers still linked from a library.
    pub linked_speakers: usize,
    /// Live sounds.
    pub sounds: usize,
    /// Live objects.
    pub objects: usize,
    /// Speakers made local in place since the agent was created.
    pub localized: usize,
    /// Speakers split into a local copy since the agent was created.
    pub duplicated: usize,
    /// Datablocks whose user count disagrees with their owners.
    pub inconsistent: usize,
}

impl LibraryStatus {
    /// Returns `true` if every user count matches its owners.
    pub fn is_healthy(&self) -> bool {
        self.inconsistent == 0
    }
}

impl fmt::Display for LibraryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "libraries={} speakers={} (linked={}) sounds={} objects={} localized={} duplicated={} inconsistent={}",
            self.libraries,
            self.speakers,
            self.linked_speakers,
            self.sounds,
            self.objects,
            self.localized,
            self.duplicated,
            self.inconsistent
        )
    }
}

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

//! Defines the sound datablock, the shared sub-asset speakers play.

use linkage_core::datablock::{Datablock, IdCode, IdHeader};

/// A sound resource referenced by speakers.
///
/// Decoding is not this crate's concern; a sound is only its identity and the
/// path of its source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Sound {
    /// Identity header. Its user count tracks referencing speakers.
    pub id: IdHeader,
    /// Source file path, possibly `//`-relative to the owning file.
    pub filepath: String,
}

impl Sound {
    /// Creates a local sound pointing at `filepath`.
    pub fn new(name: impl Into<String>, filepath: impl Into<String>) -> Self {
        Self {
            id: IdHeader::new(name),
            filepath: filepath.into(),
        }
    }
}

impl Datablock for Sound {
    const CODE: IdCode = IdCode::Sound;

    fn header(&self) -> &IdHeader {
        &self.id
    }

    fn header_mut(&mut self) -> &mut IdHeader {
        &mut self.id
    }

    fn foreach_path_mut(&mut self, visit: &mut dyn FnMut(&mut String)) {
        visit(&mut self.filepath);
    }
}

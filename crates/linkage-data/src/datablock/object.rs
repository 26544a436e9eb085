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

//! Defines the object datablock, the owner that places a speaker in a scene.

use super::SpeakerId;
use linkage_core::datablock::{Datablock, IdCode, IdHeader};

/// A placed object instance.
///
/// An object holds at most one data reference. Several objects may share the
/// same speaker; each one accounts for one user of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    /// Identity header. Its scope tag decides how localization treats the object.
    pub id: IdHeader,
    /// The speaker this object instances, if any.
    pub data: Option<SpeakerId>,
}

impl Object {
    /// Creates a local, empty object.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: IdHeader::new(name),
            data: None,
        }
    }
}

impl Datablock for Object {
    const CODE: IdCode = IdCode::Object;

    fn header(&self) -> &IdHeader {
        &self.id
    }

    fn header_mut(&mut self) -> &mut IdHeader {
        &mut self.id
    }
}

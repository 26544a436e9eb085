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

//! Provides the foundational trait and identity types for datablocks.
//!
//! A datablock is any record a registry manages: the assets being shared, the
//! sub-assets they reference, and the owners pointing at them. Every datablock
//! carries an [`IdHeader`] with its name, its scope tag and its user count.

mod id;
mod uuid;

pub use id::*;
pub use uuid::*;

use crate::library::LibraryId;
use crate::users::UserCount;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a datablock, used in diagnostics and error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdCode {
    /// An audio-emitting datablock placed in the scene through an object.
    Speaker,
    /// A sound resource referenced by speakers.
    Sound,
    /// A placed object instance holding a reference to its data.
    Object,
}

impl IdCode {
    /// Returns the lowercase display name of the kind.
    pub const fn as_str(&self) -> &'static str {
        match self {
            IdCode::Speaker => "speaker",
            IdCode::Sound => "sound",
            IdCode::Object => "object",
        }
    }
}

impl fmt::Display for IdCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity and bookkeeping fields shared by every datablock.
#[derive(Debug, Clone, PartialEq)]
pub struct IdHeader {
    /// Human-readable name, unique per kind and scope inside a registry.
    pub name: String,
    /// The scope tag. `None` means locally owned; `Some` names the library
    /// the datablock was linked from.
    pub lib: Option<LibraryId>,
    /// Number of owners currently pointing at this datablock.
    pub users: UserCount,
    /// Persistent identity, regenerated on duplication.
    pub uuid: DatablockUUID,
}

impl IdHeader {
    /// Creates a local header with no users.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lib: None,
            users: UserCount::ZERO,
            uuid: DatablockUUID::new(),
        }
    }

    /// Returns `true` if the datablock belongs to the local scope.
    pub fn is_local(&self) -> bool {
        self.lib.is_none()
    }

    /// Returns `true` if the datablock is owned by an external library.
    pub fn is_linked(&self) -> bool {
        self.lib.is_some()
    }
}

/// A record that can be managed by a datablock registry.
///
/// `Clone` is the shallow copy used by duplication: handles to other
/// datablocks are copied as-is, and the caller fixes up the user counts.
pub trait Datablock: Clone + fmt::Debug + Send + Sync + 'static {
    /// The kind of this datablock.
    const CODE: IdCode;

    /// Returns the identity header.
    fn header(&self) -> &IdHeader;

    /// Returns the identity header mutably.
    fn header_mut(&mut self) -> &mut IdHeader;

    /// Visits every scope-relative file path stored in the datablock.
    fn foreach_path_mut(&mut self, _visit: &mut dyn FnMut(&mut String)) {}

    /// Releases auxiliary time-varying data (animation) attached to the datablock.
    ///
    /// Called by teardown regardless of the user count.
    fn free_extra_data(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_header_is_local_and_unused() {
        let header = IdHeader::new("Speaker");
        assert!(header.is_local());
        assert!(!header.is_linked());
        assert_eq!(header.users.get(), 0);
        assert_eq!(header.name, "Speaker");
    }

    #[test]
    fn test_headers_get_distinct_uuids() {
        let a = IdHeader::new("A");
        let b = IdHeader::new("A");
        assert_ne!(a.uuid, b.uuid);
    }

    #[test]
    fn test_id_code_display() {
        assert_eq!(IdCode::Speaker.to_string(), "speaker");
        assert_eq!(IdCode::Object.as_str(), "object");
    }
}

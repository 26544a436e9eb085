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

//! Scope tags naming the external library a datablock was linked from.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies an external library registered in a datablock registry.
///
/// Libraries are registered once and never recycled, so a plain index is
/// enough. A datablock whose `lib` is `Some(LibraryId)` is library-owned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LibraryId(pub u32);

impl fmt::Display for LibraryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LI{}", self.0)
    }
}

impl From<u32> for LibraryId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

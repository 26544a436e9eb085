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

//! The per-datablock reference counter.
//!
//! Counting is manual: every place that stores a handle to a datablock pairs
//! that store with one [`UserCount::increment`], and every place that drops the
//! handle pairs it with one [`UserCount::decrement`]. A count of zero means the
//! datablock may be reclaimed, which is the registry's business, not ours.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of owners currently referencing a datablock. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct UserCount(u32);

impl UserCount {
    /// A count with no users.
    pub const ZERO: Self = Self(0);

    /// Creates a count with `users` users.
    pub const fn new(users: u32) -> Self {
        Self(users)
    }

    /// Returns the raw count.
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns `true` if nothing references the datablock.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds one user. Saturates at `u32::MAX`.
    pub fn increment(&mut self) {
        self.0 = self.0.saturating_add(1);
    }

    /// Removes one user.
    ///
    /// Returns `false` and leaves the count at zero if there was no user to
    /// remove; that is always a bookkeeping bug upstream, so it is logged.
    pub fn decrement(&mut self) -> bool {
        if self.0 == 0 {
            log::error!("User count decrement below zero, count left at 0");
            return false;
        }
        self.0 -= 1;
        true
    }

    /// Overwrites the count.
    pub fn set(&mut self, users: u32) {
        self.0 = users;
    }
}

impl fmt::Display for UserCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for UserCount {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

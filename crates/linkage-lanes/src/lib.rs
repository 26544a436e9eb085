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

//! # Linkage Lanes
//!
//! The algorithms that mutate a datablock registry.
//!
//! - [`lifecycle_lane`]: creation, duplication, release and teardown of datablocks,
//!   keeping sub-asset user counts paired with every reference created or dropped.
//! - [`localize_lane`]: conversion of library-owned datablocks into local ones,
//!   in place or by splitting them between local and library owners.
//! - [`validate`]: user-count invariant checks shared by both.
//!
//! Every lane takes the registry as an explicit `&mut` parameter.

#![warn(missing_docs)]

pub mod lifecycle_lane;
pub mod localize_lane;
pub mod validate;

pub use lifecycle_lane::{LifecycleLane, SpeakerLifecycle};
pub use localize_lane::{classify, LocalizeLane, LocalizeOutcome, ScopeMix, UserPartition};

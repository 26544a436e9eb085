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

//! # Linkage Core
//!
//! Foundational crate containing the handles, scope tags, user counter and
//! registry contracts shared by every layer of the datablock lifecycle engine.
//!
//! Nothing in here knows how datablocks are stored. Concrete storage lives in
//! `linkage-data`, and the algorithms that mutate it live in `linkage-lanes`.

#![warn(missing_docs)]

pub mod config;
pub mod datablock;
pub mod error;
pub mod library;
pub mod registry;
pub mod users;

pub use config::LifecycleConfig;
pub use datablock::{Datablock, DatablockId, DatablockUUID, IdCode, IdHeader};
pub use error::{ConfigError, LifecycleError};
pub use library::LibraryId;
pub use registry::{DatablockRegistry, OwnerRef, OwnerRegistry};
pub use users::UserCount;

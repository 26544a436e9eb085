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

//! # Linkage Data
//!
//! Concrete datablock layouts (speakers, sounds, objects, libraries), the
//! generational store that holds them, and the in-memory [`Database`] that
//! implements every registry contract from `linkage-core`.

#![warn(missing_docs)]

pub mod database;
pub mod datablock;
pub mod names;
pub mod paths;
pub mod store;

pub use database::{Database, Storage};
pub use datablock::*;
pub use store::DatablockStore;

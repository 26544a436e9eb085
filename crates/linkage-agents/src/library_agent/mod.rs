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

//! The agent for linked libraries.
//!
//! It owns the [`Database`](linkage_data::Database), links libraries into it
//! and turns linked speakers into local ones, one at a time or a whole
//! library at once, by delegating to the lifecycle and localization lanes.

pub mod agent;
mod status;

pub use agent::LibraryAgent;
pub use status::LibraryStatus;

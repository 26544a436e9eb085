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

//! Concrete datablock layouts.

mod anim;
mod library;
mod object;
mod sound;
mod speaker;

pub use anim::*;
pub use library::*;
pub use object::*;
pub use sound::*;
pub use speaker::*;

use linkage_core::DatablockId;

/// Handle to a [`Speaker`].
pub type SpeakerId = DatablockId<Speaker>;
/// Handle to a [`Sound`].
pub type SoundId = DatablockId<Sound>;
/// Handle to an [`Object`].
pub type ObjectId = DatablockId<Object>;

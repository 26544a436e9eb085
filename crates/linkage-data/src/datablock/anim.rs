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

use serde::{Deserialize, Serialize};

/// A single animated property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FCurve {
    /// Path of the animated property, e.g. `"settings.volume"`.
    pub rna_path: String,
    /// `[frame, value]` pairs, sorted by frame.
    pub keyframes: Vec<[f32; 2]>,
}

/// Time-varying data attached to a datablock.
///
/// Owned by the datablock, deep-copied on duplication and dropped on teardown.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnimData {
    /// Name of the assigned action, if any.
    pub action: Option<String>,
    /// Animated properties.
    pub curves: Vec<FCurve>,
}

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

//! Runtime settings for registries and lifecycle lanes.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Default maximum datablock name length, in bytes.
pub const DEFAULT_MAX_NAME_LEN: usize = 63;

/// Smallest usable name length: one base character plus a `.NNN` suffix.
pub const MIN_NAME_LEN: usize = 5;

/// Settings shared by a registry and the lanes operating on it.
///
/// Every field has a default, so partial RON or JSON documents are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Compare user counts against the actual owner set during localization.
    pub check_invariants: bool,
    /// Maximum number of live datablocks across all kinds. `None` is unbounded.
    pub max_datablocks: Option<usize>,
    /// Names longer than this are truncated on a char boundary.
    pub max_name_len: usize,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            check_invariants: true,
            max_datablocks: None,
            max_name_len: DEFAULT_MAX_NAME_LEN,
        }
    }
}

impl LifecycleConfig {
    /// Parses a configuration from RON text.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validated()
    }

    /// Parses a configuration from JSON text.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.max_name_len < MIN_NAME_LEN {
            return Err(ConfigError::Invalid(format!(
                "max_name_len must be at least {MIN_NAME_LEN}, got {}",
                self.max_name_len
            )));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LifecycleConfig::default();
        assert!(config.check_invariants);
        assert_eq!(config.max_datablocks, None);
        assert_eq!(config.max_name_len, 63);
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = LifecycleConfig::from_ron_str("(max_datablocks: Some(16))").unwrap();
        assert_eq!(config.max_datablocks, Some(16));
        assert!(config.check_invariants);
    }

    #[test]
    fn test_json_source() {
        let config =
            LifecycleConfig::from_json_str(r#"{"check_invariants": false, "max_name_len": 8}"#)
                .unwrap();
        assert!(!config.check_invariants);
        assert_eq!(config.max_name_len, 8);
    }

    #[test]
    fn test_rejects_name_len_shorter_than_suffix() {
        let err = LifecycleConfig::from_ron_str("(max_name_len: 0)").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = LifecycleConfig::from_json_str(r#"{"max_name_len": 4}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let config = LifecycleConfig::from_ron_str("(max_name_len: 5)").unwrap();
        assert_eq!(config.max_name_len, MIN_NAME_LEN);
    }

    #[test]
    fn test_malformed_ron_is_reported() {
        let err = LifecycleConfig::from_ron_str("(max_datablocks: ").unwrap_err();
        assert!(matches!(err, ConfigError::Ron(_)));
    }
}

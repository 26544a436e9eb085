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

//! Datablock name helpers: truncation and `.NNN` collision suffixes.

use linkage_core::config::MIN_NAME_LEN;

/// Truncates `name` to at most `max_len` bytes without splitting a char.
pub fn truncate_name(name: &str, max_len: usize) -> &str {
    if name.len() <= max_len {
        return name;
    }
    let mut end = max_len;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

/// Splits a trailing `.NNN` numeric suffix off a name.
///
/// `"Speaker.004"` gives `("Speaker", Some(4))`; a name without a purely
/// numeric suffix is returned whole.
pub fn split_numeric_suffix(name: &str) -> (&str, Option<u32>) {
    if let Some((base, digits)) = name.rsplit_once('.') {
        if !base.is_empty() && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(number) = digits.parse() {
                return (base, Some(number));
            }
        }
    }
    (name, None)
}

/// Returns `wanted` (truncated) if it is free, otherwise the first free
/// `base.NNN` variant, starting at `.001`.
///
/// `max_len` is raised to [`MIN_NAME_LEN`] so a suffixed name always keeps at
/// least one character of its base.
pub fn unique_name(wanted: &str, max_len: usize, is_taken: impl Fn(&str) -> bool) -> String {
    let max_len = max_len.max(MIN_NAME_LEN);
    let wanted = truncate_name(wanted, max_len);
    if !is_taken(wanted) {
        return wanted.to_string();
    }

    let (base, _) = split_numeric_suffix(wanted);
    let mut number: u32 = 1;
    loop {
        let suffix = format!(".{number:03}");
        let room = max_len.saturating_sub(suffix.len()).max(1);
        let candidate = format!("{}{}", truncate_name(base, room), suffix);
        if !is_taken(&candidate) {
            return candidate;
        }
        number += 1;
    }
}

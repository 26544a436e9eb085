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

//! Rebasing of file-relative paths when a datablock leaves its library.
//!
//! Paths starting with `//` are relative to the directory of the file that
//! owns the datablock. Once a datablock is copied out of a library, those
//! paths must be re-expressed relative to the main file (or made absolute).

use std::path::{Component, Path, PathBuf};

/// Prefix marking a path as relative to the owning file.
pub const RELATIVE_PREFIX: &str = "//";

/// Returns `true` if `path` is relative to its owning file.
pub fn is_file_relative(path: &str) -> bool {
    path.starts_with(RELATIVE_PREFIX)
}

/// Re-expresses a `//`-relative path from `library_file` against `main_file`.
///
/// Returns `None` for paths that are not file-relative, which callers leave
/// untouched. If the resolved path lies outside the main file's directory, or
/// there is no main file, the absolute path is returned.
pub fn rebase_relative_path(
    path: &str,
    library_file: &Path,
    main_file: Option<&Path>,
) -> Option<String> {
    let rest = path.strip_prefix(RELATIVE_PREFIX)?;
    let library_dir = library_file.parent().unwrap_or_else(|| Path::new(""));
    let absolute = normalize(&library_dir.join(rest));

    let relative = main_file
        .and_then(Path::parent)
        .and_then(|main_dir| absolute.strip_prefix(normalize(main_dir)).ok());

    Some(match relative {
        Some(relative) => format!("{RELATIVE_PREFIX}{}", join_with_slashes(relative)),
        None => absolute.to_string_lossy().into_owned(),
    })
}

/// Lexically resolves `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn join_with_slashes(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

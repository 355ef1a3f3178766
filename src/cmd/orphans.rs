// Copyright 2025 Fernando Borretti
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

use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::content::Content;
use crate::error::Fallible;
use crate::media::load::content_type;
use crate::media::resolve::is_external;

pub fn list_orphans(directory: Option<String>) -> Fallible<()> {
    for orphan in find_orphans(directory)? {
        println!("{}", orphan.display());
    }
    Ok(())
}

/// Image files in the content directory that no card refers to, relative to
/// the directory and sorted.
fn find_orphans(directory: Option<String>) -> Fallible<Vec<PathBuf>> {
    let content = Content::open(directory)?;
    let cards = content.cards()?;
    let referenced: HashSet<PathBuf> = cards
        .iter()
        .filter_map(|card| card.image())
        .filter(|image| !is_external(&image.path))
        .map(|image| normalize_relative(Path::new(&image.path)))
        .collect();

    let mut orphans = Vec::new();
    for entry in WalkDir::new(&content.directory) {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || content_type(path) == "application/octet-stream" {
            continue;
        }
        let Ok(relative) = path.strip_prefix(&content.directory) else {
            continue;
        };
        let relative = normalize_relative(relative);
        if !referenced.contains(&relative) {
            orphans.push(relative);
        }
    }
    orphans.sort();
    Ok(orphans)
}

/// Drop `.` components so `./a.png` and `a.png` compare equal.
fn normalize_relative(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, std::path::Component::CurDir))
        .collect()
}

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

use std::fs::create_dir_all;
use std::fs::write;
use std::path::PathBuf;

use tempfile::tempdir;

use crate::error::Fallible;

pub fn create_tmp_directory() -> Fallible<PathBuf> {
    let dir: PathBuf = tempdir()?.keep().canonicalize()?;
    Ok(dir)
}

/// A content directory with three cards, one of them with a local image.
pub fn create_sample_content() -> Fallible<PathBuf> {
    let dir: PathBuf = create_tmp_directory()?;
    create_dir_all(dir.join("images"))?;
    write(dir.join("images/bird.png"), b"not really a png")?;
    write(
        dir.join("content.json"),
        r#"{
            "description": "Name the animal",
            "contentId": "animals",
            "autoAdvanceMs": 60000,
            "cards": [
                {"text": "Katze", "answer": "cat", "tip": "It meows"},
                {"text": "Hund", "answer": "dog"},
                {
                    "text": "Vogel",
                    "answer": "bird",
                    "image": {
                        "path": "images/bird.png",
                        "width": 64,
                        "height": 48,
                        "copyright": {"author": "Jane Doe", "license": "CC0 1.0"}
                    }
                }
            ]
        }"#,
    )?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_sample_content() -> Fallible<()> {
        let dir = create_sample_content()?;
        assert!(dir.join("content.json").is_file());
        assert!(dir.join("images/bird.png").is_file());
        Ok(())
    }
}

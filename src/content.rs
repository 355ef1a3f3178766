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

use std::env::current_dir;
use std::fs::read_to_string;
use std::path::PathBuf;

use crate::error::Fallible;
use crate::error::fail;
use crate::media::load::MediaLoader;
use crate::types::card::Card;
use crate::types::card::build_cards;
use crate::types::config::SessionConfig;

const JSON_FILE: &str = "content.json";
const TOML_FILE: &str = "content.toml";

/// A content directory: the widget configuration plus its media files.
pub struct Content {
    pub directory: PathBuf,
    pub config_path: PathBuf,
    pub config: SessionConfig,
    pub content_id: String,
}

impl Content {
    pub fn open(directory: Option<String>) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        let directory = if directory.exists() {
            directory.canonicalize()?
        } else {
            return fail("directory does not exist.");
        };

        let json_path = directory.join(JSON_FILE);
        let toml_path = directory.join(TOML_FILE);
        let (config_path, config) = if json_path.exists() {
            let source = read_to_string(&json_path)?;
            (json_path, SessionConfig::from_json(&source)?)
        } else if toml_path.exists() {
            let source = read_to_string(&toml_path)?;
            (toml_path, SessionConfig::from_toml(&source)?)
        } else {
            return fail(format!("no {JSON_FILE} or {TOML_FILE} in directory."));
        };
        log::debug!("Loaded configuration from {}.", config_path.display());

        let content_id = match &config.content_id {
            Some(id) if !id.trim().is_empty() => id.trim().to_string(),
            _ => {
                // Derive a stable id from the configuration itself.
                let bytes = std::fs::read(&config_path)?;
                blake3::hash(&bytes).to_hex()[..8].to_string()
            }
        };

        Ok(Self {
            directory,
            config_path,
            config,
            content_id,
        })
    }

    pub fn cards(&self) -> Fallible<Vec<Card>> {
        build_cards(&self.config)
    }

    pub fn loader(&self) -> MediaLoader {
        MediaLoader::new(self.directory.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use super::*;
    use crate::helper::create_sample_content;
    use crate::helper::create_tmp_directory;

    #[test]
    fn test_non_existent_directory() {
        let result = Content::open(Some("./derpherp".to_string()));
        assert_eq!(
            result.err().map(|e| e.to_string()),
            Some("error: directory does not exist.".to_string())
        );
    }

    #[test]
    fn test_missing_configuration() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let result = Content::open(Some(dir.display().to_string()));
        assert_eq!(
            result.err().map(|e| e.to_string()),
            Some("error: no content.json or content.toml in directory.".to_string())
        );
        Ok(())
    }

    #[test]
    fn test_json_content() -> Fallible<()> {
        let dir = create_sample_content()?;
        let content = Content::open(Some(dir.display().to_string()))?;
        assert_eq!(content.content_id, "animals");
        assert_eq!(content.cards()?.len(), 3);
        assert_eq!(content.config_path, dir.join("content.json"));
        Ok(())
    }

    #[test]
    fn test_toml_content_with_derived_id() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let source = "[[cards]]\ntext = \"Hund\"\nanswer = \"dog\"\n";
        write(dir.join("content.toml"), source)?;
        let content = Content::open(Some(dir.display().to_string()))?;
        assert_eq!(
            content.content_id,
            blake3::hash(source.as_bytes()).to_hex()[..8].to_string()
        );
        assert_eq!(content.cards()?.len(), 1);
        Ok(())
    }
}

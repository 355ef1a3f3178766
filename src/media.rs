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

pub mod load;
pub mod probe;
pub mod resolve;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::media::load::MediaLoader;
use crate::media::resolve::is_external;
use crate::types::card::Card;

/// Validate that every local image referenced by a card exists in the
/// content directory. External URLs are not checked.
pub fn validate_media_files(cards: &[Card], loader: &MediaLoader) -> Fallible<()> {
    let mut problems: Vec<(usize, String, String)> = Vec::new();
    for (index, card) in cards.iter().enumerate() {
        let Some(image) = card.image() else {
            continue;
        };
        if is_external(&image.path) {
            continue;
        }
        if let Err(e) = loader.locate(&image.path) {
            problems.push((index + 1, image.path.clone(), e.to_string()));
        }
    }

    if !problems.is_empty() {
        let mut msg = String::from("Invalid images referenced in cards:\n");
        for (number, path, reason) in problems {
            msg.push_str(&format!("  - {path} (card {number}: {reason})\n"));
        }
        return Err(ErrorReport::new(&msg));
    }

    Ok(())
}

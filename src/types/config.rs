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

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::types::copyright::Copyright;

/// How a card's answer string is interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerMode {
    /// The whole string is the one accepted answer.
    #[default]
    Single,
    /// The string lists alternatives separated by `/`.
    Alternatives,
}

/// A card's answer, either a single string or an explicit list of
/// alternatives.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AnswerConfig {
    One(String),
    Many(Vec<String>),
}

impl Default for AnswerConfig {
    fn default() -> Self {
        AnswerConfig::One(String::new())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    /// Media reference: an absolute URL, or a path relative to the content
    /// directory.
    pub path: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub copyright: Option<Copyright>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardConfig {
    pub text: Option<String>,
    #[serde(default)]
    pub answer: AnswerConfig,
    pub image: Option<ImageConfig>,
    pub tip: Option<String>,
}

/// The widget configuration. Constructed once and never mutated.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    pub cards: Vec<CardConfig>,
    pub description: String,
    /// Accessible progress text. `@card` and `@total` are substituted.
    pub progress_text: String,
    pub next: String,
    pub previous: String,
    pub check_answer_text: String,
    pub default_answer_text: String,
    pub correct_answer_text: String,
    pub incorrect_answer_text: String,
    pub show_solution_text: String,
    pub information_text: String,
    pub show_solutions_requires_input: bool,
    pub answer_mode: AnswerMode,
    pub auto_advance_ms: u64,
    /// Zero disables the timeout: a failing image then blocks rendering.
    pub image_load_timeout_ms: u64,
    pub content_id: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cards: Vec::new(),
            description: "What does the card mean?".to_string(),
            progress_text: "Card @card of @total".to_string(),
            next: "Next".to_string(),
            previous: "Previous".to_string(),
            check_answer_text: "Check answer".to_string(),
            default_answer_text: "Your answer".to_string(),
            correct_answer_text: "Correct".to_string(),
            incorrect_answer_text: "Incorrect".to_string(),
            show_solution_text: "Correct answer".to_string(),
            information_text: "Information".to_string(),
            show_solutions_requires_input: true,
            answer_mode: AnswerMode::Single,
            auto_advance_ms: 2000,
            image_load_timeout_ms: 10_000,
            content_id: None,
        }
    }
}

impl SessionConfig {
    pub fn from_json(source: &str) -> Fallible<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_toml(source: &str) -> Fallible<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn auto_advance_delay(&self) -> Duration {
        Duration::from_millis(self.auto_advance_ms)
    }

    pub fn image_load_timeout(&self) -> Option<Duration> {
        if self.image_load_timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.image_load_timeout_ms))
        }
    }

    /// Render the progress template for a 1-based card number.
    pub fn progress_label(&self, card: usize, total: usize) -> String {
        self.progress_text
            .replace("@card", &card.to_string())
            .replace("@total", &total.to_string())
    }
}

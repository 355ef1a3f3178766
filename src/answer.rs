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

use crate::error::Fallible;
use crate::error::fail;

/// The entities produced by [`normalize`]. An ampersand that already starts
/// one of these is left alone, which keeps normalization idempotent.
const ENTITIES: [&str; 5] = ["&amp;", "&lt;", "&gt;", "&quot;", "&#039;"];

/// The separator between alternatives when a card's answer is written as a
/// single string.
const ALTERNATIVE_SEPARATOR: char = '/';

/// Normalize free-form learner input for comparison and display.
///
/// The text is trimmed, lower-cased, and the characters `& < > " '` are
/// HTML-escaped, since the text may be echoed back into the page.
pub fn normalize(input: &str) -> String {
    let lowered: String = input.trim().to_lowercase();
    let mut output = String::with_capacity(lowered.len());
    let mut rest: &str = &lowered;
    while let Some(ch) = rest.chars().next() {
        match ch {
            '&' => {
                if ENTITIES.iter().any(|entity| rest.starts_with(entity)) {
                    output.push('&');
                } else {
                    output.push_str("&amp;");
                }
            }
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#039;"),
            _ => output.push(ch),
        }
        rest = &rest[ch.len_utf8()..];
    }
    output
}

/// The answers a card accepts, already normalized, together with the text
/// shown to the learner when revealing the solution.
#[derive(Clone, Debug, PartialEq)]
pub struct AcceptedAnswers {
    normalized: Vec<String>,
    display: String,
}

impl AcceptedAnswers {
    /// A card with exactly one accepted answer.
    pub fn single(answer: &str) -> Self {
        Self {
            normalized: vec![normalize(answer)],
            display: answer.trim().to_string(),
        }
    }

    /// A card whose answer string lists alternatives separated by `/`.
    ///
    /// Blank alternatives are dropped. If nothing is left, the card accepts
    /// the empty answer, like [`AcceptedAnswers::single`] of an empty string.
    pub fn split(answer: &str) -> Self {
        let mut normalized: Vec<String> = Vec::new();
        for alternative in answer.split(ALTERNATIVE_SEPARATOR) {
            let alternative = normalize(alternative);
            if !alternative.is_empty() && !normalized.contains(&alternative) {
                normalized.push(alternative);
            }
        }
        if normalized.is_empty() {
            normalized.push(String::new());
        }
        Self {
            normalized,
            display: answer.trim().to_string(),
        }
    }

    /// A card with an explicit, ordered list of alternatives.
    pub fn alternatives(answers: &[String]) -> Fallible<Self> {
        if answers.is_empty() {
            return fail("the list of accepted answers is empty.");
        }
        let mut normalized: Vec<String> = Vec::new();
        for answer in answers {
            let answer = normalize(answer);
            if !normalized.contains(&answer) {
                normalized.push(answer);
            }
        }
        let display = answers
            .iter()
            .map(|answer| answer.trim())
            .filter(|answer| !answer.is_empty())
            .collect::<Vec<_>>()
            .join(" / ");
        Ok(Self {
            normalized,
            display,
        })
    }

    /// Whether an already-normalized submission matches one of the answers.
    pub fn matches(&self, normalized: &str) -> bool {
        self.normalized.iter().any(|answer| answer == normalized)
    }

    /// Whether submitting nothing at all is a correct answer.
    #[cfg(test)]
    pub fn accepts_empty(&self) -> bool {
        self.matches("")
    }

    #[cfg(test)]
    pub fn normalized(&self) -> &[String] {
        &self.normalized
    }

    /// The solution text to show, or `None` if the card has none.
    pub fn display(&self) -> Option<&str> {
        if self.display.is_empty() {
            None
        } else {
            Some(&self.display)
        }
    }
}

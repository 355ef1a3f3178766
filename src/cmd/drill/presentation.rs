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

use crate::session::presentation::Feedback;
use crate::session::presentation::Presentation;
use crate::types::card::Card;

/// The server renders pages from [`crate::session::view::SessionView`], so
/// the only thing kept from the session's notifications is which input
/// should have focus on the next page load.
#[derive(Debug, Default)]
pub struct WebPresentation {
    focus: Option<usize>,
}

impl WebPresentation {
    /// The card whose answer input gets `autofocus`.
    pub fn focus(&self) -> Option<usize> {
        self.focus
    }
}

impl Presentation for WebPresentation {
    fn render_card(&mut self, index: usize, _card: &Card) {
        log::debug!("Rendering card {index}.");
    }

    fn set_current(&mut self, index: usize) {
        self.focus = Some(index);
    }

    fn show_feedback(&mut self, index: usize, feedback: &Feedback) {
        log::debug!("Card {index} locked (correct: {}).", feedback.correct);
        // The feedback label takes focus instead of the locked input.
        if self.focus == Some(index) {
            self.focus = None;
        }
    }

    fn set_progress(&mut self, current: usize, total: usize) {
        log::debug!("Progress {current} / {total}.");
    }

    fn set_nav_visibility(&mut self, show_previous: bool, show_next: bool) {
        log::debug!("Navigation: previous={show_previous} next={show_next}.");
    }

    fn focus_input(&mut self, index: usize) {
        self.focus = Some(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_follows_current_card() {
        let mut p = WebPresentation::default();
        assert_eq!(p.focus(), None);
        p.set_current(1);
        assert_eq!(p.focus(), Some(1));
        p.show_feedback(
            1,
            &Feedback {
                correct: true,
                solution: None,
            },
        );
        assert_eq!(p.focus(), None);
        p.focus_input(2);
        assert_eq!(p.focus(), Some(2));
    }
}

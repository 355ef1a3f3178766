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

use crate::types::card::Card;

/// What the learner is told after a graded submission.
#[derive(Clone, Debug, PartialEq)]
pub struct Feedback {
    pub correct: bool,
    /// The accepted answer, revealed after an incorrect submission.
    pub solution: Option<String>,
}

/// Events the session queues for its host.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// Every card image has loaded and the cards were rendered.
    Ready,
    /// The learner changed the text of an answer input.
    Interacted,
    /// Every card has been answered at least once.
    Completed { score: usize, max_score: usize },
}

/// The rendering side of a session. The session pushes changes here as they
/// happen; a host may also ignore these and render from
/// [`crate::session::view::SessionView`] instead.
pub trait Presentation {
    fn render_card(&mut self, index: usize, card: &Card);

    fn set_current(&mut self, index: usize);

    /// Show the grading result. The card's input is locked from here on.
    fn show_feedback(&mut self, index: usize, feedback: &Feedback);

    /// `current` is 1-based.
    fn set_progress(&mut self, current: usize, total: usize);

    fn set_nav_visibility(&mut self, show_previous: bool, show_next: bool);

    fn focus_input(&mut self, index: usize);
}

/// A presentation that remembers every call, for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Vec<Call>,
}

#[cfg(test)]
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    RenderCard(usize),
    SetCurrent(usize),
    ShowFeedback(usize, Feedback),
    SetProgress(usize, usize),
    SetNavVisibility(bool, bool),
    FocusInput(usize),
}

#[cfg(test)]
impl Recorder {
    /// Return the calls made so far and forget them.
    pub fn take(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }
}

#[cfg(test)]
impl Presentation for Recorder {
    fn render_card(&mut self, index: usize, _card: &Card) {
        self.calls.push(Call::RenderCard(index));
    }

    fn set_current(&mut self, index: usize) {
        self.calls.push(Call::SetCurrent(index));
    }

    fn show_feedback(&mut self, index: usize, feedback: &Feedback) {
        self.calls.push(Call::ShowFeedback(index, feedback.clone()));
    }

    fn set_progress(&mut self, current: usize, total: usize) {
        self.calls.push(Call::SetProgress(current, total));
    }

    fn set_nav_visibility(&mut self, show_previous: bool, show_next: bool) {
        self.calls
            .push(Call::SetNavVisibility(show_previous, show_next));
    }

    fn focus_input(&mut self, index: usize) {
        self.calls.push(Call::FocusInput(index));
    }
}

/// A presentation for hosts that only need the session's state, such as
/// command-line tools.
#[derive(Debug, Default)]
pub struct Headless;

impl Presentation for Headless {
    fn render_card(&mut self, _index: usize, _card: &Card) {}

    fn set_current(&mut self, _index: usize) {}

    fn show_feedback(&mut self, _index: usize, _feedback: &Feedback) {}

    fn set_progress(&mut self, _current: usize, _total: usize) {}

    fn set_nav_visibility(&mut self, _show_previous: bool, _show_next: bool) {}

    fn focus_input(&mut self, _index: usize) {}
}

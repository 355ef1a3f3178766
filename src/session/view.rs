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

use crate::media::resolve::ImageResolver;
use crate::session::card_session::CardSession;
use crate::session::presentation::Feedback;
use crate::session::presentation::Presentation;

/// Where a card sits relative to the current one. Only the current card and
/// its neighbours are visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardPosition {
    Previous,
    Current,
    Next,
    Hidden,
}

impl CardPosition {
    pub fn of(index: usize, current: usize) -> Self {
        if index == current {
            CardPosition::Current
        } else if index + 1 == current {
            CardPosition::Previous
        } else if index == current + 1 {
            CardPosition::Next
        } else {
            CardPosition::Hidden
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            CardPosition::Previous => "previous",
            CardPosition::Current => "current",
            CardPosition::Next => "next",
            CardPosition::Hidden => "hidden",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CardView {
    pub index: usize,
    pub position: CardPosition,
    pub image_url: Option<String>,
    /// The text in the answer input.
    pub input: String,
    pub locked: bool,
    pub feedback: Option<Feedback>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProgressView {
    /// 1-based.
    pub current: usize,
    pub total: usize,
    pub label: String,
    pub percent: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SessionView {
    pub ready: bool,
    pub cards: Vec<CardView>,
    pub progress: ProgressView,
    pub show_previous: bool,
    pub show_next: bool,
    /// Set once every card has been answered.
    pub completion: Option<(usize, usize)>,
    /// Set while an auto-advance is pending.
    pub auto_advance_ms: Option<u64>,
}

impl SessionView {
    /// Project the session state onto what should be on screen. Reads the
    /// session only.
    pub fn project<P: Presentation>(
        session: &CardSession<P>,
        resolver: &dyn ImageResolver,
        content_id: &str,
    ) -> Self {
        let current = session.current();
        let total = session.len();
        let cards = session
            .cards()
            .iter()
            .enumerate()
            .map(|(index, card)| {
                let image_url = card.image().and_then(|image| {
                    resolver
                        .resolve(&image.path, content_id)
                        .map_err(|e| log::warn!("Cannot resolve image of card {index}: {e}"))
                        .ok()
                });
                CardView {
                    index,
                    position: CardPosition::of(index, current),
                    image_url,
                    input: session.draft(index).unwrap_or_default().to_string(),
                    locked: session.is_locked(index),
                    feedback: session.feedback(index),
                }
            })
            .collect();
        let progress = ProgressView {
            current: current + 1,
            total,
            label: session.config().progress_label(current + 1, total),
            percent: (current + 1) as f64 / total as f64 * 100.0,
        };
        let completion = if session.is_completed() {
            Some((session.score(), session.max_score()))
        } else {
            None
        };
        let auto_advance_ms = session
            .pending_advance()
            .map(|_| session.config().auto_advance_ms);
        Self {
            ready: session.is_ready(),
            cards,
            progress,
            show_previous: current > 0,
            show_next: current + 1 < total,
            completion,
            auto_advance_ms,
        }
    }
}

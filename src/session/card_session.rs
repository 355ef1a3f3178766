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

use std::collections::BTreeMap;

use crate::answer::normalize;
use crate::error::Fallible;
use crate::error::fail;
use crate::media::resolve::ImageResolver;
use crate::session::barrier::ReadyBarrier;
use crate::session::presentation::Feedback;
use crate::session::presentation::Presentation;
use crate::session::presentation::SessionEvent;
use crate::types::card::Card;
use crate::types::card::CardImage;
use crate::types::card::build_cards;
use crate::types::config::SessionConfig;
use crate::types::copyright::MediaCopyright;
use crate::types::copyright::Thumbnail;

/// Identifies one armed auto-advance timer. Only the most recently armed
/// ticket can fire, and manual navigation disarms it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdvanceTicket(u64);

/// The outcome of [`CardSession::submit_answer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Submission {
    /// Empty input while input is required. Nothing was recorded.
    Rejected,
    /// The card was already answered. Nothing was recorded.
    Locked,
    /// The answer was recorded and the card locked. The host should fire
    /// the ticket after the auto-advance delay.
    Graded { correct: bool, ticket: AdvanceTicket },
}

pub struct CardSession<P: Presentation> {
    config: SessionConfig,
    cards: Vec<Card>,
    /// Index of the displayed card. Always in bounds.
    current: usize,
    /// Normalized submitted answers. A card is locked once it has one.
    answers: BTreeMap<usize, String>,
    /// What the learner last typed into each input, as typed.
    drafts: BTreeMap<usize, String>,
    /// Equal to `answers.len()`.
    answered: usize,
    barrier: ReadyBarrier,
    pending_advance: Option<AdvanceTicket>,
    tickets_issued: u64,
    completed: bool,
    events: Vec<SessionEvent>,
    presentation: P,
}

impl<P: Presentation> CardSession<P> {
    /// Create a session. Fails if the configuration is malformed. If no card
    /// has an image, the cards are rendered right away.
    pub fn new(config: SessionConfig, presentation: P) -> Fallible<Self> {
        let cards: Vec<Card> = build_cards(&config)?;
        let needs_load: Vec<bool> = cards.iter().map(|card| card.image().is_some()).collect();
        let mut session = Self {
            config,
            cards,
            current: 0,
            answers: BTreeMap::new(),
            drafts: BTreeMap::new(),
            answered: 0,
            barrier: ReadyBarrier::new(&needs_load),
            pending_advance: None,
            tickets_issued: 0,
            completed: false,
            events: Vec::new(),
            presentation,
        };
        if session.barrier.try_open() {
            session.render();
        }
        Ok(session)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn answered_count(&self) -> usize {
        self.answered
    }

    #[cfg(test)]
    pub fn recorded_answer(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    pub fn draft(&self, index: usize) -> Option<&str> {
        self.drafts.get(&index).map(String::as_str)
    }

    pub fn is_locked(&self, index: usize) -> bool {
        self.answers.contains_key(&index)
    }

    pub fn is_ready(&self) -> bool {
        self.barrier.is_open()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn pending_advance(&self) -> Option<AdvanceTicket> {
        self.pending_advance
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    #[cfg(test)]
    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }

    /// Take the events queued since the last call.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Feedback for an answered card, derived from the recorded answer.
    pub fn feedback(&self, index: usize) -> Option<Feedback> {
        let answer = self.answers.get(&index)?;
        let card = self.cards.get(index)?;
        let correct = card.answers().matches(answer);
        let solution = if correct {
            None
        } else {
            card.answers().display().map(str::to_string)
        };
        Some(Feedback { correct, solution })
    }

    // Navigation.

    /// Show the next card. Returns false, and does nothing else, on the last
    /// card. Either way a pending auto-advance is cancelled.
    pub fn next(&mut self) -> bool {
        self.cancel_auto_advance();
        if !self.is_ready() || self.current + 1 >= self.cards.len() {
            return false;
        }
        self.current += 1;
        self.announce_current();
        true
    }

    /// Show the previous card. Returns false on the first card. Either way a
    /// pending auto-advance is cancelled.
    pub fn previous(&mut self) -> bool {
        self.cancel_auto_advance();
        if !self.is_ready() || self.current == 0 {
            return false;
        }
        self.current -= 1;
        self.announce_current();
        true
    }

    /// Fire an auto-advance timer. Stale tickets do nothing.
    pub fn fire_auto_advance(&mut self, ticket: AdvanceTicket) -> bool {
        if self.pending_advance != Some(ticket) {
            log::debug!("Ignoring stale auto-advance {ticket:?}.");
            return false;
        }
        self.next()
    }

    fn cancel_auto_advance(&mut self) {
        if let Some(ticket) = self.pending_advance.take() {
            log::debug!("Cancelled auto-advance {ticket:?}.");
        }
    }

    fn arm_auto_advance(&mut self) -> AdvanceTicket {
        self.tickets_issued += 1;
        let ticket = AdvanceTicket(self.tickets_issued);
        self.pending_advance = Some(ticket);
        ticket
    }

    fn announce_current(&mut self) {
        let index = self.current;
        let total = self.cards.len();
        self.presentation.set_current(index);
        self.presentation
            .set_nav_visibility(index > 0, index + 1 < total);
        self.presentation.set_progress(index + 1, total);
    }

    // Answering.

    /// Record what the learner is typing. Drafts never affect the score.
    pub fn record_input(&mut self, index: usize, raw: &str) -> Fallible<()> {
        self.check_index(index)?;
        if self.is_locked(index) {
            log::warn!("Ignoring input for card {index}, which is already answered.");
            return Ok(());
        }
        self.drafts.insert(index, raw.to_string());
        self.events.push(SessionEvent::Interacted);
        Ok(())
    }

    /// Grade and record an answer for a card.
    pub fn submit_answer(&mut self, index: usize, raw: &str) -> Fallible<Submission> {
        self.check_index(index)?;
        if !self.is_ready() {
            return fail("the cards are still loading.");
        }
        if self.is_locked(index) {
            log::warn!("Ignoring a second answer for card {index}.");
            return Ok(Submission::Locked);
        }
        let answer = normalize(raw);
        let correct = self.cards[index].answers().matches(&answer);
        if answer.is_empty() {
            self.presentation.focus_input(index);
            if self.config.show_solutions_requires_input && !correct {
                log::debug!("Rejected empty answer for card {index}.");
                return Ok(Submission::Rejected);
            }
        }

        log::debug!(
            "Card {index} answered {}.",
            if correct { "correctly" } else { "incorrectly" }
        );
        self.drafts.insert(index, raw.trim().to_string());
        self.answers.insert(index, answer);
        self.answered += 1;
        if let Some(feedback) = self.feedback(index) {
            self.presentation.show_feedback(index, &feedback);
        }
        let ticket = self.arm_auto_advance();

        if self.answered == self.cards.len() && !self.completed {
            self.completed = true;
            let score = self.score();
            let max_score = self.max_score();
            log::info!("All cards answered: {score} / {max_score}.");
            self.events
                .push(SessionEvent::Completed { score, max_score });
        }
        Ok(Submission::Graded { correct, ticket })
    }

    fn check_index(&self, index: usize) -> Fallible<()> {
        if index >= self.cards.len() {
            return fail(format!(
                "card index {index} out of range (the session has {} cards).",
                self.cards.len()
            ));
        }
        Ok(())
    }

    // Scoring.

    /// The number of cards whose recorded answer is correct.
    pub fn score(&self) -> usize {
        self.answers
            .iter()
            .filter(|(index, answer)| {
                self.cards
                    .get(**index)
                    .is_some_and(|card| card.answers().matches(answer))
            })
            .count()
    }

    pub fn max_score(&self) -> usize {
        self.cards.len()
    }

    // Images.

    /// Images that have not reported loading yet, with their card index.
    pub fn pending_images(&self) -> Vec<(usize, &CardImage)> {
        self.cards
            .iter()
            .enumerate()
            .filter(|(index, _)| !self.barrier.is_loaded(*index))
            .filter_map(|(index, card)| card.image().map(|image| (index, image)))
            .collect()
    }

    /// Report that the image of card `index` has loaded. Returns true if
    /// this was the last outstanding image, in which case the cards have
    /// been rendered.
    pub fn image_loaded(&mut self, index: usize) -> bool {
        if self.barrier.arrive(index) {
            self.render();
            true
        } else {
            false
        }
    }

    fn render(&mut self) {
        for (index, card) in self.cards.iter().enumerate() {
            self.presentation.render_card(index, card);
        }
        self.announce_current();
        self.events.push(SessionEvent::Ready);
    }

    /// Media credits for every card image that carries copyright metadata.
    /// Built on every call.
    pub fn copyrights(&self, resolver: &dyn ImageResolver, content_id: &str) -> Vec<MediaCopyright> {
        let mut credits = Vec::new();
        for (index, card) in self.cards.iter().enumerate() {
            let Some(image) = card.image() else {
                continue;
            };
            let Some(copyright) = &image.copyright else {
                continue;
            };
            match resolver.resolve(&image.path, content_id) {
                Ok(url) => credits.push(MediaCopyright {
                    card: index,
                    thumbnail: Thumbnail {
                        url,
                        width: image.width,
                        height: image.height,
                    },
                    copyright: copyright.clone(),
                }),
                Err(e) => {
                    log::warn!("Skipping credits for card {index}: {e}");
                }
            }
        }
        credits
    }
}

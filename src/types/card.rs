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

use maud::Markup;
use maud::PreEscaped;
use maud::html;

use crate::answer::AcceptedAnswers;
use crate::error::Fallible;
use crate::error::fail;
use crate::markdown::markdown_to_html;
use crate::markdown::markdown_to_html_inline;
use crate::types::config::AnswerConfig;
use crate::types::config::AnswerMode;
use crate::types::config::CardConfig;
use crate::types::config::SessionConfig;
use crate::types::copyright::Copyright;

#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    /// The text prompt, if any.
    prompt: Option<String>,
    /// The answers this card accepts.
    answers: AcceptedAnswers,
    /// The clue image, if any.
    image: Option<CardImage>,
    /// A hint shown on request.
    tip: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CardImage {
    /// Media reference as written in the configuration.
    pub path: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub copyright: Option<Copyright>,
}

impl Card {
    pub fn new(
        prompt: Option<String>,
        answers: AcceptedAnswers,
        image: Option<CardImage>,
        tip: Option<String>,
    ) -> Self {
        Self {
            prompt,
            answers,
            image,
            tip,
        }
    }

    /// Build a card from its configuration. `number` is 1-based and only
    /// used in error messages.
    pub fn from_config(number: usize, config: &CardConfig, mode: AnswerMode) -> Fallible<Self> {
        let prompt = non_blank(config.text.as_deref());
        let tip = non_blank(config.tip.as_deref());
        let image = match &config.image {
            Some(image) => {
                if image.path.trim().is_empty() {
                    return fail(format!("card {number} has an image without a path."));
                }
                Some(CardImage {
                    path: image.path.trim().to_string(),
                    width: image.width,
                    height: image.height,
                    copyright: image.copyright.clone(),
                })
            }
            None => None,
        };
        if prompt.is_none() && image.is_none() {
            return fail(format!("card {number} has neither text nor an image."));
        }
        let answers = match (&config.answer, mode) {
            (AnswerConfig::One(answer), AnswerMode::Single) => AcceptedAnswers::single(answer),
            (AnswerConfig::One(answer), AnswerMode::Alternatives) => {
                AcceptedAnswers::split(answer)
            }
            (AnswerConfig::Many(answers), _) => {
                if answers.is_empty() {
                    return fail(format!("card {number} has an empty list of answers."));
                }
                AcceptedAnswers::alternatives(answers)?
            }
        };
        Ok(Self::new(prompt, answers, image, tip))
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn answers(&self) -> &AcceptedAnswers {
        &self.answers
    }

    pub fn image(&self) -> Option<&CardImage> {
        self.image.as_ref()
    }

    #[cfg(test)]
    pub fn tip(&self) -> Option<&str> {
        self.tip.as_deref()
    }

    pub fn html_prompt(&self) -> Markup {
        match &self.prompt {
            Some(prompt) => html! {
                (PreEscaped(markdown_to_html(prompt)))
            },
            None => html! {},
        }
    }

    pub fn html_tip(&self) -> Option<Markup> {
        self.tip.as_ref().map(|tip| {
            html! {
                (PreEscaped(markdown_to_html_inline(tip)))
            }
        })
    }
}

/// Build every card of a configuration. A configuration without cards is
/// rejected.
pub fn build_cards(config: &SessionConfig) -> Fallible<Vec<Card>> {
    if config.cards.is_empty() {
        return fail("the configuration has no cards.");
    }
    config
        .cards
        .iter()
        .enumerate()
        .map(|(idx, card)| Card::from_config(idx + 1, card, config.answer_mode))
        .collect()
}

fn non_blank(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::config::ImageConfig;

    fn text_card(text: &str, answer: &str) -> CardConfig {
        CardConfig {
            text: Some(text.to_string()),
            answer: AnswerConfig::One(answer.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_config() -> Fallible<()> {
        let card = Card::from_config(1, &text_card(" Hund ", "Dog"), AnswerMode::Single)?;
        assert_eq!(card.prompt(), Some("Hund"));
        assert!(card.answers().matches("dog"));
        assert!(card.image().is_none());
        assert!(card.tip().is_none());
        Ok(())
    }

    #[test]
    fn test_blank_tip_is_dropped() -> Fallible<()> {
        let mut config = text_card("Hund", "dog");
        config.tip = Some("   ".to_string());
        let card = Card::from_config(1, &config, AnswerMode::Single)?;
        assert!(card.tip().is_none());
        assert!(card.html_tip().is_none());
        Ok(())
    }

    #[test]
    fn test_image_only_card() -> Fallible<()> {
        let config = CardConfig {
            image: Some(ImageConfig {
                path: "images/dog.png".to_string(),
                width: Some(100),
                height: Some(80),
                copyright: None,
            }),
            answer: AnswerConfig::One("dog".to_string()),
            ..Default::default()
        };
        let card = Card::from_config(1, &config, AnswerMode::Single)?;
        assert!(card.prompt().is_none());
        assert_eq!(card.image().unwrap().path, "images/dog.png");
        assert_eq!(card.html_prompt().into_string(), "");
        Ok(())
    }

    #[test]
    fn test_card_without_prompt_or_image_is_rejected() {
        let config = CardConfig {
            text: Some("  ".to_string()),
            ..Default::default()
        };
        let err = Card::from_config(4, &config, AnswerMode::Single).unwrap_err();
        assert_eq!(
            err.to_string(),
            "error: card 4 has neither text nor an image."
        );
    }

    #[test]
    fn test_answer_mode_alternatives() -> Fallible<()> {
        let config = text_card("Farbe", "colour/color");
        let single = Card::from_config(1, &config, AnswerMode::Single)?;
        assert!(!single.answers().matches("color"));
        let split = Card::from_config(1, &config, AnswerMode::Alternatives)?;
        assert!(split.answers().matches("color"));
        assert!(split.answers().matches("colour"));
        Ok(())
    }

    #[test]
    fn test_build_cards_rejects_empty_configuration() {
        let config = SessionConfig::default();
        assert!(build_cards(&config).is_err());
    }

    #[test]
    fn test_build_cards_rejects_empty_alternatives() {
        let config = SessionConfig {
            cards: vec![CardConfig {
                text: Some("Hund".to_string()),
                answer: AnswerConfig::Many(vec![]),
                ..Default::default()
            }],
            ..Default::default()
        };
        let err = build_cards(&config).unwrap_err();
        assert_eq!(
            err.to_string(),
            "error: card 1 has an empty list of answers."
        );
    }

    #[test]
    fn test_html_prompt_renders_markdown() -> Fallible<()> {
        let card = Card::from_config(1, &text_card("**Hund**", "dog"), AnswerMode::Single)?;
        assert_eq!(
            card.html_prompt().into_string(),
            "<p><strong>Hund</strong></p>\n"
        );
        Ok(())
    }
}

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

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use maud::Markup;
use maud::html;

use crate::cmd::drill::state::ServerState;
use crate::cmd::drill::template::loading_template;
use crate::cmd::drill::template::page_template;
use crate::session::view::CardView;
use crate::session::view::SessionView;
use crate::types::card::Card;
use crate::types::config::SessionConfig;

const TITLE: &str = "flashcards";

pub async fn get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let mutable = match state.lock() {
        Ok(mutable) => mutable,
        Err(e) => {
            log::error!("{e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("Internal Server Error".to_string()),
            );
        }
    };
    let session = &mutable.session;
    let view = SessionView::project(session, state.resolver.as_ref(), &state.content_id);
    if !view.ready {
        return (StatusCode::OK, Html(loading_template(TITLE).into_string()));
    }
    let config = session.config();
    let focus = session.presentation().focus();

    let cards: Vec<Markup> = view
        .cards
        .iter()
        .zip(session.cards())
        .map(|(card_view, card)| {
            render_card(config, card_view, card, focus == Some(card_view.index))
        })
        .collect();
    let body = html! {
        div.session {
            div.description {
                (config.description)
            }
            div.progress aria-label=(view.progress.label) {
                span.progress-text {
                    (view.progress.current) " / " (view.progress.total)
                }
                div.progress-bar {
                    div.progress-fill style=(format!("width: {:.0}%;", view.progress.percent)) {}
                }
            }
            div.cards {
                @for card in &cards {
                    (card)
                }
            }
            div.navigation {
                form action="/" method="post" {
                    @if view.show_previous {
                        button.previous type="submit" name="action" value="Previous" title=(config.previous) {
                            (config.previous)
                        }
                    }
                    @if view.show_next {
                        button.next type="submit" name="action" value="Next" title=(config.next) {
                            (config.next)
                        }
                    }
                }
            }
            @if let Some((score, max_score)) = view.completion {
                div.completed {
                    "Score: " (score) " / " (max_score)
                }
            }
        }
    };
    let html = page_template(TITLE, body, view.auto_advance_ms);
    (StatusCode::OK, Html(html.into_string()))
}

fn render_card(config: &SessionConfig, view: &CardView, card: &Card, focused: bool) -> Markup {
    let class = format!("card {}", view.position.class());
    let input_id = format!("answer-{}", view.index);
    html! {
        div class=(class) data-card=(view.index) {
            @if let Some(url) = &view.image_url {
                @let image = card.image();
                div.image {
                    img src=(url)
                        width=[image.and_then(|i| i.width)]
                        height=[image.and_then(|i| i.height)]
                        alt=(card.prompt().unwrap_or_default());
                }
            }
            div.prompt .rich-text {
                (card.html_prompt())
            }
            form.answer action="/" method="post" {
                input type="hidden" name="action" value="Check";
                input type="hidden" name="card" value=(view.index);
                input #(input_id) type="text" name="answer"
                    value=(view.input)
                    placeholder=(config.default_answer_text)
                    aria-label=(config.default_answer_text)
                    disabled[view.locked]
                    autofocus[focused && !view.locked];
                @if !view.locked {
                    button.check type="submit" {
                        (config.check_answer_text)
                    }
                }
            }
            @if let Some(tip) = card.html_tip() {
                details.tip {
                    summary { (config.information_text) }
                    div.rich-text { (tip) }
                }
            }
            @if let Some(feedback) = &view.feedback {
                @if feedback.correct {
                    div.feedback.correct role="status" {
                        (config.correct_answer_text) "!"
                    }
                } @else {
                    div.feedback.wrong role="status" {
                        (config.incorrect_answer_text) "!"
                    }
                    @if let Some(solution) = &feedback.solution {
                        div.solution {
                            (config.show_solution_text) ": " (solution)
                        }
                    }
                }
            }
        }
    }
}

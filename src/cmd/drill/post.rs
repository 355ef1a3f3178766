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

use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Redirect;
use serde::Deserialize;
use tokio::time::sleep;

use crate::cmd::drill::state::CompletionReport;
use crate::cmd::drill::state::ServerState;
use crate::error::Fallible;
use crate::error::fail;
use crate::session::card_session::AdvanceTicket;
use crate::session::card_session::Submission;

#[derive(Debug, Deserialize)]
enum Action {
    Next,
    Previous,
    Check,
}

#[derive(Deserialize)]
pub struct FormData {
    action: Action,
    card: Option<usize>,
    #[serde(default)]
    answer: String,
}

#[derive(Deserialize)]
pub struct InputData {
    card: usize,
    #[serde(default)]
    answer: String,
}

pub async fn post_handler(
    State(state): State<ServerState>,
    Form(form): Form<FormData>,
) -> Redirect {
    match action_handler(&state, form) {
        Ok(report) => state.finish(report).await,
        Err(e) => {
            log::error!("{e}");
        }
    }
    Redirect::to("/")
}

/// Called by the page script whenever an answer input changes.
pub async fn input_handler(
    State(state): State<ServerState>,
    Form(form): Form<InputData>,
) -> StatusCode {
    let result = state.lock().and_then(|mut mutable| {
        mutable.session.record_input(form.card, &form.answer)?;
        Ok(state.handle_events(&mut mutable))
    });
    match result {
        Ok(report) => {
            state.finish(report).await;
            StatusCode::NO_CONTENT
        }
        Err(e) => {
            log::error!("{e}");
            StatusCode::BAD_REQUEST
        }
    }
}

fn action_handler(state: &ServerState, form: FormData) -> Fallible<Option<CompletionReport>> {
    let mut mutable = state.lock()?;
    match form.action {
        Action::Next => {
            mutable.session.next();
        }
        Action::Previous => {
            mutable.session.previous();
        }
        Action::Check => {
            let Some(card) = form.card else {
                return fail("missing card index.");
            };
            match mutable.session.submit_answer(card, &form.answer)? {
                Submission::Graded { ticket, .. } => {
                    log::debug!(
                        "{} of {} cards answered.",
                        mutable.session.answered_count(),
                        mutable.session.len()
                    );
                    let delay = mutable.session.config().auto_advance_delay();
                    schedule_auto_advance(state.clone(), ticket, delay);
                }
                Submission::Rejected | Submission::Locked => {}
            }
        }
    }
    Ok(state.handle_events(&mut mutable))
}

/// Fire `ticket` after `delay`, unless navigation has disarmed it by then.
fn schedule_auto_advance(state: ServerState, ticket: AdvanceTicket, delay: Duration) {
    tokio::spawn(async move {
        sleep(delay).await;
        match state.lock() {
            Ok(mut mutable) => {
                mutable.session.fire_auto_advance(ticket);
            }
            Err(e) => log::error!("{e}"),
        }
    });
}

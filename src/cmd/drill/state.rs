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

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use serde::Serialize;

use crate::cmd::drill::presentation::WebPresentation;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::media::load::MediaLoader;
use crate::media::resolve::ContentPathResolver;
use crate::session::card_session::CardSession;
use crate::session::presentation::SessionEvent;
use crate::types::timestamp::Timestamp;

#[derive(Clone)]
pub struct ServerState {
    pub content_id: String,
    pub resolver: Arc<ContentPathResolver>,
    pub loader: Arc<MediaLoader>,
    pub report_path: Option<PathBuf>,
    pub session_started_at: Timestamp,
    pub mutable: Arc<Mutex<MutableState>>,
}

pub struct MutableState {
    pub session: CardSession<WebPresentation>,
}

/// Written when every card has been answered.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionReport {
    content_id: String,
    score: usize,
    max_score: usize,
    started_at: Timestamp,
    completed_at: Timestamp,
    duration_seconds: i64,
}

impl ServerState {
    pub fn lock(&self) -> Fallible<MutexGuard<'_, MutableState>> {
        self.mutable
            .lock()
            .map_err(|_| ErrorReport::new("session state lock is poisoned."))
    }

    /// Act on the events the session queued since the last call. Returns the
    /// completion report if the session was just completed; write it with
    /// [`ServerState::write_report`] once the lock is released.
    pub fn handle_events(&self, mutable: &mut MutableState) -> Option<CompletionReport> {
        let mut report = None;
        for event in mutable.session.drain_events() {
            match event {
                SessionEvent::Ready => {
                    log::info!("Images loaded, showing {} cards.", mutable.session.len());
                }
                SessionEvent::Interacted => {
                    log::debug!("Learner interacted.");
                }
                SessionEvent::Completed { score, max_score } => {
                    let completed_at = Timestamp::now();
                    let duration_seconds = completed_at.seconds_since(self.session_started_at);
                    log::info!(
                        "Session completed at {}: {score} / {max_score} in {duration_seconds}s.",
                        completed_at.to_rfc3339()
                    );
                    report = Some(CompletionReport {
                        content_id: self.content_id.clone(),
                        score,
                        max_score,
                        started_at: self.session_started_at,
                        completed_at,
                        duration_seconds,
                    });
                }
            }
        }
        report
    }

    /// Write a completion report to the report path, if one was given.
    pub async fn write_report(&self, report: &CompletionReport) -> Fallible<()> {
        let Some(path) = &self.report_path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(report)?;
        tokio::fs::write(path, json).await?;
        log::debug!("Wrote completion report to {}.", path.display());
        Ok(())
    }

    /// Like [`ServerState::write_report`], but failures are only logged.
    pub async fn finish(&self, report: Option<CompletionReport>) {
        if let Some(report) = report {
            if let Err(e) = self.write_report(&report).await {
                log::error!("Failed to write the completion report {report:?}: {e}");
            }
        }
    }
}

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
use std::time::Duration;

use axum::Router;
use axum::extract::Path;
use axum::extract::State;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::time::sleep;

use crate::cmd::drill::get::get_handler;
use crate::cmd::drill::post::input_handler;
use crate::cmd::drill::post::post_handler;
use crate::cmd::drill::presentation::WebPresentation;
use crate::cmd::drill::state::CompletionReport;
use crate::cmd::drill::state::MutableState;
use crate::cmd::drill::state::ServerState;
use crate::content::Content;
use crate::error::Fallible;
use crate::media::load::content_type;
use crate::media::probe::ImageProber;
use crate::media::resolve::ContentPathResolver;
use crate::session::card_session::CardSession;
use crate::types::timestamp::Timestamp;

pub struct ServeOptions {
    pub host: String,
    pub port: u16,
    pub open_browser: bool,
    /// Where to write the completion report, if anywhere.
    pub report: Option<PathBuf>,
}

pub async fn start_server(directory: Option<String>, options: ServeOptions) -> Fallible<()> {
    let content = Content::open(directory)?;
    log::debug!("Content id is {}.", content.content_id);

    let session = CardSession::new(content.config.clone(), WebPresentation::default())?;
    log::debug!("Session created with {} cards.", session.len());
    let pending: Vec<(usize, String)> = session
        .pending_images()
        .into_iter()
        .map(|(index, image)| (index, image.path.clone()))
        .collect();

    let state = ServerState {
        content_id: content.content_id.clone(),
        resolver: Arc::new(ContentPathResolver::new("")),
        loader: Arc::new(content.loader()),
        report_path: options.report,
        session_started_at: Timestamp::now(),
        mutable: Arc::new(Mutex::new(MutableState { session })),
    };
    let report = {
        let mut mutable = state.lock()?;
        state.handle_events(&mut mutable)
    };
    state.finish(report).await;

    // Probe every image in the background. The cards are shown once the
    // last probe reports.
    let prober = Arc::new(ImageProber::new(
        content.loader(),
        content.config.image_load_timeout(),
    )?);
    for (index, path) in pending {
        let prober = prober.clone();
        let state = state.clone();
        tokio::spawn(async move {
            let outcome = prober.probe(&path).await;
            if prober.counts_as_loaded(&outcome) {
                log::debug!("Image {path} of card {index}: {outcome:?}.");
                match mark_loaded(&state, index) {
                    Ok(report) => state.finish(report).await,
                    Err(e) => log::error!("{e}"),
                }
            } else {
                log::error!("Image {path} of card {index} failed to load: {outcome:?}.");
            }
        });
    }

    let app = Router::new();
    let app = app.route("/", get(get_handler));
    let app = app.route("/", post(post_handler));
    let app = app.route("/input", post(input_handler));
    let app = app.route("/content/{content_id}/{*path}", get(image_handler));
    let app = app.route("/copyrights", get(copyrights_handler));
    let app = app.route("/script.js", get(script));
    let app = app.route("/style.css", get(stylesheet));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state);
    let bind = format!("{}:{}", options.host, options.port);

    // Start a separate task to open the browser.
    if options.open_browser {
        let url = format!("http://{bind}/");
        let bind = bind.clone();
        tokio::spawn(async move {
            loop {
                if let Ok(stream) = TcpStream::connect(&bind).await {
                    drop(stream);
                    break;
                }
                sleep(Duration::from_millis(1)).await;
            }
            let _ = open::that(url);
        });
    }

    // Start the server.
    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(&bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn mark_loaded(state: &ServerState, index: usize) -> Fallible<Option<CompletionReport>> {
    let mut mutable = state.lock()?;
    mutable.session.image_loaded(index);
    Ok(state.handle_events(&mut mutable))
}

async fn image_handler(
    State(state): State<ServerState>,
    Path((content_id, path)): Path<(String, String)>,
) -> (StatusCode, [(HeaderName, &'static str); 1], Vec<u8>) {
    let not_found = (StatusCode::NOT_FOUND, [(CONTENT_TYPE, "text/plain")], Vec::new());
    if content_id != state.content_id {
        log::warn!("Request for unknown content {content_id}.");
        return not_found;
    }
    let file = match state.loader.locate(&path) {
        Ok(file) => file,
        Err(e) => {
            log::warn!("Rejected image request {path}: {e}.");
            return not_found;
        }
    };
    match tokio::fs::read(&file).await {
        Ok(bytes) => (StatusCode::OK, [(CONTENT_TYPE, content_type(&file))], bytes),
        Err(e) => {
            log::error!("Failed to read {}: {e}.", file.display());
            not_found
        }
    }
}

async fn copyrights_handler(
    State(state): State<ServerState>,
) -> (StatusCode, [(HeaderName, &'static str); 1], String) {
    let json = state.lock().and_then(|mutable| {
        let credits = mutable
            .session
            .copyrights(state.resolver.as_ref(), &state.content_id);
        Ok(serde_json::to_string(&credits)?)
    });
    match json {
        Ok(json) => (StatusCode::OK, [(CONTENT_TYPE, "application/json")], json),
        Err(e) => {
            log::error!("{e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(CONTENT_TYPE, "text/plain")],
                "Internal Server Error".to_string(),
            )
        }
    }
}

async fn script() -> (StatusCode, [(HeaderName, &'static str); 1], &'static str) {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/javascript")],
        include_str!("script.js"),
    )
}

async fn stylesheet() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, "public, max-age=604800, immutable"),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}

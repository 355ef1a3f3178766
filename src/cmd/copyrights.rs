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

use crate::content::Content;
use crate::error::Fallible;
use crate::media::resolve::ContentPathResolver;
use crate::session::card_session::CardSession;
use crate::session::presentation::Headless;
use crate::types::copyright::MediaCopyright;

pub fn print_copyrights(directory: Option<String>, base_url: &str) -> Fallible<()> {
    let credits = collect_copyrights(directory, base_url)?;
    let json: String = serde_json::to_string_pretty(&credits)?;
    println!("{json}");
    Ok(())
}

fn collect_copyrights(directory: Option<String>, base_url: &str) -> Fallible<Vec<MediaCopyright>> {
    let content = Content::open(directory)?;
    let session = CardSession::new(content.config.clone(), Headless)?;
    let resolver = ContentPathResolver::new(base_url);
    Ok(session.copyrights(&resolver, &content.content_id))
}

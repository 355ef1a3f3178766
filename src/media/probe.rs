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

use reqwest::Client;
use tokio::time::timeout;

use crate::error::Fallible;
use crate::media::load::MediaLoader;
use crate::media::resolve::is_external;

/// The result of checking that an image can be loaded.
#[derive(Debug, PartialEq)]
pub enum ProbeOutcome {
    Loaded,
    Failed(String),
    TimedOut,
}

/// Checks that card images can be loaded before the cards are shown. Local
/// references are looked up in the content directory; external URLs are
/// fetched.
pub struct ImageProber {
    loader: MediaLoader,
    client: Client,
    timeout: Option<Duration>,
}

impl ImageProber {
    pub fn new(loader: MediaLoader, timeout: Option<Duration>) -> Fallible<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            loader,
            client,
            timeout,
        })
    }

    pub async fn probe(&self, media_ref: &str) -> ProbeOutcome {
        match self.timeout {
            Some(limit) => match timeout(limit, self.fetch(media_ref)).await {
                Ok(outcome) => outcome,
                Err(_) => ProbeOutcome::TimedOut,
            },
            None => self.fetch(media_ref).await,
        }
    }

    /// Whether an outcome releases the card's slot in the ready barrier.
    /// Without a timeout only real loads count, so a broken image keeps the
    /// cards hidden.
    pub fn counts_as_loaded(&self, outcome: &ProbeOutcome) -> bool {
        match outcome {
            ProbeOutcome::Loaded => true,
            ProbeOutcome::Failed(_) | ProbeOutcome::TimedOut => self.timeout.is_some(),
        }
    }

    async fn fetch(&self, media_ref: &str) -> ProbeOutcome {
        if is_external(media_ref) {
            match self.client.get(media_ref).send().await {
                Ok(response) if response.status().is_success() => ProbeOutcome::Loaded,
                Ok(response) => ProbeOutcome::Failed(format!("HTTP {}", response.status())),
                Err(e) => ProbeOutcome::Failed(e.to_string()),
            }
        } else {
            let path = match self.loader.locate(media_ref) {
                Ok(path) => path,
                Err(e) => return ProbeOutcome::Failed(e.to_string()),
            };
            match tokio::fs::metadata(&path).await {
                Ok(_) => ProbeOutcome::Loaded,
                Err(e) => ProbeOutcome::Failed(e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use super::*;
    use crate::helper::create_tmp_directory;

    #[tokio::test]
    async fn test_local_image() -> Fallible<()> {
        let root = create_tmp_directory()?;
        File::create(root.join("cat.png"))?;
        let prober = ImageProber::new(MediaLoader::new(root), Some(Duration::from_secs(5)))?;
        assert_eq!(prober.probe("cat.png").await, ProbeOutcome::Loaded);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_image_with_timeout_counts_as_loaded() -> Fallible<()> {
        let root = create_tmp_directory()?;
        let prober = ImageProber::new(MediaLoader::new(root), Some(Duration::from_secs(5)))?;
        let outcome = prober.probe("missing.png").await;
        assert_eq!(outcome, ProbeOutcome::Failed("file not found".to_string()));
        assert!(prober.counts_as_loaded(&outcome));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_image_without_timeout_blocks() -> Fallible<()> {
        let root = create_tmp_directory()?;
        let prober = ImageProber::new(MediaLoader::new(root), None)?;
        let outcome = prober.probe("missing.png").await;
        assert!(!prober.counts_as_loaded(&outcome));
        Ok(())
    }

    #[tokio::test]
    async fn test_unreachable_url_fails() -> Fallible<()> {
        let root = create_tmp_directory()?;
        let prober = ImageProber::new(MediaLoader::new(root), Some(Duration::from_secs(5)))?;
        let port = portpicker::pick_unused_port().expect("no free port");
        let outcome = prober
            .probe(&format!("http://127.0.0.1:{port}/cat.png"))
            .await;
        assert!(matches!(outcome, ProbeOutcome::Failed(_)));
        Ok(())
    }

    #[tokio::test]
    async fn test_hanging_server_times_out() -> Fallible<()> {
        let root = create_tmp_directory()?;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        // Accept connections and never answer.
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });
        let prober = ImageProber::new(MediaLoader::new(root), Some(Duration::from_millis(200)))?;
        let outcome = prober.probe(&format!("http://{addr}/cat.png")).await;
        assert_eq!(outcome, ProbeOutcome::TimedOut);
        assert!(prober.counts_as_loaded(&outcome));
        Ok(())
    }
}

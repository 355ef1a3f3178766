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

mod get;
mod post;
mod presentation;
pub mod server;
mod state;
mod template;

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::time::Duration;

    use reqwest::StatusCode;
    use tokio::net::TcpStream;
    use tokio::spawn;
    use tokio::time::sleep;
    use tokio::time::timeout;

    use crate::cmd::drill::server::ServeOptions;
    use crate::cmd::drill::server::start_server;
    use crate::error::Fallible;
    use crate::helper::create_sample_content;
    use crate::helper::create_tmp_directory;

    fn options(port: u16) -> ServeOptions {
        ServeOptions {
            host: "127.0.0.1".to_string(),
            port,
            open_browser: false,
            report: None,
        }
    }

    async fn check(base: &str, card: &str, answer: &str) -> Fallible<String> {
        let response = reqwest::Client::new()
            .post(base)
            .form(&[("action", "Check"), ("card", card), ("answer", answer)])
            .send()
            .await?;
        assert!(response.status().is_success());
        Ok(response.text().await?)
    }

    async fn navigate(base: &str, action: &str) -> Fallible<String> {
        let response = reqwest::Client::new()
            .post(base)
            .form(&[("action", action)])
            .send()
            .await?;
        assert!(response.status().is_success());
        Ok(response.text().await?)
    }

    #[tokio::test]
    async fn test_start_server_on_non_existent_directory() -> Fallible<()> {
        let port = portpicker::pick_unused_port().unwrap();
        let result = start_server(Some("./derpherp".to_string()), options(port)).await;
        assert!(result.is_err());
        let err = result.err().unwrap();
        assert_eq!(err.to_string(), "error: directory does not exist.");
        Ok(())
    }

    #[tokio::test]
    async fn test_start_server_on_empty_directory() -> Fallible<()> {
        let directory = create_tmp_directory()?;
        let port = portpicker::pick_unused_port().unwrap();
        let result = start_server(Some(directory.display().to_string()), options(port)).await;
        assert!(result.is_err());
        Ok(())
    }

    async fn spawn_server(directory: &Path) -> String {
        let port = portpicker::pick_unused_port().unwrap();
        let dir = directory.display().to_string();
        spawn(async move { start_server(Some(dir), options(port)).await });
        let bind = format!("127.0.0.1:{port}");
        loop {
            if let Ok(stream) = TcpStream::connect(&bind).await {
                drop(stream);
                break;
            }
            sleep(Duration::from_millis(1)).await;
        }
        format!("http://{bind}/")
    }

    /// Poll the root page until the ready barrier has opened.
    async fn wait_for_cards(base: &str) -> Fallible<String> {
        loop {
            let html = reqwest::get(base).await?.text().await?;
            if html.contains("Katze") {
                return Ok(html);
            }
            sleep(Duration::from_millis(10)).await;
        }
    }

    #[tokio::test]
    async fn test_missing_image_does_not_block_the_cards() -> Fallible<()> {
        let directory = create_sample_content()?;
        std::fs::remove_file(directory.join("images/bird.png"))?;
        let base = spawn_server(&directory).await;
        let html = timeout(Duration::from_secs(10), wait_for_cards(&base))
            .await
            .expect("cards never rendered")?;
        assert!(html.contains("Vogel"));
        assert!(html.contains("1 / 3"));
        let response = reqwest::get(format!("{base}content/animals/images/bird.png")).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn test_e2e() -> Fallible<()> {
        let directory = create_sample_content()?;
        let report = directory.join("report.json");
        let port = portpicker::pick_unused_port().unwrap();
        let mut opts = options(port);
        opts.report = Some(report.clone());
        let dir = directory.display().to_string();
        spawn(async move { start_server(Some(dir), opts).await });
        let bind = format!("127.0.0.1:{port}");
        loop {
            if let Ok(stream) = TcpStream::connect(&bind).await {
                drop(stream);
                break;
            }
            sleep(Duration::from_millis(1)).await;
        }
        let base = format!("http://{bind}/");

        // Wait for the image probe to open the ready barrier.
        let html = wait_for_cards(&base).await?;
        assert!(html.contains("Name the animal"));
        assert!(html.contains("1 / 3"));
        assert!(html.contains("Card 1 of 3"));
        assert!(html.contains("/content/animals/images/bird.png"));
        assert!(html.contains("It meows"));

        // Static assets.
        let response = reqwest::get(format!("{base}style.css")).await?;
        assert!(response.status().is_success());
        assert_eq!(response.headers().get("content-type").unwrap(), "text/css");
        let response = reqwest::get(format!("{base}script.js")).await?;
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/javascript"
        );

        // Images.
        let response = reqwest::get(format!("{base}content/animals/images/bird.png")).await?;
        assert!(response.status().is_success());
        assert_eq!(response.headers().get("content-type").unwrap(), "image/png");
        let response = reqwest::get(format!("{base}content/animals/images/cat.png")).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let response = reqwest::get(format!("{base}content/plants/images/bird.png")).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Unknown paths.
        let response = reqwest::get(format!("{base}herp-derp")).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Credits.
        let response = reqwest::get(format!("{base}copyrights")).await?;
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
        let json = response.text().await?;
        assert!(json.contains("Jane Doe"));
        assert!(json.contains("/content/animals/images/bird.png"));

        // First card, answered correctly.
        let html = check(&base, "0", "Cat").await?;
        assert!(html.contains("Correct!"));
        assert!(html.contains("data-auto-advance=\"60000\""));

        // Manual navigation cancels the auto-advance.
        let html = navigate(&base, "Next").await?;
        assert!(html.contains("2 / 3"));
        assert!(!html.contains("data-auto-advance"));

        // Typing is reported without grading.
        let response = reqwest::Client::new()
            .post(format!("{base}input"))
            .form(&[("card", "1"), ("answer", "fi")])
            .send()
            .await?;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        // An empty answer is rejected.
        let html = check(&base, "1", "").await?;
        assert!(!html.contains("Incorrect!"));
        assert!(html.contains("value=\"fi\""));

        // Second card, answered incorrectly.
        let html = check(&base, "1", "fish").await?;
        assert!(html.contains("Incorrect!"));
        assert!(html.contains("Correct answer: dog"));

        // Third card, and the session is complete.
        let html = navigate(&base, "Next").await?;
        assert!(html.contains("3 / 3"));
        assert!(!html.contains("Score:"));
        let html = check(&base, "2", "Bird ").await?;
        assert!(html.contains("Score: 2 / 3"));

        let report = std::fs::read_to_string(&report)?;
        assert!(report.contains("\"contentId\": \"animals\""));
        assert!(report.contains("\"score\": 2"));
        assert!(report.contains("\"maxScore\": 3"));

        // Navigating back still works after completion.
        let html = navigate(&base, "Previous").await?;
        assert!(html.contains("2 / 3"));
        assert!(html.contains("Score: 2 / 3"));
        Ok(())
    }
}

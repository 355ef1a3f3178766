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

use std::fmt::Display;
use std::fmt::Formatter;

use percent_encoding::AsciiSet;
use percent_encoding::CONTROLS;
use percent_encoding::utf8_percent_encode;

/// Characters escaped in a single path segment of a media URL.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Maps the media references written in card configurations to URLs a
/// browser can load.
pub trait ImageResolver {
    fn resolve(&self, media_ref: &str, content_id: &str) -> Result<String, ResolveError>;
}

/// Errors that can occur when resolving a media reference.
#[derive(Debug, PartialEq)]
pub enum ResolveError {
    /// Reference is the empty string.
    Empty,
    /// Reference is an absolute filesystem path.
    AbsolutePath,
    /// Reference contains parent (`..`) components.
    ParentComponent,
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveError::Empty => write!(f, "empty media reference"),
            ResolveError::AbsolutePath => write!(f, "media reference is an absolute path"),
            ResolveError::ParentComponent => {
                write!(f, "media reference points outside the content directory")
            }
        }
    }
}

/// True if the reference is a URL with a scheme (`http://`, `https://`,
/// and so on), which is used as-is.
pub fn is_external(media_ref: &str) -> bool {
    match media_ref.split_once("://") {
        Some((scheme, _)) => {
            !scheme.is_empty() && scheme.chars().all(|c| c.is_ascii_alphanumeric())
        }
        None => false,
    }
}

/// Resolves relative references to `{base}/content/{content_id}/{path}`.
pub struct ContentPathResolver {
    /// URL prefix without a trailing slash. Empty for root-relative URLs.
    base: String,
}

impl ContentPathResolver {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }
}

impl ImageResolver for ContentPathResolver {
    fn resolve(&self, media_ref: &str, content_id: &str) -> Result<String, ResolveError> {
        let media_ref: &str = media_ref.trim();
        if media_ref.is_empty() {
            return Err(ResolveError::Empty);
        }
        if is_external(media_ref) {
            return Ok(media_ref.to_string());
        }
        if media_ref.starts_with('/') || media_ref.starts_with('\\') {
            return Err(ResolveError::AbsolutePath);
        }
        let mut segments: Vec<String> = Vec::new();
        for segment in media_ref.split(['/', '\\']) {
            match segment {
                "" | "." => continue,
                ".." => return Err(ResolveError::ParentComponent),
                _ => segments.push(utf8_percent_encode(segment, SEGMENT).to_string()),
            }
        }
        if segments.is_empty() {
            return Err(ResolveError::Empty);
        }
        Ok(format!(
            "{}/content/{}/{}",
            self.base,
            utf8_percent_encode(content_id, SEGMENT),
            segments.join("/")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_reference() {
        let r = ContentPathResolver::new("https://lms.example.com/h5p/");
        assert_eq!(
            r.resolve("images/cat.png", "12"),
            Ok("https://lms.example.com/h5p/content/12/images/cat.png".to_string())
        );
    }

    #[test]
    fn test_root_relative_base() {
        let r = ContentPathResolver::new("");
        assert_eq!(
            r.resolve("./images//cat.png", "12"),
            Ok("/content/12/images/cat.png".to_string())
        );
    }

    #[test]
    fn test_external_urls_pass_through() {
        let r = ContentPathResolver::new("/base");
        assert_eq!(
            r.resolve("https://example.com/a b.png", "12"),
            Ok("https://example.com/a b.png".to_string())
        );
        assert_eq!(
            r.resolve("HTTP://example.com/cat.png", "12"),
            Ok("HTTP://example.com/cat.png".to_string())
        );
    }

    #[test]
    fn test_segments_are_percent_encoded() {
        let r = ContentPathResolver::new("");
        assert_eq!(
            r.resolve("my images/cat #1.png", "12"),
            Ok("/content/12/my%20images/cat%20%231.png".to_string())
        );
    }

    #[test]
    fn test_rejections() {
        let r = ContentPathResolver::new("");
        assert_eq!(r.resolve("", "1"), Err(ResolveError::Empty));
        assert_eq!(r.resolve("  ", "1"), Err(ResolveError::Empty));
        assert_eq!(r.resolve("./", "1"), Err(ResolveError::Empty));
        assert_eq!(r.resolve("/etc/passwd", "1"), Err(ResolveError::AbsolutePath));
        assert_eq!(
            r.resolve("images/../../secret.png", "1"),
            Err(ResolveError::ParentComponent)
        );
    }

    #[test]
    fn test_is_external() {
        assert!(is_external("http://example.com/x.png"));
        assert!(is_external("https://example.com/x.png"));
        assert!(!is_external("images/x.png"));
        assert!(!is_external("://x.png"));
        assert!(!is_external("images/a://b.png"));
    }
}

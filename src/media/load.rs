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
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Finds media files inside a content directory.
///
/// Paths reach this from HTTP requests, so anything that could leave the
/// content directory is rejected.
pub struct MediaLoader {
    /// Absolute, canonical path to the content directory.
    root: PathBuf,
}

/// Errors that can occur when locating a media file.
#[derive(Debug, PartialEq)]
pub enum MediaLoaderError {
    /// Path is the empty string.
    Empty,
    /// Path is absolute.
    Absolute,
    /// Path contains parent (`..`) components.
    ParentComponent,
    /// Path does not exist.
    NotFound,
    /// Path is not a file.
    NotFile,
    /// Path points to a symbolic link.
    SymbolicLink,
    /// Path resolves outside the content directory.
    OutsideDirectory,
}

impl Display for MediaLoaderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            MediaLoaderError::Empty => "empty path",
            MediaLoaderError::Absolute => "absolute path",
            MediaLoaderError::ParentComponent => "path contains '..'",
            MediaLoaderError::NotFound => "file not found",
            MediaLoaderError::NotFile => "not a file",
            MediaLoaderError::SymbolicLink => "symbolic link",
            MediaLoaderError::OutsideDirectory => "outside the content directory",
        };
        write!(f, "{message}")
    }
}

impl MediaLoader {
    /// Construct a new [`MediaLoader`]. The root must be an absolute,
    /// canonical directory path.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Given a content-relative path, return the absolute path of the file.
    pub fn locate(&self, path: &str) -> Result<PathBuf, MediaLoaderError> {
        if path.trim().is_empty() {
            return Err(MediaLoaderError::Empty);
        }
        let path: PathBuf = PathBuf::from(path);
        if path.components().any(|c| c == Component::ParentDir) {
            return Err(MediaLoaderError::ParentComponent);
        }
        if path.is_absolute() || path.has_root() {
            return Err(MediaLoaderError::Absolute);
        }
        let path: PathBuf = self.root.join(path);
        if path.is_symlink() {
            return Err(MediaLoaderError::SymbolicLink);
        }
        if !path.exists() {
            return Err(MediaLoaderError::NotFound);
        }
        if !path.is_file() {
            return Err(MediaLoaderError::NotFile);
        }
        // Symlinked parent directories could still lead outside.
        let canonical = path
            .canonicalize()
            .map_err(|_| MediaLoaderError::NotFound)?;
        if !canonical.starts_with(&self.root) {
            return Err(MediaLoaderError::OutsideDirectory);
        }
        Ok(canonical)
    }
}

/// Guess a content type from a file extension.
pub fn content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("avif") => "image/avif",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::fs::create_dir;
    use std::os::unix::fs::symlink;

    use super::*;
    use crate::error::Fallible;
    use crate::helper::create_tmp_directory;

    #[test]
    fn test_locate_file() -> Fallible<()> {
        let root = create_tmp_directory()?;
        create_dir(root.join("images"))?;
        File::create(root.join("images/cat.png"))?;
        let loader = MediaLoader::new(root.clone());
        assert_eq!(
            loader.locate("images/cat.png"),
            Ok(root.join("images/cat.png"))
        );
        Ok(())
    }

    /// Absolute paths are rejected.
    #[test]
    fn test_abs_rejected() -> Fallible<()> {
        let loader = MediaLoader::new(create_tmp_directory()?);
        assert_eq!(loader.locate("/etc/passwd"), Err(MediaLoaderError::Absolute));
        Ok(())
    }

    /// Paths with parent components are rejected.
    #[test]
    fn test_parent() -> Fallible<()> {
        let loader = MediaLoader::new(create_tmp_directory()?);
        assert_eq!(
            loader.locate("../../../../../../../../../../etc/passwd"),
            Err(MediaLoaderError::ParentComponent)
        );
        Ok(())
    }

    #[test]
    fn test_missing_and_directories() -> Fallible<()> {
        let root = create_tmp_directory()?;
        create_dir(root.join("images"))?;
        let loader = MediaLoader::new(root);
        assert_eq!(loader.locate(""), Err(MediaLoaderError::Empty));
        assert_eq!(loader.locate("nope.png"), Err(MediaLoaderError::NotFound));
        assert_eq!(loader.locate("images"), Err(MediaLoaderError::NotFile));
        Ok(())
    }

    #[test]
    fn test_symlinks_rejected() -> Fallible<()> {
        let root = create_tmp_directory()?;
        let outside = create_tmp_directory()?;
        let target = outside.join("secret.png");
        File::create(&target)?;
        symlink(&target, root.join("link.png"))?;
        symlink(&outside, root.join("linked-dir"))?;
        let loader = MediaLoader::new(root);
        assert_eq!(
            loader.locate("link.png"),
            Err(MediaLoaderError::SymbolicLink)
        );
        assert_eq!(
            loader.locate("linked-dir/secret.png"),
            Err(MediaLoaderError::OutsideDirectory)
        );
        Ok(())
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type(Path::new("a/cat.PNG")), "image/png");
        assert_eq!(content_type(Path::new("cat.jpeg")), "image/jpeg");
        assert_eq!(content_type(Path::new("cat")), "application/octet-stream");
    }
}

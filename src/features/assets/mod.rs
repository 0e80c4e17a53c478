//! # Feature: Asset Library
//!
//! Enumerates media in the assets directory. Files named `avatar*` double as avatar candidates.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Avatar lookup by file name or stem
//! - 1.0.0: Initial release

use log::debug;
use std::path::{Path, PathBuf};

pub const MEDIA_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "mp3", "wav"];
pub const AVATAR_PREFIX: &str = "avatar";

#[derive(Debug, Clone)]
pub struct AssetLibrary {
    dir: PathBuf,
}

impl AssetLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// All media files, sorted by path. A missing directory is simply empty.
    pub fn list(&self) -> Vec<PathBuf> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Assets directory {} unavailable: {e}", self.dir.display());
                return Vec::new();
            }
        };

        let mut assets: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && is_media(path))
            .collect();
        assets.sort();
        assets
    }

    pub fn avatars(&self) -> Vec<PathBuf> {
        self.list()
            .into_iter()
            .filter(|path| file_name(path).starts_with(AVATAR_PREFIX))
            .collect()
    }

    /// Avatar whose file name or stem equals `name`
    pub fn find_avatar(&self, name: &str) -> Option<PathBuf> {
        self.avatars().into_iter().find(|path| {
            file_name(path) == name
                || path.file_stem().and_then(|s| s.to_str()) == Some(name)
        })
    }
}

pub fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}

fn is_media(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| MEDIA_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn library_with(files: &[&str]) -> (TempDir, AssetLibrary) {
        let tmp = TempDir::new().unwrap();
        for f in files {
            std::fs::write(tmp.path().join(f), b"x").unwrap();
        }
        let lib = AssetLibrary::new(tmp.path());
        (tmp, lib)
    }

    #[test]
    fn test_lists_only_media_extensions() {
        let (_tmp, lib) = library_with(&["a.png", "b.MP3", "notes.txt", "c.webp", "noext"]);
        let names: Vec<_> = lib.list().iter().map(|p| file_name(p).to_string()).collect();
        assert_eq!(names, ["a.png", "b.MP3", "c.webp"]);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let lib = AssetLibrary::new("/definitely/not/here");
        assert!(lib.list().is_empty());
    }

    #[test]
    fn test_avatar_candidates_and_lookup() {
        let (_tmp, lib) = library_with(&["avatar_eye.png", "avatar2.jpg", "static.gif"]);
        assert_eq!(lib.avatars().len(), 2);
        assert!(lib.find_avatar("avatar_eye").is_some());
        assert!(lib.find_avatar("avatar2.jpg").is_some());
        assert!(lib.find_avatar("static").is_none());
    }
}

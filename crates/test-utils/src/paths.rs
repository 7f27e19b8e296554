//! Path utilities for locating fonts and creating scratch directories.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Directories searched for system fonts, in order.
const SYSTEM_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts",
    "/usr/local/share/fonts",
    "/Library/Fonts",
    "/System/Library/Fonts",
    "C:\\Windows\\Fonts",
];

/// Font families that are known to cover ASCII digits and punctuation.
const PREFERRED_FONTS: &[&str] = &["DejaVuSans", "LiberationSans", "Arial", "times", "Helvetica"];

/// Returns the workspace root directory.
///
/// This is determined by walking up from the current crate's manifest directory
/// until we find the workspace Cargo.toml.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Searches for a TrueType font usable in label tests.
///
/// This function checks the following locations in order:
/// 1. Environment variable `TEST_FONT` (if set and the file exists)
/// 2. `testdata/` at the workspace root
/// 3. The common system font directories
///
/// Within a directory, well-known sans fonts are preferred over whatever
/// `.ttf` file happens to be found first.
pub fn find_font() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("TEST_FONT") {
        let path = PathBuf::from(path);
        if path.is_file() {
            return Some(path);
        }
    }

    let mut dirs = vec![workspace_root().join("testdata")];
    dirs.extend(SYSTEM_FONT_DIRS.iter().map(PathBuf::from));

    dirs.iter()
        .filter(|d| d.is_dir())
        .find_map(|d| find_font_in(d))
}

/// Searches a single directory tree for a `.ttf` file.
pub fn find_font_in(dir: &Path) -> Option<PathBuf> {
    let fonts: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
        .map(|entry| entry.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("ttf"))
                .unwrap_or(false)
        })
        .collect();

    for preferred in PREFERRED_FONTS {
        if let Some(found) = fonts.iter().find(|p| {
            p.file_stem()
                .and_then(|s| s.to_str())
                .map(|s| s == *preferred)
                .unwrap_or(false)
        }) {
            return Some(found.clone());
        }
    }

    fonts.into_iter().next()
}

/// Creates a temporary directory for test output.
///
/// The directory is automatically cleaned up when the returned `TempDir` is dropped.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_is_valid() {
        let root = workspace_root();
        assert!(
            root.join("Cargo.toml").exists(),
            "Workspace root should contain Cargo.toml: {:?}",
            root
        );
    }

    #[test]
    fn test_find_font_in_prefers_known_family() {
        let dir = temp_test_dir();
        std::fs::create_dir_all(dir.path().join("a")).unwrap();
        std::fs::write(dir.path().join("a").join("Zzz.ttf"), b"x").unwrap();
        std::fs::write(dir.path().join("DejaVuSans.ttf"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let found = find_font_in(dir.path()).unwrap();
        assert_eq!(found.file_name().unwrap(), "DejaVuSans.ttf");
    }

    #[test]
    fn test_find_font_in_empty_dir() {
        let dir = temp_test_dir();
        assert_eq!(find_font_in(dir.path()), None);
    }
}

//! Recording directory discovery.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{IngestError, Result};
use crate::pattern::NamePattern;

/// Walks `root` and returns every subdirectory whose name matches `pattern`.
///
/// The whole tree is searched, matched directories included. Paths come back
/// deduplicated and sorted lexicographically. An empty result is not an
/// error. Entries below the root that cannot be read are skipped with a
/// warning; only an unusable root fails.
pub fn discover_recordings(root: &Path, pattern: &NamePattern) -> Result<Vec<PathBuf>> {
    discover_recordings_excluding(root, pattern, &[])
}

/// Like [`discover_recordings`], but never descends into `excluded`.
///
/// Excluded directories that lie inside `root` are pruned from the walk along
/// with everything below them. Excluded paths that do not exist or lie
/// outside `root` have no effect.
pub fn discover_recordings_excluding(
    root: &Path,
    pattern: &NamePattern,
    excluded: &[PathBuf],
) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(IngestError::RootNotFound {
            path: root.to_path_buf(),
        });
    }
    std::fs::read_dir(root).map_err(|e| IngestError::DirectoryRead {
        path: root.to_path_buf(),
        source: e,
    })?;

    let pruned = excluded_below(root, excluded);
    let mut found = BTreeSet::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            let keep = match entry.path().strip_prefix(root) {
                Ok(relative) => !pruned.iter().any(|p| p == relative),
                Err(_) => true,
            };
            if !keep {
                debug!(path = %entry.path().display(), "skipping excluded directory");
            }
            keep
        });
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(root = %root.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            warn!(path = %entry.path().display(), "skipping non UTF-8 directory name");
            continue;
        };
        if pattern.is_match(name) {
            found.insert(entry.into_path());
        }
    }

    debug!(
        root = %root.display(),
        pattern = %pattern,
        count = found.len(),
        "discovery complete"
    );
    Ok(found.into_iter().collect())
}

/// Excluded directories as paths relative to `root`.
///
/// Both sides are canonicalized so a relative or symlinked spelling of an
/// output directory still matches the walk.
fn excluded_below(root: &Path, excluded: &[PathBuf]) -> Vec<PathBuf> {
    let Ok(canonical_root) = root.canonicalize() else {
        return Vec::new();
    };
    excluded
        .iter()
        .filter_map(|path| path.canonicalize().ok())
        .filter_map(|path| {
            path.strip_prefix(&canonical_root)
                .ok()
                .filter(|relative| !relative.as_os_str().is_empty())
                .map(Path::to_path_buf)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in [
            "subj02_session1",
            "subj01_session2",
            "subj01_session1",
            "anat",
            "nested/subj03_rest",
        ] {
            std::fs::create_dir_all(dir.path().join(name)).unwrap();
        }
        std::fs::write(dir.path().join("subj09_notes"), "file, not a directory").unwrap();
        dir
    }

    #[test]
    fn test_discover_sorted_and_recursive() {
        let dir = create_test_dir();
        let pattern = NamePattern::glob("subj*").unwrap();

        let found = discover_recordings(dir.path(), &pattern).unwrap();
        let names: Vec<String> = found
            .iter()
            .map(|p| {
                p.strip_prefix(dir.path())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();

        assert_eq!(
            names,
            vec![
                "nested/subj03_rest",
                "subj01_session1",
                "subj01_session2",
                "subj02_session1",
            ]
        );
    }

    #[test]
    fn test_no_matches_is_empty() {
        let dir = create_test_dir();
        let pattern = NamePattern::glob("*.ds").unwrap();
        assert!(discover_recordings(dir.path(), &pattern).unwrap().is_empty());
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        let pattern = NamePattern::glob("*").unwrap();
        let err = discover_recordings(&dir.path().join("absent"), &pattern).unwrap_err();
        assert!(matches!(err, IngestError::RootNotFound { .. }));
    }

    #[test]
    fn test_root_is_never_returned() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("subj_root");
        std::fs::create_dir_all(root.join("subj01")).unwrap();
        let pattern = NamePattern::glob("subj*").unwrap();

        let found = discover_recordings(&root, &pattern).unwrap();
        assert_eq!(found, vec![root.join("subj01")]);
    }

    #[test]
    fn test_excluded_directory_is_pruned() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        for name in ["AB12/AB12_rest_01.ds", "bids/sub-1/meg/sub-1_task-rest_meg.ds"] {
            std::fs::create_dir_all(root.join(name)).unwrap();
        }
        let pattern = NamePattern::glob("*.ds").unwrap();

        let all = discover_recordings(root, &pattern).unwrap();
        assert_eq!(all.len(), 2);

        let found = discover_recordings_excluding(root, &pattern, &[root.join("bids")]).unwrap();
        assert_eq!(found, vec![root.join("AB12/AB12_rest_01.ds")]);
    }

    #[test]
    fn test_exclusions_outside_root_are_ignored() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("raw");
        std::fs::create_dir_all(root.join("subj01.ds")).unwrap();
        std::fs::create_dir_all(dir.path().join("bids")).unwrap();
        let pattern = NamePattern::glob("*.ds").unwrap();

        let excluded = [dir.path().join("bids"), dir.path().join("absent"), root.clone()];
        let found = discover_recordings_excluding(&root, &pattern, &excluded).unwrap();
        assert_eq!(found, vec![root.join("subj01.ds")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("subj01_s1")).unwrap();
        std::fs::create_dir_all(root.join("locked/subj02_s1")).unwrap();
        std::fs::create_dir_all(root.join("subj03_s1")).unwrap();
        let locked = root.join("locked");
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();
        // Permission bits do not stop root; only assert the skip when they bite.
        let enforced = std::fs::read_dir(&locked).is_err();

        let pattern = NamePattern::glob("subj*").unwrap();
        let result = discover_recordings(root, &pattern);
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

        let found = result.unwrap();
        assert!(found.contains(&root.join("subj01_s1")));
        assert!(found.contains(&root.join("subj03_s1")));
        if enforced {
            assert_eq!(found.len(), 2);
        }
    }
}

//! Staging of result files out of the build workspace.
//!
//! The workspace is live while we run: later build steps may rewrite or
//! delete report files mid-upload. The collector therefore copies every file
//! matching the configured glob pattern into a uniquely-named scratch
//! directory first, and the orchestrator uploads from that frozen copy.
//!
//! Zero matches is not a collection failure. Whether an empty file list
//! should skip or fail the run is a validation concern, decided in
//! [`crate::validation`].
//!
//! The scratch directory is the caller's to release; see [`ScratchDir`].

use std::io;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};

/// Errors from staging result files.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    /// The configured glob pattern does not parse.
    #[error("Invalid results pattern '{pattern}': {source}")]
    Pattern {
        /// The pattern as configured.
        pattern: String,
        /// The underlying glob error.
        source: globset::Error,
    },

    /// Filesystem failure while creating the scratch directory, walking the
    /// workspace, or copying a matched file.
    #[error("Failed to stage test result files: {0}")]
    Io(#[from] io::Error),
}

/// A scratch directory holding staged result files for one run.
///
/// Owned by the orchestrator for the duration of a run and released before
/// the run returns on every exit path. [`close`](Self::close) reports removal
/// failures so they can be logged; dropping the handle removes the directory
/// best-effort as a backstop.
#[derive(Debug)]
pub struct ScratchDir {
    inner: tempfile::TempDir,
}

impl ScratchDir {
    /// Location of the staged files.
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Removes the scratch directory and everything under it.
    pub fn close(self) -> io::Result<()> {
        self.inner.close()
    }
}

/// Copies every workspace file matching `pattern` into a fresh scratch
/// directory and returns the staged files in sorted order.
///
/// The pattern is matched against paths relative to `workspace`, with `*`
/// confined to a single path component and `**` spanning directories, so
/// `*.xml` matches only top-level files while `**/target/surefire-reports/*.xml`
/// reaches into every module. Directory entries are never returned; relative
/// structure is preserved under the scratch root.
pub fn collect(workspace: &Path, pattern: &str) -> Result<(ScratchDir, Vec<PathBuf>), CollectError> {
    let matcher = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|source| CollectError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?
        .compile_matcher();

    let scratch = ScratchDir {
        inner: tempfile::Builder::new().prefix("handoff-").tempdir()?,
    };

    let mut staged = Vec::new();
    stage_matching(workspace, workspace, &matcher, scratch.path(), &mut staged)?;
    staged.sort();

    Ok((scratch, staged))
}

fn stage_matching(
    root: &Path,
    dir: &Path,
    matcher: &GlobMatcher,
    scratch: &Path,
    staged: &mut Vec<PathBuf>,
) -> io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            stage_matching(root, &path, matcher, scratch, staged)?;
            continue;
        }
        if !file_type.is_file() {
            continue;
        }

        // Relative to the workspace root, which is what the pattern describes.
        let relative = path.strip_prefix(root).unwrap_or(&path);
        if !matcher.is_match(relative) {
            continue;
        }

        let destination = scratch.join(relative);
        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(&path, &destination)?;
        staged.push(destination);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(workspace: &Path, relative: &str) {
        let path = workspace.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"<testsuite/>").unwrap();
    }

    #[test]
    fn test_collect_stages_matching_files() {
        let workspace = TempDir::new().unwrap();
        touch(workspace.path(), "module-a/target/surefire-reports/TEST-a.xml");
        touch(workspace.path(), "module-b/target/surefire-reports/TEST-b.xml");
        touch(workspace.path(), "module-a/target/notes.txt");

        let (scratch, files) =
            collect(workspace.path(), "**/target/surefire-reports/*.xml").unwrap();

        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.starts_with(scratch.path())));
        assert!(files.iter().all(|f| f.is_file()));
        scratch.close().unwrap();
    }

    #[test]
    fn test_collect_copies_out_of_the_workspace() {
        let workspace = TempDir::new().unwrap();
        touch(workspace.path(), "report.xml");

        let (scratch, files) = collect(workspace.path(), "*.xml").unwrap();

        assert_eq!(files.len(), 1);
        // The staged copy survives the original being deleted mid-run.
        std::fs::remove_file(workspace.path().join("report.xml")).unwrap();
        assert!(files[0].is_file());
        scratch.close().unwrap();
    }

    #[test]
    fn test_single_star_does_not_cross_directories() {
        let workspace = TempDir::new().unwrap();
        touch(workspace.path(), "top.xml");
        touch(workspace.path(), "nested/inner.xml");

        let (scratch, files) = collect(workspace.path(), "*.xml").unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("top.xml"));
        scratch.close().unwrap();
    }

    #[test]
    fn test_no_matches_is_empty_not_an_error() {
        let workspace = TempDir::new().unwrap();
        touch(workspace.path(), "report.txt");

        let (scratch, files) = collect(workspace.path(), "*.xml").unwrap();

        assert!(files.is_empty());
        scratch.close().unwrap();
    }

    #[test]
    fn test_directories_matching_the_pattern_are_excluded() {
        let workspace = TempDir::new().unwrap();
        std::fs::create_dir_all(workspace.path().join("odd.xml")).unwrap();
        touch(workspace.path(), "real.xml");

        let (scratch, files) = collect(workspace.path(), "*.xml").unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("real.xml"));
        scratch.close().unwrap();
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let workspace = TempDir::new().unwrap();

        let err = collect(workspace.path(), "a{b").unwrap_err();

        assert!(matches!(err, CollectError::Pattern { .. }));
    }

    #[test]
    fn test_close_removes_the_scratch_directory() {
        let workspace = TempDir::new().unwrap();
        touch(workspace.path(), "report.xml");

        let (scratch, files) = collect(workspace.path(), "*.xml").unwrap();
        let scratch_path = scratch.path().to_path_buf();

        assert!(scratch_path.exists());
        scratch.close().unwrap();
        assert!(!scratch_path.exists());
        assert!(!files[0].exists());
    }
}

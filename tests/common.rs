//! Shared test utilities for integration tests.
//!
//! Provides helper functions for creating temporary git repositories and
//! performing common git operations used across multiple test files. Commit
//! dates are pinned so ordering assertions do not depend on wall-clock time.

#![allow(dead_code)]

use anyhow::Result;
use gitpages::{AllowList, Limits, PageKind, RepoMeta, SiteOptions};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Base timestamp for pinned commit dates (2024-01-01 00:00 UTC).
pub const BASE_TIME: i64 = 1_704_067_200;

/// Runs git with pinned dates, failing on non-zero exit.
///
/// # Returns
///
/// Trimmed standard output
///
/// # Errors
///
/// Returns error if git cannot be spawned or exits unsuccessfully
pub fn git_at(repo_path: &Path, args: &[&str], time: i64) -> Result<String> {
    let date = format!("@{} +0000", time);
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .env("GIT_AUTHOR_DATE", &date)
        .env("GIT_COMMITTER_DATE", &date)
        .output()?;

    if !output.status.success() {
        anyhow::bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
    }

    Ok(String::from_utf8(output.stdout)?.trim().to_string())
}

/// Runs git at [`BASE_TIME`].
pub fn git(repo_path: &Path, args: &[&str]) -> Result<String> {
    git_at(repo_path, args, BASE_TIME)
}

/// Creates temporary git repository with test configuration.
///
/// Sets up a clean git repository on branch `main` with user name and email
/// configured and signing disabled.
///
/// # Errors
///
/// Returns error if git commands fail or directory creation fails
pub fn create_test_repo() -> Result<TempDir> {
    let dir = TempDir::new()?;
    let path = dir.path();

    git(path, &["init", "--quiet"])?;
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"])?;
    git(path, &["config", "user.name", "Test User"])?;
    git(path, &["config", "user.email", "test@example.com"])?;
    git(path, &["config", "commit.gpgsign", "false"])?;
    git(path, &["config", "tag.gpgsign", "false"])?;

    Ok(dir)
}

/// Commits staged changes at `time` and returns the commit hash.
///
/// # Errors
///
/// Returns error if commit fails or hash cannot be retrieved
pub fn git_commit_at(repo_path: &Path, message: &str, time: i64) -> Result<String> {
    git_at(repo_path, &["commit", "--quiet", "-m", message], time)?;
    git(repo_path, &["rev-parse", "HEAD"])
}

/// Commits staged changes at [`BASE_TIME`] and returns the commit hash.
pub fn git_commit(repo_path: &Path, message: &str) -> Result<String> {
    git_commit_at(repo_path, message, BASE_TIME)
}

/// Stages files in repository.
///
/// # Errors
///
/// Returns error if git add fails
///
/// # Examples
///
/// ```no_run
/// # use anyhow::Result;
/// # use std::path::Path;
/// # fn example(repo_path: &Path) -> Result<()> {
/// // Stage all changes
/// common::git_add(repo_path, &["."])?;
///
/// // Stage specific files
/// common::git_add(repo_path, &["file1.txt", "file2.rs"])?;
/// # Ok(())
/// # }
/// ```
pub fn git_add(repo_path: &Path, files: &[&str]) -> Result<()> {
    let mut args = vec!["add"];
    args.extend_from_slice(files);
    git(repo_path, &args)?;
    Ok(())
}

/// Writes file to repository, creating parent directories as needed.
///
/// # Errors
///
/// Returns error if directory creation or file write fails
pub fn write_file(repo_path: &Path, path: &str, content: impl AsRef<[u8]>) -> Result<()> {
    let file_path = repo_path.join(path);
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

/// Builds a repository of three linear commits R, A, B, each adding one
/// line to a new file, one minute apart.
///
/// # Returns
///
/// Repository directory and the hashes `[R, A, B]`
pub fn linear_repo() -> Result<(TempDir, [String; 3])> {
    let repo = create_test_repo()?;
    let path = repo.path();
    let mut hashes = Vec::new();

    for (i, name) in ["R", "A", "B"].iter().enumerate() {
        let file = format!("{}.txt", name.to_lowercase());
        write_file(path, &file, format!("{}\n", name))?;
        git_add(path, &[&file])?;
        hashes.push(git_commit_at(path, name, BASE_TIME + 60 * i as i64)?);
    }

    let hashes: [String; 3] = hashes
        .try_into()
        .map_err(|_| anyhow::anyhow!("expected three commits"))?;
    Ok((repo, hashes))
}

/// Clones `source` through the `file://` transport, keeping only the latest
/// `depth` commits.
///
/// # Errors
///
/// Returns error if the clone fails
pub fn shallow_clone(source: &Path, depth: u32) -> Result<TempDir> {
    let dir = TempDir::new()?;
    let url = format!("file://{}", source.display());
    let depth = depth.to_string();
    git(dir.path(), &["clone", "--quiet", "--depth", &depth, &url, "."])?;
    Ok(dir)
}

/// Site options with default caps rendering `repo` into `output`.
pub fn site_options(repo: &Path, output: &Path) -> SiteOptions {
    SiteOptions {
        repo: repo.to_path_buf(),
        output: output.to_path_buf(),
        meta: RepoMeta {
            name: "test-repo".to_string(),
            description: gitpages::DEFAULT_DESCRIPTION.to_string(),
        },
        rev: None,
        limits: Limits::default(),
        index_page: PageKind::Commits,
        allow_list: AllowList::default(),
    }
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cloning a repository into a temporary working tree

use super::auth::remote_callbacks;
use crate::constants::git::DEFAULT_REVISION;
use crate::error::{BaseClusterError, Result};
use crate::kubernetes::RepoCredentials;
use git2::{build::RepoBuilder, FetchOptions, Repository};
use std::path::Path;
use tempfile::TempDir;
use tracing::{debug, info, instrument, warn};

/// A freshly cloned repository backed by a temporary directory.
///
/// Call [`WorkingTree::close`] when done; dropping it also removes the
/// directory but swallows errors.
pub struct WorkingTree {
    repo: Repository,
    dir: TempDir,
    credentials: Option<RepoCredentials>,
}

impl WorkingTree {
    /// Root of the checkout on the host filesystem
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn repo(&self) -> &Repository {
        &self.repo
    }

    /// Credentials used for the clone, reused for push
    pub fn credentials(&self) -> Option<&RepoCredentials> {
        self.credentials.as_ref()
    }

    /// Remove the temporary directory
    pub fn close(self) -> Result<()> {
        let WorkingTree { repo, dir, .. } = self;
        drop(repo);
        let path = dir.path().to_path_buf();
        debug!("Removing working tree {}", path.display());
        dir.close()
            .map_err(|e| BaseClusterError::io("remove working tree", path, e))
    }
}

/// Whether `revision` selects the remote's default branch
pub fn is_default_revision(revision: &str) -> bool {
    revision.is_empty() || revision == DEFAULT_REVISION
}

/// Clone `url` at branch `revision` into a new temporary directory
pub fn clone_repo(
    url: &str,
    revision: &str,
    credentials: Option<RepoCredentials>,
) -> Result<WorkingTree> {
    clone_repo_in(&std::env::temp_dir(), url, revision, credentials)
}

/// [`clone_repo`] with the temporary directory created below `parent`.
/// On failure nothing is left behind in `parent`.
#[instrument(skip(parent, credentials), fields(parent = %parent.display()))]
pub fn clone_repo_in(
    parent: &Path,
    url: &str,
    revision: &str,
    credentials: Option<RepoCredentials>,
) -> Result<WorkingTree> {
    let dir = tempfile::Builder::new()
        .prefix("basecluster-")
        .tempdir_in(parent)
        .map_err(|e| BaseClusterError::io("create temporary directory in", parent, e))?;

    let mut fetch_options = FetchOptions::new();
    fetch_options.remote_callbacks(remote_callbacks(credentials.clone()));

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_options);
    if !is_default_revision(revision) {
        builder.branch(revision);
    }

    info!("Cloning {} ({}) into {}", url, revision, dir.path().display());
    let repo = match builder.clone(url, dir.path()) {
        Ok(repo) => repo,
        Err(source) => {
            if let Err(e) = dir.close() {
                warn!("Failed to remove temporary directory: {}", e);
            }
            return Err(BaseClusterError::CloneError {
                url: url.to_string(),
                source,
            });
        }
    };

    Ok(WorkingTree {
        repo,
        dir,
        credentials,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::init_remote;
    use std::fs;

    #[test]
    fn test_clone_default_branch_and_close() {
        let (_remote_dir, url) = init_remote(&[("base/cluster.yaml", "kind: Cluster\n")]);

        let tree = clone_repo(&url, "HEAD", None).unwrap();
        let root = tree.root().to_path_buf();
        assert_eq!(
            fs::read_to_string(root.join("base/cluster.yaml")).unwrap(),
            "kind: Cluster\n"
        );
        assert_eq!(tree.repo().head().unwrap().shorthand(), Some("main"));

        tree.close().unwrap();
        assert!(!root.exists());
    }

    #[test]
    fn test_clone_named_branch() {
        let (_remote_dir, url) = init_remote(&[("README.md", "hi\n")]);
        let tree = clone_repo(&url, "main", None).unwrap();
        assert_eq!(tree.repo().head().unwrap().shorthand(), Some("main"));
        tree.close().unwrap();
    }

    #[test]
    fn test_clone_unknown_branch_fails() {
        let (_remote_dir, url) = init_remote(&[("README.md", "hi\n")]);
        let err = clone_repo(&url, "does-not-exist", None).err().unwrap();
        assert!(matches!(err, BaseClusterError::CloneError { .. }));
    }

    #[test]
    fn test_clone_missing_remote_fails() {
        let dir = tempfile::tempdir().unwrap();
        let url = dir.path().join("nothing-here").to_string_lossy().into_owned();
        let err = clone_repo(&url, "HEAD", None).err().unwrap();
        assert!(err.to_string().starts_with("failed to clone repo"));
    }

    #[test]
    fn test_failed_clone_leaves_no_directory() {
        let (_remote_dir, url) = init_remote(&[("README.md", "hi\n")]);
        let parent = tempfile::tempdir().unwrap();

        let err = clone_repo_in(parent.path(), &url, "does-not-exist", None).err().unwrap();

        assert!(matches!(err, BaseClusterError::CloneError { .. }));
        assert_eq!(fs::read_dir(parent.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_clone_in_parent_and_close() {
        let (_remote_dir, url) = init_remote(&[("README.md", "hi\n")]);
        let parent = tempfile::tempdir().unwrap();

        let tree = clone_repo_in(parent.path(), &url, "HEAD", None).unwrap();
        assert!(tree.root().starts_with(parent.path()));
        assert_eq!(fs::read_dir(parent.path()).unwrap().count(), 1);

        tree.close().unwrap();
        assert_eq!(fs::read_dir(parent.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_default_revision() {
        assert!(is_default_revision(""));
        assert!(is_default_revision("HEAD"));
        assert!(!is_default_revision("main"));
    }
}

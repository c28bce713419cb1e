// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::{BaseClusterError, Result};
use git2::{ErrorCode, IndexAddOption, Repository, Signature, StatusOptions};
use tracing::{debug, info, instrument};

/// Author and committer of generated commits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
}

/// Stage every change in the working tree and commit it on the current branch.
///
/// Returns `false` without committing when the working tree, untracked files
/// included and ignored files excluded, matches HEAD.
#[instrument(skip(repo, identity))]
pub fn commit_changes(repo: &Repository, message: &str, identity: &CommitIdentity) -> Result<bool> {
    let mut status_opts = StatusOptions::new();
    status_opts
        .include_untracked(true)
        .recurse_untracked_dirs(true)
        .include_ignored(false);
    let dirty = !repo
        .statuses(Some(&mut status_opts))
        .map_err(|e| BaseClusterError::git("get worktree status", e))?
        .is_empty();
    if !dirty {
        debug!("Working tree is clean");
        return Ok(false);
    }

    let mut index = repo
        .index()
        .map_err(|e| BaseClusterError::git("open index", e))?;
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .map_err(|e| BaseClusterError::git("stage changes", e))?;
    index
        .update_all(["*"].iter(), None)
        .map_err(|e| BaseClusterError::git("stage deletions", e))?;
    index
        .write()
        .map_err(|e| BaseClusterError::git("write index", e))?;
    let tree_id = index
        .write_tree()
        .map_err(|e| BaseClusterError::git("write tree", e))?;

    let parent = match repo.head() {
        Ok(head) => Some(
            head.peel_to_commit()
                .map_err(|e| BaseClusterError::git("resolve HEAD commit", e))?,
        ),
        Err(e) if e.code() == ErrorCode::UnbornBranch => None,
        Err(e) => return Err(BaseClusterError::git("resolve HEAD", e)),
    };
    if parent.as_ref().is_some_and(|p| p.tree_id() == tree_id) {
        debug!("Staged tree matches HEAD");
        return Ok(false);
    }

    let tree = repo
        .find_tree(tree_id)
        .map_err(|e| BaseClusterError::git("find tree", e))?;
    let signature = Signature::now(&identity.name, &identity.email)
        .map_err(|e| BaseClusterError::git("create signature", e))?;
    let parents: Vec<_> = parent.iter().collect();
    let oid = repo
        .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .map_err(|e| BaseClusterError::git("commit changes", e))?;

    info!("Committed {}: {}", oid, message);
    Ok(true)
}

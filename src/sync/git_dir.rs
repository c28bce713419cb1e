// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Prepare a base cluster directory inside a remote git repository.

use crate::error::Result;
use crate::git::{clone_repo_in, commit_changes, push, CommitIdentity, WorkingTree};
use crate::kubernetes::{create_client, get_repo_credentials, RepoCredentials};
use crate::scaffold::{prepare_dir, validate_repo_path};
use kube::{Client, Config as KConfig};
use std::path::Path;
use tracing::{info, instrument, warn};

/// Outcome of [`prepare_git_dir`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitDirOutcome {
    pub cluster_name: String,
    /// Whether a commit was made and pushed
    pub changed: bool,
}

/// Clone `repo_url`, prepare `repo_path` as a base cluster directory, and
/// push the result if anything changed.
pub async fn prepare_git_dir(
    api_config: KConfig,
    controller_namespace: &str,
    repo_url: &str,
    repo_revision: &str,
    repo_path: &str,
    identity: &CommitIdentity,
) -> Result<GitDirOutcome> {
    let client = create_client(api_config)?;
    prepare_git_dir_with_client(
        &client,
        controller_namespace,
        repo_url,
        repo_revision,
        repo_path,
        identity,
    )
    .await
}

/// [`prepare_git_dir`] with an existing client. Credentials are looked up in
/// `controller_namespace`, then the git work runs on the blocking pool.
#[instrument(skip(client, identity))]
pub async fn prepare_git_dir_with_client(
    client: &Client,
    controller_namespace: &str,
    repo_url: &str,
    repo_revision: &str,
    repo_path: &str,
    identity: &CommitIdentity,
) -> Result<GitDirOutcome> {
    validate_repo_path(repo_path)?;
    let credentials = get_repo_credentials(client, controller_namespace, repo_url).await?;

    let repo_url = repo_url.to_string();
    let repo_revision = repo_revision.to_string();
    let repo_path = repo_path.to_string();
    let identity = identity.clone();
    tokio::task::spawn_blocking(move || {
        sync_repo(&repo_url, &repo_revision, &repo_path, credentials, &identity)
    })
    .await?
}

/// Blocking clone, prepare, commit and push, cloning below the system
/// temporary directory.
pub fn sync_repo(
    repo_url: &str,
    repo_revision: &str,
    repo_path: &str,
    credentials: Option<RepoCredentials>,
    identity: &CommitIdentity,
) -> Result<GitDirOutcome> {
    sync_repo_in(
        &std::env::temp_dir(),
        repo_url,
        repo_revision,
        repo_path,
        credentials,
        identity,
    )
}

/// [`sync_repo`] with the working tree created below `work_dir`.
///
/// The temporary clone is removed on every path out of this function.
#[instrument(skip(work_dir, credentials, identity))]
pub fn sync_repo_in(
    work_dir: &Path,
    repo_url: &str,
    repo_revision: &str,
    repo_path: &str,
    credentials: Option<RepoCredentials>,
    identity: &CommitIdentity,
) -> Result<GitDirOutcome> {
    validate_repo_path(repo_path)?;
    let tree = clone_repo_in(work_dir, repo_url, repo_revision, credentials)?;

    let result = update_tree(&tree, repo_path, identity);
    if let Err(e) = tree.close() {
        warn!("{}", e);
    }
    result
}

fn update_tree(tree: &WorkingTree, repo_path: &str, identity: &CommitIdentity) -> Result<GitDirOutcome> {
    let prepared = prepare_dir(tree.root(), repo_path)?;

    let manifest = Path::new(repo_path).join(&prepared.manifest_file_name);
    let message = format!("prepare base cluster files for {}", manifest.display());
    let changed = commit_changes(tree.repo(), &message, identity)?;

    if changed {
        push(tree.repo(), tree.credentials())?;
        info!("Pushed base cluster {} from {}", prepared.cluster_name, manifest.display());
    } else {
        info!("Base cluster {} is already prepared", prepared.cluster_name);
    }

    Ok(GitDirOutcome {
        cluster_name: prepared.cluster_name,
        changed,
    })
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::auth::remote_callbacks;
use crate::constants::git::REMOTE_NAME;
use crate::error::{BaseClusterError, Result};
use crate::kubernetes::RepoCredentials;
use git2::{PushOptions, Repository};
use tracing::{info, instrument};

/// Push the current branch to `origin`.
///
/// Ref updates rejected by the server are reported as errors.
#[instrument(skip_all)]
pub fn push(repo: &Repository, credentials: Option<&RepoCredentials>) -> Result<()> {
    let head = repo
        .head()
        .map_err(|e| BaseClusterError::git("resolve HEAD", e))?;
    if !head.is_branch() {
        return Err(BaseClusterError::DetachedHead(
            head.shorthand().unwrap_or("HEAD").to_string(),
        ));
    }
    let Some(refname) = head.name().map(str::to_string) else {
        return Err(BaseClusterError::PushError(
            "branch name is not valid UTF-8".to_string(),
        ));
    };

    let mut remote = repo
        .find_remote(REMOTE_NAME)
        .map_err(|e| BaseClusterError::git("find remote", e))?;

    let mut rejected = Vec::new();
    {
        let mut callbacks = remote_callbacks(credentials.cloned());
        callbacks.push_update_reference(|reference, status| {
            if let Some(message) = status {
                rejected.push(format!("{}: {}", reference, message));
            }
            Ok(())
        });
        let mut options = PushOptions::new();
        options.remote_callbacks(callbacks);

        info!("Pushing {} to {}", refname, REMOTE_NAME);
        remote
            .push(&[format!("{}:{}", refname, refname)], Some(&mut options))
            .map_err(|e| BaseClusterError::PushError(e.to_string()))?;
    }

    if !rejected.is_empty() {
        return Err(BaseClusterError::PushError(rejected.join(", ")));
    }
    Ok(())
}

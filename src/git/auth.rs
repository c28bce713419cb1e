// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::kubernetes::RepoCredentials;
use git2::{Cred, CredentialType, RemoteCallbacks};

/// libgit2 keeps asking for credentials while the server rejects them
const MAX_AUTH_ATTEMPTS: usize = 3;

/// Remote callbacks answering credential requests from `credentials`, falling
/// back to the SSH agent and the default credential helper.
pub(crate) fn remote_callbacks<'a>(credentials: Option<RepoCredentials>) -> RemoteCallbacks<'a> {
    let credentials = credentials.unwrap_or_default();
    let mut attempts = 0;
    let mut callbacks = RemoteCallbacks::new();

    callbacks.credentials(move |_url, username_from_url, allowed_types| {
        attempts += 1;
        if attempts > MAX_AUTH_ATTEMPTS {
            return Err(git2::Error::from_str("authentication failed"));
        }
        let username = credentials
            .username
            .as_deref()
            .or(username_from_url)
            .unwrap_or("git");

        if allowed_types.contains(CredentialType::SSH_KEY) {
            if let Some(key) = &credentials.ssh_private_key {
                return Cred::ssh_key_from_memory(username, None, key, None);
            }
            return Cred::ssh_key_from_agent(username);
        }

        if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
            if let Some(password) = &credentials.password {
                return Cred::userpass_plaintext(username, password);
            }
        }

        if allowed_types.contains(CredentialType::USERNAME) {
            return Cred::username(username);
        }

        Cred::default()
    });

    callbacks
}

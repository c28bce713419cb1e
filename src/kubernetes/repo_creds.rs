// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Git repository credentials stored as Argo CD repository secrets

use crate::constants::argocd::{SECRET_TYPE_LABEL, SECRET_TYPE_REPOSITORY, SECRET_TYPE_REPO_CREDS};
use crate::error::{BaseClusterError, Result};
use k8s_openapi::api::core::v1::Secret;
use kube::{api::ListParams, Api, Client, ResourceExt};
use std::fmt;
use tracing::{debug, info, instrument};
use url::Url;

/// Credentials used to clone from and push to a repository
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RepoCredentials {
    pub username: Option<String>,
    pub password: Option<String>,
    pub ssh_private_key: Option<String>,
}

impl fmt::Debug for RepoCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepoCredentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("ssh_private_key", &self.ssh_private_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl RepoCredentials {
    pub fn is_anonymous(&self) -> bool {
        self.password.is_none() && self.ssh_private_key.is_none()
    }
}

/// Look up the credentials Argo CD uses for `repo_url`.
///
/// A `repository` secret whose url matches wins, otherwise the `repo-creds`
/// template with the longest matching url prefix is used. Returns `None` when
/// no secret applies, meaning anonymous access.
#[instrument(skip(client))]
pub async fn get_repo_credentials(
    client: &Client,
    namespace: &str,
    repo_url: &str,
) -> Result<Option<RepoCredentials>> {
    let secrets: Api<Secret> = Api::namespaced(client.clone(), namespace);
    let selector = format!(
        "{} in ({},{})",
        SECRET_TYPE_LABEL, SECRET_TYPE_REPOSITORY, SECRET_TYPE_REPO_CREDS
    );
    let secret_list = secrets.list(&ListParams::default().labels(&selector)).await?;

    let wanted = normalize_url(repo_url);
    let mut template: Option<(usize, &Secret)> = None;

    for secret in &secret_list.items {
        let Some(url) = secret_field(secret, "url")? else {
            continue;
        };
        let url = normalize_url(&url);
        match secret_type(secret) {
            Some(SECRET_TYPE_REPOSITORY) if url == wanted => {
                info!("Using repository secret {}/{}", namespace, secret.name_any());
                return credentials_from(secret).map(Some);
            }
            Some(SECRET_TYPE_REPO_CREDS) if wanted.starts_with(&url) => {
                if template.map_or(true, |(len, _)| url.len() > len) {
                    template = Some((url.len(), secret));
                }
            }
            _ => {}
        }
    }

    match template {
        Some((_, secret)) => {
            info!("Using credential template {}/{}", namespace, secret.name_any());
            credentials_from(secret).map(Some)
        }
        None => {
            debug!("No repository secret matches {}, using anonymous access", repo_url);
            Ok(None)
        }
    }
}

fn secret_type(secret: &Secret) -> Option<&str> {
    secret.labels().get(SECRET_TYPE_LABEL).map(String::as_str)
}

fn credentials_from(secret: &Secret) -> Result<RepoCredentials> {
    let credentials = RepoCredentials {
        username: secret_field(secret, "username")?,
        password: secret_field(secret, "password")?,
        ssh_private_key: secret_field(secret, "sshPrivateKey")?,
    };
    if credentials.is_anonymous() {
        debug!(
            "Secret {} has no password or SSH key, falling back to agent and credential helper",
            secret.name_any()
        );
    }
    Ok(credentials)
}

/// Read a non-empty string value from `data`, falling back to `stringData`
fn secret_field(secret: &Secret, key: &str) -> Result<Option<String>> {
    if let Some(bytes) = secret.data.as_ref().and_then(|d| d.get(key)) {
        let value = String::from_utf8(bytes.0.clone()).map_err(|e| {
            BaseClusterError::CredentialsError(format!(
                "Field {} of secret {} is not valid UTF-8: {}",
                key,
                secret.name_any(),
                e
            ))
        })?;
        return Ok(Some(value).filter(|v| !v.is_empty()));
    }
    Ok(secret
        .string_data
        .as_ref()
        .and_then(|d| d.get(key))
        .filter(|v| !v.is_empty())
        .cloned())
}

/// Normalize a repository url for comparison: no trailing `/` or `.git`,
/// lowercase host, no userinfo. Urls that do not parse (scp-like ssh) are
/// only trimmed.
pub fn normalize_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    let url = url.strip_suffix(".git").unwrap_or(url);
    match Url::parse(url) {
        Ok(parsed) if parsed.has_host() => format!(
            "{}://{}{}{}",
            parsed.scheme(),
            parsed.host_str().unwrap_or_default().to_lowercase(),
            parsed.port().map(|p| format!(":{}", p)).unwrap_or_default(),
            parsed.path().trim_end_matches('/')
        ),
        _ => url.to_string(),
    }
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{argocd, git};
use crate::git::CommitIdentity;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace holding the Argo CD repository secrets
    pub argocd_namespace: String,
    pub repo_url: Option<String>,
    pub repo_revision: String,
    /// Base cluster directory relative to the repository root
    pub repo_path: Option<String>,
    /// When set, only this manifest file is validated and nothing is pushed
    pub manifest_file: Option<PathBuf>,
    pub identity: CommitIdentity,
}

/// What the binary should do with a loaded [`Config`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode<'a> {
    Validate(&'a PathBuf),
    GitDir { repo_url: &'a str, repo_path: &'a str },
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Config {
            argocd_namespace: get("ARGOCD_NAMESPACE")
                .unwrap_or_else(|| argocd::DEFAULT_NAMESPACE.to_string()),
            repo_url: get("REPO_URL"),
            repo_revision: get("REPO_REVISION").unwrap_or_else(|| git::DEFAULT_REVISION.to_string()),
            repo_path: get("REPO_PATH"),
            manifest_file: get("MANIFEST_FILE").map(PathBuf::from),
            identity: CommitIdentity {
                name: get("GIT_AUTHOR_NAME").unwrap_or_else(|| git::DEFAULT_AUTHOR_NAME.to_string()),
                email: get("GIT_AUTHOR_EMAIL")
                    .unwrap_or_else(|| git::DEFAULT_AUTHOR_EMAIL.to_string()),
            },
        };
        config.mode()?;
        Ok(config)
    }

    pub fn mode(&self) -> Result<Mode<'_>> {
        if let Some(file) = &self.manifest_file {
            return Ok(Mode::Validate(file));
        }
        let repo_url = self
            .repo_url
            .as_deref()
            .context("REPO_URL environment variable not set")?;
        let repo_path = self
            .repo_path
            .as_deref()
            .context("REPO_PATH environment variable not set")?;
        Ok(Mode::GitDir { repo_url, repo_path })
    }
}

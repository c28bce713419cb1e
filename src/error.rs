// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BaseClusterError {
    #[error("found subdirectory: {0}")]
    Subdirectory(String),

    #[error("failed to find base cluster manifest file in {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("multiple manifests found: ({first}, {second})")]
    MultipleManifests { first: String, second: String },

    #[error("failed to find cluster resource in {}", .0.display())]
    ClusterNotFound(PathBuf),

    #[error("there are 2 or more clusters: ({first}, {second})")]
    MultipleClusters { first: String, second: String },

    #[error("cluster resource in document {0} has no name")]
    UnnamedCluster(usize),

    #[error("invalid object in document {index}: {reason}")]
    InvalidObject { index: usize, reason: String },

    #[error("invalid repository path {0}: must be relative and stay inside the repository")]
    InvalidRepoPath(String),

    #[error("failed to {context} {}: {source}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to {context}: {source}")]
    Git {
        context: &'static str,
        #[source]
        source: git2::Error,
    },

    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to get kubernetes client: {0}")]
    KubeconfigError(String),

    #[error("Failed to resolve repository credentials: {0}")]
    CredentialsError(String),

    #[error("failed to clone repo {url}: {source}")]
    CloneError {
        url: String,
        #[source]
        source: git2::Error,
    },

    #[error("failed to push to remote repository: {0}")]
    PushError(String),

    #[error("cannot push revision {0}: working tree is not on a branch")]
    DetachedHead(String),

    #[error("failed to decode document {index}: {source}")]
    Decode {
        index: usize,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to encode object {name} (document {index}): {source}")]
    Encode {
        index: usize,
        name: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to render template: {0}")]
    Template(#[from] minijinja::Error),
}

/// Broad category of a [`BaseClusterError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The manifest or directory layout is invalid; retrying will not help.
    Validation,
    /// Local filesystem or repository failure.
    Io,
    /// Kubernetes API or git remote failure.
    Remote,
    /// A document could not be decoded, encoded or rendered.
    Encoding,
}

impl BaseClusterError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Subdirectory(_)
            | Self::ManifestNotFound(_)
            | Self::MultipleManifests { .. }
            | Self::ClusterNotFound(_)
            | Self::MultipleClusters { .. }
            | Self::UnnamedCluster(_)
            | Self::InvalidObject { .. }
            | Self::InvalidRepoPath(_) => ErrorClass::Validation,
            Self::Io { .. } | Self::Git { .. } | Self::Task(_) => ErrorClass::Io,
            Self::KubeError(_)
            | Self::KubeconfigError(_)
            | Self::CredentialsError(_)
            | Self::CloneError { .. }
            | Self::PushError(_)
            | Self::DetachedHead(_) => ErrorClass::Remote,
            Self::Decode { .. } | Self::Encode { .. } | Self::Template(_) => ErrorClass::Encoding,
        }
    }

    /// True when the input itself is invalid, as opposed to the environment failing.
    pub fn is_validation(&self) -> bool {
        self.class() == ErrorClass::Validation
    }

    pub(crate) fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BaseClusterError::Io {
            context,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn git(context: &'static str, source: git2::Error) -> Self {
        BaseClusterError::Git { context, source }
    }
}

pub type Result<T> = std::result::Result<T, BaseClusterError>;

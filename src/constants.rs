// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Reserved file names inside a base cluster directory
pub mod files {
    /// Generated kustomize entry point referencing the manifest
    pub const KUSTOMIZATION: &str = "kustomization.yaml";
    /// Generated kustomize transformer configuration
    pub const CONFIGURATIONS: &str = "configurations.yaml";
}

/// The object kind that identifies the base cluster
pub const CLUSTER_KIND: &str = "Cluster";

/// Argo CD repository secret conventions
pub mod argocd {
    pub const DEFAULT_NAMESPACE: &str = "argocd";
    pub const SECRET_TYPE_LABEL: &str = "argocd.argoproj.io/secret-type";
    /// Credentials for exactly one repository URL
    pub const SECRET_TYPE_REPOSITORY: &str = "repository";
    /// Credential template matched by URL prefix
    pub const SECRET_TYPE_REPO_CREDS: &str = "repo-creds";
}

/// Git conventions
pub mod git {
    pub const REMOTE_NAME: &str = "origin";
    /// Revision value selecting the remote's default branch
    pub const DEFAULT_REVISION: &str = "HEAD";
    pub const DEFAULT_AUTHOR_NAME: &str = "basecluster automation";
    pub const DEFAULT_AUTHOR_EMAIL: &str = "basecluster@localhost";
}

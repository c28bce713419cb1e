// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for client creation and repository credential lookup.

pub mod client;
pub mod repo_creds;

pub use client::{create_client, infer_config};
pub use repo_creds::{get_repo_credentials, RepoCredentials};

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Git-backed base cluster synchronization.

pub mod git_dir;

pub use git_dir::{prepare_git_dir, prepare_git_dir_with_client, sync_repo, sync_repo_in, GitDirOutcome};

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Git clone, commit and push on temporary working trees.

mod auth;
pub mod clone;
pub mod commit;
pub mod push;

pub use clone::{clone_repo, clone_repo_in, is_default_revision, WorkingTree};
pub use commit::{commit_changes, CommitIdentity};
pub use push::push;

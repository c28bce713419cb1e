// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster API manifest decoding, validation and namespace removal.

pub mod document;
pub mod namespace;
pub mod prepare;

pub use document::{decode, ApiObject, ManifestEncoder};
pub use namespace::strip_namespace;
pub use prepare::{prepare, validate, Preparation};

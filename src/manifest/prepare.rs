// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Validation and namespace removal for a base cluster manifest file.

use super::document::{decode, ManifestEncoder};
use super::namespace::strip_namespace;
use crate::constants::CLUSTER_KIND;
use crate::error::{BaseClusterError, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, instrument};

/// Outcome of [`prepare`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preparation {
    pub cluster_name: String,
    /// Full rewritten manifest, present only when a namespace was removed
    /// outside of validate-only mode
    pub rewritten: Option<Vec<u8>>,
}

/// Check a Cluster API manifest file and compute its namespace-free form.
///
/// The file must contain exactly one object of kind `Cluster`. Every object
/// has its `metadata.namespace` removed. When `validate_only` is false and at
/// least one namespace was removed, the rewritten document stream is returned.
#[instrument(skip_all, fields(path = %path.display(), validate_only = validate_only))]
pub fn prepare(path: &Path, validate_only: bool) -> Result<Preparation> {
    let text = fs::read_to_string(path).map_err(|e| BaseClusterError::io("read manifest", path, e))?;
    prepare_text(path, &text, validate_only)
}

/// Run [`prepare`] in validate-only mode and return the cluster name.
pub fn validate(path: &Path) -> Result<String> {
    prepare(path, true).map(|p| p.cluster_name)
}

fn prepare_text(path: &Path, text: &str, validate_only: bool) -> Result<Preparation> {
    let mut cluster_name: Option<String> = None;
    let mut dirty = false;
    let mut encoder = ManifestEncoder::new();

    for mut object in decode(text)? {
        if object.kind() == CLUSTER_KIND {
            let name = object.name();
            if name.is_empty() {
                return Err(BaseClusterError::UnnamedCluster(object.index()));
            }
            if let Some(first) = &cluster_name {
                return Err(BaseClusterError::MultipleClusters {
                    first: first.clone(),
                    second: name.to_string(),
                });
            }
            cluster_name = Some(name.to_string());
        }

        if let Some(namespace) = strip_namespace(&mut object) {
            debug!(resource = %object.name(), kind = %object.kind(), %namespace, "removing namespace");
            dirty = true;
        }
        encoder.encode(&object)?;
    }

    let Some(cluster_name) = cluster_name else {
        return Err(BaseClusterError::ClusterNotFound(path.to_path_buf()));
    };

    let rewritten = (!validate_only && dirty).then(|| encoder.into_bytes());
    Ok(Preparation {
        cluster_name,
        rewritten,
    })
}

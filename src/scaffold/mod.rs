// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Base cluster directory layout checks and file generation.

pub mod templates;

use crate::constants::files;
use crate::error::{BaseClusterError, Result};
use crate::manifest::prepare;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use templates::{render_kustomization, KustomizationTemplateParams, CONFIGURATIONS_YAML};
use tracing::{debug, info, instrument};

/// Classified entries of a base cluster directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryLayout {
    pub manifest_file_name: String,
    pub kustomization_found: bool,
    pub configurations_found: bool,
}

impl DirectoryLayout {
    /// List `dir` and check it holds exactly one manifest next to the
    /// optional generated files, with no subdirectories.
    pub fn scan(dir: &Path) -> Result<Self> {
        let read_err = |e| BaseClusterError::io("list repo directory", dir, e);

        let mut entries = Vec::new();
        for entry in fs::read_dir(dir).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            let is_dir = entry.file_type().map_err(read_err)?.is_dir();
            entries.push((entry.file_name().to_string_lossy().into_owned(), is_dir));
        }
        entries.sort();

        let mut manifest: Option<String> = None;
        let mut kustomization_found = false;
        let mut configurations_found = false;

        for (name, is_dir) in entries {
            if is_dir {
                return Err(BaseClusterError::Subdirectory(name));
            }
            match name.as_str() {
                files::KUSTOMIZATION => kustomization_found = true,
                files::CONFIGURATIONS => configurations_found = true,
                _ => {
                    if let Some(first) = manifest {
                        return Err(BaseClusterError::MultipleManifests { first, second: name });
                    }
                    manifest = Some(name);
                }
            }
        }

        let Some(manifest_file_name) = manifest else {
            return Err(BaseClusterError::ManifestNotFound(dir.to_path_buf()));
        };

        Ok(Self {
            manifest_file_name,
            kustomization_found,
            configurations_found,
        })
    }
}

/// Result of [`prepare_dir`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedDir {
    pub manifest_file_name: String,
    pub cluster_name: String,
}

/// Refuse absolute paths and `..` components in a repository-relative path
pub fn validate_repo_path(dir_rel_path: &str) -> Result<()> {
    if Path::new(dir_rel_path)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    {
        Ok(())
    } else {
        Err(BaseClusterError::InvalidRepoPath(dir_rel_path.to_string()))
    }
}

/// Resolve a repository-relative directory below `root`
pub fn resolve_dir(root: &Path, dir_rel_path: &str) -> Result<PathBuf> {
    validate_repo_path(dir_rel_path)?;
    Ok(root.join(dir_rel_path))
}

/// Prepare `dir_rel_path` below `root` for use as a base cluster.
///
/// The manifest has its namespaces stripped in place, and `kustomization.yaml`
/// and `configurations.yaml` are generated when missing. Existing generated
/// files are never touched. Nothing is written before the layout and the
/// manifest have been validated; a failure while writing leaves earlier
/// writes in place.
#[instrument(skip(root), fields(root = %root.display()))]
pub fn prepare_dir(root: &Path, dir_rel_path: &str) -> Result<PreparedDir> {
    let dir = resolve_dir(root, dir_rel_path)?;
    let layout = DirectoryLayout::scan(&dir)?;
    let manifest_path = dir.join(&layout.manifest_file_name);

    let preparation = prepare(&manifest_path, false)?;

    if let Some(rewritten) = &preparation.rewritten {
        info!("Removing namespaces from {}", manifest_path.display());
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&manifest_path)
            .map_err(|e| BaseClusterError::io("open manifest for writing", &manifest_path, e))?;
        file.write_all(rewritten)
            .map_err(|e| BaseClusterError::io("write to manifest", &manifest_path, e))?;
    }

    if layout.kustomization_found {
        debug!("{} already exists", files::KUSTOMIZATION);
    } else {
        let content = render_kustomization(&KustomizationTemplateParams {
            manifest_file_name: &layout.manifest_file_name,
        })?;
        create_file(&dir.join(files::KUSTOMIZATION), &content)?;
    }

    if layout.configurations_found {
        debug!("{} already exists", files::CONFIGURATIONS);
    } else {
        create_file(&dir.join(files::CONFIGURATIONS), CONFIGURATIONS_YAML)?;
    }

    Ok(PreparedDir {
        manifest_file_name: layout.manifest_file_name,
        cluster_name: preparation.cluster_name,
    })
}

fn create_file(path: &Path, content: &str) -> Result<()> {
    info!("Creating {}", path.display());
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| BaseClusterError::io("create", path, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| BaseClusterError::io("write to", path, e))
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use tracing::info;

use basecluster::config::{Config, Mode};
use basecluster::kubernetes::infer_config;
use basecluster::manifest::validate;
use basecluster::sync::prepare_git_dir;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    match config.mode()? {
        Mode::Validate(path) => {
            info!("Validating manifest {}", path.display());
            let cluster_name = validate(path)?;
            info!("Manifest is valid, cluster name: {}", cluster_name);
            println!("{}", cluster_name);
        }
        Mode::GitDir {
            repo_url,
            repo_path,
        } => {
            info!(
                "Preparing base cluster directory {} in {}@{}",
                repo_path, repo_url, config.repo_revision
            );
            let api_config = infer_config().await?;
            let outcome = prepare_git_dir(
                api_config,
                &config.argocd_namespace,
                repo_url,
                &config.repo_revision,
                repo_path,
                &config.identity,
            )
            .await?;

            if outcome.changed {
                info!("Pushed changes for base cluster {}", outcome.cluster_name);
            } else {
                info!("Base cluster {} needed no changes", outcome.cluster_name);
            }
        }
    }

    Ok(())
}

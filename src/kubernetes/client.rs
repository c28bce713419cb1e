// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes client creation

use crate::error::{BaseClusterError, Result};
use kube::{Client, Config as KConfig};
use tracing::debug;

/// Create a Kubernetes client from an already resolved connection config
pub fn create_client(config: KConfig) -> Result<Client> {
    debug!("Creating Kubernetes client for {}", config.cluster_url);
    Client::try_from(config)
        .map_err(|e| BaseClusterError::KubeconfigError(format!("Failed to create client: {}", e)))
}

/// Infer the connection config from the environment (kubeconfig or in-cluster)
pub async fn infer_config() -> Result<KConfig> {
    KConfig::infer()
        .await
        .map_err(|e| BaseClusterError::KubeconfigError(format!("Failed to infer config: {}", e)))
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Content of the generated base cluster files.

use crate::error::Result;
use minijinja::Environment;
use serde::Serialize;

const KUSTOMIZATION_TEMPLATE: &str = r#"apiVersion: kustomize.config.k8s.io/v1beta1
kind: Kustomization
resources:
- {{ manifest_file_name }}
configurations:
- configurations.yaml
"#;

/// Kustomize name reference configuration so that a name prefix or suffix
/// applied to the base cluster also rewrites the Cluster API object references.
pub const CONFIGURATIONS_YAML: &str = r#"nameReference:
- kind: KubeadmControlPlane
  fieldSpecs:
  - kind: Cluster
    path: spec/controlPlaneRef/name
- kind: AWSCluster
  fieldSpecs:
  - kind: Cluster
    path: spec/infrastructureRef/name
- kind: AWSManagedControlPlane
  fieldSpecs:
  - kind: Cluster
    path: spec/controlPlaneRef/name
  - kind: Cluster
    path: spec/infrastructureRef/name
- kind: DockerCluster
  fieldSpecs:
  - kind: Cluster
    path: spec/infrastructureRef/name
- kind: AWSMachineTemplate
  fieldSpecs:
  - kind: KubeadmControlPlane
    path: spec/machineTemplate/infrastructureRef/name
  - kind: MachineDeployment
    path: spec/template/spec/infrastructureRef/name
- kind: DockerMachineTemplate
  fieldSpecs:
  - kind: KubeadmControlPlane
    path: spec/machineTemplate/infrastructureRef/name
  - kind: MachineDeployment
    path: spec/template/spec/infrastructureRef/name
- kind: KubeadmConfigTemplate
  fieldSpecs:
  - kind: MachineDeployment
    path: spec/template/spec/bootstrap/configRef/name
- kind: AWSManagedMachinePool
  fieldSpecs:
  - kind: MachinePool
    path: spec/template/spec/infrastructureRef/name
- kind: Cluster
  fieldSpecs:
  - kind: MachineDeployment
    path: spec/clusterName
  - kind: MachineDeployment
    path: spec/selector/matchLabels/cluster.x-k8s.io\/cluster-name
  - kind: MachineDeployment
    path: spec/template/metadata/labels/cluster.x-k8s.io\/cluster-name
  - kind: MachineDeployment
    path: spec/template/spec/clusterName
  - kind: MachinePool
    path: spec/clusterName
  - kind: MachinePool
    path: spec/template/spec/clusterName
"#;

#[derive(Debug, Serialize)]
pub struct KustomizationTemplateParams<'a> {
    pub manifest_file_name: &'a str,
}

/// Render `kustomization.yaml` referencing the given manifest file
pub fn render_kustomization(params: &KustomizationTemplateParams<'_>) -> Result<String> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    Ok(env.render_str(KUSTOMIZATION_TEMPLATE, params)?)
}

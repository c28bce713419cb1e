// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Multi-document YAML decoding and re-encoding of Kubernetes API objects.

use crate::error::{BaseClusterError, Result};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

/// One Kubernetes API object decoded from a manifest stream.
///
/// Only `kind`, `metadata.name` and `metadata.namespace` are interpreted,
/// everything else in `body` is carried through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiObject {
    index: usize,
    kind: String,
    body: Mapping,
}

impl ApiObject {
    fn from_value(index: usize, value: Value) -> Result<Self> {
        let invalid = |reason: &str| BaseClusterError::InvalidObject {
            index,
            reason: reason.to_string(),
        };

        let Value::Mapping(body) = value else {
            return Err(invalid("document is not a mapping"));
        };

        let Some(kind) = non_empty_str(&body, "kind") else {
            return Err(invalid("Object 'Kind' is missing"));
        };
        if non_empty_str(&body, "apiVersion").is_none() {
            return Err(invalid("Object 'apiVersion' is missing"));
        }

        match body.get("metadata") {
            None | Some(Value::Null) => {}
            Some(Value::Mapping(metadata)) => {
                for key in ["name", "namespace"] {
                    if !matches!(metadata.get(key), None | Some(Value::Null | Value::String(_))) {
                        return Err(invalid(&format!("metadata.{} is not a string", key)));
                    }
                }
            }
            Some(_) => return Err(invalid("metadata is not a mapping")),
        }

        Ok(Self {
            index,
            kind: kind.to_string(),
            body,
        })
    }

    /// Position of the document in the source stream
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// `metadata.name`, or an empty string when unset
    pub fn name(&self) -> &str {
        self.metadata_str("name").unwrap_or_default()
    }

    /// `metadata.namespace` when set to a non-empty value
    pub fn namespace(&self) -> Option<&str> {
        self.metadata_str("namespace").filter(|ns| !ns.is_empty())
    }

    pub fn body(&self) -> &Mapping {
        &self.body
    }

    pub(crate) fn metadata_mut(&mut self) -> Option<&mut Mapping> {
        self.body.get_mut("metadata").and_then(Value::as_mapping_mut)
    }

    fn metadata_str(&self, key: &str) -> Option<&str> {
        self.body
            .get("metadata")
            .and_then(Value::as_mapping)
            .and_then(|m| m.get(key))
            .and_then(Value::as_str)
    }
}

fn non_empty_str<'a>(map: &'a Mapping, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Decode every non-empty document of a YAML stream, in order.
pub fn decode(text: &str) -> Result<Vec<ApiObject>> {
    let mut objects = Vec::new();
    for (index, document) in serde_yaml::Deserializer::from_str(text).enumerate() {
        let value =
            Value::deserialize(document).map_err(|source| BaseClusterError::Decode { index, source })?;
        if value.is_null() {
            continue;
        }
        objects.push(ApiObject::from_value(index, value)?);
    }
    Ok(objects)
}

/// Accumulates objects into a `---` separated YAML stream.
#[derive(Debug, Default)]
pub struct ManifestEncoder {
    out: String,
    documents: usize,
}

impl ManifestEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `object` as the next document.
    ///
    /// Strings that a YAML 1.1 reader would resolve to a boolean, null or
    /// base 60 number are written single-quoted, so consumers such as kubectl
    /// read back the same string.
    pub fn encode(&mut self, object: &ApiObject) -> Result<()> {
        let body = Value::Mapping(object.body().clone());
        let mut marker = String::from("basecluster_quoted_");
        while mentions(&body, &marker) {
            marker.push('x');
        }

        let mut quoted = Vec::new();
        let shielded = shield(&body, &marker, &mut quoted);
        let mut text = serde_yaml::to_string(&shielded).map_err(|source| BaseClusterError::Encode {
            index: object.index(),
            name: object.name().to_string(),
            source,
        })?;
        for (i, original) in quoted.iter().enumerate() {
            text = text.replace(&placeholder(&marker, i), &format!("'{}'", original));
        }

        if self.documents > 0 {
            self.out.push_str("---\n");
        }
        self.out.push_str(&text);
        self.documents += 1;
        Ok(())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.out.into_bytes()
    }
}

fn placeholder(marker: &str, i: usize) -> String {
    format!("{}{}_", marker, i)
}

fn mentions(value: &Value, marker: &str) -> bool {
    match value {
        Value::String(s) => s.contains(marker),
        Value::Sequence(seq) => seq.iter().any(|v| mentions(v, marker)),
        Value::Mapping(map) => map.iter().any(|(k, v)| mentions(k, marker) || mentions(v, marker)),
        Value::Tagged(tagged) => mentions(&tagged.value, marker),
        _ => false,
    }
}

/// Copy of `value` with every YAML 1.1 lookalike string, keys included,
/// replaced by a plain placeholder. The originals are pushed to `quoted` in
/// placeholder order.
fn shield(value: &Value, marker: &str, quoted: &mut Vec<String>) -> Value {
    match value {
        Value::String(s) if is_yaml11_non_string(s) => {
            quoted.push(s.clone());
            Value::String(placeholder(marker, quoted.len() - 1))
        }
        Value::Sequence(seq) => Value::Sequence(seq.iter().map(|v| shield(v, marker, quoted)).collect()),
        Value::Mapping(map) => Value::Mapping(
            map.iter()
                .map(|(k, v)| (shield(k, marker, quoted), shield(v, marker, quoted)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn is_yaml11_non_string(s: &str) -> bool {
    matches!(
        s,
        "y" | "Y" | "yes" | "Yes" | "YES" | "n" | "N" | "no" | "No" | "NO"
            | "true" | "True" | "TRUE" | "false" | "False" | "FALSE"
            | "on" | "On" | "ON" | "off" | "Off" | "OFF"
            | "~" | "null" | "Null" | "NULL"
    ) || is_sexagesimal(s)
}

/// `[-+]?[0-9][0-9_]*(:[0-5]?[0-9])+(\.[0-9_]*)?`
fn is_sexagesimal(s: &str) -> bool {
    let unsigned = s.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(s);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };

    let mut parts = whole.split(':');
    let head = parts.next().unwrap_or_default();
    if !head.starts_with(|c: char| c.is_ascii_digit())
        || !head.chars().all(|c| c.is_ascii_digit() || c == '_')
    {
        return false;
    }

    let mut sections = 0;
    for part in parts {
        let bytes = part.as_bytes();
        let valid = match bytes {
            [d] => d.is_ascii_digit(),
            [tens, units] => (b'0'..=b'5').contains(tens) && units.is_ascii_digit(),
            _ => false,
        };
        if !valid {
            return false;
        }
        sections += 1;
    }

    sections > 0 && fraction.map_or(true, |f| f.chars().all(|c| c.is_ascii_digit() || c == '_'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_DOCS: &str = r#"
apiVersion: cluster.x-k8s.io/v1beta1
kind: Cluster
metadata:
  name: prod
  namespace: default
  labels:
    tier: gold
spec:
  clusterNetwork:
    pods:
      cidrBlocks: ["192.168.0.0/16"]
---
# comment-only document is skipped
---
apiVersion: controlplane.cluster.x-k8s.io/v1beta1
kind: KubeadmControlPlane
metadata:
  name: prod-control-plane
spec:
  replicas: 3
"#;

    #[test]
    fn test_decode_skips_empty_documents() {
        let objects = decode(TWO_DOCS).unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].kind(), "Cluster");
        assert_eq!(objects[0].name(), "prod");
        assert_eq!(objects[0].namespace(), Some("default"));
        assert_eq!(objects[1].kind(), "KubeadmControlPlane");
        assert_eq!(objects[1].namespace(), None);
        assert_eq!(objects[1].index(), 2);
    }

    #[test]
    fn test_decode_rejects_missing_kind() {
        let err = decode("apiVersion: v1\nmetadata:\n  name: x\n").unwrap_err();
        assert!(matches!(err, BaseClusterError::InvalidObject { index: 0, .. }));
        assert!(err.is_validation());
    }

    #[test]
    fn test_decode_rejects_non_mapping() {
        let err = decode("- a\n- b\n").unwrap_err();
        assert!(err.to_string().contains("not a mapping"));
    }

    #[test]
    fn test_decode_rejects_non_string_namespace() {
        let err = decode("apiVersion: v1\nkind: ConfigMap\nmetadata:\n  namespace: [a]\n").unwrap_err();
        assert!(err.to_string().contains("metadata.namespace"));
    }

    #[test]
    fn test_decode_reports_malformed_yaml() {
        let err = decode("kind: [unterminated\n").unwrap_err();
        assert!(matches!(err, BaseClusterError::Decode { index: 0, .. }));
    }

    #[test]
    fn test_empty_namespace_is_absent() {
        let objects = decode("apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: c\n  namespace: \"\"\n").unwrap();
        assert_eq!(objects[0].namespace(), None);
    }

    #[test]
    fn test_encoder_quotes_yaml11_lookalike_strings() {
        let objects = decode(
            r#"apiVersion: v1
kind: ConfigMap
metadata:
  name: flags
  labels:
    autoscale: "off"
    gpu: "yes"
    mode: "y"
    "on": enabled
data:
  window: "1:20"
  version: "1.30"
  plain: offline
  list: ["no", "~", "NULL", value]
"#,
        )
        .unwrap();
        let mut encoder = ManifestEncoder::new();
        encoder.encode(&objects[0]).unwrap();
        let text = String::from_utf8(encoder.into_bytes()).unwrap();

        assert!(text.contains("autoscale: 'off'\n"), "{text}");
        assert!(text.contains("gpu: 'yes'\n"), "{text}");
        assert!(text.contains("mode: 'y'\n"), "{text}");
        assert!(text.contains("'on': enabled\n"), "{text}");
        assert!(text.contains("window: '1:20'\n"), "{text}");
        assert!(text.contains("plain: offline\n"), "{text}");
        assert!(text.contains("- 'no'\n"), "{text}");
        assert!(!text.contains("basecluster_quoted_"), "{text}");

        let again = decode(&text).unwrap();
        assert_eq!(again[0].body(), objects[0].body());
    }

    #[test]
    fn test_encoder_keeps_strings_resembling_placeholders() {
        let objects = decode(
            "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: c\ndata:\n  a: basecluster_quoted_0_\n  b: \"off\"\n",
        )
        .unwrap();
        let mut encoder = ManifestEncoder::new();
        encoder.encode(&objects[0]).unwrap();
        let text = String::from_utf8(encoder.into_bytes()).unwrap();

        assert!(text.contains("a: basecluster_quoted_0_\n"), "{text}");
        assert!(text.contains("b: 'off'\n"), "{text}");
        assert_eq!(decode(&text).unwrap()[0].body(), objects[0].body());
    }

    #[test]
    fn test_sexagesimal_forms() {
        for s in ["1:20", "190:20:30", "-1:30", "1:20.5", "1_0:05"] {
            assert!(is_sexagesimal(s), "{s}");
        }
        for s in ["1:", ":20", "1:60", "1:2:345", "a:20", "10", "v1:20"] {
            assert!(!is_sexagesimal(s), "{s}");
        }
    }

    #[test]
    fn test_oversized_integer_is_decode_error() {
        let err = decode("apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: c\ndata:\n  j: 12345678901234567890123\n")
            .unwrap_err();
        assert!(matches!(err, BaseClusterError::Decode { index: 0, .. }));
        assert!(!err.is_validation());
    }

    #[test]
    fn test_encoder_separates_documents_and_keeps_order() {
        let objects = decode(TWO_DOCS).unwrap();
        let mut encoder = ManifestEncoder::new();
        for object in &objects {
            encoder.encode(object).unwrap();
        }
        let text = String::from_utf8(encoder.into_bytes()).unwrap();

        assert!(!text.starts_with("---"));
        assert_eq!(text.matches("---\n").count(), 1);
        assert!(text.find("kind: Cluster").unwrap() < text.find("kind: KubeadmControlPlane").unwrap());

        let again = decode(&text).unwrap();
        assert_eq!(again.len(), 2);
        assert_eq!(again[0].body(), objects[0].body());
        assert_eq!(again[1].body(), objects[1].body());
    }
}

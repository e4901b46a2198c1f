//! Core transfer types

use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// Key/value payload moved between the parameter store and a cluster secret
///
/// Keys are kept sorted so that every pass over a bundle visits keys in the
/// same order. `Debug` output never includes values.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretBundle {
    entries: BTreeMap<String, String>,
}

impl SecretBundle {
    /// Create an empty bundle
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the previous one for that key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the bundle holds no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Apply a transform to every value, leaving keys untouched
    pub fn map_values<F>(self, mut f: F) -> Self
    where
        F: FnMut(&str, String) -> String,
    {
        let entries = self
            .entries
            .into_iter()
            .map(|(k, v)| {
                let v = f(&k, v);
                (k, v)
            })
            .collect();
        Self { entries }
    }

    /// Consume into the underlying map
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.entries
    }
}

impl fmt::Debug for SecretBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .map(|(k, v)| (k, format!("[REDACTED {} bytes]", v.len()))),
            )
            .finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SecretBundle {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<BTreeMap<String, String>> for SecretBundle {
    fn from(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }
}

impl IntoIterator for SecretBundle {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Type discriminator used when creating a cluster secret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SecretKind {
    /// Arbitrary user data (default)
    #[default]
    Opaque,
    /// TLS certificate and key
    Tls,
}

impl SecretKind {
    /// The Kubernetes `type` field value for this kind
    pub fn type_name(&self) -> &'static str {
        match self {
            SecretKind::Opaque => "Opaque",
            SecretKind::Tls => "kubernetes.io/tls",
        }
    }

    /// Map a Kubernetes `type` field back to a kind, if it is one we create
    pub fn from_type_name(type_name: &str) -> Option<Self> {
        match type_name {
            "" | "Opaque" => Some(SecretKind::Opaque),
            "kubernetes.io/tls" => Some(SecretKind::Tls),
            _ => None,
        }
    }
}

impl fmt::Display for SecretKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Server-side metadata carried from a read to the following replace
///
/// `resource_version` makes the replace conditional on the secret not having
/// changed since it was read. Fields not modelled here land in `other` and
/// are sent back untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

/// A namespaced cluster secret
///
/// `secret_type` is kept as the raw type string so that updates never touch a
/// discriminator this tool did not create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRecord {
    pub namespace: String,
    pub name: String,
    pub secret_type: String,
    pub metadata: SecretMetadata,
    pub data: SecretBundle,
}

impl SecretRecord {
    /// Build a record for creation with the given kind
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        kind: SecretKind,
        data: SecretBundle,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            secret_type: kind.type_name().to_string(),
            metadata: SecretMetadata::default(),
            data,
        }
    }

    /// The kind of this record, when it is one we know
    pub fn kind(&self) -> Option<SecretKind> {
        SecretKind::from_type_name(&self.secret_type)
    }

    pub fn resource_version(&self) -> Option<&str> {
        self.metadata.resource_version.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_iterates_sorted() {
        let bundle: SecretBundle = [("zeta", "1"), ("alpha", "2"), ("mid", "3")]
            .into_iter()
            .collect();
        let keys: Vec<&str> = bundle.keys().collect();
        assert_eq!(keys, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_bundle_debug_redacts_values() {
        let bundle: SecretBundle = [("passwd", "SecretSquirrel")].into_iter().collect();
        let debug = format!("{:?}", bundle);
        assert!(debug.contains("passwd"));
        assert!(debug.contains("REDACTED 14 bytes"));
        assert!(!debug.contains("SecretSquirrel"));
    }

    #[test]
    fn test_map_values_keeps_keys() {
        let bundle: SecretBundle = [("a", "1"), ("b", "2")].into_iter().collect();
        let mapped = bundle.map_values(|_, v| format!("{v}{v}"));
        assert_eq!(mapped.get("a"), Some("11"));
        assert_eq!(mapped.get("b"), Some("22"));
        assert_eq!(mapped.len(), 2);
    }

    #[test]
    fn test_bundle_serializes_as_plain_map() {
        let bundle: SecretBundle = [("a", "1")].into_iter().collect();
        assert_eq!(serde_json::to_string(&bundle).unwrap(), r#"{"a":"1"}"#);
    }

    #[test]
    fn test_secret_kind_type_names() {
        assert_eq!(SecretKind::Opaque.type_name(), "Opaque");
        assert_eq!(SecretKind::Tls.type_name(), "kubernetes.io/tls");
        assert_eq!(
            SecretKind::from_type_name("kubernetes.io/tls"),
            Some(SecretKind::Tls)
        );
        assert_eq!(SecretKind::from_type_name(""), Some(SecretKind::Opaque));
        assert_eq!(
            SecretKind::from_type_name("kubernetes.io/dockerconfigjson"),
            None
        );
    }

    #[test]
    fn test_record_kind() {
        let record = SecretRecord::new("ns", "web-tls", SecretKind::Tls, SecretBundle::new());
        assert_eq!(record.secret_type, "kubernetes.io/tls");
        assert_eq!(record.kind(), Some(SecretKind::Tls));
    }

    #[test]
    fn test_metadata_keeps_unknown_fields() {
        let json = r#"{
            "resourceVersion": "42",
            "labels": {"app": "foo"},
            "uid": "1234",
            "ownerReferences": [{"kind": "Deployment", "name": "foo"}]
        }"#;
        let metadata: SecretMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata.resource_version.as_deref(), Some("42"));
        assert_eq!(metadata.labels.get("app").map(String::as_str), Some("foo"));
        assert!(metadata.other.contains_key("ownerReferences"));

        let back = serde_json::to_value(&metadata).unwrap();
        assert_eq!(back["uid"], "1234");
        assert_eq!(back["ownerReferences"][0]["kind"], "Deployment");
        assert!(back.get("annotations").is_none());
    }
}

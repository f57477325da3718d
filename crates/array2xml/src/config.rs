//! Conversion configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// Options shared by the serializer and deserializer.
///
/// A `Config` is resolved once and held read-only for the lifetime of a
/// converter instance; every conversion pass reads the same resolved values.
/// The reserved keys give structural meaning to otherwise ordinary mapping
/// entries and are never treated as child element names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Key whose value holds an element's attribute map.
    pub attributes_key: String,
    /// Key whose value holds an element's CDATA content.
    pub cdata_key: String,
    /// Key whose value holds an element's text content when attributes
    /// are also present.
    pub value_key: String,
    /// Explicit root element name (serialization only). When unset, a
    /// single-key top-level mapping is unwrapped into root name + payload.
    pub root_node_name: Option<String>,
    /// Collect namespace declarations into the root element's attributes
    /// (deserialization only).
    pub use_namespaces: bool,
    /// XML declaration version for produced documents.
    pub version: String,
    /// XML declaration encoding for produced documents.
    pub encoding: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            attributes_key: "@attributes".to_string(),
            cdata_key: "@cdata".to_string(),
            value_key: "@value".to_string(),
            root_node_name: None,
            use_namespaces: false,
            version: "1.0".to_string(),
            encoding: "UTF-8".to_string(),
        }
    }
}

impl Config {
    /// Resolve a configuration from a JSON override object.
    ///
    /// Missing keys take their defaults and unrecognized keys are ignored,
    /// so option records written for a newer version still resolve.
    ///
    /// # Example
    ///
    /// ```
    /// use array2xml::Config;
    /// use serde_json::json;
    ///
    /// let config = Config::from_value(json!({
    ///     "valueKey": "#text",
    ///     "useNamespaces": true,
    /// })).unwrap();
    ///
    /// assert_eq!(config.value_key, "#text");
    /// assert_eq!(config.attributes_key, "@attributes");
    /// ```
    pub fn from_value(overrides: Value) -> Result<Self> {
        serde_json::from_value(overrides).map_err(|e| Error::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.attributes_key, "@attributes");
        assert_eq!(config.cdata_key, "@cdata");
        assert_eq!(config.value_key, "@value");
        assert_eq!(config.root_node_name, None);
        assert!(!config.use_namespaces);
        assert_eq!(config.version, "1.0");
        assert_eq!(config.encoding, "UTF-8");
    }

    #[test]
    fn test_from_value_merges_over_defaults() {
        let config = Config::from_value(json!({
            "attributesKey": "@attr",
            "rootNodeName": "root",
        }))
        .unwrap();

        assert_eq!(config.attributes_key, "@attr");
        assert_eq!(config.root_node_name.as_deref(), Some("root"));
        // Untouched fields keep their defaults.
        assert_eq!(config.cdata_key, "@cdata");
        assert_eq!(config.value_key, "@value");
    }

    #[test]
    fn test_from_value_ignores_unknown_keys() {
        let config = Config::from_value(json!({
            "valueKey": "#text",
            "someFutureOption": 42,
        }))
        .unwrap();

        assert_eq!(config.value_key, "#text");
    }

    #[test]
    fn test_from_value_rejects_wrong_types() {
        assert!(Config::from_value(json!({ "useNamespaces": "yes" })).is_err());
    }
}

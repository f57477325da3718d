//! Lossless, configurable, bidirectional conversion between JSON-like node
//! trees and XML documents.
//!
//! The tree side is a [`serde_json::Value`]: objects map to elements, arrays
//! to repeated sibling elements, and three reserved keys (configurable via
//! [`Config`]) carry the XML constructs a plain mapping cannot express:
//!
//! - `@attributes` - the element's attribute map
//! - `@value` - text content of an element that also has attributes
//! - `@cdata` - CDATA content
//!
//! Conversion is a pure, synchronous tree transformation in both directions;
//! there is no schema validation, streaming mode or I/O beyond parsing the
//! input string.
//!
//! # Example
//!
//! ```
//! use array2xml::{Config, XmlDeserializer, XmlSerializer};
//! use serde_json::json;
//!
//! let data = json!({
//!     "note": {
//!         "@attributes": { "lang": "en" },
//!         "to": "Tove",
//!         "body": "Remember me",
//!     }
//! });
//!
//! let xml = XmlSerializer::new(Config::default()).serialize(&data)?;
//! let tree = XmlDeserializer::new(Config::default()).deserialize(&xml)?;
//!
//! assert_eq!(tree, data);
//! # Ok::<(), array2xml::Error>(())
//! ```

mod config;
mod error;
mod from_xml;
mod name;
mod to_xml;

pub use config::Config;
pub use error::{Error, Result};
pub use from_xml::XmlDeserializer;
pub use name::is_valid_name;
pub use to_xml::XmlSerializer;

use serde_json::Value;

/// One-shot conversion from a node tree to XML text.
///
/// Equivalent to `XmlSerializer::new(config).serialize(data)`. Use
/// [`XmlSerializer`] directly to reuse a configuration across calls or to
/// pass the root name positionally.
pub fn to_xml(data: &Value, config: Config) -> Result<String> {
    XmlSerializer::new(config).serialize(data)
}

/// One-shot conversion from XML text to a node tree.
///
/// Equivalent to `XmlDeserializer::new(config).deserialize(xml)`.
pub fn from_xml(xml: &str, config: Config) -> Result<Value> {
    XmlDeserializer::new(config).deserialize(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn round_trip(data: Value) -> Value {
        let xml = to_xml(&data, Config::default()).unwrap();
        from_xml(&xml, Config::default()).unwrap()
    }

    #[test]
    fn test_round_trip_nested_elements() {
        let data = json!({
            "library": {
                "name": "Central",
                "address": { "city": "Oslo", "zip": "0150" },
            }
        });
        assert_eq!(round_trip(data.clone()), data);
    }

    #[test]
    fn test_round_trip_repeated_siblings() {
        let data = json!({ "r": { "item": ["a", "b", "c"] } });
        assert_eq!(round_trip(data.clone()), data);
    }

    #[test]
    fn test_round_trip_attributes_and_value() {
        let data = json!({
            "r": { "@value": "text", "@attributes": { "a": "1" } }
        });
        assert_eq!(round_trip(data.clone()), data);
    }

    #[test]
    fn test_round_trip_cdata() {
        let data = json!({ "r": { "@cdata": "<raw>" } });
        assert_eq!(round_trip(data.clone()), data);
    }

    #[test]
    fn test_round_trip_renders_booleans_as_strings() {
        let result = round_trip(json!({ "r": { "flag": true, "other": false } }));
        assert_eq!(result, json!({ "r": { "flag": "true", "other": "false" } }));
    }

    #[test]
    fn test_round_trip_collapses_single_entry_lists() {
        // A one-entry list serializes as a single element, which reads back
        // as a scalar; that is the documented asymmetry.
        let result = round_trip(json!({ "r": { "item": ["only"] } }));
        assert_eq!(result, json!({ "r": { "item": "only" } }));
    }

    #[test]
    fn test_round_trip_special_characters() {
        let data = json!({ "r": { "text": "a < b & \"c\"" } });
        assert_eq!(round_trip(data.clone()), data);
    }

    #[test]
    fn test_round_trip_with_custom_keys() {
        let config = Config::from_value(json!({
            "attributesKey": "#attr",
            "valueKey": "#text",
        }))
        .unwrap();
        let data = json!({
            "r": { "#text": "body", "#attr": { "id": "7" } }
        });

        let xml = to_xml(&data, config.clone()).unwrap();
        assert_eq!(from_xml(&xml, config).unwrap(), data);
    }

    #[test]
    fn test_xml_round_trip_keeps_namespace_declarations() {
        let xml = r#"<root xmlns:ns="urn:x"><ns:a>1</ns:a></root>"#;

        let tree = from_xml(xml, Config::default()).unwrap();
        assert_eq!(
            tree,
            json!({
                "root": {
                    "ns:a": "1",
                    "@attributes": { "xmlns:ns": "urn:x" },
                }
            })
        );

        // Re-serializing keeps the prefix bound.
        let out = to_xml(&tree, Config::default()).unwrap();
        assert!(out.contains(r#"<root xmlns:ns="urn:x">"#));
        assert!(out.contains("<ns:a>1</ns:a>"));
    }

    #[test]
    fn test_one_shot_entry_points() {
        let xml = to_xml(&json!({ "r": "x" }), Config::default()).unwrap();
        assert!(xml.ends_with("<r>x</r>"));
        assert_eq!(
            from_xml("<r>x</r>", Config::default()).unwrap(),
            json!({ "r": "x" })
        );
    }
}

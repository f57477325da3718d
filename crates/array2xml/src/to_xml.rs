//! Serialize node trees into XML documents.

use std::io::Write;

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde_json::Value;

use crate::name::is_valid_name;
use crate::{Config, Error, Result};

/// Serializer from node trees to XML text.
///
/// The input is a [`serde_json::Value`]: objects become elements, the
/// reserved keys carry attributes, text and CDATA content, and arrays
/// become repeated sibling elements sharing the parent key's tag name.
///
/// # Example
///
/// ```
/// use array2xml::{Config, XmlSerializer};
/// use serde_json::json;
///
/// let serializer = XmlSerializer::new(Config::default());
/// let xml = serializer.serialize(&json!({
///     "note": { "to": "Tove" }
/// })).unwrap();
///
/// assert!(xml.contains("<to>Tove</to>"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct XmlSerializer {
    config: Config,
}

impl XmlSerializer {
    /// Create a serializer with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// The resolved configuration this serializer runs with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Serialize a node tree to an XML string.
    ///
    /// The root element name comes from [`Config::root_node_name`]. When it
    /// is unset and `data` is a mapping with exactly one key, that key
    /// becomes the root name and its value the payload; otherwise an empty
    /// root name is used literally.
    pub fn serialize(&self, data: &Value) -> Result<String> {
        self.serialize_inner(self.config.root_node_name.as_deref(), data)
    }

    /// Serialize with an explicitly named root element.
    ///
    /// Positional form kept for callers that pass the root name alongside
    /// the data; it takes precedence over [`Config::root_node_name`].
    pub fn serialize_with_root(&self, root: &str, data: &Value) -> Result<String> {
        self.serialize_inner(Some(root), data)
    }

    /// Write the XML document to a writer instead of collecting a string.
    pub fn write_to<W: Write>(&self, writer: W, data: &Value) -> Result<()> {
        self.write_document(writer, self.config.root_node_name.as_deref(), data)
    }

    fn serialize_inner(&self, root: Option<&str>, data: &Value) -> Result<String> {
        let mut output = Vec::new();
        self.write_document(&mut output, root, data)?;
        String::from_utf8(output).map_err(|e| Error::Write(e.to_string()))
    }

    fn write_document<W: Write>(&self, writer: W, root: Option<&str>, data: &Value) -> Result<()> {
        let mut xml_writer = Writer::new_with_indent(writer, b' ', 2);

        xml_writer
            .write_event(Event::Decl(BytesDecl::new(
                &self.config.version,
                Some(&self.config.encoding),
                None,
            )))
            .map_err(|e| Error::Write(e.to_string()))?;

        let (root_name, payload) = self.resolve_root(root, data);
        // A list payload would emit one element per entry, and a document
        // has exactly one root element.
        if payload.is_array() {
            return Err(Error::Write(format!(
                "document root `{}` cannot be a list of elements",
                root_name
            )));
        }
        self.write_element(&mut xml_writer, root_name, payload)
    }

    /// Pick the root element name and its payload.
    fn resolve_root<'a>(&self, root: Option<&'a str>, data: &'a Value) -> (&'a str, &'a Value) {
        if let Some(name) = root {
            return (name, data);
        }
        // Root-unwrapping: a single-key top-level mapping already carries
        // its own root name.
        if let Value::Object(map) = data {
            if map.len() == 1 {
                if let Some((key, value)) = map.iter().next() {
                    return (key, value);
                }
            }
        }
        ("", data)
    }

    /// Write one element named `name` from `value`, recursing into children.
    fn write_element<W: Write>(
        &self,
        writer: &mut Writer<W>,
        name: &str,
        value: &Value,
    ) -> Result<()> {
        // A list is the repeated-sibling form: one element per entry, all
        // sharing this tag name, in list order.
        if let Value::Array(items) = value {
            for item in items {
                self.write_element(writer, name, item)?;
            }
            return Ok(());
        }

        let mut elem = BytesStart::new(name);

        let map = match value {
            Value::Object(map) => map,
            scalar => {
                let text = scalar_text(scalar);
                return write_text_element(writer, elem, name, &text);
            }
        };

        if let Some(Value::Object(attrs)) = map.get(&self.config.attributes_key) {
            for (key, attr_value) in attrs {
                if !is_valid_name(key) {
                    return Err(Error::IllegalAttributeName {
                        name: key.clone(),
                        element: name.to_string(),
                    });
                }
                elem.push_attribute((key.as_str(), scalar_text(attr_value).as_str()));
            }
        }

        // Explicit value or CDATA content makes the node terminal; any
        // remaining keys are discarded.
        if let Some(content) = map.get(&self.config.value_key) {
            let text = scalar_text(content);
            return write_text_element(writer, elem, name, &text);
        }
        if let Some(content) = map.get(&self.config.cdata_key) {
            writer
                .write_event(Event::Start(elem))
                .map_err(|e| Error::Write(e.to_string()))?;
            writer
                .write_event(Event::CData(BytesCData::new(scalar_text(content))))
                .map_err(|e| Error::Write(e.to_string()))?;
            writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(|e| Error::Write(e.to_string()))?;
            return Ok(());
        }

        let children: Vec<(&String, &Value)> = map
            .iter()
            .filter(|(key, _)| key.as_str() != self.config.attributes_key)
            .collect();

        if children.is_empty() {
            return writer
                .write_event(Event::Empty(elem))
                .map_err(|e| Error::Write(e.to_string()));
        }

        writer
            .write_event(Event::Start(elem))
            .map_err(|e| Error::Write(e.to_string()))?;

        for (key, child) in children {
            if !is_valid_name(key) {
                return Err(Error::IllegalTagName {
                    name: key.clone(),
                    parent: name.to_string(),
                });
            }
            self.write_element(writer, key, child)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(|e| Error::Write(e.to_string()))
    }
}

/// Text form of a scalar: booleans as `true`/`false`, null as the empty
/// string, everything else in its display form.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    elem: BytesStart,
    name: &str,
    text: &str,
) -> Result<()> {
    if text.is_empty() {
        return writer
            .write_event(Event::Empty(elem))
            .map_err(|e| Error::Write(e.to_string()));
    }
    writer
        .write_event(Event::Start(elem))
        .map_err(|e| Error::Write(e.to_string()))?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(|e| Error::Write(e.to_string()))?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(|e| Error::Write(e.to_string()))
}

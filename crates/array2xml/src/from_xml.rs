//! Deserialize XML documents into node trees.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{QName, ResolveResult};
use quick_xml::reader::NsReader;
use serde_json::{Map, Value};

use crate::{Config, Error, Result};

/// Deserializer from XML text to node trees.
///
/// The result is keyed by the document's root element name. Single-occurrence
/// children collapse to their value, repeated children become lists, leaf
/// text moves under the value key whenever attributes are present, and CDATA
/// sections surface under the CDATA key.
///
/// # Example
///
/// ```
/// use array2xml::{Config, XmlDeserializer};
/// use serde_json::json;
///
/// let deserializer = XmlDeserializer::new(Config::default());
/// let tree = deserializer.deserialize("<r><c>x</c><c>y</c></r>").unwrap();
///
/// assert_eq!(tree, json!({ "r": { "c": ["x", "y"] } }));
/// ```
#[derive(Debug, Clone, Default)]
pub struct XmlDeserializer {
    config: Config,
}

/// An open element while walking the event stream.
struct Frame {
    name: String,
    attributes: Vec<(String, String)>,
    slot: Slot,
}

/// The single output slot of an element under construction.
///
/// Element children accumulate list-first under their tag names; text and
/// CDATA children replace the slot wholesale, with empty text ignored so
/// whitespace between child elements cannot clobber accumulated data.
enum Slot {
    Empty,
    Scalar(Value),
    Children(Map<String, Value>),
}

impl XmlDeserializer {
    /// Create a deserializer with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// The resolved configuration this deserializer runs with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse XML text and convert it into a node tree.
    pub fn deserialize(&self, xml: &str) -> Result<Value> {
        let mut reader = NsReader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Frame> = Vec::new();
        let mut root: Option<(String, Value)> = None;
        // URI -> prefix, first-seen prefix wins. One accumulator per pass.
        let mut namespaces: Vec<(String, String)> = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    if root.is_some() && stack.is_empty() {
                        return Err(Error::Parse("content after document root".to_string()));
                    }
                    let frame = self.open_frame(&reader, &e, &mut namespaces)?;
                    stack.push(frame);
                }
                Ok(Event::Empty(e)) => {
                    if root.is_some() && stack.is_empty() {
                        return Err(Error::Parse("content after document root".to_string()));
                    }
                    let frame = self.open_frame(&reader, &e, &mut namespaces)?;
                    self.close_frame(frame, &mut stack, &mut root);
                }
                Ok(Event::End(_)) => {
                    if let Some(frame) = stack.pop() {
                        self.close_frame(frame, &mut stack, &mut root);
                    }
                }
                Ok(Event::Text(e)) => {
                    let text = e.unescape().map_err(|e| Error::Parse(e.to_string()))?;
                    let text = text.trim();
                    if !text.is_empty() {
                        if let Some(frame) = stack.last_mut() {
                            frame.slot = Slot::Scalar(Value::String(text.to_string()));
                        } else if root.is_some() {
                            return Err(Error::Parse("content after document root".to_string()));
                        }
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(frame) = stack.last_mut() {
                        let text = String::from_utf8_lossy(&e);
                        let mut content = Map::new();
                        content.insert(
                            self.config.cdata_key.clone(),
                            Value::String(text.trim().to_string()),
                        );
                        frame.slot = Slot::Scalar(Value::Object(content));
                    } else if root.is_some() {
                        return Err(Error::Parse("content after document root".to_string()));
                    }
                }
                Ok(Event::Eof) => break,
                // Declarations, comments, PIs and doctypes carry no data.
                Ok(_) => {}
                Err(e) => return Err(Error::Parse(e.to_string())),
            }
        }

        if !stack.is_empty() {
            return Err(Error::Parse("unexpected end of document".to_string()));
        }

        let (root_name, mut root_value) =
            root.ok_or_else(|| Error::Parse("no root element found in XML".to_string()))?;

        if self.config.use_namespaces && !namespaces.is_empty() {
            self.merge_namespaces(&mut root_value, &namespaces);
        }

        let mut result = Map::new();
        result.insert(root_name, root_value);
        Ok(Value::Object(result))
    }

    /// Read an element's tag name and attributes into a fresh frame,
    /// collating namespaces along the way when enabled.
    fn open_frame(
        &self,
        reader: &NsReader<&[u8]>,
        e: &BytesStart,
        namespaces: &mut Vec<(String, String)>,
    ) -> Result<Frame> {
        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();

        if self.config.use_namespaces {
            let (ns, _) = reader.resolve_element(e.name());
            collate_namespace(&ns, prefix_of(e.name()), namespaces);
        }

        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|e| Error::Parse(e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();

            // Declarations stay in the attribute map like any other
            // attribute; they are only exempt from namespace collation.
            let is_declaration = key == "xmlns" || key.starts_with("xmlns:");
            if self.config.use_namespaces && !is_declaration {
                let (ns, _) = reader.resolve_attribute(attr.key);
                collate_namespace(&ns, prefix_of(attr.key), namespaces);
            }

            let value = attr
                .unescape_value()
                .map_err(|e| Error::Parse(e.to_string()))?;
            attributes.push((key, value.into_owned()));
        }

        Ok(Frame {
            name,
            attributes,
            slot: Slot::Empty,
        })
    }

    /// Finish an element: collapse its slot into a value, fold attributes
    /// in, and hand it to the parent frame (or make it the root).
    fn close_frame(
        &self,
        frame: Frame,
        stack: &mut Vec<Frame>,
        root: &mut Option<(String, Value)>,
    ) {
        let Frame {
            name,
            attributes,
            slot,
        } = frame;

        let mut value = match slot {
            Slot::Empty => Value::String(String::new()),
            Slot::Scalar(v) => v,
            Slot::Children(children) => {
                let mut out = Map::new();
                for (tag, entry) in children {
                    match entry {
                        // Un-list single occurrences.
                        Value::Array(mut items) if items.len() == 1 => {
                            out.insert(tag, items.remove(0));
                        }
                        other => {
                            out.insert(tag, other);
                        }
                    }
                }
                Value::Object(out)
            }
        };

        if !attributes.is_empty() {
            if !value.is_object() {
                let mut wrapped = Map::new();
                wrapped.insert(self.config.value_key.clone(), value);
                value = Value::Object(wrapped);
            }
            let mut attrs = Map::new();
            for (key, attr_value) in attributes {
                attrs.insert(key, Value::String(attr_value));
            }
            if let Value::Object(map) = &mut value {
                map.insert(self.config.attributes_key.clone(), Value::Object(attrs));
            }
        }

        match stack.last_mut() {
            Some(parent) => attach_child(parent, name, value),
            None => *root = Some((name, value)),
        }
    }

    /// Flush collected namespaces into the root value's attribute map as
    /// synthesized `xmlns` / `xmlns:<prefix>` entries, never overwriting
    /// attributes the document itself carried.
    fn merge_namespaces(&self, root_value: &mut Value, namespaces: &[(String, String)]) {
        if !root_value.is_object() {
            let mut wrapped = Map::new();
            wrapped.insert(self.config.value_key.clone(), root_value.take());
            *root_value = Value::Object(wrapped);
        }

        if let Value::Object(map) = root_value {
            let attrs = map
                .entry(self.config.attributes_key.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(attrs) = attrs {
                for (uri, prefix) in namespaces {
                    let key = if prefix.is_empty() {
                        "xmlns".to_string()
                    } else {
                        format!("xmlns:{}", prefix)
                    };
                    if !attrs.contains_key(&key) {
                        attrs.insert(key, Value::String(uri.clone()));
                    }
                }
            }
        }
    }
}

/// Append a finished child element to its parent's slot. Element children
/// always accumulate into lists first, regardless of eventual cardinality.
fn attach_child(parent: &mut Frame, tag: String, value: Value) {
    if !matches!(parent.slot, Slot::Children(_)) {
        parent.slot = Slot::Children(Map::new());
    }
    if let Slot::Children(children) = &mut parent.slot {
        match children.get_mut(&tag) {
            Some(Value::Array(items)) => items.push(value),
            _ => {
                children.insert(tag, Value::Array(vec![value]));
            }
        }
    }
}

/// Record a bound namespace URI with its first-seen prefix.
fn collate_namespace(ns: &ResolveResult, prefix: String, namespaces: &mut Vec<(String, String)>) {
    if let ResolveResult::Bound(uri) = ns {
        let uri = String::from_utf8_lossy(uri.into_inner()).into_owned();
        if !namespaces.iter().any(|(seen, _)| *seen == uri) {
            namespaces.push((uri, prefix));
        }
    }
}

fn prefix_of(name: QName) -> String {
    name.prefix()
        .map(|p| String::from_utf8_lossy(p.into_inner()).into_owned())
        .unwrap_or_default()
}

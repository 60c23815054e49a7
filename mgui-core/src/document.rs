//! Document model
//!
//! A document is a JSON object mapping node names to node descriptors:
//!
//! ```text
//! {
//!   "ROOT":     { "type": { "resolvedName": "CanvasArea" },
//!                 "props": { "width": 480, "height": 320, "background": {..} }, .. },
//!   "Switch_1": { "type": { "resolvedName": "Switch" },
//!                 "props": { "state": true, "pageX": 10, "pageY": 10, "color": {..} }, .. }
//! }
//! ```
//!
//! Node order is creation (and z) order, so the top level is kept as an
//! ordered list rather than a map. Node descriptors are kept as opaque JSON
//! values; fields the engine does not read survive a round trip.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use mgui_display::Color;
use mgui_protocol::MAX_DOCUMENT_SIZE;

use crate::error::DocumentError;
use crate::record::WidgetKind;

/// Key of the canvas node
pub const ROOT_KEY: &str = "ROOT";

/// Type name of the canvas node
pub const CANVAS_TYPE: &str = "CanvasArea";

/// Screen size declared by the canvas node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dimensions {
    pub width: u16,
    pub height: u16,
}

/// Parsed document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    nodes: Vec<(String, Value)>,
    dimensions: Dimensions,
}

impl Document {
    /// Parse document text
    ///
    /// A name that appears twice keeps the position of its first occurrence
    /// and the descriptor of its last.
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        if text.len() > MAX_DOCUMENT_SIZE {
            return Err(DocumentError::TooLarge);
        }

        let NodeList(nodes) = serde_json::from_str(text)?;
        let dimensions = root_dimensions(&nodes)?;
        Ok(Self { nodes, dimensions })
    }

    /// Canvas size from `ROOT.props`
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Number of nodes, canvas included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in document order
    pub fn nodes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.nodes.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Look up a node by name
    pub fn node(&self, name: &str) -> Option<&Value> {
        self.nodes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, node)| node)
    }

    /// One property of a node
    pub fn prop(&self, name: &str, prop: &str) -> Option<&Value> {
        self.node(name)?.get("props")?.get(prop)
    }

    /// Whether `ROOT.props.persistant` asks for the document to be stored
    pub fn is_persistent(&self) -> bool {
        self.prop(ROOT_KEY, "persistant").is_some_and(truthy)
    }

    /// Overwrite one property of an existing node
    ///
    /// Returns `false` when the node or its `props` object does not exist.
    /// Never adds or removes nodes.
    pub fn set_prop(&mut self, name: &str, prop: &str, value: Value) -> bool {
        let props = self
            .nodes
            .iter_mut()
            .find(|(key, _)| key == name)
            .and_then(|(_, node)| node.get_mut("props"))
            .and_then(Value::as_object_mut);

        match props {
            Some(props) => {
                props.insert(String::from(prop), value);
                true
            }
            None => false,
        }
    }

    /// Serialize back to compact JSON text
    pub fn to_text(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.nodes.len()))?;
        for (name, node) in &self.nodes {
            map.serialize_entry(name, node)?;
        }
        map.end()
    }
}

/// Top-level object as an ordered entry list
struct NodeList(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for NodeList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(NodeListVisitor)
    }
}

struct NodeListVisitor;

impl<'de> Visitor<'de> for NodeListVisitor {
    type Value = NodeList;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object of named nodes")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut nodes: Vec<(String, Value)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, node)) = access.next_entry::<String, Value>()? {
            match nodes.iter_mut().find(|(key, _)| *key == name) {
                Some(existing) => existing.1 = node,
                None => nodes.push((name, node)),
            }
        }
        Ok(NodeList(nodes))
    }
}

fn root_dimensions(nodes: &[(String, Value)]) -> Result<Dimensions, DocumentError> {
    let props = nodes
        .iter()
        .find(|(key, _)| key == ROOT_KEY)
        .and_then(|(_, root)| root.get("props"))
        .and_then(Value::as_object)
        .ok_or(DocumentError::MissingRoot)?;

    let side = |prop: &str| {
        props
            .get(prop)
            .and_then(Value::as_u64)
            .and_then(|v| u16::try_from(v).ok())
            .ok_or(DocumentError::MissingDimensions)
    };

    Ok(Dimensions {
        width: side("width")?,
        height: side("height")?,
    })
}

/// What a node renders as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NodeKind {
    /// Screen background and size
    Canvas,
    Widget(WidgetKind),
}

impl NodeKind {
    pub fn from_type_name(name: &str) -> Option<Self> {
        if name == CANVAS_TYPE {
            Some(NodeKind::Canvas)
        } else {
            WidgetKind::from_type_name(name).map(NodeKind::Widget)
        }
    }
}

/// Typed read access to one node
///
/// Property reads are lenient: a missing or mistyped property reads as
/// zero, false, empty text or black.
#[derive(Debug, Clone, Copy)]
pub struct NodeView<'a> {
    name: &'a str,
    type_name: &'a str,
    props: &'a Map<String, Value>,
}

impl<'a> NodeView<'a> {
    /// View a node that has `type.resolvedName` and a `props` object
    pub fn new(name: &'a str, node: &'a Value) -> Option<Self> {
        let type_name = node.get("type")?.get("resolvedName")?.as_str()?;
        let props = node.get("props")?.as_object()?;
        Some(Self {
            name,
            type_name,
            props,
        })
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    /// `type.resolvedName` as written
    pub fn type_name(&self) -> &'a str {
        self.type_name
    }

    pub fn kind(&self) -> Option<NodeKind> {
        NodeKind::from_type_name(self.type_name)
    }

    /// Integer property, 0 when absent
    pub fn int(&self, prop: &str) -> i32 {
        self.int_or(prop, 0)
    }

    /// Integer property with a default for when it is absent
    pub fn int_or(&self, prop: &str, default: i32) -> i32 {
        self.props.get(prop).and_then(as_int).unwrap_or(default)
    }

    /// Boolean property; nonzero numbers count as true
    pub fn flag(&self, prop: &str) -> bool {
        self.props.get(prop).is_some_and(truthy)
    }

    /// Text property, empty when absent
    pub fn text(&self, prop: &str) -> &'a str {
        self.props.get(prop).and_then(Value::as_str).unwrap_or("")
    }

    /// Element of a text array property, empty when absent
    pub fn text_at(&self, prop: &str, index: usize) -> &'a str {
        self.props
            .get(prop)
            .and_then(|list| list.get(index))
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    /// `{r, g, b}` color property, black when absent
    pub fn color(&self, prop: &str) -> Color {
        let Some(color) = self.props.get(prop) else {
            return Color::BLACK;
        };
        let channel = |name: &str| {
            color
                .get(name)
                .and_then(as_int)
                .map_or(0, |v| v.clamp(0, 255) as u8)
        };
        Color::new(channel("r"), channel("g"), channel("b"))
    }

    /// `(pageX, pageY)`
    pub fn position(&self) -> (i32, i32) {
        (self.int("pageX"), self.int("pageY"))
    }
}

fn as_int(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(|v| v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
            // Float to int casts saturate
            .or_else(|| n.as_f64().map(|v| v as i32)),
        Value::Bool(b) => Some(i32::from(*b)),
        _ => None,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        other => as_int(other).is_some_and(|v| v != 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SCENARIO: &str = r#"{"ROOT":{"type":{"resolvedName":"CanvasArea"},"props":{"width":480,"height":320,"background":{"r":0,"g":0,"b":0}}},"Switch_1":{"type":{"resolvedName":"Switch"},"props":{"state":true,"pageX":10,"pageY":10,"color":{"r":1,"g":2,"b":3}}}}"#;

    #[test]
    fn test_parse_dimensions() {
        let doc = Document::parse(SCENARIO).unwrap();
        assert_eq!(
            doc.dimensions(),
            Dimensions {
                width: 480,
                height: 320
            }
        );
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Document::parse("{"), Err(DocumentError::Syntax));
        assert_eq!(Document::parse(""), Err(DocumentError::Syntax));
        assert_eq!(Document::parse("[1, 2]"), Err(DocumentError::NotAnObject));
        assert_eq!(
            Document::parse(r#"{"Switch_1":{}}"#),
            Err(DocumentError::MissingRoot)
        );
        assert_eq!(
            Document::parse(r#"{"ROOT":{"type":{"resolvedName":"CanvasArea"}}}"#),
            Err(DocumentError::MissingRoot)
        );
        assert_eq!(
            Document::parse(r#"{"ROOT":{"props":{"width":480}}}"#),
            Err(DocumentError::MissingDimensions)
        );
        assert_eq!(
            Document::parse(r#"{"ROOT":{"props":{"width":70000,"height":10}}}"#),
            Err(DocumentError::MissingDimensions)
        );
    }

    #[test]
    fn test_parse_too_large() {
        let padding = "x".repeat(MAX_DOCUMENT_SIZE);
        let text = alloc::format!(
            r#"{{"ROOT":{{"props":{{"width":1,"height":1,"pad":"{}"}}}}}}"#,
            padding
        );
        assert_eq!(Document::parse(&text), Err(DocumentError::TooLarge));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let text = r#"{"ROOT":{"props":{"height":1,"width":1}},"zeta":{},"alpha":{},"mid":{}}"#;
        let doc = Document::parse(text).unwrap();
        let names: Vec<&str> = doc.nodes().map(|(name, _)| name).collect();
        assert_eq!(names, ["ROOT", "zeta", "alpha", "mid"]);

        // Restartable
        assert_eq!(doc.nodes().count(), 4);
        assert_eq!(doc.to_text().unwrap(), text);
    }

    #[test]
    fn test_duplicate_key_replaces_in_place() {
        let text = r#"{"ROOT":{"props":{"width":1,"height":1}},"a":{"v":1},"b":{},"a":{"v":2}}"#;
        let doc = Document::parse(text).unwrap();
        let names: Vec<&str> = doc.nodes().map(|(name, _)| name).collect();
        assert_eq!(names, ["ROOT", "a", "b"]);
        assert_eq!(doc.node("a"), Some(&json!({"v": 2})));
    }

    #[test]
    fn test_unknown_fields_survive() {
        let text = r#"{"ROOT":{"type":{"resolvedName":"CanvasArea"},"isCanvas":true,"props":{"width":1,"height":1},"linkedNodes":{}}}"#;
        let doc = Document::parse(text).unwrap();
        let reparsed = Document::parse(&doc.to_text().unwrap()).unwrap();
        assert_eq!(reparsed.node(ROOT_KEY).unwrap()["isCanvas"], json!(true));
        assert_eq!(reparsed.node(ROOT_KEY).unwrap()["linkedNodes"], json!({}));
    }

    #[test]
    fn test_set_prop() {
        let mut doc = Document::parse(SCENARIO).unwrap();
        assert!(doc.set_prop("Switch_1", "state", json!(0)));
        assert_eq!(doc.prop("Switch_1", "state"), Some(&json!(0)));
        assert!(!doc.set_prop("Missing", "state", json!(0)));
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_persistent_flag() {
        let doc = Document::parse(r#"{"ROOT":{"props":{"width":1,"height":1,"persistant":true}}}"#)
            .unwrap();
        assert!(doc.is_persistent());
        let doc = Document::parse(r#"{"ROOT":{"props":{"width":1,"height":1,"persistant":0}}}"#)
            .unwrap();
        assert!(!doc.is_persistent());
        assert!(!Document::parse(SCENARIO).unwrap().is_persistent());
    }

    #[test]
    fn test_node_view_props() {
        let node = json!({
            "type": {"resolvedName": "Slider"},
            "props": {
                "value": 42.7,
                "min": -10,
                "state": 1,
                "text": "hi",
                "labelTexts": ["a", 3],
                "color": {"r": 300, "g": -4, "b": 7},
                "pageX": 5,
            }
        });
        let view = NodeView::new("Slider_1", &node).unwrap();
        assert_eq!(view.kind(), Some(NodeKind::Widget(WidgetKind::Slider)));
        assert_eq!(view.int("value"), 42);
        assert_eq!(view.int("min"), -10);
        assert_eq!(view.int("missing"), 0);
        assert_eq!(view.int_or("max", 100), 100);
        assert!(view.flag("state"));
        assert!(!view.flag("missing"));
        assert_eq!(view.text("text"), "hi");
        assert_eq!(view.text("value"), "");
        assert_eq!(view.text_at("labelTexts", 0), "a");
        assert_eq!(view.text_at("labelTexts", 1), "");
        assert_eq!(view.text_at("labelTexts", 5), "");
        assert_eq!(view.color("color"), Color::new(255, 0, 7));
        assert_eq!(view.color("background"), Color::BLACK);
        assert_eq!(view.position(), (5, 0));
    }

    #[test]
    fn test_node_view_requires_type_and_props() {
        assert!(NodeView::new("a", &json!({"props": {}})).is_none());
        assert!(NodeView::new("a", &json!({"type": {"resolvedName": "Button"}})).is_none());
        assert!(NodeView::new("a", &json!({"type": {"resolvedName": 4}, "props": {}})).is_none());
        assert!(NodeView::new("a", &json!("Button")).is_none());
    }

    #[test]
    fn test_node_kind() {
        assert_eq!(NodeKind::from_type_name("CanvasArea"), Some(NodeKind::Canvas));
        assert_eq!(
            NodeKind::from_type_name("Radiobutton"),
            Some(NodeKind::Widget(WidgetKind::Radiobutton))
        );
        assert_eq!(NodeKind::from_type_name("Chart"), None);
    }
}

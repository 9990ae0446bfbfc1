//! HTML parsing (HTML → DOM)
//!
//! Thin helpers over `html5ever` + `markup5ever_rcdom`. Parsing never fails:
//! html5ever recovers from any input the way a browser does, so a stray
//! `</div>` or an unclosed `<b>` still yields a tree.

use crate::error::ConvertError;
use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

/// Parse an HTML document or fragment into a DOM tree.
pub fn parse_html(html: &str) -> RcDom {
    parse_document(RcDom::default(), ParseOpts::default()).one(html)
}

/// The `<body>` element html5ever always synthesizes
pub fn body(dom: &RcDom) -> Option<Handle> {
    find_first_element(&dom.document, "body")
}

pub fn find_first_element(handle: &Handle, name: &str) -> Option<Handle> {
    if element_name(handle).as_deref() == Some(name) {
        return Some(handle.clone());
    }
    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_first_element(child, name))
}

/// Lowercase local name of an element node
pub fn element_name(handle: &Handle) -> Option<String> {
    match handle.data {
        NodeData::Element { ref name, .. } => Some(name.local.as_ref().to_ascii_lowercase()),
        _ => None,
    }
}

pub fn attr(handle: &Handle, attr_name: &str) -> Option<String> {
    match handle.data {
        NodeData::Element { ref attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| attr.name.local.as_ref().eq_ignore_ascii_case(attr_name))
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

pub fn has_attr(handle: &Handle, attr_name: &str) -> bool {
    attr(handle, attr_name).is_some()
}

pub fn classes(handle: &Handle) -> Vec<String> {
    attr(handle, "class")
        .map(|value| value.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

pub fn has_class(handle: &Handle, class: &str) -> bool {
    classes(handle).iter().any(|c| c == class)
}

/// Concatenated text of all descendant text nodes
pub fn text_content(handle: &Handle) -> String {
    let mut text = String::new();
    collect_text(handle, &mut text);
    text
}

fn collect_text(handle: &Handle, text: &mut String) {
    match handle.data {
        NodeData::Text { ref contents } => text.push_str(&contents.borrow()),
        NodeData::Element { .. } | NodeData::Document => {
            for child in handle.children.borrow().iter() {
                collect_text(child, text);
            }
        }
        _ => {}
    }
}

pub fn element_children(handle: &Handle) -> Vec<Handle> {
    handle
        .children
        .borrow()
        .iter()
        .filter(|child| matches!(child.data, NodeData::Element { .. }))
        .cloned()
        .collect()
}

/// Serialize a node, including its own tag, back to HTML.
pub fn outer_html(handle: &Handle) -> Result<String, ConvertError> {
    let mut bytes = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };
    serialize(&mut bytes, &SerializableHandle::from(handle.clone()), opts)
        .map_err(|e| ConvertError::Serialize(format!("HTML serialization failed: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| ConvertError::Serialize(format!("UTF-8 conversion failed: {e}")))
}

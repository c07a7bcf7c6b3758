//! Node types stored in the document arena.

use serde::Serialize;

/// Handle to a node inside a [`crate::Document`].
///
/// Handles stay valid for the lifetime of the document: removing a node only
/// detaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Document,
    /// Detached container produced by range extraction and fragment parsing.
    Fragment,
    Doctype(String),
    Element(ElementData),
    Text(String),
    Comment(String),
}

impl NodeKind {
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Document | Self::Fragment | Self::Element(_))
    }

    /// Text and comments carry character data addressed by character offset.
    pub fn is_character_data(&self) -> bool {
        matches!(self, Self::Text(_) | Self::Comment(_))
    }
}

/// Element name and attributes. Attribute order is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
}

impl ElementData {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attrs: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|(k, _)| k == name)?;
        Some(self.attrs.remove(pos).1)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|c| c.split_ascii_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl NodeData {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_tag_is_lowercased() {
        assert_eq!(ElementData::new("SPAN").tag, "span");
    }

    #[test]
    fn test_set_attr_replaces_in_place() {
        let mut el = ElementData::new("a");
        el.set_attr("href", "/one");
        el.set_attr("id", "x");
        el.set_attr("href", "/two");
        assert_eq!(el.attrs, vec![
            ("href".to_string(), "/two".to_string()),
            ("id".to_string(), "x".to_string()),
        ]);
    }

    #[test]
    fn test_has_class_matches_whole_tokens() {
        let mut el = ElementData::new("span");
        el.set_attr("class", "clarify-highlight  other");
        assert!(el.has_class("clarify-highlight"));
        assert!(el.has_class("other"));
        assert!(!el.has_class("clarify"));
    }

    #[test]
    fn test_remove_attr() {
        let mut el = ElementData::new("span");
        el.set_attr("data-x", "1");
        assert_eq!(el.remove_attr("data-x"), Some("1".to_string()));
        assert_eq!(el.remove_attr("data-x"), None);
    }
}

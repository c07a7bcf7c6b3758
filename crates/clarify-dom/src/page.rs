//! Page context extraction for question answering.

use crate::document::Document;
use crate::node::{NodeId, NodeKind};

/// Elements whose text is never rendered.
const HIDDEN_ELEMENTS: &[&str] = &["head", "script", "style", "noscript", "template"];

/// Elements that start a new line when rendered.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main",
    "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

impl Document {
    /// Rendered text of the page body with whitespace collapsed.
    pub fn visible_text(&self) -> String {
        let mut raw = String::new();
        self.collect_visible(self.body(), &mut raw);
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn collect_visible(&self, id: NodeId, out: &mut String) {
        for child in self.children(id) {
            match self.kind(*child) {
                NodeKind::Text(t) => out.push_str(t),
                NodeKind::Element(el) => {
                    if HIDDEN_ELEMENTS.contains(&el.tag.as_str()) {
                        continue;
                    }
                    let block = BLOCK_ELEMENTS.contains(&el.tag.as_str());
                    if block {
                        out.push(' ');
                    }
                    self.collect_visible(*child, out);
                    if block {
                        out.push(' ');
                    }
                }
                _ => {}
            }
        }
    }
}

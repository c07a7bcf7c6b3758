//! Bionic reading: the leading half of every word is emphasized so the eye
//! can anchor on it.
//!
//! [`bionic_inlines`] is a pure function from text to inline runs.
//! [`apply_bionic`] runs it over every text node of a range and splices the
//! result back in a single insertion.

use crate::document::Document;
use crate::error::DomError;
use crate::node::NodeKind;
use crate::range::Range;

/// Class carried by emphasis elements.
pub const BIONIC_CLASS: &str = "clarify-bionic-strong";

/// An inline run produced by the transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Strong(String),
    Plain(String),
}

impl Inline {
    pub fn text(&self) -> &str {
        match self {
            Inline::Strong(t) | Inline::Plain(t) => t,
        }
    }
}

/// Split `text` on single spaces and emphasize the first `ceil(n / 2)`
/// characters of each word. Separators are kept, so concatenating the runs
/// gives back `text`.
pub fn bionic_inlines(text: &str) -> Vec<Inline> {
    let words: Vec<&str> = text.split(' ').collect();
    let last = words.len().saturating_sub(1);
    let mut out: Vec<Inline> = Vec::new();

    for (i, word) in words.iter().enumerate() {
        let separator = if i < last { " " } else { "" };
        if word.trim().is_empty() {
            push_plain(&mut out, &format!("{word}{separator}"));
            continue;
        }
        let split = word.chars().count().div_ceil(2);
        let byte = word
            .char_indices()
            .nth(split)
            .map(|(b, _)| b)
            .unwrap_or(word.len());
        let (strong, rest) = word.split_at(byte);
        out.push(Inline::Strong(strong.to_string()));
        push_plain(&mut out, &format!("{rest}{separator}"));
    }
    out
}

fn push_plain(out: &mut Vec<Inline>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Inline::Plain(prev)) = out.last_mut() {
        prev.push_str(text);
    } else {
        out.push(Inline::Plain(text.to_string()));
    }
}

/// Rewrite the text inside `range` in place. The range collapses to the
/// start of the inserted content.
pub fn apply_bionic(doc: &mut Document, range: &Range) -> Result<(), DomError> {
    doc.check_range(range)?;
    let mut range = *range;
    let fragment = doc.extract_contents(&mut range)?;

    let texts: Vec<_> = doc
        .descendants(fragment)
        .into_iter()
        .filter(|n| matches!(doc.kind(*n), NodeKind::Text(_)))
        .collect();

    for node in texts {
        let Some(parent) = doc.parent(node) else {
            continue;
        };
        let text = doc.char_data(node).unwrap_or_default().to_string();
        for inline in bionic_inlines(&text) {
            let new = match inline {
                Inline::Strong(t) => {
                    let b = doc.create_element("b");
                    if let Some(el) = doc.element_mut(b) {
                        el.set_attr("class", BIONIC_CLASS);
                    }
                    let inner = doc.create_text(t);
                    doc.append_child(b, inner)?;
                    b
                }
                Inline::Plain(t) => doc.create_text(t),
            };
            doc.insert_before(parent, new, Some(node))?;
        }
        doc.remove(node);
    }

    doc.insert_node(&range, fragment)?;
    Ok(())
}

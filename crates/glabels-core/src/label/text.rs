//! Text with merge-field references.
//!
//! A text line is a sequence of nodes; each node is either literal text or
//! a merge field key. The editable text form writes a field as `${KEY}`.

use serde::{Deserialize, Serialize};

/// One run of a text line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextNode {
    /// True when `data` is a merge field key rather than literal text.
    pub field_flag: bool,
    pub data: String,
}

impl TextNode {
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            field_flag: false,
            data: text.into(),
        }
    }

    pub fn field(key: impl Into<String>) -> Self {
        Self {
            field_flag: true,
            data: key.into(),
        }
    }

    /// The editable text form of this node.
    pub fn to_text(&self) -> String {
        if self.field_flag {
            format!("${{{}}}", self.data)
        } else {
            self.data.clone()
        }
    }
}

pub type TextLine = Vec<TextNode>;

/// Parse editable text into lines of nodes.
///
/// `${` without a closing `}` on the same line is kept as literal text.
pub fn lines_from_text(text: &str) -> Vec<TextLine> {
    text.split('\n').map(parse_line).collect()
}

fn parse_line(line: &str) -> TextLine {
    let mut nodes = Vec::new();
    let mut literal = String::new();
    let mut rest = line;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                literal.push_str(&rest[..start]);
                if !literal.is_empty() {
                    nodes.push(TextNode::literal(std::mem::take(&mut literal)));
                }
                nodes.push(TextNode::field(&after[..end]));
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    literal.push_str(rest);
    if !literal.is_empty() {
        nodes.push(TextNode::literal(literal));
    }
    nodes
}

/// Render lines back to editable text.
pub fn lines_to_text(lines: &[TextLine]) -> String {
    lines
        .iter()
        .map(|line| line.iter().map(TextNode::to_text).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Substitute merge values for field nodes. Unknown keys expand to nothing.
pub fn expand<'a, F>(lines: &[TextLine], lookup: F) -> String
where
    F: Fn(&str) -> Option<&'a str>,
{
    lines
        .iter()
        .map(|line| {
            line.iter()
                .map(|node| {
                    if node.field_flag {
                        lookup(&node.data).unwrap_or_default().to_string()
                    } else {
                        node.data.clone()
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

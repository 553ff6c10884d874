//! Introspection document vocabulary and parsing.

use std::borrow::Cow;

use roxmltree::{Document, Node};

pub const NODE: &str = "node";
pub const INTERFACE: &str = "interface";
pub const METHOD: &str = "method";
pub const SIGNAL: &str = "signal";
pub const PROPERTY: &str = "property";
pub const ARG: &str = "arg";
pub const ANNOTATION: &str = "annotation";

pub const NAME: &str = "name";
pub const TYPE: &str = "type";
pub const DIRECTION: &str = "direction";
pub const ACCESS: &str = "access";
pub const VALUE: &str = "value";

const DOCTYPE_OPEN: &str = "<!DOCTYPE";

/// Remove a `<!DOCTYPE ...>` declaration, which the parser rejects.
pub fn strip_doctype(document: &str) -> Cow<'_, str> {
    let Some(start) = document.find(DOCTYPE_OPEN) else {
        return Cow::Borrowed(document);
    };
    let Some(len) = document[start..].find('>') else {
        return Cow::Borrowed(document);
    };
    let mut stripped = String::with_capacity(document.len() - len);
    stripped.push_str(&document[..start]);
    stripped.push_str(&document[start + len + 1..]);
    Cow::Owned(stripped)
}

/// Parse a document whose DOCTYPE was already stripped.
pub fn parse(text: &str) -> Result<Document<'_>, roxmltree::Error> {
    Document::parse(text)
}

/// Element children of `node`, skipping text and comments.
pub fn elements<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(Node::is_element)
}

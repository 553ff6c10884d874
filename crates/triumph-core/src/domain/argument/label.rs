//! Human-readable labels for argument nodes.

use super::decode::decode_token;
use super::{Argument, ArgumentNode, Direction};
use crate::domain::signature::Signature;

impl Argument {
    /// Type part of the label, e.g. `unsigned int16` or `string[]`.
    #[must_use]
    pub fn type_label(&self) -> String {
        match &self.node {
            ArgumentNode::Scalar(scalar) if scalar.unsigned => {
                format!("unsigned {}", scalar.kind.type_name())
            }
            ArgumentNode::Scalar(scalar) => scalar.kind.type_name().to_string(),
            ArgumentNode::Array(array) => format!("{}[]", label_for(&array.element)),
            ArgumentNode::Struct(_) => "Struct".to_string(),
            ArgumentNode::Dictionary(dict) => format!(
                "{{ {} => {} }}",
                label_for(&dict.key),
                label_for(&dict.value)
            ),
            ArgumentNode::DictEntry(entry) => format!(
                "{} => {}",
                entry.key.type_label(),
                entry.value.type_label()
            ),
            ArgumentNode::Variant(_) => "Variant".to_string(),
            ArgumentNode::Null => "Null".to_string(),
        }
    }

    /// Full display label: type label followed by the name, if any.
    #[must_use]
    pub fn label(&self) -> String {
        let type_label = self.type_label();
        if self.name.is_empty() || self.is_null() {
            type_label
        } else {
            format!("{type_label} {}", self.name)
        }
    }
}

/// Label of the type a signature decodes to.
fn label_for(signature: &Signature) -> String {
    let lower = |label: String| {
        // Nested structs and variants read lower-case inside another label.
        match label.as_str() {
            "Struct" => "struct".to_string(),
            "Variant" => "variant".to_string(),
            _ => label,
        }
    };
    decode_token(signature.as_str(), String::new(), Direction::In)
        .map_or_else(|_| signature.to_string(), |arg| lower(arg.type_label()))
}

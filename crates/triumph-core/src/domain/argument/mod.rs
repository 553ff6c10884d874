//! Argument type system.
//!
//! An [`Argument`] is one node of a typed, recursively composed argument tree.
//! The node kind is a closed sum type ([`ArgumentNode`]) matched exhaustively
//! wherever behavior differs. Every node carries a display name, a direction
//! and free-form attributes on top of its kind-specific payload.
//!
//! # Invariant
//!
//! A node's signature is fixed when it is decoded. Only value slots mutate:
//! scalar values, array elements, dictionary entries and the node a variant
//! currently holds. The payload fields are private so no caller can swap a
//! struct member for one of a different kind.
//!
//! # Structure
//!
//! - `decode` - signature-string and host-value construction
//! - `assign` - value assignment, extraction and collection edits
//! - `label` - human-readable type labels

mod assign;
mod decode;
mod label;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::signature::{ScalarKind, Signature, codes};
use super::value::BusValue;

pub use decode::{decode, from_value};

/// Name given to the `n`th (zero-based) member of a decoded struct.
#[must_use]
pub fn struct_member_name(index: usize) -> String {
    format!("Field {}.", index + 1)
}

pub const DICT_KEY_NAME: &str = "key";
pub const DICT_VALUE_NAME: &str = "value";

// =============================================================================
// Direction and attributes
// =============================================================================

/// Whether an argument flows into or out of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    In,
    Out,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown argument direction '{0}', expected 'in' or 'out'")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" => Ok(Self::In),
            "out" => Ok(Self::Out),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// Free-form key/value metadata attached to an argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

// =============================================================================
// Node payloads
// =============================================================================

/// A scalar of one kind with an optional value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalarArgument {
    kind: ScalarKind,
    unsigned: bool,
    value: Option<BusValue>,
}

impl ScalarArgument {
    #[must_use]
    pub const fn kind(&self) -> ScalarKind {
        self.kind
    }

    #[must_use]
    pub const fn is_unsigned(&self) -> bool {
        self.unsigned
    }

    #[must_use]
    pub const fn value(&self) -> Option<&BusValue> {
        self.value.as_ref()
    }
}

/// A homogeneous array. Elements are spawned on demand from `element`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayArgument {
    element: Signature,
    elements: Vec<Argument>,
}

impl ArrayArgument {
    /// Signature every element has.
    #[must_use]
    pub const fn element_signature(&self) -> &Signature {
        &self.element
    }

    #[must_use]
    pub fn elements(&self) -> &[Argument] {
        &self.elements
    }
}

/// An ordered list of heterogeneous members.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructArgument {
    members: Vec<Argument>,
}

impl StructArgument {
    #[must_use]
    pub fn members(&self) -> &[Argument] {
        &self.members
    }
}

/// Dictionary of entries with unique keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DictionaryArgument {
    key: Signature,
    value: Signature,
    entries: Vec<Argument>,
}

impl DictionaryArgument {
    #[must_use]
    pub const fn key_signature(&self) -> &Signature {
        &self.key
    }

    #[must_use]
    pub const fn value_signature(&self) -> &Signature {
        &self.value
    }

    /// Entries as dictionary-entry nodes, in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[Argument] {
        &self.entries
    }
}

/// One key/value pair of a dictionary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DictEntryArgument {
    key: Box<Argument>,
    value: Box<Argument>,
}

impl DictEntryArgument {
    #[must_use]
    pub fn key(&self) -> &Argument {
        &self.key
    }

    #[must_use]
    pub fn value(&self) -> &Argument {
        &self.value
    }
}

/// A variant and the node it currently holds, if any.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct VariantArgument {
    held: Option<Box<Argument>>,
}

impl VariantArgument {
    #[must_use]
    pub fn held(&self) -> Option<&Argument> {
        self.held.as_deref()
    }
}

/// Kind-specific payload of an [`Argument`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArgumentNode {
    Scalar(ScalarArgument),
    Array(ArrayArgument),
    Struct(StructArgument),
    Dictionary(DictionaryArgument),
    DictEntry(DictEntryArgument),
    Variant(VariantArgument),
    /// Value-less placeholder for unreachable or unsupported output.
    Null,
}

// =============================================================================
// Argument
// =============================================================================

/// One node of an argument tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Argument {
    name: String,
    direction: Direction,
    attributes: Vec<Attribute>,
    #[serde(flatten)]
    node: ArgumentNode,
}

impl Argument {
    pub(crate) fn with_node(name: String, direction: Direction, node: ArgumentNode) -> Self {
        Self {
            name,
            direction,
            attributes: Vec::new(),
            node,
        }
    }

    /// A placeholder node with no signature and no value.
    pub fn null(name: impl Into<String>, direction: Direction) -> Self {
        Self::with_node(name.into(), direction, ArgumentNode::Null)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub const fn node(&self) -> &ArgumentNode {
        &self.node
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self.node, ArgumentNode::Null)
    }

    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, replacing any existing value for the same key.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(existing) = self.attributes.iter_mut().find(|a| a.key == key) {
            existing.value = value;
        } else {
            self.attributes.push(Attribute { key, value });
        }
    }

    /// The signature derived from this node's kind.
    ///
    /// Null nodes have the empty signature.
    #[must_use]
    pub fn signature(&self) -> String {
        let mut out = String::new();
        self.write_signature(&mut out);
        out
    }

    fn write_signature(&self, out: &mut String) {
        match &self.node {
            ArgumentNode::Scalar(scalar) => out.push(scalar.kind.code(scalar.unsigned)),
            ArgumentNode::Array(array) => {
                out.push(codes::ARRAY);
                out.push_str(array.element.as_str());
            }
            ArgumentNode::Struct(st) => {
                out.push(codes::STRUCT_OPEN);
                for member in &st.members {
                    member.write_signature(out);
                }
                out.push(codes::STRUCT_CLOSE);
            }
            ArgumentNode::Dictionary(dict) => {
                out.push(codes::ARRAY);
                out.push(codes::DICT_ENTRY_OPEN);
                out.push_str(dict.key.as_str());
                out.push_str(dict.value.as_str());
                out.push(codes::DICT_ENTRY_CLOSE);
            }
            ArgumentNode::DictEntry(entry) => {
                out.push(codes::DICT_ENTRY_OPEN);
                entry.key.write_signature(out);
                entry.value.write_signature(out);
                out.push(codes::DICT_ENTRY_CLOSE);
            }
            ArgumentNode::Variant(_) => out.push(codes::VARIANT),
            ArgumentNode::Null => {}
        }
    }

    /// Immediate children, in order.
    ///
    /// Struct members, array elements, dictionary entries, the key and value
    /// of an entry, or the node a variant holds.
    #[must_use]
    pub fn children(&self) -> Vec<&Self> {
        match &self.node {
            ArgumentNode::Scalar(_) | ArgumentNode::Null => Vec::new(),
            ArgumentNode::Array(array) => array.elements.iter().collect(),
            ArgumentNode::Struct(st) => st.members.iter().collect(),
            ArgumentNode::Dictionary(dict) => dict.entries.iter().collect(),
            ArgumentNode::DictEntry(entry) => vec![entry.key.as_ref(), entry.value.as_ref()],
            ArgumentNode::Variant(variant) => variant.held.iter().map(AsRef::as_ref).collect(),
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

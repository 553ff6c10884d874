//! Signature decoder.
//!
//! Turns one complete signature into one argument node. Both construction
//! paths end up here: signature text from an introspection document, and
//! host values that arrive already typed.

use tracing::trace;

use super::{
    Argument, ArgumentNode, ArrayArgument, DICT_KEY_NAME, DICT_VALUE_NAME, DictEntryArgument,
    DictionaryArgument, Direction, ScalarArgument, StructArgument, VariantArgument,
    struct_member_name,
};
use crate::domain::signature::{
    MalformedReason, ScalarKind, Signature, SignatureError, codes, split, split_members,
};
use crate::domain::value::{BusValue, ValueError};

/// Decode exactly one complete type into an argument node.
///
/// Composite members are decoded eagerly so that an undecodable code
/// anywhere inside the signature fails here rather than when a value is
/// assigned later. Arrays start empty and dictionaries start with no entries.
///
/// # Examples
///
/// ```
/// use triumph_core::domain::argument::{Direction, decode};
///
/// let arg = decode("(sid)", "point", Direction::In).unwrap();
/// assert_eq!(arg.children().len(), 3);
/// assert_eq!(arg.signature(), "(sid)");
/// ```
pub fn decode(
    signature: &str,
    name: impl Into<String>,
    direction: Direction,
) -> Result<Argument, SignatureError> {
    let tokens = split(signature)?;
    if tokens.len() != 1 {
        return Err(SignatureError::malformed(
            signature,
            tokens[0].len(),
            MalformedReason::NotSingleType(tokens.len()),
        ));
    }
    decode_token(tokens[0], name.into(), direction)
}

/// Build a node from a signature plus an already-typed value.
///
/// Results of a remote call carry their own values, so nodes built this
/// way are always `out` arguments.
pub fn from_value(
    name: impl Into<String>,
    signature: &str,
    value: BusValue,
) -> Result<Argument, ValueError> {
    let mut argument = decode(signature, name, Direction::Out)?;
    argument.set_value(value)?;
    Ok(argument)
}

/// Decode a token the tokenizer has already isolated.
pub(super) fn decode_token(
    token: &str,
    name: String,
    direction: Direction,
) -> Result<Argument, SignatureError> {
    let Some(first) = token.chars().next() else {
        return Err(SignatureError::malformed(token, 0, MalformedReason::Empty));
    };

    let node = match first {
        codes::ARRAY => decode_array(token, direction)?,
        codes::STRUCT_OPEN => decode_struct(token, direction)?,
        codes::VARIANT => ArgumentNode::Variant(VariantArgument::default()),
        code => match ScalarKind::from_code(code) {
            Some((kind, unsigned)) => ArgumentNode::Scalar(ScalarArgument {
                kind,
                unsigned,
                value: None,
            }),
            // Dictionary entries outside an array land here too.
            None => return Err(SignatureError::Unsupported(token.to_string())),
        },
    };

    trace!(signature = token, name = %name, "Decoded argument");
    Ok(Argument::with_node(name, direction, node))
}

fn decode_array(token: &str, direction: Direction) -> Result<ArgumentNode, SignatureError> {
    let element = &token[codes::ARRAY.len_utf8()..];

    if element.starts_with(codes::DICT_ENTRY_OPEN) {
        let body = inner(element);
        let members = split_members(body)?;
        if members.len() != 2 {
            return Err(SignatureError::malformed(
                token,
                codes::ARRAY.len_utf8(),
                MalformedReason::DictEntryArity(members.len()),
            ));
        }
        decode_token(members[0], DICT_KEY_NAME.to_string(), direction)?;
        decode_token(members[1], DICT_VALUE_NAME.to_string(), direction)?;
        return Ok(ArgumentNode::Dictionary(DictionaryArgument {
            key: Signature::from_token(members[0]),
            value: Signature::from_token(members[1]),
            entries: Vec::new(),
        }));
    }

    decode_token(element, String::new(), direction)?;
    Ok(ArgumentNode::Array(ArrayArgument {
        element: Signature::from_token(element),
        elements: Vec::new(),
    }))
}

fn decode_struct(token: &str, direction: Direction) -> Result<ArgumentNode, SignatureError> {
    let members = split_members(inner(token))?
        .into_iter()
        .enumerate()
        .map(|(index, member)| decode_token(member, struct_member_name(index), direction))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ArgumentNode::Struct(StructArgument { members }))
}

/// Contents of a bracketed token, without the brackets.
fn inner(token: &str) -> &str {
    // Openers and closers are single-byte codes.
    token.get(1..token.len().saturating_sub(1)).unwrap_or_default()
}

impl ArrayArgument {
    /// A fresh, valueless element decoded from the element signature.
    pub fn new_element(&self, direction: Direction) -> Result<Argument, SignatureError> {
        decode_token(self.element.as_str(), String::new(), direction)
    }
}

impl DictionaryArgument {
    /// A fresh dictionary-entry node with valueless key and value.
    pub fn new_entry(&self, direction: Direction) -> Result<Argument, SignatureError> {
        let key = decode_token(self.key.as_str(), DICT_KEY_NAME.to_string(), direction)?;
        let value = decode_token(self.value.as_str(), DICT_VALUE_NAME.to_string(), direction)?;
        Ok(Argument::with_node(
            String::new(),
            direction,
            ArgumentNode::DictEntry(DictEntryArgument {
                key: Box::new(key),
                value: Box::new(value),
            }),
        ))
    }
}

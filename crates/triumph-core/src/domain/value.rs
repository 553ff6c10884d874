//! Typed runtime values.
//!
//! `BusValue` is the host-side representation of anything a signature can
//! describe. It is what the GUI hands to the invocation layer and what an
//! already-marshaled result arrives as.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::signature::{ScalarKind, Signature, SignatureError, codes};

/// Errors raised when a value does not fit an argument node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The value's shape does not match the node's signature.
    #[error("Expected a value of signature '{expected}', got {found}")]
    KindMismatch { expected: String, found: String },

    /// A struct value with the wrong number of members.
    #[error("Struct '{signature}' has {expected} fields, got {found}")]
    ArityMismatch {
        signature: String,
        expected: usize,
        found: usize,
    },

    /// Two dictionary entries share a key.
    #[error("Duplicate dictionary key {0}")]
    DuplicateKey(String),

    #[error("Unsigned {kind} cannot be negative: {text}")]
    Negative { kind: String, text: String },

    #[error("Value {text} is out of range for {kind}")]
    OutOfRange { kind: String, text: String },

    #[error("Cannot parse '{text}' as {kind}")]
    InvalidText { kind: String, text: String },

    /// Null nodes have no value slot.
    #[error("Null argument cannot hold a value")]
    NullNode,

    /// No signature can be derived from the value (e.g. an empty array).
    #[error("Cannot infer a signature for {0}")]
    Uninferable(String),

    #[error(transparent)]
    Signature(#[from] SignatureError),
}

/// A variant payload: the held value together with its own signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantValue {
    pub signature: Signature,
    pub value: BusValue,
}

/// A typed value for any signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum BusValue {
    Byte(u8),
    Boolean(bool),
    Int16(i16),
    #[serde(rename = "uint16")]
    UInt16(u16),
    Int32(i32),
    #[serde(rename = "uint32")]
    UInt32(u32),
    Int64(i64),
    #[serde(rename = "uint64")]
    UInt64(u64),
    Double(f64),
    String(String),
    Signature(String),
    ObjectPath(String),
    UnixFd(u32),
    Array(Vec<BusValue>),
    Struct(Vec<BusValue>),
    /// Ordered entries; keys are unique once accepted by a dictionary node.
    Dict(Vec<(BusValue, BusValue)>),
    Variant(Box<VariantValue>),
}

impl BusValue {
    /// Wrap `value` in a variant, inferring the held signature.
    pub fn variant(value: Self) -> Result<Self, ValueError> {
        let signature = value.infer_signature()?;
        Ok(Self::Variant(Box::new(VariantValue { signature, value })))
    }

    /// Scalar kind and unsigned flag, or `None` for composite values.
    #[must_use]
    pub const fn scalar_kind(&self) -> Option<(ScalarKind, bool)> {
        let kind = match self {
            Self::Byte(_) => (ScalarKind::Byte, false),
            Self::Boolean(_) => (ScalarKind::Boolean, false),
            Self::Int16(_) => (ScalarKind::Int16, false),
            Self::UInt16(_) => (ScalarKind::Int16, true),
            Self::Int32(_) => (ScalarKind::Int32, false),
            Self::UInt32(_) => (ScalarKind::Int32, true),
            Self::Int64(_) => (ScalarKind::Int64, false),
            Self::UInt64(_) => (ScalarKind::Int64, true),
            Self::Double(_) => (ScalarKind::Double, false),
            Self::String(_) => (ScalarKind::String, false),
            Self::Signature(_) => (ScalarKind::Signature, false),
            Self::ObjectPath(_) => (ScalarKind::ObjectPath, false),
            Self::UnixFd(_) => (ScalarKind::UnixFd, false),
            Self::Array(_) | Self::Struct(_) | Self::Dict(_) | Self::Variant(_) => return None,
        };
        Some(kind)
    }

    /// Short description of the value's shape for error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        if let Some((kind, unsigned)) = self.scalar_kind() {
            return kind.code(unsigned).to_string();
        }
        match self {
            Self::Array(items) => format!("array of {}", items.len()),
            Self::Struct(members) => format!("struct of {}", members.len()),
            Self::Dict(entries) => format!("dictionary of {}", entries.len()),
            Self::Variant(_) => codes::VARIANT.to_string(),
            _ => String::new(),
        }
    }

    /// Derive the signature this value would have on the wire.
    ///
    /// Arrays and dictionaries take their element signature from the first
    /// element, and every other element must agree. Empty collections carry
    /// no type information and cannot be inferred.
    pub fn infer_signature(&self) -> Result<Signature, ValueError> {
        let text = self.infer_signature_text()?;
        Ok(Signature::parse(text)?)
    }

    fn infer_signature_text(&self) -> Result<String, ValueError> {
        if let Some((kind, unsigned)) = self.scalar_kind() {
            return Ok(kind.code(unsigned).to_string());
        }
        match self {
            Self::Variant(_) => Ok(codes::VARIANT.to_string()),
            Self::Struct(members) => {
                let mut text = String::from(codes::STRUCT_OPEN);
                for member in members {
                    text.push_str(&member.infer_signature_text()?);
                }
                text.push(codes::STRUCT_CLOSE);
                Ok(text)
            }
            Self::Array(items) => {
                let element = uniform_signature(items.iter(), self)?;
                Ok(format!("{}{element}", codes::ARRAY))
            }
            Self::Dict(entries) => {
                let key = uniform_signature(entries.iter().map(|(k, _)| k), self)?;
                let value = uniform_signature(entries.iter().map(|(_, v)| v), self)?;
                Ok(format!(
                    "{}{}{key}{value}{}",
                    codes::ARRAY,
                    codes::DICT_ENTRY_OPEN,
                    codes::DICT_ENTRY_CLOSE
                ))
            }
            _ => Err(ValueError::Uninferable(self.describe())),
        }
    }
}

fn uniform_signature<'a>(
    mut items: impl Iterator<Item = &'a BusValue>,
    whole: &BusValue,
) -> Result<String, ValueError> {
    let first = items
        .next()
        .ok_or_else(|| ValueError::Uninferable(whole.describe()))?
        .infer_signature_text()?;
    for item in items {
        let next = item.infer_signature_text()?;
        if next != first {
            return Err(ValueError::KindMismatch {
                expected: first,
                found: next,
            });
        }
    }
    Ok(first)
}

impl fmt::Display for BusValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Byte(v) => write!(f, "{v}"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Int16(v) => write!(f, "{v}"),
            Self::UInt16(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::UInt32(v) | Self::UnixFd(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::UInt64(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::String(v) | Self::Signature(v) | Self::ObjectPath(v) => write!(f, "\"{v}\""),
            Self::Array(items) => {
                f.write_str("[")?;
                write_joined(f, items.iter())?;
                f.write_str("]")
            }
            Self::Struct(members) => {
                f.write_str("(")?;
                write_joined(f, members.iter())?;
                f.write_str(")")
            }
            Self::Dict(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Self::Variant(held) => write!(f, "<{}> {}", held.signature, held.value),
        }
    }
}

fn write_joined<'a>(
    f: &mut fmt::Formatter<'_>,
    items: impl Iterator<Item = &'a BusValue>,
) -> fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

// =============================================================================
// Text input
// =============================================================================

impl ScalarKind {
    /// Convert user-typed text into a typed value of this kind.
    ///
    /// Unsigned integers reject negative input separately from overflow so
    /// the caller can tell the user which bound was violated.
    pub fn parse_text(self, text: &str, unsigned: bool) -> Result<BusValue, ValueError> {
        let trimmed = text.trim();
        match self {
            Self::Byte => parse_unsigned(self, trimmed, u64::from(u8::MAX))
                .and_then(|v| narrow(self, trimmed, v).map(BusValue::Byte)),
            Self::Boolean => match trimmed.to_ascii_lowercase().as_str() {
                "true" => Ok(BusValue::Boolean(true)),
                "false" => Ok(BusValue::Boolean(false)),
                _ => Err(invalid(self, trimmed)),
            },
            Self::Int16 if unsigned => parse_unsigned(self, trimmed, u64::from(u16::MAX))
                .and_then(|v| narrow(self, trimmed, v).map(BusValue::UInt16)),
            Self::Int16 => parse_signed(self, trimmed, i64::from(i16::MIN), i64::from(i16::MAX))
                .and_then(|v| narrow(self, trimmed, v).map(BusValue::Int16)),
            Self::Int32 if unsigned => parse_unsigned(self, trimmed, u64::from(u32::MAX))
                .and_then(|v| narrow(self, trimmed, v).map(BusValue::UInt32)),
            Self::Int32 => parse_signed(self, trimmed, i64::from(i32::MIN), i64::from(i32::MAX))
                .and_then(|v| narrow(self, trimmed, v).map(BusValue::Int32)),
            Self::Int64 if unsigned => {
                parse_unsigned(self, trimmed, u64::MAX).map(BusValue::UInt64)
            }
            Self::Int64 => parse_signed(self, trimmed, i64::MIN, i64::MAX).map(BusValue::Int64),
            Self::UnixFd => parse_unsigned(self, trimmed, u64::from(u32::MAX))
                .and_then(|v| narrow(self, trimmed, v).map(BusValue::UnixFd)),
            Self::Double => trimmed
                .parse::<f64>()
                .map(BusValue::Double)
                .map_err(|_| invalid(self, trimmed)),
            Self::String => Ok(BusValue::String(text.to_string())),
            Self::Signature => {
                Signature::parse(trimmed)?;
                Ok(BusValue::Signature(trimmed.to_string()))
            }
            Self::ObjectPath => {
                if trimmed.starts_with('/') {
                    Ok(BusValue::ObjectPath(trimmed.to_string()))
                } else {
                    Err(invalid(self, trimmed))
                }
            }
        }
    }
}

fn invalid(kind: ScalarKind, text: &str) -> ValueError {
    ValueError::InvalidText {
        kind: kind.type_name().to_string(),
        text: text.to_string(),
    }
}

fn out_of_range(kind: ScalarKind, text: &str) -> ValueError {
    ValueError::OutOfRange {
        kind: kind.type_name().to_string(),
        text: text.to_string(),
    }
}

fn parse_wide(kind: ScalarKind, text: &str) -> Result<i128, ValueError> {
    text.parse::<i128>().map_err(|_| invalid(kind, text))
}

fn parse_unsigned(kind: ScalarKind, text: &str, max: u64) -> Result<u64, ValueError> {
    let wide = parse_wide(kind, text)?;
    if wide < 0 {
        return Err(ValueError::Negative {
            kind: kind.type_name().to_string(),
            text: text.to_string(),
        });
    }
    if wide > i128::from(max) {
        return Err(out_of_range(kind, text));
    }
    u64::try_from(wide).map_err(|_| out_of_range(kind, text))
}

fn parse_signed(kind: ScalarKind, text: &str, min: i64, max: i64) -> Result<i64, ValueError> {
    let wide = parse_wide(kind, text)?;
    if wide < i128::from(min) || wide > i128::from(max) {
        return Err(out_of_range(kind, text));
    }
    i64::try_from(wide).map_err(|_| out_of_range(kind, text))
}

fn narrow<S, T: TryFrom<S>>(kind: ScalarKind, text: &str, value: S) -> Result<T, ValueError> {
    T::try_from(value).map_err(|_| out_of_range(kind, text))
}

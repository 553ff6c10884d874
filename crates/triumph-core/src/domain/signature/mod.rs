//! Wire type signatures.
//!
//! A signature is an immutable string over a fixed alphabet of one-character
//! scalar codes plus three structural markers: `a` (array prefix), `(...)`
//! (struct) and `{kv}` (dictionary entry, only legal as an array element).
//!
//! # Structure
//!
//! - `codes` - the alphabet
//! - `tokenizer` - splitting into complete top-level types

pub mod codes;
mod tokenizer;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use tokenizer::{MAX_ARRAY_DEPTH, MAX_SIGNATURE_LEN, MAX_STRUCT_DEPTH, split};
pub(crate) use tokenizer::split_members;

// =============================================================================
// Errors
// =============================================================================

/// Why the tokenizer could not balance a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// The signature (or a required part of it) is empty.
    Empty,
    /// An opening bracket was never closed.
    UnmatchedOpen(char),
    /// A closing bracket with no matching opener, or of the wrong kind.
    UnexpectedClose(char),
    /// An array prefix with nothing after it.
    DanglingArray,
    /// The signature ended in the middle of a type.
    Truncated,
    /// A dictionary entry that does not hold exactly a key and a value.
    DictEntryArity(usize),
    /// More than one complete type where exactly one was required.
    NotSingleType(usize),
    /// The signature is longer than [`MAX_SIGNATURE_LEN`] bytes.
    TooLong(usize),
    /// Arrays or containers nest deeper than the bus allows.
    TooDeep,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty signature"),
            Self::UnmatchedOpen(c) => write!(f, "unmatched '{c}'"),
            Self::UnexpectedClose(c) => write!(f, "unexpected '{c}'"),
            Self::DanglingArray => write!(f, "array prefix without an element type"),
            Self::Truncated => write!(f, "signature ends mid-type"),
            Self::DictEntryArity(n) => {
                write!(f, "dictionary entry needs a key and a value, found {n} types")
            }
            Self::NotSingleType(n) => write!(f, "expected one complete type, found {n}"),
            Self::TooLong(n) => {
                write!(f, "{n} bytes exceeds the {MAX_SIGNATURE_LEN} byte limit")
            }
            Self::TooDeep => write!(f, "nesting exceeds {MAX_ARRAY_DEPTH} levels"),
        }
    }
}

/// Errors raised while tokenizing or decoding a signature.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// Brackets do not balance, an array prefix dangles, or the input is empty.
    #[error("Malformed signature '{signature}' at offset {offset}: {reason}")]
    Malformed {
        signature: String,
        offset: usize,
        reason: MalformedReason,
    },

    /// A structurally valid signature whose leading code cannot be decoded.
    #[error("Unsupported signature '{0}'")]
    Unsupported(String),
}

impl SignatureError {
    pub(crate) fn malformed(signature: &str, offset: usize, reason: MalformedReason) -> Self {
        Self::Malformed {
            signature: signature.to_string(),
            offset,
            reason,
        }
    }
}

// =============================================================================
// Scalar kinds
// =============================================================================

/// The scalar kinds of the alphabet.
///
/// Signed and unsigned integers of the same width share a kind; the
/// distinction is carried separately as an `unsigned` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    Byte,
    Boolean,
    Int16,
    Int32,
    Int64,
    Double,
    String,
    Signature,
    ObjectPath,
    UnixFd,
}

impl ScalarKind {
    /// Map a type code to its kind and unsigned flag.
    #[must_use]
    pub const fn from_code(code: char) -> Option<(Self, bool)> {
        let decoded = match code {
            codes::BYTE => (Self::Byte, false),
            codes::BOOLEAN => (Self::Boolean, false),
            codes::INT16 => (Self::Int16, false),
            codes::UINT16 => (Self::Int16, true),
            codes::INT32 => (Self::Int32, false),
            codes::UINT32 => (Self::Int32, true),
            codes::INT64 => (Self::Int64, false),
            codes::UINT64 => (Self::Int64, true),
            codes::DOUBLE => (Self::Double, false),
            codes::STRING => (Self::String, false),
            codes::SIGNATURE => (Self::Signature, false),
            codes::OBJECT_PATH => (Self::ObjectPath, false),
            codes::UNIX_FD => (Self::UnixFd, false),
            _ => return None,
        };
        Some(decoded)
    }

    /// The type code for this kind. `unsigned` only matters for integers.
    #[must_use]
    pub const fn code(self, unsigned: bool) -> char {
        match (self, unsigned) {
            (Self::Byte, _) => codes::BYTE,
            (Self::Boolean, _) => codes::BOOLEAN,
            (Self::Int16, false) => codes::INT16,
            (Self::Int16, true) => codes::UINT16,
            (Self::Int32, false) => codes::INT32,
            (Self::Int32, true) => codes::UINT32,
            (Self::Int64, false) => codes::INT64,
            (Self::Int64, true) => codes::UINT64,
            (Self::Double, _) => codes::DOUBLE,
            (Self::String, _) => codes::STRING,
            (Self::Signature, _) => codes::SIGNATURE,
            (Self::ObjectPath, _) => codes::OBJECT_PATH,
            (Self::UnixFd, _) => codes::UNIX_FD,
        }
    }

    /// Whether the kind has signed and unsigned forms.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::Int16 | Self::Int32 | Self::Int64)
    }

    /// Whether values of this kind are carried as text.
    #[must_use]
    pub const fn is_textual(self) -> bool {
        matches!(self, Self::String | Self::Signature | Self::ObjectPath)
    }

    /// Human-readable type name used in labels.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::Boolean => "boolean",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Double => "double",
            Self::String => "string",
            Self::Signature => "signature",
            Self::ObjectPath => "object path",
            Self::UnixFd => "unix fd",
        }
    }
}

// =============================================================================
// Signature newtype
// =============================================================================

/// A structurally valid signature: one or more complete types.
///
/// Construction validates bracket balance through the tokenizer, so every
/// `Signature` decomposes into complete top-level types with nothing left over.
/// The contents never change after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Signature(String);

impl Signature {
    /// Validate and wrap a signature string.
    pub fn parse(signature: impl Into<String>) -> Result<Self, SignatureError> {
        let signature = signature.into();
        split(&signature)?;
        Ok(Self(signature))
    }

    /// Wrap a slice the tokenizer already produced.
    pub(crate) fn from_token(token: &str) -> Self {
        Self(token.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The complete top-level types this signature is made of.
    #[must_use]
    pub fn tokens(&self) -> Vec<&str> {
        // Validated at construction.
        split(&self.0).unwrap_or_default()
    }

    /// Whether this signature is exactly one complete type.
    #[must_use]
    pub fn is_single_type(&self) -> bool {
        self.tokens().len() == 1
    }

    /// The leading type code.
    #[must_use]
    pub fn first_code(&self) -> char {
        self.0.chars().next().unwrap_or_default()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Signature {
    type Error = SignatureError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for Signature {
    type Error = SignatureError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Signature> for String {
    fn from(signature: Signature) -> Self {
        signature.0
    }
}

impl AsRef<str> for Signature {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_codes_round_trip() {
        for code in "ybnqiuxtdsgoh".chars() {
            let (kind, unsigned) = ScalarKind::from_code(code).unwrap();
            assert_eq!(kind.code(unsigned), code, "code {code}");
        }
    }

    #[test]
    fn test_unsigned_shares_kind() {
        assert_eq!(ScalarKind::from_code('q'), Some((ScalarKind::Int16, true)));
        assert_eq!(ScalarKind::from_code('n'), Some((ScalarKind::Int16, false)));
        assert_eq!(ScalarKind::from_code('t'), Some((ScalarKind::Int64, true)));
    }

    #[test]
    fn test_structural_codes_are_not_scalars() {
        for code in "av(){}".chars() {
            assert!(ScalarKind::from_code(code).is_none(), "code {code}");
        }
        assert!(ScalarKind::from_code(codes::ABSTRACT_STRUCT).is_none());
        assert!(ScalarKind::from_code(codes::ABSTRACT_DICT_ENTRY).is_none());
    }

    #[test]
    fn test_signature_parse_validates() {
        assert!(Signature::parse("a{sv}").is_ok());
        assert!(Signature::parse("a{sv").is_err());
        assert!(Signature::parse("").is_err());
    }

    #[test]
    fn test_signature_tokens() {
        let sig = Signature::parse("sa{sv}(ii)").unwrap();
        assert_eq!(sig.tokens(), vec!["s", "a{sv}", "(ii)"]);
        assert!(!sig.is_single_type());
        assert!(Signature::parse("a(ii)").unwrap().is_single_type());
        assert_eq!(sig.first_code(), 's');
    }

    #[test]
    fn test_signature_serde_rejects_malformed() {
        let ok: Signature = serde_json::from_str("\"ai\"").unwrap();
        assert_eq!(ok.as_str(), "ai");
        assert!(serde_json::from_str::<Signature>("\"a\"").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "\"ai\"");
    }

    #[test]
    fn test_error_display_names_offset() {
        let err = Signature::parse("(i").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed signature '(i' at offset 0: unmatched '('"
        );
    }
}

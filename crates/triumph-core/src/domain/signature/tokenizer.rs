//! Top-level signature tokenizer.
//!
//! Splits a concatenated signature into the ordered list of complete types it
//! is made of. The tokenizer only checks structure (bracket balance, array
//! prefixes); whether each code is decodable is the decoder's business.

use super::codes;
use super::{MalformedReason, SignatureError};

/// Longest signature accepted, in bytes.
pub const MAX_SIGNATURE_LEN: usize = 255;
/// Deepest chain of array prefixes accepted.
pub const MAX_ARRAY_DEPTH: usize = 32;
/// Deepest nesting of structs and dictionary entries accepted.
pub const MAX_STRUCT_DEPTH: usize = 32;

/// Containers open around the type being measured.
#[derive(Debug, Clone, Copy, Default)]
struct Nesting {
    arrays: usize,
    containers: usize,
}

impl Nesting {
    fn array(self, signature: &str, offset: usize) -> Result<Self, SignatureError> {
        if self.arrays >= MAX_ARRAY_DEPTH {
            return Err(SignatureError::malformed(
                signature,
                offset,
                MalformedReason::TooDeep,
            ));
        }
        Ok(Self {
            arrays: self.arrays + 1,
            ..self
        })
    }

    fn container(self, signature: &str, offset: usize) -> Result<Self, SignatureError> {
        if self.containers >= MAX_STRUCT_DEPTH {
            return Err(SignatureError::malformed(
                signature,
                offset,
                MalformedReason::TooDeep,
            ));
        }
        Ok(Self {
            containers: self.containers + 1,
            ..self
        })
    }
}

/// Split `signature` into its complete top-level types.
///
/// The returned slices borrow from `signature`, preserve order, and
/// concatenate back to the input exactly.
///
/// # Examples
///
/// ```
/// use triumph_core::domain::signature::split;
///
/// assert_eq!(split("igo").unwrap(), vec!["i", "g", "o"]);
/// assert_eq!(split("a{sv}(ii)").unwrap(), vec!["a{sv}", "(ii)"]);
/// ```
pub fn split(signature: &str) -> Result<Vec<&str>, SignatureError> {
    if signature.is_empty() {
        return Err(SignatureError::malformed(signature, 0, MalformedReason::Empty));
    }
    if signature.len() > MAX_SIGNATURE_LEN {
        return Err(SignatureError::malformed(
            signature,
            MAX_SIGNATURE_LEN,
            MalformedReason::TooLong(signature.len()),
        ));
    }

    let mut tokens = Vec::new();
    let mut start = 0;
    while start < signature.len() {
        let len = complete_type_len(signature, start, Nesting::default())?;
        tokens.push(&signature[start..start + len]);
        start += len;
    }
    Ok(tokens)
}

/// Split the contents of a container, where zero members is legal.
///
/// Used for struct bodies: `()` has no members, the tokenizer itself would
/// reject the empty string.
pub(crate) fn split_members(body: &str) -> Result<Vec<&str>, SignatureError> {
    if body.is_empty() {
        Ok(Vec::new())
    } else {
        split(body)
    }
}

/// Byte length of the single complete type that starts at `start`.
fn complete_type_len(
    signature: &str,
    start: usize,
    nesting: Nesting,
) -> Result<usize, SignatureError> {
    let Some(first) = signature[start..].chars().next() else {
        return Err(SignatureError::malformed(
            signature,
            start,
            MalformedReason::Truncated,
        ));
    };

    if first == codes::ARRAY {
        let element = start + first.len_utf8();
        if element >= signature.len() {
            return Err(SignatureError::malformed(
                signature,
                start,
                MalformedReason::DanglingArray,
            ));
        }
        let nesting = nesting.array(signature, start)?;
        return Ok(1 + complete_type_len(signature, element, nesting)?);
    }

    if let Some(closer) = codes::closer_for(first) {
        let nesting = nesting.container(signature, start)?;
        return container_len(signature, start, (first, closer), nesting);
    }

    if codes::is_closer(first) {
        return Err(SignatureError::malformed(
            signature,
            start,
            MalformedReason::UnexpectedClose(first),
        ));
    }

    Ok(first.len_utf8())
}

/// Length of a bracketed container, opener to matching closer inclusive.
///
/// Members are consumed as complete types, so `(` and `{` nest inside each
/// other freely but a closer of the wrong kind is reported where it occurs.
fn container_len(
    signature: &str,
    start: usize,
    (open, close): (char, char),
    nesting: Nesting,
) -> Result<usize, SignatureError> {
    let mut pos = start + open.len_utf8();
    loop {
        let Some(next) = signature[pos..].chars().next() else {
            return Err(SignatureError::malformed(
                signature,
                start,
                MalformedReason::UnmatchedOpen(open),
            ));
        };
        if next == close {
            return Ok(pos + close.len_utf8() - start);
        }
        if codes::is_closer(next) {
            return Err(SignatureError::malformed(
                signature,
                pos,
                MalformedReason::UnexpectedClose(next),
            ));
        }
        pos += complete_type_len(signature, pos, nesting)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_scalar() {
        assert_eq!(split("i").unwrap(), vec!["i"]);
    }

    #[test]
    fn test_scalar_run() {
        assert_eq!(split("igo").unwrap(), vec!["i", "g", "o"]);
    }

    #[test]
    fn test_mixed_containers() {
        assert_eq!(
            split("ig(ind)ao").unwrap(),
            vec!["i", "g", "(ind)", "ao"]
        );
    }

    #[test]
    fn test_nested_arrays_are_one_token() {
        assert_eq!(split("aai").unwrap(), vec!["aai"]);
        assert_eq!(split("a(ii)s").unwrap(), vec!["a(ii)", "s"]);
        assert_eq!(split("a{si}a{sa{sv}}").unwrap(), vec!["a{si}", "a{sa{sv}}"]);
    }

    #[test]
    fn test_brackets_nest_inside_each_other() {
        assert_eq!(
            split("(a{s(iv)}(y))x").unwrap(),
            vec!["(a{s(iv)}(y))", "x"]
        );
    }

    #[test]
    fn test_empty_struct_is_one_token() {
        assert_eq!(split("()i").unwrap(), vec!["()", "i"]);
    }

    #[test]
    fn test_empty_input_is_malformed() {
        let err = split("").unwrap_err();
        assert!(matches!(
            err,
            SignatureError::Malformed {
                offset: 0,
                reason: MalformedReason::Empty,
                ..
            }
        ));
    }

    #[test]
    fn test_dangling_array_reports_offset() {
        let err = split("ia").unwrap_err();
        assert!(matches!(
            err,
            SignatureError::Malformed {
                offset: 1,
                reason: MalformedReason::DanglingArray,
                ..
            }
        ));
    }

    #[test]
    fn test_unmatched_open_reports_opener() {
        let err = split("s(ii").unwrap_err();
        assert!(matches!(
            err,
            SignatureError::Malformed {
                offset: 1,
                reason: MalformedReason::UnmatchedOpen('('),
                ..
            }
        ));
    }

    #[test]
    fn test_stray_closer() {
        let err = split("i)").unwrap_err();
        assert!(matches!(
            err,
            SignatureError::Malformed {
                offset: 1,
                reason: MalformedReason::UnexpectedClose(')'),
                ..
            }
        ));
    }

    #[test]
    fn test_mismatched_closer() {
        let err = split("(i}").unwrap_err();
        assert!(matches!(
            err,
            SignatureError::Malformed {
                offset: 2,
                reason: MalformedReason::UnexpectedClose('}'),
                ..
            }
        ));
    }

    #[test]
    fn test_array_of_closer_is_malformed() {
        let err = split("(a)").unwrap_err();
        assert!(matches!(
            err,
            SignatureError::Malformed {
                offset: 2,
                reason: MalformedReason::UnexpectedClose(')'),
                ..
            }
        ));
    }

    #[test]
    fn test_non_ascii_is_passed_through_whole() {
        // Tokenizing never splits a character; decoding rejects it later.
        assert_eq!(split("ié").unwrap(), vec!["i", "é"]);
    }

    fn nested_structs(depth: usize) -> String {
        format!("{}i{}", "(".repeat(depth), ")".repeat(depth))
    }

    #[test]
    fn test_length_cap() {
        assert_eq!(split(&"i".repeat(MAX_SIGNATURE_LEN)).unwrap().len(), 255);
        let err = split(&"i".repeat(MAX_SIGNATURE_LEN + 1)).unwrap_err();
        assert!(matches!(
            err,
            SignatureError::Malformed {
                offset: 255,
                reason: MalformedReason::TooLong(256),
                ..
            }
        ));
    }

    #[test]
    fn test_array_depth_cap() {
        let deepest = format!("{}i", "a".repeat(MAX_ARRAY_DEPTH));
        assert_eq!(split(&deepest).unwrap(), vec![deepest.as_str()]);

        let err = split(&format!("{}i", "a".repeat(MAX_ARRAY_DEPTH + 1))).unwrap_err();
        assert!(matches!(
            err,
            SignatureError::Malformed {
                offset: 32,
                reason: MalformedReason::TooDeep,
                ..
            }
        ));
    }

    #[test]
    fn test_struct_depth_cap() {
        let deepest = nested_structs(MAX_STRUCT_DEPTH);
        assert_eq!(split(&deepest).unwrap(), vec![deepest.as_str()]);

        let err = split(&nested_structs(MAX_STRUCT_DEPTH + 1)).unwrap_err();
        assert!(matches!(
            err,
            SignatureError::Malformed {
                offset: 32,
                reason: MalformedReason::TooDeep,
                ..
            }
        ));
    }

    #[test]
    fn test_dict_entries_count_as_containers() {
        let deep = format!("{}i{}", "{s".repeat(33), "}".repeat(33));
        assert!(matches!(
            split(&deep).unwrap_err(),
            SignatureError::Malformed {
                reason: MalformedReason::TooDeep,
                ..
            }
        ));
        // Arrays and containers are counted separately.
        let mixed = format!("{}i{}", "a(".repeat(32), ")".repeat(32));
        assert!(split(&mixed).is_ok());
    }

    #[test]
    fn test_runaway_array_prefix_is_rejected() {
        assert!(split(&format!("{}i", "a".repeat(5000))).is_err());
        assert!(split(&"(".repeat(5000)).is_err());
    }

    #[test]
    fn test_split_members_allows_empty_body() {
        assert!(split_members("").unwrap().is_empty());
        assert_eq!(split_members("sid").unwrap(), vec!["s", "i", "d"]);
    }
}

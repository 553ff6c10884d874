//! Type codes of the wire signature alphabet.
//!
//! These single characters are the interoperability contract with every bus
//! peer and must match the wire format exactly.

pub const BYTE: char = 'y';
pub const BOOLEAN: char = 'b';
pub const INT16: char = 'n';
pub const UINT16: char = 'q';
pub const INT32: char = 'i';
pub const UINT32: char = 'u';
pub const INT64: char = 'x';
pub const UINT64: char = 't';
pub const DOUBLE: char = 'd';
pub const STRING: char = 's';
pub const SIGNATURE: char = 'g';
pub const OBJECT_PATH: char = 'o';
pub const UNIX_FD: char = 'h';
pub const VARIANT: char = 'v';

/// Array prefix, followed by exactly one complete type.
pub const ARRAY: char = 'a';

pub const STRUCT_OPEN: char = '(';
pub const STRUCT_CLOSE: char = ')';
pub const DICT_ENTRY_OPEN: char = '{';
pub const DICT_ENTRY_CLOSE: char = '}';

/// Abstract codes that name a container kind but never appear in a signature.
pub const ABSTRACT_STRUCT: char = 'r';
pub const ABSTRACT_DICT_ENTRY: char = 'e';

/// The closing bracket that matches `open`, if `open` is an opener.
#[must_use]
pub const fn closer_for(open: char) -> Option<char> {
    match open {
        STRUCT_OPEN => Some(STRUCT_CLOSE),
        DICT_ENTRY_OPEN => Some(DICT_ENTRY_CLOSE),
        _ => None,
    }
}

#[must_use]
pub const fn is_closer(c: char) -> bool {
    matches!(c, STRUCT_CLOSE | DICT_ENTRY_CLOSE)
}

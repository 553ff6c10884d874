//! Value slots: assignment, extraction and collection edits.
//!
//! Assignment to a composite node is all-or-nothing. The new contents are
//! built on a copy and only swapped in once every member accepted its value,
//! so a rejected assignment leaves the node exactly as it was.

use super::decode::decode_token;
use super::{
    Argument, ArgumentNode, ArrayArgument, DictEntryArgument, DictionaryArgument, Direction,
    ScalarArgument, StructArgument, VariantArgument,
};
use crate::domain::signature::Signature;
use crate::domain::value::{BusValue, ValueError, VariantValue};

impl Argument {
    /// Assign a typed value to this node and everything beneath it.
    ///
    /// Arrays and dictionaries are rebuilt from the value, so their previous
    /// elements are discarded. A dictionary-entry node accepts a
    /// [`BusValue::Dict`] holding exactly one entry. A variant accepts either
    /// an explicit [`BusValue::Variant`] or any other value, whose signature
    /// is then inferred; the held kind may change on every assignment.
    pub fn set_value(&mut self, value: BusValue) -> Result<(), ValueError> {
        let signature = self.signature();
        let direction = self.direction;
        match &mut self.node {
            ArgumentNode::Scalar(scalar) => scalar.assign(value, &signature),
            ArgumentNode::Array(array) => array.assign(value, &signature, direction),
            ArgumentNode::Struct(st) => st.assign(value, &signature),
            ArgumentNode::Dictionary(dict) => dict.assign(value, &signature, direction),
            ArgumentNode::DictEntry(entry) => entry.assign(value, &signature),
            ArgumentNode::Variant(variant) => variant.assign(value, direction),
            ArgumentNode::Null => Err(ValueError::NullNode),
        }
    }

    /// Parse user-typed text into a scalar node's value.
    pub fn set_text(&mut self, text: &str) -> Result<(), ValueError> {
        let expected = self.signature();
        match &mut self.node {
            ArgumentNode::Scalar(scalar) => {
                scalar.value = Some(scalar.kind.parse_text(text, scalar.unsigned)?);
                Ok(())
            }
            ArgumentNode::Null => Err(ValueError::NullNode),
            _ => Err(mismatch(expected, "text")),
        }
    }

    /// Empty every value slot at and below this node.
    pub fn clear_value(&mut self) {
        match &mut self.node {
            ArgumentNode::Scalar(scalar) => scalar.value = None,
            ArgumentNode::Array(array) => array.elements.clear(),
            ArgumentNode::Struct(st) => st.members.iter_mut().for_each(Self::clear_value),
            ArgumentNode::Dictionary(dict) => dict.entries.clear(),
            ArgumentNode::DictEntry(entry) => {
                entry.key.clear_value();
                entry.value.clear_value();
            }
            ArgumentNode::Variant(variant) => variant.held = None,
            ArgumentNode::Null => {}
        }
    }

    /// Rebuild the typed value held by this node.
    ///
    /// Returns `None` while any reachable slot is still empty, and always for
    /// Null nodes. Empty arrays and dictionaries are complete values.
    #[must_use]
    pub fn value(&self) -> Option<BusValue> {
        match &self.node {
            ArgumentNode::Scalar(scalar) => scalar.value.clone(),
            ArgumentNode::Array(array) => array
                .elements
                .iter()
                .map(Self::value)
                .collect::<Option<Vec<_>>>()
                .map(BusValue::Array),
            ArgumentNode::Struct(st) => st
                .members
                .iter()
                .map(Self::value)
                .collect::<Option<Vec<_>>>()
                .map(BusValue::Struct),
            ArgumentNode::Dictionary(dict) => dict
                .entries
                .iter()
                .map(Self::entry_pair)
                .collect::<Option<Vec<_>>>()
                .map(BusValue::Dict),
            ArgumentNode::DictEntry(_) => self.entry_pair().map(|pair| BusValue::Dict(vec![pair])),
            ArgumentNode::Variant(variant) => {
                let held = variant.held.as_deref()?;
                let signature = Signature::parse(held.signature()).ok()?;
                let value = held.value()?;
                Some(BusValue::Variant(Box::new(VariantValue { signature, value })))
            }
            ArgumentNode::Null => None,
        }
    }

    /// Whether every reachable value slot is filled.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.value().is_some()
    }

    fn entry_pair(&self) -> Option<(BusValue, BusValue)> {
        match &self.node {
            ArgumentNode::DictEntry(entry) => Some((entry.key.value()?, entry.value.value()?)),
            _ => None,
        }
    }

    // -------------------------------------------------------------------------
    // Collection edits
    // -------------------------------------------------------------------------

    /// Append a new array element holding `value`.
    pub fn push_element(&mut self, value: BusValue) -> Result<&Self, ValueError> {
        let direction = self.direction;
        let expected = self.signature();
        let ArgumentNode::Array(array) = &mut self.node else {
            return Err(mismatch(expected, "array element"));
        };
        let mut element = array.new_element(direction)?;
        element.set_value(value)?;
        array.elements.push(element);
        Ok(&array.elements[array.elements.len() - 1])
    }

    /// Append an existing node as an array element.
    ///
    /// The node's signature must equal the array's element signature.
    pub fn push_argument(&mut self, element: Self) -> Result<(), ValueError> {
        let expected = self.signature();
        let ArgumentNode::Array(array) = &mut self.node else {
            return Err(mismatch(expected, "array element"));
        };
        let found = element.signature();
        if found != array.element.as_str() {
            return Err(mismatch(array.element.to_string(), found));
        }
        array.elements.push(element);
        Ok(())
    }

    /// Remove the array element at `index`.
    pub fn remove_element(&mut self, index: usize) -> Option<Self> {
        match &mut self.node {
            ArgumentNode::Array(array) if index < array.elements.len() => {
                Some(array.elements.remove(index))
            }
            _ => None,
        }
    }

    /// Mutable access to an array element or struct member.
    ///
    /// Dictionary entries are reached through [`Self::entry_value_mut`] so
    /// their keys cannot be edited into duplicates.
    pub fn child_mut(&mut self, index: usize) -> Option<&mut Self> {
        match &mut self.node {
            ArgumentNode::Array(array) => array.elements.get_mut(index),
            ArgumentNode::Struct(st) => st.members.get_mut(index),
            ArgumentNode::Variant(variant) if index == 0 => variant.held.as_deref_mut(),
            _ => None,
        }
    }

    /// Insert a dictionary entry; the key must not already be present.
    pub fn insert_entry(&mut self, key: BusValue, value: BusValue) -> Result<(), ValueError> {
        let direction = self.direction;
        let expected = self.signature();
        let ArgumentNode::Dictionary(dict) = &mut self.node else {
            return Err(mismatch(expected, "dictionary entry"));
        };
        if dict.find(&key).is_some() {
            return Err(ValueError::DuplicateKey(key.to_string()));
        }
        let entry = dict.build_entry(key, value, direction)?;
        dict.entries.push(entry);
        Ok(())
    }

    /// Remove the entry with `key`, returning it.
    pub fn remove_entry(&mut self, key: &BusValue) -> Option<Self> {
        let ArgumentNode::Dictionary(dict) = &mut self.node else {
            return None;
        };
        dict.find(key).map(|index| dict.entries.remove(index))
    }

    /// The value node of the entry with `key`.
    pub fn entry_value_mut(&mut self, key: &BusValue) -> Option<&mut Self> {
        let ArgumentNode::Dictionary(dict) = &mut self.node else {
            return None;
        };
        let index = dict.find(key)?;
        match &mut dict.entries[index].node {
            ArgumentNode::DictEntry(entry) => Some(entry.value.as_mut()),
            _ => None,
        }
    }
}

fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> ValueError {
    ValueError::KindMismatch {
        expected: expected.into(),
        found: found.into(),
    }
}

impl ScalarArgument {
    fn assign(&mut self, value: BusValue, signature: &str) -> Result<(), ValueError> {
        if value.scalar_kind() != Some((self.kind, self.unsigned)) {
            return Err(mismatch(signature, value.describe()));
        }
        self.value = Some(value);
        Ok(())
    }
}

impl ArrayArgument {
    fn assign(
        &mut self,
        value: BusValue,
        signature: &str,
        direction: Direction,
    ) -> Result<(), ValueError> {
        let BusValue::Array(items) = value else {
            return Err(mismatch(signature, value.describe()));
        };
        let mut elements = Vec::with_capacity(items.len());
        for item in items {
            let mut element = self.new_element(direction)?;
            element.set_value(item)?;
            elements.push(element);
        }
        self.elements = elements;
        Ok(())
    }
}

impl StructArgument {
    fn assign(&mut self, value: BusValue, signature: &str) -> Result<(), ValueError> {
        let BusValue::Struct(items) = value else {
            return Err(mismatch(signature, value.describe()));
        };
        if items.len() != self.members.len() {
            return Err(ValueError::ArityMismatch {
                signature: signature.to_string(),
                expected: self.members.len(),
                found: items.len(),
            });
        }
        let mut staged = self.members.clone();
        for (member, item) in staged.iter_mut().zip(items) {
            member.set_value(item)?;
        }
        self.members = staged;
        Ok(())
    }
}

impl DictionaryArgument {
    fn assign(
        &mut self,
        value: BusValue,
        signature: &str,
        direction: Direction,
    ) -> Result<(), ValueError> {
        let BusValue::Dict(pairs) = value else {
            return Err(mismatch(signature, value.describe()));
        };
        let mut staged = Self {
            key: self.key.clone(),
            value: self.value.clone(),
            entries: Vec::with_capacity(pairs.len()),
        };
        for (key, value) in pairs {
            if staged.find(&key).is_some() {
                return Err(ValueError::DuplicateKey(key.to_string()));
            }
            let entry = staged.build_entry(key, value, direction)?;
            staged.entries.push(entry);
        }
        self.entries = staged.entries;
        Ok(())
    }

    fn build_entry(
        &self,
        key: BusValue,
        value: BusValue,
        direction: Direction,
    ) -> Result<Argument, ValueError> {
        let mut entry = self.new_entry(direction)?;
        entry.set_value(BusValue::Dict(vec![(key, value)]))?;
        Ok(entry)
    }

    /// Index of the entry whose key holds `key`.
    fn find(&self, key: &BusValue) -> Option<usize> {
        self.entries.iter().position(|entry| match &entry.node {
            ArgumentNode::DictEntry(e) => {
                e.key.value().is_some_and(|held| same_key(&held, key))
            }
            _ => false,
        })
    }
}

/// Key identity for dictionaries. Doubles compare by bit pattern so a NaN
/// key matches itself.
fn same_key(a: &BusValue, b: &BusValue) -> bool {
    match (a, b) {
        (BusValue::Double(x), BusValue::Double(y)) => x.to_bits() == y.to_bits(),
        _ => a == b,
    }
}

impl DictEntryArgument {
    fn assign(&mut self, value: BusValue, signature: &str) -> Result<(), ValueError> {
        let found = value.describe();
        let BusValue::Dict(mut pairs) = value else {
            return Err(mismatch(signature, found));
        };
        let (Some((key, value)), true) = (pairs.pop(), pairs.is_empty()) else {
            return Err(mismatch(signature, found));
        };
        let mut staged_key = self.key.clone();
        let mut staged_value = self.value.clone();
        staged_key.set_value(key)?;
        staged_value.set_value(value)?;
        self.key = staged_key;
        self.value = staged_value;
        Ok(())
    }
}

impl VariantArgument {
    fn assign(&mut self, value: BusValue, direction: Direction) -> Result<(), ValueError> {
        let (signature, inner) = match value {
            BusValue::Variant(held) => {
                let VariantValue { signature, value } = *held;
                (signature, value)
            }
            other => (other.infer_signature()?, other),
        };
        if !signature.is_single_type() {
            return Err(mismatch("v", signature.to_string()));
        }
        let mut held = decode_token(signature.as_str(), String::new(), direction)?;
        held.set_value(inner)?;
        self.held = Some(Box::new(held));
        Ok(())
    }
}

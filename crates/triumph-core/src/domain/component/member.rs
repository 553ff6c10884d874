//! Methods and signals.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::{Annotation, InterfaceRef, QualifiedName, annotations};
use crate::domain::argument::{Argument, Direction};

/// Whether a member is invoked (method) or emitted (signal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Method,
    Signal,
}

impl MemberKind {
    /// Direction an argument has when its declaration names none.
    #[must_use]
    pub const fn default_direction(self) -> Direction {
        match self {
            Self::Method => Direction::In,
            Self::Signal => Direction::Out,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Method => "method",
            Self::Signal => "signal",
        }
    }
}

bitflags! {
    /// Behavior flags set by well-known annotations.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[repr(transparent)]
    pub struct MemberFlags: u8 {
        /// `org.freedesktop.DBus.Deprecated` is `true`.
        const DEPRECATED = 0b0000_0001;
        /// `org.freedesktop.DBus.Method.NoReply` is `true`; callers should
        /// not wait for a reply.
        const NO_REPLY   = 0b0000_0010;
    }
}

/// A method or signal declared by an interface.
#[derive(Debug, Clone, Serialize)]
pub struct Member {
    kind: MemberKind,
    name: String,
    #[serde(skip)]
    owner: InterfaceRef,
    inputs: Vec<Argument>,
    outputs: Vec<Argument>,
    annotations: Vec<Annotation>,
    flags: MemberFlags,
}

impl Member {
    pub fn new(kind: MemberKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            owner: InterfaceRef::default(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            annotations: Vec::new(),
            flags: MemberFlags::empty(),
        }
    }

    pub fn method(name: impl Into<String>) -> Self {
        Self::new(MemberKind::Method, name)
    }

    pub fn signal(name: impl Into<String>) -> Self {
        Self::new(MemberKind::Signal, name)
    }

    #[must_use]
    pub const fn kind(&self) -> MemberKind {
        self.kind
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn owner(&self) -> &InterfaceRef {
        &self.owner
    }

    pub(super) fn set_owner(&mut self, owner: InterfaceRef) {
        self.owner = owner;
    }

    /// Append an argument to the input or output list, by its direction.
    pub fn add_argument(&mut self, argument: Argument) {
        match argument.direction() {
            Direction::In => self.inputs.push(argument),
            Direction::Out => self.outputs.push(argument),
        }
    }

    #[must_use]
    pub fn inputs(&self) -> &[Argument] {
        &self.inputs
    }

    #[must_use]
    pub fn outputs(&self) -> &[Argument] {
        &self.outputs
    }

    /// Input argument signatures concatenated in declaration order.
    #[must_use]
    pub fn input_signature(&self) -> String {
        self.inputs.iter().map(Argument::signature).collect()
    }

    #[must_use]
    pub fn output_signature(&self) -> String {
        self.outputs.iter().map(Argument::signature).collect()
    }

    /// Attach an annotation, updating the flags it controls.
    pub fn add_annotation(&mut self, annotation: Annotation) {
        if annotation.is_true() {
            match annotation.name.as_str() {
                annotations::DEPRECATED => self.flags |= MemberFlags::DEPRECATED,
                annotations::NO_REPLY => self.flags |= MemberFlags::NO_REPLY,
                _ => {}
            }
        }
        self.annotations.push(annotation);
    }

    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    #[must_use]
    pub const fn flags(&self) -> MemberFlags {
        self.flags
    }

    #[must_use]
    pub const fn is_deprecated(&self) -> bool {
        self.flags.contains(MemberFlags::DEPRECATED)
    }

    #[must_use]
    pub const fn is_no_reply(&self) -> bool {
        self.flags.contains(MemberFlags::NO_REPLY)
    }

    #[must_use]
    pub fn qualified_name(&self) -> QualifiedName {
        self.owner.qualified_name().with_member(&self.name)
    }
}

impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.qualified_name() == other.qualified_name()
    }
}

impl Eq for Member {}

impl std::hash::Hash for Member {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.qualified_name().hash(state);
    }
}

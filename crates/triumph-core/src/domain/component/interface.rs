//! Interfaces, properties and annotations.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::member::{Member, MemberKind};
use super::{InterfaceRef, ObjectRef, QualifiedName};
use crate::domain::argument::Attribute;
use crate::domain::signature::Signature;

/// Well-known annotation names.
pub mod annotations {
    pub const DEPRECATED: &str = "org.freedesktop.DBus.Deprecated";
    pub const NO_REPLY: &str = "org.freedesktop.DBus.Method.NoReply";
    pub const SECURE: &str = "org.alljoyn.Bus.Secure";
}

/// A name/value annotation on an interface or one of its members.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    pub value: String,
}

impl Annotation {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Whether the value is the literal `true`.
    #[must_use]
    pub fn is_true(&self) -> bool {
        self.value == "true"
    }
}

bitflags! {
    /// Read/write access of a property.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[repr(transparent)]
    pub struct Access: u8 {
        const READ  = 0b0000_0001;
        const WRITE = 0b0000_0010;
    }
}

impl Default for Access {
    /// Properties that declare no access are readable and writable.
    fn default() -> Self {
        Self::READ | Self::WRITE
    }
}

impl Access {
    /// Parse an `access` attribute value such as `read`, `write` or
    /// `readwrite`. `None` means the attribute was absent.
    #[must_use]
    pub fn from_attribute(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return Self::default();
        };
        let mut access = Self::empty();
        if value.contains("read") {
            access |= Self::READ;
        }
        if value.contains("write") {
            access |= Self::WRITE;
        }
        access
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match (self.contains(Self::READ), self.contains(Self::WRITE)) {
            (true, true) => "readwrite",
            (true, false) => "read",
            (false, true) => "write",
            (false, false) => "none",
        }
    }
}

/// A property declared by an interface.
#[derive(Debug, Clone, Serialize)]
pub struct Property {
    name: String,
    #[serde(skip)]
    owner: InterfaceRef,
    signature: Signature,
    access: Access,
    attributes: Vec<Attribute>,
    annotations: Vec<Annotation>,
}

impl Property {
    pub fn new(name: impl Into<String>, signature: Signature, access: Access) -> Self {
        Self {
            name: name.into(),
            owner: InterfaceRef::default(),
            signature,
            access,
            attributes: Vec::new(),
            annotations: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn owner(&self) -> &InterfaceRef {
        &self.owner
    }

    #[must_use]
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    #[must_use]
    pub const fn access(&self) -> Access {
        self.access
    }

    #[must_use]
    pub const fn is_readable(&self) -> bool {
        self.access.contains(Access::READ)
    }

    #[must_use]
    pub const fn is_writable(&self) -> bool {
        self.access.contains(Access::WRITE)
    }

    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.key == key) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute { key, value }),
        }
    }

    pub fn add_annotation(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        self.annotations
            .iter()
            .any(|a| a.name == annotations::DEPRECATED && a.is_true())
    }

    #[must_use]
    pub fn qualified_name(&self) -> QualifiedName {
        self.owner.qualified_name().with_member(&self.name)
    }
}

impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.qualified_name() == other.qualified_name()
    }
}

impl Eq for Property {}

impl std::hash::Hash for Property {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.qualified_name().hash(state);
    }
}

/// An interface implemented by an object.
///
/// Members and properties added here are re-parented onto this interface.
#[derive(Debug, Clone, Serialize)]
pub struct Interface {
    name: String,
    #[serde(skip)]
    owner: ObjectRef,
    methods: Vec<Member>,
    signals: Vec<Member>,
    properties: Vec<Property>,
    annotations: Vec<Annotation>,
    secure: bool,
}

impl Interface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: ObjectRef::default(),
            methods: Vec::new(),
            signals: Vec::new(),
            properties: Vec::new(),
            annotations: Vec::new(),
            secure: false,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn owner(&self) -> &ObjectRef {
        &self.owner
    }

    fn self_ref(&self) -> InterfaceRef {
        InterfaceRef {
            service: self.owner.service.clone(),
            path: self.owner.path.clone(),
            interface: self.name.clone(),
        }
    }

    pub(super) fn set_owner(&mut self, owner: ObjectRef) {
        self.owner = owner;
        let me = self.self_ref();
        for member in self.methods.iter_mut().chain(self.signals.iter_mut()) {
            member.set_owner(me.clone());
        }
        for property in &mut self.properties {
            property.owner = me.clone();
        }
    }

    /// Add a method or signal, routed by its kind.
    pub fn add_member(&mut self, mut member: Member) {
        member.set_owner(self.self_ref());
        match member.kind() {
            MemberKind::Method => self.methods.push(member),
            MemberKind::Signal => self.signals.push(member),
        }
    }

    pub fn add_property(&mut self, mut property: Property) {
        property.owner = self.self_ref();
        self.properties.push(property);
    }

    pub fn add_annotation(&mut self, annotation: Annotation) {
        if annotation.name == annotations::SECURE && annotation.is_true() {
            self.secure = true;
        }
        self.annotations.push(annotation);
    }

    #[must_use]
    pub fn methods(&self) -> &[Member] {
        &self.methods
    }

    #[must_use]
    pub fn signals(&self) -> &[Member] {
        &self.signals
    }

    #[must_use]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    #[must_use]
    pub const fn is_secure(&self) -> bool {
        self.secure
    }

    #[must_use]
    pub fn method(&self, name: &str) -> Option<&Member> {
        self.methods.iter().find(|m| m.name() == name)
    }

    #[must_use]
    pub fn signal(&self, name: &str) -> Option<&Member> {
        self.signals.iter().find(|m| m.name() == name)
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// Total number of methods, signals and properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len() + self.signals.len() + self.properties.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn qualified_name(&self) -> QualifiedName {
        self.self_ref().qualified_name()
    }
}

impl PartialEq for Interface {
    fn eq(&self, other: &Self) -> bool {
        self.qualified_name() == other.qualified_name()
    }
}

impl Eq for Interface {}

impl std::hash::Hash for Interface {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.qualified_name().hash(state);
    }
}

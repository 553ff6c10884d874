//! Component model: the discovered graph of a service.
//!
//! Service → Object → Interface → {Method, Signal, Property}. Ownership is
//! strictly downward. Children keep a non-owning reference to their parent,
//! used only to qualify names, and identity of every component is its
//! qualified name.
//!
//! A service's graph is produced by one crawl and replaced wholesale on the
//! next one. Lookups are linear scans over children.
//!
//! # Structure
//!
//! - `interface` - interfaces, properties and annotations
//! - `member` - methods and signals
//! - `path` - object path qualification
//! - `filter` - member selection for display
//! - `directory` - atomically swapped per-service graphs

mod directory;
mod filter;
mod interface;
mod member;
pub mod path;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use directory::ServiceDirectory;
pub use filter::{ComponentFilter, FilteredMember};
pub use interface::{Access, Annotation, Interface, Property, annotations};
pub use member::{Member, MemberFlags, MemberKind};

// =============================================================================
// Qualified names
// =============================================================================

/// Service, object path, interface and member, as far as each applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct QualifiedName {
    pub service: String,
    pub path: Option<String>,
    pub interface: Option<String>,
    pub member: Option<String>,
}

impl QualifiedName {
    fn with_member(mut self, member: &str) -> Self {
        self.member = Some(member.to_string());
        self
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.service)?;
        if let Some(path) = &self.path {
            write!(f, ":{path}")?;
        }
        if let Some(interface) = &self.interface {
            write!(f, " {interface}")?;
        }
        if let Some(member) = &self.member {
            write!(f, ".{member}")?;
        }
        Ok(())
    }
}

/// Back-reference from an interface to the object that owns it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub service: String,
    pub path: String,
}

impl ObjectRef {
    #[must_use]
    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName {
            service: self.service.clone(),
            path: Some(self.path.clone()),
            ..QualifiedName::default()
        }
    }
}

/// Back-reference from a member or property to its interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct InterfaceRef {
    pub service: String,
    pub path: String,
    pub interface: String,
}

impl InterfaceRef {
    #[must_use]
    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName {
            service: self.service.clone(),
            path: Some(self.path.clone()),
            interface: Some(self.interface.clone()),
            member: None,
        }
    }
}

// =============================================================================
// Service
// =============================================================================

/// Whether a service is hosted by this process or by a remote peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Local,
    #[default]
    Remote,
}

/// A well-known or unique bus name and the objects reachable under it.
#[derive(Debug, Clone, Serialize)]
pub struct Service {
    name: String,
    kind: ServiceKind,
    objects: Vec<BusObject>,
}

impl Service {
    pub fn new(name: impl Into<String>, kind: ServiceKind) -> Self {
        Self {
            name: name.into(),
            kind,
            objects: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> ServiceKind {
        self.kind
    }

    #[must_use]
    pub fn objects(&self) -> &[BusObject] {
        &self.objects
    }

    /// Replace the whole object graph, re-parenting every object.
    pub fn replace_objects(&mut self, objects: Vec<BusObject>) {
        self.objects = objects;
        for object in &mut self.objects {
            object.set_service(&self.name);
        }
    }

    /// Add one object, replacing any existing object at the same path.
    ///
    /// Returns the object that was replaced.
    pub fn add_object(&mut self, mut object: BusObject) -> Option<BusObject> {
        object.set_service(&self.name);
        match self.objects.iter().position(|o| o.path == object.path) {
            Some(index) => Some(std::mem::replace(&mut self.objects[index], object)),
            None => {
                self.objects.push(object);
                None
            }
        }
    }

    #[must_use]
    pub fn object(&self, path: &str) -> Option<&BusObject> {
        self.objects.iter().find(|o| o.path == path)
    }

    #[must_use]
    pub fn interface(&self, path: &str, interface: &str) -> Option<&Interface> {
        self.object(path)?.interface(interface)
    }

    /// Look up a method or signal by its qualified name.
    #[must_use]
    pub fn member(&self, path: &str, interface: &str, member: &str) -> Option<&Member> {
        let iface = self.interface(path, interface)?;
        iface.method(member).or_else(|| iface.signal(member))
    }

    #[must_use]
    pub fn property(&self, path: &str, interface: &str, property: &str) -> Option<&Property> {
        self.interface(path, interface)?.property(property)
    }

    #[must_use]
    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName {
            service: self.name.clone(),
            ..QualifiedName::default()
        }
    }
}

impl PartialEq for Service {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Service {}

impl std::hash::Hash for Service {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

// =============================================================================
// Object
// =============================================================================

/// An object at an absolute path and the interfaces it implements.
#[derive(Debug, Clone, Serialize)]
pub struct BusObject {
    path: String,
    #[serde(skip)]
    service: String,
    interfaces: Vec<Interface>,
    /// Absolute paths of the child nodes the object advertised.
    children: Vec<String>,
}

impl BusObject {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            service: String::new(),
            interfaces: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Name of the owning service; empty until the object is attached.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    fn self_ref(&self) -> ObjectRef {
        ObjectRef {
            service: self.service.clone(),
            path: self.path.clone(),
        }
    }

    fn set_service(&mut self, service: &str) {
        service.clone_into(&mut self.service);
        let me = self.self_ref();
        for interface in &mut self.interfaces {
            interface.set_owner(me.clone());
        }
    }

    /// Add an interface, replacing any existing one with the same name.
    pub fn add_interface(&mut self, mut interface: Interface) {
        interface.set_owner(self.self_ref());
        match self
            .interfaces
            .iter()
            .position(|i| i.name() == interface.name())
        {
            Some(index) => self.interfaces[index] = interface,
            None => self.interfaces.push(interface),
        }
    }

    #[must_use]
    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    #[must_use]
    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|i| i.name() == name)
    }

    pub fn add_child(&mut self, path: impl Into<String>) {
        let path = path.into();
        if !self.children.contains(&path) {
            self.children.push(path);
        }
    }

    #[must_use]
    pub fn children(&self) -> &[String] {
        &self.children
    }

    #[must_use]
    pub fn qualified_name(&self) -> QualifiedName {
        self.self_ref().qualified_name()
    }
}

impl PartialEq for BusObject {
    fn eq(&self, other: &Self) -> bool {
        self.qualified_name() == other.qualified_name()
    }
}

impl Eq for BusObject {}

impl std::hash::Hash for BusObject {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.qualified_name().hash(state);
    }
}

//! Member selection for display.

use serde::{Deserialize, Serialize};

use super::{InterfaceRef, Member, MemberKind, Property, Service};

/// Selects interface members by owner, name prefix and kind.
///
/// An unset object or interface matches everything. The name prefix is
/// matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentFilter {
    pub object: Option<String>,
    pub interface: Option<String>,
    name: String,
    pub show_methods: bool,
    pub show_signals: bool,
    pub show_properties: bool,
}

impl Default for ComponentFilter {
    fn default() -> Self {
        Self {
            object: None,
            interface: None,
            name: String::new(),
            show_methods: true,
            show_signals: true,
            show_properties: true,
        }
    }
}

/// A member or property that passed a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilteredMember<'a> {
    Method(&'a Member),
    Signal(&'a Member),
    Property(&'a Property),
}

impl FilteredMember<'_> {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Method(m) | Self::Signal(m) => m.name(),
            Self::Property(p) => p.name(),
        }
    }
}

impl ComponentFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name prefix; stored trimmed and lower-cased.
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.set_name(name);
        self
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.trim().to_lowercase();
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn with_object(mut self, path: impl Into<String>) -> Self {
        self.object = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interface = Some(interface.into());
        self
    }

    /// Turn every kind on. Passing `false` leaves the current choice alone.
    pub fn set_show_all(&mut self, show: bool) {
        if show {
            self.show_methods = true;
            self.show_signals = true;
            self.show_properties = true;
        }
    }

    fn matches_owner(&self, owner: &InterfaceRef) -> bool {
        self.object.as_deref().is_none_or(|path| owner.path == path)
            && self
                .interface
                .as_deref()
                .is_none_or(|name| owner.interface == name)
    }

    fn matches_name(&self, name: &str) -> bool {
        name.to_lowercase().starts_with(&self.name)
    }

    #[must_use]
    pub fn matches_member(&self, member: &Member) -> bool {
        let shown = match member.kind() {
            MemberKind::Method => self.show_methods,
            MemberKind::Signal => self.show_signals,
        };
        shown && self.matches_owner(member.owner()) && self.matches_name(member.name())
    }

    #[must_use]
    pub fn matches_property(&self, property: &Property) -> bool {
        self.show_properties
            && self.matches_owner(property.owner())
            && self.matches_name(property.name())
    }

    /// Every member of `service` that passes, in graph order.
    #[must_use]
    pub fn apply<'a>(&self, service: &'a Service) -> Vec<FilteredMember<'a>> {
        let mut selected = Vec::new();
        for interface in service.objects().iter().flat_map(|o| o.interfaces()) {
            selected.extend(
                interface
                    .methods()
                    .iter()
                    .filter(|m| self.matches_member(m))
                    .map(FilteredMember::Method),
            );
            selected.extend(
                interface
                    .signals()
                    .iter()
                    .filter(|m| self.matches_member(m))
                    .map(FilteredMember::Signal),
            );
            selected.extend(
                interface
                    .properties()
                    .iter()
                    .filter(|p| self.matches_property(p))
                    .map(FilteredMember::Property),
            );
        }
        selected
    }
}

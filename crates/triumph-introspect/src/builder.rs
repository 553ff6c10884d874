//! Introspection elements to components.

use roxmltree::Node;
use tracing::{debug, warn};
use triumph_core::domain::component::path::child_path;
use triumph_core::{
    Access, Annotation, BusObject, Direction, Interface, Member, MemberKind, Property, Signature,
    decode,
};

use crate::decode::decode_arg;
use crate::error::{BuildError, BuildResult};
use crate::xml;

/// Whether a `<node>` element describes an object.
///
/// A node is an object if it declares at least one interface, or if it has
/// no element children at all.
pub fn is_object(node: Node<'_, '_>) -> bool {
    if !node.has_tag_name(xml::NODE) {
        return false;
    }
    let mut children = xml::elements(node).peekable();
    children.peek().is_none() || xml::elements(node).any(|c| c.has_tag_name(xml::INTERFACE))
}

/// Absolute paths of the named `<node>` children of `node`.
pub fn child_paths(node: Node<'_, '_>, parent: &str) -> Vec<String> {
    xml::elements(node)
        .filter(|c| c.has_tag_name(xml::NODE))
        .filter_map(|child| match child.attribute(xml::NAME) {
            Some(name) => Some(child_path(parent, name)),
            None => {
                warn!(parent, "Skipping child node without a name");
                None
            }
        })
        .collect()
}

/// Names of the interfaces declared directly under `node`.
pub fn interface_names(node: Node<'_, '_>) -> Vec<String> {
    xml::elements(node)
        .filter(|c| c.has_tag_name(xml::INTERFACE))
        .filter_map(|c| c.attribute(xml::NAME))
        .map(str::to_string)
        .collect()
}

/// Build the object at `path` from its `<node>` element.
pub fn build_object(node: Node<'_, '_>, path: &str) -> BuildResult<BusObject> {
    let mut object = BusObject::new(path);
    for child in xml::elements(node) {
        if child.has_tag_name(xml::INTERFACE) {
            object.add_interface(build_interface(child)?);
        }
    }
    for child in child_paths(node, path) {
        if child != path {
            object.add_child(child);
        }
    }
    Ok(object)
}

pub fn build_interface(node: Node<'_, '_>) -> BuildResult<Interface> {
    let name = required(node, xml::INTERFACE, xml::NAME)?;
    let mut interface = Interface::new(name);

    for child in xml::elements(node) {
        match child.tag_name().name() {
            xml::METHOD => interface.add_member(build_member(child, MemberKind::Method)?),
            xml::SIGNAL => interface.add_member(build_member(child, MemberKind::Signal)?),
            xml::PROPERTY => interface.add_property(build_property(child)?),
            xml::ANNOTATION => {
                if let Some(annotation) = build_annotation(child) {
                    interface.add_annotation(annotation);
                }
            }
            other => debug!(interface = name, element = other, "Ignoring unknown interface child"),
        }
    }
    Ok(interface)
}

/// Build a method or signal. Arguments without a `direction` default to
/// `in` for methods and `out` for signals.
pub fn build_member(node: Node<'_, '_>, kind: MemberKind) -> BuildResult<Member> {
    let element = match kind {
        MemberKind::Method => xml::METHOD,
        MemberKind::Signal => xml::SIGNAL,
    };
    let name = required(node, element, xml::NAME)?;
    let mut member = Member::new(kind, name);

    for child in xml::elements(node) {
        if child.has_tag_name(xml::ARG) {
            member.add_argument(decode_arg(child, kind.default_direction())?);
        } else if child.has_tag_name(xml::ANNOTATION) {
            if let Some(annotation) = build_annotation(child) {
                member.add_annotation(annotation);
            }
        }
    }
    Ok(member)
}

/// Build a property. The `type` attribute is required; a missing `access`
/// attribute means read and write.
pub fn build_property(node: Node<'_, '_>) -> BuildResult<Property> {
    let name = required(node, xml::PROPERTY, xml::NAME)?;
    let signature = required(node, xml::PROPERTY, xml::TYPE)?;
    let signature = decode(signature, name, Direction::Out)
        .and_then(|value| Signature::parse(value.signature()))
        .map_err(|source| BuildError::Signature {
            element: xml::PROPERTY,
            name: name.to_string(),
            source,
        })?;
    let access = Access::from_attribute(node.attribute(xml::ACCESS));

    let mut property = Property::new(name, signature, access);
    for attribute in node.attributes().filter(|a| a.name() != xml::NAME) {
        property.set_attribute(attribute.name(), attribute.value());
    }
    for child in xml::elements(node).filter(|c| c.has_tag_name(xml::ANNOTATION)) {
        if let Some(annotation) = build_annotation(child) {
            property.add_annotation(annotation);
        }
    }
    Ok(property)
}

/// Build an annotation, or `None` (with a warning) if it lacks a name or value.
pub fn build_annotation(node: Node<'_, '_>) -> Option<Annotation> {
    match (node.attribute(xml::NAME), node.attribute(xml::VALUE)) {
        (Some(name), Some(value)) => Some(Annotation::new(name, value)),
        _ => {
            warn!("Skipping annotation without name or value");
            None
        }
    }
}

fn required<'a>(
    node: Node<'a, '_>,
    element: &'static str,
    attribute: &'static str,
) -> BuildResult<&'a str> {
    node.attribute(attribute)
        .ok_or(BuildError::MissingAttribute { element, attribute })
}

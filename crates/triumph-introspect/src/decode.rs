//! `<arg>` elements to argument nodes.
//!
//! Reads the element's attributes and hands the signature to the core
//! decoder, so XML and signature-string construction share one dispatch.

use roxmltree::Node;
use tracing::warn;
use triumph_core::{Argument, Direction, decode};

use crate::error::{BuildError, BuildResult};
use crate::xml;

/// Decode one `<arg>` element.
///
/// A `direction` attribute overrides `default_direction`. Every XML
/// attribute is kept on the node, and nested annotations are recorded as
/// attributes keyed by the annotation name.
pub fn decode_arg(node: Node<'_, '_>, default_direction: Direction) -> BuildResult<Argument> {
    let name = node.attribute(xml::NAME).unwrap_or_default();
    let signature = node
        .attribute(xml::TYPE)
        .ok_or(BuildError::MissingAttribute {
            element: xml::ARG,
            attribute: xml::TYPE,
        })?;
    let direction = match node.attribute(xml::DIRECTION) {
        Some(value) => value.parse()?,
        None => default_direction,
    };

    let mut argument =
        decode(signature, name, direction).map_err(|source| BuildError::Signature {
            element: xml::ARG,
            name: name.to_string(),
            source,
        })?;

    for attribute in node.attributes() {
        argument.set_attribute(attribute.name(), attribute.value());
    }
    for annotation in xml::elements(node).filter(|c| c.has_tag_name(xml::ANNOTATION)) {
        match (annotation.attribute(xml::NAME), annotation.attribute(xml::VALUE)) {
            (Some(key), Some(value)) => argument.set_attribute(key, value),
            _ => warn!(arg = name, "Skipping argument annotation without name or value"),
        }
    }
    Ok(argument)
}

#[cfg(test)]
mod tests {
    use super::*;
    use triumph_core::SignatureError;

    fn first_arg(doc: &str, default: Direction) -> BuildResult<Argument> {
        let doc = xml::parse(doc).unwrap();
        decode_arg(doc.root_element(), default)
    }

    #[test]
    fn test_default_direction_applies() {
        let arg = first_arg(r#"<arg name="x" type="i"/>"#, Direction::Out).unwrap();
        assert_eq!(arg.direction(), Direction::Out);
        assert_eq!(arg.label(), "int32 x");
    }

    #[test]
    fn test_direction_attribute_overrides() {
        let arg = first_arg(r#"<arg type="s" direction="out"/>"#, Direction::In).unwrap();
        assert_eq!(arg.direction(), Direction::Out);
        assert_eq!(arg.attribute("direction"), Some("out"));
        assert_eq!(arg.name(), "");
    }

    #[test]
    fn test_missing_type_is_an_error() {
        let err = first_arg(r#"<arg name="x"/>"#, Direction::In).unwrap_err();
        assert!(matches!(
            err,
            BuildError::MissingAttribute {
                attribute: "type",
                ..
            }
        ));
    }

    #[test]
    fn test_bad_direction_and_signature() {
        assert!(matches!(
            first_arg(r#"<arg type="i" direction="sideways"/>"#, Direction::In).unwrap_err(),
            BuildError::Direction(_)
        ));
        assert!(matches!(
            first_arg(r#"<arg name="m" type="a{s"/>"#, Direction::In).unwrap_err(),
            BuildError::Signature {
                source: SignatureError::Malformed { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_annotations_become_attributes() {
        let arg = first_arg(
            r#"<arg name="d" type="a{sv}">
                 <annotation name="org.qtproject.QtDBus.QtTypeName" value="QVariantMap"/>
               </arg>"#,
            Direction::In,
        )
        .unwrap();
        assert_eq!(
            arg.attribute("org.qtproject.QtDBus.QtTypeName"),
            Some("QVariantMap")
        );
        assert_eq!(arg.signature(), "a{sv}");
    }
}

//! Indented trees for argument nodes and service graphs.

use triumph_core::{Argument, ComponentFilter, Direction, Interface, Member, Property, Service, decode};

const INDENT: &str = "  ";

/// One line per node: label and derived signature, children indented.
#[must_use]
pub fn argument_lines(argument: &Argument) -> Vec<String> {
    let mut lines = Vec::new();
    push_argument(&mut lines, argument, 0);
    lines
}

fn push_argument(lines: &mut Vec<String>, argument: &Argument, depth: usize) {
    let signature = argument.signature();
    let line = if signature.is_empty() {
        argument.label()
    } else {
        format!("{}  [{signature}]", argument.label())
    };
    lines.push(format!("{}{line}", INDENT.repeat(depth)));
    for child in argument.children() {
        push_argument(lines, child, depth + 1);
    }
}

/// E.g. `method Echo(string text) -> (string reply) [deprecated]`.
#[must_use]
pub fn member_line(member: &Member) -> String {
    let mut line = format!(
        "{} {}({})",
        member.kind().as_str(),
        member.name(),
        labels(member.inputs())
    );
    if !member.outputs().is_empty() {
        line.push_str(&format!(" -> ({})", labels(member.outputs())));
    }
    if member.is_deprecated() {
        line.push_str(" [deprecated]");
    }
    if member.is_no_reply() {
        line.push_str(" [no reply]");
    }
    line
}

/// E.g. `property unsigned int32 Count [read]`.
#[must_use]
pub fn property_line(property: &Property) -> String {
    let label = decode(property.signature().as_str(), property.name(), Direction::Out)
        .map_or_else(
            |_| format!("{} {}", property.signature(), property.name()),
            |arg| arg.label(),
        );
    let mut line = format!("property {label} [{}]", property.access().label());
    if property.is_deprecated() {
        line.push_str(" [deprecated]");
    }
    line
}

/// The service, its objects, their interfaces and every member that passes
/// `filter`.
#[must_use]
pub fn service_lines(service: &Service, filter: &ComponentFilter) -> Vec<String> {
    let kind = match service.kind() {
        triumph_core::ServiceKind::Local => "local",
        triumph_core::ServiceKind::Remote => "remote",
    };
    let mut lines = vec![format!("{} ({kind})", service.name())];
    for object in service.objects() {
        if filter.object.as_deref().is_some_and(|path| path != object.path()) {
            continue;
        }
        lines.push(format!("{INDENT}{}", object.path()));
        for interface in object.interfaces() {
            if filter
                .interface
                .as_deref()
                .is_some_and(|name| name != interface.name())
            {
                continue;
            }
            push_interface(&mut lines, interface, filter);
        }
    }
    lines
}

fn push_interface(lines: &mut Vec<String>, interface: &Interface, filter: &ComponentFilter) {
    let secure = if interface.is_secure() { " (secure)" } else { "" };
    lines.push(format!("{INDENT}{INDENT}{}{secure}", interface.name()));
    let depth = INDENT.repeat(3);
    for member in interface.methods().iter().chain(interface.signals()) {
        if filter.matches_member(member) {
            lines.push(format!("{depth}{}", member_line(member)));
        }
    }
    for property in interface.properties() {
        if filter.matches_property(property) {
            lines.push(format!("{depth}{}", property_line(property)));
        }
    }
}

fn labels(arguments: &[Argument]) -> String {
    arguments
        .iter()
        .map(Argument::label)
        .collect::<Vec<_>>()
        .join(", ")
}

#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    Access, Annotation, Argument, ArgumentNode, BusObject, BusValue, ComponentFilter, Direction,
    FilteredMember, Interface, MalformedReason, Member, MemberFlags, MemberKind, Property,
    QualifiedName, ScalarKind, Service, ServiceDirectory, ServiceKind, Signature, SignatureError,
    ValueError, VariantValue, decode, from_value, split,
};
pub use ports::{BusSessionPort, NoopBusSession, RegistrationStatus, SessionError};
pub use settings::{CrawlSettings, CrawlSettingsUpdate, SettingsError, validate_settings};

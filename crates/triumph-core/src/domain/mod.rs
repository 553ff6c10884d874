//! Domain types.
//!
//! Signatures and values at the bottom, argument trees built from them, and
//! the component graph that owns argument lists.

pub mod argument;
pub mod component;
pub mod signature;
pub mod value;

pub use argument::{
    Argument, ArgumentNode, ArrayArgument, Attribute, DictEntryArgument, DictionaryArgument,
    Direction, ParseDirectionError, ScalarArgument, StructArgument, VariantArgument, decode,
    from_value,
};
pub use component::{
    Access, Annotation, BusObject, ComponentFilter, FilteredMember, Interface, InterfaceRef,
    Member, MemberFlags, MemberKind, ObjectRef, Property, QualifiedName, Service,
    ServiceDirectory, ServiceKind,
};
pub use signature::{MalformedReason, ScalarKind, Signature, SignatureError, split};
pub use value::{BusValue, ValueError, VariantValue};

//! Message and enum auto-registration via the inventory crate.
//!
//! `#[derive(SchemaMessage)]` and `#[derive(SchemaEnum)]` submit a registration for every
//! schema type, so tools can enumerate the bridged surface and look messages up by the
//! legacy type they correspond to.

use crate::types::RecordDescriptor;

/// Metadata for a schema message, submitted by the `SchemaMessage` derive.
pub struct MessageRegistration {
    /// The Rust type name (e.g. "WaitOptions")
    pub type_name: &'static str,
    /// Legacy type the message corresponds to, if declared
    pub legacy_alias: Option<&'static str>,
    pub descriptor_fn: fn() -> &'static RecordDescriptor,
}

/// Metadata for a schema enum, submitted by the `SchemaEnum` derive.
pub struct EnumRegistration {
    pub type_name: &'static str,
    /// Wire name of the legacy enum
    pub legacy_type_name: &'static str,
    /// `(schema variant, legacy identifier)` pairs
    pub table_fn: fn() -> Vec<(&'static str, &'static str)>,
}

inventory::collect!(MessageRegistration);
inventory::collect!(EnumRegistration);

pub fn registered_messages() -> impl Iterator<Item = &'static MessageRegistration> {
    inventory::iter::<MessageRegistration>()
}

pub fn registered_enums() -> impl Iterator<Item = &'static EnumRegistration> {
    inventory::iter::<EnumRegistration>()
}

/// Schema message aliased to a legacy type.
///
/// When several messages share an alias the one with the lowest type name wins.
pub fn message_for_legacy(legacy_name: &str) -> Option<&'static MessageRegistration> {
    registered_messages()
        .filter(|registration| registration.legacy_alias == Some(legacy_name))
        .min_by_key(|registration| registration.type_name)
}

pub fn message_by_name(type_name: &str) -> Option<&'static MessageRegistration> {
    registered_messages().find(|registration| registration.type_name == type_name)
}

pub fn enum_by_name(type_name: &str) -> Option<&'static EnumRegistration> {
    registered_enums().find(|registration| registration.type_name == type_name)
}

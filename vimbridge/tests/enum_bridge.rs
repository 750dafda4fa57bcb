use vimbridge::examples::{v1, vim};
use vimbridge::registry::{enum_by_name, message_by_name, message_for_legacy, registered_enums};
use vimbridge::{EnumUndefined, LegacyEnum, Record, SchemaEnum, from_legacy, to_legacy};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn check_bridge<E: SchemaEnum + Copy + PartialEq + std::fmt::Debug>() {
    for value in E::variants() {
        if value.is_unspecified() {
            assert_eq!(value.to_legacy().err(), Some(EnumUndefined::new(E::NAME, value.number())));
            assert!(value.must_to_legacy().is_none());
            continue;
        }
        let legacy = value.to_legacy().unwrap();
        let mut back = E::UNSPECIFIED;
        back.from_legacy(legacy.as_str());
        assert_eq!(back, *value);
        assert_eq!(E::from_number(value.number()), Some(*value));
    }

    for identifier in <E::Legacy as LegacyEnum>::identifiers() {
        let mut value = E::UNSPECIFIED;
        value.from_legacy(identifier);
        assert!(!value.is_unspecified(), "{identifier} has no schema value");
        assert_eq!(value.to_legacy().map(|legacy| legacy.as_str()), Ok(*identifier));
    }

    assert_eq!(E::bridge_table().len(), E::variants().len() - 1);
    assert_eq!(E::bridge_table().len(), <E::Legacy as LegacyEnum>::identifiers().len());
    assert!(E::number_to_legacy(99).is_err());
    assert_eq!(E::UNSPECIFIED.number(), 0);
}

#[test]
fn every_specified_value_round_trips() {
    check_bridge::<v1::PropertyChangeOp>();
    check_bridge::<v1::TaskInfoState>();
}

#[test]
fn prefixed_variants_map_to_plain_identifiers() {
    assert_eq!(v1::TaskInfoState::TaskInfoStateSuccess.to_legacy(), Ok(vim::TaskInfoState::Success));
    assert_eq!(vim::TaskInfoState::Success.as_str(), "success");
    assert_eq!(vim::PropertyChangeOp::IndirectRemove.as_str(), "indirectRemove");
    assert_eq!(
        v1::PropertyChangeOp::bridge_table(),
        vec![
            ("Add", "add"),
            ("Remove", "remove"),
            ("Assign", "assign"),
            ("IndirectRemove", "indirectRemove"),
        ]
    );
}

#[test]
fn unknown_identifiers_leave_the_value_unchanged() {
    let mut op = v1::PropertyChangeOp::Remove;
    op.from_legacy("rename");
    assert_eq!(op, v1::PropertyChangeOp::Remove);
    assert_eq!(vim::PropertyChangeOp::parse("rename"), None);
}

#[test]
fn undefined_numbers_are_reported() {
    let err = v1::PropertyChangeOp::number_to_legacy(42).unwrap_err();
    assert_eq!(err.number, 42);
    assert_eq!(err.to_string(), "enum PropertyChangeOp value 42 is undefined or unspecified");
}

#[test]
fn enum_fields_convert_through_identifiers() {
    init();
    let legacy = vim::PropertyChange {
        name: "config.name".into(),
        op: vim::PropertyChangeOp::Assign,
        val: serde_json::json!("vm-1"),
    };
    let mut schema = v1::PropertyChange::default();
    from_legacy(&legacy, &mut schema).unwrap();
    assert_eq!(schema.op, v1::PropertyChangeOp::Assign);
    assert_eq!(schema.val, Some(serde_json::json!("vm-1")));

    let mut back = vim::PropertyChange::default();
    to_legacy(&schema, &mut back).unwrap();
    assert_eq!(back, legacy);
}

#[test]
fn unspecified_enum_leaves_legacy_enum_untouched() {
    init();
    let schema = v1::PropertyChange {
        name: "summary".into(),
        op: v1::PropertyChangeOp::Unspecified,
        val: None,
    };
    let mut legacy = vim::PropertyChange {
        op: vim::PropertyChangeOp::Remove,
        ..Default::default()
    };
    to_legacy(&schema, &mut legacy).unwrap();
    assert_eq!(legacy.op, vim::PropertyChangeOp::Remove);
    assert_eq!(legacy.name, "summary");
    assert!(legacy.val.is_null());
}

#[test]
fn registry_lists_bridged_types() {
    let message = message_for_legacy("VstorageObjectVCenterQueryChangedDiskAreasRequestType").unwrap();
    assert_eq!(message.type_name, "VstorageObjectVCenterQueryChangedDiskAreas");
    assert_eq!(
        (message.descriptor_fn)().type_id,
        v1::VstorageObjectVCenterQueryChangedDiskAreas::descriptor().type_id
    );
    assert_eq!(message_by_name("WaitOptions").and_then(|m| m.legacy_alias), Some("WaitOptions"));
    assert!(message_for_legacy("NoSuchType").is_none());

    let op = enum_by_name("PropertyChangeOp").unwrap();
    assert_eq!(op.legacy_type_name, "PropertyChangeOp");
    assert_eq!((op.table_fn)(), v1::PropertyChangeOp::bridge_table());
    assert!(registered_enums().any(|registration| registration.type_name == "TaskInfoState"));
}

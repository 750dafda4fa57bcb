//! End-to-end walkthrough over the sample model: legacy objects in, schema messages out, and back.

use log::info;

use crate::errors::ConvertError;
use crate::examples::{v1, vim};
use crate::{Poly, SchemaEnum, from_legacy, to_legacy};

pub fn run() -> Result<(), ConvertError> {
    let legacy = vim::NetworkProfile {
        apply_profile: vim::ApplyProfile {
            enabled: true,
            ..Default::default()
        },
        vswitch: vec![
            vim::VirtualSwitchProfile {
                key: "key-1".into(),
                name: "vSwitch0".into(),
                ..Default::default()
            },
            vim::VirtualSwitchProfile {
                key: "key-21".into(),
                name: "vSwitch1".into(),
                ..Default::default()
            },
        ],
    };
    let mut profile = v1::NetworkProfile::default();
    from_legacy(&legacy, &mut profile)?;
    info!("network profile: enabled={} switches={}", profile.enabled, profile.vswitch.len());

    let change = vim::PropertyChange {
        name: "runtime.powerState".into(),
        op: vim::PropertyChangeOp::Assign,
        val: serde_json::json!("poweredOn"),
    };
    let mut converted = v1::PropertyChange::default();
    from_legacy(&change, &mut converted)?;
    info!("property change op {:?} -> {:?}", converted.op, converted.op.must_to_legacy());

    let limit: Box<dyn vim::Fault> = Box::new(vim::VmLimitLicense {
        limit: 10,
        ..Default::default()
    });
    let fault = vim::LocalizedMethodFault {
        fault: Some(Poly::new(limit)),
        localized_message: "license limit reached".into(),
    };
    let mut schema_fault = v1::LocalizedMethodFault::default();
    from_legacy(&fault, &mut schema_fault)?;

    let mut back = vim::LocalizedMethodFault::default();
    to_legacy(&schema_fault, &mut back)?;
    info!("fault round trip: {back:?}");
    Ok(())
}

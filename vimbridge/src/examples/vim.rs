//! Legacy client model: a slice of the vim25 types used by the samples and tests.

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};

use crate::{Interface, LegacyEnum, LegacyObject, Poly};

#[derive(Debug, Clone, Default, PartialEq, LegacyObject)]
pub struct ManagedObjectReference {
    pub type_: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, LegacyObject)]
#[bridge(name = "ID")]
pub struct Id {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, LegacyObject)]
pub struct WaitOptions {
    pub max_wait_seconds: Option<i32>,
    pub max_object_updates: i32,
}

#[derive(Debug, Clone, Default, PartialEq, LegacyObject)]
pub struct ApplyProfile {
    pub enabled: bool,
    pub profile_type_name: Option<String>,
    pub profile_version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, LegacyObject)]
pub struct VirtualSwitchProfile {
    #[bridge(embed)]
    pub apply_profile: ApplyProfile,
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, LegacyObject)]
pub struct NetworkProfile {
    #[bridge(embed)]
    pub apply_profile: ApplyProfile,
    pub vswitch: Vec<VirtualSwitchProfile>,
}

#[derive(Debug, Clone, Default, PartialEq, LegacyObject)]
pub struct VstorageObjectVCenterQueryChangedDiskAreasRequestType {
    #[bridge(rename = "_this")]
    pub this: ManagedObjectReference,
    pub id: Id,
    pub datastore: ManagedObjectReference,
    pub snapshot_id: Id,
    pub start_offset: i64,
    pub change_id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, LegacyEnum)]
pub enum PropertyChangeOp {
    #[default]
    Add,
    Remove,
    Assign,
    IndirectRemove,
}

#[derive(Debug, Clone, Default, PartialEq, LegacyObject)]
pub struct PropertyChange {
    pub name: String,
    pub op: PropertyChangeOp,
    pub val: serde_json::Value,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, LegacyEnum)]
pub enum TaskInfoState {
    #[default]
    Queued,
    Running,
    Success,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, LegacyObject)]
pub struct ScheduledTaskSpec {
    pub name: String,
    pub description: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, LegacyObject)]
pub struct ScheduledTaskInfo {
    #[bridge(embed)]
    pub scheduled_task_spec: ScheduledTaskSpec,
    pub last_modified_time: DateTime<Utc>,
    pub last_modified_user: String,
    pub next_run_time: Option<DateTime<FixedOffset>>,
    pub state: Option<TaskInfoState>,
}

#[derive(Debug, Clone, Default, PartialEq, LegacyObject)]
pub struct KeyAnyValue {
    pub key: String,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, LegacyObject)]
pub struct LocalizableMessage {
    pub key: String,
    pub arg: Vec<KeyAnyValue>,
    pub message: String,
}

#[derive(Debug, Default, LegacyObject)]
pub struct LocalizedMethodFault {
    pub fault: Option<Poly<dyn Fault>>,
    pub localized_message: String,
}

#[derive(Debug, Default, LegacyObject)]
pub struct MethodFault {
    pub fault_cause: Option<Box<LocalizedMethodFault>>,
    pub fault_message: Vec<LocalizableMessage>,
}

#[derive(Debug, Default, LegacyObject)]
pub struct RuntimeFault {
    #[bridge(embed)]
    pub method_fault: MethodFault,
}

#[derive(Debug, Default, LegacyObject)]
pub struct NotEnoughLicenses {
    #[bridge(embed)]
    pub runtime_fault: RuntimeFault,
}

#[derive(Debug, Default, LegacyObject)]
pub struct VmLimitLicense {
    #[bridge(embed)]
    pub not_enough_licenses: NotEnoughLicenses,
    pub limit: i32,
}

/// Every fault type carries a `MethodFault` at the bottom of its embedding chain.
pub trait Fault: fmt::Debug {
    fn method_fault(&self) -> &MethodFault;

    fn method_fault_mut(&mut self) -> &mut MethodFault;
}

impl Fault for MethodFault {
    fn method_fault(&self) -> &MethodFault {
        self
    }

    fn method_fault_mut(&mut self) -> &mut MethodFault {
        self
    }
}

macro_rules! embedded_fault {
    ($($ty:ty => $embedded:ident),* $(,)?) => {$(
        impl Fault for $ty {
            fn method_fault(&self) -> &MethodFault {
                self.$embedded.method_fault()
            }

            fn method_fault_mut(&mut self) -> &mut MethodFault {
                self.$embedded.method_fault_mut()
            }
        }
    )*};
}

embedded_fault!(
    RuntimeFault => method_fault,
    NotEnoughLicenses => runtime_fault,
    VmLimitLicense => not_enough_licenses,
);

impl Interface for dyn Fault {
    type Base = MethodFault;

    const NAME: &'static str = "BaseMethodFault";

    fn base(&self) -> &MethodFault {
        self.method_fault()
    }

    fn base_mut(&mut self) -> &mut MethodFault {
        self.method_fault_mut()
    }

    fn from_base(base: MethodFault) -> Box<Self> {
        Box::new(base)
    }
}

//! Schema-generated model mirroring the legacy types in [`super::vim`].

use crate::{SchemaEnum, SchemaMessage, Timestamp};

#[derive(Debug, Clone, Default, PartialEq, SchemaMessage)]
#[bridge(legacy = "ManagedObjectReference")]
pub struct ManagedObjectReference {
    pub r#type: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, SchemaMessage)]
#[bridge(legacy = "ID")]
pub struct Id {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, SchemaMessage)]
#[bridge(legacy = "WaitOptions")]
pub struct WaitOptions {
    pub max_wait_seconds: i32,
    pub max_object_updates: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, SchemaMessage)]
#[bridge(legacy = "VirtualSwitchProfile")]
pub struct VirtualSwitchProfile {
    pub enabled: bool,
    pub profile_type_name: Option<String>,
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, SchemaMessage)]
#[bridge(legacy = "NetworkProfile")]
pub struct NetworkProfile {
    pub enabled: bool,
    pub vswitch: Vec<VirtualSwitchProfile>,
}

#[derive(Debug, Clone, Default, PartialEq, SchemaMessage)]
#[bridge(legacy = "VstorageObjectVCenterQueryChangedDiskAreasRequestType")]
pub struct VstorageObjectVCenterQueryChangedDiskAreas {
    #[bridge(name = "_this")]
    pub this: Option<ManagedObjectReference>,
    pub id: Option<Id>,
    pub datastore: Option<ManagedObjectReference>,
    pub snapshot_id: Option<Id>,
    pub start_offset: i64,
    pub change_id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, SchemaEnum)]
#[bridge(legacy = "crate::examples::vim::PropertyChangeOp")]
pub enum PropertyChangeOp {
    #[default]
    Unspecified = 0,
    Add = 1,
    Remove = 2,
    Assign = 3,
    IndirectRemove = 4,
}

#[derive(Debug, Clone, PartialEq, Default, SchemaMessage)]
#[bridge(legacy = "PropertyChange")]
pub struct PropertyChange {
    pub name: String,
    pub op: PropertyChangeOp,
    pub val: Option<serde_json::Value>,
}

#[allow(clippy::enum_variant_names)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, SchemaEnum)]
#[bridge(legacy = "crate::examples::vim::TaskInfoState")]
pub enum TaskInfoState {
    #[default]
    Unspecified = 0,
    TaskInfoStateQueued = 1,
    TaskInfoStateRunning = 2,
    TaskInfoStateSuccess = 3,
    TaskInfoStateError = 4,
}

#[derive(Debug, Clone, Default, PartialEq, SchemaMessage)]
#[bridge(legacy = "ScheduledTaskInfo")]
pub struct ScheduledTaskInfo {
    pub name: String,
    pub description: String,
    pub enabled: bool,
    pub last_modified_time: Option<Timestamp>,
    pub last_modified_user: String,
    pub next_run_time: Option<Timestamp>,
    pub state: TaskInfoState,
}

#[derive(Debug, Clone, Default, PartialEq, SchemaMessage)]
#[bridge(legacy = "KeyAnyValue")]
pub struct KeyAnyValue {
    pub key: String,
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, SchemaMessage)]
#[bridge(legacy = "LocalizableMessage")]
pub struct LocalizableMessage {
    pub key: String,
    pub arg: Vec<KeyAnyValue>,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, SchemaMessage)]
#[bridge(legacy = "LocalizedMethodFault")]
pub struct LocalizedMethodFault {
    pub fault: Option<MethodFault>,
    pub localized_message: String,
}

#[derive(Debug, Clone, Default, PartialEq, SchemaMessage)]
#[bridge(legacy = "MethodFault")]
pub struct MethodFault {
    pub fault_cause: Option<Box<LocalizedMethodFault>>,
    pub fault_message: Vec<LocalizableMessage>,
}

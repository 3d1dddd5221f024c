use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pattern::Bindings;

/// The kind of structural change a patch operation applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Add,
    Remove,
    Replace,
}

/// A structural change at a concrete path in the room state tree, as fed to
/// the listener registry.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub operation: OperationKind,
    pub path: Vec<String>,
    pub value: Option<Value>,
}

/// What a matched pattern handler receives: the change scoped to its own
/// pattern, carrying that pattern's wildcard bindings. Different patterns
/// bind different names over the same path, so bindings are recomputed per
/// registration.
#[derive(Debug, Clone, PartialEq)]
pub struct DataChange {
    pub operation: OperationKind,
    pub bindings: Bindings,
    pub value: Option<Value>,
}

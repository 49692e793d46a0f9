//! Operation descriptors and lifecycle events
//!
//! These mirror what the host engine emits for every unit of work it runs.
//! Only the two plugin application detail kinds are modelled field by field;
//! every other kind is carried as [`OperationDetails::Other`].

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::core::errors::{Result, TrackerError};

/// Opaque identifier of one in-flight operation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(u64);

impl OperationId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for OperationId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op#{}", self.0)
    }
}

/// Details of a binary (class based) plugin being applied to a target
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyPluginDetails {
    pub target_type: String,
    pub application_id: u64,
    /// Fully qualified name of the implementing class
    pub plugin_class: String,
    #[serde(default)]
    pub plugin_id: Option<String>,
}

/// Details of a script plugin being applied to a target
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyScriptPluginDetails {
    pub target_type: String,
    pub application_id: u64,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
}

/// Discriminated details payload of an operation
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationDetails {
    ApplyPlugin(ApplyPluginDetails),
    ApplyScriptPlugin(ApplyScriptPluginDetails),
    /// Operation without details
    #[default]
    None,
    /// Any operation that is not a plugin application
    #[serde(other)]
    Other,
}

/// `null` details decode the same as absent details
fn details_or_none<'de, D>(deserializer: D) -> std::result::Result<OperationDetails, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<OperationDetails>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Descriptor of a started operation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    pub id: OperationId,
    #[serde(default)]
    pub parent_id: Option<OperationId>,
    pub display_name: String,
    #[serde(default, deserialize_with = "details_or_none")]
    pub details: OperationDetails,
}

impl OperationDescriptor {
    /// Create a descriptor without a parent or details
    pub fn new(id: impl Into<OperationId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            display_name: display_name.into(),
            details: OperationDetails::None,
        }
    }

    /// Set the parent operation
    pub fn with_parent(mut self, parent_id: impl Into<OperationId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Set the details payload
    pub fn with_details(mut self, details: OperationDetails) -> Self {
        self.details = details;
        self
    }

    /// Decode a descriptor emitted as JSON by an out-of-process event source
    pub fn from_json(json: &str) -> Result<Self> {
        let descriptor: OperationDescriptor = serde_json::from_str(json)?;
        if descriptor.parent_id == Some(descriptor.id) {
            return Err(TrackerError::invalid_descriptor(format!(
                "{} is its own parent",
                descriptor.id
            )));
        }
        Ok(descriptor)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationStartEvent {
    pub start_time: DateTime<Utc>,
}

impl OperationStartEvent {
    pub fn now() -> Self {
        Self {
            start_time: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperationProgressEvent {
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub details: Option<Value>,
}

impl OperationProgressEvent {
    pub fn now(details: Option<Value>) -> Self {
        Self {
            time: Utc::now(),
            details,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperationFinishEvent {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub failure: Option<String>,
    #[serde(default)]
    pub result: Option<Value>,
}

impl OperationFinishEvent {
    /// Successful finish of an operation that started at `start_time`
    pub fn succeeded(start_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            end_time: Utc::now(),
            failure: None,
            result: None,
        }
    }

    pub fn failed(start_time: DateTime<Utc>, failure: impl Into<String>) -> Self {
        Self {
            start_time,
            end_time: Utc::now(),
            failure: Some(failure.into()),
            result: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_descriptor_builder() {
        let details = OperationDetails::ApplyPlugin(ApplyPluginDetails {
            target_type: "project".to_string(),
            application_id: 7,
            plugin_class: "com.example.FooPlugin".to_string(),
            plugin_id: None,
        });
        let op = OperationDescriptor::new(2, "Apply plugin")
            .with_parent(1)
            .with_details(details.clone());

        assert_eq!(op.id, OperationId::new(2));
        assert_eq!(op.parent_id, Some(OperationId::new(1)));
        assert_eq!(op.details, details);
        assert_eq!(op.id.to_string(), "op#2");
    }

    #[test]
    fn test_decode_script_plugin_descriptor() {
        let op = OperationDescriptor::from_json(
            r#"{
                "id": 12,
                "parent_id": 3,
                "display_name": "Apply script build.gradle.kts",
                "details": {
                    "kind": "apply_script_plugin",
                    "target_type": "project",
                    "application_id": 99,
                    "file": "/a/b/build.gradle.kts"
                }
            }"#,
        )
        .unwrap();

        assert_eq!(
            op.details,
            OperationDetails::ApplyScriptPlugin(ApplyScriptPluginDetails {
                target_type: "project".to_string(),
                application_id: 99,
                file: Some("/a/b/build.gradle.kts".to_string()),
                uri: None,
            })
        );
    }

    #[test]
    fn test_unknown_details_kind_decodes_to_other() {
        let op = OperationDescriptor::from_json(
            r#"{"id": 4, "display_name": "Execute task", "details": {"kind": "execute_task"}}"#,
        )
        .unwrap();
        assert_eq!(op.details, OperationDetails::Other);

        let op = OperationDescriptor::from_json(r#"{"id": 5, "display_name": "Bare"}"#).unwrap();
        assert_eq!(op.details, OperationDetails::None);
    }

    #[test]
    fn test_details_none_survives_json() {
        let json = serde_json::to_string(&OperationDetails::None).unwrap();
        assert_eq!(json, r#"{"kind":"none"}"#);
        let decoded: OperationDetails = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, OperationDetails::None);

        let op = OperationDescriptor::new(8, "Bare");
        let decoded = OperationDescriptor::from_json(&serde_json::to_string(&op).unwrap()).unwrap();
        assert_eq!(decoded, op);
    }

    #[test]
    fn test_null_details_decode_to_none() {
        let op = OperationDescriptor::from_json(r#"{"id": 6, "display_name": "Null", "details": null}"#).unwrap();
        assert_eq!(op.details, OperationDetails::None);
    }

    #[test]
    fn test_decode_rejects_self_parent() {
        let result = OperationDescriptor::from_json(r#"{"id": 4, "parent_id": 4, "display_name": "Loop"}"#);
        assert!(matches!(result, Err(TrackerError::InvalidDescriptor { .. })));
    }

    #[test]
    fn test_finish_event_duration() {
        let start = Utc::now() - Duration::milliseconds(250);
        let event = OperationFinishEvent::failed(start, "boom");
        assert!(event.is_failure());
        assert!(event.duration() >= Duration::milliseconds(250));
    }
}

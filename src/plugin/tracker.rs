//! Live registry of plugin applications in progress
//!
//! Every plugin applied to a project runs inside its own operation. The
//! tracker keeps one entry per such operation while it runs, and resolves the
//! plugin application governing any other operation through the operation
//! hierarchy (a task registered from inside a plugin's `apply`, a nested
//! script, and so on).

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, trace, warn};

use super::application::PluginApplication;
use super::identifier::{BinaryPluginIdentifier, PluginIdentifier, ScriptPluginIdentifier};
use crate::core::config::TrackerConfig;
use crate::core::errors::Result;
use crate::operation::hierarchy::ParentResolver;
use crate::operation::listener::OperationListener;
use crate::operation::types::{
    OperationDescriptor, OperationDetails, OperationFinishEvent, OperationId,
    OperationProgressEvent, OperationStartEvent,
};

/// Target type of plugin applications that are tracked
pub const PROJECT_TARGET_TYPE: &str = "project";

/// Tracks the plugin applications currently running.
///
/// All methods take `&self`; share the tracker as `Arc<PluginApplicationTracker>`
/// between the event dispatcher and any number of query threads.
pub struct PluginApplicationTracker {
    applications: DashMap<OperationId, Arc<PluginApplication>>,
    parent_resolver: Arc<dyn ParentResolver>,
}

impl PluginApplicationTracker {
    pub fn new(parent_resolver: Arc<dyn ParentResolver>) -> Self {
        Self {
            applications: DashMap::new(),
            parent_resolver,
        }
    }

    /// Size the application map from `config`, rejecting an invalid one
    pub fn with_config(
        parent_resolver: Arc<dyn ParentResolver>,
        config: &TrackerConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            applications: DashMap::with_capacity_and_shard_amount(
                config.initial_capacity,
                config.shard_amount,
            ),
            parent_resolver,
        })
    }

    /// Plugin application started by exactly this operation
    pub fn get_plugin_application(&self, id: OperationId) -> Option<Arc<PluginApplication>> {
        self.applications.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Plugin application governing `id`: its own, or that of its closest
    /// ancestor which is a running plugin application.
    ///
    /// The ancestor may finish between being found and being fetched, in which
    /// case this returns `None`.
    pub fn find_current_plugin_application(&self, id: OperationId) -> Option<Arc<PluginApplication>> {
        let application_operation = self
            .parent_resolver
            .find_closest_ancestor(id, &|candidate| self.applications.contains_key(&candidate))?;
        self.get_plugin_application(application_operation)
    }

    /// Operations with a running plugin application, in id order
    pub fn active_operations(&self) -> Vec<OperationId> {
        let mut ids: Vec<OperationId> = self.applications.iter().map(|entry| *entry.key()).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.applications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }

    fn add(
        &self,
        operation: &OperationDescriptor,
        target_type: &str,
        application_id: u64,
        plugin: impl FnOnce() -> Option<PluginIdentifier>,
    ) {
        if target_type != PROJECT_TARGET_TYPE {
            trace!(
                "Ignoring plugin application {} on {} target for {}",
                application_id, target_type, operation.id
            );
            return;
        }
        let Some(plugin) = plugin() else {
            return;
        };
        debug!(
            "Plugin {} applied to project (application {}, {})",
            plugin, application_id, operation.id
        );
        self.applications
            .insert(operation.id, Arc::new(PluginApplication::new(application_id, plugin)));
    }
}

impl OperationListener for PluginApplicationTracker {
    fn started(&self, operation: &OperationDescriptor, _event: &OperationStartEvent) {
        match &operation.details {
            OperationDetails::ApplyPlugin(details) => {
                self.add(operation, &details.target_type, details.application_id, || {
                    Some(BinaryPluginIdentifier::from_details(details).into())
                });
            }
            OperationDetails::ApplyScriptPlugin(details) => {
                self.add(operation, &details.target_type, details.application_id, || {
                    match ScriptPluginIdentifier::from_details(details) {
                        Ok(Some(script)) => Some(script.into()),
                        Ok(None) => {
                            debug!(
                                "Script plugin application {} for {} has no location",
                                details.application_id, operation.id
                            );
                            None
                        }
                        Err(e) => {
                            warn!(
                                "Skipping script plugin application {} for {}: {}",
                                details.application_id, operation.id, e
                            );
                            None
                        }
                    }
                });
            }
            OperationDetails::Other | OperationDetails::None => {}
        }
    }

    fn progress(&self, _operation_id: OperationId, _event: &OperationProgressEvent) {}

    fn finished(&self, operation: &OperationDescriptor, _event: &OperationFinishEvent) {
        if let Some((id, application)) = self.applications.remove(&operation.id) {
            debug!("Plugin {} finished applying ({})", application.plugin(), id);
        }
    }
}

use super::identifier::PluginIdentifier;

/// One application of a plugin to a project
///
/// Immutable once created. The tracker hands out `Arc<PluginApplication>`,
/// so a record obtained before its operation finished stays usable after.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PluginApplication {
    application_id: u64,
    plugin: PluginIdentifier,
}

impl PluginApplication {
    pub fn new(application_id: u64, plugin: impl Into<PluginIdentifier>) -> Self {
        Self {
            application_id,
            plugin: plugin.into(),
        }
    }

    /// Sequence number of this application event, distinct from the operation id
    pub fn application_id(&self) -> u64 {
        self.application_id
    }

    pub fn plugin(&self) -> &PluginIdentifier {
        &self.plugin
    }
}

//! Identifiers for the plugins an operation applies

use std::fmt;
use std::path::{Component, Path};

use url::Url;

use crate::core::errors::{Result, TrackerError};
use crate::operation::types::{ApplyPluginDetails, ApplyScriptPluginDetails};

/// Plugin implemented by a class, optionally registered under a plugin id
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BinaryPluginIdentifier {
    display_name: String,
    class_name: String,
    plugin_id: Option<String>,
}

impl BinaryPluginIdentifier {
    /// The display name is the plugin id when one is declared, else the class name.
    pub fn new(class_name: impl Into<String>, plugin_id: Option<String>) -> Self {
        let class_name = class_name.into();
        let display_name = plugin_id.clone().unwrap_or_else(|| class_name.clone());
        Self {
            display_name,
            class_name,
            plugin_id,
        }
    }

    pub fn from_details(details: &ApplyPluginDetails) -> Self {
        Self::new(details.plugin_class.clone(), details.plugin_id.clone())
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn plugin_id(&self) -> Option<&str> {
        self.plugin_id.as_deref()
    }
}

/// Where a script plugin was loaded from
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScriptLocation {
    /// Absolute URI, `file:` for scripts on disk
    Url(Url),
    /// Relative URI reference, kept as given
    Relative(String),
}

impl ScriptLocation {
    pub fn as_url(&self) -> Option<&Url> {
        match self {
            Self::Url(url) => Some(url),
            Self::Relative(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Url(url) => url.as_str(),
            Self::Relative(reference) => reference,
        }
    }

    /// Path component, without query or fragment
    fn path(&self) -> &str {
        match self {
            Self::Url(url) => url.path(),
            Self::Relative(reference) => reference
                .split(['?', '#'])
                .next()
                .unwrap_or_default(),
        }
    }
}

impl fmt::Display for ScriptLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Characters allowed anywhere in a URI reference
fn is_uri_reference(reference: &str) -> bool {
    reference.chars().all(|c| {
        c.is_ascii_alphanumeric() || "-._~:/?#[]@!$&'()*+,;=%".contains(c)
    })
}

/// Plugin applied from a script file or remote script
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScriptPluginIdentifier {
    display_name: String,
    location: ScriptLocation,
}

impl ScriptPluginIdentifier {
    /// Identify a script on the local file system. Relative paths are
    /// resolved against the current directory.
    pub fn from_file(file: impl AsRef<Path>) -> Result<Self> {
        let file = file.as_ref();
        let display_name = match file.components().next_back() {
            Some(Component::Normal(name)) => name.to_string_lossy().into_owned(),
            Some(Component::ParentDir) => "..".to_string(),
            Some(Component::CurDir) => ".".to_string(),
            _ => String::new(),
        };

        let absolute = if file.is_absolute() {
            file.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|e| TrackerError::io("resolving current directory", e))?
                .join(file)
        };
        let uri = Url::from_file_path(&absolute).map_err(|()| {
            TrackerError::invalid_descriptor(format!(
                "cannot express {} as a file URI",
                absolute.display()
            ))
        })?;

        Ok(Self {
            display_name,
            location: ScriptLocation::Url(uri),
        })
    }

    /// Identify a script by absolute URI or relative URI reference; the
    /// display name is the last path segment.
    pub fn from_uri(uri: &str) -> Result<Self> {
        let location = match Url::parse(uri) {
            Ok(url) => ScriptLocation::Url(url),
            Err(url::ParseError::RelativeUrlWithoutBase) if is_uri_reference(uri) => {
                ScriptLocation::Relative(uri.to_string())
            }
            Err(e) => return Err(TrackerError::invalid_location(uri, e)),
        };
        let last_segment = location.path().rsplit('/').next().unwrap_or_default();
        let display_name = urlencoding::decode(last_segment)
            .map(|name| name.into_owned())
            .unwrap_or_else(|_| last_segment.to_string());

        Ok(Self {
            display_name,
            location,
        })
    }

    /// Build from details, preferring the file over the URI.
    ///
    /// `Ok(None)` when the details carry neither.
    pub fn from_details(details: &ApplyScriptPluginDetails) -> Result<Option<Self>> {
        if let Some(file) = &details.file {
            return Self::from_file(file).map(Some);
        }
        if let Some(uri) = &details.uri {
            return Self::from_uri(uri).map(Some);
        }
        Ok(None)
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn location(&self) -> &ScriptLocation {
        &self.location
    }
}

/// The plugin applied by a plugin application
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PluginIdentifier {
    Binary(BinaryPluginIdentifier),
    Script(ScriptPluginIdentifier),
}

impl PluginIdentifier {
    pub fn display_name(&self) -> &str {
        match self {
            Self::Binary(binary) => binary.display_name(),
            Self::Script(script) => script.display_name(),
        }
    }

    pub fn as_binary(&self) -> Option<&BinaryPluginIdentifier> {
        match self {
            Self::Binary(binary) => Some(binary),
            Self::Script(_) => None,
        }
    }

    pub fn as_script(&self) -> Option<&ScriptPluginIdentifier> {
        match self {
            Self::Script(script) => Some(script),
            Self::Binary(_) => None,
        }
    }
}

impl From<BinaryPluginIdentifier> for PluginIdentifier {
    fn from(binary: BinaryPluginIdentifier) -> Self {
        Self::Binary(binary)
    }
}

impl From<ScriptPluginIdentifier> for PluginIdentifier {
    fn from(script: ScriptPluginIdentifier) -> Self {
        Self::Script(script)
    }
}

impl fmt::Display for PluginIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

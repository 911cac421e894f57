//! Generator configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::CodegenError;

/// Options controlling the emitted bindings. Missing JSON fields fall back to
/// [`CodegenConfig::default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodegenConfig {
    /// Crate path the generated `use` lines import the runtime from.
    pub runtime_crate: String,
    /// Emit doc comments taken from the schema.
    pub emit_docs: bool,
    /// Append range, nullability and read-only notes to property docs.
    pub document_domains: bool,
    /// Optional banner written as a line comment at the top of the output.
    pub header: Option<String>,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            runtime_crate: "scenelink_bridge_core".to_string(),
            emit_docs: true,
            document_domains: true,
            header: None,
        }
    }
}

impl CodegenConfig {
    pub fn from_json(text: &str) -> Result<Self, CodegenError> {
        let config: CodegenConfig =
            serde_json::from_str(text).map_err(|e| CodegenError::Config(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    /// Load from `path`, or the defaults when the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, CodegenError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| CodegenError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    fn check(&self) -> Result<(), CodegenError> {
        let valid = !self.runtime_crate.is_empty()
            && self
                .runtime_crate
                .split("::")
                .all(crate::naming::is_identifier);
        if valid {
            Ok(())
        } else {
            Err(CodegenError::Config(format!(
                "runtime_crate '{}' is not a crate path",
                self.runtime_crate
            )))
        }
    }
}

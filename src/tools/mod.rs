//! Tool Registry Module
//!
//! Local tools exposed to the chat API for tool calling. Every tool is a
//! variant of [`ToolKind`], so registering a new one is a compile-time change
//! and an unregistered name is a typed [`ToolError::UnknownTool`].

pub mod file_system;
pub mod reports;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Description of a single tool parameter, in the provider's wire shape
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ParameterDefinition {
    pub description: String,
    #[serde(rename = "type")]
    pub param_type: String,
    pub required: bool,
}

/// Tool definition sent to the chat API
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameter_definitions: BTreeMap<String, ParameterDefinition>,
}

/// A tool invocation requested by the model
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

/// Outputs of one tool call, fed back to the model on the answering turn
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ToolCallResult {
    pub call: ToolCall,
    pub outputs: Vec<Value>,
}

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    #[error("tool '{tool}' is missing required parameter '{parameter}'")]
    MissingParameter { tool: &'static str, parameter: String },

    #[error("tool '{tool}' received an invalid '{parameter}': {reason}")]
    InvalidParameter {
        tool: &'static str,
        parameter: String,
        reason: String,
    },

    #[error("tool '{tool}' failed: {message}")]
    Invocation { tool: &'static str, message: String },
}

/// Closed set of tools available to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    GetFileContents,
    QueryDailySummary,
}

impl ToolKind {
    pub const ALL: [ToolKind; 2] = [ToolKind::GetFileContents, ToolKind::QueryDailySummary];

    /// Name the model uses to request this tool
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetFileContents => "get_file_contents",
            Self::QueryDailySummary => "query_daily_summary",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, ToolError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::GetFileContents => "Retrieves the text contents of the file into memory.",
            Self::QueryDailySummary => {
                "Connects to a database to retrieve the summary report for a given day."
            }
        }
    }

    /// Parameter definitions as `(name, description, type, required)`
    fn parameters(&self) -> &'static [(&'static str, &'static str, &'static str, bool)] {
        match self {
            Self::GetFileContents => &[("file", "File path to grab contents from", "str", true)],
            Self::QueryDailySummary => &[(
                "day",
                "Retrieves the summary for this day, formatted as YYYY-MM-DD.",
                "str",
                true,
            )],
        }
    }

    pub fn descriptor(&self) -> ToolDescriptor {
        let parameter_definitions = self
            .parameters()
            .iter()
            .map(|(name, description, param_type, required)| {
                (
                    name.to_string(),
                    ParameterDefinition {
                        description: description.to_string(),
                        param_type: param_type.to_string(),
                        required: *required,
                    },
                )
            })
            .collect();

        ToolDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameter_definitions,
        }
    }

    fn required_parameters(&self) -> impl Iterator<Item = &'static str> {
        self.parameters()
            .iter()
            .filter(|(_, _, _, required)| *required)
            .map(|(name, _, _, _)| *name)
    }
}

/// Registry binding tool names to their local implementations
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    root: PathBuf,
}

impl ToolRegistry {
    /// Create a registry whose file tools resolve relative paths against `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        ToolKind::ALL.iter().map(ToolKind::descriptor).collect()
    }

    /// Run the tool named by `call` after checking its required parameters
    pub fn invoke(&self, call: &ToolCall) -> Result<Value, ToolError> {
        let kind = ToolKind::from_name(&call.name)?;

        if let Some(missing) = kind
            .required_parameters()
            .find(|name| !call.parameters.contains_key(*name))
        {
            return Err(ToolError::MissingParameter {
                tool: kind.name(),
                parameter: missing.to_string(),
            });
        }

        debug!(tool = kind.name(), parameters = ?call.parameters, "invoking tool");

        match kind {
            ToolKind::GetFileContents => {
                let file = string_parameter(kind, &call.parameters, "file")?;
                file_system::get_file_contents(&self.root, file)
            }
            ToolKind::QueryDailySummary => {
                let day = string_parameter(kind, &call.parameters, "day")?;
                reports::query_daily_summary(day)
            }
        }
    }
}

fn string_parameter<'a>(
    kind: ToolKind,
    parameters: &'a Map<String, Value>,
    name: &str,
) -> Result<&'a str, ToolError> {
    match parameters.get(name) {
        Some(Value::String(value)) => Ok(value),
        Some(other) => Err(ToolError::InvalidParameter {
            tool: kind.name(),
            parameter: name.to_string(),
            reason: format!("expected a string, got {}", other),
        }),
        None => Err(ToolError::MissingParameter {
            tool: kind.name(),
            parameter: name.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn call(name: &str, parameters: Value) -> ToolCall {
        ToolCall {
            name: name.to_string(),
            parameters: parameters.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn test_descriptors_cover_every_tool() {
        let registry = ToolRegistry::new(".");
        let names: Vec<String> = registry.descriptors().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["get_file_contents", "query_daily_summary"]);
    }

    #[test]
    fn test_descriptor_wire_shape() {
        let descriptor = ToolKind::GetFileContents.descriptor();
        let value = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(value["name"], "get_file_contents");
        assert_eq!(value["parameter_definitions"]["file"]["type"], "str");
        assert_eq!(value["parameter_definitions"]["file"]["required"], true);
    }

    #[test]
    fn test_from_name_rejects_unknown_tool() {
        assert_eq!(
            ToolKind::from_name("get_file_contents").unwrap(),
            ToolKind::GetFileContents
        );
        assert!(matches!(
            ToolKind::from_name("rm_rf"),
            Err(ToolError::UnknownTool(name)) if name == "rm_rf"
        ));
    }

    #[test]
    fn test_invoke_get_file_contents() {
        let temp_dir = TempDir::new().unwrap();
        let text = "# Title\n\nSome text with trailing spaces   \n";
        fs::write(temp_dir.path().join("README.md"), text).unwrap();

        let registry = ToolRegistry::new(temp_dir.path());
        let output = registry
            .invoke(&call("get_file_contents", json!({ "file": "README.md" })))
            .unwrap();

        assert_eq!(output, json!({ "file": "README.md", "contents": text }));
    }

    #[test]
    fn test_invoke_requires_parameters() {
        let registry = ToolRegistry::new(".");
        let result = registry.invoke(&call("get_file_contents", json!({})));
        assert!(matches!(
            result,
            Err(ToolError::MissingParameter { tool: "get_file_contents", parameter }) if parameter == "file"
        ));
    }

    #[test]
    fn test_invoke_rejects_non_string_parameter() {
        let registry = ToolRegistry::new(".");
        let result = registry.invoke(&call("query_daily_summary", json!({ "day": 20230929 })));
        assert!(matches!(result, Err(ToolError::InvalidParameter { .. })));
    }

    #[test]
    fn test_invoke_unknown_tool() {
        let registry = ToolRegistry::new(".");
        let result = registry.invoke(&call("delete_everything", json!({ "path": "/" })));
        assert!(matches!(result, Err(ToolError::UnknownTool(_))));
    }
}

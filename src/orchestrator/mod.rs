//! Prompt Orchestrator Module
//!
//! Routes a user prompt plus optional context (such as the selected file)
//! through a two-step tool-calling conversation:
//!
//! 1. a planning request where the model decides which local tools to call,
//! 2. local execution of those tools through the [`ToolRegistry`],
//! 3. an answering request carrying the tool outputs.
//!
//! Requests are sequential and never retried. Every failure is returned as an
//! [`OrchestratorError`] so the caller can show it without ending the session.

use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm::cohere::DEFAULT_MODEL;
use crate::llm::{ChatBackend, ChatRequest, FinishStatus, ProviderError};
use crate::tools::{ToolCall, ToolCallResult, ToolError, ToolRegistry};

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("the model requested a tool that is not registered: {0}")]
    UnknownTool(String),

    #[error("tool invocation failed: {0}")]
    ToolInvocation(#[source] ToolError),

    #[error("chat provider unavailable: {0}")]
    ProviderUnavailable(#[source] ProviderError),

    #[error("model did not finish its answer (finish reason: {0})")]
    NonCompleteFinish(FinishStatus),
}

impl From<ToolError> for OrchestratorError {
    fn from(error: ToolError) -> Self {
        match error {
            ToolError::UnknownTool(name) => Self::UnknownTool(name),
            other => Self::ToolInvocation(other),
        }
    }
}

impl From<ProviderError> for OrchestratorError {
    fn from(error: ProviderError) -> Self {
        Self::ProviderUnavailable(error)
    }
}

/// Model selection and sampling for both conversation steps
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorSettings {
    pub model: String,
    pub plan_temperature: Option<f32>,
    pub answer_temperature: Option<f32>,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            plan_temperature: None,
            answer_temperature: Some(0.3),
        }
    }
}

pub struct Orchestrator {
    backend: Arc<dyn ChatBackend>,
    registry: ToolRegistry,
    settings: OrchestratorSettings,
}

impl Orchestrator {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        registry: ToolRegistry,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            backend,
            registry,
            settings,
        }
    }

    /// Produce the model's final answer to `message`
    pub async fn query(
        &self,
        message: &str,
        preamble: &str,
        context: &Map<String, Value>,
    ) -> Result<String, OrchestratorError> {
        let tools = self.registry.descriptors();
        let preamble = (!preamble.is_empty()).then(|| preamble.to_string());

        let plan = ChatRequest {
            message: planning_message(message, context),
            model: self.settings.model.clone(),
            preamble: preamble.clone(),
            tools: tools.clone(),
            tool_results: None,
            force_single_step: true,
            temperature: self.settings.plan_temperature,
        };
        info!(model = %plan.model, "sending planning request");
        let plan_response = self.backend.chat(&plan).await?;

        let tool_results = self.run_tool_calls(plan_response.tool_calls())?;

        let answer = ChatRequest {
            message: message.to_string(),
            model: self.settings.model.clone(),
            preamble,
            tools,
            tool_results: Some(tool_results),
            force_single_step: true,
            temperature: self.settings.answer_temperature,
        };
        info!(
            tool_results = answer.tool_results.as_ref().map_or(0, Vec::len),
            "sending answering request"
        );
        let answer_response = self.backend.chat(&answer).await?;

        match answer_response.finish_status() {
            FinishStatus::Complete => Ok(answer_response.text),
            status => {
                warn!(
                    %status,
                    raw = ?answer_response.finish_reason,
                    "model did not complete its answer"
                );
                Err(OrchestratorError::NonCompleteFinish(status))
            }
        }
    }

    fn run_tool_calls(
        &self,
        calls: &[ToolCall],
    ) -> Result<Vec<ToolCallResult>, OrchestratorError> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            debug!(tool = %call.name, "running requested tool");
            let output = self.registry.invoke(call).map_err(|e| {
                warn!(tool = %call.name, error = %e, "tool call failed");
                OrchestratorError::from(e)
            })?;
            results.push(ToolCallResult {
                call: call.clone(),
                outputs: vec![output],
            });
        }
        Ok(results)
    }
}

/// Planning message: the prompt followed by the context arguments
fn planning_message(message: &str, context: &Map<String, Value>) -> String {
    if context.is_empty() {
        message.to_string()
    } else {
        format!("{}\n args={}", message, Value::Object(context.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ChatResponse;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Backend that replays canned responses and records every request
    struct ScriptedBackend {
        responses: Mutex<VecDeque<Result<ChatResponse, ProviderError>>>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedBackend {
        fn new(responses: Vec<Result<ChatResponse, ProviderError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<ChatRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
            self.requests.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted response left")
        }
    }

    fn response(text: &str, finish_reason: &str, tool_calls: Vec<ToolCall>) -> ChatResponse {
        ChatResponse {
            text: text.to_string(),
            generation_id: None,
            finish_reason: Some(finish_reason.to_string()),
            tool_calls: Some(tool_calls),
        }
    }

    fn tool_call(name: &str, parameters: Value) -> ToolCall {
        ToolCall {
            name: name.to_string(),
            parameters: parameters.as_object().cloned().unwrap_or_default(),
        }
    }

    fn orchestrator(backend: Arc<ScriptedBackend>, root: &std::path::Path) -> Orchestrator {
        Orchestrator::new(backend, ToolRegistry::new(root), OrchestratorSettings::default())
    }

    #[tokio::test]
    async fn test_zero_tool_calls_still_answers() {
        let backend = ScriptedBackend::new(vec![
            Ok(response("", "COMPLETE", vec![])),
            Ok(response("Nothing to look up.", "COMPLETE", vec![])),
        ]);
        let orchestrator = orchestrator(backend.clone(), std::path::Path::new("."));

        let answer = orchestrator.query("Hello", "", &Map::new()).await.unwrap();
        assert_eq!(answer, "Nothing to look up.");

        let requests = backend.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].tool_results, Some(vec![]));
        assert_eq!(requests[1].message, "Hello");
    }

    #[tokio::test]
    async fn test_tool_outputs_reach_answer_request() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("main.rs"), "fn main() {}\n").unwrap();

        let call = tool_call("get_file_contents", json!({ "file": "main.rs" }));
        let backend = ScriptedBackend::new(vec![
            Ok(response("", "COMPLETE", vec![call.clone()])),
            Ok(response("It is an empty main function.", "COMPLETE", vec![])),
        ]);
        let orchestrator = orchestrator(backend.clone(), temp_dir.path());

        let mut context = Map::new();
        context.insert("file".to_string(), json!("main.rs"));
        let answer = orchestrator
            .query("Explain this file", "Be brief.", &context)
            .await
            .unwrap();
        assert_eq!(answer, "It is an empty main function.");

        let requests = backend.requests();
        let plan = &requests[0];
        assert_eq!(plan.message, "Explain this file\n args={\"file\":\"main.rs\"}");
        assert_eq!(plan.preamble.as_deref(), Some("Be brief."));
        assert!(plan.force_single_step);
        assert_eq!(plan.temperature, None);
        assert_eq!(plan.tools.len(), 2);

        let answer_request = &requests[1];
        assert_eq!(answer_request.message, "Explain this file");
        assert_eq!(answer_request.temperature, Some(0.3));
        assert_eq!(
            answer_request.tool_results,
            Some(vec![ToolCallResult {
                call,
                outputs: vec![json!({ "file": "main.rs", "contents": "fn main() {}\n" })],
            }])
        );
    }

    #[tokio::test]
    async fn test_unknown_tool_is_reported() {
        let backend = ScriptedBackend::new(vec![Ok(response(
            "",
            "COMPLETE",
            vec![tool_call("format_disk", json!({}))],
        ))]);
        let orchestrator = orchestrator(backend.clone(), std::path::Path::new("."));

        let err = orchestrator.query("Do it", "", &Map::new()).await.unwrap_err();
        assert!(matches!(err, OrchestratorError::UnknownTool(ref name) if name == "format_disk"));
        // No answering request after a failed plan
        assert_eq!(backend.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_tool_failure_is_caught() {
        let temp_dir = TempDir::new().unwrap();
        let backend = ScriptedBackend::new(vec![Ok(response(
            "",
            "COMPLETE",
            vec![tool_call("get_file_contents", json!({ "file": "gone.txt" }))],
        ))]);
        let orchestrator = orchestrator(backend, temp_dir.path());

        let err = orchestrator.query("Read it", "", &Map::new()).await.unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::ToolInvocation(ToolError::Invocation { .. })
        ));
    }

    #[tokio::test]
    async fn test_non_complete_finish_is_mapped() {
        let backend = ScriptedBackend::new(vec![
            Ok(response("", "COMPLETE", vec![])),
            Ok(response("The answer was cut sh", "MAX_TOKENS", vec![])),
        ]);
        let orchestrator = orchestrator(backend, std::path::Path::new("."));

        let err = orchestrator.query("Long story", "", &Map::new()).await.unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::NonCompleteFinish(FinishStatus::LengthLimited)
        ));
        assert!(!err.to_string().contains("cut sh"));
        assert!(!err.to_string().contains("MAX_TOKENS"));
    }

    #[tokio::test]
    async fn test_provider_failure_is_surfaced() {
        let backend = ScriptedBackend::new(vec![Err(ProviderError::Status {
            status: 503,
            body: "overloaded".to_string(),
        })]);
        let orchestrator = orchestrator(backend, std::path::Path::new("."));

        let err = orchestrator.query("Hi", "", &Map::new()).await.unwrap_err();
        assert!(matches!(err, OrchestratorError::ProviderUnavailable(_)));
    }

    #[tokio::test]
    async fn test_configured_temperatures_are_used() {
        let backend = ScriptedBackend::new(vec![
            Ok(response("", "COMPLETE", vec![])),
            Ok(response("ok", "COMPLETE", vec![])),
        ]);
        let settings = OrchestratorSettings {
            model: "command-r-plus".to_string(),
            plan_temperature: Some(0.9),
            answer_temperature: None,
        };
        let orchestrator =
            Orchestrator::new(backend.clone(), ToolRegistry::new("."), settings);

        orchestrator.query("Hi", "", &Map::new()).await.unwrap();
        let requests = backend.requests();
        assert_eq!(requests[0].temperature, Some(0.9));
        assert_eq!(requests[1].temperature, None);
        assert!(requests.iter().all(|r| r.model == "command-r-plus"));
    }
}

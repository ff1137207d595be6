//! tool-browser - terminal code browser with a tool-calling assistant
//!
//! Browse a directory tree, view files with syntax highlighting, and ask a
//! Cohere chat model about the selected file. The model can call local tools
//! to read files before it answers.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use serde_json::{Map, Value};
//! use tool_browser::llm::CohereClient;
//! use tool_browser::orchestrator::{Orchestrator, OrchestratorSettings};
//! use tool_browser::tools::ToolRegistry;
//!
//! # async fn demo() -> Result<(), tool_browser::orchestrator::OrchestratorError> {
//! let client = CohereClient::new("your-api-key".to_string());
//! let orchestrator = Orchestrator::new(
//!     Arc::new(client),
//!     ToolRegistry::new("."),
//!     OrchestratorSettings::default(),
//! );
//!
//! let mut context = Map::new();
//! context.insert("file".to_string(), Value::String("src/main.rs".to_string()));
//! let answer = orchestrator.query("What does this file do?", "", &context).await?;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```
//!
//! # Available Tools
//!
//! 1. **get_file_contents** - Read a file under the browsed root
//! 2. **query_daily_summary** - Look up a daily sales summary

pub mod cli;
pub mod llm;
pub mod orchestrator;
pub mod tools;

// Re-export commonly used types for convenience
pub use llm::{ChatBackend, ChatRequest, ChatResponse, CohereClient, FinishStatus};
pub use orchestrator::{Orchestrator, OrchestratorError, OrchestratorSettings};
pub use tools::{ToolCall, ToolCallResult, ToolDescriptor, ToolError, ToolRegistry};

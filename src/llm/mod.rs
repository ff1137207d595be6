//! LLM Integration Module
//!
//! Request shaping and response decoding for the hosted chat API.

pub mod cohere;

// Re-export main types
pub use cohere::{
    ChatBackend, ChatRequest, ChatResponse, CohereClient, FinishStatus, ProviderError,
};

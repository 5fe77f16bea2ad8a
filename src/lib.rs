//! # Itemizer
//!
//! A small HTTP service that turns a natural-language task description into
//! an ordered list of short subtasks by asking a Hugging Face chat-completion
//! model to decompose it.
//!
//! ## Request Flow
//! 1. Receive a task title via `POST /generate-items`
//! 2. Build a few-shot primer conversation plus the new task
//! 3. Ask the completion provider for one completion
//! 4. Extract the bracketed list from the (possibly noisy) model output
//! 5. Retry the completion + extraction up to 3 times on any failure
//!
//! ## Modules
//! - `api`: HTTP surface (axum routes, request/response types)
//! - `llm`: completion client abstraction and Hugging Face implementation
//! - `prompt`: the fixed few-shot conversation primer
//! - `extract`: bracketed-list extraction and safe literal parsing
//! - `generate`: the retry orchestrator tying the pipeline together

pub mod api;
pub mod config;
pub mod extract;
pub mod generate;
pub mod llm;
pub mod prompt;

pub use config::Config;

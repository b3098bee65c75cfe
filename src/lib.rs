//! verse-forge: compile annotated verse datasets into LLM batch request files.
//!
//! This library loads a verse dataset, selects the verses to process, renders
//! one prompt per verse (with neighboring verses as context where the task
//! needs it) and writes the requests as a JSONL batch file.

// Core modules
pub mod batch;
pub mod cli;
pub mod dataset;
pub mod error;
pub mod pipeline;
pub mod prompts;

// Re-export commonly used error types
pub use error::{AssemblyError, ConfigError, LoadError, PipelineError, WriteError};

//! Batch compilation pipeline.
//!
//! Loader -> Selector -> Context Window -> Prompt -> Envelope -> Writer,
//! driven by an explicit [`BatchConfig`].

pub mod config;
pub mod runner;

pub use config::{
    BatchConfig, ErrorPolicy, ModelConfig, ModelOverrides, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};
pub use runner::{compile_batch, run_batch, CompiledBatch, RunSummary, SkippedRecord};

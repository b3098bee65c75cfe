//! Run configuration for batch compilation.
//!
//! This module provides the model parameters shared by every envelope of a
//! run, the selection settings, file locations and the per-record error
//! policy. Configuration is an explicit value passed to the runner.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dataset::SelectionConfig;
use crate::error::ConfigError;
use crate::prompts::PromptTask;

/// Default model for both prompt tasks.
pub const DEFAULT_MODEL: &str = "gpt-4.1-2025-04-14";

/// Default sampling temperature. Kept low for consistent output.
pub const DEFAULT_TEMPERATURE: f64 = 0.1;

const REFINEMENT_MAX_TOKENS: u32 = 300;
const TAGGING_MAX_TOKENS: u32 = 150;

const REFINEMENT_SYSTEM_MESSAGE: &str =
    "You are an expert Islamic scholar. Always respond with valid JSON only.";
const TAGGING_SYSTEM_MESSAGE: &str = "You are an expert Islamic scholar specializing in Quranic interpretation. Always respond with valid JSON only.";

/// Model parameters written into every envelope body of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub system_message: String,
}

impl ModelConfig {
    /// Defaults for `task`.
    pub fn for_task(task: PromptTask) -> Self {
        let (max_tokens, system_message) = match task {
            PromptTask::SubtopicRefinement => (REFINEMENT_MAX_TOKENS, REFINEMENT_SYSTEM_MESSAGE),
            PromptTask::TagGeneration => (TAGGING_MAX_TOKENS, TAGGING_SYSTEM_MESSAGE),
        };
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens,
            temperature: DEFAULT_TEMPERATURE,
            system_message: system_message.to_string(),
        }
    }

    /// Apply the fields set in `overrides`.
    pub fn apply(&mut self, overrides: &ModelOverrides) {
        if let Some(model) = &overrides.model {
            self.model = model.clone();
        }
        if let Some(max_tokens) = overrides.max_tokens {
            self.max_tokens = max_tokens;
        }
        if let Some(temperature) = overrides.temperature {
            self.temperature = temperature;
        }
        if let Some(system_message) = &overrides.system_message {
            self.system_message = system_message.clone();
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "model must not be empty".to_string(),
            ));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_tokens must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationFailed(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }
        if self.system_message.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "system_message must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Partial model settings, as read from a YAML file or the command line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelOverrides {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub system_message: Option<String>,
}

impl ModelOverrides {
    /// Parse overrides from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Read overrides from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    /// Layer `other` on top of `self`; fields set in `other` win.
    pub fn merged_with(mut self, other: ModelOverrides) -> Self {
        self.model = other.model.or(self.model);
        self.max_tokens = other.max_tokens.or(self.max_tokens);
        self.temperature = other.temperature.or(self.temperature);
        self.system_message = other.system_message.or(self.system_message);
        self
    }
}

/// What to do when a single record cannot be assembled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Skip the record and report it in the run summary.
    #[default]
    Skip,
    /// Abort the run on the first failing record.
    FailFast,
}

/// Everything one batch compilation run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    pub task: PromptTask,
    pub input: PathBuf,
    pub output: PathBuf,
    pub selection: SelectionConfig,
    pub model: ModelConfig,
    pub error_policy: ErrorPolicy,
}

impl BatchConfig {
    /// Creates a configuration with the task's default model settings and
    /// required field.
    pub fn new(task: PromptTask, input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            task,
            input: input.into(),
            output: output.into(),
            selection: SelectionConfig {
                group_filter: None,
                required_field: task.default_required_field(),
            },
            model: ModelConfig::for_task(task),
            error_policy: ErrorPolicy::default(),
        }
    }

    pub fn with_selection(mut self, selection: SelectionConfig) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.model = model;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.model.validate()?;
        if let Some(group) = &self.selection.group_filter {
            if group.is_empty() || group.contains(crate::dataset::ID_SEPARATOR) {
                return Err(ConfigError::ValidationFailed(format!(
                    "invalid group filter '{group}'"
                )));
            }
        }
        if self.input == self.output {
            return Err(ConfigError::ValidationFailed(
                "output path must differ from input path".to_string(),
            ));
        }
        Ok(())
    }
}

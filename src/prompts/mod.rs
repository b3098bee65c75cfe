//! LLM prompts for verse annotation batches.
//!
//! Each batch task renders one user prompt per verse from a fixed template.
//! Rendering is a pure function of the context window: no clock, no
//! randomness, and absent fields are replaced by fixed placeholder text
//! instead of failing.
//!
//! # Architecture
//!
//! - [`refinement`] - consolidate the existing subtopics of a verse
//! - [`tagging`] - generate searchable tags using neighboring verses as context
//!
//! # Usage
//!
//! ```
//! use verse_forge::dataset::{ContextWindow, Record};
//! use verse_forge::prompts::PromptTask;
//!
//! let verse = Record::new("1|1").with_subtopics(["Mercy"]);
//! let prompt = PromptTask::SubtopicRefinement.render(&ContextWindow::isolated(&verse));
//! assert!(prompt.contains("Existing Subtopics: Mercy"));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dataset::{ContextWindow, RequiredField};

pub mod refinement;
pub mod tagging;

pub use refinement::build_refinement_prompt;
pub use tagging::build_tagging_prompt;

pub(crate) const NO_SUBTOPICS: &str = "No subtopics provided";

/// The closed set of prompt templates a batch can be compiled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptTask {
    /// Clean and deduplicate a verse's subtopics. Uses the target only.
    SubtopicRefinement,
    /// Generate search tags. Uses the target and both neighbors.
    TagGeneration,
}

impl PromptTask {
    /// Render the user prompt for `window`.
    pub fn render(&self, window: &ContextWindow<'_>) -> String {
        match self {
            PromptTask::SubtopicRefinement => build_refinement_prompt(window.target),
            PromptTask::TagGeneration => build_tagging_prompt(window),
        }
    }

    /// Annotation the task requires before a record is selected by default.
    pub fn default_required_field(&self) -> Option<RequiredField> {
        match self {
            PromptTask::SubtopicRefinement => Some(RequiredField::Subtopic),
            PromptTask::TagGeneration => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PromptTask::SubtopicRefinement => "subtopic_refinement",
            PromptTask::TagGeneration => "tag_generation",
        }
    }
}

impl fmt::Display for PromptTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comma-join `items`, or return `placeholder` when there are none.
pub(crate) fn join_or(items: &[String], placeholder: &str) -> String {
    if items.is_empty() {
        placeholder.to_string()
    } else {
        items.join(", ")
    }
}

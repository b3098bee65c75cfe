//! Per-record envelope assembly.

use crate::dataset::ContextWindow;
use crate::error::AssemblyError;
use crate::pipeline::ModelConfig;
use crate::prompts::PromptTask;

use super::envelope::{BatchEnvelope, Message, RequestBody};

/// Turns context windows into batch envelopes for one prompt task.
#[derive(Debug, Clone)]
pub struct BatchAssembler {
    task: PromptTask,
    model: ModelConfig,
}

impl BatchAssembler {
    pub fn new(task: PromptTask, model: ModelConfig) -> Self {
        Self { task, model }
    }

    /// Build the envelope for the target of `window`.
    ///
    /// `index` is the target's canonical position and only used to report a
    /// record that has no usable id.
    pub fn assemble(
        &self,
        index: usize,
        window: &ContextWindow<'_>,
    ) -> Result<BatchEnvelope, AssemblyError> {
        let custom_id = window
            .target
            .usable_id()
            .ok_or(AssemblyError::MissingId { index })?;

        let prompt = self.task.render(window);
        let body = RequestBody {
            model: self.model.model.clone(),
            messages: vec![
                Message::system(self.model.system_message.as_str()),
                Message::user(prompt),
            ],
            max_tokens: self.model.max_tokens,
            temperature: self.model.temperature,
        };

        Ok(BatchEnvelope::chat_completion(custom_id, body))
    }
}

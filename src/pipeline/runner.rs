//! Batch compilation runner.
//!
//! [`compile_batch`] is the pure stage: selection, windowing, rendering and
//! assembly over an in-memory record slice. [`run_batch`] wraps it with the
//! dataset load and the batch file write.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::batch::{write_batch_file, BatchAssembler, BatchEnvelope};
use crate::dataset::{load_records, select, ContextWindow, Record, SelectionConfig};
use crate::error::{AssemblyError, PipelineError};
use crate::prompts::PromptTask;

use super::config::{BatchConfig, ErrorPolicy};

/// A selected record that produced no envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub index: usize,
    pub id: Option<String>,
    pub reason: String,
}

/// Output of the pure compilation stage.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledBatch {
    pub considered: usize,
    pub selected: usize,
    pub dropped_by_group: usize,
    pub dropped_missing_field: usize,
    pub envelopes: Vec<BatchEnvelope>,
    pub skipped: Vec<SkippedRecord>,
}

impl CompiledBatch {
    /// Ids that appear on more than one envelope, in first-seen order.
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut duplicates = Vec::new();
        for envelope in &self.envelopes {
            let count = counts.entry(envelope.custom_id.as_str()).or_insert(0);
            *count += 1;
            if *count == 2 {
                duplicates.push(envelope.custom_id.clone());
            }
        }
        duplicates
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub task: PromptTask,
    pub input: PathBuf,
    pub output: PathBuf,
    pub model: String,
    pub group_filter: Option<String>,
    pub considered: usize,
    pub selected: usize,
    pub dropped_by_group: usize,
    pub dropped_missing_field: usize,
    pub written: usize,
    pub skipped: Vec<SkippedRecord>,
    pub duplicate_ids: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// Compile the batch for `records` without touching the filesystem.
///
/// Records are visited in canonical order and each window is resolved
/// against the full `records` slice. Under [`ErrorPolicy::Skip`] a record
/// without a usable id is reported in `skipped`; under
/// [`ErrorPolicy::FailFast`] the first such record aborts compilation.
pub fn compile_batch(
    records: &[Record],
    selection: &SelectionConfig,
    assembler: &BatchAssembler,
    policy: ErrorPolicy,
) -> Result<CompiledBatch, AssemblyError> {
    let selected = select(records, selection);

    let mut envelopes = Vec::with_capacity(selected.len());
    let mut skipped = Vec::new();

    for item in &selected.items {
        let Some(window) = ContextWindow::resolve(records, item.index) else {
            continue;
        };

        match assembler.assemble(item.index, &window) {
            Ok(envelope) => envelopes.push(envelope),
            Err(err) if policy == ErrorPolicy::Skip => {
                warn!(index = item.index, error = %err, "Skipping record");
                skipped.push(SkippedRecord {
                    index: item.index,
                    id: item.record.id.clone(),
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }

    Ok(CompiledBatch {
        considered: selected.considered,
        selected: selected.len(),
        dropped_by_group: selected.dropped_by_group,
        dropped_missing_field: selected.dropped_missing_field,
        envelopes,
        skipped,
    })
}

/// Load the dataset, compile the batch and write the batch file.
///
/// Configuration problems are reported before the dataset is read. The
/// batch file is written even when the selection is empty.
pub fn run_batch(config: &BatchConfig) -> Result<RunSummary, PipelineError> {
    config.validate()?;

    let records = load_records(&config.input)?;
    let assembler = BatchAssembler::new(config.task, config.model.clone());
    let compiled = compile_batch(&records, &config.selection, &assembler, config.error_policy)?;

    let duplicate_ids = compiled.duplicate_ids();
    if !duplicate_ids.is_empty() {
        warn!(
            count = duplicate_ids.len(),
            ids = ?duplicate_ids,
            "Batch contains duplicate custom ids"
        );
    }

    let written = write_batch_file(&config.output, &compiled.envelopes)?;

    info!(
        task = %config.task,
        considered = compiled.considered,
        selected = compiled.selected,
        written,
        skipped = compiled.skipped.len(),
        "Batch compilation finished"
    );

    Ok(RunSummary {
        task: config.task,
        input: config.input.clone(),
        output: config.output.clone(),
        model: config.model.model.clone(),
        group_filter: config.selection.group_filter.clone(),
        considered: compiled.considered,
        selected: compiled.selected,
        dropped_by_group: compiled.dropped_by_group,
        dropped_missing_field: compiled.dropped_missing_field,
        written,
        skipped: compiled.skipped,
        duplicate_ids,
        generated_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::RequiredField;
    use crate::pipeline::ModelConfig;

    fn assembler(task: PromptTask) -> BatchAssembler {
        BatchAssembler::new(task, ModelConfig::for_task(task))
    }

    fn scenario() -> Vec<Record> {
        vec![
            Record::new("1|1").with_subtopics(["Praise"]),
            Record::new("1|2"),
            Record::new("2|1").with_subtopics(["Guidance"]),
        ]
    }

    #[test]
    fn test_compile_scenario() {
        let records = scenario();
        let selection = SelectionConfig::new()
            .with_group("1")
            .with_required_field(RequiredField::Subtopic);
        let compiled = compile_batch(
            &records,
            &selection,
            &assembler(PromptTask::SubtopicRefinement),
            ErrorPolicy::Skip,
        )
        .unwrap();

        assert_eq!(compiled.considered, 3);
        assert_eq!(compiled.selected, 1);
        assert_eq!(compiled.dropped_by_group, 1);
        assert_eq!(compiled.dropped_missing_field, 1);
        assert_eq!(compiled.envelopes.len(), 1);
        assert_eq!(compiled.envelopes[0].custom_id, "1|1");
    }

    #[test]
    fn test_tagging_window_ignores_selection() {
        let records = vec![
            Record::new("1|7").with_arabic("last of group one"),
            Record::new("2|1").with_arabic("first of group two"),
            Record::new("2|2").with_arabic("second of group two"),
        ];
        let compiled = compile_batch(
            &records,
            &SelectionConfig::new().with_group("2"),
            &assembler(PromptTask::TagGeneration),
            ErrorPolicy::Skip,
        )
        .unwrap();

        let first = compiled.envelopes[0].user_prompt().unwrap();
        assert!(first.contains("Previous Verse:\nArabic: last of group one"));
    }

    #[test]
    fn test_skip_policy_reports_missing_ids() {
        let records = vec![
            Record::new("1|1"),
            Record::default().with_arabic("no id"),
            Record::new("1|3"),
        ];
        let compiled = compile_batch(
            &records,
            &SelectionConfig::new(),
            &assembler(PromptTask::TagGeneration),
            ErrorPolicy::Skip,
        )
        .unwrap();

        assert_eq!(compiled.selected, 3);
        assert_eq!(compiled.envelopes.len(), 2);
        assert_eq!(compiled.skipped.len(), 1);
        assert_eq!(compiled.skipped[0].index, 1);
        assert!(compiled.skipped[0].reason.contains("no usable id"));
    }

    #[test]
    fn test_fail_fast_policy_aborts() {
        let records = vec![Record::new("1|1"), Record::default()];
        let result = compile_batch(
            &records,
            &SelectionConfig::new(),
            &assembler(PromptTask::TagGeneration),
            ErrorPolicy::FailFast,
        );
        assert_eq!(result, Err(AssemblyError::MissingId { index: 1 }));
    }

    #[test]
    fn test_duplicate_ids_are_reported_not_removed() {
        let records = vec![Record::new("1|1"), Record::new("1|1"), Record::new("1|1")];
        let compiled = compile_batch(
            &records,
            &SelectionConfig::new(),
            &assembler(PromptTask::TagGeneration),
            ErrorPolicy::Skip,
        )
        .unwrap();

        assert_eq!(compiled.envelopes.len(), 3);
        assert_eq!(compiled.duplicate_ids(), vec!["1|1"]);
    }

    #[test]
    fn test_run_batch_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let config = BatchConfig::new(
            PromptTask::SubtopicRefinement,
            dir.path().join("missing.json"),
            dir.path().join("out.jsonl"),
        );
        let result = run_batch(&config);
        assert!(matches!(result, Err(PipelineError::Load(_))));
        assert!(!dir.path().join("out.jsonl").exists());
    }
}

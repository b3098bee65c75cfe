//! CLI command definitions for verse-forge.
//!
//! One subcommand per prompt task. Both compile a verse dataset into a JSONL
//! batch file for the chat-completions batch endpoint.

use std::path::{Path, PathBuf};

use clap::{Args, Parser};

use crate::batch::read_first_envelope;
use crate::dataset::{RequiredField, SelectionConfig};
use crate::pipeline::{run_batch, BatchConfig, ErrorPolicy, ModelOverrides, RunSummary};
use crate::prompts::PromptTask;

/// Default dataset location.
const DEFAULT_INPUT: &str = "dataset.json";

/// Default output for subtopic refinement batches.
const DEFAULT_SUBTOPICS_OUTPUT: &str = "_openai_subtopic_batch_requests.jsonl";

/// Default output for tag generation batches.
const DEFAULT_TAGS_OUTPUT: &str = "tags_batch_requests/openai_tags_batch_requests.jsonl";

/// Compile annotated verse datasets into LLM batch request files.
#[derive(Parser)]
#[command(name = "verse-forge")]
#[command(about = "Compile annotated verse datasets into LLM batch request files")]
#[command(version)]
#[command(
    long_about = "verse-forge renders one prompt per selected verse and writes the requests as a JSONL file ready for upload to a chat-completions batch API.\n\nExample usage:\n  verse-forge subtopics --input dataset.json --surah 114\n  verse-forge tags --input dataset.json --surah 1 --output tags/al-fatiha.jsonl"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Build requests that clean and deduplicate each verse's subtopics.
    ///
    /// Verses without subtopics are skipped.
    #[command(alias = "refine")]
    Subtopics(SubtopicsArgs),

    /// Build requests that generate search tags using neighboring verses as context.
    #[command(alias = "tag")]
    Tags(TagsArgs),
}

/// Arguments for `verse-forge subtopics`.
#[derive(Parser, Debug)]
pub struct SubtopicsArgs {
    #[command(flatten)]
    pub common: BatchArgs,

    /// Output JSONL batch file.
    #[arg(short = 'o', long, default_value = DEFAULT_SUBTOPICS_OUTPUT)]
    pub output: PathBuf,
}

/// Arguments for `verse-forge tags`.
#[derive(Parser, Debug)]
pub struct TagsArgs {
    #[command(flatten)]
    pub common: BatchArgs,

    /// Output JSONL batch file.
    #[arg(short = 'o', long, default_value = DEFAULT_TAGS_OUTPUT)]
    pub output: PathBuf,

    /// Only tag verses that carry this annotation.
    #[arg(long, value_enum)]
    pub require: Option<RequiredField>,
}

/// Arguments shared by every batch subcommand.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Dataset JSON file (array of verse objects).
    #[arg(short = 'i', long, default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Only process verses whose id starts with "<SURAH>|". All verses when omitted or blank.
    #[arg(short = 's', long, visible_alias = "group")]
    pub surah: Option<String>,

    /// YAML file with model overrides (model, max_tokens, temperature, system_message).
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Model name written into every request.
    #[arg(short = 'm', long, env = "VERSE_FORGE_MODEL")]
    pub model: Option<String>,

    /// Maximum completion tokens per request.
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Sampling temperature (0.0-2.0).
    #[arg(long)]
    pub temperature: Option<f64>,

    /// System message for every request.
    #[arg(long)]
    pub system_message: Option<String>,

    /// Abort on the first verse that cannot be turned into a request.
    #[arg(long)]
    pub fail_fast: bool,

    /// Output JSON summary.
    #[arg(short = 'j', long)]
    pub json: bool,
}

impl BatchArgs {
    fn overrides(&self) -> anyhow::Result<ModelOverrides> {
        let from_file = match &self.config {
            Some(path) => ModelOverrides::from_file(path)?,
            None => ModelOverrides::default(),
        };
        let from_cli = ModelOverrides {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system_message: self.system_message.clone(),
        };
        Ok(from_file.merged_with(from_cli))
    }

    fn batch_config(
        &self,
        task: PromptTask,
        output: &Path,
        required_field: Option<RequiredField>,
    ) -> anyhow::Result<BatchConfig> {
        let mut config = BatchConfig::new(task, &self.input, output);
        config.model.apply(&self.overrides()?);
        config.selection = SelectionConfig {
            group_filter: self.surah.clone().filter(|group| !group.trim().is_empty()),
            required_field,
        };
        if self.fail_fast {
            config.error_policy = ErrorPolicy::FailFast;
        }
        Ok(config)
    }
}

/// Parse CLI arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI with the parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Subtopics(args) => {
            let config = args.common.batch_config(
                PromptTask::SubtopicRefinement,
                &args.output,
                PromptTask::SubtopicRefinement.default_required_field(),
            )?;
            run_batch_command(&config, args.common.json)
        }
        Commands::Tags(args) => {
            let config =
                args.common
                    .batch_config(PromptTask::TagGeneration, &args.output, args.require)?;
            run_batch_command(&config, args.common.json)
        }
    }
}

fn run_batch_command(config: &BatchConfig, json: bool) -> anyhow::Result<()> {
    if !config.input.exists() {
        anyhow::bail!(
            "Input file '{}' not found. Make sure the JSON dataset file exists.",
            config.input.display()
        );
    }

    let summary = run_batch(config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    print_summary(&summary);
    if summary.written > 0 {
        print_sample(&summary.output);
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("✓ Batch file created successfully");
    println!("  Task:            {}", summary.task);
    println!("  File:            {}", summary.output.display());
    match &summary.group_filter {
        Some(group) => println!("  Surah filter:    {group}"),
        None => println!("  Surah filter:    all"),
    }
    println!("  Verses in data:  {}", summary.considered);
    println!("  Selected:        {}", summary.selected);
    println!("  Requests:        {}", summary.written);

    if summary.dropped_missing_field > 0 {
        println!(
            "  Missing annotation: {} verse(s) skipped",
            summary.dropped_missing_field
        );
    }
    if !summary.skipped.is_empty() {
        println!("  Skipped verses:");
        for skipped in &summary.skipped {
            println!(
                "    #{} ({}): {}",
                skipped.index,
                skipped.id.as_deref().unwrap_or("no id"),
                skipped.reason
            );
        }
    }
    if !summary.duplicate_ids.is_empty() {
        println!(
            "  Warning: duplicate custom ids: {}",
            summary.duplicate_ids.join(", ")
        );
    }
    println!();
    println!("You can now upload this file to the batch API.");
}

fn print_sample(path: &Path) {
    match read_first_envelope(path) {
        Ok(Some(sample)) => {
            println!();
            println!("Sample request structure:");
            println!("  Custom ID:   {}", sample.custom_id);
            println!("  Model:       {}", sample.body.model);
            println!("  Max tokens:  {}", sample.body.max_tokens);
            println!("  Temperature: {}", sample.body.temperature);
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Failed to read back sample request"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_subtopics_defaults() {
        let cli = Cli::try_parse_from(["verse-forge", "subtopics", "--surah", "114"]).unwrap();
        let Commands::Subtopics(args) = cli.command else {
            panic!("expected subtopics command");
        };
        let config = args
            .common
            .batch_config(
                PromptTask::SubtopicRefinement,
                &args.output,
                PromptTask::SubtopicRefinement.default_required_field(),
            )
            .unwrap();

        assert_eq!(config.input, PathBuf::from(DEFAULT_INPUT));
        assert_eq!(config.output, PathBuf::from(DEFAULT_SUBTOPICS_OUTPUT));
        assert_eq!(config.selection.group_filter.as_deref(), Some("114"));
        assert_eq!(config.selection.required_field, Some(RequiredField::Subtopic));
        assert_eq!(config.model.max_tokens, 300);
        assert_eq!(config.error_policy, ErrorPolicy::Skip);
    }

    #[test]
    fn test_tags_overrides() {
        let cli = Cli::try_parse_from([
            "verse-forge",
            "tags",
            "--group",
            "1",
            "--require",
            "topic",
            "--max-tokens",
            "200",
            "--temperature",
            "0.3",
            "--fail-fast",
        ])
        .unwrap();
        let Commands::Tags(args) = cli.command else {
            panic!("expected tags command");
        };
        let config = args
            .common
            .batch_config(PromptTask::TagGeneration, &args.output, args.require)
            .unwrap();

        assert_eq!(config.selection.group_filter.as_deref(), Some("1"));
        assert_eq!(config.selection.required_field, Some(RequiredField::Topic));
        assert_eq!(config.model.max_tokens, 200);
        assert_eq!(config.model.temperature, 0.3);
        assert_eq!(config.error_policy, ErrorPolicy::FailFast);
    }

    #[test]
    fn test_cli_overrides_beat_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.yaml");
        std::fs::write(&path, "model: from-file\nmax_tokens: 99\n").unwrap();

        let cli = Cli::try_parse_from([
            "verse-forge",
            "tags",
            "--config",
            path.to_str().unwrap(),
            "--max-tokens",
            "120",
        ])
        .unwrap();
        let Commands::Tags(args) = cli.command else {
            panic!("expected tags command");
        };
        let overrides = args.common.overrides().unwrap();

        assert_eq!(overrides.max_tokens, Some(120));
        if std::env::var_os("VERSE_FORGE_MODEL").is_none() {
            assert_eq!(overrides.model.as_deref(), Some("from-file"));
        }
    }

    #[test]
    fn test_blank_surah_selects_all_verses() {
        for surah in ["", "  "] {
            let cli = Cli::try_parse_from(["verse-forge", "tags", "--surah", surah]).unwrap();
            let Commands::Tags(args) = cli.command else {
                panic!("expected tags command");
            };
            let config = args
                .common
                .batch_config(PromptTask::TagGeneration, &args.output, args.require)
                .unwrap();

            assert_eq!(config.selection.group_filter, None);
            assert!(config.validate().is_ok());
        }
    }
}

//! Property tests for selection, context windows and prompt rendering.

use proptest::prelude::*;
use verse_forge::batch::BatchAssembler;
use verse_forge::dataset::{select, ContextWindow, Record, RequiredField, SelectionConfig};
use verse_forge::pipeline::{compile_batch, ErrorPolicy, ModelConfig};
use verse_forge::prompts::PromptTask;

fn record_strategy() -> impl Strategy<Value = Record> {
    (
        1u32..4,
        1u32..8,
        proptest::option::of("[a-z ]{1,12}"),
        proptest::collection::btree_map(1u32..5, "[a-z]{1,8}", 0..4),
        proptest::collection::vec("[A-Z][a-z]{2,6}", 0..3),
        proptest::collection::vec("[A-Z][a-z]{2,6}", 0..3),
    )
        .prop_map(|(group, position, arabic, translations, topic, subtopic)| {
            let mut record = Record::new(format!("{group}|{position}"))
                .with_topics(topic)
                .with_subtopics(subtopic);
            record.arabic = arabic;
            for (number, text) in translations {
                record = record.with_translation(number, text);
            }
            record
        })
}

fn selection_strategy() -> impl Strategy<Value = SelectionConfig> {
    (
        proptest::option::of((1u32..4).prop_map(|g| g.to_string())),
        proptest::option::of(prop_oneof![
            Just(RequiredField::Topic),
            Just(RequiredField::Subtopic)
        ]),
    )
        .prop_map(|(group_filter, required_field)| SelectionConfig {
            group_filter,
            required_field,
        })
}

fn neighbor_ids(window: &ContextWindow<'_>) -> (Option<String>, Option<String>) {
    (
        window.previous.and_then(|r| r.id.clone()),
        window.next.and_then(|r| r.id.clone()),
    )
}

proptest! {
    #[test]
    fn selection_is_ordered_subsequence(
        records in proptest::collection::vec(record_strategy(), 0..20),
        config in selection_strategy(),
    ) {
        let selection = select(&records, &config);
        let indices = selection.indices();

        prop_assert!(indices.windows(2).all(|pair| pair[0] < pair[1]));
        for item in &selection.items {
            prop_assert_eq!(&records[item.index], item.record);
            prop_assert!(config.keeps(item.record));
        }
        prop_assert_eq!(
            selection.len() + selection.dropped_by_group + selection.dropped_missing_field,
            records.len()
        );
        prop_assert_eq!(select(&records, &config), selection);
    }

    #[test]
    fn windows_do_not_depend_on_selection(
        records in proptest::collection::vec(record_strategy(), 1..20),
        first in selection_strategy(),
        second in selection_strategy(),
    ) {
        let windows_a: Vec<_> = select(&records, &first)
            .items
            .iter()
            .map(|item| (item.index, neighbor_ids(&ContextWindow::resolve(&records, item.index).unwrap())))
            .collect();
        let windows_b: Vec<_> = select(&records, &second)
            .items
            .iter()
            .map(|item| (item.index, neighbor_ids(&ContextWindow::resolve(&records, item.index).unwrap())))
            .collect();

        for (index, neighbors) in &windows_a {
            if let Some((_, other)) = windows_b.iter().find(|(i, _)| i == index) {
                prop_assert_eq!(neighbors, other);
            }
        }

        let first_window = ContextWindow::resolve(&records, 0).unwrap();
        let last_window = ContextWindow::resolve(&records, records.len() - 1).unwrap();
        prop_assert!(first_window.previous.is_none());
        prop_assert!(last_window.next.is_none());
    }

    #[test]
    fn rendering_is_deterministic(
        records in proptest::collection::vec(record_strategy(), 1..6),
        index in 0usize..6,
    ) {
        let index = index % records.len();
        let window = ContextWindow::resolve(&records, index).unwrap();
        for task in [PromptTask::SubtopicRefinement, PromptTask::TagGeneration] {
            prop_assert_eq!(task.render(&window), task.render(&window));
        }
    }

    #[test]
    fn refinement_lists_each_translation_once(record in record_strategy()) {
        let prompt = PromptTask::SubtopicRefinement.render(&ContextWindow::isolated(&record));
        let count = record.translations.len();

        for n in 1..=count {
            let label = format!("Translation {n}: \"");
            prop_assert!(prompt.contains(&label));
        }
        let beyond = format!("Translation {}: \"", count + 1);
        prop_assert!(!prompt.contains(&beyond));
    }

    #[test]
    fn envelopes_follow_selection_order(
        records in proptest::collection::vec(record_strategy(), 0..20),
        config in selection_strategy(),
    ) {
        let task = PromptTask::TagGeneration;
        let assembler = BatchAssembler::new(task, ModelConfig::for_task(task));
        let compiled = compile_batch(&records, &config, &assembler, ErrorPolicy::Skip).unwrap();

        let expected: Vec<String> = select(&records, &config)
            .items
            .iter()
            .filter_map(|item| item.record.id.clone())
            .collect();
        let actual: Vec<String> = compiled.envelopes.iter().map(|e| e.custom_id.clone()).collect();
        prop_assert_eq!(actual, expected);
    }
}

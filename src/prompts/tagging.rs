//! Tag generation prompt.
//!
//! Tags are generated with the previous and next verse as context. Neighbors
//! only contribute their Arabic text and first translation.

use crate::dataset::{ContextWindow, Record};

use super::{join_or, NO_SUBTOPICS};

pub(crate) const NO_PREVIOUS_VERSE: &str = "No previous verse available";
pub(crate) const NO_NEXT_VERSE: &str = "No next verse available";
pub(crate) const NO_ARABIC: &str = "No Arabic text available";
pub(crate) const NO_NEIGHBOR_TRANSLATION: &str = "No translation available";
pub(crate) const NO_TOPICS: &str = "No topics provided";

/// Build the tagging prompt for the target of `window`.
pub fn build_tagging_prompt(window: &ContextWindow<'_>) -> String {
    let previous = format_neighbor(window.previous, NO_PREVIOUS_VERSE);
    let next = format_neighbor(window.next, NO_NEXT_VERSE);

    let target = window.target;
    let arabic = target.arabic.as_deref().unwrap_or(NO_ARABIC);
    let translation1 = target_translation(target, 1);
    let translation2 = target_translation(target, 2);
    let translation3 = target_translation(target, 3);
    let topics = join_or(&target.topic, NO_TOPICS);
    let subtopics = join_or(&target.subtopic, NO_SUBTOPICS);

    format!(
        r##"You are an expert Islamic scholar specializing in Quranic interpretation and semantic analysis. Your task is to generate concise and meaningful tags for a Target Quranic verse, making them relevant to general user queries about Islamic beliefs, practices, history, and ethical guidance.

You will be provided:
- The verse immediately before and after (with Arabic and one translation for context)
- The target verse with Arabic text, three translations, and existing scholarly topics/subtopics

## Objective:
Generate 2 tags for the Target Verse that will help users discover the verse through natural-language religious queries, such as:
- "What does Islam say about zakat?"
- "How were the Israelites saved in Islam?"
- "Are there Quranic stories of origin of life?"
- "What does the Quran say about women rights?"

These tags will be used in a Quran search tool that indexes verses semantically.

## Tag Guidelines:
- Use phrases that match likely user queries (e.g., "Quran on tyranny", "story of Israelites")
- Do not repeat the verse text; instead, summarize key themes in searchable language
- Consider:
  * Historical events (e.g., Israelites' rescue)
  * Ethical and social issues (e.g., persecution, gendered violence)
  * Sectors of society (e.g., women, children, oppressed)
  * Broader Islamic teachings (e.g., divine justice, trials of the believers)
- Tags should be specific, concise, and searchable
- Prioritize relevance to Islamic themes commonly asked about

## Context Information:

Previous Verse:
{previous}

Next Verse:
{next}

Target Verse:
Arabic: {arabic}
Translation1: {translation1}
Translation2: {translation2}
Translation3: {translation3}
Topics: {topics}
Subtopics: {subtopics}

## Output Format:
Return only valid JSON in this exact format:
{{
  "tags": ["tag1", "tag2"]
}}"##
    )
}

fn format_neighbor(neighbor: Option<&Record>, missing: &str) -> String {
    match neighbor {
        Some(verse) => format!(
            "Arabic: {}\nTranslation: {}",
            verse.arabic.as_deref().unwrap_or(NO_ARABIC),
            verse.translation(1).unwrap_or(NO_NEIGHBOR_TRANSLATION),
        ),
        None => missing.to_string(),
    }
}

fn target_translation(target: &Record, number: u32) -> String {
    target
        .translation(number)
        .map(str::to_string)
        .unwrap_or_else(|| format!("No translation{number} available"))
}

//! Subtopic refinement prompt.
//!
//! Asks the model to consolidate and deduplicate the existing subtopics of a
//! single verse. Neighboring verses are not part of this prompt.

use crate::dataset::Record;

use super::{join_or, NO_SUBTOPICS};

pub(crate) const NO_ARABIC: &str = "No Arabic text provided";
pub(crate) const NO_TRANSLATIONS: &str = "No translations provided";

/// Build the refinement prompt for `target`.
///
/// Every present translation is listed, renumbered from 1 in source order.
pub fn build_refinement_prompt(target: &Record) -> String {
    let arabic = target.arabic.as_deref().unwrap_or(NO_ARABIC);
    let translations = format_translations(target);
    let subtopics = join_or(&target.subtopic, NO_SUBTOPICS);

    format!(
        r##"You are an expert Islamic scholar specializing in Quranic interpretation and semantic analysis. Your task is to refine and clean subtopics for a given Quranic verse, ensuring maximum relevance, accuracy, and precision.

## Core Objectives:
### 1. Relevance Analysis
- **Direct Connection**: Keep only subtopics that directly relate to the verse's explicit content
- **Contextual Relevance**: Include subtopics that connect to the verse's broader thematic context
- **Semantic Precision**: Ensure subtopics capture the specific meaning, not just general concepts

### 2. Quality Control
- **Theological Accuracy**: Verify all subtopics align with authentic Islamic teachings
- **Linguistic Precision**: Correct spelling, grammar, and formatting
- **Conceptual Clarity**: Ensure subtopics are clear and unambiguous

### 3. Deduplication Process
- **Exact Duplicates**: Remove identical entries
- **Semantic Duplicates**: Merge similar concepts (e.g., "Adoption" and "Adopted sons" → "Adoption")
- **Hierarchical Duplicates**: Remove overly specific terms when broader terms exist
- **Linguistic Variations**: Consolidate Arabic/English variations of same concept

## Filtering Criteria:
### KEEP subtopics that are:
- **Explicitly mentioned** in the verse text
- **Core theological concepts** directly addressed
- **Key legal/jurisprudential terms** specifically relevant
- **Precise Arabic terminology** when more accurate than English
- **Actionable concepts** that users would search for

### REMOVE subtopics that are:
- **Too generic** (e.g., "Islam", "Quran", "God" unless specifically relevant)
- **Tangentially related** (mentioned in broader chapter context but not this verse)
- **Redundant** (covered by other, better subtopics)
- **Misspelled or poorly formatted**
- **Overly specific** without clear connection to verse meaning
- **Grammatical fragments** (e.g., "speaks the truth" when "Truth" suffices)

## Refinement Process:
1. **Extract Core Themes**: Identify 3-5 main concepts from the verse
2. **Map Subtopics**: Match existing subtopics to these core themes
3. **Consolidate Synonyms**: Merge related terms into single, best representation
4. **Verify Theological Accuracy**: Cross-check against Islamic scholarship
5. **Optimize for Searchability**: Ensure terms users would actually search for
6. **Prioritize Precision**: Prefer specific, accurate terms over generic ones

## Input Format:
Target Verse:

Arabic: [Arabic text]
Translation 1: [English translation]
Translation 2: [English translation]
Translation 3: [English translation] 
Existing Subtopics: [List of current subtopics]

## Output Requirements:
Return **only** valid JSON in this exact format:
{{
  "cleaned_subtopics": [
    "subtopic1",
    "subtopic2",
    "subtopic3"
  ]
}}
Quality Metrics:
Relevance Score: Each subtopic should have direct textual or thematic connection
Uniqueness: No semantic overlap between final subtopics
Precision: Specific enough to be meaningful, general enough to be searchable
Accuracy: Theologically sound and linguistically correct
Example Refinement:
Before: ["inheritance", "succession", "Mirath", "adapted sons", "Sons", "Child"]
After: ["Inheritance", "succession", "adapted sons"]

Remember: The goal is to create a precise, non-redundant set of subtopics that capture the verse's essential meaning and themes while being optimized for user search behavior.

Target Verse:

Arabic: {arabic}
Translations: {translations}
Existing Subtopics: {subtopics}
"##
    )
}

fn format_translations(target: &Record) -> String {
    let lines: Vec<String> = target
        .present_translations()
        .enumerate()
        .map(|(i, text)| format!("Translation {}: \"{}\"", i + 1, text))
        .collect();

    if lines.is_empty() {
        NO_TRANSLATIONS.to_string()
    } else {
        lines.join("\n")
    }
}

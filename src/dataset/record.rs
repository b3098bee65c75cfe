//! Verse record model.
//!
//! Records are loaded from the dataset's JSON objects. Textual fields are
//! explicit presence-or-absent values: a missing key, a JSON `null` and an
//! empty string all load as `None`, so renderers never have to reason about
//! empty strings.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Key prefix shared by all numbered translation fields.
const TRANSLATION_PREFIX: &str = "translation";

/// Separator between the group and the position in a composite record id.
pub const ID_SEPARATOR: char = '|';

/// One annotated verse from the canonical store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawRecord")]
pub struct Record {
    /// Composite key of the form `"<group>|<position>"`.
    pub id: Option<String>,
    /// Arabic source text.
    pub arabic: Option<String>,
    /// Present translations keyed by their source number (`translation3` -> 3).
    pub translations: BTreeMap<u32, String>,
    /// Scholarly topics, in source order.
    pub topic: Vec<String>,
    /// Scholarly subtopics, in source order.
    pub subtopic: Vec<String>,
}

impl Record {
    /// Creates a record with only an id set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Sets the Arabic text.
    pub fn with_arabic(mut self, arabic: impl Into<String>) -> Self {
        self.arabic = non_empty(arabic.into());
        self
    }

    /// Sets translation number `number`.
    pub fn with_translation(mut self, number: u32, text: impl Into<String>) -> Self {
        if let Some(text) = non_empty(text.into()) {
            self.translations.insert(number, text);
        }
        self
    }

    /// Sets the topic list.
    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topic = topics.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the subtopic list.
    pub fn with_subtopics<I, S>(mut self, subtopics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subtopic = subtopics.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the id when it is present and not blank.
    pub fn usable_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.trim().is_empty())
    }

    /// Returns true when the id belongs to `group` (`"<group>|..."`).
    pub fn in_group(&self, group: &str) -> bool {
        self.id
            .as_deref()
            .and_then(|id| id.strip_prefix(group))
            .is_some_and(|rest| rest.starts_with(ID_SEPARATOR))
    }

    /// Returns translation `number`, if present.
    pub fn translation(&self, number: u32) -> Option<&str> {
        self.translations.get(&number).map(String::as_str)
    }

    /// Present translations in source-number order.
    pub fn present_translations(&self) -> impl Iterator<Item = &str> {
        self.translations.values().map(String::as_str)
    }

    /// Returns the list attribute named by `field`.
    pub fn annotations(&self, field: RequiredField) -> &[String] {
        match field {
            RequiredField::Topic => &self.topic,
            RequiredField::Subtopic => &self.subtopic,
        }
    }
}

/// Annotation list a record must carry to be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RequiredField {
    Topic,
    Subtopic,
}

/// Wire shape of a dataset object before normalization.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default, deserialize_with = "optional_text")]
    id: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    arabic: Option<String>,
    #[serde(default)]
    topic: Option<Vec<String>>,
    #[serde(default)]
    subtopic: Option<Vec<String>>,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_json::Value>,
}

impl TryFrom<RawRecord> for Record {
    type Error = String;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let mut translations = BTreeMap::new();
        for (key, value) in raw.extra {
            let Some(number) = translation_number(&key) else {
                continue;
            };
            match value {
                serde_json::Value::Null => {}
                serde_json::Value::String(text) => {
                    if let Some(text) = non_empty(text) {
                        translations.insert(number, text);
                    }
                }
                other => {
                    return Err(format!("field '{key}' must be a string, found {other}"));
                }
            }
        }

        Ok(Self {
            id: raw.id,
            arabic: raw.arabic,
            translations,
            topic: raw.topic.unwrap_or_default(),
            subtopic: raw.subtopic.unwrap_or_default(),
        })
    }
}

/// Parses `translation<N>` keys; `N` must be a positive integer written
/// without leading zeros, so every number has exactly one key.
fn translation_number(key: &str) -> Option<u32> {
    let digits = key.strip_prefix(TRANSLATION_PREFIX)?;
    if digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.and_then(non_empty))
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

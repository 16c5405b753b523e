use std::collections::BTreeMap;

use spdlog::Logger;

use crate::content::ContentItem;

/// `translation_id -> language -> url`, used for language switchers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationMap(BTreeMap<String, BTreeMap<String, String>>);

impl TranslationMap {
    /// Builds the map over items of every language.
    ///
    /// When two items share a (translation id, language) pair, the later one
    /// wins and a warning is logged.
    pub fn build<'a, I>(items: I, logger: &Logger) -> TranslationMap
    where
        I: IntoIterator<Item = &'a ContentItem>,
    {
        let mut map = TranslationMap::default();
        for item in items {
            let key = item.translation_key();
            if let Some(previous) = map.insert(key, &item.language, &item.url) {
                spdlog::warn!(logger: logger,
                    "Duplicate translation '{}' for language '{}': {} replaces {}",
                    key, item.language, item.url, previous);
            }
        }
        map
    }

    /// Returns the URL that was replaced, if any.
    pub fn insert(&mut self, translation_id: &str, lang: &str, url: &str) -> Option<String> {
        self.0.entry(translation_id.to_string())
            .or_default()
            .insert(lang.to_string(), url.to_string())
    }

    pub fn get(&self, translation_id: &str) -> Option<&BTreeMap<String, String>> {
        self.0.get(translation_id)
    }

    pub fn for_item(&self, item: &ContentItem) -> Option<&BTreeMap<String, String>> {
        self.get(item.translation_key())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

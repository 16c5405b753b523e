use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::content::frontmatter::normalize_list_fields;
use crate::text_utils::{normalize_date, slugify};

/// Fills defaults and normalizes the raw frontmatter of a content file.
#[derive(Debug, Clone, Default)]
pub struct MetadataProcessor {
    defaults: Map<String, Value>,
}

fn non_empty_slug(source: &str) -> Option<String> {
    let slug = slugify(source);
    if slug.is_empty() { None } else { Some(slug) }
}

fn has_text(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

impl MetadataProcessor {
    pub fn new(defaults: Map<String, Value>) -> Self {
        MetadataProcessor { defaults }
    }

    pub fn process(&self, metadata: Map<String, Value>, slug_source: Option<&str>) -> Map<String, Value> {
        let mut result = metadata;

        for (key, default) in &self.defaults {
            if !result.contains_key(key) {
                result.insert(key.clone(), default.clone());
            }
        }

        normalize_list_fields(&mut result);

        if !has_text(result.get("slug")) {
            let title = result.get("title").and_then(Value::as_str).map(str::to_string);
            let slug = slug_source.and_then(non_empty_slug)
                .or_else(|| title.as_deref().and_then(non_empty_slug));
            if let Some(slug) = slug {
                result.insert("slug".to_string(), Value::String(slug));
            }
        }

        if let Some(date) = result.get_mut("date") {
            *date = match &*date {
                Value::String(s) => normalize_date(s).map(Value::String).unwrap_or(Value::Null),
                Value::Null => Value::Null,
                other => Value::String(other.to_string()),
            };
        }

        result
    }

    /// Assembles the `page` context handed to templates.
    ///
    /// Metadata keys overlay the structural ones, except `lang` and `url`
    /// which are always the computed values.
    pub fn build_page_context(&self,
                              metadata: &Map<String, Value>,
                              lang: &str,
                              url: &str,
                              content_translations: Option<&BTreeMap<String, String>>,
                              pagination: Option<Value>) -> Map<String, Value> {
        let mut context = Map::new();
        let translations: Map<String, Value> = content_translations
            .map(|t| t.iter().map(|(k, v)| (k.clone(), Value::String(v.clone()))).collect())
            .unwrap_or_default();
        let pagination = pagination.unwrap_or_else(|| {
            let mut empty = Map::new();
            empty.insert("items".to_string(), Value::Array(vec![]));
            Value::Object(empty)
        });

        context.insert("content_translations".to_string(), Value::Object(translations));
        context.insert("pagination".to_string(), pagination);
        for (key, value) in metadata {
            context.insert(key.clone(), value.clone());
        }
        context.insert("lang".to_string(), Value::String(lang.to_string()));
        context.insert("url".to_string(), Value::String(url.to_string()));
        context
    }

    pub fn extract_translation_id(&self, metadata: &Map<String, Value>, fallback: &str) -> String {
        match metadata.get("translation_id") {
            Some(Value::String(id)) if !id.trim().is_empty() => id.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => fallback.to_string(),
        }
    }

    pub fn get_template_name<'a>(&self, metadata: &'a Map<String, Value>, default: &'a str) -> &'a str {
        metadata.get("template")
            .and_then(Value::as_str)
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn processor() -> MetadataProcessor {
        MetadataProcessor::new(map(json!({"author": "Z"})))
    }

    #[test]
    fn test_defaults_do_not_override() {
        let result = processor().process(map(json!({"title": "x", "author": "Y"})), None);
        assert_eq!(result["author"], json!("Y"));

        let result = processor().process(map(json!({"title": "x"})), None);
        assert_eq!(result["author"], json!("Z"));
    }

    #[test]
    fn test_list_fields_always_present() {
        let result = processor().process(map(json!({"tags": "a, b"})), None);
        assert_eq!(result["categories"], json!([]));
        assert_eq!(result["meta_keywords"], json!([]));
        assert_eq!(result["tags"], json!(["a", "b"]));
    }

    #[test]
    fn test_slug_derivation_order() {
        let p = processor();
        let explicit = p.process(map(json!({"slug": "mine", "title": "Titre"})), Some("file"));
        assert_eq!(explicit["slug"], json!("mine"));

        let from_source = p.process(map(json!({"title": "Titre"})), Some("Mon Fichier"));
        assert_eq!(from_source["slug"], json!("mon-fichier"));

        let from_title = p.process(map(json!({"title": "Été à Paris"})), None);
        assert_eq!(from_title["slug"], json!("ete-a-paris"));

        let blank = p.process(map(json!({"slug": "  ", "title": "Été"})), None);
        assert_eq!(blank["slug"], json!("ete"));

        let unset = p.process(Map::new(), None);
        assert!(unset.get("slug").is_none());
    }

    #[test]
    fn test_date_normalization() {
        let p = processor();
        assert_eq!(p.process(map(json!({"date": "2025-03-04 08:00:00"})), None)["date"], json!("2025-03-04"));
        assert_eq!(p.process(map(json!({"date": " 2025-03-04 "})), None)["date"], json!("2025-03-04"));
        assert_eq!(p.process(map(json!({"date": ""})), None)["date"], Value::Null);
        assert_eq!(p.process(map(json!({"date": 2025})), None)["date"], json!("2025"));
        assert!(p.process(Map::new(), None).get("date").is_none());
    }

    #[test]
    fn test_process_is_idempotent() {
        let p = processor();
        let once = p.process(map(json!({"title": "T", "tags": "a", "date": "2025-01-01"})), Some("t"));
        let twice = p.process(once.clone(), Some("t"));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_build_page_context() {
        let p = processor();
        let metadata = map(json!({"title": "T", "url": "/forged", "lang": "xx", "pagination": "mine"}));
        let mut translations = BTreeMap::new();
        translations.insert("en".to_string(), "/en/t".to_string());

        let context = p.build_page_context(&metadata, "fr", "/fr/t", Some(&translations), None);
        assert_eq!(context["url"], json!("/fr/t"));
        assert_eq!(context["lang"], json!("fr"));
        assert_eq!(context["title"], json!("T"));
        assert_eq!(context["pagination"], json!("mine"));
        assert_eq!(context["content_translations"], json!({"en": "/en/t"}));

        let context = p.build_page_context(&Map::new(), "fr", "/", None, None);
        assert_eq!(context["pagination"], json!({"items": []}));
        assert_eq!(context["content_translations"], json!({}));
    }

    #[test]
    fn test_translation_id_and_template() {
        let p = processor();
        let metadata = map(json!({"translation_id": "hello", "template": "pages/special.html"}));
        assert_eq!(p.extract_translation_id(&metadata, "bonjour"), "hello");
        assert_eq!(p.extract_translation_id(&Map::new(), "bonjour"), "bonjour");
        assert_eq!(p.get_template_name(&metadata, "pages/page.html"), "pages/special.html");
        assert_eq!(p.get_template_name(&Map::new(), "pages/page.html"), "pages/page.html");
    }
}

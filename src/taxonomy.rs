use std::collections::BTreeMap;
use std::ptr;

use spdlog::Logger;

use crate::content::ContentItem;
use crate::routing::RouteInfo;
use crate::text_utils::slugify;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxonomyField {
    Categories,
    Keywords,
    Tags,
}

impl TaxonomyField {
    pub fn labels<'a>(&self, item: &'a ContentItem) -> &'a [String] {
        match self {
            TaxonomyField::Categories => &item.categories,
            TaxonomyField::Keywords => &item.keywords,
            TaxonomyField::Tags => &item.tags,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TaxonomyField::Categories => "categories",
            TaxonomyField::Keywords => "meta_keywords",
            TaxonomyField::Tags => "tags",
        }
    }
}

/// Items sharing one normalized label, partitioned by language.
#[derive(Debug, Clone)]
pub struct TaxonomyGroup<'a> {
    pub key: String,
    /// First label seen for this key in any language.
    pub label: String,
    /// First label seen for this key in each language, for display.
    pub labels: BTreeMap<String, String>,
    pub by_language: BTreeMap<String, Vec<&'a ContentItem>>,
}

/// One page to emit: a (group, language) pair with at least one item.
#[derive(Debug, Clone)]
pub struct TaxonomyPage<'a> {
    pub key: String,
    pub label: String,
    pub lang: String,
    pub route: RouteInfo,
    pub items: Vec<&'a ContentItem>,
}

/// Groups items by the slug of each label of `field`.
///
/// Labels that slugify differently only by case or accents collapse into one
/// group. A label with an empty slug cannot be routed; it is skipped with a
/// warning. Items keep their input order inside each group.
pub fn index<'a, I>(items: I, field: TaxonomyField, logger: &Logger) -> BTreeMap<String, TaxonomyGroup<'a>>
where
    I: IntoIterator<Item = &'a ContentItem>,
{
    let mut groups: BTreeMap<String, TaxonomyGroup<'a>> = BTreeMap::new();

    for item in items {
        for label in field.labels(item) {
            let key = slugify(label);
            if key.is_empty() {
                spdlog::warn!(logger: logger, "Ignoring {} label '{}' in {}: it has no usable slug",
                    field.name(), label, item.source.display());
                continue;
            }

            let group = groups.entry(key.clone()).or_insert_with(|| TaxonomyGroup {
                key,
                label: label.clone(),
                labels: BTreeMap::new(),
                by_language: BTreeMap::new(),
            });
            group.labels.entry(item.language.clone()).or_insert_with(|| label.clone());
            let bucket = group.by_language.entry(item.language.clone()).or_default();
            if !bucket.iter().any(|existing| ptr::eq(*existing, item)) {
                bucket.push(item);
            }
        }
    }

    groups
}

/// Expands groups into pages, routing each (key, language) pair with `route`.
pub fn pages<'a, F>(groups: &BTreeMap<String, TaxonomyGroup<'a>>, route: F) -> Vec<TaxonomyPage<'a>>
where
    F: Fn(&str, &str) -> RouteInfo,
{
    let mut pages = vec![];
    for group in groups.values() {
        for (lang, items) in &group.by_language {
            if items.is_empty() {
                continue;
            }
            pages.push(TaxonomyPage {
                key: group.key.clone(),
                label: group.labels.get(lang).unwrap_or(&group.label).clone(),
                lang: lang.clone(),
                route: route(&group.key, lang),
                items: items.clone(),
            });
        }
    }
    pages
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde_json::{json, Map, Value};

    use crate::content::content_file::ContentFile;
    use crate::content::ContentKind;

    use super::*;

    fn item(slug: &str, lang: &str, tags: Value) -> ContentItem {
        let file = ContentFile {
            stem: slug.to_string(),
            file_path: PathBuf::from(format!("{}.md", slug)),
            raw_content: String::new(),
        };
        let mut metadata = Map::new();
        metadata.insert("tags".to_string(), tags);
        ContentItem::from_metadata(ContentKind::Post, lang, &file, metadata, String::new())
    }

    #[test]
    fn test_labels_collapse_into_one_group() {
        let items = vec![
            item("a", "fr", json!(["Économie"])),
            item("b", "fr", json!(["economie", "Rust"])),
            item("c", "en", json!(["ECONOMIE"])),
        ];
        let groups = index(&items, TaxonomyField::Tags, &spdlog::default_logger());
        assert_eq!(groups.keys().collect::<Vec<_>>(), ["economie", "rust"]);

        let economie = &groups["economie"];
        assert_eq!(economie.label, "Économie");
        assert_eq!(economie.labels["fr"], "Économie");
        assert_eq!(economie.labels["en"], "ECONOMIE");
        let fr: Vec<&str> = economie.by_language["fr"].iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(fr, ["a", "b"]);
        assert_eq!(economie.by_language["en"].len(), 1);
    }

    #[test]
    fn test_same_item_listed_once_per_group() {
        let items = vec![item("a", "fr", json!(["Rust", "rust", "RUST"]))];
        let groups = index(&items, TaxonomyField::Tags, &spdlog::default_logger());
        assert_eq!(groups["rust"].by_language["fr"].len(), 1);
    }

    #[test]
    fn test_unroutable_labels_are_skipped() {
        let items = vec![item("a", "fr", json!(["!!!", "ok"]))];
        let groups = index(&items, TaxonomyField::Tags, &spdlog::default_logger());
        assert_eq!(groups.len(), 1);
        assert!(groups.contains_key("ok"));
    }

    #[test]
    fn test_field_selection() {
        let mut post = item("a", "fr", json!(["t"]));
        post.categories = vec!["Cat".to_string()];
        post.keywords = vec!["kw".to_string()];
        let items = vec![post];
        let logger = spdlog::default_logger();
        assert!(index(&items, TaxonomyField::Categories, &logger).contains_key("cat"));
        assert!(index(&items, TaxonomyField::Keywords, &logger).contains_key("kw"));
        assert!(index(&items, TaxonomyField::Tags, &logger).contains_key("t"));
    }

    #[test]
    fn test_pages_per_group_and_language() {
        let items = vec![item("a", "fr", json!(["Rust"])), item("b", "en", json!(["Rust", "Web"]))];
        let groups = index(&items, TaxonomyField::Tags, &spdlog::default_logger());
        let pages = pages(&groups, |key, lang| RouteInfo {
            url: format!("/{}/blog/tags/{}", lang, key),
            output_path: PathBuf::from(format!("dist/{}/blog/tags/{}/index.html", lang, key)),
            is_index: false,
        });
        let urls: Vec<&str> = pages.iter().map(|p| p.route.url.as_str()).collect();
        assert_eq!(urls, ["/en/blog/tags/rust", "/fr/blog/tags/rust", "/en/blog/tags/web"]);
        assert!(pages.iter().all(|p| !p.items.is_empty()));
    }

    #[test]
    fn test_page_label_follows_language() {
        let items = vec![item("a", "fr", json!(["Économie"])), item("b", "en", json!(["economy", "Economie"]))];
        let groups = index(&items, TaxonomyField::Tags, &spdlog::default_logger());
        let pages = pages(&groups, |key, lang| RouteInfo {
            url: format!("/{}/{}", lang, key),
            output_path: PathBuf::from(format!("dist/{}/{}/index.html", lang, key)),
            is_index: false,
        });
        let labels: Vec<(&str, &str)> = pages.iter().map(|p| (p.lang.as_str(), p.label.as_str())).collect();
        assert_eq!(labels, [("en", "Economie"), ("fr", "Économie"), ("en", "economy")]);
    }
}

use std::path::PathBuf;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::content::content_file::ContentFile;
use crate::content::frontmatter::normalize_list;
use crate::routing::RouteInfo;

pub mod collection;
pub mod content_file;
pub mod frontmatter;
pub mod metadata;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Page,
    Post,
    Term,
}

impl ContentKind {
    /// Directory names under `locales/<lang>/`, in lookup order.
    pub fn dir_names(&self) -> &'static [&'static str] {
        match self {
            ContentKind::Page => &["pages"],
            ContentKind::Post => &["blog", "posts"],
            ContentKind::Term => &["glossaire", "glossary"],
        }
    }

    fn default_title(&self, stem: &str) -> String {
        match self {
            ContentKind::Page => stem.to_string(),
            ContentKind::Post => "Article sans titre".to_string(),
            ContentKind::Term => "Terme sans titre".to_string(),
        }
    }
}

/// Keys the item computes itself. Frontmatter values for them are dropped so
/// that a content file cannot forge its own URL or language.
const RESERVED_KEYS: [&str; 3] = ["lang", "url", "kind"];

/// One markdown-backed post, page or glossary term.
///
/// Known frontmatter keys are typed fields; everything else is kept in
/// `extra` and reaches the templates untouched.
#[derive(Debug, Clone, Serialize)]
pub struct ContentItem {
    pub kind: ContentKind,
    pub title: String,
    pub date: Option<String>,
    pub author: String,
    pub slug: String,
    pub translation_id: String,
    pub summary: String,
    pub excerpt: String,
    pub description: String,
    pub categories: Vec<String>,
    #[serde(rename = "meta_keywords")]
    pub keywords: Vec<String>,
    pub tags: Vec<String>,
    pub thumbnail: Option<String>,
    #[serde(rename = "lang")]
    pub language: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(skip)]
    pub custom_url: Option<String>,
    #[serde(skip)]
    pub output_path: PathBuf,
    #[serde(skip)]
    pub is_index: bool,
    #[serde(skip)]
    pub source: PathBuf,
    #[serde(skip)]
    pub body: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn take_text(metadata: &mut Map<String, Value>, key: &str) -> Option<String> {
    match metadata.remove(key)? {
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() { None } else { Some(s.to_string()) }
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn take_list(metadata: &mut Map<String, Value>, key: &str) -> Vec<String> {
    normalize_list(metadata.remove(key).as_ref())
}

impl ContentItem {
    /// Builds an item from processed metadata. The item is not routed yet:
    /// `url` and `output_path` are filled by [`ContentItem::routed`].
    pub fn from_metadata(kind: ContentKind, lang: &str, file: &ContentFile,
                         mut metadata: Map<String, Value>, body: String) -> ContentItem {
        let slug = take_text(&mut metadata, "slug").unwrap_or_else(|| file.stem.clone());
        let title = take_text(&mut metadata, "title").unwrap_or_else(|| kind.default_title(&file.stem));
        let translation_id = take_text(&mut metadata, "translation_id").unwrap_or_else(|| slug.clone());
        let date = take_text(&mut metadata, "date");
        let author = take_text(&mut metadata, "author").unwrap_or_default();
        let description = take_text(&mut metadata, "description").unwrap_or_default();
        let summary = take_text(&mut metadata, "summary").unwrap_or_else(|| description.clone());
        let excerpt = take_text(&mut metadata, "excerpt").unwrap_or_else(|| summary.clone());
        let categories = take_list(&mut metadata, "categories");
        let keywords = take_list(&mut metadata, "meta_keywords");
        let tags = take_list(&mut metadata, "tags");
        let thumbnail = take_text(&mut metadata, "thumbnail");
        let template = take_text(&mut metadata, "template");
        let custom_url = match kind {
            ContentKind::Page => take_text(&mut metadata, "url"),
            _ => None,
        };
        for key in RESERVED_KEYS {
            metadata.remove(key);
        }

        ContentItem {
            kind,
            title,
            date,
            author,
            slug,
            translation_id,
            summary,
            excerpt,
            description,
            categories,
            keywords,
            tags,
            thumbnail,
            language: lang.to_string(),
            url: String::new(),
            template,
            custom_url,
            output_path: PathBuf::new(),
            is_index: false,
            source: file.file_path.clone(),
            body,
            extra: metadata,
        }
    }

    pub fn routed(mut self, route: RouteInfo) -> ContentItem {
        self.url = route.url;
        self.output_path = route.output_path;
        self.is_index = route.is_index;
        self
    }

    /// Join key across languages; an item without translation id joins on its slug.
    pub fn translation_key(&self) -> &str {
        if self.translation_id.is_empty() { &self.slug } else { &self.translation_id }
    }

    /// Flat metadata view used for page contexts and listings.
    pub fn metadata(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

#[derive(Deserialize, Debug, Clone)]
pub struct Log {
    #[serde(default = "default_log_level")]
    pub level: LogLevel,
    #[serde(default = "default_true")]
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone, Debug, PartialEq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Site-wide settings, read once from `config/site_config.yaml`.
///
/// Keys this struct does not know about are kept in `extra` and reach the
/// templates through `site.<key>`.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SiteConfig {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub keywords: String,

    #[serde(default = "default_languages", deserialize_with = "one_or_many")]
    pub languages: Vec<String>,
    #[serde(default = "default_lang")]
    pub default_lang: String,
    #[serde(default)]
    pub unilingual: Option<bool>,

    #[serde(default = "default_blog_url")]
    pub blog_url: String,
    #[serde(default = "default_glossary_url")]
    pub glossary_url: String,
    #[serde(default = "default_gallery_url")]
    pub gallery_url: String,
    #[serde(default)]
    pub post_base_url: Option<String>,

    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: u32,
    #[serde(default = "default_terms_per_page")]
    pub terms_per_page: u32,
    #[serde(default = "default_recent_posts_count")]
    pub recent_posts_count: usize,

    #[serde(default = "default_post_template")]
    pub post_template: String,
    #[serde(default = "default_blog_template")]
    pub blog_template: String,
    #[serde(default = "default_home_template")]
    pub home_template: String,
    #[serde(default = "default_page_template")]
    pub page_template: String,
    #[serde(default = "default_glossary_template")]
    pub glossary_template: String,
    #[serde(default = "default_term_template")]
    pub term_template: String,
    #[serde(default = "default_category_template")]
    pub category_template: String,
    #[serde(default = "default_keyword_template")]
    pub keyword_template: String,
    #[serde(default = "default_tag_template")]
    pub tag_template: String,
    #[serde(default = "default_glossary_tag_template")]
    pub glossary_tag_template: String,

    #[serde(default, skip_serializing)]
    pub log: Option<Log>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_true() -> bool { true }
fn default_log_level() -> LogLevel { LogLevel::Info }
fn default_languages() -> Vec<String> { vec!["fr".to_string()] }
fn default_lang() -> String { "fr".to_string() }
fn default_blog_url() -> String { "/blog/".to_string() }
fn default_glossary_url() -> String { "/glossaire/".to_string() }
fn default_gallery_url() -> String { "/gallery/".to_string() }
fn default_posts_per_page() -> u32 { 5 }
fn default_terms_per_page() -> u32 { 10 }
fn default_recent_posts_count() -> usize { 3 }
fn default_post_template() -> String { "posts/post.html".to_string() }
fn default_blog_template() -> String { "pages/blog.html".to_string() }
fn default_home_template() -> String { "pages/home.html".to_string() }
fn default_page_template() -> String { "pages/page.html".to_string() }
fn default_glossary_template() -> String { "pages/glossary.html".to_string() }
fn default_term_template() -> String { "pages/glossary-term.html".to_string() }
fn default_category_template() -> String { "pages/category.html".to_string() }
fn default_keyword_template() -> String { "pages/keyword.html".to_string() }
fn default_tag_template() -> String { "pages/tag.html".to_string() }
fn default_glossary_tag_template() -> String { "pages/glossary-tag.html".to_string() }

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    let value = Option::<OneOrMany>::deserialize(deserializer)?;
    Ok(match value {
        None => default_languages(),
        Some(OneOrMany::One(lang)) => vec![lang],
        Some(OneOrMany::Many(langs)) => langs,
    })
}

/// Strips surrounding whitespace and slashes: `"/blog/"` becomes `"blog"`.
pub fn url_segment(value: &str) -> String {
    value.trim().trim_matches('/').to_string()
}

impl SiteConfig {
    pub fn is_unilingual(&self) -> bool {
        self.unilingual.unwrap_or(self.languages.len() <= 1)
    }

    /// The language the root redirect points to.
    pub fn canonical_language(&self) -> &str {
        if self.languages.iter().any(|l| l == &self.default_lang) {
            &self.default_lang
        } else {
            // validate() guarantees at least one language
            self.languages.first().map(String::as_str).unwrap_or(&self.default_lang)
        }
    }

    pub fn blog_base(&self) -> String {
        url_segment(&self.blog_url)
    }

    pub fn glossary_base(&self) -> String {
        url_segment(&self.glossary_url)
    }

    pub fn post_base(&self) -> String {
        match self.post_base_url {
            Some(ref post_base) => url_segment(post_base),
            None => self.blog_base(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Config("'title' must not be empty".to_string()));
        }
        if self.languages.is_empty() {
            return Err(Error::Config("'languages' must list at least one language".to_string()));
        }
        if self.languages.iter().any(|l| l.trim().is_empty()) {
            return Err(Error::Config("'languages' contains an empty language code".to_string()));
        }
        if self.posts_per_page == 0 {
            return Err(Error::Config("'posts_per_page' must be at least 1".to_string()));
        }
        if self.terms_per_page == 0 {
            return Err(Error::Config("'terms_per_page' must be at least 1".to_string()));
        }
        Ok(())
    }
}

pub fn parse_config(cfg_content: &str, cfg_path: &Path) -> Result<SiteConfig> {
    let cfg: SiteConfig = serde_yaml::from_str(cfg_content).map_err(|source| Error::Yaml {
        path: cfg_path.to_path_buf(),
        source,
    })?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> Result<SiteConfig> {
    let cfg_content = fs::read_to_string(cfg_path).map_err(|e| {
        Error::Config(format!("Error opening configuration file {}: {}", cfg_path.display(), e))
    })?;
    parse_config(&cfg_content, cfg_path)
}

/// UI strings per language, from `data/translations.yaml`.
#[derive(Debug, Clone, Default)]
pub struct Translations {
    strings: BTreeMap<String, Map<String, Value>>,
}

impl Translations {
    pub fn from_map(strings: BTreeMap<String, Map<String, Value>>) -> Self {
        Translations { strings }
    }

    pub fn for_lang(&self, lang: &str) -> Map<String, Value> {
        self.strings.get(lang).cloned().unwrap_or_default()
    }

    /// String lookup with a fallback chain: the first key present wins.
    pub fn text(&self, lang: &str, keys: &[&str], default: &str) -> String {
        let strings = self.strings.get(lang);
        keys.iter()
            .filter_map(|key| strings.and_then(|s| s.get(*key)))
            .find_map(|value| value.as_str().map(str::to_string))
            .unwrap_or_else(|| default.to_string())
    }
}

/// Reads the translations file. A missing file is not an error: the caller
/// gets empty strings for every language.
pub fn read_translations(path: &Path) -> Result<Translations> {
    if !path.exists() {
        return Ok(Translations::default());
    }

    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    if content.trim().is_empty() {
        return Ok(Translations::default());
    }

    let strings = serde_yaml::from_str(&content).map_err(|source| Error::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Translations::from_map(strings))
}

/// Free-form project data from `data/projects.yaml`, handed to every template
/// as `projects`. A missing or empty file gives an empty mapping.
pub fn read_projects(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Ok(Value::Object(Map::new()));
    }

    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    if content.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    serde_yaml::from_str(&content).map_err(|source| Error::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use markdown::Options;
use serde::Serialize;
use serde_json::{Map, Value};
use spdlog::Logger;

use crate::config::{SiteConfig, Translations};
use crate::content::collection::ContentLoader;
use crate::content::metadata::MetadataProcessor;
use crate::content::{ContentItem, ContentKind};
use crate::error::{Error, Result};
use crate::logger::Phase;
use crate::output::OutputWriter;
use crate::paginator::paginate;
use crate::render::Renderer;
use crate::routing::UrlRouter;
use crate::static_files::StaticFiles;
use crate::taxonomy::{self, TaxonomyField, TaxonomyPage};
use crate::translation::TranslationMap;

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Prefix phase log lines with an icon
    pub icons: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    pub assets: usize,
    pub pages: usize,
    pub posts: usize,
    pub terms: usize,
    pub list_pages: usize,
    pub taxonomy_pages: usize,
    pub files_written: usize,
}

/// Everything loaded for one language.
struct LanguageContent {
    lang: String,
    pages: Vec<ContentItem>,
    posts: Vec<ContentItem>,
    terms: Vec<ContentItem>,
}

/// Runs a full build: clean, copy, load, then emit every artifact.
pub struct SiteBuilder<R: Renderer> {
    config: SiteConfig,
    translations: Translations,
    renderer: R,
    options: BuildOptions,
    router: UrlRouter,
    processor: MetadataProcessor,
    site: Value,
    projects: Value,
    logger: Arc<Logger>,
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

fn root_redirect_html(target: &str) -> String {
    format!(r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta http-equiv="refresh" content="0; url={target}">
<link rel="canonical" href="{target}">
<title>Redirection</title>
</head>
<body>
<a href="{target}">{target}</a>
</body>
</html>
"#)
}

impl<R: Renderer> SiteBuilder<R> {
    pub fn new(config: SiteConfig,
               translations: Translations,
               renderer: R,
               options: BuildOptions,
               logger: Arc<Logger>) -> Result<Self> {
        let router = UrlRouter::new(&config, &options.output_dir);
        let site = to_value(&config)?;

        Ok(SiteBuilder {
            config,
            translations,
            renderer,
            options,
            router,
            processor: MetadataProcessor::default(),
            site,
            projects: Value::Object(Map::new()),
            logger,
        })
    }

    /// Project data exposed to every template as `projects`.
    pub fn with_projects(mut self, projects: Value) -> Self {
        self.projects = projects;
        self
    }

    fn phase(&self, phase: Phase) {
        spdlog::info!(logger: self.logger, "{}", phase.line(self.options.icons));
    }

    /// Builds the site, logging the outcome. Output already written when an
    /// error occurs stays on disk.
    pub fn run(&self) -> Result<BuildReport> {
        self.phase(Phase::Start);
        match self.build() {
            Ok(report) => {
                spdlog::info!(logger: self.logger, "{}: {} files written", Phase::Success.line(self.options.icons), report.files_written);
                Ok(report)
            }
            Err(e) => {
                spdlog::error!(logger: self.logger, "{}: {}", Phase::Failure.line(self.options.icons), e);
                Err(e)
            }
        }
    }

    pub fn build(&self) -> Result<BuildReport> {
        let mut report = BuildReport::default();
        let static_files = StaticFiles::new(&self.options.source_dir, &self.options.output_dir, self.logger.clone());

        self.phase(Phase::Clean);
        static_files.setup_output_dir()?;

        self.phase(Phase::Copy);
        report.assets = static_files.copy_assets()?;

        let content = self.load_content();
        let page_map = TranslationMap::build(content.iter().flat_map(|c| &c.pages), &self.logger);
        let post_map = TranslationMap::build(content.iter().flat_map(|c| &c.posts), &self.logger);
        let term_map = TranslationMap::build(content.iter().flat_map(|c| &c.terms), &self.logger);

        let mut writer = OutputWriter::new(self.logger.clone());

        self.phase(Phase::Pages);
        for lang_content in &content {
            report.pages += self.emit_pages(&mut writer, lang_content, &page_map)?;
        }

        self.phase(Phase::Posts);
        for lang_content in &content {
            for post in &lang_content.posts {
                self.emit_item(&mut writer, post, &self.config.post_template, &post_map)?;
                report.posts += 1;
            }
            report.list_pages += self.emit_blog_index(&mut writer, lang_content)?;
        }

        self.phase(Phase::Glossary);
        for lang_content in &content {
            for term in &lang_content.terms {
                self.emit_item(&mut writer, term, &self.config.term_template, &term_map)?;
                report.terms += 1;
            }
            report.list_pages += self.emit_glossary_index(&mut writer, lang_content)?;
        }
        let glossary_base = self.router.glossary_base().to_string();
        let term_tags = taxonomy::index(content.iter().flat_map(|c| &c.terms), TaxonomyField::Tags, &self.logger);
        let glossary_tag_pages = taxonomy::pages(&term_tags, |key, lang| self.router.route_tag(key, lang, &glossary_base));
        report.taxonomy_pages += self.emit_taxonomy_pages(&mut writer, &glossary_tag_pages, &self.config.glossary_tag_template)?;

        self.phase(Phase::Taxonomy);
        let posts = || content.iter().flat_map(|c| &c.posts);
        let categories = taxonomy::index(posts(), TaxonomyField::Categories, &self.logger);
        let category_pages = taxonomy::pages(&categories, |key, lang| self.router.route_category(key, lang, 1));
        report.taxonomy_pages += self.emit_taxonomy_pages(&mut writer, &category_pages, &self.config.category_template)?;

        let keywords = taxonomy::index(posts(), TaxonomyField::Keywords, &self.logger);
        let keyword_pages = taxonomy::pages(&keywords, |key, lang| self.router.route_keyword(key, lang));
        report.taxonomy_pages += self.emit_taxonomy_pages(&mut writer, &keyword_pages, &self.config.keyword_template)?;

        let blog_base = self.router.blog_base().to_string();
        let tags = taxonomy::index(posts(), TaxonomyField::Tags, &self.logger);
        let tag_pages = taxonomy::pages(&tags, |key, lang| self.router.route_tag(key, lang, &blog_base));
        report.taxonomy_pages += self.emit_taxonomy_pages(&mut writer, &tag_pages, &self.config.tag_template)?;

        if !self.router.is_unilingual() {
            self.phase(Phase::Redirect);
            let route = self.router.route_root_redirect();
            let target = self.router.route_home(self.config.canonical_language());
            writer.write(&route.output_path, &root_redirect_html(&target.url))?;
        }

        report.files_written = writer.written_count();
        Ok(report)
    }

    fn load_content(&self) -> Vec<LanguageContent> {
        let locales_dir = self.options.source_dir.join("locales");
        let loader = ContentLoader::new(&self.config, self.router.clone(), &locales_dir, self.logger.clone());

        self.config.languages.iter()
            .map(|lang| {
                let lang_content = LanguageContent {
                    lang: lang.clone(),
                    pages: loader.load(ContentKind::Page, lang),
                    posts: loader.load(ContentKind::Post, lang),
                    terms: loader.load(ContentKind::Term, lang),
                };
                spdlog::info!(logger: self.logger, "Language '{}': {} pages, {} posts, {} glossary terms",
                    lang, lang_content.pages.len(), lang_content.posts.len(), lang_content.terms.len());
                lang_content
            })
            .collect()
    }

    fn context(&self, lang: &str, page: Map<String, Value>) -> Map<String, Value> {
        let mut context = Map::new();
        context.insert("page".to_string(), Value::Object(page));
        context.insert("t".to_string(), Value::Object(self.translations.for_lang(lang)));
        context.insert("site".to_string(), self.site.clone());
        context.insert("projects".to_string(), self.projects.clone());
        context.insert("is_multilingual".to_string(), Value::Bool(!self.router.is_unilingual()));
        context.insert("is_unilingual".to_string(), Value::Bool(self.router.is_unilingual()));
        context
    }

    fn render_to(&self, writer: &mut OutputWriter, template: &str, context: Map<String, Value>, output_path: &Path) -> Result<()> {
        let html = self.renderer.render(template, &Value::Object(context))?;
        writer.write(output_path, &html)
    }

    fn render_markdown(&self, item: &ContentItem) -> Result<String> {
        markdown::to_html_with_options(&item.body, &Options::gfm()).map_err(|e| Error::Markdown {
            path: item.source.clone(),
            reason: e.reason,
        })
    }

    fn emit_item(&self, writer: &mut OutputWriter, item: &ContentItem, default_template: &str, map: &TranslationMap) -> Result<()> {
        self.emit_item_with(writer, item, default_template, map.for_item(item), |_| Ok(()))
    }

    /// Renders one content item; `extend` adds kind-specific keys to the context.
    fn emit_item_with<F>(&self,
                         writer: &mut OutputWriter,
                         item: &ContentItem,
                         default_template: &str,
                         translations: Option<&BTreeMap<String, String>>,
                         extend: F) -> Result<()>
    where
        F: FnOnce(&mut Map<String, Value>) -> Result<()>,
    {
        let page = self.processor.build_page_context(&item.metadata(), &item.language, &item.url, translations, None);
        let mut context = self.context(&item.language, page);
        context.insert("content".to_string(), Value::String(self.render_markdown(item)?));
        extend(&mut context)?;

        let template = item.template.as_deref().unwrap_or(default_template);
        self.render_to(writer, template, context, &item.output_path)
    }

    fn home_translations(&self) -> BTreeMap<String, String> {
        self.config.languages.iter()
            .map(|lang| (lang.clone(), self.router.route_home(lang).url))
            .collect()
    }

    fn recent_posts(&self, posts: &[ContentItem]) -> Result<Value> {
        let count = self.config.recent_posts_count.min(posts.len());
        to_value(&posts[..count])
    }

    fn emit_pages(&self, writer: &mut OutputWriter, content: &LanguageContent, map: &TranslationMap) -> Result<usize> {
        let mut emitted = 0;
        let mut home_found = false;

        for page in &content.pages {
            if page.is_index {
                home_found = true;
                let translations = self.home_translations();
                let recent_posts = self.recent_posts(&content.posts)?;
                self.emit_item_with(writer, page, &self.config.home_template, Some(&translations), |context| {
                    context.insert("recent_posts".to_string(), recent_posts);
                    Ok(())
                })?;
            } else {
                self.emit_item(writer, page, &self.config.page_template, map)?;
            }
            emitted += 1;
        }

        if !home_found {
            self.emit_default_home(writer, content)?;
            emitted += 1;
        }
        Ok(emitted)
    }

    /// Home page for a language without `pages/home.md`, titled from the UI strings.
    fn emit_default_home(&self, writer: &mut OutputWriter, content: &LanguageContent) -> Result<()> {
        let lang = &content.lang;
        let route = self.router.route_home(lang);
        let mut metadata = Map::new();
        metadata.insert("title".to_string(), Value::String(self.translations.text(lang, &["home_title"], "Accueil")));
        metadata.insert("description".to_string(), Value::String(self.translations.text(lang, &["home_description"], "")));

        let translations = self.home_translations();
        let page = self.processor.build_page_context(&metadata, lang, &route.url, Some(&translations), None);
        let mut context = self.context(lang, page);
        context.insert("recent_posts".to_string(), self.recent_posts(&content.posts)?);
        context.insert("content".to_string(), Value::String(String::new()));
        self.render_to(writer, &self.config.home_template, context, &route.output_path)
    }

    /// Paginated index of `items` under `base`; returns the number of pages written.
    #[allow(clippy::too_many_arguments)]
    fn emit_list(&self,
                 writer: &mut OutputWriter,
                 lang: &str,
                 items: &[ContentItem],
                 base: &str,
                 page_size: u32,
                 template: &str,
                 metadata: Map<String, Value>) -> Result<usize> {
        let views = paginate(items, page_size, |n| self.router.route_list(base, lang, n));
        let translations: BTreeMap<String, String> = self.config.languages.iter()
            .filter(|other| other.as_str() != lang)
            .map(|other| (other.clone(), self.router.route_list(base, other, 1).url))
            .collect();

        for view in &views {
            spdlog::debug!(logger: self.logger, "List page {}/{} of {} with {} items",
                view.page_number, view.total_pages, view.base_url, view.items.len());
            let pagination = to_value(view)?;
            let page = self.processor.build_page_context(&metadata, lang, &view.url, Some(&translations), Some(pagination.clone()));
            let mut context = self.context(lang, page);
            context.insert("pagination".to_string(), pagination);
            self.render_to(writer, template, context, &view.output_path)?;
        }
        Ok(views.len())
    }

    fn list_metadata(&self, lang: &str, title_keys: &[&str], default_title: &str, description_key: &str) -> Map<String, Value> {
        let mut metadata = Map::new();
        metadata.insert("title".to_string(), Value::String(self.translations.text(lang, title_keys, default_title)));
        metadata.insert("description".to_string(), Value::String(self.translations.text(lang, &[description_key], "")));
        metadata
    }

    fn emit_blog_index(&self, writer: &mut OutputWriter, content: &LanguageContent) -> Result<usize> {
        let metadata = self.list_metadata(&content.lang, &["blog_title", "blog"], "Articles", "blog_description");
        self.emit_list(writer, &content.lang, &content.posts, self.router.blog_base(),
                       self.config.posts_per_page, &self.config.blog_template, metadata)
    }

    fn emit_glossary_index(&self, writer: &mut OutputWriter, content: &LanguageContent) -> Result<usize> {
        let metadata = self.list_metadata(&content.lang, &["glossary_title", "glossary"], "Glossaire", "glossary_description");
        self.emit_list(writer, &content.lang, &content.terms, self.router.glossary_base(),
                       self.config.terms_per_page, &self.config.glossary_template, metadata)
    }

    fn emit_taxonomy_pages(&self, writer: &mut OutputWriter, pages: &[TaxonomyPage], template: &str) -> Result<usize> {
        for page in pages {
            let translations: BTreeMap<String, String> = pages.iter()
                .filter(|other| other.key == page.key && other.lang != page.lang)
                .map(|other| (other.lang.clone(), other.route.url.clone()))
                .collect();

            let mut metadata = Map::new();
            metadata.insert("title".to_string(), Value::String(page.label.clone()));
            metadata.insert("slug".to_string(), Value::String(page.key.clone()));
            let page_context = self.processor.build_page_context(&metadata, &page.lang, &page.route.url, Some(&translations), None);

            let mut context = self.context(&page.lang, page_context);
            context.insert("items".to_string(), to_value(&page.items)?);
            self.render_to(writer, template, context, &page.route.output_path)?;
        }
        Ok(pages.len())
    }
}

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};
use spdlog::Logger;

use crate::config::SiteConfig;
use crate::content::content_file::{list_content_files, ContentFile};
use crate::content::frontmatter::Frontmatter;
use crate::content::metadata::MetadataProcessor;
use crate::content::{ContentItem, ContentKind};
use crate::error::{Error, Result};
use crate::routing::UrlRouter;
use crate::text_utils::slugify;

/// Loads the content of one kind and language from `locales/<lang>/`.
pub struct ContentLoader {
    router: UrlRouter,
    locales_dir: PathBuf,
    processor: MetadataProcessor,
    logger: Arc<Logger>,
}

impl ContentLoader {
    pub fn new(config: &SiteConfig, router: UrlRouter, locales_dir: &Path, logger: Arc<Logger>) -> Self {
        let mut defaults = Map::new();
        if !config.author.trim().is_empty() {
            defaults.insert("author".to_string(), Value::String(config.author.clone()));
        }

        ContentLoader {
            router,
            locales_dir: locales_dir.to_path_buf(),
            processor: MetadataProcessor::new(defaults),
            logger,
        }
    }

    pub fn content_dir(&self, kind: ContentKind, lang: &str) -> Option<PathBuf> {
        let lang_dir = self.locales_dir.join(lang);
        kind.dir_names().iter()
            .map(|name| lang_dir.join(name))
            .find(|dir| dir.is_dir())
    }

    /// Every item of `kind` in `lang`, sorted. A missing directory gives an
    /// empty list; a file that cannot be read is skipped with a warning.
    pub fn load(&self, kind: ContentKind, lang: &str) -> Vec<ContentItem> {
        let Some(dir) = self.content_dir(kind, lang) else {
            spdlog::debug!(logger: self.logger, "No {:?} directory for language '{}'", kind, lang);
            return vec![];
        };

        let files = match list_content_files(&dir) {
            Ok(files) => files,
            Err(e) => {
                spdlog::warn!(logger: self.logger, "Unable to list {}: {}", dir.display(), e);
                return vec![];
            }
        };

        let mut items = vec![];
        let mut slugs = HashSet::new();
        for file_path in files {
            match self.load_file(kind, lang, file_path) {
                Ok(item) => {
                    if !slugs.insert(item.slug.clone()) {
                        spdlog::warn!(logger: self.logger, "Duplicate slug '{}' in {} ({})",
                            item.slug, dir.display(), item.source.display());
                    }
                    items.push(item);
                }
                Err(e) => spdlog::warn!(logger: self.logger, "Skipping content file: {}", e),
            }
        }

        sort_items(kind, &mut items);
        items
    }

    pub fn load_file(&self, kind: ContentKind, lang: &str, file_path: PathBuf) -> Result<ContentItem> {
        let file = ContentFile::from_file(file_path.clone()).map_err(|e| Error::io(&file_path, e))?;

        let frontmatter = match Frontmatter::try_parse(&file.raw_content) {
            Ok(frontmatter) => frontmatter,
            Err(reason) => {
                spdlog::warn!(logger: self.logger, "{}: {}, using empty metadata", file_path.display(), reason);
                Frontmatter::empty(&file.raw_content)
            }
        };

        let Frontmatter { metadata, body } = frontmatter;
        let metadata = self.processor.process(metadata, Some(&file.stem));
        let mut item = ContentItem::from_metadata(kind, lang, &file, metadata, body);
        if item.slug.contains(['/', '\\']) || item.slug.starts_with('.') {
            let slug = non_path_slug(&item.slug, &file.stem);
            spdlog::warn!(logger: self.logger, "{}: slug '{}' is not a single path segment, using '{}'",
                file_path.display(), item.slug, slug);
            item.slug = slug;
        }

        let route = match kind {
            ContentKind::Page => self.router.route_page(&file.stem, lang, item.custom_url.as_deref()),
            ContentKind::Post => self.router.route_post(&item.slug, lang),
            ContentKind::Term => self.router.route_glossary_term(&item.slug, lang),
        };
        Ok(item.routed(route))
    }
}

fn non_path_slug(slug: &str, stem: &str) -> String {
    let slug = slugify(slug);
    if slug.is_empty() { slugify(stem) } else { slug }
}

/// Posts newest first, glossary terms by title, pages by file name.
///
/// Sorts are stable, so ties keep file-name order. Undated posts compare as
/// an empty date and end up last.
pub fn sort_items(kind: ContentKind, items: &mut [ContentItem]) {
    match kind {
        ContentKind::Post => items.sort_by(|a, b| {
            let a = a.date.as_deref().unwrap_or("");
            let b = b.date.as_deref().unwrap_or("");
            b.cmp(a)
        }),
        ContentKind::Term => items.sort_by(|a, b| a.title.cmp(&b.title)),
        ContentKind::Page => {}
    }
}

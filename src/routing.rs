use std::path::{Path, PathBuf};

use crate::config::{url_segment, SiteConfig};

const INDEX_FILE: &str = "index.html";

fn path_segments(value: &str) -> impl Iterator<Item = &str> {
    value.split(['/', '\\'])
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
}

/// Where an artifact is published and where it is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    pub url: String,
    pub output_path: PathBuf,
    pub is_index: bool,
}

/// Maps content kinds to URLs and output paths.
///
/// Every builder routes through here, so that links and written files always
/// agree. All functions are pure: same configuration and inputs, same route.
#[derive(Debug, Clone)]
pub struct UrlRouter {
    dist_path: PathBuf,
    unilingual: bool,
    blog_base: String,
    post_base: String,
    glossary_base: String,
}

impl UrlRouter {
    pub fn new(config: &SiteConfig, dist_path: &Path) -> Self {
        UrlRouter {
            dist_path: dist_path.to_path_buf(),
            unilingual: config.is_unilingual(),
            blog_base: config.blog_base(),
            post_base: config.post_base(),
            glossary_base: config.glossary_base(),
        }
    }

    pub fn is_unilingual(&self) -> bool {
        self.unilingual
    }

    pub fn blog_base(&self) -> &str {
        &self.blog_base
    }

    pub fn glossary_base(&self) -> &str {
        &self.glossary_base
    }

    /// Language prefix (when multilingual) followed by the path segments of
    /// each part. `.` and `..` are dropped so no route leaves the output root.
    fn segments<'a>(&self, lang: &'a str, parts: &[&'a str]) -> Vec<&'a str> {
        let mut segments = Vec::with_capacity(parts.len() + 1);
        if !self.unilingual {
            segments.extend(path_segments(lang));
        }
        segments.extend(parts.iter().copied().flat_map(path_segments));
        segments
    }

    fn output_path(&self, segments: &[&str]) -> PathBuf {
        let mut path = self.dist_path.clone();
        for segment in segments {
            path.push(segment);
        }
        path.push(INDEX_FILE);
        path
    }

    fn route(&self, segments: Vec<&str>, trailing_slash: bool, is_index: bool) -> RouteInfo {
        let mut url = format!("/{}", segments.join("/"));
        if trailing_slash && !url.ends_with('/') {
            url.push('/');
        }
        RouteInfo {
            url,
            output_path: self.output_path(&segments),
            is_index,
        }
    }

    pub fn route_home(&self, lang: &str) -> RouteInfo {
        self.route(self.segments(lang, &[]), true, true)
    }

    pub fn route_page(&self, page_name: &str, lang: &str, custom_url: Option<&str>) -> RouteInfo {
        let is_home = page_name == "home";
        if let Some(custom_url) = custom_url {
            return self.route_custom(custom_url, is_home);
        }
        if is_home {
            return self.route_home(lang);
        }
        self.route(self.segments(lang, &[page_name]), false, false)
    }

    /// The URL is kept verbatim; the output path is derived from it.
    fn route_custom(&self, custom_url: &str, is_index: bool) -> RouteInfo {
        let segments: Vec<&str> = path_segments(custom_url).collect();
        RouteInfo {
            url: custom_url.to_string(),
            output_path: self.output_path(&segments),
            is_index,
        }
    }

    pub fn route_post(&self, slug: &str, lang: &str) -> RouteInfo {
        self.route(self.segments(lang, &[self.post_base.as_str(), slug]), false, false)
    }

    pub fn route_glossary_term(&self, slug: &str, lang: &str) -> RouteInfo {
        self.route(self.segments(lang, &[self.glossary_base.as_str(), slug]), false, false)
    }

    pub fn route_category(&self, slug: &str, lang: &str, page_num: u32) -> RouteInfo {
        let page = page_num.to_string();
        let mut parts = vec![self.blog_base.as_str(), "categories", slug];
        if page_num > 1 {
            parts.extend(["page", page.as_str()]);
        }
        self.route(self.segments(lang, &parts), false, false)
    }

    pub fn route_keyword(&self, slug: &str, lang: &str) -> RouteInfo {
        self.route(self.segments(lang, &[self.blog_base.as_str(), "keywords", slug]), false, false)
    }

    /// Tag pages live under a caller-supplied base: the blog or the glossary.
    pub fn route_tag(&self, slug: &str, lang: &str, base: &str) -> RouteInfo {
        let base = url_segment(base);
        self.route(self.segments(lang, &[base.as_str(), "tags", slug]), false, false)
    }

    /// Paginated list (blog or glossary index). Page 1 has no `/page/1` suffix.
    pub fn route_list(&self, base: &str, lang: &str, page_num: u32) -> RouteInfo {
        let base = url_segment(base);
        let page = page_num.to_string();
        let mut parts = vec![base.as_str()];
        if page_num > 1 {
            parts.extend(["page", page.as_str()]);
        }
        self.route(self.segments(lang, &parts), true, page_num <= 1)
    }

    pub fn route_root_redirect(&self) -> RouteInfo {
        RouteInfo {
            url: "/".to_string(),
            output_path: self.dist_path.join(INDEX_FILE),
            is_index: true,
        }
    }
}

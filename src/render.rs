use std::path::Path;

use minijinja::{path_loader, Environment, ErrorKind};
use markdown::Options;
use minijinja::value::Value as TemplateValue;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::text_utils::{format_display_date, slugify, DEFAULT_DATE_LANG, DEFAULT_DATE_STYLE};

/// Turns a template name and a context into HTML.
///
/// An unknown template must be reported as [`Error::TemplateNotFound`].
pub trait Renderer {
    fn render(&self, template: &str, context: &Value) -> Result<String>;
}

/// Minijinja environment reading templates from a directory.
pub struct TemplateEngine {
    env: Environment<'static>,
}

fn markdown_filter(value: &str) -> std::result::Result<TemplateValue, minijinja::Error> {
    markdown::to_html_with_options(value, &Options::gfm())
        .map(TemplateValue::from_safe_string)
        .map_err(|e| minijinja::Error::new(ErrorKind::InvalidOperation, format!("markdown: {}", e.reason)))
}

/// `{{ page.date|date }}`, `{{ page.date|date("short", page.lang) }}`
fn date_filter(value: &str, style: Option<&str>, lang: Option<&str>) -> std::result::Result<String, minijinja::Error> {
    format_display_date(value, style.unwrap_or(DEFAULT_DATE_STYLE), lang.unwrap_or(DEFAULT_DATE_LANG))
        .map_err(|reason| minijinja::Error::new(ErrorKind::InvalidOperation, reason))
}

impl TemplateEngine {
    pub fn from_dir(templates_dir: &Path) -> TemplateEngine {
        let mut env = Environment::new();
        env.set_loader(path_loader(templates_dir));
        Self::with_environment(env)
    }

    /// Registers the site filters on an already configured environment.
    pub fn with_environment(mut env: Environment<'static>) -> TemplateEngine {
        env.add_filter("slugify", |value: &str| slugify(value));
        env.add_filter("markdown", markdown_filter);
        env.add_filter("date", date_filter);
        TemplateEngine { env }
    }
}

impl Renderer for TemplateEngine {
    fn render(&self, template: &str, context: &Value) -> Result<String> {
        let tmpl = self.env.get_template(template).map_err(|e| match e.kind() {
            ErrorKind::TemplateNotFound => Error::TemplateNotFound(template.to_string()),
            _ => Error::Template { name: template.to_string(), source: e },
        })?;

        tmpl.render(context).map_err(|source| Error::Template {
            name: template.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn engine() -> TemplateEngine {
        let mut env = Environment::new();
        env.add_template("page.html", "<h1>{{ page.title }}</h1>{{ content|safe }}").unwrap();
        env.add_template("filters.html", "{{ label|slugify }}|{{ body|markdown }}").unwrap();
        env.add_template("dates.txt", "{{ d|date }}|{{ d|date('short') }}|{{ d|date('full', 'en') }}").unwrap();
        env.add_template("bad_date.html", "{{ d|date }}").unwrap();
        TemplateEngine::with_environment(env)
    }

    #[test]
    fn test_render() {
        let html = engine().render("page.html", &json!({"page": {"title": "A & B"}, "content": "<p>x</p>"})).unwrap();
        assert_eq!(html, "<h1>A &amp; B</h1><p>x</p>");
    }

    #[test]
    fn test_filters() {
        let html = engine().render("filters.html", &json!({"label": "Café Crème", "body": "*hi*"})).unwrap();
        assert_eq!(html.trim(), "cafe-creme|<p><em>hi</em></p>");
    }

    #[test]
    fn test_markdown_filter_is_gfm() {
        let html = engine().render("filters.html", &json!({"label": "x", "body": "~~old~~"})).unwrap();
        assert!(html.contains("<del>old</del>"), "{}", html);
    }

    #[test]
    fn test_date_filter() {
        let html = engine().render("dates.txt", &json!({"d": "2025-11-25"})).unwrap();
        assert_eq!(html, "25 novembre 2025|25/11/2025|Tuesday 25 November 2025");

        let err = engine().render("bad_date.html", &json!({"d": "someday"})).unwrap_err();
        assert!(matches!(err, Error::Template { .. }));
    }

    #[test]
    fn test_unknown_template() {
        let err = engine().render("missing.html", &json!({})).unwrap_err();
        assert!(matches!(err, Error::TemplateNotFound(name) if name == "missing.html"));
    }

    #[test]
    fn test_template_dir() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::create_dir_all(dir.path().join("pages"))?;
        std::fs::write(dir.path().join("pages/home.html"), "{{ t.welcome }}")?;
        let engine = TemplateEngine::from_dir(dir.path());
        assert_eq!(engine.render("pages/home.html", &json!({"t": {"welcome": "Bienvenue"}})).unwrap(), "Bienvenue");
        Ok(())
    }
}

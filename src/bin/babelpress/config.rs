use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use babelpress::config::{read_config, read_projects, read_translations, SiteConfig, Translations};

const CFG_FILE_NAME: &str = "config/site_config.yaml";
const TRANSLATIONS_FILE_NAME: &str = "data/translations.yaml";
const PROJECTS_FILE_NAME: &str = "data/projects.yaml";

pub(crate) fn config_path(source_dir: &Path) -> PathBuf {
    source_dir.join(CFG_FILE_NAME)
}

pub(crate) fn translations_path(source_dir: &Path) -> PathBuf {
    source_dir.join(TRANSLATIONS_FILE_NAME)
}

pub(crate) fn open_config(source_dir: &Path) -> Result<SiteConfig> {
    let config_path = config_path(source_dir);
    println!("Reading config from {}", config_path.display());

    let config = read_config(&config_path)
        .with_context(|| format!("Could not load the site configuration from {}", source_dir.display()))?;

    match config.log.as_ref().and_then(|log| log.location.as_ref()) {
        Some(location) => println!("Log enabled. Files will be written in {}", location.display()),
        None => println!("Logging to the console"),
    }

    Ok(config)
}

pub(crate) fn open_translations(source_dir: &Path) -> Result<Translations> {
    let path = translations_path(source_dir);
    read_translations(&path).with_context(|| format!("Could not load translations from {}", path.display()))
}

pub(crate) fn open_projects(source_dir: &Path) -> Result<Value> {
    let path = source_dir.join(PROJECTS_FILE_NAME);
    read_projects(&path).with_context(|| format!("Could not load projects from {}", path.display()))
}

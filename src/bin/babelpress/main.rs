use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use spdlog::{error, info, warn};

use babelpress::config::LogLevel;
use babelpress::logger::{configure_logger, LogSettings};
use babelpress::render::TemplateEngine;
use babelpress::site_builder::{BuildOptions, SiteBuilder};

use crate::config::{open_config, open_projects, open_translations, translations_path};

mod config;

#[derive(Parser, Debug)]
#[command(version, about = "Builds a multilingual static site from markdown and YAML", long_about = None)]
struct Args {
    /// Source directory (config/, data/, templates/, assets/, locales/)
    #[arg(short, long, default_value = "src")]
    source: PathBuf,

    /// Output directory. It is removed and recreated on every build
    #[arg(short, long, default_value = "dist")]
    output: PathBuf,

    /// Overrides the level from the `log` section of the configuration
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,

    /// Plain log lines, without icons
    #[arg(long)]
    no_icons: bool,
}

fn run(args: Args) -> Result<()> {
    let config = open_config(&args.source)?;

    let log = config.log.clone();
    let settings = LogSettings {
        level: args.log_level.or(log.as_ref().map(|l| l.level)).unwrap_or(LogLevel::Info),
        log_to_console: log.as_ref().map_or(true, |l| l.log_to_console),
        location: log.as_ref().and_then(|l| l.location.as_deref()),
    };
    let logger = match configure_logger(&settings) {
        Ok(logger) => logger,
        Err(err) => {
            warn!("Error creating logger sinks. Using console instead. Desc={}", err);
            spdlog::default_logger()
        }
    };

    if !translations_path(&args.source).exists() {
        warn!(logger: logger, "No translations file at {}, UI strings will be empty",
            translations_path(&args.source).display());
    }
    let translations = open_translations(&args.source)?;
    let projects = open_projects(&args.source)?;

    info!(logger: logger, "Building {} into {}", args.source.display(), args.output.display());

    let renderer = TemplateEngine::from_dir(&args.source.join("templates"));
    let options = BuildOptions {
        source_dir: args.source,
        output_dir: args.output,
        icons: !args.no_icons,
    };
    let builder = SiteBuilder::new(config, translations, renderer, options, logger)?
        .with_projects(projects);
    builder.run()?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

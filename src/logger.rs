use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use spdlog::sink::{RotatingFileSink, RotationPolicy, StdStream, StdStreamSink};
use spdlog::{Level, LevelFilter, Logger, LoggerBuilder};

use crate::config::LogLevel;

impl From<LogLevel> for Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Critical => Level::Critical,
            LogLevel::Error => Level::Error,
            LogLevel::Warn => Level::Warn,
            LogLevel::Info => Level::Info,
            LogLevel::Debug => Level::Debug,
            LogLevel::Trace => Level::Trace,
        }
    }
}

pub struct LogSettings<'a> {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<&'a Path>,
}

fn add_console_sinks(builder: &mut LoggerBuilder) -> spdlog::Result<()> {
    let stdout = Arc::new(StdStreamSink::builder()
        .std_stream(StdStream::Stdout)
        .level_filter(LevelFilter::MoreVerbose(Level::Warn))
        .build()?);

    let stderr = Arc::new(StdStreamSink::builder()
        .std_stream(StdStream::Stderr)
        .level_filter(LevelFilter::MoreSevereEqual(Level::Warn))
        .build()?);

    builder.sink(stdout).sink(stderr);

    Ok(())
}

/// Builds the build logger, installs it as the default one and hands it back
/// so it can be passed to every component.
pub fn configure_logger(settings: &LogSettings) -> spdlog::Result<Arc<Logger>> {
    let mut builder = Logger::builder();

    if let Some(location) = settings.location {
        let daily_sink = Arc::new(RotatingFileSink::builder()
            .base_path(location)
            .rotation_policy(RotationPolicy::Daily { hour: 0, minute: 0 })
            .max_files(30)
            .rotate_on_open(false)
            .build()?);
        builder.sink(daily_sink);
    }

    if settings.log_to_console || settings.location.is_none() {
        add_console_sinks(&mut builder)?;
    }

    let logger = Arc::new(builder.build()?);
    logger.set_flush_level_filter(LevelFilter::MoreSevereEqual(Level::Info));
    logger.set_flush_period(Some(Duration::from_secs(2)));
    logger.set_level_filter(LevelFilter::MoreSevereEqual(settings.level.into()));

    spdlog::set_default_logger(logger.clone());

    Ok(logger)
}

/// Major steps of a build, logged one line each.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Start,
    Clean,
    Copy,
    Pages,
    Posts,
    Glossary,
    Taxonomy,
    Redirect,
    Success,
    Failure,
}

impl Phase {
    fn icon(&self) -> &'static str {
        match self {
            Phase::Start => "🚀",
            Phase::Clean => "🧹",
            Phase::Copy => "📋",
            Phase::Pages | Phase::Posts => "📝",
            Phase::Glossary => "📖",
            Phase::Taxonomy => "📂",
            Phase::Redirect => "🔀",
            Phase::Success => "✨",
            Phase::Failure => "❌",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Phase::Start => "Starting site build",
            Phase::Clean => "Cleaning output directory",
            Phase::Copy => "Copying static files",
            Phase::Pages => "Generating pages",
            Phase::Posts => "Generating posts",
            Phase::Glossary => "Generating glossary",
            Phase::Taxonomy => "Generating category, keyword and tag pages",
            Phase::Redirect => "Creating root redirect",
            Phase::Success => "Site built successfully",
            Phase::Failure => "Site build failed",
        }
    }

    pub fn line(&self, icons: bool) -> String {
        if icons {
            format!("{} {}", self.icon(), self.label())
        } else {
            self.label().to_string()
        }
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_line() {
        assert_eq!(Phase::Clean.line(false), "Cleaning output directory");
        assert_eq!(Phase::Clean.line(true), "🧹 Cleaning output directory");
        assert_eq!(Phase::Failure.to_string(), "Site build failed");
    }
}

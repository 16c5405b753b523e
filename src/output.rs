use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use spdlog::Logger;

use crate::error::{Error, Result};

/// Writes rendered artifacts, one whole file each.
///
/// Remembers every path written during the build so that two artifacts routed
/// to the same file are reported; the later write wins.
pub struct OutputWriter {
    logger: Arc<Logger>,
    written: HashSet<PathBuf>,
}

impl OutputWriter {
    pub fn new(logger: Arc<Logger>) -> Self {
        OutputWriter {
            logger,
            written: HashSet::new(),
        }
    }

    pub fn write(&mut self, output_path: &Path, html: &str) -> Result<()> {
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        if !self.written.insert(output_path.to_path_buf()) {
            spdlog::warn!(logger: self.logger, "Output collision: {} is written twice, keeping the last one",
                output_path.display());
        }

        fs::write(output_path, html).map_err(|e| Error::io(output_path, e))?;
        spdlog::debug!(logger: self.logger, "Wrote {}", output_path.display());
        Ok(())
    }

    pub fn written_count(&self) -> usize {
        self.written.len()
    }
}

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use spdlog::Logger;
use walkdir::WalkDir;

use crate::error::{Error, Result};

const ASSETS_DIR: &str = "assets";

/// Prepares the output directory and copies static assets into it.
pub struct StaticFiles {
    src_path: PathBuf,
    dist_path: PathBuf,
    logger: Arc<Logger>,
}

impl StaticFiles {
    pub fn new(src_path: &Path, dist_path: &Path, logger: Arc<Logger>) -> Self {
        StaticFiles {
            src_path: src_path.to_path_buf(),
            dist_path: dist_path.to_path_buf(),
            logger,
        }
    }

    /// Removes the output directory, if any, and recreates it empty.
    pub fn setup_output_dir(&self) -> Result<()> {
        match fs::remove_dir_all(&self.dist_path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(Error::io(&self.dist_path, e)),
        }
        fs::create_dir_all(&self.dist_path).map_err(|e| Error::io(&self.dist_path, e))
    }

    /// Copies `<source>/assets` into `<output>/assets` and returns the number
    /// of files copied. Entries resolving outside the source tree are skipped.
    pub fn copy_assets(&self) -> Result<usize> {
        let src_dir = self.src_path.join(ASSETS_DIR);
        if !src_dir.is_dir() {
            spdlog::debug!(logger: self.logger, "No assets directory at {}", src_dir.display());
            return Ok(0);
        }

        let base = self.src_path.canonicalize().map_err(|e| Error::io(&self.src_path, e))?;
        let dst_dir = self.dist_path.join(ASSETS_DIR);
        let mut copied = 0;

        for entry in WalkDir::new(&src_dir).follow_links(true).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    spdlog::warn!(logger: self.logger, "Skipping unreadable asset: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let src_file = entry.path();
            let within_base = src_file.canonicalize()
                .map(|real| real.starts_with(&base))
                .unwrap_or(false);
            if !within_base {
                spdlog::warn!(logger: self.logger, "Skipping asset outside of {}: {}",
                    base.display(), src_file.display());
                continue;
            }

            let Ok(relative) = src_file.strip_prefix(&src_dir) else {
                continue;
            };
            let dst_file = dst_dir.join(relative);
            if let Some(parent) = dst_file.parent() {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
            fs::copy(src_file, &dst_file).map_err(|e| Error::io(src_file, e))?;
            copied += 1;
        }

        Ok(copied)
    }
}

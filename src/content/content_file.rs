use std::{fs, io};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A markdown source file read from disk.
pub struct ContentFile {
    /// File name without extension
    pub stem: String,
    pub file_path: PathBuf,
    pub raw_content: String,
}

impl ContentFile {
    pub fn from_file(file_path: PathBuf) -> io::Result<ContentFile> {
        if !Self::is_content_file(&file_path) {
            return Err(io::Error::new(ErrorKind::Unsupported, format!("Not a markdown file: {}", file_path.display())));
        }

        let stem = match file_path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => stem.to_string(),
            None => return Err(io::Error::new(ErrorKind::InvalidInput, format!("Invalid file name: {}", file_path.display()))),
        };

        let raw_content = fs::read_to_string(&file_path)?;

        Ok(ContentFile {
            stem,
            file_path,
            raw_content,
        })
    }

    pub fn is_content_file(file_name: &Path) -> bool {
        match file_name.extension().and_then(|e| e.to_str()) {
            Some("md") | Some("markdown") => true,
            _ => false,
        }
    }
}

/// Lists the markdown files directly inside `dir`, ordered by file name.
pub fn list_content_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = vec![];
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if ContentFile::is_content_file(&path) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

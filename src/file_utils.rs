use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::app_config::CanvasConfig;

// @module: File and directory utilities

// @const: Characters not allowed in generated file names
static UNSAFE_FILENAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\w\-.]").unwrap()
});

static WHITESPACE_RUN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").unwrap()
});

static NON_SLUG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^a-z'\-]").unwrap()
});

/// Caption file extensions picked up from an input directory
pub const CAPTION_EXTENSIONS: &[&str] = &["srt"];

/// File name prefixes of previous outputs, never treated as inputs
const SKIPPED_PREFIXES: &[&str] = &["output", "processed_"];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Caption files directly inside `dir`, sorted by file name.
    ///
    /// Files whose name starts with `output` or `processed_` are skipped.
    pub fn find_caption_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).min_depth(1).max_depth(1).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let is_caption = path
                .extension()
                .map(|ext| {
                    let ext = ext.to_string_lossy();
                    CAPTION_EXTENSIONS.iter().any(|c| ext.eq_ignore_ascii_case(c))
                })
                .unwrap_or(false);
            let name = entry.file_name().to_string_lossy().to_lowercase();
            let skipped = SKIPPED_PREFIXES.iter().any(|prefix| name.starts_with(prefix));

            if is_caption && !skipped {
                result.push(path.to_path_buf());
            }
        }

        result.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}

/// Replace anything that is not a word character, `-` or `.` with `_`
pub fn sanitize_filename(filename: &str) -> String {
    UNSAFE_FILENAME_REGEX.replace_all(filename, "_").into_owned()
}

/// Output name derived from the chosen phrase, e.g. `640x480-see-you-later`
pub fn create_filename_from_phrase(phrase: &str, canvas: &CanvasConfig) -> String {
    let lowered = phrase.trim().to_lowercase();
    let dashed = WHITESPACE_RUN_REGEX.replace_all(&lowered, "-");
    let slug = NON_SLUG_REGEX.replace_all(&dashed, "");
    format!("{}-{}", canvas, slug)
}

/// Directory receiving the documents of one language pass
pub fn output_dir_for(base: &Path, phrase: &str, canvas: &CanvasConfig, language: Option<&str>) -> PathBuf {
    let name = create_filename_from_phrase(phrase, canvas);
    match language {
        Some(lang) => base.join(format!("{}-{}", lang, name)),
        None => base.join(name),
    }
}

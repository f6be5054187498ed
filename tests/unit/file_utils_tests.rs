/*!
 * Tests for file and directory utilities
 */

use anyhow::Result;
use std::fs;
use phrasereel::app_config::CanvasConfig;
use phrasereel::file_utils::{create_filename_from_phrase, sanitize_filename, FileManager};
use crate::common;

#[test]
fn test_find_caption_files_shouldSkipPreviousOutputsAndOtherFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_file(dir, "b.srt", "")?;
    common::create_test_file(dir, "a.SRT", "")?;
    common::create_test_file(dir, "output.srt", "")?;
    common::create_test_file(dir, "processed_a.srt", "")?;
    common::create_test_file(dir, "notes.txt", "")?;
    fs::create_dir(dir.join("nested"))?;
    common::create_test_file(&dir.join("nested"), "c.srt", "")?;

    let files = FileManager::find_caption_files(dir)?;
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a.SRT", "b.srt"]);
    Ok(())
}

#[test]
fn test_write_to_file_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("deep").join("er").join("out.ass");

    FileManager::write_to_file(&path, "content")?;

    assert!(FileManager::file_exists(&path));
    assert!(FileManager::dir_exists(path.parent().unwrap()));
    assert_eq!(FileManager::read_to_string(&path)?, "content");
    Ok(())
}

#[test]
fn test_ensure_dir_withExistingDir_shouldSucceed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    FileManager::ensure_dir(temp_dir.path())?;
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}

#[test]
fn test_sanitize_filename_withUnicodeLetters_shouldKeepThem() {
    assert_eq!(sanitize_filename("Amélie 2001"), "Amélie_2001");
    assert_eq!(sanitize_filename("a/b\\c"), "a_b_c");
}

#[test]
fn test_create_filename_from_phrase_withCanvas_shouldPrefixSize() {
    let canvas = CanvasConfig::new(1920, 1080);
    assert_eq!(create_filename_from_phrase("I'll BE back", &canvas), "1920x1080-i'll-be-back");
    assert_eq!(create_filename_from_phrase("", &canvas), "1920x1080-");
}

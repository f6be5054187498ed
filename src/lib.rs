/*!
 * # PhraseReel - karaoke phrase overlays for video clips
 *
 * A Rust library that turns the timed captions of a batch of short clips into
 * styled subtitle documents ready to be burned onto the video.
 *
 * ## Features
 *
 * - Parse caption tracks whose cues mark one emphasized word each
 * - Find the longest phrase shared by the captions of all clips
 *   (or of the largest subset that shares one)
 * - Build ASS documents with a highlighted phrase, per-cue word reveal,
 *   an optional translation line and a watermark
 * - Scale all geometry with the canvas width and auto-fit long text
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `cue_processor`: Caption cue parsing and timestamps
 * - `overlay`: Overlay synthesis:
 *   - `overlay::words`: Word normalization and run location
 *   - `overlay::matcher`: Common phrase matching
 *   - `overlay::autofit`: Font size fitting
 *   - `overlay::document`: ASS document assembly
 * - `translation`: Sources of the translation line
 * - `file_utils`: File system operations and output naming
 * - `app_controller`: Batch controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod cue_processor;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod overlay;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use cue_processor::{Cue, CueTrack};
pub use overlay::{DocumentBuilder, SubtitleDocument};
pub use errors::{AppError, CueError, MeasureError, TranslationError};

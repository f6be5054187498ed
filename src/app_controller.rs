use anyhow::Result;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::cue_processor::CueTrack;
use crate::errors::AppError;
use crate::file_utils::{self, FileManager};
use crate::language_utils;
use crate::overlay::{calculate_highlight_phrase, DocumentBuilder, SubtitleDocument, TextMeasure};
use crate::translation::{NoopTranslator, Translator};

// @module: Batch controller turning caption files into overlay documents

/// Caption data of one video, gathered before any document is built
#[derive(Debug, Clone)]
pub struct VideoCaptions {
    /// Source caption file
    pub source: PathBuf,
    /// File-system safe base name used for outputs
    pub safe_name: String,
    /// Parsed cues
    pub track: CueTrack,
    /// Full caption phrase
    pub phrase: String,
}

impl VideoCaptions {
    /// Build from caption text; `None` when the track has no usable cues
    pub fn from_text(source: PathBuf, content: &str) -> Option<Self> {
        let track = CueTrack::parse(content);
        if track.is_empty() {
            return None;
        }
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "video".to_string());
        let phrase = track.phrase();
        debug!("Extracted full phrase for {}: {}", stem, phrase);
        Some(Self {
            safe_name: file_utils::sanitize_filename(&stem),
            source,
            track,
            phrase,
        })
    }
}

/// Document built for one video in one language pass
#[derive(Debug, Clone)]
pub struct BuiltDocument {
    pub safe_name: String,
    pub language: Option<String>,
    pub translation: String,
    pub document: SubtitleDocument,
}

/// Outcome of one language pass
#[derive(Debug, Clone, Default)]
pub struct PassReport {
    pub language: Option<String>,
    pub output_dir: PathBuf,
    pub written: Vec<PathBuf>,
    pub kept_existing: usize,
}

/// Outcome of a whole batch
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub total_videos: usize,
    pub skipped_videos: usize,
    pub highlight_phrase: String,
    pub passes: Vec<PassReport>,
}

/// Pick the phrase to highlight across the batch.
///
/// An explicit phrase wins (lower-cased). Otherwise the common phrase of all
/// videos is used; when there is none, the first non-empty video phrase,
/// and finally `"output"`.
pub fn choose_highlight_phrase<S: AsRef<str>>(explicit: Option<&str>, phrases: &[S]) -> String {
    if let Some(explicit) = explicit.filter(|p| !p.trim().is_empty()) {
        info!("Using provided highlight phrase: '{}'", explicit.to_lowercase());
        return explicit.to_lowercase();
    }

    let computed = calculate_highlight_phrase(phrases);
    if !computed.trim().is_empty() {
        info!("Calculated common highlight phrase: '{}'", computed);
        return computed;
    }

    info!("No common contiguous sequence found; falling back to first non-empty video phrase.");
    phrases
        .iter()
        .map(|p| p.as_ref())
        .find(|p| !p.trim().is_empty())
        .unwrap_or("output")
        .to_lowercase()
}

/// Main application controller for overlay generation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Source of translation lines
    translator: Arc<dyn Translator>,
    // @field: Optional font metrics for auto-fit
    measure: Option<Arc<dyn TextMeasure>>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        config.validate().map_err(|e| AppError::Config(e.to_string()))?;
        Ok(Self {
            config,
            translator: Arc::new(NoopTranslator),
            measure: None,
        })
    }

    /// Use `translator` for the translation line
    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    /// Use `measure` for auto-fit instead of the width estimate
    pub fn with_measure(mut self, measure: Arc<dyn TextMeasure>) -> Self {
        self.measure = Some(measure);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// First phase: parse every caption file, dropping videos without cues.
    ///
    /// Returns the usable videos and the number of skipped files.
    pub fn gather(&self, files: &[PathBuf]) -> (Vec<VideoCaptions>, usize) {
        let mut videos = Vec::with_capacity(files.len());
        let mut skipped = 0;

        for file in files {
            let content = match FileManager::read_to_string(file) {
                Ok(content) => content,
                Err(e) => {
                    error!("Error reading captions from {:?}: {}", file, e);
                    skipped += 1;
                    continue;
                }
            };
            match VideoCaptions::from_text(file.clone(), &content) {
                Some(video) => videos.push(video),
                None => {
                    info!("Video {:?} does not contain subtitles or cues, skipping.", file);
                    skipped += 1;
                }
            }
        }

        (videos, skipped)
    }

    /// Barrier between gathering and building: the phrase highlighted in every document
    pub fn highlight_phrase(&self, videos: &[VideoCaptions]) -> String {
        let phrases: Vec<&str> = videos.iter().map(|v| v.phrase.as_str()).collect();
        choose_highlight_phrase(self.config.highlight_phrase.as_deref(), &phrases)
    }

    async fn translate_phrase(&self, phrase: &str, language: Option<&str>) -> String {
        let Some(language) = language else {
            return String::new();
        };
        match self.translator.translate(phrase, language).await {
            Ok(translation) => translation,
            Err(e) => {
                warn!("Translation to {} failed for '{}': {}", language, phrase, e);
                String::new()
            }
        }
    }

    fn build_document(&self, video: &VideoCaptions, highlight: &str, translation: &str) -> SubtitleDocument {
        let mut builder = DocumentBuilder::new(&self.config.overlay);
        if let Some(measure) = self.measure.as_deref() {
            builder = builder.with_measure(measure);
        }
        builder.build(
            video.track.cues(),
            &video.phrase,
            highlight,
            Some(translation),
            &self.config.canvas,
        )
    }

    /// Second phase: translate and build one document per video.
    ///
    /// Videos are independent; up to `config.concurrency` are in flight at
    /// once and results keep the input order.
    pub async fn build_documents(
        &self,
        videos: &[VideoCaptions],
        highlight: &str,
        language: Option<&str>,
    ) -> Vec<BuiltDocument> {
        let progress = Self::progress_bar(videos.len() as u64, language);

        let documents = stream::iter(videos)
            .map(|video| {
                let progress = progress.clone();
                async move {
                    let translation = self.translate_phrase(&video.phrase, language).await;
                    let document = self.build_document(video, highlight, &translation);
                    progress.inc(1);
                    BuiltDocument {
                        safe_name: video.safe_name.clone(),
                        language: language.map(str::to_string),
                        translation,
                        document,
                    }
                }
            })
            .buffered(self.config.concurrency.max(1))
            .collect::<Vec<_>>()
            .await;

        progress.finish_and_clear();
        documents
    }

    fn progress_bar(len: u64, language: Option<&str>) -> ProgressBar {
        let progress = ProgressBar::new(len);
        let style = ProgressStyle::with_template("{prefix} [{bar:30}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        progress.set_style(style);
        progress.set_prefix(language.unwrap_or("overlay").to_string());
        progress
    }

    /// Write one pass's documents to `output_dir`
    fn write_documents(
        &self,
        documents: &[BuiltDocument],
        language: Option<&str>,
        output_dir: &Path,
        force_overwrite: bool,
    ) -> Result<PassReport> {
        FileManager::ensure_dir(output_dir)?;
        let mut report = PassReport {
            language: language.map(str::to_string),
            output_dir: output_dir.to_path_buf(),
            ..PassReport::default()
        };

        for built in documents {
            let path = output_dir.join(format!("{}.ass", built.safe_name));
            if path.exists() && !force_overwrite {
                warn!("Skipping {:?}, file already exists (use -f to force overwrite)", path);
                report.kept_existing += 1;
                continue;
            }
            FileManager::write_to_file(&path, &built.document.to_ass_string())?;
            debug!("ASS file written: {:?}", path);
            report.written.push(path);
        }

        Ok(report)
    }

    /// Run the whole batch for the caption files found in `input_dir`
    pub async fn run_folder(&self, input_dir: &Path, output_dir: &Path, force_overwrite: bool) -> Result<BatchReport> {
        let start_time = std::time::Instant::now();
        let files = FileManager::find_caption_files(input_dir)?;
        info!("Found {} caption files in the folder: {:?}", files.len(), input_dir);

        let mut report = BatchReport {
            total_videos: files.len(),
            ..BatchReport::default()
        };
        if files.is_empty() {
            info!("No suitable caption files found in the specified folder.");
            return Ok(report);
        }

        let (videos, skipped) = self.gather(&files);
        report.skipped_videos = skipped;
        if videos.is_empty() {
            info!("No videos with valid subtitles found.");
            return Ok(report);
        }

        let highlight = self.highlight_phrase(&videos);
        report.highlight_phrase = highlight.clone();

        let languages = self.config.unique_target_languages();
        let passes: Vec<Option<&str>> = if languages.is_empty() {
            vec![None]
        } else {
            languages.iter().map(|l| Some(l.as_str())).collect()
        };

        for language in passes {
            if let Some(lang) = language {
                let name = language_utils::get_language_name(lang).unwrap_or_else(|_| lang.to_string());
                info!("Building overlays for language: {} ({})", lang, name);
            }

            let documents = self.build_documents(&videos, &highlight, language).await;
            let pass_dir = file_utils::output_dir_for(output_dir, &highlight, &self.config.canvas, language);
            let pass = self.write_documents(&documents, language, &pass_dir, force_overwrite)?;

            info!("Final statistics{}:", language.map(|l| format!(" for language '{}'", l)).unwrap_or_default());
            info!("Total videos: {}", report.total_videos);
            info!("Processed videos: {}", documents.len());
            info!("Broken videos: {}", report.total_videos - documents.len());

            report.passes.push(pass);
        }

        info!("Execution complete in {:.1}s.", start_time.elapsed().as_secs_f64());
        Ok(report)
    }
}

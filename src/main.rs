// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use phrasereel::app_config::{CanvasConfig, Config, LogLevel};
use phrasereel::app_controller::Controller;
use phrasereel::overlay::CharWidthMeasure;
use phrasereel::translation::FileTranslator;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for phrasereel
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// PhraseReel - karaoke phrase overlays for video clips
///
/// Reads the caption files of a batch of clips, finds the phrase they share
/// and writes one styled ASS overlay per clip (and per translation language).
#[derive(Parser, Debug)]
#[command(name = "phrasereel")]
#[command(version)]
#[command(about = "Karaoke phrase overlays from clip captions")]
#[command(long_about = "PhraseReel turns the captions of short clips into ASS overlays that highlight the phrase the clips share.

EXAMPLES:
    phrasereel clips/                                 # Overlays for every .srt in clips/
    phrasereel --video-size 1280x720 clips/           # Scale overlays for a 1280 wide canvas
    phrasereel --highlight-phrase \"see you\" clips/    # Highlight an explicit phrase
    phrasereel -l ru,es --translations tr.json clips/ # One overlay set per language
    phrasereel completions bash > phrasereel.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically. Command line options override the file.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory containing the caption (.srt) files
    #[arg(value_name = "CAPTION_DIR")]
    input_dir: Option<PathBuf>,

    /// Output canvas size as WIDTHxHEIGHT
    #[arg(long)]
    video_size: Option<String>,

    /// Phrase to highlight (computed from the captions if omitted)
    #[arg(long)]
    highlight_phrase: Option<String>,

    /// Translation language code or comma separated list (e.g. 'ru' or 'ru,es,de')
    #[arg(short = 'l', long, value_delimiter = ',')]
    translate_lang: Vec<String>,

    /// JSON file with pre-computed translations
    #[arg(long, env = "PHRASEREEL_TRANSLATIONS")]
    translations: Option<PathBuf>,

    /// Directory where the overlays are written (default: <CAPTION_DIR>/result)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Font name used for all overlay lines
    #[arg(long)]
    font: Option<String>,

    /// Font size of the main phrase; translation and watermark scale with it
    #[arg(long)]
    font_size: Option<u32>,

    /// Disable shrinking long phrases to fit two lines
    #[arg(long)]
    no_auto_fit: bool,

    /// Measure line wraps word by word instead of the plain width estimate
    #[arg(long)]
    measure_words: bool,

    /// Force overwrite of existing output files
    #[arg(short, long = "force")]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long = "config", default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and marker for a level
    fn decoration(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "✖"),
            Level::Warn => ("1;33", "!"),
            Level::Info => ("1;32", " "),
            Level::Debug => ("1;36", "·"),
            Level::Trace => ("1;35", "…"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, marker) = Self::decoration(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, marker, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // The level is updated after loading the config
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "phrasereel", &mut std::io::stdout());
        return Ok(());
    }

    let input_dir = cli
        .input_dir
        .clone()
        .ok_or_else(|| anyhow!("CAPTION_DIR is required when no subcommand is specified"))?;
    run(cli, &input_dir).await
}

/// Apply command line overrides on top of the loaded configuration
fn apply_overrides(mut config: Config, options: &CommandLineOptions) -> Config {
    if let Some(size) = &options.video_size {
        config.canvas = CanvasConfig::parse_or_default(size);
    }
    if let Some(phrase) = &options.highlight_phrase {
        config.highlight_phrase = Some(phrase.clone());
    }
    if !options.translate_lang.is_empty() {
        config.target_languages = options
            .translate_lang
            .iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
    }
    if let Some(font) = &options.font {
        config.overlay = config.overlay.with_font(font);
    }
    if let Some(size) = options.font_size {
        config.overlay = config.overlay.with_font_size(size);
        info!(
            "Using font size {} for main phrase; translation: {}, watermark: {}.",
            size, config.overlay.translation.size, config.overlay.watermark.size
        );
    }
    if options.no_auto_fit {
        config.overlay.auto_fit = false;
    }
    if let Some(level) = &options.log_level {
        config.log_level = level.clone().into();
    }
    config
}

async fn run(options: CommandLineOptions, input_dir: &Path) -> Result<()> {
    if !input_dir.is_dir() {
        return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
    }

    let config = Config::load_or_create(&options.config_path)?;
    let config = apply_overrides(config, &options);
    log::set_max_level(config.log_level.to_level_filter());

    config.validate().context("Configuration validation failed")?;

    let output_dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| input_dir.join("result"));

    let mut controller = Controller::with_config(config)?;
    if let Some(path) = &options.translations {
        let translator = FileTranslator::from_file(path)
            .with_context(|| format!("Failed to load translations from {:?}", path))?;
        controller = controller.with_translator(Arc::new(translator));
    }
    if options.measure_words {
        controller = controller.with_measure(Arc::new(CharWidthMeasure::default()));
    }

    let report = controller
        .run_folder(input_dir, &output_dir, options.force_overwrite)
        .await?;

    for pass in &report.passes {
        info!(
            "Wrote {} overlay(s) to {:?} ({} kept)",
            pass.written.len(),
            pass.output_dir,
            pass.kept_existing
        );
    }

    Ok(())
}

// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::{Config, LogLevel};
use app_controller::Controller;

mod app_config;
mod app_controller;
mod errors;
mod file_utils;
mod lyric_processor;
mod providers;
mod transcription;

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

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Transcribe audio files to LRC lyrics (default command)
    Transcribe(TranscribeArgs),

    /// Generate shell completions for yaltwai
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranscribeArgs {
    /// Input audio file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Model name to use for transcription
    #[arg(short, long)]
    model: Option<String>,

    /// API key for the transcription endpoint
    #[arg(short = 'k', long, env = "GEMINI_API_KEY")]
    api_key: Option<String>,

    /// Endpoint URL (for proxies or self-hosted gateways)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Directory to write .lrc files to (defaults to next to the input)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// yaltwai - Yet Another Lyrics Transcriber with AI
///
/// Transcribes audio files to synchronized LRC lyrics using a hosted
/// generative AI model.
#[derive(Parser, Debug)]
#[command(name = "yaltwai")]
#[command(version = "1.0.0")]
#[command(about = "AI-powered audio-to-LRC lyric transcription")]
#[command(long_about = "yaltwai sends audio files to a generative AI model and writes the
returned synchronized lyrics as .lrc files.

EXAMPLES:
    yaltwai song.mp3                       # Transcribe using default config
    yaltwai -f song.mp3                    # Force overwrite an existing .lrc
    yaltwai -m gemini-2.0-pro song.mp3     # Use a specific model
    yaltwai -o lyrics/ song.mp3            # Write the .lrc into lyrics/
    yaltwai --log-level debug /music/      # Process a whole directory
    yaltwai completions bash > yaltwai.bash  # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different config file with --config. If the config file doesn't exist, a
    default one will be created automatically. The API key can come from the
    config file, --api-key, or the GEMINI_API_KEY environment variable.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input audio file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Model name to use for transcription
    #[arg(short, long)]
    model: Option<String>,

    /// API key for the transcription endpoint
    #[arg(short = 'k', long, env = "GEMINI_API_KEY")]
    api_key: Option<String>,

    /// Endpoint URL (for proxies or self-hosted gateways)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Directory to write .lrc files to (defaults to next to the input)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
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
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "yaltwai", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Transcribe(args)) => run_transcribe(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            let transcribe_args = TranscribeArgs {
                input_path,
                force_overwrite: cli.force_overwrite,
                model: cli.model,
                api_key: cli.api_key,
                endpoint: cli.endpoint,
                output_dir: cli.output_dir,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_transcribe(transcribe_args).await
        }
    }
}

async fn run_transcribe(options: TranscribeArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.into());
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader::<_, Config>(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if let Some(model) = &options.model {
        config.transcription.model = model.clone();
    }
    if let Some(api_key) = &options.api_key {
        config.transcription.api_key = api_key.clone();
    }
    if let Some(endpoint) = &options.endpoint {
        config.transcription.endpoint = endpoint.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.clone().into());
    }

    // Create controller
    let controller = Controller::with_config(config)?;

    if options.input_path.is_file() {
        let output_dir = match &options.output_dir {
            Some(dir) => dir.clone(),
            None => options.input_path.parent().unwrap_or(Path::new(".")).to_path_buf(),
        };
        controller.run(options.input_path.clone(), output_dir, options.force_overwrite).await
    } else if options.input_path.is_dir() {
        controller.run_folder(options.input_path.clone(), options.force_overwrite).await
    } else {
        Err(anyhow!("Input path does not exist: {:?}", options.input_path))
    }
}

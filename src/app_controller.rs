use anyhow::{Result, anyhow};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use std::time::Duration;
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::lyric_processor::{LyricDocument, LyricLine};
use crate::providers::gemini::Gemini;
use crate::transcription::{TranscriptionRequest, TranscriptionService};

// @module: Application controller for audio-to-LRC transcription

/// User-facing lifecycle of one transcription call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingState {
    /// Nothing in flight
    Idle,
    /// Request submitted, waiting on the model
    Processing,
    /// Lyric text available
    Ready,
    /// Terminal failure surfaced to the user
    Error,
}

/// Main application controller for lyric transcription
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.transcription.model.is_empty()
    }

    /// Build the transcription service from the current configuration
    fn build_service(&self) -> TranscriptionService<Gemini> {
        let t = &self.config.transcription;
        let provider = Gemini::new_with_config(
            t.api_key.clone(),
            t.model.clone(),
            t.endpoint.clone(),
            t.timeout_secs,
            t.max_output_tokens,
            t.temperature,
        );
        TranscriptionService::with_retry_policy(provider, t.max_attempts, t.backoff_base_ms)
    }

    /// Transcribe a single audio file and write the `.lrc` next to it
    pub async fn run(&self, input_file: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        let start_time = std::time::Instant::now();

        if !FileManager::file_exists(&input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        if !FileManager::is_audio_file(&input_file) {
            return Err(anyhow!("Not a supported audio file: {:?}", input_file));
        }

        FileManager::ensure_dir(&output_dir)?;

        let output_path = FileManager::generate_output_path(&input_file, &output_dir, "lrc");
        if output_path.exists() && !force_overwrite {
            warn!("Skipping file, lyric file already exists (use -f to force overwrite)");
            return Ok(());
        }

        let raw_lrc = self.transcribe_file(&input_file).await?;

        // The raw text is the persisted artifact; the parsed document is a preview
        let document = LyricDocument::parse(&raw_lrc);
        if document.is_empty() {
            warn!("Model output contained no timestamped lyric lines");
        } else {
            info!(
                "Transcribed {} lyric line(s), last at {}",
                document.len(),
                LyricLine::format_timestamp(document.duration_ms())
            );
        }

        FileManager::write_to_file(&output_path, &raw_lrc)?;

        info!(
            "Wrote {:?} in {}",
            output_path,
            Self::format_duration(start_time.elapsed())
        );

        Ok(())
    }

    /// Transcribe every audio file under a directory, sequentially
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input path is not a directory: {:?}", input_dir));
        }

        let audio_files = FileManager::find_audio_files(&input_dir)?;
        if audio_files.is_empty() {
            warn!("No audio files found in {:?}", input_dir);
            return Ok(());
        }

        info!("Found {} audio file(s) to transcribe", audio_files.len());

        let folder_pb = ProgressBar::new(audio_files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result);

        let mut processed = 0usize;
        for file in &audio_files {
            let file_name = file
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Transcribing: {}", file_name));

            let output_dir = file.parent().unwrap_or(Path::new(".")).to_path_buf();
            match self.run(file.clone(), output_dir, force_overwrite).await {
                Ok(()) => processed += 1,
                Err(e) => error!("Failed to transcribe {:?}: {}", file, e),
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");
        info!("Finished: {}/{} file(s) transcribed", processed, audio_files.len());

        Ok(())
    }

    /// Run one transcription call under a spinner, tracking its state
    async fn transcribe_file(&self, input_file: &Path) -> Result<String> {
        let mut state = ProcessingState::Idle;

        let mime_type = FileManager::audio_mime_type(input_file)
            .ok_or_else(|| anyhow!("Cannot determine audio MIME type for {:?}", input_file))?;
        let audio_base64 = FileManager::read_as_base64(input_file)?;
        let request = TranscriptionRequest::new(audio_base64, mime_type);

        let spinner = ProgressBar::new_spinner();
        let spinner_style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(spinner_style);
        spinner.set_message(format!("Transcribing {:?}", input_file.file_name().unwrap_or_default()));
        spinner.enable_steady_tick(Duration::from_millis(100));

        Self::transition(&mut state, ProcessingState::Processing);
        let service = self.build_service();

        match service.transcribe(&request).await {
            Ok(raw_lrc) => {
                Self::transition(&mut state, ProcessingState::Ready);
                spinner.finish_and_clear();
                Ok(raw_lrc)
            }
            Err(e) => {
                Self::transition(&mut state, ProcessingState::Error);
                spinner.finish_and_clear();
                Err(anyhow!("Transcription failed: {}", e))
            }
        }
    }

    fn transition(state: &mut ProcessingState, next: ProcessingState) {
        debug!("Transcription state: {:?} -> {:?}", state, next);
        *state = next;
    }

    /// Format a duration as a human-readable string
    fn format_duration(duration: Duration) -> String {
        let total_secs = duration.as_secs();
        if total_secs >= 60 {
            format!("{}m {}s", total_secs / 60, total_secs % 60)
        } else {
            format!("{}.{}s", total_secs, duration.subsec_millis() / 100)
        }
    }
}

use anyhow::{Result, Context};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// Audio extensions accepted for transcription
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "aac", "flac", "ogg", "opus", "webm"];

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
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Whether the path looks like an audio file we can submit
    pub fn is_audio_file<P: AsRef<Path>>(path: P) -> bool {
        let path = path.as_ref();
        if !path.is_file() {
            return false;
        }

        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.as_str()))
    }

    /// MIME type for an audio file, derived from its extension
    pub fn audio_mime_type<P: AsRef<Path>>(path: P) -> Option<&'static str> {
        let ext = path.as_ref().extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "mp3" => Some("audio/mpeg"),
            "wav" => Some("audio/wav"),
            "m4a" => Some("audio/mp4"),
            "aac" => Some("audio/aac"),
            "flac" => Some("audio/flac"),
            "ogg" | "opus" => Some("audio/ogg"),
            "webm" => Some("audio/webm"),
            _ => None,
        }
    }

    /// Read a file and base64-encode its bytes for an inline payload
    pub fn read_as_base64<P: AsRef<Path>>(path: P) -> Result<String> {
        let bytes = fs::read(path.as_ref())
            .with_context(|| format!("Failed to read audio file: {:?}", path.as_ref()))?;
        Ok(BASE64.encode(bytes))
    }

    // @generates: Output path for the lyric file
    // @params: input_file, output_dir, extension
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        extension: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let output_dir = output_dir.as_ref();

        // Get the file stem (filename without extension)
        let stem = input_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(extension);

        output_dir.join(output_filename)
    }

    /// Find audio files under a directory, recursively
    pub fn find_audio_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if Self::is_audio_file(path) {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
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

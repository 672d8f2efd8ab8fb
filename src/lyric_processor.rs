use std::fmt;
use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use anyhow::{Result, Context};
use once_cell::sync::Lazy;
use regex::Regex;
use log::{debug, warn};

// @module: LRC lyric parsing and serialization

// @const: LRC timestamp tag regex - [mm:ss], [mm:ss.x], [mm:ss.xx] or [mm:ss.xxx]
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\[(\d{1,3}):(\d{2})(?:\.(\d{1,3}))?\])(.*)$").unwrap()
});

// @struct: Single timestamped lyric line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricLine {
    // @field: Offset from start of track in ms
    pub time_ms: u64,

    // @field: Lyric text, empty for pause/instrumental markers
    pub text: String,

    // @field: Original bracketed tag, kept verbatim for lossless output
    pub raw_tag: String,
}

impl LyricLine {
    /// Creates a new line with a canonical `[mm:ss.xx]` tag synthesized from the time
    pub fn new(time_ms: u64, text: impl Into<String>) -> Self {
        LyricLine {
            time_ms,
            text: text.into(),
            raw_tag: Self::format_timestamp(time_ms),
        }
    }

    /// Parse a bracketed LRC tag into milliseconds.
    ///
    /// The fractional digit count picks the scale: three digits are
    /// milliseconds, two are hundredths, one is tenths. The distinction is
    /// never normalized away since the tag itself is kept verbatim.
    pub fn parse_tag(tag: &str) -> Option<u64> {
        let caps = TAG_REGEX.captures(tag)?;
        let minutes: u64 = caps.get(2)?.as_str().parse().ok()?;
        let seconds: u64 = caps.get(3)?.as_str().parse().ok()?;

        let fraction_ms = match caps.get(4) {
            Some(frac) => {
                let digits = frac.as_str();
                let value: u64 = digits.parse().ok()?;
                let scale = match digits.len() {
                    3 => 1,
                    2 => 10,
                    _ => 100,
                };
                value * scale
            }
            None => 0,
        };

        Some(minutes * 60_000 + seconds * 1_000 + fraction_ms)
    }

    /// Offset from start of track in fractional seconds
    pub fn timestamp_seconds(&self) -> f64 {
        self.time_ms as f64 / 1000.0
    }

    /// Format a millisecond offset as a canonical `[mm:ss.xx]` tag
    pub fn format_timestamp(ms: u64) -> String {
        let minutes = ms / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let hundredths = (ms % 1_000) / 10;

        format!("[{:02}:{:02}.{:02}]", minutes, seconds, hundredths)
    }
}

impl fmt::Display for LyricLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.raw_tag, self.text)
    }
}

/// Ordered collection of lyric lines parsed from raw LRC text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LyricDocument {
    /// Lines sorted by time ascending, ties in input order
    pub lines: Vec<LyricLine>,
}

impl LyricDocument {
    /// Parse raw LRC text into a document.
    ///
    /// Parsing is permissive and never fails: lines without a recognizable
    /// timestamp tag are dropped, so stray metadata or chatter in
    /// AI-generated output does not poison the rest of the file. The result
    /// is sorted by timestamp with a stable sort, so simultaneous lines keep
    /// their input order.
    pub fn parse(raw: &str) -> Self {
        let mut lines = Vec::new();
        let mut dropped = 0usize;

        for line in raw.lines() {
            match Self::parse_line(line) {
                Some(parsed) => lines.push(parsed),
                None => {
                    if !line.trim().is_empty() {
                        dropped += 1;
                    }
                }
            }
        }

        if dropped > 0 {
            debug!("Dropped {} untagged line(s) while parsing LRC content", dropped);
        }

        // Stable sort keeps input order for equal timestamps
        lines.sort_by_key(|line| line.time_ms);

        LyricDocument { lines }
    }

    /// Parse one line; None when it carries no recognizable tag
    fn parse_line(line: &str) -> Option<LyricLine> {
        let caps = TAG_REGEX.captures(line)?;
        let raw_tag = caps.get(1)?.as_str().to_string();
        let time_ms = LyricLine::parse_tag(&raw_tag)?;
        let text = caps.get(5).map_or("", |m| m.as_str()).trim().to_string();

        Some(LyricLine { time_ms, text, raw_tag })
    }

    /// Serialize the document back to raw LRC text.
    ///
    /// A pure projection: each line is its verbatim tag followed by its
    /// text, joined by newlines in the document's current order. No
    /// re-sorting happens here, so `parse(doc.to_lrc_string())` reproduces
    /// the document exactly.
    pub fn to_lrc_string(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Read and parse an `.lrc` file
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read lyric file: {:?}", path.as_ref()))?;
        Ok(Self::parse(&content))
    }

    /// Write the document to an `.lrc` file
    pub fn write_to_lrc<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if self.lines.is_empty() {
            warn!("Writing lyric file with no lines: {:?}", path);
        }

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create lyric file: {}", path.display()))?;
        file.write_all(self.to_lrc_string().as_bytes())
            .with_context(|| format!("Failed to write lyric file: {}", path.display()))?;

        Ok(())
    }

    /// Number of lines in the document
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the document holds no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Timestamp of the last line, in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.lines.last().map_or(0, |line| line.time_ms)
    }
}

impl fmt::Display for LyricDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Lyric Document")?;
        writeln!(f, "Lines: {}", self.lines.len())?;
        writeln!(f, "Duration: {}", LyricLine::format_timestamp(self.duration_ms()))?;
        Ok(())
    }
}

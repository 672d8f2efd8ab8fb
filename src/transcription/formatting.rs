/*!
 * Cleanup of raw model output.
 *
 * Models are instructed to emit bare LRC text, but they occasionally wrap
 * the payload in a markdown code fence anyway. This module strips that
 * wrapper before the text reaches the codec.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Opening fence at the very start of the output, e.g. ```` ```lrc ````
static OPENING_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^```[A-Za-z0-9_-]*[ \t]*\r?\n").unwrap()
});

/// Closing fence at the very end of the output
static CLOSING_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\r?\n[ \t]*```\s*$").unwrap()
});

/// Normalizer for text coming back from the model
pub struct ResponseCleaner;

impl ResponseCleaner {
    /// Strip an enclosing code fence and surrounding whitespace.
    ///
    /// Only a fence that wraps the whole payload is removed; backticks
    /// appearing inside the lyric text are left alone.
    pub fn clean(raw: &str) -> String {
        let trimmed = raw.trim();
        Self::strip_code_fence(trimmed).trim().to_string()
    }

    fn strip_code_fence(text: &str) -> &str {
        let Some(open) = OPENING_FENCE.find(text) else {
            return text;
        };

        match CLOSING_FENCE.find(text) {
            Some(close) if close.end() == text.len() && close.start() >= open.end() => {
                &text[open.end()..close.start()]
            }
            _ => text,
        }
    }
}

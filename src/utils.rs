//! # Utilities Module
//!
//! ## Purpose
//! Common utility functions and helpers used throughout the citation network
//! engine for text handling and performance monitoring.
//!
//! ## Input/Output Specification
//! - **Input**: Various data types requiring common operations
//! - **Output**: Processed text, performance timings
//! - **Functions**: Text utilities, performance helpers

use std::time::Instant;

/// Performance timer for measuring operation duration
pub struct Timer {
    start: Instant,
    name: String,
}

/// Text processing utilities
pub struct TextUtils;

impl Timer {
    /// Start a new timer with a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Stop timer and log duration
    pub fn stop(self) -> u64 {
        let elapsed = self.elapsed_ms();
        tracing::debug!("Timer '{}' completed in {}ms", self.name, elapsed);
        elapsed
    }
}

impl TextUtils {
    /// Truncate text to specified length with ellipsis
    pub fn truncate(text: &str, max_length: usize) -> String {
        if text.chars().count() <= max_length {
            text.to_string()
        } else {
            let cut: String = text.chars().take(max_length.saturating_sub(3)).collect();
            format!("{}...", cut)
        }
    }

    /// Slice a window of `window` characters on each side of the byte range
    /// `start..end`, clipped to the text bounds.
    ///
    /// Returns `None` if the range is invalid or not on character boundaries.
    pub fn char_window(text: &str, start: usize, end: usize, window: usize) -> Option<&str> {
        if start > end
            || end > text.len()
            || !text.is_char_boundary(start)
            || !text.is_char_boundary(end)
        {
            return None;
        }

        let from = if window == 0 {
            start
        } else {
            text[..start]
                .char_indices()
                .rev()
                .nth(window - 1)
                .map(|(i, _)| i)
                .unwrap_or(0)
        };

        let to = text[end..]
            .char_indices()
            .nth(window)
            .map(|(i, _)| end + i)
            .unwrap_or(text.len());

        Some(&text[from..to])
    }

    /// Count words in text
    pub fn word_count(text: &str) -> usize {
        text.split_whitespace().count()
    }
}

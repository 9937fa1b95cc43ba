use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use coast_core::ScrollSurface;

/// A text file opened in its own view
#[derive(Debug, Clone)]
pub struct Document {
    pub title: String,
    pub path: Option<PathBuf>,
    pub lines: Vec<String>,
}

impl Document {
    pub fn open(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let title = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            title,
            path: Some(path.to_path_buf()),
            lines: split_lines(&content),
        })
    }

    pub fn from_text(title: impl Into<String>, text: &str) -> Self {
        Self {
            title: title.into(),
            path: None,
            lines: split_lines(text),
        }
    }

    #[inline]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

fn split_lines(text: &str) -> Vec<String> {
    // Tabs would otherwise render with terminal-dependent width
    text.lines().map(|l| l.replace('\t', "    ")).collect()
}

/// Line offset of a document view, clamped to the scrollable range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineSurface {
    offset: i64,
    max_offset: i64,
}

impl LineSurface {
    pub fn new(line_count: usize, viewport_height: u16) -> Self {
        let mut surface = Self::default();
        surface.resize(line_count, viewport_height);
        surface
    }

    /// Recompute the bottom limit after the content or the viewport changed
    pub fn resize(&mut self, line_count: usize, viewport_height: u16) {
        self.max_offset = (line_count as i64 - viewport_height as i64).max(0);
        self.offset = self.offset.min(self.max_offset);
    }

    #[inline]
    pub fn max_offset(&self) -> i64 {
        self.max_offset
    }

    /// True when the view cannot move further in the direction of `delta`
    pub fn at_edge(&self, delta: f64) -> bool {
        (delta < 0.0 && self.offset == 0) || (delta > 0.0 && self.offset >= self.max_offset)
    }
}

impl ScrollSurface for LineSurface {
    #[inline]
    fn offset(&self) -> i64 {
        self.offset
    }

    #[inline]
    fn set_offset(&mut self, offset: i64) {
        self.offset = offset.clamp(0, self.max_offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_clamps_to_content() {
        let mut surface = LineSurface::new(100, 30);
        assert_eq!(surface.max_offset(), 70);

        surface.set_offset(500);
        assert_eq!(surface.offset(), 70);
        assert!(surface.at_edge(1.0));
        assert!(!surface.at_edge(-1.0));

        surface.resize(100, 90);
        assert_eq!(surface.offset(), 10);
    }

    #[test]
    fn test_short_document_cannot_scroll() {
        let mut surface = LineSurface::new(5, 30);
        surface.set_offset(3);
        assert_eq!(surface.offset(), 0);
    }

    #[test]
    fn test_from_text_expands_tabs() {
        let doc = Document::from_text("t", "a\tb\nc");
        assert_eq!(doc.line_count(), 2);
        assert_eq!(doc.lines[0], "a    b");
    }
}

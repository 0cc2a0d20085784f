//! Input manager: turns a resume path into a lazy sequence of lines

use crate::error::{Result, RankerError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    open_error, MarkdownExtractor, PdfExtractor, TextExtractor, MAX_TEXT_BYTES,
};
use log::debug;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader, Split, Take};

/// Lines of one resume, consumed once.
///
/// Plain text is streamed from disk; formats that need a full parse
/// (PDF, Markdown) are converted up front and then yielded line by line.
pub struct ResumeLines {
    source: LineSource,
    path: Option<PathBuf>,
}

enum LineSource {
    Streaming(Split<BufReader<Take<File>>>),
    Buffered(std::vec::IntoIter<String>),
}

impl ResumeLines {
    /// Lines of an in-memory document
    pub fn from_text(text: &str) -> Self {
        let lines: Vec<String> = text.lines().map(str::to_string).collect();
        Self {
            source: LineSource::Buffered(lines.into_iter()),
            path: None,
        }
    }

    fn streaming(file: File, path: &Path) -> Self {
        let reader = BufReader::new(file.take(MAX_TEXT_BYTES));
        Self {
            source: LineSource::Streaming(reader.split(b'\n')),
            path: Some(path.to_path_buf()),
        }
    }

    /// Next line without its terminator, `None` once exhausted
    pub async fn next_line(&mut self) -> Result<Option<String>> {
        match &mut self.source {
            LineSource::Buffered(lines) => Ok(lines.next()),
            LineSource::Streaming(segments) => {
                let segment = segments.next_segment().await.map_err(|e| match &self.path {
                    Some(path) => open_error(path, e),
                    None => RankerError::Extraction(e.to_string()),
                })?;
                Ok(segment.map(|mut bytes| {
                    if bytes.last() == Some(&b'\r') {
                        bytes.pop();
                    }
                    String::from_utf8_lossy(&bytes).into_owned()
                }))
            }
        }
    }

    /// Drain the remaining lines
    pub async fn collect(mut self) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        while let Some(line) = self.next_line().await? {
            lines.push(line);
        }
        Ok(lines)
    }
}

#[derive(Debug, Default, Clone)]
pub struct InputManager;

impl InputManager {
    pub fn new() -> Self {
        Self
    }

    /// Open a resume for line-by-line reading
    pub async fn open_lines(&self, path: &Path) -> Result<ResumeLines> {
        match FileType::from_path(path) {
            FileType::Text => {
                debug!("Streaming plain text resume: {}", path.display());
                let file = File::open(path).await.map_err(|e| open_error(path, e))?;
                Ok(ResumeLines::streaming(file, path))
            }
            FileType::Markdown => {
                debug!("Converting markdown resume: {}", path.display());
                let text = MarkdownExtractor.extract(path).await?;
                Ok(ResumeLines::from_text(&text).with_path(path))
            }
            FileType::Pdf => {
                debug!("Extracting text from PDF resume: {}", path.display());
                let text = PdfExtractor.extract(path).await?;
                Ok(ResumeLines::from_text(&text).with_path(path))
            }
            FileType::Unknown => Err(RankerError::UnsupportedFormat(format!(
                "Unsupported file type for: {}",
                path.display()
            ))),
        }
    }

    /// Whole document as text, used by the analysis commands
    pub async fn extract_text(&self, path: &Path) -> Result<String> {
        Ok(self.open_lines(path).await?.collect().await?.join("\n"))
    }
}

impl ResumeLines {
    fn with_path(mut self, path: &Path) -> Self {
        self.path = Some(path.to_path_buf());
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

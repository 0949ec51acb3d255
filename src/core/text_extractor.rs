// src/core/text_extractor.rs
//! PDF to plain text

use std::path::{Path, PathBuf};

use crate::app_log;
use crate::error::{CoachError, Result};

/// Extract and clean the text of a PDF held in memory.
///
/// Runs on a blocking thread; a panic inside the PDF library surfaces as an
/// extraction error instead of tearing down the caller.
pub async fn extract_text(bytes: Vec<u8>) -> Result<String> {
    let size = bytes.len();
    app_log!(info, "Starting PDF text extraction ({} bytes)", size);

    let raw = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| CoachError::Extraction(format!("PDF parser crashed: {}", e)))?
        .map_err(|e| {
            let message = e.to_string();
            if message.to_lowercase().contains("encrypt") {
                CoachError::Extraction(
                    "PDF is password-protected and cannot be decrypted".to_string(),
                )
            } else {
                CoachError::Extraction(format!("Failed to parse PDF: {}", message))
            }
        })?;

    let text = clean_text(&raw);
    if text.is_empty() {
        return Err(CoachError::Extraction(
            "Could not extract text from PDF. Make sure it's not an image-only PDF.".to_string(),
        ));
    }

    app_log!(info, "Extracted {} characters from PDF", text.chars().count());
    Ok(text)
}

pub async fn extract_text_from_file(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| CoachError::Extraction(format!("Failed to read {}: {}", path.display(), e)))?;
    extract_text(bytes).await
}

/// Normalise line endings, cap blank lines at one, and collapse runs of
/// spaces and tabs into a single space.
pub fn clean_text(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut cleaned = String::with_capacity(normalized.len());
    let mut newlines = 0usize;
    let mut in_blank_run = false;

    for c in normalized.chars() {
        match c {
            '\n' => {
                in_blank_run = false;
                newlines += 1;
                if newlines <= 2 {
                    cleaned.push('\n');
                }
            }
            ' ' | '\t' => {
                newlines = 0;
                if !in_blank_run {
                    cleaned.push(c);
                    in_blank_run = true;
                } else if cleaned.ends_with('\t') {
                    cleaned.pop();
                    cleaned.push(' ');
                } else if !cleaned.ends_with(' ') {
                    cleaned.push(' ');
                }
            }
            _ => {
                newlines = 0;
                in_blank_run = false;
                cleaned.push(c);
            }
        }
    }

    cleaned.trim().to_string()
}

/// First `*.pdf` in `folder`, alphabetically.
pub async fn find_cv_pdf(folder: &Path) -> Result<PathBuf> {
    let mut entries = tokio::fs::read_dir(folder).await.map_err(|e| {
        CoachError::Extraction(format!("CV folder {} is not readable: {}", folder.display(), e))
    })?;

    let mut pdfs = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| CoachError::Extraction(format!("Failed to read directory entry: {}", e)))?
    {
        let path = entry.path();
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            pdfs.push(path);
        }
    }

    pdfs.sort();
    pdfs.into_iter().next().ok_or_else(|| {
        CoachError::Extraction(format!("No PDF file found in {}", folder.display()))
    })
}

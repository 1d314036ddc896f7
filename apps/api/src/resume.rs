//! Resume Loader: reads the resume PDF once at startup and flattens it into
//! one text blob used as persona context.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

/// Extracts the resume text, page by page, on the blocking pool.
///
/// Any failure here is fatal: the service never starts without its context.
pub async fn load_resume_text(path: impl AsRef<Path>) -> Result<String> {
    let path: PathBuf = path.as_ref().to_path_buf();
    let shown = path.display().to_string();

    let pages = tokio::task::spawn_blocking(move || extract_pages(&path))
        .await
        .with_context(|| format!("PDF extraction panicked for '{shown}'"))??;

    let text = join_page_texts(&pages);
    if text.trim().is_empty() {
        anyhow::bail!("Resume '{shown}' contains no extractable text");
    }

    info!(
        "Loaded resume '{}': {} pages, {} kept, {} chars",
        shown,
        pages.len(),
        pages.iter().filter(|p| has_text(p)).count(),
        text.len()
    );
    Ok(text)
}

fn extract_pages(path: &Path) -> Result<Vec<String>> {
    if !path.is_file() {
        anyhow::bail!("Resume document '{}' not found", path.display());
    }
    pdf_extract::extract_text_by_pages(path)
        .with_context(|| format!("Failed to extract text from '{}'", path.display()))
}

fn has_text(page: &str) -> bool {
    !page.trim().is_empty()
}

/// Concatenates page texts in page order, each followed by a newline,
/// skipping pages that yielded no text.
pub fn join_page_texts<S: AsRef<str>>(pages: &[S]) -> String {
    pages
        .iter()
        .map(AsRef::as_ref)
        .filter(|page| has_text(page))
        .fold(String::new(), |mut acc, page| {
            acc.push_str(page);
            acc.push('\n');
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_join_skips_empty_middle_page() {
        let pages = ["page one text", "", "page three text"];
        assert_eq!(join_page_texts(&pages), "page one text\npage three text\n");
    }

    #[test]
    fn test_join_treats_whitespace_only_page_as_empty() {
        let pages = ["a", "  \n\t ", "b"];
        assert_eq!(join_page_texts(&pages), "a\nb\n");
    }

    #[test]
    fn test_join_keeps_page_order_and_inner_text() {
        let pages = vec!["Experience\n- Acme".to_string(), "Education\n- WPI".to_string()];
        assert_eq!(
            join_page_texts(&pages),
            "Experience\n- Acme\nEducation\n- WPI\n"
        );
    }

    #[test]
    fn test_join_no_pages_is_empty() {
        let pages: [&str; 0] = [];
        assert_eq!(join_page_texts(&pages), "");
    }

    const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/resume.pdf");

    #[test]
    fn test_extract_pages_reads_every_page() {
        let pages = extract_pages(Path::new(FIXTURE)).unwrap();
        assert_eq!(pages.len(), 3);
        assert!(pages[0].contains("Lovelace"));
        assert!(!has_text(&pages[1]));
        assert!(pages[2].contains("mathematics"));
    }

    #[tokio::test]
    async fn test_load_resume_joins_pages_with_text() {
        let text = load_resume_text(FIXTURE).await.unwrap();
        let first = text.find("Babbage").expect("first page text");
        let last = text.find("mathematics").expect("last page text");
        assert!(first < last);
        assert!(text.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_missing_document_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_resume_text(dir.path().join("absent.pdf"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_unreadable_document_fails_fast() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"this is not a pdf").unwrap();
        assert!(load_resume_text(file.path()).await.is_err());
    }
}

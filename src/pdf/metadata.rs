//! PDF metadata extraction

use std::path::Path;

use lopdf::{Dictionary, Document, Object};

use crate::error::{Error, Result};

/// Count pages by reading the Count field from the catalog's Pages dictionary.
/// More reliable than walking `get_pages()` for documents with nested page
/// trees.
fn count_pages_from_catalog(doc: &Document) -> Result<usize> {
    let pages_id = doc.catalog()?.get(b"Pages")?.as_reference()?;
    let count = doc.get_dictionary(pages_id)?.get(b"Count")?.as_i64()?;
    Ok(count.max(0) as usize)
}

/// PDF metadata
#[derive(Debug, Clone)]
pub struct PdfMetadata {
    /// Number of pages in the PDF
    pub page_count: usize,
    /// Document title (if present)
    pub title: Option<String>,
    /// Document author (if present)
    pub author: Option<String>,
}

fn info_string(info: &Dictionary, key: &[u8]) -> Option<String> {
    let bytes = info.get(key).ok()?.as_str().ok()?;
    String::from_utf8(bytes.to_vec()).ok()
}

/// Extract metadata from a PDF file
pub fn extract_metadata(path: &Path) -> Result<PdfMetadata> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;
    let page_count = count_pages_from_catalog(&doc)?;
    if page_count == 0 {
        return Err(Error::EmptyPdf(path.to_path_buf()));
    }

    let mut title = None;
    let mut author = None;

    if let Ok(Object::Reference(info_id)) = doc.trailer.get(b"Info") {
        if let Ok(info) = doc.get_dictionary(*info_id) {
            title = info_string(info, b"Title");
            author = info_string(info, b"Author");
        }
    }

    Ok(PdfMetadata {
        page_count,
        title,
        author,
    })
}

/// Count the number of pages in a PDF file
///
/// This is a quick operation that reads the Count field from the Pages
/// dictionary.
pub fn count_pages(path: &Path) -> Result<usize> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;
    let page_count = count_pages_from_catalog(&doc)?;
    if page_count == 0 {
        return Err(Error::EmptyPdf(path.to_path_buf()));
    }

    Ok(page_count)
}

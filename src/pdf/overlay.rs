//! Page compositing: overlay one PDF's pages onto another's using lopdf

use std::path::PathBuf;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::error::{Error, Result};

/// Options for overlaying one PDF onto another
#[derive(Debug, Clone)]
pub struct OverlayOptions {
    /// The document whose pages receive the overlay content
    pub base_path: PathBuf,
    /// The document whose pages are composited onto the base
    pub overlay_path: PathBuf,
    /// Output PDF file path
    pub output_path: PathBuf,
}

/// What an overlay run actually did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlaySummary {
    /// Number of page pairs that were composited
    pub pages_merged: usize,
    /// Page count of the base document
    pub base_pages: usize,
    /// Page count of the overlay document
    pub overlay_pages: usize,
}

/// Content references and resources lifted from one overlay page
struct PageImport {
    content_refs: Vec<Object>,
    resources: Dictionary,
}

/// Composite each page of the overlay document onto the corresponding page of
/// the base document and write the result to a new file.
///
/// Pages are paired in order. If the two documents have different page counts,
/// only the first `min(base, overlay)` pairs are composited and the rest are
/// left as-is; a document with no pages at all is an error.
///
/// The base page's content is wrapped in `q`/`Q` before the overlay content is
/// appended, so transformations left open by the base content cannot displace
/// the overlay. Resource dictionaries are merged per category, with overlay
/// entries winning on name collision.
///
/// # Example
///
/// ```no_run
/// use pdf_overlay::pdf::{OverlayOptions, overlay_pdfs};
/// use std::path::PathBuf;
///
/// let options = OverlayOptions {
///     base_path: PathBuf::from("resume.pdf"),
///     overlay_path: PathBuf::from("stamp.pdf"),
///     output_path: PathBuf::from("stamped.pdf"),
/// };
///
/// let summary = overlay_pdfs(&options).expect("Failed to overlay");
/// assert!(summary.pages_merged <= summary.base_pages);
/// ```
pub fn overlay_pdfs(options: &OverlayOptions) -> Result<OverlaySummary> {
    for path in [&options.base_path, &options.overlay_path] {
        if !path.exists() {
            return Err(Error::FileNotFound(path.clone()));
        }
    }

    let mut base_doc = Document::load(&options.base_path)?;
    let mut overlay_doc = Document::load(&options.overlay_path)?;

    let base_pages = base_doc.get_pages();
    if base_pages.is_empty() {
        return Err(Error::EmptyPdf(options.base_path.clone()));
    }
    if overlay_doc.get_pages().is_empty() {
        return Err(Error::EmptyPdf(options.overlay_path.clone()));
    }

    // Shift the overlay document's object IDs past the base document's so the
    // two object spaces cannot collide once imported.
    overlay_doc.renumber_objects_with(base_doc.max_id + 1);
    let overlay_pages = overlay_doc.get_pages();

    // Lift each overlay page's content references and resolved resources
    // before its objects are moved into the base document.
    let mut imports: Vec<PageImport> = Vec::with_capacity(overlay_pages.len());
    for (_, overlay_page_id) in &overlay_pages {
        imports.push(lift_page(&overlay_doc, *overlay_page_id)?);
    }

    let summary = OverlaySummary {
        pages_merged: base_pages.len().min(overlay_pages.len()),
        base_pages: base_pages.len(),
        overlay_pages: overlay_pages.len(),
    };

    base_doc.objects.extend(std::mem::take(&mut overlay_doc.objects));
    base_doc.max_id = overlay_doc.max_id;

    // Tiny shared streams used to bracket every base page's content.
    let save_state_id = base_doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let restore_state_id = base_doc.add_object(Stream::new(Dictionary::new(), b"Q\n".to_vec()));

    for ((_, base_page_id), import) in base_pages.iter().zip(imports) {
        composite_page(
            &mut base_doc,
            *base_page_id,
            import,
            save_state_id,
            restore_state_id,
        )?;
    }

    // The overlay's own catalog and page tree came along with its objects but
    // are no longer referenced from the base document's root.
    base_doc.prune_objects();
    base_doc.compress();
    base_doc.save(&options.output_path)?;

    Ok(summary)
}

/// Extract a page's content stream references and its resources dictionary,
/// resolving an indirect `Resources` reference to the dictionary it names.
fn lift_page(doc: &Document, page_id: ObjectId) -> Result<PageImport> {
    let page_dict = doc.get_dictionary(page_id)?;

    let content_refs = match page_dict.get(b"Contents") {
        Ok(Object::Reference(id)) => vec![Object::Reference(*id)],
        Ok(Object::Array(arr)) => arr.clone(),
        _ => Vec::new(),
    };

    let resources = resolve_resources(doc, page_dict)?;

    Ok(PageImport {
        content_refs,
        resources,
    })
}

/// Upper bound on `Parent` hops when resolving inherited page attributes,
/// so a malformed cyclic page tree cannot hang us
const MAX_TREE_DEPTH: usize = 32;

/// A page's `Resources` may be inline, an indirect reference, or inherited
/// from an ancestor `Pages` node; either way we want a concrete dictionary to
/// merge. Pages with no resources anywhere get an empty one.
fn resolve_resources(doc: &Document, page_dict: &Dictionary) -> Result<Dictionary> {
    let mut dict = page_dict;
    for _ in 0..MAX_TREE_DEPTH {
        match dict.get(b"Resources") {
            Ok(Object::Dictionary(resources)) => return Ok(resources.clone()),
            Ok(Object::Reference(id)) => return Ok(doc.get_dictionary(*id)?.clone()),
            _ => {}
        }
        match dict.get(b"Parent") {
            Ok(Object::Reference(parent_id)) => dict = doc.get_dictionary(*parent_id)?,
            _ => break,
        }
    }
    Ok(Dictionary::new())
}

/// Append one imported overlay page onto a base page: content first, then the
/// merged resources dictionary.
fn composite_page(
    doc: &mut Document,
    page_id: ObjectId,
    import: PageImport,
    save_state_id: ObjectId,
    restore_state_id: ObjectId,
) -> Result<()> {
    // Read phase: normalize the base page's content list and resolve its
    // resources while the document is still immutably borrowed.
    let (base_content, merged_resources) = {
        let page_dict = doc.get_dictionary(page_id)?;

        let base_content = match page_dict.get(b"Contents") {
            Ok(Object::Reference(id)) => vec![Object::Reference(*id)],
            Ok(Object::Array(arr)) => arr.clone(),
            _ => Vec::new(),
        };

        let mut merged = resolve_resources(doc, page_dict)?;
        merge_resources(&mut merged, &import.resources);

        (base_content, merged)
    };

    let contents = if base_content.is_empty() {
        // Nothing to isolate from; the overlay content stands alone.
        import.content_refs
    } else {
        let mut contents = Vec::with_capacity(base_content.len() + import.content_refs.len() + 2);
        contents.push(Object::Reference(save_state_id));
        contents.extend(base_content);
        contents.push(Object::Reference(restore_state_id));
        contents.extend(import.content_refs);
        contents
    };

    // Write phase. The merged resources are set inline on the page so that
    // sibling pages sharing the original indirect dictionary are unaffected.
    let page_dict = doc.get_object_mut(page_id)?.as_dict_mut()?;
    page_dict.set("Contents", Object::Array(contents));
    page_dict.set("Resources", Object::Dictionary(merged_resources));

    Ok(())
}

/// Merge overlay resources into the base page's resources, one resource
/// category (`Font`, `XObject`, `ExtGState`, ...) at a time. Within a
/// category the overlay's entries win on name collision.
fn merge_resources(base: &mut Dictionary, overlay: &Dictionary) {
    for (category, value) in overlay.iter() {
        match (base.get_mut(category), value) {
            (Ok(Object::Dictionary(base_sub)), Object::Dictionary(overlay_sub)) => {
                for (name, entry) in overlay_sub.iter() {
                    base_sub.set(name.clone(), entry.clone());
                }
            }
            _ => {
                // Category absent from the base, or not a dictionary on both
                // sides (e.g. a ProcSet array): the overlay's value stands.
                base.set(category.clone(), value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;
    use std::path::Path;

    #[test]
    fn test_overlay_options_creation() {
        let options = OverlayOptions {
            base_path: PathBuf::from("base.pdf"),
            overlay_path: PathBuf::from("overlay.pdf"),
            output_path: PathBuf::from("out.pdf"),
        };

        assert_eq!(options.base_path, Path::new("base.pdf"));
        assert_eq!(options.output_path, Path::new("out.pdf"));
    }

    #[test]
    fn test_overlay_nonexistent_base() {
        let result = overlay_pdfs(&OverlayOptions {
            base_path: PathBuf::from("no-such-base.pdf"),
            overlay_path: PathBuf::from("no-such-overlay.pdf"),
            output_path: PathBuf::from("out.pdf"),
        });

        assert!(matches!(result, Err(Error::FileNotFound(p)) if p == Path::new("no-such-base.pdf")));
    }

    #[test]
    fn test_merge_resources_disjoint_categories() {
        let mut base = dictionary! {
            "Font" => dictionary! { "F1" => Object::Reference((1, 0)) },
        };
        let overlay = dictionary! {
            "XObject" => dictionary! { "Im1" => Object::Reference((2, 0)) },
        };

        merge_resources(&mut base, &overlay);

        assert!(base.has(b"Font"));
        assert!(base.has(b"XObject"));
    }

    #[test]
    fn test_merge_resources_overlay_wins_on_collision() {
        let mut base = dictionary! {
            "Font" => dictionary! { "F1" => Object::Reference((1, 0)) },
        };
        let overlay = dictionary! {
            "Font" => dictionary! {
                "F1" => Object::Reference((9, 0)),
                "F2" => Object::Reference((10, 0)),
            },
        };

        merge_resources(&mut base, &overlay);

        let fonts = base.get(b"Font").unwrap().as_dict().unwrap();
        assert_eq!(fonts.get(b"F1").unwrap(), &Object::Reference((9, 0)));
        assert_eq!(fonts.get(b"F2").unwrap(), &Object::Reference((10, 0)));
    }

    // Overlay runs against real documents live in tests/integration.rs
}

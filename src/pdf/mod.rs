//! PDF manipulation module

pub mod form;
pub mod metadata;
pub mod overlay;

// Re-export commonly used items
pub use form::{create_form_pdf, FieldKind, FormField, FormOptions};
pub use metadata::{count_pages, extract_metadata, PdfMetadata};
pub use overlay::{overlay_pdfs, OverlayOptions, OverlaySummary};

//! Form-field PDF generation using lopdf
//!
//! Builds a single-page document whose catalog carries an AcroForm dictionary,
//! with each field attached to the page as a widget annotation. Appearance
//! streams are left to the viewer via `/NeedAppearances`.

use std::collections::HashSet;
use std::path::Path;

use lopdf::{dictionary, Dictionary, Document, Object, Stream};

use crate::error::{Error, Result};
use crate::layout::PageDimensions;

/// Distance from the top edge to the title baseline, in points
const TITLE_OFFSET: i64 = 42;
/// Distance from the top edge to the top of the first field
const FIELD_START_OFFSET: i64 = 92;
/// Vertical distance between consecutive field tops
const FIELD_PITCH: i64 = 30;
/// Left margin shared by the title and all fields
const LEFT_MARGIN: i64 = 100;
const TITLE_FONT_SIZE: i64 = 16;

/// The kinds of interactive field this generator knows how to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line text entry, 300×20pt
    Text,
    /// On/off checkbox, 20×20pt
    Checkbox,
}

impl FieldKind {
    fn extent(self) -> (i64, i64) {
        match self {
            FieldKind::Text => (300, 20),
            FieldKind::Checkbox => (20, 20),
        }
    }
}

/// One interactive field to place on the generated page
#[derive(Debug, Clone)]
pub struct FormField {
    /// Fully-qualified field name (must be unique within the form)
    pub name: String,
    /// Hover text shown by viewers
    pub tooltip: Option<String>,
    pub kind: FieldKind,
}

impl FormField {
    /// A text field with a tooltip
    pub fn text(name: impl Into<String>, tooltip: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tooltip: Some(tooltip.into()),
            kind: FieldKind::Text,
        }
    }

    /// A checkbox with a tooltip
    pub fn checkbox(name: impl Into<String>, tooltip: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tooltip: Some(tooltip.into()),
            kind: FieldKind::Checkbox,
        }
    }
}

/// Options for generating a form PDF
#[derive(Debug, Clone)]
pub struct FormOptions {
    /// Heading drawn near the top of the page
    pub title: Option<String>,
    /// Fields, stacked top to bottom in order
    pub fields: Vec<FormField>,
    /// Page size for the generated document
    pub page: PageDimensions,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            title: None,
            fields: Vec::new(),
            page: PageDimensions::letter(),
        }
    }
}

/// Generate a one-page PDF containing the requested form fields
///
/// # Example
///
/// ```no_run
/// use pdf_overlay::pdf::{create_form_pdf, FormField, FormOptions};
/// use std::path::Path;
///
/// let options = FormOptions {
///     title: Some("Contact details".to_string()),
///     fields: vec![
///         FormField::text("name", "Enter your name"),
///         FormField::text("email", "Enter your email"),
///         FormField::checkbox("subscribe", "Subscribe to newsletter"),
///     ],
///     ..FormOptions::default()
/// };
///
/// create_form_pdf(Path::new("form.pdf"), &options).expect("Failed to generate form");
/// ```
pub fn create_form_pdf(output: &Path, options: &FormOptions) -> Result<()> {
    if options.title.is_none() && options.fields.is_empty() {
        return Err(Error::General(
            "Nothing to generate: no title and no fields".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for field in &options.fields {
        if !seen.insert(field.name.as_str()) {
            return Err(Error::DuplicateField(field.name.clone()));
        }
    }

    let (page_width, page_height) = options.page.media_box();

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let content = page_content(options, page_height);
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content));

    // Widget annotations double as the AcroForm field objects.
    let mut field_ids: Vec<Object> = Vec::with_capacity(options.fields.len());
    let mut y = page_height - FIELD_START_OFFSET;
    for field in &options.fields {
        let id = doc.add_object(widget_dictionary(field, y));
        field_ids.push(Object::Reference(id));
        y -= FIELD_PITCH;
    }

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        "MediaBox" => vec![0.into(), 0.into(), page_width.into(), page_height.into()],
        "Contents" => Object::Reference(content_id),
        "Resources" => dictionary! {
            "Font" => dictionary! { "Helv" => Object::Reference(font_id) },
        },
        "Annots" => field_ids.clone(),
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => 1,
            "Kids" => vec![Object::Reference(page_id)],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
        "AcroForm" => dictionary! {
            "Fields" => field_ids,
            "NeedAppearances" => true,
            "DA" => Object::string_literal("/Helv 0 Tf 0 g"),
            "DR" => dictionary! {
                "Font" => dictionary! { "Helv" => Object::Reference(font_id) },
            },
        },
    });

    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc.compress();
    doc.save(output)?;

    Ok(())
}

/// Content stream for the page: just the optional title text
fn page_content(options: &FormOptions, page_height: i64) -> Vec<u8> {
    let mut content = Vec::new();
    if let Some(title) = &options.title {
        content.extend_from_slice(
            format!(
                "BT /Helv {} Tf {} {} Td ({}) Tj ET\n",
                TITLE_FONT_SIZE,
                LEFT_MARGIN,
                page_height - TITLE_OFFSET,
                escape_literal(title),
            )
            .as_bytes(),
        );
    }
    content
}

/// Build the widget annotation for one field, with its top edge at `top`
fn widget_dictionary(field: &FormField, top: i64) -> Dictionary {
    let (width, height) = field.kind.extent();
    let mut dict = dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "T" => Object::string_literal(field.name.as_str()),
        "Rect" => vec![
            LEFT_MARGIN.into(),
            (top - height).into(),
            (LEFT_MARGIN + width).into(),
            top.into(),
        ],
        // Print flag, so the field survives into hard copies
        "F" => 4,
        "DA" => Object::string_literal("/Helv 0 Tf 0 g"),
        "MK" => dictionary! {
            "BC" => vec![0.into()],
            "BG" => vec![1.into()],
        },
    };

    if let Some(tooltip) = &field.tooltip {
        dict.set("TU", Object::string_literal(tooltip.as_str()));
    }

    match field.kind {
        FieldKind::Text => {
            dict.set("FT", "Tx");
            dict.set("V", Object::string_literal(""));
        }
        FieldKind::Checkbox => {
            dict.set("FT", "Btn");
            dict.set("V", "Off");
            dict.set("AS", "Off");
        }
    }

    dict
}

/// Escape a string for use inside a PDF literal `( ... )`
fn escape_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_literal() {
        assert_eq!(escape_literal("plain"), "plain");
        assert_eq!(escape_literal("a(b)c"), "a\\(b\\)c");
        assert_eq!(escape_literal("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_widget_rect_spans_field_extent() {
        let field = FormField::text("name", "Enter your name");
        let dict = widget_dictionary(&field, 700);

        let rect = dict.get(b"Rect").unwrap().as_array().unwrap();
        assert_eq!(rect[0], Object::Integer(LEFT_MARGIN));
        assert_eq!(rect[1], Object::Integer(680));
        assert_eq!(rect[2], Object::Integer(LEFT_MARGIN + 300));
        assert_eq!(rect[3], Object::Integer(700));
    }

    #[test]
    fn test_checkbox_starts_off() {
        let field = FormField::checkbox("subscribe", "Subscribe to newsletter");
        let dict = widget_dictionary(&field, 640);

        assert_eq!(dict.get(b"FT").unwrap(), &Object::Name(b"Btn".to_vec()));
        assert_eq!(dict.get(b"AS").unwrap(), &Object::Name(b"Off".to_vec()));
    }

    #[test]
    fn test_duplicate_field_names_rejected() {
        let options = FormOptions {
            fields: vec![
                FormField::text("name", "first"),
                FormField::text("name", "second"),
            ],
            ..FormOptions::default()
        };

        let result = create_form_pdf(Path::new("unused.pdf"), &options);
        assert!(matches!(result, Err(Error::DuplicateField(name)) if name == "name"));
    }

    #[test]
    fn test_empty_form_rejected() {
        let result = create_form_pdf(Path::new("unused.pdf"), &FormOptions::default());
        assert!(matches!(result, Err(Error::General(_))));
    }
}

//! PDF Overlay Library
//!
//! A cross-platform library for compositing the pages of one PDF onto another.
//! This library provides functionality to:
//! - Overlay each page of one PDF onto the corresponding page of a base PDF
//! - Generate a new PDF containing interactive form fields
//! - Extract metadata (page counts, title, author)
//!
//! # Example
//!
//! ```no_run
//! use pdf_overlay::pdf::{OverlayOptions, overlay_pdfs};
//! use std::path::PathBuf;
//!
//! let options = OverlayOptions {
//!     base_path: PathBuf::from("resume.pdf"),
//!     overlay_path: PathBuf::from("stamp.pdf"),
//!     output_path: PathBuf::from("stamped.pdf"),
//! };
//!
//! overlay_pdfs(&options).expect("Failed to overlay PDFs");
//! ```

pub mod error;
pub mod layout;
pub mod pdf;

// Re-export commonly used items
pub use error::{Error, Result};

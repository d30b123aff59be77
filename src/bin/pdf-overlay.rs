//! PDF Overlay CLI tool
//!
//! A command-line tool for compositing one PDF onto another and generating
//! form-field PDFs.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use pdf_overlay::pdf::{
    create_form_pdf, extract_metadata, overlay_pdfs, FieldKind, FormField, FormOptions,
    OverlayOptions,
};

/// PDF Overlay - composite one PDF's pages onto another's
#[derive(Parser)]
#[command(name = "pdf-overlay")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Stamp each page of a resume with the matching overlay page
    pdf-overlay overlay resume.pdf stamp.pdf -o stamped.pdf

    # Overlay and open the result
    pdf-overlay overlay base.pdf overlay.pdf -o out.pdf --open

    # Generate a contact form
    pdf-overlay form -o form.pdf --title \"Contact details\" \\
        --text \"name=Enter your name\" --text \"email=Enter your email\" \\
        --checkbox \"subscribe=Subscribe to newsletter\"

    # Show page count and metadata
    pdf-overlay info document.pdf")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Composite each page of OVERLAY onto the corresponding page of BASE
    Overlay {
        /// Base PDF file (receives the overlay content)
        base: PathBuf,

        /// Overlay PDF file (composited on top)
        overlay: PathBuf,

        /// Output PDF file path
        #[arg(short, long)]
        output: PathBuf,

        /// Open the output file after creation
        #[arg(long)]
        open: bool,
    },

    /// Generate a single-page PDF with interactive form fields
    Form {
        /// Output PDF file path
        #[arg(short, long)]
        output: PathBuf,

        /// Heading drawn near the top of the page
        #[arg(long)]
        title: Option<String>,

        /// Add a text field. Format: NAME or "NAME=tooltip" (repeatable)
        #[arg(long = "text")]
        text_fields: Vec<String>,

        /// Add a checkbox. Format: NAME or "NAME=tooltip" (repeatable)
        #[arg(long = "checkbox")]
        checkboxes: Vec<String>,

        /// Open the output file after creation
        #[arg(long)]
        open: bool,
    },

    /// Show information about a PDF file
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Overlay {
            base,
            overlay,
            output,
            open,
        } => cmd_overlay(base, overlay, output, open),
        Commands::Form {
            output,
            title,
            text_fields,
            checkboxes,
            open,
        } => cmd_form(output, title, text_fields, checkboxes, open),
        Commands::Info { input } => cmd_info(input),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

/// Open a file with the system default application
fn open_file(path: &PathBuf) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(path).spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(path).spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", &path.display().to_string()])
            .spawn()?;
    }
    Ok(())
}

/// Composite the overlay document onto the base document
fn cmd_overlay(base: PathBuf, overlay: PathBuf, output: PathBuf, open: bool) -> Result<()> {
    eprintln!(
        "Overlaying {} onto {}...",
        overlay.display(),
        base.display()
    );

    let options = OverlayOptions {
        base_path: base,
        overlay_path: overlay,
        output_path: output.clone(),
    };

    let summary = overlay_pdfs(&options).context("overlay failed")?;

    if summary.base_pages != summary.overlay_pages {
        eprintln!(
            "Warning: page count mismatch (base has {}, overlay has {}); merged the first {} pages",
            summary.base_pages, summary.overlay_pages, summary.pages_merged
        );
    }

    eprintln!(
        "Merged {} pages to: {}",
        summary.pages_merged,
        output.display()
    );

    if open {
        open_file(&output)?;
    }

    Ok(())
}

/// Parse a repeatable field argument of the form `NAME` or `NAME=tooltip`.
/// A blank tooltip counts as no tooltip at all.
fn parse_field_spec(spec: &str) -> Result<(String, Option<String>)> {
    let (name, tooltip) = match spec.split_once('=') {
        Some((name, tooltip)) => {
            let tooltip = tooltip.trim();
            (
                name.trim(),
                (!tooltip.is_empty()).then(|| tooltip.to_string()),
            )
        }
        None => (spec.trim(), None),
    };
    if name.is_empty() {
        bail!("Empty field name in: {spec:?}");
    }
    Ok((name.to_string(), tooltip))
}

/// Generate a form-field PDF
fn cmd_form(
    output: PathBuf,
    title: Option<String>,
    text_fields: Vec<String>,
    checkboxes: Vec<String>,
    open: bool,
) -> Result<()> {
    let mut fields = Vec::new();

    for spec in &text_fields {
        let (name, tooltip) = parse_field_spec(spec)?;
        fields.push(FormField {
            name,
            tooltip,
            kind: FieldKind::Text,
        });
    }
    for spec in &checkboxes {
        let (name, tooltip) = parse_field_spec(spec)?;
        fields.push(FormField {
            name,
            tooltip,
            kind: FieldKind::Checkbox,
        });
    }

    let options = FormOptions {
        title,
        fields,
        ..FormOptions::default()
    };

    eprintln!("Generating form with {} fields...", options.fields.len());
    create_form_pdf(&output, &options).context("form generation failed")?;
    eprintln!("Output: {}", output.display());

    if open {
        open_file(&output)?;
    }

    Ok(())
}

/// Show information about a PDF
fn cmd_info(input: PathBuf) -> Result<()> {
    let metadata = extract_metadata(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    println!("File: {}", input.display());
    println!("Pages: {}", metadata.page_count);

    if let Some(title) = metadata.title {
        println!("Title: {title}");
    }
    if let Some(author) = metadata.author {
        println!("Author: {author}");
    }

    Ok(())
}

//! CLI output formatting for pass progress.
//!
//! # Output Format
//!
//! ```text
//! out is not a directory, creating…
//! Found 3 images
//!     001 a.jpg
//!     002 b.png
//!     003 c.jpeg
//! Reading /in/a.jpg
//!     Background: #ffffff
//! Written out/a.png
//! ...
//! Pass 1 completed successfully
//! ```
//!
//! The assemble pass ends with the strip dimensions:
//!
//! ```text
//! Written sheet.png (455x200, 3 images)
//! ```
//!
//! # Architecture
//!
//! Each piece of output has a `format_*` function (returns `Vec<String>`) for
//! testability and, where `main` needs one, a `print_*` wrapper that writes to
//! stdout. Format functions are pure — no I/O, no side effects.

use crate::passes::{PassEvent, PassSummary};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format a single pass progress event as display lines.
pub fn format_pass_event(event: &PassEvent) -> Vec<String> {
    match event {
        PassEvent::OutputCreated { path } => {
            vec![format!(
                "{} is not a directory, creating\u{2026}",
                path.display()
            )]
        }
        PassEvent::ImagesFound { names } => {
            let mut lines = vec![format!("Found {} images", names.len())];
            lines.extend(
                names
                    .iter()
                    .enumerate()
                    .map(|(i, name)| format!("{}{} {}", indent(1), format_index(i + 1), name)),
            );
            lines
        }
        PassEvent::ImageRead { path } => vec![format!("Reading {}", path.display())],
        PassEvent::BackgroundColor { hex } => vec![format!("{}Background: {}", indent(1), hex)],
        PassEvent::FloodFillSkipped { .. } => vec![format!(
            "{}Flood fill skipped: top left pixel is transparent",
            indent(1)
        )],
        PassEvent::ImageWritten { path } => vec![format!("Written {}", path.display())],
        PassEvent::CompositeWritten {
            path,
            width,
            height,
            image_count,
        } => vec![format!(
            "Written {} ({}x{}, {} images)",
            path.display(),
            width,
            height,
            image_count
        )],
    }
}

/// Format the closing line of a run.
pub fn format_summary(summary: &PassSummary) -> Vec<String> {
    vec![format!("Pass {} completed successfully", summary.pass)]
}

/// Print the closing line of a run to stdout.
pub fn print_summary(summary: &PassSummary) {
    for line in format_summary(summary) {
        println!("{}", line);
    }
}

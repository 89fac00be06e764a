//! Pass execution.
//!
//! A run performs exactly one pass over the images of the input folder:
//!
//! | Pass | Name | Output |
//! |---|---|---|
//! | 1 | Remove background | one PNG per image in the output directory |
//! | 2 | Trim | one PNG per image in the output directory |
//! | 3 | Assemble | a single PNG strip at the output path |
//!
//! ## Failure Semantics
//!
//! Pre-flight problems (bad folder, unwritable output, no images) are reported
//! before any image is decoded. Passes 1 and 2 are a sequential pipeline: the
//! first failing image stops the run, and images already written stay on
//! disk. Pass 3 decodes everything before drawing, so a bad image aborts it
//! before the output file is created.
//!
//! ## Parallel Decoding
//!
//! Pass 3 decodes its inputs in parallel with [rayon](https://docs.rs/rayon).
//! Layout and drawing then run strictly in file-name order.
//!
//! ## Progress
//!
//! Progress is reported as [`PassEvent`]s over an optional channel; formatting
//! lives in [`crate::output`].

use crate::config::{ConfigError, ToolConfig};
use crate::imaging::{
    AssembleError, BackendError, BackgroundRemoval, ImageBackend, Raster, RustBackend, assemble,
    remove_background, trim,
};
use crate::scan::{self, Inventory, ScanError};
use log::info;
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PassError {
    #[error("Pass {0} not supported")]
    UnsupportedPass(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Imaging(#[from] BackendError),
    #[error(transparent)]
    Assemble(#[from] AssembleError),
}

/// The operation a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Pass 1: flood-fill the corner color away.
    RemoveBackground,
    /// Pass 2: crop transparent edges.
    Trim,
    /// Pass 3: stitch everything into one strip.
    Assemble,
}

impl Pass {
    pub fn number(self) -> u8 {
        match self {
            Pass::RemoveBackground => 1,
            Pass::Trim => 2,
            Pass::Assemble => 3,
        }
    }
}

impl FromStr for Pass {
    type Err = PassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Pass::RemoveBackground),
            "2" => Ok(Pass::Trim),
            "3" => Ok(Pass::Assemble),
            other => Err(PassError::UnsupportedPass(other.to_string())),
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Progress events emitted while a pass runs.
#[derive(Debug, Clone, PartialEq)]
pub enum PassEvent {
    /// The output directory did not exist and was created.
    OutputCreated { path: PathBuf },
    /// Images that will be processed, in processing order.
    ImagesFound { names: Vec<String> },
    ImageRead { path: PathBuf },
    /// The corner color that pass 1 is about to remove.
    BackgroundColor { hex: String },
    /// Pass 1 left an image alone because its corner is already transparent.
    FloodFillSkipped { path: PathBuf },
    ImageWritten { path: PathBuf },
    CompositeWritten {
        path: PathBuf,
        width: u32,
        height: u32,
        image_count: usize,
    },
}

/// What a completed pass produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PassSummary {
    pub pass: Pass,
    pub outputs: Vec<PathBuf>,
}

fn emit(events: &Option<Sender<PassEvent>>, event: PassEvent) {
    if let Some(tx) = events {
        tx.send(event).ok();
    }
}

/// Run `pass` over the images in `folder` with the production backend.
pub fn run(
    pass: Pass,
    folder: &Path,
    output: &Path,
    config: &ToolConfig,
    events: Option<Sender<PassEvent>>,
) -> Result<PassSummary, PassError> {
    run_with_backend(&RustBackend::new(), pass, folder, output, config, events)
}

/// Run a pass using a specific backend (allows testing with mock).
pub fn run_with_backend<B: ImageBackend>(
    backend: &B,
    pass: Pass,
    folder: &Path,
    output: &Path,
    config: &ToolConfig,
    events: Option<Sender<PassEvent>>,
) -> Result<PassSummary, PassError> {
    let inventory = scan::scan(folder)?;
    info!(
        "pass {pass}: {} images in {}",
        inventory.images.len(),
        inventory.folder.display()
    );

    let outputs = match pass {
        Pass::RemoveBackground => {
            start_directory_pass(&inventory, output, &events)?;
            each_image(backend, &inventory, output, &events, |image, source| {
                match remove_background(backend, image, &config.background) {
                    BackgroundRemoval::Removed { image, color } => {
                        emit(&events, PassEvent::BackgroundColor { hex: color.to_hex() });
                        image
                    }
                    BackgroundRemoval::Skipped(image) => {
                        emit(
                            &events,
                            PassEvent::FloodFillSkipped {
                                path: source.to_path_buf(),
                            },
                        );
                        image
                    }
                }
            })?
        }
        Pass::Trim => {
            start_directory_pass(&inventory, output, &events)?;
            each_image(backend, &inventory, output, &events, |image, _| trim(backend, &image))?
        }
        Pass::Assemble => {
            let destination = scan::prepare_output_file(output)?;
            emit_images_found(&inventory, &events);
            vec![assemble_strip(
                backend,
                &inventory,
                &destination,
                config,
                &events,
            )?]
        }
    };

    Ok(PassSummary { pass, outputs })
}

fn emit_images_found(inventory: &Inventory, events: &Option<Sender<PassEvent>>) {
    emit(
        events,
        PassEvent::ImagesFound {
            names: inventory.file_names().iter().map(|s| s.to_string()).collect(),
        },
    );
}

/// Prepare the output directory of a per-image pass and announce the work.
fn start_directory_pass(
    inventory: &Inventory,
    output: &Path,
    events: &Option<Sender<PassEvent>>,
) -> Result<(), PassError> {
    if scan::prepare_output_dir(output)? {
        emit(
            events,
            PassEvent::OutputCreated {
                path: output.to_path_buf(),
            },
        );
    }
    emit_images_found(inventory, events);
    Ok(())
}

/// Decode, transform and write each image in order. Stops at the first error.
fn each_image<B, F>(
    backend: &B,
    inventory: &Inventory,
    output_dir: &Path,
    events: &Option<Sender<PassEvent>>,
    mut transform: F,
) -> Result<Vec<PathBuf>, PassError>
where
    B: ImageBackend,
    F: FnMut(B::Image, &Path) -> B::Image,
{
    let mut written = Vec::with_capacity(inventory.images.len());
    for source in &inventory.images {
        emit(
            events,
            PassEvent::ImageRead {
                path: source.path.clone(),
            },
        );
        let image = backend.decode(&source.path)?;
        let result = transform(image, &source.path);

        let out_path = output_dir.join(scan::output_file_name(&source.file_name));
        backend.encode(&result, &out_path)?;
        emit(
            events,
            PassEvent::ImageWritten {
                path: out_path.clone(),
            },
        );
        written.push(out_path);
    }
    Ok(written)
}

/// Decode every image, lay them out, and write the strip to `destination`.
fn assemble_strip<B: ImageBackend>(
    backend: &B,
    inventory: &Inventory,
    destination: &Path,
    config: &ToolConfig,
    events: &Option<Sender<PassEvent>>,
) -> Result<PathBuf, PassError> {
    for source in &inventory.images {
        emit(
            events,
            PassEvent::ImageRead {
                path: source.path.clone(),
            },
        );
    }
    let images = inventory
        .images
        .par_iter()
        .map(|source| backend.decode(&source.path))
        .collect::<Result<Vec<_>, _>>()?;

    let canvas = assemble(backend, &images, &config.assemble)?;
    backend.encode(&canvas, destination)?;
    emit(
        events,
        PassEvent::CompositeWritten {
            path: destination.to_path_buf(),
            width: canvas.width(),
            height: canvas.height(),
            image_count: images.len(),
        },
    );
    Ok(destination.to_path_buf())
}

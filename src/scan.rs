//! Input discovery and pre-flight validation.
//!
//! Everything that can be checked before a single pixel is decoded happens
//! here: the input folder must be a readable directory, the output location
//! must be (or become) writable, and the folder must hold at least one image.
//!
//! ## Image Discovery
//!
//! Only the top level of the input folder is listed. A file is an image when
//! its extension is `png`, `jpg` or `jpeg`, compared case-insensitively.
//! Images are sorted by file name (byte order), and that order is the
//! compositing order of the assemble pass:
//!
//! ```text
//! input/
//! ├── b.png        → 2nd
//! ├── a.jpg        → 1st
//! ├── c.JPEG       → 3rd
//! ├── config.toml  (ignored)
//! └── notes.txt    (ignored)
//! ```
//!
//! ## Output Naming
//!
//! Per-image passes write `<stem>.png` for JPEG inputs and keep the file name
//! of PNG inputs. The assemble pass writes to the given file path, with
//! `.png` appended when the path does not already end in `.png`.

use crate::imaging::supported_input_extensions;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0} is not a directory or you don't have permission to access it")]
    InvalidPath(PathBuf),
    #[error("{0} is not writable")]
    NotWritable(PathBuf),
    #[error("No PNG or JPEG images found in {0}")]
    NoImagesFound(PathBuf),
    #[error("Failed to read images in {path}: {source}")]
    Listing {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// An image discovered in the input folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    /// File name within the input folder, e.g. `a.jpg`.
    pub file_name: String,
    /// Full path to the file.
    pub path: PathBuf,
}

/// Result of scanning the input folder.
#[derive(Debug, Clone)]
pub struct Inventory {
    /// Canonical input folder.
    pub folder: PathBuf,
    /// Images sorted by file name.
    pub images: Vec<SourceImage>,
}

impl Inventory {
    pub fn file_names(&self) -> Vec<&str> {
        self.images.iter().map(|i| i.file_name.as_str()).collect()
    }
}

/// Whether a file name carries one of the accepted image extensions.
pub fn is_image_file(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            supported_input_extensions()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

/// Resolve the input folder to a canonical directory path.
pub fn resolve_folder(folder: &Path) -> Result<PathBuf, ScanError> {
    let canonical =
        fs::canonicalize(folder).map_err(|_| ScanError::InvalidPath(folder.to_path_buf()))?;
    if !canonical.is_dir() {
        return Err(ScanError::InvalidPath(canonical));
    }
    Ok(canonical)
}

/// List images directly inside `folder`, sorted by file name.
///
/// Fails with [`ScanError::NoImagesFound`] when there are none.
pub fn scan(folder: &Path) -> Result<Inventory, ScanError> {
    let folder = resolve_folder(folder)?;

    let mut images = Vec::new();
    for entry in WalkDir::new(&folder).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|source| ScanError::Listing {
            path: folder.clone(),
            source,
        })?;
        // Follows symlinks, so linked images count
        if !entry.path().is_file() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str() else {
            continue;
        };
        if is_image_file(file_name) {
            images.push(SourceImage {
                file_name: file_name.to_string(),
                path: entry.path().to_path_buf(),
            });
        }
    }

    if images.is_empty() {
        return Err(ScanError::NoImagesFound(folder));
    }
    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(Inventory { folder, images })
}

/// Create and drop a scratch file in `dir`, so ownership, ACLs and read-only
/// mounts are all taken into account.
fn ensure_writable(dir: &Path) -> Result<(), ScanError> {
    tempfile::NamedTempFile::new_in(dir)
        .map(drop)
        .map_err(|_| ScanError::NotWritable(dir.to_path_buf()))
}

/// Prepare the output directory for a per-image pass.
///
/// Creates it (with parents) when missing. Returns `true` if it was created.
pub fn prepare_output_dir(output: &Path) -> Result<bool, ScanError> {
    let created = if output.exists() {
        false
    } else {
        create_dir_all(output)?;
        true
    };
    if !output.is_dir() {
        return Err(ScanError::InvalidPath(output.to_path_buf()));
    }
    ensure_writable(output)?;
    Ok(created)
}

/// Prepare the destination of the assemble pass and return the final file path.
///
/// The parent directory is created when missing; `.png` is appended unless
/// the path already ends in `.png`.
pub fn prepare_output_file(output: &Path) -> Result<PathBuf, ScanError> {
    let path = composite_output_path(output);
    if path.is_dir() {
        return Err(ScanError::InvalidPath(path));
    }
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !parent.exists() {
        create_dir_all(&parent)?;
    }
    if !parent.is_dir() {
        return Err(ScanError::InvalidPath(parent));
    }
    ensure_writable(&parent)?;
    Ok(path)
}

fn create_dir_all(dir: &Path) -> Result<(), ScanError> {
    fs::create_dir_all(dir).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied | std::io::ErrorKind::ReadOnlyFilesystem => {
            ScanError::NotWritable(dir.to_path_buf())
        }
        _ => ScanError::Io(e),
    })
}

/// `out` → `out.png`, `out.jpg` → `out.jpg.png`, `out.PNG` unchanged.
pub fn composite_output_path(output: &Path) -> PathBuf {
    let is_png = output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"));
    if is_png {
        return output.to_path_buf();
    }
    let mut name = OsString::from(output.as_os_str());
    name.push(".png");
    PathBuf::from(name)
}

/// Output file name for a per-image pass: JPEG extensions become `.png`.
pub fn output_file_name(file_name: &str) -> String {
    let path = Path::new(file_name);
    let is_jpeg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"));
    if is_jpeg {
        path.with_extension("png").to_string_lossy().into_owned()
    } else {
        file_name.to_string()
    }
}

//! Finding image files to classify.

use std::path::{Path, PathBuf};

use log::warn;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// The upload formats the classifier accepts.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

pub fn is_supported_image(path: &Path) -> bool
{
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Expands the given paths into image files.
/// Files are taken as given, whatever their extension; directories are walked
/// recursively for supported images, sorted by path.
pub fn collect_images(paths: &[PathBuf]) -> Result<Vec<PathBuf>>
{
    let mut images = Vec::new();

    for path in paths {
        if path.is_file() {
            images.push(path.clone());
        } else if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        warn!("Skipping unreadable entry under {:?}: {}", path, e);
                        None
                    }
                })
                .filter(|entry| entry.file_type().is_file() && is_supported_image(entry.path()))
                .map(|entry| entry.into_path())
                .collect();
            found.sort();
            images.extend(found);
        } else {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()))));
        }
    }

    Ok(images)
}

/// The name shown for a file in results and history.
pub fn display_name(path: &Path) -> String
{
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

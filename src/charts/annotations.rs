//! Chart Annotations Module
//! Flag and logo artwork loaded from conventional paths.
//!
//! A missing file is tolerated: the annotation is skipped with a diagnostic,
//! which is the only guarded error path the chart pipeline has. A file that
//! exists but fails to decode is a real error and propagates.

use image::imageops::FilterType;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Logo file name, looked up next to the flags.
pub const EUROSTAT_LOGO: &str = "eurostat.png";

#[derive(Error, Debug)]
pub enum AnnotationError {
    #[error("Failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// `<dir>/<code>.png`, code lowercased.
pub fn flag_path(dir: &Path, code: &str) -> PathBuf {
    dir.join(format!("{}.png", code.to_lowercase()))
}

/// Load a country flag scaled to `height` pixels, aspect ratio preserved.
pub fn load_flag(dir: &Path, code: &str, height: u32) -> Result<Option<DynamicImage>, AnnotationError> {
    load_scaled(&flag_path(dir, code), height)
}

/// Load the Eurostat logo scaled to `height` pixels.
pub fn load_logo(dir: &Path, height: u32) -> Result<Option<DynamicImage>, AnnotationError> {
    load_scaled(&dir.join(EUROSTAT_LOGO), height)
}

fn load_scaled(path: &Path, height: u32) -> Result<Option<DynamicImage>, AnnotationError> {
    if !path.exists() {
        warn!(path = %path.display(), "annotation image not found, skipping");
        return Ok(None);
    }

    debug!(path = %path.display(), "loading annotation image");
    let img = image::open(path).map_err(|source| AnnotationError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    // Flags are wider than tall; cap the width at twice the target height so
    // the resize is bounded by height for normal aspect ratios.
    Ok(Some(img.resize(height * 2, height, FilterType::Lanczos3)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn flag_path_is_lowercased_png() {
        let path = flag_path(Path::new("flags"), "IS");
        assert_eq!(path, PathBuf::from("flags/is.png"));
    }

    #[test]
    fn missing_flag_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_flag(dir.path(), "zz", 20).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn missing_logo_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_logo(dir.path(), 30).unwrap().is_none());
    }

    #[test]
    fn present_flag_is_loaded_and_scaled() {
        let dir = tempfile::tempdir().unwrap();
        // 3:2 flag, like most real ones.
        let flag = RgbaImage::from_pixel(30, 20, Rgba([0, 0, 255, 255]));
        flag.save(flag_path(dir.path(), "fr")).unwrap();

        let loaded = load_flag(dir.path(), "FR", 10).unwrap().unwrap();
        assert_eq!(loaded.height(), 10);
        assert_eq!(loaded.width(), 15);
    }

    #[test]
    fn corrupt_flag_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(flag_path(dir.path(), "de"), b"not a png").unwrap();

        let err = load_flag(dir.path(), "de", 10);
        assert!(matches!(err, Err(AnnotationError::Decode { .. })));
    }
}

//! Directory browsing and per-file rotation.
//!
//! Opening one file makes its directory the gallery: sibling images sorted by
//! path, stepped through with wraparound. Rotation is remembered per file for
//! the lifetime of the process and applied to the pixels before upload, so the
//! quad scale follows the rotated dimensions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::DynamicImage;

/// Extensions the bundled decoders handle.
const EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff", "webp"];

/// Clockwise rotation in quarter turns.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Rotation {
    #[default]
    None,
    Cw90,
    Cw180,
    Cw270,
}

impl Rotation {
    pub fn cw(self) -> Self {
        match self {
            Rotation::None => Rotation::Cw90,
            Rotation::Cw90 => Rotation::Cw180,
            Rotation::Cw180 => Rotation::Cw270,
            Rotation::Cw270 => Rotation::None,
        }
    }

    pub fn ccw(self) -> Self {
        self.cw().cw().cw()
    }

    pub fn degrees(self) -> u32 {
        match self {
            Rotation::None => 0,
            Rotation::Cw90 => 90,
            Rotation::Cw180 => 180,
            Rotation::Cw270 => 270,
        }
    }

    pub fn apply(self, image: DynamicImage) -> DynamicImage {
        match self {
            Rotation::None => image,
            Rotation::Cw90 => image.rotate90(),
            Rotation::Cw180 => image.rotate180(),
            Rotation::Cw270 => image.rotate270(),
        }
    }
}

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| EXTENSIONS.iter().any(|known| e.eq_ignore_ascii_case(known)))
}

/// Decodes `path` and applies `rotation`.
pub fn load(path: &Path, rotation: Rotation) -> Result<DynamicImage> {
    let image = image::open(path).with_context(|| format!("failed to decode image {}", path.display()))?;
    Ok(rotation.apply(image))
}

#[derive(Debug, Default)]
pub struct Gallery {
    files: Vec<PathBuf>,
    current: usize,
    rotations: HashMap<PathBuf, Rotation>,
}

impl Gallery {
    /// Lists the supported siblings of `path`.
    ///
    /// `path` itself is always part of the gallery, even with an unknown
    /// extension, and starts as the current file.
    pub fn open(path: &Path) -> Result<Self> {
        // A bare file name lists the working directory; entries are then kept
        // as bare names so they compare equal to `path`.
        let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
        let dir = parent.unwrap_or(Path::new("."));

        let entries = std::fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))?;
        let siblings = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
            .map(|e| match parent {
                Some(p) => p.join(e.file_name()),
                None => PathBuf::from(e.file_name()),
            })
            .filter(|p| is_supported(p))
            .collect();

        Ok(Self::from_files(siblings, path))
    }

    /// Builds a gallery from an explicit listing.
    pub fn from_files(mut files: Vec<PathBuf>, current: &Path) -> Self {
        if !files.iter().any(|f| f == current) {
            files.push(current.to_path_buf());
        }
        files.sort();
        files.dedup();

        let current = files.iter().position(|f| f == current).unwrap_or(0);
        log::debug!("gallery of {} file(s), starting at #{}", files.len(), current + 1);

        Self {
            files,
            current,
            rotations: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// 1-based position of the current file.
    pub fn position(&self) -> usize {
        self.current + 1
    }

    pub fn current(&self) -> Option<&Path> {
        self.files.get(self.current).map(PathBuf::as_path)
    }

    pub fn next(&mut self) -> Option<&Path> {
        if self.files.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.files.len();
        self.current()
    }

    pub fn prev(&mut self) -> Option<&Path> {
        if self.files.is_empty() {
            return None;
        }
        self.current = (self.current + self.files.len() - 1) % self.files.len();
        self.current()
    }

    pub fn rotation(&self) -> Rotation {
        self.current()
            .and_then(|p| self.rotations.get(p).copied())
            .unwrap_or_default()
    }

    pub fn rotate_cw(&mut self) -> Rotation {
        self.update_rotation(Rotation::cw)
    }

    pub fn rotate_ccw(&mut self) -> Rotation {
        self.update_rotation(Rotation::ccw)
    }

    fn update_rotation(&mut self, step: fn(Rotation) -> Rotation) -> Rotation {
        let Some(path) = self.files.get(self.current).cloned() else {
            return Rotation::None;
        };
        let rotation = self.rotations.entry(path).or_default();
        *rotation = step(*rotation);
        *rotation
    }
}

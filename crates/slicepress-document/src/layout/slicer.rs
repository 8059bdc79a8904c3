// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Slicer — cut a tall source image into page-height bands, one temporary PNG
// per band, inside a directory owned by the run.

use std::path::{Path, PathBuf};

use slicepress_core::error::Result;
use slicepress_core::{ImageSize, ImageSlice, PageGeometry};
use tempfile::TempDir;
use tracing::{debug, info, instrument};

use crate::image::codec::ImageCodec;

/// Prefix of per-run slice directories.
const WORKDIR_PREFIX: &str = "slicepress-";

/// A planned band of source rows, before any pixels are copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub index: usize,
    pub offset: u32,
    pub height: u32,
}

/// Split `image_height` rows into bands of `band_height` rows, the last band
/// holding whatever remains.
///
/// The offset always advances by the full `band_height`; only the final band
/// is clamped so it never reaches past the bottom of the image.
pub fn plan_bands(image_height: u32, band_height: u32) -> Vec<Band> {
    let stride = band_height.max(1);
    let mut bands = Vec::with_capacity(image_height.div_ceil(stride) as usize);
    let mut offset = 0u32;
    while offset < image_height {
        let height = stride.min(image_height - offset);
        bands.push(Band {
            index: bands.len(),
            offset,
            height,
        });
        offset = offset.saturating_add(stride);
    }
    bands
}

/// Whether `image` is taller than one page's printable height.
pub fn needs_slicing(image: ImageSize, geometry: &PageGeometry) -> bool {
    image.height > geometry.band_height()
}

/// Where the slice files of a run live.
#[derive(Debug)]
enum SliceDir {
    /// Single-slice run: no files were written.
    None,
    /// Removed with everything left in it when the set is dropped.
    Owned(TempDir),
    /// Left on disk after the run.
    Kept(PathBuf),
}

/// The ordered slices of one run plus ownership of their directory.
#[derive(Debug)]
pub struct SliceSet {
    slices: Vec<ImageSlice>,
    dir: SliceDir,
}

impl SliceSet {
    /// The source image as its own and only slice.
    pub fn single(source: &Path, image: ImageSize) -> Self {
        Self {
            slices: vec![ImageSlice {
                index: 0,
                offset: 0,
                height: image.height,
                path: source.to_path_buf(),
                temporary: false,
            }],
            dir: SliceDir::None,
        }
    }

    pub fn slices(&self) -> &[ImageSlice] {
        &self.slices
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Directory holding the slice files, if any were written.
    pub fn workdir(&self) -> Option<&Path> {
        match &self.dir {
            SliceDir::None => None,
            SliceDir::Owned(dir) => Some(dir.path()),
            SliceDir::Kept(path) => Some(path),
        }
    }
}

/// Produces the [`SliceSet`] for one source image.
pub struct Slicer<'a, C: ImageCodec> {
    codec: &'a C,
    temp_base: Option<&'a Path>,
    keep_files: bool,
}

impl<'a, C: ImageCodec> Slicer<'a, C> {
    pub fn new(codec: &'a C) -> Self {
        Self {
            codec,
            temp_base: None,
            keep_files: false,
        }
    }

    /// Create run directories under `base` instead of the OS temp dir.
    pub fn temp_base(mut self, base: Option<&'a Path>) -> Self {
        self.temp_base = base;
        self
    }

    /// Leave the slice directory on disk when the set is dropped.
    pub fn keep_files(mut self, keep: bool) -> Self {
        self.keep_files = keep;
        self
    }

    /// Slice `source` if it is taller than one page, otherwise return it as
    /// the single slice without touching the filesystem.
    #[instrument(skip_all, fields(source = %source.display(), image = %image))]
    pub fn slice(&self, source: &Path, image: ImageSize, geometry: &PageGeometry) -> Result<SliceSet> {
        if !needs_slicing(image, geometry) {
            debug!("Image fits on one page");
            return Ok(SliceSet::single(source, image));
        }

        let decoded = self.codec.decode(source)?;
        let bands = plan_bands(image.height, geometry.band_height());
        let dir = self.create_workdir()?;
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "slice".to_string());

        let mut slices = Vec::with_capacity(bands.len());
        for band in &bands {
            let path = dir.path().join(format!("{stem}-{}.png", band.offset));
            let cropped = self
                .codec
                .crop(&decoded, 0, band.offset, image.width, band.height)?;
            self.codec.encode(&cropped, &path)?;
            debug!(index = band.index, offset = band.offset, height = band.height, "Slice written");

            slices.push(ImageSlice {
                index: band.index,
                offset: band.offset,
                height: band.height,
                path,
                temporary: true,
            });
        }

        info!(
            slices = slices.len(),
            band_height = geometry.band_height(),
            workdir = %dir.path().display(),
            "Image sliced"
        );

        let dir = if self.keep_files {
            SliceDir::Kept(dir.keep())
        } else {
            SliceDir::Owned(dir)
        };
        Ok(SliceSet { slices, dir })
    }

    fn create_workdir(&self) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORKDIR_PREFIX);
        let dir = match self.temp_base {
            Some(base) => {
                std::fs::create_dir_all(base)?;
                builder.tempdir_in(base)?
            }
            None => builder.tempdir()?,
        };
        Ok(dir)
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — open, crop and save raster images using the `image` crate.

use std::path::Path;

use image::DynamicImage;
use slicepress_core::error::SlicepressError;
use tracing::{debug, info, instrument};

/// A single decoded, in-memory image.
///
/// Cropping never mutates the receiver; each band is a fresh image, so one
/// decoded source can be cut into many slices.
///
/// ```ignore
/// let source = ImageProcessor::open("graph.png")?;
/// source.crop(0, 1131, source.width(), 1131)?.save("graph-1131.png")?;
/// ```
#[derive(Debug, Clone)]
pub struct ImageProcessor {
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SlicepressError> {
        let img = image::open(path.as_ref()).map_err(|err| {
            SlicepressError::Decode(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self { image: img })
    }

    /// Read only the image header and return (width, height).
    pub fn dimensions(path: impl AsRef<Path>) -> Result<(u32, u32), SlicepressError> {
        image::image_dimensions(path.as_ref()).map_err(|err| {
            SlicepressError::Decode(format!(
                "failed to read dimensions of {}: {}",
                path.as_ref().display(),
                err
            ))
        })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    // -- Transformations ------------------------------------------------------

    /// Copy a rectangular region into a new image.
    ///
    /// The rectangle must lie entirely inside the image; a region that would
    /// read past the bottom or right edge is an error rather than a padded
    /// result.
    #[instrument(skip(self))]
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Result<Self, SlicepressError> {
        let (img_w, img_h) = (self.image.width(), self.image.height());
        let fits = width > 0
            && height > 0
            && x.checked_add(width).is_some_and(|right| right <= img_w)
            && y.checked_add(height).is_some_and(|bottom| bottom <= img_h);
        if !fits {
            return Err(SlicepressError::Decode(format!(
                "crop {width}x{height} at ({x}, {y}) exceeds {img_w}x{img_h} image"
            )));
        }

        let cropped = self.image.crop_imm(x, y, width, height);
        debug!(
            new_w = cropped.width(),
            new_h = cropped.height(),
            "Crop complete"
        );
        Ok(Self { image: cropped })
    }

    // -- Output ---------------------------------------------------------------

    /// Write the image to a file. The format is inferred from the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SlicepressError> {
        self.image.save(path.as_ref()).map_err(|err| {
            SlicepressError::Encode(format!(
                "failed to save image to {}: {}",
                path.as_ref().display(),
                err
            ))
        })
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image codec capability — the decode/crop/encode primitives the slicer needs.

use std::path::Path;

use slicepress_core::ImageSize;
use slicepress_core::error::Result;

use super::processor::ImageProcessor;

/// Raster primitives used by the slicer.
///
/// Implementations decode once and crop many times; `dimensions` must not need
/// a full decode.
pub trait ImageCodec {
    /// Decoded image handle.
    type Image;

    /// Read the pixel size of the image at `path`.
    fn dimensions(&self, path: &Path) -> Result<ImageSize>;

    /// Fully decode the image at `path`.
    fn decode(&self, path: &Path) -> Result<Self::Image>;

    /// Copy the rectangle `(x, y, width, height)` into a new image.
    fn crop(&self, image: &Self::Image, x: u32, y: u32, width: u32, height: u32)
    -> Result<Self::Image>;

    /// Write `image` to `path`.
    fn encode(&self, image: &Self::Image, path: &Path) -> Result<()>;
}

/// Default codec backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterCodec;

impl ImageCodec for RasterCodec {
    type Image = ImageProcessor;

    fn dimensions(&self, path: &Path) -> Result<ImageSize> {
        let (width, height) = ImageProcessor::dimensions(path)?;
        Ok(ImageSize::new(width, height))
    }

    fn decode(&self, path: &Path) -> Result<ImageProcessor> {
        ImageProcessor::open(path)
    }

    fn crop(
        &self,
        image: &ImageProcessor,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<ImageProcessor> {
        image.crop(x, y, width, height)
    }

    fn encode(&self, image: &ImageProcessor, path: &Path) -> Result<()> {
        image.save(path)
    }
}

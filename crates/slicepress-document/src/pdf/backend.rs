// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document writer capability.
//
// All coordinates are in points with the origin at the top-left corner of the
// page; backends convert to their own coordinate system.

use std::path::Path;

use slicepress_core::error::Result;

/// Paginated document output.
pub trait DocumentWriter {
    /// Start a new page of `width` x `height` points. Later images are placed
    /// on this page.
    fn add_page(&mut self, width: f64, height: f64) -> Result<()>;

    /// Place the image stored at `image` on the current page, top-left corner
    /// at (`x`, `y`), scaled to `display_width` with its aspect ratio kept.
    ///
    /// The file is fully read before this returns; callers may delete it
    /// afterwards.
    fn place_image(&mut self, image: &Path, x: f64, y: f64, display_width: f64) -> Result<()>;

    /// Finish the document and return its serialised bytes.
    fn finalize(&mut self) -> Result<Vec<u8>>;
}

/// The writer used when the caller does not supply one, or `None` when the
/// crate was built without the `pdf` feature.
pub fn default_backend(title: &str) -> Option<Box<dyn DocumentWriter>> {
    #[cfg(feature = "pdf")]
    {
        Some(Box::new(super::writer::PdfWriter::new(title)))
    }
    #[cfg(not(feature = "pdf"))]
    {
        tracing::warn!(title, "built without the `pdf` feature; no document backend");
        None
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// slicepress-document — Turns one oversized raster image into a print-ready,
// paginated PDF.
//
// Provides page geometry (scale factor, inner and outer page rectangles),
// slicing of tall images into page-height bands, and page-by-page PDF
// assembly, tied together by `PrintLayoutEngine`.

pub mod assemble;
pub mod engine;
pub mod image;
pub mod layout;
pub mod pdf;

// Re-export the primary structs so callers can use `slicepress_document::PrintLayoutEngine` etc.
pub use assemble::{AssembledDocument, DocumentAssembler};
pub use engine::{EmissionReport, PrintLayoutEngine};
pub use crate::image::{ImageCodec, ImageProcessor, RasterCodec};
pub use pdf::{DocumentWriter, PdfInspector, default_backend};

#[cfg(feature = "pdf")]
pub use pdf::PdfWriter;

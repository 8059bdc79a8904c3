// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document assembly — one page per slice, slice placed inside the margins,
// temporary slice files removed as soon as they are on their page.

use slicepress_core::error::{Result, SlicepressError};
use slicepress_core::{ImageSlice, Margins, PageGeometry};
use tracing::{debug, info, instrument, warn};

use crate::pdf::backend::DocumentWriter;

/// Output of [`DocumentAssembler::assemble`].
#[derive(Debug, Clone)]
pub struct AssembledDocument {
    /// Serialised document.
    pub bytes: Vec<u8>,
    pub pages: usize,
    /// Temporary slice files removed during assembly.
    pub deleted_slices: usize,
}

/// Turns an ordered slice sequence into a paginated document.
pub struct DocumentAssembler<'a> {
    geometry: &'a PageGeometry,
    margins: &'a Margins,
    /// Native width of the source image; every slice is placed at this width.
    image_width: u32,
    delete_temp_slices: bool,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(geometry: &'a PageGeometry, margins: &'a Margins, image_width: u32) -> Self {
        Self {
            geometry,
            margins,
            image_width,
            delete_temp_slices: true,
        }
    }

    pub fn delete_temp_slices(mut self, delete: bool) -> Self {
        self.delete_temp_slices = delete;
        self
    }

    /// Add one page per slice to `writer` and finalize it.
    ///
    /// Both preconditions are checked before the first page is added, so a
    /// failed precondition never touches the writer or the slice files.
    #[instrument(skip_all, fields(slices = slices.len()))]
    pub fn assemble(
        &self,
        slices: &[ImageSlice],
        writer: Option<&mut dyn DocumentWriter>,
    ) -> Result<AssembledDocument> {
        if slices.is_empty() {
            return Err(SlicepressError::NoImagesToPrint);
        }
        let Some(writer) = writer else {
            return Err(SlicepressError::MissingDocumentBackend);
        };

        let delete = self.delete_temp_slices && slices.len() > 1;
        let display_width = f64::from(self.image_width);
        let mut deleted_slices = 0;

        for slice in slices {
            writer.add_page(self.geometry.outer_width, self.geometry.outer_height)?;
            writer.place_image(&slice.path, self.margins.left, self.margins.top, display_width)?;
            debug!(index = slice.index, offset = slice.offset, height = slice.height, "Slice placed");

            if delete && slice.temporary {
                std::fs::remove_file(&slice.path)?;
                deleted_slices += 1;
            } else if delete {
                warn!(path = %slice.path.display(), "Not deleting non-temporary slice");
            }
        }

        let bytes = writer.finalize()?;
        info!(
            pages = slices.len(),
            deleted_slices,
            bytes = bytes.len(),
            "Document assembled"
        );

        Ok(AssembledDocument {
            bytes,
            pages: slices.len(),
            deleted_slices,
        })
    }
}

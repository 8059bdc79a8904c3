// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF inspector — read back an emitted document with `lopdf` to check its
// page count and page sizes.

use std::path::Path;

use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use slicepress_core::error::{Result, SlicepressError};
use tracing::{debug, instrument};

/// Read-only view over an existing PDF.
pub struct PdfInspector {
    document: Document,
}

impl PdfInspector {
    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        let document = Document::load(path_ref).map_err(|err| {
            SlicepressError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;
        debug!(pages = document.get_pages().len(), "PDF loaded");
        Ok(Self { document })
    }

    /// Parse PDF bytes already in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            SlicepressError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;
        Ok(Self { document })
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// (width, height) in points of every page, in page order.
    pub fn page_sizes(&self) -> Result<Vec<(f32, f32)>> {
        self.document
            .get_pages()
            .values()
            .map(|&page_id| self.media_box(page_id))
            .collect()
    }

    /// Every `cm` matrix `[a b c d e f]` on each page, in page order and in
    /// content stream order within a page.
    pub fn page_transforms(&self) -> Result<Vec<Vec<[f32; 6]>>> {
        self.document
            .get_pages()
            .values()
            .map(|&page_id| self.transforms(page_id))
            .collect()
    }

    fn transforms(&self, page_id: ObjectId) -> Result<Vec<[f32; 6]>> {
        let pdf_err = |err: lopdf::Error| {
            SlicepressError::PdfError(format!("page {:?}: {}", page_id, err))
        };

        let raw = self.document.get_page_content(page_id).map_err(pdf_err)?;
        let content = Content::decode(&raw).map_err(pdf_err)?;

        let mut matrices = Vec::new();
        for operation in content.operations.iter().filter(|op| op.operator == "cm") {
            let values = operation
                .operands
                .iter()
                .map(|value| value.as_float().map_err(pdf_err))
                .collect::<Result<Vec<f32>>>()?;
            let matrix: [f32; 6] = values.as_slice().try_into().map_err(|_| {
                SlicepressError::PdfError(format!(
                    "page {:?}: cm has {} operands",
                    page_id,
                    values.len()
                ))
            })?;
            matrices.push(matrix);
        }
        Ok(matrices)
    }

    fn media_box(&self, page_id: ObjectId) -> Result<(f32, f32)> {
        let pdf_err = |err: lopdf::Error| {
            SlicepressError::PdfError(format!("page {:?}: {}", page_id, err))
        };

        let page = self.document.get_dictionary(page_id).map_err(pdf_err)?;
        let mut media_box = page.get(b"MediaBox").map_err(pdf_err)?;
        if let Object::Reference(id) = media_box {
            media_box = self.document.get_object(*id).map_err(pdf_err)?;
        }

        let corners = media_box
            .as_array()
            .map_err(pdf_err)?
            .iter()
            .map(|value| value.as_float().map_err(pdf_err))
            .collect::<Result<Vec<f32>>>()?;

        match corners.as_slice() {
            [x0, y0, x1, y1] => Ok((x1 - x0, y1 - y0)),
            other => Err(SlicepressError::PdfError(format!(
                "page {:?}: MediaBox has {} entries",
                page_id,
                other.len()
            ))),
        }
    }
}

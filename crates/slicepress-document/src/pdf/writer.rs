// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — builds paginated image documents using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::path::Path;

use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use slicepress_core::error::{Result, SlicepressError};
use tracing::{debug, info, instrument};

use super::backend::DocumentWriter;

/// Millimetres per PostScript point.
const MM_PER_PT: f32 = 25.4 / 72.0;

/// At 72 DPI one image pixel is one point at scale 1.
const PLACEMENT_DPI: f32 = 72.0;

/// Page being filled before it is pushed onto the document.
struct PendingPage {
    width_pt: f32,
    height_pt: f32,
    ops: Vec<Op>,
}

impl PendingPage {
    fn into_page(self) -> PdfPage {
        PdfPage::new(
            Mm(self.width_pt * MM_PER_PT),
            Mm(self.height_pt * MM_PER_PT),
            self.ops,
        )
    }
}

/// [`DocumentWriter`] producing a PDF with one embedded image XObject per
/// placement.
pub struct PdfWriter {
    document: PdfDocument,
    pages: Vec<PdfPage>,
    current: Option<PendingPage>,
    finalized: bool,
}

impl PdfWriter {
    /// Create an empty document with `title` in its metadata.
    pub fn new(title: &str) -> Self {
        Self {
            document: PdfDocument::new(title),
            pages: Vec::new(),
            current: None,
            finalized: false,
        }
    }

    /// Pages added so far, including the one being filled.
    pub fn page_count(&self) -> usize {
        self.pages.len() + usize::from(self.current.is_some())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.finalized {
            return Err(SlicepressError::PdfError(
                "document already finalized".into(),
            ));
        }
        Ok(())
    }
}

impl DocumentWriter for PdfWriter {
    fn add_page(&mut self, width: f64, height: f64) -> Result<()> {
        self.ensure_open()?;
        if !(width > 0.0 && height > 0.0) {
            return Err(SlicepressError::PdfError(format!(
                "page size must be positive, got {width}x{height}"
            )));
        }
        if let Some(previous) = self.current.take() {
            self.pages.push(previous.into_page());
        }
        self.current = Some(PendingPage {
            width_pt: width as f32,
            height_pt: height as f32,
            ops: Vec::new(),
        });
        debug!(page = self.page_count(), width, height, "Page added");
        Ok(())
    }

    #[instrument(skip_all, fields(image = %image.display()))]
    fn place_image(&mut self, image: &Path, x: f64, y: f64, display_width: f64) -> Result<()> {
        self.ensure_open()?;
        let Some(page) = self.current.as_mut() else {
            return Err(SlicepressError::PdfError(
                "cannot place an image before adding a page".into(),
            ));
        };

        let dynamic_image = ::image::open(image).map_err(|err| {
            SlicepressError::Decode(format!(
                "failed to decode {} for PDF: {}",
                image.display(),
                err
            ))
        })?;

        let img_width = dynamic_image.width();
        let img_height = dynamic_image.height();

        // Convert to RGB8 for printpdf.
        let rgb_image = dynamic_image.to_rgb8();
        let raw = RawImage {
            pixels: RawImageData::U8(rgb_image.into_raw()),
            width: img_width as usize,
            height: img_height as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let xobject_id = self.document.add_image(&raw);

        let scale = display_width as f32 / img_width as f32;
        let rendered_h_pt = img_height as f32 * scale;
        // PDF origin is bottom-left; layout coordinates are top-left.
        let translate_y = page.height_pt - y as f32 - rendered_h_pt;

        page.ops.push(Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(x as f32)),
                translate_y: Some(Pt(translate_y)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(PLACEMENT_DPI),
                rotate: None,
            },
        });

        debug!(img_width, img_height, scale, translate_y, "Image placed on page");
        Ok(())
    }

    fn finalize(&mut self) -> Result<Vec<u8>> {
        self.ensure_open()?;
        if let Some(last) = self.current.take() {
            self.pages.push(last.into_page());
        }
        self.finalized = true;

        let pages = std::mem::take(&mut self.pages);
        let page_count = pages.len();
        self.document.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = self.document.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            debug!(warnings = warnings.len(), "printpdf reported warnings");
        }

        info!(pages = page_count, bytes = output.len(), "PDF finalized");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::reader::PdfInspector;
    use image::{DynamicImage, Rgb, RgbImage};

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> std::path::PathBuf {
        let path = dir.join(name);
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([10, 120, 200])))
            .save(&path)
            .expect("write test png");
        path
    }

    #[test]
    fn pages_keep_requested_sizes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let png = write_png(dir.path(), "band.png", 60, 40);

        let mut writer = PdfWriter::new("sizes");
        writer.add_page(100.0, 200.0).expect("page 1");
        writer.place_image(&png, 20.0, 20.0, 60.0).expect("place 1");
        writer.add_page(300.0, 150.0).expect("page 2");
        writer.place_image(&png, 20.0, 20.0, 60.0).expect("place 2");
        assert_eq!(writer.page_count(), 2);

        let bytes = writer.finalize().expect("finalize");
        let inspector = PdfInspector::from_bytes(&bytes).expect("parse output");
        let sizes = inspector.page_sizes().expect("media boxes");
        assert_eq!(sizes.len(), 2);
        assert!((sizes[0].0 - 100.0).abs() < 0.5 && (sizes[0].1 - 200.0).abs() < 0.5);
        assert!((sizes[1].0 - 300.0).abs() < 0.5 && (sizes[1].1 - 150.0).abs() < 0.5);
    }

    #[test]
    fn image_lands_at_top_left_offset_with_native_width() {
        let dir = tempfile::tempdir().expect("tempdir");
        let png = write_png(dir.path(), "band.png", 60, 40);

        let mut writer = PdfWriter::new("placement");
        writer.add_page(100.0, 200.0).expect("page");
        writer.place_image(&png, 20.0, 20.0, 60.0).expect("place");
        let bytes = writer.finalize().expect("finalize");

        let inspector = PdfInspector::from_bytes(&bytes).expect("parse output");
        let transforms = inspector.page_transforms().expect("content streams");
        assert_eq!(transforms.len(), 1);

        // 20 from the left; 200 - 20 - 40 = 140 from the bottom.
        let expected = [60.0, 0.0, 0.0, 40.0, 20.0, 140.0];
        let placed = transforms[0].iter().any(|matrix| {
            matrix
                .iter()
                .zip(expected)
                .all(|(actual, wanted)| (actual - wanted).abs() < 0.01)
        });
        assert!(placed, "no cm matching {expected:?} in {:?}", transforms[0]);
    }

    #[test]
    fn placing_without_page_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let png = write_png(dir.path(), "band.png", 10, 10);

        let mut writer = PdfWriter::new("no page");
        let err = writer.place_image(&png, 0.0, 0.0, 10.0).unwrap_err();
        assert!(matches!(err, SlicepressError::PdfError(_)));
    }

    #[test]
    fn image_file_can_be_removed_after_placement() {
        let dir = tempfile::tempdir().expect("tempdir");
        let png = write_png(dir.path(), "band.png", 10, 10);

        let mut writer = PdfWriter::new("delete");
        writer.add_page(50.0, 50.0).expect("page");
        writer.place_image(&png, 20.0, 20.0, 10.0).expect("place");
        std::fs::remove_file(&png).expect("remove placed image");

        let bytes = writer.finalize().expect("finalize after delete");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn finalize_twice_fails() {
        let mut writer = PdfWriter::new("twice");
        writer.add_page(10.0, 10.0).expect("page");
        writer.finalize().expect("first finalize");
        assert!(writer.finalize().is_err());
        assert!(writer.add_page(10.0, 10.0).is_err());
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print layout engine — validates the input, computes the page geometry,
// slices the source image and emits the paginated PDF.

use std::path::{Path, PathBuf};

use slicepress_core::error::{Result, SlicepressError};
use slicepress_core::{FormatTable, ImageSize, LayoutConfig, PageGeometry};
use tracing::{info, instrument};

use crate::assemble::{AssembledDocument, DocumentAssembler};
use crate::image::codec::{ImageCodec, RasterCodec};
use crate::layout::geometry;
use crate::layout::slicer::{SliceSet, Slicer};
use crate::pdf::backend::{DocumentWriter, default_backend};

/// Result of a successful emission.
#[derive(Debug, Clone)]
pub struct EmissionReport {
    pub pages: usize,
    pub bytes: usize,
    /// File written, if the document went to disk.
    pub output: Option<PathBuf>,
    pub deleted_slices: usize,
}

/// One source image laid out for printing.
///
/// All validation, geometry and slicing happen in the constructor; the
/// results are cached for the lifetime of the engine. Emission consumes the
/// engine because it may delete the slice files it places.
#[derive(Debug)]
pub struct PrintLayoutEngine<C: ImageCodec = RasterCodec> {
    codec: C,
    source: PathBuf,
    config: LayoutConfig,
    image: ImageSize,
    geometry: PageGeometry,
    slices: SliceSet,
}

impl PrintLayoutEngine<RasterCodec> {
    /// Lay out `source` with the default `image`-crate codec.
    pub fn open(
        source: impl AsRef<Path>,
        config: &LayoutConfig,
        formats: &FormatTable,
    ) -> Result<Self> {
        Self::with_codec(RasterCodec, source, config, formats)
    }
}

impl<C: ImageCodec> PrintLayoutEngine<C> {
    /// Lay out `source` using `codec` for all raster work.
    #[instrument(skip_all, fields(source = %source.as_ref().display(), format = %config.format))]
    pub fn with_codec(
        codec: C,
        source: impl AsRef<Path>,
        config: &LayoutConfig,
        formats: &FormatTable,
    ) -> Result<Self> {
        let source = source.as_ref().to_path_buf();
        if !source.is_file() {
            return Err(SlicepressError::SourceNotFound(source));
        }
        formats.validate()?;
        let format = formats.get(&config.format)?;
        config.margins.validate()?;

        let image = codec.dimensions(&source)?;
        let geometry = geometry::resolve(&format.extent, image, &config.margins)?;

        let slices = Slicer::new(&codec)
            .temp_base(config.temp_dir.as_deref())
            .keep_files(!config.delete_temp_slices)
            .slice(&source, image, &geometry)?;

        info!(
            format = %format.name,
            image = %image,
            scale = geometry.scale_factor,
            slices = slices.len(),
            "Layout prepared"
        );

        Ok(Self {
            codec,
            source,
            config: config.clone(),
            image,
            geometry,
            slices,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn image_size(&self) -> ImageSize {
        self.image
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn slices(&self) -> &SliceSet {
        &self.slices
    }

    /// Title for the document metadata.
    pub fn title(&self) -> String {
        self.config.title.clone().unwrap_or_else(|| {
            self.source
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "Slicepress".to_string())
        })
    }

    /// Render with the default backend and write the PDF to the configured
    /// output path.
    pub fn emit(self) -> Result<EmissionReport> {
        let mut backend = default_backend(&self.title());
        match backend.as_deref_mut() {
            Some(writer) => self.emit_with(Some(writer)),
            None => self.emit_with(None),
        }
    }

    /// Render with `writer` and write the PDF to the configured output path.
    ///
    /// The output file is written only after the document is complete, so a
    /// failed run leaves no partial file behind.
    #[instrument(skip_all, fields(source = %self.source.display()))]
    pub fn emit_with(self, writer: Option<&mut dyn DocumentWriter>) -> Result<EmissionReport> {
        let output = self.config.output_path_for(&self.source)?;
        let document = self.render(writer)?;

        std::fs::write(&output, &document.bytes)?;
        info!(output = %output.display(), pages = document.pages, "PDF written");

        Ok(EmissionReport {
            pages: document.pages,
            bytes: document.bytes.len(),
            output: Some(output),
            deleted_slices: document.deleted_slices,
        })
    }

    /// Render with `writer` and return the document bytes without writing a
    /// file.
    pub fn render(self, writer: Option<&mut dyn DocumentWriter>) -> Result<AssembledDocument> {
        DocumentAssembler::new(&self.geometry, &self.config.margins, self.image.width)
            .delete_temp_slices(self.config.delete_temp_slices)
            .assemble(self.slices.slices(), writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};
    use slicepress_core::{Margins, PaperFormat};

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 90]));
        DynamicImage::ImageRgb8(img).save(&path).expect("write test png");
        path
    }

    fn config_in(dir: &Path, format: &str) -> LayoutConfig {
        LayoutConfig {
            format: format.to_string(),
            temp_dir: Some(dir.join("work")),
            output_path: Some(dir.join("out.pdf")),
            ..LayoutConfig::default()
        }
    }

    /// Writer that records page sizes and checks every placed file exists.
    #[derive(Default)]
    struct CountingWriter {
        pages: Vec<(f64, f64)>,
        placed: Vec<PathBuf>,
    }

    impl DocumentWriter for CountingWriter {
        fn add_page(&mut self, width: f64, height: f64) -> Result<()> {
            self.pages.push((width, height));
            Ok(())
        }

        fn place_image(&mut self, image: &Path, _x: f64, _y: f64, _w: f64) -> Result<()> {
            assert!(image.exists(), "slice read after deletion: {}", image.display());
            self.placed.push(image.to_path_buf());
            Ok(())
        }

        fn finalize(&mut self) -> Result<Vec<u8>> {
            Ok(b"%PDF-counting".to_vec())
        }
    }

    #[test]
    fn a4_tall_image_is_sliced() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = write_png(dir.path(), "graph.png", 800, 3000);

        let engine = PrintLayoutEngine::open(&source, &config_in(dir.path(), "A4"), &FormatTable::builtin())
            .expect("open");
        let band = engine.geometry().band_height();
        assert_eq!(band, 1131);

        let slices = engine.slices().slices();
        assert_eq!(slices.len(), 3000usize.div_ceil(band as usize));
        assert_eq!(slices.iter().map(|s| s.height).sum::<u32>(), 3000);
        let last = slices.last().expect("last slice");
        assert_eq!(last.height, 3000 - (slices.len() as u32 - 1) * band);
        assert!(last.height < slices[0].height);
        assert!(slices.windows(2).all(|w| w[0].end() == w[1].offset));
    }

    #[test]
    fn full_format_square_image_is_one_page() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = write_png(dir.path(), "square.png", 500, 500);

        let engine = PrintLayoutEngine::open(&source, &config_in(dir.path(), "FULL"), &FormatTable::builtin())
            .expect("open");
        assert_eq!(engine.geometry().outer_width, 540.0);
        assert_eq!(engine.geometry().outer_height, 540.0);
        assert_eq!(engine.slices().len(), 1);
        assert_eq!(engine.slices().slices()[0].path, source);

        let mut writer = CountingWriter::default();
        let report = engine.emit_with(Some(&mut writer)).expect("emit");
        assert_eq!(report.pages, 1);
        assert_eq!(report.deleted_slices, 0);
        assert_eq!(writer.pages, vec![(540.0, 540.0)]);
        assert!(source.exists(), "source must never be deleted");
    }

    #[test]
    fn missing_source_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.png");

        let err = PrintLayoutEngine::open(&missing, &config_in(dir.path(), "A4"), &FormatTable::builtin())
            .unwrap_err();
        assert!(matches!(err, SlicepressError::SourceNotFound(ref p) if p == &missing));
        assert!(!dir.path().join("work").exists(), "no slices produced");
    }

    #[test]
    fn unknown_format_checked_before_decoding() {
        let dir = tempfile::tempdir().expect("tempdir");
        let junk = dir.path().join("junk.png");
        std::fs::write(&junk, b"not an image").expect("write junk");

        let err = PrintLayoutEngine::open(&junk, &config_in(dir.path(), "B5"), &FormatTable::builtin())
            .unwrap_err();
        assert!(matches!(err, SlicepressError::UnknownFormat(ref key) if key == "B5"));
    }

    #[test]
    fn missing_backend_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = write_png(dir.path(), "graph.png", 40, 100);
        let formats = FormatTable::empty()
            .with_format(PaperFormat::fixed("STRIP", 40.0, 30.0))
            .expect("format");
        let config = config_in(dir.path(), "STRIP");

        let engine = PrintLayoutEngine::open(&source, &config, &formats).expect("open");
        assert_eq!(engine.slices().len(), 4);
        let slice_paths: Vec<PathBuf> = engine.slices().slices().iter().map(|s| s.path.clone()).collect();

        let err = engine.emit_with(None).unwrap_err();
        assert!(matches!(err, SlicepressError::MissingDocumentBackend));
        assert!(!dir.path().join("out.pdf").exists());
        // Engine dropped: its owned slice directory went with it.
        assert!(slice_paths.iter().all(|p| !p.exists()));
    }

    #[test]
    fn output_onto_source_is_refused_before_rendering() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = write_png(dir.path(), "square.png", 50, 50);
        let original = std::fs::read(&source).expect("read source");
        let config = LayoutConfig {
            output_path: Some(source.clone()),
            ..config_in(dir.path(), "FULL")
        };

        let engine = PrintLayoutEngine::open(&source, &config, &FormatTable::builtin()).expect("open");
        let mut writer = CountingWriter::default();
        let err = engine.emit_with(Some(&mut writer)).unwrap_err();

        assert!(matches!(err, SlicepressError::Config(_)));
        assert!(writer.pages.is_empty());
        assert_eq!(std::fs::read(&source).expect("reread source"), original);
    }

    #[test]
    fn custom_format_slices_deleted_during_emission() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = write_png(dir.path(), "graph.png", 40, 100);
        let formats = FormatTable::empty()
            .with_format(PaperFormat::fixed("STRIP", 40.0, 30.0))
            .expect("format");
        let config = LayoutConfig {
            margins: Margins::uniform(5.0),
            ..config_in(dir.path(), "strip")
        };

        let engine = PrintLayoutEngine::open(&source, &config, &formats).expect("open");
        let heights: Vec<u32> = engine.slices().slices().iter().map(|s| s.height).collect();
        assert_eq!(heights, vec![30, 30, 30, 10]);

        let mut writer = CountingWriter::default();
        let report = engine.emit_with(Some(&mut writer)).expect("emit");
        assert_eq!(report.pages, 4);
        assert_eq!(report.deleted_slices, 4);
        assert_eq!(writer.pages, vec![(50.0, 40.0); 4]);
        assert!(writer.placed.iter().all(|p| !p.exists()));
        assert_eq!(
            std::fs::read(dir.path().join("out.pdf")).expect("output written"),
            b"%PDF-counting"
        );
    }

    #[test]
    fn kept_slices_survive_emission() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = write_png(dir.path(), "graph.png", 40, 100);
        let formats = FormatTable::empty()
            .with_format(PaperFormat::fixed("STRIP", 40.0, 30.0))
            .expect("format");
        let config = LayoutConfig {
            delete_temp_slices: false,
            ..config_in(dir.path(), "STRIP")
        };

        let engine = PrintLayoutEngine::open(&source, &config, &formats).expect("open");
        let mut writer = CountingWriter::default();
        let report = engine.emit_with(Some(&mut writer)).expect("emit");

        assert_eq!(report.deleted_slices, 0);
        assert!(writer.placed.iter().all(|p| p.exists()));
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn emits_real_pdf_with_outer_page_sizes() {
        use crate::pdf::reader::PdfInspector;

        let dir = tempfile::tempdir().expect("tempdir");
        let source = write_png(dir.path(), "graph.png", 40, 100);
        let formats = FormatTable::builtin()
            .with_format(PaperFormat::fixed("STRIP", 40.0, 30.0))
            .expect("format");
        let config = config_in(dir.path(), "STRIP");

        let report = PrintLayoutEngine::open(&source, &config, &formats)
            .expect("open")
            .emit()
            .expect("emit");
        assert_eq!(report.pages, 4);

        let output = report.output.expect("output path");
        let inspector = PdfInspector::open(&output).expect("parse PDF");
        assert_eq!(inspector.page_count(), 4);
        for (width, height) in inspector.page_sizes().expect("sizes") {
            assert!((width - 80.0).abs() < 0.5, "width {width}");
            assert!((height - 70.0).abs() < 0.5, "height {height}");
        }
    }
}

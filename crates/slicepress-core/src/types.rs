// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Slicepress: paper formats, margins, page geometry and
// image slices.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SlicepressError};

/// Key of the built-in A4 format, used when no format is configured.
pub const DEFAULT_FORMAT: &str = "A4";

/// Key of the full-bleed format whose page follows the source image size.
pub const FULL_FORMAT: &str = "FULL";

/// Default margin on every side, in pixels.
pub const DEFAULT_MARGIN: f64 = 20.0;

/// Pixel dimensions of a decoded source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Nominal page size of a paper format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaperExtent {
    /// Fixed page size in pixels at the 96 DPI reference resolution.
    Fixed { width: f64, height: f64 },
    /// Page size taken from the source image (full-bleed output).
    FromSource,
}

impl PaperExtent {
    /// Nominal (width, height) for an image of the given size.
    pub fn nominal_size(&self, image: ImageSize) -> (f64, f64) {
        match *self {
            Self::Fixed { width, height } => (width, height),
            Self::FromSource => (f64::from(image.width), f64::from(image.height)),
        }
    }
}

/// A named entry in the [`FormatTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperFormat {
    pub name: String,
    pub extent: PaperExtent,
}

impl PaperFormat {
    pub fn fixed(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            extent: PaperExtent::Fixed { width, height },
        }
    }

    pub fn from_source(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extent: PaperExtent::FromSource,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SlicepressError::InvalidFormat(
                "format name must not be empty".into(),
            ));
        }
        if let PaperExtent::Fixed { width, height } = self.extent {
            let valid = |v: f64| v.is_finite() && v > 0.0;
            if !valid(width) || !valid(height) {
                return Err(SlicepressError::InvalidFormat(format!(
                    "{}: dimensions must be positive, got {}x{}",
                    self.name, width, height
                )));
            }
        }
        Ok(())
    }
}

/// Immutable table of the paper formats a run may select from.
///
/// Keys are matched ASCII case-insensitively. The table is built once and
/// passed to the engine, so tests and callers can supply their own formats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatTable {
    formats: Vec<PaperFormat>,
}

impl FormatTable {
    /// Table with no entries.
    pub fn empty() -> Self {
        Self {
            formats: Vec::new(),
        }
    }

    /// The built-in formats, in pixels at 96 DPI.
    pub fn builtin() -> Self {
        Self {
            formats: vec![
                PaperFormat::fixed("A4", 793.7, 1122.52),
                PaperFormat::fixed("A3", 1122.52, 1587.4),
                PaperFormat::fixed("A5", 559.37, 793.7),
                PaperFormat::fixed("LETTER", 816.0, 1056.0),
                PaperFormat::from_source(FULL_FORMAT),
            ],
        }
    }

    /// Return a copy of the table with `format` added, replacing any entry
    /// with the same key.
    pub fn with_format(mut self, format: PaperFormat) -> Result<Self> {
        format.validate()?;
        self.formats
            .retain(|existing| !existing.name.eq_ignore_ascii_case(&format.name));
        self.formats.push(format);
        Ok(self)
    }

    /// Check every entry. Tables deserialised from configuration go through
    /// this before use.
    pub fn validate(&self) -> Result<()> {
        self.formats.iter().try_for_each(PaperFormat::validate)
    }

    /// Look up a format by key.
    pub fn get(&self, key: &str) -> Result<&PaperFormat> {
        self.formats
            .iter()
            .find(|format| format.name.eq_ignore_ascii_case(key.trim()))
            .ok_or_else(|| SlicepressError::UnknownFormat(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_ok()
    }

    /// Format keys in table order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.formats.iter().map(|format| format.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

impl Default for FormatTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Page margins in pixels. Separates the inner (printable) page area from the
/// outer page the document backend is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Margins {
    pub fn uniform(margin: f64) -> Self {
        Self {
            top: margin,
            left: margin,
            bottom: margin,
            right: margin,
        }
    }

    pub fn none() -> Self {
        Self::uniform(0.0)
    }

    /// Left + right.
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Top + bottom.
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    pub fn validate(&self) -> Result<()> {
        let sides = [
            ("top", self.top),
            ("left", self.left),
            ("bottom", self.bottom),
            ("right", self.right),
        ];
        for (side, value) in sides {
            if !value.is_finite() || value < 0.0 {
                return Err(SlicepressError::Config(format!(
                    "{side} margin must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(DEFAULT_MARGIN)
    }
}

/// Page rectangles derived once per run from the paper format, the source
/// image width and the margins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    /// Ratio between paper and image width, always >= 1.
    pub scale_factor: f64,
    pub inner_width: f64,
    pub inner_height: f64,
    pub outer_width: f64,
    pub outer_height: f64,
}

impl PageGeometry {
    /// Height of one slice band in whole pixel rows. Never zero.
    pub fn band_height(&self) -> u32 {
        (self.inner_height.floor() as u32).max(1)
    }
}

/// One horizontal band of the source image destined for one output page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSlice {
    /// Position in the slice sequence, top to bottom.
    pub index: usize,
    /// First source row covered by this slice.
    pub offset: u32,
    /// Number of source rows covered.
    pub height: u32,
    /// Backing image file.
    pub path: PathBuf,
    /// Whether `path` is a temporary artifact owned by the run (as opposed to
    /// the source image itself).
    pub temporary: bool,
}

impl ImageSlice {
    /// One past the last source row covered.
    pub fn end(&self) -> u32 {
        self.offset + self.height
    }
}

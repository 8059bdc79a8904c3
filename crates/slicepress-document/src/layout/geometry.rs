// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page geometry — scale factor, inner (printable) and outer (margin-inclusive)
// page rectangles.

use slicepress_core::error::{Result, SlicepressError};
use slicepress_core::{ImageSize, Margins, PageGeometry, PaperExtent};
use tracing::debug;

/// Ratio of the larger to the smaller of the two widths. Always >= 1, and
/// exactly 1 when the widths are equal.
pub fn scale_factor(paper_width: f64, image_width: f64) -> f64 {
    if paper_width > image_width {
        paper_width / image_width
    } else {
        image_width / paper_width
    }
}

/// Compute the page rectangles for an image printed on `extent`.
///
/// The scale factor comes from the widths alone and is applied to both paper
/// dimensions, so the paper is scaled up to the image's pixel density and the
/// image itself is never resized.
pub fn resolve(extent: &PaperExtent, image: ImageSize, margins: &Margins) -> Result<PageGeometry> {
    if image.is_empty() {
        return Err(SlicepressError::EmptyImage {
            width: image.width,
            height: image.height,
        });
    }
    margins.validate()?;

    let (paper_width, paper_height) = extent.nominal_size(image);
    let scale = scale_factor(paper_width, f64::from(image.width));

    let inner_width = paper_width * scale;
    let inner_height = paper_height * scale;
    let geometry = PageGeometry {
        scale_factor: scale,
        inner_width,
        inner_height,
        outer_width: inner_width + margins.horizontal(),
        outer_height: inner_height + margins.vertical(),
    };

    debug!(
        paper_width,
        paper_height,
        scale,
        inner_width,
        inner_height,
        outer_width = geometry.outer_width,
        outer_height = geometry.outer_height,
        "Page geometry resolved"
    );
    Ok(geometry)
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — decoding, cropping and encoding of source images and slices.

pub mod codec;
pub mod processor;

pub use codec::{ImageCodec, RasterCodec};
pub use processor::ImageProcessor;

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout module — page geometry and image slicing.

pub mod geometry;
pub mod slicer;

pub use slicer::{Band, SliceSet, Slicer, plan_bands};

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — the document writer capability, its printpdf implementation
// and a lopdf-based inspector for emitted files.

pub mod backend;
pub mod reader;
#[cfg(feature = "pdf")]
pub mod writer;

pub use backend::{DocumentWriter, default_backend};
pub use reader::PdfInspector;
#[cfg(feature = "pdf")]
pub use writer::PdfWriter;

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Slicepress.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Slicepress operations.
#[derive(Debug, Error)]
pub enum SlicepressError {
    // -- Input errors --
    #[error("source image not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("unknown paper format: {0}")]
    UnknownFormat(String),

    #[error("invalid paper format: {0}")]
    InvalidFormat(String),

    #[error("source image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    // -- Image errors --
    #[error("image decoding failed: {0}")]
    Decode(String),

    #[error("image encoding failed: {0}")]
    Encode(String),

    // -- Document errors --
    #[error("no images to print")]
    NoImagesToPrint,

    #[error("no document backend available for PDF output")]
    MissingDocumentBackend,

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SlicepressError>;

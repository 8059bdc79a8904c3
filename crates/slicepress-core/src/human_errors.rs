// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages.
//
// Every failure is mapped to plain English with a concrete suggestion. None of
// the failures are transient, so nothing here asks for a retry.

use crate::error::SlicepressError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The input or configuration must be changed before trying again.
    ActionRequired,
    /// The file or environment cannot be handled as-is.
    Permanent,
}

/// A human-readable error with a plain English message and suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Short summary (shown as a heading).
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    pub severity: Severity,
}

impl std::fmt::Display for HumanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.message, self.suggestion)
    }
}

/// Convert a `SlicepressError` into a `HumanError`.
pub fn humanize_error(err: &SlicepressError) -> HumanError {
    match err {
        SlicepressError::SourceNotFound(path) => HumanError {
            message: format!("The file '{}' does not exist.", path.display()),
            suggestion: "Check the path to the image and try again.".into(),
            severity: Severity::ActionRequired,
        },

        SlicepressError::UnknownFormat(key) => HumanError {
            message: format!("'{key}' is not a known paper format."),
            suggestion: "Pick one of the configured formats, for example A4 or FULL.".into(),
            severity: Severity::ActionRequired,
        },

        SlicepressError::InvalidFormat(detail) => HumanError {
            message: "A paper format in the configuration is not usable.".into(),
            suggestion: format!("Give every format a name and a positive width and height. ({detail})"),
            severity: Severity::ActionRequired,
        },

        SlicepressError::EmptyImage { .. } => HumanError {
            message: "The image is empty.".into(),
            suggestion: "Export the image again; it has no pixels to print.".into(),
            severity: Severity::Permanent,
        },

        SlicepressError::Decode(detail) => HumanError {
            message: "The image could not be read.".into(),
            suggestion: format!("Make sure the file is a valid PNG or other supported image. ({detail})"),
            severity: Severity::Permanent,
        },

        SlicepressError::Encode(detail) => HumanError {
            message: "A page image could not be written.".into(),
            suggestion: format!("Check there is free space in the temporary directory. ({detail})"),
            severity: Severity::Permanent,
        },

        SlicepressError::NoImagesToPrint => HumanError {
            message: "There is nothing to print.".into(),
            suggestion: "Open an existing image before creating the PDF.".into(),
            severity: Severity::ActionRequired,
        },

        SlicepressError::MissingDocumentBackend => HumanError {
            message: "PDF output is not available in this build.".into(),
            suggestion: "Rebuild with the `pdf` feature enabled or supply a document writer.".into(),
            severity: Severity::Permanent,
        },

        SlicepressError::PdfError(detail) => HumanError {
            message: "The PDF could not be created.".into(),
            suggestion: format!("Detail: {detail}"),
            severity: Severity::Permanent,
        },

        SlicepressError::Config(detail) => HumanError {
            message: "The layout settings are not valid.".into(),
            suggestion: format!("Fix the setting and try again. ({detail})"),
            severity: Severity::ActionRequired,
        },

        SlicepressError::Io(io_err) => HumanError {
            message: "A file could not be read or written.".into(),
            suggestion: format!("Check the folder exists and you have permission to write there. ({io_err})"),
            severity: Severity::ActionRequired,
        },

        SlicepressError::Serialization(json_err) => HumanError {
            message: "The settings file could not be understood.".into(),
            suggestion: format!("Check the file is valid JSON. ({json_err})"),
            severity: Severity::ActionRequired,
        },
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SlicepressError};
use crate::types::{DEFAULT_FORMAT, Margins};

/// Settings for a single print-layout run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Paper format key, looked up in the format table.
    pub format: String,
    /// Page margins in pixels.
    pub margins: Margins,
    /// Remove temporary slice images once they are placed in the document.
    pub delete_temp_slices: bool,
    /// Base directory for the per-run slice directory (defaults to the OS
    /// temp dir).
    pub temp_dir: Option<PathBuf>,
    /// Destination of the emitted PDF. Defaults to `<source stem>.pdf` next to
    /// the source image.
    pub output_path: Option<PathBuf>,
    /// Title embedded in the PDF metadata. Defaults to the source file name.
    pub title: Option<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_FORMAT.to_string(),
            margins: Margins::default(),
            delete_temp_slices: true,
            temp_dir: None,
            output_path: None,
            title: None,
        }
    }
}

impl LayoutConfig {
    /// Default configuration with another paper format.
    pub fn with_format(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            ..Self::default()
        }
    }

    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.margins.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    /// Where the PDF for `source` is written.
    ///
    /// Fails when that path is the source itself, as with a default output
    /// for a source already named `*.pdf`.
    pub fn output_path_for(&self, source: &Path) -> Result<PathBuf> {
        let output = match &self.output_path {
            Some(path) => path.clone(),
            None => {
                let stem = source
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "output".to_string());
                source.with_file_name(format!("{stem}.pdf"))
            }
        };

        let same_file = output == source
            || matches!(
                (output.canonicalize(), source.canonicalize()),
                (Ok(out), Ok(src)) if out == src
            );
        if same_file {
            return Err(SlicepressError::Config(format!(
                "output path {} would overwrite the source image",
                output.display()
            )));
        }
        Ok(output)
    }
}

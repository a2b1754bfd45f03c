//! Typst rendering engine.
//!
//! Handles the low-level details of staging Typst source and page images in
//! a temporary directory, invoking the compiler, and reading back the PDF.

use std::fs;
use std::process::Command;
use tempfile::{tempdir, TempDir};

use super::typst::TypstSource;
use super::DocumentError;

const SOURCE_FILENAME: &str = "quotation.typ";
const OUTPUT_FILENAME: &str = "quotation.pdf";

/// Stateless engine for compiling Typst sources to PDF.
pub struct TypstRenderEngine;

impl TypstRenderEngine {
    /// Compile a rendered Typst source to PDF bytes.
    pub fn render(source: &TypstSource) -> Result<Vec<u8>, DocumentError> {
        let temp_dir = tempdir().map_err(DocumentError::TempDir)?;

        fs::write(temp_dir.path().join(SOURCE_FILENAME), &source.source)
            .map_err(DocumentError::WriteTypst)?;

        for asset in &source.assets {
            fs::copy(&asset.source_path, temp_dir.path().join(&asset.name)).map_err(|e| {
                DocumentError::CopyAsset {
                    path: asset.source_path.clone(),
                    source: e,
                }
            })?;
        }

        log::debug!(
            "Compiling {} with {} page assets in {}",
            SOURCE_FILENAME,
            source.assets.len(),
            temp_dir.path().display()
        );
        compile_typst_to_pdf(&temp_dir)
    }
}

fn compile_typst_to_pdf(temp_dir: &TempDir) -> Result<Vec<u8>, DocumentError> {
    let typ_path = temp_dir.path().join(SOURCE_FILENAME);
    let output_path = temp_dir.path().join(OUTPUT_FILENAME);

    let status = Command::new("typst")
        .arg("compile")
        .arg(&typ_path)
        .arg(&output_path)
        .current_dir(temp_dir.path())
        .status()
        .map_err(DocumentError::TypstIo)?;

    if !status.success() {
        let code = status.code().unwrap_or(-1);
        return Err(DocumentError::TypstExit(code));
    }

    fs::read(&output_path).map_err(DocumentError::ReadPdf)
}

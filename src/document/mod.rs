//! Proposal document generation.
//!
//! - `assembler` - lays a quotation out as static pages plus one data page
//! - `pages` - locates the pre-rendered background pages
//! - `typst` - serializes the layout to Typst markup
//! - `engine` - compiles the markup to PDF with the Typst CLI

pub mod assembler;
pub mod common;
pub mod engine;
pub mod pages;
pub mod typst;

pub use assembler::{assemble, Document, Page};
pub use engine::TypstRenderEngine;
pub use pages::StaticPageLayout;

use std::path::PathBuf;
use thiserror::Error;

use crate::quote::model::Quotation;
use common::sanitize_filename;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("static page {index} not found at {}", path.display())]
    MissingStaticPage { index: u32, path: PathBuf },
    #[error("quotation is incomplete: {0}")]
    InvalidQuotation(String),
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write Typst source: {0}")]
    WriteTypst(#[source] std::io::Error),
    #[error("failed to stage page image {}: {source}", path.display())]
    CopyAsset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Typst CLI execution failed: {0}")]
    TypstIo(#[source] std::io::Error),
    #[error("Typst CLI exited with status {0}")]
    TypstExit(i32),
    #[error("failed to read generated PDF: {0}")]
    ReadPdf(#[source] std::io::Error),
}

/// Result of a successful document generation.
#[derive(Debug)]
pub struct GeneratedDocument {
    pub filename: String,
    pub pdf: Vec<u8>,
}

/// Trait for document generators.
pub trait Generator<Req> {
    fn generate(&self, request: Req) -> Result<GeneratedDocument, DocumentError>;
}

/// Renders quotations into the fixed proposal PDF.
#[derive(Debug, Clone)]
pub struct QuotationPdfGenerator {
    layout: StaticPageLayout,
}

impl QuotationPdfGenerator {
    pub fn new(layout: StaticPageLayout) -> Self {
        Self { layout }
    }

    /// Download name for a quotation, e.g. `quote-1000136.pdf`.
    pub fn filename_for(quotation: &Quotation) -> String {
        format!(
            "quote-{}.pdf",
            sanitize_filename(&quotation.quote_details.quote_number, "draft")
        )
    }
}

impl<'a> Generator<&'a Quotation> for QuotationPdfGenerator {
    fn generate(&self, quotation: &'a Quotation) -> Result<GeneratedDocument, DocumentError> {
        let document = assemble(quotation, &self.layout)?;
        let source = typst::render_typst(&document);
        let pdf = TypstRenderEngine::render(&source)?;

        Ok(GeneratedDocument {
            filename: Self::filename_for(quotation),
            pdf,
        })
    }
}

//! Serializes an assembled [`Document`] into Typst markup.
//!
//! Every user-supplied value is emitted as an escaped string literal, never
//! as raw markup, so characters like `*`, `#` or `$` print as typed.

use std::fmt::Write;
use std::path::PathBuf;

use super::assembler::{DataPage, Document, HeaderColumn, Page, TotalsRowKind};
use super::common::escape_typst_string;

/// Typst source plus the images it references by name.
#[derive(Debug, Clone, PartialEq)]
pub struct TypstSource {
    pub source: String,
    pub assets: Vec<TypstAsset>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypstAsset {
    /// File name used inside the compile directory.
    pub name: String,
    pub source_path: PathBuf,
}

fn lit(value: &str) -> String {
    format!("\"{}\"", escape_typst_string(value))
}

pub fn render_typst(document: &Document) -> TypstSource {
    let mut out = String::new();
    let mut assets = Vec::new();

    // date: none keeps the PDF metadata independent of the clock
    let _ = writeln!(out, "#set document(title: {}, date: none)", lit(&document.title));
    out.push_str("#set page(paper: \"a4\")\n");
    out.push_str("#set text(size: 10pt)\n\n");

    for page in &document.pages {
        match page {
            Page::Static(static_page) => {
                let name = static_page.asset_name();
                let _ = writeln!(
                    out,
                    "#page(margin: 0pt)[#image({}, width: 100%, height: 100%, fit: \"cover\")]",
                    lit(&name)
                );
                assets.push(TypstAsset {
                    name,
                    source_path: static_page.path.clone(),
                });
            }
            Page::Data(data) => write_data_page(&mut out, data),
        }
    }

    TypstSource { source: out, assets }
}

fn write_data_page(out: &mut String, page: &DataPage) {
    out.push_str("#page(margin: 30pt)[\n");

    out.push_str("#grid(\n  columns: (45%, 1fr, 45%),\n");
    write_header_column(out, &page.header.left, 24, "left");
    out.push_str("  [],\n");
    write_header_column(out, &page.header.right, 20, "right");
    out.push_str(")\n#v(20pt)\n");

    let table = &page.table;
    out.push_str("#table(\n");
    out.push_str("  columns: (15%, 65%, 20%),\n");
    out.push_str("  align: (center + horizon, left, right),\n");
    out.push_str("  stroke: none,\n");
    out.push_str("  inset: (x: 5pt, y: 8pt),\n");
    out.push_str("  table.hline(stroke: 2pt),\n");
    let _ = writeln!(
        out,
        "  table.header(text(weight: \"bold\", {}), text(weight: \"bold\", {}), text(weight: \"bold\", {})),",
        lit(&table.room_header),
        lit(&table.description_header),
        lit(&table.amount_header)
    );
    out.push_str("  table.hline(stroke: 1pt),\n");
    for (i, row) in table.rows.iter().enumerate() {
        if i > 0 {
            out.push_str("  table.hline(stroke: 0.5pt + luma(238)),\n");
        }
        let _ = writeln!(
            out,
            "  text(weight: \"bold\", {}), text(size: 9pt, {}), text(weight: \"bold\", {}),",
            lit(&row.category),
            lit(&row.description),
            lit(&row.amount)
        );
    }
    out.push_str("  table.hline(stroke: 2pt),\n");
    out.push_str(")\n#v(15pt)\n");

    out.push_str("#align(right, grid(\n");
    out.push_str("  columns: (150pt, 100pt),\n");
    out.push_str("  column-gutter: 20pt,\n");
    out.push_str("  row-gutter: 4pt,\n");
    out.push_str("  align: right + horizon,\n");
    for row in &page.totals {
        match row.kind {
            TotalsRowKind::GrandTotal => {
                let _ = writeln!(
                    out,
                    "  text(size: 12pt, weight: \"bold\", {}), text(size: 18pt, weight: \"bold\", {}),",
                    lit(&row.label),
                    lit(&row.amount)
                );
            }
            TotalsRowKind::Subtotal | TotalsRowKind::Tax => {
                let _ = writeln!(out, "  {}, {},", lit(&row.label), lit(&row.amount));
            }
        }
    }
    out.push_str("))\n");

    out.push_str("]\n");
}

fn write_header_column(out: &mut String, column: &HeaderColumn, title_size: u32, align: &str) {
    let _ = writeln!(out, "  align({}, stack(\n    spacing: 2pt,", align);
    let _ = writeln!(
        out,
        "    text(size: {}pt, weight: \"bold\", {}),",
        title_size,
        lit(&column.title)
    );
    for field in &column.fields {
        let _ = writeln!(
            out,
            "    6pt, text(size: 8pt, weight: \"bold\", {}),",
            lit(&field.label)
        );
        let weight = if field.emphasis { "bold" } else { "regular" };
        for line in &field.lines {
            let _ = writeln!(out, "    text(weight: \"{}\", {}),", weight, lit(line));
        }
    }
    out.push_str("  )),\n");
}

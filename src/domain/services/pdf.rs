#[cfg(test)]
#[path = "pdf_test.rs"]
mod tests;

use anyhow::Result;
use printpdf::BuiltinFont;
use printpdf::Mm;
use printpdf::PdfDocument;

use super::summary_rows;
use crate::domain::models::PlanDocument;

pub const PDF_FILE_NAME: &str = "plan_analysis.pdf";
pub const PDF_MIME_TYPE: &str = "application/pdf";

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const LINE_HEIGHT_MM: f32 = 7.0;

/// Serializes a plan into a minimal PDF document. Only the plan summary is
/// exported; rooms and elevations stay on-screen only, matching the
/// documented export behavior.
pub fn export_pdf(plan: &PlanDocument) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) =
        PdfDocument::new("Plan Analysis Report", Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");

    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = PAGE_HEIGHT_MM - 20.0;

    layer.use_text(
        "Plan Analysis Report",
        14.0,
        Mm(PAGE_WIDTH_MM / 2.0 - 25.0),
        Mm(y),
        &regular,
    );
    y -= 2.0 * LINE_HEIGHT_MM;

    if let Some(summary) = &plan.plan_summary {
        layer.use_text("Plan Summary", 12.0, Mm(MARGIN_MM), Mm(y), &bold);
        y -= LINE_HEIGHT_MM;

        for (label, value) in summary_rows(summary) {
            if y < MARGIN_MM {
                let (page, page_layer) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
                layer = doc.get_page(page).get_layer(page_layer);
                y = PAGE_HEIGHT_MM - 20.0;
            }

            layer.use_text(format!("{label}: {value}"), 11.0, Mm(MARGIN_MM), Mm(y), &regular);
            y -= LINE_HEIGHT_MM;
        }
    }

    let bytes = doc.save_to_bytes()?;
    return Ok(bytes);
}

use chrono::{DateTime, Utc};
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use super::{ExportFile, ReportData, summary::condition_distribution};
use crate::skin::format_label;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const RECENT_ANALYSES: usize = 10;

fn pdf_err<E: std::fmt::Debug>(err: E) -> anyhow::Error {
    anyhow::anyhow!("pdf rendering failed: {err:?}")
}

/// Writes lines top to bottom, starting a new page when the cursor reaches
/// the bottom margin.
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    cursor: f32,
}

impl PageWriter {
    fn new(title: &str) -> anyhow::Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_err)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            cursor: PAGE_HEIGHT - MARGIN,
        })
    }

    fn ensure_room(&mut self, height: f32) {
        if self.cursor - height >= MARGIN {
            return;
        }
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor = PAGE_HEIGHT - MARGIN;
    }

    fn line(&mut self, text: &str, size: f32, bold: bool) {
        let height = size * 0.5;
        self.ensure_room(height);
        let font = if bold { &self.bold } else { &self.regular };
        self.layer
            .use_text(text, size, Mm(MARGIN), Mm(self.cursor), font);
        self.cursor -= height;
    }

    fn gap(&mut self) {
        self.cursor -= 4.0;
    }

    fn finish(self) -> anyhow::Result<Vec<u8>> {
        self.doc.save_to_bytes().map_err(pdf_err)
    }
}

/// Printable report: totals, distribution, and the latest analyses.
pub fn render_pdf(data: &ReportData, generated_at: DateTime<Utc>) -> anyhow::Result<ExportFile> {
    let mut page = PageWriter::new("Face Analysis Report")?;

    page.line("Face Analysis Report", 20.0, true);
    page.line(
        &format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M UTC")),
        10.0,
        false,
    );
    page.line(&format!("Total analyses: {}", data.logs.len()), 10.0, false);
    page.gap();

    page.line("Condition Distribution", 14.0, true);
    let distribution = condition_distribution(&data.logs);
    if distribution.is_empty() {
        page.line("No analyses in this period.", 10.0, false);
    }
    for entry in &distribution {
        page.line(
            &format!(
                "{}: {} ({:.2}%)",
                format_label(&entry.condition),
                entry.count,
                entry.percentage
            ),
            10.0,
            false,
        );
    }
    page.gap();

    page.line("Recent Analyses", 14.0, true);
    for log in data.logs.iter().take(RECENT_ANALYSES) {
        page.line(
            &format!(
                "#{}  {}  {}  {}",
                log.id,
                log.created_at.format("%Y-%m-%d"),
                log.user_name,
                format_label(&log.dominant_condition)
            ),
            10.0,
            false,
        );
    }

    Ok(ExportFile {
        filename: format!("analysis-report-{}.pdf", generated_at.timestamp_millis()),
        content_type: "application/pdf",
        bytes: page.finish()?,
    })
}
